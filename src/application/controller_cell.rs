//! The single shared cell the control task and the transport tasks meet
//! at.
//!
//! One `Controller` cell and one inbound/outbound line-channel pair:
//! sibling tasks reach the aggregate only through this cell, never
//! through per-subsystem statics scattered across modules.

use core::cell::RefCell;
use critical_section::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::control::Controller;
use crate::input::linebuffer::Line;
use crate::input::protocol::OutLine;

pub const INBOUND_CHANNEL_SIZE: usize = 8;
pub const OUTBOUND_CHANNEL_SIZE: usize = 16;

static CONTROLLER: Mutex<RefCell<Option<Controller>>> = Mutex::new(RefCell::new(None));
static INBOUND: Channel<CriticalSectionRawMutex, Line, INBOUND_CHANNEL_SIZE> = Channel::new();
static OUTBOUND: Channel<CriticalSectionRawMutex, OutLine, OUTBOUND_CHANNEL_SIZE> = Channel::new();

/// Timestamp of the last inbound byte, and whether a disconnect has
/// already been posted for the silence period following it.
static LAST_ACTIVITY: Mutex<RefCell<Option<u64>>> = Mutex::new(RefCell::new(None));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellError {
    NotInitialized,
}

pub fn install(controller: Controller) {
    critical_section::with(|cs| {
        CONTROLLER.borrow(cs).borrow_mut().replace(controller);
    });
}

pub fn is_installed() -> bool {
    critical_section::with(|cs| CONTROLLER.borrow(cs).borrow().is_some())
}

pub fn with_controller<R>(f: impl FnOnce(&mut Controller) -> R) -> Result<R, CellError> {
    critical_section::with(|cs| {
        match CONTROLLER.borrow(cs).borrow_mut().as_mut() {
            Some(controller) => Ok(f(controller)),
            None => Err(CellError::NotInitialized),
        }
    })
}

pub fn inbound_channel(
) -> &'static Channel<CriticalSectionRawMutex, Line, INBOUND_CHANNEL_SIZE> {
    &INBOUND
}

pub fn outbound_channel(
) -> &'static Channel<CriticalSectionRawMutex, OutLine, OUTBOUND_CHANNEL_SIZE> {
    &OUTBOUND
}

/// Record an inbound byte at `now_ms`. Called by the transport reader on
/// every byte, not only on complete lines, per the "any inbound byte
/// counts as activity" contract.
pub fn record_activity(now_ms: u64) {
    critical_section::with(|cs| {
        LAST_ACTIVITY.borrow(cs).borrow_mut().replace(now_ms);
    });
}

pub fn last_activity_ms() -> Option<u64> {
    critical_section::with(|cs| *LAST_ACTIVITY.borrow(cs).borrow())
}
