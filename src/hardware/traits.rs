//! The seam between [`crate::control`] and concrete board wiring.
//!
//! One small `Send` trait per peripheral rather than a single monolithic
//! god-trait: the control loop borrows only the peripheral it needs for
//! a given tick.

use crate::error::RoasterError;

pub trait Fan: Send {
    fn enable(&mut self);
    fn disable(&mut self);
    fn set_speed_pct(&mut self, pct: u8) -> Result<(), RoasterError>;
    fn speed_pct(&self) -> u8;
    fn is_enabled(&self) -> bool;
}

pub trait Heater: Send {
    /// Drive the SSR pin directly. Called once per `HEATER_WINDOW_MS`
    /// window edge by [`crate::control::heater_window`], not once per
    /// control tick.
    fn set_on(&mut self, on: bool) -> Result<(), RoasterError>;
}

pub trait Thermocouple: Send {
    /// Raw 32-bit MAX31855-style conversion frame, fault bits included.
    fn read_frame(&mut self) -> Result<u32, RoasterError>;
}

pub trait Thermistor: Send {
    /// Raw 10-bit ADC sample, 0..=1023.
    fn read_raw(&mut self) -> Result<u16, RoasterError>;
}

pub trait Clock: Send {
    fn now_ms(&self) -> u64;
}
