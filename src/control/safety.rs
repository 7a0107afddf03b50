//! Safety monitor: debounced thermocouple fault latching plus the
//! invariant checks a tick must satisfy before actuators are driven.
//!
//! Narrowed to the single concern of latching and clearing a fault
//! against the roaster's own state, rather than a general
//! error-severity ladder.

use crate::config::{
    FAN_INTERLOCK_MIN_PCT, MAX_CHAMBER_TEMP_C, PREHEAT_TIMEOUT_MS, THERMOCOUPLE_FAULT_CLEAR_COUNT,
    THERMOCOUPLE_FAULT_LATCH_COUNT, WARN_CHAMBER_TEMP_C,
};
use crate::control::state::{ControllerState, FaultCode};
use crate::hardware::thermocouple::FaultBits;
use log::warn;

/// Feed one thermocouple read result into the debouncer. Returns the
/// fault code to latch, if the streak just crossed the threshold.
///
/// A critical fault (open circuit or short to VCC) only latches while
/// the heater is enabled; with the heater off there's nothing for a bad
/// reading to protect against, so the streak is tracked but downgraded
/// to a log line instead of a latched fault.
pub fn debounce_thermocouple(
    state: &mut ControllerState,
    fault: FaultBits,
    heater_enabled: bool,
) -> Option<FaultCode> {
    if fault.is_critical() {
        state.thermocouple_fault_streak = state.thermocouple_fault_streak.saturating_add(1);
        state.thermocouple_clean_streak = 0;
        if state.thermocouple_fault_streak >= THERMOCOUPLE_FAULT_LATCH_COUNT && !state.fault_latched
        {
            if heater_enabled {
                return Some(FaultCode::ThermocoupleFault);
            }
            warn!("thermocouple fault streak past threshold with heater off, not latching");
        }
    } else {
        state.thermocouple_clean_streak = state.thermocouple_clean_streak.saturating_add(1);
        state.thermocouple_fault_streak = 0;
    }
    None
}

pub fn thermocouple_clear_eligible(state: &ControllerState) -> bool {
    state.thermocouple_clean_streak >= THERMOCOUPLE_FAULT_CLEAR_COUNT
}

pub fn latch_fault(state: &mut ControllerState, code: FaultCode) {
    state.fault_latched = true;
    state.fault_code = Some(code);
}

pub fn clear_fault(state: &mut ControllerState) {
    state.fault_latched = false;
    state.fault_code = None;
    state.thermocouple_fault_streak = 0;
    state.thermocouple_clean_streak = 0;
}

/// Checked once per tick, after sensor reads and before actuators are
/// driven. Returns the fault to latch, if any non-thermocouple invariant
/// was just violated.
///
/// The fan-heater interlock applies regardless of phase, including
/// MANUAL: any actuation that violates an invariant latches the
/// corresponding fault, there is no exemption for operator-driven power.
pub fn check_invariants(state: &ControllerState, now_ms: u64) -> Option<FaultCode> {
    if state.chamber_temp_filtered_c >= MAX_CHAMBER_TEMP_C {
        return Some(FaultCode::OverTempChamber);
    }

    if state.chamber_temp_filtered_c >= WARN_CHAMBER_TEMP_C {
        warn!("chamber temperature in warning band: {}", state.chamber_temp_filtered_c);
    }

    if state.heater_enabled && !(state.fan_enabled && state.fan_pct >= FAN_INTERLOCK_MIN_PCT) {
        return Some(FaultCode::FanInterlock);
    }

    if state.phase == crate::control::state::Phase::Preheat
        && now_ms.saturating_sub(state.phase_entered_ms) >= PREHEAT_TIMEOUT_MS
    {
        return Some(FaultCode::PreheatTimeout);
    }

    None
}
