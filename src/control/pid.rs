//! Dual-gain PID with derivative-on-measurement.
//!
//! Same integral-clamp anti-windup shape and `compute(setpoint,
//! measurement, now)` signature as a single-gain PID, extended with gain
//! scheduling, an 0..255 output range, and derivative taken on the
//! measurement (not the error) to avoid derivative kick on setpoint
//! changes.

use libm::fabsf;

use crate::config::{
    PID_AGGRESSIVE_KD, PID_AGGRESSIVE_KI, PID_AGGRESSIVE_KP, PID_CONSERVATIVE_KD,
    PID_CONSERVATIVE_KI, PID_CONSERVATIVE_KP, PID_GAIN_SWITCH_THRESHOLD_C, PID_OUTPUT_MAX,
    PID_OUTPUT_MIN,
};
use crate::control::state::PidState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gains {
    Aggressive,
    Conservative,
}

fn gains_for_error(error: f32) -> (f32, f32, f32) {
    if fabsf(error) > PID_GAIN_SWITCH_THRESHOLD_C {
        (PID_AGGRESSIVE_KP, PID_AGGRESSIVE_KI, PID_AGGRESSIVE_KD)
    } else {
        (
            PID_CONSERVATIVE_KP,
            PID_CONSERVATIVE_KI,
            PID_CONSERVATIVE_KD,
        )
    }
}

/// Advance the controller by one tick. `state` carries the integral and
/// previous-measurement terms between calls; `now_ms` is a monotonic
/// clock reading, not a delta.
pub fn compute(state: &mut PidState, setpoint_c: f32, measurement_c: f32, now_ms: u64) -> f32 {
    let error = setpoint_c - measurement_c;
    let (kp, ki, kd) = gains_for_error(error);

    let dt_s = match state.last_tick_ms {
        Some(last) => (now_ms.saturating_sub(last)) as f32 / 1000.0,
        None => 0.0,
    };

    let proportional = kp * error;

    let integral_limit = if ki > 0.0 {
        PID_OUTPUT_MAX / ki
    } else {
        PID_OUTPUT_MAX
    };
    if dt_s > 0.0 {
        state.integral = (state.integral + error * dt_s).clamp(-integral_limit, integral_limit);
    }
    let integral = ki * state.integral;

    let derivative = if dt_s > 0.0 {
        -kd * (measurement_c - state.prev_measurement) / dt_s
    } else {
        0.0
    };

    let output = (proportional + integral + derivative).clamp(PID_OUTPUT_MIN, PID_OUTPUT_MAX);

    state.prev_measurement = measurement_c;
    state.last_tick_ms = Some(now_ms);
    state.output = output;
    output
}

pub fn reset(state: &mut PidState) {
    *state = PidState::default();
}
