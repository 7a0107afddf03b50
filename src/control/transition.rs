//! Table-driven phase transitions.
//!
//! One explicit `(phase, event)` match with entry/exit actions applied
//! by [`enter_phase`], so every transition goes through the same
//! invariant-preserving path regardless of which event triggered it.

use crate::config::{
    FAN_COOLING_DUTY_PCT, FAN_PREHEAT_DUTY_PCT, FAN_ROAST_DEFAULT_PCT, FAN_ROAST_MIN_DUTY_PCT,
    SETPOINT_MAX_C, SETPOINT_MIN_C,
};
use crate::control::pid;
use crate::control::state::{ControllerState, Event, Phase};

fn enter_phase(state: &mut ControllerState, phase: Phase, now_ms: u64) {
    state.phase = phase;
    state.phase_entered_ms = now_ms;

    match phase {
        Phase::Off => {
            state.heater_enabled = false;
            state.fan_enabled = false;
            state.fan_pct = 0;
            state.pid_enabled = false;
            state.roast_epoch_ms = 0;
            state.first_crack_marked = false;
            state.first_crack_offset_ms = 0;
            state.ror_reset_pending = true;
            pid::reset(&mut state.pid);
        }
        Phase::FanOnly => {
            state.heater_enabled = false;
            state.pid_enabled = false;
            state.fan_pct = state.fan_only_pct;
            state.fan_enabled = true;
            pid::reset(&mut state.pid);
        }
        Phase::Preheat => {
            state.preheat_epoch_ms = now_ms;
            state.roast_epoch_ms = now_ms;
            state.fan_pct = FAN_PREHEAT_DUTY_PCT;
            state.fan_enabled = true;
            state.pid_enabled = true;
            pid::reset(&mut state.pid);
            state.heater_enabled = true;
        }
        Phase::Roasting => {
            state.first_crack_marked = false;
            state.first_crack_offset_ms = 0;
            state.pid_enabled = true;
            pid::reset(&mut state.pid);
            state.fan_pct = FAN_ROAST_DEFAULT_PCT;
            state.fan_enabled = true;
            state.heater_enabled = true;
            state.ror_reset_pending = true;
        }
        Phase::Cooling => {
            state.heater_enabled = false;
            state.pid_enabled = false;
            state.fan_pct = FAN_COOLING_DUTY_PCT;
            state.fan_enabled = true;
        }
        Phase::Manual => {
            state.fan_pct = state.manual_fan_pct;
            state.fan_enabled = true;
            state.heater_manual_pct = 0;
            state.manual_heater_pct = 0;
            state.heater_enabled = true;
            state.pid_enabled = false;
            pid::reset(&mut state.pid);
        }
        Phase::Error => {
            state.heater_enabled = false;
            state.fan_enabled = false;
            state.fan_pct = 0;
            state.pid_enabled = false;
        }
    }
}

/// Apply one event to the state machine. Returns `true` if it produced a
/// phase transition or a state change, `false` if the event is ignored in
/// the current phase.
pub fn apply_event(state: &mut ControllerState, event: Event, now_ms: u64) -> bool {
    if state.phase == Phase::Error {
        return match event {
            Event::ClearFault => {
                state.fault_latched = false;
                state.fault_code = None;
                enter_phase(state, Phase::Off, now_ms);
                true
            }
            _ => false,
        };
    }

    match event {
        Event::Fault => {
            enter_phase(state, Phase::Error, now_ms);
            true
        }
        Event::ClearFault => false,

        Event::Stop => match state.phase {
            Phase::Off => false,
            _ => {
                enter_phase(state, Phase::Off, now_ms);
                true
            }
        },

        Event::StartFanOnly(fan_speed) => match state.phase {
            Phase::Off => {
                if let Some(pct) = fan_speed {
                    state.fan_only_pct = pct.min(100);
                }
                enter_phase(state, Phase::FanOnly, now_ms);
                true
            }
            _ => false,
        },
        Event::ExitFanOnly => match state.phase {
            Phase::FanOnly => {
                enter_phase(state, Phase::Off, now_ms);
                true
            }
            _ => false,
        },
        Event::StartPreheat(target_c) => match state.phase {
            Phase::Off | Phase::FanOnly => {
                state.preheat_target_c = target_c.clamp(SETPOINT_MIN_C, SETPOINT_MAX_C);
                enter_phase(state, Phase::Preheat, now_ms);
                true
            }
            _ => false,
        },
        Event::LoadBeans(setpoint_c) => match state.phase {
            Phase::Preheat => {
                state.setpoint_c = setpoint_c.clamp(SETPOINT_MIN_C, SETPOINT_MAX_C);
                enter_phase(state, Phase::Roasting, now_ms);
                true
            }
            _ => false,
        },
        Event::EndRoast => match state.phase {
            Phase::Roasting => {
                enter_phase(state, Phase::Cooling, now_ms);
                true
            }
            _ => false,
        },
        Event::CoolComplete => match state.phase {
            Phase::Cooling => {
                enter_phase(state, Phase::Off, now_ms);
                true
            }
            _ => false,
        },
        Event::FirstCrack => match state.phase {
            Phase::Roasting if !state.first_crack_marked => {
                state.first_crack_marked = true;
                state.first_crack_offset_ms = now_ms.saturating_sub(state.roast_epoch_ms);
                true
            }
            _ => false,
        },
        Event::EnterManual => match state.phase {
            Phase::Off => {
                enter_phase(state, Phase::Manual, now_ms);
                true
            }
            _ => false,
        },
        Event::ExitManual => match state.phase {
            Phase::Manual => {
                enter_phase(state, Phase::Off, now_ms);
                true
            }
            _ => false,
        },
        Event::Disconnected => match state.phase {
            Phase::FanOnly | Phase::Manual => {
                enter_phase(state, Phase::Off, now_ms);
                true
            }
            Phase::Preheat | Phase::Roasting => {
                enter_phase(state, Phase::Cooling, now_ms);
                true
            }
            _ => false,
        },
        Event::SetSetpoint(c) => match state.phase {
            Phase::Off | Phase::Preheat | Phase::Roasting => {
                let clamped = c.clamp(SETPOINT_MIN_C, SETPOINT_MAX_C);
                if state.phase == Phase::Preheat {
                    state.preheat_target_c = clamped;
                } else {
                    state.setpoint_c = clamped;
                }
                true
            }
            _ => false,
        },
        Event::SetFanSpeed(pct) => match state.phase {
            Phase::FanOnly => {
                state.fan_only_pct = pct.min(100);
                state.fan_pct = state.fan_only_pct;
                state.fan_enabled = true;
                true
            }
            Phase::Preheat | Phase::Roasting => {
                state.fan_pct = pct.min(100).max(FAN_ROAST_MIN_DUTY_PCT);
                state.fan_enabled = true;
                true
            }
            Phase::Manual => {
                state.manual_fan_pct = pct.min(100);
                state.fan_pct = state.manual_fan_pct;
                state.fan_enabled = true;
                true
            }
            _ => false,
        },
        Event::SetHeaterPower(pct) => match state.phase {
            Phase::Manual => {
                state.manual_heater_pct = pct.min(100);
                state.heater_manual_pct = state.manual_heater_pct;
                state.heater_enabled = true;
                true
            }
            _ => false,
        },
    }
}
