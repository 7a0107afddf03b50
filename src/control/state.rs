//! Core value types shared across the control modules: the phase state
//! machine, the events that drive it, and the aggregate snapshot the
//! transport reports over the wire.

use heapless::String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Off = 0,
    FanOnly = 1,
    Preheat = 2,
    Roasting = 3,
    Cooling = 4,
    Manual = 5,
    Error = 6,
}

impl Phase {
    pub fn id(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Stop,
    StartFanOnly(Option<u8>),
    ExitFanOnly,
    StartPreheat(f32),
    LoadBeans(f32),
    EndRoast,
    FirstCrack,
    CoolComplete,
    EnterManual,
    ExitManual,
    Fault,
    ClearFault,
    Disconnected,
    SetSetpoint(f32),
    SetFanSpeed(u8),
    SetHeaterPower(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCode {
    OverTempChamber,
    FanInterlock,
    ThermocoupleFault,
    PreheatTimeout,
}

impl FaultCode {
    pub fn as_str(self) -> &'static str {
        match self {
            FaultCode::OverTempChamber => "OVER_TEMP_CHAMBER",
            FaultCode::FanInterlock => "FAN_INTERLOCK",
            FaultCode::ThermocoupleFault => "THERMOCOUPLE_FAULT",
            FaultCode::PreheatTimeout => "PREHEAT_TIMEOUT",
        }
    }

    /// Human-readable description carried in the outbound `error` record.
    pub fn message(self) -> &'static str {
        match self {
            FaultCode::OverTempChamber => "chamber temperature exceeded the safety limit",
            FaultCode::FanInterlock => "heater enabled without adequate fan speed",
            FaultCode::ThermocoupleFault => "thermocouple reading persistently faulted",
            FaultCode::PreheatTimeout => "preheat did not reach target within the time limit",
        }
    }

    /// All faults defined here require an explicit `clearFault` to leave ERROR.
    pub fn fatal(self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PidState {
    pub integral: f32,
    pub prev_measurement: f32,
    pub last_tick_ms: Option<u64>,
    pub output: f32,
}

impl Default for PidState {
    fn default() -> Self {
        Self {
            integral: 0.0,
            prev_measurement: 0.0,
            last_tick_ms: None,
            output: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FilterState {
    pub value: Option<f32>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self { value: None }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RorSample {
    pub at_ms: u64,
    pub temp_c: f32,
}

#[derive(Debug, Clone)]
pub struct ControllerState {
    pub phase: Phase,
    pub phase_entered_ms: u64,

    pub setpoint_c: f32,
    pub preheat_target_c: f32,

    pub fan_pct: u8,
    pub fan_enabled: bool,
    pub heater_enabled: bool,
    pub heater_manual_pct: u8,

    /// Remembered per-mode settings, restored on re-entry to that phase.
    pub manual_fan_pct: u8,
    pub manual_heater_pct: u8,
    pub fan_only_pct: u8,

    pub chamber_temp_raw_c: f32,
    pub chamber_temp_filtered_c: f32,
    pub heater_temp_c: f32,
    pub ror_c_per_min: f32,
    /// Set by phase entry when the RoR window must restart; consumed and
    /// cleared by the controller once the history deque has been reset.
    pub ror_reset_pending: bool,

    pub pid_enabled: bool,
    pub pid: PidState,
    pub filter: FilterState,

    pub roast_epoch_ms: u64,
    pub preheat_epoch_ms: u64,
    pub first_crack_marked: bool,
    pub first_crack_offset_ms: u64,

    pub fault_latched: bool,
    pub fault_code: Option<FaultCode>,
    pub thermocouple_fault_streak: u8,
    pub thermocouple_clean_streak: u8,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            phase: Phase::Off,
            phase_entered_ms: 0,
            setpoint_c: crate::config::DEFAULT_ROAST_SETPOINT_C,
            preheat_target_c: crate::config::DEFAULT_PREHEAT_TARGET_C,
            fan_pct: 0,
            fan_enabled: false,
            heater_enabled: false,
            heater_manual_pct: 0,
            manual_fan_pct: crate::config::FAN_MANUAL_DEFAULT_PCT,
            manual_heater_pct: 0,
            fan_only_pct: crate::config::FAN_ONLY_DEFAULT_PCT,
            chamber_temp_raw_c: 0.0,
            chamber_temp_filtered_c: 0.0,
            heater_temp_c: 0.0,
            ror_c_per_min: 0.0,
            ror_reset_pending: false,
            pid_enabled: false,
            pid: PidState::default(),
            filter: FilterState::default(),
            roast_epoch_ms: 0,
            preheat_epoch_ms: 0,
            first_crack_marked: false,
            first_crack_offset_ms: 0,
            fault_latched: false,
            fault_code: None,
            thermocouple_fault_streak: 0,
            thermocouple_clean_streak: 0,
        }
    }
}

/// The active PID target: `preheat_target_c` while preheating, `setpoint_c`
/// otherwise. Mirrors what the PID was last told to track.
pub fn active_setpoint(state: &ControllerState) -> f32 {
    if state.phase == Phase::Preheat {
        state.preheat_target_c
    } else {
        state.setpoint_c
    }
}

/// The read-only view handed to the transport for telemetry framing.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: Phase,
    pub setpoint_c: f32,
    /// `None` if the thermocouple is currently faulted beyond recovery.
    pub chamber_temp_c: Option<f32>,
    pub heater_temp_c: f32,
    pub ror_c_per_min: f32,
    pub fan_pct: u8,
    pub heater_pct: u8,
    pub heater_enabled: bool,
    pub pid_enabled: bool,
    pub fault_latched: bool,
    pub fault_code: Option<&'static str>,
    pub fault_message: Option<&'static str>,
    pub fault_fatal: bool,
    pub first_crack_marked: bool,
    pub first_crack_offset_ms: Option<u64>,
    pub roast_elapsed_ms: u64,
}

impl ControllerState {
    pub fn snapshot(&self, now_ms: u64) -> Snapshot {
        let thermocouple_down = self.fault_latched && self.fault_code == Some(FaultCode::ThermocoupleFault);
        Snapshot {
            phase: self.phase,
            setpoint_c: active_setpoint(self),
            chamber_temp_c: if thermocouple_down {
                None
            } else {
                Some(self.chamber_temp_filtered_c)
            },
            heater_temp_c: self.heater_temp_c,
            ror_c_per_min: self.ror_c_per_min,
            fan_pct: self.fan_pct,
            heater_pct: if self.pid_enabled {
                (self.pid.output / crate::config::PID_OUTPUT_MAX * 100.0) as u8
            } else {
                self.heater_manual_pct
            },
            heater_enabled: self.heater_enabled,
            pid_enabled: self.pid_enabled,
            fault_latched: self.fault_latched,
            fault_code: self.fault_code.map(FaultCode::as_str),
            fault_message: self.fault_code.map(FaultCode::message),
            fault_fatal: self.fault_code.map(FaultCode::fatal).unwrap_or(false),
            first_crack_marked: self.first_crack_marked,
            first_crack_offset_ms: if self.first_crack_marked {
                Some(self.first_crack_offset_ms)
            } else {
                None
            },
            roast_elapsed_ms: if self.roast_epoch_ms == 0 {
                0
            } else {
                now_ms.saturating_sub(self.roast_epoch_ms)
            },
        }
    }
}

pub type FaultMessage = String<64>;
