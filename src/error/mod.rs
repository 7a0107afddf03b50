//! Programmer-facing error taxonomy.
//!
//! This is distinct from the fault codes exchanged with a host over the
//! transport (`OVER_TEMP_CHAMBER`, `THERMOCOUPLE_FAULT`, ...), which are
//! plain strings defined on [`crate::control::state::FaultCode`].
//! `RoasterError` is for failures the firmware itself needs to react to:
//! a sensor that can't be read, a channel that's full, a builder missing
//! a peripheral.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoasterError {
    HardwareError,
    SensorFault,
    ChannelFull,
    NotInitialized,
    InvalidCommand,
}

impl core::fmt::Display for RoasterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            RoasterError::HardwareError => "hardware operation failed",
            RoasterError::SensorFault => "sensor reading unavailable or faulted",
            RoasterError::ChannelFull => "output channel full, message dropped",
            RoasterError::NotInitialized => "component not initialized",
            RoasterError::InvalidCommand => "command rejected",
        };
        write!(f, "{msg}")
    }
}
