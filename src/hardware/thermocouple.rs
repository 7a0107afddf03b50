//! MAX31855-style thermocouple amplifier driver.
//!
//! No register file, just a 32-bit conversion frame read back over SPI.
//! Bit layout, MSB first:
//!   31..18  signed 14-bit chamber temperature, 0.25 C / LSB
//!   17      reserved
//!   16      fault (OR of bits 2..0)
//!   15..4   internal cold-junction temperature (unused here)
//!   3       reserved
//!   2       short to VCC
//!   1       short to GND
//!   0       open circuit

use embedded_hal::spi::SpiDevice;

use crate::error::RoasterError;
use crate::hardware::traits::Thermocouple;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultBits {
    pub open_circuit: bool,
    pub short_to_gnd: bool,
    pub short_to_vcc: bool,
}

impl FaultBits {
    pub fn any(&self) -> bool {
        self.open_circuit || self.short_to_gnd || self.short_to_vcc
    }

    /// Short-to-GND is noisy on some boards and is treated as a warning;
    /// open circuit and short-to-VCC are unambiguous wiring failures.
    pub fn is_critical(&self) -> bool {
        self.open_circuit || self.short_to_vcc
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temp_c: f32,
    pub fault: FaultBits,
}

pub fn decode_frame(frame: u32) -> Reading {
    let fault = FaultBits {
        open_circuit: frame & 0x1 != 0,
        short_to_gnd: frame & 0x2 != 0,
        short_to_vcc: frame & 0x4 != 0,
    };

    let raw14 = (frame >> 18) as u16 & 0x3FFF;
    let signed = sign_extend_14(raw14);
    let temp_c = signed as f32 * 0.25;

    Reading { temp_c, fault }
}

fn sign_extend_14(raw: u16) -> i16 {
    if raw & 0x2000 != 0 {
        (raw | 0xC000) as i16
    } else {
        raw as i16
    }
}

pub struct Max31855<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Max31855<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn read(&mut self) -> Result<Reading, RoasterError> {
        let mut buf = [0u8; 4];
        self.spi
            .read(&mut buf)
            .map_err(|_| RoasterError::HardwareError)?;
        let frame = u32::from_be_bytes(buf);
        Ok(decode_frame(frame))
    }
}

impl<SPI: SpiDevice + Send> Thermocouple for Max31855<SPI> {
    fn read_frame(&mut self) -> Result<u32, RoasterError> {
        let mut buf = [0u8; 4];
        self.spi
            .read(&mut buf)
            .map_err(|_| RoasterError::HardwareError)?;
        Ok(u32::from_be_bytes(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_good_frame() {
        // 100.00 C -> raw14 = 400 = 0x190
        let frame = (0x190u32) << 18;
        let r = decode_frame(frame);
        assert_eq!(r.temp_c, 100.0);
        assert!(!r.fault.any());
    }

    #[test]
    fn decodes_negative_temperature() {
        // -10.00 C -> raw14 = -40 in 14-bit two's complement
        let raw14: u16 = (-40i16 as u16) & 0x3FFF;
        let frame = (raw14 as u32) << 18;
        let r = decode_frame(frame);
        assert_eq!(r.temp_c, -10.0);
    }

    #[test]
    fn decodes_open_circuit_fault() {
        let frame = 0x1_0001u32; // fault bit + open bit
        let r = decode_frame(frame);
        assert!(r.fault.open_circuit);
        assert!(r.fault.is_critical());
    }

    #[test]
    fn short_to_gnd_is_warning_only() {
        let frame = 0x1_0002u32;
        let r = decode_frame(frame);
        assert!(r.fault.short_to_gnd);
        assert!(!r.fault.is_critical());
    }

    #[test]
    fn short_to_vcc_is_critical() {
        let frame = 0x1_0004u32;
        let r = decode_frame(frame);
        assert!(r.fault.short_to_vcc);
        assert!(r.fault.is_critical());
    }
}
