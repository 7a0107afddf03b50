//! NTC thermistor reader for the environment/ambient sensor.
//!
//! Beta-equation conversion over a 10-bit ADC sample and a 100k/100k
//! divider off a 5V rail. No register protocol to ground this on in the
//! teacher repo (its environment channel was a second MAX31856 thermocouple
//! channel), so the ADC-sample-to-physical-unit shape follows the general
//! pattern of the dropped MAX31856 driver, and the float math follows the
//! `libm` usage seen elsewhere in the retrieval pack for no_std targets.

use libm::logf;

use crate::error::RoasterError;
use crate::hardware::traits::Thermistor;

const BETA: f32 = 3950.0;
const R0_OHMS: f32 = 100_000.0;
const T0_KELVIN: f32 = 298.15; // 25 C
const SERIES_R_OHMS: f32 = 100_000.0;
const ADC_MAX: f32 = 1023.0;
const KELVIN_TO_CELSIUS: f32 = 273.15;

/// Returned when the raw sample is 0 (divider fault / sensor disconnected)
/// rather than attempting a division by zero.
pub const FAULT_SENTINEL_C: f32 = 999.0;

pub fn raw_to_celsius(raw: u16) -> f32 {
    if raw == 0 {
        return FAULT_SENTINEL_C;
    }

    let raw = raw as f32;
    let r_ntc = SERIES_R_OHMS * raw / (ADC_MAX - raw + 1.0);

    let ratio = r_ntc / R0_OHMS;
    let inv_t = 1.0 / T0_KELVIN + logf(ratio) / BETA;
    1.0 / inv_t - KELVIN_TO_CELSIUS
}

pub struct Ntc<ADC> {
    adc: ADC,
}

impl<ADC: Thermistor> Ntc<ADC> {
    pub fn new(adc: ADC) -> Self {
        Self { adc }
    }

    pub fn read_celsius(&mut self) -> Result<f32, RoasterError> {
        let raw = self.adc.read_raw()?;
        Ok(raw_to_celsius(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_zero_returns_sentinel() {
        assert_eq!(raw_to_celsius(0), FAULT_SENTINEL_C);
    }

    #[test]
    fn midpoint_is_near_room_temperature() {
        // Equal divider legs -> r_ntc == R0 -> T == T0 == 25 C
        let raw = (ADC_MAX / 2.0).round() as u16;
        let t = raw_to_celsius(raw);
        assert!((t - 25.0).abs() < 1.0, "got {t}");
    }

    #[test]
    fn higher_raw_means_lower_resistance_means_higher_temperature() {
        let cool = raw_to_celsius(200);
        let hot = raw_to_celsius(800);
        assert!(hot > cool);
    }
}
