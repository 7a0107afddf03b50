//! Concrete peripheral wiring for the ESP32-C3 roaster board.
//!
//! `main.rs` performs the raw `esp_hal::init` / pin split (esp-hal's
//! generics make that awkward to hide behind a function boundary) and
//! hands the resulting typed peripherals to [`BoardHardware::new`], which
//! assembles the driver types the control loop actually talks to.

use embedded_hal::digital::OutputPin;
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::analog::adc::{Adc, AdcPin};
use esp_hal::gpio::Output;
use esp_hal::peripherals::ADC1;
use esp_hal::spi::master::Spi;

use crate::error::RoasterError;
use crate::hardware::fan::FanController;
use crate::hardware::thermocouple::Max31855;
use crate::hardware::traits::{Heater, Thermistor};

/// Environment NTC thermistor on a single-ended ADC1 channel.
pub struct EnvThermistor<PIN> {
    adc: Adc<'static, ADC1<'static>, esp_hal::Blocking>,
    pin: AdcPin<PIN, ADC1<'static>>,
}

impl<PIN> EnvThermistor<PIN> {
    pub fn new(adc: Adc<'static, ADC1<'static>, esp_hal::Blocking>, pin: AdcPin<PIN, ADC1<'static>>) -> Self {
        Self { adc, pin }
    }
}

impl<PIN: Send> Thermistor for EnvThermistor<PIN> {
    fn read_raw(&mut self) -> Result<u16, RoasterError> {
        self.adc
            .read_oneshot(&mut self.pin)
            .map_err(|_| RoasterError::HardwareError)
    }
}

pub struct SsrPin<PIN> {
    pin: PIN,
}

impl<PIN: OutputPin> SsrPin<PIN> {
    pub fn new(pin: PIN) -> Self {
        Self { pin }
    }
}

impl<PIN: OutputPin + Send> Heater for SsrPin<PIN> {
    fn set_on(&mut self, on: bool) -> Result<(), RoasterError> {
        if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
        .map_err(|_| RoasterError::HardwareError)
    }
}

pub type ConcreteThermocouple =
    Max31855<ExclusiveDevice<Spi<'static, esp_hal::Blocking>, Output<'static>, embassy_time::Delay>>;
pub type ConcreteHeater = SsrPin<Output<'static>>;
pub type ConcreteFan = FanController;
pub type ConcreteThermistor = EnvThermistor<esp_hal::peripherals::GPIO3<'static>>;

pub struct BoardHardware {
    pub thermocouple: ConcreteThermocouple,
    pub thermistor: ConcreteThermistor,
    pub heater: ConcreteHeater,
    pub fan: ConcreteFan,
}

impl BoardHardware {
    pub fn new(
        thermocouple: ConcreteThermocouple,
        thermistor: ConcreteThermistor,
        heater: ConcreteHeater,
        fan: ConcreteFan,
    ) -> Self {
        Self {
            thermocouple,
            thermistor,
            heater,
            fan,
        }
    }
}
