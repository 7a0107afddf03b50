//! Fluent builder wiring concrete board peripherals into a [`Controller`]
//! and installing it into the shared [`controller_cell`].
//!
//! An `AppBuilder` accepting peripherals as boxed trait objects, a
//! `build()` that assembles the aggregate and installs it, and an
//! `Application` handle whose `start_tasks` spawns the embassy tasks
//! over the single USB-serial transport.

use alloc::boxed::Box;
use embassy_executor::Spawner;
use log::info;

use crate::application::controller_cell;
use crate::control::Controller;
use crate::hardware::traits::{Fan, Heater, Thermistor, Thermocouple};

pub struct AppBuilder {
    fan: Option<Box<dyn Fan>>,
    heater: Option<Box<dyn Heater>>,
    thermocouple: Option<Box<dyn Thermocouple>>,
    thermistor: Option<Box<dyn Thermistor>>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            fan: None,
            heater: None,
            thermocouple: None,
            thermistor: None,
        }
    }

    pub fn with_fan<F: Fan + 'static>(mut self, fan: F) -> Self {
        self.fan = Some(Box::new(fan));
        self
    }

    pub fn with_heater<H: Heater + 'static>(mut self, heater: H) -> Self {
        self.heater = Some(Box::new(heater));
        self
    }

    pub fn with_thermocouple<T: Thermocouple + 'static>(mut self, thermocouple: T) -> Self {
        self.thermocouple = Some(Box::new(thermocouple));
        self
    }

    pub fn with_thermistor<T: Thermistor + 'static>(mut self, thermistor: T) -> Self {
        self.thermistor = Some(Box::new(thermistor));
        self
    }

    pub fn build(self) -> Result<Application, BuildError> {
        let fan = self.fan.ok_or(BuildError::MissingPeripheral("fan"))?;
        let heater = self.heater.ok_or(BuildError::MissingPeripheral("heater"))?;
        let thermocouple = self
            .thermocouple
            .ok_or(BuildError::MissingPeripheral("thermocouple"))?;
        let thermistor = self
            .thermistor
            .ok_or(BuildError::MissingPeripheral("thermistor"))?;

        let controller = Controller::new(fan, heater, thermocouple, thermistor);
        controller_cell::install(controller);

        info!("Application components initialized successfully");

        Ok(Application { built: true })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Application {
    built: bool,
}

impl Application {
    pub fn verify_initialization(&self) -> Result<(), VerificationError> {
        if !self.built {
            return Err(VerificationError::NotBuilt);
        }
        if !controller_cell::is_installed() {
            return Err(VerificationError::ServicesNotInitialized);
        }
        Ok(())
    }

    pub async fn start_tasks(&self, spawner: Spawner) -> Result<(), TaskError> {
        self.verify_initialization()
            .map_err(TaskError::VerificationFailed)?;

        spawner
            .spawn(super::tasks::control_loop_task())
            .map_err(TaskError::SpawnFailed)?;
        spawner
            .spawn(super::tasks::transport_reader_task())
            .map_err(TaskError::SpawnFailed)?;
        spawner
            .spawn(super::tasks::transport_writer_task())
            .map_err(TaskError::SpawnFailed)?;

        info!("All application tasks started successfully");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    MissingPeripheral(&'static str),
}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuildError::MissingPeripheral(name) => {
                write!(f, "missing required peripheral: {name}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    NotBuilt,
    ServicesNotInitialized,
}

impl core::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VerificationError::NotBuilt => write!(f, "application not built"),
            VerificationError::ServicesNotInitialized => write!(f, "services not initialized"),
        }
    }
}

#[derive(Debug)]
pub enum TaskError {
    VerificationFailed(VerificationError),
    SpawnFailed(embassy_executor::SpawnError),
}

impl core::fmt::Display for TaskError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TaskError::VerificationFailed(e) => write!(f, "verification failed: {e}"),
            TaskError::SpawnFailed(e) => write!(f, "failed to spawn task: {e:?}"),
        }
    }
}
