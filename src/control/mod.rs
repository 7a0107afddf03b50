pub mod controller;
pub mod heater_window;
pub mod pid;
pub mod safety;
pub mod state;
pub mod transition;

pub use controller::Controller;
pub use state::{ControllerState, Event, FaultCode, Phase, Snapshot};
