pub mod fan;
#[cfg(not(target_arch = "riscv32"))]
pub mod fan_host;
pub mod thermistor;
pub mod thermocouple;
pub mod traits;
pub mod usb_cdc;

#[cfg(target_arch = "riscv32")]
pub mod board;
