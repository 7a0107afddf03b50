pub mod controller_cell;
#[cfg(target_arch = "riscv32")]
pub mod app_builder;
#[cfg(target_arch = "riscv32")]
pub mod tasks;

#[cfg(target_arch = "riscv32")]
pub use app_builder::*;
pub use controller_cell::*;
#[cfg(target_arch = "riscv32")]
pub use tasks::*;
