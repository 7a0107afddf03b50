//! USB CDC transport driver, the only wire in this deployment. Real
//! driver on the riscv32 target, a no-op stand-in for host-side tests.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbCdcError {
    TransmissionError,
    ReceptionError,
    BufferOverflow,
    NotInitialized,
    NotSupported,
}

impl core::fmt::Display for UsbCdcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            UsbCdcError::TransmissionError => "USB CDC transmission failed",
            UsbCdcError::ReceptionError => "USB CDC reception failed",
            UsbCdcError::BufferOverflow => "USB CDC receive buffer overflow",
            UsbCdcError::NotInitialized => "USB CDC driver not initialized",
            UsbCdcError::NotSupported => "USB CDC not supported on this target",
        };
        write!(f, "{msg}")
    }
}

#[cfg(target_arch = "riscv32")]
mod target {
    use super::UsbCdcError;
    use embedded_io_async::{Read, Write};
    use esp_hal::usb_serial_jtag::UsbSerialJtag;

    pub struct UsbCdcDriver<'d> {
        jtag: UsbSerialJtag<'d, esp_hal::Async>,
    }

    impl<'d> UsbCdcDriver<'d> {
        pub fn new(jtag: UsbSerialJtag<'d, esp_hal::Async>) -> Self {
            Self { jtag }
        }

        pub async fn write_bytes(&mut self, data: &[u8]) -> Result<(), UsbCdcError> {
            self.jtag
                .write_all(data)
                .await
                .map_err(|_| UsbCdcError::TransmissionError)
        }

        pub async fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, UsbCdcError> {
            self.jtag
                .read(buf)
                .await
                .map_err(|_| UsbCdcError::ReceptionError)
        }

        pub fn is_connected(&self) -> bool {
            true
        }
    }

    static mut USB_CDC_INSTANCE: Option<UsbCdcDriver<'static>> = None;

    /// # Safety
    /// Must be called exactly once, before any task reaches for
    /// [`get_usb_cdc_driver`], and never concurrently with another call.
    pub unsafe fn init_usb_cdc(driver: UsbCdcDriver<'static>) {
        USB_CDC_INSTANCE = Some(driver);
    }

    pub fn get_usb_cdc_driver() -> Option<&'static mut UsbCdcDriver<'static>> {
        unsafe { (*core::ptr::addr_of_mut!(USB_CDC_INSTANCE)).as_mut() }
    }
}

#[cfg(not(target_arch = "riscv32"))]
mod target {
    use super::UsbCdcError;

    pub struct UsbCdcDriver;

    impl UsbCdcDriver {
        pub fn new() -> Self {
            Self
        }

        pub async fn write_bytes(&mut self, _data: &[u8]) -> Result<(), UsbCdcError> {
            Ok(())
        }

        pub async fn read_bytes(&mut self, _buf: &mut [u8]) -> Result<usize, UsbCdcError> {
            Ok(0)
        }

        pub fn is_connected(&self) -> bool {
            false
        }
    }

    impl Default for UsbCdcDriver {
        fn default() -> Self {
            Self::new()
        }
    }

    static mut USB_CDC_INSTANCE: Option<UsbCdcDriver> = None;

    pub fn init_usb_cdc(driver: UsbCdcDriver) {
        unsafe {
            USB_CDC_INSTANCE = Some(driver);
        }
    }

    pub fn get_usb_cdc_driver() -> Option<&'static mut UsbCdcDriver> {
        unsafe { (*core::ptr::addr_of_mut!(USB_CDC_INSTANCE)).as_mut() }
    }
}

pub use target::*;
