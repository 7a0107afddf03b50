#![no_std]
#![no_main]

use embedded_hal_bus::spi::ExclusiveDevice;
use esp_backtrace as _;
use esp_hal::analog::adc::{Adc, AdcConfig, Attenuation};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::timer::timg::TimerGroup;
use esp_hal::usb_serial_jtag::UsbSerialJtag;
use log::{error, info};

extern crate alloc;

use libreroaster::application::{AppBuilder, Application};
use libreroaster::hardware::board::EnvThermistor;
use libreroaster::hardware::board::SsrPin;
use libreroaster::hardware::fan::FanController;
use libreroaster::hardware::thermocouple::Max31855;
use libreroaster::hardware::usb_cdc::{init_usb_cdc, UsbCdcDriver};

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();

    let esp_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(esp_config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    let ssr_pin = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());
    let heater = SsrPin::new(ssr_pin);

    let fan = match FanController::new() {
        Ok(fan) => fan,
        Err(e) => {
            error!("fan controller init failed: {e:?}");
            loop {
                core::hint::spin_loop();
            }
        }
    };

    let tc_cs = Output::new(peripherals.GPIO4, Level::High, OutputConfig::default());
    let spi_bus = Spi::new(peripherals.SPI2, SpiConfig::default())
        .unwrap_or_else(|_| {
            error!("SPI bus init failed");
            loop {
                core::hint::spin_loop();
            }
        })
        .with_sck(peripherals.GPIO7)
        .with_mosi(peripherals.GPIO5)
        .with_miso(peripherals.GPIO6);
    let tc_spi = ExclusiveDevice::new(spi_bus, tc_cs, embassy_time::Delay);
    let thermocouple = match tc_spi {
        Ok(dev) => Max31855::new(dev),
        Err(_) => {
            error!("thermocouple SPI device init failed");
            loop {
                core::hint::spin_loop();
            }
        }
    };

    let mut adc_config = AdcConfig::new();
    let adc_pin = adc_config.enable_pin(peripherals.GPIO3, Attenuation::_11dB);
    let adc = Adc::new(peripherals.ADC1, adc_config);
    let thermistor = EnvThermistor::new(adc, adc_pin);

    let usb = UsbSerialJtag::new(peripherals.USB_DEVICE).into_async();
    init_usb_cdc(UsbCdcDriver::new(usb));

    let app: Application = match AppBuilder::new()
        .with_fan(fan)
        .with_heater(heater)
        .with_thermocouple(thermocouple)
        .with_thermistor(thermistor)
        .build()
    {
        Ok(app) => app,
        Err(e) => {
            error!("application build failed: {e}");
            loop {
                core::hint::spin_loop();
            }
        }
    };

    info!("libreroaster started, control loop ready");

    let executor = embassy_executor::Executor::new();
    executor.run(|spawner| async move {
        if let Err(e) = app.start_tasks(spawner).await {
            error!("failed to start application tasks: {e}");
        }
    })
}
