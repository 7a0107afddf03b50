// GPIO pin assignments for the ESP32-C3 roaster board.
pub const SPI_SCLK_PIN: u8 = 7;
pub const SPI_MOSI_PIN: u8 = 5;
pub const SPI_MISO_PIN: u8 = 6;
pub const THERMOCOUPLE_CS_PIN: u8 = 4; // bean (chamber) thermocouple chip select
pub const THERMISTOR_ADC_PIN: u8 = 3; // environment NTC thermistor
pub const SSR_CONTROL_PIN: u8 = 2;
pub const FAN_PWM_PIN: u8 = 8;
pub const USB_SERIAL_JTAG: () = (); // USB CDC is a fixed peripheral, no GPIO pair

pub const FAN_PWM_FREQUENCY_HZ: u32 = 25_000;

// Temperature bounds (degrees Celsius), invariant I7.
pub const SETPOINT_MIN_C: f32 = 100.0;
pub const SETPOINT_MAX_C: f32 = 260.0;
pub const DEFAULT_ROAST_SETPOINT_C: f32 = 200.0;
pub const DEFAULT_PREHEAT_TARGET_C: f32 = 180.0;

// Safety thresholds.
pub const MAX_CHAMBER_TEMP_C: f32 = 260.0;
pub const WARN_CHAMBER_TEMP_C: f32 = 250.0;
pub const FAN_INTERLOCK_MIN_PCT: u8 = 40;
pub const COOLING_TARGET_TEMP_C: f32 = 50.0;
pub const PREHEAT_TIMEOUT_MS: u64 = 900_000; // 15 minutes

// Per-phase fan duty cycles.
pub const FAN_ONLY_DEFAULT_PCT: u8 = 50;
pub const FAN_PREHEAT_DUTY_PCT: u8 = 50;
pub const FAN_ROAST_DEFAULT_PCT: u8 = 90;
pub const FAN_ROAST_MIN_DUTY_PCT: u8 = 30;
pub const FAN_COOLING_DUTY_PCT: u8 = 100;
pub const FAN_MANUAL_DEFAULT_PCT: u8 = 50;

// Thermocouple fault debounce.
pub const THERMOCOUPLE_FAULT_LATCH_COUNT: u8 = 10;
pub const THERMOCOUPLE_FAULT_CLEAR_COUNT: u8 = 3;

// Control loop timing.
pub const CONTROL_TICK_MS: u64 = 100; // 10Hz
pub const TEMPERATURE_READ_INTERVAL_MS: u64 = 160; // thermocouple conversion time + margin
pub const TELEMETRY_INTERVAL_MS: u64 = 1_000; // 1Hz roasterState cadence
pub const TRANSPORT_DISCONNECT_TIMEOUT_MS: u64 = 5_000;

// Chamber temperature low-pass filter.
pub const FILTER_ALPHA: f32 = 0.15;

// Rate-of-rise estimator window.
pub const ROR_WINDOW_MS: u64 = 30_000;

// Time-proportioning heater window.
pub const HEATER_WINDOW_MS: u64 = 2_000;

// PID gain schedule.
pub const PID_AGGRESSIVE_KP: f32 = 120.0;
pub const PID_AGGRESSIVE_KI: f32 = 30.0;
pub const PID_AGGRESSIVE_KD: f32 = 60.0;
pub const PID_CONSERVATIVE_KP: f32 = 70.0;
pub const PID_CONSERVATIVE_KI: f32 = 15.0;
pub const PID_CONSERVATIVE_KD: f32 = 10.0;
pub const PID_GAIN_SWITCH_THRESHOLD_C: f32 = 10.0;
pub const PID_OUTPUT_MIN: f32 = 0.0;
pub const PID_OUTPUT_MAX: f32 = 255.0;

// Transport framing.
pub const TRANSPORT_LINE_BUFFER_LEN: usize = 512;
pub const TRANSPORT_MAX_LINE_LEN: usize = 512;

pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");
