extern crate std;
extern crate alloc;

use alloc::boxed::Box;

use libreroaster::control::state::{Event, Phase};
use libreroaster::control::Controller;
use libreroaster::error::RoasterError;
use libreroaster::hardware::traits::{Fan, Heater, Thermistor, Thermocouple};

struct TestFan {
    enabled: bool,
    pct: u8,
}
impl Fan for TestFan {
    fn enable(&mut self) {
        self.enabled = true;
    }
    fn disable(&mut self) {
        self.enabled = false;
        self.pct = 0;
    }
    fn set_speed_pct(&mut self, pct: u8) -> Result<(), RoasterError> {
        self.pct = pct;
        Ok(())
    }
    fn speed_pct(&self) -> u8 {
        self.pct
    }
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

struct TestHeater {
    on: bool,
}
impl Heater for TestHeater {
    fn set_on(&mut self, on: bool) -> Result<(), RoasterError> {
        self.on = on;
        Ok(())
    }
}

struct RampingThermocouple {
    temp: std::rc::Rc<std::cell::Cell<f32>>,
    fault: std::rc::Rc<std::cell::Cell<bool>>,
}
impl Thermocouple for RampingThermocouple {
    fn read_frame(&mut self) -> Result<u32, RoasterError> {
        if self.fault.get() {
            return Ok(0x1_0001); // fault + open circuit
        }
        let raw14 = ((self.temp.get() / 0.25) as i32) as u32 & 0x3FFF;
        Ok(raw14 << 18)
    }
}

struct TestThermistor;
impl Thermistor for TestThermistor {
    fn read_raw(&mut self) -> Result<u16, RoasterError> {
        Ok(512)
    }
}

fn make(temp_c: f32) -> (Controller, std::rc::Rc<std::cell::Cell<f32>>) {
    let temp_cell = std::rc::Rc::new(std::cell::Cell::new(temp_c));
    let fault_cell = std::rc::Rc::new(std::cell::Cell::new(false));
    let tc = RampingThermocouple {
        temp: temp_cell.clone(),
        fault: fault_cell,
    };
    let controller = Controller::new(
        Box::new(TestFan {
            enabled: false,
            pct: 0,
        }),
        Box::new(TestHeater { on: false }),
        Box::new(tc),
        Box::new(TestThermistor),
    );
    (controller, temp_cell)
}

const READ_INTERVAL: u64 = 200;

#[test]
fn scenario_cold_start_stays_off_until_commanded() {
    let (mut c, _) = make(20.0);
    c.tick(0).unwrap();
    assert_eq!(c.snapshot(0).phase, Phase::Off);
}

/// Scenario 1: happy-path roast, preheat and roast targets are independent.
#[test]
fn scenario_happy_path_roast_preheat_then_roasting_then_cooling() {
    let (mut c, temp) = make(25.0);

    c.handle_event(Event::StartPreheat(180.0), 0);
    assert_eq!(c.snapshot(0).phase, Phase::Preheat);
    assert_eq!(c.snapshot(0).setpoint_c, 180.0);
    assert_eq!(c.snapshot(0).fan_pct, 50);
    assert!(c.snapshot(0).heater_enabled);

    let mut now = 0u64;
    while now < 60_000 {
        now += READ_INTERVAL;
        let frac = (now as f32 / 60_000.0).min(1.0);
        temp.set(25.0 + frac * (180.0 - 25.0));
        c.tick(now).unwrap();
    }

    c.handle_event(Event::LoadBeans(200.0), 60_000);
    assert_eq!(c.snapshot(60_000).phase, Phase::Roasting);
    assert_eq!(c.snapshot(60_000).setpoint_c, 200.0);
    assert_eq!(c.snapshot(60_000).fan_pct, 90);

    c.handle_event(Event::FirstCrack, 180_000);
    assert!(c.snapshot(180_000).first_crack_marked);

    c.handle_event(Event::EndRoast, 360_000);
    assert_eq!(c.snapshot(360_000).phase, Phase::Cooling);
    assert!(!c.snapshot(360_000).heater_enabled);
    assert_eq!(c.snapshot(360_000).fan_pct, 100);

    let mut now = 360_000u64;
    temp.set(49.0);
    for _ in 0..3 {
        now += READ_INTERVAL;
        c.tick(now).unwrap();
    }
    c.handle_event(Event::CoolComplete, now);
    assert_eq!(c.snapshot(now).phase, Phase::Off);
}

/// Scenario 2: over-temperature latches a fault and forces actuators off.
#[test]
fn scenario_over_temperature_latches_fault_and_forces_actuators_off() {
    let (mut c, _) = make(270.0);
    c.handle_event(Event::StartPreheat(180.0), 0);

    let mut now = 0;
    for _ in 0..5 {
        now += READ_INTERVAL;
        c.tick(now).unwrap();
    }

    let snap = c.snapshot(now);
    assert_eq!(snap.phase, Phase::Error);
    assert!(snap.fault_latched);
    assert_eq!(snap.fault_code, Some("OVER_TEMP_CHAMBER"));
    assert_eq!(snap.heater_pct, 0);
    assert_eq!(snap.fan_pct, 0);
}

/// Scenario 3: fan interlock fires even in MANUAL.
#[test]
fn scenario_manual_mode_fan_interlock_still_fires() {
    let (mut c, _) = make(20.0);
    c.handle_event(Event::EnterManual, 0);
    c.handle_event(Event::SetHeaterPower(60), 0);
    c.handle_event(Event::SetFanSpeed(20), 0);
    c.tick(100).unwrap();

    let snap = c.snapshot(100);
    assert_eq!(snap.phase, Phase::Error);
    assert_eq!(snap.fault_code, Some("FAN_INTERLOCK"));
}

/// Scenario 4: thermocouple debounce latches after N faults and requires
/// an explicit clearFault even once readings are clean again.
#[test]
fn scenario_thermocouple_fault_latches_after_debounce_and_requires_clear() {
    let temp_cell = std::rc::Rc::new(std::cell::Cell::new(150.0));
    let fault_cell = std::rc::Rc::new(std::cell::Cell::new(true));

    let mut c = Controller::new(
        Box::new(TestFan {
            enabled: false,
            pct: 0,
        }),
        Box::new(TestHeater { on: false }),
        Box::new(RampingThermocouple {
            temp: temp_cell.clone(),
            fault: fault_cell.clone(),
        }),
        Box::new(TestThermistor),
    );

    c.handle_event(Event::StartPreheat(180.0), 0);

    let mut now = 0u64;
    for _ in 0..15 {
        now += READ_INTERVAL;
        c.tick(now).unwrap();
    }
    assert_eq!(c.snapshot(now).phase, Phase::Error);
    assert_eq!(c.snapshot(now).fault_code, Some("THERMOCOUPLE_FAULT"));

    fault_cell.set(false);
    for _ in 0..5 {
        now += READ_INTERVAL;
        c.tick(now).unwrap();
    }

    assert_eq!(c.snapshot(now).phase, Phase::Error);
    c.handle_event(Event::ClearFault, now);
    assert_eq!(c.snapshot(now).phase, Phase::Off);
}

/// Scenario 5: preheat timeout latches after the configured deadline.
#[test]
fn scenario_preheat_timeout_latches_fault() {
    let (mut c, _) = make(40.0);
    c.handle_event(Event::StartPreheat(180.0), 0);

    let mut now = 0u64;
    while now < libreroaster::config::PREHEAT_TIMEOUT_MS + READ_INTERVAL {
        now += READ_INTERVAL;
        c.tick(now).unwrap();
    }

    let snap = c.snapshot(now);
    assert_eq!(snap.phase, Phase::Error);
    assert_eq!(snap.fault_code, Some("PREHEAT_TIMEOUT"));
}

/// Scenario 6: host disconnect mid-roast promotes to COOLING.
#[test]
fn scenario_host_disconnect_mid_roast_promotes_to_cooling() {
    let (mut c, _) = make(150.0);
    c.handle_event(Event::StartPreheat(180.0), 0);
    c.handle_event(Event::LoadBeans(200.0), 0);
    assert_eq!(c.snapshot(0).phase, Phase::Roasting);

    c.handle_event(Event::Disconnected, 5_000);
    let snap = c.snapshot(5_000);
    assert_eq!(snap.phase, Phase::Cooling);
    assert!(!snap.heater_enabled);
}

/// P4: stop is idempotent from any non-OFF/ERROR phase.
#[test]
fn property_stop_is_idempotent() {
    for start in [
        Event::StartFanOnly(None),
        Event::StartPreheat(180.0),
        Event::EnterManual,
    ] {
        let (mut c, _) = make(20.0);
        c.handle_event(start, 0);
        assert!(c.handle_event(Event::Stop, 1));
        assert_eq!(c.snapshot(1).phase, Phase::Off);
        assert!(!c.handle_event(Event::Stop, 2));
        assert_eq!(c.snapshot(2).phase, Phase::Off);
    }
}

/// P5: only the first markFirstCrack in a roasting session is honored.
#[test]
fn property_mark_first_crack_is_idempotent_within_a_session() {
    let (mut c, _) = make(150.0);
    c.handle_event(Event::StartPreheat(180.0), 0);
    c.handle_event(Event::LoadBeans(200.0), 0);

    assert!(c.handle_event(Event::FirstCrack, 100));
    assert_eq!(c.snapshot(100).first_crack_offset_ms, Some(100));

    assert!(!c.handle_event(Event::FirstCrack, 500));
    assert_eq!(c.snapshot(500).first_crack_offset_ms, Some(100));
}

/// P1: in ERROR, heater and fan output are both zero regardless of what
/// was latched beforehand.
#[test]
fn property_error_phase_forces_zero_actuator_output() {
    let (mut c, _) = make(270.0);
    c.handle_event(Event::StartPreheat(180.0), 0);
    let mut now = 0;
    for _ in 0..5 {
        now += READ_INTERVAL;
        c.tick(now).unwrap();
    }
    let snap = c.snapshot(now);
    assert_eq!(snap.phase, Phase::Error);
    assert_eq!(snap.heater_pct, 0);
    assert_eq!(snap.fan_pct, 0);
}
