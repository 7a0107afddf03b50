//! The single owned control core.
//!
//! One struct owns the sensors and actuators and exposes `tick`/command
//! entry points; there is exactly one owned core, not two parallel
//! abstractions over the same state.

use alloc::boxed::Box;

use crate::config::{FILTER_ALPHA, ROR_WINDOW_MS, TEMPERATURE_READ_INTERVAL_MS};
use crate::control::heater_window::HeaterWindow;
use crate::control::state::{active_setpoint, ControllerState, Event, RorSample, Snapshot};
use crate::control::{pid, safety, transition};
use crate::error::RoasterError;
use crate::hardware::traits::{Fan, Heater, Thermistor, Thermocouple};

pub struct Controller {
    state: ControllerState,
    heater_window: HeaterWindow,
    ror_history: heapless::Deque<RorSample, 8>,
    last_temp_read_ms: u64,

    fan: Box<dyn Fan>,
    heater: Box<dyn Heater>,
    thermocouple: Box<dyn Thermocouple>,
    thermistor: Box<dyn Thermistor>,
}

impl Controller {
    pub fn new(
        fan: Box<dyn Fan>,
        heater: Box<dyn Heater>,
        thermocouple: Box<dyn Thermocouple>,
        thermistor: Box<dyn Thermistor>,
    ) -> Self {
        Self {
            state: ControllerState::default(),
            heater_window: HeaterWindow::new(),
            ror_history: heapless::Deque::new(),
            last_temp_read_ms: 0,
            fan,
            heater,
            thermocouple,
            thermistor,
        }
    }

    pub fn handle_event(&mut self, event: Event, now_ms: u64) -> bool {
        let changed = transition::apply_event(&mut self.state, event, now_ms);
        self.consume_ror_reset();
        changed
    }

    fn consume_ror_reset(&mut self) {
        if self.state.ror_reset_pending {
            while self.ror_history.pop_front().is_some() {}
            self.state.ror_c_per_min = 0.0;
            self.state.ror_reset_pending = false;
        }
    }

    pub fn snapshot(&self, now_ms: u64) -> Snapshot {
        self.state.snapshot(now_ms)
    }

    /// One control-loop iteration: read sensors, run the safety monitor,
    /// update PID/heater-window outputs, and drive the actuators. Ordering
    /// is fixed: sensors before safety, safety before actuation.
    pub fn tick(&mut self, now_ms: u64) -> Result<(), RoasterError> {
        if now_ms.saturating_sub(self.last_temp_read_ms) >= TEMPERATURE_READ_INTERVAL_MS {
            self.last_temp_read_ms = now_ms;
            self.read_temperatures(now_ms);
        }

        if let Some(code) = safety::check_invariants(&self.state, now_ms) {
            safety::latch_fault(&mut self.state, code);
            transition::apply_event(&mut self.state, Event::Fault, now_ms);
            self.consume_ror_reset();
        }

        if self.state.fault_latched {
            let _ = self.heater.set_on(false);
            self.fan.disable();
            return Ok(());
        }

        if self.state.pid_enabled {
            let output = pid::compute(
                &mut self.state.pid,
                active_setpoint(&self.state),
                self.state.chamber_temp_filtered_c,
                now_ms,
            );
            let on = self.heater_window.should_be_on(output, now_ms);
            let _ = self.heater.set_on(self.state.heater_enabled && on);
        } else if self.state.heater_enabled {
            let level = self.state.heater_manual_pct as f32 / 100.0 * crate::config::PID_OUTPUT_MAX;
            let on = self.heater_window.should_be_on(level, now_ms);
            let _ = self.heater.set_on(on);
        } else {
            let _ = self.heater.set_on(false);
        }

        if self.state.fan_enabled {
            self.fan.enable();
            let _ = self.fan.set_speed_pct(self.state.fan_pct);
        } else {
            self.fan.disable();
        }

        Ok(())
    }

    fn read_temperatures(&mut self, now_ms: u64) {
        if let Ok(frame) = self.thermocouple.read_frame() {
            let reading = crate::hardware::thermocouple::decode_frame(frame);

            let heater_enabled = self.state.heater_enabled;
            if let Some(code) = safety::debounce_thermocouple(&mut self.state, reading.fault, heater_enabled) {
                safety::latch_fault(&mut self.state, code);
                transition::apply_event(&mut self.state, Event::Fault, now_ms);
                self.consume_ror_reset();
                return;
            }
            // A clean streak only makes CLEAR_FAULT meaningful again; the
            // latch itself still requires that explicit event while in
            // Error, even once the sensor reads clean (see control::safety).

            if !reading.fault.is_critical() {
                self.state.chamber_temp_raw_c = reading.temp_c;
                self.state.chamber_temp_filtered_c = match self.state.filter.value {
                    Some(prev) => FILTER_ALPHA * reading.temp_c + (1.0 - FILTER_ALPHA) * prev,
                    None => reading.temp_c,
                };
                self.state.filter.value = Some(self.state.chamber_temp_filtered_c);
                self.update_ror(now_ms);
            }
        }

        if let Ok(raw) = self.thermistor.read_raw() {
            self.state.heater_temp_c = crate::hardware::thermistor::raw_to_celsius(raw);
        }
    }

    fn update_ror(&mut self, now_ms: u64) {
        while let Some(front) = self.ror_history.front() {
            if now_ms.saturating_sub(front.at_ms) > ROR_WINDOW_MS {
                self.ror_history.pop_front();
            } else {
                break;
            }
        }

        if let Some(oldest) = self.ror_history.front() {
            let dt_min = (now_ms.saturating_sub(oldest.at_ms)) as f32 / 60_000.0;
            if dt_min > 0.0 {
                self.state.ror_c_per_min =
                    (self.state.chamber_temp_filtered_c - oldest.temp_c) / dt_min;
            }
        }

        if self.ror_history.is_full() {
            self.ror_history.pop_front();
        }
        let _ = self.ror_history.push_back(RorSample {
            at_ms: now_ms,
            temp_c: self.state.chamber_temp_filtered_c,
        });
    }
}
