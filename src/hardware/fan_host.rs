//! Host-side stand-in for [`crate::hardware::fan::FanController`], used by
//! integration tests and the `scenario_test` harness where no LEDC PWM
//! peripheral exists.

use crate::error::RoasterError;
use crate::hardware::traits::Fan;

pub struct HostFan {
    speed_pct: u8,
}

impl HostFan {
    pub fn new() -> Self {
        Self { speed_pct: 0 }
    }
}

impl Default for HostFan {
    fn default() -> Self {
        Self::new()
    }
}

impl Fan for HostFan {
    fn enable(&mut self) {
        self.speed_pct = 100;
    }

    fn disable(&mut self) {
        self.speed_pct = 0;
    }

    fn set_speed_pct(&mut self, pct: u8) -> Result<(), RoasterError> {
        self.speed_pct = pct.min(100);
        Ok(())
    }

    fn speed_pct(&self) -> u8 {
        self.speed_pct
    }

    fn is_enabled(&self) -> bool {
        self.speed_pct > 0
    }
}
