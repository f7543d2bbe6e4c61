//! Simulated attitude sensor.
//!
//! Roll and pitch follow slow sine sweeps at different frequencies so every
//! alert state shows up within a minute. Roll sweeps past the critical
//! threshold, pitch only into the warning band. Every
//! [`FAULT_EVERY_N_READS`](crate::config::FAULT_EVERY_N_READS)th read fails
//! with a bus fault to exercise the skip path.

use inclinometer_common::{Attitude, AttitudeSensor, SensorFault};

/// Sweep parameter advance per read.
const SWEEP_STEP: f32 = 0.05;

const ROLL_RANGE: (f32, f32) = (-50.0, 50.0);
const ROLL_FREQ: f32 = 0.05;
const PITCH_RANGE: (f32, f32) = (-38.0, 38.0);
const PITCH_FREQ: f32 = 0.08;

pub struct SweepSensor {
    t: f32,
    paused: bool,
    nudge: Attitude,
    reads: u32,
    fault_every: u32,
}

impl SweepSensor {
    /// `fault_every == 0` disables injected faults.
    pub const fn new(fault_every: u32) -> Self {
        Self {
            t: 0.0,
            paused: false,
            nudge: Attitude::ZERO,
            reads: 0,
            fault_every,
        }
    }

    /// Freeze or resume the sweep. Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Shift the simulated tilt on top of the sweep.
    pub fn nudge(
        &mut self,
        roll: f32,
        pitch: f32,
    ) {
        self.nudge.roll += roll;
        self.nudge.pitch += pitch;
    }

    fn current(&self) -> Attitude {
        Attitude::new(
            sweep(self.t, ROLL_RANGE, ROLL_FREQ) + self.nudge.roll,
            sweep(self.t, PITCH_RANGE, PITCH_FREQ) + self.nudge.pitch,
        )
    }
}

impl AttitudeSensor for SweepSensor {
    fn read(&mut self) -> Result<Attitude, SensorFault> {
        self.reads = self.reads.wrapping_add(1);
        if !self.paused {
            self.t += SWEEP_STEP;
        }
        if self.fault_every != 0 && self.reads.is_multiple_of(self.fault_every) {
            return Err(SensorFault::Bus);
        }
        Ok(self.current())
    }
}

/// Sinusoid oscillating between `range.0` and `range.1`, starting at the midpoint.
fn sweep(
    t: f32,
    (min, max): (f32, f32),
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}
