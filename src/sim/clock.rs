//! Frame clock
//!
//! Called once per rendered frame with a wall-clock timestamp. The elapsed
//! time is clamped and chopped into fixed `SIM_DT` steps so the simulation
//! runs at the same rate regardless of display refresh.

use super::scene::{FrameInput, GameScene};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Default)]
pub struct LoopDriver {
    last_timestamp: Option<f64>,
    accumulator: f32,
    /// One-shot input waiting for the next step
    pending: FrameInput,
    steps: u64,
}

impl LoopDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an activate for the next simulation step
    pub fn activate(&mut self) {
        self.pending.activate = true;
    }

    /// Total simulation steps run
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run the simulation up to `timestamp` (seconds). Returns the number of
    /// steps taken.
    pub fn frame(&mut self, timestamp: f64, scene: &mut GameScene) -> u32 {
        let dt = match self.last_timestamp {
            Some(last) => ((timestamp - last).max(0.0) as f32).min(MAX_FRAME_DT),
            None => 0.0,
        };
        // Never let a clock going backwards rewind us
        self.last_timestamp = Some(self.last_timestamp.map_or(timestamp, |last| last.max(timestamp)));
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut self.pending);
            scene.step(&input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::trace!("dropping {:.4}s of backlog", self.accumulator - SIM_DT);
            self.accumulator = SIM_DT.min(self.accumulator);
        }

        self.steps += substeps as u64;
        substeps
    }
}
