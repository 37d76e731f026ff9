//! Active/Frozen game state
//!
//! The first contact while the world is running freezes it for the rest of
//! the session and flashes the background. This is the only writer of
//! `WorldState::speed`.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionListener, ContactEvent};
use super::graph::{Cue, SceneGraph};
use super::timeline::{Repeat, Sequence, Step};
use super::world::{Frame, Updatable, WorldState};
use crate::Color;
use crate::config::SceneConfig;

/// Key of the flash feedback on the root timeline
pub const FLASH_ACTION: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World scrolling, flyer responding
    Active,
    /// Hit something; terminal for this session
    Frozen,
}

#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
    background: Color,
    sky: Color,
    alert: Color,
    flash_repeats: u32,
    flash_hold: f32,
    /// Contact that caused the freeze
    cause: Option<ContactEvent>,
}

impl GameStateMachine {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            phase: GamePhase::Active,
            background: config.sky_color,
            sky: config.sky_color,
            alert: config.alert_color,
            flash_repeats: config.flash_repeats,
            flash_hold: config.flash_hold,
            cause: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn cause(&self) -> Option<ContactEvent> {
        self.cause
    }

    /// Alternate alert and sky, holding each for `flash_hold`
    pub fn flash_sequence(&self) -> Sequence<Cue> {
        Sequence::new(
            vec![
                Step::Emit(Cue::Background(self.alert)),
                Step::Wait(self.flash_hold),
                Step::Emit(Cue::Background(self.sky)),
                Step::Wait(self.flash_hold),
            ],
            Repeat::Times(self.flash_repeats),
        )
    }
}

impl CollisionListener for GameStateMachine {
    fn on_contact(&mut self, event: &ContactEvent, world: &mut WorldState, graph: &mut SceneGraph) {
        // Checked against the world, not our own phase, so a stale phase
        // can never freeze twice
        if !world.is_active() {
            return;
        }

        world.freeze();
        self.phase = GamePhase::Frozen;
        self.cause = Some(*event);

        // Runs on the root timeline so it keeps going while frozen
        let root = graph.root();
        graph.remove_action(root, FLASH_ACTION);
        graph.run_action(root, Some(FLASH_ACTION), self.flash_sequence());

        log::info!(
            "contact {:?} <-> {:?} at t={:.2}s, world frozen",
            event.a,
            event.b,
            world.elapsed()
        );
    }
}

impl Updatable for GameStateMachine {
    fn update(&mut self, frame: &mut Frame<'_>) {
        for fired in frame.cues {
            if let Cue::Background(color) = fired.cue {
                self.background = color;
            }
        }
    }
}
