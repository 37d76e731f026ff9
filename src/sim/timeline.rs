//! Sequenced timed actions
//!
//! A `Sequence` is a list of steps with a cursor. Advancing it by a time slice
//! walks the cursor forward and reports what happened as `Effect`s; it never
//! blocks. Dropping a sequence cancels it: future steps never run, effects
//! already reported stay applied.

use glam::Vec2;

/// One entry in a sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Step<C> {
    /// Translate by `delta`, spread linearly over `duration` (0 = instant)
    MoveBy { delta: Vec2, duration: f32 },
    /// Jump to an absolute offset from the parent, instantly
    Place(Vec2),
    /// Hold
    Wait(f32),
    /// Fire a cue instantly
    Emit(C),
    /// Detach the owner from the scene; ends the sequence
    Remove,
}

/// How many times the step list runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Times(u32),
    Forever,
}

/// Observable result of advancing a sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<C> {
    Translate(Vec2),
    Place(Vec2),
    Emit(C),
    Remove,
}

#[derive(Debug, Clone)]
pub struct Sequence<C> {
    steps: Vec<Step<C>>,
    repeat: Repeat,
    cursor: usize,
    /// Time spent in the current step
    step_elapsed: f32,
    /// Translation already reported for the current `MoveBy`
    step_moved: Vec2,
    cycles: u32,
    finished: bool,
}

impl<C: Clone> Sequence<C> {
    pub fn new(steps: Vec<Step<C>>, repeat: Repeat) -> Self {
        let finished = steps.is_empty() || repeat == Repeat::Times(0);
        Self {
            steps,
            repeat,
            cursor: 0,
            step_elapsed: 0.0,
            step_moved: Vec2::ZERO,
            cycles: 0,
            finished,
        }
    }

    pub fn once(steps: Vec<Step<C>>) -> Self {
        Self::new(steps, Repeat::Once)
    }

    pub fn forever(steps: Vec<Step<C>>) -> Self {
        Self::new(steps, Repeat::Forever)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Completed passes over the step list
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Duration of one pass over the step list
    pub fn cycle_duration(&self) -> f32 {
        self.steps
            .iter()
            .map(|step| match step {
                Step::MoveBy { duration, .. } => duration.max(0.0),
                Step::Wait(d) => d.max(0.0),
                Step::Place(_) | Step::Emit(_) | Step::Remove => 0.0,
            })
            .sum()
    }

    /// Advance by `dt`, appending effects in the order they happen
    pub fn advance(&mut self, dt: f32, out: &mut Vec<Effect<C>>) {
        let mut budget = dt.max(0.0);
        // A pass that consumes no time would spin forever
        let mut budget_at_wrap = f32::NAN;

        while !self.finished {
            let Some(step) = self.steps.get(self.cursor) else {
                break;
            };

            match step {
                Step::Emit(cue) => {
                    out.push(Effect::Emit(cue.clone()));
                }
                Step::Place(target) => {
                    out.push(Effect::Place(*target));
                }
                Step::Remove => {
                    out.push(Effect::Remove);
                    self.finished = true;
                    return;
                }
                Step::MoveBy { delta, duration } => {
                    let (delta, duration) = (*delta, *duration);
                    if duration > 0.0 && !consume(&mut self.step_elapsed, duration, &mut budget) {
                        let moved = delta * (self.step_elapsed / duration);
                        out.push(Effect::Translate(moved - self.step_moved));
                        self.step_moved = moved;
                        return;
                    }
                    // Settle on the exact total so cycles never drift
                    out.push(Effect::Translate(delta - self.step_moved));
                }
                Step::Wait(duration) => {
                    let duration = *duration;
                    if duration > 0.0 && !consume(&mut self.step_elapsed, duration, &mut budget) {
                        return;
                    }
                }
            }

            if self.next_step() {
                if budget_at_wrap == budget {
                    return;
                }
                budget_at_wrap = budget;
            }
        }
    }

    /// Move the cursor on; returns true when it wrapped to a new pass
    fn next_step(&mut self) -> bool {
        self.cursor += 1;
        self.step_elapsed = 0.0;
        self.step_moved = Vec2::ZERO;
        if self.cursor < self.steps.len() {
            return false;
        }

        self.cycles += 1;
        self.cursor = 0;
        self.finished = match self.repeat {
            Repeat::Once => true,
            Repeat::Times(n) => self.cycles >= n,
            Repeat::Forever => false,
        };
        !self.finished
    }
}

/// Spend budget on a timed step; true once the step is complete
fn consume(elapsed: &mut f32, duration: f32, budget: &mut f32) -> bool {
    let remaining = duration - *elapsed;
    if *budget >= remaining {
        *budget -= remaining;
        *elapsed = duration;
        true
    } else {
        *elapsed += *budget;
        *budget = 0.0;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitted(effects: &[Effect<u8>]) -> Vec<u8> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Emit(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    fn translated(effects: &[Effect<u8>]) -> Vec2 {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Translate(d) => Some(*d),
                _ => None,
            })
            .sum()
    }

    #[test]
    fn test_emit_then_wait_forever() {
        let mut seq = Sequence::forever(vec![Step::Emit(1u8), Step::Wait(2.0)]);
        let mut out = Vec::new();

        seq.advance(0.5, &mut out);
        assert_eq!(emitted(&out), vec![1]);

        out.clear();
        seq.advance(1.0, &mut out);
        assert!(out.is_empty());

        out.clear();
        seq.advance(0.5, &mut out);
        assert_eq!(emitted(&out), vec![1]);

        // A long slice covers several passes
        out.clear();
        seq.advance(4.0, &mut out);
        assert_eq!(emitted(&out), vec![1, 1]);
    }

    #[test]
    fn test_move_by_is_linear_and_exact() {
        let mut seq: Sequence<u8> = Sequence::once(vec![Step::MoveBy {
            delta: Vec2::new(-100.0, 0.0),
            duration: 4.0,
        }]);
        let mut out = Vec::new();

        seq.advance(1.0, &mut out);
        assert_eq!(translated(&out), Vec2::new(-25.0, 0.0));

        out.clear();
        seq.advance(10.0, &mut out);
        assert_eq!(translated(&out), Vec2::new(-75.0, 0.0));
        assert!(seq.is_finished());
    }

    #[test]
    fn test_move_then_reset_cycle_nets_zero() {
        let mut seq: Sequence<u8> = Sequence::forever(vec![
            Step::MoveBy {
                delta: Vec2::new(-10.0, 0.0),
                duration: 1.0,
            },
            Step::MoveBy {
                delta: Vec2::new(10.0, 0.0),
                duration: 0.0,
            },
        ]);
        let mut out = Vec::new();
        for _ in 0..8 {
            seq.advance(0.25, &mut out);
        }
        assert_eq!(translated(&out), Vec2::ZERO);
        assert_eq!(seq.cycles(), 2);
    }

    #[test]
    fn test_place_reports_absolute_offset() {
        let mut seq: Sequence<u8> = Sequence::forever(vec![
            Step::MoveBy {
                delta: Vec2::new(-3.0, 0.0),
                duration: 0.75,
            },
            Step::Place(Vec2::new(5.0, 1.0)),
        ]);
        let mut out = Vec::new();
        seq.advance(1.0, &mut out);
        assert_eq!(out[0], Effect::Translate(Vec2::new(-3.0, 0.0)));
        assert_eq!(out[1], Effect::Place(Vec2::new(5.0, 1.0)));
        assert_eq!(seq.cycles(), 1);
    }

    #[test]
    fn test_move_then_remove() {
        let mut seq: Sequence<u8> = Sequence::once(vec![
            Step::MoveBy {
                delta: Vec2::new(-8.0, 0.0),
                duration: 2.0,
            },
            Step::Remove,
        ]);
        let mut out = Vec::new();
        seq.advance(1.0, &mut out);
        assert!(!out.contains(&Effect::Remove));

        out.clear();
        seq.advance(1.0, &mut out);
        assert_eq!(out.last(), Some(&Effect::Remove));
        assert!(seq.is_finished());

        out.clear();
        seq.advance(1.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_repeat_times_stops() {
        let mut seq = Sequence::new(
            vec![Step::Emit(1u8), Step::Wait(0.25), Step::Emit(0u8), Step::Wait(0.25)],
            Repeat::Times(4),
        );
        assert_eq!(seq.cycle_duration(), 0.5);

        let mut out = Vec::new();
        seq.advance(10.0, &mut out);
        assert_eq!(emitted(&out), vec![1, 0, 1, 0, 1, 0, 1, 0]);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_zero_duration_forever_does_not_spin() {
        let mut seq = Sequence::forever(vec![Step::Emit(7u8)]);
        let mut out = Vec::new();
        seq.advance(1.0, &mut out);
        assert!(!out.is_empty());
        assert!(out.len() <= 2);
    }

    #[test]
    fn test_empty_sequence_is_finished() {
        let seq: Sequence<u8> = Sequence::forever(Vec::new());
        assert!(seq.is_finished());
    }
}
