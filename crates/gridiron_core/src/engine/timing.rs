//! Phase sequencing and timing
//!
//! Nine named phase durations per play, walked in fixed order. The walk is
//! a pure, stateless query over elapsed time, so a caller can seek, replay
//! or render frames at arbitrary timestamps without replaying history.

use serde::{Deserialize, Serialize};

use crate::models::outcome::PlayType;

/// Named stage of a play's choreography, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayPhase {
    Huddle,
    Break,
    Set,
    Motion,
    Snap,
    Development,
    Result,
    Whistle,
    Reset,
    /// No play active, or the previous play has fully wound down.
    Idle,
}

/// Per-play phase durations in milliseconds.
///
/// Zero-duration phases are skipped entirely by the walk and never
/// rendered. Kicking-game and ceremony plays omit huddle and motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimingTable {
    pub huddle_ms: u64,
    pub break_ms: u64,
    pub set_ms: u64,
    pub motion_ms: u64,
    pub snap_ms: u64,
    pub development_ms: u64,
    pub result_ms: u64,
    pub whistle_ms: u64,
    pub reset_ms: u64,
}

impl PhaseTimingTable {
    /// Build the table for a play type. `development_ms` comes from the
    /// selected template, which may stretch it per outcome.
    pub fn for_play(play_type: PlayType, development_ms: u64) -> Self {
        let mut table = Self {
            huddle_ms: 2500,
            break_ms: 1200,
            set_ms: 1500,
            motion_ms: 800,
            snap_ms: 400,
            development_ms,
            result_ms: 1800,
            whistle_ms: 1200,
            reset_ms: 2000,
        };

        if play_type.is_special() {
            table.huddle_ms = 0;
            table.motion_ms = 0;
        }

        // Clock plays have no drawn-out aftermath.
        if matches!(play_type, PlayType::Kneel | PlayType::Spike) {
            table.result_ms = 800;
            table.whistle_ms = 600;
        }

        table
    }

    /// Durations in walk order.
    pub fn entries(&self) -> [(PlayPhase, u64); 9] {
        [
            (PlayPhase::Huddle, self.huddle_ms),
            (PlayPhase::Break, self.break_ms),
            (PlayPhase::Set, self.set_ms),
            (PlayPhase::Motion, self.motion_ms),
            (PlayPhase::Snap, self.snap_ms),
            (PlayPhase::Development, self.development_ms),
            (PlayPhase::Result, self.result_ms),
            (PlayPhase::Whistle, self.whistle_ms),
            (PlayPhase::Reset, self.reset_ms),
        ]
    }

    /// Sum of all included phase durations.
    pub fn total_ms(&self) -> u64 {
        self.entries().iter().map(|(_, d)| d).sum()
    }

    /// Phase and normalized progress at `elapsed_ms` since play start.
    ///
    /// Walks phases in order, subtracting durations until the remainder
    /// falls inside one; zero-duration phases are skipped. Elapsed at or
    /// beyond the total reports `(Idle, 1.0)`.
    pub fn phase_at(&self, elapsed_ms: u64) -> (PlayPhase, f32) {
        let mut remaining = elapsed_ms;
        for (phase, duration) in self.entries() {
            if duration == 0 {
                continue;
            }
            if remaining < duration {
                return (phase, remaining as f32 / duration as f32);
            }
            remaining -= duration;
        }
        (PlayPhase::Idle, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_equals_sum_for_all_play_types() {
        for play_type in PlayType::ALL {
            let table = PhaseTimingTable::for_play(play_type, 3000);
            let sum: u64 = table.entries().iter().map(|(_, d)| d).sum();
            assert_eq!(table.total_ms(), sum, "{play_type:?}");
        }
    }

    #[test]
    fn test_specials_omit_huddle_and_motion() {
        for play_type in [PlayType::Kickoff, PlayType::Punt, PlayType::FieldGoal] {
            let table = PhaseTimingTable::for_play(play_type, 3000);
            assert_eq!(table.huddle_ms, 0, "{play_type:?}");
            assert_eq!(table.motion_ms, 0, "{play_type:?}");
        }
        let table = PhaseTimingTable::for_play(PlayType::Run, 3000);
        assert!(table.huddle_ms > 0);
    }

    #[test]
    fn test_elapsed_zero_is_first_nonzero_phase() {
        let table = PhaseTimingTable::for_play(PlayType::Run, 3000);
        assert_eq!(table.phase_at(0), (PlayPhase::Huddle, 0.0));

        // Specials start straight in at break.
        let table = PhaseTimingTable::for_play(PlayType::Kickoff, 3000);
        assert_eq!(table.phase_at(0), (PlayPhase::Break, 0.0));
    }

    #[test]
    fn test_zero_duration_phases_never_reported() {
        let table = PhaseTimingTable::for_play(PlayType::Kickoff, 3000);
        let mut elapsed = 0;
        while elapsed < table.total_ms() {
            let (phase, _) = table.phase_at(elapsed);
            assert_ne!(phase, PlayPhase::Huddle);
            assert_ne!(phase, PlayPhase::Motion);
            elapsed += 50;
        }
    }

    #[test]
    fn test_walk_lands_in_development() {
        let table = PhaseTimingTable::for_play(PlayType::Run, 3000);
        let before_dev =
            table.huddle_ms + table.break_ms + table.set_ms + table.motion_ms + table.snap_ms;

        let (phase, progress) = table.phase_at(before_dev);
        assert_eq!(phase, PlayPhase::Development);
        assert_eq!(progress, 0.0);

        let (phase, progress) = table.phase_at(before_dev + 1500);
        assert_eq!(phase, PlayPhase::Development);
        assert!((progress - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_beyond_total_is_idle_at_one() {
        let table = PhaseTimingTable::for_play(PlayType::Run, 3000);
        assert_eq!(table.phase_at(table.total_ms()), (PlayPhase::Idle, 1.0));
        assert_eq!(table.phase_at(u64::MAX), (PlayPhase::Idle, 1.0));
    }

    #[test]
    fn test_progress_always_normalized() {
        let table = PhaseTimingTable::for_play(PlayType::Punt, 4200);
        let mut elapsed = 0;
        while elapsed <= table.total_ms() + 500 {
            let (_, progress) = table.phase_at(elapsed);
            assert!((0.0..=1.0).contains(&progress), "elapsed {elapsed}");
            elapsed += 97;
        }
    }

    #[test]
    fn test_phase_monotonic_in_elapsed() {
        let table = PhaseTimingTable::for_play(PlayType::PassComplete, 2800);
        let order = |p: PlayPhase| table.entries().iter().position(|(q, _)| *q == p).unwrap_or(9);

        let mut prev = 0;
        let mut elapsed = 0;
        while elapsed <= table.total_ms() {
            let (phase, _) = table.phase_at(elapsed);
            let idx = order(phase);
            assert!(idx >= prev, "phase order regressed at {elapsed}");
            prev = idx;
            elapsed += 33;
        }
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// phase_at is total over arbitrary elapsed times.
            #[test]
            fn prop_phase_at_total(elapsed in 0u64..10_000_000, dev in 0u64..60_000) {
                let table = PhaseTimingTable::for_play(PlayType::Run, dev);
                let (_, progress) = table.phase_at(elapsed);
                prop_assert!((0.0..=1.0).contains(&progress));
            }
        }
    }
}
