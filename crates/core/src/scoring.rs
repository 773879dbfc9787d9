//! Scoring module - per-slot points and the time multiplier
//!
//! A check pass walks the slots in order: `+10` for a correct slot, `-5` for an
//! incorrect one, never dropping below zero at any step. The accumulated base
//! score is then scaled by a time multiplier that starts at 2.0x and loses 0.1x
//! every 5 seconds, bottoming out at 1.0x.
//!
//! The multiplier is kept in tenths so the final score is computed with integer
//! arithmetic (halves round up).

use serde::{Serialize, Serializer};

use crate::types::{
    CheckResult, CORRECT_POINTS, INCORRECT_PENALTY, MULTIPLIER_DECAY_SECS,
    MULTIPLIER_FLOOR_TENTHS, MULTIPLIER_MAX_TENTHS,
};

/// Time multiplier, stored in tenths (`20` = 2.0x)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const MAX: Multiplier = Multiplier(MULTIPLIER_MAX_TENTHS);
    pub const FLOOR: Multiplier = Multiplier(MULTIPLIER_FLOOR_TENTHS);

    /// `max(1.0, 2.0 - floor(elapsed / 5) * 0.1)`
    pub fn for_elapsed_secs(elapsed_secs: u64) -> Self {
        let decay = elapsed_secs / MULTIPLIER_DECAY_SECS;
        let tenths = (MULTIPLIER_MAX_TENTHS as u64)
            .saturating_sub(decay)
            .max(MULTIPLIER_FLOOR_TENTHS as u64);
        Multiplier(tenths as u32)
    }

    pub fn tenths(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10.0
    }

    /// `round(base * multiplier)`
    pub fn apply(&self, base_score: u32) -> u32 {
        let scaled = base_score as u64 * self.0 as u64;
        ((scaled + 5) / 10) as u32
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::MAX
    }
}

impl std::fmt::Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}x", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for Multiplier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Result of comparing a slot's episode against its position
pub fn judge_slot(air_order: u32, slot_index: usize) -> CheckResult {
    if air_order as usize == slot_index + 1 {
        CheckResult::Correct
    } else {
        CheckResult::Incorrect
    }
}

/// Apply one scored slot to the running base score (floored at 0)
pub fn apply_check_result(base_score: u32, result: CheckResult) -> u32 {
    match result {
        CheckResult::Correct => base_score.saturating_add(CORRECT_POINTS),
        CheckResult::Incorrect => base_score.saturating_sub(INCORRECT_PENALTY),
        CheckResult::Unset => base_score,
    }
}

/// Base score for a sequence of results, applying the floor after each step
pub fn base_score_for(results: &[CheckResult]) -> u32 {
    results
        .iter()
        .fold(0, |score, &result| apply_check_result(score, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_decays_every_five_seconds() {
        assert_eq!(Multiplier::for_elapsed_secs(0).as_f64(), 2.0);
        assert_eq!(Multiplier::for_elapsed_secs(4).as_f64(), 2.0);
        assert_eq!(Multiplier::for_elapsed_secs(5).as_f64(), 1.9);
        assert_eq!(Multiplier::for_elapsed_secs(25).as_f64(), 1.5);
        assert_eq!(Multiplier::for_elapsed_secs(49).as_f64(), 1.1);
        assert_eq!(Multiplier::for_elapsed_secs(55).as_f64(), 1.0);
        assert_eq!(Multiplier::for_elapsed_secs(200).as_f64(), 1.0);
        assert_eq!(Multiplier::for_elapsed_secs(u64::MAX), Multiplier::FLOOR);
    }

    #[test]
    fn multiplier_is_non_increasing() {
        let mut prev = Multiplier::MAX;
        for secs in 0..120 {
            let m = Multiplier::for_elapsed_secs(secs);
            assert!(m <= prev, "multiplier went up at {}s", secs);
            assert!(m >= Multiplier::FLOOR);
            prev = m;
        }
    }

    #[test]
    fn multiplier_apply_rounds_half_up() {
        assert_eq!(Multiplier::MAX.apply(50), 100);
        assert_eq!(Multiplier::for_elapsed_secs(25).apply(50), 75);
        // 5 * 1.7 = 8.5
        assert_eq!(Multiplier::for_elapsed_secs(15).apply(5), 9);
        // 15 * 1.1 = 16.5
        assert_eq!(Multiplier::for_elapsed_secs(45).apply(15), 17);
        assert_eq!(Multiplier::FLOOR.apply(0), 0);
    }

    #[test]
    fn multiplier_display_and_serialize() {
        assert_eq!(Multiplier::for_elapsed_secs(10).to_string(), "1.8x");
        assert_eq!(serde_json::to_string(&Multiplier::MAX).unwrap(), "2.0");
    }

    #[test]
    fn judge_slot_is_one_based() {
        assert_eq!(judge_slot(1, 0), CheckResult::Correct);
        assert_eq!(judge_slot(3, 2), CheckResult::Correct);
        assert_eq!(judge_slot(2, 0), CheckResult::Incorrect);
        assert_eq!(judge_slot(0, 0), CheckResult::Incorrect);
    }

    #[test]
    fn base_score_floors_at_zero_each_step() {
        use CheckResult::*;
        assert_eq!(base_score_for(&[Correct; 5]), 50);
        assert_eq!(base_score_for(&[Incorrect; 5]), 0);
        // 0 -> 0 -> 10 -> 20 -> 15
        assert_eq!(base_score_for(&[Incorrect, Correct, Correct, Incorrect]), 15);
        // 10 -> 5 -> 0 -> 0 -> 10 (no negative carry)
        assert_eq!(
            base_score_for(&[Correct, Incorrect, Incorrect, Incorrect, Correct]),
            10
        );
    }
}
