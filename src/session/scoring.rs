//! Point awards for correct answers.

use serde::{Deserialize, Serialize};

use crate::models::Difficulty;

/// Constants for the difficulty tier, streak bonus and speed bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
    /// Bonus per consecutive correct answer before this one.
    pub streak_step: u32,
    /// Ceiling on the streak bonus.
    pub streak_cap: u32,
    /// Percentage of unused per-question seconds paid out as points.
    pub speed_bonus_percent: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            easy: 10,
            medium: 20,
            hard: 30,
            streak_step: 2,
            streak_cap: 20,
            speed_bonus_percent: 10,
        }
    }
}

/// Breakdown of the points earned by one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Award {
    pub base: u32,
    pub streak_bonus: u32,
    pub speed_bonus: u32,
}

impl Award {
    pub fn total(&self) -> u32 {
        self.base
            .saturating_add(self.streak_bonus)
            .saturating_add(self.speed_bonus)
    }
}

impl ScoringPolicy {
    pub fn base_for(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn streak_bonus(&self, prior_streak: u32) -> u32 {
        prior_streak
            .saturating_mul(self.streak_step)
            .min(self.streak_cap)
    }

    /// Truncating integer share of the unused seconds.
    pub fn speed_bonus(&self, unused_seconds: u32) -> u32 {
        let bonus = u64::from(unused_seconds) * u64::from(self.speed_bonus_percent) / 100;
        u32::try_from(bonus).unwrap_or(u32::MAX)
    }

    /// Upper bound on the points a single correct answer can earn.
    pub fn max_award(&self, difficulty: Difficulty, question_allowance: u32) -> u32 {
        self.base_for(difficulty)
            .saturating_add(self.streak_cap)
            .saturating_add(self.speed_bonus(question_allowance))
    }

    pub fn award(
        &self,
        correct: bool,
        difficulty: Difficulty,
        prior_streak: u32,
        unused_seconds: u32,
    ) -> Award {
        if !correct {
            return Award::default();
        }
        Award {
            base: self.base_for(difficulty),
            streak_bonus: self.streak_bonus(prior_streak),
            speed_bonus: self.speed_bonus(unused_seconds),
        }
    }
}
