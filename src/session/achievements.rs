//! Milestones unlocked during a session.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    TripleStreak,
    AmazingStreak,
    CenturyScorer,
    QuizMaster,
}

#[derive(Debug, Clone, Copy)]
enum Threshold {
    Streak(u32),
    Points(u32),
}

/// Evaluated in this order; the first hit of a commit is the one shown.
const RULES: [(Achievement, Threshold); 4] = [
    (Achievement::TripleStreak, Threshold::Streak(3)),
    (Achievement::AmazingStreak, Threshold::Streak(5)),
    (Achievement::CenturyScorer, Threshold::Points(100)),
    (Achievement::QuizMaster, Threshold::Points(200)),
];

impl Achievement {
    pub fn id(self) -> &'static str {
        match self {
            Achievement::TripleStreak => "streak_3",
            Achievement::AmazingStreak => "streak_5",
            Achievement::CenturyScorer => "points_100",
            Achievement::QuizMaster => "points_200",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Achievement::TripleStreak => "Triple Streak!",
            Achievement::AmazingStreak => "Amazing Streak!",
            Achievement::CenturyScorer => "Century Scorer!",
            Achievement::QuizMaster => "Quiz Master!",
        }
    }
}

impl Threshold {
    fn reached(self, streak: u32, points: u32) -> bool {
        match self {
            Threshold::Streak(min) => streak >= min,
            Threshold::Points(min) => points >= min,
        }
    }
}

/// Append-only record of what a session has unlocked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementSet {
    unlocked: Vec<Achievement>,
}

impl AchievementSet {
    /// Unlocks every rule newly satisfied by `streak`/`points` and returns
    /// them in rule order. Already-unlocked rules never fire again.
    pub fn evaluate(&mut self, streak: u32, points: u32) -> Vec<Achievement> {
        let fired: Vec<Achievement> = RULES
            .iter()
            .filter(|(achievement, threshold)| {
                !self.unlocked.contains(achievement) && threshold.reached(streak, points)
            })
            .map(|(achievement, _)| *achievement)
            .collect();

        self.unlocked.extend_from_slice(&fired);
        fired
    }

    pub fn as_slice(&self) -> &[Achievement] {
        &self.unlocked
    }
}
