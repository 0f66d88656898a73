//! Tunables for quiz length, timing, scoring and notifications.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::ScoringPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Questions drawn for a chapter quiz.
    pub questions_per_quiz: usize,
    /// Chapter quizzes get this many seconds per question.
    pub seconds_per_question: u32,
    pub mixed: MixedConfig,
    pub scoring: ScoringPolicy,
    pub toasts: ToastConfig,
}

/// The cross-subject challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedConfig {
    pub count: usize,
    pub time_limit_seconds: u32,
    /// Subject ids to draw from; empty means every subject.
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub achievement_ms: u64,
    pub points_ms: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_per_quiz: 10,
            seconds_per_question: 90,
            mixed: MixedConfig::default(),
            scoring: ScoringPolicy::default(),
            toasts: ToastConfig::default(),
        }
    }
}

impl Default for MixedConfig {
    fn default() -> Self {
        Self {
            count: 20,
            time_limit_seconds: 30 * 60,
            subjects: Vec::new(),
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            achievement_ms: 3000,
            points_ms: 2000,
        }
    }
}

impl ToastConfig {
    pub fn achievement(&self) -> Duration {
        Duration::from_millis(self.achievement_ms)
    }

    pub fn points(&self) -> Duration {
        Duration::from_millis(self.points_ms)
    }
}

impl QuizConfig {
    /// Read a JSON config file; absent fields keep their defaults.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: QuizConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions_per_quiz == 0 {
            return Err(invalid("questions_per_quiz", "must be at least 1"));
        }
        if self.seconds_per_question == 0 {
            return Err(invalid("seconds_per_question", "must be at least 1"));
        }
        if self.mixed.count == 0 {
            return Err(invalid("mixed.count", "must be at least 1"));
        }
        if self.mixed.time_limit_seconds == 0 {
            return Err(invalid("mixed.time_limit_seconds", "must be at least 1"));
        }

        let scoring = &self.scoring;
        if scoring.easy == 0 {
            return Err(invalid("scoring.easy", "must be positive"));
        }
        if !(scoring.easy < scoring.medium && scoring.medium < scoring.hard) {
            return Err(invalid(
                "scoring",
                "tier bases must increase from easy to hard",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = QuizConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mixed.time_limit_seconds, 1800);
        assert_eq!(config.toasts.achievement(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: QuizConfig = serde_json::from_str(
            r#"{ "questions_per_quiz": 5, "scoring": { "hard": 50 }, "mixed": { "subjects": ["history"] } }"#,
        )
        .unwrap();
        assert_eq!(config.questions_per_quiz, 5);
        assert_eq!(config.seconds_per_question, 90);
        assert_eq!(config.scoring.hard, 50);
        assert_eq!(config.scoring.easy, 10);
        assert_eq!(config.mixed.count, 20);
        assert_eq!(config.mixed.subjects, vec!["history".to_string()]);
    }

    #[test]
    fn test_rejects_non_increasing_tiers() {
        let mut config = QuizConfig::default();
        config.scoring.medium = config.scoring.hard;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "scoring", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_durations() {
        let mut config = QuizConfig::default();
        config.mixed.time_limit_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = QuizConfig::default();
        config.seconds_per_question = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_counts() {
        let mut config = QuizConfig::default();
        config.questions_per_quiz = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "questions_per_quiz",
                ..
            })
        ));

        let mut config = QuizConfig::default();
        config.mixed.count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "mixed.count",
                ..
            })
        ));
    }

    #[test]
    fn test_from_json_validates_values() {
        let path = std::env::temp_dir().join(format!(
            "quiz-trainer-config-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "mixed": { "count": 0 } }"#).unwrap();
        let result = QuizConfig::from_json(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "mixed.count",
                ..
            })
        ));
    }

    #[test]
    fn test_from_json_missing_file() {
        assert!(matches!(
            QuizConfig::from_json("/no/such/config.json"),
            Err(ConfigError::Read { .. })
        ));
    }
}
