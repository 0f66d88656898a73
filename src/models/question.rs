use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty tier of a question. Ordered from easiest to hardest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single multiple-choice item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(alias = "question")]
    pub text: String,
    pub options: Vec<String>,
    #[serde(alias = "correct")]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topic: Option<String>,
}

/// A question that breaks the options/correct-answer contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question {id} has no options")]
    NoOptions { id: String },
    #[error("correct answer of question {id} is not one of its options")]
    CorrectAnswerNotAnOption { id: String },
}

impl Question {
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions {
                id: self.id.clone(),
            });
        }
        if !self.has_option(&self.correct_answer) {
            return Err(QuestionError::CorrectAnswerNotAnOption {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }

    /// Exact string comparison against the correct answer.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capital_question() -> Question {
        Question {
            id: "geo-1".to_string(),
            text: "What is the capital of Kenya?".to_string(),
            options: vec![
                "Nairobi".to_string(),
                "Mombasa".to_string(),
                "Kisumu".to_string(),
            ],
            correct_answer: "Nairobi".to_string(),
            explanation: None,
            difficulty: Difficulty::Easy,
            topic: Some("capitals".to_string()),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_question() {
        let question = capital_question();
        assert!(question.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_correct_answer() {
        let mut question = capital_question();
        question.correct_answer = "Addis Ababa".to_string();
        assert_eq!(
            question.validate(),
            Err(QuestionError::CorrectAnswerNotAnOption {
                id: "geo-1".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty_options() {
        let mut question = capital_question();
        question.options.clear();
        assert!(matches!(
            question.validate(),
            Err(QuestionError::NoOptions { .. })
        ));
    }

    #[test]
    fn test_is_correct_is_exact_match() {
        let question = capital_question();
        assert!(question.is_correct("Nairobi"));
        assert!(!question.is_correct("nairobi"));
        assert!(!question.is_correct("Nairobi "));
    }

    #[test]
    fn test_deserialize_accepts_short_field_names() {
        let json = r#"{
            "id": "h-1",
            "question": "Who led the Battle of Adwa?",
            "options": ["Menelik II", "Tewodros II"],
            "correct": "Menelik II",
            "difficulty": "medium"
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.text, "Who led the Battle of Adwa?");
        assert_eq!(question.correct_answer, "Menelik II");
        assert_eq!(question.difficulty, Difficulty::Medium);
        assert!(question.explanation.is_none());
    }
}
