use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::bank::QuestionBank;
use crate::models::QuestionError;

pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";

/// Error type for question bank loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must contain at least one question", .path.display())]
    Empty { path: PathBuf },
    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
    #[error("question id {0} is used more than once")]
    DuplicateId(String),
}

/// Load and validate a question bank from a JSON file.
pub fn load_bank_from_json<P: AsRef<Path>>(path: P) -> Result<QuestionBank, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let bank = parse_bank(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if bank.question_count() == 0 {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    bank.validate()?;

    info!(
        path = %path.display(),
        subjects = bank.subjects.len(),
        questions = bank.question_count(),
        "loaded question bank"
    );
    Ok(bank)
}

fn parse_bank(json: &str) -> Result<QuestionBank, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuestionSource;
    use crate::models::Difficulty;

    const SAMPLE: &str = r#"{
        "subjects": [{
            "id": "geography",
            "name": "Geography",
            "grade": 12,
            "chapters": [{
                "id": "rivers",
                "name": "Rivers",
                "questions": [
                    {
                        "id": "r-1",
                        "question": "Which river flows through Cairo?",
                        "options": ["Nile", "Congo", "Niger"],
                        "correct": "Nile",
                        "explanation": "Cairo sits on the Nile.",
                        "difficulty": "easy"
                    },
                    {
                        "id": "r-2",
                        "question": "Where does the Blue Nile begin?",
                        "options": ["Lake Tana", "Lake Victoria"],
                        "correct": "Lake Tana",
                        "difficulty": "hard"
                    }
                ]
            }]
        }]
    }"#;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "quiz-trainer-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_bank_from_json() {
        let path = write_temp("valid", SAMPLE);
        let bank = load_bank_from_json(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(bank.question_count(), 2);
        assert_eq!(bank.subjects[0].grade, Some(12));
        let easy = bank.questions("geography", "rivers", Difficulty::Easy, 10);
        assert_eq!(easy.len(), 1);
        assert_eq!(easy[0].explanation.as_deref(), Some("Cairo sits on the Nile."));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_bank_from_json("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let path = write_temp("bad-json", "{ \"subjects\": [ ");
        let err = load_bank_from_json(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_load_rejects_empty_bank() {
        let path = write_temp("empty", r#"{ "subjects": [] }"#);
        let err = load_bank_from_json(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, LoadError::Empty { .. }));
    }

    #[test]
    fn test_load_rejects_invalid_question() {
        let broken = SAMPLE.replace("\"correct\": \"Nile\"", "\"correct\": \"Amazon\"");
        let path = write_temp("invalid", &broken);
        let err = load_bank_from_json(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(
            err,
            LoadError::InvalidQuestion(QuestionError::CorrectAnswerNotAnOption { .. })
        ));
    }
}
