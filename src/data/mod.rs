mod bank;
mod loader;
mod source;

pub use bank::{Chapter, QuestionBank, Subject};
pub use loader::{DEFAULT_QUESTIONS_PATH, LoadError, load_bank_from_json};
pub use source::QuestionSource;
