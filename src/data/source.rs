use rand::RngCore;

use crate::models::{Difficulty, Question};

/// Where a quiz attempt gets its questions from.
///
/// Implementations are read-only: a source never changes between calls, and
/// the returned questions are owned copies the session can keep.
pub trait QuestionSource {
    /// Questions of one chapter at one difficulty, at most `count` of them.
    fn questions(
        &self,
        subject: &str,
        chapter: &str,
        difficulty: Difficulty,
        count: usize,
    ) -> Vec<Question>;

    /// A uniformly shuffled mix drawn from the given subject pools (all
    /// subjects when `subjects` is empty), without replacement.
    fn mixed_questions(
        &self,
        subjects: &[String],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Question>;

    /// Display name of a chapter, if the source knows it.
    fn chapter_label(&self, subject: &str, chapter: &str) -> Option<String>;
}
