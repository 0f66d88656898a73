use std::collections::{BTreeMap, HashSet};

use rand::RngCore;
use rand::seq::SliceRandom;
use serde::Deserialize;

use super::loader::LoadError;
use super::source::QuestionSource;
use crate::models::{Difficulty, Question};

/// Static catalogue of subjects, chapters and their questions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionBank {
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// School grade the subject belongs to; ungraded subjects have none.
    #[serde(default)]
    pub grade: Option<u8>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    /// Checks every question and that ids are unique across the whole bank.
    pub fn validate(&self) -> Result<(), LoadError> {
        let mut seen = HashSet::new();
        for question in self.all_questions() {
            question.validate()?;
            if !seen.insert(question.id.as_str()) {
                return Err(LoadError::DuplicateId(question.id.clone()));
            }
        }
        Ok(())
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id == id)
    }

    pub fn chapter(&self, subject: &str, chapter: &str) -> Option<&Chapter> {
        self.subject(subject)?
            .chapters
            .iter()
            .find(|candidate| candidate.id == chapter)
    }

    /// Subjects grouped by grade in ascending order, ungraded ones first.
    pub fn by_grade(&self) -> BTreeMap<Option<u8>, Vec<&Subject>> {
        let mut grades: BTreeMap<Option<u8>, Vec<&Subject>> = BTreeMap::new();
        for subject in &self.subjects {
            grades.entry(subject.grade).or_default().push(subject);
        }
        grades
    }

    pub fn question_count(&self) -> usize {
        self.all_questions().count()
    }

    fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.subjects
            .iter()
            .flat_map(|subject| subject.chapters.iter())
            .flat_map(|chapter| chapter.questions.iter())
    }
}

impl QuestionSource for QuestionBank {
    fn questions(
        &self,
        subject: &str,
        chapter: &str,
        difficulty: Difficulty,
        count: usize,
    ) -> Vec<Question> {
        let Some(chapter) = self.chapter(subject, chapter) else {
            return Vec::new();
        };

        chapter
            .questions
            .iter()
            .filter(|question| question.difficulty == difficulty)
            .take(count)
            .cloned()
            .collect()
    }

    fn mixed_questions(
        &self,
        subjects: &[String],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Question> {
        let mut pool: Vec<Question> = self
            .subjects
            .iter()
            .filter(|subject| subjects.is_empty() || subjects.contains(&subject.id))
            .flat_map(|subject| subject.chapters.iter())
            .flat_map(|chapter| chapter.questions.iter())
            .cloned()
            .collect();

        // Fisher-Yates, so every ordering is equally likely.
        pool.shuffle(rng);
        pool.truncate(count);
        pool
    }

    fn chapter_label(&self, subject: &str, chapter: &str) -> Option<String> {
        let subject = self.subject(subject)?;
        let chapter = subject.chapters.iter().find(|c| c.id == chapter)?;
        Some(format!("{} · {}", subject.name, chapter.name))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn question(id: &str, difficulty: Difficulty) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            options: vec!["yes".to_string(), "no".to_string()],
            correct_answer: "yes".to_string(),
            explanation: None,
            difficulty,
            topic: None,
        }
    }

    fn chapter(id: &str, ids: &[&str]) -> Chapter {
        Chapter {
            id: id.to_string(),
            name: format!("Chapter {}", id),
            questions: ids.iter().map(|q| question(q, Difficulty::Easy)).collect(),
        }
    }

    fn two_pool_bank() -> QuestionBank {
        let geography = Subject {
            id: "geography".to_string(),
            name: "Geography".to_string(),
            grade: Some(10),
            chapters: vec![
                chapter("g1", &["g1-1", "g1-2", "g1-3", "g1-4"]),
                chapter("g2", &["g2-1", "g2-2", "g2-3", "g2-4"]),
            ],
        };
        let history = Subject {
            id: "history".to_string(),
            name: "History".to_string(),
            grade: Some(11),
            chapters: vec![chapter(
                "h1",
                &["h1-1", "h1-2", "h1-3", "h1-4", "h1-5", "h1-6", "h1-7"],
            )],
        };
        QuestionBank::new(vec![geography, history])
    }

    #[test]
    fn test_subjects_grouped_by_grade() {
        let mut bank = two_pool_bank();
        bank.subjects.push(Subject {
            id: "civics".to_string(),
            name: "Civics".to_string(),
            grade: Some(10),
            chapters: Vec::new(),
        });

        let grades = bank.by_grade();
        let keys: Vec<_> = grades.keys().copied().collect();
        assert_eq!(keys, vec![Some(10), Some(11)]);
        let tenth: Vec<_> = grades[&Some(10)].iter().map(|s| s.id.as_str()).collect();
        assert_eq!(tenth, vec!["geography", "civics"]);
    }

    #[test]
    fn test_questions_filters_by_difficulty_and_count() {
        let mut bank = two_pool_bank();
        bank.subjects[0].chapters[0].questions[1].difficulty = Difficulty::Hard;

        let easy = bank.questions("geography", "g1", Difficulty::Easy, 2);
        let ids: Vec<_> = easy.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["g1-1", "g1-3"]);

        let hard = bank.questions("geography", "g1", Difficulty::Hard, 10);
        assert_eq!(hard.len(), 1);
        assert_eq!(hard[0].id, "g1-2");
    }

    #[test]
    fn test_questions_unknown_chapter_is_empty() {
        let bank = two_pool_bank();
        assert!(bank.questions("geography", "nope", Difficulty::Easy, 10).is_empty());
        assert!(bank.questions("physics", "g1", Difficulty::Easy, 10).is_empty());
    }

    #[test]
    fn test_mixed_questions_capped_by_pool_without_duplicates() {
        let bank = two_pool_bank();
        assert_eq!(bank.question_count(), 15);

        let mut rng = StdRng::seed_from_u64(7);
        let mixed = bank.mixed_questions(&[], 20, &mut rng);
        assert_eq!(mixed.len(), 15);

        let ids: HashSet<_> = mixed.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_mixed_questions_respects_subject_filter() {
        let bank = two_pool_bank();
        let mut rng = StdRng::seed_from_u64(1);
        let mixed = bank.mixed_questions(&["history".to_string()], 5, &mut rng);
        assert_eq!(mixed.len(), 5);
        assert!(mixed.iter().all(|q| q.id.starts_with('h')));
    }

    #[test]
    fn test_mixed_questions_shuffle_is_seed_dependent() {
        let bank = two_pool_bank();
        let order = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            bank.mixed_questions(&[], 15, &mut rng)
                .into_iter()
                .map(|q| q.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(order(42), order(42));
        assert_ne!(order(42), order(43));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids_across_subjects() {
        let mut bank = two_pool_bank();
        bank.subjects[1].chapters[0].questions[0].id = "g1-1".to_string();
        assert!(matches!(
            bank.validate(),
            Err(LoadError::DuplicateId(id)) if id == "g1-1"
        ));
    }

    #[test]
    fn test_chapter_label_joins_subject_and_chapter() {
        let bank = two_pool_bank();
        assert_eq!(
            bank.chapter_label("history", "h1").as_deref(),
            Some("History · Chapter h1")
        );
        assert_eq!(bank.chapter_label("history", "h9"), None);
    }
}
