use std::collections::HashSet;

use quiz_trainer::session::{
    Achievement, CompletionReason, Progress, QuizSession, ScoringPolicy, SessionError,
    SessionMeta, TickOutcome, TimeBudget,
};
use quiz_trainer::{Chapter, Difficulty, Question, QuestionBank, QuestionSource, Subject};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn question(id: &str, difficulty: Difficulty) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Question {}", id),
        options: vec![
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            "D".to_string(),
        ],
        correct_answer: "A".to_string(),
        explanation: Some("A is right".to_string()),
        difficulty,
        topic: None,
    }
}

fn chapter(id: &str, count: usize) -> Chapter {
    Chapter {
        id: id.to_string(),
        name: id.to_uppercase(),
        questions: (0..count)
            .map(|i| question(&format!("{}-{}", id, i), Difficulty::Easy))
            .collect(),
    }
}

fn bank() -> QuestionBank {
    QuestionBank::new(vec![
        Subject {
            id: "geography".to_string(),
            name: "Geography".to_string(),
            grade: Some(10),
            chapters: vec![chapter("rivers", 6), chapter("mountains", 3)],
        },
        Subject {
            id: "history".to_string(),
            name: "History".to_string(),
            grade: Some(11),
            chapters: vec![chapter("empires", 6)],
        },
    ])
}

fn start(questions: Vec<Question>, budget: TimeBudget) -> QuizSession {
    let mut session = QuizSession::new(ScoringPolicy::default());
    session
        .initialize(
            questions,
            SessionMeta {
                label: "test".to_string(),
                difficulty: Some(Difficulty::Easy),
            },
            budget,
        )
        .unwrap();
    session
}

fn play(session: &mut QuizSession, option: &str) {
    session.select_answer(option).unwrap();
    session.commit_answer().unwrap();
    session.advance().unwrap();
}

#[test]
fn chapter_quiz_from_bank_scores_two_of_three() {
    let source = bank();
    let questions = source.questions("geography", "mountains", Difficulty::Easy, 10);
    assert_eq!(questions.len(), 3);

    let mut session = start(questions, TimeBudget::PerQuestion { seconds: 90 });
    let mut streaks = Vec::new();
    for option in ["A", "D", "A"] {
        session.select_answer(option).unwrap();
        streaks.push(session.commit_answer().unwrap().streak);
        session.advance().unwrap();
    }

    assert_eq!(streaks, vec![1, 0, 1]);
    let result = session.finish().unwrap();
    assert_eq!((result.score, result.total), (2, 3));
    assert_eq!(result.best_streak, 1);
}

#[test]
fn mixed_quiz_never_exceeds_pool() {
    let source = bank();
    let mut rng = StdRng::seed_from_u64(2024);
    let mixed = source.mixed_questions(&[], 20, &mut rng);

    assert_eq!(mixed.len(), 15);
    let ids: HashSet<_> = mixed.iter().map(|q| q.id.clone()).collect();
    assert_eq!(ids.len(), mixed.len());
}

#[test]
fn empty_source_result_cannot_start() {
    let source = bank();
    let questions = source.questions("geography", "rivers", Difficulty::Hard, 10);
    let mut session = QuizSession::new(ScoringPolicy::default());

    let err = session
        .initialize(
            questions,
            SessionMeta::default(),
            TimeBudget::PerQuestion { seconds: 90 },
        )
        .unwrap_err();
    assert_eq!(err, SessionError::EmptyContent);
    assert!(session.current_question().is_none());
}

#[test]
fn score_matches_recorded_answers_after_timeout() {
    let source = bank();
    let mut rng = StdRng::seed_from_u64(9);
    let questions = source.mixed_questions(&[], 10, &mut rng);
    let mut session = start(questions, TimeBudget::Fixed { seconds: 3 });

    play(&mut session, "A");
    play(&mut session, "B");
    session.select_answer("A").unwrap();

    assert_eq!(session.tick(), Ok(TickOutcome::Running { remaining: 2 }));
    assert_eq!(session.tick(), Ok(TickOutcome::Running { remaining: 1 }));
    assert_eq!(session.tick(), Ok(TickOutcome::Expired));

    let result = session.finish().unwrap();
    assert_eq!(result.reason, CompletionReason::TimeExpired);
    assert_eq!(result.score, 1);
    assert_eq!(result.total, 10);
    assert!(result.score <= session.answered_count());
}

#[test]
fn double_clicks_do_not_corrupt_state() {
    let questions: Vec<_> = (0..2)
        .map(|i| question(&format!("q{}", i), Difficulty::Medium))
        .collect();
    let mut session = start(questions, TimeBudget::PerQuestion { seconds: 90 });

    session.select_answer("A").unwrap();
    let first = session.commit_answer().unwrap();
    assert!(session.commit_answer().is_err());
    assert_eq!(session.points(), first.award.total());

    assert_eq!(session.advance(), Ok(Progress::Next { position: 1 }));
    assert!(session.advance().is_err());
    assert_eq!(session.position(), 1);
    assert_eq!(session.answered_count(), 1);
}

#[test]
fn achievements_unlock_once_over_a_long_run() {
    let questions: Vec<_> = (0..12)
        .map(|i| question(&format!("h{}", i), Difficulty::Hard))
        .collect();
    let mut session = start(questions, TimeBudget::PerQuestion { seconds: 90 });

    let mut unlocked = Vec::new();
    for option in ["A", "A", "A", "A", "A", "B", "A", "A", "A", "A", "A", "A"] {
        session.select_answer(option).unwrap();
        unlocked.extend(session.commit_answer().unwrap().unlocked);
        session.advance().unwrap();
    }

    assert_eq!(
        unlocked,
        vec![
            Achievement::TripleStreak,
            Achievement::CenturyScorer,
            Achievement::AmazingStreak,
            Achievement::QuizMaster,
        ]
    );
    let result = session.result().unwrap();
    assert_eq!(result.achievements, unlocked);
    assert_eq!(result.best_streak, 6);
}
