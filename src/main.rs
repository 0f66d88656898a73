use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use quiz_trainer::{
    DEFAULT_QUESTIONS_PATH, Difficulty, Quiz, QuizConfig, QuizError, QuizMode, QuizResult,
    load_bank_from_json, logging,
};
use tracing::error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON question bank to draw questions from
    #[arg(short, long, default_value = DEFAULT_QUESTIONS_PATH)]
    questions: PathBuf,

    /// JSON file overriding quiz length, timing and scoring
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file (filter with QUIZ_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the final result as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quiz on one chapter of a subject
    Chapter {
        subject: String,
        chapter: String,
        #[arg(short, long, value_enum, default_value_t = Difficulty::Easy)]
        difficulty: Difficulty,
    },
    /// Random questions mixed from every subject
    Mixed {
        /// Number of questions to draw
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// List subjects and chapters in the question bank
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_file.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "quiz failed");
            eprintln!("Error running quiz: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    let mut config = match &args.config {
        Some(path) => QuizConfig::from_json(path)?,
        None => QuizConfig::default(),
    };

    let mode = match args.command {
        Command::List => return list_bank(&args.questions),
        Command::Chapter {
            subject,
            chapter,
            difficulty,
        } => QuizMode::Chapter {
            subject,
            chapter,
            difficulty,
        },
        Command::Mixed { count } => {
            if let Some(count) = count {
                config.mixed.count = count;
            }
            QuizMode::Mixed
        }
    };

    let quiz = Quiz::from_json(&args.questions, mode, config)?;
    if let Some(result) = quiz.run().await? {
        print_result(&result, args.json);
    }
    Ok(())
}

fn list_bank(path: &Path) -> Result<(), QuizError> {
    let bank = load_bank_from_json(path)?;
    for (grade, subjects) in bank.by_grade() {
        match grade {
            Some(grade) => println!("Grade {}", grade),
            None => println!("Ungraded"),
        }
        for subject in subjects {
            println!("  {} ({})", subject.name, subject.id);
            for chapter in &subject.chapters {
                println!(
                    "    {:<16} {} [{} questions]",
                    chapter.id,
                    chapter.name,
                    chapter.questions.len()
                );
            }
        }
    }
    Ok(())
}

fn print_result(result: &QuizResult, json: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(out) => println!("{}", out),
            Err(e) => eprintln!("Failed to encode result: {}", e),
        }
        return;
    }

    println!(
        "{}: {} / {} ({:.0}%), {} points, best streak {}",
        result.label,
        result.score,
        result.total,
        result.percentage(),
        result.points,
        result.best_streak
    );
}
