use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quiz_core::model::DifficultyFilter;

/// Timed multiple-choice quiz with a persistent leaderboard.
#[derive(Debug, Parser)]
#[command(name = "quiz", version, about)]
pub struct Cli {
    /// SQLite URL or path for results and the leaderboard.
    #[arg(long, global = true, env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3")]
    pub db: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play a quiz in the terminal (default).
    Play(PlayArgs),
    /// Show the highest scores.
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List the question bank by difficulty.
    Bank {
        /// JSON bank file to list instead of the built-in one.
        #[arg(long)]
        bank: Option<PathBuf>,
    },
    /// Show the most recent finished sessions.
    History {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Play(PlayArgs::default())
    }
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Player name; asked for when missing.
    #[arg(long)]
    pub name: Option<String>,

    /// mixed, easy, medium or hard; asked for when missing.
    #[arg(long)]
    pub difficulty: Option<DifficultyFilter>,

    /// Number of questions (clamped to what the bank offers).
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..=50))]
    pub count: u16,

    /// JSON file with `{text, choices, answer, difficulty}` questions.
    #[arg(long)]
    pub bank: Option<PathBuf>,

    /// Directory for the detailed JSON results and the summary document.
    #[arg(long, env = "QUIZ_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            name: None,
            difficulty: None,
            count: 5,
            bank: None,
            export_dir: std::env::var_os("QUIZ_EXPORT_DIR").map(PathBuf::from),
        }
    }
}
