use std::sync::Arc;

use clap::Parser;
use quiz_core::QuestionBank;
use quiz_core::scoring::ScoringTable;
use services::{Clock, LeaderboardService, QuizLoopService, SessionSummaryService};
use storage::repository::Storage;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod bank_file;
mod cli;
mod config;
mod display;
mod export;
mod play;

use bank_file::load_bank;
use cli::{Cli, Command, PlayArgs};
use config::{normalize_sqlite_url, prepare_sqlite_file};
use play::{AppResult, Console, PlayOptions, run_play};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_bank(path: Option<&std::path::Path>) -> AppResult<QuestionBank> {
    Ok(match path {
        Some(path) => load_bank(path)?,
        None => QuestionBank::builtin()?,
    })
}

async fn open_storage(db: &str) -> AppResult<Storage> {
    // Open + migrate SQLite here; core/services never see URLs.
    let db_url = normalize_sqlite_url(db)?;
    prepare_sqlite_file(&db_url)?;
    let storage = Storage::sqlite(&db_url).await?;
    debug!(db = %db_url, "storage ready");
    Ok(storage)
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command.unwrap_or_default() {
        Command::Play(args) => {
            let storage = open_storage(&cli.db).await?;
            play(args, &storage).await
        }
        Command::Leaderboard { limit } => {
            let storage = open_storage(&cli.db).await?;
            let ranked = LeaderboardService::new(storage.leaderboard.clone())
                .ranked(Some(limit))
                .await?;
            print!("{}", display::render_leaderboard(&ranked));
            Ok(())
        }
        Command::History { limit } => {
            let storage = open_storage(&cli.db).await?;
            let items = SessionSummaryService::new(storage.session_summaries.clone())
                .list_recent(limit)
                .await?;
            print!("{}", display::render_history(&items));
            Ok(())
        }
        Command::Bank { bank } => {
            let bank = open_bank(bank.as_deref())?;
            print!("{}", display::render_bank(&bank, &ScoringTable::reference()));
            Ok(())
        }
    }
}

async fn play(args: PlayArgs, storage: &Storage) -> AppResult<()> {
    let bank = open_bank(args.bank.as_deref())?;
    let quiz = QuizLoopService::new(
        Clock::default_clock(),
        Arc::new(bank),
        storage.leaderboard.clone(),
        storage.session_summaries.clone(),
    );
    let leaderboard = LeaderboardService::new(storage.leaderboard.clone());
    let options = PlayOptions {
        name: args.name,
        filter: args.difficulty,
        count: usize::from(args.count),
        export_dir: args.export_dir,
    };

    let mut console = Console::new(std::io::stdin().lock(), std::io::stdout().lock());
    let mut rng = rand::rng();
    let finished = run_play(&mut console, &quiz, &leaderboard, options, &mut rng).await?;
    debug!(rounds = finished.len(), "play finished");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
