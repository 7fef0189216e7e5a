use std::io::{BufRead, Write};
use std::path::PathBuf;

use quiz_core::model::{AnswerOutcome, AnswerResult, DifficultyFilter, PlayerName};
use rand::Rng;
use services::{LeaderboardService, PersistedSession, QuizLoopService, QuizSession};
use tracing::{debug, warn};

use crate::display::render_leaderboard;
use crate::export::write_exports;

pub type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

const LEADERBOARD_SIZE: usize = 10;
const BAR_WIDTH: usize = 20;

/// What `play` was asked for on the command line.
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub name: Option<String>,
    pub filter: Option<DifficultyFilter>,
    pub count: usize,
    pub export_dir: Option<PathBuf>,
}

/// Line-oriented terminal: prompts on `output`, answers from `input`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: impl std::fmt::Display) -> std::io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Prompt and read one trimmed line; `None` on end of input.
    pub fn ask(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Choice(usize),
    Skip,
}

fn parse_reply(raw: &str, choices: usize) -> Option<Reply> {
    if raw.eq_ignore_ascii_case("s") || raw.eq_ignore_ascii_case("skip") {
        return Some(Reply::Skip);
    }
    match raw.parse::<usize>() {
        Ok(n) if (1..=choices).contains(&n) => Some(Reply::Choice(n - 1)),
        _ => None,
    }
}

fn progress_bar(fraction: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Run quizzes until the player declines another round or input ends.
///
/// Returns every session that was finished and stored.
///
/// # Errors
///
/// Returns terminal I/O errors, session errors and storage failures.
pub async fn run_play<R, W, G>(
    console: &mut Console<R, W>,
    quiz: &QuizLoopService,
    leaderboard: &LeaderboardService,
    options: PlayOptions,
    rng: &mut G,
) -> AppResult<Vec<PersistedSession>>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut finished = Vec::new();
    let Some(name) = resolve_name(console, options.name.clone())? else {
        return Ok(finished);
    };
    let Some(filter) = resolve_filter(console, options.filter)? else {
        return Ok(finished);
    };

    let mut session = quiz.start_session(name.as_str(), filter, options.count, rng)?;
    loop {
        if session.total_questions() < options.count {
            console.say(format!(
                "Only {} {} questions available; playing all of them.",
                session.total_questions(),
                filter
            ))?;
        }

        let Some(persisted) = play_session(console, quiz, &mut session).await? else {
            console.say("\nQuiz abandoned; nothing was saved.")?;
            return Ok(finished);
        };
        report_finish(console, &persisted, options.export_dir.as_ref())?;

        console.say("\nLeaderboard")?;
        let ranked = leaderboard.ranked(Some(LEADERBOARD_SIZE)).await?;
        console.say(render_leaderboard(&ranked).trim_end())?;
        finished.push(persisted);

        match console.ask("\nPlay again? [y/N] ")? {
            Some(answer) if matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") => {
                quiz.play_again(&mut session, filter, options.count, rng)?;
            }
            _ => return Ok(finished),
        }
    }
}

fn resolve_name<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    mut pending: Option<String>,
) -> AppResult<Option<PlayerName>> {
    loop {
        let raw = match pending.take() {
            Some(raw) => raw,
            None => match console.ask("Player name: ")? {
                Some(raw) => raw,
                None => return Ok(None),
            },
        };
        match PlayerName::new(&raw) {
            Ok(name) => return Ok(Some(name)),
            Err(err) => console.say(format!("{err}. Try again."))?,
        }
    }
}

fn resolve_filter<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    preset: Option<DifficultyFilter>,
) -> AppResult<Option<DifficultyFilter>> {
    if let Some(filter) = preset {
        return Ok(Some(filter));
    }
    loop {
        let Some(raw) = console.ask("Difficulty [Mixed/Easy/Medium/Hard] (Mixed): ")? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(Some(DifficultyFilter::Mixed));
        }
        match raw.parse::<DifficultyFilter>() {
            Ok(filter) => return Ok(Some(filter)),
            Err(err) => console.say(format!("{err}. Try again."))?,
        }
    }
}

async fn play_session<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    quiz: &QuizLoopService,
    session: &mut QuizSession,
) -> AppResult<Option<PersistedSession>> {
    loop {
        let (index, choices) = {
            let current = session.current_question()?;
            let countdown = quiz.countdown(session)?;
            let progress = session.progress();

            console.say(format!(
                "\nQuestion {}/{}  |  Score: {}",
                current.index + 1,
                current.total,
                progress.score
            ))?;
            console.say(format!(
                "{}  |  {} pts  |  {}s limit",
                current.question.difficulty(),
                current.profile.base_points(),
                current.profile.time_limit_secs()
            ))?;
            console.say(current.question.text())?;
            for (i, choice) in current.question.choices().iter().enumerate() {
                console.say(format!("  {}) {choice}", i + 1))?;
            }
            console.say(format!(
                "{} {}s left",
                progress_bar(countdown.fraction),
                countdown.remaining_secs
            ))?;
            (current.index, current.question.choices().to_vec())
        };

        let prompt = format!("Answer [1-{}] or 's' to skip: ", choices.len());
        let outcome = loop {
            let Some(line) = console.ask(&prompt)? else {
                debug!(index, "input closed mid-session");
                return Ok(None);
            };
            match parse_reply(&line, choices.len()) {
                Some(Reply::Skip) => break quiz.skip(session, index).await?,
                Some(Reply::Choice(i)) => break quiz.submit(session, index, &choices[i]).await?,
                None => console.say("Enter a choice number or 's'.")?,
            }
        };

        describe_result(console, &outcome.result)?;
        if let Some(persisted) = outcome.persisted {
            return Ok(Some(persisted));
        }
    }
}

fn describe_result<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    result: &AnswerResult,
) -> std::io::Result<()> {
    let line = match result.outcome {
        AnswerOutcome::Correct => format!(
            "Correct! +{} points ({:.2}s)",
            result.points, result.elapsed_seconds
        ),
        AnswerOutcome::Incorrect => {
            format!("Incorrect. The answer was: {}", result.correct_answer)
        }
        AnswerOutcome::TimedOut => format!(
            "Time's up! No points. The answer was: {}",
            result.correct_answer
        ),
        AnswerOutcome::Skipped => "Skipped.".to_owned(),
    };
    console.say(line)
}

fn report_finish<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    persisted: &PersistedSession,
    export_dir: Option<&PathBuf>,
) -> std::io::Result<()> {
    let summary = &persisted.summary;
    console.say(format!(
        "\nQuiz complete! {} scored {} points over {} questions (saved as #{}).",
        summary.player_name(),
        summary.total_score(),
        summary.question_count(),
        persisted.summary_id
    ))?;

    let Some(dir) = export_dir else {
        return Ok(());
    };
    // The session is already stored; a failed export must not end the game.
    match write_exports(dir, summary) {
        Ok(paths) => {
            console.say(format!("Detailed results: {}", paths.details.display()))?;
            console.say(format!("Summary document: {}", paths.document.display()))
        }
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "export failed");
            console.say(format!("Could not export results to {}: {err}", dir.display()))
        }
    }
}
