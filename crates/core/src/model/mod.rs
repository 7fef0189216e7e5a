mod answer;
mod difficulty;
mod leaderboard;
mod player;
mod question;
mod summary;

pub use answer::{AnswerOutcome, AnswerResult};
pub use difficulty::{Difficulty, DifficultyFilter, ParseDifficultyError};
pub use leaderboard::{LeaderboardEntry, RankedEntry, rank_entries};
pub use player::{PlayerName, PlayerNameError};
pub use question::{QuestionDraft, QuestionError, QuestionRecord};
pub use summary::{SessionSummary, SummaryError};
