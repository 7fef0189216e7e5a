use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical session score. The leaderboard store only ever appends these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u32,
    pub recorded_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    #[must_use]
    pub fn new(player_name: impl Into<String>, score: u32, recorded_at: DateTime<Utc>) -> Self {
        Self {
            player_name: player_name.into(),
            score,
            recorded_at,
        }
    }
}

/// Display position of an entry; `rank` starts at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub rank: usize,
    pub entry: LeaderboardEntry,
}

/// Orders entries for display: highest score first, ties keep insertion order.
///
/// The input slice is left untouched.
#[must_use]
pub fn rank_entries(entries: &[LeaderboardEntry]) -> Vec<RankedEntry> {
    let mut ordered: Vec<&LeaderboardEntry> = entries.iter().collect();
    // `sort_by` is stable, which is what keeps ties in insertion order.
    ordered.sort_by(|a, b| b.score.cmp(&a.score));
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry {
            rank: i + 1,
            entry: entry.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn ranks_by_score_and_keeps_tie_order() {
        let now = fixed_now();
        let entries = vec![
            LeaderboardEntry::new("first", 100, now),
            LeaderboardEntry::new("second", 300, now),
            LeaderboardEntry::new("third", 100, now),
            LeaderboardEntry::new("fourth", 200, now),
        ];

        let ranked = rank_entries(&entries);
        let names: Vec<_> = ranked.iter().map(|r| r.entry.player_name.as_str()).collect();
        assert_eq!(names, ["second", "fourth", "first", "third"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[3].rank, 4);

        // Storage order is untouched.
        assert_eq!(entries[0].player_name, "first");
    }

    #[test]
    fn empty_leaderboard_ranks_nothing() {
        assert!(rank_entries(&[]).is_empty());
    }
}
