use chrono::Duration;
use quiz_core::model::{
    AnswerOutcome, AnswerResult, Difficulty, LeaderboardEntry, PlayerName, SessionSummary,
};
use quiz_core::time::fixed_now;
use storage::repository::{LeaderboardRepository, SessionSummaryRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn build_summary(player: &str) -> SessionSummary {
    let started = fixed_now();
    SessionSummary::from_results(
        PlayerName::new(player).unwrap(),
        vec![
            AnswerResult {
                question: "Which organ is primarily affected by myocardial infarction?".into(),
                selected: Some("Heart".into()),
                correct_answer: "Heart".into(),
                difficulty: Difficulty::Easy,
                elapsed_seconds: 2.0,
                points: 88,
                outcome: AnswerOutcome::Correct,
            },
            AnswerResult {
                question: "Higher 'oldpeak' values indicate:".into(),
                selected: None,
                correct_answer: "More ischemia".into(),
                difficulty: Difficulty::Hard,
                elapsed_seconds: 4.25,
                points: 0,
                outcome: AnswerOutcome::Skipped,
            },
            AnswerResult {
                question: "Thallium stress test is used to assess:".into(),
                selected: Some("Myocardial perfusion".into()),
                correct_answer: "Myocardial perfusion".into(),
                difficulty: Difficulty::Hard,
                elapsed_seconds: 11.0,
                points: 0,
                outcome: AnswerOutcome::TimedOut,
            },
        ],
        started,
        started + Duration::seconds(20),
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_persists_summary_and_results() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_summary?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let summary = build_summary("Ada Lovelace");
    let id = repo.append_summary(&summary).await.expect("append");

    let fetched = repo.get_summary(id).await.expect("fetch");
    assert_eq!(fetched, summary);
    assert_eq!(fetched.results()[1].selected, None);
    assert_eq!(fetched.results()[2].outcome, AnswerOutcome::TimedOut);

    let rows = repo.list_summary_rows(5).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);

    assert!(matches!(
        repo.get_summary(id + 100).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn sqlite_leaderboard_is_append_only_in_insertion_order() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_leaderboard?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let now = fixed_now();
    for (name, score) in [("low", 10), ("high", 300), ("mid", 120)] {
        repo.append_entry(&LeaderboardEntry::new(name, score, now))
            .await
            .expect("append");
    }

    let entries = repo.list_entries().await.expect("list");
    let names: Vec<_> = entries.iter().map(|e| e.player_name.as_str()).collect();
    assert_eq!(names, ["low", "high", "mid"]);
    assert_eq!(entries[1].score, 300);
    assert_eq!(entries[0].recorded_at, now);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}
