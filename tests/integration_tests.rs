//! Integration tests for the partnership rating pipeline
//!
//! These tests exercise the system working together, including:
//! - Replaying matches against a seeded rating store
//! - Loading club game files into an ordered match stream
//! - Persisting the rating table and reading it back
//! - Evaluating ratings and masterpoints on held-out sessions

mod fixtures;

use partnership_elo::error::rating_error;
use partnership_elo::evaluation::{evaluate, SessionSplit, Signal};
use partnership_elo::rating::{InMemoryRepository, JsonFileRepository, RatingRepository};
use partnership_elo::service::RatingPipeline;
use partnership_elo::stream::{GameDocument, MatchStreamBuilder};
use partnership_elo::types::{MatchRecord, Partnership};
use partnership_elo::{RatingEngine, RatingError, RatingStore};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

use fixtures::{
    baseline_store, config_for, four_player_session, game_document, table, write_document,
    SessionFixture,
};

fn engine() -> RatingEngine {
    RatingEngine::from_config(&Default::default()).unwrap()
}

/// Five dated sessions, one stray result and one unreadable file
fn game_directory() -> TempDir {
    let dir = TempDir::new().unwrap();

    let early = vec![
        four_player_session("101", "2019-01-01").result(1, 1, 2, 6.0, 2.0),
        four_player_session("102", "2019-01-08")
            .result(2, 1, 2, 5.0, 3.0)
            .result(3, 1, 9, 4.0, 4.0),
    ];
    let late = vec![
        four_player_session("103", "2019-01-15").result(4, 1, 2, 7.0, 1.0),
        four_player_session("104", "2019-01-22").result(5, 1, 2, 4.5, 3.5),
        four_player_session("105", "2019-01-29")
            .result(6, 1, 2, 5.0, 3.0)
            .result(7, 1, 2, 7.0, 1.0)
            .result(8, 1, 2, 3.0, 5.0),
    ];

    // File names sort opposite to session dates
    write_document(dir.path(), "a-late.json", &late);
    write_document(dir.path(), "b-early.json", &early);
    fs::write(dir.path().join("c-broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    dir
}

#[test]
fn test_single_win_from_baseline() {
    let mut store = baseline_store(&[1, 2, 3, 4]);

    let summary = engine().run(&[table(1, 60.0, 40.0)], &mut store).unwrap();

    assert_eq!(summary.ns_wins, 1);
    for (id, expected) in [(1, 1216.0), (2, 1216.0), (3, 1184.0), (4, 1184.0)] {
        let entry = store.entry(id).unwrap();
        assert_eq!(entry.rating, expected);
        assert_eq!(entry.games_played, 1);
    }
}

#[test]
fn test_tied_scores_leave_ratings_unchanged() {
    let mut store = baseline_store(&[1, 2, 3, 4]);

    let summary = engine().run(&[table(1, 50.0, 50.0)], &mut store).unwrap();

    assert_eq!(summary.draws, 1);
    for id in 1..=4 {
        let entry = store.entry(id).unwrap();
        assert_eq!(entry.rating, 1200.0);
        assert_eq!(entry.games_played, 1);
    }
}

#[test]
fn test_unknown_participant_halts_run_and_skips_persistence() {
    let mut store = baseline_store(&[1, 2, 3, 4]);
    let mut repository = InMemoryRepository::new();
    let matches = vec![
        table(1, 60.0, 40.0),
        MatchRecord::new(2, Partnership(1, 2), Partnership(3, 5), 60.0, 40.0),
        table(3, 60.0, 40.0),
    ];

    let err = engine()
        .run_and_persist(&matches, &mut store, &mut repository)
        .unwrap_err();

    assert_eq!(
        rating_error(&err),
        Some(&RatingError::NotFound { participant_id: 5 })
    );
    // The first match stays applied, the failing one applied nothing
    assert_eq!(store.get(1).unwrap(), 1216.0);
    assert_eq!(store.entry(3).unwrap().games_played, 1);
    assert_eq!(repository.persist_calls(), 0);
}

#[test]
fn test_accuracy_with_one_hit_and_one_miss() {
    let matches = vec![table(1, 60.0, 40.0), table(2, 30.0, 70.0)];
    let ratings = Signal::new(
        "elo",
        HashMap::from([(1, 1300.0), (2, 1250.0), (3, 1150.0), (4, 1100.0)]),
    );
    let masterpoints = Signal::new(
        "masterpoints",
        HashMap::from([(1, 10.0), (2, 10.0), (3, 10.0), (4, 10.0)]),
    );

    let report = evaluate(&matches, &ratings, &masterpoints).unwrap();

    assert_eq!(report.decided, 2);
    assert_eq!(report.rating.accuracy, 0.5);
    // Equal pools never count as a correct prediction
    assert_eq!(report.alternative.accuracy, 0.0);
    assert_eq!(report.alternative.undefined, 2);
}

#[test]
fn test_pipeline_run_over_game_directory() {
    let games = game_directory();
    let output = TempDir::new().unwrap();
    let ratings_path = output.path().join("ratings.json");
    let pipeline = RatingPipeline::new(config_for(games.path(), &ratings_path)).unwrap();

    let mut repository = JsonFileRepository::new(&ratings_path);
    let report = pipeline.run(&mut repository).unwrap();

    assert_eq!(report.skipped_records, 1);
    assert_eq!(report.participants, 4);
    assert_eq!(report.holdout_sessions, 1);
    assert_eq!(report.training.matches_processed, 4);
    assert_eq!(report.training.ns_wins, 4);

    assert_eq!(report.evaluation.matches, 3);
    assert_eq!(report.evaluation.decided, 3);
    assert!((report.evaluation.rating.accuracy - 2.0 / 3.0).abs() < 1e-12);
    assert!((report.evaluation.alternative.accuracy - 2.0 / 3.0).abs() < 1e-12);
    // Every held-out match has the same pool difference
    assert!(report.evaluation.rating.correlation.is_none());

    let persisted = repository.load_all().unwrap();
    assert_eq!(persisted.len(), 4);
    assert!(persisted[0].rating > 1200.0);
    assert!(persisted[2].rating < 1200.0);
    assert!(persisted.iter().all(|entry| entry.games_played == 4));
    assert!(!output.path().join("ratings.json.tmp").exists());
}

#[test]
fn test_evaluate_reads_persisted_table() {
    let games = game_directory();
    let output = TempDir::new().unwrap();
    let ratings_path = output.path().join("ratings.json");
    let pipeline = RatingPipeline::new(config_for(games.path(), &ratings_path)).unwrap();

    let stream = pipeline.load_stream().unwrap();
    let split = pipeline.split(&stream).unwrap();
    let mut repository = JsonFileRepository::new(&ratings_path);
    let (trained, _) = pipeline.train(&stream, &split, &mut repository).unwrap();

    let reloaded = RatingStore::from_repository(&repository).unwrap();
    assert_eq!(reloaded.len(), trained.len());
    for (disk, memory) in reloaded.snapshot().iter().zip(trained.snapshot()) {
        assert_eq!(disk.participant_id, memory.participant_id);
        assert_eq!(disk.games_played, memory.games_played);
        assert!((disk.rating - memory.rating).abs() < 1e-9);
    }

    let from_disk = pipeline.evaluate(&stream, &split, &reloaded).unwrap();
    let in_memory = pipeline.evaluate(&stream, &split, &trained).unwrap();
    assert_eq!(from_disk.decided, in_memory.decided);
    assert_eq!(from_disk.rating.correct, in_memory.rating.correct);
    assert_eq!(from_disk.alternative, in_memory.alternative);
}

#[test]
fn test_missing_rating_table_is_a_persistence_error() {
    let output = TempDir::new().unwrap();
    let repository = JsonFileRepository::new(output.path().join("absent.json"));

    let err = RatingStore::from_repository(&repository).unwrap_err();

    assert!(matches!(
        rating_error(&err),
        Some(RatingError::Persistence { .. })
    ));
}

#[test]
fn test_undated_numeric_sessions_hold_out_the_highest_id() {
    let session = |id: &str, result: u64| {
        SessionFixture::new(id, None)
            .pair(1, "NS", [(1, 5.0), (2, 5.0)])
            .pair(2, "EW", [(3, 5.0), (4, 5.0)])
            .result(result, 1, 2, 5.0, 3.0)
    };
    let document: GameDocument =
        serde_json::from_value(game_document(&[session("10", 2), session("9", 1)])).unwrap();

    let mut builder = MatchStreamBuilder::new();
    builder.add_document(document);
    let stream = builder.build();
    let split = SessionSplit::by_fraction(&stream.matches, 0.5).unwrap();

    assert_eq!(split.holdout_sessions, vec!["10".to_string()]);
    assert_eq!(split.train[0].match_id, 1);
    assert_eq!(split.test[0].match_id, 2);
}
