use std::path::PathBuf;

use chess_core::Outcome;

use super::*;
use crate::experiment::AgentSpec;

fn quick(games: u32) -> ExperimentConfig {
    let mut config = ExperimentConfig::new(
        "quick",
        AgentSpec::Random { seed: Some(1) },
        AgentSpec::Classical {
            depth: 1,
            elo: None,
            move_time_ms: None,
        },
    );
    config.games = games;
    config.game.max_plies = Some(30);
    config
}

#[test]
fn plays_every_game_in_order() {
    let records = run_batch(&quick(4), &CancelToken::new()).unwrap().games;
    assert_eq!(
        records.iter().map(|r| r.index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    for record in &records {
        assert!(!matches!(record.report.outcome, Outcome::Aborted { .. }));
        assert!(record.report.stats.plies <= 30);
    }
}

#[test]
fn colours_alternate() {
    let records = run_batch(&quick(2), &CancelToken::new()).unwrap().games;
    assert!(records[0].first_is_white);
    assert_eq!(records[0].report.white, "Random v1.0");
    assert!(!records[1].first_is_white);
    assert_eq!(records[1].first_color(), Color::Black);
    assert_eq!(records[1].report.black, "Random v1.0");

    let mut same = quick(2);
    same.alternate_colors = false;
    let records = run_batch(&same, &CancelToken::new()).unwrap().games;
    assert!(records.iter().all(|r| r.first_is_white));
}

#[test]
fn cancelled_batch_aborts_every_game() {
    let token = CancelToken::new();
    token.cancel();
    let records = run_batch(&quick(3), &token).unwrap().games;
    assert_eq!(records.len(), 3);
    assert!(
        records
            .iter()
            .all(|r| matches!(r.report.outcome, Outcome::Aborted { .. }))
    );
}

#[test]
fn scripted_movers_run_sequentially_too() {
    let mut config = ExperimentConfig::new(
        "fools mate",
        AgentSpec::Script {
            moves: vec!["f3".into(), "g4".into()],
        },
        AgentSpec::Script {
            moves: vec!["e5".into(), "Qh4#".into()],
        },
    );
    config.parallel = false;
    let records = run_batch(&config, &CancelToken::new()).unwrap().games;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].report.movetext(), "1. f3 e5 2. g4 Qh4# 0-1");
}

#[test]
fn engine_that_fails_to_start_is_recorded_per_game() {
    let mut config = quick(3);
    config.alternate_colors = false;
    config.black = AgentSpec::Uci {
        path: PathBuf::from("/nonexistent/engine-binary"),
        elo: None,
        move_time_ms: 50,
    };
    let batch = run_batch(&config, &CancelToken::new()).unwrap();
    assert!(batch.games.is_empty());
    assert_eq!(
        batch.failures.iter().map(|f| f.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(batch.failures[0].error.contains("black mover"));
    assert!(batch.failures[0].error.contains("/nonexistent/engine-binary"));
    assert!(batch.failures.iter().all(|f| f.first_is_white));
}
