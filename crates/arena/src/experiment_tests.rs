use arbiter::ResignationPolicy;

use super::*;

#[test]
fn parses_a_full_experiment() {
    let text = r#"
        name = "stockfish-1390 vs classical"
        games = 6
        alternate_colors = false
        output_dir = "results"

        [game]
        retry_limit = 5
        move_timeout_ms = 2000
        max_plies = 300
        resignation = "accept"

        [white]
        kind = "uci"
        path = "/usr/bin/stockfish"
        elo = 1390

        [black]
        kind = "classical"
        depth = 2
    "#;
    let config: ExperimentConfig = toml::from_str(text).unwrap();
    assert_eq!(config.games, 6);
    assert!(!config.alternate_colors);
    assert!(config.parallel);
    assert_eq!(config.output_dir, Some(PathBuf::from("results")));
    assert_eq!(config.game.retry_limit, 5);
    assert_eq!(config.game.move_timeout_ms, Some(2000));
    assert_eq!(config.game.resignation, ResignationPolicy::Accept);
    assert_eq!(
        config.white,
        AgentSpec::Uci {
            path: PathBuf::from("/usr/bin/stockfish"),
            elo: Some(1390),
            move_time_ms: 100,
        }
    );
    assert_eq!(
        config.black,
        AgentSpec::Classical {
            depth: 2,
            elo: None,
            move_time_ms: None,
        }
    );
    config.validate().unwrap();
}

#[test]
fn defaults_fill_missing_sections() {
    let text = r#"
        name = "smoke"
        white = { kind = "random", seed = 3 }
        black = { kind = "script", moves = ["e5", "Nc6"] }
    "#;
    let config: ExperimentConfig = toml::from_str(text).unwrap();
    assert_eq!(config.games, 1);
    assert!(config.alternate_colors);
    assert_eq!(config.game, GameConfig::default());
    assert_eq!(config.white, AgentSpec::Random { seed: Some(3) });
}

#[test]
fn rejects_unknown_fields_and_bad_settings() {
    assert!(toml::from_str::<ExperimentConfig>(
        r#"
        name = "x"
        rounds = 3
        white = { kind = "random" }
        black = { kind = "random" }
        "#
    )
    .is_err());

    let mut config = ExperimentConfig::new(
        "x",
        AgentSpec::Random { seed: None },
        AgentSpec::Human,
    );
    config.games = 0;
    assert!(config.validate().is_err());

    config.games = 1;
    config.game.retry_limit = 0;
    assert!(config.validate().is_err());
}

#[test]
fn shorthand_agent_specs() {
    assert_eq!(
        "random".parse::<AgentSpec>().unwrap(),
        AgentSpec::Random { seed: None }
    );
    assert_eq!(
        "random:42".parse::<AgentSpec>().unwrap(),
        AgentSpec::Random { seed: Some(42) }
    );
    assert_eq!(
        "classical:4".parse::<AgentSpec>().unwrap(),
        AgentSpec::Classical {
            depth: 4,
            elo: None,
            move_time_ms: None,
        }
    );
    assert_eq!(
        "classical@1500".parse::<AgentSpec>().unwrap(),
        AgentSpec::Classical {
            depth: 3,
            elo: Some(1500),
            move_time_ms: None,
        }
    );
    assert_eq!(
        "uci:/opt/sf/stockfish@1390".parse::<AgentSpec>().unwrap(),
        AgentSpec::Uci {
            path: PathBuf::from("/opt/sf/stockfish"),
            elo: Some(1390),
            move_time_ms: 100,
        }
    );
    assert_eq!(
        "script:e4, Nf3,,Bc4".parse::<AgentSpec>().unwrap(),
        AgentSpec::Script {
            moves: vec!["e4".into(), "Nf3".into(), "Bc4".into()]
        }
    );
    assert_eq!("HUMAN".parse::<AgentSpec>().unwrap(), AgentSpec::Human);

    for bad in ["gpt", "random:x", "classical:deep", "uci:", "uci:sf@strong"] {
        assert!(bad.parse::<AgentSpec>().is_err(), "{bad}");
    }
}

#[test]
fn labels() {
    assert_eq!("random:7".parse::<AgentSpec>().unwrap().to_string(), "random:7");
    assert_eq!(
        "classical@1800".parse::<AgentSpec>().unwrap().to_string(),
        "classical@1800"
    );
    assert_eq!(
        "uci:/usr/bin/stockfish@1390"
            .parse::<AgentSpec>()
            .unwrap()
            .to_string(),
        "stockfish@1390"
    );
}

#[test]
fn humans_force_sequential_play() {
    let mut config = ExperimentConfig::new(
        "x",
        AgentSpec::Human,
        AgentSpec::Random { seed: None },
    );
    assert!(!config.runs_in_parallel());
    config.white = AgentSpec::Random { seed: None };
    assert!(config.runs_in_parallel());
    config.parallel = false;
    assert!(!config.runs_in_parallel());
}

#[test]
fn builds_in_process_agents() {
    let agent = AgentSpec::Classical {
        depth: 1,
        elo: None,
        move_time_ms: None,
    }
    .build(0)
    .unwrap();
    assert_eq!(agent.name(), "Classical v1.0");

    let agent = AgentSpec::Script {
        moves: vec!["e4".into()],
    }
    .build(0)
    .unwrap();
    assert_eq!(agent.name(), "script");
}

#[test]
fn classical_move_time_is_optional() {
    let spec: AgentSpec = toml::from_str(
        r#"
        kind = "classical"
        depth = 6
        move_time_ms = 40
    "#,
    )
    .unwrap();
    assert_eq!(
        spec,
        AgentSpec::Classical {
            depth: 6,
            elo: None,
            move_time_ms: Some(40),
        }
    );
    assert_eq!(spec.to_string(), "classical:6");
    assert_eq!(spec.build(0).unwrap().name(), "Classical v1.0");
}

#[test]
fn missing_uci_binary_is_an_error() {
    let spec = AgentSpec::Uci {
        path: PathBuf::from("/nonexistent/engine-binary"),
        elo: None,
        move_time_ms: 50,
    };
    let err = spec.build(0).err().unwrap();
    assert!(format!("{err:#}").contains("/nonexistent/engine-binary"));
}
