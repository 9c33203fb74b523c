//! Arena CLI
//!
//! Run refereed games between movers and write the results.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arena::{AgentSpec, ExperimentConfig, ExperimentResults, run_batch};
use arbiter::{CancelToken, ResignationPolicy};
use chrono::Utc;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Chess arena: refereed games between text movers");
    println!();
    println!("Usage:");
    println!("  arena run <experiment.toml> [options]");
    println!("  arena play <white> <black> [options]");
    println!();
    println!("Options:");
    println!("  --games N         number of games");
    println!("  --retries R       failed attempts allowed per turn");
    println!("  --timeout-ms MS   time allowed per reply");
    println!("  --max-plies N     draw after N half-moves");
    println!("  --fen FEN         start position");
    println!("  --accept-resign   let movers resign");
    println!("  --same-colors     do not swap colours between games");
    println!("  --sequential      play one game at a time");
    println!("  --out DIR         write results.json and games.pgn under DIR");
    println!();
    println!("Agents:");
    println!("  random[:SEED]         random legal moves");
    println!("  classical[:DEPTH]     alpha-beta searcher");
    println!("  classical@ELO         alpha-beta searcher at a rough strength");
    println!("  uci:PATH[@ELO]        external UCI engine, e.g. uci:/usr/bin/stockfish@1390");
    println!("  script:e4,Nf3,...     fixed replies");
    println!("  human                 type moves on the terminal");
    println!();
    println!("Examples:");
    println!("  arena play uci:stockfish@1390 classical:3 --games 10");
    println!("  arena run experiments/baseline.toml --out results");
}

fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("{flag} needs a value"))
}

/// Applies command-line overrides on top of an experiment.
fn apply_flags(config: &mut ExperimentConfig, args: &[String]) -> Result<()> {
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--games" | "-g" => {
                config.games = flag_value(args, &mut i, flag)?.parse().context("--games")?
            }
            "--retries" | "-r" => {
                config.game.retry_limit =
                    flag_value(args, &mut i, flag)?.parse().context("--retries")?
            }
            "--timeout-ms" => {
                config.game.move_timeout_ms =
                    Some(flag_value(args, &mut i, flag)?.parse().context("--timeout-ms")?)
            }
            "--max-plies" => {
                config.game.max_plies =
                    Some(flag_value(args, &mut i, flag)?.parse().context("--max-plies")?)
            }
            "--fen" => config.game.start_fen = Some(flag_value(args, &mut i, flag)?.to_string()),
            "--out" | "-o" => config.output_dir = Some(PathBuf::from(flag_value(args, &mut i, flag)?)),
            "--accept-resign" => config.game.resignation = ResignationPolicy::Accept,
            "--same-colors" => config.alternate_colors = false,
            "--sequential" => config.parallel = false,
            other => bail!("unknown option '{other}'"),
        }
        i += 1;
    }
    Ok(())
}

fn run(mut config: ExperimentConfig, flags: &[String]) -> Result<()> {
    apply_flags(&mut config, flags)?;
    config.validate()?;

    let started_at = Utc::now();
    let batch = run_batch(&config, &CancelToken::new())?;
    let results = ExperimentResults::new(&config, started_at, batch);

    println!();
    print!("{}", results.report());

    if let Some(dir) = &config.output_dir {
        let written = results.save(dir)?;
        println!("Results written to {}", written.display());
    }
    if results.games.is_empty()
        && let Some(first) = results.failures.first()
    {
        bail!("no game could be played: {}", first.error);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "run" => {
            let Some(path) = args.get(2) else {
                bail!("run needs an experiment file");
            };
            let config = ExperimentConfig::load(Path::new(path))?;
            run(config, &args[3..])
        }
        "play" => {
            let (Some(white), Some(black)) = (args.get(2), args.get(3)) else {
                bail!("play needs a white and a black agent");
            };
            let white: AgentSpec = white.parse()?;
            let black: AgentSpec = black.parse()?;
            let config = ExperimentConfig::new(format!("{white} vs {black}"), white, black);
            run(config, &args[4..])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command '{other}'")
        }
    }
}
