//! voxfarm - A deterministic voxel farming sandbox
//!
//! Headless driver: loads a simulation config, replays a command script against a farm
//! session and prints the end-of-run summary.

mod command_script;
mod commands;
mod config;
mod headless;

use anyhow::Result;
use config::SimConfig;
use headless::HeadlessConfig;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let default_level = if args.iter().any(|arg| arg == "--verbose") {
        "info"
    } else {
        "warn"
    };
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var).
    // Logs go to stderr; stdout carries the run summary.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting voxfarm v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(args.into_iter());
    if cli.help {
        print_usage();
        return Ok(());
    }
    if cli.verbose && env::var_os("RUST_LOG").is_some() {
        tracing::warn!("--verbose has no effect while RUST_LOG is set");
    }

    let mut sim = match cli.config.as_deref() {
        Some(path) => SimConfig::load_from_path(path),
        None => SimConfig::load(),
    };
    if let Some(seed) = cli.seed {
        sim.seed = seed;
    }
    if let Some(max_ticks) = cli.max_ticks {
        sim.max_ticks = max_ticks;
    }
    if cli.event_log.is_some() {
        sim.event_log = cli.event_log.clone();
    }
    if cli.summary_log.is_some() {
        sim.summary_log = cli.summary_log.clone();
    }

    if let Some(path) = cli.write_config.as_deref() {
        sim.save_to_path(path)?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    let summary = headless::run(HeadlessConfig {
        sim,
        command_script: cli.script,
        exit_when_script_finished: cli.exit_when_script_finished,
    })?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    help: bool,
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    seed: Option<u64>,
    max_ticks: Option<u64>,
    event_log: Option<PathBuf>,
    summary_log: Option<PathBuf>,
    write_config: Option<PathBuf>,
    exit_when_script_finished: bool,
    verbose: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--verbose" => opts.verbose = true,
                "--exit-when-script-finished" => opts.exit_when_script_finished = true,
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--script" => {
                    if let Some(path) = args.next() {
                        opts.script = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--script requires a file path");
                    }
                }
                "--event-log" => {
                    if let Some(path) = args.next() {
                        opts.event_log = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--event-log requires a file path");
                    }
                }
                "--summary-log" => {
                    if let Some(path) = args.next() {
                        opts.summary_log = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--summary-log requires a file path");
                    }
                }
                "--write-config" => {
                    if let Some(path) = args.next() {
                        opts.write_config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--write-config requires a file path");
                    }
                }
                "--seed" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.seed = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--seed must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--seed requires an integer");
                    }
                }
                "--max-ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.max_ticks = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--max-ticks must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--max-ticks requires an integer");
                    }
                }
                other => tracing::warn!(arg = other, "ignoring unknown argument"),
            }
        }

        opts
    }
}

fn print_usage() {
    println!("Usage: voxfarm [options]");
    println!();
    println!("  --config <path>                 simulation config (default config/voxfarm.toml)");
    println!("  --script <path>                 JSON command script to replay");
    println!("  --seed <u64>                    world seed");
    println!("  --max-ticks <u64>               ticks to simulate");
    println!("  --event-log <path>              write a JSONL event log");
    println!("  --summary-log <path>            append the run summary to a JSONL file");
    println!("  --exit-when-script-finished     stop once the script has run");
    println!("  --write-config <path>           save the effective config and exit");
    println!("  --verbose                       log at info level");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let opts = parse(&[
            "--config",
            "sim.toml",
            "--script",
            "demos/farm_day.json",
            "--seed",
            "42",
            "--max-ticks",
            "100",
            "--event-log",
            "target/events.jsonl",
            "--summary-log",
            "target/summaries.jsonl",
            "--exit-when-script-finished",
            "--verbose",
        ]);
        assert_eq!(
            opts,
            CliOptions {
                config: Some(PathBuf::from("sim.toml")),
                script: Some(PathBuf::from("demos/farm_day.json")),
                seed: Some(42),
                max_ticks: Some(100),
                event_log: Some(PathBuf::from("target/events.jsonl")),
                summary_log: Some(PathBuf::from("target/summaries.jsonl")),
                exit_when_script_finished: true,
                verbose: true,
                ..CliOptions::default()
            }
        );
    }

    #[test]
    fn bad_values_are_ignored() {
        let opts = parse(&["--seed", "abc", "--max-ticks", "-1", "--bogus", "--script"]);
        assert_eq!(opts, CliOptions::default());
    }
}
