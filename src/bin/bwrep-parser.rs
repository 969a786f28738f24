//! StarCraft replay (.rep) decoder CLI
//!
//! A command-line interface for decoding, validating, and summarizing
//! Brood War and Remastered replay files.
//!
//! ## Commands
//!
//! - `info` - Display quick replay metadata
//! - `parse` - Decode a replay with output format options
//! - `validate` - Validate a replay (exit codes for scripting)
//! - `batch` - Process every replay in a directory

use bwrep_parser::{DecoderConfig, ErrorReport, Reliability, Replay, ReplayReport};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// StarCraft replay (.rep) decoder
#[derive(Parser)]
#[command(name = "bwrep-parser")]
#[command(about = "StarCraft: Brood War / Remastered replay (.rep) decoder", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON decoder configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display replay information
    Info {
        /// Path to the replay file
        file: PathBuf,
    },
    /// Decode a replay file
    Parse {
        /// Path to the replay file
        file: PathBuf,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
        /// Include all actions in output
        #[arg(long)]
        actions: bool,
        /// Include build orders in pretty output
        #[arg(long)]
        build_orders: bool,
    },
    /// Validate a replay file (use -v for details)
    Validate {
        /// Path to the replay file
        file: PathBuf,
    },
    /// Decode every .rep file in a directory
    Batch {
        /// Directory containing replay files
        directory: PathBuf,
        /// Output directory for JSON files
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Generate summary report
        #[arg(long)]
        summary: bool,
        /// Continue on errors
        #[arg(long)]
        continue_on_error: bool,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Serialize)]
struct BatchSummary {
    total_files: usize,
    successful: usize,
    failed: usize,
    total_actions: usize,
    reliability_distribution: BTreeMap<String, usize>,
    format_distribution: BTreeMap<String, usize>,
    failures: Vec<BatchFailure>,
}

#[derive(Serialize)]
struct BatchFailure {
    file: String,
    error: ErrorReport,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Info { file } => cmd_info(&file, &config),
        Commands::Parse {
            file,
            output,
            actions,
            build_orders,
        } => cmd_parse(&file, &config, output, actions, build_orders),
        Commands::Validate { file } => cmd_validate(&file, &config, cli.verbose > 0),
        Commands::Batch {
            directory,
            output,
            summary,
            continue_on_error,
        } => cmd_batch(&directory, &config, output.as_deref(), summary, continue_on_error),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> bwrep_parser::Result<DecoderConfig> {
    match path {
        Some(path) => DecoderConfig::from_json_file(path),
        None => Ok(DecoderConfig::default()),
    }
}

fn decode_file(file: &Path, config: &DecoderConfig) -> Option<Replay> {
    match Replay::from_file_with(file, config) {
        Ok(replay) => Some(replay),
        Err(e) => {
            eprintln!("Error ({}): {e}", e.kind());
            None
        }
    }
}

// ============================================================================
// Info Command Implementation
// ============================================================================

fn cmd_info(file: &Path, config: &DecoderConfig) -> ExitCode {
    let Some(replay) = decode_file(file, config) else {
        return ExitCode::FAILURE;
    };

    let header = &replay.header;
    println!("=== Replay Information ===\n");

    println!("Game:");
    println!("  Format: {} (engine version {})", header.format, header.engine_version);
    println!("  Map: {} ({}x{})", header.map_name, header.map_width, header.map_height);
    if !header.game_creator.is_empty() {
        println!("  Creator: {}", header.game_creator);
    }
    println!("  Duration: {} ({} frames)", header.duration(), header.frame_count);
    if let Some(saved) = header.save_time_utc() {
        println!("  Saved: {saved}");
    }

    println!();
    println!("Players:");
    for player in &replay.players {
        let kind = if player.is_human() { "" } else { " [computer]" };
        println!(
            "  {}. {} ({}), team {}{kind}",
            player.id, player.name, player.race, player.team
        );
    }

    println!();
    println!("Decode:");
    println!("  Commands found: {}", replay.actions.len());
    println!("  Reliability: {}", replay.reliability());

    ExitCode::SUCCESS
}

// ============================================================================
// Parse Command Implementation
// ============================================================================

fn cmd_parse(
    file: &Path,
    config: &DecoderConfig,
    output: OutputFormat,
    include_actions: bool,
    include_build_orders: bool,
) -> ExitCode {
    let Some(replay) = decode_file(file, config) else {
        return ExitCode::FAILURE;
    };

    let report = if include_actions {
        replay.report_with_actions()
    } else {
        replay.report()
    };

    match output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Pretty => print_pretty(&report, include_build_orders),
    }

    ExitCode::SUCCESS
}

fn print_json(report: &ReplayReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing output: {e}"),
    }
}

fn print_pretty(report: &ReplayReport, include_build_orders: bool) {
    let header = &report.header;
    println!("=== {} ===", header.map_name);
    println!("{} replay, {} ({} frames)\n", header.format, header.duration, header.frame_count);

    println!("{:<4} {:<25} {:<8} {:>6} {:>6}", "ID", "Player", "Race", "APM", "EAPM");
    for player in &report.players {
        let metrics = report.metrics.get(&player.id).copied().unwrap_or_default();
        println!(
            "{:<4} {:<25} {:<8} {:>6} {:>6}",
            player.id, player.name, player.race, metrics.apm, metrics.eapm
        );
    }

    if include_build_orders {
        for player in &report.players {
            let Some(entries) = report.build_orders.get(&player.id) else {
                continue;
            };
            println!("\nBuild order: {}", player.name);
            for entry in entries {
                println!(
                    "  {:>3}  {}  {}",
                    entry.estimated_supply, entry.timestamp, entry.action_label
                );
            }
        }
    }

    if let Some(actions) = &report.actions {
        println!("\nActions:");
        for action in actions {
            println!("  {action}");
        }
    }

    let quality = &report.data_quality;
    println!(
        "\nData quality: {} ({} commands, {})",
        quality.reliability, quality.commands_found, quality.source
    );
    if let Some(reason) = report.diagnostics.early_termination() {
        println!("  Decoding stopped early: {reason}");
    }
}

// ============================================================================
// Validate Command Implementation
// ============================================================================

fn cmd_validate(file: &Path, config: &DecoderConfig, verbose: bool) -> ExitCode {
    match Replay::from_file_with(file, config) {
        Ok(replay) => {
            let reliability = replay.reliability();
            let valid = reliability != Reliability::Unrecoverable;
            println!(
                "{}: {} (reliability: {reliability})",
                file.display(),
                if valid { "VALID" } else { "INVALID" }
            );

            if verbose {
                let diag = &replay.diagnostics;
                println!("\nChecks:");
                println!("  Header:            [OK]");
                println!(
                    "  Command stream:    {}",
                    match diag.stream_offset {
                        Some(offset) if diag.used_fallback => format!("[WARN] fallback offset {offset}"),
                        Some(offset) => format!("[OK] offset {offset}"),
                        None => "[FAIL] not found".to_string(),
                    }
                );
                println!("  Recognized ratio:  {:.2}", diag.recognized_ratio());
                println!("  Frame markers:     {}", diag.stats.frame_markers);
                println!("  Actions:           {}", replay.actions.len());
                if let Some(reason) = diag.stats.termination {
                    println!("  Stopped at:        {reason} (frame {})", diag.stats.final_frame);
                }
            }

            if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            println!("{}: INVALID", file.display());
            let report = e.report();
            println!("  Kind: {}", report.kind);
            println!("  Error: {}", report.message);
            println!("  Recoverable: {}", if report.recoverable { "yes" } else { "no" });
            if verbose {
                println!("\nSuggested actions:");
                for step in &report.remediation {
                    println!("  - {step}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Batch Command Implementation
// ============================================================================

fn cmd_batch(
    directory: &Path,
    config: &DecoderConfig,
    output_dir: Option<&Path>,
    summary: bool,
    continue_on_error: bool,
) -> ExitCode {
    let replays = find_replays(directory);

    if replays.is_empty() {
        eprintln!("No .rep files found in {}", directory.display());
        return ExitCode::FAILURE;
    }

    eprintln!("Found {} replay files", replays.len());

    if let Some(dir) = output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Failed to create output directory: {e}");
            return ExitCode::FAILURE;
        }
    }

    let mut batch = BatchSummary {
        total_files: replays.len(),
        successful: 0,
        failed: 0,
        total_actions: 0,
        reliability_distribution: BTreeMap::new(),
        format_distribution: BTreeMap::new(),
        failures: Vec::new(),
    };

    for replay_path in &replays {
        let name = replay_path.file_name().unwrap_or_default().to_string_lossy();
        eprint!("Processing {name}... ");

        match Replay::from_file_with(replay_path, config) {
            Ok(replay) => {
                let report = replay.report();
                eprintln!("OK ({})", report.data_quality.reliability);

                batch.successful += 1;
                batch.total_actions += report.data_quality.commands_found;
                *batch
                    .reliability_distribution
                    .entry(report.data_quality.reliability.to_string())
                    .or_insert(0) += 1;
                *batch
                    .format_distribution
                    .entry(report.header.format.to_string())
                    .or_insert(0) += 1;

                if let Some(dir) = output_dir {
                    if let Err(e) = write_report(dir, replay_path, &report) {
                        eprintln!("  failed to write output: {e}");
                    }
                }
            }
            Err(e) => {
                eprintln!("ERROR ({}): {e}", e.kind());
                batch.failed += 1;
                batch.failures.push(BatchFailure {
                    file: name.into_owned(),
                    error: e.report(),
                });
                if !continue_on_error {
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    eprintln!(
        "\nProcessed: {} success, {} errors",
        batch.successful, batch.failed
    );

    if summary {
        print_summary(&batch, output_dir);
    }

    if batch.failed > 0 && !continue_on_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn find_replays(directory: &Path) -> Vec<PathBuf> {
    let mut replays = Vec::new();

    if let Ok(entries) = std::fs::read_dir(directory) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("rep"))
            {
                replays.push(path);
            }
        }
    }

    replays.sort();
    replays
}

fn write_report(dir: &Path, replay: &Path, report: &ReplayReport) -> Result<(), String> {
    let output_file = dir
        .join(replay.file_stem().unwrap_or_default())
        .with_extension("json");
    let content = serde_json::to_string_pretty(report).map_err(|e| e.to_string())?;
    std::fs::write(&output_file, content).map_err(|e| e.to_string())
}

fn print_summary(batch: &BatchSummary, output_dir: Option<&Path>) {
    println!("\n=== Batch Summary ===");
    println!("Files processed: {}", batch.total_files);
    println!("Successful: {}", batch.successful);
    println!("Failed: {}", batch.failed);
    println!("Total actions: {}", batch.total_actions);

    println!("\nReliability:");
    for (tier, count) in &batch.reliability_distribution {
        println!("  {tier}: {count}");
    }

    println!("\nFormat distribution:");
    for (format, count) in &batch.format_distribution {
        println!("  {format}: {count}");
    }

    if !batch.failures.is_empty() {
        println!("\nFailures:");
        for failure in &batch.failures {
            println!("  {} [{}]: {}", failure.file, failure.error.kind, failure.error.message);
        }
    }

    if let Some(dir) = output_dir {
        let summary_file = dir.join("summary.json");
        if let Ok(json) = serde_json::to_string_pretty(batch) {
            if std::fs::write(&summary_file, json).is_ok() {
                println!("\nSummary written to: {}", summary_file.display());
            }
        }
    }
}
