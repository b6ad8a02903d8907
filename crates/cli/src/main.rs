//! Reservation-station issue stage simulator CLI.
//!
//! This binary drives the cycle-level model from JSON inputs:
//! 1. **Run:** Load a workload (dispatch groups, scheduled broadcasts, flushes) and
//!    clock the issue stage until it drains, then print the issue log and statistics.
//! 2. **Config:** Print the effective configuration as JSON, as a starting point for edits.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tomasim_core::config::Config;
use tomasim_core::sim::{Simulator, Workload};
use tomasim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "tomasim",
    author,
    version,
    about = "Reservation-station issue stage simulator",
    long_about = "Clock a Tomasulo-style reservation station against a JSON workload.\n\nSet RUST_LOG=tomasim_core=debug to trace issue, wakeup, and admission events.\n\nExamples:\n  tomasim run -w workload.json\n  tomasim run -w workload.json -c station.json --stats summary select\n  tomasim config > station.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a workload until every instruction has issued.
    Run {
        /// Workload file (JSON).
        #[arg(short, long)]
        workload: PathBuf,

        /// Configuration file (JSON). Built-in defaults when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the cycle limit.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Statistics sections to print (summary, admission, wakeup, select).
        #[arg(long, num_args = 1..)]
        stats: Vec<String>,

        /// Print the final state of the station after the run.
        #[arg(long)]
        dump: bool,

        /// Suppress the per-packet issue log.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the effective configuration as JSON.
    Config {
        /// Configuration file to validate and echo.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            workload,
            config,
            max_cycles,
            stats,
            dump,
            quiet,
        } => cmd_run(&workload, config, max_cycles, &stats, dump, quiet),
        Commands::Config { config } => cmd_config(config),
    }
}

/// Loads the configuration file when one is given, otherwise the defaults. Exits on error.
fn load_config(path: Option<PathBuf>) -> Config {
    path.map_or_else(
        || Ok(Config::default()),
        |p| Config::from_file(&p),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    })
}

/// Runs the simulator until the workload drains, then prints the log and statistics.
///
/// Exits with code 1 on a configuration error, a bus contract violation, or a deadlock.
fn cmd_run(
    workload_path: &Path,
    config: Option<PathBuf>,
    max_cycles: Option<u64>,
    sections: &[String],
    dump: bool,
    quiet: bool,
) {
    let mut config = load_config(config);
    if let Some(limit) = max_cycles {
        config.general.max_cycles = limit;
    }

    if let Some(unknown) = sections
        .iter()
        .find(|s| !STATS_SECTIONS.contains(&s.as_str()))
    {
        eprintln!(
            "Error: unknown stats section '{unknown}' (expected one of: {})",
            STATS_SECTIONS.join(", ")
        );
        process::exit(1);
    }

    let workload = Workload::from_file(workload_path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    println!(
        "[*] Workload: {} ({} groups, {} instructions)",
        workload_path.display(),
        workload.groups.len(),
        workload.instruction_count()
    );
    println!(
        "    Station: N={} K={} B={} P={} arbitration={:?}",
        config.station.capacity,
        config.station.dispatch_width,
        config.station.broadcast_width,
        config.station.issue_ports,
        config.station.arbitration
    );
    println!();

    let mut sim = Simulator::from_config(&config, workload).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let result = sim.run();
    info!(issued = sim.log().len(), "run finished");

    if !quiet {
        for record in sim.log() {
            println!(
                "cycle {:>6}  port {}  slot {:>2}  {}  {} <- {:#x}, {:#x}",
                record.cycle,
                record.port,
                record.packet.slot,
                record.packet.opcode,
                record.packet.dest,
                record.packet.src1,
                record.packet.src2
            );
        }
        println!();
    }

    if dump {
        println!("{}", sim.stage());
    }

    if sections.is_empty() {
        sim.stage().stats().print();
    } else {
        sim.stage().stats().print_sections(sections);
    }

    match result {
        Ok(cycles) => println!("\n[*] Drained in {cycles} cycles"),
        Err(e) => {
            eprintln!("\n[!] {e}");
            process::exit(1);
        }
    }
}

/// Prints the effective configuration as pretty JSON.
fn cmd_config(config: Option<PathBuf>) {
    let config = load_config(config);
    match serde_json::to_string_pretty(&config) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
