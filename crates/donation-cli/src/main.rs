//! donate - terminal host for the data donation flow
//!
//! Runs one participant's flow: asks for a data download, shows what was
//! found in it and writes the donation only after explicit consent.

use anyhow::{Context, Result};
use clap::Parser;
use donation_core::{run_flow, DonationFlow, ScriptedHost};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

mod config;
mod sink;
mod terminal;

use config::Config;
use sink::DonationSink;
use terminal::TerminalHost;

/// donate - run a data donation flow in the terminal
#[derive(Parser)]
#[command(name = "donate")]
#[command(author, version, about = "Run a data donation flow in the terminal", long_about = None)]
struct Cli {
    /// Participant identifier, part of the donation key
    #[arg(short, long)]
    participant: String,

    /// Platform whose data is requested (overrides the config file)
    #[arg(long)]
    platform: Option<String>,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Locale for prompts
    #[arg(long, value_parser = ["en", "nl"])]
    locale: Option<String>,

    /// Append donations to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replay responses from a JSON file instead of prompting
    #[arg(long)]
    script: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new("%H:%M:%S%.3f".to_string()))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    match run() {
        Ok(()) => process::exit(0),
        Err(e) => {
            error!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => Config::load_or_default(),
    };
    if let Some(platform) = cli.platform {
        config.flow.platform = platform;
    }
    if let Some(locale) = cli.locale {
        config.display.locale = locale;
    }

    let sink = DonationSink::new(cli.output);
    let mut flow = DonationFlow::from_config(&cli.participant, &config.flow);

    let outcome = match cli.script {
        Some(script) => {
            info!("Replaying responses from {:?}", script);
            let json = fs::read_to_string(&script)
                .with_context(|| format!("Failed to read script {:?}", script))?;
            let mut host = ScriptedHost::from_json(&json).context("Invalid response script")?;
            let outcome = run_flow(&mut flow, &mut host)?;
            for donation in host.donations() {
                sink.write(donation)?;
            }
            outcome
        }
        None => {
            let mut host = TerminalHost::new(config.display.locale.clone(), sink);
            run_flow(&mut flow, &mut host)?
        }
    };

    info!("Flow for {} ended: {:?}", cli.participant, outcome);
    Ok(())
}
