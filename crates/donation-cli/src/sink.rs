//! Where donations end up

use donation_core::{DonationCommand, Result};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Destination of donated data, one JSON object per line
#[derive(Debug, Clone)]
pub enum DonationSink {
    Stdout,
    File(PathBuf),
}

impl DonationSink {
    pub fn new(output: Option<PathBuf>) -> Self {
        match output {
            Some(path) => DonationSink::File(path),
            None => DonationSink::Stdout,
        }
    }

    /// Append `command` as a JSON line
    pub fn write(&self, command: &DonationCommand) -> Result<()> {
        let line = serde_json::to_string(command)?;

        match self {
            DonationSink::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", line)?;
            }
            DonationSink::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{}", line)?;
                info!("Donation {} written to {:?}", command.key, path);
            }
        }

        Ok(())
    }
}
