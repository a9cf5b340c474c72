//! Command-line argument parsing for the simulator
//!
//! Supports:
//! - Replaying a YAML scenario
//! - Overriding the swipe config from a file
//! - Text or JSON output

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Replay swipe interactions against a simulated row
#[derive(Parser, Debug)]
#[command(
    name = "swipe-sim",
    version,
    about = "Replay swipe interactions against a simulated row"
)]
pub struct CliArgs {
    /// Scenario file (YAML)
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Swipe config file (YAML); takes precedence over the scenario's config
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Frame step in milliseconds used when advancing animations
    #[arg(long, value_name = "MS", default_value_t = 16)]
    pub frame_ms: u64,

    /// Print one JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub scenario: PathBuf,
    pub config: Option<PathBuf>,
    pub frame: Duration,
    pub format: OutputFormat,
}

impl CliArgs {
    /// Convert parsed CLI args into a simulator configuration
    pub fn into_config(self) -> Result<SimConfig, String> {
        if self.frame_ms == 0 {
            return Err("--frame-ms must be at least 1".to_string());
        }
        Ok(SimConfig {
            scenario: self.scenario,
            config: self.config,
            frame: Duration::from_millis(self.frame_ms),
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        })
    }
}
