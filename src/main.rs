//! swipe-sim: replay scripted swipe interactions and print the row state

use anyhow::{Context, Result};
use clap::Parser;

use swipe_reveal::cli::{CliArgs, OutputFormat};
use swipe_reveal::config::SwipeConfig;
use swipe_reveal::sim::{self, Scenario};

fn main() -> Result<()> {
    swipe_reveal::tracing::init();

    let sim_config = CliArgs::parse()
        .into_config()
        .map_err(|e| anyhow::anyhow!(e))?;

    let content = std::fs::read_to_string(&sim_config.scenario)
        .with_context(|| format!("Failed to read {}", sim_config.scenario.display()))?;
    let scenario = Scenario::from_yaml(&content).map_err(|e| anyhow::anyhow!(e))?;

    let config = match (&sim_config.config, &scenario.config) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            SwipeConfig::from_yaml(&content).map_err(|e| anyhow::anyhow!(e))?
        }
        (None, Some(config)) => config.clone(),
        (None, None) => SwipeConfig::load(),
    };

    tracing::info!(
        scenario = %sim_config.scenario.display(),
        steps = scenario.steps.len(),
        "running scenario"
    );
    let reports = sim::run(&scenario, config, sim_config.frame);

    match sim_config.format {
        OutputFormat::Text => print!("{}", sim::render_text(scenario.name.as_deref(), &reports)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    Ok(())
}
