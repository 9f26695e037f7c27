// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::SimConfig;
use crate::noise_field::NoiseKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "alien-flight")]
#[command(about = "Arcade flight over endless noise terrain", long_about = None)]
pub struct Cli {
    /// JSON file with simulation parameters
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Noise permutation seed, overrides the config file
    #[arg(long)]
    pub seed: Option<u32>,

    /// Noise algorithm, overrides the config file
    #[arg(long, value_enum)]
    pub noise: Option<NoiseKind>,

    /// Disable the HUD overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Run this many frames without a window, then exit
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<u64>,
}

impl Cli {
    /// Load the config file (or defaults) and apply command-line overrides
    pub fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.noise.seed = seed;
        }
        if let Some(kind) = self.noise {
            config.noise.kind = kind;
        }
        Ok(config)
    }
}
