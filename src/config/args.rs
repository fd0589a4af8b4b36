//! Command-line argument parsing for Ising simulations

use clap::Parser;

/// Metropolis Monte Carlo simulation of the 2D Ising model with YAML configuration
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Override log output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Override simulation temperature (ignored when a sweep is configured)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Override random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the key report files are named after
    #[arg(long)]
    pub file_key: Option<String>,
}
