//! Ising Monte Carlo Command-Line Interface
//!
//! This is the main entry point for running Ising simulations with YAML configuration.

use color_eyre::eyre::Result;

mod app;
mod config;
mod io;

use app::IsingApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    IsingApplication::from_cli()?.run()
}
