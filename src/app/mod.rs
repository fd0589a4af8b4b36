mod report;
mod runner;

pub use runner::{build_driver, run_at_temperature};

use self::report::{report_lattice_setup, report_run_summary, write_reports};
use crate::config::{Args, Config};
use crate::io::setup_output;
use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;

pub struct IsingApplication {
    args: Args,
    config: Config,
}

impl IsingApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref(), &self.args.log_level);
        info!("Reading configuration from: {}", self.args.config_file);
        info!("Configuration loaded:\n{:?}", self.config);

        let mut driver = build_driver(&self.config)?;
        report_lattice_setup(driver.lattice());

        let temperatures = self.config.temperatures();
        if self.config.is_sweep() {
            info!("Temperature sweep over {} points", temperatures.len());
        }

        for temperature in temperatures {
            run_at_temperature(&mut driver, &self.config, temperature)?;
            report_run_summary(&driver);
            write_reports(&driver, &self.config)?;
        }

        info!("\nSimulation finished.");
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config = Config::from_file(&args.config_file)?.with_overrides(args);
    config.validate()?;
    Ok(config)
}
