//! Configuration management for Ising simulations
//!
//! This module handles the YAML configuration structures, their defaults and
//! the validation of everything the simulation core does not check itself.

mod args;

pub use args::Args;

use color_eyre::eyre::{bail, Result, WrapErr};
use ising_mc::{EnsembleKind, LatticeParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure for Ising simulations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub lattice: LatticeConfig,
    #[serde(default)]
    pub simulation: SimulationParams,
    #[serde(default)]
    pub output: OutputParams,
}

/// Lattice geometry and Hamiltonian parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LatticeConfig {
    pub width: usize,
    pub height: usize,
    pub coupling: Option<f64>,
    pub field: Option<f64>,
    pub ensemble: Option<EnsembleKind>,
    pub ratio: Option<f64>,
    pub wavelength: Option<f64>,
}

impl LatticeConfig {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        self.coupling = self.coupling.or(Some(1.0));
        self.field = self.field.or(Some(0.0));
        self.ensemble = self.ensemble.or(Some(EnsembleKind::Free));
        self.ratio = self.ratio.or(Some(0.5));
        self
    }
}

/// Linear temperature sweep, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SweepParams {
    pub start: f64,
    pub step: f64,
    pub stop: f64,
}

impl SweepParams {
    /// Number of temperatures visited. Assumes a validated sweep.
    pub fn n_points(&self) -> usize {
        ((self.stop - self.start) / self.step + 1e-9).floor() as usize + 1
    }

    pub fn temperatures(&self) -> Vec<f64> {
        (0..self.n_points())
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }
}

/// Monte Carlo run parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationParams {
    pub temperature: Option<f64>,
    pub equilibration_steps: Option<u64>,
    pub production_steps: Option<u64>,
    pub print_freq: Option<u64>,
    pub seed: Option<u64>,
    pub sweep: Option<SweepParams>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            temperature: Some(2.0),
            equilibration_steps: Some(100_000),
            production_steps: Some(100_000),
            print_freq: Some(1000),
            seed: None,
            sweep: None,
        }
    }
}

impl SimulationParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.temperature.is_none() {
            self.temperature = defaults.temperature;
        }
        if self.equilibration_steps.is_none() {
            self.equilibration_steps = defaults.equilibration_steps;
        }
        if self.production_steps.is_none() {
            self.production_steps = defaults.production_steps;
        }
        if self.print_freq.is_none() {
            self.print_freq = defaults.print_freq;
        }
        self
    }
}

/// Report file parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputParams {
    pub file_key: Option<String>,
    pub correlation: Option<bool>,
    pub structure_function: Option<bool>,
}

impl Default for OutputParams {
    fn default() -> Self {
        OutputParams {
            file_key: Some("ising".to_string()),
            correlation: Some(false),
            structure_function: Some(false),
        }
    }
}

impl OutputParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.file_key.is_none() {
            self.file_key = defaults.file_key;
        }
        if self.correlation.is_none() {
            self.correlation = defaults.correlation;
        }
        if self.structure_function.is_none() {
            self.structure_function = defaults.structure_function;
        }
        self
    }
}

impl Config {
    /// Load a configuration file and fill in defaults. Validation is left to
    /// the caller so command-line overrides can be applied first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Unable to read configuration file: {}", path.display()))?;

        let config = serde_yml::from_str::<Config>(&content)
            .wrap_err("Failed to parse configuration file")?
            .with_defaults();
        Ok(config)
    }

    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        self.lattice = self.lattice.with_defaults();
        self.simulation = self.simulation.with_defaults();
        self.output = self.output.with_defaults();
        self
    }

    /// Command-line values take precedence over the file
    pub fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(temperature) = args.temperature {
            self.simulation.temperature = Some(temperature);
        }
        if let Some(seed) = args.seed {
            self.simulation.seed = Some(seed);
        }
        if let Some(ref key) = args.file_key {
            self.output.file_key = Some(key.clone());
        }
        self
    }

    /// Check run parameters. Lattice parameters are checked by the core at setup.
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;

        if sim.production_steps == Some(0) {
            bail!("Production steps must be positive");
        }
        match (sim.print_freq, sim.production_steps) {
            (Some(0), _) => bail!("Print frequency must be positive"),
            (Some(freq), Some(steps)) if freq > steps => bail!(
                "Print frequency {} exceeds production steps {}, no sample would be recorded",
                freq,
                steps
            ),
            (Some(freq), Some(steps)) if steps % freq != 0 => bail!(
                "Production steps {} are not a multiple of the print frequency {}",
                steps,
                freq
            ),
            _ => {}
        }

        match sim.sweep {
            Some(sweep) => {
                if sweep.step == 0.0 || !sweep.step.is_finite() {
                    bail!("Sweep step must be finite and non-zero");
                }
                if (sweep.stop - sweep.start) / sweep.step < 0.0 {
                    bail!(
                        "Sweep step {} never reaches {} from {}",
                        sweep.step,
                        sweep.stop,
                        sweep.start
                    );
                }
                if sweep.start <= 0.0 || sweep.stop <= 0.0 {
                    bail!("Sweep temperatures must be positive");
                }
            }
            None => {
                if let Some(t) = sim.temperature {
                    if t <= 0.0 {
                        bail!("Temperature must be positive");
                    }
                }
            }
        }

        if self.output.file_key.as_deref() == Some("") {
            bail!("Output file key must not be empty");
        }
        Ok(())
    }

    pub fn lattice_params(&self) -> LatticeParams {
        let defaults = LatticeParams::free(self.lattice.width, self.lattice.height);
        LatticeParams {
            coupling: self.lattice.coupling.unwrap_or(defaults.coupling),
            field: self.lattice.field.unwrap_or(defaults.field),
            ensemble: self.lattice.ensemble.unwrap_or(defaults.ensemble),
            ratio: self.lattice.ratio.unwrap_or(defaults.ratio),
            wavelength: self.lattice.wavelength,
            ..defaults
        }
    }

    /// Temperatures to simulate, in order
    pub fn temperatures(&self) -> Vec<f64> {
        match self.simulation.sweep {
            Some(sweep) => sweep.temperatures(),
            None => vec![self.simulation.temperature.unwrap_or(2.0)],
        }
    }

    pub fn is_sweep(&self) -> bool {
        self.simulation.sweep.is_some()
    }

    pub fn file_key(&self) -> &str {
        self.output.file_key.as_deref().unwrap_or("ising")
    }

    pub fn equilibration_steps(&self) -> u64 {
        self.simulation.equilibration_steps.unwrap_or(100_000)
    }

    pub fn production_steps(&self) -> u64 {
        self.simulation.production_steps.unwrap_or(100_000)
    }

    pub fn print_freq(&self) -> u64 {
        self.simulation.print_freq.unwrap_or(1000)
    }

    pub fn write_correlation(&self) -> bool {
        self.output.correlation.unwrap_or(false)
    }

    pub fn write_structure_function(&self) -> bool {
        self.output.structure_function.unwrap_or(false)
    }
}
