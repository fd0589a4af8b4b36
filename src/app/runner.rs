use crate::config::Config;
use color_eyre::eyre::{Result, WrapErr};
use ising_mc::{MonteCarloDriver, RandomSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Set up the lattice at the first configured temperature with a seeded generator.
pub fn build_driver(config: &Config) -> Result<MonteCarloDriver<StdRng>> {
    let seed = config.simulation.seed.unwrap_or_else(rand::random);
    info!("Random seed: {}", seed);

    let params = config.lattice_params();
    let temperature = config.temperatures()[0];
    MonteCarloDriver::new(&params, temperature, StdRng::seed_from_u64(seed))
        .wrap_err("Failed to set up the lattice")
}

/// Equilibrate and then sample every `print_freq` steps at `temperature`,
/// continuing from the driver's current spin state.
pub fn run_at_temperature<R: RandomSource>(
    driver: &mut MonteCarloDriver<R>,
    config: &Config,
    temperature: f64,
) -> Result<()> {
    driver
        .set_temperature(temperature)
        .wrap_err_with(|| format!("Invalid temperature {}", temperature))?;
    let drift = driver.clear_records();
    debug!("Hamiltonian drift before T = {}: {:e}", temperature, drift);

    let equilibration = config.equilibration_steps();
    info!("\nEquilibrating for {} steps at T = {:.4}...", equilibration, temperature);
    driver.run(equilibration, true)?;

    let print_freq = config.print_freq();
    let chunks = config.production_steps() / print_freq;
    info!(
        "Production: {} samples every {} steps at T = {:.4}",
        chunks, print_freq, temperature
    );
    for _ in 0..chunks {
        driver.run(print_freq, false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> Config {
        serde_yml::from_str::<Config>(yaml).unwrap().with_defaults()
    }

    #[test]
    fn test_production_is_split_by_print_freq() {
        let config = config(
            "lattice:\n  width: 8\n  height: 8\n\
             simulation:\n  equilibration_steps: 200\n  production_steps: 1000\n  print_freq: 100\n  seed: 11\n",
        );
        let mut driver = build_driver(&config).unwrap();

        run_at_temperature(&mut driver, &config, 2.0).unwrap();
        assert_eq!(driver.series().len(), 10);
        assert_eq!(driver.stats().attempted, 1200);

        // the next temperature starts from a cleared record
        run_at_temperature(&mut driver, &config, 3.0).unwrap();
        assert_eq!(driver.series().len(), 10);
        assert_eq!(driver.temperature(), 3.0);
    }

    #[test]
    fn test_seeded_driver_is_reproducible() {
        let config = config("lattice:\n  width: 6\n  height: 6\nsimulation:\n  seed: 99\n");
        let first = build_driver(&config).unwrap();
        let second = build_driver(&config).unwrap();
        assert_eq!(first.lattice().spins(), second.lattice().spins());
    }

    #[test]
    fn test_invalid_lattice_is_reported() {
        let config = config("lattice:\n  width: 5\n  height: 4\n  ensemble: constrained\n");
        assert!(build_driver(&config).is_err());
    }
}
