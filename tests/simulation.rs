//! End-to-end simulation cycles through the public library API.

use approx::assert_relative_eq;
use ising_mc::ising::analysis::critical_temperature_2d;
use ising_mc::{EnsembleKind, IsingError, LatticeParams, MonteCarloDriver};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn driver(params: &LatticeParams, temperature: f64, seed: u64) -> MonteCarloDriver<StdRng> {
    MonteCarloDriver::new(params, temperature, StdRng::seed_from_u64(seed)).unwrap()
}

/// Equilibrate, then record one sample every `print_freq` steps.
fn cycle(driver: &mut MonteCarloDriver<StdRng>, equilibration: u64, production: u64, print_freq: u64) {
    driver.clear_records();
    driver.run(equilibration, true).unwrap();
    for _ in 0..production / print_freq {
        driver.run(print_freq, false).unwrap();
    }
}

#[test]
fn test_same_seed_same_trajectory() {
    let params = LatticeParams::free(12, 12).with_field(0.1);
    let mut first = driver(&params, 2.2, 77);
    let mut second = driver(&params, 2.2, 77);

    cycle(&mut first, 20_000, 50_000, 500);
    cycle(&mut second, 20_000, 50_000, 500);

    assert_eq!(first.series(), second.series());
    assert_eq!(first.lattice().spins(), second.lattice().spins());
    assert_eq!(first.stats(), second.stats());

    let mut third = driver(&params, 2.2, 78);
    cycle(&mut third, 20_000, 50_000, 500);
    assert_ne!(first.series(), third.series());
}

#[test]
fn test_free_low_temperature_orders() {
    let params = LatticeParams::free(16, 16);
    let mut mc = driver(&params, 1.0, 5);
    cycle(&mut mc, 1_000_000, 100_000, 1000);

    let averages = mc.averages().unwrap();
    assert_eq!(averages.samples, 100);
    assert!(averages.energy / 256.0 < -1.5);
    assert!(mc.stats().acceptance_rate() < 0.5);
    assert_relative_eq!(
        mc.lattice().hamiltonian(),
        mc.lattice().compute_hamiltonian(),
        epsilon = 1e-9,
        max_relative = 1e-9
    );
}

#[test]
fn test_free_high_temperature_disorders() {
    let params = LatticeParams::free(16, 16);
    let mut mc = driver(&params, 10.0, 6);
    assert!(mc.temperature() / critical_temperature_2d() > 4.0);
    cycle(&mut mc, 50_000, 400_000, 1000);

    let averages = mc.averages().unwrap();
    assert!(averages.magnetization.abs() < 0.2);
    assert!(averages.susceptibility >= 0.0);
    assert!(averages.heat_capacity >= 0.0);
    assert!(mc.stats().acceptance_rate() > 0.5);
}

#[test]
fn test_constrained_cycle_with_correlations() {
    let params = LatticeParams::constrained(10, 10).with_ratio(0.3);
    let mut mc = driver(&params, 1.8, 9);
    cycle(&mut mc, 20_000, 20_000, 1000);

    let lattice = mc.lattice();
    assert_eq!(lattice.ensemble(), EnsembleKind::Constrained);
    assert_eq!(lattice.down_spin_count(), 30);
    assert!(mc
        .series()
        .magnetizations()
        .iter()
        .all(|&m| (m - 0.4).abs() < 1e-12));

    let correlation = lattice.correlation();
    assert!(correlation.is_sorted());
    let pairs: usize = correlation.iter().map(|b| b.count()).sum();
    assert_eq!(pairs, 100 * 99 / 2);

    let structure = lattice.structure_function(&correlation).unwrap();
    assert_eq!(structure.len(), 11);
    assert!(structure.is_sorted());
}

#[test]
fn test_temperature_sweep_continues_state() {
    let params = LatticeParams::constrained(8, 8).with_wavelength(1.0);
    let mut mc = driver(&params, 1.0, 31);
    let down = mc.lattice().down_spin_count();

    for temperature in [1.0, 1.5, 2.0, 2.5] {
        mc.set_temperature(temperature).unwrap();
        let before = mc.lattice().spins().to_vec();
        cycle(&mut mc, 5_000, 5_000, 500);

        assert_eq!(mc.series().len(), 10);
        assert_eq!(mc.lattice().down_spin_count(), down);
        assert_ne!(mc.lattice().spins(), before.as_slice());
    }
}

#[test]
fn test_invalid_setups_are_reported() {
    let mut rng = StdRng::seed_from_u64(0);

    let err = MonteCarloDriver::new(&LatticeParams::constrained(5, 5), 2.0, &mut rng).unwrap_err();
    assert!(matches!(err, IsingError::Configuration(_)));

    let free = LatticeParams::free(4, 4);
    let err = MonteCarloDriver::new(&free, 0.0, &mut rng).unwrap_err();
    assert!(matches!(err, IsingError::Configuration(_)));
    assert!(err.to_string().contains("temperature"));
}
