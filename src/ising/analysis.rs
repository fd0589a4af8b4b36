/// Utility functions for analyzing recorded Ising trajectories
use super::driver::SampleSeries;

/// Critical temperature for 2D Ising model (exact result)
/// T_c = 2J / (k_B * ln(1 + √2)) ≈ 2.269 J/k_B
pub fn critical_temperature_2d() -> f64 {
    2.0 / (1.0 + 2.0_f64.sqrt()).ln()
}

/// Theoretical energy per site at T=0 for 2D (all spins aligned, no field)
pub fn energy_per_site_at_zero_temp_2d() -> f64 {
    // Each spin has 4 aligned neighbors, E = -J * 4 / 2 = -2J per site
    -2.0
}

/// Thermodynamic averages over a sample series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Averages {
    /// <H>
    pub energy: f64,
    /// <M>, magnetization per site
    pub magnetization: f64,
    /// (<M^2> - <M>^2) / T
    pub susceptibility: f64,
    /// (<H^2> - <H>^2) / (T^2 N^2)
    pub heat_capacity: f64,
    pub samples: usize,
}

/// Returns `None` for an empty series.
pub fn averages(series: &SampleSeries, temperature: f64, n_spins: usize) -> Option<Averages> {
    if series.is_empty() {
        return None;
    }

    let (mean_energy, mean_energy_squared) = moments(series.energies());
    let (mean_mag, mean_mag_squared) = moments(series.magnetizations());

    let n = n_spins as f64;
    Some(Averages {
        energy: mean_energy,
        magnetization: mean_mag,
        susceptibility: (mean_mag_squared - mean_mag * mean_mag) / temperature,
        heat_capacity: (mean_energy_squared - mean_energy * mean_energy)
            / (temperature * temperature * n * n),
        samples: series.len(),
    })
}

fn moments(samples: &[f64]) -> (f64, f64) {
    let len = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / len;
    let mean_squared = samples.iter().map(|x| x * x).sum::<f64>() / len;
    (mean, mean_squared)
}
