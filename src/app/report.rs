use crate::config::Config;
use crate::io::{
    print_averages, print_averages_header, print_correlation, print_data,
    print_structure_function, RunLabel,
};
use color_eyre::eyre::{Result, WrapErr};
use ising_mc::ising::analysis::critical_temperature_2d;
use ising_mc::{EnsembleKind, Lattice, MonteCarloDriver, RandomSource};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

pub fn report_lattice_setup(lattice: &Lattice) {
    info!("\nLattice setup:");
    info!("  Size: {} x {} ({} spins)", lattice.width(), lattice.height(), lattice.n_spins());
    info!("  Ensemble: {}", lattice.ensemble());
    info!("  Coupling J = {:.4}, field B = {:.4}", lattice.coupling(), lattice.field());
    if lattice.ensemble() == EnsembleKind::Constrained {
        match lattice.wavelength() {
            Some(k) => info!("  Seeding: cos({} y) profile", k),
            None => info!("  Seeding: down-spin ratio {:.4}", lattice.ratio()),
        }
    }
    info!("  Initial H = {:.4}, M = {:.6}", lattice.hamiltonian(), lattice.magnetization());
}

pub fn report_run_summary<R: RandomSource>(driver: &MonteCarloDriver<R>) {
    let temperature = driver.temperature();
    let t_c = critical_temperature_2d();
    info!("\nRun at T = {:.4} finished (T/T_c = {:.4}, T_c = {:.6})", temperature, temperature / t_c, t_c);
    info!("  Acceptance rate: {:.4}", driver.stats().acceptance_rate());

    match driver.averages() {
        Some(avg) => {
            info!("  <H>   = {:.4}", avg.energy);
            info!("  <M>   = {:.6}", avg.magnetization);
            info!("  chi   = {:.10}", avg.susceptibility);
            info!("  Cv    = {:.10}", avg.heat_capacity);
            info!("  samples: {}", avg.samples);
        }
        None => warn!("  No samples recorded"),
    }
    debug!("Final configuration:\n{}", driver.lattice());
}

/// Per-temperature file key. Sweeps tag every run with its temperature.
pub fn run_file_key(config: &Config, temperature: f64) -> String {
    if config.is_sweep() {
        format!("{}_T{:.4}", config.file_key(), temperature)
    } else {
        config.file_key().to_string()
    }
}

/// Write `<key>.data`, append to `<base>.averaged_data`, and the optional
/// correlation and structure-function files.
pub fn write_reports<R: RandomSource>(driver: &MonteCarloDriver<R>, config: &Config) -> Result<()> {
    let lattice = driver.lattice();
    let key = run_file_key(config, driver.temperature());
    let label = RunLabel {
        coupling: lattice.coupling(),
        temperature: driver.temperature(),
        field: lattice.field(),
    };

    let data_path = format!("{}.data", key);
    let mut data = BufWriter::new(create(&data_path)?);
    print_data(&mut data, label, driver.series(), config.print_freq())?;
    data.flush()?;
    info!("Samples written to {}", data_path);

    if let Some(averages) = driver.averages() {
        let averages_path = format!("{}.averaged_data", config.file_key());
        let is_new = !Path::new(&averages_path).exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&averages_path)
            .wrap_err_with(|| format!("Unable to open {}", averages_path))?;
        let mut writer = BufWriter::new(file);
        if is_new {
            print_averages_header(&mut writer)?;
        }
        print_averages(&mut writer, label, &averages)?;
        writer.flush()?;
        info!("Averages appended to {}", averages_path);
    }

    if config.write_correlation() || config.write_structure_function() {
        let correlation = lattice.correlation();

        if config.write_correlation() {
            let path = format!("{}.correlation", key);
            print_correlation(&mut BufWriter::new(create(&path)?), &correlation)?;
            info!("Correlation function written to {}", path);
        }

        if config.write_structure_function() {
            if lattice.ensemble() == EnsembleKind::Constrained {
                let structure = lattice.structure_function(&correlation)?;
                let path = format!("{}.structureFunction", key);
                print_structure_function(&mut BufWriter::new(create(&path)?), &structure)?;
                info!("Structure function written to {}", path);
            } else {
                warn!("Structure function is only defined for the constrained ensemble, skipped");
            }
        }
    }

    Ok(())
}

fn create(path: &str) -> Result<File> {
    File::create(path).wrap_err_with(|| format!("Unable to create {}", path))
}
