//! Output formatting and logging utilities

use color_eyre::eyre::Result;
use ising_mc::ising::analysis::Averages;
use ising_mc::{Histogram, SampleSeries};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::str::FromStr;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, fmt::format::Writer, fmt::layer, fmt::time::FormatTime,
    layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = StdSystemTime::now();
        let duration = now
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        // Format as HH:MM:SS (only seconds precision)
        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup output logging to file or stdout
pub fn setup_output(output_path: Option<&String>, log_level: &str) {
    let level = LevelFilter::from_str(log_level).unwrap_or_else(|_| {
        eprintln!("Unknown log level '{}', using info", log_level);
        LevelFilter::INFO
    });

    match output_path {
        Some(path) => {
            if let Ok(log) = File::create(path) {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false)
                    .with_filter(level);
                Registry::default().with(file_layer).init();
                info!("Output will be written to: {}", path);
            } else {
                eprintln!("Could not create output file: {}", path);
            }
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true)
                .with_filter(level);
            Registry::default().with(stdout_layer).init();
            info!("Output will be printed to stdout");
        }
    }
}

/// Physical parameters printed in front of every data row.
#[derive(Debug, Clone, Copy)]
pub struct RunLabel {
    pub coupling: f64,
    pub temperature: f64,
    pub field: f64,
}

/// One row per recorded sample; sample `i` was taken after `(i + 1) * print_freq`
/// production steps.
pub fn print_data<W: Write>(
    writer: &mut W,
    label: RunLabel,
    series: &SampleSeries,
    print_freq: u64,
) -> Result<()> {
    writeln!(
        writer,
        "{:>14}{:>8}{:>8}{:>8}{:>14}{:>14}",
        "# step", "J", "T", "B", "H", "M"
    )?;
    for (i, (energy, magnetization)) in series.iter().enumerate() {
        writeln!(
            writer,
            "{:>14}{:>8.2}{:>8.2}{:>8.2}{:>14.2}{:>14.6}",
            (i as u64 + 1) * print_freq,
            label.coupling,
            label.temperature,
            label.field,
            energy,
            magnetization
        )?;
    }
    Ok(())
}

pub fn print_averages_header<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "{:>8}{:>8}{:>8}{:>14}{:>14}{:>18}{:>18}{:>14}",
        "J", "T", "B", "<H>", "<M>", "<chi>", "<Cv>", "# of samples"
    )?;
    Ok(())
}

pub fn print_averages<W: Write>(writer: &mut W, label: RunLabel, averages: &Averages) -> Result<()> {
    writeln!(
        writer,
        "{:>8.2}{:>8.2}{:>8.2}{:>14.2}{:>14.6}{:>18.10}{:>18.10}{:>14}",
        label.coupling,
        label.temperature,
        label.field,
        averages.energy,
        averages.magnetization,
        averages.susceptibility,
        averages.heat_capacity,
        averages.samples
    )?;
    Ok(())
}

pub fn print_correlation<W: Write>(writer: &mut W, correlation: &Histogram) -> Result<()> {
    writeln!(writer, "# correlation G(r) = <S(0) S(r)> - <S>^2")?;
    write!(writer, "{}", correlation)?;
    Ok(())
}

pub fn print_structure_function<W: Write>(writer: &mut W, structure: &Histogram) -> Result<()> {
    writeln!(writer, "# structure function S(k) = FT( G(r) )")?;
    write!(writer, "{}", structure)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> RunLabel {
        RunLabel {
            coupling: 1.0,
            temperature: 2.25,
            field: 0.0,
        }
    }

    #[test]
    fn test_print_data_steps() {
        let mut series = SampleSeries::default();
        series.push(-120.0, 0.5);
        series.push(-118.0, 0.25);

        let mut buf = Vec::new();
        print_data(&mut buf, label(), &series, 500).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("# step"));
        let fields: Vec<&str> = lines[2].split_whitespace().collect();
        assert_eq!(fields, vec!["1000", "1.00", "2.25", "0.00", "-118.00", "0.250000"]);
    }

    #[test]
    fn test_print_averages_row() {
        let averages = Averages {
            energy: -200.0,
            magnetization: 0.875,
            susceptibility: 0.0125,
            heat_capacity: 0.5,
            samples: 10,
        };
        let mut buf = Vec::new();
        print_averages_header(&mut buf).unwrap();
        print_averages(&mut buf, label(), &averages).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let row: Vec<&str> = text.lines().nth(1).unwrap().split_whitespace().collect();
        assert_eq!(row[3], "-200.00");
        assert_eq!(row[4], "0.875000");
        assert_eq!(row[5], "0.0125000000");
        assert_eq!(row[7], "10");
    }

    #[test]
    fn test_print_histograms() {
        let mut h = Histogram::new(0.5);
        h.add_data(0.0, 1.5);
        h.add_data(1.0, -0.5);

        let mut buf = Vec::new();
        print_structure_function(&mut buf, &h).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# structure function"));
        assert_eq!(text.lines().count(), 3);
    }
}
