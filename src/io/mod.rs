//! Input/Output operations for Ising simulations
//!
//! This module handles logging setup and the plain-text report formats.

mod output;

pub use output::{
    print_averages, print_averages_header, print_correlation, print_data,
    print_structure_function, setup_output, RunLabel,
};
