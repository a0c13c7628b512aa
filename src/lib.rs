//! Common functionality for MESM cost evaluation.
//!
//! MESM reads the results of an external capacity-expansion optimiser (the objective value,
//! optimised capacities, dispatch, loads and marginal prices) and computes the annualised costs
//! of each technology, the cost components which must be added back to the objective and a
//! reconciliation of the total system cost computed in two independent ways.
#![warn(missing_docs)]
use dirs::config_dir;
use std::path::PathBuf;

pub mod addback;
pub mod cli;
pub mod co2;
pub mod error;
pub mod finance;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod reconcile;
pub mod revenue;
pub mod scenario;
pub mod series;
pub mod settings;
pub mod technology;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get config dir for program.
///
/// On Linux this is `~/.config/mesm`. If no config dir can be determined, the current folder is
/// used instead.
pub fn get_mesm_config_dir() -> PathBuf {
    let Some(mut config_dir) = config_dir() else {
        return PathBuf::new();
    };

    config_dir.push("mesm");
    config_dir
}
