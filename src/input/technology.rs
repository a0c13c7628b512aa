//! Code for reading the technologies CSV file
use super::{input_err_msg, read_csv};
use crate::id::collect_unique;
use crate::technology::{Technology, TechnologyMap};
use anyhow::{Context, Result};
use log::warn;
use std::path::Path;

const TECHNOLOGIES_FILE_NAME: &str = "technologies.csv";

/// Read technologies from the specified scenario directory
pub fn read_technologies(scenario_dir: &Path) -> Result<TechnologyMap> {
    let file_path = scenario_dir.join(TECHNOLOGIES_FILE_NAME);
    let technologies = read_csv::<Technology>(&file_path)?;
    read_technologies_from_iter(technologies).with_context(|| input_err_msg(&file_path))
}

fn read_technologies_from_iter<I>(iter: I) -> Result<TechnologyMap>
where
    I: IntoIterator<Item = Technology>,
{
    let technologies = collect_unique(iter)?;
    for (id, technology) in &technologies {
        technology
            .validate()
            .with_context(|| format!("Invalid parameters for technology {id}"))?;

        if technology.discount_rate.value() > 1.0 {
            warn!("Discount rate for technology {id} is greater than 1");
        }
        if technology.fuel_cost.value() == 0.0 && technology.is_emitting() {
            warn!("Technology {id} emits CO2 but has no fuel cost");
        }
    }

    Ok(technologies)
}
