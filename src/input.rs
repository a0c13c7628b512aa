//! Common routines for handling input data.
use crate::id::NodeID;
use crate::scenario::{Scenario, ScenarioParameters};
use crate::series::{Series, Snapshot};
use crate::units::{MoneyPerEnergy, Power};
use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use log::warn;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

pub mod asset;
use asset::read_assets;
pub mod link;
use link::read_links;
pub mod series;
use series::{read_dispatch, read_node_series};
pub mod technology;
use technology::read_technologies;

const LOADS_FILE_NAME: &str = "loads.csv";
const PRICES_FILE_NAME: &str = "marginal_prices.csv";

/// Formats accepted for snapshots
const SNAPSHOT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Read a series of type `T`s from a CSV file.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
///
/// # Returns
///
/// The deserialised rows, or an error if the file could not be read or is empty.
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let rows = read_csv_rows(file_path)?;
    if rows.is_empty() {
        bail!("CSV file {} cannot be empty", file_path.display());
    }

    Ok(rows)
}

/// Read a series of type `T`s from a CSV file, returning an empty `Vec` if the file is absent
pub fn read_csv_optional<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    if !file_path.exists() {
        return Ok(Vec::new());
    }

    read_csv_rows(file_path)
}

fn read_csv_rows<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.with_context(|| input_err_msg(file_path))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a snapshot timestamp
pub fn parse_snapshot(value: &str) -> Result<Snapshot> {
    SNAPSHOT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .with_context(|| format!("Invalid snapshot '{value}': expected e.g. 2015-01-01 00:00:00"))
}

/// Read a snapshot timestamp
pub fn deserialise_snapshot<'de, D>(deserialiser: D) -> Result<Snapshot, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserialiser)?;
    parse_snapshot(&value).map_err(serde::de::Error::custom)
}

/// Read an f64, checking that it is finite
pub fn deserialise_finite<'de, D>(deserialiser: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom("Value must be a finite number"));
    }

    Ok(value)
}

/// Read a scenario from the specified directory.
///
/// # Arguments
///
/// * `scenario_dir` - Folder containing scenario configuration files
pub fn load_scenario(scenario_dir: &Path) -> Result<Scenario> {
    let parameters = ScenarioParameters::from_path(scenario_dir)?;
    let technologies = read_technologies(scenario_dir)?;
    let assets = read_assets(scenario_dir)?;
    let links = read_links(scenario_dir)?;
    let loads: Series<NodeID, Power> = read_node_series(&scenario_dir.join(LOADS_FILE_NAME))?;
    let prices: Series<NodeID, MoneyPerEnergy> =
        read_node_series(&scenario_dir.join(PRICES_FILE_NAME))?;
    let dispatch = read_dispatch(scenario_dir, &assets)?;

    loads
        .check_aligned("loads", &prices, "prices")
        .with_context(|| {
            format!(
                "Error reading {} and {}",
                scenario_dir.join(LOADS_FILE_NAME).display(),
                scenario_dir.join(PRICES_FILE_NAME).display()
            )
        })?;

    for carrier in &parameters.revenue_carriers {
        if !assets.values().any(|asset| asset.carrier == *carrier) {
            warn!("Revenue carrier {carrier} has no assets");
        }
    }
    if parameters.transmission.is_some() && links.is_empty() {
        warn!("Transmission add-back requested, but no links were provided");
    }

    Ok(Scenario {
        parameters,
        technologies,
        assets,
        links,
        loads,
        prices,
        dispatch,
    })
}
