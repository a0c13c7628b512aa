//! Code for reading [Asset]s from a CSV file.
use super::*;
use crate::id::{AssetID, CarrierID, NodeID, collect_unique};
use crate::technology::{Asset, AssetMap, bus_from_asset_id};
use crate::units::Capacity;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;

const ASSETS_FILE_NAME: &str = "assets.csv";

#[derive(Deserialize, PartialEq, Debug)]
struct AssetRaw {
    id: AssetID,
    #[serde(default)]
    bus: Option<NodeID>,
    carrier: CarrierID,
    capacity: Capacity,
}

/// Read assets CSV file from scenario directory.
///
/// # Arguments
///
/// * `scenario_dir` - Folder containing scenario files
///
/// # Returns
///
/// A map of assets, keyed by asset ID.
pub fn read_assets(scenario_dir: &Path) -> Result<AssetMap> {
    let file_path = scenario_dir.join(ASSETS_FILE_NAME);
    let assets_csv = read_csv(&file_path)?;
    read_assets_from_iter(assets_csv.into_iter()).with_context(|| input_err_msg(&file_path))
}

/// Process assets from an iterator.
///
/// If an asset's bus is not given, it is taken from the first word of its ID.
fn read_assets_from_iter<I>(iter: I) -> Result<AssetMap>
where
    I: Iterator<Item = AssetRaw>,
{
    let assets: Vec<_> = iter
        .map(|asset| -> Result<_> {
            ensure!(
                asset.capacity.is_finite() && asset.capacity >= Capacity(0.0),
                "Capacity of asset {} must be a finite, non-negative number",
                asset.id
            );

            let bus = match asset.bus {
                Some(bus) if !bus.as_str().is_empty() => bus,
                _ => bus_from_asset_id(asset.id.as_str())?,
            };

            Ok(Asset {
                id: asset.id,
                bus,
                carrier: asset.carrier,
                capacity: asset.capacity,
            })
        })
        .try_collect()?;

    collect_unique(assets)
}
