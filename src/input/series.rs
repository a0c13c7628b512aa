//! Code for reading per-node and per-asset time series from CSV files
use super::{deserialise_finite, deserialise_snapshot, input_err_msg, read_csv};
use crate::id::{AssetID, NodeID};
use crate::series::{Series, Snapshot};
use crate::technology::{AssetMap, check_dispatch_assets};
use crate::units::Power;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const DISPATCH_FILE_NAME: &str = "dispatch.csv";

/// A value at one node and snapshot (e.g. a load or marginal price)
#[derive(Deserialize, PartialEq, Debug)]
struct NodeRow {
    #[serde(deserialize_with = "deserialise_snapshot")]
    snapshot: Snapshot,
    bus: NodeID,
    #[serde(deserialize_with = "deserialise_finite")]
    value: f64,
}

/// The output of one asset at one snapshot
#[derive(Deserialize, PartialEq, Debug)]
struct DispatchRow {
    #[serde(deserialize_with = "deserialise_snapshot")]
    snapshot: Snapshot,
    asset_id: AssetID,
    #[serde(deserialize_with = "deserialise_finite")]
    value: f64,
}

/// Read a per-node series (e.g. loads or marginal prices) from the specified CSV file.
///
/// Each `(bus, snapshot)` pair may only appear once.
pub fn read_node_series<V>(file_path: &Path) -> Result<Series<NodeID, V>>
where
    V: Copy + From<f64>,
{
    let rows = read_csv::<NodeRow>(file_path)?;
    let series = Series::from_entries(
        rows.into_iter()
            .map(|row| (row.bus, row.snapshot, V::from(row.value))),
    )
    .with_context(|| input_err_msg(file_path))?;

    Ok(series)
}

/// Read the dispatch of every asset from the specified scenario directory.
///
/// Every asset in the file must be listed in `assets`.
pub fn read_dispatch(scenario_dir: &Path, assets: &AssetMap) -> Result<Series<AssetID, Power>> {
    let file_path = scenario_dir.join(DISPATCH_FILE_NAME);
    let rows = read_csv::<DispatchRow>(&file_path)?;
    let dispatch = Series::from_entries(
        rows.into_iter()
            .map(|row| (row.asset_id, row.snapshot, Power(row.value))),
    )
    .with_context(|| input_err_msg(&file_path))?;

    check_dispatch_assets(&dispatch, assets).with_context(|| input_err_msg(&file_path))?;

    Ok(dispatch)
}
