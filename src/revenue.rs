//! Market revenues of individual assets.
//!
//! Assets whose capital cost is excluded from the objective (e.g. hydro) still earn revenue at the
//! local marginal price. That revenue is part of what consumers pay, so it helps explain the gap
//! between the two system cost totals.
use crate::error::{CostError, CostResult};
use crate::id::{AssetID, CarrierID, NodeID};
use crate::series::Series;
use crate::technology::{AssetMap, asset_dispatch, assets_for_carrier};
use crate::units::{Hour, Money, MoneyPerEnergy, Power};
use indexmap::IndexMap;

/// Revenue of a single asset: `Σ price(bus, t) * dispatch(asset, t) * weighting`.
///
/// # Errors
///
/// Returns [`CostError::MissingData`] if the asset has no dispatch, or there is no price at its
/// node for one of its dispatch snapshots.
pub fn asset_revenue(
    asset: &AssetID,
    bus: &NodeID,
    dispatch: &Series<AssetID, Power>,
    prices: &Series<NodeID, MoneyPerEnergy>,
    snapshot_weighting: Hour,
) -> CostResult<Money> {
    let mut revenue = Money(0.0);
    for (snapshot, power) in asset_dispatch(dispatch, asset)? {
        let price = prices.get(bus, &snapshot).ok_or_else(|| {
            CostError::MissingData(format!(
                "No price for node {bus} at {snapshot} (needed for asset {asset})"
            ))
        })?;
        revenue += power * snapshot_weighting * price;
    }

    Ok(revenue)
}

/// Total revenue of all assets of each of the given carriers
pub fn carrier_revenues(
    carriers: &[CarrierID],
    assets: &AssetMap,
    dispatch: &Series<AssetID, Power>,
    prices: &Series<NodeID, MoneyPerEnergy>,
    snapshot_weighting: Hour,
) -> CostResult<IndexMap<CarrierID, Money>> {
    carriers
        .iter()
        .map(|carrier| {
            let mut revenue = Money(0.0);
            for asset in assets_for_carrier(assets, carrier) {
                revenue +=
                    asset_revenue(&asset.id, &asset.bus, dispatch, prices, snapshot_weighting)?;
            }

            Ok((carrier.clone(), revenue))
        })
        .collect()
}
