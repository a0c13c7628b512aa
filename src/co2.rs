//! CO2 allowance costs.
//!
//! When the optimiser enforces a cap on CO2 emissions, the Lagrange multiplier of that constraint
//! is the CO2 price. The cap is a `<=` constraint, which the optimiser reports with a
//! non-positive multiplier, so the price is the negated multiplier.
use crate::error::{CostError, CostResult, ensure_non_negative, ensure_param};
use crate::id::AssetID;
use crate::series::Series;
use crate::technology::{AssetMap, TechnologyMap, dispatched_energy};
use crate::units::{Emissions, EmissionsPerEnergy, Energy, Hour, Money, MoneyPerEmissions, Power};
use serde::Deserialize;

/// Multipliers within this distance of zero on the wrong side are treated as round-off
const MULTIPLIER_TOLERANCE: f64 = 1e-9;

/// How the CO2 price for a scenario is determined
#[derive(PartialEq, Debug, Clone, Copy, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum Co2Pricing {
    /// Use the multiplier the optimiser reported for the CO2 cap
    ShadowPrice {
        /// The raw multiplier, in currency per tonne
        multiplier: f64,
    },
    /// Use a fixed, exogenous CO2 price
    Fixed {
        /// The CO2 price
        price: MoneyPerEmissions,
    },
}

impl Co2Pricing {
    /// The CO2 price this pricing rule implies
    pub fn price(&self) -> CostResult<MoneyPerEmissions> {
        match *self {
            Self::ShadowPrice { multiplier } => shadow_price_from_multiplier(multiplier),
            Self::Fixed { price } => {
                ensure_non_negative!(price, "CO2 price");
                Ok(price)
            }
        }
    }
}

/// Convert the optimiser's multiplier for the CO2 cap into a non-negative CO2 price.
///
/// # Errors
///
/// Returns [`CostError::InvalidParameter`] if the multiplier is not finite or is positive beyond
/// round-off, which is inconsistent with a `<=` cap.
pub fn shadow_price_from_multiplier(multiplier: f64) -> CostResult<MoneyPerEmissions> {
    ensure_param!(
        multiplier.is_finite(),
        "CO2 constraint multiplier must be finite (got {multiplier})"
    );
    ensure_param!(
        multiplier <= MULTIPLIER_TOLERANCE,
        "CO2 constraint multiplier must not be positive for an emissions cap (got {multiplier})"
    );

    Ok(MoneyPerEmissions((-multiplier).max(0.0)))
}

/// Calculate the cost of CO2 allowances for the given dispatch.
///
/// `cost = dispatch * emission_factor * price`. The result is in currency units and is zero
/// whenever the dispatch is zero.
pub fn co2_allowance_cost(
    dispatch: Energy,
    emission_factor: EmissionsPerEnergy,
    price: MoneyPerEmissions,
) -> CostResult<Money> {
    ensure_non_negative!(dispatch, "Dispatch of emitting technology");
    ensure_non_negative!(emission_factor, "CO2 emission factor");
    ensure_non_negative!(price, "CO2 price");

    Ok(dispatch * emission_factor * price)
}

/// The CO2 emitted by a set of technologies and the cost of the corresponding allowances
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Co2Cost {
    /// The CO2 price used
    pub price: MoneyPerEmissions,
    /// Total emissions of all emitting technologies
    pub emissions: Emissions,
    /// Total allowance cost
    pub cost: Money,
}

/// Calculate the allowance cost across all emitting technologies in a scenario
pub fn scenario_co2_cost(
    pricing: Option<&Co2Pricing>,
    technologies: &TechnologyMap,
    assets: &AssetMap,
    dispatch: &Series<AssetID, Power>,
    snapshot_weighting: Hour,
) -> CostResult<Co2Cost> {
    let price = match pricing {
        Some(pricing) => pricing.price()?,
        None => MoneyPerEmissions(0.0),
    };

    let mut result = Co2Cost {
        price,
        ..Default::default()
    };
    for (id, technology) in technologies.iter().filter(|(_, t)| t.is_emitting()) {
        let energy = dispatched_energy(assets, id, dispatch, snapshot_weighting);
        let cost = co2_allowance_cost(energy, technology.co2_emissions, price).map_err(|err| {
            match err {
                CostError::InvalidParameter(msg) => {
                    CostError::InvalidParameter(format!("Technology {id}: {msg}"))
                }
                other => other,
            }
        })?;
        result.emissions += energy * technology.co2_emissions;
        result.cost += cost;
    }

    Ok(result)
}
