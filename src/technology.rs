//! Technologies and the assets built from them.
//!
//! A technology holds the cost assumptions for a carrier (e.g. onshore wind, OCGT). Assets are
//! the optimised capacities the external solver reports for each carrier at each node.
use crate::error::{CostError, CostResult, ensure_non_negative, ensure_param};
use crate::finance::{annualised_capital_cost, annuity};
use crate::id::{AssetID, CarrierID, NodeID, define_id_getter};
use crate::series::{Series, Snapshot};
use crate::units::{
    Capacity, Dimensionless, Emissions, EmissionsPerEnergy, Energy, Hour, Money, MoneyPerCapacity,
    MoneyPerEnergy, Power, Year,
};
use indexmap::IndexMap;
use serde::Deserialize;

/// A map of technologies, keyed by carrier
pub type TechnologyMap = IndexMap<CarrierID, Technology>;

/// A map of assets, keyed by asset ID
pub type AssetMap = IndexMap<AssetID, Asset>;

/// Cost assumptions for a single technology
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct Technology {
    /// The carrier this technology produces, as named by the optimiser
    pub id: CarrierID,
    /// Economic lifetime
    pub lifetime: Year,
    /// Discount rate used to annualise the capital cost
    pub discount_rate: Dimensionless,
    /// Overnight capital cost per MW (or per MWh for energy stores)
    pub capital_cost: MoneyPerCapacity,
    /// Yearly fixed operating cost as a fraction of the capital cost
    #[serde(default)]
    pub markup: Dimensionless,
    /// Fuel cost per MWh of fuel
    #[serde(default)]
    pub fuel_cost: MoneyPerEnergy,
    /// Conversion efficiency from fuel to output
    #[serde(default = "default_efficiency")]
    pub efficiency: Dimensionless,
    /// Emission intensity per MWh of dispatch
    #[serde(default)]
    pub co2_emissions: EmissionsPerEnergy,
}
define_id_getter! {Technology, CarrierID}

fn default_efficiency() -> Dimensionless {
    Dimensionless(1.0)
}

impl Technology {
    /// Check that the cost assumptions are usable
    pub fn validate(&self) -> CostResult<()> {
        annuity(self.lifetime, self.discount_rate)?;
        ensure_non_negative!(self.capital_cost, "Capital cost");
        ensure_non_negative!(self.markup, "Markup");
        ensure_non_negative!(self.fuel_cost, "Fuel cost");
        ensure_non_negative!(self.co2_emissions, "CO2 emission factor");
        ensure_param!(
            self.efficiency > Dimensionless(0.0) && self.efficiency <= Dimensionless(1.0),
            "Efficiency must be in the range (0, 1] (got {})",
            self.efficiency
        );

        Ok(())
    }

    /// The annuity factor for this technology's lifetime and discount rate
    pub fn annuity_factor(&self) -> CostResult<Dimensionless> {
        annuity(self.lifetime, self.discount_rate)
    }

    /// The annualised capital cost per unit of capacity, including the fixed cost markup
    pub fn annualised_capital_cost(&self) -> CostResult<MoneyPerCapacity> {
        annualised_capital_cost(
            self.capital_cost,
            self.lifetime,
            self.discount_rate,
            self.markup,
        )
    }

    /// The cost of producing one MWh of output
    pub fn marginal_cost(&self) -> MoneyPerEnergy {
        self.fuel_cost / self.efficiency
    }

    /// Whether dispatching this technology emits CO2
    pub fn is_emitting(&self) -> bool {
        self.co2_emissions > EmissionsPerEnergy(0.0)
    }
}

/// An optimised asset reported by the solver
#[derive(PartialEq, Debug, Clone)]
pub struct Asset {
    /// The asset's ID (e.g. `"DK onwind"`)
    pub id: AssetID,
    /// The node the asset is connected to
    pub bus: NodeID,
    /// The asset's carrier
    pub carrier: CarrierID,
    /// The installed capacity
    pub capacity: Capacity,
}
define_id_getter! {Asset, AssetID}

/// Derive the node of an asset from its ID.
///
/// Assets are conventionally named `"<node> <carrier>"`, so the node is the first
/// whitespace-delimited token.
pub fn bus_from_asset_id(id: &str) -> CostResult<NodeID> {
    id.split_whitespace()
        .next()
        .map(NodeID::from)
        .ok_or_else(|| CostError::InvalidParameter(format!("Cannot derive node from ID '{id}'")))
}

/// Iterate over the assets of the given carrier
pub fn assets_for_carrier<'a>(
    assets: &'a AssetMap,
    carrier: &'a CarrierID,
) -> impl Iterator<Item = &'a Asset> + 'a {
    assets.values().filter(move |asset| asset.carrier == *carrier)
}

/// Total installed capacity of the given carrier across all nodes
pub fn installed_capacity(assets: &AssetMap, carrier: &CarrierID) -> Capacity {
    assets_for_carrier(assets, carrier)
        .map(|asset| asset.capacity)
        .sum()
}

/// Total energy dispatched by the assets of the given carrier
pub fn dispatched_energy(
    assets: &AssetMap,
    carrier: &CarrierID,
    dispatch: &Series<AssetID, Power>,
    snapshot_weighting: Hour,
) -> Energy {
    assets_for_carrier(assets, carrier)
        .map(|asset| dispatch.total_for(&asset.id) * snapshot_weighting)
        .sum()
}

/// Check that every asset in the dispatch series is a known asset
pub fn check_dispatch_assets<V>(dispatch: &Series<AssetID, V>, assets: &AssetMap) -> CostResult<()>
where
    V: Copy,
{
    for id in dispatch.ids() {
        if !assets.contains_key(id) {
            return Err(CostError::MissingData(format!(
                "Dispatch given for unknown asset {id}"
            )));
        }
    }

    Ok(())
}

/// Annualised cost figures for a single technology
#[derive(PartialEq, Debug, Clone)]
pub struct TechnologyCosts {
    /// The technology's annuity factor
    pub annuity_factor: Dimensionless,
    /// Annualised capital cost per unit of capacity (including markup)
    pub annualised_capital_cost: MoneyPerCapacity,
    /// Marginal cost of dispatch
    pub marginal_cost: MoneyPerEnergy,
    /// Capacity installed across all nodes
    pub installed_capacity: Capacity,
    /// Yearly capital charge for the installed capacity
    pub annual_capital_cost: Money,
    /// Yearly dispatch
    pub dispatched_energy: Energy,
    /// Yearly marginal (fuel) cost of the dispatch
    pub annual_marginal_cost: Money,
    /// Yearly CO2 emissions of the dispatch
    pub emissions: Emissions,
}

/// Calculate the annualised costs of every technology independently.
///
/// Each technology is parameterised only by its own cost assumptions and the assets of its
/// carrier.
pub fn technology_costs(
    technologies: &TechnologyMap,
    assets: &AssetMap,
    dispatch: &Series<AssetID, Power>,
    snapshot_weighting: Hour,
) -> CostResult<IndexMap<CarrierID, TechnologyCosts>> {
    technologies
        .iter()
        .map(|(id, technology)| {
            let annualised_capital_cost = technology
                .annualised_capital_cost()
                .map_err(|err| prefix_error(err, id))?;
            let installed_capacity = installed_capacity(assets, id);
            let dispatched_energy = dispatched_energy(assets, id, dispatch, snapshot_weighting);
            let costs = TechnologyCosts {
                annuity_factor: technology.annuity_factor()?,
                annualised_capital_cost,
                marginal_cost: technology.marginal_cost(),
                installed_capacity,
                annual_capital_cost: annualised_capital_cost * installed_capacity,
                dispatched_energy,
                annual_marginal_cost: dispatched_energy * technology.marginal_cost(),
                emissions: dispatched_energy * technology.co2_emissions,
            };

            Ok((id.clone(), costs))
        })
        .collect()
}

/// Prepend the technology ID to an error message
fn prefix_error(err: CostError, id: &CarrierID) -> CostError {
    match err {
        CostError::InvalidParameter(msg) => {
            CostError::InvalidParameter(format!("Technology {id}: {msg}"))
        }
        CostError::MissingData(msg) => CostError::MissingData(format!("Technology {id}: {msg}")),
    }
}

/// The dispatch of a single asset at each snapshot
pub fn asset_dispatch(
    dispatch: &Series<AssetID, Power>,
    asset: &AssetID,
) -> CostResult<Vec<(Snapshot, Power)>> {
    let values: Vec<_> = dispatch.iter_id(asset).collect();
    if values.is_empty() {
        return Err(CostError::MissingData(format!(
            "No dispatch given for asset {asset}"
        )));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assets, dispatch, technologies};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case("DK onwind", "DK")]
    #[case("DE  OCGT", "DE")]
    #[case("DE", "DE")]
    fn test_bus_from_asset_id(#[case] id: &str, #[case] expected: &str) {
        assert_eq!(bus_from_asset_id(id).unwrap(), NodeID::from(expected));
    }

    #[test]
    fn test_bus_from_asset_id_empty() {
        assert!(matches!(
            bus_from_asset_id("  "),
            Err(CostError::InvalidParameter(_))
        ));
    }

    #[rstest]
    fn test_technology_validate(technologies: TechnologyMap) {
        for technology in technologies.values() {
            technology.validate().unwrap();
        }
    }

    #[rstest]
    #[case(Dimensionless(0.0))]
    #[case(Dimensionless(1.5))]
    fn test_technology_validate_bad_efficiency(
        technologies: TechnologyMap,
        #[case] efficiency: Dimensionless,
    ) {
        let mut technology = technologies["OCGT"].clone();
        technology.efficiency = efficiency;
        assert!(matches!(
            technology.validate(),
            Err(CostError::InvalidParameter(_))
        ));
    }

    #[rstest]
    fn test_marginal_cost(technologies: TechnologyMap) {
        // 21.6 EUR/MWh_th at 39% efficiency
        assert_approx_eq!(
            MoneyPerEnergy,
            technologies["OCGT"].marginal_cost(),
            MoneyPerEnergy(55.38461538461539)
        );
        assert_eq!(technologies["onwind"].marginal_cost(), MoneyPerEnergy(0.0));
    }

    #[rstest]
    fn test_installed_capacity(assets: AssetMap) {
        assert_eq!(installed_capacity(&assets, &"onwind".into()), Capacity(300.0));
        assert_eq!(installed_capacity(&assets, &"solar".into()), Capacity(0.0));
    }

    #[rstest]
    fn test_technology_costs(
        technologies: TechnologyMap,
        assets: AssetMap,
        dispatch: Series<AssetID, Power>,
    ) {
        let costs = technology_costs(&technologies, &assets, &dispatch, Hour(1.0)).unwrap();
        let wind = &costs["onwind"];
        assert_approx_eq!(
            MoneyPerCapacity,
            wind.annualised_capital_cost,
            MoneyPerCapacity(75_753.63689254984),
            epsilon = 1e-6
        );
        assert_approx_eq!(
            Money,
            wind.annual_capital_cost,
            Money(75_753.63689254984 * 300.0),
            epsilon = 1e-4
        );
        assert_eq!(wind.emissions, Emissions(0.0));

        let gas = &costs["OCGT"];
        assert_eq!(gas.dispatched_energy, Energy(150.0));
        assert_approx_eq!(Emissions, gas.emissions, Emissions(28.5));
        assert_approx_eq!(
            Money,
            gas.annual_marginal_cost,
            Money(150.0 * 55.38461538461539),
            epsilon = 1e-8
        );
    }

    #[rstest]
    fn test_technology_costs_invalid(
        mut technologies: TechnologyMap,
        assets: AssetMap,
        dispatch: Series<AssetID, Power>,
    ) {
        technologies["OCGT"].lifetime = Year(0.0);
        assert_eq!(
            technology_costs(&technologies, &assets, &dispatch, Hour(1.0)).unwrap_err(),
            CostError::InvalidParameter(
                "Technology OCGT: Lifetime must be greater than zero (got 0)".into()
            )
        );
    }

    #[rstest]
    fn test_check_dispatch_assets(assets: AssetMap, dispatch: Series<AssetID, Power>) {
        check_dispatch_assets(&dispatch, &assets).unwrap();

        let mut dispatch = dispatch;
        let snapshot = dispatch.snapshots()[0];
        dispatch
            .insert("SE hydro".into(), snapshot, Power(1.0))
            .unwrap();
        assert!(matches!(
            check_dispatch_assets(&dispatch, &assets),
            Err(CostError::MissingData(_))
        ));
    }

    #[rstest]
    fn test_asset_dispatch(dispatch: Series<AssetID, Power>) {
        assert_eq!(asset_dispatch(&dispatch, &"DK OCGT".into()).unwrap().len(), 3);
        assert!(matches!(
            asset_dispatch(&dispatch, &"DK solar".into()),
            Err(CostError::MissingData(_))
        ));
    }
}
