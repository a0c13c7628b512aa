//! The scenario struct, which holds everything the optimiser reported for one run, and the
//! computation of its cost report.
use crate::addback::{LinkMap, fixed_om_addback, transmission_addback};
use crate::co2::{Co2Cost, scenario_co2_cost};
use crate::error::{CostError, CostResult};
use crate::id::{AssetID, CarrierID, NodeID};
use crate::input::load_scenario;
use crate::reconcile::{
    Reconciliation, ReconciliationInputs, ResidualExplanation, average_system_cost, reconcile,
};
use crate::revenue::carrier_revenues;
use crate::series::Series;
use crate::technology::{
    AssetMap, TechnologyCosts, TechnologyMap, check_dispatch_assets, technology_costs,
};
use crate::units::{Money, MoneyPerEnergy, Power};
use anyhow::Result;
use indexmap::IndexMap;
use log::{debug, info};
use std::path::Path;

pub mod parameters;
pub use parameters::ScenarioParameters;

/// The inputs for one optimiser run.
#[derive(Debug, PartialEq)]
pub struct Scenario {
    /// Parameters from the scenario file
    pub parameters: ScenarioParameters,
    /// Cost assumptions for each technology
    pub technologies: TechnologyMap,
    /// Optimised assets
    pub assets: AssetMap,
    /// Optimised links
    pub links: LinkMap,
    /// Served load
    pub loads: Series<NodeID, Power>,
    /// Marginal prices
    pub prices: Series<NodeID, MoneyPerEnergy>,
    /// Asset dispatch
    pub dispatch: Series<AssetID, Power>,
}

/// The results of evaluating a scenario, in currency units
#[derive(Debug, PartialEq)]
pub struct CostReport {
    /// Annualised costs of each technology
    pub technology_costs: IndexMap<CarrierID, TechnologyCosts>,
    /// Sum of the technologies' annualised capital costs
    pub capital_cost: Money,
    /// Sum of the technologies' marginal costs
    pub marginal_cost: Money,
    /// Fixed O&M added back for zero-capital-cost carriers
    pub fixed_om_addback: Money,
    /// Annualised transmission cost added back
    pub transmission_addback: Money,
    /// CO2 price, emissions and allowance cost
    pub co2: Co2Cost,
    /// Market revenues of each revenue carrier
    pub revenues: IndexMap<CarrierID, Money>,
    /// The two system cost totals
    pub reconciliation: Reconciliation,
    /// Breakdown of the residual
    pub explanation: ResidualExplanation,
    /// Objective divided by served energy
    pub average_system_cost: Option<MoneyPerEnergy>,
}

impl Scenario {
    /// Read a scenario from the specified directory.
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<Self> {
        load_scenario(scenario_dir.as_ref())
    }

    /// Check that the cost of every asset is accounted for.
    ///
    /// An asset's carrier must have a technology, a fixed O&M add-back rule or be a revenue
    /// carrier. Otherwise its capacity would silently be left out of the capital cost.
    fn check_asset_carriers(&self) -> CostResult<()> {
        for asset in self.assets.values() {
            let carrier = &asset.carrier;
            let is_costed = self.technologies.contains_key(carrier)
                || self
                    .parameters
                    .fixed_om_addback
                    .iter()
                    .any(|rule| rule.carrier == *carrier)
                || self.parameters.revenue_carriers.contains(carrier);
            if !is_costed {
                return Err(CostError::MissingData(format!(
                    "No technology found for carrier {carrier} of asset {}",
                    asset.id
                )));
            }
        }

        Ok(())
    }

    /// Compute annualised costs, add-backs and the reconciliation of the two system cost totals
    pub fn evaluate(&self) -> CostResult<CostReport> {
        let weighting = self.parameters.snapshot_weighting;
        check_dispatch_assets(&self.dispatch, &self.assets)?;
        self.check_asset_carriers()?;

        let technology_costs =
            technology_costs(&self.technologies, &self.assets, &self.dispatch, weighting)?;
        let capital_cost = technology_costs
            .values()
            .map(|costs| costs.annual_capital_cost)
            .sum();
        let marginal_cost = technology_costs
            .values()
            .map(|costs| costs.annual_marginal_cost)
            .sum();

        let fixed_om_addback = fixed_om_addback(&self.parameters.fixed_om_addback, &self.assets)?;
        let transmission_addback = match &self.parameters.transmission {
            Some(parameters) => transmission_addback(parameters, &self.links)?,
            None => Money(0.0),
        };
        debug!("Fixed O&M add-back: {fixed_om_addback}");
        debug!("Transmission add-back: {transmission_addback}");

        let co2 = scenario_co2_cost(
            self.parameters.co2.as_ref(),
            &self.technologies,
            &self.assets,
            &self.dispatch,
            weighting,
        )?;

        let revenues = carrier_revenues(
            &self.parameters.revenue_carriers,
            &self.assets,
            &self.dispatch,
            &self.prices,
            weighting,
        )?;

        let reconciliation = reconcile(&ReconciliationInputs {
            loads: &self.loads,
            prices: &self.prices,
            snapshot_weighting: weighting,
            objective: self.parameters.objective,
            fixed_om_addback,
            transmission_addback,
        })?;
        let explanation = reconciliation.explain(
            co2.cost,
            revenues.values().copied().sum(),
            fixed_om_addback,
        );

        let scale = self.parameters.currency_scale;
        info!(
            "System cost from prices: {:.6} {}; from objective: {:.6} {}",
            scale.scale(reconciliation.load_weighted_total),
            scale.label(),
            scale.scale(reconciliation.objective_total),
            scale.label()
        );
        info!(
            "Residual: {:.6} {} (CO2 allowance cost: {:.6}, unexplained: {:.6})",
            scale.scale(reconciliation.residual),
            scale.label(),
            scale.scale(co2.cost),
            scale.scale(explanation.unexplained)
        );

        Ok(CostReport {
            technology_costs,
            capital_cost,
            marginal_cost,
            fixed_om_addback,
            transmission_addback,
            co2,
            revenues,
            reconciliation,
            explanation,
            average_system_cost: average_system_cost(
                self.parameters.objective,
                &self.loads,
                weighting,
            ),
        })
    }
}
