//! Two independent ways of computing the total system cost, and the gap between them.
//!
//! Path A weights every MWh of served load by the local marginal price. Path B starts from the
//! optimiser's objective and adds back cost components which were deliberately kept out of it.
//! With no binding CO2 cap the two agree; with a cap, consumers also pay the CO2 rent, so the
//! residual `A - B` approximates the CO2 allowance cost. The residual is reported for inspection
//! and is never treated as an error.
use crate::error::{CostResult, ensure_non_negative, ensure_param};
use crate::id::NodeID;
use crate::series::Series;
use crate::units::{Energy, Hour, Money, MoneyPerEnergy, Power};
use serde_string_enum::DeserializeLabeledStringEnum;

/// The scale in which monetary results are reported
#[derive(DeserializeLabeledStringEnum, PartialEq, Debug, Clone, Copy, Default)]
pub enum CurrencyScale {
    /// Plain currency units
    #[string = "units"]
    Units,
    /// Thousands of currency units
    #[string = "thousands"]
    Thousands,
    /// Millions of currency units
    #[string = "millions"]
    Millions,
    /// Billions of currency units
    #[default]
    #[string = "billions"]
    Billions,
}

impl CurrencyScale {
    /// The number of currency units in one unit of this scale
    pub fn divisor(self) -> f64 {
        match self {
            Self::Units => 1.0,
            Self::Thousands => 1e3,
            Self::Millions => 1e6,
            Self::Billions => 1e9,
        }
    }

    /// Express an amount of money in this scale
    pub fn scale(self, money: Money) -> f64 {
        money.value() / self.divisor()
    }

    /// A short name for the scale, used in output files
    pub fn label(self) -> &'static str {
        match self {
            Self::Units => "currency",
            Self::Thousands => "thousand currency",
            Self::Millions => "million currency",
            Self::Billions => "billion currency",
        }
    }
}

/// Inputs to the reconciliation of the two system cost totals
#[derive(Debug, Clone, Copy)]
pub struct ReconciliationInputs<'a> {
    /// Served load at every node and snapshot
    pub loads: &'a Series<NodeID, Power>,
    /// Marginal price at every node and snapshot
    pub prices: &'a Series<NodeID, MoneyPerEnergy>,
    /// Duration represented by each snapshot
    pub snapshot_weighting: Hour,
    /// The optimiser's objective value
    pub objective: Money,
    /// Fixed O&M of assets whose capital cost was zeroed in the optimiser
    pub fixed_om_addback: Money,
    /// Annualised cost of exogenously fixed transmission
    pub transmission_addback: Money,
}

/// The two system cost totals and the residual between them, in currency units
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Reconciliation {
    /// Σ load × price over all nodes and snapshots
    pub load_weighted_total: Money,
    /// Objective plus add-backs
    pub objective_total: Money,
    /// `load_weighted_total - objective_total`
    pub residual: Money,
}

/// Calculate the load-weighted-price total: `Σ load(n, t) * price(n, t) * weighting`.
///
/// # Errors
///
/// Returns [`crate::error::CostError::InvalidParameter`] if the loads and prices do not cover
/// exactly the same nodes and snapshots.
pub fn load_weighted_total(
    loads: &Series<NodeID, Power>,
    prices: &Series<NodeID, MoneyPerEnergy>,
    snapshot_weighting: Hour,
) -> CostResult<Money> {
    ensure_param!(
        snapshot_weighting.is_finite() && snapshot_weighting > Hour(0.0),
        "Snapshot weighting must be positive (got {snapshot_weighting})"
    );
    loads.check_aligned("loads", prices, "prices")?;

    Ok(loads
        .iter()
        .filter_map(|(node, snapshot, load)| {
            prices
                .get(node, &snapshot)
                .map(|price| load * snapshot_weighting * price)
        })
        .sum())
}

/// Compute both system cost totals and the residual between them.
///
/// A non-zero residual is expected whenever a CO2 cap binds (see [`ResidualExplanation`]).
pub fn reconcile(inputs: &ReconciliationInputs) -> CostResult<Reconciliation> {
    ensure_param!(
        inputs.objective.is_finite(),
        "Objective value must be finite (got {})",
        inputs.objective
    );
    ensure_non_negative!(inputs.fixed_om_addback, "Fixed O&M add-back");
    ensure_non_negative!(inputs.transmission_addback, "Transmission add-back");

    let load_weighted_total =
        load_weighted_total(inputs.loads, inputs.prices, inputs.snapshot_weighting)?;
    let objective_total =
        inputs.objective + inputs.fixed_om_addback + inputs.transmission_addback;

    Ok(Reconciliation {
        load_weighted_total,
        objective_total,
        residual: load_weighted_total - objective_total,
    })
}

/// The part of the residual which known cost terms account for.
///
/// Consumers pay the CO2 rent and the revenues of zero-capital-cost assets through the price,
/// while path B charges only those assets' fixed O&M. So
/// `expected = co2_cost + revenues - fixed_om_addback`.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ResidualExplanation {
    /// The CO2 allowance cost
    pub co2_cost: Money,
    /// Market revenues of zero-capital-cost assets
    pub revenues: Money,
    /// The fixed O&M add-back for the same assets
    pub fixed_om_addback: Money,
    /// The residual the terms above predict
    pub expected_residual: Money,
    /// The part of the residual left unexplained
    pub unexplained: Money,
}

impl Reconciliation {
    /// Break the residual down into known terms
    pub fn explain(
        &self,
        co2_cost: Money,
        revenues: Money,
        fixed_om_addback: Money,
    ) -> ResidualExplanation {
        let expected_residual = co2_cost + revenues - fixed_om_addback;
        ResidualExplanation {
            co2_cost,
            revenues,
            fixed_om_addback,
            expected_residual,
            unexplained: self.residual - expected_residual,
        }
    }
}

/// The average cost of serving one MWh of load
pub fn average_system_cost(
    objective: Money,
    loads: &Series<NodeID, Power>,
    snapshot_weighting: Hour,
) -> Option<MoneyPerEnergy> {
    let served: Energy = loads.total() * snapshot_weighting;
    (served > Energy(0.0)).then(|| objective / served)
}
