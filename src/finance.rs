//! General functions related to finance.
use crate::error::{CostError, CostResult, ensure_non_negative, ensure_param};
use crate::units::{Dimensionless, MoneyPerCapacity, Year};
use indexmap::IndexMap;
use std::fmt::Display;
use std::hash::Hash;

/// Check that a lifetime and discount rate can be used to annualise a cost
fn check_annuity_inputs(lifetime: Year, discount_rate: Dimensionless) -> CostResult<()> {
    ensure_param!(
        lifetime.is_finite() && lifetime > Year(0.0),
        "Lifetime must be greater than zero (got {lifetime})"
    );
    ensure_param!(
        discount_rate.is_finite() && discount_rate >= Dimensionless(0.0),
        "Discount rate cannot be negative (got {discount_rate})"
    );

    Ok(())
}

/// The annuity factor without validating its inputs
fn annuity_unchecked(lifetime: Year, discount_rate: Dimensionless) -> Dimensionless {
    if discount_rate == Dimensionless(0.0) {
        return Dimensionless(1.0 / lifetime.value());
    }

    // r / (1 - (1 + r)^-n), written so that it stays accurate as r approaches zero
    let n = lifetime.value();
    let r = discount_rate.value();
    Dimensionless(r / -(-n * r.ln_1p()).exp_m1())
}

/// Calculates the annuity factor for an asset with the given lifetime and discount rate.
///
/// This is the fraction of the overnight capital cost which is charged every year so that the
/// payments over the asset's lifetime, discounted at `discount_rate`, repay the investment. For a
/// zero discount rate this falls back to straight-line depreciation (`1 / lifetime`).
///
/// For example, `annuity(20, 0.05) * 20 ≈ 1.6`.
///
/// # Errors
///
/// Returns [`CostError::InvalidParameter`] if `lifetime <= 0` or `discount_rate < 0`.
pub fn annuity(lifetime: Year, discount_rate: Dimensionless) -> CostResult<Dimensionless> {
    check_annuity_inputs(lifetime, discount_rate)?;
    Ok(annuity_unchecked(lifetime, discount_rate))
}

/// Calculates the annuity factor for each entry in a collection of discount rates.
///
/// The zero-rate branch is selected separately for each entry. The whole collection is rejected
/// if any rate is invalid.
pub fn annuity_per_entry<K>(
    lifetime: Year,
    discount_rates: &IndexMap<K, Dimensionless>,
) -> CostResult<IndexMap<K, Dimensionless>>
where
    K: Clone + Eq + Hash + Display,
{
    discount_rates
        .iter()
        .map(|(key, &rate)| {
            let factor = annuity(lifetime, rate).map_err(|err| match err {
                CostError::InvalidParameter(msg) => {
                    CostError::InvalidParameter(format!("{key}: {msg}"))
                }
                other => other,
            })?;
            Ok((key.clone(), factor))
        })
        .collect()
}

/// Calculates the annualised capital cost per unit of capacity.
///
/// The overnight `capital_cost` is amortised with [`annuity`] and then marked up by
/// `fixed_cost_markup`, which is the yearly fixed operating cost expressed as a fraction of the
/// capital cost (e.g. `0.033`).
pub fn annualised_capital_cost(
    capital_cost: MoneyPerCapacity,
    lifetime: Year,
    discount_rate: Dimensionless,
    fixed_cost_markup: Dimensionless,
) -> CostResult<MoneyPerCapacity> {
    ensure_non_negative!(capital_cost, "Capital cost");
    ensure_non_negative!(fixed_cost_markup, "Fixed cost markup");
    let factor = annuity(lifetime, discount_rate)?;

    Ok(factor * capital_cost * (Dimensionless(1.0) + fixed_cost_markup))
}
