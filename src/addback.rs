//! Cost components which are left out of the optimiser's objective and must be added back.
//!
//! Two conventions are covered:
//!
//! * Hydro-like assets (reservoir hydro, pumped hydro, run-of-river) are given a zero capital
//!   cost in the optimiser, so only their fixed operation and maintenance charge is added back.
//! * Transmission capacity may be fixed exogenously, in which case its annualised capital cost
//!   is computed here from the link lengths and optimised capacities.
use crate::error::{CostResult, ensure_non_negative, ensure_param};
use crate::finance::annuity;
use crate::id::{CarrierID, LinkID, define_id_getter};
use crate::technology::{AssetMap, assets_for_carrier};
use crate::units::{
    Capacity, Dimensionless, Length, Money, MoneyPerCapacity, MoneyPerCapacityPerLength, Year,
};
use indexmap::IndexMap;
use log::warn;
use serde::Deserialize;

/// A map of links, keyed by ID
pub type LinkMap = IndexMap<LinkID, Link>;

/// Fixed O&M charged for all assets of one carrier whose capital cost was zeroed
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct FixedOMRule {
    /// The carrier to which the charge applies
    pub carrier: CarrierID,
    /// Yearly charge as a fraction of the unit cost (e.g. 0.01)
    pub rate: Dimensionless,
    /// Overnight cost per unit of capacity
    pub unit_cost: MoneyPerCapacity,
}

impl FixedOMRule {
    /// Check that the rule's rate and unit cost are non-negative
    pub fn validate(&self) -> CostResult<()> {
        ensure_non_negative!(self.rate, format!("Fixed O&M rate for {}", self.carrier));
        ensure_non_negative!(
            self.unit_cost,
            format!("Fixed O&M unit cost for {}", self.carrier)
        );

        Ok(())
    }
}

/// Calculate the fixed O&M which must be added back to the objective.
///
/// For each rule, `rate * unit_cost * capacity` is summed over all assets of the rule's carrier
/// at every node. The result is in currency units; rules matching no assets contribute nothing.
pub fn fixed_om_addback(rules: &[FixedOMRule], assets: &AssetMap) -> CostResult<Money> {
    let mut total = Money(0.0);
    for rule in rules {
        rule.validate()?;

        let capacity: Capacity = assets_for_carrier(assets, &rule.carrier)
            .map(|asset| asset.capacity)
            .sum();
        if capacity == Capacity(0.0) {
            warn!(
                "No installed capacity found for carrier {} in fixed O&M add-back",
                rule.carrier
            );
        }

        total += rule.rate * rule.unit_cost * capacity;
    }

    Ok(total)
}

/// A link between two nodes, as optimised by the solver
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct Link {
    /// The link's ID (e.g. `"DK DE"`)
    pub id: LinkID,
    /// Straight-line length
    pub length: Length,
    /// Optimised capacity
    pub capacity: Capacity,
}
define_id_getter! {Link, LinkID}

/// Chooses which links are charged for in the transmission add-back
#[derive(PartialEq, Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSelector {
    /// Every link
    All,
    /// Links whose ID has exactly this many characters (e.g. `"DK DE"` has five)
    IdLength(usize),
    /// Links whose ID ends with this suffix
    Suffix(String),
}

impl Default for LinkSelector {
    fn default() -> Self {
        Self::IdLength(5)
    }
}

impl LinkSelector {
    /// Whether the link with the given ID is selected
    pub fn matches(&self, id: &LinkID) -> bool {
        match self {
            Self::All => true,
            Self::IdLength(len) => id.as_str().chars().count() == *len,
            Self::Suffix(suffix) => id.as_str().ends_with(suffix.as_str()),
        }
    }
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

define_param_default!(default_km_cost, MoneyPerCapacityPerLength, 400.0);
define_param_default!(default_curve_factor, Dimensionless, 1.25);
define_param_default!(default_converter_cost, MoneyPerCapacity, 150_000.0);
define_param_default!(default_overcapacity, Dimensionless, 1.5);
define_param_default!(default_lifetime, Year, 40.0);
define_param_default!(default_discount_rate, Dimensionless, 0.07);

/// Cost assumptions for the transmission add-back
#[derive(PartialEq, Debug, Clone, Deserialize)]
pub struct TransmissionParameters {
    /// Cost per MW per km of line
    #[serde(default = "default_km_cost")]
    pub km_cost: MoneyPerCapacityPerLength,
    /// Converts straight-line length into routed length
    #[serde(default = "default_curve_factor")]
    pub curve_factor: Dimensionless,
    /// Cost per MW of the converter pair at either end of a DC link
    #[serde(default = "default_converter_cost")]
    pub converter_cost: MoneyPerCapacity,
    /// Overcapacity to approximate n-1 security
    #[serde(default = "default_overcapacity")]
    pub overcapacity: Dimensionless,
    /// Economic lifetime of transmission assets
    #[serde(default = "default_lifetime")]
    pub lifetime: Year,
    /// Discount rate for transmission assets
    #[serde(default = "default_discount_rate")]
    pub discount_rate: Dimensionless,
    /// Yearly fixed O&M as a fraction of the capital cost, added to the annuity factor
    #[serde(default)]
    pub fom_rate: Dimensionless,
    /// Which links to charge for
    #[serde(default)]
    pub selector: LinkSelector,
}

impl Default for TransmissionParameters {
    fn default() -> Self {
        Self {
            km_cost: default_km_cost(),
            curve_factor: default_curve_factor(),
            converter_cost: default_converter_cost(),
            overcapacity: default_overcapacity(),
            lifetime: default_lifetime(),
            discount_rate: default_discount_rate(),
            fom_rate: Dimensionless(0.0),
            selector: LinkSelector::default(),
        }
    }
}

impl TransmissionParameters {
    /// Check that all cost assumptions are non-negative and the annuity is well defined
    pub fn validate(&self) -> CostResult<()> {
        ensure_non_negative!(self.km_cost, "Transmission cost per km");
        ensure_non_negative!(self.curve_factor, "Curve factor");
        ensure_non_negative!(self.converter_cost, "Converter cost");
        ensure_non_negative!(self.fom_rate, "Transmission FOM rate");
        ensure_param!(
            self.overcapacity.is_finite() && self.overcapacity >= Dimensionless(1.0),
            "Overcapacity factor must be at least 1 (got {})",
            self.overcapacity
        );
        annuity(self.lifetime, self.discount_rate)?;

        Ok(())
    }

    /// The yearly charge as a fraction of the overnight capital cost
    pub fn annual_charge_factor(&self) -> CostResult<Dimensionless> {
        Ok(annuity(self.lifetime, self.discount_rate)? + self.fom_rate)
    }

    /// The overnight capital cost per MW of a single link
    pub fn link_unit_cost(&self, link: &Link) -> MoneyPerCapacity {
        self.km_cost * link.length * self.curve_factor + self.converter_cost
    }
}

/// Calculate the annualised cost of transmission which must be added back to the objective.
///
/// For the selected links this is
/// `Σ (length * km_cost * curve_factor + converter_cost) * capacity * overcapacity * charge`,
/// where `charge` is the transmission annuity factor plus the FOM rate.
pub fn transmission_addback(
    parameters: &TransmissionParameters,
    links: &LinkMap,
) -> CostResult<Money> {
    parameters.validate()?;

    let mut overnight = Money(0.0);
    for link in links.values().filter(|link| parameters.selector.matches(&link.id)) {
        ensure_non_negative!(link.length, format!("Length of link {}", link.id));
        ensure_non_negative!(link.capacity, format!("Capacity of link {}", link.id));
        overnight += parameters.link_unit_cost(link) * link.capacity;
    }

    Ok(overnight * parameters.overcapacity * parameters.annual_charge_factor()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CostError;
    use crate::fixture::{assets, links};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn hydro_rules() -> Vec<FixedOMRule> {
        vec![
            FixedOMRule {
                carrier: "PHS".into(),
                rate: Dimensionless(0.01),
                unit_cost: MoneyPerCapacity(2e6),
            },
            FixedOMRule {
                carrier: "hydro".into(),
                rate: Dimensionless(0.01),
                unit_cost: MoneyPerCapacity(2e6),
            },
            FixedOMRule {
                carrier: "ror".into(),
                rate: Dimensionless(0.02),
                unit_cost: MoneyPerCapacity(3e6),
            },
        ]
    }

    #[rstest]
    fn test_fixed_om_addback(assets: AssetMap) {
        // hydro: 0.01 * 2e6 * (50 + 30); ror: 0.02 * 3e6 * 10; no PHS
        let result = fixed_om_addback(&hydro_rules(), &assets).unwrap();
        assert_approx_eq!(Money, result, Money(1.6e6 + 0.6e6), epsilon = 1e-6);
    }

    #[rstest]
    fn test_fixed_om_addback_no_rules(assets: AssetMap) {
        assert_eq!(fixed_om_addback(&[], &assets).unwrap(), Money(0.0));
    }

    #[rstest]
    fn test_fixed_om_addback_negative_rate(assets: AssetMap) {
        let mut rules = hydro_rules();
        rules[1].rate = Dimensionless(-0.01);
        assert!(matches!(
            fixed_om_addback(&rules, &assets),
            Err(CostError::InvalidParameter(_))
        ));
    }

    #[rstest]
    #[case(LinkSelector::All, "DK DE", true)]
    #[case(LinkSelector::IdLength(5), "DK DE", true)]
    #[case(LinkSelector::IdLength(5), "DK0 0 DE0 0", false)]
    #[case(LinkSelector::Suffix("DC".into()), "DK-DE DC", true)]
    #[case(LinkSelector::Suffix("DC".into()), "DK-DE AC", false)]
    fn test_link_selector(#[case] selector: LinkSelector, #[case] id: &str, #[case] expected: bool) {
        assert_eq!(selector.matches(&id.into()), expected);
    }

    #[rstest]
    fn test_transmission_addback(links: LinkMap) {
        let parameters = TransmissionParameters {
            fom_rate: Dimensionless(0.02),
            ..Default::default()
        };

        // Only "DK DE" and "DE SE" have five-character IDs
        let overnight = (400.0 * 1.25 * 600.0 + 150_000.0) * 1000.0
            + (400.0 * 1.25 * 800.0 + 150_000.0) * 500.0;
        let expected = overnight * 1.5 * (0.07500913887361031 + 0.02);
        let result = transmission_addback(&parameters, &links).unwrap();
        assert_approx_eq!(Money, result, Money(expected), epsilon = 1e-3);
    }

    #[rstest]
    fn test_transmission_addback_no_links_selected(links: LinkMap) {
        let parameters = TransmissionParameters {
            selector: LinkSelector::Suffix("HVDC".into()),
            ..Default::default()
        };
        assert_eq!(
            transmission_addback(&parameters, &links).unwrap(),
            Money(0.0)
        );
    }

    #[rstest]
    fn test_transmission_addback_zero_capacity(mut links: LinkMap) {
        for link in links.values_mut() {
            link.capacity = Capacity(0.0);
        }
        assert_eq!(
            transmission_addback(&TransmissionParameters::default(), &links).unwrap(),
            Money(0.0)
        );
    }

    #[rstest]
    fn test_transmission_addback_negative_length(mut links: LinkMap) {
        links["DK DE"].length = Length(-1.0);
        assert_eq!(
            transmission_addback(&TransmissionParameters::default(), &links).unwrap_err(),
            CostError::InvalidParameter(
                "Length of link DK DE must be a finite, non-negative number (got -1)".into()
            )
        );
    }

    #[rstest]
    #[case(TransmissionParameters { overcapacity: Dimensionless(0.5), ..Default::default() })]
    #[case(TransmissionParameters { lifetime: Year(0.0), ..Default::default() })]
    #[case(TransmissionParameters { discount_rate: Dimensionless(-0.1), ..Default::default() })]
    #[case(TransmissionParameters { km_cost: MoneyPerCapacityPerLength(-400.0), ..Default::default() })]
    fn test_transmission_parameters_invalid(#[case] parameters: TransmissionParameters) {
        assert!(matches!(
            parameters.validate(),
            Err(CostError::InvalidParameter(_))
        ));
    }
}
