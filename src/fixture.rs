//! Fixtures for tests
//!
//! The fixtures describe a small two-node system (DK and DE) over three hourly snapshots.
use crate::addback::{FixedOMRule, Link, LinkMap};
use crate::co2::Co2Pricing;
use crate::id::{AssetID, IDLike, NodeID};
use crate::reconcile::CurrencyScale;
use crate::scenario::{Scenario, ScenarioParameters};
use crate::series::{Series, Snapshot};
use crate::technology::{Asset, AssetMap, Technology, TechnologyMap};
use crate::units::{
    Capacity, Dimensionless, EmissionsPerEnergy, Hour, Length, Money, MoneyPerCapacity,
    MoneyPerEnergy, Power, Year,
};
use chrono::NaiveDate;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// The snapshot at the given hour of 1 January 2015
pub fn snapshot(hour: u32) -> Snapshot {
    NaiveDate::from_ymd_opt(2015, 1, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Build a series from `(id, [value at hour 0, 1, ...])` pairs
fn series<K, V>(entries: &[(&str, &[f64])], to_value: fn(f64) -> V) -> Series<K, V>
where
    K: IDLike + for<'a> From<&'a str>,
    V: Copy,
{
    let entries = entries.iter().flat_map(|(id, values)| {
        values
            .iter()
            .zip(0..)
            .map(move |(value, hour)| (K::from(*id), snapshot(hour), to_value(*value)))
    });
    Series::from_entries(entries).unwrap()
}

fn technology(id: &str, lifetime: f64, capital_cost: f64, markup: f64) -> Technology {
    Technology {
        id: id.into(),
        lifetime: Year(lifetime),
        discount_rate: Dimensionless(0.07),
        capital_cost: MoneyPerCapacity(capital_cost),
        markup: Dimensionless(markup),
        fuel_cost: MoneyPerEnergy(0.0),
        efficiency: Dimensionless(1.0),
        co2_emissions: EmissionsPerEnergy(0.0),
    }
}

#[fixture]
pub fn technologies() -> TechnologyMap {
    let ocgt = Technology {
        fuel_cost: MoneyPerEnergy(21.6),
        efficiency: Dimensionless(0.39),
        co2_emissions: EmissionsPerEnergy(0.19),
        ..technology("OCGT", 25.0, 560_000.0, 0.033)
    };

    [
        technology("onwind", 30.0, 910_000.0, 0.033),
        technology("solar", 25.0, 425_000.0, 0.03),
        ocgt,
    ]
    .into_iter()
    .map(|technology| (technology.id.clone(), technology))
    .collect()
}

#[fixture]
pub fn assets() -> AssetMap {
    [
        ("DK onwind", "onwind", 200.0),
        ("DE onwind", "onwind", 100.0),
        ("DK OCGT", "OCGT", 100.0),
        ("DK hydro", "hydro", 50.0),
        ("DE hydro", "hydro", 30.0),
        ("DE ror", "ror", 10.0),
    ]
    .into_iter()
    .map(|(id, carrier, capacity)| {
        let id: AssetID = id.into();
        let asset = Asset {
            id: id.clone(),
            bus: id.as_str()[..2].into(),
            carrier: carrier.into(),
            capacity: Capacity(capacity),
        };
        (id, asset)
    })
    .collect()
}

#[fixture]
pub fn dispatch() -> Series<AssetID, Power> {
    series(
        &[
            ("DK OCGT", &[30.0, 60.0, 60.0]),
            ("DK hydro", &[10.0, 0.0, 20.0]),
            ("DE hydro", &[5.0, 5.0, 5.0]),
            ("DE ror", &[2.0, 2.0, 2.0]),
        ],
        Power,
    )
}

#[fixture]
pub fn loads() -> Series<NodeID, Power> {
    series(
        &[("DK", &[100.0, 100.0, 100.0]), ("DE", &[500.0, 500.0, 500.0])],
        Power,
    )
}

#[fixture]
pub fn prices() -> Series<NodeID, MoneyPerEnergy> {
    series(
        &[("DK", &[20.0, 30.0, 40.0]), ("DE", &[50.0, 50.0, 50.0])],
        MoneyPerEnergy,
    )
}

#[fixture]
pub fn links() -> LinkMap {
    [
        ("DK DE", 600.0, 1000.0),
        ("DE SE", 800.0, 500.0),
        ("DE-NO DC", 500.0, 700.0),
    ]
    .into_iter()
    .map(|(id, length, capacity)| {
        let link = Link {
            id: id.into(),
            length: Length(length),
            capacity: Capacity(capacity),
        };
        (link.id.clone(), link)
    })
    .collect()
}

#[fixture]
pub fn scenario(
    technologies: TechnologyMap,
    assets: AssetMap,
    links: LinkMap,
    loads: Series<NodeID, Power>,
    prices: Series<NodeID, MoneyPerEnergy>,
    dispatch: Series<AssetID, Power>,
) -> Scenario {
    let parameters = ScenarioParameters {
        objective: Money(80_000.0),
        currency_scale: CurrencyScale::Billions,
        snapshot_weighting: Hour(1.0),
        co2: Some(Co2Pricing::ShadowPrice { multiplier: -100.0 }),
        transmission: None,
        fixed_om_addback: vec![
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
        ],
        revenue_carriers: vec!["hydro".into(), "ror".into()],
    };

    Scenario {
        parameters,
        technologies,
        assets,
        links,
        loads,
        prices,
        dispatch,
    }
}

