//! Integration tests which evaluate the bundled example scenarios.
use float_cmp::approx_eq;
use mesm::scenario::Scenario;
use mesm::units::Money;
use std::path::PathBuf;

/// Get the path to the example scenario with the given name.
fn get_scenario_dir(name: &str) -> PathBuf {
    PathBuf::from("demos").join(name)
}

/// Without a CO2 cap or add-backs, the two totals agree
#[test]
fn test_simple_scenario_reconciles() {
    let scenario = Scenario::from_path(get_scenario_dir("simple")).unwrap();
    let report = scenario.evaluate().unwrap();

    let reconciliation = report.reconciliation;
    assert!(approx_eq!(
        f64,
        reconciliation.load_weighted_total.value(),
        reconciliation.objective_total.value(),
        epsilon = 1e-6
    ));
    assert_eq!(report.co2.cost, Money(0.0));
    assert_eq!(report.fixed_om_addback, Money(0.0));
    assert_eq!(report.transmission_addback, Money(0.0));
}

/// With a binding CO2 cap, the residual is the CO2 cost plus the hydro revenues, less the fixed
/// O&M which was added back (see `demos/co2_cap/README.txt`)
#[test]
fn test_co2_cap_scenario_residual() {
    let scenario = Scenario::from_path(get_scenario_dir("co2_cap")).unwrap();
    let report = scenario.evaluate().unwrap();

    // CCGT: 17000 MW * 2920 h * 0.36 t/MWh; OCGT: 4200 MW * 2920 h * 0.19 t/MWh
    let emissions = 17_000.0 * 2920.0 * 0.36 + 4200.0 * 2920.0 * 0.19;
    assert!(approx_eq!(f64, report.co2.emissions.value(), emissions, epsilon = 1e-6));
    assert!(approx_eq!(f64, report.co2.cost.value(), emissions * 80.0, epsilon = 1e-3));

    // hydro: 0.01 * 2e6 * 8000 MW; ror: 0.02 * 3e6 * 1500 MW
    assert!(approx_eq!(f64, report.fixed_om_addback.value(), 2.5e8, epsilon = 1e-3));
    assert!(report.transmission_addback > Money(0.0));

    let revenues: Money = report.revenues.values().copied().sum();
    let residual = report.reconciliation.residual;
    assert!(residual > Money(0.0));

    // Objective is given to 0.1 currency units
    let co2_from_residual = residual - (revenues - report.fixed_om_addback);
    assert!(approx_eq!(
        f64,
        co2_from_residual.value(),
        report.co2.cost.value(),
        epsilon = 1.0
    ));
    assert!(approx_eq!(
        f64,
        report.explanation.unexplained.value(),
        0.0,
        epsilon = 1.0
    ));
}
