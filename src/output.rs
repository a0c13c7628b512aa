//! The module responsible for writing output data to disk.
use crate::id::CarrierID;
use crate::reconcile::CurrencyScale;
use crate::scenario::CostReport;
use crate::units::Money;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;
pub use metadata::write_metadata;

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "mesm_results";

/// The output file name for annualised technology costs
const ANNUALISED_COSTS_FILE_NAME: &str = "annualised_costs.csv";

/// The output file name for the cost summary
const COST_SUMMARY_FILE_NAME: &str = "cost_summary.csv";

/// Get the default output folder for the scenario in the specified directory
pub fn get_output_dir(scenario_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let scenario_dir = scenario_dir
        .canonicalize()
        .context("Could not resolve path to scenario")?;

    let scenario_name = scenario_dir
        .file_name()
        .context("Scenario cannot be in root folder")?
        .to_str()
        .context("Invalid chars in scenario dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory, or reuse an existing one.
///
/// An existing folder which is not empty is only reused if `allow_overwrite` is true.
///
/// # Returns
///
/// Whether an existing, non-empty folder will be overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = fs::read_dir(output_dir)?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to replace its \
             contents."
        );
        return Ok(true);
    }

    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Represents a row in the annualised costs CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct AnnualisedCostRow {
    technology_id: CarrierID,
    annuity_factor: f64,
    annualised_capital_cost: f64,
    marginal_cost: f64,
    installed_capacity: f64,
    annual_capital_cost: f64,
}

/// Represents a row in the cost summary CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SummaryRow {
    item: String,
    value: f64,
    unit: String,
}

impl SummaryRow {
    fn new(item: &str, value: f64, unit: &str) -> Self {
        Self {
            item: item.to_string(),
            value,
            unit: unit.to_string(),
        }
    }

    /// A row for an amount of money, expressed in the given scale
    fn money(item: &str, money: Money, scale: CurrencyScale) -> Self {
        Self::new(item, scale.scale(money), scale.label())
    }
}

/// The rows of the cost summary, in the order they are written
fn summary_rows(report: &CostReport, scale: CurrencyScale) -> Vec<SummaryRow> {
    let mut rows = vec![
        SummaryRow::money("capital_cost", report.capital_cost, scale),
        SummaryRow::money("marginal_cost", report.marginal_cost, scale),
        SummaryRow::money("fixed_om_addback", report.fixed_om_addback, scale),
        SummaryRow::money("transmission_addback", report.transmission_addback, scale),
        SummaryRow::new("co2_price", report.co2.price.value(), "currency/t"),
        SummaryRow::new("co2_emissions", report.co2.emissions.value(), "t"),
        SummaryRow::money("co2_cost", report.co2.cost, scale),
    ];

    rows.extend(report.revenues.iter().map(|(carrier, revenue)| {
        SummaryRow::money(&format!("revenue_{carrier}"), *revenue, scale)
    }));

    let reconciliation = &report.reconciliation;
    let explanation = &report.explanation;
    rows.extend([
        SummaryRow::money(
            "load_weighted_total",
            reconciliation.load_weighted_total,
            scale,
        ),
        SummaryRow::money("objective_total", reconciliation.objective_total, scale),
        SummaryRow::money("residual", reconciliation.residual, scale),
        SummaryRow::money("expected_residual", explanation.expected_residual, scale),
        SummaryRow::money("unexplained_residual", explanation.unexplained, scale),
    ]);

    if let Some(average) = report.average_system_cost {
        rows.push(SummaryRow::new(
            "average_system_cost",
            average.value(),
            "currency/MWh",
        ));
    }

    rows
}

/// Write the annualised costs of each technology to file
fn write_annualised_costs(output_path: &Path, report: &CostReport) -> Result<()> {
    let file_path = output_path.join(ANNUALISED_COSTS_FILE_NAME);
    let mut writer = csv::Writer::from_path(file_path)?;
    for (id, costs) in &report.technology_costs {
        writer.serialize(AnnualisedCostRow {
            technology_id: id.clone(),
            annuity_factor: costs.annuity_factor.value(),
            annualised_capital_cost: costs.annualised_capital_cost.value(),
            marginal_cost: costs.marginal_cost.value(),
            installed_capacity: costs.installed_capacity.value(),
            annual_capital_cost: costs.annual_capital_cost.value(),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the cost summary to file
fn write_cost_summary(output_path: &Path, report: &CostReport, scale: CurrencyScale) -> Result<()> {
    let file_path = output_path.join(COST_SUMMARY_FILE_NAME);
    let mut writer = csv::Writer::from_path(file_path)?;
    for row in summary_rows(report, scale) {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write all results of a scenario evaluation to the specified folder.
///
/// # Arguments
///
/// * `output_path` - Folder where files will be saved
/// * `report` - The evaluated costs
/// * `scale` - The scale in which currency amounts are written
pub fn write_results(output_path: &Path, report: &CostReport, scale: CurrencyScale) -> Result<()> {
    write_annualised_costs(output_path, report)
        .with_context(|| format!("Failed to write {ANNUALISED_COSTS_FILE_NAME}"))?;
    write_cost_summary(output_path, report, scale)
        .with_context(|| format!("Failed to write {COST_SUMMARY_FILE_NAME}"))?;

    Ok(())
}
