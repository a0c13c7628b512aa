//! Defines the `ScenarioParameters` struct, which represents the contents of `scenario.toml`.
use crate::addback::{FixedOMRule, TransmissionParameters};
use crate::co2::Co2Pricing;
use crate::id::CarrierID;
use crate::input::{input_err_msg, read_toml};
use crate::reconcile::CurrencyScale;
use crate::units::{Hour, Money};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::warn;
use serde::Deserialize;
use std::path::Path;

const SCENARIO_PARAMETERS_FILE_NAME: &str = "scenario.toml";

fn default_snapshot_weighting() -> Hour {
    Hour(1.0)
}

/// Represents the contents of the entire scenario file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ScenarioParameters {
    /// The objective value reported by the optimiser
    pub objective: Money,
    /// The scale in which monetary results are reported
    #[serde(default)]
    pub currency_scale: CurrencyScale,
    /// The number of hours each snapshot represents
    #[serde(default = "default_snapshot_weighting")]
    pub snapshot_weighting: Hour,
    /// How CO2 is priced. If absent, no CO2 constraint was active.
    #[serde(default)]
    pub co2: Option<Co2Pricing>,
    /// Assumptions for the transmission add-back.
    ///
    /// If absent, transmission was optimised endogenously and nothing is added back.
    #[serde(default)]
    pub transmission: Option<TransmissionParameters>,
    /// Fixed O&M charged for carriers whose capital cost was zeroed in the optimiser
    #[serde(default)]
    pub fixed_om_addback: Vec<FixedOMRule>,
    /// Carriers whose market revenues help explain the residual
    #[serde(default)]
    pub revenue_carriers: Vec<CarrierID>,
}

impl ScenarioParameters {
    /// Read a scenario file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing scenario files
    ///
    /// # Returns
    ///
    /// The scenario file contents as a [`ScenarioParameters`] struct or an error if the file is
    /// invalid
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<ScenarioParameters> {
        let file_path = scenario_dir.as_ref().join(SCENARIO_PARAMETERS_FILE_NAME);
        let parameters: ScenarioParameters = read_toml(&file_path)?;

        parameters
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(parameters)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        ensure!(
            self.objective.is_finite(),
            "objective must be a finite number"
        );
        ensure!(
            self.snapshot_weighting.is_finite() && self.snapshot_weighting > Hour(0.0),
            "snapshot_weighting must be a positive number"
        );

        if let Some(co2) = &self.co2 {
            co2.price()?;
        }
        if let Some(transmission) = &self.transmission {
            transmission.validate()?;
        }
        for rule in &self.fixed_om_addback {
            rule.validate()?;
        }

        let carriers = self.fixed_om_addback.iter().map(|rule| &rule.carrier);
        if let Some(carrier) = carriers.duplicates().next() {
            warn!("Fixed O&M add-back specified more than once for carrier {carrier}");
        }
        ensure!(
            self.revenue_carriers.iter().all_unique(),
            "revenue_carriers must not contain duplicates"
        );

        Ok(())
    }
}
