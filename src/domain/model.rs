use crate::utils::error::{PipetteError, Result};
use crate::utils::validation::{validate_positive, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_CONCENTRATION: f64 = 20.0;
pub const DEFAULT_MAX_TOTAL_VOLUME: f64 = 50.0;
pub const DEFAULT_VOLUME_PRECISION: f64 = 0.1;

/// One row of the uploaded concentration sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleInput {
    pub sample_id: String,
    /// ng/µL
    pub concentration: f64,
}

impl SampleInput {
    pub fn new(sample_id: impl Into<String>, concentration: f64) -> Self {
        Self {
            sample_id: sample_id.into(),
            concentration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// ng/µL
    pub target_concentration: f64,
    /// µL
    pub max_total_volume: f64,
    /// µL, rounding granularity of every reported volume
    pub volume_precision: f64,
}

impl SimulationConfig {
    pub fn new(
        target_concentration: f64,
        max_total_volume: f64,
        volume_precision: f64,
    ) -> Result<Self> {
        let config = Self {
            target_concentration,
            max_total_volume,
            volume_precision,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            target_concentration: DEFAULT_TARGET_CONCENTRATION,
            max_total_volume: DEFAULT_MAX_TOTAL_VOLUME,
            volume_precision: DEFAULT_VOLUME_PRECISION,
        }
    }
}

impl Validate for SimulationConfig {
    fn validate(&self) -> Result<()> {
        validate_positive("simulation.target_concentration", self.target_concentration)?;
        validate_positive("simulation.max_total_volume", self.max_total_volume)?;
        validate_positive("simulation.volume_precision", self.volume_precision)?;
        Ok(())
    }
}

/// Which step of the dilution pipeline decided the volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DilutionOutcome {
    /// Within tolerance of the target; minimum sample topped up with water.
    AtTarget,
    Diluted,
    /// Too dilute to reach the target inside the volume cap; undiluted sample.
    TooDilute,
    /// Too concentrated for the minimum pipettable volume; ends above target.
    MinimumVolume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipetteResult {
    pub sample_id: String,
    pub sample_volume: f64,
    pub water_volume: f64,
    pub total_volume: f64,
    pub final_concentration: f64,
    pub outcome: DilutionOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(PipetteError::ValidationError {
                errors: self.errors,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub at_target: usize,
    pub diluted: usize,
    pub too_dilute: usize,
    pub minimum_volume: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[PipetteResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.processed += 1;
            match result.outcome {
                DilutionOutcome::AtTarget => summary.at_target += 1,
                DilutionOutcome::Diluted => summary.diluted += 1,
                DilutionOutcome::TooDilute => summary.too_dilute += 1,
                DilutionOutcome::MinimumVolume => summary.minimum_volume += 1,
            }
            summary
        })
    }

    /// Samples whose final concentration is not the target.
    pub fn off_target(&self) -> usize {
        self.too_dilute + self.minimum_volume
    }
}

/// Computed results of one batch, in input order.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub config: SimulationConfig,
    pub results: Vec<PipetteResult>,
}

impl BatchResult {
    pub fn to_csv(&self) -> String {
        crate::core::calculator::serialize_results(&self.results)
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_results(&self.results)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
