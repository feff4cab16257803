//! Dilution volumes from the conservation law `C1 · V1 = C2 · V2`.
//!
//! The total volume `V2` is held at the configured maximum and the sample
//! volume `V1` is solved for, then clamped to what a pipette can physically
//! deliver, then rounded to the configured precision.

use crate::domain::model::{DilutionOutcome, PipetteResult, SampleInput, SimulationConfig};

/// µL, smallest volume the robot can reliably aspirate.
pub const MIN_SAMPLE_VOLUME: f64 = 1.0;

/// ng/µL, samples this close to the target are not diluted.
pub const TARGET_TOLERANCE: f64 = 0.01;

const CONCENTRATION_PRECISION: f64 = 0.01;

pub const PROTOCOL_HEADER: [&str; 3] = ["SampleID", "Volume Sample (µL)", "Volume Water (µL)"];

/// Snap `value` to the nearest multiple of `precision`, halves away from zero.
/// Never returns `-0.0`.
pub fn round_to_precision(value: f64, precision: f64) -> f64 {
    ((value + f64::EPSILON) / precision).round() * precision + 0.0
}

#[derive(Debug, Clone, Copy)]
pub struct PipetteCalculator {
    config: SimulationConfig,
}

impl PipetteCalculator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Volumes for one sample.
    ///
    /// Concentration must be positive; the batch validator is the only gate.
    /// A zero or negative value is logged and run through the clamps as-is.
    pub fn compute_one(&self, sample: &SampleInput) -> PipetteResult {
        let SimulationConfig {
            target_concentration,
            max_total_volume,
            volume_precision,
        } = self.config;
        let original_concentration = sample.concentration;

        if original_concentration <= 0.0 {
            tracing::warn!(
                "Sample {} reached the calculator with concentration {}",
                sample.sample_id,
                original_concentration
            );
        }

        if (original_concentration - target_concentration).abs() < TARGET_TOLERANCE {
            return self.at_target(sample);
        }

        let mut total_volume = max_total_volume;
        let mut sample_volume = (target_concentration * total_volume) / original_concentration;
        let mut water_volume = total_volume - sample_volume;
        let mut outcome = DilutionOutcome::Diluted;

        if sample_volume > max_total_volume {
            tracing::debug!(
                "{}: needs {:.3} µL, capped at {} µL undiluted",
                sample.sample_id,
                sample_volume,
                max_total_volume
            );
            sample_volume = max_total_volume;
            water_volume = 0.0;
            total_volume = max_total_volume;
            outcome = DilutionOutcome::TooDilute;
        }

        if sample_volume < MIN_SAMPLE_VOLUME {
            tracing::debug!(
                "{}: needs {:.3} µL, raised to the {} µL minimum",
                sample.sample_id,
                sample_volume,
                MIN_SAMPLE_VOLUME
            );
            sample_volume = MIN_SAMPLE_VOLUME;
            water_volume = max_total_volume - MIN_SAMPLE_VOLUME;
            total_volume = max_total_volume;
            outcome = DilutionOutcome::MinimumVolume;
        }

        sample_volume = round_to_precision(sample_volume, volume_precision);
        water_volume = round_to_precision(water_volume, volume_precision);
        total_volume = round_to_precision(total_volume, volume_precision);

        // Rounding error goes to the sample side.
        if water_volume < 0.0 {
            water_volume = 0.0;
            sample_volume = total_volume;
        }

        let final_concentration = round_to_precision(
            (original_concentration * sample_volume) / total_volume,
            CONCENTRATION_PRECISION,
        );

        PipetteResult {
            sample_id: sample.sample_id.clone(),
            sample_volume,
            water_volume,
            total_volume,
            final_concentration,
            outcome,
        }
    }

    /// Minimum sample volume topped up with water; final concentration is
    /// reported as the target, not recomputed from the rounded volumes.
    fn at_target(&self, sample: &SampleInput) -> PipetteResult {
        let precision = self.config.volume_precision;
        let sample_volume = round_to_precision(MIN_SAMPLE_VOLUME, precision);
        let water_volume =
            round_to_precision(self.config.max_total_volume - sample_volume, precision);

        PipetteResult {
            sample_id: sample.sample_id.clone(),
            sample_volume,
            water_volume,
            total_volume: round_to_precision(sample_volume + water_volume, precision),
            final_concentration: self.config.target_concentration,
            outcome: DilutionOutcome::AtTarget,
        }
    }

    /// One result per sample, in input order.
    pub fn compute_batch(&self, samples: &[SampleInput]) -> Vec<PipetteResult> {
        samples.iter().map(|sample| self.compute_one(sample)).collect()
    }
}

/// Protocol CSV: identifier, sample volume and water volume per row.
///
/// Identifiers are written unquoted, so an identifier containing a comma
/// produces a row with too many fields.
pub fn serialize_results(results: &[PipetteResult]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(PROTOCOL_HEADER.join(","));

    for result in results {
        lines.push(format!(
            "{},{},{}",
            result.sample_id, result.sample_volume, result.water_volume
        ));
    }

    lines.join("\n")
}
