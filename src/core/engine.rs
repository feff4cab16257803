use crate::core::{BatchResult, Pipeline};
use crate::utils::error::Result;

/// Drives a [`Pipeline`] through extract, validate, transform and load.
pub struct SimulationEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SimulationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Compute without writing anything; validation still gates the batch.
    pub async fn simulate(&self) -> Result<BatchResult> {
        tracing::info!("Reading sample sheet...");
        let samples = self.pipeline.extract().await?;
        tracing::info!("Parsed {} samples", samples.len());

        self.pipeline.validate(&samples)?;

        tracing::info!("Computing pipetting volumes...");
        let result = self.pipeline.transform(samples).await?;

        let summary = result.summary();
        tracing::info!(
            "Computed {} samples: {} diluted, {} at target, {} too dilute, {} at minimum volume",
            summary.processed,
            summary.diluted,
            summary.at_target,
            summary.too_dilute,
            summary.minimum_volume
        );
        if summary.off_target() > 0 {
            tracing::warn!(
                "{} samples will not reach the target concentration",
                summary.off_target()
            );
        }

        Ok(result)
    }

    pub async fn run(&self) -> Result<String> {
        let result = self.simulate().await?;

        tracing::info!("Writing protocol...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
