use crate::core::batch::compute_validated;
use crate::core::parser::{parse_samples, template, validate_samples};
use crate::core::{BatchResult, BatchSummary, ConfigProvider, Pipeline, SampleInput, Storage};
use crate::domain::model::{PipetteResult, SimulationConfig};
use crate::domain::ports::TEMPLATE_FILENAME;
use crate::utils::error::{PipetteError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Full record of a run, written as the JSON output format.
#[derive(Debug, Serialize)]
pub struct SimulationReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub config: SimulationConfig,
    pub summary: BatchSummary,
    pub results: &'a [PipetteResult],
}

/// Write the example sample sheet to storage; returns the file name used.
pub async fn write_template<S: Storage>(storage: &S) -> Result<&'static str> {
    tracing::debug!("Writing sample sheet template");
    storage
        .write_file(TEMPLATE_FILENAME, template().as_bytes())
        .await?;
    Ok(TEMPLATE_FILENAME)
}

pub struct ProtocolPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> ProtocolPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// Output files as `(name, contents)` in the configured format order.
    fn render_outputs(&self, result: &BatchResult) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => files.push((
                    self.config.protocol_filename().to_string(),
                    result.to_csv().into_bytes(),
                )),
                "json" => {
                    let report = SimulationReport {
                        generated_at: Utc::now(),
                        config: result.config,
                        summary: result.summary(),
                        results: &result.results,
                    };
                    files.push((
                        self.config.report_filename().to_string(),
                        serde_json::to_vec_pretty(&report)?,
                    ));
                }
                other => {
                    return Err(PipetteError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format".to_string(),
                    })
                }
            }
        }

        Ok(files)
    }

    fn bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for (name, data) in files {
            zip.start_file(name.as_str(), SimpleFileOptions::default())?;
            zip.write_all(data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn output_location(&self, filename: &str) -> String {
        format!("{}/{}", self.config.output_path(), filename)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ProtocolPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SampleInput>> {
        tracing::debug!("Reading sample sheet: {}", self.config.input_file());
        let raw = self.storage.read_file(self.config.input_file()).await?;

        let text = String::from_utf8(raw).map_err(|e| PipetteError::ParseError {
            message: format!("CSV parsing errors: input is not valid UTF-8 ({})", e),
        })?;

        parse_samples(&text)
    }

    fn validate(&self, samples: &[SampleInput]) -> Result<()> {
        let report = validate_samples(samples);
        for error in &report.errors {
            tracing::debug!("Validation: {}", error);
        }
        report.into_result()
    }

    async fn transform(&self, samples: Vec<SampleInput>) -> Result<BatchResult> {
        Ok(compute_validated(&samples, self.config.simulation()))
    }

    async fn load(&self, result: BatchResult) -> Result<String> {
        let files = self.render_outputs(&result)?;

        if self.config.compress_output() {
            let archive_name = self.config.archive_filename();
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = Self::bundle(&files)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(archive_name, &zip_data).await?;

            return Ok(self.output_location(archive_name));
        }

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, data).await?;
        }

        let first = files
            .first()
            .map(|(name, _)| name.as_str())
            .ok_or_else(|| PipetteError::MissingConfigError {
                field: "output_formats".to_string(),
            })?;

        Ok(self.output_location(first))
    }
}
