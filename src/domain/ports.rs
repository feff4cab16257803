use crate::domain::model::{BatchResult, SampleInput, SimulationConfig};
use crate::utils::error::Result;
use async_trait::async_trait;

pub const DEFAULT_PROTOCOL_FILENAME: &str = "pipette_protocol.csv";
pub const DEFAULT_REPORT_FILENAME: &str = "simulation_results.json";
pub const DEFAULT_ARCHIVE_FILENAME: &str = "pipette_protocol.zip";
pub const TEMPLATE_FILENAME: &str = "sample_concentrations_template.csv";

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn simulation(&self) -> SimulationConfig;
    fn output_formats(&self) -> &[String];
    fn compress_output(&self) -> bool;

    fn protocol_filename(&self) -> &str {
        DEFAULT_PROTOCOL_FILENAME
    }

    fn report_filename(&self) -> &str {
        DEFAULT_REPORT_FILENAME
    }

    fn archive_filename(&self) -> &str {
        DEFAULT_ARCHIVE_FILENAME
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SampleInput>>;
    fn validate(&self, samples: &[SampleInput]) -> Result<()>;
    async fn transform(&self, samples: Vec<SampleInput>) -> Result<BatchResult>;
    async fn load(&self, result: BatchResult) -> Result<String>;
}
