pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::TomlConfig;
pub use crate::core::{
    batch::run_batch, calculator::PipetteCalculator, engine::SimulationEngine,
    pipeline::ProtocolPipeline,
};
pub use domain::model::{
    BatchResult, BatchSummary, DilutionOutcome, PipetteResult, SampleInput, SimulationConfig,
    ValidationReport,
};
pub use utils::error::{PipetteError, Result};
