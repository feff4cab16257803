pub mod batch;
pub mod calculator;
pub mod engine;
pub mod parser;
pub mod pipeline;

pub use crate::domain::model::{BatchResult, BatchSummary, SampleInput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
