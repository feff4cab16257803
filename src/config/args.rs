use crate::core::ConfigProvider;
use crate::domain::model::SimulationConfig;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_output_formats, validate_path, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "pipette-sim")]
#[command(about = "Compute pipetting volumes to normalize DNA/RNA samples to a target concentration")]
pub struct CliConfig {
    /// Sample sheet with SampleID and Concentration (ng/µL) columns
    #[arg(short, long, default_value = "samples.csv")]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// ng/µL
    #[arg(long, default_value_t = 20.0)]
    pub target_concentration: f64,

    /// µL
    #[arg(long, default_value_t = 50.0)]
    pub max_total_volume: f64,

    /// µL
    #[arg(long, default_value_t = 0.1)]
    pub volume_precision: f64,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle the output files into a ZIP archive")]
    pub compress: bool,

    #[arg(long, help = "Write the sample sheet template to the output path and exit")]
    pub write_template: bool,

    #[arg(long, help = "Compute and print the protocol without writing files")]
    pub dry_run: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn input_file(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            target_concentration: self.target_concentration,
            max_total_volume: self.max_total_volume,
            volume_precision: self.volume_precision,
        }
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn compress_output(&self) -> bool {
        self.compress
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.simulation().validate()?;
        validate_path("output_path", &self.output_path)?;
        validate_output_formats("formats", &self.formats)?;

        // the template is written without reading any sheet
        if !self.write_template {
            validate_path("input", &self.input)?;
            validate_file_extensions("input", std::slice::from_ref(&self.input), &["csv"])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["pipette-sim", "--input", "plate.csv"]);

        assert_eq!(config.input_file(), "plate.csv");
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.simulation(), SimulationConfig::default());
        assert_eq!(config.output_formats(), &["csv".to_string()]);
        assert!(!config.compress_output());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let config = CliConfig::parse_from([
            "pipette-sim",
            "-i",
            "plate.csv",
            "--target-concentration",
            "15",
            "--max-total-volume",
            "100",
            "--volume-precision",
            "0.5",
            "--formats",
            "csv,json",
            "--compress",
        ]);

        let simulation = config.simulation();
        assert_eq!(simulation.target_concentration, 15.0);
        assert_eq!(simulation.max_total_volume, 100.0);
        assert_eq!(simulation.volume_precision, 0.5);
        assert_eq!(config.formats, vec!["csv", "json"]);
        assert!(config.compress_output());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_non_csv_input() {
        let config = CliConfig::parse_from(["pipette-sim", "-i", "plate.xlsx"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_template_mode_skips_input_checks() {
        let config = CliConfig::parse_from(["pipette-sim", "-i", "", "--write-template"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_zero_precision() {
        let config =
            CliConfig::parse_from(["pipette-sim", "-i", "plate.csv", "--volume-precision", "0"]);
        assert!(config.validate().is_err());
    }
}
