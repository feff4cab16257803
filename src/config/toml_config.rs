use crate::core::ConfigProvider;
use crate::domain::model::{
    SimulationConfig, DEFAULT_MAX_TOTAL_VOLUME, DEFAULT_TARGET_CONCENTRATION,
    DEFAULT_VOLUME_PRECISION,
};
use crate::domain::ports::{
    DEFAULT_ARCHIVE_FILENAME, DEFAULT_PROTOCOL_FILENAME, DEFAULT_REPORT_FILENAME,
};
use crate::utils::error::{PipetteError, Result};
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_output_formats, validate_path,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub run: RunConfig,
    #[serde(default)]
    pub simulation: SimulationSection,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub description: Option<String>,
}

/// Any value left out falls back to the deployment default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSection {
    pub target_concentration: Option<f64>,
    pub max_total_volume: Option<f64>,
    pub volume_precision: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_output_formats")]
    pub formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub csv: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

impl TomlConfig {
    /// Load and parse a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PipetteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text after environment substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PipetteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// `${VAR}` is replaced by the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PipetteError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("run.name", &self.run.name)?;
        self.simulation().validate()?;

        validate_path("input.path", &self.input.path)?;
        validate_file_extensions("input.path", std::slice::from_ref(&self.input.path), &["csv"])?;

        validate_path("output.path", &self.output.path)?;
        validate_output_formats("output.formats", &self.output.formats)?;

        if let Some(compression) = &self.output.compression {
            if let Some(filename) = &compression.filename {
                validate_file_extensions(
                    "output.compression.filename",
                    std::slice::from_ref(filename),
                    &["zip"],
                )?;
            }
        }

        Ok(())
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_file(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            target_concentration: self
                .simulation
                .target_concentration
                .unwrap_or(DEFAULT_TARGET_CONCENTRATION),
            max_total_volume: self
                .simulation
                .max_total_volume
                .unwrap_or(DEFAULT_MAX_TOTAL_VOLUME),
            volume_precision: self
                .simulation
                .volume_precision
                .unwrap_or(DEFAULT_VOLUME_PRECISION),
        }
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn compress_output(&self) -> bool {
        self.output
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    fn protocol_filename(&self) -> &str {
        self.output
            .filenames
            .as_ref()
            .and_then(|f| f.csv.as_deref())
            .unwrap_or(DEFAULT_PROTOCOL_FILENAME)
    }

    fn report_filename(&self) -> &str {
        self.output
            .filenames
            .as_ref()
            .and_then(|f| f.json.as_deref())
            .unwrap_or(DEFAULT_REPORT_FILENAME)
    }

    fn archive_filename(&self) -> &str {
        self.output
            .compression
            .as_ref()
            .and_then(|c| c.filename.as_deref())
            .unwrap_or(DEFAULT_ARCHIVE_FILENAME)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
