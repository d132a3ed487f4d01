use crate::core::EvaluationOptions;
use chrono::Datelike;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub input: InputSettings,
    #[validate(nested)]
    pub output: OutputSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InputSettings {
    /// Processed patient table
    #[validate(length(min = 1))]
    pub patients_path: String,
    /// Scraped trial table
    #[validate(length(min = 1))]
    pub trials_path: String,
    /// Directory holding the raw `patients.csv` and `conditions.csv`
    #[validate(length(min = 1))]
    pub raw_data_dir: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OutputSettings {
    #[validate(length(min = 1))]
    pub matches_path: String,
    /// Where `prepare` writes the processed patient table
    #[validate(length(min = 1))]
    pub patients_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_report_demographic_reasons")]
    pub report_demographic_reasons: bool,
    /// Year used to derive ages; defaults to the current calendar year
    #[serde(default)]
    pub current_year: Option<i32>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            report_demographic_reasons: default_report_demographic_reasons(),
            current_year: None,
        }
    }
}

fn default_report_demographic_reasons() -> bool { true }

impl MatchingSettings {
    pub fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            report_demographic_reasons: self.report_demographic_reasons,
        }
    }

    pub fn reference_year(&self) -> i32 {
        self.current_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    builder
        .set_default("input.patients_path", "output/patient_processed.csv")?
        .set_default("input.trials_path", "output/scraped_trials.csv")?
        .set_default("input.raw_data_dir", "data/csv")?
        .set_default("output.matches_path", "output/matched_patients.json")?
        .set_default("output.patients_path", "output/patient_processed.csv")
}

fn environment() -> Environment {
    // e.g., TRIAL_MATCH__OUTPUT__MATCHES_PATH -> output.matches_path
    Environment::with_prefix("TRIAL_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TRIAL_MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = with_defaults(Config::builder())?
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}
