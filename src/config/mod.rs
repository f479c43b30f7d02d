//! Analysis configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SURVEY_ALLOCATOR` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use survey_allocator::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Scoring with {}", config.ranking.scoring);
//! ```

mod error;
mod execution;
mod moran;
mod ranking;
mod telemetry;

pub use error::{ConfigError, ValidationError};
pub use execution::ExecutionConfig;
pub use moran::MoranConfig;
pub use ranking::RankingConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "SURVEY_ALLOCATOR";

/// Root analysis configuration
///
/// Every section has defaults, so an empty environment loads successfully.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Default ranking methods
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Moran's I procedure parameters
    #[serde(default)]
    pub moran: MoranConfig,

    /// Sequential or parallel per-area work
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Log output
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AnalysisConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present
    /// 2. Reads environment variables with `SURVEY_ALLOCATOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SURVEY_ALLOCATOR__RANKING__SCORING=TOPSIS` -> `ranking.scoring = TOPSIS`
    /// - `SURVEY_ALLOCATOR__MORAN__PERMUTATIONS=499` -> `moran.permutations = 499`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types,
    /// including unknown method names.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a file, with environment variables layered on top
    ///
    /// The format (TOML, YAML, JSON) follows the file extension.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.moran.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::default()
        .prefix(ENV_PREFIX)
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{ScoringMethod, WeightingMethod};
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("SURVEY_ALLOCATOR__RANKING__SCORING");
        env::remove_var("SURVEY_ALLOCATOR__RANKING__WEIGHTING");
        env::remove_var("SURVEY_ALLOCATOR__MORAN__PERMUTATIONS");
        env::remove_var("SURVEY_ALLOCATOR__MORAN__SEED");
        env::remove_var("SURVEY_ALLOCATOR__EXECUTION__PARALLEL");
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AnalysisConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SURVEY_ALLOCATOR__RANKING__SCORING", "TOPSIS");
        env::set_var("SURVEY_ALLOCATOR__MORAN__PERMUTATIONS", "499");
        env::set_var("SURVEY_ALLOCATOR__MORAN__SEED", "42");
        env::set_var("SURVEY_ALLOCATOR__EXECUTION__PARALLEL", "true");
        let result = AnalysisConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ranking.scoring, ScoringMethod::Topsis);
        assert_eq!(config.moran.permutations, 499);
        assert_eq!(config.moran.seed, Some(42));
        assert!(config.execution.parallel);
    }

    #[test]
    fn test_unknown_method_name_fails_loading() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SURVEY_ALLOCATOR__RANKING__WEIGHTING", "XYZ");
        let result = AnalysisConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_load_from_toml_file_with_env_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[ranking]\nweighting = \"CRITIC\"\nscoring = \"SAW\"\n\n[moran]\nk = 8\np_threshold = 0.01"
        )
        .unwrap();

        env::set_var("SURVEY_ALLOCATOR__RANKING__SCORING", "mTOPSIS");
        let result = AnalysisConfig::load_from_file(file.path());
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ranking.weighting, WeightingMethod::Critic);
        assert_eq!(config.ranking.scoring, ScoringMethod::ModifiedTopsis);
        assert_eq!(config.moran.k, 8);
        assert_eq!(config.moran.p_threshold, 0.01);
        assert_eq!(config.moran.permutations, 999);
    }

    #[test]
    fn test_validate_rejects_bad_moran_section() {
        let mut config = AnalysisConfig::default();
        config.moran.p_threshold = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPThreshold(_))
        ));
    }
}
