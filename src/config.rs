//! Index configuration: coordinate names and model selection.
//!
//! Loadable from JSON, or from TOML with the `toml` feature.
//!
//! ```rust
//! use fmrc::{IndexConfig, Model};
//!
//! let json = r#"{
//!     "reference_time_name": "init",
//!     "period_name": "lead",
//!     "model": "hrrr"
//! }"#;
//! let config = IndexConfig::from_json(json).unwrap();
//! assert_eq!(config.query_role, "forecast");
//! assert_eq!(config.model, Some(Model::Hrrr));
//! ```
use crate::error::{FmrcError, Result};
use fmrc_types::Model;
use serde::de::Error;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Dimension holding forecast reference times (CF `forecast_reference_time`)
    #[serde(default = "IndexConfig::default_reference_time_name")]
    pub reference_time_name: String,

    /// Dimension holding forecast periods (CF `forecast_period`)
    #[serde(default = "IndexConfig::default_period_name")]
    pub period_name: String,

    /// Scalar coordinate that selects cube-aware queries
    #[serde(default = "IndexConfig::default_query_role")]
    pub query_role: String,

    /// Name of the derived valid time coordinate and of the best-estimate dimension
    #[serde(default = "IndexConfig::default_valid_time_name")]
    pub valid_time_name: String,

    #[serde(default)]
    pub model: Option<Model>,
}

impl IndexConfig {
    fn default_reference_time_name() -> String {
        "time".to_string()
    }

    fn default_period_name() -> String {
        "step".to_string()
    }

    fn default_query_role() -> String {
        "forecast".to_string()
    }

    fn default_valid_time_name() -> String {
        "valid_time".to_string()
    }

    pub fn with_reference_time_name(mut self, name: impl Into<String>) -> Self {
        self.reference_time_name = name.into();
        self
    }

    pub fn with_period_name(mut self, name: impl Into<String>) -> Self {
        self.period_name = name.into();
        self
    }

    pub fn with_query_role(mut self, name: impl Into<String>) -> Self {
        self.query_role = name.into();
        self
    }

    pub fn with_valid_time_name(mut self, name: impl Into<String>) -> Self {
        self.valid_time_name = name.into();
        self
    }

    pub fn with_model(mut self, model: Option<Model>) -> Self {
        self.model = model;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let names = [
            ("reference_time_name", &self.reference_time_name),
            ("period_name", &self.period_name),
            ("query_role", &self.query_role),
            ("valid_time_name", &self.valid_time_name),
        ];

        for (field, value) in names {
            if value.is_empty() {
                return Err(format!("{} must not be empty", field));
            }
        }

        for (i, (field, value)) in names.iter().enumerate() {
            if let Some((other, _)) = names[i + 1..].iter().find(|(_, v)| v == value) {
                return Err(format!(
                    "{} and {} must differ (both are '{}')",
                    field, other, value
                ));
            }
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: IndexConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: IndexConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a config file, choosing the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                Self::from_json(&contents).map_err(|e| FmrcError::Config(e.to_string()))
            }
            #[cfg(feature = "toml")]
            Some("toml") => {
                Self::from_toml(&contents).map_err(|e| FmrcError::Config(e.to_string()))
            }
            other => Err(FmrcError::Config(format!(
                "unsupported config format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            reference_time_name: Self::default_reference_time_name(),
            period_name: Self::default_period_name(),
            query_role: Self::default_query_role(),
            valid_time_name: Self::default_valid_time_name(),
            model: None,
        }
    }
}
