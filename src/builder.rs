//! Index builder
//!
//! Assembles a [`ForecastIndex`] from raw axis values and an [`IndexConfig`],
//! validating both and picking the availability policy for the configured model.

use crate::axis::{AxisValue, PeriodAxis, ReferenceTimeAxis};
use crate::config::IndexConfig;
use crate::error::{FmrcError, Result};
use crate::index::ForecastIndex;
use crate::policy::{AvailabilityPolicy, policy_for};
use fmrc_types::{Model, Period, Timestamp};
use std::path::Path;
use std::sync::Arc;

/// Builder for a forecast index with custom coordinate names and policy.
#[derive(Debug, Default)]
pub struct ForecastIndexBuilder {
    config: IndexConfig,
    reference_times: Vec<Timestamp>,
    periods: Vec<Period>,
    policy: Option<Arc<dyn AvailabilityPolicy>>,
}

impl ForecastIndexBuilder {
    /// Create a new builder with default coordinate names and no model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index configuration (coordinate names, model).
    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the index configuration from a JSON or TOML file.
    pub fn config_path(self, path: impl AsRef<Path>) -> Result<Self> {
        Ok(self.config(IndexConfig::from_path(path)?))
    }

    pub fn model(mut self, model: Option<Model>) -> Self {
        self.config.model = model;
        self
    }

    /// Forecast reference times, strictly increasing.
    pub fn reference_times(mut self, values: Vec<Timestamp>) -> Self {
        self.reference_times = values;
        self
    }

    /// Forecast periods, strictly increasing and non-negative.
    pub fn periods(mut self, values: Vec<Period>) -> Self {
        self.periods = values;
        self
    }

    /// Override the policy the configured model would select.
    pub fn policy(mut self, policy: Arc<dyn AvailabilityPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Build the index. Fails on an invalid config or malformed axis values.
    pub fn build(self) -> Result<ForecastIndex> {
        let config = self.config;
        config.validate().map_err(FmrcError::InvalidConfiguration)?;

        let reference_time = ReferenceTimeAxis::new(&config.reference_time_name, self.reference_times)?;
        let period = PeriodAxis::new(&config.period_name, self.periods)?;

        let policy = match self.policy {
            Some(policy) => {
                if let Some(model) = config.model {
                    log::warn!(
                        "policy '{}' overrides the built-in policy for model {}",
                        policy.name(),
                        model
                    );
                }
                policy
            }
            None => policy_for(config.model),
        };

        if let (Some(threshold), Some(last)) = (policy.extended_range_threshold(), period.last())
            && last <= threshold
        {
            log::warn!(
                "period axis '{}' ends at {} within the {} extended range threshold of policy '{}'",
                period.name(),
                last.describe(),
                threshold.describe(),
                policy.name()
            );
        }

        log::debug!(
            "built index with {} runs x {} periods, policy '{}'",
            reference_time.len(),
            period.len(),
            policy.name()
        );

        ForecastIndex::from_parts(
            reference_time,
            period,
            config.query_role,
            config.valid_time_name,
            config.model,
            policy,
        )
    }
}
