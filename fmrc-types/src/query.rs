//! Cube-aware query values.
//!
//! Each type names one canonical cut through a forecast model run
//! collection and carries only the caller-supplied target. Reference:
//! Caron, "Forecast Model Run Collections" (Unidata FMRC poster).

use crate::time::{ParseError, Period, Timestamp, parse_period, parse_timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The complete output of a single run: every period issued at one
/// reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRun {
    pub reference_time: Timestamp,
}

impl ModelRun {
    pub fn new(reference_time: Timestamp) -> Self {
        Self { reference_time }
    }
}

impl FromStr for ModelRun {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_timestamp(s).map(Self::new)
    }
}

/// All runs at one fixed offset (`step`, `lead`, or CF `forecast_period`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstantOffset {
    #[serde(with = "crate::time::period_serde")]
    pub period: Period,
}

impl ConstantOffset {
    pub fn new(period: Period) -> Self {
        Self { period }
    }
}

impl FromStr for ConstantOffset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_period(s).map(Self::new)
    }
}

/// Every (reference time, period) pair that lands on one valid time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstantForecast {
    pub valid_time: Timestamp,
}

impl ConstantForecast {
    pub fn new(valid_time: Timestamp) -> Self {
        Self { valid_time }
    }
}

impl FromStr for ConstantForecast {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_timestamp(s).map(Self::new)
    }
}

/// The analysis (zero lead) of every run before a cutoff, followed by the
/// full trajectory of the cutoff run.
///
/// `asof` picks the cutoff run (the latest run when unset). `since` is a
/// lower bound the caller has fixed elsewhere, typically by slicing the
/// reference time axis; an `asof` earlier than it is rejected at resolve
/// time.
///
/// # Examples
///
/// ```
/// use fmrc_types::query::BestEstimate;
/// use fmrc_types::time::parse_timestamp;
///
/// let latest = BestEstimate::new();
/// assert!(latest.asof.is_none());
///
/// let cutoff = BestEstimate::new().with_asof(parse_timestamp("2024-05-20 12:00").unwrap());
/// assert!(cutoff.asof.is_some());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BestEstimate {
    #[serde(default)]
    pub asof: Option<Timestamp>,
    #[serde(default)]
    pub since: Option<Timestamp>,
}

impl BestEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asof(mut self, asof: Timestamp) -> Self {
        self.asof = Some(asof);
        self
    }

    pub fn with_since(mut self, since: Timestamp) -> Self {
        self.since = Some(since);
        self
    }
}

/// The closed set of cube-aware queries.
///
/// Serialized with an internal `kind` tag:
///
/// ```
/// use fmrc_types::query::{ConstantOffset, ForecastQuery};
///
/// let query: ForecastQuery = serde_json::from_str(
///     r#"{"kind": "constant_offset", "period": "32h"}"#,
/// ).unwrap();
/// assert_eq!(query, ForecastQuery::from("32h".parse::<ConstantOffset>().unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastQuery {
    ModelRun(ModelRun),
    ConstantOffset(ConstantOffset),
    ConstantForecast(ConstantForecast),
    BestEstimate(BestEstimate),
}

impl ForecastQuery {
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastQuery::ModelRun(_) => "model_run",
            ForecastQuery::ConstantOffset(_) => "constant_offset",
            ForecastQuery::ConstantForecast(_) => "constant_forecast",
            ForecastQuery::BestEstimate(_) => "best_estimate",
        }
    }
}

impl fmt::Display for ForecastQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastQuery::ModelRun(q) => write!(f, "ModelRun({})", q.reference_time),
            ForecastQuery::ConstantOffset(q) => {
                write!(f, "ConstantOffset({})", crate::time::format_period(q.period))
            }
            ForecastQuery::ConstantForecast(q) => write!(f, "ConstantForecast({})", q.valid_time),
            ForecastQuery::BestEstimate(q) => match q.asof {
                Some(asof) => write!(f, "BestEstimate(asof={})", asof),
                None => f.write_str("BestEstimate"),
            },
        }
    }
}

impl From<ModelRun> for ForecastQuery {
    fn from(q: ModelRun) -> Self {
        ForecastQuery::ModelRun(q)
    }
}

impl From<ConstantOffset> for ForecastQuery {
    fn from(q: ConstantOffset) -> Self {
        ForecastQuery::ConstantOffset(q)
    }
}

impl From<ConstantForecast> for ForecastQuery {
    fn from(q: ConstantForecast) -> Self {
        ForecastQuery::ConstantForecast(q)
    }
}

impl From<BestEstimate> for ForecastQuery {
    fn from(q: BestEstimate) -> Self {
        ForecastQuery::BestEstimate(q)
    }
}
