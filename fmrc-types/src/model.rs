use crate::time::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forecast model identifier used to pick an availability policy.
///
/// A collection with no model (`Option::<Model>::None`) treats every
/// (reference time, period) cell as present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    /// NOAA High-Resolution Rapid Refresh: hourly runs, with the extended
    /// lead-time range kept only for the synoptic cycles.
    Hrrr,
}

impl Model {
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Hrrr => "hrrr",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hrrr" => Ok(Model::Hrrr),
            _ => Err(ParseError::Model(s.to_string())),
        }
    }
}
