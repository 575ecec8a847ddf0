//! Cube-aware query strategies and valid-time derivation.
//!
//! Every [`ForecastQuery`] variant resolves against a [`Cube`] (the two
//! axes plus the availability policy) into a [`CubeSelection`]: one
//! positional selector per axis and the axis the result varies along.

pub mod best_estimate;
pub mod constant_forecast;
pub mod constant_offset;
pub mod model_run;
pub mod valid_time;

use crate::axis::{PeriodAxis, ReferenceTimeAxis};
use crate::error::Result;
use crate::policy::AvailabilityPolicy;
use crate::selector::Selector;
use fmrc_types::ForecastQuery;

pub use valid_time::derive_valid_time;

/// Borrowed view of the forecast cube a query resolves against.
#[derive(Debug, Clone, Copy)]
pub struct Cube<'a> {
    pub reference_time: &'a ReferenceTimeAxis,
    pub period: &'a PeriodAxis,
    pub policy: &'a dyn AvailabilityPolicy,
}

impl<'a> Cube<'a> {
    pub fn new(
        reference_time: &'a ReferenceTimeAxis,
        period: &'a PeriodAxis,
        policy: &'a dyn AvailabilityPolicy,
    ) -> Self {
        Self {
            reference_time,
            period,
            policy,
        }
    }
}

/// The dimension a resolved cut varies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Along {
    ReferenceTime,
    Period,
    /// A fresh "as-of-now" timeline that matches neither input axis.
    Synthetic,
}

/// Positional selectors for both axes of the cube.
///
/// When both selectors are [`Selector::Positions`] they are paired
/// element-wise (an array join), and have equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeSelection {
    pub reference_time: Selector,
    pub period: Selector,
    pub along: Along,
}

impl CubeSelection {
    /// Length of the varying dimension.
    pub fn len(&self) -> usize {
        match self.along {
            Along::Period => self.period.len(),
            Along::ReferenceTime | Along::Synthetic => self.reference_time.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve a query into positional selectors against a cube.
pub trait Resolve {
    fn resolve(&self, cube: &Cube<'_>) -> Result<CubeSelection>;
}

impl Resolve for ForecastQuery {
    fn resolve(&self, cube: &Cube<'_>) -> Result<CubeSelection> {
        match self {
            ForecastQuery::ModelRun(q) => q.resolve(cube),
            ForecastQuery::ConstantOffset(q) => q.resolve(cube),
            ForecastQuery::ConstantForecast(q) => q.resolve(cube),
            ForecastQuery::BestEstimate(q) => q.resolve(cube),
        }
    }
}
