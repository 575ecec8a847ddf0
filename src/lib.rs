//! Query engine for forecast model run collections (FMRC).
//!
//! A collection of weather model runs forms a two-dimensional cube indexed
//! by forecast reference time and forecast period. The valid time of a cell
//! is their sum. This crate resolves the four standard cuts through that
//! cube into positional indexers plus a derived valid time coordinate, and
//! masks cells an archive never retained through a per-model policy.
//!
//! ```rust
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use fmrc::{BestEstimate, ForecastIndexBuilder, Model};
//!
//! let start = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
//! let index = ForecastIndexBuilder::new()
//!     .model(Some(Model::Hrrr))
//!     .reference_times((0..24).map(|h| start + TimeDelta::hours(h)).collect())
//!     .periods((0..=48).map(TimeDelta::hours).collect())
//!     .build()?;
//!
//! let resolved = index.query(BestEstimate::new())?;
//! assert_eq!(resolved.varying_dim.as_deref(), Some("valid_time"));
//! # Ok::<(), fmrc::FmrcError>(())
//! ```

pub mod axis;
pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod index;
pub mod policy;
pub mod selector;

pub use axis::{Axis, AxisSelection, AxisValue, PeriodAxis, ReferenceTimeAxis, Side};
pub use builder::ForecastIndexBuilder;
pub use compute::{Along, Cube, CubeSelection, Resolve, derive_valid_time};
pub use config::IndexConfig;
pub use error::{FmrcError, Result};
pub use index::{
    DimIndexer, ForecastIndex, ResolvedSelection, SelectionRequest, SelectorValue, ValidTimeCoord,
};
pub use policy::{AllAvailable, AvailabilityPolicy, HrrrPolicy, policy_for, retaining_runs};
pub use selector::Selector;

pub use fmrc_types::{
    BestEstimate, ConstantForecast, ConstantOffset, ForecastQuery, Model, ModelRun, ParseError,
    Period, Timestamp, format_period, parse_period, parse_timestamp,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{FmrcError, ForecastIndex, ForecastIndexBuilder, IndexConfig, Result};

    pub use crate::{AxisSelection, PeriodAxis, ReferenceTimeAxis, SelectionRequest};

    pub use crate::{AllAvailable, AvailabilityPolicy, HrrrPolicy};

    pub use fmrc_types::{
        BestEstimate, ConstantForecast, ConstantOffset, ForecastQuery, Model, ModelRun, Period,
        Timestamp,
    };
}
