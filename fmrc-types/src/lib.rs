//! # fmrc-types
//!
//! Value types for querying forecast model run collections.
//!
//! - **Time types**: `Timestamp`, `Period` and lenient parsers for both
//! - **Query types**: `ModelRun`, `ConstantOffset`, `ConstantForecast`,
//!   `BestEstimate` and the closed `ForecastQuery` enum
//! - **Model identifiers**: `Model`
//!
//! All types are serializable with Serde and built on `chrono`.
//!
//! ## Examples
//!
//! ```rust
//! use fmrc_types::query::{ConstantOffset, ForecastQuery, ModelRun};
//!
//! let run: ForecastQuery = "2024-05-20 13:00".parse::<ModelRun>().unwrap().into();
//! let lead: ForecastQuery = "32h".parse::<ConstantOffset>().unwrap().into();
//! assert_eq!(run.kind(), "model_run");
//! assert_eq!(lead.kind(), "constant_offset");
//! ```

pub mod model;
pub mod query;
pub mod time;

pub use model::Model;
pub use query::{BestEstimate, ConstantForecast, ConstantOffset, ForecastQuery, ModelRun};
pub use time::{ParseError, Period, Timestamp, format_period, parse_period, parse_timestamp};
