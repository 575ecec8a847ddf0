//! Sorted, immutable coordinate axes with positional lookup.
//!
//! An [`Axis`] is the host-side contract the cube strategies rely on:
//! exact-match lookup, left/right boundary lookup, and construction of a
//! new axis from a positional [`Selector`]. Values are shared behind an
//! `Arc`, so cloning an axis is cheap and sub-selection never mutates the
//! original.

use crate::error::{FmrcError, Result};
use crate::selector::Selector;
use fmrc_types::{Period, Timestamp, format_period};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Axis of forecast reference (issuance) times.
pub type ReferenceTimeAxis = Axis<Timestamp>;

/// Axis of forecast periods (lead times).
pub type PeriodAxis = Axis<Period>;

/// Values that can label an axis position.
pub trait AxisValue: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// Human-readable form used in error messages.
    fn describe(&self) -> String;

    /// Reject values that may never appear on an axis.
    fn check(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

impl AxisValue for Timestamp {
    fn describe(&self) -> String {
        self.to_string()
    }
}

impl AxisValue for Period {
    fn describe(&self) -> String {
        format_period(*self)
    }

    fn check(&self) -> std::result::Result<(), String> {
        if *self < Period::zero() {
            return Err(format!("period must be non-negative, got {}", self.describe()));
        }
        Ok(())
    }
}

/// Which boundary [`Axis::slice_bound`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// First position whose value is `>=` the target.
    Left,
    /// First position whose value is `>` the target.
    Right,
}

/// A label-based selection along a single axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisSelection<T> {
    /// Exactly one label; the axis collapses to a scalar.
    Label(T),
    /// Inclusive label bounds; `None` leaves that side open.
    Slice { start: Option<T>, stop: Option<T> },
    /// An explicit set of labels, every one of which must exist.
    Labels(Vec<T>),
}

impl<T> AxisSelection<T> {
    pub fn slice(start: Option<T>, stop: Option<T>) -> Self {
        AxisSelection::Slice { start, stop }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AxisSelection::Label(_) => "label",
            AxisSelection::Slice { .. } => "slice",
            AxisSelection::Labels(_) => "label set",
        }
    }
}

/// A named, strictly increasing sequence of unique values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis<T> {
    name: Arc<str>,
    values: Arc<[T]>,
}

impl<T: AxisValue> Axis<T> {
    /// Build an axis, validating that values are strictly increasing.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::TimeDelta;
    /// use fmrc::PeriodAxis;
    ///
    /// let step = PeriodAxis::new("step", (0..=48).map(TimeDelta::hours).collect()).unwrap();
    /// assert_eq!(step.len(), 49);
    /// assert_eq!(step.get_loc(&TimeDelta::hours(32)), Some(32));
    ///
    /// assert!(PeriodAxis::new("step", vec![TimeDelta::hours(1), TimeDelta::zero()]).is_err());
    /// ```
    pub fn new(name: impl Into<String>, values: Vec<T>) -> Result<Self> {
        let name: String = name.into();
        if name.is_empty() {
            return Err(FmrcError::InvalidInput(
                "axis name must not be empty".to_string(),
            ));
        }
        Self::validated(Arc::from(name), values)
    }

    fn validated(name: Arc<str>, values: Vec<T>) -> Result<Self> {
        for (pos, value) in values.iter().enumerate() {
            value.check().map_err(|msg| {
                FmrcError::InvalidInput(format!("axis '{}' position {}: {}", name, pos, msg))
            })?;
        }

        if let Some(pos) = values.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(FmrcError::InvalidInput(format!(
                "axis '{}' must be strictly increasing: position {} ({}) is not before position {} ({})",
                name,
                pos,
                values[pos].describe(),
                pos + 1,
                values[pos + 1].describe()
            )));
        }

        Ok(Self {
            name,
            values: values.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn get(&self, pos: usize) -> Option<T> {
        self.values.get(pos).copied()
    }

    pub fn first(&self) -> Option<T> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<T> {
        self.values.last().copied()
    }

    /// Same values under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Result<Self> {
        let name: String = name.into();
        if name.is_empty() {
            return Err(FmrcError::InvalidInput(
                "axis name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name: Arc::from(name),
            values: Arc::clone(&self.values),
        })
    }

    /// Exact-match lookup.
    pub fn get_loc(&self, value: &T) -> Option<usize> {
        self.values.binary_search(value).ok()
    }

    /// Exact-match lookup that reports a miss as [`FmrcError::NotFound`].
    pub fn require_loc(&self, value: &T) -> Result<usize> {
        self.get_loc(value)
            .ok_or_else(|| FmrcError::not_found(&self.name, value.describe()))
    }

    /// Batched exact-match lookup; misses map to `None`.
    pub fn get_indexer(&self, labels: &[T]) -> Vec<Option<usize>> {
        labels.iter().map(|label| self.get_loc(label)).collect()
    }

    /// Insertion point for `value` on the requested side.
    pub fn slice_bound(&self, value: &T, side: Side) -> usize {
        match side {
            Side::Left => self.values.partition_point(|v| v < value),
            Side::Right => self.values.partition_point(|v| v <= value),
        }
    }

    /// Positions whose values lie within inclusive bounds.
    pub fn slice_locs(&self, start: Option<&T>, stop: Option<&T>) -> Range<usize> {
        let lo = start.map_or(0, |s| self.slice_bound(s, Side::Left));
        let hi = stop.map_or(self.len(), |e| self.slice_bound(e, Side::Right));
        lo..hi.max(lo)
    }

    /// Resolve a label-based selection to positions on this axis.
    pub fn sel(&self, selection: &AxisSelection<T>) -> Result<Selector> {
        match selection {
            AxisSelection::Label(label) => self.require_loc(label).map(Selector::Position),
            AxisSelection::Slice { start, stop } => {
                Ok(Selector::Range(self.slice_locs(start.as_ref(), stop.as_ref())))
            }
            AxisSelection::Labels(labels) => {
                let mut positions = Vec::with_capacity(labels.len());
                for (label, found) in labels.iter().zip(self.get_indexer(labels)) {
                    match found {
                        Some(pos) => positions.push(pos),
                        None => return Err(FmrcError::not_found(&self.name, label.describe())),
                    }
                }
                positions.sort_unstable();
                positions.dedup();
                Ok(Selector::Positions(positions))
            }
        }
    }

    /// Build a new axis from the selected positions.
    ///
    /// The selection must stay in bounds and keep values strictly increasing.
    pub fn take(&self, selector: &Selector) -> Result<Self> {
        if !selector.fits(self.len()) {
            return Err(FmrcError::InvalidInput(format!(
                "{:?} is out of bounds for axis '{}' of length {}",
                selector,
                self.name,
                self.len()
            )));
        }

        Self::validated(Arc::clone(&self.name), selector.gather(&self.values))
    }
}
