//! Forecast index: dispatches selection requests over a forecast cube.
//!
//! A request is either *cube-aware* (a single key, the query role, bound to
//! a [`ForecastQuery`]) or *plain-axis* (the reference time and/or period
//! dimension bound to ordinary label selections). The two modes never mix.

use crate::axis::{AxisSelection, PeriodAxis, ReferenceTimeAxis};
use crate::compute::{Along, Cube, Resolve, derive_valid_time};
use crate::error::{FmrcError, Result};
use crate::policy::{AvailabilityPolicy, policy_for};
use crate::selector::Selector;
use fmrc_types::{
    BestEstimate, ConstantForecast, ConstantOffset, ForecastQuery, Model, ModelRun, Period,
    Timestamp,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Default name of the scalar coordinate that enables cube-aware queries.
pub const DEFAULT_QUERY_ROLE: &str = "forecast";

/// Default name of the derived valid time coordinate.
pub const DEFAULT_VALID_TIME_NAME: &str = "valid_time";

/// CF standard name attached to the valid time coordinate.
pub const VALID_TIME_STANDARD_NAME: &str = "time";

/// Value bound to one key of a [`SelectionRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorValue {
    Query(ForecastQuery),
    Time(AxisSelection<Timestamp>),
    Period(AxisSelection<Period>),
}

impl SelectorValue {
    pub fn kind(&self) -> &'static str {
        match self {
            SelectorValue::Query(_) => "forecast query",
            SelectorValue::Time(_) => "reference time selection",
            SelectorValue::Period(_) => "period selection",
        }
    }
}

impl From<ForecastQuery> for SelectorValue {
    fn from(query: ForecastQuery) -> Self {
        SelectorValue::Query(query)
    }
}

impl From<ModelRun> for SelectorValue {
    fn from(query: ModelRun) -> Self {
        SelectorValue::Query(query.into())
    }
}

impl From<ConstantOffset> for SelectorValue {
    fn from(query: ConstantOffset) -> Self {
        SelectorValue::Query(query.into())
    }
}

impl From<ConstantForecast> for SelectorValue {
    fn from(query: ConstantForecast) -> Self {
        SelectorValue::Query(query.into())
    }
}

impl From<BestEstimate> for SelectorValue {
    fn from(query: BestEstimate) -> Self {
        SelectorValue::Query(query.into())
    }
}

impl From<AxisSelection<Timestamp>> for SelectorValue {
    fn from(selection: AxisSelection<Timestamp>) -> Self {
        SelectorValue::Time(selection)
    }
}

impl From<AxisSelection<Period>> for SelectorValue {
    fn from(selection: AxisSelection<Period>) -> Self {
        SelectorValue::Period(selection)
    }
}

/// Mapping from coordinate name to selector value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    labels: BTreeMap<String, SelectorValue>,
}

impl SelectionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<SelectorValue>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<SelectorValue>,
    ) -> Option<SelectorValue> {
        self.labels.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&SelectorValue> {
        self.labels.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<K: Into<String>, V: Into<SelectorValue>> FromIterator<(K, V)> for SelectionRequest {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Positional indexer for one dimension of the underlying data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimIndexer {
    pub selector: Selector,
    /// Set when the positions are paired with another dimension's and the
    /// result varies along this (possibly new) dimension instead.
    pub along: Option<String>,
}

impl DimIndexer {
    pub fn orthogonal(selector: Selector) -> Self {
        Self {
            selector,
            along: None,
        }
    }

    pub fn paired(selector: Selector, along: impl Into<String>) -> Self {
        Self {
            selector,
            along: Some(along.into()),
        }
    }
}

/// Derived valid time coordinate of a cube-aware selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTimeCoord {
    pub name: String,
    /// `None` for a scalar coordinate (the diagonal cut).
    pub dim: Option<String>,
    pub values: Vec<Timestamp>,
}

impl ValidTimeCoord {
    pub fn standard_name(&self) -> &'static str {
        VALID_TIME_STANDARD_NAME
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Everything a host needs to apply a resolved selection.
#[derive(Debug, Clone)]
pub struct ResolvedSelection {
    /// Positional indexers keyed by dimension name.
    pub dim_indexers: BTreeMap<String, DimIndexer>,
    /// Replacement reference time axis, when the result keeps that dimension.
    /// `None` when the dimension is untouched or collapsed to a scalar.
    pub reference_time: Option<ReferenceTimeAxis>,
    /// Replacement period axis, when the result keeps that dimension.
    /// `None` when the dimension is untouched or collapsed to a scalar.
    pub period: Option<PeriodAxis>,
    /// Dimension the cube-aware result varies along.
    pub varying_dim: Option<String>,
    pub valid_time: Option<ValidTimeCoord>,
    /// Coordinates the host should remove from the result.
    pub drop_coords: Vec<String>,
    /// Index over the narrowed axes (plain-axis mode only).
    pub index: Option<ForecastIndex>,
}

/// Index over a forecast model run collection.
///
/// ```rust
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use fmrc::{ConstantOffset, ForecastIndex, Model, PeriodAxis, ReferenceTimeAxis};
///
/// let start = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
/// let time = ReferenceTimeAxis::new("time", (0..24).map(|h| start + TimeDelta::hours(h)).collect())?;
/// let step = PeriodAxis::new("step", (0..=48).map(TimeDelta::hours).collect())?;
/// let index = ForecastIndex::new(time, step, Some(Model::Hrrr))?;
///
/// let resolved = index.query(ConstantOffset::new(TimeDelta::hours(32)))?;
/// assert_eq!(resolved.reference_time.unwrap().len(), 4);
/// assert_eq!(resolved.drop_coords, vec!["forecast".to_string()]);
/// # Ok::<(), fmrc::FmrcError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ForecastIndex {
    reference_time: ReferenceTimeAxis,
    period: PeriodAxis,
    query_role: String,
    valid_time_name: String,
    model: Option<Model>,
    policy: Arc<dyn AvailabilityPolicy>,
}

impl ForecastIndex {
    /// Index with the default query role and the built-in policy for `model`.
    pub fn new(
        reference_time: ReferenceTimeAxis,
        period: PeriodAxis,
        model: Option<Model>,
    ) -> Result<Self> {
        Self::from_parts(
            reference_time,
            period,
            DEFAULT_QUERY_ROLE.to_string(),
            DEFAULT_VALID_TIME_NAME.to_string(),
            model,
            policy_for(model),
        )
    }

    pub(crate) fn from_parts(
        reference_time: ReferenceTimeAxis,
        period: PeriodAxis,
        query_role: String,
        valid_time_name: String,
        model: Option<Model>,
        policy: Arc<dyn AvailabilityPolicy>,
    ) -> Result<Self> {
        let names = [
            reference_time.name(),
            period.name(),
            query_role.as_str(),
            valid_time_name.as_str(),
        ];
        if names.iter().any(|n| n.is_empty()) {
            return Err(FmrcError::InvalidConfiguration(
                "coordinate names must not be empty".to_string(),
            ));
        }
        for (i, name) in names.iter().enumerate() {
            if names[i + 1..].contains(name) {
                return Err(FmrcError::InvalidConfiguration(format!(
                    "coordinate name '{}' is used for more than one role",
                    name
                )));
            }
        }

        Ok(Self {
            reference_time,
            period,
            query_role,
            valid_time_name,
            model,
            policy,
        })
    }

    /// Replace the availability policy, e.g. for a model without a built-in one.
    pub fn with_policy(mut self, policy: Arc<dyn AvailabilityPolicy>) -> Self {
        if let Some(model) = self.model {
            log::warn!(
                "policy '{}' overrides the built-in policy for model {}",
                policy.name(),
                model
            );
        }
        self.policy = policy;
        self
    }

    pub fn reference_time(&self) -> &ReferenceTimeAxis {
        &self.reference_time
    }

    pub fn period(&self) -> &PeriodAxis {
        &self.period
    }

    pub fn query_role(&self) -> &str {
        &self.query_role
    }

    pub fn valid_time_name(&self) -> &str {
        &self.valid_time_name
    }

    pub fn model(&self) -> Option<Model> {
        self.model
    }

    pub fn policy(&self) -> &dyn AvailabilityPolicy {
        self.policy.as_ref()
    }

    pub fn cube(&self) -> Cube<'_> {
        Cube::new(&self.reference_time, &self.period, self.policy.as_ref())
    }

    /// Resolve a cube-aware query bound to the query role.
    pub fn query(&self, query: impl Into<ForecastQuery>) -> Result<ResolvedSelection> {
        let request = SelectionRequest::new().with(self.query_role.clone(), query.into());
        self.resolve(&request)
    }

    /// Resolve a selection request in either cube-aware or plain-axis mode.
    pub fn resolve(&self, request: &SelectionRequest) -> Result<ResolvedSelection> {
        if request.is_empty() {
            return Err(FmrcError::InvalidInput("empty selection request".to_string()));
        }

        let time_name = self.reference_time.name();
        let period_name = self.period.name();

        if request.contains_key(&self.query_role) && request.len() != 1 {
            let others: Vec<&str> = request.keys().filter(|k| *k != self.query_role).collect();
            return Err(FmrcError::InvalidConfiguration(format!(
                "indexing along '{}' cannot be combined with indexing along {:?}",
                self.query_role, others
            )));
        }

        if let Some(unknown) = request
            .keys()
            .find(|k| *k != self.query_role && *k != time_name && *k != period_name)
        {
            return Err(FmrcError::InvalidInput(format!(
                "'{}' is not indexed by {}",
                unknown, self
            )));
        }

        if request.contains_key(time_name) || request.contains_key(period_name) {
            log::debug!("plain-axis selection on {:?}", request.keys().collect::<Vec<_>>());
            return self.resolve_axes(request);
        }

        match request.get(&self.query_role) {
            Some(SelectorValue::Query(query)) => self.resolve_query(query),
            Some(other) => Err(FmrcError::UnsupportedSelectorType {
                key: self.query_role.clone(),
                expected: "forecast query",
                found: other.kind(),
            }),
            None => Err(FmrcError::InvalidInput(format!(
                "'{}' missing from selection request",
                self.query_role
            ))),
        }
    }

    fn resolve_axes(&self, request: &SelectionRequest) -> Result<ResolvedSelection> {
        let time_name = self.reference_time.name();
        let period_name = self.period.name();

        let mut dim_indexers = BTreeMap::new();
        let mut narrowed_time = self.reference_time.clone();
        let mut narrowed_period = self.period.clone();
        let mut reference_time = None;
        let mut period = None;

        if let Some(value) = request.get(time_name) {
            let SelectorValue::Time(selection) = value else {
                return Err(FmrcError::UnsupportedSelectorType {
                    key: time_name.to_string(),
                    expected: "reference time selection",
                    found: value.kind(),
                });
            };
            let selector = self.reference_time.sel(selection)?;
            narrowed_time = self.reference_time.take(&selector)?;
            if !selector.is_scalar() {
                reference_time = Some(narrowed_time.clone());
            }
            dim_indexers.insert(time_name.to_string(), DimIndexer::orthogonal(selector));
        }

        if let Some(value) = request.get(period_name) {
            let SelectorValue::Period(selection) = value else {
                return Err(FmrcError::UnsupportedSelectorType {
                    key: period_name.to_string(),
                    expected: "period selection",
                    found: value.kind(),
                });
            };
            let selector = self.period.sel(selection)?;
            narrowed_period = self.period.take(&selector)?;
            if !selector.is_scalar() {
                period = Some(narrowed_period.clone());
            }
            dim_indexers.insert(period_name.to_string(), DimIndexer::orthogonal(selector));
        }

        let index = Self {
            reference_time: narrowed_time,
            period: narrowed_period,
            query_role: self.query_role.clone(),
            valid_time_name: self.valid_time_name.clone(),
            model: self.model,
            policy: Arc::clone(&self.policy),
        };

        Ok(ResolvedSelection {
            dim_indexers,
            reference_time,
            period,
            varying_dim: None,
            valid_time: None,
            drop_coords: Vec::new(),
            index: Some(index),
        })
    }

    fn resolve_query(&self, query: &ForecastQuery) -> Result<ResolvedSelection> {
        let cube = self.cube();
        let selection = query.resolve(&cube)?;

        let time_name = self.reference_time.name().to_string();
        let period_name = self.period.name().to_string();
        let varying_dim = self.dim_name(selection.along).to_string();

        let mut dim_indexers = BTreeMap::new();
        let mut reference_time = None;
        let mut period = None;

        match query {
            ForecastQuery::ModelRun(_) => {
                period = Some(self.period.take(&selection.period)?);
                dim_indexers.insert(time_name, DimIndexer::orthogonal(selection.reference_time.clone()));
                dim_indexers.insert(period_name, DimIndexer::orthogonal(selection.period.clone()));
            }
            ForecastQuery::ConstantOffset(_) => {
                reference_time = Some(self.reference_time.take(&selection.reference_time)?);
                dim_indexers.insert(time_name, DimIndexer::orthogonal(selection.reference_time.clone()));
                dim_indexers.insert(period_name, DimIndexer::orthogonal(selection.period.clone()));
            }
            ForecastQuery::ConstantForecast(_) => {
                reference_time = Some(self.reference_time.take(&selection.reference_time)?);
                dim_indexers.insert(
                    period_name,
                    DimIndexer::paired(selection.period.clone(), &varying_dim),
                );
                dim_indexers.insert(
                    time_name,
                    DimIndexer::paired(selection.reference_time.clone(), &varying_dim),
                );
            }
            ForecastQuery::BestEstimate(_) => {
                dim_indexers.insert(
                    time_name,
                    DimIndexer::paired(selection.reference_time.clone(), &varying_dim),
                );
                dim_indexers.insert(
                    period_name,
                    DimIndexer::paired(selection.period.clone(), &varying_dim),
                );
            }
        }

        let valid_time = match query {
            ForecastQuery::ConstantForecast(q) => ValidTimeCoord {
                name: self.valid_time_name.clone(),
                dim: None,
                values: vec![q.valid_time],
            },
            _ => ValidTimeCoord {
                name: self.valid_time_name.clone(),
                dim: Some(varying_dim.clone()),
                values: derive_valid_time(&cube, &selection)?,
            },
        };

        log::debug!(
            "{} resolved along '{}' with {} entries",
            query,
            varying_dim,
            selection.len()
        );

        Ok(ResolvedSelection {
            dim_indexers,
            reference_time,
            period,
            varying_dim: Some(varying_dim),
            valid_time: Some(valid_time),
            drop_coords: vec![self.query_role.clone()],
            index: None,
        })
    }

    fn dim_name(&self, along: Along) -> &str {
        match along {
            Along::ReferenceTime => self.reference_time.name(),
            Along::Period => self.period.name(),
            Along::Synthetic => &self.valid_time_name,
        }
    }
}

impl fmt::Display for ForecastIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ForecastIndex along [{}, {}, {}]>",
            self.query_role,
            self.reference_time.name(),
            self.period.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::fixtures::{SixOnly, at_hour, hourly_periods, hourly_times};
    use chrono::TimeDelta;

    fn index() -> ForecastIndex {
        ForecastIndex::new(hourly_times(), hourly_periods(), None)
            .unwrap()
            .with_policy(Arc::new(SixOnly))
    }

    #[test]
    fn test_display() {
        assert_eq!(index().to_string(), "<ForecastIndex along [forecast, time, step]>");
    }

    #[test]
    fn test_rejects_clashing_names() {
        let times = hourly_times().renamed("forecast").unwrap();
        let err = ForecastIndex::new(times, hourly_periods(), None).unwrap_err();
        assert!(matches!(err, FmrcError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_model_run_packaging() {
        let resolved = index().query(ModelRun::new(at_hour(1))).unwrap();

        assert_eq!(resolved.varying_dim.as_deref(), Some("step"));
        assert!(resolved.reference_time.is_none());
        assert_eq!(resolved.period.as_ref().map(|p| p.len()), Some(19));
        assert_eq!(
            resolved.dim_indexers["time"],
            DimIndexer::orthogonal(Selector::Position(1))
        );
        assert_eq!(
            resolved.dim_indexers["step"],
            DimIndexer::orthogonal(Selector::Range(0..19))
        );

        let valid = resolved.valid_time.unwrap();
        assert_eq!(valid.dim.as_deref(), Some("step"));
        assert_eq!(valid.len(), 19);
        assert_eq!(valid.standard_name(), "time");
        assert_eq!(resolved.drop_coords, vec!["forecast".to_string()]);
        assert!(resolved.index.is_none());
    }

    #[test]
    fn test_constant_offset_packaging() {
        let resolved = index()
            .query(ConstantOffset::new(TimeDelta::hours(32)))
            .unwrap();

        assert_eq!(resolved.varying_dim.as_deref(), Some("time"));
        let times = resolved.reference_time.unwrap();
        assert_eq!(times.values(), &[at_hour(6)]);
        assert_eq!(
            resolved.valid_time.unwrap().values,
            vec![at_hour(6) + TimeDelta::hours(32)]
        );
    }

    #[test]
    fn test_constant_forecast_packaging() {
        let target = at_hour(10);
        let resolved = index().query(ConstantForecast::new(target)).unwrap();

        assert_eq!(resolved.varying_dim.as_deref(), Some("time"));
        assert_eq!(resolved.dim_indexers["time"].along.as_deref(), Some("time"));
        assert_eq!(resolved.dim_indexers["step"].along.as_deref(), Some("time"));
        assert_eq!(resolved.reference_time.unwrap().len(), 11);

        let valid = resolved.valid_time.unwrap();
        assert_eq!(valid.dim, None);
        assert_eq!(valid.values, vec![target]);
    }

    #[test]
    fn test_best_estimate_packaging() {
        let resolved = index()
            .query(BestEstimate::new().with_asof(at_hour(12)))
            .unwrap();

        assert_eq!(resolved.varying_dim.as_deref(), Some("valid_time"));
        assert!(resolved.reference_time.is_none());
        assert!(resolved.period.is_none());
        assert_eq!(resolved.dim_indexers["time"].selector.len(), 31);
        assert_eq!(
            resolved.dim_indexers["step"].along.as_deref(),
            Some("valid_time")
        );
        assert_eq!(resolved.valid_time.unwrap().len(), 31);
    }

    #[test]
    fn test_plain_axis_mode() {
        let request = SelectionRequest::new()
            .with(
                "time",
                AxisSelection::slice(Some(at_hour(6)), Some(at_hour(12))),
            )
            .with("step", AxisSelection::Label(TimeDelta::hours(3)));
        let resolved = index().resolve(&request).unwrap();

        assert_eq!(resolved.reference_time.as_ref().map(|t| t.len()), Some(7));
        assert!(resolved.period.is_none(), "scalar label collapses the period");
        assert_eq!(
            resolved.dim_indexers["step"].selector,
            Selector::Position(3)
        );
        assert!(resolved.valid_time.is_none());
        assert!(resolved.varying_dim.is_none());
        assert!(resolved.drop_coords.is_empty());

        let narrowed = resolved.index.unwrap();
        assert_eq!(narrowed.reference_time().first(), Some(at_hour(6)));
        assert_eq!(narrowed.period().values(), &[TimeDelta::hours(3)]);
        assert_eq!(narrowed.query_role(), "forecast");
        assert_eq!(narrowed.policy().name(), "six-only");
    }

    #[test]
    fn test_with_policy_keeps_model() {
        let hrrr = ForecastIndex::new(hourly_times(), hourly_periods(), Some(Model::Hrrr)).unwrap();
        assert_eq!(hrrr.policy().name(), "hrrr");

        let custom = hrrr.with_policy(Arc::new(SixOnly));
        assert_eq!(custom.model(), Some(Model::Hrrr));
        assert_eq!(custom.policy().name(), "six-only");

        let offset = custom
            .query(ConstantOffset::new(TimeDelta::hours(32)))
            .unwrap();
        assert_eq!(offset.dim_indexers["time"].selector, Selector::Positions(vec![6]));
    }

    #[test]
    fn test_mixed_request_is_invalid() {
        let request = SelectionRequest::new()
            .with("forecast", BestEstimate::new())
            .with("step", AxisSelection::Label(TimeDelta::hours(3)));
        assert!(matches!(
            index().resolve(&request),
            Err(FmrcError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_role_with_unknown_key_is_invalid() {
        let request = SelectionRequest::new()
            .with("forecast", BestEstimate::new())
            .with("member", AxisSelection::Label(TimeDelta::hours(3)));
        assert!(matches!(
            index().resolve(&request),
            Err(FmrcError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_unsupported_selector_on_role() {
        let request =
            SelectionRequest::new().with("forecast", AxisSelection::Label(at_hour(3)));
        match index().resolve(&request) {
            Err(FmrcError::UnsupportedSelectorType { key, found, .. }) => {
                assert_eq!(key, "forecast");
                assert_eq!(found, "reference time selection");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_query_on_axis_key_is_unsupported() {
        let request = SelectionRequest::new().with("time", ModelRun::new(at_hour(3)));
        assert!(matches!(
            index().resolve(&request),
            Err(FmrcError::UnsupportedSelectorType { .. })
        ));
    }

    #[test]
    fn test_unknown_and_empty_requests() {
        let unknown = SelectionRequest::new().with("member", BestEstimate::new());
        assert!(matches!(
            index().resolve(&unknown),
            Err(FmrcError::InvalidInput(_))
        ));
        assert!(matches!(
            index().resolve(&SelectionRequest::new()),
            Err(FmrcError::InvalidInput(_))
        ));
    }
}
