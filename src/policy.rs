//! Availability policies: which (reference time, period) cells hold data.
//!
//! Archives rarely keep the full cube. A policy answers, per model, how many
//! leading periods a given run retains, which runs keep an extended lead
//! time, and whether an arbitrary cell exists. Strategies consult the
//! injected policy and never hard-code model rules themselves.

use crate::axis::ReferenceTimeAxis;
use chrono::{TimeDelta, Timelike};
use fmrc_types::{Model, Period, Timestamp};
use std::fmt;
use std::sync::Arc;

/// Pure availability rules for one forecast model.
pub trait AvailabilityPolicy: fmt::Debug + Send + Sync {
    /// Short identifier used in logs and index display.
    fn name(&self) -> &str;

    /// Number of leading periods retained by the run issued at
    /// `reference_time`; `None` when the run keeps the whole period axis.
    fn retained_period_count(&self, _reference_time: Timestamp) -> Option<usize> {
        None
    }

    /// Lead time beyond which constant-offset cuts only keep the runs that
    /// [`retains_extended_period`](Self::retains_extended_period) accepts.
    fn extended_range_threshold(&self) -> Option<Period> {
        None
    }

    /// Whether the run at `reference_time` holds `period`, for a period past
    /// [`extended_range_threshold`](Self::extended_range_threshold).
    fn retains_extended_period(&self, _reference_time: Timestamp, _period: Period) -> bool {
        true
    }

    /// Whether the cell (`reference_time`, `period`) holds data when matched
    /// along a diagonal (constant valid time) cut.
    fn is_available(&self, _reference_time: Timestamp, _period: Period) -> bool {
        true
    }
}

/// Positions of the runs that retain `period` in a constant-offset cut, or
/// `None` when every run does.
pub fn retaining_runs(
    policy: &dyn AvailabilityPolicy,
    reference_times: &ReferenceTimeAxis,
    period: Period,
) -> Option<Vec<usize>> {
    let threshold = policy.extended_range_threshold()?;
    if period <= threshold {
        return None;
    }

    Some(
        reference_times
            .values()
            .iter()
            .enumerate()
            .filter(|&(_, &t)| policy.retains_extended_period(t, period))
            .map(|(pos, _)| pos)
            .collect(),
    )
}

/// Every cell of the cube holds data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllAvailable;

impl AvailabilityPolicy for AllAvailable {
    fn name(&self) -> &str {
        "all"
    }
}

/// HRRR retention: hourly runs where only the synoptic cycles carry the
/// extended forecast.
///
/// - runs off the `cycle_hours` cycle keep the first `short_range_steps`
///   periods;
/// - constant-offset cuts past `extended_threshold` keep runs on the cycle;
/// - diagonal cuts drop cells past `extended_threshold` unless the run hour
///   equals `extended_cycle_hour`.
///
/// The last two rules differ for cycle runs other than `extended_cycle_hour`
/// (hours 0, 12 and 18 by default). Both are kept as observed in HRRR
/// archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HrrrPolicy {
    pub cycle_hours: u32,
    pub short_range_steps: usize,
    pub extended_threshold: Period,
    pub extended_cycle_hour: u32,
}

impl Default for HrrrPolicy {
    fn default() -> Self {
        Self {
            cycle_hours: 6,
            short_range_steps: 19,
            extended_threshold: TimeDelta::hours(18),
            extended_cycle_hour: 6,
        }
    }
}

impl HrrrPolicy {
    fn on_cycle(&self, reference_time: Timestamp) -> bool {
        self.cycle_hours == 0 || reference_time.hour() % self.cycle_hours == 0
    }
}

impl AvailabilityPolicy for HrrrPolicy {
    fn name(&self) -> &str {
        "hrrr"
    }

    fn retained_period_count(&self, reference_time: Timestamp) -> Option<usize> {
        if self.on_cycle(reference_time) {
            None
        } else {
            Some(self.short_range_steps)
        }
    }

    fn extended_range_threshold(&self) -> Option<Period> {
        Some(self.extended_threshold)
    }

    fn retains_extended_period(&self, reference_time: Timestamp, _period: Period) -> bool {
        self.on_cycle(reference_time)
    }

    fn is_available(&self, reference_time: Timestamp, period: Period) -> bool {
        reference_time.hour() == self.extended_cycle_hour || period <= self.extended_threshold
    }
}

/// The built-in policy for a model identifier.
pub fn policy_for(model: Option<Model>) -> Arc<dyn AvailabilityPolicy> {
    match model {
        None => Arc::new(AllAvailable),
        Some(Model::Hrrr) => Arc::new(HrrrPolicy::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at_hour(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 20, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_all_available_keeps_everything() {
        let policy = AllAvailable;
        assert_eq!(policy.retained_period_count(at_hour(1)), None);
        assert_eq!(policy.extended_range_threshold(), None);
        assert!(policy.is_available(at_hour(1), TimeDelta::hours(48)));
    }

    #[test]
    fn test_hrrr_truncates_off_cycle_runs() {
        let policy = HrrrPolicy::default();
        for hour in 0..24 {
            let expected = if hour % 6 == 0 { None } else { Some(19) };
            assert_eq!(policy.retained_period_count(at_hour(hour)), expected, "hour {hour}");
        }
    }

    #[test]
    fn test_hrrr_offset_rule_uses_cycle() {
        let policy = HrrrPolicy::default();
        assert!(policy.retains_extended_period(at_hour(0), TimeDelta::hours(32)));
        assert!(policy.retains_extended_period(at_hour(12), TimeDelta::hours(32)));
        assert!(!policy.retains_extended_period(at_hour(13), TimeDelta::hours(32)));
    }

    #[test]
    fn test_hrrr_diagonal_rule_uses_exact_hour() {
        let policy = HrrrPolicy::default();
        assert!(policy.is_available(at_hour(13), TimeDelta::hours(18)));
        assert!(!policy.is_available(at_hour(13), TimeDelta::hours(19)));
        assert!(!policy.is_available(at_hour(12), TimeDelta::hours(19)));
        assert!(policy.is_available(at_hour(6), TimeDelta::hours(48)));
    }

    #[test]
    fn test_retaining_runs() {
        let times = ReferenceTimeAxis::new("time", (0..24).map(at_hour).collect()).unwrap();
        let policy = HrrrPolicy::default();

        assert_eq!(retaining_runs(&policy, &times, TimeDelta::hours(18)), None);
        assert_eq!(
            retaining_runs(&policy, &times, TimeDelta::hours(19)),
            Some(vec![0, 6, 12, 18])
        );
        assert_eq!(retaining_runs(&AllAvailable, &times, TimeDelta::hours(48)), None);
    }

    #[test]
    fn test_policy_for_model() {
        assert_eq!(policy_for(None).name(), "all");
        assert_eq!(policy_for(Some(Model::Hrrr)).name(), "hrrr");
    }
}
