//! Valid time (reference time + period) for a resolved cut.

use super::{Cube, CubeSelection};
use crate::error::{FmrcError, Result};
use crate::selector::Selector;
use fmrc_types::{Timestamp, format_period};

/// Element-wise `reference_time + period` over a resolved selection.
///
/// A scalar selector is broadcast against the other one; two non-scalar
/// selectors are paired and must have equal length.
pub fn derive_valid_time(cube: &Cube<'_>, selection: &CubeSelection) -> Result<Vec<Timestamp>> {
    check_bounds(&selection.reference_time, cube.reference_time.len(), cube.reference_time.name())?;
    check_bounds(&selection.period, cube.period.len(), cube.period.name())?;

    let times = selection.reference_time.gather(cube.reference_time.values());
    let periods = selection.period.gather(cube.period.values());

    let time_scalar = selection.reference_time.is_scalar();
    let period_scalar = selection.period.is_scalar();

    let len = match (time_scalar, period_scalar) {
        (true, _) => periods.len(),
        (false, true) => times.len(),
        (false, false) if times.len() == periods.len() => times.len(),
        (false, false) => {
            return Err(FmrcError::InvalidInput(format!(
                "cannot pair {} reference times with {} periods",
                times.len(),
                periods.len()
            )));
        }
    };

    (0..len)
        .map(|i| {
            let t = if time_scalar { times[0] } else { times[i] };
            let p = if period_scalar { periods[0] } else { periods[i] };
            t.checked_add_signed(p).ok_or_else(|| {
                FmrcError::InvalidInput(format!(
                    "valid time {} + {} is out of range",
                    t,
                    format_period(p)
                ))
            })
        })
        .collect()
}

fn check_bounds(selector: &Selector, len: usize, axis: &str) -> Result<()> {
    if selector.fits(len) {
        return Ok(());
    }
    Err(FmrcError::InvalidInput(format!(
        "{:?} is out of bounds for axis '{}' of length {}",
        selector, axis, len
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::fixtures::{SixOnly, at_hour, hourly_periods, hourly_times};
    use crate::compute::{Along, Resolve};
    use crate::policy::AllAvailable;
    use chrono::TimeDelta;
    use fmrc_types::{BestEstimate, ConstantOffset, ModelRun};

    #[test]
    fn test_model_run_broadcasts_reference_time() {
        let (times, periods) = (hourly_times(), hourly_periods());
        let cube = Cube::new(&times, &periods, &SixOnly);

        let sel = ModelRun::new(at_hour(1)).resolve(&cube).unwrap();
        let valid = derive_valid_time(&cube, &sel).unwrap();
        assert_eq!(valid.len(), 19);
        assert_eq!(valid[0], at_hour(1));
        assert_eq!(valid[18], at_hour(19));
    }

    #[test]
    fn test_constant_offset_broadcasts_period() {
        let (times, periods) = (hourly_times(), hourly_periods());
        let cube = Cube::new(&times, &periods, &AllAvailable);

        let sel = ConstantOffset::new(TimeDelta::hours(3)).resolve(&cube).unwrap();
        let valid = derive_valid_time(&cube, &sel).unwrap();
        assert_eq!(valid.len(), 24);
        for (i, v) in valid.iter().enumerate() {
            assert_eq!(*v, times.get(i).unwrap() + TimeDelta::hours(3));
        }
    }

    #[test]
    fn test_best_estimate_timeline_is_continuous() {
        let (times, periods) = (hourly_times(), hourly_periods());
        let cube = Cube::new(&times, &periods, &SixOnly);

        let sel = BestEstimate::new().with_asof(at_hour(12)).resolve(&cube).unwrap();
        assert_eq!(sel.along, Along::Synthetic);
        let valid = derive_valid_time(&cube, &sel).unwrap();
        assert_eq!(valid.len(), 31);
        for (i, v) in valid.iter().enumerate() {
            assert_eq!(*v, at_hour(0) + TimeDelta::hours(i as i64));
        }
    }

    #[test]
    fn test_mismatched_pairs_rejected() {
        let (times, periods) = (hourly_times(), hourly_periods());
        let cube = Cube::new(&times, &periods, &AllAvailable);

        let sel = CubeSelection {
            reference_time: Selector::Positions(vec![0, 1]),
            period: Selector::Positions(vec![0]),
            along: Along::ReferenceTime,
        };
        assert!(derive_valid_time(&cube, &sel).is_err());
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let (times, periods) = (hourly_times(), hourly_periods());
        let cube = Cube::new(&times, &periods, &AllAvailable);

        let sel = CubeSelection {
            reference_time: Selector::Position(24),
            period: Selector::Range(0..3),
            along: Along::Period,
        };
        assert!(matches!(
            derive_valid_time(&cube, &sel),
            Err(FmrcError::InvalidInput(_))
        ));
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn test_empty_or_reversed_range_past_end_rejected() {
        let (times, periods) = (hourly_times(), hourly_periods());
        let cube = Cube::new(&times, &periods, &AllAvailable);

        for period in [Selector::Range(60..60), Selector::Range(5..2)] {
            let sel = CubeSelection {
                reference_time: Selector::Position(0),
                period,
                along: Along::Period,
            };
            assert!(matches!(
                derive_valid_time(&cube, &sel),
                Err(FmrcError::InvalidInput(_))
            ));
        }
    }
}
