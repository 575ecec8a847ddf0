//! Best estimate: the analysis of every earlier run, then the latest
//! run's full trajectory.

use super::{Along, Cube, CubeSelection, Resolve};
use crate::error::{FmrcError, Result};
use crate::selector::Selector;
use fmrc_types::{BestEstimate, Period, format_period};

impl Resolve for BestEstimate {
    fn resolve(&self, cube: &Cube<'_>) -> Result<CubeSelection> {
        match cube.period.first() {
            Some(first) if first == Period::zero() => {}
            first => {
                return Err(FmrcError::InvalidConfiguration(format!(
                    "can't make a best estimate when '{}' doesn't start at 0 (starts at {})",
                    cube.period.name(),
                    first.map_or_else(|| "nothing".to_string(), format_period)
                )));
            }
        }

        if let (Some(asof), Some(since)) = (self.asof, self.since)
            && asof < since
        {
            return Err(FmrcError::InvalidConfiguration(format!(
                "can't request a best estimate as of {} which is earlier than since={}",
                asof, since
            )));
        }

        let last_index = match self.asof {
            Some(asof) => cube.reference_time.require_loc(&asof)?,
            None => match cube.reference_time.len().checked_sub(1) {
                Some(last) => last,
                None => {
                    log::debug!("best estimate over an empty reference time axis");
                    return Ok(CubeSelection {
                        reference_time: Selector::Positions(Vec::new()),
                        period: Selector::Positions(Vec::new()),
                        along: Along::Synthetic,
                    });
                }
            },
        };

        let n_periods = cube.period.len();
        let nsteps = cube
            .reference_time
            .get(last_index)
            .and_then(|t| cube.policy.retained_period_count(t))
            .map_or(n_periods, |count| count.min(n_periods));

        let total = last_index + nsteps;
        let mut time_positions = Vec::with_capacity(total);
        let mut period_positions = Vec::with_capacity(total);

        time_positions.extend(0..last_index);
        period_positions.extend(std::iter::repeat_n(0, last_index));

        time_positions.extend(std::iter::repeat_n(last_index, nsteps));
        period_positions.extend(0..nsteps);

        log::debug!(
            "best estimate through run {}: {} analyses + {} forecast steps ({})",
            last_index,
            last_index,
            nsteps,
            cube.policy.name()
        );

        Ok(CubeSelection {
            reference_time: Selector::Positions(time_positions),
            period: Selector::Positions(period_positions),
            along: Along::Synthetic,
        })
    }
}
