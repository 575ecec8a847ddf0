//! Fixed valid time: the diagonal of the cube.
//!
//! Only runs issued within `max_period` before the target can reach it, so
//! the search window is located with two boundary lookups and each
//! candidate run is joined to the period axis by exact match.

use super::{Along, Cube, CubeSelection, Resolve};
use crate::axis::Side;
use crate::error::Result;
use crate::selector::Selector;
use chrono::{DateTime, Utc};
use fmrc_types::ConstantForecast;

impl Resolve for ConstantForecast {
    fn resolve(&self, cube: &Cube<'_>) -> Result<CubeSelection> {
        let target = self.valid_time;

        let Some(max_period) = cube.period.last() else {
            return Ok(empty());
        };

        let earliest = target
            .checked_sub_signed(max_period)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let left = cube.reference_time.slice_bound(&earliest, Side::Left);
        let right = cube.reference_time.slice_bound(&target, Side::Right);

        let mut time_positions = Vec::new();
        let mut period_positions = Vec::new();

        for time_pos in left..right {
            let Some(reference_time) = cube.reference_time.get(time_pos) else {
                continue;
            };
            let needed = target.signed_duration_since(reference_time);

            let Some(period_pos) = cube.period.get_loc(&needed) else {
                continue;
            };
            if !cube.policy.is_available(reference_time, needed) {
                continue;
            }

            time_positions.push(time_pos);
            period_positions.push(period_pos);
        }

        log::debug!(
            "constant forecast {}: {} candidate runs, {} matched ({})",
            target,
            right.saturating_sub(left),
            time_positions.len(),
            cube.policy.name()
        );

        Ok(CubeSelection {
            reference_time: Selector::Positions(time_positions),
            period: Selector::Positions(period_positions),
            along: Along::ReferenceTime,
        })
    }
}

fn empty() -> CubeSelection {
    CubeSelection {
        reference_time: Selector::Positions(Vec::new()),
        period: Selector::Positions(Vec::new()),
        along: Along::ReferenceTime,
    }
}
