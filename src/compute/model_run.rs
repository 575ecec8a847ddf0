//! Fixed reference time: one run's forecast trajectory.

use super::{Along, Cube, CubeSelection, Resolve};
use crate::error::Result;
use crate::selector::Selector;
use fmrc_types::ModelRun;

impl Resolve for ModelRun {
    fn resolve(&self, cube: &Cube<'_>) -> Result<CubeSelection> {
        let time_pos = cube.reference_time.require_loc(&self.reference_time)?;

        let n_periods = cube.period.len();
        let retained = cube
            .policy
            .retained_period_count(self.reference_time)
            .map_or(n_periods, |count| count.min(n_periods));

        log::debug!(
            "model run {} -> time position {}, {} of {} periods ({})",
            self.reference_time,
            time_pos,
            retained,
            n_periods,
            cube.policy.name()
        );

        Ok(CubeSelection {
            reference_time: Selector::Position(time_pos),
            period: Selector::Range(0..retained),
            along: Along::Period,
        })
    }
}
