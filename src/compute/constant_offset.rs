//! Fixed lead time: the same offset taken from every run that has it.

use super::{Along, Cube, CubeSelection, Resolve};
use crate::error::Result;
use crate::policy::retaining_runs;
use crate::selector::Selector;
use fmrc_types::{ConstantOffset, format_period};

impl Resolve for ConstantOffset {
    fn resolve(&self, cube: &Cube<'_>) -> Result<CubeSelection> {
        let period_pos = cube.period.require_loc(&self.period)?;

        // Past the policy threshold the surviving runs need not be contiguous.
        let reference_time = match retaining_runs(cube.policy, cube.reference_time, self.period) {
            Some(positions) => {
                log::debug!(
                    "constant offset {} past extended threshold: {} of {} runs retain it ({})",
                    format_period(self.period),
                    positions.len(),
                    cube.reference_time.len(),
                    cube.policy.name()
                );
                Selector::Positions(positions)
            }
            None => Selector::full(cube.reference_time.len()),
        };

        Ok(CubeSelection {
            reference_time,
            period: Selector::Position(period_pos),
            along: Along::ReferenceTime,
        })
    }
}
