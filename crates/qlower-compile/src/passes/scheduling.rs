//! Cycle scheduling as a pass.

use tracing::debug;

use crate::error::CompileResult;
use crate::lowering::LoweredProgram;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::schedule::Scheduler;

/// Schedules the program with `properties.timing` and stores the result in
/// `properties.schedule`.
pub struct CycleScheduling;

impl Pass for CycleScheduling {
    fn name(&self) -> &'static str {
        "cycle_scheduling"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, program: &mut LoweredProgram, properties: &mut PropertySet) -> CompileResult<()> {
        let scheduler = Scheduler::new(properties.timing.clone());
        let schedule = scheduler.schedule(program)?;
        debug!(
            "Stored schedule for '{}' ({} bundles)",
            schedule.name,
            schedule.num_bundles()
        );
        properties.schedule = Some(schedule);
        Ok(())
    }
}
