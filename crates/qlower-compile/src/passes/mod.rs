//! Built-in compilation passes.
//!
//! Both passes are analyses over a [`LoweredProgram`](crate::LoweredProgram):
//! - [`CycleScheduling`]: assigns cycles and stores the schedule
//! - [`ScheduleVerification`]: re-checks the stored schedule

mod scheduling;
mod verification;

pub use scheduling::CycleScheduling;
pub use verification::{ScheduleVerification, VerificationReport};
