//! Schedule verification.
//!
//! Re-derives qubit occupancy from the stored schedule and the timing model,
//! independently of the scheduler's own bookkeeping, and checks the listing
//! invariants every consumer of a schedule relies on.

use rustc_hash::FxHashSet;
use tracing::debug;

use qlower_ir::{Operation, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::lowering::LoweredProgram;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::schedule::{ScheduleItem, ScheduledInstruction, release_cycle};

/// Result of schedule verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Whether the verification passed.
    pub passed: bool,
    /// Number of bundles verified.
    pub bundles_checked: usize,
    /// Number of quantum operations verified.
    pub operations_checked: usize,
    /// Sum of skip markers.
    pub skipped_cycles: u64,
}

/// Analysis pass that checks the stored schedule.
///
/// Verifies that:
/// - Bundle cycles strictly increase and match the cycles implied by the
///   preceding bundles and skips
/// - No qubit appears twice in one bundle, or while still busy from an
///   earlier bundle
/// - Classical bundles start only once every qubit is free
/// - Bundles plus skips account for exactly `total_cycles`
/// - The scheduled operations are the program's operations, in order
pub struct ScheduleVerification;

impl ScheduleVerification {
    fn failed(reason: String) -> CompileError {
        CompileError::PassFailed {
            name: "schedule_verification".into(),
            reason,
        }
    }
}

impl Pass for ScheduleVerification {
    fn name(&self) -> &'static str {
        "schedule_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, program: &mut LoweredProgram, properties: &mut PropertySet) -> CompileResult<()> {
        let schedule = properties
            .schedule
            .as_ref()
            .ok_or(CompileError::MissingSchedule)?;
        let timing = &properties.timing;

        let mut ready = vec![0_u64; schedule.num_qubits as usize];
        let mut cursor = 0_u64;
        let mut report = VerificationReport::default();

        for item in &schedule.items {
            let bundle = match item {
                ScheduleItem::Section(_) => continue,
                ScheduleItem::Skip(n) => {
                    cursor = release_cycle(cursor, *n)?;
                    report.skipped_cycles += n;
                    continue;
                }
                ScheduleItem::Bundle(bundle) => bundle,
            };

            if bundle.cycle != cursor {
                return Err(Self::failed(format!(
                    "bundle starts at cycle {} but preceding items account for {cursor}",
                    bundle.cycle
                )));
            }
            if bundle.instructions.is_empty() {
                return Err(Self::failed(format!("empty bundle at cycle {cursor}")));
            }

            let mut seen: FxHashSet<QubitId> = FxHashSet::default();
            for inst in &bundle.instructions {
                match inst {
                    ScheduledInstruction::Op(op) => {
                        for q in op.qubits() {
                            let slot = ready.get_mut(q.0 as usize).ok_or_else(|| {
                                Self::failed(format!("{q} is not declared by the schedule"))
                            })?;
                            if !seen.insert(q) || *slot > bundle.cycle {
                                return Err(CompileError::SchedulingConflict {
                                    instruction: op.to_string(),
                                    qubit: q,
                                    cycle: bundle.cycle,
                                });
                            }
                            *slot = release_cycle(bundle.cycle, timing.occupancy(op))?;
                        }
                        report.operations_checked += 1;
                    }
                    classical => {
                        if let Some(busy) = ready.iter().position(|&r| r > bundle.cycle) {
                            return Err(CompileError::SchedulingConflict {
                                instruction: classical.to_string(),
                                qubit: QubitId(u32::try_from(busy).unwrap_or(u32::MAX)),
                                cycle: bundle.cycle,
                            });
                        }
                        if bundle.instructions.len() != 1 {
                            return Err(Self::failed(format!(
                                "classical instruction shares bundle at cycle {}",
                                bundle.cycle
                            )));
                        }
                        let free_at = release_cycle(bundle.cycle, timing.classical_cycles)?;
                        ready.iter_mut().for_each(|r| *r = free_at);
                    }
                }
            }

            cursor = release_cycle(cursor, 1)?;
            report.bundles_checked += 1;
        }

        if cursor != schedule.total_cycles {
            return Err(Self::failed(format!(
                "bundles and skips cover {cursor} cycles, schedule claims {}",
                schedule.total_cycles
            )));
        }

        let scheduled: Vec<Operation> = schedule
            .timed_operations()
            .into_iter()
            .map(|(_, op)| op)
            .collect();
        if !scheduled.iter().eq(program.operations()) {
            return Err(Self::failed(
                "scheduled operations differ from the program's operations".into(),
            ));
        }

        report.passed = true;
        debug!(
            "Schedule verification passed: {} bundles, {} operations, {} skipped cycles",
            report.bundles_checked, report.operations_checked, report.skipped_cycles
        );
        properties.insert(report);

        Ok(())
    }
}
