//! Cycle scheduling.
//!
//! The scheduler assigns every lowered instruction a start cycle and groups
//! instructions that start together into bundles. Placement is in order:
//! an instruction never starts before the one emitted ahead of it, and
//! never before all of its qubits are free.
//!
//! ```text
//! start(op) = max(start(previous op), ready[q] for q in op)
//! ready[q]  = start + duration (+ readout gap for measurements)
//! ```
//!
//! Compare and branch markers are classical barriers: they wait for every
//! qubit, take a bundle of their own, and release every qubit after them.
//! A label opens a new section whose first bundle lies strictly after the
//! last bundle of the previous section.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use qlower_ir::{Condition, IrError, Operation, QubitId, is_valid_name};

use crate::error::{CompileError, CompileResult};
use crate::lowering::{BranchKind, LoweredInstruction, LoweredProgram};

/// Default post-measurement readout gap, in cycles.
pub const DEFAULT_READOUT_GAP: u64 = 14;

/// Largest accepted value for any single duration.
pub const MAX_DURATION: u64 = u32::MAX as u64;

/// Durations used by the scheduler, in cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingModel {
    /// Duration of every non-measurement gate.
    #[serde(default = "default_one")]
    pub gate_cycles: u64,
    /// Duration of a measurement.
    #[serde(default = "default_one")]
    pub measure_cycles: u64,
    /// Cycles a measured qubit stays unavailable after the measurement ends.
    #[serde(default = "default_readout_gap")]
    pub readout_gap: u64,
    /// Duration of a compare or branch marker.
    #[serde(default = "default_one")]
    pub classical_cycles: u64,
}

fn default_one() -> u64 {
    1
}

fn default_readout_gap() -> u64 {
    DEFAULT_READOUT_GAP
}

impl Default for TimingModel {
    fn default() -> Self {
        Self {
            gate_cycles: 1,
            measure_cycles: 1,
            readout_gap: DEFAULT_READOUT_GAP,
            classical_cycles: 1,
        }
    }
}

impl TimingModel {
    /// Gates and measurements share one duration.
    pub fn uniform(gate_cycles: u64, readout_gap: u64) -> Self {
        Self {
            gate_cycles,
            measure_cycles: gate_cycles,
            readout_gap,
            classical_cycles: 1,
        }
    }

    /// Cycles an operation keeps its qubits busy.
    #[inline]
    pub fn occupancy(&self, op: &Operation) -> u64 {
        if op.is_measure() {
            self.measure_cycles.saturating_add(self.readout_gap)
        } else {
            self.gate_cycles
        }
    }

    /// Reject durations that would let two instructions share a cycle on one
    /// qubit, or that exceed [`MAX_DURATION`].
    pub fn validate(&self) -> CompileResult<()> {
        for (field, value) in [
            ("gate_cycles", self.gate_cycles),
            ("measure_cycles", self.measure_cycles),
            ("classical_cycles", self.classical_cycles),
        ] {
            if value == 0 {
                return Err(CompileError::InvalidConfiguration(format!(
                    "{field} must be at least 1"
                )));
            }
        }
        for (field, value) in [
            ("gate_cycles", self.gate_cycles),
            ("measure_cycles", self.measure_cycles),
            ("readout_gap", self.readout_gap),
            ("classical_cycles", self.classical_cycles),
        ] {
            if value > MAX_DURATION {
                return Err(CompileError::InvalidConfiguration(format!(
                    "{field} must be at most {MAX_DURATION}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Cycle at which an instruction starting at `start` releases its qubits.
pub(crate) fn release_cycle(start: u64, duration: u64) -> CompileResult<u64> {
    start.checked_add(duration).ok_or_else(|| {
        CompileError::InvalidConfiguration(format!(
            "a {duration}-cycle instruction at cycle {start} overflows the cycle counter"
        ))
    })
}

/// An instruction inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledInstruction {
    /// Quantum operation.
    Op(Operation),
    /// Classical compare.
    Compare {
        /// The compared registers.
        condition: Condition,
        /// Originating construct.
        kind: BranchKind,
    },
    /// Jump over the else-arm.
    SkipElse,
}

impl ScheduledInstruction {
    /// Get the operation if this is one.
    #[inline]
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            ScheduledInstruction::Op(op) => Some(op),
            _ => None,
        }
    }

    /// Qubits touched; classical instructions touch none.
    pub fn qubits(&self) -> Vec<QubitId> {
        self.operation().map(Operation::qubits).unwrap_or_default()
    }
}

impl fmt::Display for ScheduledInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduledInstruction::Op(op) => write!(f, "{op}"),
            ScheduledInstruction::Compare { condition, .. } => write!(
                f,
                "cmp.{} {}, {}",
                condition.op.mnemonic(),
                condition.lhs,
                condition.rhs
            ),
            ScheduledInstruction::SkipElse => f.write_str("br.else"),
        }
    }
}

/// Instructions starting in the same cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Start cycle.
    pub cycle: u64,
    /// Instructions in emission order.
    pub instructions: Vec<ScheduledInstruction>,
}

impl Bundle {
    fn new(cycle: u64) -> Self {
        Self {
            cycle,
            instructions: vec![],
        }
    }

    /// Check if the bundle holds a classical instruction.
    pub fn is_classical(&self) -> bool {
        self.instructions
            .iter()
            .any(|inst| inst.operation().is_none())
    }
}

/// One entry of a schedule, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleItem {
    /// Start of a block.
    Section(String),
    /// Instructions issued together.
    Bundle(Bundle),
    /// Idle cycles.
    Skip(u64),
}

/// The scheduler's output.
///
/// Every listed bundle covers exactly one cycle and every skip covers its
/// count, so `num_bundles() + skipped_cycles() == total_cycles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledProgram {
    /// Program name.
    pub name: String,
    /// Declared qubit count.
    pub num_qubits: u32,
    /// Sections, bundles and skips.
    pub items: Vec<ScheduleItem>,
    /// Cycle at which the last qubit becomes free.
    pub total_cycles: u64,
}

impl ScheduledProgram {
    /// Iterate bundles in cycle order.
    pub fn bundles(&self) -> impl Iterator<Item = &Bundle> + '_ {
        self.items.iter().filter_map(|item| match item {
            ScheduleItem::Bundle(b) => Some(b),
            _ => None,
        })
    }

    /// Quantum operations with their start cycles, in emission order.
    pub fn timed_operations(&self) -> Vec<(u64, Operation)> {
        self.bundles()
            .flat_map(|b| {
                b.instructions
                    .iter()
                    .filter_map(ScheduledInstruction::operation)
                    .map(move |op| (b.cycle, *op))
            })
            .collect()
    }

    /// Number of bundles.
    pub fn num_bundles(&self) -> usize {
        self.bundles().count()
    }

    /// Sum of all skip markers.
    pub fn skipped_cycles(&self) -> u64 {
        self.items
            .iter()
            .map(|item| match item {
                ScheduleItem::Skip(n) => *n,
                _ => 0,
            })
            .sum()
    }

    /// Section names in order.
    pub fn sections(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ScheduleItem::Section(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// In-order cycle scheduler.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    timing: TimingModel,
}

impl Scheduler {
    /// Create a scheduler for the given timing model.
    pub fn new(timing: TimingModel) -> Self {
        Self { timing }
    }

    /// Get the timing model.
    pub fn timing(&self) -> &TimingModel {
        &self.timing
    }

    /// Schedule a lowered program.
    ///
    /// The program name and every label must satisfy
    /// [`is_valid_name`](qlower_ir::is_valid_name) so the schedule can be
    /// rendered as a listing.
    pub fn schedule(&self, program: &LoweredProgram) -> CompileResult<ScheduledProgram> {
        self.timing.validate()?;
        check_listing_name(&program.name)?;

        let mut state = SchedulerState::new(program.num_qubits);

        for inst in &program.instructions {
            match inst {
                LoweredInstruction::Label(name) => {
                    check_listing_name(name)?;
                    state.open_section(name);
                }
                LoweredInstruction::Op(op) => state.place_op(*op, &self.timing)?,
                LoweredInstruction::Compare { condition, kind } => state.place_classical(
                    ScheduledInstruction::Compare {
                        condition: *condition,
                        kind: *kind,
                    },
                    self.timing.classical_cycles,
                )?,
                LoweredInstruction::SkipElse => state
                    .place_classical(ScheduledInstruction::SkipElse, self.timing.classical_cycles)?,
            }
        }

        let scheduled = state.finish(program);
        info!(
            "Scheduled '{}': {} bundles, {} skipped cycles, {} total cycles",
            scheduled.name,
            scheduled.num_bundles(),
            scheduled.skipped_cycles(),
            scheduled.total_cycles
        );
        Ok(scheduled)
    }
}

fn check_listing_name(name: &str) -> CompileResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(IrError::InvalidName(name.to_string()).into())
    }
}

/// Mutable bookkeeping for one scheduling run.
struct SchedulerState {
    /// First free cycle per qubit.
    ready: Vec<u64>,
    /// Start of the most recently placed instruction.
    floor: u64,
    /// Cycle at which the last qubit becomes free.
    horizon: u64,
    items: Vec<ScheduleItem>,
    /// Sections opened since the last flushed bundle.
    pending_sections: Vec<String>,
    current: Option<Bundle>,
    /// Qubits used by `current`.
    busy: FxHashSet<QubitId>,
    last_cycle: Option<u64>,
}

impl SchedulerState {
    fn new(num_qubits: u32) -> Self {
        Self {
            ready: vec![0; num_qubits as usize],
            floor: 0,
            horizon: 0,
            items: vec![],
            pending_sections: vec![],
            current: None,
            busy: FxHashSet::default(),
            last_cycle: None,
        }
    }

    fn open_section(&mut self, name: &str) {
        self.flush();
        if let Some(last) = self.last_cycle {
            self.floor = self.floor.max(last + 1);
        }
        self.pending_sections.push(name.to_string());
    }

    fn place_op(&mut self, op: Operation, timing: &TimingModel) -> CompileResult<()> {
        let qubits = op.qubits();
        let mut start = self.floor;
        for q in &qubits {
            let ready = self.ready.get(q.0 as usize).copied().ok_or_else(|| {
                CompileError::InvalidConfiguration(format!(
                    "{q} is outside the declared {} qubits",
                    self.ready.len()
                ))
            })?;
            start = start.max(ready);
        }

        if self.current.as_ref().is_some_and(|b| b.cycle != start) {
            self.flush();
        }
        if self.current.is_none() {
            self.current = Some(Bundle::new(start));
        }

        for q in &qubits {
            if !self.busy.insert(*q) {
                return Err(CompileError::SchedulingConflict {
                    instruction: op.to_string(),
                    qubit: *q,
                    cycle: start,
                });
            }
        }

        let free_at = release_cycle(start, timing.occupancy(&op))?;
        for q in &qubits {
            self.ready[q.0 as usize] = free_at;
        }
        self.horizon = self.horizon.max(free_at);
        self.floor = start;

        if let Some(bundle) = self.current.as_mut() {
            bundle.instructions.push(ScheduledInstruction::Op(op));
        }
        Ok(())
    }

    fn place_classical(&mut self, inst: ScheduledInstruction, duration: u64) -> CompileResult<()> {
        let mut start = self
            .ready
            .iter()
            .copied()
            .fold(self.floor, u64::max);
        if let Some(cycle) = self.current.as_ref().map(|b| b.cycle).or(self.last_cycle) {
            start = start.max(release_cycle(cycle, 1)?);
        }
        let free_at = release_cycle(start, duration)?;
        self.flush();

        let mut bundle = Bundle::new(start);
        bundle.instructions.push(inst);
        self.current = Some(bundle);
        self.flush();

        self.ready.iter_mut().for_each(|r| *r = free_at);
        self.horizon = self.horizon.max(free_at);
        self.floor = start;
        Ok(())
    }

    /// Move the open bundle into `items`, preceded by any idle gap and
    /// the sections opened since the previous bundle.
    fn flush(&mut self) {
        let Some(bundle) = self.current.take() else {
            return;
        };
        self.busy.clear();

        let gap = match self.last_cycle {
            Some(last) => bundle.cycle - last - 1,
            None => bundle.cycle,
        };
        if gap > 0 {
            self.items.push(ScheduleItem::Skip(gap));
        }
        self.items
            .extend(self.pending_sections.drain(..).map(ScheduleItem::Section));

        debug!(
            "Bundle at cycle {} with {} instructions",
            bundle.cycle,
            bundle.instructions.len()
        );
        self.last_cycle = Some(bundle.cycle);
        self.items.push(ScheduleItem::Bundle(bundle));
    }

    fn finish(mut self, program: &LoweredProgram) -> ScheduledProgram {
        self.flush();

        if let Some(last) = self.last_cycle {
            let trailing = self.horizon.saturating_sub(last + 1);
            if trailing > 0 {
                self.items.push(ScheduleItem::Skip(trailing));
            }
        }
        self.items
            .extend(self.pending_sections.drain(..).map(ScheduleItem::Section));

        ScheduledProgram {
            name: program.name.clone(),
            num_qubits: program.num_qubits,
            items: self.items,
            total_cycles: self.horizon,
        }
    }
}
