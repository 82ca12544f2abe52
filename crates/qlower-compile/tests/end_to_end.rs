//! End-to-end tests for lowering and scheduling.
//!
//! Each test builds a complete program, runs it through `compile`, and
//! checks the resulting bundles against hand-derived cycle numbers.

use qlower_compile::{
    BranchKind, LoweredInstruction, ScheduleItem, ScheduledInstruction, ScheduledProgram,
    TimingModel, compile, lower,
};
use qlower_ir::{Block, CmpOp, Condition, Program, QubitId, RegisterId};

/// Helper: render every bundle as `(cycle, [instruction text])`.
fn rendered_bundles(scheduled: &ScheduledProgram) -> Vec<(u64, Vec<String>)> {
    scheduled
        .bundles()
        .map(|b| {
            (
                b.cycle,
                b.instructions.iter().map(ToString::to_string).collect(),
            )
        })
        .collect()
}

/// Helper: assert the listing accounts for every cycle exactly once.
fn assert_accounting(scheduled: &ScheduledProgram) {
    assert_eq!(
        scheduled.num_bundles() as u64 + scheduled.skipped_cycles(),
        scheduled.total_cycles,
        "bundles + skips must equal total cycles"
    );
}

fn teleport() -> Program {
    let mut kernel = Block::new("First");
    for q in 0..3 {
        kernel.prepz(QubitId(q));
    }
    kernel
        .h(QubitId(1))
        .cz(QubitId(1), QubitId(2))
        .cnot(QubitId(0), QubitId(1))
        .h(QubitId(0))
        .measure(QubitId(0))
        .measure(QubitId(1))
        .cnot(QubitId(1), QubitId(2))
        .cz(QubitId(0), QubitId(2));

    let mut program = Program::new("quantum_teleportation", 3, 0);
    program.add_block(kernel).unwrap();
    program
}

// ============================================================================
// Teleportation
// ============================================================================

#[test]
fn test_teleport_bundles() {
    let timing = TimingModel::default();
    let gap = timing.readout_gap;
    let scheduled = compile(&teleport(), &timing).unwrap();

    let expected: Vec<(u64, Vec<String>)> = vec![
        (0, vec!["prep_z q[0]", "prep_z q[1]", "prep_z q[2]"]),
        (1, vec!["h q[1]"]),
        (2, vec!["cz q[1], q[2]"]),
        (3, vec!["cnot q[0], q[1]"]),
        (4, vec!["h q[0]"]),
        (5, vec!["measure q[0]", "measure q[1]"]),
        (6 + gap, vec!["cnot q[1], q[2]"]),
        (7 + gap, vec!["cz q[0], q[2]"]),
    ]
    .into_iter()
    .map(|(c, ops)| (c, ops.into_iter().map(String::from).collect()))
    .collect();

    assert_eq!(rendered_bundles(&scheduled), expected);
    assert!(scheduled.items.contains(&ScheduleItem::Skip(gap)));
    assert_accounting(&scheduled);
}

#[test]
fn test_teleport_respects_custom_gap() {
    let timing = TimingModel {
        readout_gap: 3,
        ..TimingModel::default()
    };
    let scheduled = compile(&teleport(), &timing).unwrap();
    let cycles: Vec<u64> = scheduled.bundles().map(|b| b.cycle).collect();
    assert_eq!(cycles, vec![0, 1, 2, 3, 4, 5, 9, 10]);
    assert_accounting(&scheduled);
}

#[test]
fn test_double_teleport_verifies() {
    let mut kernel = Block::new("double_teleportation_kernel");
    for q in 0..6 {
        kernel.prepz(QubitId(q));
    }
    kernel
        .h(QubitId(2))
        .cz(QubitId(2), QubitId(4))
        .h(QubitId(3))
        .cz(QubitId(3), QubitId(5))
        .cnot(QubitId(0), QubitId(2))
        .h(QubitId(0))
        .measure(QubitId(0))
        .measure(QubitId(2))
        .cnot(QubitId(2), QubitId(4))
        .cz(QubitId(0), QubitId(4))
        .cnot(QubitId(1), QubitId(3))
        .h(QubitId(1))
        .measure(QubitId(1))
        .measure(QubitId(3))
        .cnot(QubitId(3), QubitId(5))
        .cz(QubitId(1), QubitId(5));

    let mut program = Program::new("double_quantum_teleportation", 6, 0);
    program.add_block(kernel).unwrap();

    let scheduled = compile(&program, &TimingModel::default()).unwrap();
    assert_eq!(scheduled.timed_operations().len(), 22);
    assert_accounting(&scheduled);

    // Every bundle holds disjoint qubits.
    for bundle in scheduled.bundles() {
        let mut qubits: Vec<QubitId> = bundle
            .instructions
            .iter()
            .flat_map(ScheduledInstruction::qubits)
            .collect();
        let n = qubits.len();
        qubits.sort();
        qubits.dedup();
        assert_eq!(qubits.len(), n, "bundle at cycle {} reuses a qubit", bundle.cycle);
    }
}

// ============================================================================
// Counted loops
// ============================================================================

#[test]
fn test_lotto_loop_copies_never_interleave() {
    let mut body = Block::new("lotto");
    for q in 0..6 {
        body.h(QubitId(q));
    }
    for q in 0..6 {
        body.measure(QubitId(q));
    }

    let mut program = Program::new("quantum_lotto", 6, 0);
    program.add_for(body, 2).unwrap();

    let lowered = lower(&program).unwrap();
    assert_eq!(lowered.operations().filter(|op| op.name() == "h").count(), 12);
    assert_eq!(lowered.operations().filter(|op| op.is_measure()).count(), 12);

    let scheduled = compile(&program, &TimingModel::default()).unwrap();
    let timed = scheduled.timed_operations();
    assert_eq!(timed.len(), 24);

    let first_copy_end = timed[..12].iter().map(|(c, _)| *c).max().unwrap();
    let second_copy_start = timed[12..].iter().map(|(c, _)| *c).min().unwrap();
    assert!(second_copy_start > first_copy_end);

    // Second copy's gates wait for the first copy's readout.
    assert_eq!(
        second_copy_start,
        first_copy_end + 1 + TimingModel::default().readout_gap
    );
    assert_accounting(&scheduled);
}

#[test]
fn test_zero_iteration_loop_contributes_nothing() {
    let mut body = Block::new("never");
    body.x(QubitId(0));
    let mut after = Block::new("after");
    after.y(QubitId(0));

    let mut program = Program::new("p", 1, 0);
    program.add_for(body, 0).unwrap();
    program.add_block(after).unwrap();

    let scheduled = compile(&program, &TimingModel::default()).unwrap();
    assert_eq!(scheduled.timed_operations().len(), 1);
    assert_eq!(scheduled.sections(), vec!["never", "after"]);
}

// ============================================================================
// Classical control flow
// ============================================================================

fn classical_flow() -> Program {
    let r0 = RegisterId(0);
    let r1 = RegisterId(1);
    let mut program = Program::new("test_classical", 5, 10);

    program.add_block(Block::new("First")).unwrap();

    let mut then_block = Block::new("Thenpart");
    then_block.x(QubitId(0));
    let mut else_block = Block::new("Elsepart");
    else_block.y(QubitId(0));
    program
        .add_if_else(then_block, else_block, Condition::new(r0, CmpOp::Eq, r1))
        .unwrap();

    let mut loop_body = Block::new("Loopbody");
    loop_body.x(QubitId(0));
    program.add_for(loop_body, 10).unwrap();

    let mut after_loop = Block::new("Afterloop");
    after_loop.y(QubitId(0));
    program.add_block(after_loop).unwrap();

    let mut do_body = Block::new("Dowhileloopbody");
    do_body.x(QubitId(0));
    program
        .add_do_while(do_body, Condition::new(r0, CmpOp::Lt, r1))
        .unwrap();

    let mut after_do = Block::new("Afterdowhile");
    after_do.y(QubitId(0));
    program.add_block(after_do).unwrap();

    program
}

#[test]
fn test_classical_flow_lowering() {
    let lowered = lower(&classical_flow()).unwrap();

    assert_eq!(
        lowered.labels(),
        vec![
            "First",
            "Thenpart",
            "Elsepart",
            "Loopbody",
            "Afterloop",
            "Dowhileloopbody",
            "Afterdowhile"
        ]
    );
    assert_eq!(lowered.num_operations(), 15);

    let compares: Vec<BranchKind> = lowered
        .instructions
        .iter()
        .filter_map(|inst| match inst {
            LoweredInstruction::Compare { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(compares, vec![BranchKind::IfElse, BranchKind::DoWhile]);
}

#[test]
fn test_if_else_compare_precedes_then_ops() {
    let lowered = lower(&classical_flow()).unwrap();
    let pos = lowered
        .instructions
        .iter()
        .position(|inst| matches!(inst, LoweredInstruction::Compare { .. }))
        .unwrap();

    assert!(matches!(
        lowered.instructions[pos + 1],
        LoweredInstruction::Op(op) if op.name() == "x"
    ));
    assert_eq!(lowered.instructions[pos + 2], LoweredInstruction::SkipElse);
    assert_eq!(
        lowered.instructions[pos + 3],
        LoweredInstruction::Label("Elsepart".into())
    );
}

#[test]
fn test_classical_flow_schedule() {
    let scheduled = compile(&classical_flow(), &TimingModel::default()).unwrap();
    assert_accounting(&scheduled);

    let cycles: Vec<u64> = scheduled.bundles().map(|b| b.cycle).collect();
    assert!(cycles.windows(2).all(|w| w[0] < w[1]));

    // Compare and branch markers each sit alone in their bundle.
    let classical: Vec<_> = scheduled.bundles().filter(|b| b.is_classical()).collect();
    assert_eq!(classical.len(), 3);
    assert!(classical.iter().all(|b| b.instructions.len() == 1));

    // 15 gates plus 3 classical markers, one cycle each, nothing measured.
    assert_eq!(scheduled.total_cycles, 18);
    assert_eq!(scheduled.skipped_cycles(), 0);
}
