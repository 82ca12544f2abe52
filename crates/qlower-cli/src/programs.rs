//! Built-in example programs.

use anyhow::{Result, bail};

use qlower_ir::{Block, CmpOp, Condition, IrResult, Program, QubitId, RegisterId};

/// Qubits used by the Grover search.
pub const GROVER_QUBITS: u32 = 10;

/// A named catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
}

/// All programs `qlower compile` accepts.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "teleport",
        description: "3-qubit state teleportation",
    },
    CatalogEntry {
        name: "double-teleport",
        description: "two interleaved teleportations on 6 qubits",
    },
    CatalogEntry {
        name: "lotto",
        description: "6-qubit random draw, repeated twice in a counted loop",
    },
    CatalogEntry {
        name: "classical-flow",
        description: "if/else, counted loop and do-while over classical registers",
    },
    CatalogEntry {
        name: "grover",
        description: "10-qubit Grover search for a marked value",
    },
    CatalogEntry {
        name: "deutsch-jozsa",
        description: "Deutsch-Jozsa with a balanced 2-bit oracle",
    },
];

/// Build a catalog program by name.
///
/// `marked` selects the value the Grover oracle flags; other programs
/// ignore it.
pub fn build(name: &str, marked: u32) -> Result<Program> {
    let program = match name {
        "teleport" => teleport()?,
        "double-teleport" => double_teleport()?,
        "lotto" => lotto()?,
        "classical-flow" => classical_flow()?,
        "grover" => {
            if marked >= 1 << GROVER_QUBITS {
                bail!(
                    "Marked value {marked} does not fit in {GROVER_QUBITS} qubits (max {})",
                    (1_u32 << GROVER_QUBITS) - 1
                );
            }
            grover(marked)?
        }
        "deutsch-jozsa" => deutsch_jozsa()?,
        other => {
            let names: Vec<&str> = CATALOG.iter().map(|e| e.name).collect();
            bail!(
                "Unknown program: '{other}'. Available: {}",
                names.join(", ")
            );
        }
    };
    Ok(program)
}

fn q(i: u32) -> QubitId {
    QubitId(i)
}

fn teleport() -> IrResult<Program> {
    let mut k = Block::new("teleportation_kernel");
    for i in 0..3 {
        k.prepz(q(i));
    }
    k.h(q(1))
        .cz(q(1), q(2))
        .cnot(q(0), q(1))
        .h(q(0))
        .measure(q(0))
        .measure(q(1))
        .cnot(q(1), q(2))
        .cz(q(0), q(2));

    let mut program = Program::new("quantum_teleportation", 3, 0);
    program.add_block(k)?;
    Ok(program)
}

fn double_teleport() -> IrResult<Program> {
    let mut k = Block::new("double_teleportation_kernel");
    for i in 0..6 {
        k.prepz(q(i));
    }
    // Entangled pairs (2, 4) and (3, 5) carry qubits 0 and 1.
    k.h(q(2))
        .cz(q(2), q(4))
        .h(q(3))
        .cz(q(3), q(5))
        .cnot(q(0), q(2))
        .h(q(0))
        .measure(q(0))
        .measure(q(2))
        .cnot(q(2), q(4))
        .cz(q(0), q(4))
        .cnot(q(1), q(3))
        .h(q(1))
        .measure(q(1))
        .measure(q(3))
        .cnot(q(3), q(5))
        .cz(q(1), q(5));

    let mut program = Program::new("double_quantum_teleportation", 6, 0);
    program.add_block(k)?;
    Ok(program)
}

fn lotto() -> IrResult<Program> {
    let mut k = Block::new("lotto");
    for i in 0..6 {
        k.prepz(q(i));
    }
    for i in 0..6 {
        k.h(q(i));
    }
    for i in 0..6 {
        k.measure(q(i));
    }

    let mut program = Program::new("quantum_lotto", 6, 0);
    program.add_for(k, 2)?;
    Ok(program)
}

fn classical_flow() -> IrResult<Program> {
    let (r0, r1) = (RegisterId(0), RegisterId(1));
    let mut program = Program::new("test_classical", 5, 10);

    program.add_block(Block::new("First"))?;

    let mut then_block = Block::new("Thenpart");
    then_block.x(q(0));
    let mut else_block = Block::new("Elsepart");
    else_block.y(q(0));
    program.add_if_else(then_block, else_block, Condition::new(r0, CmpOp::Eq, r1))?;

    let mut loop_body = Block::new("Loopbody");
    loop_body.x(q(0));
    program.add_for(loop_body, 10)?;

    let mut after_loop = Block::new("Afterloop");
    after_loop.y(q(0));
    program.add_block(after_loop)?;

    let mut do_body = Block::new("Dowhileloopbody");
    do_body.x(q(0));
    program.add_do_while(do_body, Condition::new(r0, CmpOp::Lt, r1))?;

    let mut after_do = Block::new("Afterdowhile");
    after_do.y(q(0));
    program.add_block(after_do)?;

    Ok(program)
}

/// Phase flip on the all-ones state, built from an H-CNOT-H ladder onto
/// the last qubit.
fn ladder(k: &mut Block, n: u32) {
    k.h(q(n - 1));
    for i in 0..n - 1 {
        k.cnot(q(i), q(n - 1));
    }
    k.h(q(n - 1));
}

fn grover(marked: u32) -> IrResult<Program> {
    let n = GROVER_QUBITS;
    // Qubit 0 holds the most significant bit.
    let zero_bits: Vec<u32> = (0..n)
        .filter(|i| (marked >> (n - 1 - i)) & 1 == 0)
        .collect();

    let mut k = Block::new("grover");
    for i in 0..n {
        k.h(q(i));
    }

    // Oracle
    for &i in &zero_bits {
        k.x(q(i));
    }
    ladder(&mut k, n);
    for &i in &zero_bits {
        k.x(q(i));
    }

    // Diffusion
    for i in 0..n {
        k.h(q(i));
    }
    for i in 0..n {
        k.x(q(i));
    }
    ladder(&mut k, n);
    for i in 0..n {
        k.x(q(i));
    }
    for i in 0..n {
        k.h(q(i));
    }

    for i in 0..n {
        k.measure(q(i));
    }

    let mut program = Program::new("grover", n, 0);
    program.add_block(k)?;
    Ok(program)
}

fn deutsch_jozsa() -> IrResult<Program> {
    let n = 3;
    let mut k = Block::new("deutsch_jozsa");
    // Ancilla starts in |1>.
    k.x(q(n - 1));
    for i in 0..n {
        k.h(q(i));
    }
    // Balanced oracle f(x) = x0 xor x1.
    k.cnot(q(0), q(2)).cnot(q(1), q(2));
    for i in 0..n - 1 {
        k.h(q(i));
    }
    for i in 0..n - 1 {
        k.measure(q(i));
    }

    let mut program = Program::new("deutsch_jozsa", n, 0);
    program.add_block(k)?;
    Ok(program)
}
