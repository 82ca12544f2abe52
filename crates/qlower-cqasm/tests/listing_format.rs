//! Exact listing text for known programs.

use qlower_compile::{TimingModel, compile};
use qlower_cqasm::{EmitterConfig, ListingInstruction, emit, parse};
use qlower_ir::{Block, CmpOp, Condition, Program, QubitId, RegisterId};

fn teleport() -> Program {
    let (q0, q1, q2) = (QubitId(0), QubitId(1), QubitId(2));
    let mut k = Block::new("kernel");
    k.prepz(q0)
        .prepz(q1)
        .prepz(q2)
        .h(q1)
        .cz(q1, q2)
        .cnot(q0, q1)
        .h(q0)
        .measure(q0)
        .measure(q1)
        .cnot(q1, q2)
        .cz(q0, q2);
    let mut program = Program::new("teleport", 3, 0);
    program.add_block(k).unwrap();
    program
}

#[test]
fn test_teleport_listing() {
    let scheduled = compile(&teleport(), &TimingModel::default()).unwrap();
    let text = emit(&scheduled, &EmitterConfig::default());

    let expected = r#"pragma @ql.name("teleport")

.kernel
    { # start at cycle 0
        prep_z q[0]
        prep_z q[1]
        prep_z q[2]
    }
    { # start at cycle 1
        h q[1]
    }
    { # start at cycle 2
        cz q[1], q[2]
    }
    { # start at cycle 3
        cnot q[0], q[1]
    }
    { # start at cycle 4
        h q[0]
    }
    { # start at cycle 5
        measure q[0]
        measure q[1]
    }
    skip 14
    { # start at cycle 20
        cnot q[1], q[2]
    }
    { # start at cycle 21
        cz q[0], q[2]
    }
"#;
    assert_eq!(text, expected);

    let listing = parse(&text).unwrap();
    assert_eq!(listing.total_cycles(), 22);
    assert_eq!(listing.timed_operations(), scheduled.timed_operations());
}

#[test]
fn test_if_else_listing() {
    let mut init = Block::new("init");
    init.prepz(QubitId(0));
    let mut then_block = Block::new("then");
    then_block.x(QubitId(0));
    let mut else_block = Block::new("else");
    else_block.y(QubitId(0));

    let cond = Condition::new(RegisterId(0), CmpOp::Lt, RegisterId(1));
    let mut program = Program::new("branch", 1, 2);
    program.add_block(init).unwrap();
    program.add_if_else(then_block, else_block, cond).unwrap();

    let scheduled = compile(&program, &TimingModel::default()).unwrap();
    let text = emit(&scheduled, &EmitterConfig::default());

    let expected = r#"pragma @ql.name("branch")

.init
    { # start at cycle 0
        prep_z q[0]
    }
.then
    { # start at cycle 1
        cmp.lt r[0], r[1]
    }
    { # start at cycle 2
        x q[0]
    }
    { # start at cycle 3
        br.else
    }
.else
    { # start at cycle 4
        y q[0]
    }
"#;
    assert_eq!(text, expected);

    let listing = parse(&text).unwrap();
    assert_eq!(listing.sections(), vec!["init", "then", "else"]);
    let classical: Vec<_> = listing
        .instructions()
        .into_iter()
        .filter(|inst| inst.operation().is_none())
        .copied()
        .collect();
    assert_eq!(
        classical,
        vec![
            ListingInstruction::Compare(cond),
            ListingInstruction::BranchElse
        ]
    );
}

#[test]
fn test_trailing_readout_skip() {
    let mut k = Block::new("kernel");
    k.h(QubitId(0)).measure(QubitId(0));
    let mut program = Program::new("readout", 1, 0);
    program.add_block(k).unwrap();

    let scheduled = compile(&program, &TimingModel::uniform(1, 5)).unwrap();
    let text = emit(&scheduled, &EmitterConfig::default());
    assert!(text.ends_with("        measure q[0]\n    }\n    skip 5\n"));
    assert_eq!(parse(&text).unwrap().total_cycles(), 7);
}
