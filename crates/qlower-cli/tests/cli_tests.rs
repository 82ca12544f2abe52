//! End-to-end tests of the `qlower` binary.
//!
//! Each test runs the compiled binary with a scrubbed `QLOWER_*`
//! environment and checks its output or the files it writes.

use std::path::Path;
use std::process::{Command, Output};

use qlower_cqasm::parse;

fn qlower(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qlower"))
        .args(args)
        .env_remove("QLOWER_OUTPUT_DIR")
        .env_remove("QLOWER_LOG_LEVEL")
        .env_remove("QLOWER_NAMESPACE")
        .env_remove("QLOWER_READOUT_GAP")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

// ============================================================================
// compile
// ============================================================================

#[test]
fn test_compile_teleport_to_stdout() {
    let output = qlower(&["compile", "teleport"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    assert!(text.starts_with("pragma @ql.name(\"quantum_teleportation\")\n"));
    assert!(text.contains("    skip 14\n    { # start at cycle 20\n"));

    let listing = parse(&text).unwrap();
    assert_eq!(listing.total_cycles(), 22);
    assert_eq!(listing.sections(), vec!["teleportation_kernel"]);
}

#[test]
fn test_compile_every_catalog_program() {
    for name in [
        "teleport",
        "double-teleport",
        "lotto",
        "classical-flow",
        "grover",
        "deutsch-jozsa",
    ] {
        let output = qlower(&["compile", name]);
        assert!(output.status.success(), "{name}: {}", stderr(&output));
        assert!(parse(&stdout(&output)).unwrap().is_scheduled());
    }
}

#[test]
fn test_compile_flat() {
    let output = qlower(&["compile", "classical-flow", "--flat"]);
    assert!(output.status.success());

    let listing = parse(&stdout(&output)).unwrap();
    assert!(!listing.is_scheduled());
    assert_eq!(listing.sections().len(), 7);
}

#[test]
fn test_compile_writes_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("listings");
    let out_str = out.to_str().unwrap();

    let output = qlower(&["compile", "lotto", "--output-dir", out_str]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Compiled"));

    let written = out.join("quantum_lotto.qasm");
    let listing = parse(&std::fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(listing.timed_operations().len(), 36);
}

#[test]
fn test_compile_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("qlower.yaml");
    std::fs::write(
        &config,
        "namespace: cq\ntiming:\n  readout_gap: 3\n",
    )
    .unwrap();

    let output = qlower(&[
        "compile",
        "teleport",
        "--config",
        config.to_str().unwrap(),
        "--detail",
        "detailed",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    assert!(text.starts_with("pragma @cq.name(\"quantum_teleportation\")\n# total cycles: 11\n"));
    assert!(text.contains("    skip 3\n"));
}

#[test]
fn test_compile_readout_gap_from_env() {
    let output = Command::new(env!("CARGO_BIN_EXE_qlower"))
        .args(["compile", "deutsch-jozsa"])
        .env_remove("QLOWER_OUTPUT_DIR")
        .env_remove("QLOWER_LOG_LEVEL")
        .env_remove("QLOWER_NAMESPACE")
        .env("QLOWER_READOUT_GAP", "5")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("    skip 5\n"));
}

#[test]
fn test_compile_unknown_program_fails() {
    let output = qlower(&["compile", "shor"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown program: 'shor'"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.yaml");
    std::fs::write(&config, "log_level: loud\n").unwrap();

    let output = qlower(&["compile", "teleport", "-c", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid log level"));
}

// ============================================================================
// inspect / programs / version
// ============================================================================

#[test]
fn test_inspect_written_listing() {
    let dir = tempfile::tempdir().unwrap();
    let out_str = dir.path().to_str().unwrap();
    assert!(qlower(&["compile", "teleport", "-o", out_str]).status.success());

    let file = Path::new(out_str).join("quantum_teleportation.qasm");
    let output = qlower(&["inspect", file.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Bundles:     8"));
    assert!(text.contains("Skipped:     14 cycles"));
    assert!(text.contains("22 cycles"));
}

#[test]
fn test_inspect_missing_file() {
    let output = qlower(&["inspect", "/nonexistent/listing.qasm"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("File not found"));
}

#[test]
fn test_inspect_malformed_listing() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bad.qasm");
    std::fs::write(
        &file,
        "pragma @ql.name(\"bad\")\n.k\n    { # start at cycle 4\n        h q[0]\n    }\n",
    )
    .unwrap();

    let output = qlower(&["inspect", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("claims cycle 4"));
}

#[test]
fn test_programs_lists_catalog() {
    let output = qlower(&["programs"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for name in ["teleport", "double-teleport", "lotto", "classical-flow", "grover", "deutsch-jozsa"] {
        assert!(text.contains(name), "missing {name}");
    }
}

#[test]
fn test_version() {
    let output = qlower(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}
