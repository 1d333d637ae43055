use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "snail-run"])
        .status()
        .expect("failed to invoke cargo check for snail-run CLI binary");

    assert!(status.success(), "cargo check --bin snail-run should succeed");
}

#[test]
fn headless_run_reports_final_state() {
    let output = Command::new(env!("CARGO_BIN_EXE_snail-run"))
        .args(["--headless", "--seed", "7", "--frames", "240"])
        .output()
        .expect("failed to run snail-run headless");

    assert!(output.status.success(), "headless run should exit cleanly");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Snail Run."));
    assert!(stdout.contains("frames=240"));
}
