use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "bridge-crew"])
        .status()
        .expect("failed to invoke cargo check for bridge-crew CLI binary");

    assert!(status.success(), "cargo check --bin bridge-crew should succeed");
}

#[test]
fn bundled_map_runs_to_completion_headless() {
    let map = concat!(env!("CARGO_MANIFEST_DIR"), "/maps/example_river.txt");
    let output = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args([
            "run",
            "--quiet",
            "--bin",
            "bridge-crew",
            "--",
            "--map",
            map,
            "--max-ticks",
            "50",
        ])
        .output()
        .expect("failed to invoke cargo run for bridge-crew CLI binary");

    assert!(output.status.success(), "bridge-crew should exit cleanly");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ticks run"), "summary missing from output:\n{stdout}");
}
