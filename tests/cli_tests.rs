use regex::Regex;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn swarmforge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_swarmforge"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn best_fitness(output: &Output) -> f64 {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let re = Regex::new(r"(?m)^Best fitness: (\S+)$").unwrap();
    let caps = re
        .captures(&stdout)
        .unwrap_or_else(|| panic!("no result line in output:\n{}", stdout));
    caps[1].parse().unwrap()
}

const QUICK: &[&str] = &["--particles", "12", "--iterations", "15", "-d", "2"];

#[test]
fn test_run_is_reproducible_with_seed() {
    let mut args = vec!["run", "-S", "77"];
    args.extend_from_slice(QUICK);

    let a = swarmforge(&args);
    let b = swarmforge(&args);
    assert!(a.status.success(), "stderr: {}", String::from_utf8_lossy(&a.stderr));
    assert!(b.status.success());
    assert_eq!(best_fitness(&a), best_fitness(&b));
}

#[test]
fn test_run_writes_csv_and_json_log() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out").join("best.csv");
    let json_path = dir.path().join("log.json");

    let mut args = vec![
        "run",
        "-S",
        "5",
        "--csv",
        csv_path.to_str().unwrap(),
        "--log-json",
        json_path.to_str().unwrap(),
    ];
    args.extend_from_slice(QUICK);
    let output = swarmforge(&args);
    assert!(output.status.success());

    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "iteration,unit_id,p0,p1,best_fitness");
    assert_eq!(lines.len(), 1 + 15);
    assert!(lines[15].starts_with("15,1,"));

    let log: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(log["best_fitness"].as_array().unwrap().len(), 15);
}

#[test]
fn test_config_file_with_cli_override() {
    let dir = TempDir::new().unwrap();
    let cfg_path = dir.path().join("swarm.json");
    fs::write(
        &cfg_path,
        r#"{ "swarm": { "particles": 9, "iterations": 4000, "topology": "ring" },
             "problem": { "function": "rosenbrock", "dimensions": 2 } }"#,
    )
    .unwrap();

    let output = swarmforge(&[
        "run",
        "--config",
        cfg_path.to_str().unwrap(),
        "--iterations",
        "10",
        "-S",
        "1",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(best_fitness(&output).is_finite());
}

#[test]
fn test_invalid_configuration_exits_non_zero() {
    let output = swarmforge(&["run", "--topology", "ring", "--neighbors", "4", "--particles", "10"]);
    assert!(!output.status.success());

    let output = swarmforge(&["run", "--bounds", "1:0"]);
    assert!(!output.status.success());
}

#[test]
fn test_compare_runs_both_topologies() {
    let mut args = vec!["compare", "-S", "3"];
    args.extend_from_slice(QUICK);
    let output = swarmforge(&args);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sphere / global"));
    assert!(stdout.contains("sphere / ring(k=3)"));
}

#[test]
fn test_restarts_from_largest_seed_wrap_around() {
    let mut args = vec!["run", "-S", "18446744073709551615", "-a", "2"];
    args.extend_from_slice(QUICK);
    let output = swarmforge(&args);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(best_fitness(&output).is_finite());
}

#[test]
fn test_compare_rejects_bad_ring_before_running() {
    let output = swarmforge(&["compare", "--particles", "3", "--iterations", "5", "-d", "2"]);
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("must be smaller than the swarm"));
    assert!(!stdout.contains("Starting PSO"));
}
