use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::tempdir;

const REPORT_HEADER: &str = "A,B,C,D,sigma,alpha,convergence_rate,top_score,median_score";

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_st-matcher-cli"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SPIRAL_DETERMINISTIC_SEED")
        .output()
        .unwrap()
}

fn write_report(root: &Path, run: usize, rate: &str) {
    let dir = root.join(run.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("report.csv"),
        format!("{REPORT_HEADER}\n1,1,1,1,0.5,50,{rate},,\n"),
    )
    .unwrap();
}

const SMALL_CONFIG: &str = r#"
size = 3
trials = 6
max_epochs = 60

[[params]]
A = 100
B = 100
C = 90
D = 20
sigma = 1.1

[[params]]
A = 1
B = 1
C = 1
D = 1
sigma = 0.5
alpha = 2
"#;

fn write_config(dir: &Path) -> String {
    let path = dir.join("sweep.toml");
    fs::write(&path, SMALL_CONFIG).unwrap();
    path.to_str().unwrap().to_owned()
}

fn sweep(dir: &Path, name: &str, extra: &[&str]) -> (Output, PathBuf) {
    let config = write_config(dir);
    let report = dir.join(format!("{name}.csv"));
    let log = dir.join(format!("{name}.log"));
    let mut args = vec![
        "sweep",
        "--config",
        config.as_str(),
        "--output",
        report.to_str().unwrap(),
        "--log-file",
        log.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    (run_cli(&args), report)
}

#[test]
fn seeded_sweeps_write_identical_reports() {
    let dir = tempdir().unwrap();
    let (first, first_report) = sweep(dir.path(), "first", &["--seed", "5"]);
    let (second, second_report) = sweep(dir.path(), "second", &["--seed", "5", "--sequential"]);
    assert!(first.status.success());
    assert!(second.status.success());

    let first = fs::read(&first_report).unwrap();
    assert_eq!(first, fs::read(&second_report).unwrap());
    assert_eq!(String::from_utf8(first).unwrap().lines().count(), 3);
}

#[test]
fn trials_flag_overrides_the_configuration() {
    let dir = tempdir().unwrap();
    let (output, report) = sweep(dir.path(), "short", &["--seed", "9", "--trials", "2"]);
    assert!(output.status.success());

    let log = fs::read_to_string(dir.path().join("short.log")).unwrap();
    assert!(log.contains("trials=2"), "log: {log}");
    assert!(log.contains("generating ranks"), "log: {log}");
    assert!(log.contains("randomized"), "log: {log}");

    let report = fs::read_to_string(report).unwrap();
    for row in report.lines().skip(1) {
        let rate: f64 = row.split(',').nth(6).unwrap().parse().unwrap();
        assert!([0.0, 0.5, 1.0].contains(&rate), "rate {rate} is not k/2");
    }
}

#[test]
fn rank_file_of_matching_size_drives_the_sweep() {
    let dir = tempdir().unwrap();
    let ranks = dir.path().join("ranks.csv");
    fs::write(&ranks, "1,2,3\n3,1,2\n2,3,1\n").unwrap();

    let (output, report) = sweep(
        dir.path(),
        "ranked",
        &["--seed", "3", "--ranks", ranks.to_str().unwrap()],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fs::read_to_string(report).unwrap().lines().count(), 3);

    let log = fs::read_to_string(dir.path().join("ranked.log")).unwrap();
    assert!(log.contains("loading ranks"), "log: {log}");
}

#[test]
fn rank_file_of_wrong_size_fails_before_any_trial() {
    let dir = tempdir().unwrap();
    let ranks = dir.path().join("ranks.csv");
    fs::write(&ranks, "1,2,3,4\n4,1,2,3\n3,4,1,2\n2,3,4,1\n").unwrap();

    let (output, report) = sweep(
        dir.path(),
        "mismatch",
        &["--seed", "3", "--ranks", ranks.to_str().unwrap()],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("4x4"), "stderr: {stderr}");
    assert!(!report.exists());

    let log = fs::read_to_string(dir.path().join("mismatch.log")).unwrap();
    assert!(!log.contains("using params"), "log: {log}");
}

#[test]
fn sweep_cli_writes_report_and_log() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("sweep.toml");
    let report_path = dir.path().join("out").join("report.csv");
    let log_path = dir.path().join("test.log");

    fs::write(
        &config_path,
        r#"
size = 3
trials = 4
max_epochs = 50
seed = 11

[[params]]
A = 100
B = 100
C = 90
D = 20
sigma = 1.1
"#,
    )
    .unwrap();

    let output = run_cli(&[
        "sweep",
        "--config",
        config_path.to_str().unwrap(),
        "--output",
        report_path.to_str().unwrap(),
        "--log-file",
        log_path.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report = fs::read_to_string(&report_path).unwrap();
    let mut lines = report.lines();
    assert_eq!(lines.next(), Some(REPORT_HEADER));
    let row = lines.next().unwrap();
    assert!(row.starts_with("100,100,90,20,1.1,50,"));
    assert_eq!(lines.next(), None);

    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("report written"));
}

#[test]
fn aggregate_cli_prints_mean_rate_per_key() {
    let dir = tempdir().unwrap();
    write_report(dir.path(), 1, "0.4");
    write_report(dir.path(), 2, "0.6");

    let output = run_cli(&[
        "aggregate",
        "--root",
        dir.path().to_str().unwrap(),
        "--runs",
        "2",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1,1,1,1,0.5,50 0.5"), "stdout: {stdout}");
}

#[test]
fn aggregate_cli_fails_on_missing_run() {
    let dir = tempdir().unwrap();
    write_report(dir.path(), 1, "0.4");

    let output = run_cli(&[
        "aggregate",
        "--root",
        dir.path().to_str().unwrap(),
        "--runs",
        "2",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}
