//! CLI smoke tests: verify basic binary behavior.

use std::path::Path;
use std::process::Command;

fn cli_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_restack"));
    cmd.env_remove("RESTACK_OUTPUT")
        .env_remove("RESTACK_SUMMARY")
        .env_remove("RESTACK_DATA_DIR")
        .env_remove("RESTACK_MIN_SUBJECT")
        .env_remove("RESTACK_CONFIG");
    cmd
}

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_help_flag() {
    let output = cli_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Usage"),
        "Expected usage info in --help output"
    );
    assert!(stdout.contains("cut"));
    assert!(stdout.contains("summary"));
}

#[test]
fn test_version_flag() {
    let output = cli_bin().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("restack"),
        "Expected binary name in --version output"
    );
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    write(&dir.path().join("long.csv"), "id,rt\nP01,1\n");

    let output = cli_bin()
        .current_dir(dir.path())
        .arg("--config")
        .arg(dir.path().join("nonexistent_restack.toml"))
        .args(["summary", "long.csv"])
        .output()
        .expect("failed to run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("column,n,mean,sem\n"));
}

#[test]
fn test_malformed_config_exits_nonzero() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir(&data).unwrap();
    write(&data.join("130.txt"), "{\"rt\": 0.5}\n{\"rt\": 0.75}\n");
    write(
        &dir.path().join("restack.toml"),
        "[cut]\nstart = 1\nlength = 1\ncount = \"two\"\n",
    );

    let output = cli_bin()
        .current_dir(dir.path())
        .arg("run")
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse TOML config"), "{}", stderr);
}

#[test]
fn test_cut_writes_long_csv_to_stdout() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("wide.csv");
    write(&input, "id,a1,b1,a2,b2\nP01,1,2,3,4\n");

    let output = cli_bin()
        .current_dir(dir.path())
        .args(["cut", "wide.csv", "--start", "1", "--length", "2", "--count", "2"])
        .output()
        .expect("failed to run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "id,a,b\nP01,1,2\nP01,3,4\n"
    );
}

#[test]
fn test_cut_hoists_skip_column() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("wide.csv");
    write(&input, "id,a1,b1,note,a2,b2\nP01,1,2,x,3,4\n");
    let out = dir.path().join("long.csv");

    let output = cli_bin()
        .current_dir(dir.path())
        .args(["cut", "wide.csv", "--start", "1", "--length", "2", "--count", "2"])
        .args(["--skip", "3", "-o"])
        .arg(&out)
        .output()
        .expect("failed to run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "id,note,a,b\nP01,x,1,2\nP01,x,3,4\n"
    );
}

#[test]
fn test_misaligned_cut_exits_nonzero() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("wide.csv");
    write(&input, "id,a1,b1,a2,b2,extra\nP01,1,2,3,4,5\n");

    let output = cli_bin()
        .current_dir(dir.path())
        .args(["cut", "wide.csv", "--start", "1", "--length", "2", "--count", "2"])
        .args(["--end", "6"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("misaligned cut"), "{}", stderr);
}

#[test]
fn test_cut_without_region_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("wide.csv");
    write(&input, "id,a1,a2\nP01,1,2\n");

    let output = cli_bin()
        .current_dir(dir.path())
        .args(["cut", "wide.csv", "--start", "1"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--length"));
}

#[test]
fn test_summary_reports_mean_and_sem() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("long.csv");
    write(&input, "id,rt\nP01,1\nP01,3\n");

    let output = cli_bin()
        .current_dir(dir.path())
        .args(["summary", "long.csv"])
        .output()
        .expect("failed to run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("column,n,mean,sem"));
    assert_eq!(lines.next(), Some("rt,2,2.0,1.0"));
}

#[test]
fn test_run_uses_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir(&data).unwrap();
    write(
        &data.join("130.txt"),
        "{\"block\": \"train_1\", \"rt\": 0.5}\n{\"block\": \"train_1\", \"rt\": 0.75}\n",
    );
    write(
        &dir.path().join("restack.toml"),
        "[input]\ndata_dir = \"data\"\n\n[cut]\nstart = 1\nlength = 2\ncount = 2\n",
    );

    let output = cli_bin()
        .current_dir(dir.path())
        .arg("run")
        .output()
        .expect("failed to run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "id,block,rt\n130,train_1,0.5\n130,train_1,0.75\n"
    );
}

#[test]
fn test_run_on_empty_dir_fails() {
    let dir = tempfile::TempDir::new().unwrap();

    let output = cli_bin()
        .current_dir(dir.path())
        .args(["run", "--data-dir"])
        .arg(dir.path())
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No trial logs"));
}
