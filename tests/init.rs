use std::path::Path;
use std::process::{Command, Output};

use threshold_core::{Config, ThresholdConfig};

fn run_init(dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_threshold"))
        .arg("init")
        .current_dir(dir)
        .env_remove("THRESHOLD_LOG")
        .output()
        .unwrap()
}

#[test]
fn init_writes_template_with_default_thresholds() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_init(dir.path());
    assert!(
        output.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Created .threshold.toml"));

    let content = std::fs::read_to_string(dir.path().join(".threshold.toml")).unwrap();
    let config = Config::from_toml(&content).unwrap();
    assert_eq!(config.thresholds, ThresholdConfig::default());
    assert_eq!(config.server.bind, "127.0.0.1:8080");
    assert!(config.github.token.is_none());
}

#[test]
fn init_leaves_existing_config_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let existing = "[thresholds]\nmax_files = 25\nstrict = true\n";
    let path = dir.path().join(".threshold.toml");
    std::fs::write(&path, existing).unwrap();

    let output = run_init(dir.path());

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains(".threshold.toml already exists"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), existing);
}

#[test]
fn init_reports_existing_file_even_when_unparseable() {
    let dir = tempfile::tempdir().unwrap();
    let broken = "[thresholds\nmax_files = ";
    let path = dir.path().join(".threshold.toml");
    std::fs::write(&path, broken).unwrap();

    let output = run_init(dir.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(".threshold.toml already exists"), "{stderr}");
    assert!(!stderr.contains("TOML parse error"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
}
