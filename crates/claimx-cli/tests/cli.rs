use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INVOICE: &str = "INVOICE NUMBER: 10002
MEMBER NAME: Emily Davis

  DIAGNOSIS: Dermatitis
13119033 DOXYCYCLINE 100MG TABLETS 1 3000 3000.0
Net Value: 3000.0
";

/// Command isolated from the developer's environment and config.
fn claimx(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("claimx").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("TOGETHER_API_KEY")
        .env_remove("LLM_MODEL")
        .env_remove("LLM_TEMPERATURE")
        .env_remove("LLM_MAX_TOKENS")
        .env_remove("LLM_API_URL")
        .env_remove("LLM_TIMEOUT_SECS");
    cmd
}

#[test]
fn test_preparse_prints_pattern_record() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("emily.txt");
    fs::write(&input, INVOICE).unwrap();

    claimx(&home)
        .arg("preparse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source_filename\": \"emily.txt\""))
        .stdout(predicate::str::contains("\"invoice_number\": \"10002\""))
        .stdout(predicate::str::contains("\"description\": \"Dermatitis\""))
        .stdout(predicate::str::contains("\"raw_net_value\": \"3000.0\""));
}

#[test]
fn test_preparse_filename_override() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("scan.txt");
    fs::write(&input, INVOICE).unwrap();

    claimx(&home)
        .args(["preparse", "--filename", "claim.pdf"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source_filename\": \"claim.pdf\""));
}

#[test]
fn test_preparse_blank_file_fails() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("blank.txt");
    fs::write(&input, "  \n\n").unwrap();

    claimx(&home)
        .arg("preparse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no text"));
}

#[test]
fn test_extract_requires_api_key() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("emily.txt");
    fs::write(&input, INVOICE).unwrap();

    claimx(&home)
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("TOGETHER_API_KEY"));
}

#[test]
fn test_missing_input_reported() {
    let home = TempDir::new().unwrap();

    claimx(&home)
        .args(["preparse", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_config_init_get_set() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("claimx.json");

    claimx(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    claimx(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    claimx(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "model.max_tokens"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1500"));

    claimx(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "qa.max_context_chars", "500"])
        .assert()
        .success();

    claimx(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "qa.max_context_chars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("500"));

    claimx(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "model.no_such_key", "1"])
        .assert()
        .failure();
}
