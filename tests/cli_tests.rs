use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn abafile_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("abafile"))
}

fn init_config(temp_dir: &TempDir) -> PathBuf {
    let config_path = temp_dir.path().join("abafile-config");
    abafile_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();
    config_path
}

fn write_batch(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

const MIXED_BATCH_JSON: &str = r#"{
  "id": "b-7",
  "number": "PB-0007",
  "items": [
    {
      "id": "paid",
      "payee_id": "p1",
      "payee_name": "Allied Health",
      "amount": 12345,
      "bank": { "routing_code": "082-001", "account_number": "123456", "account_name": "Allied Health" }
    },
    {
      "id": "unbanked",
      "payee_id": "p2",
      "payee_name": "No Details Yet",
      "amount": 5000,
      "bank": { "routing_code": "033-000" }
    }
  ]
}"#;

#[test]
fn test_help() {
    abafile_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Direct Entry (ABA) payment file generator"));
}

#[test]
fn test_version() {
    abafile_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("abafile"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("abafile-config");

    abafile_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized abafile config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("batch.example.toml").exists());
    assert!(config_path.join("output").is_dir());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    abafile_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    abafile_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    abafile_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your Plan Management Pty Ltd"))
        .stdout(predicate::str::contains("062-000"))
        .stdout(predicate::str::contains("CRLF"));
}

#[test]
fn test_preview_example_batch() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let batch = config_path.join("batch.example.toml");

    abafile_cmd()
        .args(["preview", "--batch", batch.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("BANKABLE"))
        .stdout(predicate::str::contains("$2,500.00"))
        .stdout(predicate::str::contains("Records:  2"))
        .stdout(predicate::str::contains("$4,250.50"));
}

#[test]
fn test_preview_shows_excluded_items() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(temp_dir.path(), "batch.json", MIXED_BATCH_JSON);

    abafile_cmd()
        .args(["preview", "--batch", batch.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("EXCLUDED (no account_number, account_name)"))
        .stdout(predicate::str::contains("Excluded: 1"));
}

#[test]
fn test_generate_example_batch() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let batch = config_path.join("batch.example.toml");

    abafile_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--batch",
            batch.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated PB-0001"))
        .stdout(predicate::str::contains("Records:  2"));

    let content = fs::read_to_string(config_path.join("output").join("PB-0001.aba")).unwrap();
    let lines: Vec<&str> = content.split("\r\n").collect();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().all(|l| l.len() == 120));
    assert_eq!(&lines[0][74..80], "150126");
    assert_eq!(&lines[1][1..8], "082-001");
    assert_eq!(&lines[1][20..30], "0000250000");
    assert_eq!(&lines[3][20..30], "0000425050");
    assert_eq!(&lines[3][56..62], "000002");
}

#[test]
fn test_generate_with_output_description_and_lf() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let batch = write_batch(temp_dir.path(), "batch.json", MIXED_BATCH_JSON);
    let output = temp_dir.path().join("custom.aba");

    abafile_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--batch",
            batch.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--description",
            "JUNE RUN",
            "--lf",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Excluded: 1 (unbanked)"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(!content.contains('\r'));
    let lines: Vec<&str> = content.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0][62..74].trim_end(), "JUNE RUN");
    assert_eq!(&lines[1][8..17], "000123456");
    assert_eq!(&lines[2][30..40], "0000012345");
}

#[test]
fn test_generate_rejects_non_positive_amount() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let batch = write_batch(
        temp_dir.path(),
        "batch.toml",
        r#"id = "b-9"
number = "PB-0009"

[[items]]
id = "refund"
payee_id = "p1"
payee_name = "Allied Health"
amount = -100
bank = { routing_code = "082-001", account_number = "123456", account_name = "Allied Health" }
"#,
    );

    abafile_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--batch",
            batch.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-positive amount"));

    assert!(!config_path.join("output").join("PB-0009.aba").exists());
}

#[test]
fn test_generate_missing_batch_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    abafile_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--batch",
            "does-not-exist.toml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Batch file not found"));
}

#[test]
fn test_generate_unsupported_batch_format() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let batch = write_batch(temp_dir.path(), "batch.csv", "id,number\n");

    abafile_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--batch",
            batch.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported batch file extension"));
}

#[test]
fn test_verify_generated_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let batch = config_path.join("batch.example.toml");
    let output = temp_dir.path().join("out.aba");

    abafile_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--batch",
            batch.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    abafile_cmd()
        .args(["verify", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Community Support Co"))
        .stdout(predicate::str::contains("Records: 2"))
        .stdout(predicate::str::contains("$4,250.50"))
        .stdout(predicate::str::contains("File OK"));
}

#[test]
fn test_verify_rejects_bad_totals() {
    let temp_dir = TempDir::new().unwrap();
    let header = format!("0{}", " ".repeat(119));
    let detail = format!(
        "1082-001123456789 530000001000{:<32}{:<18}062-000012345678{:<16}00000000",
        "Payee", "REF", "Remitter"
    );
    let footer = format!(
        "7999-999{}000000200000000020000000000000{}000001{}",
        " ".repeat(12),
        " ".repeat(6),
        " ".repeat(58)
    );
    let file = write_batch(
        temp_dir.path(),
        "bad.aba",
        &[header, detail, footer].join("\r\n"),
    );

    abafile_cmd()
        .args(["verify", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credit total is 2000"));
}

#[test]
fn test_preview_flags_items_generate_would_reject() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(
        temp_dir.path(),
        "batch.toml",
        r#"id = "b-3"
number = "PB-0003"

[[items]]
id = "good"
payee_id = "p1"
payee_name = "Allied Health"
amount = 1000
bank = { routing_code = "082-001", account_number = "123456", account_name = "Allied Health" }

[[items]]
id = "bad-bsb"
payee_id = "p2"
payee_name = "Typo Therapy"
amount = 2000
bank = { routing_code = "82-0001", account_number = "654321", account_name = "Typo Therapy" }

[[items]]
id = "refund"
payee_id = "p3"
payee_name = "Refund Co"
amount = -500
bank = { routing_code = "033-000", account_number = "111222", account_name = "Refund Co" }
"#,
    );

    abafile_cmd()
        .args(["preview", "--batch", batch.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("INVALID: Invalid routing code of item bad-bsb"))
        .stdout(predicate::str::contains("INVALID: Item 'refund' has non-positive amount"))
        .stdout(predicate::str::contains("Invalid:  2"))
        .stdout(predicate::str::contains("Credit:   $10.00"));
}

#[test]
fn test_verify_json() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let batch = config_path.join("batch.example.toml");
    let output = temp_dir.path().join("out.aba");

    abafile_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "generate",
            "--batch",
            batch.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let assert = abafile_cmd()
        .args(["verify", "--json", output.to_str().unwrap()])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(parsed["footer"]["credit_total"], 425050);
    assert_eq!(parsed["footer"]["record_count"], 2);
    assert_eq!(parsed["details"][0]["routing_code"], "082-001");
    assert_eq!(parsed["header"]["processing_date"], "2026-01-15");
}
