use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn synth_writes_then_skips() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("src/views/pay");
    fs::create_dir_all(&target).unwrap();

    assert_cmd::Command::cargo_bin("vite-path-alias")
        .unwrap()
        .arg("synth")
        .arg("--dir")
        .arg(target.to_str().unwrap())
        .arg("--alias")
        .arg("utils")
        .assert()
        .success()
        .stdout(predicate::str::contains("tsconfig.json created"));

    let content = fs::read_to_string(target.join("tsconfig.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["extends"], "../../tsconfig.json");
    assert_eq!(parsed["compilerOptions"]["paths"]["$utils/*"][0], "./utils/*");
    assert_eq!(parsed["compilerOptions"]["paths"]["@/*"][0], "../*");

    assert_cmd::Command::cargo_bin("vite-path-alias")
        .unwrap()
        .arg("synth")
        .arg("--dir")
        .arg(target.to_str().unwrap())
        .arg("--alias")
        .arg("utils")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(target.join("tsconfig.json")).unwrap(), content);
}

#[test]
fn synth_outside_scope_fails() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("lib/pay");
    fs::create_dir_all(&target).unwrap();

    assert_cmd::Command::cargo_bin("vite-path-alias")
        .unwrap()
        .arg("synth")
        .arg("--dir")
        .arg(target.to_str().unwrap())
        .arg("--alias")
        .arg("utils")
        .arg("--scoped")
        .arg("/zz-scope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn synth_at_scope_root_fails() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("src");
    fs::create_dir_all(&target).unwrap();

    assert_cmd::Command::cargo_bin("vite-path-alias")
        .unwrap()
        .arg("synth")
        .arg("--dir")
        .arg(target.to_str().unwrap())
        .arg("--alias")
        .arg("utils")
        .assert()
        .failure()
        .stderr(predicate::str::contains("scoped root"));
}
