use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use vite_path_alias::ScanReport;

fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    fs::create_dir_all(root.join("src/views/pay")).unwrap();
    fs::create_dir_all(root.join("src/views/utils")).unwrap();
    fs::create_dir_all(root.join("node_modules/vue")).unwrap();
    fs::write(root.join("src/views/utils/format.ts"), "export const f = 1\n").unwrap();
    fs::write(
        root.join("src/views/pay/index.ts"),
        "import { f } from '$utils/format'\nimport missing from '$gone'\nimport vue from 'vue'\n",
    )
    .unwrap();
    fs::write(root.join("node_modules/vue/index.js"), "import x from '$utils'\n").unwrap();
    dir
}

#[test]
fn check_reports_resolved_and_unresolved() {
    let dir = project();

    let mut cmd = assert_cmd::Command::cargo_bin("vite-path-alias").unwrap();
    let assert = cmd
        .arg("check")
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(assert.get_output().stdout.as_ref()).to_string();
    let report: ScanReport = serde_json::from_str(&stdout).expect("valid report json");
    // node_modules is skipped, bare 'vue' is not sentinel-prefixed
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.unresolved, 1);
    let hit = report.entries.iter().find(|e| e.specifier == "$utils/format").unwrap();
    assert!(hit.resolved.as_deref().unwrap().ends_with("src/views/utils/format.ts"));
    assert!(hit.file.ends_with("src/views/pay/index.ts"));
}

#[test]
fn check_materializes_tsconfig_for_resolved_aliases() {
    let dir = project();

    assert_cmd::Command::cargo_bin("vite-path-alias")
        .unwrap()
        .arg("check")
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success();

    let generated = dir.path().join("src/views/tsconfig.json");
    assert!(generated.exists());
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&generated).unwrap()).unwrap();
    assert_eq!(parsed["extends"], "../tsconfig.json");
    assert_eq!(parsed["compilerOptions"]["paths"]["@/*"][0], "./*");
}

#[test]
fn check_yaml_output() {
    let dir = project();

    assert_cmd::Command::cargo_bin("vite-path-alias")
        .unwrap()
        .arg("-f")
        .arg("yaml")
        .arg("check")
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("entries:"))
        .stdout(predicate::str::contains("specifier: $utils/format"));
}
