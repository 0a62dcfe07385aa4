//! Effective command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn effective_prints_one_module() {
  let env = TestEnv::parent_with_modules();

  let output = env
    .trellis_cmd()
    .arg("effective")
    .arg(env.root())
    .args(["--module", "core", "-D", "version=3.0"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["path"], "jruby-parent > core");
  assert_eq!(json["project"]["effectiveProperties"]["encoding"], "UTF-8");
  assert_eq!(json["project"]["effectiveProperties"]["version"], "3.0");
  assert_eq!(json["fingerprint"].as_str().unwrap().len(), 20);
}

#[test]
fn effective_unknown_module_fails() {
  let env = TestEnv::parent_with_modules();

  env
    .trellis_cmd()
    .arg("effective")
    .arg(env.root())
    .args(["--module", "nope", "-D", "version=3.0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Module 'nope' not found"));
}

#[test]
fn effective_failed_module_shows_cause() {
  let env = TestEnv::parent_with_modules();
  env.write_file("core/project.yaml", "artifactId: jruby-core\nparent: org.jruby:elsewhere\n");

  env
    .trellis_cmd()
    .arg("effective")
    .arg(env.root())
    .args(["--module", "core", "-D", "version=3.0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Module 'core' failed to resolve"));
}

#[test]
fn effective_from_working_directory_has_absolute_basedir() {
  let env = TestEnv::new();
  env.write_file(
    "project.json",
    r#"{"artifactId": "app", "properties": {"home": "${project.basedir}"}}"#,
  );

  let output = env
    .trellis_cmd()
    .current_dir(env.root())
    .args(["effective", "project.json"])
    .output()
    .unwrap();

  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let home = std::path::PathBuf::from(json["project"]["effectiveProperties"]["home"].as_str().unwrap());
  assert!(home.is_absolute(), "{}", home.display());
  assert_eq!(home.file_name(), env.root().file_name());
}
