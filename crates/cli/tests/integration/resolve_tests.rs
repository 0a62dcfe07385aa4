//! Resolve command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn resolve_prints_effective_configuration() {
  let env = TestEnv::parent_with_modules();

  env
    .trellis_cmd()
    .arg("resolve")
    .arg(env.root())
    .args(["-D", "version=9.4.8.0"])
    .assert()
    .success()
    .stdout(predicate::str::contains("org.jruby:jruby-parent:9.4.8.0 (pom)"))
    .stdout(predicate::str::contains("jar.name = jruby-core-9.4.8.0.jar"))
    .stdout(predicate::str::contains("plugin deploy (skipped)"));
}

#[test]
fn resolve_json_is_a_tree() {
  let env = TestEnv::parent_with_modules();

  let output = env
    .trellis_cmd()
    .arg("resolve")
    .arg(env.root())
    .args(["--format", "json", "-D", "version=1.0"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["project"]["artifactId"], "jruby-parent");
  assert_eq!(json["modules"][0]["status"], "resolved");
  assert_eq!(json["modules"][1]["project"]["effectivePlugins"][0]["id"], "deploy");
  assert_eq!(json["modules"][1]["project"]["effectivePlugins"][0]["skip"], true);
  assert_eq!(json["modules"][1]["project"]["ancestors"][0], "org.jruby:jruby-parent:1.0");
}

#[test]
fn version_file_supplies_version() {
  let env = TestEnv::parent_with_modules();
  env.write_file("VERSION", "9.4.8.0\n");

  env
    .trellis_cmd()
    .arg("resolve")
    .arg(env.root())
    .arg("--version-file")
    .arg(env.path("VERSION"))
    .assert()
    .success()
    .stdout(predicate::str::contains("org.jruby:ext:9.4.8.0"));
}

#[test]
fn undefined_root_property_is_fatal() {
  let env = TestEnv::parent_with_modules();

  env
    .trellis_cmd()
    .arg("resolve")
    .arg(env.root())
    .assert()
    .failure()
    .stderr(predicate::str::contains("property 'version'"));
}

#[test]
fn keep_missing_leaves_placeholder() {
  let env = TestEnv::parent_with_modules();

  env
    .trellis_cmd()
    .arg("resolve")
    .arg(env.root())
    .arg("--keep-missing")
    .assert()
    .success()
    .stdout(predicate::str::contains("org.jruby:jruby-parent:${version}"));
}

#[test]
fn failed_module_is_reported_and_exit_code_is_nonzero() {
  let env = TestEnv::parent_with_modules();
  env.write_file("ext/project.lua", "return { artifactId = 'ext', modules = { 'x' } }");

  env
    .trellis_cmd()
    .arg("resolve")
    .arg(env.root())
    .args(["-D", "version=1.0"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("org.jruby:jruby-core:1.0"))
    .stderr(predicate::str::contains("jruby-parent > ext"))
    .stderr(predicate::str::contains("1 module(s) failed"));
}

#[test]
fn fail_fast_names_the_module() {
  let env = TestEnv::parent_with_modules();
  std::fs::remove_dir_all(env.path("core")).unwrap();

  env
    .trellis_cmd()
    .arg("resolve")
    .arg(env.root())
    .args(["--fail-fast", "-D", "version=1.0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("module 'jruby-parent > core' failed"));
}

#[test]
fn module_cycle_is_reported() {
  let env = TestEnv::new();
  env.write_file("project.json", r#"{"artifactId": "root", "packaging": "pom", "modules": ["m1"]}"#);
  env.write_file("m1/project.json", r#"{"artifactId": "m1", "packaging": "pom", "modules": [".."]}"#);

  env
    .trellis_cmd()
    .arg("resolve")
    .arg(env.root())
    .assert()
    .failure()
    .stderr(predicate::str::contains("cyclic inheritance: root > m1 > root"));
}
