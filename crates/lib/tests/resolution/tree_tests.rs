//! Aggregation of whole trees through the public entry points.

use std::time::Duration;

use trellis_lib::util::hash::Hashable;
use trellis_lib::{Engine, ErrorMode, ModuleEntry, ResolveConfig, ResolveError, resolve_tree};

use super::common::Workspace;

fn collect_all() -> ResolveConfig {
  ResolveConfig::new(ErrorMode::CollectAll)
}

mod scenarios {
  use super::*;

  #[test]
  fn parent_with_ext_module() {
    let ws = Workspace::new();
    ws.write(
      "project.json",
      r#"{"artifactId": "parent", "packaging": "pom", "properties": {"v": "1.0"}, "modules": ["ext"]}"#,
    );
    ws.write(
      "ext/project.json",
      r#"{"artifactId": "ext", "parent": "parent", "plugins": [{"id": "deploy", "skip": true}]}"#,
    );

    let tree = resolve_tree(ws.root(), &collect_all()).unwrap();
    let ext = &tree.find("ext").unwrap().project;

    let json = serde_json::to_value(ext).unwrap();
    assert_eq!(json["effectiveProperties"], serde_json::json!({"v": "1.0"}));
    assert_eq!(json["effectivePlugins"], serde_json::json!([{"id": "deploy", "skip": true}]));
  }

  #[test]
  fn integer_options_keep_their_exact_value() {
    let ws = Workspace::new();
    ws.write(
      "project.json",
      r#"{"artifactId": "root", "plugins": [{"id": "p", "options": {"a": 1, "ratio": 0.5, "big": 9007199254740993}}]}"#,
    );

    let tree = resolve_tree(ws.root(), &collect_all()).unwrap();

    let json = serde_json::to_string(&tree.project.effective_plugins).unwrap();
    assert_eq!(
      json,
      r#"[{"id":"p","options":{"a":1,"big":9007199254740993,"ratio":0.5}}]"#
    );
  }

  #[test]
  fn three_level_plugin_merge() {
    let ws = Workspace::new();
    ws.write(
      "project.json",
      r#"{"artifactId": "root", "packaging": "pom", "modules": ["mid"],
          "plugins": [{"id": "compiler", "options": {"release": "11", "encoding": "UTF-8"}},
                      {"id": "deploy", "skip": true}]}"#,
    );
    ws.write(
      "mid/project.json",
      r#"{"artifactId": "mid", "packaging": "pom", "parent": "root", "modules": ["leaf"],
          "plugins": [{"id": "compiler", "options": {"release": "17"}}]}"#,
    );
    ws.write(
      "mid/leaf/project.json",
      r#"{"artifactId": "leaf", "parent": "mid",
          "plugins": [{"id": "deploy", "options": {"skip": "false"}}, {"id": "shade"}]}"#,
    );

    let tree = resolve_tree(ws.root(), &collect_all()).unwrap();
    let leaf = &tree.find("mid/leaf").unwrap().project;

    let ids: Vec<&str> = leaf.effective_plugins.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["compiler", "deploy", "shade"]);

    let compiler = leaf.effective_plugin("compiler").unwrap();
    assert_eq!(compiler.options["release"].as_str(), Some("17"));
    assert_eq!(compiler.options["encoding"].as_str(), Some("UTF-8"));
    assert!(!leaf.effective_plugin("deploy").unwrap().is_skipped());
    assert!(tree.find("mid").unwrap().project.effective_plugin("deploy").unwrap().is_skipped());
  }

  #[test]
  fn aggregation_without_inheritance() {
    let ws = Workspace::new();
    ws.write(
      "project.json",
      r#"{"artifactId": "root", "groupId": "org.example", "packaging": "pom",
          "properties": {"only.root": "x"}, "modules": ["standalone"]}"#,
    );
    ws.write("standalone/project.json", r#"{"artifactId": "standalone", "version": "0.1"}"#);

    let tree = resolve_tree(ws.root(), &collect_all()).unwrap();
    let standalone = &tree.find("standalone").unwrap().project;

    assert!(standalone.ancestor_chain.is_empty());
    assert!(standalone.group_id.is_none());
    assert!(!standalone.effective_properties.contains_key("only.root"));
  }
}

mod failures {
  use super::*;

  #[test]
  fn every_failure_is_reported_with_its_path() {
    let ws = Workspace::new();
    ws.write(
      "project.json",
      r#"{"artifactId": "root", "packaging": "pom", "modules": ["moduleA", "moduleB", "moduleC"]}"#,
    );
    ws.write(
      "moduleA/project.json",
      r#"{"artifactId": "moduleA", "packaging": "pom", "parent": "root", "modules": ["moduleA.sub"]}"#,
    );
    ws.write("moduleA/moduleA.sub/project.json", r#"{"artifactId": "sub", "properties": {"x": "${nope}"}}"#);
    ws.write("moduleC/project.json", r#"{"artifactId": "moduleC", "parent": "root"}"#);

    let tree = resolve_tree(ws.root(), &collect_all()).unwrap();
    let report = tree.failures();

    assert_eq!(report.len(), 2);
    let rendered = report.to_string();
    assert!(rendered.contains("root > moduleA > moduleA.sub: property 'nope'"), "{rendered}");
    assert!(rendered.contains("root > moduleB: descriptor not found"), "{rendered}");

    let names: Vec<&str> = tree.modules.iter().map(ModuleEntry::name).collect();
    assert_eq!(names, vec!["moduleA", "moduleB", "moduleC"]);
  }

  #[test]
  fn fail_fast_returns_first_failure() {
    let ws = Workspace::new();
    ws.write("project.json", r#"{"artifactId": "root", "packaging": "pom", "modules": ["a", "b"]}"#);
    ws.write("a/project.json", r#"{"artifactId": "a", "packaging": "nonsense"}"#);

    let err = resolve_tree(ws.root(), &ResolveConfig::new(ErrorMode::FailFast)).unwrap_err();

    assert_eq!(err.kind(), "ModuleLoadError");
    assert_eq!(err.root_cause().kind(), "MalformedDescriptor");
  }

  #[test]
  fn zero_deadline_times_out() {
    let ws = Workspace::new();
    ws.write("project.json", r#"{"artifactId": "root", "packaging": "pom", "modules": ["a"]}"#);
    ws.write("a/project.json", r#"{"artifactId": "a"}"#);

    let err = resolve_tree(ws.root(), &collect_all().with_deadline(Duration::ZERO)).unwrap_err();

    assert!(matches!(err, ResolveError::Timeout { .. }));
  }

  #[test]
  fn missing_root_is_not_found() {
    let ws = Workspace::new();

    let err = resolve_tree(&ws.root().join("nothing"), &collect_all()).unwrap_err();

    assert!(matches!(err, ResolveError::NotFound { .. }));
  }
}

mod determinism {
  use super::*;

  #[test]
  fn resolving_twice_is_byte_identical() {
    let ws = Workspace::new();
    ws.write(
      "project.json",
      r#"{"artifactId": "root", "version": "1.0", "packaging": "pom", "modules": ["b", "a"],
          "properties": {"z": "1", "a": "${z}"}}"#,
    );
    ws.write("a/project.json", r#"{"artifactId": "a", "parent": "root", "plugins": [{"id": "p", "options": {"k": [1, 2]}}]}"#);
    ws.write("b/project.json", r#"{"artifactId": "b", "parent": "root"}"#);

    let engine = Engine::new(collect_all());
    let first = engine.resolve_tree(ws.root()).unwrap();
    let second = engine.resolve_tree(ws.root()).unwrap();

    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
    for (x, y) in first.walk().zip(second.walk()) {
      assert_eq!(x.fingerprint, y.fingerprint);
      assert_eq!(x.project.fingerprint().unwrap(), x.fingerprint);
    }
  }

  #[test]
  fn changing_a_parent_property_changes_child_fingerprint() {
    let ws = Workspace::new();
    ws.write(
      "project.json",
      r#"{"artifactId": "root", "packaging": "pom", "properties": {"v": "1"}, "modules": ["a"]}"#,
    );
    ws.write("a/project.json", r#"{"artifactId": "a", "parent": "root"}"#);
    let before = resolve_tree(ws.root(), &collect_all()).unwrap();

    ws.write(
      "project.json",
      r#"{"artifactId": "root", "packaging": "pom", "properties": {"v": "2"}, "modules": ["a"]}"#,
    );
    let after = resolve_tree(ws.root(), &collect_all()).unwrap();

    assert_ne!(before.find("a").unwrap().fingerprint, after.find("a").unwrap().fingerprint);
  }
}
