//! Mixed descriptor syntaxes within one tree.

use trellis_lib::{ErrorMode, ResolveConfig, resolve_tree};

use super::common::Workspace;

#[test]
fn json_yaml_and_lua_modules_resolve_together() {
  let ws = Workspace::new();
  ws.write(
    "project.yaml",
    r#"
groupId: org.jruby
artifactId: jruby-parent
version: 9.4.8.0
packaging: pom
properties:
  tesla.dump.pom: pom.xml
  jruby.basedir: ${project.basedir}
modules:
  - core
  - lib
"#,
  );
  ws.write("core/project.json", r#"{"artifactId": "jruby-core", "parent": "org.jruby:jruby-parent:9.4.8.0"}"#);
  ws.write(
    "lib/project.lua",
    r#"
local name = "jruby-stdlib"
return {
  artifactId = name,
  parent = { groupId = "org.jruby", artifactId = "jruby-parent" },
  properties = { ["lib.dir"] = basedir .. "/ruby" },
}
"#,
  );

  let tree = resolve_tree(ws.root(), &ResolveConfig::new(ErrorMode::FailFast)).unwrap();

  let order: Vec<String> = tree.build_order().iter().map(|p| p.id()).collect();
  assert_eq!(
    order,
    vec![
      "org.jruby:jruby-parent:9.4.8.0",
      "org.jruby:jruby-core:9.4.8.0",
      "org.jruby:jruby-stdlib:9.4.8.0",
    ]
  );

  let lib = &tree.find("lib").unwrap().project;
  assert!(lib.effective_properties["lib.dir"].ends_with("/ruby"));
  assert_eq!(lib.effective_properties["tesla.dump.pom"], "pom.xml");
  // Inherited values are expanded in the inheriting module's scope.
  assert!(lib.effective_properties["jruby.basedir"].ends_with("lib"));
}

#[test]
fn lua_descriptor_errors_are_malformed() {
  let ws = Workspace::new();
  ws.write("project.lua", "return 42");

  let err = resolve_tree(ws.root(), &ResolveConfig::new(ErrorMode::FailFast)).unwrap_err();

  assert_eq!(err.kind(), "MalformedDescriptor");
}

#[test]
fn lua_is_preferred_over_json_in_the_same_directory() {
  let ws = Workspace::new();
  ws.write("project.json", r#"{"artifactId": "from-json"}"#);
  ws.write("project.lua", r#"return { artifactId = "from-lua" }"#);

  let tree = resolve_tree(ws.root(), &ResolveConfig::new(ErrorMode::FailFast)).unwrap();

  assert_eq!(tree.project.artifact_id, "from-lua");
}

#[test]
fn relative_descriptor_paths_see_absolute_basedir() {
  let ws = Workspace::in_current_dir();
  ws.write("VERSION", "9.4.8.0\n");
  ws.write(
    "ext/project.lua",
    r#"
local f = assert(io.open(basedir .. "/../VERSION"))
local version = f:read("*l")
f:close()
return { artifactId = "ext", version = version, properties = { home = "${project.basedir}" } }
"#,
  );

  let relative = ws.relative_root().join("ext").join("project.lua");
  assert!(relative.is_relative());
  let tree = resolve_tree(&relative, &ResolveConfig::new(ErrorMode::FailFast)).unwrap();

  assert_eq!(tree.project.version.as_deref(), Some("9.4.8.0"));
  let home = std::path::PathBuf::from(&tree.project.effective_properties["home"]);
  assert!(home.is_absolute(), "{}", home.display());
  assert!(home.ends_with("ext"));
}
