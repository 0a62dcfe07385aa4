//! Terminal rendering for resolved project trees.
//!
//! Status lines, module headers and plugin summaries shared by the commands,
//! plus JSON output for `--format json`.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use trellis_lib::util::hash::Fingerprint;
use trellis_lib::{PluginConfig, ResolveError, ResolvedProject};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const ARROW: &str = "→";
}

/// Characters of a fingerprint shown in text output.
const SHORT_FINGERPRINT: usize = 12;

pub fn short_fingerprint(fingerprint: &Fingerprint) -> &str {
  let len = fingerprint.0.len().min(SHORT_FINGERPRINT);
  &fingerprint.0[..len]
}

/// Elapsed wall time at millisecond precision, e.g. `1s 500ms`.
pub fn format_elapsed(elapsed: Duration) -> String {
  let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
  humantime::format_duration(Duration::from_millis(millis)).to_string()
}

/// Indentation for a module `depth` levels below the root.
pub fn indent(depth: usize) -> String {
  "  ".repeat(depth)
}

pub fn plugin_label(plugin: &PluginConfig) -> String {
  if plugin.is_skipped() {
    format!("plugin {} (skipped)", plugin.id)
  } else {
    format!("plugin {}", plugin.id)
  }
}

/// Header, effective properties and plugins of one resolved module.
pub fn print_project(depth: usize, project: &ResolvedProject, fingerprint: &Fingerprint) {
  let pad = indent(depth);
  println!(
    "{pad}{} {} ({}) {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    project.id(),
    project.packaging,
    short_fingerprint(fingerprint).if_supports_color(Stream::Stdout, |s| s.dimmed())
  );

  for (name, value) in &project.effective_properties {
    println!("{pad}    {name} = {value}");
  }
  for plugin in &project.effective_plugins {
    println!("{pad}    {}", plugin_label(plugin));
    for (key, value) in &plugin.options {
      println!("{pad}      {key}: {value}");
    }
  }
}

pub fn print_failed_module(depth: usize, name: &str, error: &ResolveError) {
  println!(
    "{}{} {name}: {}",
    indent(depth),
    symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
    error.root_cause()
  );
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
