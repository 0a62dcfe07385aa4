mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use trellis_lib::{ErrorMode, MissingProperty, ResolveConfig};

use crate::output::{OutputFormat, print_error};

/// trellis - resolve project descriptor trees into effective configurations
#[derive(Parser)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,

  #[command(flatten)]
  resolve: ResolveArgs,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Args)]
struct ResolveArgs {
  /// Abort at the first module that fails to resolve
  #[arg(long, global = true)]
  fail_fast: bool,

  /// Leave unresolvable ${name} placeholders in place instead of failing
  #[arg(long, global = true)]
  keep_missing: bool,

  /// Give up after this long (e.g. "500ms", "2s")
  #[arg(long, global = true, value_parser = humantime::parse_duration)]
  timeout: Option<Duration>,

  /// Define a global property
  #[arg(short = 'D', long = "define", global = true, value_name = "KEY=VALUE", value_parser = parse_define)]
  define: Vec<(String, String)>,

  /// Read the `version` global property from the first line of this file
  #[arg(long, global = true, value_name = "PATH")]
  version_file: Option<PathBuf>,
}

impl ResolveArgs {
  fn to_config(&self) -> Result<ResolveConfig> {
    let mode = if self.fail_fast {
      ErrorMode::FailFast
    } else {
      ErrorMode::CollectAll
    };
    let mut config = ResolveConfig::new(mode);

    if self.keep_missing {
      config = config.with_missing_property(MissingProperty::KeepLiteral);
    }
    if let Some(timeout) = self.timeout {
      config = config.with_deadline(timeout);
    }
    if let Some(path) = &self.version_file {
      config = config
        .with_version_file(path)
        .with_context(|| format!("Failed to read version file: {}", path.display()))?;
    }
    for (key, value) in &self.define {
      config = config.with_global(key, value);
    }
    Ok(config)
  }
}

fn parse_define(s: &str) -> Result<(String, String)> {
  let Some((key, value)) = s.split_once('=') else {
    bail!("expected KEY=VALUE, got '{s}'");
  };
  let key = key.trim();
  if key.is_empty() {
    bail!("property name must not be empty");
  }
  Ok((key.to_string(), value.to_string()))
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve a project tree and print every module's effective configuration
  Resolve {
    /// Descriptor file or directory containing one
    #[arg(default_value = ".")]
    path: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Print modules in build order
  Order {
    /// Descriptor file or directory containing one
    #[arg(default_value = ".")]
    path: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Print one module's effective configuration as JSON
  Effective {
    /// Descriptor file or directory containing one
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Module path below the root, e.g. "core/ext" (default: the root)
    #[arg(short, long, default_value = "")]
    module: String,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let config = cli.resolve.to_config()?;
  debug!(?config, "resolution settings");

  match cli.command {
    Commands::Resolve { path, format } => cmd::cmd_resolve(&path, &config, format),
    Commands::Order { path, format } => cmd::cmd_order(&path, &config, format),
    Commands::Effective { path, module } => cmd::cmd_effective(&path, &config, &module),
  }
}

fn init_logging(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
