mod console;
mod events;
mod panels;

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use rusty_bus::logger::ChannelLogger;
use rusty_bus::{ConsoleHook, DispatchPolicy, Registry, RegistryConfig};

use console::Console;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
  /// Stop at the first failing listener.
  FailFast,
  /// Run every listener and report all failures.
  Collect,
}

impl From<Policy> for DispatchPolicy {
  fn from(policy: Policy) -> Self {
    match policy {
      Policy::FailFast => DispatchPolicy::FailFast,
      Policy::Collect => DispatchPolicy::Collect,
    }
  }
}

/// Three coloured panels driven by an event registry.
#[derive(Parser, Debug)]
#[command(name = "rusty_bus_demo", version)]
struct Cli {
  /// Show registry debug records.
  #[arg(short, long)]
  verbose: bool,

  /// Do not print fired and dispatched events.
  #[arg(short, long)]
  quiet: bool,

  /// What to do when a listener fails.
  #[arg(long, value_enum, default_value = "fail-fast")]
  policy: Policy,
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let level = if cli.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  let (logger, log_recv) = ChannelLogger::with_receiver(level);
  logger.install()?;

  let registry = Arc::new(Registry::with_config(RegistryConfig::with_policy(
    cli.policy.into(),
  )));
  if !cli.quiet {
    registry.set_log_hook(ConsoleHook::stdout());
  }

  let views = panels::build(&registry)?;
  print!("{registry}");

  Console::new(registry, views, log_recv).run()
}
