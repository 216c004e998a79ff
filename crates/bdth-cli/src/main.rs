mod commands;
mod config;
mod icons;
mod input;
mod retry;
mod shutdown;
mod view;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::shutdown::ShutdownSignal;

#[derive(Parser)]
#[command(name = "bdth")]
#[command(version, about = "Place housing furnishings by exact coordinates")]
struct Args {
    /// Config file (defaults to bdth/bdth.toml in the user config directory)
    #[arg(short, long, global = true, env = "BDTH_CONFIG")]
    config: Option<PathBuf>,

    /// Attach to this PID instead of searching by process name
    #[arg(short, long, global = true)]
    pid: Option<u32>,

    /// Offsets file, overriding the config
    #[arg(short, long, global = true)]
    offsets: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive command loop (default)
    Console,
    /// Run one command, e.g. `bdth exec -- 1.5 2.0 3.25 90`
    Exec {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the attach, offset and housing state once
    Status,
    /// Print the housing state whenever it changes
    Watch,
    /// Dump the resolved housing chain as JSON
    Dump {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Look up or list catalog entries
    Catalog {
        /// Row id to look up; lists the table when omitted
        id: Option<u32>,
        /// Use the yard object table
        #[arg(long)]
        outdoors: bool,
        /// Catalog file, overriding the config
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Resolve offsets from code signatures and save them
    Offset {
        #[arg(long, default_value = "offsets.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let directive = if args.verbose { "bdth=debug" } else { "bdth=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let mut config = CliConfig::resolve(args.config.as_deref());
    if let Some(offsets) = args.offsets {
        config.offsets = Some(offsets);
    }

    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        shutdown_ctrlc.trigger();
    })?;

    let pid = args.pid;
    match args.command.unwrap_or(Command::Console) {
        Command::Console => commands::console::run(&config, pid, &shutdown),
        Command::Exec { args } => commands::exec::run(&config, pid, &args, &shutdown),
        Command::Status => commands::status::run(&config, pid, &shutdown),
        Command::Watch => {
            let _keyboard = input::spawn_keyboard_monitor(Arc::clone(&shutdown));
            commands::watch::run(&config, pid, &shutdown)
        }
        Command::Dump { output } => {
            commands::dump::run(&config, pid, output.as_deref(), &shutdown)
        }
        Command::Catalog { id, outdoors, file } => {
            let path = file.or(config.catalog);
            commands::catalog::run(path.as_deref(), id, outdoors)
        }
        Command::Offset { output } => commands::offset::run(&config, pid, &output, &shutdown),
    }
}
