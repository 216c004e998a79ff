//! Dump command implementation.

use std::path::Path;

use anyhow::Result;
use bdth_core::{OffsetDump, ProcessMemory};

use crate::commands::{obtain_offsets, open_process};
use crate::config::CliConfig;
use crate::shutdown::ShutdownSignal;

pub fn run(
    config: &CliConfig,
    pid: Option<u32>,
    output: Option<&Path>,
    shutdown: &ShutdownSignal,
) -> Result<()> {
    let process = open_process(config, pid)?;
    let Some(offsets) = obtain_offsets(&process, config, shutdown)? else {
        return Ok(());
    };

    let reader = ProcessMemory::new(&process);
    let dump = OffsetDump::from_offsets(&offsets, &reader);

    match output {
        Some(path) => {
            dump.save(path)?;
            println!("Dump saved to: {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&dump)?),
    }
    Ok(())
}
