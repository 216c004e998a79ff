//! Resolve the housing slots from signatures and save them.

use std::path::Path;

use anyhow::{Result, bail};
use bdth_core::{ProcessMemory, builtin_signatures, save_offsets};

use crate::commands::{build_tag, open_process};
use crate::config::CliConfig;
use crate::retry::resolve_offsets_with_retry;
use crate::shutdown::ShutdownSignal;

pub fn run(
    config: &CliConfig,
    pid: Option<u32>,
    output: &Path,
    shutdown: &ShutdownSignal,
) -> Result<()> {
    let process = open_process(config, pid)?;
    let reader = ProcessMemory::new(&process);

    let signatures = builtin_signatures();
    println!("housing_module: {}", signatures.housing_module.pattern);
    println!("layout_world:   {}", signatures.layout_world.pattern);

    let Some(offsets) = resolve_offsets_with_retry(
        &reader,
        process.module_size as usize,
        &build_tag(&process),
        config.max_offset_attempts,
        config.offset_retry_delay(),
        shutdown,
    )?
    else {
        bail!("Interrupted before offsets were resolved");
    };

    save_offsets(output, &offsets)?;
    println!();
    println!("Version:        {}", offsets.version);
    println!("housing_module: 0x{:X}", offsets.housing_module);
    println!("layout_world:   0x{:X}", offsets.layout_world);
    println!("Saved to: {}", output.display());
    Ok(())
}
