//! Status command implementation.

use anyhow::Result;
use bdth_core::{EditorConfig, list_processes};

use crate::commands::{build_tag, with_session};
use crate::config::CliConfig;
use crate::shutdown::ShutdownSignal;
use crate::view;

pub fn run(config: &CliConfig, pid: Option<u32>, shutdown: &ShutdownSignal) -> Result<()> {
    if pid.is_none() {
        let processes = list_processes(&config.process_name)?;
        println!("Processes named {}: {}", config.process_name, processes.len());
        for process in &processes {
            println!("  PID {}", process.pid);
        }
    }

    let editor_config = EditorConfig::builder().start_visible(true).build();
    with_session(config, pid, editor_config, shutdown, |process, editor| {
        let offsets = editor.housing().offsets();
        println!(
            "PID {} base 0x{:X} ({})",
            process.pid,
            process.base_address,
            build_tag(process)
        );
        println!(
            "Offsets {}: housing_module=0x{:X}, layout_world=0x{:X}",
            offsets.version, offsets.housing_module, offsets.layout_world
        );
        println!("Catalog: {} entries", editor.catalog().len());
        println!();

        let snapshot = editor.snapshot();
        let icon = snapshot.entry.as_ref().map(|entry| editor.icon(entry));
        println!("{}", view::render_snapshot(&snapshot, icon.as_ref()));
        Ok(())
    })
}
