//! Poll the housing state and print every change.

use anyhow::Result;
use bdth_core::EditorConfig;
use tracing::info;

use crate::commands::with_session;
use crate::config::CliConfig;
use crate::shutdown::ShutdownSignal;
use crate::view;

pub fn run(config: &CliConfig, pid: Option<u32>, shutdown: &ShutdownSignal) -> Result<()> {
    let editor_config = EditorConfig::builder().start_visible(true).build();
    with_session(config, pid, editor_config, shutdown, |process, editor| {
        println!("Watching housing state... (Press Esc or q to quit)");
        let mut last = String::new();

        while !shutdown.is_shutdown() {
            if !process.is_alive() {
                info!("Process terminated");
                break;
            }

            let snapshot = editor.snapshot();
            let icon = snapshot.entry.as_ref().map(|entry| editor.icon(entry));
            let rendered = view::render_snapshot(&snapshot, icon.as_ref());
            if rendered != last {
                println!("{}\n", rendered);
                last = rendered;
            }

            if shutdown.wait(config.poll_interval()) {
                break;
            }
        }
        Ok(())
    })
}
