//! One-shot command.

use anyhow::{Result, anyhow};
use bdth_core::EditorConfig;

use crate::commands::with_session;
use crate::config::CliConfig;
use crate::shutdown::ShutdownSignal;
use crate::view;

pub fn run(
    config: &CliConfig,
    pid: Option<u32>,
    args: &[String],
    shutdown: &ShutdownSignal,
) -> Result<()> {
    let command = args.join(" ");
    with_session(config, pid, EditorConfig::default(), shutdown, |_, editor| {
        match editor.on_command(&command) {
            Ok(outcome) => {
                println!("{}", view::render_outcome(&outcome));
                Ok(())
            }
            Err(e) => {
                println!("{}", view::render_error(&e));
                Err(anyhow!(e))
            }
        }
    })
}
