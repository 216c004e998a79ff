//! Interactive command loop.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use bdth_core::{CommandOutcome, Editor, EditorConfig, ReadMemory, WriteMemory};

use crate::commands::with_session;
use crate::config::CliConfig;
use crate::shutdown::ShutdownSignal;
use crate::view;

const COMMAND_PREFIX: &str = "/bdth";

/// Strip the chat command name if the operator typed it
fn strip_prefix(line: &str) -> &str {
    let line = line.trim();
    match line.strip_prefix(COMMAND_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => line,
    }
}

pub fn run(config: &CliConfig, pid: Option<u32>, shutdown: &ShutdownSignal) -> Result<()> {
    let editor_config = EditorConfig::builder().start_visible(true).build();
    with_session(config, pid, editor_config, shutdown, |_, editor| {
        println!("Type `{COMMAND_PREFIX} <x> <y> <z> [deg]`, `list`, or an empty line. `quit` exits.");
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        print!("> ");
        stdout.flush()?;

        for line in stdin.lock().lines() {
            let line = line?;
            if shutdown.is_shutdown() || matches!(line.trim(), "quit" | "exit") {
                break;
            }
            handle_line(editor, &line);
            print!("> ");
            stdout.flush()?;
        }
        Ok(())
    })
}

fn handle_line<M: ReadMemory + WriteMemory>(editor: &mut Editor<M>, line: &str) {
    match editor.on_command(strip_prefix(line)) {
        Ok(outcome) => {
            println!("{}", view::render_outcome(&outcome));
            if matches!(outcome, CommandOutcome::ListToggled { visible: true }) {
                print_list(editor);
            }
        }
        Err(e) => println!("{}", view::render_error(&e)),
    }

    if editor.ui().visible {
        let snapshot = editor.snapshot();
        let icon = snapshot.entry.as_ref().map(|entry| editor.icon(entry));
        println!("{}", view::render_snapshot(&snapshot, icon.as_ref()));
    }
}

fn print_list<M: ReadMemory + WriteMemory>(editor: &Editor<M>) {
    let outdoors = editor.housing().gate().is_outdoors();
    let entries = editor.catalog().entries(outdoors);
    if entries.is_empty() {
        println!("  (catalog is empty)");
    }
    for entry in entries {
        println!("{}", view::render_entry(entry, &editor.icon(entry)));
    }
}
