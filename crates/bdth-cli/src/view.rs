//! Terminal rendering of the editor state.

use std::fmt::Write;

use bdth_core::{
    CatalogEntry, CommandOutcome, EditError, EditorSnapshot, IconView, to_display_rotation,
};
use owo_colors::OwoColorize;

/// Shown for failures the operator cannot act on directly
const GENERIC_FAILURE: &str = "Error when positioning with command.";

fn flag(label: &str, on: bool) -> String {
    if on {
        format!("{}", label.green())
    } else {
        format!("{}", label.dimmed())
    }
}

pub fn render_icon(view: &IconView) -> String {
    match view {
        IconView::Hidden => String::new(),
        IconView::Placeholder => "[ .... ]".to_string(),
        IconView::Fallback(id) => format!("{}", format!("[{}]", id).red()),
        IconView::Image(texture) => format!("[{}x{}]", texture.width, texture.height),
    }
}

pub fn render_entry(entry: &CatalogEntry, icon: &IconView) -> String {
    let mut line = format!("{:>6}  {}", entry.id, entry.name.bold());
    if let Some(category) = &entry.category {
        let _ = write!(line, "  ({})", category);
    }
    let icon = render_icon(icon);
    if !icon.is_empty() {
        let _ = write!(line, "  {}", icon);
    }
    line
}

pub fn render_snapshot(snapshot: &EditorSnapshot, icon: Option<&IconView>) -> String {
    let gate = &snapshot.gate;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} {} {}  mode={} state={}",
        flag("housing", gate.housing_open),
        flag(if gate.outdoors { "outdoors" } else { "indoors" }, gate.housing_open),
        flag("editable", gate.can_edit),
        flag("selected", gate.has_active_item),
        gate.mode,
        gate.item_state,
    );

    match &snapshot.active_item {
        Some(item) => {
            let _ = writeln!(
                out,
                "  position  {}",
                item.position.to_string().cyan()
            );
            let _ = writeln!(
                out,
                "  rotation  {:.2}°",
                to_display_rotation(item.rotation).cyan()
            );
            match &snapshot.entry {
                Some(entry) => {
                    let view = icon.cloned().unwrap_or(IconView::Hidden);
                    let _ = writeln!(out, "  {}", render_entry(entry, &view));
                }
                None => {
                    let _ = writeln!(out, "  row {} (not in catalog)", item.row_id);
                }
            }
        }
        None => {
            let _ = writeln!(out, "  {}", "no item selected".dimmed());
        }
    }

    let _ = write!(
        out,
        "  window {}  list {}",
        flag("shown", snapshot.ui.visible),
        flag("shown", snapshot.ui.list_visible)
    );
    out
}

pub fn render_outcome(outcome: &CommandOutcome) -> String {
    match outcome {
        CommandOutcome::UiToggled { visible } => {
            format!("Window {}", if *visible { "shown" } else { "hidden" })
        }
        CommandOutcome::ListToggled { visible } => {
            format!("Furnishing list {}", if *visible { "shown" } else { "hidden" })
        }
        CommandOutcome::Placed { position, rotation } => match rotation {
            Some(rotation) => format!(
                "Placed at {} facing {:.2}°",
                position.green(),
                to_display_rotation(*rotation)
            ),
            None => format!("Placed at {}", position.green()),
        },
    }
}

pub fn render_error(error: &EditError) -> String {
    if error.is_user_visible() {
        format!("{}", error.to_string().yellow())
    } else {
        format!("{}", GENERIC_FAILURE.red())
    }
}
