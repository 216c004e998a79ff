//! Catalog lookups without attaching to the game.

use std::path::Path;

use anyhow::{Context, Result, bail};
use bdth_core::{Catalog, IconView};

use crate::view;

pub fn run(path: Option<&Path>, id: Option<u32>, outdoors: bool) -> Result<()> {
    let Some(path) = path else {
        bail!("No catalog path given and none configured");
    };
    let catalog =
        Catalog::load(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let table = if outdoors { "yard objects" } else { "furniture" };

    let Some(id) = id else {
        let entries = catalog.entries(outdoors);
        println!("{} {}:", entries.len(), table);
        for entry in entries {
            println!("{}", view::render_entry(entry, &IconView::Hidden));
        }
        return Ok(());
    };

    let Some(entry) = catalog.lookup(id, outdoors) else {
        bail!("Row {} is not in {}", id, table);
    };
    println!("{}", view::render_entry(entry, &IconView::Hidden));
    println!("  item id: {}", entry.item_id);
    println!("  icon:    {}", entry.icon);
    Ok(())
}
