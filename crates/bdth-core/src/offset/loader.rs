use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::offset::HousingOffsets;

/// Load offsets from a JSON file
pub fn load_offsets<P: AsRef<Path>>(path: P) -> Result<HousingOffsets> {
    let content = fs::read_to_string(&path)?;
    let offsets: HousingOffsets = serde_json::from_str(&content)?;

    if !offsets.is_valid() {
        return Err(Error::InvalidOffset(format!(
            "{} is missing a version or has zero offsets",
            path.as_ref().display()
        )));
    }

    debug!(
        "Loaded offsets {}: housing_module=0x{:X}, layout_world=0x{:X}",
        offsets.version, offsets.housing_module, offsets.layout_world
    );
    Ok(offsets)
}

/// Save offsets to a JSON file
pub fn save_offsets<P: AsRef<Path>>(path: P, offsets: &HousingOffsets) -> Result<()> {
    let content = serde_json::to_string_pretty(offsets)?;
    fs::write(path, content)?;
    Ok(())
}
