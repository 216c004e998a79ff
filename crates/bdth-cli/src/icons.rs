//! Icon source backed by a directory of exported PNG files.

use std::path::{Path, PathBuf};

use bdth_core::{IconError, IconSource, RawIcon};

/// Reads `<root>/<group>/<id>.png`, where `group` is the id rounded down to
/// the nearest thousand, both zero-padded to six digits.
pub struct PngDirectorySource {
    root: PathBuf,
}

impl PngDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, id: u16) -> PathBuf {
        let group = u32::from(id) / 1000 * 1000;
        self.root
            .join(format!("{:06}", group))
            .join(format!("{:06}.png", id))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl IconSource for PngDirectorySource {
    fn load_icon(&self, id: u16) -> Result<RawIcon, IconError> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(IconError::NotFound(id));
        }

        let image = image::open(&path)
            .map_err(|e| IconError::Decode(format!("{}: {}", path.display(), e)))?
            .into_rgba8();
        let (width, height) = image.dimensions();
        RawIcon::new(width, height, image.into_raw())
    }
}
