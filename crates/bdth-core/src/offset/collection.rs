use serde::{Deserialize, Serialize};

/// Static slots of the housing singletons, relative to the main module base.
///
/// These move with every game patch, which is why they live in a file next to
/// the binary instead of being compiled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingOffsets {
    pub version: String,
    /// Slot holding the `HousingModule*`
    pub housing_module: u64,
    /// Slot holding the `LayoutWorld*`
    pub layout_world: u64,
}

impl HousingOffsets {
    pub fn is_valid(&self) -> bool {
        !self.version.is_empty() && self.housing_module != 0 && self.layout_world != 0
    }

    /// Absolute address of the housing module slot
    pub fn housing_module_slot(&self, base: u64) -> u64 {
        base.wrapping_add(self.housing_module)
    }

    /// Absolute address of the layout world slot
    pub fn layout_world_slot(&self, base: u64) -> u64 {
        base.wrapping_add(self.layout_world)
    }
}
