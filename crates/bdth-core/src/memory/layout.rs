//! Memory layout constants for the game's housing structures
//!
//! This module centralizes every field offset used to walk the housing chain.
//! Constants are organized by structure type. All pointers are 64-bit.

/// Pointer size (8 bytes)
pub const POINTER: u64 = 8;

/// HousingModule singleton (reached through the static slot in the main module)
pub mod housing_module {
    use super::POINTER;

    pub const CURRENT_TERRITORY: u64 = 0;
    /// Non-null only while standing on an outdoor plot
    pub const OUTDOOR_TERRITORY: u64 = POINTER;
    pub const INDOOR_TERRITORY: u64 = POINTER * 2;
}

/// LayoutWorld singleton
pub mod layout_world {
    pub const HOUSING_STRUCTURE: u64 = 0x20;
}

/// HousingStructure (exists while the housing menu context is alive)
pub mod structure {
    pub const MODE: u64 = 0x0;
    pub const LAST_MODE: u64 = 0x4;
    pub const STATE: u64 = 0x8;
    pub const HOVER_ITEM: u64 = 0x10;
    pub const ACTIVE_ITEM: u64 = 0x18;

    /// Bytes sampled by the diagnostic dump
    pub const SAMPLE_SIZE: usize = 0x20;
}

/// HousingItem (the furnishing selected for editing)
pub mod item {
    pub const FLOAT: u64 = 4;

    pub const POSITION_X: u64 = 0x50;
    pub const POSITION_Y: u64 = POSITION_X + FLOAT;
    pub const POSITION_Z: u64 = POSITION_X + FLOAT * 2;

    /// Yaw in radians
    pub const ROTATION: u64 = 0x60;

    /// Row id into the furniture or yard-object catalog
    pub const ROW_ID: u64 = 0x80;

    pub const SAMPLE_SIZE: usize = 0x90;
}

/// Timing constants for polling
pub mod timing {
    /// Interval between housing state checks in the watch loop (ms)
    pub const STATE_POLL_INTERVAL_MS: u64 = 100;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_components_are_contiguous() {
        assert_eq!(item::POSITION_Y - item::POSITION_X, 4);
        assert_eq!(item::POSITION_Z - item::POSITION_Y, 4);
        assert!(item::ROTATION >= item::POSITION_Z + item::FLOAT);
    }

    #[test]
    fn test_structure_pointers_are_aligned() {
        assert_eq!(structure::HOVER_ITEM % POINTER, 0);
        assert_eq!(structure::ACTIVE_ITEM % POINTER, 0);
        assert_eq!(layout_world::HOUSING_STRUCTURE % POINTER, 0);
    }
}
