//! Resolve the housing chain from the module base.
//!
//! Nothing here is cached. The game builds and tears these structures down
//! whenever the player enters or leaves housing mode, so every call walks the
//! chain again from the static slots.

use serde::Serialize;
use tracing::trace;

use crate::memory::ReadMemory;
use crate::memory::layout::{housing_module, layout_world, structure};
use crate::offset::HousingOffsets;

/// Addresses of the full chain down to the selected item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedHousing {
    pub housing_module: u64,
    pub housing_structure: u64,
    pub active_item: u64,
}

pub struct StructureLocator<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
    offsets: &'a HousingOffsets,
}

impl<'a, R: ReadMemory + ?Sized> StructureLocator<'a, R> {
    pub fn new(reader: &'a R, offsets: &'a HousingOffsets) -> Self {
        Self { reader, offsets }
    }

    /// Module base → housing module singleton → housing structure → active item.
    ///
    /// Any null hop, or one whose field address would overflow, yields `None`.
    pub fn resolve(&self) -> Option<ResolvedHousing> {
        let housing_module = self.housing_module()?;
        let housing_structure = self.housing_structure()?;
        let active_item = self.active_item(housing_structure)?;

        Some(ResolvedHousing {
            housing_module,
            housing_structure,
            active_item,
        })
    }

    pub fn housing_module(&self) -> Option<u64> {
        let slot = self.offsets.housing_module_slot(self.reader.base_address());
        let ptr = self.reader.read_pointer(slot);
        trace!("housing module slot 0x{:X} -> {:X?}", slot, ptr);
        ptr
    }

    /// The housing structure exists only while the housing menu context does
    pub fn housing_structure(&self) -> Option<u64> {
        let slot = self.offsets.layout_world_slot(self.reader.base_address());
        let world = self.reader.read_pointer(slot)?;
        let ptr = self
            .reader
            .read_pointer(world.checked_add(layout_world::HOUSING_STRUCTURE)?);
        trace!("layout world 0x{:X} -> structure {:X?}", world, ptr);
        ptr
    }

    pub fn active_item(&self, housing_structure: u64) -> Option<u64> {
        self.reader
            .read_pointer(housing_structure.checked_add(structure::ACTIVE_ITEM)?)
    }

    /// Territory pointer that is only set on outdoor plots
    pub fn outdoor_territory(&self) -> Option<u64> {
        let module = self.housing_module()?;
        self.reader
            .read_pointer(module.checked_add(housing_module::OUTDOOR_TERRITORY)?)
    }

    pub fn indoor_territory(&self) -> Option<u64> {
        let module = self.housing_module()?;
        self.reader
            .read_pointer(module.checked_add(housing_module::INDOOR_TERRITORY)?)
    }
}
