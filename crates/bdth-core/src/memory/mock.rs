//! In-memory stand-in for the game process, used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::memory::layout::{housing_module, item, layout_world, structure};
use crate::memory::{ReadMemory, WriteMemory};
use crate::offset::HousingOffsets;

/// Sparse address space made of mapped regions.
///
/// Reads and writes outside a mapped region fail like an unmapped page would.
/// `poke` is for test setup and does not count as a write; `WriteMemory`
/// writes are counted so tests can assert that nothing was mutated.
pub struct MockMemory {
    base: u64,
    regions: RefCell<BTreeMap<u64, Vec<u8>>>,
    writes: Cell<usize>,
}

impl MockMemory {
    pub fn new(base: u64) -> Self {
        Self {
            base,
            regions: RefCell::new(BTreeMap::new()),
            writes: Cell::new(0),
        }
    }

    /// Map a zero-filled region
    pub fn map(&self, address: u64, size: usize) {
        self.regions.borrow_mut().insert(address, vec![0; size]);
    }

    /// Remove a region, as if the game freed it
    pub fn unmap(&self, address: u64) {
        self.regions.borrow_mut().remove(&address);
    }

    pub fn poke(&self, address: u64, data: &[u8]) {
        self.store(address, data)
            .unwrap_or_else(|e| panic!("poke outside mapped memory: {e}"));
    }

    pub fn poke_u64(&self, address: u64, value: u64) {
        self.poke(address, &value.to_le_bytes());
    }

    pub fn poke_u32(&self, address: u64, value: u32) {
        self.poke(address, &value.to_le_bytes());
    }

    pub fn poke_f32(&self, address: u64, value: f32) {
        self.poke(address, &value.to_le_bytes());
    }

    /// Number of `WriteMemory` writes that reached mapped memory
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn locate(&self, address: u64, size: usize) -> Option<(u64, usize)> {
        let regions = self.regions.borrow();
        let (&start, data) = regions.range(..=address).next_back()?;
        let offset = (address - start) as usize;
        (offset.checked_add(size)? <= data.len()).then_some((start, offset))
    }

    fn store(&self, address: u64, data: &[u8]) -> Result<()> {
        let (start, offset) =
            self.locate(address, data.len())
                .ok_or_else(|| Error::MemoryWriteFailed {
                    address,
                    message: "unmapped".to_string(),
                })?;
        let mut regions = self.regions.borrow_mut();
        if let Some(region) = regions.get_mut(&start) {
            region[offset..offset + data.len()].copy_from_slice(data);
        }
        Ok(())
    }
}

impl ReadMemory for MockMemory {
    fn base_address(&self) -> u64 {
        self.base
    }

    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let (start, offset) = self
            .locate(address, size)
            .ok_or_else(|| Error::MemoryReadFailed {
                address,
                message: "unmapped".to_string(),
            })?;
        let regions = self.regions.borrow();
        Ok(regions[&start][offset..offset + size].to_vec())
    }
}

impl WriteMemory for MockMemory {
    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()> {
        self.store(address, data)?;
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// A complete housing chain laid out in mock memory.
///
/// The default scene is indoors, menu open, rotate mode with a soft-selected
/// item: every gate passes.
pub struct HousingScene {
    pub memory: MockMemory,
    pub offsets: HousingOffsets,
}

impl HousingScene {
    pub const BASE: u64 = 0x1_4000_0000;
    pub const MODULE_SIZE: usize = 0x1000;
    pub const HOUSING_MODULE_RVA: u64 = 0x200;
    pub const LAYOUT_WORLD_RVA: u64 = 0x208;

    pub const HOUSING_MODULE: u64 = 0x2000_0000;
    pub const TERRITORY: u64 = 0x2100_0000;
    pub const LAYOUT_WORLD: u64 = 0x2200_0000;
    pub const STRUCTURE: u64 = 0x2300_0000;
    pub const ITEM: u64 = 0x2400_0000;

    pub const ROW_ID: u32 = 0x1F5;

    pub fn indoor_editing() -> Self {
        let memory = MockMemory::new(Self::BASE);
        memory.map(Self::BASE, Self::MODULE_SIZE);
        for region in [
            Self::HOUSING_MODULE,
            Self::TERRITORY,
            Self::LAYOUT_WORLD,
            Self::STRUCTURE,
            Self::ITEM,
        ] {
            memory.map(region, 0x100);
        }

        memory.poke_u64(Self::BASE + Self::HOUSING_MODULE_RVA, Self::HOUSING_MODULE);
        memory.poke_u64(Self::BASE + Self::LAYOUT_WORLD_RVA, Self::LAYOUT_WORLD);
        memory.poke_u64(
            Self::HOUSING_MODULE + housing_module::CURRENT_TERRITORY,
            Self::TERRITORY,
        );
        memory.poke_u64(
            Self::HOUSING_MODULE + housing_module::INDOOR_TERRITORY,
            Self::TERRITORY,
        );
        memory.poke_u64(
            Self::LAYOUT_WORLD + layout_world::HOUSING_STRUCTURE,
            Self::STRUCTURE,
        );
        memory.poke_u32(Self::STRUCTURE + structure::MODE, 2);
        memory.poke_u32(Self::STRUCTURE + structure::STATE, 2);
        memory.poke_u64(Self::STRUCTURE + structure::ACTIVE_ITEM, Self::ITEM);
        memory.poke_f32(Self::ITEM + item::POSITION_X, 10.0);
        memory.poke_f32(Self::ITEM + item::POSITION_Y, 0.5);
        memory.poke_f32(Self::ITEM + item::POSITION_Z, -4.0);
        memory.poke_f32(Self::ITEM + item::ROTATION, 0.25);
        memory.poke_u32(Self::ITEM + item::ROW_ID, Self::ROW_ID);

        let offsets = HousingOffsets {
            version: "test".to_string(),
            housing_module: Self::HOUSING_MODULE_RVA,
            layout_world: Self::LAYOUT_WORLD_RVA,
        };

        Self { memory, offsets }
    }

    pub fn outdoor_editing() -> Self {
        let scene = Self::indoor_editing();
        scene.go_outdoors();
        scene
    }

    pub fn go_outdoors(&self) {
        self.memory.poke_u64(
            Self::HOUSING_MODULE + housing_module::INDOOR_TERRITORY,
            0,
        );
        self.memory.poke_u64(
            Self::HOUSING_MODULE + housing_module::OUTDOOR_TERRITORY,
            Self::TERRITORY,
        );
    }

    /// Tear down the housing structure, as leaving the housing menu does
    pub fn close_menu(&self) {
        self.memory
            .poke_u64(Self::LAYOUT_WORLD + layout_world::HOUSING_STRUCTURE, 0);
    }

    pub fn set_mode(&self, mode: u32) {
        self.memory.poke_u32(Self::STRUCTURE + structure::MODE, mode);
    }

    pub fn set_state(&self, state: u32) {
        self.memory
            .poke_u32(Self::STRUCTURE + structure::STATE, state);
    }

    pub fn clear_active_item(&self) {
        self.memory
            .poke_u64(Self::STRUCTURE + structure::ACTIVE_ITEM, 0);
    }

    pub fn item_position(&self) -> [f32; 3] {
        [
            self.memory.read_f32(Self::ITEM + item::POSITION_X).unwrap(),
            self.memory.read_f32(Self::ITEM + item::POSITION_Y).unwrap(),
            self.memory.read_f32(Self::ITEM + item::POSITION_Z).unwrap(),
        ]
    }

    pub fn item_rotation(&self) -> f32 {
        self.memory.read_f32(Self::ITEM + item::ROTATION).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_read_write() {
        let memory = MockMemory::new(0);
        memory.map(0x1000, 8);

        memory.write_bytes(0x1002, &[1, 2, 3]).unwrap();
        assert_eq!(memory.read_bytes(0x1000, 6).unwrap(), vec![0, 0, 1, 2, 3, 0]);
        assert_eq!(memory.write_count(), 1);
    }

    #[test]
    fn test_mock_rejects_out_of_bounds() {
        let memory = MockMemory::new(0);
        memory.map(0x1000, 8);

        assert!(memory.read_bytes(0x1006, 4).is_err());
        assert!(memory.write_bytes(0x0FFF, &[0]).is_err());
        assert_eq!(memory.write_count(), 0);
    }

    #[test]
    fn test_mock_unmap() {
        let memory = MockMemory::new(0);
        memory.map(0x1000, 8);
        memory.unmap(0x1000);
        assert!(memory.read_u32(0x1000).is_err());
    }

    #[test]
    fn test_scene_poke_is_not_counted() {
        let scene = HousingScene::indoor_editing();
        assert_eq!(scene.memory.write_count(), 0);
        assert_eq!(scene.item_position(), [10.0, 0.5, -4.0]);
    }
}
