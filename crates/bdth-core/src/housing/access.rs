//! Snapshot reads and gated writes of the active item.

use tracing::{info, warn};

use crate::error::EditError;
use crate::housing::{
    ActiveItem, HousingGate, Position, ResolvedHousing, Rotation, StructureLocator,
};
use crate::memory::layout::item;
use crate::memory::{ReadMemory, WriteMemory};
use crate::offset::HousingOffsets;

/// Address of a field inside a foreign structure
fn field(address: u64, offset: u64) -> Result<u64, EditError> {
    address.checked_add(offset).ok_or_else(|| {
        EditError::memory_fault(format!("item pointer 0x{:X} is out of range", address))
    })
}

/// Read/write access to the selected furnishing.
///
/// Holds only the memory accessor and the static offsets. Structure addresses
/// are resolved again by every call.
pub struct HousingMemory<M> {
    memory: M,
    offsets: HousingOffsets,
}

impl<M: ReadMemory> HousingMemory<M> {
    pub fn new(memory: M, offsets: HousingOffsets) -> Self {
        Self { memory, offsets }
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn offsets(&self) -> &HousingOffsets {
        &self.offsets
    }

    pub fn locator(&self) -> StructureLocator<'_, M> {
        StructureLocator::new(&self.memory, &self.offsets)
    }

    pub fn gate(&self) -> HousingGate<'_, M> {
        HousingGate::new(&self.memory, &self.offsets)
    }

    pub fn read_position(&self) -> Result<Position, EditError> {
        let resolved = self.resolve()?;
        self.position_at(resolved.active_item)
    }

    pub fn read_rotation(&self) -> Result<Rotation, EditError> {
        let resolved = self.resolve()?;
        self.rotation_at(resolved.active_item)
    }

    /// Row id, position and rotation from a single resolution
    pub fn read_active_item(&self) -> Result<ActiveItem, EditError> {
        let resolved = self.resolve()?;
        let address = resolved.active_item;
        let row_id = self
            .memory
            .read_u32(field(address, item::ROW_ID)?)
            .map_err(|e| EditError::memory_fault(e.to_string()))?;

        Ok(ActiveItem {
            address,
            row_id,
            position: self.position_at(address)?,
            rotation: self.rotation_at(address)?,
        })
    }

    fn resolve(&self) -> Result<ResolvedHousing, EditError> {
        self.locator()
            .resolve()
            .ok_or_else(|| EditError::memory_fault("housing chain does not resolve"))
    }

    fn position_at(&self, address: u64) -> Result<Position, EditError> {
        let read = |offset| {
            self.memory
                .read_f32(field(address, offset)?)
                .map_err(|e| EditError::memory_fault(e.to_string()))
        };
        Ok(Position::new(
            read(item::POSITION_X)?,
            read(item::POSITION_Y)?,
            read(item::POSITION_Z)?,
        ))
    }

    fn rotation_at(&self, address: u64) -> Result<Rotation, EditError> {
        self.memory
            .read_f32(field(address, item::ROTATION)?)
            .map(Rotation)
            .map_err(|e| EditError::memory_fault(e.to_string()))
    }
}

impl<M: ReadMemory + WriteMemory> HousingMemory<M> {
    /// Commit a position to the active item.
    ///
    /// Components are written x, y, z in that order; the game may observe a
    /// torn value between the writes.
    pub fn write_position(&self, position: Position) -> Result<(), EditError> {
        let target = self.checked_target()?;

        for (offset, value) in [
            (item::POSITION_X, position.x),
            (item::POSITION_Y, position.y),
            (item::POSITION_Z, position.z),
        ] {
            self.memory
                .write_f32(field(target, offset)?, value)
                .map_err(|e| EditError::memory_fault(e.to_string()))?;
        }

        info!("Wrote position {} to item 0x{:X}", position, target);
        Ok(())
    }

    pub fn write_rotation(&self, rotation: Rotation) -> Result<(), EditError> {
        let target = self.checked_target()?;

        self.memory
            .write_f32(field(target, item::ROTATION)?, rotation.0)
            .map_err(|e| EditError::memory_fault(e.to_string()))?;

        info!(
            "Wrote rotation {:.4} rad to item 0x{:X}",
            rotation.0, target
        );
        Ok(())
    }

    /// Gate first, then resolve again right before the write
    fn checked_target(&self) -> Result<u64, EditError> {
        if let Err(denial) = self.gate().check_write() {
            warn!("Write blocked: {}", denial);
            return Err(denial.into());
        }

        let resolved = self.resolve()?;
        Ok(resolved.active_item)
    }
}
