use serde::Serialize;
use tracing::{debug, warn};

use crate::error::GateDenial;
use crate::housing::{ItemState, LayoutMode, StructureLocator};
use crate::memory::ReadMemory;
use crate::memory::layout::structure;
use crate::offset::HousingOffsets;

/// Gate readings at one instant, for display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GateState {
    pub housing_open: bool,
    pub outdoors: bool,
    pub can_edit: bool,
    pub has_active_item: bool,
    pub mode: LayoutMode,
    pub item_state: ItemState,
}

impl GateState {
    pub fn can_write(&self) -> bool {
        self.can_edit && self.has_active_item
    }

    pub fn can_open_list(&self) -> bool {
        self.housing_open && !self.outdoors
    }
}

/// Preconditions derived from the game's own housing state.
///
/// Every predicate reads foreign memory at call time.
pub struct HousingGate<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
    locator: StructureLocator<'a, R>,
}

impl<'a, R: ReadMemory + ?Sized> HousingGate<'a, R> {
    pub fn new(reader: &'a R, offsets: &'a HousingOffsets) -> Self {
        Self {
            reader,
            locator: StructureLocator::new(reader, offsets),
        }
    }

    /// True only while the game is in rotate mode with a soft-selected item
    pub fn can_edit_item(&self) -> bool {
        let Some(addr) = self.locator.housing_structure() else {
            return false;
        };
        let (mode, state) = self.read_modes(addr);
        mode == LayoutMode::Rotate && state == ItemState::SoftSelect
    }

    pub fn is_housing_open(&self) -> bool {
        self.locator.housing_structure().is_some()
    }

    pub fn is_outdoors(&self) -> bool {
        self.locator.outdoor_territory().is_some()
    }

    pub fn has_active_item(&self) -> bool {
        self.locator
            .housing_structure()
            .and_then(|s| self.locator.active_item(s))
            .is_some()
    }

    /// Composite rule for position and rotation writes
    pub fn check_write(&self) -> Result<(), GateDenial> {
        if !self.can_edit_item() {
            return Err(GateDenial::EditModeInactive);
        }
        if !self.has_active_item() {
            return Err(GateDenial::NoActiveItem);
        }
        Ok(())
    }

    /// Composite rule for showing the furnishing list
    pub fn check_list(&self) -> Result<(), GateDenial> {
        if !self.is_housing_open() {
            return Err(GateDenial::MenuClosed);
        }
        if self.is_outdoors() {
            return Err(GateDenial::Outdoors);
        }
        Ok(())
    }

    pub fn evaluate(&self) -> GateState {
        let structure = self.locator.housing_structure();
        let (mode, item_state) = structure
            .map(|s| self.read_modes(s))
            .unwrap_or_default();

        let state = GateState {
            housing_open: structure.is_some(),
            outdoors: self.is_outdoors(),
            can_edit: structure.is_some()
                && mode == LayoutMode::Rotate
                && item_state == ItemState::SoftSelect,
            has_active_item: structure
                .and_then(|s| self.locator.active_item(s))
                .is_some(),
            mode,
            item_state,
        };
        debug!("Gate state: {:?}", state);
        state
    }

    fn read_field(&self, addr: u64, offset: u64) -> Option<u32> {
        self.reader.read_u32(addr.checked_add(offset)?).ok()
    }

    fn read_modes(&self, addr: u64) -> (LayoutMode, ItemState) {
        let mode = self
            .read_field(addr, structure::MODE)
            .map(|raw| {
                LayoutMode::try_from(raw).unwrap_or_else(|e| {
                    warn!("{}, treating as None", e);
                    LayoutMode::None
                })
            })
            .unwrap_or_default();

        let state = self
            .read_field(addr, structure::STATE)
            .map(|raw| {
                ItemState::try_from(raw).unwrap_or_else(|e| {
                    warn!("{}, treating as None", e);
                    ItemState::None
                })
            })
            .unwrap_or_default();

        (mode, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::HousingScene;

    #[test]
    fn test_all_gates_open_indoors() {
        let scene = HousingScene::indoor_editing();
        let gate = HousingGate::new(&scene.memory, &scene.offsets);

        assert!(gate.can_edit_item());
        assert!(gate.is_housing_open());
        assert!(!gate.is_outdoors());
        assert_eq!(gate.check_write(), Ok(()));
        assert_eq!(gate.check_list(), Ok(()));
    }

    #[test]
    fn test_move_mode_cannot_edit() {
        let scene = HousingScene::indoor_editing();
        scene.set_mode(LayoutMode::Move as u32);
        let gate = HousingGate::new(&scene.memory, &scene.offsets);

        assert!(!gate.can_edit_item());
        assert_eq!(gate.check_write(), Err(GateDenial::EditModeInactive));
    }

    #[test]
    fn test_hover_state_cannot_edit() {
        let scene = HousingScene::indoor_editing();
        scene.set_state(ItemState::Hover as u32);
        let gate = HousingGate::new(&scene.memory, &scene.offsets);

        assert!(!gate.can_edit_item());
    }

    #[test]
    fn test_unknown_mode_is_not_editable() {
        let scene = HousingScene::indoor_editing();
        scene.set_mode(77);
        let gate = HousingGate::new(&scene.memory, &scene.offsets);

        assert!(!gate.can_edit_item());
        assert_eq!(gate.evaluate().mode, LayoutMode::None);
    }

    #[test]
    fn test_structure_pointer_near_top_is_closed() {
        let scene = HousingScene::indoor_editing();
        scene.memory.poke_u64(
            HousingScene::LAYOUT_WORLD + crate::memory::layout::layout_world::HOUSING_STRUCTURE,
            u64::MAX - 4,
        );
        let gate = HousingGate::new(&scene.memory, &scene.offsets);

        assert!(!gate.can_edit_item());
        assert!(!gate.has_active_item());
        assert_eq!(gate.check_write(), Err(GateDenial::EditModeInactive));
        assert!(!gate.evaluate().can_write());
    }

    #[test]
    fn test_missing_active_item_denies_write() {
        let scene = HousingScene::indoor_editing();
        scene.clear_active_item();
        let gate = HousingGate::new(&scene.memory, &scene.offsets);

        assert!(gate.can_edit_item());
        assert_eq!(gate.check_write(), Err(GateDenial::NoActiveItem));
    }

    #[test]
    fn test_list_gate_order() {
        let scene = HousingScene::outdoor_editing();
        let gate = HousingGate::new(&scene.memory, &scene.offsets);
        assert_eq!(gate.check_list(), Err(GateDenial::Outdoors));

        scene.close_menu();
        assert_eq!(gate.check_list(), Err(GateDenial::MenuClosed));
    }

    #[test]
    fn test_outdoors_still_allows_writes() {
        let scene = HousingScene::outdoor_editing();
        let gate = HousingGate::new(&scene.memory, &scene.offsets);

        assert!(gate.is_outdoors());
        assert_eq!(gate.check_write(), Ok(()));
    }

    #[test]
    fn test_evaluate_snapshot() {
        let scene = HousingScene::indoor_editing();
        let gate = HousingGate::new(&scene.memory, &scene.offsets);

        let state = gate.evaluate();
        assert!(state.can_write());
        assert!(state.can_open_list());
        assert_eq!(state.mode, LayoutMode::Rotate);
        assert_eq!(state.item_state, ItemState::SoftSelect);

        scene.close_menu();
        let state = gate.evaluate();
        assert_eq!(state, GateState::default());
    }
}
