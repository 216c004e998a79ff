//! Editing session for one attached game process.
//!
//! The `Editor` ties the housing memory layer to the operator surface:
//! - Command interpretation (`on_command`)
//! - Window and furnishing list visibility
//! - Catalog lookups and icon requests for the presentation layer
//!
//! ## Example
//!
//! ```ignore
//! use bdth_core::{Catalog, Editor, EditorConfig, ProcessHandle, ProcessMemory};
//!
//! let process = ProcessHandle::find_and_open("ffxiv_dx11.exe")?;
//! let mut editor = Editor::with_config(
//!     ProcessMemory::new(&process),
//!     offsets,
//!     EditorConfig::builder().start_visible(true).build(),
//! );
//! editor.set_catalog(Catalog::load("catalog.json")?);
//!
//! editor.on_command("1.5 2.0 3.25 90")?;
//! ```

mod command;

pub use command::CommandForm;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::EditError;
use crate::housing::{
    ActiveItem, GateState, HousingMemory, Position, Rotation, parse_coordinate, parse_position,
    to_foreign_rotation,
};
use crate::icon::{IconCache, IconView};
use crate::memory::{ReadMemory, WriteMemory};
use crate::offset::HousingOffsets;

/// Configuration for an editing session
#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    /// Whether the main window starts visible
    pub start_visible: bool,
}

impl EditorConfig {
    pub fn builder() -> EditorConfigBuilder {
        EditorConfigBuilder::default()
    }
}

/// Builder for EditorConfig
#[derive(Debug, Clone, Default)]
pub struct EditorConfigBuilder {
    start_visible: Option<bool>,
}

impl EditorConfigBuilder {
    pub fn start_visible(mut self, visible: bool) -> Self {
        self.start_visible = Some(visible);
        self
    }

    pub fn build(self) -> EditorConfig {
        let default = EditorConfig::default();
        EditorConfig {
            start_visible: self.start_visible.unwrap_or(default.start_visible),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UiState {
    pub visible: bool,
    pub list_visible: bool,
}

/// What a successful command did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    UiToggled { visible: bool },
    ListToggled { visible: bool },
    Placed {
        position: Position,
        rotation: Option<Rotation>,
    },
}

/// Everything the presentation layer draws for one frame
#[derive(Debug, Clone, Serialize)]
pub struct EditorSnapshot {
    pub ui: UiState,
    pub gate: GateState,
    pub active_item: Option<ActiveItem>,
    pub entry: Option<CatalogEntry>,
}

pub struct Editor<M> {
    housing: HousingMemory<M>,
    catalog: Catalog,
    icons: Option<IconCache>,
    ui: UiState,
}

impl<M: ReadMemory + WriteMemory> Editor<M> {
    pub fn new(memory: M, offsets: HousingOffsets) -> Self {
        Self::with_config(memory, offsets, EditorConfig::default())
    }

    pub fn with_config(memory: M, offsets: HousingOffsets, config: EditorConfig) -> Self {
        debug!(
            "Editor offsets {}: housing_module=0x{:X}, layout_world=0x{:X}",
            offsets.version, offsets.housing_module, offsets.layout_world
        );

        Self {
            housing: HousingMemory::new(memory, offsets),
            catalog: Catalog::default(),
            icons: None,
            ui: UiState {
                visible: config.start_visible,
                list_visible: false,
            },
        }
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    pub fn set_icons(&mut self, icons: IconCache) {
        self.icons = Some(icons);
    }

    pub fn housing(&self) -> &HousingMemory<M> {
        &self.housing
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ui(&self) -> UiState {
        self.ui
    }

    /// Interpret one operator command.
    ///
    /// Failures are logged here; the caller decides what to show the operator.
    pub fn on_command(&mut self, args: &str) -> Result<CommandOutcome, EditError> {
        let result = CommandForm::classify(args).and_then(|form| self.run(form));

        match &result {
            Ok(outcome) => debug!("Command {:?} -> {:?}", args, outcome),
            Err(EditError::GateDenied(denial)) => warn!("{}", denial),
            Err(EditError::Usage(usage)) => warn!("Unrecognized command: {:?}", usage),
            Err(e) => error!("Error when positioning with command: {}", e),
        }
        result
    }

    fn run(&mut self, form: CommandForm) -> Result<CommandOutcome, EditError> {
        match form {
            CommandForm::ToggleUi => {
                self.ui.visible = !self.ui.visible;
                Ok(CommandOutcome::UiToggled {
                    visible: self.ui.visible,
                })
            }
            CommandForm::ToggleList => self
                .toggle_list()
                .map(|visible| CommandOutcome::ListToggled { visible }),
            CommandForm::Place {
                coordinates,
                rotation,
            } => self.place(&coordinates, rotation.as_deref()),
        }
    }

    /// Flip list visibility; a failed gate forces the list closed
    pub fn toggle_list(&mut self) -> Result<bool, EditError> {
        if let Err(denial) = self.housing.gate().check_list() {
            self.ui.list_visible = false;
            return Err(denial.into());
        }

        self.ui.list_visible = !self.ui.list_visible;
        Ok(self.ui.list_visible)
    }

    /// Gate, parse everything, write position, then rotation if given.
    ///
    /// A failed position write skips the rotation write.
    fn place(
        &self,
        coordinates: &[String; 3],
        rotation: Option<&str>,
    ) -> Result<CommandOutcome, EditError> {
        self.housing.gate().check_write()?;

        let [x, y, z] = coordinates;
        let position = parse_position([x.as_str(), y.as_str(), z.as_str()])?;
        let rotation = rotation
            .map(parse_coordinate)
            .transpose()?
            .map(to_foreign_rotation);

        self.housing.write_position(position)?;
        if let Some(rotation) = rotation {
            self.housing.write_rotation(rotation)?;
        }

        info!("Placed item at {}", position);
        Ok(CommandOutcome::Placed { position, rotation })
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        let gate = self.housing.gate().evaluate();
        let active_item = if gate.has_active_item {
            self.housing.read_active_item().ok()
        } else {
            None
        };
        let entry = active_item
            .and_then(|item| self.catalog.lookup(item.row_id, gate.outdoors))
            .cloned();

        EditorSnapshot {
            ui: self.ui,
            gate,
            active_item,
            entry,
        }
    }

    /// Icon for a catalog entry, starting its fetch if needed
    pub fn icon(&self, entry: &CatalogEntry) -> IconView {
        match &self.icons {
            Some(icons) => icons.request(entry.icon),
            None => IconView::Fallback(entry.icon),
        }
    }

    /// Release cached textures at the end of the session
    pub fn teardown(&mut self) {
        if let Some(icons) = &self.icons {
            icons.clear();
        }
        self.ui = UiState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GateDenial;
    use crate::housing::LayoutMode;
    use crate::memory::{HousingScene, MockMemory};
    use std::f32::consts::FRAC_PI_2;

    fn editor(scene: &HousingScene) -> Editor<&MockMemory> {
        Editor::new(&scene.memory, scene.offsets.clone())
    }

    #[test]
    fn test_position_command() {
        let scene = HousingScene::indoor_editing();
        let mut editor = editor(&scene);

        let outcome = editor.on_command("1.5 2.0 3.25").unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Placed {
                position: Position::new(1.5, 2.0, 3.25),
                rotation: None
            }
        );
        assert_eq!(scene.item_position(), [1.5, 2.0, 3.25]);
        assert_eq!(scene.item_rotation(), 0.25);
        assert_eq!(scene.memory.write_count(), 3);
    }

    #[test]
    fn test_position_and_rotation_command() {
        let scene = HousingScene::indoor_editing();
        let mut editor = editor(&scene);

        editor.on_command("1.5 2.0 3.25 90").unwrap();
        assert_eq!(scene.item_position(), [1.5, 2.0, 3.25]);
        assert!((scene.item_rotation() - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(scene.memory.write_count(), 4);
    }

    #[test]
    fn test_bad_number_writes_nothing() {
        let scene = HousingScene::indoor_editing();
        let mut editor = editor(&scene);

        assert_eq!(
            editor.on_command("abc 1 2"),
            Err(EditError::ParseFailure {
                token: "abc".to_string()
            })
        );
        assert!(matches!(
            editor.on_command("1 2 3 ninety"),
            Err(EditError::ParseFailure { .. })
        ));
        assert_eq!(scene.memory.write_count(), 0);
        assert_eq!(scene.item_position(), [10.0, 0.5, -4.0]);
        assert_eq!(scene.item_rotation(), 0.25);
    }

    #[test]
    fn test_gate_checked_before_parsing() {
        let scene = HousingScene::indoor_editing();
        scene.set_mode(LayoutMode::Move as u32);
        let mut editor = editor(&scene);

        assert_eq!(
            editor.on_command("abc 1 2"),
            Err(EditError::GateDenied(GateDenial::EditModeInactive))
        );
        assert_eq!(scene.memory.write_count(), 0);
    }

    #[test]
    fn test_failed_position_skips_rotation() {
        let scene = HousingScene::indoor_editing();
        scene.memory.unmap(HousingScene::ITEM);
        let mut editor = editor(&scene);

        assert!(matches!(
            editor.on_command("1 2 3 90"),
            Err(EditError::MemoryFault(_))
        ));
        assert_eq!(scene.memory.write_count(), 0);
    }

    #[test]
    fn test_empty_command_toggles_ui_only() {
        let scene = HousingScene::indoor_editing();
        scene.close_menu();
        let mut editor = editor(&scene);

        assert_eq!(
            editor.on_command(""),
            Ok(CommandOutcome::UiToggled { visible: true })
        );
        assert_eq!(
            editor.on_command(""),
            Ok(CommandOutcome::UiToggled { visible: false })
        );
    }

    #[test]
    fn test_list_toggle_indoors() {
        let scene = HousingScene::indoor_editing();
        let mut editor = editor(&scene);

        assert_eq!(
            editor.on_command("list"),
            Ok(CommandOutcome::ListToggled { visible: true })
        );
        assert_eq!(
            editor.on_command("list"),
            Ok(CommandOutcome::ListToggled { visible: false })
        );
    }

    #[test]
    fn test_list_forced_closed_outdoors() {
        let scene = HousingScene::indoor_editing();
        let mut editor = editor(&scene);
        editor.on_command("list").unwrap();
        assert!(editor.ui().list_visible);

        scene.go_outdoors();
        assert_eq!(
            editor.on_command("list"),
            Err(EditError::GateDenied(GateDenial::Outdoors))
        );
        assert!(!editor.ui().list_visible);

        assert!(editor.on_command("list").is_err());
        assert!(!editor.ui().list_visible);
    }

    #[test]
    fn test_list_requires_menu() {
        let scene = HousingScene::indoor_editing();
        scene.close_menu();
        let mut editor = editor(&scene);

        assert_eq!(
            editor.on_command("list"),
            Err(EditError::GateDenied(GateDenial::MenuClosed))
        );
        assert!(!editor.ui().list_visible);
    }

    #[test]
    fn test_snapshot_with_catalog_entry() {
        let scene = HousingScene::indoor_editing();
        let mut editor = editor(&scene);
        editor.set_catalog(
            Catalog::from_json(&format!(
                r#"{{"furniture": [{{"id": {}, "name": "Oak Table", "icon": 51001}}]}}"#,
                HousingScene::ROW_ID
            ))
            .unwrap(),
        );

        let snapshot = editor.snapshot();
        assert!(snapshot.gate.can_write());
        assert_eq!(
            snapshot.active_item.unwrap().position,
            Position::new(10.0, 0.5, -4.0)
        );
        assert_eq!(&*snapshot.entry.unwrap().name, "Oak Table");

        scene.go_outdoors();
        assert!(editor.snapshot().entry.is_none());
    }

    #[test]
    fn test_icon_without_cache_falls_back() {
        let scene = HousingScene::indoor_editing();
        let editor = editor(&scene);
        let entry = CatalogEntry {
            id: 1,
            item_id: 0,
            name: "x".into(),
            icon: 51001,
            category: None,
        };
        assert_eq!(editor.icon(&entry), IconView::Fallback(51001));
    }

    #[test]
    fn test_config_builder() {
        let scene = HousingScene::indoor_editing();
        let editor = Editor::with_config(
            &scene.memory,
            scene.offsets.clone(),
            EditorConfig::builder().start_visible(true).build(),
        );
        assert!(editor.ui().visible);
        assert!(!editor.ui().list_visible);
    }
}
