//! # bdth-core
//!
//! Core library for the bdth furnishing editor.
//!
//! This crate provides:
//! - Windows process attach with read/write memory access
//! - Resolution of the game's housing structures from two static slots
//! - Edit gating derived from the game's own housing mode
//! - Position and rotation writes on the selected furnishing
//! - The operator command interpreter
//! - Furnishing catalog lookups and a lazily filled icon cache
//!
//! ## Feature Flags
//!
//! - `debug-tools`: Enables the offset dump used to inspect the housing chain.
//!   This feature is intended for CLI tools and development, not production use.

pub mod catalog;
pub mod editor;
pub mod error;
pub mod housing;
pub mod icon;
pub mod memory;
pub mod offset;
pub mod prelude;

pub use catalog::{Catalog, CatalogEntry};
pub use editor::{
    CommandForm, CommandOutcome, Editor, EditorConfig, EditorConfigBuilder, EditorSnapshot,
    UiState,
};
pub use error::{EditError, Error, GateDenial, Result};
pub use housing::{
    ActiveItem, GateState, HousingGate, HousingMemory, ItemState, LayoutMode, Position,
    ResolvedHousing, Rotation, StructureLocator, parse_coordinate, parse_position,
    to_display_rotation, to_foreign_rotation,
};
pub use icon::{
    IconCache, IconError, IconSource, IconSpawner, IconState, IconTexture, IconView,
    MAX_ICON_ID, RawIcon, ThreadSpawner,
};
pub use memory::{
    DEFAULT_PROCESS_NAME, ProcessHandle, ProcessInfo, ProcessMemory, ReadMemory, WriteMemory,
    list_processes,
};
pub use offset::{
    CodeSignature, HousingOffsets, HousingSignatures, SignatureResolver, builtin_signatures,
    load_offsets, save_offsets,
};

// Debug utilities (requires debug-tools feature)
#[cfg(feature = "debug-tools")]
pub use offset::OffsetDump;
