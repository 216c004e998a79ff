//! Prelude module for convenient imports
//!
//! ```ignore
//! use bdth_core::prelude::*;
//! ```
//!
//! This brings the editing session, the memory traits, the housing value
//! types and the error types into scope.

// Session
pub use crate::editor::{CommandOutcome, Editor, EditorConfig};

// Error handling
pub use crate::error::{EditError, Error, GateDenial, Result};

// Housing values
pub use crate::housing::{GateState, HousingMemory, Position, Rotation};

// Memory access
pub use crate::memory::{ProcessHandle, ProcessMemory, ReadMemory, WriteMemory};

// Reference data
pub use crate::catalog::{Catalog, CatalogEntry};
pub use crate::icon::{IconCache, IconSource, IconView};
pub use crate::offset::HousingOffsets;
