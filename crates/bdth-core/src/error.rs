use strum::{Display, IntoStaticStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Failed to write process memory at address {address:#x}: {message}")]
    MemoryWriteFailed { address: u64, message: String },

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("Failed to resolve signature: {0}")]
    SignatureNotFound(String),

    #[error("Invalid catalog data: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Precondition that blocked an edit.
///
/// The display text is what the operator sees in the chat/log channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum GateDenial {
    #[strum(serialize = "Item editing is not active.")]
    EditModeInactive,
    #[strum(serialize = "No furnishing is selected.")]
    NoActiveItem,
    #[strum(serialize = "Cannot open furnishing list unless housing menu is open.")]
    MenuClosed,
    #[strum(serialize = "Cannot open furnishing list outdoors currently.")]
    Outdoors,
}

/// Outcome of a failed edit operation.
///
/// None of these are fatal: the operation is dropped and the next tick
/// starts from a fresh resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("{0}")]
    GateDenied(GateDenial),

    #[error("Invalid number: {token:?}")]
    ParseFailure { token: String },

    #[error("Memory fault: {0}")]
    MemoryFault(String),

    #[error("Unrecognized command: {0}")]
    Usage(String),
}

impl EditError {
    pub fn memory_fault(message: impl Into<String>) -> Self {
        Self::MemoryFault(message.into())
    }

    /// Whether the operator should see this error directly rather than only in the log.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::GateDenied(_) | Self::Usage(_))
    }
}

impl From<GateDenial> for EditError {
    fn from(denial: GateDenial) -> Self {
        Self::GateDenied(denial)
    }
}
