mod collection;
#[cfg(feature = "debug-tools")]
mod dump;
mod loader;
mod signature;

pub use collection::*;
#[cfg(feature = "debug-tools")]
pub use dump::*;
pub use loader::*;
pub use signature::*;
