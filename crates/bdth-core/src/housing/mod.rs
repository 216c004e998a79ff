//! The housing edit chain: locate, gate, transform, access.

mod access;
mod gate;
mod locator;
mod transform;
mod types;

pub use access::*;
pub use gate::*;
pub use locator::*;
pub use transform::*;
pub use types::*;
