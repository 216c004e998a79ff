pub mod layout;
mod process;
mod reader;

#[cfg(test)]
pub mod mock;

pub use process::*;
pub use reader::{ProcessMemory, ReadMemory, WriteMemory};

#[cfg(test)]
pub use mock::{HousingScene, MockMemory};
