use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Error for invalid enum value conversion
#[derive(Debug, Error)]
#[error("Invalid {type_name} value: {value}")]
pub struct InvalidEnumValueError {
    type_name: &'static str,
    value: u32,
}

impl InvalidEnumValueError {
    pub fn new(type_name: &'static str, value: u32) -> Self {
        Self { type_name, value }
    }
}

/// Furnishing position in game-world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} {:.3} {:.3}", self.x, self.y, self.z)
    }
}

/// Yaw in radians, as the game stores it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation(pub f32);

impl Rotation {
    pub fn radians(self) -> f32 {
        self.0
    }
}

/// Snapshot of the furnishing selected for editing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveItem {
    pub address: u64,
    pub row_id: u32,
    pub position: Position,
    pub rotation: Rotation,
}

/// Layout tool selected in the housing menu
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[repr(u32)]
pub enum LayoutMode {
    #[default]
    None = 0,
    Move = 1,
    Rotate = 2,
    Store = 3,
    Place = 4,
    Remove = 6,
}

impl TryFrom<u32> for LayoutMode {
    type Error = InvalidEnumValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Move),
            2 => Ok(Self::Rotate),
            3 => Ok(Self::Store),
            4 => Ok(Self::Place),
            6 => Ok(Self::Remove),
            _ => Err(InvalidEnumValueError::new("LayoutMode", value)),
        }
    }
}

/// Selection state of the item under the layout tool
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[repr(u32)]
pub enum ItemState {
    #[default]
    None = 0,
    Hover = 1,
    SoftSelect = 2,
    Active = 3,
}

impl TryFrom<u32> for ItemState {
    type Error = InvalidEnumValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Hover),
            2 => Ok(Self::SoftSelect),
            3 => Ok(Self::Active),
            _ => Err(InvalidEnumValueError::new("ItemState", value)),
        }
    }
}
