//! Conversions between operator-facing values and the game's encoding.

use std::f32::consts::PI;

use crate::error::EditError;
use crate::housing::{Position, Rotation};

/// Degrees typed by the operator to the radians the game stores
pub fn to_foreign_rotation(degrees: f32) -> Rotation {
    Rotation(degrees * PI / 180.0)
}

/// Stored radians back to degrees for display
pub fn to_display_rotation(rotation: Rotation) -> f32 {
    rotation.0 * 180.0 / PI
}

/// Parse one numeric token.
///
/// Uses Rust's float grammar, which is locale-invariant: `.` is the only
/// decimal separator and digit grouping is rejected.
pub fn parse_coordinate(token: &str) -> Result<f32, EditError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EditError::ParseFailure {
            token: token.to_string(),
        })
}

/// Parse three tokens into a position; fails as a whole on any bad token
pub fn parse_position(tokens: [&str; 3]) -> Result<Position, EditError> {
    let [x, y, z] = tokens;
    Ok(Position::new(
        parse_coordinate(x)?,
        parse_coordinate(y)?,
        parse_coordinate(z)?,
    ))
}
