use thiserror::Error;

/// Geometry failures that callers are expected to recover from.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// Origin and target centres coincide, so there is no direction to normalize.
    #[error("cannot aim from ({x}, {y}) at itself")]
    ZeroLengthDirection { x: f32, y: f32 },
}
