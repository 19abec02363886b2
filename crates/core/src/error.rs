//! Contract violations reported by the generator and the wall passes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("room count must be at least 1, got {0}")]
    InvalidRoomCount(u32),
    #[error("{name} must lie in [0, 1], got {value}")]
    RatioOutOfRange { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),
    #[error("wall thickness must be non-negative and finite, got {0}")]
    InvalidThickness(f64),
}
