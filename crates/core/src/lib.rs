pub mod error;
pub mod mapgen;
pub mod types;
pub mod walls;

pub use error::{GeometryError, LayoutError};
pub use mapgen::{
    DungeonLayout, LayoutGenerator, LayoutParams, Room, RoomData, SeededRng, UnitRng,
    generate_layout,
};
pub use types::*;
pub use walls::{
    Point, Rect, WallFill, WallGeometry, WallSegment, WallStyle, WallVisual, WallVisualKind,
    exposed_sides, generate_wall_visuals, generate_walls,
};
