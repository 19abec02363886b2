//! Wall geometry derived from a layout's floor cells.
//!
//! Both passes here are pure functions of the floor set and the entrance-edge
//! suppressions; they never look at rooms or corridors. Output coordinates are
//! in renderer units: cell `(gx, gy)` spans
//! `origin + [gx, gx + 1] * cell_size` horizontally and likewise vertically.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::types::{Direction, EntranceEdge, GridPos};

pub mod visuals;

pub use visuals::{WallFill, WallStyle, WallVisual, WallVisualKind, generate_wall_visuals};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Grid-to-world mapping plus the outward wall thickness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallGeometry {
    pub cell_size: f64,
    pub origin: Point,
    pub thickness: f64,
}

impl Default for WallGeometry {
    fn default() -> Self {
        Self { cell_size: 100.0, origin: Point::default(), thickness: 10.0 }
    }
}

impl WallGeometry {
    pub fn new(cell_size: f64, origin: Point, thickness: f64) -> Result<Self, GeometryError> {
        let geometry = Self { cell_size, origin, thickness };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(GeometryError::InvalidCellSize(self.cell_size));
        }
        if !(self.thickness.is_finite() && self.thickness >= 0.0) {
            return Err(GeometryError::InvalidThickness(self.thickness));
        }
        Ok(())
    }

    /// Top-left corner of `cell`.
    pub fn cell_origin(&self, cell: GridPos) -> Point {
        Point {
            x: self.origin.x + f64::from(cell.x) * self.cell_size,
            y: self.origin.y + f64::from(cell.y) * self.cell_size,
        }
    }
}

/// One straight blocking boundary along a single cell edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub start: Point,
    pub end: Point,
    pub cell: GridPos,
    pub side: Direction,
    pub blocks_movement: bool,
    pub blocks_sight: bool,
}

/// Every floor side facing a non-floor cell, minus suppressed entrances.
pub fn exposed_sides(
    floors: &BTreeSet<GridPos>,
    entrance_edges: &BTreeSet<EntranceEdge>,
) -> Vec<(GridPos, Direction)> {
    let mut exposed = Vec::new();
    for &cell in floors {
        for side in Direction::ALL {
            if entrance_edges.contains(&EntranceEdge { pos: cell, dir: side }) {
                continue;
            }
            if !floors.contains(&cell.step(side)) {
                exposed.push((cell, side));
            }
        }
    }
    exposed
}

pub fn generate_walls(
    floors: &BTreeSet<GridPos>,
    entrance_edges: &BTreeSet<EntranceEdge>,
    geometry: &WallGeometry,
) -> Vec<WallSegment> {
    exposed_sides(floors, entrance_edges)
        .into_iter()
        .map(|(cell, side)| wall_segment(floors, cell, side, geometry))
        .collect()
}

fn wall_segment(
    floors: &BTreeSet<GridPos>,
    cell: GridPos,
    side: Direction,
    geometry: &WallGeometry,
) -> WallSegment {
    let corner = geometry.cell_origin(cell);
    let size = geometry.cell_size;
    let t = geometry.thickness;

    let (start, end) = if side.is_horizontal() {
        let low = flank_adjustment(floors, cell, side, Direction::North, t);
        let high = flank_adjustment(floors, cell, side, Direction::South, t);
        let x = if side == Direction::West { corner.x - t } else { corner.x + size + t };
        (Point { x, y: corner.y - low }, Point { x, y: corner.y + size + high })
    } else {
        let low = flank_adjustment(floors, cell, side, Direction::West, t);
        let high = flank_adjustment(floors, cell, side, Direction::East, t);
        let y = if side == Direction::North { corner.y - t } else { corner.y + size + t };
        (Point { x: corner.x - low, y }, Point { x: corner.x + size + high, y })
    };

    WallSegment { start, end, cell, side, blocks_movement: true, blocks_sight: true }
}

/// How far the endpoint on the `toward` end of a `side` wall moves along the
/// wall: out by `t` at a convex corner, in by `t` at a concave one.
fn flank_adjustment(
    floors: &BTreeSet<GridPos>,
    cell: GridPos,
    side: Direction,
    toward: Direction,
    t: f64,
) -> f64 {
    let source = cell.step(toward);
    if !floors.contains(&source) {
        t
    } else if floors.contains(&source.step(side)) {
        -t
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floors(cells: &[(i32, i32)]) -> BTreeSet<GridPos> {
        cells.iter().map(|&(x, y)| GridPos::new(x, y)).collect()
    }

    fn geometry() -> WallGeometry {
        WallGeometry { cell_size: 10.0, origin: Point::default(), thickness: 1.0 }
    }

    fn wall_on(walls: &[WallSegment], cell: GridPos, side: Direction) -> WallSegment {
        *walls
            .iter()
            .find(|wall| wall.cell == cell && wall.side == side)
            .expect("wall should exist")
    }

    #[test]
    fn lone_tile_is_boxed_in_with_mitered_corners() {
        let tiles = floors(&[(0, 0)]);
        let walls = generate_walls(&tiles, &BTreeSet::new(), &geometry());
        assert_eq!(walls.len(), 4);

        let north = wall_on(&walls, GridPos::new(0, 0), Direction::North);
        assert_eq!(north.start, Point { x: -1.0, y: -1.0 });
        assert_eq!(north.end, Point { x: 11.0, y: -1.0 });

        let east = wall_on(&walls, GridPos::new(0, 0), Direction::East);
        assert_eq!(east.start, Point { x: 11.0, y: -1.0 });
        assert_eq!(east.end, Point { x: 11.0, y: 11.0 });
        assert!(walls.iter().all(|wall| wall.blocks_movement && wall.blocks_sight));
    }

    #[test]
    fn straight_runs_keep_interior_endpoints_flush() {
        let tiles = floors(&[(0, 0), (1, 0)]);
        let walls = generate_walls(&tiles, &BTreeSet::new(), &geometry());
        assert_eq!(walls.len(), 6);

        let left_top = wall_on(&walls, GridPos::new(0, 0), Direction::North);
        assert_eq!(left_top.start.x, -1.0);
        assert_eq!(left_top.end.x, 10.0);
    }

    #[test]
    fn inside_corner_walls_meet_without_overlap() {
        let tiles = floors(&[(0, 0), (1, 0), (0, 1)]);
        let walls = generate_walls(&tiles, &BTreeSet::new(), &geometry());

        let east_of_lower = wall_on(&walls, GridPos::new(0, 1), Direction::East);
        let south_of_right = wall_on(&walls, GridPos::new(1, 0), Direction::South);
        assert_eq!(east_of_lower.start, Point { x: 11.0, y: 11.0 });
        assert_eq!(south_of_right.start, Point { x: 11.0, y: 11.0 });
    }

    #[test]
    fn suppressed_edges_emit_no_wall() {
        let tiles = floors(&[(0, 0)]);
        let edges =
            BTreeSet::from([EntranceEdge { pos: GridPos::new(0, 0), dir: Direction::West }]);
        let walls = generate_walls(&tiles, &edges, &geometry());
        assert_eq!(walls.len(), 3);
        assert!(walls.iter().all(|wall| wall.side != Direction::West));
    }

    #[test]
    fn empty_floor_set_yields_no_walls() {
        assert!(generate_walls(&BTreeSet::new(), &BTreeSet::new(), &geometry()).is_empty());
    }

    #[test]
    fn geometry_validation_rejects_degenerate_values() {
        assert_eq!(
            WallGeometry::new(0.0, Point::default(), 1.0),
            Err(GeometryError::InvalidCellSize(0.0))
        );
        assert_eq!(
            WallGeometry::new(10.0, Point::default(), -1.0),
            Err(GeometryError::InvalidThickness(-1.0))
        );
        assert!(WallGeometry::new(10.0, Point { x: 5.0, y: 5.0 }, 0.0).is_ok());
    }

    #[test]
    fn origin_offsets_every_cell() {
        let geometry = WallGeometry {
            cell_size: 50.0,
            origin: Point { x: 100.0, y: -20.0 },
            thickness: 4.0,
        };
        assert_eq!(geometry.cell_origin(GridPos::new(-2, 3)), Point { x: 0.0, y: 130.0 });
    }
}
