//! Coalesced wall rectangles for drawing, one per maximal straight run, plus
//! square fills at outside corners. Carries no collision meaning.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Direction, EntranceEdge, GridPos};

use super::{Rect, WallGeometry, exposed_sides};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallStyle {
    pub use_texture: bool,
    pub wall_color: String,
    pub texture_paths: Vec<String>,
}

impl Default for WallStyle {
    fn default() -> Self {
        Self { use_texture: false, wall_color: "#3a3a3a".to_string(), texture_paths: Vec::new() }
    }
}

impl WallStyle {
    /// Textures cycle over pieces in emission order.
    fn fill_for(&self, piece_index: usize) -> WallFill {
        if self.use_texture && !self.texture_paths.is_empty() {
            let path = &self.texture_paths[piece_index % self.texture_paths.len()];
            return WallFill::Texture(path.clone());
        }
        WallFill::Color(self.wall_color.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallFill {
    Color(String),
    Texture(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallVisualKind {
    /// `length` consecutive cells starting at `origin`, exposed on `side`.
    /// North/South runs extend east; East/West runs extend south.
    Run { origin: GridPos, side: Direction, length: u32 },
    /// Outside corner of `cell` between a north/south and an east/west side.
    Corner { cell: GridPos, vertical: Direction, horizontal: Direction },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallVisual {
    pub rect: Rect,
    pub kind: WallVisualKind,
    pub fill: WallFill,
}

pub fn generate_wall_visuals(
    floors: &BTreeSet<GridPos>,
    entrance_edges: &BTreeSet<EntranceEdge>,
    geometry: &WallGeometry,
    style: &WallStyle,
) -> Vec<WallVisual> {
    let exposed: BTreeSet<(GridPos, Direction)> =
        exposed_sides(floors, entrance_edges).into_iter().collect();

    let mut kinds = Vec::new();
    for side in Direction::ALL {
        kinds.extend(merge_runs(&exposed, side));
    }
    kinds.extend(outside_corners(&exposed));

    kinds
        .into_iter()
        .enumerate()
        .map(|(index, kind)| WallVisual {
            rect: visual_rect(kind, geometry),
            kind,
            fill: style.fill_for(index),
        })
        .collect()
}

/// Greedy raster-order merge of one side's exposures into maximal runs.
fn merge_runs(exposed: &BTreeSet<(GridPos, Direction)>, side: Direction) -> Vec<WallVisualKind> {
    let runs_along_x = !side.is_horizontal();
    // (lane, position along the run)
    let mut pending: BTreeSet<(i32, i32)> = exposed
        .iter()
        .filter(|(_, exposed_side)| *exposed_side == side)
        .map(|(cell, _)| if runs_along_x { (cell.y, cell.x) } else { (cell.x, cell.y) })
        .collect();

    let mut runs = Vec::new();
    while let Some((lane, first)) = pending.pop_first() {
        let mut length = 1;
        while pending.remove(&(lane, first + length)) {
            length += 1;
        }
        let origin = if runs_along_x {
            GridPos { y: lane, x: first }
        } else {
            GridPos { y: first, x: lane }
        };
        runs.push(WallVisualKind::Run { origin, side, length: length as u32 });
    }
    runs
}

fn outside_corners(exposed: &BTreeSet<(GridPos, Direction)>) -> Vec<WallVisualKind> {
    let cells: BTreeSet<GridPos> = exposed.iter().map(|(cell, _)| *cell).collect();
    let mut corners = Vec::new();
    for cell in cells {
        for vertical in [Direction::North, Direction::South] {
            for horizontal in [Direction::West, Direction::East] {
                if exposed.contains(&(cell, vertical)) && exposed.contains(&(cell, horizontal)) {
                    corners.push(WallVisualKind::Corner { cell, vertical, horizontal });
                }
            }
        }
    }
    corners
}

fn visual_rect(kind: WallVisualKind, geometry: &WallGeometry) -> Rect {
    let size = geometry.cell_size;
    let t = geometry.thickness;
    match kind {
        WallVisualKind::Run { origin, side, length } => {
            let corner = geometry.cell_origin(origin);
            let span = f64::from(length) * size;
            match side {
                Direction::North => Rect { x: corner.x, y: corner.y - t, w: span, h: t },
                Direction::South => Rect { x: corner.x, y: corner.y + size, w: span, h: t },
                Direction::West => Rect { x: corner.x - t, y: corner.y, w: t, h: span },
                Direction::East => Rect { x: corner.x + size, y: corner.y, w: t, h: span },
            }
        }
        WallVisualKind::Corner { cell, vertical, horizontal } => {
            let corner = geometry.cell_origin(cell);
            let x = if horizontal == Direction::West { corner.x - t } else { corner.x + size };
            let y = if vertical == Direction::North { corner.y - t } else { corner.y + size };
            Rect { x, y, w: t, h: t }
        }
    }
}
