use serde::{Deserialize, Serialize};

/// A cell of the dungeon grid. `y` grows southward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub y: i32,
    pub x: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn step_by(self, dir: Direction, distance: i32) -> Self {
        let (dx, dy) = dir.offset();
        Self { y: self.y + dy * distance, x: self.x + dx * distance }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::South, Direction::East, Direction::West];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    pub fn perpendiculars(self) -> [Self; 2] {
        if self.is_horizontal() { [Self::North, Self::South] } else { [Self::East, Self::West] }
    }

    /// East and West move along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            Self::North => 0,
            Self::South => 1,
            Self::East => 2,
            Self::West => 3,
        }
    }
}

/// Cell and side on which a door-bearing wall is inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DoorPlacement {
    pub pos: GridPos,
    pub dir: Direction,
}

/// Cell side whose wall is suppressed because a passage opens there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntranceEdge {
    pub pos: GridPos,
    pub dir: Direction,
}

impl EntranceEdge {
    /// The same boundary seen from the neighbouring cell.
    pub fn facing(self) -> Self {
        Self { pos: self.pos.step(self.dir), dir: self.dir.opposite() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perpendiculars_never_include_the_axis_itself() {
        for dir in Direction::ALL {
            for perpendicular in dir.perpendiculars() {
                assert_ne!(perpendicular, dir);
                assert_ne!(perpendicular, dir.opposite());
                assert_ne!(perpendicular.is_horizontal(), dir.is_horizontal());
            }
        }
    }

    #[test]
    fn facing_edge_points_back_at_the_original_cell() {
        let edge = EntranceEdge { pos: GridPos::new(2, -3), dir: Direction::West };
        let facing = edge.facing();
        assert_eq!(facing, EntranceEdge { pos: GridPos::new(1, -3), dir: Direction::East });
        assert_eq!(facing.facing(), edge);
    }
}
