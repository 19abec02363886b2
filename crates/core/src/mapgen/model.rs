//! Public data models for generated layouts.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Direction, DoorPlacement, EntranceEdge, GridPos};

/// Axis-aligned room in grid units. `right` and `bottom` are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    pub fn left(self) -> i32 {
        self.x
    }

    pub fn right(self) -> i32 {
        self.x + self.w
    }

    pub fn top(self) -> i32 {
        self.y
    }

    pub fn bottom(self) -> i32 {
        self.y + self.h
    }

    pub fn center(self) -> GridPos {
        GridPos { y: self.y + self.h / 2, x: self.x + self.w / 2 }
    }

    /// True when `other` overlaps this room grown by `margin` cells on every
    /// side, i.e. when fewer than `margin` empty cells separate the two.
    pub fn intersects(self, other: &Self, margin: i32) -> bool {
        self.x - margin < other.right()
            && self.right() + margin > other.x
            && self.y - margin < other.bottom()
            && self.bottom() + margin > other.y
    }

    pub fn contains(self, pos: GridPos) -> bool {
        pos.x >= self.x && pos.x < self.right() && pos.y >= self.y && pos.y < self.bottom()
    }

    pub fn cells(self) -> impl Iterator<Item = GridPos> {
        (self.y..self.bottom())
            .flat_map(move |y| (self.x..self.right()).map(move |x| GridPos { y, x }))
    }

    /// Cell on the `dir` wall of the room, on the room's centre line.
    pub fn exit_cell(self, dir: Direction) -> GridPos {
        let center = self.center();
        match dir {
            Direction::North => GridPos { y: self.y, x: center.x },
            Direction::South => GridPos { y: self.bottom() - 1, x: center.x },
            Direction::East => GridPos { y: center.y, x: self.right() - 1 },
            Direction::West => GridPos { y: center.y, x: self.x },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomData {
    pub room: Room,
    pub is_start: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub floors: BTreeSet<GridPos>,
    pub corridors: BTreeSet<GridPos>,
    /// Placement order; the start room is always first.
    pub rooms: Vec<Room>,
    pub doors: Vec<DoorPlacement>,
    pub entrance_edges: BTreeSet<EntranceEdge>,
    /// Spacing the layout was generated with.
    pub spacing: i32,
}

impl DungeonLayout {
    pub fn start_room(&self) -> Option<Room> {
        self.rooms.first().copied()
    }

    pub fn room_data(&self) -> impl Iterator<Item = RoomData> + '_ {
        self.rooms.iter().enumerate().map(|(index, &room)| RoomData { room, is_start: index == 0 })
    }

    pub fn is_floor(&self, pos: GridPos) -> bool {
        self.floors.contains(&pos)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.spacing.to_le_bytes());

        bytes.extend((self.floors.len() as u32).to_le_bytes());
        for pos in &self.floors {
            push_pos(&mut bytes, *pos);
        }
        bytes.extend((self.corridors.len() as u32).to_le_bytes());
        for pos in &self.corridors {
            push_pos(&mut bytes, *pos);
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend(room.x.to_le_bytes());
            bytes.extend(room.y.to_le_bytes());
            bytes.extend(room.w.to_le_bytes());
            bytes.extend(room.h.to_le_bytes());
        }

        bytes.extend((self.doors.len() as u32).to_le_bytes());
        for door in &self.doors {
            push_pos(&mut bytes, door.pos);
            bytes.push(door.dir.code());
        }

        bytes.extend((self.entrance_edges.len() as u32).to_le_bytes());
        for edge in &self.entrance_edges {
            push_pos(&mut bytes, edge.pos);
            bytes.push(edge.dir.code());
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// True when every floor cell is 4-connected to the start room.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.start_room() else {
            return self.floors.is_empty();
        };

        let origin = start.center();
        let mut open = VecDeque::from([origin]);
        let mut seen = BTreeSet::from([origin]);
        while let Some(pos) = open.pop_front() {
            for dir in Direction::ALL {
                let next = pos.step(dir);
                if !self.floors.contains(&next) || !seen.insert(next) {
                    continue;
                }
                open.push_back(next);
            }
        }

        seen.len() == self.floors.len()
    }

    /// Inclusive bounds of the floor cells, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<(GridPos, GridPos)> {
        let first = self.floors.first()?;
        let mut min = *first;
        let mut max = *first;
        for pos in &self.floors {
            min.x = min.x.min(pos.x);
            min.y = min.y.min(pos.y);
            max.x = max.x.max(pos.x);
            max.y = max.y.max(pos.y);
        }
        Some((min, max))
    }

    /// Text preview: `.` room floor, `,` corridor, `+` door cell, `S` start
    /// centre, `#` void cells touching floor.
    pub fn to_ascii(&self) -> String {
        let Some((min, max)) = self.bounds() else {
            return String::new();
        };
        let doors: BTreeSet<GridPos> = self.doors.iter().map(|door| door.pos).collect();
        let start_center = self.start_room().map(Room::center);

        let mut out = String::new();
        for y in (min.y - 1)..=(max.y + 1) {
            for x in (min.x - 1)..=(max.x + 1) {
                let pos = GridPos { y, x };
                let glyph = if Some(pos) == start_center {
                    'S'
                } else if doors.contains(&pos) {
                    '+'
                } else if self.corridors.contains(&pos) && !self.in_any_room(pos) {
                    ','
                } else if self.floors.contains(&pos) {
                    '.'
                } else if self.touches_floor(pos) {
                    '#'
                } else {
                    ' '
                };
                out.push(glyph);
            }
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }
        out
    }

    fn in_any_room(&self, pos: GridPos) -> bool {
        self.rooms.iter().any(|room| room.contains(pos))
    }

    fn touches_floor(&self, pos: GridPos) -> bool {
        (-1..=1).any(|dy| {
            (-1..=1).any(|dx| self.floors.contains(&GridPos { y: pos.y + dy, x: pos.x + dx }))
        })
    }
}

fn push_pos(bytes: &mut Vec<u8>, pos: GridPos) {
    bytes.extend(pos.y.to_le_bytes());
    bytes.extend(pos.x.to_le_bytes());
}
