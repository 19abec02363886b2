//! Room placement, corridor laying, and junction bookkeeping for the walker
//! loop and the loop-creation pass.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Direction, DoorPlacement, EntranceEdge, GridPos};

use super::grid::straight_run;
use super::model::{DungeonLayout, Room};
use super::params::{ENTRANCE_STUB_LENGTH, LayoutParams, MIN_ROOM_SIZE};
use super::seed::UnitRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum PlacementFailure {
    /// The candidate comes within `spacing` of an existing room.
    RoomCollision { room: usize },
    /// The candidate crowds the entrance stub.
    EntranceReserved,
}

/// Owns everything laid down during generation. Rooms are referenced by their
/// index in placement order.
pub(super) struct LayoutBuilder {
    spacing: i32,
    corridor_length: i32,
    max_room_size: i32,
    rooms: Vec<Room>,
    floors: BTreeSet<GridPos>,
    corridors: BTreeSet<GridPos>,
    doors: Vec<DoorPlacement>,
    entrance_edges: BTreeSet<EntranceEdge>,
    adjacency: BTreeMap<usize, BTreeSet<usize>>,
    entrance_stub: Option<Room>,
}

impl LayoutBuilder {
    pub(super) fn new(params: &LayoutParams) -> Self {
        Self {
            spacing: params.spacing(),
            corridor_length: params.corridor_length(),
            max_room_size: params.max_room_size(),
            rooms: Vec::new(),
            floors: BTreeSet::new(),
            corridors: BTreeSet::new(),
            doors: Vec::new(),
            entrance_edges: BTreeSet::new(),
            adjacency: BTreeMap::new(),
            entrance_stub: None,
        }
    }

    #[cfg(test)]
    pub(super) fn with_rooms(params: &LayoutParams, rooms: &[Room]) -> Self {
        let mut builder = Self::new(params);
        for &room in rooms {
            builder.register_room(room);
        }
        builder
    }

    pub(super) fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub(super) fn room_count(&self) -> usize {
        self.rooms.len()
    }

    #[cfg(test)]
    pub(super) fn doors(&self) -> &[DoorPlacement] {
        &self.doors
    }

    pub(super) fn spacing(&self) -> i32 {
        self.spacing
    }

    /// The entrance stub grown by one cell. Nothing else may be laid here, so
    /// the dungeon entrance always opens onto void.
    pub(super) fn entrance_reserve(&self) -> Option<Room> {
        self.entrance_stub
            .map(|stub| Room { x: stub.x - 1, y: stub.y - 1, w: stub.w + 2, h: stub.h + 2 })
    }

    pub(super) fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(&a).is_some_and(|neighbours| neighbours.contains(&b))
    }

    /// Places the start room around the origin and its entrance stub, and
    /// returns the spine direction.
    pub(super) fn place_start_room(&mut self, rng: &mut impl UnitRng) -> Direction {
        let (w, h) = self.roll_room_size(rng);
        let start = Room { x: -(w / 2), y: -(h / 2), w, h };
        self.register_room(start);

        let spine = rng.pick(&Direction::ALL);
        let entrance = spine.opposite();
        let exit = start.exit_cell(entrance);
        let stub = straight_run(exit, entrance, ENTRANCE_STUB_LENGTH);
        let outer = stub[stub.len() - 1];

        self.lay_corridor(&stub);
        self.mark_junction(exit, entrance);
        self.mark_junction(outer, entrance);
        self.doors.push(DoorPlacement { pos: outer, dir: entrance });
        self.entrance_stub = Some(bounding_room(&stub));

        spine
    }

    /// One walker step: rolls a room beyond `from` toward `dir`, and on
    /// success lays it and the corridor joining the two.
    pub(super) fn place_next_room(
        &mut self,
        from: usize,
        dir: Direction,
        rng: &mut impl UnitRng,
    ) -> Result<usize, PlacementFailure> {
        let candidate = self.plan_room(from, dir, rng);
        self.check_clearance(&candidate)?;
        self.check_corridor(from, dir)?;
        Ok(self.commit_room(from, dir, candidate))
    }

    /// Places two rooms on opposite sides of `from`, or neither.
    pub(super) fn place_mirrored_pair(
        &mut self,
        from: usize,
        dir: Direction,
        rng: &mut impl UnitRng,
    ) -> Result<[usize; 2], PlacementFailure> {
        let mirrored = dir.opposite();
        let first = self.plan_room(from, dir, rng);
        let second = self.plan_room(from, mirrored, rng);
        self.check_clearance(&first)?;
        self.check_clearance(&second)?;
        self.check_corridor(from, dir)?;
        self.check_corridor(from, mirrored)?;
        if first.intersects(&second, self.spacing) {
            return Err(PlacementFailure::RoomCollision { room: from });
        }

        let first_index = self.commit_room(from, dir, first);
        let second_index = self.commit_room(from, mirrored, second);
        Ok([first_index, second_index])
    }

    /// Lays `corridor` (walking toward `dir`) between two rooms: suppresses the
    /// walls at both junctions, puts a door on the last corridor cell facing
    /// `to`, and records the adjacency.
    pub(super) fn lay_link(
        &mut self,
        from: usize,
        to: usize,
        corridor: &[GridPos],
        dir: Direction,
    ) {
        let (Some(&first), Some(&last)) = (corridor.first(), corridor.last()) else {
            return;
        };
        self.lay_corridor(corridor);
        self.mark_junction(first.step(dir.opposite()), dir);
        self.mark_junction(last, dir);
        self.doors.push(DoorPlacement { pos: last, dir });
        self.connect(from, to);
    }

    pub(super) fn into_layout(self) -> DungeonLayout {
        DungeonLayout {
            floors: self.floors,
            corridors: self.corridors,
            rooms: self.rooms,
            doors: self.doors,
            entrance_edges: self.entrance_edges,
            spacing: self.spacing,
        }
    }

    fn roll_room_size(&self, rng: &mut impl UnitRng) -> (i32, i32) {
        let w = rng.range_inclusive(MIN_ROOM_SIZE, self.max_room_size);
        let h = rng.range_inclusive(MIN_ROOM_SIZE, self.max_room_size);
        (w, h)
    }

    fn plan_room(&self, from: usize, dir: Direction, rng: &mut impl UnitRng) -> Room {
        let (w, h) = self.roll_room_size(rng);
        let anchor = self.rooms[from];
        let center = anchor.center();
        let gap = self.corridor_length;
        match dir {
            Direction::East => Room { x: anchor.right() + gap, y: center.y - h / 2, w, h },
            Direction::West => Room { x: anchor.left() - gap - w, y: center.y - h / 2, w, h },
            Direction::South => Room { x: center.x - w / 2, y: anchor.bottom() + gap, w, h },
            Direction::North => Room { x: center.x - w / 2, y: anchor.top() - gap - h, w, h },
        }
    }

    fn check_clearance(&self, candidate: &Room) -> Result<(), PlacementFailure> {
        let collision =
            self.rooms.iter().position(|room| candidate.intersects(room, self.spacing));
        if let Some(room) = collision {
            return Err(PlacementFailure::RoomCollision { room });
        }
        // At least one empty cell past the stub, even when rooms may touch.
        let stub_margin = self.spacing.max(1);
        if self.entrance_stub.is_some_and(|stub| candidate.intersects(&stub, stub_margin)) {
            return Err(PlacementFailure::EntranceReserved);
        }
        Ok(())
    }

    fn check_corridor(&self, from: usize, dir: Direction) -> Result<(), PlacementFailure> {
        let corridor = straight_run(self.rooms[from].exit_cell(dir), dir, self.corridor_length);
        let reserved = self.entrance_reserve();
        if reserved.is_some_and(|reserve| corridor.iter().any(|cell| reserve.contains(*cell))) {
            return Err(PlacementFailure::EntranceReserved);
        }
        Ok(())
    }

    fn commit_room(&mut self, from: usize, dir: Direction, room: Room) -> usize {
        let exit = self.rooms[from].exit_cell(dir);
        let index = self.register_room(room);
        let corridor = straight_run(exit, dir, self.corridor_length);
        self.lay_link(from, index, &corridor, dir);
        index
    }

    fn register_room(&mut self, room: Room) -> usize {
        self.floors.extend(room.cells());
        self.rooms.push(room);
        self.rooms.len() - 1
    }

    fn lay_corridor(&mut self, cells: &[GridPos]) {
        self.floors.extend(cells.iter().copied());
        self.corridors.extend(cells.iter().copied());
    }

    /// Suppresses the wall on `dir` side of `cell` and its facing twin.
    fn mark_junction(&mut self, cell: GridPos, dir: Direction) {
        let edge = EntranceEdge { pos: cell, dir };
        self.entrance_edges.insert(edge);
        self.entrance_edges.insert(edge.facing());
    }

    fn connect(&mut self, a: usize, b: usize) {
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
    }
}

fn bounding_room(cells: &[GridPos]) -> Room {
    let min_x = cells.iter().map(|cell| cell.x).min().unwrap_or(0);
    let max_x = cells.iter().map(|cell| cell.x).max().unwrap_or(0);
    let min_y = cells.iter().map(|cell| cell.y).min().unwrap_or(0);
    let max_y = cells.iter().map(|cell| cell.y).max().unwrap_or(0);
    Room { x: min_x, y: min_y, w: max_x - min_x + 1, h: max_y - min_y + 1 }
}
