//! Extra corridors between nearby rooms that the walker tree left unconnected.

use log::{debug, trace};

use crate::types::{Direction, GridPos};

use super::super::grid::{manhattan, straight_run};
use super::super::layout::LayoutBuilder;
use super::super::model::Room;
use super::super::params::LayoutParams;

#[derive(Clone, Debug, PartialEq, Eq)]
struct LoopLink {
    from: usize,
    to: usize,
    dir: Direction,
    corridor: Vec<GridPos>,
}

/// Returns the number of corridors added.
pub(super) fn create_loops(builder: &mut LayoutBuilder, params: &LayoutParams) -> usize {
    let rooms = builder.rooms().to_vec();
    let budget = params.loop_budget(rooms.len());
    let candidates = loop_candidates(builder, &rooms);
    let reserve = builder.entrance_reserve();

    let mut created = 0;
    for (distance, a, b) in candidates {
        if created >= budget {
            break;
        }
        match plan_link(&rooms, reserve, a, b) {
            Some(link) => {
                builder.lay_link(link.from, link.to, &link.corridor, link.dir);
                created += 1;
                let cells = link.corridor.len();
                debug!("loop corridor {a}<->{b} (distance {distance}, {cells} cells)");
            }
            None => trace!("loop candidate {a}<->{b} rejected"),
        }
    }
    created
}

/// Unconnected pairs that are close but not overlapping, nearest first.
fn loop_candidates(builder: &LayoutBuilder, rooms: &[Room]) -> Vec<(u32, usize, usize)> {
    let spacing = builder.spacing();
    let mut candidates = Vec::new();
    for a in 0..rooms.len() {
        for b in (a + 1)..rooms.len() {
            if builder.are_adjacent(a, b) {
                continue;
            }
            let max_dim = rooms[a].w.max(rooms[a].h).max(rooms[b].w).max(rooms[b].h);
            let distance = manhattan(rooms[a].center(), rooms[b].center());
            let near_limit = (5 * max_dim + 4 * spacing) as u32;
            if distance > max_dim as u32 && distance < near_limit {
                candidates.push((distance, a, b));
            }
        }
    }
    candidates.sort();
    candidates
}

/// Straight corridor between the facing walls of `a` and `b`, or `None` when
/// the rooms share no lane, touch, or the lane crosses another room or the
/// `reserve` around the entrance.
fn plan_link(rooms: &[Room], reserve: Option<Room>, a: usize, b: usize) -> Option<LoopLink> {
    let (center_a, center_b) = (rooms[a].center(), rooms[b].center());
    let dx = center_b.x - center_a.x;
    let dy = center_b.y - center_a.y;
    let horizontal = dx.abs() >= dy.abs();
    let forward = if horizontal { dx >= 0 } else { dy >= 0 };
    let (from, to) = if forward { (a, b) } else { (b, a) };
    let (near, far) = (rooms[from], rooms[to]);

    let (dir, start, gap) = if horizontal {
        let row = lane_middle(near.top(), near.bottom(), far.top(), far.bottom())?;
        (Direction::East, GridPos { y: row, x: near.right() - 1 }, far.left() - near.right())
    } else {
        let column = lane_middle(near.left(), near.right(), far.left(), far.right())?;
        (Direction::South, GridPos { y: near.bottom() - 1, x: column }, far.top() - near.bottom())
    };
    if gap < 1 {
        return None;
    }

    let corridor = straight_run(start, dir, gap);
    let obstructed = corridor.iter().any(|cell| {
        rooms
            .iter()
            .enumerate()
            .any(|(index, room)| index != from && index != to && room.contains(*cell))
    });
    let crowds_entrance =
        reserve.is_some_and(|area| corridor.iter().any(|cell| area.contains(*cell)));
    if obstructed || crowds_entrance {
        return None;
    }

    Some(LoopLink { from, to, dir, corridor })
}

/// Middle of the shared span `[max(lo), min(hi))`, if the spans overlap.
fn lane_middle(lo_a: i32, hi_a: i32, lo_b: i32, hi_b: i32) -> Option<i32> {
    let lo = lo_a.max(lo_b);
    let hi = hi_a.min(hi_b);
    (lo < hi).then(|| lo + (hi - lo - 1) / 2)
}
