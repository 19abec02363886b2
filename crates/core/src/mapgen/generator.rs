//! Spine-walker orchestration: the start room, the round-robin walker loop,
//! and the loop-creation pass.

use log::{debug, info, trace};

use crate::error::LayoutError;
use crate::types::Direction;

use super::layout::LayoutBuilder;
use super::model::DungeonLayout;
use super::params::LayoutParams;
use super::seed::UnitRng;

mod loops;

/// Consecutive failures after which a walker turns aside.
const REDIRECT_AFTER_FAILURES: u8 = 3;
const KILL_AFTER_FAILURES: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Walker {
    current_room: usize,
    direction: Direction,
    remaining_steps: i32,
    depth: u32,
    consecutive_failures: u8,
    alive: bool,
}

impl Walker {
    fn new(current_room: usize, direction: Direction, remaining_steps: i32, depth: u32) -> Self {
        Self {
            current_room,
            direction,
            remaining_steps,
            depth,
            consecutive_failures: 0,
            alive: true,
        }
    }
}

pub struct LayoutGenerator {
    params: LayoutParams,
}

impl LayoutGenerator {
    pub fn new(params: LayoutParams) -> Result<Self, LayoutError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn generate(&self, rng: &mut impl UnitRng) -> DungeonLayout {
        let mut builder = self.grow_tree(rng);

        let mut loops_added = 0;
        if self.params.runs_loop_pass(builder.room_count()) {
            loops_added = loops::create_loops(&mut builder, &self.params);
        }

        let layout = builder.into_layout();
        info!(
            "generated layout: {}/{} rooms, {} loops, {} doors, {} floor cells",
            layout.rooms.len(),
            self.params.room_count,
            loops_added,
            layout.doors.len(),
            layout.floors.len()
        );
        layout
    }

    /// Start room plus the walker loop; produces a tree of rooms.
    fn grow_tree(&self, rng: &mut impl UnitRng) -> LayoutBuilder {
        let mut builder = LayoutBuilder::new(&self.params);
        let spine = builder.place_start_room(rng);

        let target_rooms = self.params.room_count as usize;
        let attempt_budget = self.params.attempt_budget();
        let mut walkers = vec![Walker::new(0, spine, self.params.spine_steps(), 0)];
        let mut cursor = 0_usize;
        let mut attempts = 0_u32;

        while builder.room_count() < target_rooms && attempts < attempt_budget {
            let Some(index) = next_live_walker(&walkers, cursor) else {
                break;
            };
            cursor = index + 1;
            attempts += 1;
            self.step_walker(&mut builder, &mut walkers, index, rng);
        }

        if builder.room_count() < target_rooms {
            debug!(
                "placement stopped at {}/{} rooms after {attempts} attempts",
                builder.room_count(),
                target_rooms
            );
        }
        builder
    }

    /// Advances walker `index` by one placement attempt.
    fn step_walker(
        &self,
        builder: &mut LayoutBuilder,
        walkers: &mut Vec<Walker>,
        index: usize,
        rng: &mut impl UnitRng,
    ) {
        let walker = walkers[index];
        if walker.remaining_steps <= 0 {
            walkers[index].alive = false;
            debug!("walker {index} exhausted its steps at depth {}", walker.depth);
            return;
        }

        match builder.place_next_room(walker.current_room, walker.direction, rng) {
            Ok(room) => {
                let stepped = &mut walkers[index];
                stepped.current_room = room;
                stepped.remaining_steps -= 1;
                stepped.consecutive_failures = 0;
                let stepped = *stepped;

                self.spawn_branch(builder, walkers, stepped, rng);
                self.maybe_turn(&mut walkers[index], rng);
            }
            Err(failure) => {
                trace!("walker {index} failed to place toward {:?}: {failure:?}", walker.direction);
                let failed = &mut walkers[index];
                failed.consecutive_failures += 1;
                if failed.consecutive_failures >= KILL_AFTER_FAILURES {
                    failed.alive = false;
                    debug!("walker {index} died after repeated placement failures");
                } else if failed.consecutive_failures == REDIRECT_AFTER_FAILURES {
                    failed.direction = rng.pick(&failed.direction.perpendiculars());
                }
            }
        }
    }

    fn spawn_branch(
        &self,
        builder: &mut LayoutBuilder,
        walkers: &mut Vec<Walker>,
        parent: Walker,
        rng: &mut impl UnitRng,
    ) {
        if !rng.chance(self.params.branch_probability(parent.depth)) {
            return;
        }

        let direction = rng.pick(&parent.direction.perpendiculars());
        let span = f64::from(self.params.branch_step_span());
        let steps = 1 + (rng.next_unit() * span).floor() as i32;
        let depth = parent.depth + 1;
        let room_budget = self.params.room_count as usize;

        if self.params.symmetry && builder.room_count() + 2 <= room_budget {
            match builder.place_mirrored_pair(parent.current_room, direction, rng) {
                Ok([first, second]) => {
                    walkers.push(Walker::new(first, direction, steps - 1, depth));
                    walkers.push(Walker::new(second, direction.opposite(), steps - 1, depth));
                    debug!("mirrored branch pair spawned at depth {depth} with {steps} steps");
                }
                Err(failure) => {
                    debug!(
                        "mirrored branch from room {} abandoned: {failure:?}",
                        parent.current_room
                    );
                }
            }
            return;
        }

        walkers.push(Walker::new(parent.current_room, direction, steps, depth));
        debug!("branch spawned toward {direction:?} at depth {depth} with {steps} steps");
    }

    fn maybe_turn(&self, walker: &mut Walker, rng: &mut impl UnitRng) {
        if walker.depth == 0 || walker.remaining_steps <= 0 {
            return;
        }
        if rng.chance(self.params.turn_probability()) {
            walker.direction = rng.pick(&walker.direction.perpendiculars());
        }
    }
}

fn next_live_walker(walkers: &[Walker], cursor: usize) -> Option<usize> {
    let count = walkers.len();
    (0..count).map(|offset| (cursor + offset) % count).find(|&index| walkers[index].alive)
}
