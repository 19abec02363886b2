use std::collections::BTreeSet;

use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::{
    Direction, DungeonLayout, GridPos, LayoutParams, SeededRng, WallGeometry, exposed_sides,
    generate_layout, generate_walls,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    cases: u32,
    #[arg(long, default_value_t = 40)]
    max_rooms: u32,
}

fn unit(rng: &mut ChaCha8Rng) -> f64 {
    f64::from(rng.next_u32()) / f64::from(u32::MAX)
}

fn sample_params(rng: &mut ChaCha8Rng, max_rooms: u32) -> LayoutParams {
    LayoutParams {
        room_count: 1 + rng.next_u32() % max_rooms.max(1),
        density: unit(rng),
        linearity: unit(rng),
        room_size_bias: unit(rng),
        symmetry: rng.next_u32() % 2 == 0,
    }
}

fn check_layout(params: &LayoutParams, layout: &DungeonLayout) -> Result<(), String> {
    let spacing = params.spacing();
    for (index, room) in layout.rooms.iter().enumerate() {
        for other in &layout.rooms[index + 1..] {
            if room.intersects(other, spacing) {
                return Err(format!("rooms within spacing {spacing}: {room:?} / {other:?}"));
            }
        }
    }

    if !layout.is_connected() {
        return Err("floor is not connected to the start room".to_string());
    }

    let unpaired =
        layout.entrance_edges.iter().find(|edge| !layout.entrance_edges.contains(&edge.facing()));
    if let Some(edge) = unpaired {
        return Err(format!("unpaired entrance edge {edge:?}"));
    }

    if let Some(entrance) = layout.doors.first()
        && layout.is_floor(entrance.pos.step(entrance.dir))
    {
        return Err(format!("entrance {entrance:?} opens onto floor"));
    }

    for (index, door) in layout.doors.iter().enumerate() {
        if !layout.corridors.contains(&door.pos) {
            return Err(format!("door off corridor: {door:?}"));
        }
        let beyond = door.pos.step(door.dir);
        if index > 0 && !layout.rooms.iter().any(|room| room.contains(beyond)) {
            return Err(format!("door does not face a room: {door:?}"));
        }
    }

    let walls = generate_walls(&layout.floors, &layout.entrance_edges, &WallGeometry::default());
    let walled: BTreeSet<(GridPos, Direction)> =
        walls.iter().map(|wall| (wall.cell, wall.side)).collect();
    let exposed: BTreeSet<(GridPos, Direction)> =
        exposed_sides(&layout.floors, &layout.entrance_edges).into_iter().collect();
    if walled != exposed || walls.len() != exposed.len() {
        return Err("walls do not close the floor boundary".to_string());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Fuzzing {} layouts from seed {}...", args.cases, args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut failures = Vec::new();
    let mut total_rooms = 0_usize;
    let mut short_layouts = 0_u32;
    let mut max_rooms = 0_usize;

    for case in 0..args.cases {
        let params = sample_params(&mut rng, args.max_rooms);
        let layout_seed = rng.next_u64();
        let layout = generate_layout(&params, &mut SeededRng::new(layout_seed))?;

        total_rooms += layout.rooms.len();
        max_rooms = max_rooms.max(layout.rooms.len());
        if layout.rooms.len() < params.room_count as usize {
            short_layouts += 1;
        }

        if let Err(message) = check_layout(&params, &layout) {
            println!("case {case}: seed={layout_seed} {params:?}: {message}");
            failures.push(case);
        }
    }

    let cases = args.cases.max(1);
    println!("Cases: {}", args.cases);
    println!("Mean rooms: {:.2}", total_rooms as f64 / f64::from(cases));
    println!("Max rooms: {max_rooms}");
    println!("Layouts short of requested rooms: {short_layouts}");

    if !failures.is_empty() {
        bail!("{} of {} layouts violated invariants", failures.len(), args.cases);
    }
    println!("Fuzzing completed successfully.");
    Ok(())
}
