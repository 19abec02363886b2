use std::collections::{BTreeSet, VecDeque};

use dungeon_core::{DungeonLayout, GridPos, LayoutError, LayoutParams, SeededRng, generate_layout};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

fn reachable_from_start(layout: &DungeonLayout) -> BTreeSet<GridPos> {
    let Some(start) = layout.start_room() else {
        return BTreeSet::new();
    };
    let mut open: VecDeque<GridPos> = start.cells().collect();
    let mut seen: BTreeSet<GridPos> = start.cells().collect();
    while let Some(pos) = open.pop_front() {
        for next in [
            GridPos { y: pos.y - 1, x: pos.x },
            GridPos { y: pos.y, x: pos.x + 1 },
            GridPos { y: pos.y + 1, x: pos.x },
            GridPos { y: pos.y, x: pos.x - 1 },
        ] {
            if layout.floors.contains(&next) && seen.insert(next) {
                open.push_back(next);
            }
        }
    }
    seen
}

fn check_invariants(params: &LayoutParams, layout: &DungeonLayout) -> Result<(), String> {
    let spacing = params.spacing();
    if layout.spacing != spacing {
        return Err(format!("layout spacing {} != {spacing}", layout.spacing));
    }

    for (index, room) in layout.rooms.iter().enumerate() {
        for other in &layout.rooms[index + 1..] {
            if room.intersects(other, 0) {
                return Err(format!("rooms overlap: {room:?} vs {other:?}"));
            }
            if room.intersects(other, spacing) {
                return Err(format!("rooms closer than {spacing}: {room:?} vs {other:?}"));
            }
        }
    }

    let reachable = reachable_from_start(layout);
    for room in &layout.rooms {
        if room.cells().any(|cell| !reachable.contains(&cell)) {
            return Err(format!("room {room:?} is not reachable from the start room"));
        }
    }

    for edge in &layout.entrance_edges {
        if !layout.entrance_edges.contains(&edge.facing()) {
            return Err(format!("entrance edge {edge:?} has no facing twin"));
        }
    }

    if let Some(entrance) = layout.doors.first()
        && layout.is_floor(entrance.pos.step(entrance.dir))
    {
        return Err(format!("entrance {entrance:?} opens onto floor"));
    }

    if !layout.corridors.is_subset(&layout.floors) {
        return Err("corridor cells must also be floor cells".to_string());
    }

    let room_data: Vec<_> = layout.room_data().collect();
    if room_data.iter().filter(|data| data.is_start).count() != 1 {
        return Err("exactly one room must be flagged as the start room".to_string());
    }

    Ok(())
}

#[test]
fn test_minimal_layout_is_start_room_plus_entrance_stub() {
    let params = LayoutParams {
        room_count: 1,
        density: 0.8,
        linearity: 0.5,
        room_size_bias: 0.5,
        symmetry: false,
    };
    let layout = generate_layout(&params, &mut SeededRng::from_text("abc")).expect("valid params");

    assert_eq!(layout.rooms.len(), 1);
    assert_eq!(layout.doors.len(), 1);
    assert_eq!(layout.corridors.len(), 3);
    let start = layout.start_room().expect("start room");
    assert_eq!(layout.floors.len(), (start.w * start.h) as usize + 3);
    assert!(check_invariants(&params, &layout).is_ok());
}

#[test]
fn test_requested_room_count_is_an_upper_bound() {
    for seed in ["cramped-1", "cramped-2", "cramped-3"] {
        let params = LayoutParams {
            room_count: 40,
            density: 0.0,
            linearity: 1.0,
            room_size_bias: 1.0,
            symmetry: false,
        };
        let layout =
            generate_layout(&params, &mut SeededRng::from_text(seed)).expect("valid params");
        assert!(!layout.rooms.is_empty());
        assert!(layout.rooms.len() <= 40);
        assert_eq!(check_invariants(&params, &layout), Ok(()));
    }
}

#[test]
fn test_symmetric_branchy_layouts_keep_invariants() {
    let params = LayoutParams {
        room_count: 24,
        density: 0.9,
        linearity: 0.0,
        room_size_bias: 0.2,
        symmetry: true,
    };
    for seed in 0..20_u64 {
        let layout = generate_layout(&params, &mut SeededRng::new(seed)).expect("valid params");
        assert_eq!(check_invariants(&params, &layout), Ok(()), "seed={seed}");
    }
}

#[test]
fn test_invalid_parameters_are_rejected_eagerly() {
    let zero = LayoutParams { room_count: 0, ..LayoutParams::default() };
    assert_eq!(
        generate_layout(&zero, &mut SeededRng::new(1)),
        Err(LayoutError::InvalidRoomCount(0))
    );

    let negative = LayoutParams { density: -0.5, ..LayoutParams::default() };
    let err = generate_layout(&negative, &mut SeededRng::new(1)).expect_err("density < 0");
    assert!(err.to_string().contains("density"), "error should name the field: {err}");
}

#[test]
fn test_fuzz_layout_invariants() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(200));
    let inputs = (
        any::<u64>(),
        1_u32..40,
        (0.0_f64..=1.0, 0.0_f64..=1.0, 0.0_f64..=1.0),
        any::<bool>(),
    );

    runner
        .run(&inputs, |(seed, room_count, (density, linearity, room_size_bias), symmetry)| {
            let params = LayoutParams { room_count, density, linearity, room_size_bias, symmetry };
            let layout = generate_layout(&params, &mut SeededRng::new(seed))
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            check_invariants(&params, &layout)
                .map_err(|message| TestCaseError::fail(format!("seed={seed}: {message}")))?;
            Ok(())
        })
        .expect("generated layouts should preserve their invariants");
}
