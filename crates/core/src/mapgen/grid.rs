//! Grid-space helpers shared by placement and loop creation.

use crate::types::{Direction, GridPos};

pub(super) fn manhattan(a: GridPos, b: GridPos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// `length` cells starting one step beyond `from`, walking toward `dir`.
pub(super) fn straight_run(from: GridPos, dir: Direction, length: i32) -> Vec<GridPos> {
    (1..=length).map(|distance| from.step_by(dir, distance)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_run_excludes_the_origin_cell() {
        let run = straight_run(GridPos::new(0, 0), Direction::West, 3);
        assert_eq!(run, vec![GridPos::new(-1, 0), GridPos::new(-2, 0), GridPos::new(-3, 0)]);
        assert!(straight_run(GridPos::new(0, 0), Direction::North, 0).is_empty());
    }

    #[test]
    fn manhattan_is_symmetric() {
        let a = GridPos::new(-3, 4);
        let b = GridPos::new(2, -1);
        assert_eq!(manhattan(a, b), 10);
        assert_eq!(manhattan(b, a), 10);
    }
}
