//! Generation parameters and the tuning values derived from them.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

pub const MIN_ROOM_SIZE: i32 = 3;
/// Attempts granted per requested room before the walker loop gives up.
pub const ATTEMPTS_PER_ROOM: u32 = 40;
pub const ENTRANCE_STUB_LENGTH: i32 = 3;
/// Loop creation only runs below this linearity.
pub const LOOP_LINEARITY_CEILING: f64 = 0.9;
pub const LOOP_MIN_ROOMS: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub room_count: u32,
    /// Inverse of inter-room spacing.
    pub density: f64,
    /// Complement of branching: higher means fewer and shorter side paths.
    pub linearity: f64,
    pub room_size_bias: f64,
    pub symmetry: bool,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self { room_count: 10, density: 0.5, linearity: 0.5, room_size_bias: 0.5, symmetry: false }
    }
}

impl LayoutParams {
    /// Builds parameters from the user-facing `branching` knob.
    pub fn from_branching(
        room_count: u32,
        density: f64,
        branching: f64,
        room_size_bias: f64,
        symmetry: bool,
    ) -> Self {
        Self { room_count, density, linearity: 1.0 - branching, room_size_bias, symmetry }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.room_count < 1 {
            return Err(LayoutError::InvalidRoomCount(self.room_count));
        }
        for (name, value) in [
            ("density", self.density),
            ("linearity", self.linearity),
            ("room_size_bias", self.room_size_bias),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LayoutError::RatioOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Minimum number of empty cells between any two rooms.
    pub fn spacing(&self) -> i32 {
        ((4.0 * (1.0 - self.density)).round() as i32).max(0)
    }

    pub fn max_room_size(&self) -> i32 {
        5 + (3.0 * self.room_size_bias).round() as i32
    }

    pub fn corridor_length(&self) -> i32 {
        2 + self.spacing()
    }

    pub fn attempt_budget(&self) -> u32 {
        self.room_count.saturating_mul(ATTEMPTS_PER_ROOM)
    }

    pub fn spine_steps(&self) -> i32 {
        (self.room_count.div_ceil(4) as i32).max(2)
    }

    /// Upper bound (exclusive, before the `1 +`) for a branch's step roll.
    pub fn branch_step_span(&self) -> i32 {
        (self.room_count.div_ceil(5) as i32).max(2)
    }

    pub fn branch_probability(&self, depth: u32) -> f64 {
        (1.0 - self.linearity) * (1.0 - f64::from(depth) * 0.1).max(0.25)
    }

    pub fn turn_probability(&self) -> f64 {
        (1.0 - self.linearity) * 0.4
    }

    pub fn loop_budget(&self, placed_rooms: usize) -> usize {
        ((placed_rooms as f64 * (1.0 - self.linearity) * 0.3).floor() as usize).max(1)
    }

    pub fn runs_loop_pass(&self, placed_rooms: usize) -> bool {
        self.linearity < LOOP_LINEARITY_CEILING && placed_rooms >= LOOP_MIN_ROOMS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_shrinks_as_density_grows() {
        let sparse = LayoutParams { density: 0.0, ..LayoutParams::default() };
        let tight = LayoutParams { density: 1.0, ..LayoutParams::default() };
        let typical = LayoutParams { density: 0.8, ..LayoutParams::default() };
        assert_eq!(sparse.spacing(), 4);
        assert_eq!(tight.spacing(), 0);
        assert_eq!(typical.spacing(), 1);
        assert_eq!(tight.corridor_length(), 2);
    }

    #[test]
    fn room_size_bias_raises_the_maximum_room_size() {
        let small = LayoutParams { room_size_bias: 0.0, ..LayoutParams::default() };
        let large = LayoutParams { room_size_bias: 1.0, ..LayoutParams::default() };
        assert_eq!(small.max_room_size(), 5);
        assert_eq!(large.max_room_size(), 8);
    }

    #[test]
    fn step_budgets_have_floors_of_two() {
        let one = LayoutParams { room_count: 1, ..LayoutParams::default() };
        let many = LayoutParams { room_count: 21, ..LayoutParams::default() };
        assert_eq!(one.spine_steps(), 2);
        assert_eq!(one.branch_step_span(), 2);
        assert_eq!(many.spine_steps(), 6);
        assert_eq!(many.branch_step_span(), 5);
    }

    #[test]
    fn branch_probability_decays_to_a_quarter_of_its_base() {
        let params = LayoutParams { linearity: 0.2, ..LayoutParams::default() };
        assert!((params.branch_probability(0) - 0.8).abs() < 1e-12);
        assert!((params.branch_probability(3) - 0.8 * 0.7).abs() < 1e-12);
        assert!((params.branch_probability(20) - 0.8 * 0.25).abs() < 1e-12);
    }

    #[test]
    fn loop_pass_gate_and_budget() {
        let params = LayoutParams { linearity: 0.5, ..LayoutParams::default() };
        assert!(!params.runs_loop_pass(3));
        assert!(params.runs_loop_pass(4));
        assert_eq!(params.loop_budget(4), 1);
        assert_eq!(params.loop_budget(20), 3);

        let linear = LayoutParams { linearity: 0.9, ..LayoutParams::default() };
        assert!(!linear.runs_loop_pass(40));
    }

    #[test]
    fn validation_rejects_bad_inputs() {
        let zero_rooms = LayoutParams { room_count: 0, ..LayoutParams::default() };
        assert_eq!(zero_rooms.validate(), Err(LayoutError::InvalidRoomCount(0)));

        let dense = LayoutParams { density: 1.5, ..LayoutParams::default() };
        assert!(matches!(
            dense.validate(),
            Err(LayoutError::RatioOutOfRange { name: "density", .. })
        ));

        let nan = LayoutParams { room_size_bias: f64::NAN, ..LayoutParams::default() };
        assert!(nan.validate().is_err());

        assert_eq!(LayoutParams::default().validate(), Ok(()));
    }

    #[test]
    fn branching_is_the_complement_of_linearity() {
        let params = LayoutParams::from_branching(8, 0.5, 0.3, 0.5, true);
        assert!((params.linearity - 0.7).abs() < 1e-12);
        assert!(params.symmetry);
    }

    #[test]
    fn missing_config_fields_fall_back_to_defaults() {
        let params: LayoutParams =
            serde_json::from_str(r#"{"room_count": 4, "symmetry": true}"#).expect("parse");
        assert_eq!(params.room_count, 4);
        assert!(params.symmetry);
        assert_eq!(params.density, LayoutParams::default().density);
    }
}
