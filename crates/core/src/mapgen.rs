//! Procedural dungeon layout generation split into coherent submodules.

pub mod model;
pub mod params;
pub mod seed;

mod generator;
mod grid;
mod layout;

pub use generator::LayoutGenerator;
pub use model::{DungeonLayout, Room, RoomData};
pub use params::{LayoutParams, MIN_ROOM_SIZE};
pub use seed::{SeededRng, UnitRng, fold_seed};

use crate::error::LayoutError;

/// Validates `params` and generates a layout from `rng`.
///
/// Generation never fails once the parameters are valid; it may place fewer
/// rooms than requested when the attempt budget runs out.
pub fn generate_layout(
    params: &LayoutParams,
    rng: &mut impl UnitRng,
) -> Result<DungeonLayout, LayoutError> {
    Ok(LayoutGenerator::new(params.clone())?.generate(rng))
}
