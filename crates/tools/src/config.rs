//! Optional TOML run configuration for `dungeon-gen`.
//!
//! ```toml
//! seed = "crypt-7"
//!
//! [layout]
//! room_count = 16
//! density = 0.7
//! branching = 0.6
//! symmetry = true
//!
//! [walls]
//! cell_size = 100.0
//! thickness = 10.0
//! use_texture = false
//! wall_color = "#3a3a3a"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dungeon_core::{LayoutParams, WallGeometry, WallStyle};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub seed: Option<String>,
    pub layout: LayoutSection,
    pub walls: WallsSection,
}

/// Every field is optional so a file can pin only the knobs it cares about.
/// `branching` is accepted as the complement of `linearity`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSection {
    pub room_count: Option<u32>,
    pub density: Option<f64>,
    pub linearity: Option<f64>,
    pub branching: Option<f64>,
    pub room_size_bias: Option<f64>,
    pub symmetry: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WallsSection {
    #[serde(flatten)]
    pub geometry: WallGeometry,
    #[serde(flatten)]
    pub style: WallStyle,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.walls.geometry.validate().context("Invalid [walls] geometry")?;
        Ok(config)
    }
}

impl LayoutSection {
    /// Layers `overrides` over `self`; set fields in `overrides` win.
    pub fn merged_with(&self, overrides: &Self) -> Self {
        // A linearity/branching override replaces either form from the file.
        let ratio_overridden = overrides.linearity.is_some() || overrides.branching.is_some();
        Self {
            room_count: overrides.room_count.or(self.room_count),
            density: overrides.density.or(self.density),
            linearity: if ratio_overridden { overrides.linearity } else { self.linearity },
            branching: if ratio_overridden { overrides.branching } else { self.branching },
            room_size_bias: overrides.room_size_bias.or(self.room_size_bias),
            symmetry: overrides.symmetry.or(self.symmetry),
        }
    }

    pub fn to_params(&self) -> Result<LayoutParams> {
        let defaults = LayoutParams::default();
        let room_count = self.room_count.unwrap_or(defaults.room_count);
        let density = self.density.unwrap_or(defaults.density);
        let room_size_bias = self.room_size_bias.unwrap_or(defaults.room_size_bias);
        let symmetry = self.symmetry.unwrap_or(defaults.symmetry);
        let params = match (self.linearity, self.branching) {
            (Some(_), Some(_)) => bail!("`linearity` and `branching` are mutually exclusive"),
            (None, Some(branching)) => LayoutParams::from_branching(
                room_count,
                density,
                branching,
                room_size_bias,
                symmetry,
            ),
            (linearity, None) => LayoutParams {
                room_count,
                density,
                linearity: linearity.unwrap_or(defaults.linearity),
                room_size_bias,
                symmetry,
            },
        };
        params.validate().context("Invalid layout parameters")?;
        Ok(params)
    }
}
