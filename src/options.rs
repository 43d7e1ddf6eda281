use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::recommend::mode::ShowModes;
use crate::recommend::score::Compliance;
use crate::recommend::search::{
    DARK_BACKGROUND_LIGHTNESS, DEFAULT_CONTRAST_FLOOR, DEFAULT_SATURATION_STEPS,
    LIGHT_BACKGROUND_LIGHTNESS,
};

/// Saturation used for forced-compliance candidates when none is configured.
pub const DEFAULT_FORCE_SATURATION: f32 = 60.0;

/// Engine configuration, deserializable from a JSON "choices" document.
///
/// Every field is optional; missing fields take the defaults exposed by the
/// accessor methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// `[light background sequence, dark background sequence]`.
    pub lightness_steps: Option<(Vec<f32>, Vec<f32>)>,
    pub saturation_steps: Option<Vec<f32>>,
    pub force_compliance: Option<Compliance>,
    pub force_saturation: Option<f32>,
    pub links_underlined: bool,
    pub show: ShowModes,
    /// Minimum background contrast a grid candidate must exceed.
    pub contrast_floor: Option<f32>,
    /// Seed the grid search with the forced AAA and AA candidates.
    pub compliance_anchors: bool,
}

impl Options {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read options from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }

    pub fn lightness_steps_for(&self, dark_background: bool) -> &[f32] {
        match (&self.lightness_steps, dark_background) {
            (Some((_, dark)), true) => dark.as_slice(),
            (Some((light, _)), false) => light.as_slice(),
            (None, true) => &DARK_BACKGROUND_LIGHTNESS[..],
            (None, false) => &LIGHT_BACKGROUND_LIGHTNESS[..],
        }
    }

    pub fn saturation_steps(&self) -> &[f32] {
        self.saturation_steps
            .as_deref()
            .unwrap_or(&DEFAULT_SATURATION_STEPS)
    }

    pub fn force_saturation(&self) -> f32 {
        self.force_saturation.unwrap_or(DEFAULT_FORCE_SATURATION)
    }

    pub fn contrast_floor(&self) -> f32 {
        self.contrast_floor.unwrap_or(DEFAULT_CONTRAST_FLOOR)
    }
}
