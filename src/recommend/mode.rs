use serde::{Deserialize, Serialize};

use crate::color::{normalize_hue, Color};
use crate::recommend::search::RecommendationSet;

/// How the stored link color relates to the recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Always the top recommendation.
    Auto,
    /// Any member of the recommendation set.
    Recommended,
    /// Anything the author picked.
    Custom,
}

impl SelectionMode {
    pub const ALL: [SelectionMode; 3] = [
        SelectionMode::Auto,
        SelectionMode::Recommended,
        SelectionMode::Custom,
    ];
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SelectionMode::Auto => "auto",
            SelectionMode::Recommended => "recommended",
            SelectionMode::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// The `show` configuration map. A mode is shown unless explicitly `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowModes {
    pub auto: Option<bool>,
    pub recommended: Option<bool>,
    pub custom: Option<bool>,
}

impl ShowModes {
    pub fn shows(&self, mode: SelectionMode) -> bool {
        let flag = match mode {
            SelectionMode::Auto => self.auto,
            SelectionMode::Recommended => self.recommended,
            SelectionMode::Custom => self.custom,
        };
        flag != Some(false)
    }
}

/// Modes the host lets the author use, in `Auto, Recommended, Custom` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableModes {
    modes: Vec<SelectionMode>,
}

impl AvailableModes {
    pub fn all() -> Self {
        Self {
            modes: SelectionMode::ALL.to_vec(),
        }
    }

    pub fn contains(&self, mode: SelectionMode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn first(&self) -> Option<SelectionMode> {
        self.modes.first().copied()
    }

    pub fn as_slice(&self) -> &[SelectionMode] {
        &self.modes
    }
}

impl From<&ShowModes> for AvailableModes {
    fn from(show: &ShowModes) -> Self {
        Self {
            modes: SelectionMode::ALL
                .into_iter()
                .filter(|mode| show.shows(*mode))
                .collect(),
        }
    }
}

/// Infer the mode a stored `value` is in.
///
/// A single available mode wins outright. Otherwise the value is `Auto` when it
/// equals the auto color, `Recommended` when it is in the set, and `Custom`
/// when neither; each only if available, falling back to the first available
/// mode. With nothing available the widget's default, `Auto`, is reported.
pub fn resolve_mode(
    value: &Color,
    auto_color: &Color,
    recommendations: &RecommendationSet,
    available: &AvailableModes,
) -> SelectionMode {
    match available.as_slice() {
        [] => SelectionMode::Auto,
        [only] => *only,
        _ => {
            if available.contains(SelectionMode::Auto) && value == auto_color {
                SelectionMode::Auto
            } else if available.contains(SelectionMode::Recommended)
                && recommendations.contains(value)
            {
                SelectionMode::Recommended
            } else if available.contains(SelectionMode::Custom) {
                SelectionMode::Custom
            } else {
                available.first().unwrap_or(SelectionMode::Auto)
            }
        }
    }
}

/// Result of [`ModeController::set_hue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HueChange {
    pub hue: u16,
    pub previous: Option<u16>,
}

impl HueChange {
    pub fn changed(&self) -> bool {
        self.previous != Some(self.hue)
    }
}

/// Tracks the forced hue and an optional forced mode.
///
/// Never touches background or text colors; callers use the returned
/// [`HueChange`] to decide whether cached recommendations are stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeController {
    hue: Option<u16>,
    forced_mode: Option<SelectionMode>,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hue(&self) -> Option<u16> {
        self.hue
    }

    pub fn set_hue(&mut self, hue: f32) -> HueChange {
        let hue = normalize_hue(hue);
        let previous = self.hue.replace(hue);
        HueChange { hue, previous }
    }

    pub fn forced_mode(&self) -> Option<SelectionMode> {
        self.forced_mode
    }

    pub fn force_mode(&mut self, mode: Option<SelectionMode>) {
        self.forced_mode = mode;
    }

    /// The forced mode when it is available, else [`resolve_mode`].
    pub fn resolve(
        &self,
        value: &Color,
        auto_color: &Color,
        recommendations: &RecommendationSet,
        available: &AvailableModes,
    ) -> SelectionMode {
        match self.forced_mode {
            Some(mode) if available.contains(mode) => mode,
            _ => resolve_mode(value, auto_color, recommendations, available),
        }
    }
}
