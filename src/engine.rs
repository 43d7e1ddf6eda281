use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::color::Color;
use crate::options::Options;
use crate::recommend::cache::{CacheKey, RecommendationCache};
use crate::recommend::mode::{AvailableModes, ModeController, SelectionMode};
use crate::recommend::search::{search, RecommendationSet};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("background color is unknown")]
    UnknownBackground,
    #[error("text color is unknown")]
    UnknownText,
    #[error("no hue has been picked and there is no stored value to take one from")]
    UnknownHue,
}

/// Input to [`LinkColorEngine::compute_auto_color`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HuePick {
    /// Keep the current hue.
    Unchanged,
    /// A raw hue from the picker, in degrees.
    Hue(f32),
    /// A full color; only its hue is used.
    Value(Color),
}

/// Outcome of [`LinkColorEngine::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh {
    pub value: Color,
    /// Whether `value` differs from the value stored before the refresh.
    pub changed: bool,
}

/// The recommendation engine behind one link-color control.
///
/// Holds the background and text colors the host resolved, the stored link
/// value, the forced hue and mode, and the cache of ranked sets. Background
/// and text start out unknown; every computation needs both.
#[derive(Debug, Default)]
pub struct LinkColorEngine {
    options: Options,
    background: Option<Color>,
    text: Option<Color>,
    value: Option<Color>,
    cache: RecommendationCache,
    modes: ModeController,
}

impl LinkColorEngine {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_options(&mut self, options: Options) {
        if options != self.options {
            self.cache.invalidate_all();
            self.options = options;
        }
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn text(&self) -> Option<Color> {
        self.text
    }

    pub fn set_background(&mut self, background: Color) {
        if self.background != Some(background) {
            self.cache.invalidate_all();
            self.background = Some(background);
        }
    }

    pub fn set_text(&mut self, text: Color) {
        if self.text != Some(text) {
            self.cache.invalidate_all();
            self.text = Some(text);
        }
    }

    /// Mark background and text as unknown until the host sets them again.
    pub fn forget_colors(&mut self) {
        self.background = None;
        self.text = None;
        self.cache.invalidate_all();
    }

    pub fn value(&self) -> Option<Color> {
        self.value
    }

    pub fn set_value(&mut self, value: Color) {
        self.value = Some(value);
    }

    /// The forced hue, else the hue of the stored value.
    pub fn hue(&self) -> Option<u16> {
        self.modes.hue().or_else(|| self.value.map(|v| v.hue()))
    }

    /// Force the hue. A different hue drops the sets cached for both the old
    /// and the new hue so the next lookup recalculates.
    pub fn set_hue(&mut self, hue: f32) -> u16 {
        let change = self.modes.set_hue(hue);
        if change.changed() {
            if let Some(previous) = change.previous {
                self.cache.invalidate_hue(previous);
            }
            self.cache.invalidate_hue(change.hue);
            debug!(hue = change.hue, previous = ?change.previous, "hue changed");
        }
        change.hue
    }

    pub fn force_mode(&mut self, mode: Option<SelectionMode>) {
        self.modes.force_mode(mode);
    }

    pub fn available_modes(&self) -> AvailableModes {
        AvailableModes::from(&self.options.show)
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    /// Ranked recommendations for `hue` against the current colors.
    pub fn compute_recommendations(
        &mut self,
        hue: u16,
        force_recalculate: bool,
    ) -> Result<Arc<RecommendationSet>, EngineError> {
        let (background, text) = self.colors()?;
        let key = CacheKey::new(hue, &background, &text);
        let options = &self.options;
        Ok(self.cache.get_or_compute(key, force_recalculate, || {
            search(hue, &background, &text, options)
        }))
    }

    /// Ranked recommendations for the current hue.
    pub fn current_recommendations(
        &mut self,
        force_recalculate: bool,
    ) -> Result<Arc<RecommendationSet>, EngineError> {
        let hue = self.hue().ok_or(EngineError::UnknownHue)?;
        self.compute_recommendations(hue, force_recalculate)
    }

    /// The best recommendation after applying `pick` to the current hue.
    pub fn compute_auto_color(
        &mut self,
        pick: HuePick,
        force_recalculate: bool,
    ) -> Result<Color, EngineError> {
        match pick {
            HuePick::Unchanged => {}
            HuePick::Hue(hue) => {
                self.set_hue(hue);
            }
            HuePick::Value(color) => {
                self.set_hue(f32::from(color.hue()));
            }
        }
        let set = self.current_recommendations(force_recalculate)?;
        Ok(set.best().color)
    }

    /// Whether `color` is among the recommendations for the current hue.
    pub fn is_color_recommended(&mut self, color: &Color) -> Result<bool, EngineError> {
        Ok(self.current_recommendations(false)?.contains(color))
    }

    /// Which mode `value` is in, judged against the recommendations for `hue`
    /// (the current hue, or the value's own when no hue was forced).
    pub fn resolve_mode(
        &mut self,
        value: &Color,
        hue: Option<u16>,
    ) -> Result<SelectionMode, EngineError> {
        let hue = hue.or_else(|| self.modes.hue()).unwrap_or_else(|| value.hue());
        let set = self.compute_recommendations(hue, false)?;
        let auto_color = set.best().color;
        let available = self.available_modes();
        Ok(self.modes.resolve(value, &auto_color, &set, &available))
    }

    /// React to the host changing the background or text setting: drop every
    /// cached set, recompute the auto color for the current hue and store it.
    pub fn refresh(&mut self, background: Color, text: Color) -> Result<Refresh, EngineError> {
        self.cache.invalidate_all();
        self.background = Some(background);
        self.text = Some(text);

        let hue = self.hue().ok_or(EngineError::UnknownHue)?;
        let value = self.compute_recommendations(hue, true)?.best().color;
        let changed = self.value != Some(value);
        self.value = Some(value);
        info!(
            background = %background,
            text = %text,
            hue,
            value = %value,
            changed,
            "refreshed link color"
        );
        Ok(Refresh { value, changed })
    }

    fn colors(&self) -> Result<(Color, Color), EngineError> {
        let background = self.background.ok_or(EngineError::UnknownBackground)?;
        let text = self.text.ok_or(EngineError::UnknownText)?;
        Ok((background, text))
    }
}
