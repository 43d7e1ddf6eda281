use serde::{Deserialize, Serialize};

use crate::color::Color;

/// WCAG AAA contrast for normal text.
pub const AAA_CONTRAST: f32 = 7.0;
/// WCAG AA contrast for normal text.
pub const AA_CONTRAST: f32 = 4.5;
/// Contrast a link should keep against the text around it.
pub const TEXT_CONTRAST_TARGET: f32 = 3.0;

const TEXT_WEIGHT: f32 = 1.1;

/// Compliance tier that bypasses the grid search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Compliance {
    #[serde(rename = "AA", alias = "aa")]
    Aa,
    #[serde(rename = "AAA", alias = "aaa")]
    Aaa,
}

impl Compliance {
    /// Background contrast the forced candidate is built to reach.
    pub fn target_contrast(self) -> f32 {
        match self {
            Compliance::Aa => AA_CONTRAST,
            Compliance::Aaa => AAA_CONTRAST,
        }
    }
}

impl std::fmt::Display for Compliance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compliance::Aa => f.write_str("AA"),
            Compliance::Aaa => f.write_str("AAA"),
        }
    }
}

/// Contrast of one candidate against the fixed background and text colors,
/// plus its score. Lower scores are better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastPair {
    pub contrast_background: f32,
    pub contrast_text: f32,
    pub score: f32,
}

/// Scores how close a candidate sits to the AAA background target and the
/// surrounding-text target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContrastScorer {
    /// Underlined links don't need to stand out from text by color alone.
    pub links_underlined: bool,
}

impl ContrastScorer {
    pub fn new(links_underlined: bool) -> Self {
        Self { links_underlined }
    }

    pub fn score(&self, contrast_background: f32, contrast_text: f32) -> f32 {
        let score_b = (contrast_background - AAA_CONTRAST).abs();
        if self.links_underlined {
            return score_b * 100.0;
        }
        let score_t = (contrast_text - TEXT_CONTRAST_TARGET).abs();
        (score_b + score_t * TEXT_WEIGHT) * 100.0
    }

    pub fn measure(&self, color: &Color, background: &Color, text: &Color) -> ContrastPair {
        let contrast_background = color.luminosity_distance_from(background);
        let contrast_text = color.luminosity_distance_from(text);
        ContrastPair {
            contrast_background,
            contrast_text,
            score: self.score(contrast_background, contrast_text),
        }
    }
}
