use crate::color::Color;
use crate::recommend::score::{AAA_CONTRAST, AA_CONTRAST, TEXT_CONTRAST_TARGET};

/// Compliance tier a link color reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Aaa,
    Aa,
    Fail,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Aaa => f.write_str("AAA"),
            Rating::Aa => f.write_str("AA"),
            Rating::Fail => f.write_str(" - "),
        }
    }
}

/// What the indicator next to the picker shows for a chosen color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub contrast_background: f32,
    pub contrast_text: f32,
    pub rating: Rating,
}

/// Rate `value` against the background and the surrounding text.
///
/// Contrasts are rounded to two decimals before rating, so the tier matches
/// the numbers shown to the author.
pub fn assess(value: &Color, background: &Color, text: &Color) -> Assessment {
    let contrast_background = round2(value.luminosity_distance_from(background));
    let contrast_text = round2(value.luminosity_distance_from(text));
    let rating = if contrast_background >= AAA_CONTRAST && contrast_text >= TEXT_CONTRAST_TARGET {
        Rating::Aaa
    } else if contrast_background >= AA_CONTRAST {
        Rating::Aa
    } else {
        Rating::Fail
    };
    Assessment {
        contrast_background,
        contrast_text,
        rating,
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
