use std::str::FromStr;

use palette::{FromColor, Hsl, Srgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contrast used by [`Color::readable_contrasting_color`] callers that have no
/// explicit target of their own.
pub const DEFAULT_READABLE_CONTRAST: f32 = 5.0;

/// Errors produced while turning user input into a [`Color`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color `{0}`: expected 3, 4, 6 or 8 hex digits")]
    InvalidHex(String),
    #[error("invalid {function}() color `{input}`: expected {expected} components")]
    InvalidArity {
        function: &'static str,
        input: String,
        expected: &'static str,
    },
    #[error("invalid component `{component}` in color `{input}`")]
    InvalidComponent { input: String, component: String },
    #[error("unrecognized color syntax `{0}`")]
    Unrecognized(String),
    #[error("unresolved color reference `{0}`")]
    UnresolvedReference(String),
}

/// Core color value used by the recommendation engine.
///
/// Stores exact sRGB channels alongside the normalized HSL coordinates they
/// were built from. Hue is an integer degree in `0..360`; saturation and
/// lightness are percentages in `[0, 100]`. Equality and hashing only look at
/// the sRGB channels, so two colors are equal iff their hex strings are.
#[derive(Debug, Clone, Copy)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    hue: u16,
    saturation: f32,
    lightness: f32,
}

/// A literal `{h, s, l}` record, as supplied by a hue picker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HslInput {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        hue: 0,
        saturation: 0.0,
        lightness: 0.0,
    };

    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        hue: 0,
        saturation: 0.0,
        lightness: 100.0,
    };

    /// Build a color from HSL coordinates.
    ///
    /// Hue drops its fraction and wraps modulo 360; saturation and lightness
    /// are clamped to `[0, 100]`.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let hue = normalize_hue(hue);
        let saturation = clamp_percent(saturation);
        let lightness = clamp_percent(lightness);

        let hsl: Hsl = Hsl::new(f32::from(hue), saturation / 100.0, lightness / 100.0);
        let (r, g, b) = srgb_f32_clamped(Srgb::from_color(hsl));
        Self {
            r,
            g,
            b,
            hue,
            saturation,
            lightness,
        }
    }

    /// Build a color from sRGB channels. The channels are kept verbatim.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let srgb: Srgb<f32> = Srgb::new(r, g, b).into_format();
        let hsl: Hsl = Hsl::from_color(srgb);
        Self {
            r,
            g,
            b,
            hue: normalize_hue(hsl.hue.into_positive_degrees().round()),
            saturation: clamp_percent(hsl.saturation * 100.0),
            lightness: clamp_percent(hsl.lightness * 100.0),
        }
    }

    /// Parse a `#hex`, `rgb()`, `rgba()`, `hsl()` or `hsla()` color string.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }
        let lower = trimmed.to_ascii_lowercase();

        if let Some(digits) = lower.strip_prefix('#') {
            return parse_hex(digits, trimmed);
        }
        if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
            return parse_rgb(args, trimmed);
        }
        if let Some(args) = function_args(&lower, "hsla").or_else(|| function_args(&lower, "hsl")) {
            return parse_hsl(args, trimmed);
        }
        Err(ParseError::Unrecognized(trimmed.to_string()))
    }

    /// Same as [`Color::parse`].
    pub fn from_hex(hex: &str) -> Result<Self, ParseError> {
        Self::parse(hex)
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    pub fn lightness(&self) -> f32 {
        self.lightness
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Serialize to lowercase hex `#rrggbb`. This is the canonical identity of
    /// a color everywhere in the engine.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(&self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// WCAG 2.0 contrast ratio between `self` and `other`.
    ///
    /// Symmetric, in `[1, 21]`: identical colors give 1, black on white 21.
    pub fn luminosity_distance_from(&self, other: &Color) -> f32 {
        let l1 = self.relative_luminance();
        let l2 = other.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Pure black or pure white, whichever contrasts more with this color.
    /// Ties go to black.
    pub fn max_contrast_color(&self) -> Color {
        let against_black = self.luminosity_distance_from(&Color::BLACK);
        let against_white = self.luminosity_distance_from(&Color::WHITE);
        if against_black >= against_white {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }

    /// A background is dark when white text reads better on it than black.
    pub fn is_dark(&self) -> bool {
        self.max_contrast_color() == Color::WHITE
    }

    /// Walk lightness one point at a time toward black or white until the
    /// contrast with `reference` reaches `target`.
    ///
    /// Hue and saturation are held. When pure black/white only just reaches the
    /// target or falls short of it, that max-contrast color is returned
    /// instead; when the walk hits the end of the lightness range, the last
    /// color tried is returned.
    pub fn readable_contrasting_color(&self, reference: &Color, target: f32) -> Color {
        let max = reference.max_contrast_color();
        if max.luminosity_distance_from(reference) <= target {
            return max;
        }

        if self.luminosity_distance_from(reference) >= target {
            return *self;
        }

        let step = if max == Color::BLACK { -1.0 } else { 1.0 };
        let mut lightness = self.lightness;
        let mut candidate = *self;
        while candidate.luminosity_distance_from(reference) < target {
            if (step < 0.0 && lightness <= 0.0) || (step > 0.0 && lightness >= 100.0) {
                break;
            }
            lightness = (lightness + step).clamp(0.0, 100.0);
            candidate = Color::from_hsl(f32::from(self.hue), self.saturation, lightness);
        }
        candidate
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.rgb() == other.rgb()
    }
}

impl Eq for Color {}

impl std::hash::Hash for Color {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rgb().hash(state);
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<HslInput> for Color {
    fn from(input: HslInput) -> Self {
        Color::from_hsl(input.h, input.s, input.l)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color setting as configured by the host: either a literal color or the
/// key of another setting whose value is the color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorInput {
    Literal(Color),
    Reference(String),
}

impl ColorInput {
    /// Strings starting with `#`, `rgb(`, `rgba(`, `hsl(` or `hsla(` are
    /// literals (and must parse); anything else names another setting.
    pub fn classify(raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        let literal = lower.starts_with('#')
            || ["rgb(", "rgba(", "hsl(", "hsla("]
                .iter()
                .any(|prefix| lower.starts_with(prefix));
        if literal {
            Ok(ColorInput::Literal(Color::parse(trimmed)?))
        } else if trimmed.is_empty() {
            Err(ParseError::Empty)
        } else {
            Ok(ColorInput::Reference(trimmed.to_string()))
        }
    }

    /// Resolve a reference through `lookup`, which returns the raw value of the
    /// named setting. Referenced values must themselves be literals.
    pub fn resolve<F>(self, lookup: F) -> Result<Color, ParseError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match self {
            ColorInput::Literal(color) => Ok(color),
            ColorInput::Reference(key) => match lookup(&key) {
                Some(raw) => Color::parse(&raw),
                None => Err(ParseError::UnresolvedReference(key)),
            },
        }
    }
}

/// Truncate to a whole degree and wrap into `0..360`. Non-finite hues become 0.
pub fn normalize_hue(hue: f32) -> u16 {
    if !hue.is_finite() {
        return 0;
    }
    (hue.trunc() as i64).rem_euclid(360) as u16
}

fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Clamp an Srgb<f32> to [0, 1] and convert to u8 channels.
fn srgb_f32_clamped(srgb: Srgb<f32>) -> (u8, u8, u8) {
    let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
    let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
    let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
    (r, g, b)
}

/// Returns the text between the parentheses of `name(...)`.
fn function_args<'a>(lower: &'a str, name: &str) -> Option<&'a str> {
    lower
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn split_components(args: &str) -> Vec<&str> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_hex(digits: &str, input: &str) -> Result<Color, ParseError> {
    let invalid = || ParseError::InvalidHex(input.to_string());
    if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let pair = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    let single = |i: usize| {
        u8::from_str_radix(&digits[i..i + 1], 16)
            .map(|nibble| nibble * 17)
            .map_err(|_| invalid())
    };

    match digits.len() {
        // alpha, if present, is dropped
        3 | 4 => Ok(Color::from_rgb(single(0)?, single(1)?, single(2)?)),
        6 | 8 => Ok(Color::from_rgb(pair(0)?, pair(2)?, pair(4)?)),
        _ => Err(invalid()),
    }
}

fn parse_number(component: &str, input: &str) -> Result<f32, ParseError> {
    component
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidComponent {
            input: input.to_string(),
            component: component.to_string(),
        })
}

fn parse_channel(component: &str, input: &str) -> Result<u8, ParseError> {
    let value = match component.strip_suffix('%') {
        Some(pct) => parse_number(pct, input)? * 2.55,
        None => parse_number(component, input)?,
    };
    Ok(value.clamp(0.0, 255.0).round() as u8)
}

fn parse_alpha(component: &str, input: &str) -> Result<(), ParseError> {
    let bare = component.strip_suffix('%').unwrap_or(component);
    parse_number(bare, input).map(|_| ())
}

fn parse_rgb(args: &str, input: &str) -> Result<Color, ParseError> {
    let parts = split_components(args);
    if !(3..=4).contains(&parts.len()) {
        return Err(ParseError::InvalidArity {
            function: "rgb",
            input: input.to_string(),
            expected: "3 or 4",
        });
    }
    let r = parse_channel(parts[0], input)?;
    let g = parse_channel(parts[1], input)?;
    let b = parse_channel(parts[2], input)?;
    if let Some(alpha) = parts.get(3) {
        parse_alpha(alpha, input)?;
    }
    Ok(Color::from_rgb(r, g, b))
}

fn parse_hsl(args: &str, input: &str) -> Result<Color, ParseError> {
    let parts = split_components(args);
    if !(3..=4).contains(&parts.len()) {
        return Err(ParseError::InvalidArity {
            function: "hsl",
            input: input.to_string(),
            expected: "3 or 4",
        });
    }
    let hue = parse_number(parts[0].strip_suffix("deg").unwrap_or(parts[0]), input)?;
    let saturation = parse_number(parts[1].strip_suffix('%').unwrap_or(parts[1]), input)?;
    let lightness = parse_number(parts[2].strip_suffix('%').unwrap_or(parts[2]), input)?;
    if let Some(alpha) = parts.get(3) {
        parse_alpha(alpha, input)?;
    }
    Ok(Color::from_hsl(hue, saturation, lightness))
}
