use std::collections::HashSet;

use tracing::{debug, trace};

use crate::color::{Color, DEFAULT_READABLE_CONTRAST};
use crate::options::Options;
use crate::recommend::score::{ContrastPair, ContrastScorer, AAA_CONTRAST, AA_CONTRAST};

/// Lightness sequence searched against light backgrounds (dark links).
pub const LIGHT_BACKGROUND_LIGHTNESS: [f32; 11] = [
    20.0, 22.0, 23.0, 24.0, 25.0, 27.0, 29.0, 32.0, 35.0, 39.0, 43.0,
];

/// Lightness sequence searched against dark backgrounds (light links).
pub const DARK_BACKGROUND_LIGHTNESS: [f32; 11] = [
    80.0, 78.0, 77.0, 76.0, 75.0, 73.0, 71.0, 68.0, 65.0, 61.0, 57.0,
];

pub const DEFAULT_SATURATION_STEPS: [f32; 20] = [
    40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 67.5, 70.0, 72.5, 75.0, 77.5, 80.0, 82.5, 85.0, 87.5,
    90.0, 92.5, 95.0, 97.5, 100.0,
];

/// Grid candidates must contrast with the background by more than this.
pub const DEFAULT_CONTRAST_FLOOR: f32 = 3.0;

/// Saturation and lightness of the color the empty-grid fallback starts from.
const FALLBACK_SATURATION: f32 = 50.0;
const FALLBACK_LIGHTNESS: f32 = 50.0;

/// Lightness the forced-compliance candidates start walking from.
const FORCED_LIGHTNESS: f32 = 50.0;

/// A generated color with its contrast metrics and score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub color: Color,
    pub contrast: ContrastPair,
}

impl Candidate {
    fn measure(color: Color, background: &Color, text: &Color, scorer: &ContrastScorer) -> Self {
        Self {
            color,
            contrast: scorer.measure(&color, background, text),
        }
    }
}

/// Ranked, duplicate-free candidates for one hue/background/text combination.
///
/// Always holds at least one candidate; the first is the best.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSet {
    candidates: Vec<Candidate>,
}

impl RecommendationSet {
    pub fn best(&self) -> &Candidate {
        &self.candidates[0]
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Hex strings in rank order.
    pub fn hex_strings(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.color.to_hex()).collect()
    }

    pub fn contains(&self, color: &Color) -> bool {
        self.position(color).is_some()
    }

    /// Rank of `color` within the set, 0 being the best.
    pub fn position(&self, color: &Color) -> Option<usize> {
        self.candidates.iter().position(|c| c.color == *color)
    }
}

impl<'a> IntoIterator for &'a RecommendationSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Whether the color written as `color` appears in `set`. Matching is on the
/// normalized hex, so case and syntax don't matter; unparsable input is never
/// recommended.
pub fn is_color_recommended(color: &str, set: &RecommendationSet) -> bool {
    Color::parse(color)
        .map(|color| set.contains(&color))
        .unwrap_or(false)
}

/// Search the lightness x saturation grid at `hue` for link colors that read
/// well on `background` next to `text`, ranked best first.
///
/// With a forced compliance tier the grid is skipped and the set holds the
/// single color walked to that tier's contrast. The returned set is never
/// empty: when nothing clears the contrast floor, one best-effort readable
/// color is synthesized.
pub fn search(hue: u16, background: &Color, text: &Color, options: &Options) -> RecommendationSet {
    let scorer = ContrastScorer::new(options.links_underlined);

    if let Some(compliance) = options.force_compliance {
        let color = forced_color(hue, background, compliance.target_contrast(), options);
        debug!(hue, %compliance, color = %color, "forced compliance candidate");
        return RecommendationSet {
            candidates: vec![Candidate::measure(color, background, text, &scorer)],
        };
    }

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    if options.compliance_anchors {
        for target in [AAA_CONTRAST, AA_CONTRAST] {
            let color = forced_color(hue, background, target, options);
            if seen.insert(color.to_hex()) {
                candidates.push(Candidate::measure(color, background, text, &scorer));
            }
        }
    }

    let dark = background.is_dark();
    let floor = options.contrast_floor();
    for &lightness in options.lightness_steps_for(dark) {
        for &saturation in options.saturation_steps() {
            let color = Color::from_hsl(f32::from(hue), saturation, lightness);
            let candidate = Candidate::measure(color, background, text, &scorer);
            if candidate.contrast.contrast_background <= floor {
                trace!(color = %color, contrast = candidate.contrast.contrast_background, "below floor");
                continue;
            }
            if seen.insert(color.to_hex()) {
                candidates.push(candidate);
            }
        }
    }

    if candidates.is_empty() {
        let color = Color::from_hsl(f32::from(hue), FALLBACK_SATURATION, FALLBACK_LIGHTNESS)
            .readable_contrasting_color(background, DEFAULT_READABLE_CONTRAST);
        debug!(hue, color = %color, "no grid color cleared the floor, using fallback");
        candidates.push(Candidate::measure(color, background, text, &scorer));
    }

    // stable: equal scores keep grid order
    candidates.sort_by(|a, b| a.contrast.score.total_cmp(&b.contrast.score));

    debug!(
        hue,
        background = %background,
        text = %text,
        dark,
        count = candidates.len(),
        "searched recommendation grid"
    );
    RecommendationSet { candidates }
}

fn forced_color(hue: u16, background: &Color, target: f32, options: &Options) -> Color {
    Color::from_hsl(f32::from(hue), options.force_saturation(), FORCED_LIGHTNESS)
        .readable_contrasting_color(background, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::score::Compliance;

    fn white() -> Color {
        Color::WHITE
    }

    fn dark_gray() -> Color {
        Color::parse("#333333").unwrap()
    }

    #[test]
    fn light_background_yields_ranked_unique_candidates() {
        let set = search(210, &white(), &dark_gray(), &Options::default());
        assert!(!set.is_empty());

        let hexes = set.hex_strings();
        let unique: HashSet<_> = hexes.iter().collect();
        assert_eq!(unique.len(), hexes.len(), "duplicate candidates: {hexes:?}");

        for window in set.candidates().windows(2) {
            assert!(
                window[0].contrast.score <= window[1].contrast.score,
                "not sorted: {} > {}",
                window[0].contrast.score,
                window[1].contrast.score
            );
        }
        for candidate in &set {
            assert!(candidate.contrast.contrast_background > DEFAULT_CONTRAST_FLOOR);
            assert!(LIGHT_BACKGROUND_LIGHTNESS.contains(&candidate.color.lightness()));
            assert_eq!(candidate.color.hue(), 210);
        }
    }

    #[test]
    fn dark_background_uses_dark_steps() {
        let background = Color::parse("#1a1a1a").unwrap();
        let text = Color::parse("#dddddd").unwrap();
        let set = search(30, &background, &text, &Options::default());
        for candidate in &set {
            assert!(
                DARK_BACKGROUND_LIGHTNESS.contains(&candidate.color.lightness()),
                "unexpected lightness {}",
                candidate.color.lightness()
            );
        }
    }

    #[test]
    fn configured_steps_replace_defaults() {
        let options = Options {
            lightness_steps: Some((vec![25.0], vec![75.0])),
            saturation_steps: Some(vec![100.0]),
            ..Options::default()
        };
        let set = search(120, &white(), &dark_gray(), &options);
        assert_eq!(set.len(), 1);
        assert_eq!(set.best().color.saturation(), 100.0);
        assert_eq!(set.best().color.lightness(), 25.0);
    }

    #[test]
    fn best_has_lowest_score() {
        let set = search(0, &white(), &dark_gray(), &Options::default());
        let lowest = set
            .iter()
            .map(|c| c.contrast.score)
            .fold(f32::INFINITY, f32::min);
        assert_eq!(set.best().contrast.score, lowest);
    }

    #[test]
    fn unreachable_floor_falls_back_to_one_readable_color() {
        let options = Options {
            contrast_floor: Some(25.0),
            ..Options::default()
        };
        let set = search(210, &white(), &dark_gray(), &options);
        assert_eq!(set.len(), 1);

        let fallback = set.best();
        assert_eq!(fallback.color.hue(), 210);
        assert_eq!(fallback.color.saturation(), FALLBACK_SATURATION);
        assert!(fallback.contrast.contrast_background >= DEFAULT_READABLE_CONTRAST);
    }

    #[test]
    fn forced_aaa_returns_single_compliant_color() {
        let options = Options {
            force_compliance: Some(Compliance::Aaa),
            ..Options::default()
        };
        let set = search(210, &white(), &dark_gray(), &options);
        assert_eq!(set.len(), 1);
        let only = set.best();
        assert!(only.contrast.contrast_background >= AAA_CONTRAST - 1e-4);
        assert_eq!(only.color.hue(), 210);
        assert_eq!(only.color.saturation(), 60.0);
    }

    #[test]
    fn forced_aa_honors_force_saturation() {
        let background = Color::parse("#202020").unwrap();
        let options = Options {
            force_compliance: Some(Compliance::Aa),
            force_saturation: Some(90.0),
            ..Options::default()
        };
        let set = search(0, &background, &Color::WHITE, &options);
        assert_eq!(set.len(), 1);
        assert!(set.best().contrast.contrast_background >= AA_CONTRAST - 1e-4);
        assert_eq!(set.best().color.saturation(), 90.0);
    }

    #[test]
    fn anchors_join_the_ranking() {
        let options = Options {
            compliance_anchors: true,
            ..Options::default()
        };
        let anchor = forced_color(210, &white(), AAA_CONTRAST, &options);
        let set = search(210, &white(), &dark_gray(), &options);
        assert!(set.contains(&anchor));

        let plain = search(210, &white(), &dark_gray(), &Options::default());
        assert!(set.len() >= plain.len());
    }

    #[test]
    fn recommended_lookup_normalizes_input() {
        let set = search(210, &white(), &dark_gray(), &Options::default());
        let best = set.best().color.to_hex();
        assert!(is_color_recommended(&best.to_uppercase(), &set));

        let (r, g, b) = set.best().color.rgb();
        assert!(is_color_recommended(&format!("rgb({r}, {g}, {b})"), &set));

        assert!(!is_color_recommended("#ffffff", &set));
        assert!(!is_color_recommended("not a color", &set));
    }

    #[test]
    fn position_reports_rank() {
        let set = search(210, &white(), &dark_gray(), &Options::default());
        assert_eq!(set.position(&set.best().color), Some(0));
        assert_eq!(set.position(&Color::WHITE), None);
    }
}
