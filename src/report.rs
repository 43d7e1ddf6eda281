use std::io::{self, Write};

use crossterm::style::{Color as TermColor, Stylize};

use crate::color::Color;
use crate::recommend::rating::Assessment;
use crate::recommend::search::RecommendationSet;

fn to_term(color: &Color) -> TermColor {
    let (r, g, b) = color.rgb();
    TermColor::Rgb { r, g, b }
}

/// Write the ranked set, one color per line, best first.
///
/// With `swatches`, each hex string is printed on its own color, labelled in
/// whichever of black or white reads better on it.
pub fn write_recommendations<W: Write>(
    out: &mut W,
    set: &RecommendationSet,
    limit: Option<usize>,
    swatches: bool,
) -> io::Result<()> {
    writeln!(out, "rank  color    background  text   score")?;
    for (rank, candidate) in set.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        let hex = candidate.color.to_hex();
        let label = if swatches {
            let fg = to_term(&candidate.color.max_contrast_color());
            format!("{}", format!(" {hex} ").with(fg).on(to_term(&candidate.color)))
        } else {
            hex
        };
        writeln!(
            out,
            "{:>4}  {}  {:>10.2}  {:>5.2}  {:>6.1}",
            rank + 1,
            label,
            candidate.contrast.contrast_background,
            candidate.contrast.contrast_text,
            candidate.contrast.score
        )?;
    }
    Ok(())
}

pub fn write_assessment<W: Write>(out: &mut W, value: &Color, assessment: &Assessment) -> io::Result<()> {
    writeln!(out, "color                           {value}")?;
    writeln!(out, "rating                          {}", assessment.rating)?;
    writeln!(
        out,
        "contrast with background        {:.2}",
        assessment.contrast_background
    )?;
    writeln!(
        out,
        "contrast with surrounding text  {:.2}",
        assessment.contrast_text
    )?;
    Ok(())
}
