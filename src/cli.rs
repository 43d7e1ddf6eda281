use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::color::Color;
use crate::options::Options;
use crate::recommend::score::Compliance;

/// Recommend link colors that meet WCAG contrast against a background and
/// the surrounding text.
#[derive(Parser, Debug)]
#[command(name = "wcag-link-color", version, about)]
pub struct Args {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the ranked recommendations for a hue
    Recommend {
        #[command(flatten)]
        engine: EngineArgs,

        /// Hue in degrees
        #[arg(long, allow_negative_numbers = true)]
        hue: f32,

        /// Show at most this many colors
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print a colored swatch next to each color
        #[arg(long)]
        preview: bool,
    },

    /// Print the best recommendation for a hue or for the hue of a color
    Auto {
        #[command(flatten)]
        engine: EngineArgs,

        /// Hue in degrees
        #[arg(
            long,
            allow_negative_numbers = true,
            conflicts_with = "from",
            required_unless_present = "from"
        )]
        hue: Option<f32>,

        /// Take the hue from this color
        #[arg(long)]
        from: Option<String>,
    },

    /// Rate a link color against the background and text
    Rate {
        #[command(flatten)]
        engine: EngineArgs,

        /// Link color to rate
        value: String,
    },

    /// Report which selection mode a stored link color is in
    Mode {
        #[command(flatten)]
        engine: EngineArgs,

        /// Stored link color
        value: String,

        /// Hue to judge against (defaults to the value's own hue)
        #[arg(long, allow_negative_numbers = true)]
        hue: Option<f32>,

        /// Hide the auto mode
        #[arg(long)]
        no_auto: bool,

        /// Hide the recommended mode
        #[arg(long)]
        no_recommended: bool,

        /// Hide the custom mode
        #[arg(long)]
        no_custom: bool,
    },
}

/// Colors and engine configuration shared by every subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct EngineArgs {
    /// Background color (#hex, rgb(), hsl())
    #[arg(short, long)]
    pub background: String,

    /// Surrounding text color (#hex, rgb(), hsl())
    #[arg(short, long)]
    pub text: String,

    /// JSON file with engine options; flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip the search and force a single color at this compliance tier
    #[arg(long, value_enum)]
    pub compliance: Option<Compliance>,

    /// Links are underlined, so ignore contrast with the text
    #[arg(long)]
    pub underlined: bool,

    /// Saturation of forced-compliance colors
    #[arg(long)]
    pub force_saturation: Option<f32>,

    /// Minimum background contrast for searched colors
    #[arg(long)]
    pub min_contrast: Option<f32>,

    /// Also rank the forced AAA and AA colors
    #[arg(long)]
    pub anchors: bool,
}

impl EngineArgs {
    /// Options from `--config` (or defaults) with flags applied on top.
    pub fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::load(path)?,
            None => Options::default(),
        };
        if self.compliance.is_some() {
            options.force_compliance = self.compliance;
        }
        if self.underlined {
            options.links_underlined = true;
        }
        if self.force_saturation.is_some() {
            options.force_saturation = self.force_saturation;
        }
        if self.min_contrast.is_some() {
            options.contrast_floor = self.min_contrast;
        }
        if self.anchors {
            options.compliance_anchors = true;
        }
        Ok(options)
    }

    pub fn background(&self) -> Result<Color> {
        Color::parse(&self.background)
            .with_context(|| format!("invalid background color: {}", self.background))
    }

    pub fn text(&self) -> Result<Color> {
        Color::parse(&self.text).with_context(|| format!("invalid text color: {}", self.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn recommend_parses() {
        let args = parse(&[
            "wcag-link-color",
            "recommend",
            "-b",
            "#fff",
            "-t",
            "#333",
            "--hue",
            "210",
            "-n",
            "5",
        ]);
        let Command::Recommend {
            engine, hue, limit, ..
        } = args.command
        else {
            panic!("expected recommend");
        };
        assert_eq!(hue, 210.0);
        assert_eq!(limit, Some(5));
        assert_eq!(engine.background().unwrap(), Color::WHITE);
    }

    #[test]
    fn flags_override_config_defaults() {
        let args = parse(&[
            "wcag-link-color",
            "-vv",
            "rate",
            "-b",
            "#fff",
            "-t",
            "#333",
            "--compliance",
            "aaa",
            "--underlined",
            "--min-contrast",
            "4.5",
            "#0000ee",
        ]);
        assert_eq!(args.verbose, 2);
        let Command::Rate { engine, value } = args.command else {
            panic!("expected rate");
        };
        assert_eq!(value, "#0000ee");
        let options = engine.options().unwrap();
        assert_eq!(options.force_compliance, Some(Compliance::Aaa));
        assert!(options.links_underlined);
        assert_eq!(options.contrast_floor(), 4.5);
        assert!(!options.compliance_anchors);
    }

    #[test]
    fn auto_needs_hue_or_color() {
        assert!(Args::try_parse_from(["wcag-link-color", "auto", "-b", "#fff", "-t", "#333"]).is_err());
        assert!(Args::try_parse_from([
            "wcag-link-color",
            "auto",
            "-b",
            "#fff",
            "-t",
            "#333",
            "--hue",
            "10",
            "--from",
            "#f00"
        ])
        .is_err());
    }

    #[test]
    fn negative_hue_is_a_value() {
        let args = parse(&[
            "wcag-link-color",
            "auto",
            "-b",
            "#fff",
            "-t",
            "#333",
            "--hue",
            "-30",
        ]);
        let Command::Auto { hue, .. } = args.command else {
            panic!("expected auto");
        };
        assert_eq!(hue, Some(-30.0));
    }

    #[test]
    fn bad_color_has_context() {
        let args = parse(&["wcag-link-color", "rate", "-b", "nope", "-t", "#333", "#000"]);
        let Command::Rate { engine, .. } = args.command else {
            panic!("expected rate");
        };
        let err = engine.background().unwrap_err();
        assert!(err.to_string().contains("invalid background color: nope"));
    }
}
