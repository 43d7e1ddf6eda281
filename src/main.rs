use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use wcag_link_color::cli::{Args, Command, EngineArgs};
use wcag_link_color::color::{normalize_hue, Color};
use wcag_link_color::engine::{HuePick, LinkColorEngine};
use wcag_link_color::options::Options;
use wcag_link_color::recommend::rating::assess;
use wcag_link_color::report::{write_assessment, write_recommendations};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;
    run(args.command)
}

fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;
    Ok(())
}

fn engine_for(args: &EngineArgs, options: Options) -> Result<LinkColorEngine> {
    let mut engine = LinkColorEngine::new(options);
    engine.set_background(args.background()?);
    engine.set_text(args.text()?);
    Ok(engine)
}

fn run(command: Command) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Recommend {
            engine,
            hue,
            limit,
            preview,
        } => {
            let mut recommender = engine_for(&engine, engine.options()?)?;
            let set = recommender.compute_recommendations(normalize_hue(hue), false)?;
            write_recommendations(&mut out, &set, limit, preview)?;
        }
        Command::Auto { engine, hue, from } => {
            let mut recommender = engine_for(&engine, engine.options()?)?;
            let pick = match (from, hue) {
                (Some(from), _) => HuePick::Value(
                    Color::parse(&from).with_context(|| format!("invalid color: {from}"))?,
                ),
                (None, Some(hue)) => HuePick::Hue(hue),
                (None, None) => HuePick::Unchanged,
            };
            let color = recommender.compute_auto_color(pick, false)?;
            writeln!(out, "{color}")?;
        }
        Command::Rate { engine, value } => {
            let value =
                Color::parse(&value).with_context(|| format!("invalid link color: {value}"))?;
            let assessment = assess(&value, &engine.background()?, &engine.text()?);
            write_assessment(&mut out, &value, &assessment)?;
        }
        Command::Mode {
            engine,
            value,
            hue,
            no_auto,
            no_recommended,
            no_custom,
        } => {
            let mut options = engine.options()?;
            if no_auto {
                options.show.auto = Some(false);
            }
            if no_recommended {
                options.show.recommended = Some(false);
            }
            if no_custom {
                options.show.custom = Some(false);
            }
            let mut recommender = engine_for(&engine, options)?;
            let value =
                Color::parse(&value).with_context(|| format!("invalid link color: {value}"))?;
            let mode = recommender.resolve_mode(&value, hue.map(normalize_hue))?;
            writeln!(out, "{mode}")?;
        }
    }
    Ok(())
}
