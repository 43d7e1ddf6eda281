//! Accessible link-color recommendations.
//!
//! Given a background color, the surrounding text color and a hue, search the
//! saturation/lightness plane for link colors that meet WCAG contrast targets,
//! rank them, and keep the ranking cached until an input changes.

pub mod cli;
pub mod color;
pub mod engine;
pub mod options;
pub mod recommend;
pub mod report;
