//! Styles for the bucketnotes CLI.
//!
//! Renderers ask for styles by meaning (a title, a timestamp, a duplicate) and
//! never pick colors themselves, so the look can change in one place.
//! `console` drops the escape codes on its own when stdout is not a terminal.

use console::Style;

pub fn title() -> Style {
    Style::new().bold()
}

pub fn time() -> Style {
    Style::new().dim().italic()
}

pub fn muted() -> Style {
    Style::new().dim()
}

pub fn index() -> Style {
    Style::new().cyan()
}

/// Test numbers recorded more than once.
pub fn duplicate() -> Style {
    Style::new().yellow().bold()
}

pub fn deleted() -> Style {
    Style::new().red()
}

pub fn bar() -> Style {
    Style::new().green()
}

pub fn success() -> Style {
    Style::new().green()
}

pub fn warning() -> Style {
    Style::new().yellow()
}

pub fn info() -> Style {
    Style::new().dim()
}
