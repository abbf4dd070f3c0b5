//! Styles for clap's help output.

use clap::builder::{Styles, styling::AnsiColor};

/// Help styles for the para CLI.
///
/// Headers and usage are green, commands, flags and placeholders cyan.
pub const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().bold())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::Cyan.on_default().bold())
    .placeholder(AnsiColor::Cyan.on_default());
