//! Handles all user-facing output for the CLI.

use miette::Report;
use std::io::Write;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Prints `ok` or `error` in front of `path`, colored when stdout is a terminal.
pub fn print_status(path: &Path, ok: bool) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let (label, color) = if ok {
        ("ok", Color::Green)
    } else {
        ("error", Color::Red)
    };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "{label:>5}");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", path.display());
}

/// Renders a diagnostic report on stderr.
pub fn print_report(report: &Report) {
    eprintln!("{report:?}");
}
