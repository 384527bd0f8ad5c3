//! Terminal Emitter
//!
//! Human-readable error output with optional ANSI color support.
//!
//! Layout:
//!
//! ```text
//! [RUNTIME ERROR] E6001 at line 5:
//! >> ADD y 1
//! Details: Undefined variable 'y'. Please declare it with 'EC' first.
//!
//! Stack Trace:
//!   at line 12 (in main)
//! ```

use std::io::{self, Write};

use crate::EcError;

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean based on terminal detection.
    ///
    /// For `Auto` mode, `is_tty` determines whether colors should be used.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Parse a `--color=` value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter with explicit color mode.
    ///
    /// `is_tty` is only consulted for `ColorMode::Auto`.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    /// Consume the emitter and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write text with optional ANSI color codes.
    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn header(error: &EcError) -> &'static str {
        let code = error.code();
        if code.is_structural_error() {
            "[SYNTAX ERROR]"
        } else if code.is_eval_error() {
            "[RUNTIME ERROR]"
        } else {
            "[ERROR]"
        }
    }
}

impl TerminalEmitter<io::Stderr> {
    /// Create a terminal emitter for stderr with explicit color mode.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, error: &EcError) {
        self.write_colored(Self::header(error), colors::ERROR);
        let _ = write!(self.writer, " {}", error.code());
        match error.line() {
            Some(line) => {
                let _ = writeln!(self.writer, " at line {line}:");
            }
            None => {
                let _ = writeln!(self.writer, ":");
            }
        }

        if let Some(text) = error.source_text() {
            let _ = writeln!(self.writer, ">> {text}");
        }
        let _ = writeln!(self.writer, "Details: {}", error.message());

        let trace = error.backtrace();
        if !trace.is_empty() {
            let _ = writeln!(self.writer);
            self.write_colored("Stack Trace:", colors::NOTE);
            let _ = writeln!(self.writer);
            let _ = write!(self.writer, "{trace}");
        }
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}
