//! Diagnostic Emitters
//!
//! Emitters turn an [`EcError`] into output for a human. The terminal
//! emitter is the only format the `ec` binary needs.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::EcError;

/// Trait for emitting diagnostics.
pub trait DiagnosticEmitter {
    /// Emit a single error.
    fn emit(&mut self, error: &EcError);

    /// Flush any buffered output.
    fn flush(&mut self);
}

#[cfg(test)]
mod tests;
