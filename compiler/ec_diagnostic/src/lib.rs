//! Diagnostic system for the EC interpreter.
//!
//! Every failure in the interpreter is a structured [`EcError`] value:
//! - an [`ErrorKind`] carrying the structured data of the failure
//! - an [`ErrorCode`] for searchability
//! - the 1-based line and trimmed source text where it happened
//! - a [`Backtrace`] snapshot of the active call frames
//!
//! Nothing in the core terminates the process. Errors travel up to a single
//! boundary (the `ec` binary, or an embedding caller) which decides how to
//! report them, typically through [`emitter::TerminalEmitter`].

pub mod emitter;
mod error_code;
mod errors;

pub use error_code::ErrorCode;
pub use errors::{
    capacity_exceeded, division_by_zero, file_load_failure, index_out_of_bounds,
    invalid_expression, invalid_size, malformed_statement, missing_close, modulo_by_zero,
    not_an_array, stack_overflow, undefined_array, undefined_variable, unexpected_close,
    unknown_class, unknown_command, unknown_function, Backtrace, BacktraceFrame, EcError,
    EcResult, ErrorKind, Imbalance, Resource,
};
