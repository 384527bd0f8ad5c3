//! Error codes for all interpreter diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating where the failure was detected.

use std::fmt;

/// Error codes for all interpreter diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Structural / statement-shape errors
/// - E6xxx: Runtime / eval errors
/// - E9xxx: Host errors (loading source files)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Structural Errors (E1xxx)
    /// Unbalanced IF/LOOP/FN/CLASS block
    E1001,
    /// Statement is missing mandatory operands
    E1002,
    /// Unknown command keyword
    E1003,

    // Runtime / Eval Errors (E6xxx)
    /// Undefined variable
    E6001,
    /// Undefined array
    E6002,
    /// Variable is not an array
    E6003,
    /// Array index out of bounds
    E6004,
    /// Invalid array size
    E6005,
    /// Resource limit exceeded
    E6006,
    /// Division or modulo by zero
    E6007,
    /// Invalid expression syntax
    E6008,
    /// Unknown function
    E6009,
    /// Unknown class
    E6010,
    /// Call stack exhausted
    E6011,

    // Host Errors (E9xxx)
    /// Source file could not be loaded
    E9001,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E6004,
        ErrorCode::E6005,
        ErrorCode::E6006,
        ErrorCode::E6007,
        ErrorCode::E6008,
        ErrorCode::E6009,
        ErrorCode::E6010,
        ErrorCode::E6011,
        ErrorCode::E9001,
    ];

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6008 => "E6008",
            ErrorCode::E6009 => "E6009",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line description used by `--explain` style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "unbalanced IF/LOOP/FN/CLASS block",
            ErrorCode::E1002 => "statement is missing mandatory operands",
            ErrorCode::E1003 => "unknown command keyword",
            ErrorCode::E6001 => "undefined variable",
            ErrorCode::E6002 => "undefined array",
            ErrorCode::E6003 => "variable is not an array",
            ErrorCode::E6004 => "array index out of bounds",
            ErrorCode::E6005 => "array size must be positive",
            ErrorCode::E6006 => "resource limit exceeded",
            ErrorCode::E6007 => "division or modulo by zero",
            ErrorCode::E6008 => "invalid expression syntax",
            ErrorCode::E6009 => "unknown function",
            ErrorCode::E6010 => "unknown class",
            ErrorCode::E6011 => "call stack exhausted",
            ErrorCode::E9001 => "source file could not be loaded",
        }
    }

    /// Check if this is a structural (pre-execution shape) error.
    pub fn is_structural_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a runtime evaluation error.
    pub fn is_eval_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    /// Check if this is a host error.
    pub fn is_host_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
