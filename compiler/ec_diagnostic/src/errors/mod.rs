//! Structured error values for the EC interpreter.
//!
//! `ErrorKind` provides typed error categories. Factory functions
//! (e.g., [`division_by_zero()`]) are the public construction API; the
//! `Display` impl of `ErrorKind` produces the human-readable message.
//!
//! Errors are created without a location by the store and the evaluator,
//! then located by the engine at the statement boundary via
//! [`EcError::locate`] and [`EcError::with_backtrace`].

use std::fmt;

use crate::ErrorCode;

/// Result alias used throughout the interpreter.
pub type EcResult<T> = Result<T, EcError>;

/// How a block failed to balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Imbalance {
    /// A close keyword appeared with no open block of its kind.
    UnexpectedClose,
    /// An open keyword was never closed.
    MissingClose,
}

/// Bounded resources whose exhaustion raises `CapacityExceeded`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Variables,
    Arrays,
    ArrayCells,
    Functions,
    Classes,
    LoopDepth,
    Parameters,
}

impl Resource {
    fn describe(self) -> &'static str {
        match self {
            Resource::Variables => "Too many variables declared",
            Resource::Arrays => "Too many arrays",
            Resource::ArrayCells => "Array too large",
            Resource::Functions => "Too many functions defined",
            Resource::Classes => "Too many classes defined",
            Resource::LoopDepth => "Loops nested too deeply",
            Resource::Parameters => "Too many parameters",
        }
    }
}

/// Typed error category.
///
/// Each variant carries the structured data of the failure so callers can
/// match on the kind instead of parsing message strings.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    // Structural
    StructuralImbalance {
        open: &'static str,
        close: &'static str,
        imbalance: Imbalance,
    },
    MalformedStatement {
        keyword: &'static str,
        usage: &'static str,
    },
    UnknownCommand {
        command: String,
    },

    // Storage
    UndefinedVariable {
        name: String,
    },
    UndefinedArray {
        name: String,
    },
    NotAnArray {
        name: String,
    },
    IndexOutOfBounds {
        index: i64,
        size: usize,
    },
    InvalidSize {
        size: f64,
    },
    CapacityExceeded {
        resource: Resource,
        limit: usize,
    },

    // Arithmetic
    DivisionByZero {
        modulo: bool,
    },
    InvalidExpression {
        expr: String,
        reason: &'static str,
    },

    // Calls and objects
    UnknownFunction {
        name: String,
    },
    UnknownClass {
        name: String,
    },
    StackOverflow {
        limit: usize,
    },

    // Host
    FileLoadFailure {
        path: String,
        reason: String,
    },
}

impl ErrorKind {
    /// The error code for this kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::StructuralImbalance { .. } => ErrorCode::E1001,
            Self::MalformedStatement { .. } => ErrorCode::E1002,
            Self::UnknownCommand { .. } => ErrorCode::E1003,
            Self::UndefinedVariable { .. } => ErrorCode::E6001,
            Self::UndefinedArray { .. } => ErrorCode::E6002,
            Self::NotAnArray { .. } => ErrorCode::E6003,
            Self::IndexOutOfBounds { .. } => ErrorCode::E6004,
            Self::InvalidSize { .. } => ErrorCode::E6005,
            Self::CapacityExceeded { .. } => ErrorCode::E6006,
            Self::DivisionByZero { .. } => ErrorCode::E6007,
            Self::InvalidExpression { .. } => ErrorCode::E6008,
            Self::UnknownFunction { .. } => ErrorCode::E6009,
            Self::UnknownClass { .. } => ErrorCode::E6010,
            Self::StackOverflow { .. } => ErrorCode::E6011,
            Self::FileLoadFailure { .. } => ErrorCode::E9001,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StructuralImbalance {
                open,
                close,
                imbalance: Imbalance::UnexpectedClose,
            } => write!(f, "Unexpected {close} without a matching {open}"),
            Self::StructuralImbalance {
                open,
                close,
                imbalance: Imbalance::MissingClose,
            } => write!(f, "Missing {close} for {open}"),
            Self::MalformedStatement { keyword, usage } => {
                write!(f, "{keyword} requires {usage}")
            }
            Self::UnknownCommand { command } => write!(f, "Unknown command '{command}'"),

            Self::UndefinedVariable { name } => write!(
                f,
                "Undefined variable '{name}'. Please declare it with 'EC' first."
            ),
            Self::UndefinedArray { name } => write!(f, "Undefined array '{name}'."),
            Self::NotAnArray { name } => write!(f, "Variable '{name}' is not an array."),
            Self::IndexOutOfBounds { index, size } => write!(
                f,
                "Array Index Out of Bounds: Index {index}, Size {size}."
            ),
            Self::InvalidSize { size } => {
                write!(f, "Array size must be positive (got {size})")
            }
            Self::CapacityExceeded { resource, limit } => {
                write!(f, "{} (Limit: {limit}).", resource.describe())
            }

            Self::DivisionByZero { modulo: false } => write!(f, "Division by zero."),
            Self::DivisionByZero { modulo: true } => write!(f, "Modulo by zero."),
            Self::InvalidExpression { expr, reason } => {
                write!(f, "Invalid expression syntax: '{expr}' ({reason})")
            }

            Self::UnknownFunction { name } => write!(f, "Function '{name}' not found"),
            Self::UnknownClass { name } => write!(f, "Class '{name}' not found"),
            Self::StackOverflow { limit } => {
                write!(f, "Stack Overflow: call depth limit exceeded (Limit: {limit}).")
            }

            Self::FileLoadFailure { path, reason } => {
                write!(f, "Cannot open file '{path}': {reason}")
            }
        }
    }
}

/// A single frame in an error backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// 1-based line of the CALL statement.
    pub line: usize,
    /// Name of the function that contains the CALL (`main` at top level).
    pub function: String,
}

/// Immutable snapshot of the call stack at an error site, innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Backtrace {
    frames: Vec<BacktraceFrame>,
}

impl Backtrace {
    /// Create a backtrace from frames ordered innermost first.
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for Backtrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            writeln!(f, "  at line {} (in {})", frame.line, frame.function)?;
        }
        Ok(())
    }
}

/// Interpreter error.
#[derive(Clone, Debug)]
pub struct EcError {
    kind: ErrorKind,
    /// 1-based line where the failure happened.
    line: Option<usize>,
    /// Trimmed source text of that line.
    source_text: Option<String>,
    backtrace: Backtrace,
}

impl EcError {
    /// Create an unlocated error of the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            line: None,
            source_text: None,
            backtrace: Backtrace::default(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// The human-readable message (without location).
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn source_text(&self) -> Option<&str> {
        self.source_text.as_deref()
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Attach a 1-based line and its source text, unless already located.
    ///
    /// Structural errors are located where the imbalance was detected, which
    /// is not necessarily the statement being executed.
    #[must_use]
    pub fn locate(mut self, line: usize, source_text: &str) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
            self.source_text = Some(source_text.trim().to_string());
        }
        self
    }

    /// Attach a call-stack snapshot.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: Backtrace) -> Self {
        self.backtrace = backtrace;
        self
    }
}

impl fmt::Display for EcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]", self.code())?;
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for EcError {}

impl From<ErrorKind> for EcError {
    fn from(kind: ErrorKind) -> Self {
        EcError::new(kind)
    }
}

// Factory functions

/// A close keyword with no open block of its kind.
pub fn unexpected_close(open: &'static str, close: &'static str) -> EcError {
    EcError::new(ErrorKind::StructuralImbalance {
        open,
        close,
        imbalance: Imbalance::UnexpectedClose,
    })
}

/// An open keyword that is never closed.
pub fn missing_close(open: &'static str, close: &'static str) -> EcError {
    EcError::new(ErrorKind::StructuralImbalance {
        open,
        close,
        imbalance: Imbalance::MissingClose,
    })
}

pub fn malformed_statement(keyword: &'static str, usage: &'static str) -> EcError {
    EcError::new(ErrorKind::MalformedStatement { keyword, usage })
}

pub fn unknown_command(command: &str) -> EcError {
    EcError::new(ErrorKind::UnknownCommand {
        command: command.to_string(),
    })
}

pub fn undefined_variable(name: &str) -> EcError {
    EcError::new(ErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

pub fn undefined_array(name: &str) -> EcError {
    EcError::new(ErrorKind::UndefinedArray {
        name: name.to_string(),
    })
}

pub fn not_an_array(name: &str) -> EcError {
    EcError::new(ErrorKind::NotAnArray {
        name: name.to_string(),
    })
}

pub fn index_out_of_bounds(index: i64, size: usize) -> EcError {
    EcError::new(ErrorKind::IndexOutOfBounds { index, size })
}

pub fn invalid_size(size: f64) -> EcError {
    EcError::new(ErrorKind::InvalidSize { size })
}

pub fn capacity_exceeded(resource: Resource, limit: usize) -> EcError {
    EcError::new(ErrorKind::CapacityExceeded { resource, limit })
}

pub fn division_by_zero() -> EcError {
    EcError::new(ErrorKind::DivisionByZero { modulo: false })
}

pub fn modulo_by_zero() -> EcError {
    EcError::new(ErrorKind::DivisionByZero { modulo: true })
}

pub fn invalid_expression(expr: &str, reason: &'static str) -> EcError {
    EcError::new(ErrorKind::InvalidExpression {
        expr: expr.to_string(),
        reason,
    })
}

pub fn unknown_function(name: &str) -> EcError {
    EcError::new(ErrorKind::UnknownFunction {
        name: name.to_string(),
    })
}

pub fn unknown_class(name: &str) -> EcError {
    EcError::new(ErrorKind::UnknownClass {
        name: name.to_string(),
    })
}

pub fn stack_overflow(limit: usize) -> EcError {
    EcError::new(ErrorKind::StackOverflow { limit })
}

pub fn file_load_failure(path: &str, reason: impl fmt::Display) -> EcError {
    EcError::new(ErrorKind::FileLoadFailure {
        path: path.to_string(),
        reason: reason.to_string(),
    })
}
