//! Diagnostic infrastructure for the engine.
//!
//! - `CallStack`: live call frames, depth-limited, snapshotted into a
//!   [`Backtrace`] when an error is located
//! - `EvalCounters`: optional counters for `--profile`

use ec_diagnostic::{stack_overflow, Backtrace, BacktraceFrame, EcResult};

/// One active `CALL`.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// 0-based index of the `CALL` line; execution resumes after it.
    pub return_line: usize,
    pub callee: String,
    /// Function the call was made from, `main` at top level.
    pub caller: String,
    /// Loop frames open when the call was made; frames above this
    /// belong to the callee.
    pub loop_depth: usize,
}

#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: usize,
}

impl CallStack {
    pub fn new(max_depth: usize) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit.
    ///
    /// The frame is NOT pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> EcResult<()> {
        if self.frames.len() >= self.max_depth {
            return Err(stack_overflow(self.max_depth));
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Name of the function currently executing.
    pub fn current_function(&self) -> &str {
        self.top().map_or("main", |frame| frame.callee.as_str())
    }

    /// Snapshot the stack, innermost call first.
    pub fn capture(&self) -> Backtrace {
        Backtrace::new(
            self.frames
                .iter()
                .rev()
                .map(|frame| BacktraceFrame {
                    line: frame.return_line + 1,
                    function: frame.caller.clone(),
                })
                .collect(),
        )
    }
}

/// Counters for `--profile`.
///
/// Held as `Option<EvalCounters>` by the engine; when `None` nothing is
/// counted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalCounters {
    pub statements_executed: u64,
    pub function_calls: u64,
    pub loop_iterations: u64,
    pub external_commands: u64,
}

impl EvalCounters {
    #[inline]
    pub fn count_statement(&mut self) {
        self.statements_executed = self.statements_executed.wrapping_add(1);
    }

    #[inline]
    pub fn count_function_call(&mut self) {
        self.function_calls = self.function_calls.wrapping_add(1);
    }

    #[inline]
    pub fn count_loop_iteration(&mut self) {
        self.loop_iterations = self.loop_iterations.wrapping_add(1);
    }

    #[inline]
    pub fn count_external_command(&mut self) {
        self.external_commands = self.external_commands.wrapping_add(1);
    }

    /// Format a summary report.
    pub fn report(&self) -> String {
        format!(
            "Evaluation profile:\n  \
             Statements executed: {}\n  \
             Function calls:      {}\n  \
             Loop iterations:     {}\n  \
             External commands:   {}",
            self.statements_executed,
            self.function_calls,
            self.loop_iterations,
            self.external_commands,
        )
    }
}
