//! The control-flow execution engine.
//!
//! A program counter walks the immutable line table. Each statement handler
//! returns a [`Flow`]; the only ways the counter moves other than stepping to
//! the next line are the named transitions in `control.rs`.
//!
//! # Startup
//!
//! 1. `validate`: structural pre-pass; an imbalance stops the run
//! 2. registration: only `FN`/`CLASS` headers run, each jumping past its body,
//!    so calls can reference definitions further down
//! 3. execution: everything runs; definition bodies are skipped in place
//!
//! Errors leave handlers unlocated. [`Engine::step`] attaches the 1-based line,
//! the trimmed source text and a call-stack snapshot before they propagate.

mod builder;
mod control;
mod registry;
mod statements;

use std::sync::Arc;

use ec_diagnostic::{unknown_command, EcError, EcResult};
use ec_ir::{validate, Keyword, LineHead, Program};

use crate::diagnostics::{CallStack, EvalCounters};
use crate::input_handler::SharedInputHandler;
use crate::print_handler::SharedPrintHandler;
use crate::process::SharedProcessRunner;
use crate::store::Store;
use crate::{Limits, Value};

pub use builder::EngineBuilder;
pub use registry::{Class, Function};

use registry::Registry;
use statements::ArithOp;

/// What the dispatch loop does after a statement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Next,
    Jump(usize),
    Halt,
}

/// One active loop: its `LOOP` header and matching `ENDLOOP`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopFrame {
    pub start: usize,
    pub end: usize,
}

/// Owns all interpreter state for one program.
pub struct Engine {
    program: Arc<Program>,
    pc: usize,
    running: bool,
    store: Store,
    loops: Vec<LoopFrame>,
    calls: CallStack,
    functions: Registry<Function>,
    classes: Registry<Class>,
    return_value: f64,
    has_returned: bool,
    limits: Limits,
    print: SharedPrintHandler,
    input: SharedInputHandler,
    runner: SharedProcessRunner,
    counters: Option<EvalCounters>,
}

impl Engine {
    /// Engine with default configuration.
    pub fn new(program: Program) -> Self {
        EngineBuilder::new(program).build()
    }

    pub fn builder(program: Program) -> EngineBuilder {
        EngineBuilder::new(program)
    }

    /// Validate, register definitions, then execute from the first line.
    #[tracing::instrument(level = "debug", skip_all, fields(lines = self.program.len()))]
    pub fn run(&mut self) -> EcResult<()> {
        validate(&self.program)?;
        self.register_definitions()?;
        tracing::debug!(
            functions = self.functions.len(),
            classes = self.classes.len(),
            "registration complete"
        );
        self.execute()?;
        tracing::debug!("execution complete");
        Ok(())
    }

    /// Phase 1: run only `FN` and `CLASS` headers.
    fn register_definitions(&mut self) -> EcResult<()> {
        let program = Arc::clone(&self.program);
        self.pc = 0;
        self.running = true;
        while self.running && self.pc < program.len() {
            let flow = match program.keyword_at(self.pc) {
                Some(Keyword::Fn | Keyword::Class) => self.step(&program)?,
                _ => Flow::Next,
            };
            self.advance(flow);
        }
        Ok(())
    }

    /// Phase 2: run everything.
    fn execute(&mut self) -> EcResult<()> {
        let program = Arc::clone(&self.program);
        self.pc = 0;
        self.running = true;
        while self.running && self.pc < program.len() {
            let flow = self.step(&program)?;
            self.advance(flow);
        }
        Ok(())
    }

    fn advance(&mut self, flow: Flow) {
        match flow {
            Flow::Next => self.pc += 1,
            Flow::Jump(target) => self.pc = target,
            Flow::Halt => self.running = false,
        }
    }

    /// Dispatch the line at the program counter.
    fn step(&mut self, program: &Program) -> EcResult<Flow> {
        let Some(line) = program.line(self.pc) else {
            return Ok(Flow::Halt);
        };
        let result = match line.head() {
            LineHead::Blank | LineHead::Comment => return Ok(Flow::Next),
            LineHead::Unknown(word) => Err(unknown_command(word)),
            LineHead::Keyword(keyword) => {
                if let Some(counters) = &mut self.counters {
                    counters.count_statement();
                }
                tracing::trace!(
                    line = self.pc + 1,
                    keyword = %keyword,
                    function = self.calls.current_function(),
                    "dispatch"
                );
                self.dispatch(*keyword, line.args())
            }
        };
        result.map_err(|err| self.locate(err, self.pc, line.text()))
    }

    /// Attach position and call-stack context unless already present.
    fn locate(&self, err: EcError, pc: usize, text: &str) -> EcError {
        let err = err.locate(pc + 1, text);
        if err.backtrace().is_empty() && !self.calls.is_empty() {
            err.with_backtrace(self.calls.capture())
        } else {
            err
        }
    }

    fn dispatch(&mut self, keyword: Keyword, args: &str) -> EcResult<Flow> {
        match keyword {
            Keyword::Ec => self.exec_declare(args),
            Keyword::Set => self.exec_set(args),
            Keyword::Arr => self.exec_array(args),
            Keyword::Out => self.exec_out(args),
            Keyword::In => self.exec_input(args),
            Keyword::If => self.enter_if(args),
            Keyword::Elif | Keyword::Else => self.skip_to_endif(keyword),
            Keyword::EndIf | Keyword::EndClass => Ok(Flow::Next),
            Keyword::Loop => self.enter_loop(args),
            Keyword::EndLoop => Ok(self.exit_loop()),
            Keyword::Break => Ok(self.break_loop()),
            Keyword::Continue => Ok(self.continue_loop()),
            Keyword::Fn => self.define_function(args),
            Keyword::EndFn => Ok(self.return_from_call()),
            Keyword::Call => self.call(args),
            Keyword::Ret => self.exec_return(args),
            Keyword::Class => self.define_class(args),
            Keyword::New => self.exec_new(args),
            Keyword::Add => self.exec_arith(ArithOp::Add, args),
            Keyword::Sub => self.exec_arith(ArithOp::Sub, args),
            Keyword::Mul => self.exec_arith(ArithOp::Mul, args),
            Keyword::Div => self.exec_arith(ArithOp::Div, args),
            Keyword::Mod => self.exec_arith(ArithOp::Mod, args),
            Keyword::Exec => self.exec_shell(args),
            Keyword::PyRun => self.exec_python(args),
            Keyword::CRun => self.exec_c(args),
            Keyword::End => Ok(Flow::Halt),
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The visible value of a variable after (or during) the run.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.store.get(name)
    }

    /// Cells of the array bound to `name`.
    pub fn array(&self, name: &str) -> Option<&[f64]> {
        match self.store.get(name)? {
            Value::Array(id) => self.store.array(*id),
            _ => None,
        }
    }

    /// Value of the most recent `RET expr`, cleared by each `CALL`.
    pub fn return_value(&self) -> Option<f64> {
        self.has_returned.then_some(self.return_value)
    }

    /// Registered functions in registration order.
    pub fn functions(&self) -> &[Function] {
        self.functions.entries()
    }

    pub fn classes(&self) -> &[Class] {
        self.classes.entries()
    }

    /// `None` unless profiling was enabled on the builder.
    pub fn counters(&self) -> Option<&EvalCounters> {
        self.counters.as_ref()
    }

    /// Active loop frames, outermost first.
    pub fn loop_frames(&self) -> &[LoopFrame] {
        &self.loops
    }

    pub fn call_depth(&self) -> usize {
        self.calls.depth()
    }
}

#[cfg(test)]
mod tests;
