//! EC evaluator: variable store, expression evaluation and the
//! control-flow engine.
//!
//! ```text
//! Program ──► Engine::run()
//!               ├── validate()               (ec_ir)
//!               ├── registration pass        FN / CLASS headers only
//!               └── execution pass           dispatch → Flow
//!                     ├── Store              variables, arrays, call scopes
//!                     ├── expr               expressions, strings, conditions
//!                     └── handlers           print, input, process runner
//! ```

mod config;
mod diagnostics;
mod engine;
mod expr;
mod format;
mod input_handler;
mod print_handler;
mod process;
mod stack;
mod store;
mod value;

pub use config::{Limits, ParamScoping};
pub use diagnostics::{CallFrame, CallStack, EvalCounters};
pub use engine::{Class, Engine, EngineBuilder, Function, LoopFrame};
pub use expr::{evaluate_condition, evaluate_expression, evaluate_string, split_arguments};
pub use format::format_number;
pub use input_handler::{scripted_input, stdin_handler, InputHandlerImpl, SharedInputHandler};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use process::{
    c_command, disabled_runner, python_command, scripted_runner, system_runner, ProcessRunner,
    ScriptedRunner, SharedProcessRunner,
};
pub use stack::ensure_sufficient_stack;
pub use store::Store;
pub use value::{numeric_prefix, parse_number, ArrayId, ClassId, Value, ValueType};
