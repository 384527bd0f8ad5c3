//! `EngineBuilder` for creating engines with various configurations.

use std::sync::Arc;

use ec_diagnostic::Resource;
use ec_ir::Program;

use super::registry::Registry;
use super::Engine;
use crate::diagnostics::{CallStack, EvalCounters};
use crate::input_handler::{stdin_handler, SharedInputHandler};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::process::{system_runner, SharedProcessRunner};
use crate::store::Store;
use crate::{Limits, ParamScoping};

/// Builder for [`Engine`].
///
/// Defaults: [`Limits::default`], [`ParamScoping::PerCall`], stdout, stdin,
/// the system process runner, profiling off.
pub struct EngineBuilder {
    program: Program,
    limits: Limits,
    scoping: ParamScoping,
    print_handler: Option<SharedPrintHandler>,
    input_handler: Option<SharedInputHandler>,
    process_runner: Option<SharedProcessRunner>,
    profile: bool,
}

impl EngineBuilder {
    pub fn new(program: Program) -> Self {
        EngineBuilder {
            program,
            limits: Limits::default(),
            scoping: ParamScoping::default(),
            print_handler: None,
            input_handler: None,
            process_runner: None,
            profile: false,
        }
    }

    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn param_scoping(mut self, scoping: ParamScoping) -> Self {
        self.scoping = scoping;
        self
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn input_handler(mut self, handler: SharedInputHandler) -> Self {
        self.input_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn process_runner(mut self, runner: SharedProcessRunner) -> Self {
        self.process_runner = Some(runner);
        self
    }

    /// Enable [`EvalCounters`].
    #[must_use]
    pub fn profile(mut self, enabled: bool) -> Self {
        self.profile = enabled;
        self
    }

    pub fn build(self) -> Engine {
        let limits = self.limits;
        Engine {
            program: Arc::new(self.program),
            pc: 0,
            running: false,
            store: Store::new(limits, self.scoping),
            loops: Vec::new(),
            calls: CallStack::new(limits.max_call_depth),
            functions: Registry::new(limits.max_functions, Resource::Functions),
            classes: Registry::new(limits.max_classes, Resource::Classes),
            return_value: 0.0,
            has_returned: false,
            limits,
            print: self.print_handler.unwrap_or_else(stdout_handler),
            input: self.input_handler.unwrap_or_else(stdin_handler),
            runner: self.process_runner.unwrap_or_else(system_runner),
            counters: self.profile.then(EvalCounters::default),
        }
    }
}
