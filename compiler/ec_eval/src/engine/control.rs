//! Named control-flow transitions.
//!
//! Block ends are re-scanned on every use; nothing is cached.

use std::sync::Arc;

use ec_diagnostic::{
    capacity_exceeded, malformed_statement, missing_close, unexpected_close, unknown_function,
    EcResult, Resource,
};
use ec_ir::{BlockKind, BranchPoint, Keyword};

use super::registry::{parse_function_header, scan_class_body, Class, Function};
use super::{Engine, Flow, LoopFrame};
use crate::diagnostics::CallFrame;
use crate::expr::{evaluate_condition, evaluate_expression, split_arguments};
use crate::Value;

impl Engine {
    fn block_end(&self, kind: BlockKind) -> EcResult<usize> {
        self.program.find_block_end(self.pc, kind).ok_or_else(|| {
            missing_close(
                kind.open_keyword().as_str(),
                kind.close_keyword().as_str(),
            )
        })
    }

    /// `IF`: fall into the body when true, otherwise look for a branch.
    pub(super) fn enter_if(&mut self, condition: &str) -> EcResult<Flow> {
        if evaluate_condition(condition, &self.store)? {
            Ok(Flow::Next)
        } else {
            self.skip_branch()
        }
    }

    /// Resume after the first `ELSE`, the first true `ELIF`, or `ENDIF`.
    fn skip_branch(&mut self) -> EcResult<Flow> {
        let program = Arc::clone(&self.program);
        for point in program.if_branches(self.pc) {
            match point {
                BranchPoint::Elif { line, condition } => {
                    let taken = evaluate_condition(condition, &self.store).map_err(|err| {
                        let text = program.line(line).map_or("", |l| l.text());
                        self.locate(err, line, text)
                    })?;
                    if taken {
                        return Ok(Flow::Jump(line + 1));
                    }
                }
                BranchPoint::Else { line } | BranchPoint::EndIf { line } => {
                    return Ok(Flow::Jump(line + 1));
                }
            }
        }
        Err(missing_close("IF", "ENDIF"))
    }

    /// `ELIF`/`ELSE` reached by falling out of a taken branch.
    ///
    /// The validator balances every `IF` with an `ENDIF`, so a branch word
    /// with no `ENDIF` ahead of it belongs to no `IF` at all.
    pub(super) fn skip_to_endif(&mut self, branch: Keyword) -> EcResult<Flow> {
        match self.program.find_block_end(self.pc, BlockKind::If) {
            Some(end) => Ok(Flow::Jump(end + 1)),
            None => Err(unexpected_close("IF", branch.as_str())),
        }
    }

    /// Loop frames opened by the current call (or at top level).
    fn loop_base(&self) -> usize {
        self.calls.top().map_or(0, |frame| frame.loop_depth)
    }

    fn active_loop(&self) -> Option<LoopFrame> {
        if self.loops.len() > self.loop_base() {
            self.loops.last().copied()
        } else {
            None
        }
    }

    /// `LOOP [cond]`: test the condition and enter the body or skip it.
    ///
    /// Re-entry through `CONTINUE` replaces the frame this header already
    /// owns instead of stacking a second one.
    pub(super) fn enter_loop(&mut self, condition: &str) -> EcResult<Flow> {
        let header = self.pc;
        let end = self.block_end(BlockKind::Loop)?;

        if self.active_loop().is_some_and(|frame| frame.start == header) {
            self.loops.pop();
        }

        if !condition.is_empty() && !evaluate_condition(condition, &self.store)? {
            return Ok(Flow::Jump(end + 1));
        }

        if self.loops.len() >= self.limits.max_loop_depth {
            return Err(capacity_exceeded(
                Resource::LoopDepth,
                self.limits.max_loop_depth,
            ));
        }
        self.loops.push(LoopFrame { start: header, end });
        if let Some(counters) = &mut self.counters {
            counters.count_loop_iteration();
        }
        Ok(Flow::Next)
    }

    /// `ENDLOOP`: pop and go back to the header to re-test.
    pub(super) fn exit_loop(&mut self) -> Flow {
        match self.active_loop() {
            Some(frame) => {
                self.loops.pop();
                Flow::Jump(frame.start)
            }
            None => Flow::Next,
        }
    }

    /// `BREAK`: pop and resume after `ENDLOOP`.
    pub(super) fn break_loop(&mut self) -> Flow {
        match self.active_loop() {
            Some(frame) => {
                self.loops.pop();
                Flow::Jump(frame.end + 1)
            }
            None => Flow::Next,
        }
    }

    /// `CONTINUE`: back to the header, frame kept for re-entry.
    pub(super) fn continue_loop(&mut self) -> Flow {
        match self.active_loop() {
            Some(frame) => Flow::Jump(frame.start),
            None => Flow::Next,
        }
    }

    /// `FN`: register on first sight, then skip the body.
    pub(super) fn define_function(&mut self, args: &str) -> EcResult<Flow> {
        let start = self.pc;
        let end = self.block_end(BlockKind::Fn)?;
        if !self.functions.is_registered_at(start) {
            let (name, params) = parse_function_header(args)?;
            if params.len() > self.limits.max_params {
                return Err(capacity_exceeded(
                    Resource::Parameters,
                    self.limits.max_params,
                ));
            }
            tracing::debug!(%name, line = start + 1, params = params.len(), "registered function");
            self.functions.insert(Function {
                name,
                start,
                end,
                params,
            })?;
        }
        Ok(Flow::Jump(end + 1))
    }

    /// `CLASS`: record metadata on first sight, then skip the body.
    pub(super) fn define_class(&mut self, args: &str) -> EcResult<Flow> {
        let start = self.pc;
        let end = self.block_end(BlockKind::Class)?;
        if !self.classes.is_registered_at(start) {
            let Some(name) = args.split_whitespace().next() else {
                return Err(malformed_statement("CLASS", "a class name"));
            };
            let (members, methods) = scan_class_body(&self.program, start, end);
            tracing::debug!(name, line = start + 1, "registered class");
            self.classes.insert(Class {
                name: name.to_string(),
                start,
                end,
                members,
                methods,
            })?;
        }
        Ok(Flow::Jump(end + 1))
    }

    /// `CALL name(args)` or `CALL name args`.
    pub(super) fn call(&mut self, args: &str) -> EcResult<Flow> {
        let (name, arg_text) = parse_call(args)?;
        let Some((_, function)) = self.functions.lookup(name) else {
            return Err(unknown_function(name));
        };
        let start = function.start;
        let callee = function.name.clone();
        let params = function.params.clone();

        let values = split_arguments(arg_text)
            .into_iter()
            .map(|arg| match arg.strip_prefix('"') {
                Some(text) => Ok(Value::Str(text.strip_suffix('"').unwrap_or(text).to_string())),
                None => evaluate_expression(arg, &self.store).map(Value::Number),
            })
            .collect::<EcResult<Vec<_>>>()?;

        let caller = self.calls.current_function().to_string();
        self.calls.push(CallFrame {
            return_line: self.pc,
            callee,
            caller,
            loop_depth: self.loops.len(),
        })?;
        if let Err(err) = self.store.enter_call(&params, values) {
            self.calls.pop();
            return Err(err);
        }

        self.has_returned = false;
        if let Some(counters) = &mut self.counters {
            counters.count_function_call();
        }
        tracing::debug!(
            function = name,
            depth = self.calls.depth(),
            line = self.pc + 1,
            "call"
        );
        Ok(Flow::Jump(start + 1))
    }

    /// `RET [expr]`.
    pub(super) fn exec_return(&mut self, args: &str) -> EcResult<Flow> {
        if !args.is_empty() {
            self.return_value = evaluate_expression(args, &self.store)?;
            self.has_returned = true;
        }
        Ok(self.return_from_call())
    }

    /// Leave the current call, or do nothing at top level.
    ///
    /// Loop frames opened inside the call are discarded with it.
    pub(super) fn return_from_call(&mut self) -> Flow {
        match self.calls.pop() {
            Some(frame) => {
                self.loops.truncate(frame.loop_depth);
                self.store.leave_call();
                tracing::debug!(function = %frame.callee, "return");
                Flow::Jump(frame.return_line + 1)
            }
            None => Flow::Next,
        }
    }
}

/// Split a `CALL` operand into the function name and its argument text.
fn parse_call(args: &str) -> EcResult<(&str, &str)> {
    let (name, arg_text) = match args.split_once('(') {
        Some((name, rest)) => {
            let Some(close) = rest.rfind(')') else {
                return Err(malformed_statement(
                    "CALL",
                    "a closing ')' after the arguments",
                ));
            };
            (name.trim(), &rest[..close])
        }
        None => args
            .split_once(char::is_whitespace)
            .map_or((args, ""), |(name, rest)| (name, rest.trim())),
    };
    if name.is_empty() {
        return Err(malformed_statement("CALL", "a function name"));
    }
    Ok((name, arg_text))
}
