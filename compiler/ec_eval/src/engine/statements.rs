//! Data, I/O and external-process statements.

use ec_diagnostic::{
    division_by_zero, invalid_expression, malformed_statement, modulo_by_zero, unknown_class,
    EcResult,
};

use super::{Engine, Flow};
use crate::expr::{evaluate_expression, evaluate_string};
use crate::process::{c_command, python_command};
use crate::{ClassId, Value};

/// Read-modify-write arithmetic statements.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    fn keyword(self) -> &'static str {
        match self {
            ArithOp::Add => "ADD",
            ArithOp::Sub => "SUB",
            ArithOp::Mul => "MUL",
            ArithOp::Div => "DIV",
            ArithOp::Mod => "MOD",
        }
    }

    fn apply(self, current: f64, operand: f64) -> EcResult<f64> {
        match self {
            ArithOp::Add => Ok(current + operand),
            ArithOp::Sub => Ok(current - operand),
            ArithOp::Mul => Ok(current * operand),
            ArithOp::Div if operand == 0.0 => Err(division_by_zero()),
            ArithOp::Div => Ok(current / operand),
            ArithOp::Mod if operand == 0.0 => Err(modulo_by_zero()),
            ArithOp::Mod => Ok(current % operand),
        }
    }
}

/// First word and the trimmed remainder.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    text.split_once(char::is_whitespace)
        .map_or((text, ""), |(word, rest)| (word, rest.trim()))
}

fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// Split `"quoted" rest`, failing with `usage` when the quotes are missing.
fn quoted_head<'a>(
    keyword: &'static str,
    args: &'a str,
    usage: &'static str,
) -> EcResult<(&'a str, &'a str)> {
    args.trim()
        .strip_prefix('"')
        .and_then(|body| body.split_once('"'))
        .ok_or_else(|| malformed_statement(keyword, usage))
}

/// Index of the bracket closing the one at `open`.
fn matching_close(text: &str, open: usize, open_ch: char, close_ch: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        if c == open_ch {
            depth += 1;
        } else if c == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(open + i);
            }
        }
    }
    None
}

impl Engine {
    /// A quoted literal becomes a String, anything else a Number.
    fn assigned_value(&self, keyword: &'static str, text: &str) -> EcResult<Value> {
        if let Some(body) = text.strip_prefix('"') {
            return match body.rfind('"') {
                Some(end) => Ok(Value::Str(body[..end].to_string())),
                None => Err(malformed_statement(
                    keyword,
                    "a closing '\"' for the string value",
                )),
            };
        }
        evaluate_expression(text, &self.store).map(Value::Number)
    }

    /// `EC name [value]`
    pub(super) fn exec_declare(&mut self, args: &str) -> EcResult<Flow> {
        let (name, rest) = split_word(args);
        if name.is_empty() {
            return Err(malformed_statement("EC", "a variable name"));
        }
        self.store.declare_or_get(name)?;
        if !rest.is_empty() {
            let value = self.assigned_value("EC", rest)?;
            *self.store.declare_or_get(name)? = value;
        }
        Ok(Flow::Next)
    }

    /// `SET name value` or `SET name[index] value`
    pub(super) fn exec_set(&mut self, args: &str) -> EcResult<Flow> {
        let (target, rest) = split_word(args);
        if let Some(open) = target.find('[') {
            return self.set_element(args.trim(), open);
        }
        if target.is_empty() || rest.is_empty() {
            return Err(malformed_statement("SET", "a variable and a value"));
        }
        self.store.get_checked(target)?;
        let value = self.assigned_value("SET", rest)?;
        *self.store.get_checked_mut(target)? = value;
        Ok(Flow::Next)
    }

    fn set_element(&mut self, text: &str, open: usize) -> EcResult<Flow> {
        let Some(close) = matching_close(text, open, '[', ']') else {
            return Err(invalid_expression(text, "missing closing bracket ']'"));
        };
        let name = text[..open].trim();
        let value_text = text[close + 1..].trim();
        if name.is_empty() || value_text.is_empty() {
            return Err(malformed_statement("SET", "a variable and a value"));
        }
        let index = evaluate_expression(&text[open + 1..close], &self.store)?;
        let value = evaluate_expression(value_text, &self.store)?;
        self.store.write_element(name, index, value)?;
        Ok(Flow::Next)
    }

    /// `ARR name size`
    pub(super) fn exec_array(&mut self, args: &str) -> EcResult<Flow> {
        let (name, size) = split_word(args);
        if name.is_empty() || size.is_empty() {
            return Err(malformed_statement("ARR", "a name and a size"));
        }
        let size = evaluate_expression(size, &self.store)?;
        self.store.create_array(name, size)?;
        Ok(Flow::Next)
    }

    /// `OUT part + part + ...`
    pub(super) fn exec_out(&mut self, args: &str) -> EcResult<Flow> {
        let mut line = String::new();
        for part in args.trim().split(" + ") {
            line.push_str(&evaluate_string(part, &self.store)?);
        }
        self.print.println(&line);
        Ok(Flow::Next)
    }

    /// `IN name ["prompt"]`
    pub(super) fn exec_input(&mut self, args: &str) -> EcResult<Flow> {
        let (name, prompt) = split_word(args);
        if name.is_empty() {
            return Err(malformed_statement("IN", "a variable name"));
        }
        if let Some(prompt) = prompt.strip_prefix('"') {
            self.print.print(prompt.strip_suffix('"').unwrap_or(prompt));
        }
        if let Some(line) = self.input.read_line() {
            *self.store.declare_or_get(name)? = Value::from_captured(line);
        }
        Ok(Flow::Next)
    }

    /// `ADD|SUB|MUL|DIV|MOD name expr`
    pub(super) fn exec_arith(&mut self, op: ArithOp, args: &str) -> EcResult<Flow> {
        let (name, expr) = split_word(args);
        if name.is_empty() || expr.is_empty() {
            return Err(malformed_statement(op.keyword(), "a variable and a value"));
        }
        self.store.get_checked(name)?;
        let operand = evaluate_expression(expr, &self.store)?;
        let slot = self.store.get_checked_mut(name)?;
        *slot = Value::Number(op.apply(slot.to_number(), operand)?);
        Ok(Flow::Next)
    }

    /// `NEW var Class`
    pub(super) fn exec_new(&mut self, args: &str) -> EcResult<Flow> {
        let (var, rest) = split_word(args);
        let class = first_word(rest);
        if var.is_empty() || class.is_empty() {
            return Err(malformed_statement("NEW", "a variable and a class name"));
        }
        let Some((index, _)) = self.classes.lookup(class) else {
            return Err(unknown_class(class));
        };
        *self.store.declare_or_get(var)? = Value::Object(ClassId(index));
        Ok(Flow::Next)
    }

    fn run_external(&mut self, command: &str) -> String {
        if let Some(counters) = &mut self.counters {
            counters.count_external_command();
        }
        self.runner.run(command)
    }

    /// `EXEC "command" [var]` or `EXEC command`
    pub(super) fn exec_shell(&mut self, args: &str) -> EcResult<Flow> {
        let text = args.trim();
        if text.is_empty() {
            return Err(malformed_statement("EXEC", "a command"));
        }
        let (command, target) = if text.starts_with('"') {
            let (command, rest) =
                quoted_head("EXEC", text, "a closing '\"' after the command")?;
            (command, first_word(rest))
        } else {
            (text, "")
        };
        let output = self.run_external(command);
        if !target.is_empty() {
            *self.store.declare_or_get(target)? = Value::Str(output);
        }
        Ok(Flow::Next)
    }

    /// `PYRUN "script.py" [func(args)] [var]`
    pub(super) fn exec_python(&mut self, args: &str) -> EcResult<Flow> {
        let (script, rest) = quoted_head("PYRUN", args, "a quoted script path")?;
        let rest = rest.trim();

        let (call, target) = match rest.find('(') {
            Some(open) => {
                let function = rest[..open].trim();
                if function.is_empty() {
                    return Err(malformed_statement(
                        "PYRUN",
                        "a function name before '('",
                    ));
                }
                let Some(close) = matching_close(rest, open, '(', ')') else {
                    return Err(malformed_statement(
                        "PYRUN",
                        "a closing ')' after the function arguments",
                    ));
                };
                (
                    Some((function, &rest[open + 1..close])),
                    first_word(&rest[close + 1..]),
                )
            }
            None => (None, first_word(rest)),
        };

        let output = self.run_external(&python_command(script, call));
        if !target.is_empty() {
            *self.store.declare_or_get(target)? = Value::from_captured(output);
        }
        Ok(Flow::Next)
    }

    /// `CRUN "source.c" [var]`
    ///
    /// The binary lives in a fresh temporary directory removed after the run.
    pub(super) fn exec_c(&mut self, args: &str) -> EcResult<Flow> {
        let (source, rest) = quoted_head("CRUN", args, "a quoted source path")?;
        let target = first_word(rest);

        let output = match tempfile::Builder::new().prefix("ec-crun").tempdir() {
            Ok(dir) => {
                let binary = dir
                    .path()
                    .join(if cfg!(windows) { "prog.exe" } else { "prog" });
                let output = self.run_external(&c_command(source, &binary));
                if let Err(err) = dir.close() {
                    tracing::warn!(error = %err, "failed to remove compiled binary");
                }
                output
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to create a directory for the compiled binary");
                String::new()
            }
        };

        if !target.is_empty() {
            *self.store.declare_or_get(target)? = Value::from_captured(output);
        }
        Ok(Flow::Next)
    }
}
