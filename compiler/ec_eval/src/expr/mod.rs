//! Expression, string and condition evaluation.
//!
//! Expressions are evaluated straight from source text with two precedence
//! levels (`* / %` over `+ -`), left-associative within a level. Operators
//! split only at nesting depth zero, where parentheses and brackets both count
//! as nesting. A parenthesised operand, a negated operand or an array index
//! recurses into [`evaluate_expression`].
//!
//! None of these functions locate their errors; the engine does that at the
//! statement boundary.

use ec_diagnostic::{division_by_zero, invalid_expression, modulo_by_zero, EcResult};
use smallvec::SmallVec;

use crate::format::format_number;
use crate::stack::ensure_sufficient_stack;
use crate::store::Store;
use crate::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '%' => Some(BinaryOp::Mod),
            _ => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 2,
        }
    }

    fn apply(self, a: f64, b: f64) -> EcResult<f64> {
        match self {
            BinaryOp::Add => Ok(a + b),
            BinaryOp::Sub => Ok(a - b),
            BinaryOp::Mul => Ok(a * b),
            BinaryOp::Div if b == 0.0 => Err(division_by_zero()),
            BinaryOp::Div => Ok(a / b),
            BinaryOp::Mod if b == 0.0 => Err(modulo_by_zero()),
            BinaryOp::Mod => Ok(a % b),
        }
    }
}

/// Operand and operator stacks for one expression.
struct Reducer<'e> {
    expr: &'e str,
    values: SmallVec<[f64; 8]>,
    ops: SmallVec<[BinaryOp; 8]>,
}

impl<'e> Reducer<'e> {
    fn new(expr: &'e str) -> Self {
        Reducer {
            expr,
            values: SmallVec::new(),
            ops: SmallVec::new(),
        }
    }

    fn reduce_once(&mut self) -> EcResult<()> {
        let (Some(op), Some(b), Some(a)) = (self.ops.pop(), self.values.pop(), self.values.pop())
        else {
            return Err(invalid_expression(self.expr, "missing operand"));
        };
        self.values.push(op.apply(a, b)?);
        Ok(())
    }

    /// Reduce while the stacked operator binds at least as tightly as `op`.
    fn push_op(&mut self, op: BinaryOp) -> EcResult<()> {
        while self
            .ops
            .last()
            .is_some_and(|top| top.precedence() >= op.precedence())
        {
            self.reduce_once()?;
        }
        self.ops.push(op);
        Ok(())
    }

    fn finish(mut self) -> EcResult<f64> {
        while !self.ops.is_empty() {
            self.reduce_once()?;
        }
        match self.values.as_slice() {
            [value] => Ok(*value),
            _ => Err(invalid_expression(self.expr, "operator/operand mismatch")),
        }
    }
}

/// Evaluate arithmetic text to a number. Empty text is zero.
pub fn evaluate_expression(text: &str, store: &Store) -> EcResult<f64> {
    let expr = text.trim();
    if expr.is_empty() {
        return Ok(0.0);
    }

    let mut reducer = Reducer::new(expr);
    let mut token = String::new();
    let mut depth = 0i32;

    for c in expr.chars() {
        match c {
            '(' | '[' => {
                depth += 1;
                token.push(c);
            }
            ')' | ']' => {
                depth -= 1;
                token.push(c);
            }
            _ if depth == 0 => {
                let Some(op) = BinaryOp::from_char(c) else {
                    token.push(c);
                    continue;
                };
                let pending = token.trim();
                if pending.is_empty() {
                    if op == BinaryOp::Sub {
                        // No operand yet: unary minus, folded into the operand.
                        token.push(c);
                        continue;
                    }
                } else {
                    reducer.values.push(resolve_operand(pending, store)?);
                }
                token.clear();
                reducer.push_op(op)?;
            }
            _ => token.push(c),
        }
    }

    let pending = token.trim();
    if !pending.is_empty() {
        reducer.values.push(resolve_operand(pending, store)?);
    }
    reducer.finish()
}

/// Resolve one operand: literal, negation, group, array element, variable.
fn resolve_operand(token: &str, store: &Store) -> EcResult<f64> {
    if let Ok(number) = token.parse::<f64>() {
        return Ok(number);
    }

    if let Some(rest) = token.strip_prefix('-') {
        let rest = rest.trim();
        return ensure_sufficient_stack(|| resolve_operand(rest, store)).map(|v| -v);
    }

    if let Some(inner) = token.strip_prefix('(') {
        let Some(inner) = inner.strip_suffix(')') else {
            return Err(invalid_expression(token, "missing closing ')'"));
        };
        return ensure_sufficient_stack(|| evaluate_expression(inner, store));
    }

    if let Some((name, rest)) = token.split_once('[') {
        let Some(index_expr) = rest.strip_suffix(']') else {
            return Err(invalid_expression(token, "missing closing bracket ']'"));
        };
        let index = ensure_sufficient_stack(|| evaluate_expression(index_expr, store))?;
        return store.read_element(name.trim(), index);
    }

    Ok(store.get_checked(token)?.to_number())
}

/// Render text for output: a quoted literal, a string variable's text, or a
/// formatted number.
pub fn evaluate_string(text: &str, store: &Store) -> EcResult<String> {
    let text = text.trim();
    if let Some(literal) = quoted(text) {
        return Ok(literal.to_string());
    }
    if let Some(Value::Str(s)) = store.get(text) {
        return Ok(s.clone());
    }
    evaluate_expression(text, store).map(format_number)
}

/// Comparison operators in search priority order.
const COMPARISONS: [(&str, fn(f64, f64) -> bool); 6] = [
    ("==", |a, b| a == b),
    ("!=", |a, b| a != b),
    (">=", |a, b| a >= b),
    ("<=", |a, b| a <= b),
    (">", |a, b| a > b),
    ("<", |a, b| a < b),
];

/// Evaluate a condition.
///
/// The first operator in [`COMPARISONS`] order that occurs anywhere in the
/// text splits it at that operator's first occurrence. With no operator the
/// condition is true when the value is non-zero.
pub fn evaluate_condition(text: &str, store: &Store) -> EcResult<bool> {
    let text = text.trim();
    for (symbol, compare) in COMPARISONS {
        if let Some(pos) = text.find(symbol) {
            let left = evaluate_expression(&text[..pos], store)?;
            let right = evaluate_expression(&text[pos + symbol.len()..], store)?;
            return Ok(compare(left, right));
        }
    }
    Ok(evaluate_expression(text, store)? != 0.0)
}

/// Contents of a `"..."` literal, if `text` is one.
pub(crate) fn quoted(text: &str) -> Option<&str> {
    if text.len() >= 2 {
        text.strip_prefix('"')?.strip_suffix('"')
    } else {
        None
    }
}

/// Split an argument list at commas outside quotes, parentheses and brackets.
/// Empty pieces are dropped.
pub fn split_arguments(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' | '[' if !in_quotes => depth += 1,
            ')' | ']' if !in_quotes => depth -= 1,
            ',' if !in_quotes && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}
