//! Postfix evaluation and statement execution.
//!
//! [`Evaluator`] ties the pipeline together: it implements
//! [`CallContext`] so the tokenizer can call back into it for nested
//! sub-expressions, variable reads and `input`/`output`, and it enforces the
//! nesting budget that keeps pathological inputs from recursing without
//! bound.

use super::error::{EvalError, Result};
use super::lexer::{is_identifier, split_assignment, tokenize, CallContext, Token};
use super::op::{CanonicalOp, Word};
use super::parser::to_postfix;
use super::profile::{AssignDirection, SyntaxProfile};
use crate::var::VarStore;

// ── Host ──────────────────────────────────────────────────────────────────────

/// The outside world as seen by `input()` and `output(x)`.
pub trait Host {
    /// Block until a value is supplied.  `target` is the variable the
    /// enclosing statement assigns to, if any.
    fn read_input(&mut self, target: Option<&str>) -> Result<Word>;

    /// Report `label = value`; `label` is the operand text as written.
    fn write_output(&mut self, label: &str, value: Word) -> Result<()>;
}

/// Evaluation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Maximum nesting of call units and groups.
    pub max_depth: usize,
    /// Radix numeric literals are written in (`base-assign`).
    pub literal_radix: u32,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_depth: 64,
            literal_radix: 10,
        }
    }
}

// ── Postfix evaluation ────────────────────────────────────────────────────────

pub fn evaluate_postfix(tokens: &[Token]) -> Result<Word> {
    let mut stack: Vec<Word> = Vec::with_capacity(tokens.len());
    for &token in tokens {
        match token {
            Token::Number(n) => stack.push(n),
            Token::Op(op) => {
                let arity = op.arity();
                if stack.len() < arity {
                    return Err(EvalError::MalformedExpression(format!(
                        "{op} is missing an operand"
                    )));
                }
                let operands = stack.split_off(stack.len() - arity);
                stack.push(op.apply(&operands)?);
            }
            Token::GroupOpen | Token::GroupClose => {
                return Err(EvalError::MalformedExpression(
                    "grouping marker in postfix input".into(),
                ));
            }
        }
    }
    match stack.as_slice() {
        [value] => Ok(*value),
        [] => Err(EvalError::MalformedExpression("empty expression".into())),
        values => Err(EvalError::MalformedExpression(format!(
            "{} operands without an operator",
            values.len()
        ))),
    }
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

pub struct Evaluator<'a> {
    profile: &'a SyntaxProfile,
    store: &'a VarStore,
    host: &'a mut dyn Host,
    options: EvalOptions,
    target: Option<&'a str>,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        profile: &'a SyntaxProfile,
        store: &'a VarStore,
        host: &'a mut dyn Host,
        options: EvalOptions,
    ) -> Self {
        Evaluator {
            profile,
            store,
            host,
            options,
            target: None,
            depth: 0,
        }
    }

    /// Name the variable the statement assigns to (used by `input()`).
    pub fn with_target(mut self, target: &'a str) -> Self {
        self.target = Some(target);
        self
    }

    /// Tokenize, parse and evaluate one expression.
    pub fn eval_expr(&mut self, src: &str) -> Result<Word> {
        if self.depth >= self.options.max_depth {
            return Err(EvalError::ExpressionTooComplex(self.options.max_depth));
        }
        self.depth += 1;
        let result = self.eval_inner(src);
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, src: &str) -> Result<Word> {
        let profile = self.profile;
        let tokens = tokenize(src, profile, self)?;
        let postfix = to_postfix(&tokens)?;
        evaluate_postfix(&postfix)
    }
}

impl CallContext for Evaluator<'_> {
    fn eval_nested(&mut self, src: &str) -> Result<Word> {
        self.eval_expr(src)
    }

    fn call(&mut self, op: CanonicalOp, args: &[&str]) -> Result<Word> {
        match op {
            CanonicalOp::Input => {
                if !args.iter().all(|a| a.is_empty()) {
                    return Err(EvalError::SyntaxViolation(format!(
                        "'{}' takes no operand",
                        self.profile.spelling_of(op)
                    )));
                }
                self.host.read_input(self.target)
            }
            CanonicalOp::Output => {
                let value = self.eval_expr(args[0])?;
                self.host.write_output(args[0], value)?;
                Ok(value)
            }
            _ => {
                let mut operands = Vec::with_capacity(args.len());
                for arg in args {
                    operands.push(self.eval_expr(arg)?);
                }
                op.apply(&operands)
            }
        }
    }

    fn lookup(&self, name: &str) -> Option<Word> {
        self.store.lookup(name)
    }

    fn literal_radix(&self) -> u32 {
        self.options.literal_radix
    }
}

// ── Statements ────────────────────────────────────────────────────────────────

/// Evaluate one statement, binding the result if it is an assignment.
///
/// The store is written only after the right-hand side has evaluated
/// successfully.
pub fn evaluate_statement(
    line: &str,
    profile: &SyntaxProfile,
    store: &mut VarStore,
    host: &mut dyn Host,
    options: EvalOptions,
) -> Result<Word> {
    let line = line.trim();
    let assign = profile.spelling_of(CanonicalOp::Assign);

    let Some((left, right)) = split_assignment(line, assign) else {
        tracing::debug!(statement = line, "evaluating");
        return Evaluator::new(profile, store, host, options).eval_expr(line);
    };

    let (target, expr) = match profile.assign_direction() {
        AssignDirection::VariableLeft => (left.trim(), right),
        AssignDirection::VariableRight => (right.trim(), left),
    };
    check_target(target, profile)?;
    tracing::debug!(statement = line, target, "evaluating assignment");

    let value = Evaluator::new(profile, store, host, options)
        .with_target(target)
        .eval_expr(expr)?;
    store.insert(target, value);
    Ok(value)
}

/// Reject names a program could never read back: non-identifiers and
/// spellings of operations in `profile`.
pub fn check_target(target: &str, profile: &SyntaxProfile) -> Result<()> {
    if target.is_empty() {
        return Err(EvalError::SyntaxViolation("assignment without a variable".into()));
    }
    if !is_identifier(target) {
        return Err(EvalError::InvalidToken(target.to_owned()));
    }
    if profile.resolve_spelling(target).is_some() {
        return Err(EvalError::SyntaxViolation(format!(
            "cannot assign to operation '{target}'"
        )));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
