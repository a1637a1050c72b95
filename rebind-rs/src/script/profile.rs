//! Syntax profiles: operation spellings and call-site conventions.
//!
//! A [`SyntaxProfile`] is built once from a list of directives and shared
//! read-only by every evaluation for the rest of the run.
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | `left=` / `right=` | variable on the left / right of the assignment |
//! | `op()` | `not(x)`, `add(a,b)` for unary and binary operations |
//! | `()op` | `(x)not`, `(a,b)add` for unary and binary operations |
//! | `(op)` | binary operations written infix: `a add b` |
//! | `<canonical> <spelling>` | rename an operation |
//! | `[<tag> <canonical> <spelling>]` | rename an operation (tag ignored) |
//!
//! Blank lines and `#` comments are skipped.

use std::collections::{BTreeMap, HashMap};

use super::error::{EvalError, Result};
use super::lexer::{char_class, CharClass};
use super::op::CanonicalOp;

// ── Conventions ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnaryMode {
    /// `not(x)`
    #[default]
    SpellingThenOperand,
    /// `(x)not`
    OperandThenSpelling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryMode {
    /// `add(a,b)`
    #[default]
    SpellingCall,
    /// `(a,b)add`
    OperandsCall,
    /// `a add b`
    InfixSymbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignDirection {
    /// `x = expr`
    #[default]
    VariableLeft,
    /// `expr = x`
    VariableRight,
}

// ── ProfileBuilder ────────────────────────────────────────────────────────────

/// Accumulates directives; [`build`](ProfileBuilder::build) checks that the
/// final spelling table is unambiguous.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    spellings: BTreeMap<CanonicalOp, String>,
    unary_mode: UnaryMode,
    binary_mode: BinaryMode,
    assign_direction: AssignDirection,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        ProfileBuilder {
            spellings: identity_spellings(),
            unary_mode: UnaryMode::default(),
            binary_mode: BinaryMode::default(),
            assign_direction: AssignDirection::default(),
        }
    }
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one directive line.
    pub fn apply(&mut self, directive: &str) -> Result<()> {
        let line = directive.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        match line {
            "left=" => self.assign_direction = AssignDirection::VariableLeft,
            "right=" => self.assign_direction = AssignDirection::VariableRight,
            "op()" => {
                self.unary_mode = UnaryMode::SpellingThenOperand;
                self.binary_mode = BinaryMode::SpellingCall;
            }
            "()op" => {
                self.unary_mode = UnaryMode::OperandThenSpelling;
                self.binary_mode = BinaryMode::OperandsCall;
            }
            "(op)" => self.binary_mode = BinaryMode::InfixSymbol,
            _ => {
                let fields: Vec<&str> = line.split_whitespace().collect();
                let (tag, canonical, spelling) = match fields.as_slice() {
                    [canonical, spelling] => (None, *canonical, *spelling),
                    [tag, canonical, spelling] if tag.starts_with('[') => {
                        let Some(spelling) = spelling.strip_suffix(']') else {
                            return Err(EvalError::ConfigConflict(format!(
                                "missing ']' in directive '{line}'"
                            )));
                        };
                        (Some(tag.trim_start_matches('[')), *canonical, spelling)
                    }
                    _ => {
                        return Err(EvalError::ConfigConflict(format!(
                            "unrecognised directive '{line}'"
                        )))
                    }
                };
                let op = CanonicalOp::from_name(canonical).ok_or_else(|| {
                    EvalError::ConfigConflict(format!("unknown operation '{canonical}'"))
                })?;
                check_spelling(spelling)?;
                tracing::debug!(tag, %op, spelling, "respelled operation");
                self.spellings.insert(op, spelling.to_owned());
            }
        }
        Ok(())
    }

    pub fn build(self) -> Result<SyntaxProfile> {
        let mut by_spelling = HashMap::with_capacity(self.spellings.len());
        for (&op, spelling) in &self.spellings {
            if let Some(other) = by_spelling.insert(spelling.clone(), op) {
                return Err(EvalError::ConfigConflict(format!(
                    "'{spelling}' is the spelling of both {other} and {op}"
                )));
            }
        }
        Ok(SyntaxProfile {
            spellings: self.spellings,
            by_spelling,
            unary_mode: self.unary_mode,
            binary_mode: self.binary_mode,
            assign_direction: self.assign_direction,
        })
    }
}

fn identity_spellings() -> BTreeMap<CanonicalOp, String> {
    CanonicalOp::ALL
        .into_iter()
        .map(|op| (op, op.name().to_owned()))
        .collect()
}

/// Characters the program reader consumes before a statement is evaluated.
const RESERVED: [char; 4] = ['#', ';', '[', ']'];

/// A spelling must lex as exactly one lexeme: a run of word characters not
/// starting with a digit, or a run of symbol characters.
fn check_spelling(spelling: &str) -> Result<()> {
    if let Some(c) = spelling.chars().find(|c| RESERVED.contains(c)) {
        return Err(EvalError::ConfigConflict(format!(
            "'{c}' is reserved and cannot appear in spelling '{spelling}'"
        )));
    }
    let mut chars = spelling.chars();
    let first = chars.next().map(char_class);
    let valid = match first {
        Some(CharClass::Word) => {
            !spelling.starts_with(|c: char| c.is_ascii_digit())
                && chars.all(|c| char_class(c) == CharClass::Word)
        }
        Some(CharClass::Symbol) => chars.all(|c| char_class(c) == CharClass::Symbol),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(EvalError::ConfigConflict(format!("invalid spelling '{spelling}'")))
    }
}

/// Build a profile from directive lines.
pub fn configure<I, S>(directives: I) -> Result<SyntaxProfile>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = ProfileBuilder::new();
    for directive in directives {
        builder.apply(directive.as_ref())?;
    }
    builder.build()
}

// ── SyntaxProfile ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SyntaxProfile {
    spellings: BTreeMap<CanonicalOp, String>,
    by_spelling: HashMap<String, CanonicalOp>,
    unary_mode: UnaryMode,
    binary_mode: BinaryMode,
    assign_direction: AssignDirection,
}

impl Default for SyntaxProfile {
    fn default() -> Self {
        let spellings = identity_spellings();
        let by_spelling = spellings.iter().map(|(&op, s)| (s.clone(), op)).collect();
        SyntaxProfile {
            spellings,
            by_spelling,
            unary_mode: UnaryMode::default(),
            binary_mode: BinaryMode::default(),
            assign_direction: AssignDirection::default(),
        }
    }
}

impl SyntaxProfile {
    /// Map a user spelling back to its canonical operation.
    pub fn resolve_spelling(&self, raw: &str) -> Option<CanonicalOp> {
        self.by_spelling.get(raw).copied()
    }

    pub fn spelling_of(&self, op: CanonicalOp) -> &str {
        self.spellings.get(&op).map_or(op.name(), String::as_str)
    }

    pub fn unary_mode(&self) -> UnaryMode {
        self.unary_mode
    }

    pub fn binary_mode(&self) -> BinaryMode {
        self.binary_mode
    }

    pub fn assign_direction(&self) -> AssignDirection {
        self.assign_direction
    }

    /// Whether `op` may be written as `spelling(args)`.
    pub fn allows_prefix_call(&self, op: CanonicalOp) -> bool {
        match op {
            CanonicalOp::Assign => false,
            op if op.is_unary() => self.unary_mode == UnaryMode::SpellingThenOperand,
            _ => self.binary_mode == BinaryMode::SpellingCall,
        }
    }

    /// Whether `op` may be written as `(args)spelling`.
    pub fn allows_suffix_call(&self, op: CanonicalOp) -> bool {
        match op {
            CanonicalOp::Assign => false,
            op if op.is_unary() => self.unary_mode == UnaryMode::OperandThenSpelling,
            _ => self.binary_mode == BinaryMode::OperandsCall,
        }
    }

    /// Whether `op` is written between its operands.
    pub fn is_infix(&self, op: CanonicalOp) -> bool {
        op.is_binary_arith() && self.binary_mode == BinaryMode::InfixSymbol
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
