//! Canonical operations and the operation executor.
//!
//! | Op | Canonical name | Arity | Precedence |
//! |----|----------------|-------|------------|
//! | [`CanonicalOp::Not`] | `not` | 1 | - |
//! | [`CanonicalOp::Input`] | `input` | 1 | - |
//! | [`CanonicalOp::Output`] | `output` | 1 | - |
//! | [`CanonicalOp::Add`], [`Sub`](CanonicalOp::Sub), [`Xor`](CanonicalOp::Xor), [`And`](CanonicalOp::And), [`Or`](CanonicalOp::Or) | `add` `sub` `xor` `and` `or` | 2 | 1 |
//! | [`CanonicalOp::Mult`], [`Div`](CanonicalOp::Div), [`Rem`](CanonicalOp::Rem) | `mult` `div` `rem` | 2 | 2 |
//! | [`CanonicalOp::Pow`] | `pow` | 2 | 3 |
//! | [`CanonicalOp::Assign`] | `=` | 2 | - |
//!
//! All arithmetic happens on [`Word`]s and wraps modulo 2³².

use std::fmt;

use super::error::{EvalError, Result};

/// The language's only value type.
pub type Word = u32;

// ── CanonicalOp ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalOp {
    Not,
    Input,
    Output,
    Add,
    Mult,
    Sub,
    Pow,
    Div,
    Rem,
    Xor,
    And,
    Or,
    Assign,
}

impl CanonicalOp {
    pub const ALL: [CanonicalOp; 13] = [
        CanonicalOp::Not,
        CanonicalOp::Input,
        CanonicalOp::Output,
        CanonicalOp::Add,
        CanonicalOp::Mult,
        CanonicalOp::Sub,
        CanonicalOp::Pow,
        CanonicalOp::Div,
        CanonicalOp::Rem,
        CanonicalOp::Xor,
        CanonicalOp::And,
        CanonicalOp::Or,
        CanonicalOp::Assign,
    ];

    /// The fixed, language-internal name (also the default spelling).
    pub fn name(self) -> &'static str {
        match self {
            CanonicalOp::Not => "not",
            CanonicalOp::Input => "input",
            CanonicalOp::Output => "output",
            CanonicalOp::Add => "add",
            CanonicalOp::Mult => "mult",
            CanonicalOp::Sub => "sub",
            CanonicalOp::Pow => "pow",
            CanonicalOp::Div => "div",
            CanonicalOp::Rem => "rem",
            CanonicalOp::Xor => "xor",
            CanonicalOp::And => "and",
            CanonicalOp::Or => "or",
            CanonicalOp::Assign => "=",
        }
    }

    pub fn from_name(name: &str) -> Option<CanonicalOp> {
        CanonicalOp::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn arity(self) -> usize {
        match self {
            CanonicalOp::Not | CanonicalOp::Input | CanonicalOp::Output => 1,
            _ => 2,
        }
    }

    pub fn is_unary(self) -> bool {
        self.arity() == 1
    }

    /// Binding strength for the shunting-yard parser.  `None` for operations
    /// that never appear as infix operators.
    pub fn precedence(self) -> Option<u8> {
        match self {
            CanonicalOp::Add
            | CanonicalOp::Sub
            | CanonicalOp::Xor
            | CanonicalOp::And
            | CanonicalOp::Or => Some(1),
            CanonicalOp::Mult | CanonicalOp::Div | CanonicalOp::Rem => Some(2),
            CanonicalOp::Pow => Some(3),
            CanonicalOp::Not | CanonicalOp::Input | CanonicalOp::Output | CanonicalOp::Assign => {
                None
            }
        }
    }

    /// True for the binary operations that may be written infix.
    pub fn is_binary_arith(self) -> bool {
        self.precedence().is_some()
    }

    /// Apply a pure operation to already-evaluated operands.
    ///
    /// `Input`, `Output` and `Assign` need the interpreter and are rejected
    /// here; the tokenizer and statement evaluator handle them.
    pub fn apply(self, operands: &[Word]) -> Result<Word> {
        use CanonicalOp::*;
        match (self, operands) {
            (Input | Output | Assign, _) => Err(EvalError::InvalidToken(self.name().to_owned())),
            (Not, &[x]) => Ok(!x),
            (Add, &[a, b]) => Ok(a.wrapping_add(b)),
            (Sub, &[a, b]) => Ok(a.wrapping_sub(b)),
            (Mult, &[a, b]) => Ok(a.wrapping_mul(b)),
            (Pow, &[a, b]) => Ok(a.wrapping_pow(b)),
            (Div, &[a, b]) => a.checked_div(b).ok_or(EvalError::DivisionByZero),
            (Rem, &[a, b]) => a.checked_rem(b).ok_or(EvalError::DivisionByZero),
            (Xor, &[a, b]) => Ok(a ^ b),
            (And, &[a, b]) => Ok(a & b),
            (Or, &[a, b]) => Ok(a | b),
            _ => Err(EvalError::ArityMismatch {
                op: self.name().to_owned(),
                expected: self.arity(),
                found: operands.len(),
            }),
        }
    }
}

impl fmt::Display for CanonicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for op in CanonicalOp::ALL {
            assert_eq!(CanonicalOp::from_name(op.name()), Some(op));
        }
        assert_eq!(CanonicalOp::from_name("plus"), None);
    }

    #[test]
    fn arity_table() {
        assert_eq!(CanonicalOp::Not.arity(), 1);
        assert_eq!(CanonicalOp::Input.arity(), 1);
        assert_eq!(CanonicalOp::Output.arity(), 1);
        assert_eq!(CanonicalOp::Assign.arity(), 2);
        assert_eq!(CanonicalOp::Pow.arity(), 2);
    }

    #[test]
    fn precedence_levels() {
        assert_eq!(CanonicalOp::Add.precedence(), Some(1));
        assert_eq!(CanonicalOp::Or.precedence(), Some(1));
        assert_eq!(CanonicalOp::Rem.precedence(), Some(2));
        assert_eq!(CanonicalOp::Pow.precedence(), Some(3));
        assert_eq!(CanonicalOp::Not.precedence(), None);
        assert_eq!(CanonicalOp::Assign.precedence(), None);
    }

    #[test]
    fn wrapping_arithmetic() {
        assert_eq!(CanonicalOp::Add.apply(&[u32::MAX, 2]), Ok(1));
        assert_eq!(CanonicalOp::Sub.apply(&[3, 5]), Ok(0xFFFF_FFFE));
        assert_eq!(CanonicalOp::Mult.apply(&[0x1_0000, 0x1_0000]), Ok(0));
        assert_eq!(CanonicalOp::Pow.apply(&[2, 32]), Ok(0));
        assert_eq!(CanonicalOp::Pow.apply(&[3, 4]), Ok(81));
        assert_eq!(CanonicalOp::Not.apply(&[0]), Ok(0xFFFF_FFFF));
    }

    #[test]
    fn bitwise() {
        assert_eq!(CanonicalOp::Xor.apply(&[5, 3]), Ok(6));
        assert_eq!(CanonicalOp::And.apply(&[5, 3]), Ok(1));
        assert_eq!(CanonicalOp::Or.apply(&[5, 2]), Ok(7));
    }

    #[test]
    fn division_truncates() {
        assert_eq!(CanonicalOp::Div.apply(&[10, 3]), Ok(3));
        assert_eq!(CanonicalOp::Rem.apply(&[10, 3]), Ok(1));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(CanonicalOp::Div.apply(&[1, 0]), Err(EvalError::DivisionByZero));
        assert_eq!(CanonicalOp::Rem.apply(&[1, 0]), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn wrong_operand_count() {
        assert!(matches!(
            CanonicalOp::Add.apply(&[1]),
            Err(EvalError::ArityMismatch { expected: 2, found: 1, .. })
        ));
        assert!(matches!(
            CanonicalOp::Not.apply(&[1, 2]),
            Err(EvalError::ArityMismatch { expected: 1, found: 2, .. })
        ));
        assert!(matches!(
            CanonicalOp::Xor.apply(&[]),
            Err(EvalError::ArityMismatch { expected: 2, found: 0, .. })
        ));
    }

    #[test]
    fn host_ops_are_not_pure() {
        assert!(matches!(CanonicalOp::Output.apply(&[1]), Err(EvalError::InvalidToken(_))));
        assert!(matches!(CanonicalOp::Input.apply(&[0]), Err(EvalError::InvalidToken(_))));
        assert!(matches!(CanonicalOp::Assign.apply(&[1, 2]), Err(EvalError::InvalidToken(_))));
    }
}
