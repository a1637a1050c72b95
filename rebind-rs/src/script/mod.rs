//! Expression core.
//!
//! A statement flows through:
//!
//! - [`lexer`]: profile-driven tokenizer; collapses call units recursively
//! - [`parser`]: shunting-yard conversion to postfix
//! - [`eval`]: postfix evaluation, statement/assignment handling
//! - [`op`]: canonical operations and 32-bit arithmetic
//! - [`profile`]: spellings and call-site conventions
//!
//! # Quick start
//!
//! ```rust
//! use rebind::script::{configure, evaluate_statement, EvalOptions, Host, Result, Word};
//! use rebind::var::VarStore;
//!
//! struct Quiet;
//! impl Host for Quiet {
//!     fn read_input(&mut self, _: Option<&str>) -> Result<Word> { Ok(0) }
//!     fn write_output(&mut self, _: &str, _: Word) -> Result<()> { Ok(()) }
//! }
//!
//! let profile = configure(["(op)", "add +", "mult *"]).unwrap();
//! let mut store = VarStore::new();
//! let x = evaluate_statement("x = 2 + 3 * 4", &profile, &mut store, &mut Quiet, EvalOptions::default());
//! assert_eq!(x, Ok(14));
//! assert_eq!(store.lookup("x"), Some(14));
//! ```

pub mod error;
pub mod eval;
pub mod lexer;
pub mod op;
pub mod parser;
pub mod profile;

// Re-exports for convenience.
pub use error::{EvalError, Result};
pub use eval::{check_target, evaluate_postfix, evaluate_statement, EvalOptions, Evaluator, Host};
pub use lexer::{tokenize, Token};
pub use op::{CanonicalOp, Word};
pub use parser::to_postfix;
pub use profile::{configure, AssignDirection, BinaryMode, ProfileBuilder, SyntaxProfile, UnaryMode};
