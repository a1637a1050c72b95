//! `rebind`: an interpreter for a small expression language whose operation
//! names and call conventions are chosen by a settings file.
//!
//! | Module | Role |
//! |--------|------|
//! | [`script`] | tokenizer, parser and evaluator |
//! | [`var`] | variable store |
//! | [`config`] | settings file loader |
//! | [`program`] | statement splitting and the program driver |
//! | [`console`] | breakpoint debug console |
//! | [`numeral`] | Roman, Zeckendorf and radix conversions |
//! | [`cli`] | command-line parsing |
//! | [`logging`] | `tracing` subscriber setup |

pub mod cli;
pub mod config;
pub mod console;
pub mod logging;
pub mod numeral;
pub mod program;
pub mod script;
pub mod var;
