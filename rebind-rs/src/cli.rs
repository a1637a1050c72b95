//! Command-line argument parsing.
//!
//! Usage:
//!   rebind <program> [<settings>] [-d|--debug|/debug] [--keep-going]
//!          [--max-depth=<n>] [base-assign=<n>] [base-input=<n>] [base-output=<n>]

use std::path::PathBuf;

use crate::program::{ErrorPolicy, Radix, RunSettings};

pub const USAGE: &str = "Usage: rebind <program> [<settings>] [-d|--debug|/debug] [--keep-going] \
[--max-depth=<n>] [base-assign=<n>] [base-input=<n>] [base-output=<n>]";

/// Largest accepted `--max-depth`.  Each level recurses through the
/// tokenizer, so the budget has to stay well inside the native stack.
pub const MAX_DEPTH_LIMIT: usize = 1024;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Program file to run.
    pub program: PathBuf,
    /// Settings file; `None` means search the standard locations.
    pub settings: Option<PathBuf>,
    /// Open the console at `#BREAKPOINT` statements.
    pub debug: bool,
    /// Continue past failing statements (`--keep-going`).
    pub keep_going: bool,
    /// Nesting budget override (`--max-depth=<n>`).
    pub max_depth: Option<usize>,
    pub radix: Radix,
}

impl CliArgs {
    pub fn run_settings(&self) -> RunSettings {
        let defaults = RunSettings::default();
        RunSettings {
            radix: self.radix,
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            policy: if self.keep_going {
                ErrorPolicy::KeepGoing
            } else {
                ErrorPolicy::Abort
            },
            debug: self.debug,
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();

    for arg in argv {
        match arg.as_str() {
            "-d" | "--debug" | "/debug" => args.debug = true,
            "--keep-going" => args.keep_going = true,
            a if a.starts_with("--max-depth=") => {
                let n = &a["--max-depth=".len()..];
                let depth: usize = n
                    .parse()
                    .map_err(|_| format!("invalid depth: {n}"))?;
                if !(1..=MAX_DEPTH_LIMIT).contains(&depth) {
                    return Err(format!(
                        "--max-depth must be between 1 and {MAX_DEPTH_LIMIT}, got {depth}"
                    ));
                }
                args.max_depth = Some(depth);
            }
            a if a.starts_with("base-") => {
                let (key, value) = a
                    .split_once('=')
                    .ok_or_else(|| format!("{a}: expected <name>=<base>"))?;
                let base = parse_base(key, value)?;
                match key {
                    "base-assign" => args.radix.assign = base,
                    "base-input" => args.radix.input = base,
                    "base-output" => args.radix.output = base,
                    _ => return Err(format!("unknown setting: {key}")),
                }
            }
            a if a.starts_with('-') && a.len() > 1 => {
                return Err(format!("unknown option: {a}"));
            }
            a => positional.push(a.to_owned()),
        }
    }

    // Positional arguments → program and optional settings file.
    let mut positional = positional.into_iter();
    args.program = positional
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| "missing program file".to_owned())?;
    args.settings = positional.next().map(PathBuf::from);
    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument: {extra}"));
    }

    Ok(args)
}

fn parse_base(key: &str, value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(base) if (2..=36).contains(&base) => Ok(base),
        _ => Err(format!("{key}: base must be between 2 and 36, got '{value}'")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
