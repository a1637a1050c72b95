//! Program driver: statement splitting and the [`Interpreter`].
//!
//! A program is a sequence of statements separated by `;`.  Before splitting,
//! bracketed comments `[like [this]]` are removed (innermost first, so they
//! nest), and everything from `#` to the end of a line is dropped.  A line
//! comment reading `#BREAKPOINT` marks the statement it appears in; with
//! debugging enabled the [console](crate::console) opens before that statement
//! runs.

use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::console::{self, ConsoleOutcome};
use crate::numeral::{format_radix, parse_radix};
use crate::script::{check_target, evaluate_statement, EvalError, EvalOptions, Host, SyntaxProfile, Word};
use crate::var::VarStore;

// ── Statements ────────────────────────────────────────────────────────────────

/// One `;`-terminated statement, comments removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
    /// 1-based line the statement starts on.
    pub line: usize,
    pub breakpoint: bool,
}

fn block_comment() -> &'static Regex {
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    BLOCK.get_or_init(|| Regex::new(r"\[[^\[\]]*\]").expect("block comment pattern is valid"))
}

/// Remove `[...]` comments, innermost first.  Newlines inside a comment are
/// kept so line numbers stay meaningful.
pub fn strip_block_comments(source: &str) -> String {
    let re = block_comment();
    let mut text = source.to_owned();
    while re.is_match(&text) {
        text = re
            .replace_all(&text, |caps: &Captures| {
                caps[0].chars().filter(|&c| c == '\n').collect::<String>()
            })
            .into_owned();
    }
    text
}

pub fn split_statements(source: &str) -> Vec<Statement> {
    let text = strip_block_comments(source);
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut start: Option<usize> = None;
    let mut breakpoint = false;

    for (i, raw) in text.lines().enumerate() {
        let lineno = i + 1;
        let (code, comment) = match raw.split_once('#') {
            Some((code, comment)) => (code, Some(comment)),
            None => (raw, None),
        };

        for part in code.split_inclusive(';') {
            let (body, ends) = match part.strip_suffix(';') {
                Some(body) => (body, true),
                None => (part, false),
            };
            if start.is_none() && !body.trim().is_empty() {
                start = Some(lineno);
            }
            current.push_str(body);
            if ends {
                finish(&mut statements, &mut current, &mut start, &mut breakpoint, lineno);
            } else {
                current.push('\n');
            }
        }

        if comment.is_some_and(|c| c.trim_start().starts_with("BREAKPOINT")) {
            breakpoint = true;
        }
    }
    let last = text.lines().count().max(1);
    finish(&mut statements, &mut current, &mut start, &mut breakpoint, last);
    statements
}

fn finish(
    statements: &mut Vec<Statement>,
    current: &mut String,
    start: &mut Option<usize>,
    breakpoint: &mut bool,
    lineno: usize,
) {
    let text = current.trim().to_owned();
    if !text.is_empty() || *breakpoint {
        statements.push(Statement {
            text,
            line: start.unwrap_or(lineno),
            breakpoint: *breakpoint,
        });
    }
    current.clear();
    *start = None;
    *breakpoint = false;
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// What to do when a statement fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failing statement.
    #[default]
    Abort,
    /// Log the failure and move on to the next statement.
    KeepGoing,
}

/// Radices for literals in the program text, values typed at `input()`, and
/// values printed by `output(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Radix {
    pub assign: u32,
    pub input: u32,
    pub output: u32,
}

impl Default for Radix {
    fn default() -> Self {
        Radix {
            assign: 10,
            input: 10,
            output: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub radix: Radix,
    pub max_depth: usize,
    pub policy: ErrorPolicy,
    pub debug: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            radix: Radix::default(),
            max_depth: EvalOptions::default().max_depth,
            policy: ErrorPolicy::default(),
            debug: false,
        }
    }
}

// ── Errors and results ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RunError {
    #[error("line {line}: {source} in '{text}'")]
    Statement {
        line: usize,
        text: String,
        #[source]
        source: EvalError,
    },
    #[error("console: {0}")]
    Io(#[from] io::Error),
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub executed: usize,
    pub failed: usize,
    /// The console's stop command ended the run early.
    pub stopped: bool,
}

// ── Stream host ───────────────────────────────────────────────────────────────

/// [`Host`] over a reader/writer pair, converting through the configured
/// radices.
pub struct StreamHost<R, W> {
    input: R,
    output: W,
    radix: Radix,
}

impl<R: BufRead, W: Write> StreamHost<R, W> {
    pub fn new(input: R, output: W, radix: Radix) -> Self {
        StreamHost { input, output, radix }
    }
}

impl<R: BufRead, W: Write> Host for StreamHost<R, W> {
    fn read_input(&mut self, target: Option<&str>) -> Result<Word, EvalError> {
        let io_err = |e: io::Error| EvalError::Input(e.to_string());
        match target {
            Some(name) => write!(self.output, "Enter value for {name}: ").map_err(io_err)?,
            None => write!(self.output, "Enter value: ").map_err(io_err)?,
        }
        self.output.flush().map_err(io_err)?;

        let mut line = String::new();
        if self.input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(EvalError::Input("end of input".into()));
        }
        parse_radix(&line, self.radix.input).map_err(|e| EvalError::Input(e.to_string()))
    }

    fn write_output(&mut self, label: &str, value: Word) -> Result<(), EvalError> {
        let shown =
            format_radix(value, self.radix.output).map_err(|e| EvalError::Output(e.to_string()))?;
        writeln!(self.output, "{label} = {shown}").map_err(|e| EvalError::Output(e.to_string()))
    }
}

// ── Interpreter ───────────────────────────────────────────────────────────────

pub struct Interpreter<R, W> {
    profile: SyntaxProfile,
    store: VarStore,
    settings: RunSettings,
    host: StreamHost<R, W>,
    styled: bool,
}

impl Interpreter<io::StdinLock<'static>, io::Stdout> {
    /// Interpreter reading `input()` and console commands from stdin.
    pub fn stdio(profile: SyntaxProfile, settings: RunSettings) -> Self {
        use crossterm::tty::IsTty;
        let styled = io::stdout().is_tty();
        Interpreter::new(profile, settings, io::stdin().lock(), io::stdout()).with_styled(styled)
    }
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub fn new(profile: SyntaxProfile, settings: RunSettings, input: R, output: W) -> Self {
        Interpreter {
            profile,
            store: VarStore::new(),
            settings,
            host: StreamHost::new(input, output, settings.radix),
            styled: false,
        }
    }

    /// Colour console output.
    pub fn with_styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    fn options(&self) -> EvalOptions {
        EvalOptions {
            max_depth: self.settings.max_depth,
            literal_radix: self.settings.radix.assign,
        }
    }

    /// Run every statement of `source` in order.
    pub fn execute(&mut self, source: &str) -> Result<Summary, RunError> {
        let mut summary = Summary::default();
        let options = self.options();

        for stmt in split_statements(source) {
            if stmt.breakpoint && self.settings.debug {
                tracing::debug!(line = stmt.line, "breakpoint");
                let outcome = console::run(
                    &mut self.store,
                    &self.profile,
                    &mut self.host.input,
                    &mut self.host.output,
                    self.styled,
                )?;
                if outcome == ConsoleOutcome::Stop {
                    summary.stopped = true;
                    return Ok(summary);
                }
            }
            if stmt.text.is_empty() {
                continue;
            }

            summary.executed += 1;
            let result =
                evaluate_statement(&stmt.text, &self.profile, &mut self.store, &mut self.host, options);
            if let Err(source) = result {
                summary.failed += 1;
                match self.settings.policy {
                    ErrorPolicy::Abort => {
                        return Err(RunError::Statement {
                            line: stmt.line,
                            text: stmt.text,
                            source,
                        })
                    }
                    ErrorPolicy::KeepGoing => {
                        tracing::warn!(line = stmt.line, statement = %stmt.text, error = %source, "statement skipped");
                    }
                }
            }
        }
        self.host.output.flush()?;
        Ok(summary)
    }

    pub fn read_variable(&self, name: &str) -> Option<Word> {
        self.store.lookup(name)
    }

    /// Bind `name` directly, bypassing the program text.  The name must be
    /// one an assignment could also bind.
    pub fn write_variable(&mut self, name: &str, value: Word) -> Result<Option<Word>, EvalError> {
        check_target(name, &self.profile)?;
        Ok(self.store.insert(name, value))
    }

    pub fn delete_variable(&mut self, name: &str) -> Option<Word> {
        self.store.delete(name)
    }

    pub fn enumerate_variables(&self) -> Vec<String> {
        self.store.enumerate()
    }

    pub fn profile(&self) -> &SyntaxProfile {
        &self.profile
    }

    /// Consume the interpreter, returning its output sink.
    pub fn into_output(self) -> W {
        self.host.output
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
