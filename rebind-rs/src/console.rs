//! Debug console opened at `#BREAKPOINT` statements.
//!
//! | Command | Action |
//! |---------|--------|
//! | `1` | show a variable in decimal and as 32 binary digits |
//! | `2` | list every variable |
//! | `3` | overwrite a declared variable with a hexadecimal value |
//! | `4` | declare a variable from a Zeckendorf or Roman numeral |
//! | `5` | delete a variable |
//! | `6` | continue the program |
//! | `7` | stop the interpreter |
//!
//! End of input at any prompt behaves like `6`.

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;

use crate::numeral::{parse_radix, parse_roman, parse_zeckendorf, NumeralError};
use crate::script::{check_target, SyntaxProfile, Word};
use crate::var::VarStore;

/// What the driver should do once the console closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleOutcome {
    Continue,
    Stop,
}

const MENU: &[&str] = &[
    "1) Show a variable and its binary form",
    "2) List all variables",
    "3) Update a variable (hexadecimal value)",
    "4) Declare a new variable",
    "5) Delete a variable",
    "6) Continue execution",
    "7) Stop the interpreter",
];

/// Run the console until the user continues or stops.
pub fn run<R: BufRead, W: Write>(
    store: &mut VarStore,
    profile: &SyntaxProfile,
    input: &mut R,
    output: &mut W,
    styled: bool,
) -> io::Result<ConsoleOutcome> {
    Console {
        store,
        profile,
        input,
        output,
        styled,
    }
    .run()
}

/// 32-bit binary in groups of eight: `00000000 00000000 00000000 00000101`.
pub fn binary_groups(value: Word) -> String {
    let bits = format!("{value:032b}");
    bits.as_bytes()
        .chunks(8)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

struct Console<'a, R, W> {
    store: &'a mut VarStore,
    profile: &'a SyntaxProfile,
    input: &'a mut R,
    output: &'a mut W,
    styled: bool,
}

impl<R: BufRead, W: Write> Console<'_, R, W> {
    fn run(&mut self) -> io::Result<ConsoleOutcome> {
        self.heading("Available commands:")?;
        for item in MENU {
            writeln!(self.output, "{item}")?;
        }

        loop {
            let Some(command) = self.ask("DEBUG> ")? else {
                return Ok(ConsoleOutcome::Continue);
            };
            tracing::debug!(command = command.as_str(), "console command");
            let done = match command.as_str() {
                "1" => self.show(),
                "2" => self.list(),
                "3" => self.update(),
                "4" => self.declare(),
                "5" => self.delete(),
                "6" => return Ok(ConsoleOutcome::Continue),
                "7" => return Ok(ConsoleOutcome::Stop),
                _ => self.complain("Unknown command").map(|()| true),
            }?;
            if !done {
                return Ok(ConsoleOutcome::Continue);
            }
        }
    }

    // ── I/O helpers ───────────────────────────────────────────────────────────

    /// Prompt and read one trimmed line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn heading(&mut self, text: &str) -> io::Result<()> {
        if self.styled {
            writeln!(self.output, "{}", text.bold())
        } else {
            writeln!(self.output, "{text}")
        }
    }

    fn complain(&mut self, text: &str) -> io::Result<()> {
        if self.styled {
            writeln!(self.output, "{}", text.red())
        } else {
            writeln!(self.output, "{text}")
        }
    }

    fn not_declared(&mut self, name: &str) -> io::Result<bool> {
        self.complain(&format!("Variable \"{name}\" is not declared"))?;
        Ok(true)
    }

    // ── Commands ──────────────────────────────────────────────────────────────
    //
    // Each returns `Ok(false)` when input ran out mid-command.

    fn show(&mut self) -> io::Result<bool> {
        let Some(name) = self.ask("Variable name: ")? else {
            return Ok(false);
        };
        match self.store.lookup(&name) {
            Some(value) => {
                writeln!(self.output, "{name} = {value}")?;
                writeln!(self.output, "{}", binary_groups(value))?;
                Ok(true)
            }
            None => self.not_declared(&name),
        }
    }

    fn list(&mut self) -> io::Result<bool> {
        for (name, value) in self.store.entries() {
            writeln!(self.output, "{name} = {value}")?;
        }
        Ok(true)
    }

    fn update(&mut self) -> io::Result<bool> {
        let Some(name) = self.ask("Variable name: ")? else {
            return Ok(false);
        };
        if !self.store.contains(&name) {
            return self.not_declared(&name);
        }
        let Some(text) = self.ask("Hexadecimal value: ")? else {
            return Ok(false);
        };
        match parse_radix(&text, 16) {
            Ok(value) => {
                self.store.insert(&name, value);
                writeln!(self.output, "Variable \"{name}\" updated")?;
            }
            Err(_) => self.complain("Invalid value")?,
        }
        Ok(true)
    }

    fn declare(&mut self) -> io::Result<bool> {
        let name = loop {
            let Some(name) = self.ask("New variable name: ")? else {
                return Ok(false);
            };
            if self.store.contains(&name) {
                self.complain("Variable already declared. Choose another name.")?;
            } else if check_target(&name, self.profile).is_err() {
                self.complain("Invalid variable name. Choose another name.")?;
            } else {
                break name;
            }
        };

        let Some(kind) = self.ask("Value type (Zeckendorf(1)/Roman(2)): ")? else {
            return Ok(false);
        };
        let value = match kind.as_str() {
            "1" => loop {
                let Some(text) = self.ask("Zeckendorf representation: ")? else {
                    return Ok(false);
                };
                match parse_zeckendorf(&text) {
                    Ok(value) => break value,
                    Err(NumeralError::Overflow) => {
                        self.complain("Value does not fit in 32 bits. Try again.")?
                    }
                    Err(_) => self.complain("Invalid Zeckendorf representation. Try again.")?,
                }
            },
            "2" => {
                let Some(text) = self.ask("Roman numeral: ")? else {
                    return Ok(false);
                };
                match parse_roman(&text) {
                    Ok(value) => value,
                    Err(e) => {
                        self.complain(&format!("Invalid value: {e}"))?;
                        return Ok(true);
                    }
                }
            }
            _ => {
                self.complain("Unknown value type")?;
                return Ok(true);
            }
        };
        self.store.insert(&name, value);
        writeln!(self.output, "Variable {name} declared with value {value}.")?;
        Ok(true)
    }

    fn delete(&mut self) -> io::Result<bool> {
        let Some(name) = self.ask("Variable name: ")? else {
            return Ok(false);
        };
        if self.store.delete(&name).is_some() {
            writeln!(self.output, "Variable \"{name}\" deleted")?;
            Ok(true)
        } else {
            self.not_declared(&name)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
