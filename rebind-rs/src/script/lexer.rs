//! Profile-driven tokenizer.
//!
//! Input is cut into *lexemes*: maximal runs of word characters
//! (`[A-Za-z0-9_]`) or of symbol characters (anything else that is not
//! whitespace, `(`, `)` or `,`).  So `2+3` lexes as `2`, `+`, `3`, while
//! `2 add 3` needs the spaces.
//!
//! Every balanced `( … )` unit is collapsed into a single [`Token::Number`]
//! before the parser sees it:
//!
//! - `spelling(args)`: call written before its operands,
//! - `(args)spelling`: call written after its operands,
//! - `(expr)`: plain grouping.
//!
//! Which call shapes are legal is decided by the [`SyntaxProfile`].  Argument
//! texts are handed to a [`CallContext`], which evaluates them recursively.

use super::error::{EvalError, Result};
use super::op::{CanonicalOp, Word};
use super::profile::SyntaxProfile;

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Number(Word),
    Op(CanonicalOp),
    GroupOpen,
    GroupClose,
}

// ── Character classes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Space,
    Word,
    Symbol,
    Open,
    Close,
    Comma,
}

pub fn char_class(c: char) -> CharClass {
    match c {
        '(' => CharClass::Open,
        ')' => CharClass::Close,
        ',' => CharClass::Comma,
        c if c.is_whitespace() => CharClass::Space,
        c if c.is_ascii_alphanumeric() || c == '_' => CharClass::Word,
        _ => CharClass::Symbol,
    }
}

/// A valid variable name: a word lexeme that is not a numeric literal.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| char_class(c) == CharClass::Word)
}

/// Parse a numeric literal written in `radix`.
///
/// Literals always start with a decimal digit, so in radix 16 `0ff` is a
/// number while `ff` is a name.
pub fn parse_literal(text: &str, radix: u32) -> Result<Word> {
    if !(2..=36).contains(&radix) || !text.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(EvalError::InvalidToken(text.to_owned()));
    }
    Word::from_str_radix(text, radix).map_err(|_| EvalError::InvalidToken(text.to_owned()))
}

/// Split a statement at the first top-level occurrence of the assignment
/// spelling.  The spelling must stand as a whole lexeme.
pub fn split_assignment<'s>(line: &'s str, spelling: &str) -> Option<(&'s str, &'s str)> {
    let class = spelling.chars().next().map(char_class)?;
    let mut depth = 0usize;
    let mut prev = CharClass::Space;
    for (i, c) in line.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && prev != class && line[i..].starts_with(spelling) {
            let rest = &line[i + spelling.len()..];
            let next = rest.chars().next().map_or(CharClass::Space, char_class);
            if next != class {
                return Some((&line[..i], rest));
            }
        }
        prev = char_class(c);
    }
    None
}

/// Cut a run of symbol characters into spellings, longest match first.  A
/// remainder that starts with no known spelling is returned whole.
pub fn split_symbols<'s>(run: &'s str, profile: &SyntaxProfile) -> Vec<&'s str> {
    let mut pieces = Vec::new();
    let mut rest = run;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .rev()
            .find(|&end| profile.resolve_spelling(&rest[..end]).is_some());
        match cut {
            Some(end) => {
                pieces.push(&rest[..end]);
                rest = &rest[end..];
            }
            None => {
                pieces.push(rest);
                break;
            }
        }
    }
    pieces
}

// ── CallContext ───────────────────────────────────────────────────────────────

/// Callbacks the tokenizer needs while collapsing call units.
///
/// [`Evaluator`](super::eval::Evaluator) implements this by recursing into the
/// full tokenize → parse → evaluate pipeline.
pub trait CallContext {
    /// Evaluate a nested sub-expression.
    fn eval_nested(&mut self, src: &str) -> Result<Word>;

    /// Apply `op` to unevaluated argument texts (arity already checked).
    fn call(&mut self, op: CanonicalOp, args: &[&str]) -> Result<Word>;

    /// Current value of a variable.
    fn lookup(&self, name: &str) -> Option<Word>;

    /// Radix numeric literals are written in.
    fn literal_radix(&self) -> u32;
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

struct Lexer<'a, 'c> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    /// Char index where the pending lexeme starts.
    lexeme: Option<usize>,
    profile: &'a SyntaxProfile,
    ctx: &'c mut dyn CallContext,
    tokens: Vec<Token>,
}

impl<'a, 'c> Lexer<'a, 'c> {
    fn new(src: &'a str, profile: &'a SyntaxProfile, ctx: &'c mut dyn CallContext) -> Self {
        Lexer {
            src,
            chars: src.char_indices().collect(),
            pos: 0,
            lexeme: None,
            profile,
            ctx,
            tokens: Vec::new(),
        }
    }

    /// Byte offset of char index `idx` (or end of input).
    fn offset(&self, idx: usize) -> usize {
        self.chars.get(idx).map_or(self.src.len(), |&(b, _)| b)
    }

    fn class_at(&self, idx: usize) -> Option<CharClass> {
        self.chars.get(idx).map(|&(_, c)| char_class(c))
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        while let Some(class) = self.class_at(self.pos) {
            match class {
                CharClass::Space => {
                    self.flush()?;
                    self.pos += 1;
                }
                CharClass::Word | CharClass::Symbol => {
                    if let Some(start) = self.lexeme {
                        if self.class_at(start) != Some(class) {
                            self.flush()?;
                        }
                    }
                    if self.lexeme.is_none() {
                        self.lexeme = Some(self.pos);
                    }
                    self.pos += 1;
                }
                CharClass::Open => {
                    let prefix = self.take_prefix()?;
                    self.group(prefix)?;
                }
                CharClass::Close => {
                    return Err(EvalError::UnbalancedGrouping(format!(
                        "')' at column {} has no matching '('",
                        self.pos + 1
                    )));
                }
                CharClass::Comma => {
                    return Err(EvalError::InvalidToken(",".to_owned()));
                }
            }
        }
        self.flush()?;
        Ok(self.tokens)
    }

    /// Emit the pending lexeme as a token.
    fn flush(&mut self) -> Result<()> {
        let Some(start) = self.lexeme.take() else {
            return Ok(());
        };
        let src = self.src;
        let text = &src[self.offset(start)..self.offset(self.pos)];
        for piece in self.pieces(start, text) {
            let token = self.classify(piece)?;
            self.tokens.push(token);
        }
        Ok(())
    }

    /// Word lexemes stand whole; symbol runs are cut into spellings.
    fn pieces(&self, start: usize, text: &'a str) -> Vec<&'a str> {
        if self.class_at(start) == Some(CharClass::Symbol) {
            split_symbols(text, self.profile)
        } else {
            vec![text]
        }
    }

    fn classify(&self, text: &str) -> Result<Token> {
        if text.starts_with(|c: char| c.is_ascii_digit()) {
            return parse_literal(text, self.ctx.literal_radix()).map(Token::Number);
        }
        if let Some(op) = self.profile.resolve_spelling(text) {
            return if self.profile.is_infix(op) {
                Ok(Token::Op(op))
            } else if op.is_binary_arith() {
                Err(EvalError::SyntaxViolation(format!(
                    "'{text}' used as an infix operator, but binary operations are calls in this profile"
                )))
            } else {
                Err(EvalError::SyntaxViolation(format!(
                    "'{text}' cannot stand alone in an expression"
                )))
            };
        }
        if is_identifier(text) {
            self.ctx
                .lookup(text)
                .map(Token::Number)
                .ok_or_else(|| EvalError::UndefinedVariable(text.to_owned()))
        } else {
            Err(EvalError::InvalidToken(text.to_owned()))
        }
    }

    /// Detach the lexeme in front of `(`.  An infix operator is emitted as a
    /// token instead: in `2*(3)` the `*` is not a call prefix.  In a symbol
    /// run only the last spelling can be the prefix; `+~(1)` is `+` then `~(1)`.
    fn take_prefix(&mut self) -> Result<Option<&'a str>> {
        let Some(start) = self.lexeme.take() else {
            return Ok(None);
        };
        let src = self.src;
        let text = &src[self.offset(start)..self.offset(self.pos)];
        let mut pieces = self.pieces(start, text);
        let Some(last) = pieces.pop() else {
            return Ok(None);
        };
        for piece in pieces {
            let token = self.classify(piece)?;
            self.tokens.push(token);
        }
        match self.profile.resolve_spelling(last) {
            Some(op) if self.profile.is_infix(op) => {
                self.tokens.push(Token::Op(op));
                Ok(None)
            }
            _ => Ok(Some(last)),
        }
    }

    /// Consume a balanced `( … )` unit starting at `self.pos` and collapse it
    /// to a number.
    fn group(&mut self, prefix: Option<&'a str>) -> Result<()> {
        let open = self.pos;
        let mut depth = 0usize;
        let mut commas = Vec::new();
        let close = loop {
            let Some(&(byte, c)) = self.chars.get(self.pos) else {
                return Err(EvalError::UnbalancedGrouping(format!(
                    "'(' at column {} is never closed",
                    open + 1
                )));
            };
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break self.pos;
                    }
                }
                ',' if depth == 1 => commas.push(byte),
                _ => {}
            }
            self.pos += 1;
        };
        self.pos = close + 1;

        let src = self.src;
        let mut args = Vec::with_capacity(commas.len() + 1);
        let mut start = self.offset(open) + 1;
        for comma in commas {
            args.push(src[start..comma].trim());
            start = comma + 1;
        }
        args.push(src[start..self.offset(close)].trim());

        let value = match prefix {
            Some(spelling) => {
                let op = self
                    .profile
                    .resolve_spelling(spelling)
                    .ok_or_else(|| EvalError::InvalidToken(spelling.to_owned()))?;
                if !self.profile.allows_prefix_call(op) {
                    return Err(EvalError::SyntaxViolation(format!(
                        "'{spelling}' cannot be written before its operands in this profile"
                    )));
                }
                self.call(op, &args)?
            }
            None => match self.suffix() {
                Some((op, _, end)) if self.profile.allows_suffix_call(op) => {
                    self.pos = end;
                    self.call(op, &args)?
                }
                Some((op, spelling, _)) if !self.profile.is_infix(op) => {
                    return Err(EvalError::SyntaxViolation(format!(
                        "'{spelling}' cannot be written after its operands in this profile"
                    )));
                }
                _ => {
                    if args.len() != 1 {
                        return Err(EvalError::SyntaxViolation(format!(
                            "operand list of {} without an operation",
                            args.len()
                        )));
                    }
                    self.ctx.eval_nested(args[0])?
                }
            },
        };
        self.tokens.push(Token::Number(value));
        Ok(())
    }

    /// An operation spelled immediately after the closing `)`, with the char
    /// index just past it.
    fn suffix(&self) -> Option<(CanonicalOp, &'a str, usize)> {
        let class = self.class_at(self.pos)?;
        if !matches!(class, CharClass::Word | CharClass::Symbol) {
            return None;
        }
        let mut end = self.pos;
        while self.class_at(end) == Some(class) {
            end += 1;
        }
        let src = self.src;
        let run = &src[self.offset(self.pos)..self.offset(end)];
        let spelling = self.pieces(self.pos, run).into_iter().next()?;
        let op = self.profile.resolve_spelling(spelling)?;
        Some((op, spelling, self.pos + spelling.chars().count()))
    }

    fn call(&mut self, op: CanonicalOp, args: &[&str]) -> Result<Word> {
        if args.len() != op.arity() {
            return Err(EvalError::ArityMismatch {
                op: self.profile.spelling_of(op).to_owned(),
                expected: op.arity(),
                found: args.len(),
            });
        }
        self.ctx.call(op, args)
    }
}

/// Tokenize `expr` under `profile`, collapsing every call unit and group.
pub fn tokenize(
    expr: &str,
    profile: &SyntaxProfile,
    ctx: &mut dyn CallContext,
) -> Result<Vec<Token>> {
    let tokens = Lexer::new(expr, profile, ctx).tokenize()?;
    tracing::trace!(expr, ?tokens, "tokenized");
    Ok(tokens)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
