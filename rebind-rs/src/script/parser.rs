//! Shunting-yard conversion of a token stream into postfix order.
//!
//! Precedence comes from [`CanonicalOp::precedence`]; operators of equal
//! precedence associate to the left (an incoming operator pops every stacked
//! operator whose precedence is greater than *or equal to* its own).

use super::error::{EvalError, Result};
use super::lexer::Token;

pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for &token in tokens {
        match token {
            Token::Number(_) => output.push(token),
            Token::Op(op) => {
                let prec = op
                    .precedence()
                    .ok_or_else(|| EvalError::InvalidToken(op.name().to_owned()))?;
                while let Some(&Token::Op(top)) = stack.last() {
                    if top.precedence().unwrap_or(0) < prec {
                        break;
                    }
                    output.push(Token::Op(top));
                    stack.pop();
                }
                stack.push(token);
            }
            Token::GroupOpen => stack.push(token),
            Token::GroupClose => loop {
                match stack.pop() {
                    Some(Token::GroupOpen) => break,
                    Some(t) => output.push(t),
                    None => {
                        return Err(EvalError::UnbalancedGrouping(
                            "')' without matching '('".into(),
                        ))
                    }
                }
            },
        }
    }

    while let Some(t) = stack.pop() {
        if t == Token::GroupOpen {
            return Err(EvalError::UnbalancedGrouping("'(' without matching ')'".into()));
        }
        output.push(t);
    }
    tracing::trace!(?output, "postfix");
    Ok(output)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
