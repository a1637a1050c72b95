//! Numeral-system conversions used to seed and display variables.
//!
//! - Roman numerals (`XIV`) and Zeckendorf representations (`8 3 1`) are
//!   accepted by the debug console when declaring a variable.
//! - [`format_radix`] / [`parse_radix`] implement the `base-output` and
//!   `base-input` settings.

use thiserror::Error;

use crate::script::Word;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumeralError {
    #[error("'{0}' is not a Roman numeral digit")]
    BadRomanDigit(char),
    #[error("'{0}' is not a valid Zeckendorf representation")]
    NotZeckendorf(String),
    #[error("'{text}' is not a base-{base} number")]
    BadDigits { text: String, base: u32 },
    #[error("base {0} is outside 2..=36")]
    BadBase(u32),
    #[error("value does not fit in 32 bits")]
    Overflow,
    #[error("empty numeral")]
    Empty,
}

// ── Roman ─────────────────────────────────────────────────────────────────────

fn roman_digit(c: char) -> Option<u64> {
    Some(match c.to_ascii_uppercase() {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => return None,
    })
}

/// Decode a Roman numeral (subtractive notation, case-insensitive).
///
/// Read right to left: a digit smaller than the one after it is subtracted.
pub fn parse_roman(s: &str) -> Result<Word, NumeralError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NumeralError::Empty);
    }
    let mut total: i64 = 0;
    let mut prev = 0;
    for c in s.chars().rev() {
        let value = roman_digit(c).ok_or(NumeralError::BadRomanDigit(c))?;
        if value < prev {
            total -= value as i64;
        } else {
            total += value as i64;
        }
        prev = value;
    }
    Word::try_from(total.max(0)).map_err(|_| NumeralError::Overflow)
}

// ── Zeckendorf ────────────────────────────────────────────────────────────────

/// Fibonacci numbers `1, 2, 3, 5, 8, …` not exceeding `max`.
pub fn fib_sequence(max: u64) -> Vec<u64> {
    let mut fibs = vec![1, 2];
    loop {
        let next = fibs[fibs.len() - 1] + fibs[fibs.len() - 2];
        if next > max {
            break;
        }
        fibs.push(next);
    }
    fibs
}

/// True when every term is a distinct member of `fibs` and no two terms are
/// consecutive Fibonacci numbers.
pub fn is_zeckendorf(terms: &[u64], fibs: &[u64]) -> bool {
    let mut used = vec![false; fibs.len()];
    for term in terms {
        match fibs.iter().position(|f| f == term) {
            Some(i) if !used[i] => used[i] = true,
            _ => return false,
        }
    }
    !used.windows(2).any(|w| w[0] && w[1])
}

/// Decode a whitespace-separated Zeckendorf representation (`"8 3 1"` → 12).
pub fn parse_zeckendorf(s: &str) -> Result<Word, NumeralError> {
    let not_zeckendorf = || NumeralError::NotZeckendorf(s.trim().to_owned());
    let terms = s
        .split_whitespace()
        .map(|t| t.parse::<u64>().map_err(|_| not_zeckendorf()))
        .collect::<Result<Vec<_>, _>>()?;
    if terms.is_empty() {
        return Err(NumeralError::Empty);
    }
    let fibs = fib_sequence(Word::MAX as u64);
    if !is_zeckendorf(&terms, &fibs) {
        return Err(not_zeckendorf());
    }
    Word::try_from(terms.iter().sum::<u64>()).map_err(|_| NumeralError::Overflow)
}

// ── Radix ─────────────────────────────────────────────────────────────────────

const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn check_base(base: u32) -> Result<(), NumeralError> {
    if (2..=36).contains(&base) {
        Ok(())
    } else {
        Err(NumeralError::BadBase(base))
    }
}

/// Render `value` in `base` with upper-case digits.
pub fn format_radix(value: Word, base: u32) -> Result<String, NumeralError> {
    check_base(base)?;
    if value == 0 {
        return Ok("0".to_owned());
    }
    let mut digits = Vec::new();
    let mut n = value;
    while n != 0 {
        digits.push(DIGITS[(n % base) as usize]);
        n /= base;
    }
    digits.reverse();
    Ok(String::from_utf8_lossy(&digits).into_owned())
}

/// Parse a number written in `base` (case-insensitive digits).
pub fn parse_radix(s: &str, base: u32) -> Result<Word, NumeralError> {
    check_base(base)?;
    let s = s.trim();
    if s.is_empty() {
        return Err(NumeralError::Empty);
    }
    Word::from_str_radix(s, base).map_err(|_| NumeralError::BadDigits {
        text: s.to_owned(),
        base,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman() {
        assert_eq!(parse_roman("III"), Ok(3));
        assert_eq!(parse_roman("IV"), Ok(4));
        assert_eq!(parse_roman("xiv"), Ok(14));
        assert_eq!(parse_roman("MCMXCIV"), Ok(1994));
        assert_eq!(parse_roman("MMXXVI"), Ok(2026));
    }

    #[test]
    fn roman_rejects_junk() {
        assert_eq!(parse_roman("XIZ"), Err(NumeralError::BadRomanDigit('Z')));
        assert_eq!(parse_roman(""), Err(NumeralError::Empty));
    }

    #[test]
    fn fibs() {
        assert_eq!(fib_sequence(20), vec![1, 2, 3, 5, 8, 13]);
    }

    #[test]
    fn zeckendorf_valid() {
        assert_eq!(parse_zeckendorf("8 3 1"), Ok(12));
        assert_eq!(parse_zeckendorf("1"), Ok(1));
        assert_eq!(parse_zeckendorf("  13  5 "), Ok(18));
    }

    #[test]
    fn zeckendorf_rejects_consecutive_terms() {
        // 5 and 8 are neighbours in the sequence.
        assert!(matches!(parse_zeckendorf("8 5"), Err(NumeralError::NotZeckendorf(_))));
    }

    #[test]
    fn zeckendorf_rejects_non_fibonacci_and_repeats() {
        assert!(parse_zeckendorf("4").is_err());
        assert!(parse_zeckendorf("3 3").is_err());
        assert!(parse_zeckendorf("x").is_err());
        assert_eq!(parse_zeckendorf(""), Err(NumeralError::Empty));
    }

    #[test]
    fn radix_format() {
        assert_eq!(format_radix(255, 16).unwrap(), "FF");
        assert_eq!(format_radix(5, 2).unwrap(), "101");
        assert_eq!(format_radix(0, 8).unwrap(), "0");
        assert_eq!(format_radix(35, 36).unwrap(), "Z");
        assert_eq!(format_radix(u32::MAX, 10).unwrap(), "4294967295");
        assert_eq!(format_radix(1, 37), Err(NumeralError::BadBase(37)));
    }

    #[test]
    fn radix_parse() {
        assert_eq!(parse_radix("ff", 16), Ok(255));
        assert_eq!(parse_radix(" 101 ", 2), Ok(5));
        assert!(matches!(parse_radix("2", 2), Err(NumeralError::BadDigits { .. })));
        assert_eq!(parse_radix("1", 1), Err(NumeralError::BadBase(1)));
    }
}
