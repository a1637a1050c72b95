use std::collections::BTreeMap;

use proptest::prelude::*;
use rebind::program::split_statements;
use rebind::script::{
    configure, evaluate_statement, EvalError, EvalOptions, Host, Result, SyntaxProfile, Word,
};
use rebind::var::VarStore;

/// Host that feeds zeros to `input()` and discards `output(x)`.
struct Quiet;

impl Host for Quiet {
    fn read_input(&mut self, _: Option<&str>) -> Result<Word> {
        Ok(0)
    }
    fn write_output(&mut self, _: &str, _: Word) -> Result<()> {
        Ok(())
    }
}

fn eval(src: &str, profile: &SyntaxProfile) -> Result<Word> {
    evaluate_statement(src, profile, &mut VarStore::new(), &mut Quiet, EvalOptions::default())
}

fn eval_default(src: &str) -> Result<Word> {
    eval(src, &SyntaxProfile::default())
}

/// Reference `a^b mod 2^32`.
fn pow_mod(a: u32, b: u32) -> u32 {
    let mut acc: u64 = 1;
    for _ in 0..b {
        acc = (acc * a as u64) % (1 << 32);
    }
    acc as u32
}

proptest! {
    /// `div` and `rem` truncate; a zero divisor is always an error.
    #[test]
    fn division(a in any::<u32>(), b in any::<u32>()) {
        let div = eval_default(&format!("div({a}, {b})"));
        let rem = eval_default(&format!("rem({a}, {b})"));
        if b == 0 {
            prop_assert_eq!(div, Err(EvalError::DivisionByZero));
            prop_assert_eq!(rem, Err(EvalError::DivisionByZero));
        } else {
            prop_assert_eq!(div, Ok(a / b));
            prop_assert_eq!(rem, Ok(a % b));
        }
    }
}

proptest! {
    /// Arithmetic is taken modulo 2^32.
    #[test]
    fn arithmetic_wraps(a in any::<u32>(), b in any::<u32>(), e in 0u32..48) {
        let (a64, b64) = (a as u64, b as u64);
        prop_assert_eq!(eval_default(&format!("add({a}, {b})")), Ok(((a64 + b64) % (1 << 32)) as u32));
        prop_assert_eq!(eval_default(&format!("sub({a}, {b})")), Ok(((a64 + (1 << 32) - b64) % (1 << 32)) as u32));
        prop_assert_eq!(eval_default(&format!("mult({a}, {b})")), Ok(((a64 * b64) % (1 << 32)) as u32));
        prop_assert_eq!(eval_default(&format!("pow({a}, {e})")), Ok(pow_mod(a, e)));
    }
}

proptest! {
    /// Infix precedence agrees with the equivalent nested calls.
    #[test]
    fn infix_matches_calls(a in any::<u32>(), b in any::<u32>(), c in any::<u32>()) {
        let infix = configure(["(op)", "add +", "sub -", "mult *"]).unwrap();
        prop_assert_eq!(
            eval(&format!("{a} + {b} * {c}"), &infix),
            eval_default(&format!("add({a}, mult({b}, {c}))"))
        );
        prop_assert_eq!(
            eval(&format!("{a} - {b} - {c}"), &infix),
            eval_default(&format!("sub(sub({a}, {b}), {c})"))
        );
    }
}

proptest! {
    /// Unary calls agree across the two call conventions.
    #[test]
    fn unary_modes_agree(x in any::<u32>()) {
        let suffix = configure(["()op"]).unwrap();
        prop_assert_eq!(eval(&format!("({x})not"), &suffix), Ok(!x));
        prop_assert_eq!(eval_default(&format!("not({x})")), Ok(!x));
    }
}

#[derive(Debug, Clone)]
enum StoreOp {
    Insert(String, u32),
    Delete(String),
}

fn store_op() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        ("[xyz]{1,3}", any::<u32>()).prop_map(|(n, v)| StoreOp::Insert(n, v)),
        "[xyz]{1,3}".prop_map(StoreOp::Delete),
    ]
}

proptest! {
    /// The trie behaves like an ordered map, including for names that are
    /// prefixes of one another.
    #[test]
    fn store_matches_model(ops in prop::collection::vec(store_op(), 0..64)) {
        let mut store = VarStore::new();
        let mut model: BTreeMap<String, u32> = BTreeMap::new();
        for op in ops {
            match op {
                StoreOp::Insert(name, value) => {
                    prop_assert_eq!(store.insert(&name, value), model.insert(name, value));
                }
                StoreOp::Delete(name) => {
                    prop_assert_eq!(store.delete(&name), model.remove(&name));
                    prop_assert_eq!(store.lookup(&name), None);
                }
            }
        }
        prop_assert_eq!(store.len(), model.len());
        prop_assert_eq!(store.entries(), model.into_iter().collect::<Vec<_>>());
    }
}

proptest! {
    /// Arbitrary text yields a value or an error, never a panic.
    #[test]
    fn evaluation_does_not_panic(s in "\\PC*") {
        let infix = configure(["(op)", "add +", "mult *"]).unwrap();
        let suffix = configure(["()op", "right="]).unwrap();
        let _ = eval_default(&s);
        let _ = eval(&s, &infix);
        let _ = eval(&s, &suffix);
    }
}

proptest! {
    /// Call-heavy fragments exercise the nesting paths.
    #[test]
    fn nested_fragments_do_not_panic(s in "[a-z0-9(), +*=]{0,40}") {
        let infix = configure(["(op)", "add +", "mult *"]).unwrap();
        let _ = eval_default(&s);
        let _ = eval(&s, &infix);
    }
}

proptest! {
    /// Splitting never leaves a separator inside a statement.
    #[test]
    fn statements_have_no_separators(s in "\\PC*") {
        for stmt in split_statements(&s) {
            prop_assert!(!stmt.text.contains(';'));
            prop_assert!(stmt.line >= 1);
        }
    }
}
