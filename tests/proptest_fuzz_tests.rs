//! Property-based fuzzing tests for the scanner, parser and evaluator
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. Every token stream ends in exactly one `Eof`
//! 2. The scanner and parser never panic on arbitrary input
//! 3. Number arithmetic agrees with Rust's f64 arithmetic

use lightscript::{parse, tokenize, Error, Execution, Scope, TokenKind, Value};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Generate random strings that might break the scanner
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,300}").unwrap()
}

/// Generate token soup that looks like LightScript
fn script_like_string() -> impl Strategy<Value = String> {
    prop::collection::vec(script_token(), 0..40).prop_map(|tokens| tokens.join(" "))
}

fn script_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just(";".to_string()),
        Just(":".to_string()),
        Just(".".to_string()),
        // Keywords
        Just("let".to_string()),
        Just("const".to_string()),
        Just("fn".to_string()),
        Just("return".to_string()),
        Just("if".to_string()),
        Just("while".to_string()),
        Just("struct".to_string()),
        // Operators
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("%".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("<".to_string()),
        Just(">".to_string()),
        Just("&&".to_string()),
        Just("||".to_string()),
        Just("!".to_string()),
        // Literals
        (0u32..1000).prop_map(|n| n.to_string()),
        "[a-z]{1,6}".prop_map(|s| s),
        "[a-z ]{0,6}".prop_map(|s| format!("\"{}\"", s)),
    ]
}

fn operator() -> impl Strategy<Value = char> {
    prop_oneof![Just('+'), Just('-'), Just('*'), Just('/'), Just('%')]
}

fn eval(source: &str) -> lightscript::Result<Value> {
    let program = parse(tokenize(source)?)?;
    Execution::new(program, Scope::new()).run_to_completion()
}

// =============================================================================
// SCANNER PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn test_token_stream_ends_with_single_eof(source in script_like_string()) {
        let tokens = tokenize(&source).unwrap();
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        prop_assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
    }

    #[test]
    fn test_scanner_never_panics(source in arbitrary_source_string()) {
        if let Ok(tokens) = tokenize(&source) {
            prop_assert!(tokens.last().is_some_and(|t| t.is_eof()));
        }
    }
}

// =============================================================================
// PARSER / EVALUATOR PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn test_parser_never_panics(source in script_like_string()) {
        if let Ok(tokens) = tokenize(&source) {
            let _ = parse(tokens);
        }
    }

    #[test]
    fn test_evaluator_never_panics(source in script_like_string()) {
        // Loops may not terminate
        prop_assume!(!source.contains("while"));
        let _ = eval(&source);
    }

    #[test]
    fn test_arithmetic_matches_f64(
        a in 0u32..10_000,
        b in 1u32..10_000,
        op in operator(),
    ) {
        let (x, y) = (a as f64, b as f64);
        let expected = match op {
            '+' => x + y,
            '-' => x - y,
            '*' => x * y,
            '/' => x / y,
            _ => x % y,
        };

        let result = eval(&format!("{} {} {}", a, op, b)).unwrap();
        prop_assert_eq!(result, Value::Number(expected));
    }

    #[test]
    fn test_zero_divisor_faults(a in 0u32..10_000, modulo in any::<bool>()) {
        let op = if modulo { '%' } else { '/' };
        let result = eval(&format!("{} {} 0", a, op));
        prop_assert!(matches!(result, Err(Error::DivisionByZero)));
    }
}
