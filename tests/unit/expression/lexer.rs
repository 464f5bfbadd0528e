use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).unwrap().into_iter().map(|t| t.kind).collect()
}

fn number(src: &str) -> f64 {
    match kinds(src).as_slice() {
        [TokenKind::Number(v), TokenKind::Eof] => *v,
        other => panic!("expected a single number, got {other:?}"),
    }
}

#[test]
fn lexes_operators_and_offsets() {
    let toks = lex("10 + 5 ** 2").unwrap();
    let got: Vec<_> = toks.iter().map(|t| (t.kind.clone(), t.offset)).collect();
    assert_eq!(
        got,
        vec![
            (TokenKind::Number(10.0), 0),
            (TokenKind::Plus, 3),
            (TokenKind::Number(5.0), 5),
            (TokenKind::StarStar, 7),
            (TokenKind::Number(2.0), 10),
            (TokenKind::Eof, 11),
        ]
    );
}

#[test]
fn decimal_literal_forms() {
    assert_eq!(number("12"), 12.0);
    assert_eq!(number("12.5"), 12.5);
    assert_eq!(number(".5"), 0.5);
    assert_eq!(number("5."), 5.0);
    assert_eq!(number("1e3"), 1000.0);
    assert_eq!(number("2.5E-2"), 0.025);
    assert_eq!(number("1_000_000"), 1_000_000.0);
    assert_eq!(number("00"), 0.0);
    assert_eq!(number("012.5"), 12.5);
}

#[test]
fn radix_literal_forms() {
    assert_eq!(number("0x1F"), 31.0);
    assert_eq!(number("0o17"), 15.0);
    assert_eq!(number("0b1010"), 10.0);
    assert_eq!(number("0x_ff"), 255.0);
    assert_eq!(number("0xFFFF_FFFF_FFFF_FFFF"), u64::MAX as f64);
    assert_eq!(number("0b1"), 1.0);
}

#[test]
fn malformed_numbers_fail_to_lex() {
    for src in ["012", "1__0", "1_", "1e", "1e+", "2x", "0b102", "0x", "1.5abc"] {
        let err = lex(src).unwrap_err();
        assert!(
            matches!(err, EvaluationError::ParseFailure { .. }),
            "{src}: {err:?}"
        );
    }
}

#[test]
fn imaginary_suffix_is_its_own_token() {
    assert_eq!(kinds("3j"), vec![TokenKind::Imaginary, TokenKind::Eof]);
    assert_eq!(kinds("1.5J"), vec![TokenKind::Imaginary, TokenKind::Eof]);
}

#[test]
fn identifiers_and_strings() {
    assert_eq!(
        kinds("__import__('os')"),
        vec![
            TokenKind::Ident("__import__".to_owned()),
            TokenKind::LParen,
            TokenKind::Str,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds(r#""a\"b" é"#),
        vec![
            TokenKind::Str,
            TokenKind::Ident("é".to_owned()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn unterminated_string_fails() {
    let err = lex("'abc").unwrap_err();
    assert_eq!(
        err,
        EvaluationError::parse(0, "unterminated string literal")
    );
}

#[test]
fn multi_char_operators_win_over_prefixes() {
    assert_eq!(
        kinds("a **= 2 // 3 << 1 := b"),
        vec![
            TokenKind::Ident("a".to_owned()),
            TokenKind::AugAssign,
            TokenKind::Number(2.0),
            TokenKind::SlashSlash,
            TokenKind::Number(3.0),
            TokenKind::Shl,
            TokenKind::Number(1.0),
            TokenKind::Walrus,
            TokenKind::Ident("b".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unexpected_character_reports_offset() {
    let err = lex("1 + $").unwrap_err();
    match err {
        EvaluationError::ParseFailure { offset, message } => {
            assert_eq!(offset, 4);
            assert!(message.contains("unexpected character"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_ascii_punctuation_does_not_split_chars() {
    let err = lex("1 × 2").unwrap_err();
    assert!(matches!(err, EvaluationError::ParseFailure { offset: 2, .. }));
}

#[test]
fn empty_input_is_just_eof() {
    assert_eq!(kinds("  \t\n"), vec![TokenKind::Eof]);
}
