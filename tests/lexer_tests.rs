// tests/lexer_tests.rs

use nodefmt::lexer::{LexError, Lexer, TokenCursor};
use nodefmt::token::{Token, TokenKind};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = vec![];
    loop {
        let token = lexer.next_token().unwrap();
        let done = token.kind == TokenKind::Eof;
        out.push(token);
        if done {
            return out;
        }
    }
}

// ============================================================================
// Structural Tokens
// ============================================================================

#[test]
fn test_structural_token_kinds() {
    let test_cases = vec![
        ("{Foo", TokenKind::NodeStart, "{Foo"),
        ("{RANGETBLENTRY", TokenKind::NodeStart, "{RANGETBLENTRY"),
        ("}", TokenKind::NodeEnd, "}"),
        ("(", TokenKind::ArrayStart, "("),
        ("(b", TokenKind::ArrayStart, "(b"),
        ("(o", TokenKind::ArrayStart, "(o"),
        (")", TokenKind::ArrayEnd, ")"),
        (":commandType", TokenKind::Key, ":commandType"),
        (":plan_rows", TokenKind::Key, ":plan_rows"),
    ];

    for (input, kind, text) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, Token::new(kind, text), "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}

#[test]
fn test_array_tag_is_one_lowercase_letter() {
    // Only a single ASCII lowercase letter joins the paren.
    let toks = tokens("(oo");
    assert_eq!(toks[0], Token::new(TokenKind::ArrayStart, "(o"));
    assert_eq!(toks[1], Token::new(TokenKind::Atom, "o"));

    // An uppercase letter stays a separate atom.
    let toks = tokens("(X)");
    assert_eq!(toks[0], Token::new(TokenKind::ArrayStart, "("));
    assert_eq!(toks[1], Token::new(TokenKind::Atom, "X"));
    assert_eq!(toks[2], Token::new(TokenKind::ArrayEnd, ")"));
}

// ============================================================================
// Atoms
// ============================================================================

#[test]
fn test_simple_atoms() {
    let test_cases = vec!["foo", "SEQSCAN", "42", "-5", "3.14", "0.00", "<>", "?", "a_b-c"];

    for input in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(
            token,
            Token::new(TokenKind::Atom, input),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_bracketed_constant_group_is_one_atom() {
    let test_cases = vec!["[]", "[1]", "[0 1 2]", "[ -1 2.5 3 ]", "[1\t2]"];

    for input in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(
            token,
            Token::new(TokenKind::Atom, input),
            "Failed for input: {}",
            input
        );
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}

#[test]
fn test_constant_group_joins_preceding_run() {
    // This is how Datum values print: a length then the raw bytes.
    // The whitespace between them belongs to the atom.
    let toks = tokens("4 [ 0 0 0 0 ]");
    assert_eq!(toks[0], Token::new(TokenKind::Atom, "4 [ 0 0 0 0 ]"));
    assert_eq!(toks[1].kind, TokenKind::Eof);
}

#[test]
fn test_run_after_group_is_a_separate_atom() {
    // Whitespace only folds in before a '[', never before a plain run.
    let toks = tokens("[1] foo");
    assert_eq!(toks[0], Token::new(TokenKind::Atom, "[1]"));
    assert_eq!(toks[1], Token::new(TokenKind::Atom, "foo"));
}

#[test]
fn test_malformed_group_backtracks() {
    // "[1a]" is not a constant group; the lone '[' matches nothing.
    let mut lexer = Lexer::new("[1a]");
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnexpectedChar {
            found: '[',
            position: 0
        })
    );

    // After a valid run the failed group attempt just ends the atom.
    let mut lexer = Lexer::new("foo[1a]");
    assert_eq!(lexer.next_token().unwrap(), Token::new(TokenKind::Atom, "foo"));
    assert!(lexer.next_token().is_err());
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_text_is_verbatim() {
    let test_cases = vec![
        r#""hello""#,
        r#""hello world""#,
        r#""""#,
        r#""with \"escaped\" quotes""#,
        r#""back\\slash""#,
    ];

    for input in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(
            token,
            Token::new(TokenKind::String, input),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new(r#""abc"#);
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnterminatedString { position: 0 })
    );

    // A raw newline ends the line before the string closes.
    let mut lexer = Lexer::new("\"ab\ncd\"");
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnterminatedString { position: 0 })
    );
}

#[test]
fn test_invalid_escape() {
    let mut lexer = Lexer::new(r#""a\nb""#);
    assert_eq!(
        lexer.next_token(),
        Err(LexError::InvalidEscape {
            found: 'n',
            position: 3
        })
    );
}

// ============================================================================
// Whitespace
// ============================================================================

#[test]
fn test_whitespace_is_skipped() {
    let toks = tokens("  {Foo \t :a \r\n 1 \n }  ");
    let kinds: Vec<TokenKind> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::NodeStart,
            TokenKind::Key,
            TokenKind::Atom,
            TokenKind::NodeEnd,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unmatchable_characters() {
    let test_cases = vec![(";", ';'), ("=", '='), ("#", '#'), ("]", ']')];

    for (input, ch) in test_cases {
        let mut lexer = Lexer::new(input);
        let result = lexer.next_token();
        assert_eq!(
            result,
            Err(LexError::UnexpectedChar {
                found: ch,
                position: 0
            }),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_bare_colon_and_brace_are_invalid() {
    // ':' and '{' only form tokens together with an identifier.
    let mut lexer = Lexer::new(": x");
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnexpectedChar {
            found: ':',
            position: 0
        })
    );

    let mut lexer = Lexer::new("{ Foo}");
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnexpectedChar {
            found: '{',
            position: 0
        })
    );
}

#[test]
fn test_error_position_is_mid_stream() {
    let mut lexer = Lexer::new("{Foo :a ;");
    lexer.next_token().unwrap(); // {Foo
    lexer.next_token().unwrap(); // :a
    let result = lexer.next_token();
    assert_eq!(
        result,
        Err(LexError::UnexpectedChar {
            found: ';',
            position: 8
        })
    );
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Unexpected character ';' at position 8"));
}

// ============================================================================
// Cursor
// ============================================================================

#[test]
fn test_cursor_peek_and_next() {
    let mut cursor = TokenCursor::new(Lexer::new("{Foo }")).unwrap();

    // Repeated peeks see the same token.
    assert_eq!(cursor.peek(), &Token::new(TokenKind::NodeStart, "{Foo"));
    assert_eq!(cursor.peek(), &Token::new(TokenKind::NodeStart, "{Foo"));

    // next() returns the peeked token and advances.
    assert_eq!(
        cursor.next().unwrap(),
        Token::new(TokenKind::NodeStart, "{Foo")
    );
    assert_eq!(cursor.peek(), &Token::new(TokenKind::NodeEnd, "}"));
    assert_eq!(cursor.next().unwrap().kind, TokenKind::NodeEnd);

    // Past the end the cursor keeps yielding Eof.
    assert_eq!(cursor.peek().kind, TokenKind::Eof);
    assert_eq!(cursor.next().unwrap().kind, TokenKind::Eof);
    assert_eq!(cursor.peek().kind, TokenKind::Eof);
}

#[test]
fn test_cursor_surfaces_lex_errors_lazily() {
    // The bad character sits one token in; construction succeeds, but
    // the advance that would pull ';' fails and does not consume.
    let mut cursor = TokenCursor::new(Lexer::new("{Foo ;")).unwrap();
    assert_eq!(cursor.peek().text, "{Foo");
    assert!(matches!(
        cursor.next(),
        Err(LexError::UnexpectedChar { found: ';', .. })
    ));
    assert_eq!(cursor.peek().text, "{Foo");
}
