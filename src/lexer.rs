use crate::token::{Token, TokenKind};
use std::mem;

/// Errors raised while scanning the raw dump text
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// No token pattern matches at this position
    UnexpectedChar { found: char, position: usize },
    /// A string literal ran into a newline or end of input
    UnterminatedString { position: usize },
    /// A backslash escaping anything other than `"` or `\`
    InvalidEscape { found: char, position: usize },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnexpectedChar { found, position } => {
                write!(f, "Unexpected character '{}' at position {}", found, position)
            }
            LexError::UnterminatedString { position } => {
                write!(f, "Unterminated string starting at position {}", position)
            }
            LexError::InvalidEscape { found, position } => {
                write!(f, "Invalid escape sequence '\\{}' at position {}", found, position)
            }
        }
    }
}

impl std::error::Error for LexError {}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_atom_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '<' | '>' | '.' | '?' | '-')
}

fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if is_space(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Appends `[A-Za-z0-9_]+` to `out`, returning how many chars matched.
    fn read_identifier(&mut self, out: &mut String) -> usize {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if is_ident_char(ch) {
                out.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        self.position - start
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut text = String::from('"');
        self.advance(); // Consume opening quote

        loop {
            match self.current_char() {
                None | Some('\n') => {
                    return Err(LexError::UnterminatedString { position: start });
                }
                Some('"') => {
                    text.push('"');
                    self.advance();
                    return Ok(Token::new(TokenKind::String, text));
                }
                Some('\\') => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some(ch @ ('"' | '\\')) => {
                            text.push('\\');
                            text.push(ch);
                            self.advance();
                        }
                        Some(ch) => {
                            return Err(LexError::InvalidEscape {
                                found: ch,
                                position: self.position,
                            });
                        }
                        None => {
                            return Err(LexError::UnterminatedString { position: start });
                        }
                    }
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn read_key(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut text = String::from(':');
        self.advance(); // Consume ':'

        if self.read_identifier(&mut text) == 0 {
            return Err(LexError::UnexpectedChar {
                found: ':',
                position: start,
            });
        }
        Ok(Token::new(TokenKind::Key, text))
    }

    fn read_node_start(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut text = String::from('{');
        self.advance(); // Consume '{'

        if self.read_identifier(&mut text) == 0 {
            return Err(LexError::UnexpectedChar {
                found: '{',
                position: start,
            });
        }
        Ok(Token::new(TokenKind::NodeStart, text))
    }

    fn read_array_start(&mut self) -> Token {
        let mut text = String::from('(');
        self.advance(); // Consume '('

        // A single lowercase letter tags the array for one-line layout.
        if let Some(ch) = self.current_char() {
            if ch.is_ascii_lowercase() {
                text.push(ch);
                self.advance();
            }
        }
        Token::new(TokenKind::ArrayStart, text)
    }

    /// Tries to match a bracketed constant group: optional whitespace,
    /// `[`, zero or more numbers (optional `-`, one digit, optional `.`
    /// and more digits, whitespace in between), `]`. On a miss the scan
    /// position and `out` are restored and the atom ends.
    fn try_read_constant_group(&mut self, out: &mut String) -> bool {
        let start = self.position;
        let mark = out.len();

        while let Some(ch) = self.current_char() {
            if is_space(ch) {
                out.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char() != Some('[') {
            self.position = start;
            out.truncate(mark);
            return false;
        }
        out.push('[');
        self.advance();

        loop {
            let entry_start = self.position;
            let entry_mark = out.len();

            while let Some(ch) = self.current_char() {
                if is_space(ch) {
                    out.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            if self.current_char() == Some('-') {
                out.push('-');
                self.advance();
            }
            match self.current_char() {
                Some(ch) if ch.is_ascii_digit() => {
                    out.push(ch);
                    self.advance();
                }
                _ => {
                    // Not a number entry; give back any whitespace or
                    // '-' consumed above and fall through to ']'.
                    self.position = entry_start;
                    out.truncate(entry_mark);
                    break;
                }
            }
            if self.current_char() == Some('.') {
                out.push('.');
                self.advance();
                while let Some(ch) = self.current_char() {
                    if ch.is_ascii_digit() {
                        out.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        while let Some(ch) = self.current_char() {
            if is_space(ch) {
                out.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        if self.current_char() == Some(']') {
            out.push(']');
            self.advance();
            true
        } else {
            self.position = start;
            out.truncate(mark);
            false
        }
    }

    // The bracketed group alternative is how the dump prints constant
    // value lists; the captured whitespace stays part of the atom text.
    fn read_atom(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut text = String::new();

        loop {
            match self.current_char() {
                Some(ch) if is_atom_char(ch) => {
                    text.push(ch);
                    self.advance();
                }
                _ => {
                    if !self.try_read_constant_group(&mut text) {
                        break;
                    }
                }
            }
        }

        if text.is_empty() {
            // Only reachable on a '[' that never closed into a group.
            Err(LexError::UnexpectedChar {
                found: self.current_char().unwrap_or('['),
                position: start,
            })
        } else {
            Ok(Token::new(TokenKind::Atom, text))
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        match self.current_char() {
            None => Ok(Token::new(TokenKind::Eof, "")),
            Some('"') => self.read_string(),
            Some(':') => self.read_key(),
            Some('{') => self.read_node_start(),
            Some('}') => {
                self.advance();
                Ok(Token::new(TokenKind::NodeEnd, "}"))
            }
            Some('(') => Ok(self.read_array_start()),
            Some(')') => {
                self.advance();
                Ok(Token::new(TokenKind::ArrayEnd, ")"))
            }
            Some(ch) if is_atom_char(ch) || ch == '[' => self.read_atom(),
            Some(ch) => Err(LexError::UnexpectedChar {
                found: ch,
                position: self.position,
            }),
        }
    }
}

/// Lookahead-1 cursor over the token stream.
///
/// Holds the current token so [`peek`](TokenCursor::peek) is free and
/// stable; [`next`](TokenCursor::next) hands the current token out and
/// pulls the following one from the scanner. At end of input the cursor
/// yields the `Eof` token forever.
pub struct TokenCursor {
    lexer: Lexer,
    current: Token,
}

impl TokenCursor {
    pub fn new(mut lexer: Lexer) -> Result<Self, LexError> {
        let current = lexer.next_token()?;
        Ok(TokenCursor { lexer, current })
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    pub fn next(&mut self) -> Result<Token, LexError> {
        let upcoming = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, upcoming))
    }
}

#[test]
fn test_structural_tokens() {
    let mut lexer = Lexer::new("{PLANNEDSTMT :planTree (b 0 1) }");
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::new(TokenKind::NodeStart, "{PLANNEDSTMT")
    );
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::new(TokenKind::Key, ":planTree")
    );
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::new(TokenKind::ArrayStart, "(b")
    );
    assert_eq!(lexer.next_token().unwrap(), Token::new(TokenKind::Atom, "0"));
    assert_eq!(lexer.next_token().unwrap(), Token::new(TokenKind::Atom, "1"));
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::new(TokenKind::ArrayEnd, ")")
    );
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::new(TokenKind::NodeEnd, "}")
    );
    assert_eq!(lexer.next_token().unwrap(), Token::new(TokenKind::Eof, ""));
}

#[test]
fn test_cursor_peek_is_stable() {
    let cursor = TokenCursor::new(Lexer::new("a b")).unwrap();
    assert_eq!(cursor.peek(), cursor.peek());
    assert_eq!(cursor.peek().text, "a");
}
