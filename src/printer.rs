//! Indented rendering of node tree dumps.
//!
//! The printer consumes tokens straight off a [`TokenCursor`] and writes
//! the output as it goes; there is no intermediate tree. Node records get
//! one attribute per line, indented two spaces per nesting level. Arrays
//! opened with a bare `(` get one element per line; arrays opened with a
//! tag letter (`(b`, `(i`, ...) stay on a single line.
//!
//! On a malformed dump the error unwinds immediately, but everything
//! rendered up to that point is kept — a truncated plan dump still
//! formats as far as it goes, which is usually what you want when
//! inspecting one.
//!
//! # Examples
//!
//! ```
//! let out = nodefmt::format("{Foo :a 1 :b 2}").unwrap();
//! assert_eq!(out, "{Foo\n  :a 1\n  :b 2\n}");
//! ```

use crate::lexer::{LexError, Lexer, TokenCursor};
use crate::token::{Token, TokenKind};

const INDENT_SIZE: usize = 2;

/// Errors raised when the token stream does not fit the grammar
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxError {
    /// The scanner failed underneath the cursor
    Lex(LexError),
    /// A directed consume found the wrong token kind
    Expected { expected: TokenKind, found: Token },
    /// The current token fits no grammar rule at this point
    Unexpected(Token),
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::Lex(e) => write!(f, "{}", e),
            SyntaxError::Expected { expected, found } => {
                write!(f, "Expected '{}', got '{}': {}", expected, found.kind, found.text)
            }
            SyntaxError::Unexpected(token) => {
                write!(f, "Unexpected token '{}': {}", token.kind, token.text)
            }
        }
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyntaxError::Lex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LexError> for SyntaxError {
    fn from(e: LexError) -> Self {
        SyntaxError::Lex(e)
    }
}

/// A failed run, carrying whatever output was rendered before the error
#[derive(Debug, Clone, PartialEq)]
pub struct FormatFailure {
    pub partial: String,
    pub error: SyntaxError,
}

impl std::fmt::Display for FormatFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for FormatFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

pub struct Printer {
    cursor: TokenCursor,
    output: String,
    indent: usize,
}

impl Printer {
    pub fn new(cursor: TokenCursor) -> Self {
        Printer {
            cursor,
            output: String::new(),
            indent: 0,
        }
    }

    /// The output rendered so far; valid even after a failed visit.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn next(&mut self) -> Result<Token, SyntaxError> {
        Ok(self.cursor.next()?)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.cursor.peek().kind != kind {
            return Err(SyntaxError::Expected {
                expected: kind,
                found: self.cursor.peek().clone(),
            });
        }
        self.next()
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Starts a new line at the current indentation and writes `text`.
    /// At the very beginning of the output no line break is emitted, so
    /// the result never opens with a blank line.
    fn write_line(&mut self, text: &str) {
        if !self.output.is_empty() {
            self.output.push('\n');
            self.output.push_str(&" ".repeat(self.indent * INDENT_SIZE));
        }
        self.output.push_str(text);
    }

    /// Renders one value: a node record, an array, or a scalar emitted
    /// verbatim.
    pub fn visit_value(&mut self) -> Result<(), SyntaxError> {
        match self.cursor.peek().kind {
            TokenKind::NodeStart => self.visit_node(),
            TokenKind::ArrayStart => self.visit_array(),
            TokenKind::Atom | TokenKind::String => {
                let token = self.next()?;
                self.write(&token.text);
                Ok(())
            }
            _ => Err(SyntaxError::Unexpected(self.cursor.peek().clone())),
        }
    }

    fn visit_node(&mut self) -> Result<(), SyntaxError> {
        let token = self.expect(TokenKind::NodeStart)?;
        self.write(&token.text);
        self.indent += 1;

        let mut token = self.next()?;
        let mut attrs = 0;
        while token.kind != TokenKind::NodeEnd {
            if token.kind != TokenKind::Key {
                return Err(SyntaxError::Unexpected(token));
            }

            self.write_line(&format!("{} ", token.text));
            let upcoming = self.cursor.peek();
            // An AttrNumber array attribute may carry no value at all;
            // the next key or the closing brace follows directly.
            if upcoming.kind != TokenKind::Key && upcoming.kind != TokenKind::NodeEnd {
                self.visit_value()?;
            }

            attrs += 1;
            token = self.next()?;
        }

        self.indent -= 1;
        if attrs > 0 {
            self.write_line("}");
        } else {
            self.write("}");
        }
        Ok(())
    }

    fn visit_array(&mut self) -> Result<(), SyntaxError> {
        let token = self.expect(TokenKind::ArrayStart)?;
        self.write(&token.text);
        self.indent += 1;

        let one_line = token.text != "(";

        let mut elements = 0;
        while self.cursor.peek().kind != TokenKind::ArrayEnd {
            if one_line {
                self.write(" ");
            } else {
                self.write_line("");
            }

            self.visit_value()?;
            elements += 1;
        }

        self.expect(TokenKind::ArrayEnd)?;

        self.indent -= 1;
        if elements > 0 && !one_line {
            self.write_line(")");
        } else {
            self.write(")");
        }
        Ok(())
    }
}

/// Formats a complete node tree dump.
///
/// On failure the partially rendered output is returned alongside the
/// error so callers can still surface it. Input past the single
/// top-level value is ignored.
pub fn format(input: &str) -> Result<String, FormatFailure> {
    let cursor = TokenCursor::new(Lexer::new(input)).map_err(|e| FormatFailure {
        partial: String::new(),
        error: SyntaxError::Lex(e),
    })?;

    let mut printer = Printer::new(cursor);
    match printer.visit_value() {
        Ok(()) => Ok(printer.into_output()),
        Err(error) => Err(FormatFailure {
            partial: printer.into_output(),
            error,
        }),
    }
}
