/// A lexical token from a node tree dump.
///
/// `text` is the exact substring the scanner matched, and the printer
/// emits it verbatim. No unescaping or normalization happens anywhere:
/// a string token keeps its surrounding quotes and escape sequences,
/// an atom keeps any whitespace captured inside a bracketed constant
/// group.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Opening of a node record: `{` plus the node type name
    ///
    /// # Examples
    /// ```text
    /// {PLANNEDSTMT
    /// {VAR
    /// ```
    NodeStart,

    /// Closing brace of a node record
    NodeEnd,

    /// Opening of an array: `(` plus an optional lowercase tag letter
    ///
    /// Tagged arrays (`(b`, `(i`, `(o`, ...) render on a single line;
    /// the bare `(` renders one element per line.
    ArrayStart,

    /// Closing paren of an array
    ArrayEnd,

    /// Attribute name inside a node record: `:` plus an identifier
    ///
    /// # Examples
    /// ```text
    /// :commandType
    /// :plan_rows
    /// ```
    Key,

    /// Double-quoted string literal, backslash-escapable
    String,

    /// Any other scalar: identifiers, numbers, punctuation runs like
    /// `<>`, or bracketed constant lists like `[0 1 2]`
    Atom,

    /// End-of-input sentinel
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::NodeStart => "nodeStart",
            TokenKind::NodeEnd => "nodeEnd",
            TokenKind::ArrayStart => "arrayStart",
            TokenKind::ArrayEnd => "arrayEnd",
            TokenKind::Key => "key",
            TokenKind::String => "string",
            TokenKind::Atom => "atom",
            TokenKind::Eof => "end of input",
        };
        write!(f, "{}", name)
    }
}
