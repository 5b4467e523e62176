pub mod lexer;
pub mod printer;
pub mod token;

pub use lexer::{LexError, Lexer, TokenCursor};
pub use printer::{format, FormatFailure, Printer, SyntaxError};
pub use token::{Token, TokenKind};
