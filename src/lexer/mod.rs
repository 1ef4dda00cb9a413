//! Lexical analysis for LightScript
//!
//! Converts source text into a stream of tokens terminated by a single `Eof`.

mod scanner;
mod token;

pub use scanner::{tokenize, Scanner};
pub use token::{Location, Token, TokenKind};
