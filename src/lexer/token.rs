use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a token in the source text (both 1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Line number
    pub line: usize,
    /// Column number
    pub column: usize,
}

impl Location {
    /// Creates a location
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line: {}, Column: {}", self.line, self.column)
    }
}

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Text of the token (string literals without quotes, numbers without underscores)
    pub text: String,
    /// Where the token starts
    pub location: Location,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, text: impl Into<String>, location: Location) -> Self {
        Token {
            kind,
            text: text.into(),
            location,
        }
    }

    /// Returns true for the end-of-input sentinel
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}: {}>", self.kind, self.text)
    }
}

/// All possible token types in LightScript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Number literal such as `1_000.5`
    NumericLiteral,
    /// Double-quoted string literal
    StringLiteral,
    /// Identifier (alphabetic characters only)
    Identifier,

    // Operators
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// One of `+ - * / %`
    BinaryOperator,
    /// One of `& |` (always doubled in valid programs)
    BooleanOperator,
    /// One of `< >`
    LogicalOperator,

    // Keywords
    /// `let`
    Let,
    /// `const`
    Const,
    /// `fn`
    Function,
    /// `return`
    Return,
    /// `if`
    If,
    /// `while`
    While,
    /// `for` (recognized, rejected by the parser)
    For,
    /// `struct`
    Struct,
    /// `class` (recognized, rejected by the parser)
    Class,

    // Symbols
    /// `=`
    Equals,
    /// `!`
    Not,
    /// `,`
    Comma,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `.`
    Dot,

    // Special
    /// End of input marker
    Eof,
}

impl TokenKind {
    /// Looks up a keyword, returning `None` for ordinary identifiers
    pub fn keyword(s: &str) -> Option<TokenKind> {
        match s {
            "let" => Some(TokenKind::Let),
            "const" => Some(TokenKind::Const),
            "fn" => Some(TokenKind::Function),
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "while" => Some(TokenKind::While),
            "for" => Some(TokenKind::For),
            "struct" => Some(TokenKind::Struct),
            "class" => Some(TokenKind::Class),
            _ => None,
        }
    }

    /// Single-character token table
    pub fn single_char(c: char) -> Option<TokenKind> {
        let kind = match c {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '&' | '|' => TokenKind::BooleanOperator,
            '<' | '>' => TokenKind::LogicalOperator,
            '+' | '-' | '*' | '/' | '%' => TokenKind::BinaryOperator,
            '=' => TokenKind::Equals,
            '!' => TokenKind::Not,
            _ => return None,
        };
        Some(kind)
    }

    /// Check if token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Let
                | TokenKind::Const
                | TokenKind::Function
                | TokenKind::Return
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Struct
                | TokenKind::Class
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_detection() {
        assert_eq!(TokenKind::keyword("let"), Some(TokenKind::Let));
        assert_eq!(TokenKind::keyword("fn"), Some(TokenKind::Function));
        assert_eq!(TokenKind::keyword("class"), Some(TokenKind::Class));
        assert_eq!(TokenKind::keyword("function"), None);
        assert_eq!(TokenKind::keyword("Let"), None);
    }

    #[test]
    fn test_single_char_classes() {
        assert_eq!(TokenKind::single_char('%'), Some(TokenKind::BinaryOperator));
        assert_eq!(TokenKind::single_char('|'), Some(TokenKind::BooleanOperator));
        assert_eq!(TokenKind::single_char('>'), Some(TokenKind::LogicalOperator));
        assert_eq!(TokenKind::single_char('"'), None);
        assert!(TokenKind::While.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Identifier, "foo", Location::new(1, 1));
        assert_eq!(token.to_string(), "<Identifier: foo>");
        assert_eq!(Location::new(2, 5).to_string(), "Line: 2, Column: 5");
    }
}
