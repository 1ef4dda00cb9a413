use super::token::{Location, Token, TokenKind};
use crate::error::{Error, Result};

/// Scanner for LightScript source text
pub struct Scanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl Scanner {
    /// Creates a new scanner from source code
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans all tokens from source code, terminated by a single `Eof`
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        self.tokens.clear();

        while !self.is_at_end() {
            self.scan_token()?;
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, "EOF", self.location()));

        tracing::trace!(count = self.tokens.len(), "scanned tokens");
        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> Result<()> {
        let start = self.location();
        let c = self.peek();

        match c {
            ' ' | '\t' | '\n' | '\r' => {
                self.advance();
            }

            '/' if self.peek_next() == '*' => self.skip_block_comment(start)?,

            '"' => self.scan_string(start)?,

            c if c.is_ascii_digit() || c == '_' => self.scan_number(start)?,

            c if has_case(c) => self.scan_identifier(start),

            c => match TokenKind::single_char(c) {
                Some(kind) => {
                    self.advance();
                    self.tokens.push(Token::new(kind, c.to_string(), start));
                }
                None => {
                    return Err(self.error(start, format!("Unknown character '{}'", c)));
                }
            },
        }

        Ok(())
    }

    /// Skips `/* ... */`; comments do not nest
    fn skip_block_comment(&mut self, start: Location) -> Result<()> {
        self.advance(); // /
        self.advance(); // *

        loop {
            if self.is_at_end() {
                return Err(self.error(start, "Unterminated block comment"));
            }
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }
    }

    /// Strings are taken verbatim up to the next quote; there are no escapes
    fn scan_string(&mut self, start: Location) -> Result<()> {
        self.advance(); // opening "
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != '"' {
            value.push(self.advance());
        }

        if self.is_at_end() {
            return Err(self.error(start, "Unterminated string literal"));
        }

        self.advance(); // closing "
        self.tokens
            .push(Token::new(TokenKind::StringLiteral, value, start));
        Ok(())
    }

    /// Digits, dots and underscores are consumed greedily; underscores are dropped
    fn scan_number(&mut self, start: Location) -> Result<()> {
        let mut text = String::new();

        while !self.is_at_end() && is_numeric_char(self.peek()) {
            let c = self.advance();
            if c != '_' {
                text.push(c);
            }
        }

        if text.is_empty() || text.parse::<f64>().is_err() {
            return Err(self.error(start, format!("Error parsing number literal `{}`", text)));
        }

        self.tokens
            .push(Token::new(TokenKind::NumericLiteral, text, start));
        Ok(())
    }

    fn scan_identifier(&mut self, start: Location) {
        let mut text = String::new();

        while !self.is_at_end() && has_case(self.peek()) {
            text.push(self.advance());
        }

        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token::new(kind, text, start));
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    fn error(&self, at: Location, message: impl Into<String>) -> Error {
        Error::Lex {
            line: at.line,
            column: at.column,
            message: message.into(),
        }
    }
}

/// Tokenizes `source` in one call
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Scanner::new(source).scan_tokens()
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '_'
}

/// Identifier characters are exactly those with distinct upper and lower case forms
fn has_case(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase()
}
