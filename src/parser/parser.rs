use super::ast::{BinaryOp, BooleanOp, Expression, Field, LogicalOp, Program, Property, Statement};
use crate::error::{Error, Result};
use crate::lexer::{Location, Token, TokenKind};
use std::rc::Rc;

/// Recursive-descent parser for LightScript
///
/// Expression layers, loosest binding first:
///
/// ```text
/// not → logical (< > <= >= == !=) → boolean (&& ||) → assignment (=)
///     → array [..] → object {..} → additive (+ -) → multiplicative (* / %)
///     → call chain f(..)(..) → member chain a.b[c] → primary
/// ```
///
/// Logical, boolean and assignment layers take the whole remaining
/// expression as their right operand; additive and multiplicative fold left.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    /// Syntax tree depth reached so far at the current position
    depth: usize,
}

/// Deepest syntax tree the parser builds before faulting
pub const MAX_NESTING: usize = 128;

impl Parser {
    /// Creates a new parser; a missing `Eof` sentinel is appended
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let location = tokens.last().map(|t| t.location).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, "EOF", location));
        }
        Parser {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    /// Parses the tokens into a program
    pub fn parse(&mut self) -> Result<Program> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            // `}` only closes a block
            if self.check(TokenKind::CloseBrace) {
                let token = self.peek();
                return Err(self.error(token.location, format!("Unexpected token: {}", token)));
            }
            body.extend(self.parse_statement()?);
        }

        tracing::trace!(statements = body.len(), "parsed program");
        Ok(Program { body })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Parses one source statement; declarations like `let a, b` expand to several
    fn parse_statement(&mut self) -> Result<Vec<Statement>> {
        while self.check(TokenKind::Semicolon) {
            self.eat()?;
        }

        match self.peek().kind {
            TokenKind::CloseBrace | TokenKind::Eof => Ok(Vec::new()),
            TokenKind::Class => Err(self.error_at_current("Classes are not yet supported")),
            TokenKind::For => Err(self.error_at_current("For loops are not yet supported")),
            TokenKind::Struct => Ok(vec![self.parse_struct_declaration()?]),
            TokenKind::Let | TokenKind::Const => {
                let keyword = self.eat()?;
                self.parse_variable_declaration(keyword.kind == TokenKind::Const)
            }
            TokenKind::While => Ok(vec![self.parse_while()?]),
            TokenKind::Function => Ok(vec![self.parse_function_declaration()?]),
            TokenKind::Return => Ok(vec![self.parse_return()?]),
            TokenKind::If => Ok(vec![self.parse_if()?]),
            _ => Ok(vec![Statement::Expression(self.parse_expression()?)]),
        }
    }

    fn parse_struct_declaration(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Struct)?;
        let name = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::OpenBrace)?;

        let mut fields = Vec::new();
        while !self.check(TokenKind::CloseBrace) && !self.is_at_end() {
            let field_name = self.expect(TokenKind::Identifier)?.text;
            self.expect(TokenKind::Colon)?;
            let type_name = self.expect(TokenKind::Identifier)?.text;
            fields.push(Field {
                name: field_name,
                type_name,
            });

            if self.check(TokenKind::Comma) {
                self.eat()?;
            }
        }

        if fields.is_empty() {
            return Err(self.error_at_current(format!("Expected field in Struct {}", name)));
        }

        self.expect(TokenKind::CloseBrace)?;
        Ok(Statement::StructDeclaration { name, fields })
    }

    fn parse_variable_declaration(&mut self, is_constant: bool) -> Result<Vec<Statement>> {
        let mut declarations = Vec::new();

        loop {
            let name = self.expect(TokenKind::Identifier)?.text;

            let value = if self.check(TokenKind::Equals) {
                self.eat()?;
                self.parse_expression()?
            } else {
                Expression::Identifier("null".to_string())
            };

            declarations.push(Statement::VariableDeclaration {
                name,
                is_constant,
                value,
            });

            // let x = 2, y = 4
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.eat()?;
        }

        Ok(declarations)
    }

    fn parse_function_declaration(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Function)?;
        let name = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::OpenParen)?;

        let mut parameters = Vec::new();
        while !self.check(TokenKind::CloseParen) && !self.is_at_end() {
            parameters.push(self.expect(TokenKind::Identifier)?.text);

            if self.check(TokenKind::Comma) {
                self.eat()?;
            }
        }
        self.expect(TokenKind::CloseParen)?;

        let body = self.parse_block()?;
        Ok(Statement::FunctionDeclaration {
            name,
            parameters,
            body: Rc::new(body),
        })
    }

    fn parse_return(&mut self) -> Result<Statement> {
        self.expect(TokenKind::Return)?;

        if matches!(
            self.peek().kind,
            TokenKind::CloseBrace | TokenKind::Semicolon | TokenKind::Eof
        ) {
            return Ok(Statement::Return(Expression::Identifier("null".to_string())));
        }

        Ok(Statement::Return(self.parse_expression()?))
    }

    fn parse_if(&mut self) -> Result<Statement> {
        self.expect(TokenKind::If)?;
        let test = self.parse_condition()?;
        let consequent = self.parse_block()?;
        Ok(Statement::If { test, consequent })
    }

    fn parse_while(&mut self) -> Result<Statement> {
        self.expect(TokenKind::While)?;
        let test = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Statement::While { test, body })
    }

    /// `( expression )`
    fn parse_condition(&mut self) -> Result<Expression> {
        self.expect(TokenKind::OpenParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::CloseParen)?;
        Ok(test)
    }

    /// `{ statement* }`
    fn parse_block(&mut self) -> Result<Vec<Statement>> {
        self.nested(Self::parse_block_body)
    }

    fn parse_block_body(&mut self) -> Result<Vec<Statement>> {
        self.expect(TokenKind::OpenBrace)?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::CloseBrace) && !self.is_at_end() {
            statements.extend(self.parse_statement()?);
        }

        self.expect(TokenKind::CloseBrace)?;
        Ok(statements)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> Result<Expression> {
        self.nested(Self::parse_not_expression)
    }

    /// Runs `parse` one level deeper, faulting past [`MAX_NESTING`]
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.descend()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_at_current(format!(
                "Expression nested deeper than {} levels",
                MAX_NESTING
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_not_expression(&mut self) -> Result<Expression> {
        if !self.check(TokenKind::Not) {
            return self.parse_logical_expression();
        }

        self.eat()?;
        let operand = self.parse_expression()?;
        Ok(Expression::NotExpression(Box::new(operand)))
    }

    fn parse_logical_expression(&mut self) -> Result<Expression> {
        let left = self.parse_boolean_expression()?;

        let (operator, equals) = if self.check(TokenKind::LogicalOperator) {
            let operator = if self.eat()?.text == "<" {
                LogicalOp::Less
            } else {
                LogicalOp::Greater
            };
            let equals = self.check(TokenKind::Equals);
            if equals {
                self.eat()?;
            }
            (operator, equals)
        } else if self.check(TokenKind::Equals) && self.check_next(TokenKind::Equals) {
            self.eat()?;
            self.eat()?;
            (LogicalOp::Equal, true)
        } else if self.check(TokenKind::Not) && self.check_next(TokenKind::Equals) {
            self.eat()?;
            self.eat()?;
            (LogicalOp::NotEqual, true)
        } else {
            return Ok(left);
        };

        let right = self.parse_expression()?;
        Ok(Expression::LogicalExpression {
            left: Box::new(left),
            operator,
            equals,
            right: Box::new(right),
        })
    }

    fn parse_boolean_expression(&mut self) -> Result<Expression> {
        let left = self.parse_assignment_expression()?;

        if !self.check(TokenKind::BooleanOperator) {
            return Ok(left);
        }

        let first = self.eat()?;
        let second = self.peek().clone();
        if second.kind != TokenKind::BooleanOperator || second.text != first.text {
            return Err(self.error(
                second.location,
                "Boolean operators must be doubled (`&&` or `||`, not `&|` or a single `&`)",
            ));
        }
        self.eat()?;

        let operator = if first.text == "&" {
            BooleanOp::And
        } else {
            BooleanOp::Or
        };
        let right = self.parse_expression()?;

        Ok(Expression::BooleanExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_assignment_expression(&mut self) -> Result<Expression> {
        let left = self.parse_array_expression()?;

        if self.check(TokenKind::Equals) && !self.check_next(TokenKind::Equals) {
            let equals = self.eat()?;
            let value = self.nested(Self::parse_assignment_expression)?;
            return self.assignment_target(left, value, equals.location);
        }

        Ok(left)
    }

    fn parse_array_expression(&mut self) -> Result<Expression> {
        if !self.check(TokenKind::OpenBracket) {
            return self.parse_object_expression();
        }
        self.eat()?;

        let mut values = Vec::new();
        while !self.is_at_end() && !self.check(TokenKind::CloseBracket) {
            values.push(self.parse_expression()?);

            if !self.check(TokenKind::Comma) {
                break;
            }
            let comma = self.eat()?;
            if self.check(TokenKind::CloseBracket) {
                return Err(self.error(
                    comma.location,
                    "Trailing comma is not permitted in ArrayLiteral",
                ));
            }
        }

        if !self.check(TokenKind::CloseBracket) {
            return Err(self.error_at_current("Expected CloseBracket for ArrayLiteral"));
        }
        self.eat()?;

        Ok(Expression::ArrayLiteral(values))
    }

    fn parse_object_expression(&mut self) -> Result<Expression> {
        if !self.check(TokenKind::OpenBrace) {
            return self.parse_additive_expression();
        }
        self.eat()?;

        let mut properties = Vec::new();
        while !self.is_at_end() && !self.check(TokenKind::CloseBrace) {
            let key = self.expect(TokenKind::Identifier)?.text;

            // { key, ... } and { key }
            if self.check(TokenKind::Comma) {
                self.eat()?;
                properties.push(Property { key, value: None });
                continue;
            }
            if self.check(TokenKind::CloseBrace) {
                properties.push(Property { key, value: None });
                continue;
            }

            self.expect(TokenKind::Colon)?;
            let value = self.parse_expression()?;
            properties.push(Property {
                key,
                value: Some(value),
            });

            if !self.check(TokenKind::CloseBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }

        if !self.check(TokenKind::CloseBrace) {
            return Err(self.error_at_current("Expected CloseBrace for ObjectLiteral"));
        }
        self.eat()?;

        Ok(Expression::ObjectLiteral(properties))
    }

    fn parse_additive_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative_expression()?;
        let outer = self.depth;

        while let Some(operator) = self.check_binary_operator(&[BinaryOp::Add, BinaryOp::Sub]) {
            self.descend()?;
            self.eat()?;
            let right = self.parse_multiplicative_expression()?;
            left = Expression::BinaryExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        self.depth = outer;
        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_call_expression()?;
        let outer = self.depth;

        while let Some(operator) =
            self.check_binary_operator(&[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod])
        {
            self.descend()?;
            self.eat()?;
            let right = self.parse_call_expression()?;
            left = Expression::BinaryExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        self.depth = outer;
        Ok(left)
    }

    /// Member chain followed by any number of `(args)` suffixes
    fn parse_call_expression(&mut self) -> Result<Expression> {
        let mut expr = self.parse_member_expression()?;
        let outer = self.depth;

        while self.check(TokenKind::OpenParen) {
            self.descend()?;
            let arguments = self.parse_arguments()?;
            expr = Expression::FunctionCall {
                callee: Box::new(expr),
                arguments,
            };
        }

        self.depth = outer;
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expression>> {
        self.expect(TokenKind::OpenParen)?;

        let mut arguments = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            arguments.push(self.parse_expression()?);
            while self.check(TokenKind::Comma) {
                self.eat()?;
                arguments.push(self.parse_expression()?);
            }
        }

        self.expect(TokenKind::CloseParen)?;
        Ok(arguments)
    }

    fn parse_member_expression(&mut self) -> Result<Expression> {
        let mut object = self.parse_primary_expression()?;
        let outer = self.depth;

        while self.check(TokenKind::Dot) || self.check(TokenKind::OpenBracket) {
            self.descend()?;
            let operator = self.eat()?;

            let (member, computed) = if operator.kind == TokenKind::Dot {
                let at = self.peek().location;
                let member = self.parse_primary_expression()?;
                if !matches!(member, Expression::Identifier(_)) {
                    return Err(self.error(
                        at,
                        "Dot operator in member expression requires an identifier",
                    ));
                }
                (member, false)
            } else {
                let member = self.parse_expression()?;
                self.expect(TokenKind::CloseBracket)?;
                (member, true)
            };

            object = Expression::ObjectMember {
                object: Box::new(object),
                member: Box::new(member),
                computed,
                assignment: None,
            };
        }
        self.depth = outer;

        if self.check(TokenKind::Equals) && !self.check_next(TokenKind::Equals) {
            let equals = self.eat()?;
            let value = self.parse_expression()?;
            return self.assignment_target(object, value, equals.location);
        }

        Ok(object)
    }

    fn parse_primary_expression(&mut self) -> Result<Expression> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Identifier => {
                self.eat()?;
                Ok(Expression::Identifier(token.text))
            }
            TokenKind::NumericLiteral => {
                self.eat()?;
                let value = token.text.parse::<f64>().map_err(|_| {
                    self.error(
                        token.location,
                        format!("Invalid numeric literal `{}`", token.text),
                    )
                })?;
                Ok(Expression::NumericLiteral(value))
            }
            TokenKind::StringLiteral => {
                self.eat()?;
                Ok(Expression::StringLiteral(token.text))
            }
            TokenKind::OpenParen => {
                self.eat()?;
                let value = self.parse_expression()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(value)
            }
            _ => Err(self.error(token.location, format!("Unexpected token: {}", token))),
        }
    }

    /// Turns `target = value` into a variable or property write
    fn assignment_target(
        &self,
        target: Expression,
        value: Expression,
        at: Location,
    ) -> Result<Expression> {
        match target {
            Expression::Identifier(name) => Ok(Expression::VariableAssignment {
                name,
                value: Box::new(value),
            }),
            Expression::ObjectMember {
                object,
                member,
                computed,
                assignment: None,
            } => Ok(Expression::ObjectMember {
                object,
                member,
                computed,
                assignment: Some(Box::new(value)),
            }),
            other => Err(self.error(
                at,
                format!("Invalid assignment target: {}", other.kind_name()),
            )),
        }
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_next(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.current + 1)
            .is_some_and(|t| t.kind == kind)
    }

    fn check_binary_operator(&self, accepted: &[BinaryOp]) -> Option<BinaryOp> {
        if !self.check(TokenKind::BinaryOperator) {
            return None;
        }
        BinaryOp::from_symbol(&self.peek().text).filter(|op| accepted.contains(op))
    }

    /// Consumes the current token; consuming `Eof` is a fault
    fn eat(&mut self) -> Result<Token> {
        let token = self.peek().clone();
        if token.is_eof() {
            return Err(self.error(
                token.location,
                "Unexpected end of input (attempt to consume EOF)",
            ));
        }
        self.current += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.eat()?;
        if token.kind != kind {
            return Err(self.error(
                token.location,
                format!("Expected {}, got {}", kind, token),
            ));
        }
        Ok(token)
    }

    fn error(&self, at: Location, message: impl Into<String>) -> Error {
        Error::Parse {
            line: at.line,
            column: at.column,
            message: message.into(),
        }
    }

    fn error_at_current(&self, message: impl Into<String>) -> Error {
        self.error(self.peek().location, message)
    }
}

/// Parses a token sequence in one call
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse()
}
