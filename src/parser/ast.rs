use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Complete LightScript program
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements, evaluated one per step
    pub body: Vec<Statement>,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Struct declaration: `struct Point { x: Number y: Number }`
    StructDeclaration {
        /// Struct name
        name: String,
        /// Declared fields, never empty
        fields: Vec<Field>,
    },

    /// Named function declaration: `fn add(a, b) { ... }`
    FunctionDeclaration {
        /// Function name
        name: String,
        /// Parameter names, bound positionally
        parameters: Vec<String>,
        /// Body statements, shared with every closure created from this declaration
        body: Rc<Vec<Statement>>,
    },

    /// Return statement; `return` with no expression returns `null`
    Return(Expression),

    /// If statement (no else branch)
    If {
        /// Condition, evaluated in the enclosing scope
        test: Expression,
        /// Statements run in a fresh child scope when the test is truthy
        consequent: Vec<Statement>,
    },

    /// While loop
    While {
        /// Loop condition, evaluated in the enclosing scope
        test: Expression,
        /// Statements run in a fresh child scope on every iteration
        body: Vec<Statement>,
    },

    /// Variable declaration: `let x = expr` or `const x = expr`
    VariableDeclaration {
        /// Variable name
        name: String,
        /// Whether the binding is constant
        is_constant: bool,
        /// Initializer (`null` when omitted)
        value: Expression,
    },

    /// Expression statement
    Expression(Expression),
}

impl Statement {
    /// Human-readable node kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::StructDeclaration { .. } => "StructDeclaration",
            Statement::FunctionDeclaration { .. } => "FunctionDeclaration",
            Statement::Return(_) => "ReturnStatement",
            Statement::If { .. } => "IfStatement",
            Statement::While { .. } => "WhileLoop",
            Statement::VariableDeclaration { .. } => "VariableDeclaration",
            Statement::Expression(expr) => expr.kind_name(),
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    // Literals
    /// Numeric literal
    NumericLiteral(f64),
    /// String literal
    StringLiteral(String),
    /// Array literal `[a, b]`
    ArrayLiteral(Vec<Expression>),
    /// Object literal `{ key, key: value }`
    ObjectLiteral(Vec<Property>),

    /// Variable reference
    Identifier(String),

    /// Assignment to a variable: `x = expr`
    VariableAssignment {
        /// Name of the variable to assign to
        name: String,
        /// Value expression
        value: Box<Expression>,
    },

    /// Call: `callee(args)`
    FunctionCall {
        /// Expression producing the callable
        callee: Box<Expression>,
        /// Argument expressions, evaluated left to right
        arguments: Vec<Expression>,
    },

    /// Member access `object.member` / `object[member]`, optionally a write
    ObjectMember {
        /// Expression producing the object or array
        object: Box<Expression>,
        /// Member expression; an `Identifier` read literally when not computed
        member: Box<Expression>,
        /// True for `[expr]` access
        computed: bool,
        /// Value written by a trailing `= expr`
        assignment: Option<Box<Expression>>,
    },

    /// Doubled boolean operator: `a && b`, `a || b`
    BooleanExpression {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: BooleanOp,
        /// Right operand
        right: Box<Expression>,
    },

    /// Arithmetic: `a + b`
    BinaryExpression {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: BinaryOp,
        /// Right operand
        right: Box<Expression>,
    },

    /// Comparison: `<`, `>`, `<=`, `>=`, `==`, `!=`
    LogicalExpression {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: LogicalOp,
        /// Set when the operator is followed by `=`
        equals: bool,
        /// Right operand
        right: Box<Expression>,
    },

    /// Negation `!expr`
    NotExpression(Box<Expression>),
}

impl Expression {
    /// Human-readable node kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::NumericLiteral(_) => "NumericLiteral",
            Expression::StringLiteral(_) => "StringLiteral",
            Expression::ArrayLiteral(_) => "ArrayLiteral",
            Expression::ObjectLiteral(_) => "ObjectLiteral",
            Expression::Identifier(_) => "Identifier",
            Expression::VariableAssignment { .. } => "VariableAssignment",
            Expression::FunctionCall { .. } => "FunctionCall",
            Expression::ObjectMember { .. } => "ObjectMember",
            Expression::BooleanExpression { .. } => "BooleanExpression",
            Expression::BinaryExpression { .. } => "BinaryExpression",
            Expression::LogicalExpression { .. } => "LogicalExpression",
            Expression::NotExpression(_) => "NotExpression",
        }
    }
}

/// Struct field declaration `name: Type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Declared type: a value kind (`Number`, `String`, ...) or a struct name
    pub type_name: String,
}

/// Object literal entry; shorthand entries have no value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property key
    pub key: String,
    /// Value expression; `None` reads the variable named `key`
    pub value: Option<Expression>,
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition / string concatenation (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Remainder (%)
    Mod,
}

impl BinaryOp {
    /// Maps an operator lexeme
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Sub),
            "*" => Some(BinaryOp::Mul),
            "/" => Some(BinaryOp::Div),
            "%" => Some(BinaryOp::Mod),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        };
        write!(f, "{}", s)
    }
}

/// Boolean operators, written doubled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    /// `&&`
    And,
    /// `||`
    Or,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    /// `<` (with `equals`: `<=`)
    Less,
    /// `>` (with `equals`: `>=`)
    Greater,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
}
