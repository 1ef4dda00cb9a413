//! LightScript Parser Module
//!
//! Parses a token stream into an Abstract Syntax Tree (AST).

mod ast;
#[allow(clippy::module_inception)]
mod parser;

pub use ast::{
    BinaryOp, BooleanOp, Expression, Field, LogicalOp, Program, Property, Statement,
};
pub use parser::{parse, Parser, MAX_NESTING};
