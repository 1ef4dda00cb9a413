//! # LightScript - a small cooperative scripting language
//!
//! A tree-walking interpreter for a compact, brace-delimited scripting
//! language. Programs are evaluated one top-level statement at a time so a
//! host can interleave its own work (rendering, timers, cancellation)
//! between steps.
//!
//! ## Quick Start
//!
//! ```rust
//! use lightscript::{Host, HostConfig, Value};
//!
//! # fn main() -> lightscript::Result<()> {
//! let mut host = Host::new(HostConfig::default());
//! let result = host.run_source(
//!     r#"
//!     fn square(n) { return n * n }
//!     let total = 0
//!     let i = 1
//!     while (i < 4) { total = total + square(i); i = i + 1 }
//!     total
//!     "#,
//! )?;
//!
//! assert_eq!(result, Value::Number(14.0));
//! # Ok(())
//! # }
//! ```
//!
//! ### Stepping by hand
//!
//! ```rust
//! use lightscript::{advance, parse, tokenize, Cursor, Scope, Step, Value};
//!
//! # fn main() -> lightscript::Result<()> {
//! let program = parse(tokenize("let a = 1; a = a + 1")?)?;
//! let scope = Scope::new();
//! let mut cursor = Cursor::new();
//!
//! assert_eq!(advance(&program, &scope, &mut cursor)?, Step::Yielded);
//! assert_eq!(advance(&program, &scope, &mut cursor)?, Step::Yielded);
//! assert_eq!(advance(&program, &scope, &mut cursor)?, Step::Done(Value::Number(2.0)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser → AST → Evaluator (stepped by Host)
//! ```
//!
//! - [`Scanner`] - Tokenizes source code, always ending with `Eof`
//! - [`Parser`] - Recursive descent into [`Program`]
//! - [`Evaluator`] - Executes the AST against a [`Scope`] chain
//! - [`Value`] - Runtime value representation
//! - [`ToolRegistry`] - Host natives bound into the root scope
//! - [`Host`] - Output, virtual clock, scheduled callbacks
//!
//! ## Error Handling
//!
//! Every fault is an [`Error`]; the run stops at the first one.
//!
//! ```rust
//! use lightscript::{Error, Host};
//!
//! let mut host = Host::default();
//! let err = host.run_source("const a = 1; a = 2").unwrap_err();
//! assert!(matches!(err, Error::ConstantReassignment { .. }));
//! assert!(host.is_stopped());
//! ```

/// Version of the LightScript interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod host;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod tools;

// Re-export main types
pub use config::HostConfig;
pub use error::{Error, ErrorCategory, Result};
pub use host::{Host, OutputSink, Scheduler};
pub use lexer::{tokenize, Location, Scanner, Token, TokenKind};
pub use parser::{parse, BinaryOp, Expression, Parser, Program, Statement};
pub use runtime::{advance, Cursor, Evaluator, Execution, Scope, Step, Value};
pub use tools::{Tool, ToolRegistry};
