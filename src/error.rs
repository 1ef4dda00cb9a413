//! Error types for the LightScript interpreter

use thiserror::Error;

/// LightScript interpreter errors
///
/// Every fault aborts the current run. Lexing and parsing faults carry the
/// location of the offending input; runtime faults carry the name or value
/// involved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lex errors
    /// Malformed source text
    ///
    /// **Triggered by:** an unknown character, a numeric literal that does not
    /// parse, or end of input inside a string or block comment
    /// **Example:** `let x = 1.2.3`
    #[error("Lex error at line {line}, column {column}: {message}")]
    Lex {
        /// Line number where the error occurred
        line: usize,
        /// Column number where the error occurred
        column: usize,
        /// Error description
        message: String,
    },

    // Parse errors
    /// Grammar violation
    ///
    /// **Triggered by:** a token the grammar does not expect at that position
    /// **Example:** `struct Empty {}` (struct without fields)
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        /// Line number of the offending token
        line: usize,
        /// Column number of the offending token
        column: usize,
        /// Expected-vs-actual description
        message: String,
    },

    // Runtime errors
    /// Lookup of a name no enclosing scope declares
    ///
    /// **Example:** `print(y)` when `y` was never declared
    #[error("Can't resolve {name}")]
    UndeclaredVariable {
        /// Variable name
        name: String,
    },

    /// Assignment to a name no enclosing scope declares
    ///
    /// **Example:** `y = 2` without a prior `let y`
    #[error("{name} hasn't been declared")]
    UnassignedVariable {
        /// Variable name
        name: String,
    },

    /// Declaration of a name already declared in the same scope
    #[error("Cannot declare variable {name} again")]
    Redeclaration {
        /// Variable name
        name: String,
    },

    /// Assignment to a constant binding
    ///
    /// **Example:** `const x = 1; x = 2;`
    #[error("Cannot assign to constant variable \"{name}\"")]
    ConstantReassignment {
        /// Constant name
        name: String,
    },

    /// Operation applied to a value of the wrong kind
    ///
    /// **Triggered by:** arithmetic on a non-numeric value, a struct field
    /// whose argument has the wrong type, calling a non-callable value
    #[error("Type mismatch: {message}")]
    TypeMismatch {
        /// Description naming the offending value
        message: String,
    },

    /// Struct constructor called with too few arguments
    #[error("Missing value for field `{field}` of struct {struct_name}")]
    MissingField {
        /// Struct being instantiated
        struct_name: String,
        /// First field without an argument
        field: String,
    },

    /// Division by zero
    ///
    /// **Example:** `10 / 0`, `5 % 0`
    #[error("Divide by zero error")]
    DivisionByZero,

    /// Node the evaluator cannot evaluate in its position
    #[error("Interpretation can't continue with an irregular AST node: {kind}")]
    UnreachableNode {
        /// Kind of the offending node
        kind: String,
    },

    /// User function calls nested deeper than the evaluator allows
    ///
    /// **Example:** `fn f() { return f(); } f()`
    #[error("Maximum call depth of {limit} exceeded")]
    CallDepthExceeded {
        /// Configured limit
        limit: usize,
    },

    /// Failure raised by a host-installed native function
    #[error("Native function {name} failed: {message}")]
    Native {
        /// Native function name
        name: String,
        /// Failure reason
        message: String,
    },

    // Host errors
    /// Invalid host configuration
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description from the TOML deserializer
        message: String,
    },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Raised while scanning source text
    Lex,
    /// Raised while building the syntax tree
    Parse,
    /// Raised while evaluating
    Runtime,
    /// Raised while setting up the host
    Config,
}

impl Error {
    /// Create a type mismatch error with a message
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Error::TypeMismatch {
            message: msg.into(),
        }
    }

    /// Create a native function error
    pub fn native(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Native {
            name: name.into(),
            message: msg.into(),
        }
    }

    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Lex { .. } => ErrorCategory::Lex,
            Error::Parse { .. } => ErrorCategory::Parse,
            Error::Config { .. } => ErrorCategory::Config,
            _ => ErrorCategory::Runtime,
        }
    }

    /// Source location `(line, column)` when the error carries one
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Error::Lex { line, column, .. } | Error::Parse { line, column, .. } => {
                Some((*line, *column))
            }
            _ => None,
        }
    }
}

/// Result type for LightScript operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_only_for_front_end_errors() {
        let lex = Error::Lex {
            line: 3,
            column: 7,
            message: "Unknown character '#'".to_string(),
        };
        assert_eq!(lex.location(), Some((3, 7)));
        assert_eq!(lex.category(), ErrorCategory::Lex);

        assert_eq!(Error::DivisionByZero.location(), None);
        assert_eq!(Error::DivisionByZero.category(), ErrorCategory::Runtime);
    }

    #[test]
    fn test_messages() {
        let err = Error::ConstantReassignment {
            name: "x".to_string(),
        };
        assert!(err.to_string().contains("constant"));

        let err = Error::MissingField {
            struct_name: "Point".to_string(),
            field: "y".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing value for field `y` of struct Point"
        );
    }
}
