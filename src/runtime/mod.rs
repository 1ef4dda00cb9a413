//! Runtime execution for LightScript programs
//!
//! [`Scope`] frames hold bindings, [`Value`] is the tagged value model,
//! [`Evaluator`] walks the syntax tree, and [`advance`] steps a program one
//! top-level statement at a time so a host can interleave its own work.

mod evaluator;
mod execution;
mod scope;
mod value;

pub use evaluator::{binary_operation, logical_operation, Evaluator, Flow, DEFAULT_MAX_CALL_DEPTH};
pub use execution::{advance, Cursor, Execution, Step};
pub use scope::Scope;
pub use value::{
    format_number, FunctionValue, NativeFn, NativeFunction, ObjectData, StructDescriptor, Value,
};
