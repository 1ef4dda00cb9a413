//! Native function seam for LightScript
//!
//! Every effect a script can have on the outside world (output, time,
//! randomness, scheduling) arrives through a [`Tool`] that a host registers
//! in a [`ToolRegistry`] and installs into the root scope before the first
//! step.

pub mod stdlib;

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::{Scope, Value};

/// Tool trait - every host native implements this
pub trait Tool {
    /// Name the tool is bound under in the root scope
    fn name(&self) -> &str;

    /// Tool description
    fn description(&self) -> &str;

    /// Invoke the tool with evaluated arguments and the calling scope
    fn call(&self, args: &[Value], scope: &Scope) -> Result<Value>;

    /// Minimum number of arguments
    fn arity(&self) -> Option<usize> {
        None // None means variadic
    }
}

/// Tool registry
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Rc<dyn Tool>>,
    constants: Vec<(String, Value)>,
}

impl ToolRegistry {
    /// Create empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool of the same name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Rc::new(tool));
    }

    /// Register a constant binding such as `true`
    pub fn register_constant(&mut self, name: impl Into<String>, value: Value) {
        self.constants.push((name.into(), value));
    }

    /// Get tool by name
    pub fn get(&self, name: &str) -> Result<Rc<dyn Tool>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UndeclaredVariable {
                name: name.to_string(),
            })
    }

    /// Check if tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tool names, sorted
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get tool count
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Declares every constant and tool as a constant binding in `scope`
    ///
    /// Constants go first, then tools in name order. Fails if `scope`
    /// already declares one of the names.
    pub fn install(&self, scope: &Scope) -> Result<()> {
        for (name, value) in &self.constants {
            scope.declare_constant(name, value.clone())?;
        }

        for name in self.list_tools() {
            let tool = self.get(&name)?;
            scope.declare_constant(&name, native_binding(tool))?;
        }

        tracing::trace!(
            constants = self.constants.len(),
            tools = self.tools.len(),
            "installed natives"
        );
        Ok(())
    }
}

/// Wraps a tool as a `NativeFunction` value, enforcing its arity
fn native_binding(tool: Rc<dyn Tool>) -> Value {
    let name = tool.name().to_string();
    Value::native(name, move |args, scope| {
        if let Some(required) = tool.arity() {
            if args.len() < required {
                return Err(Error::native(
                    tool.name(),
                    format!("expected {} argument(s), got {}", required, args.len()),
                ));
            }
        }
        tool.call(args, scope)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns its first argument"
        }

        fn call(&self, args: &[Value], _scope: &Scope) -> Result<Value> {
            Ok(args[0].clone())
        }

        fn arity(&self) -> Option<usize> {
            Some(1)
        }
    }

    #[test]
    fn test_tool_registration() {
        let mut registry = ToolRegistry::empty();
        registry.register(EchoTool);

        assert!(registry.has("echo"));
        assert!(!registry.has("unknown"));
        assert_eq!(registry.count(), 1);
        assert!(registry.get("unknown").is_err());
    }

    #[test]
    fn test_install_binds_constants_and_tools() {
        let mut registry = ToolRegistry::empty();
        registry.register(EchoTool);
        registry.register_constant("answer", Value::Number(42.0));

        let scope = Scope::new();
        registry.install(&scope).unwrap();

        assert_eq!(scope.lookup("answer").unwrap(), Value::Number(42.0));
        assert!(matches!(
            scope.assign("echo", Value::Null),
            Err(Error::ConstantReassignment { .. })
        ));

        let echo = scope.lookup("echo").unwrap();
        assert_eq!(echo.to_string(), "[NativeFunction]");
        if let Value::NativeFunction(native) = echo {
            assert_eq!(
                native.call(&[Value::string("hi")], &scope).unwrap(),
                Value::string("hi")
            );
            assert!(matches!(
                native.call(&[], &scope),
                Err(Error::Native { .. })
            ));
        }
    }

    #[test]
    fn test_install_twice_faults() {
        let mut registry = ToolRegistry::empty();
        registry.register(EchoTool);

        let scope = Scope::new();
        registry.install(&scope).unwrap();
        assert!(matches!(
            registry.install(&scope),
            Err(Error::Redeclaration { .. })
        ));
    }
}
