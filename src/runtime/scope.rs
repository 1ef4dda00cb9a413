use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Handle to one lexical frame
///
/// Frames are shared: cloning a `Scope` yields another handle to the same
/// frame, so closures observe later writes to the frame they captured.
#[derive(Clone)]
pub struct Scope(Rc<RefCell<Frame>>);

/// Single frame in the scope tree
struct Frame {
    /// Bindings declared in this frame
    bindings: HashMap<String, Binding>,
    /// Enclosing frame (None for the root)
    parent: Option<Scope>,
}

/// A bound value and whether the binding may be reassigned
struct Binding {
    value: Value,
    is_constant: bool,
}

impl Scope {
    /// Creates a root scope
    pub fn new() -> Self {
        Scope::with_parent(None)
    }

    fn with_parent(parent: Option<Scope>) -> Self {
        Scope(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent,
        })))
    }

    /// Creates a fresh frame whose parent is this one
    pub fn child(&self) -> Scope {
        Scope::with_parent(Some(self.clone()))
    }

    /// Enclosing frame, if any
    pub fn parent(&self) -> Option<Scope> {
        self.0.borrow().parent.clone()
    }

    /// Declares a mutable binding in this frame
    pub fn declare(&self, name: &str, value: Value) -> Result<()> {
        self.bind(name, value, false)
    }

    /// Declares a constant binding in this frame
    pub fn declare_constant(&self, name: &str, value: Value) -> Result<()> {
        self.bind(name, value, true)
    }

    fn bind(&self, name: &str, value: Value, is_constant: bool) -> Result<()> {
        let mut frame = self.0.borrow_mut();
        if frame.bindings.contains_key(name) {
            tracing::debug!(name, "redeclaration in the same scope");
            return Err(Error::Redeclaration {
                name: name.to_string(),
            });
        }

        frame
            .bindings
            .insert(name.to_string(), Binding { value, is_constant });
        Ok(())
    }

    /// Assigns to the nearest frame (self included) that declares `name`
    pub fn assign(&self, name: &str, value: Value) -> Result<()> {
        let owner = self.resolve(name).ok_or_else(|| Error::UnassignedVariable {
            name: name.to_string(),
        })?;

        let mut frame = owner.0.borrow_mut();
        let binding = frame
            .bindings
            .get_mut(name)
            .ok_or_else(|| Error::UnassignedVariable {
                name: name.to_string(),
            })?;

        if binding.is_constant {
            return Err(Error::ConstantReassignment {
                name: name.to_string(),
            });
        }

        binding.value = value;
        Ok(())
    }

    /// Reads `name` from the nearest frame that declares it
    pub fn lookup(&self, name: &str) -> Result<Value> {
        self.resolve(name)
            .and_then(|owner| {
                owner
                    .0
                    .borrow()
                    .bindings
                    .get(name)
                    .map(|b| b.value.clone())
            })
            .ok_or_else(|| Error::UndeclaredVariable {
                name: name.to_string(),
            })
    }

    /// Checks if `name` is declared in this frame or an ancestor
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Checks if `name` is declared in this very frame
    pub fn contains_local(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    /// Makes this frame the captured scope of the function bound to `name` here
    ///
    /// Lets a function declared in a frame resolve its own name.
    pub fn attach_closure(&self, name: &str) -> Result<()> {
        let value = self
            .0
            .borrow()
            .bindings
            .get(name)
            .map(|b| b.value.clone())
            .ok_or_else(|| Error::UndeclaredVariable {
                name: name.to_string(),
            })?;

        match value {
            Value::Function(function) => {
                function.set_closure(self.clone());
                Ok(())
            }
            other => Err(Error::type_mismatch(format!(
                "cannot attach a closure to {} `{}`",
                other.type_name(),
                name
            ))),
        }
    }

    /// Number of frames from here to the root, inclusive
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.parent();
        while let Some(scope) = current {
            depth += 1;
            current = scope.parent();
        }
        depth
    }

    /// True when both handles refer to the same frame
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Walks upward to the frame holding `name`
    fn resolve(&self, name: &str) -> Option<Scope> {
        let mut current = self.clone();
        loop {
            let parent = {
                let frame = current.0.borrow();
                if frame.bindings.contains_key(name) {
                    None
                } else {
                    Some(frame.parent.clone())
                }
            };

            match parent {
                None => return Some(current),
                Some(Some(parent)) => current = parent,
                Some(None) => return None,
            }
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    // Bindings are listed by name only; values may refer back to this frame.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let frame = self.0.borrow();
        let mut names: Vec<&String> = frame.bindings.keys().collect();
        names.sort();
        f.debug_struct("Scope")
            .field("bindings", &names)
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FunctionValue;

    #[test]
    fn test_declare_and_lookup() {
        let scope = Scope::new();
        scope.declare("x", Value::Number(42.0)).unwrap();
        assert_eq!(scope.lookup("x").unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_undeclared_lookup_and_assign_are_distinct() {
        let scope = Scope::new();
        assert!(matches!(
            scope.lookup("missing"),
            Err(Error::UndeclaredVariable { .. })
        ));
        assert!(matches!(
            scope.assign("missing", Value::Null),
            Err(Error::UnassignedVariable { .. })
        ));
    }

    #[test]
    fn test_redeclaration_in_same_frame() {
        let scope = Scope::new();
        scope.declare("x", Value::Number(1.0)).unwrap();
        assert!(matches!(
            scope.declare("x", Value::Number(2.0)),
            Err(Error::Redeclaration { .. })
        ));
    }

    #[test]
    fn test_shadowing() {
        let outer = Scope::new();
        outer.declare("x", Value::Number(1.0)).unwrap();

        let inner = outer.child();
        inner.declare("x", Value::Number(2.0)).unwrap();

        assert_eq!(inner.lookup("x").unwrap(), Value::Number(2.0));
        assert_eq!(outer.lookup("x").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_assign_updates_nearest_ancestor() {
        let outer = Scope::new();
        outer.declare("x", Value::Number(1.0)).unwrap();

        let inner = outer.child().child();
        inner.assign("x", Value::Number(5.0)).unwrap();

        assert_eq!(outer.lookup("x").unwrap(), Value::Number(5.0));
        assert!(!inner.contains_local("x"));
        assert!(inner.contains("x"));
    }

    #[test]
    fn test_constant_binding() {
        let scope = Scope::new();
        scope.declare_constant("x", Value::Number(1.0)).unwrap();

        let inner = scope.child();
        assert!(matches!(
            inner.assign("x", Value::Number(2.0)),
            Err(Error::ConstantReassignment { .. })
        ));
        assert_eq!(scope.lookup("x").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_attach_closure() {
        let root = Scope::new();
        let frame = root.child();

        let function = Rc::new(FunctionValue::new(
            "f",
            Vec::new(),
            Rc::new(Vec::new()),
            root.clone(),
        ));
        frame
            .declare("f", Value::Function(function.clone()))
            .unwrap();
        frame.attach_closure("f").unwrap();

        assert!(function.closure().ptr_eq(&frame));
        assert!(matches!(
            frame.attach_closure("g"),
            Err(Error::UndeclaredVariable { .. })
        ));
    }

    #[test]
    fn test_depth() {
        let root = Scope::new();
        assert_eq!(root.depth(), 1);
        assert_eq!(root.child().child().depth(), 3);
        assert!(root.parent().is_none());
    }
}
