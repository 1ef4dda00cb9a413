//! Collection natives

use crate::error::Result;
use crate::runtime::{Scope, Value};
use crate::tools::{Tool, ToolRegistry};

/// Register collection tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register(AddElementTool);
}

/// addElement - Append a value to an array in place
///
/// Usage: `addElement(array, value)`
/// Every alias of the array sees the new element. A first argument that is
/// not an array is ignored.
pub struct AddElementTool;

impl Tool for AddElementTool {
    fn name(&self) -> &str {
        "addElement"
    }

    fn description(&self) -> &str {
        "Append a value to an array"
    }

    fn call(&self, args: &[Value], _scope: &Scope) -> Result<Value> {
        if let Some(Value::Array(arr)) = args.first() {
            arr.borrow_mut()
                .push(args.get(1).cloned().unwrap_or(Value::Null));
        }
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_is_shared() {
        let arr = Value::array(vec![Value::Number(1.0)]);
        let alias = arr.clone();

        AddElementTool
            .call(&[arr, Value::Number(2.0)], &Scope::new())
            .unwrap();
        assert_eq!(
            alias,
            Value::array(vec![Value::Number(1.0), Value::Number(2.0)])
        );
    }

    #[test]
    fn test_non_array_is_ignored() {
        let result = AddElementTool
            .call(&[Value::Number(1.0), Value::Number(2.0)], &Scope::new())
            .unwrap();
        assert_eq!(result, Value::Null);
        assert_eq!(AddElementTool.call(&[], &Scope::new()).unwrap(), Value::Null);
    }
}
