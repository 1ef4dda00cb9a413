//! Language constants

use crate::runtime::Value;
use crate::tools::ToolRegistry;

/// Register `true`, `false` and `null`
pub fn register(registry: &mut ToolRegistry) {
    registry.register_constant("true", Value::Boolean(true));
    registry.register_constant("false", Value::Boolean(false));
    registry.register_constant("null", Value::Null);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Scope;

    #[test]
    fn test_constants_installed() {
        let mut registry = ToolRegistry::empty();
        register(&mut registry);

        let scope = Scope::new();
        registry.install(&scope).unwrap();
        assert_eq!(scope.lookup("true").unwrap(), Value::Boolean(true));
        assert_eq!(scope.lookup("null").unwrap(), Value::Null);
        assert!(scope.assign("false", Value::Boolean(true)).is_err());
    }
}
