//! Math natives

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{Error, Result};
use crate::runtime::{Scope, Value};
use crate::tools::{Tool, ToolRegistry};

/// Register math tools
pub fn register(registry: &mut ToolRegistry, rng: &Rc<RefCell<StdRng>>) {
    registry.register(SqrtTool);
    registry.register(RandTool { rng: rng.clone() });
}

/// Tool for calculating square root of a number
///
/// Usage: `sqrt(number) -> number`
/// Example: `sqrt(16)` returns `4`
pub struct SqrtTool;

impl Tool for SqrtTool {
    fn name(&self) -> &str {
        "sqrt"
    }

    fn description(&self) -> &str {
        "Square root"
    }

    fn call(&self, args: &[Value], _scope: &Scope) -> Result<Value> {
        let n = args
            .first()
            .ok_or_else(|| Error::native(self.name(), "expected a number"))?;
        Ok(Value::Number(n.to_number().sqrt()))
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }
}

/// Tool for drawing a uniform random number in [0, 1)
pub struct RandTool {
    rng: Rc<RefCell<StdRng>>,
}

impl Tool for RandTool {
    fn name(&self) -> &str {
        "rand"
    }

    fn description(&self) -> &str {
        "Uniform random number in [0, 1)"
    }

    fn call(&self, _args: &[Value], _scope: &Scope) -> Result<Value> {
        Ok(Value::Number(self.rng.borrow_mut().gen::<f64>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_sqrt() {
        let scope = Scope::new();
        assert_eq!(
            SqrtTool.call(&[Value::Number(16.0)], &scope).unwrap(),
            Value::Number(4.0)
        );
        assert_eq!(
            SqrtTool.call(&[Value::string("9")], &scope).unwrap(),
            Value::Number(3.0)
        );
    }

    #[test]
    fn test_sqrt_without_argument() {
        assert!(matches!(
            SqrtTool.call(&[], &Scope::new()),
            Err(Error::Native { .. })
        ));
    }

    #[test]
    fn test_rand_range_and_seed() {
        let draw = |seed| {
            let tool = RandTool {
                rng: Rc::new(RefCell::new(StdRng::seed_from_u64(seed))),
            };
            (0..5)
                .map(|_| tool.call(&[], &Scope::new()).unwrap().to_number())
                .collect::<Vec<_>>()
        };

        let first = draw(7);
        assert_eq!(first, draw(7));
        assert!(first.iter().all(|n| (0.0..1.0).contains(n)));
    }
}
