//! Output natives

use crate::error::Result;
use crate::host::OutputSink;
use crate::runtime::{Scope, Value};
use crate::tools::{Tool, ToolRegistry};

/// Register output tools
pub fn register(registry: &mut ToolRegistry, output: &OutputSink) {
    registry.register(PrintTool {
        output: output.clone(),
    });
    registry.register(ClearTool {
        output: output.clone(),
    });
}

/// print - Write each argument's display form as output
///
/// Usage: `print(value, ...)`
/// The two characters `\n` inside the text start a new output line.
pub struct PrintTool {
    output: OutputSink,
}

impl Tool for PrintTool {
    fn name(&self) -> &str {
        "print"
    }

    fn description(&self) -> &str {
        "Write values to the output, one entry per argument"
    }

    fn call(&self, args: &[Value], _scope: &Scope) -> Result<Value> {
        for arg in args {
            self.output.write(&arg.to_string());
        }
        Ok(Value::Null)
    }
}

/// clear - Remove everything printed so far
pub struct ClearTool {
    output: OutputSink,
}

impl Tool for ClearTool {
    fn name(&self) -> &str {
        "clear"
    }

    fn description(&self) -> &str {
        "Clear the output"
    }

    fn call(&self, _args: &[Value], _scope: &Scope) -> Result<Value> {
        self.output.clear();
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_each_argument() {
        let output = OutputSink::new();
        let tool = PrintTool {
            output: output.clone(),
        };

        tool.call(
            &[Value::Number(7.0), Value::string("a\\nb"), Value::Boolean(false)],
            &Scope::new(),
        )
        .unwrap();
        assert_eq!(output.lines(), vec!["7", "a", "b", "false"]);
    }

    #[test]
    fn test_clear() {
        let output = OutputSink::new();
        output.write("x");
        ClearTool {
            output: output.clone(),
        }
        .call(&[], &Scope::new())
        .unwrap();
        assert!(output.lines().is_empty());
    }
}
