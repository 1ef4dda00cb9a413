//! Time and scheduling natives
//!
//! Callbacks are only queued here; the host invokes them between frames,
//! each in a fresh call frame.

use crate::error::{Error, Result};
use crate::host::Scheduler;
use crate::runtime::{Scope, Value};
use crate::tools::stdlib::is_callable;
use crate::tools::{Tool, ToolRegistry};

/// Register scheduling tools
pub fn register(registry: &mut ToolRegistry, scheduler: &Scheduler) {
    registry.register(TimeTool {
        scheduler: scheduler.clone(),
    });
    registry.register(IntervalTool {
        scheduler: scheduler.clone(),
    });
    registry.register(NextFrameTool {
        scheduler: scheduler.clone(),
    });
}

fn expect_callable(tool: &str, value: Option<&Value>) -> Result<Value> {
    match value {
        Some(value) if is_callable(value) => Ok(value.clone()),
        Some(value) => Err(Error::native(
            tool,
            format!("expected a function, got {}", value.type_name()),
        )),
        None => Err(Error::native(tool, "expected a function")),
    }
}

/// time - Virtual milliseconds since the run started
pub struct TimeTool {
    scheduler: Scheduler,
}

impl Tool for TimeTool {
    fn name(&self) -> &str {
        "time"
    }

    fn description(&self) -> &str {
        "Milliseconds since the run started"
    }

    fn call(&self, _args: &[Value], _scope: &Scope) -> Result<Value> {
        Ok(Value::Number(self.scheduler.now()))
    }
}

/// interval - Invoke a function every `ms` milliseconds
///
/// Usage: `interval(callback, ms)`
pub struct IntervalTool {
    scheduler: Scheduler,
}

impl Tool for IntervalTool {
    fn name(&self) -> &str {
        "interval"
    }

    fn description(&self) -> &str {
        "Call a function repeatedly"
    }

    fn call(&self, args: &[Value], _scope: &Scope) -> Result<Value> {
        let callback = expect_callable(self.name(), args.first())?;
        let period = args.get(1).map(Value::to_number).unwrap_or(0.0);
        self.scheduler.schedule_interval(callback, period);
        Ok(Value::Null)
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }
}

/// nextFrame - Invoke a function once on the next frame
///
/// Usage: `nextFrame(callback)`; ignored once the host has stopped
pub struct NextFrameTool {
    scheduler: Scheduler,
}

impl Tool for NextFrameTool {
    fn name(&self) -> &str {
        "nextFrame"
    }

    fn description(&self) -> &str {
        "Call a function on the next frame"
    }

    fn call(&self, args: &[Value], _scope: &Scope) -> Result<Value> {
        let callback = expect_callable(self.name(), args.first())?;
        self.scheduler.request_frame(callback);
        Ok(Value::Null)
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callback() -> Value {
        Value::native("cb", |_, _| Ok(Value::Null))
    }

    #[test]
    fn test_time_follows_clock() {
        let scheduler = Scheduler::new();
        let tool = TimeTool {
            scheduler: scheduler.clone(),
        };
        scheduler.advance_clock(32.0);
        assert_eq!(
            tool.call(&[], &Scope::new()).unwrap(),
            Value::Number(32.0)
        );
    }

    #[test]
    fn test_interval_and_frame_queue_callbacks() {
        let scheduler = Scheduler::new();
        IntervalTool {
            scheduler: scheduler.clone(),
        }
        .call(&[callback(), Value::Number(10.0)], &Scope::new())
        .unwrap();
        NextFrameTool {
            scheduler: scheduler.clone(),
        }
        .call(&[callback()], &Scope::new())
        .unwrap();

        assert_eq!(scheduler.pending(), 2);
    }

    #[test]
    fn test_non_callable_rejected() {
        let tool = NextFrameTool {
            scheduler: Scheduler::new(),
        };
        assert!(matches!(
            tool.call(&[Value::Number(1.0)], &Scope::new()),
            Err(Error::Native { .. })
        ));

        let interval = IntervalTool {
            scheduler: Scheduler::new(),
        };
        assert!(matches!(
            interval.call(&[], &Scope::new()),
            Err(Error::Native { .. })
        ));
    }
}
