use crate::error::Result;
use crate::parser::Program;
use crate::runtime::{Evaluator, Scope, Value};

/// Position of a stepped run within its program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cursor {
    /// Index of the next top-level statement
    next: usize,
    /// Value of the most recently evaluated statement
    last: Value,
}

impl Cursor {
    /// Cursor at the first statement
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next statement to evaluate
    pub fn position(&self) -> usize {
        self.next
    }

    /// True once every statement of `program` has been evaluated
    pub fn is_finished(&self, program: &Program) -> bool {
        self.next >= program.body.len()
    }
}

/// Result of one `advance` call
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// One statement ran; more may follow
    Yielded,
    /// Nothing left to run; carries the last statement's value
    Done(Value),
}

/// Evaluates one top-level statement of `program`, then suspends
///
/// A program of `n` statements yields `n` times before reporting `Done`.
/// After a fault the cursor is moved to the end, so a host that keeps
/// calling only ever sees `Done`.
pub fn advance(program: &Program, scope: &Scope, cursor: &mut Cursor) -> Result<Step> {
    Evaluator::new().advance(program, scope, cursor)
}

impl Evaluator {
    /// [`advance`] with this evaluator's settings
    pub fn advance(&mut self, program: &Program, scope: &Scope, cursor: &mut Cursor) -> Result<Step> {
        let Some(stmt) = program.body.get(cursor.next) else {
            return Ok(Step::Done(cursor.last.clone()));
        };

        tracing::debug!(index = cursor.next, kind = stmt.kind_name(), "step");

        match self.evaluate_statement(stmt, scope) {
            Ok(value) => {
                cursor.last = value;
                cursor.next += 1;
                Ok(Step::Yielded)
            }
            Err(e) => {
                cursor.next = program.body.len();
                cursor.last = Value::Null;
                Err(e)
            }
        }
    }
}

/// An owned, resumable run of one program
pub struct Execution {
    program: Program,
    scope: Scope,
    cursor: Cursor,
    evaluator: Evaluator,
}

impl Execution {
    /// Prepares `program` to run against `scope`
    pub fn new(program: Program, scope: Scope) -> Self {
        Self::with_evaluator(program, scope, Evaluator::new())
    }

    /// Prepares a run with a configured evaluator
    pub fn with_evaluator(program: Program, scope: Scope, evaluator: Evaluator) -> Self {
        Execution {
            program,
            scope,
            cursor: Cursor::new(),
            evaluator,
        }
    }

    /// Runs the next top-level statement
    pub fn step(&mut self) -> Result<Step> {
        self.evaluator
            .advance(&self.program, &self.scope, &mut self.cursor)
    }

    /// Steps until the program is drained
    pub fn run_to_completion(&mut self) -> Result<Value> {
        loop {
            if let Step::Done(value) = self.step()? {
                return Ok(value);
            }
        }
    }

    /// True once every statement has run
    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished(&self.program)
    }

    /// Root scope of the run
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Evaluator shared by steps and host callbacks
    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }

    /// Current cursor
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn program(source: &str) -> Program {
        parse(tokenize(source).unwrap()).unwrap()
    }

    #[test]
    fn test_one_statement_per_step() {
        let program = program("let a = 1; a = a + 1; a");
        let scope = Scope::new();
        let mut cursor = Cursor::new();

        assert_eq!(advance(&program, &scope, &mut cursor).unwrap(), Step::Yielded);
        assert_eq!(scope.lookup("a").unwrap(), Value::Number(1.0));
        assert_eq!(cursor.position(), 1);

        assert_eq!(advance(&program, &scope, &mut cursor).unwrap(), Step::Yielded);
        assert_eq!(scope.lookup("a").unwrap(), Value::Number(2.0));

        assert_eq!(advance(&program, &scope, &mut cursor).unwrap(), Step::Yielded);
        assert!(cursor.is_finished(&program));
        assert_eq!(
            advance(&program, &scope, &mut cursor).unwrap(),
            Step::Done(Value::Number(2.0))
        );
        // Draining is idempotent
        assert_eq!(
            advance(&program, &scope, &mut cursor).unwrap(),
            Step::Done(Value::Number(2.0))
        );
    }

    #[test]
    fn test_empty_program_is_done() {
        let program = program("");
        let mut cursor = Cursor::new();
        assert_eq!(
            advance(&program, &Scope::new(), &mut cursor).unwrap(),
            Step::Done(Value::Null)
        );
    }

    #[test]
    fn test_fault_ends_the_run() {
        let program = program("let a = 1; a = b; a = 3");
        let scope = Scope::new();
        let mut execution = Execution::new(program, scope.clone());

        assert_eq!(execution.step().unwrap(), Step::Yielded);
        assert!(matches!(
            execution.step(),
            Err(Error::UndeclaredVariable { .. })
        ));
        assert!(execution.is_finished());
        assert_eq!(execution.step().unwrap(), Step::Done(Value::Null));
        assert_eq!(scope.lookup("a").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_host_may_stop_between_steps() {
        let program = program("let a = 1; let b = 2");
        let scope = Scope::new();
        let mut execution = Execution::new(program, scope.clone());

        execution.step().unwrap();
        drop(execution);

        assert!(scope.contains("a"));
        assert!(!scope.contains("b"));
    }

    #[test]
    fn test_run_to_completion() {
        let mut execution = Execution::new(program("fn sq(n) { return n * n } sq(9)"), Scope::new());
        assert_eq!(execution.run_to_completion().unwrap(), Value::Number(81.0));
    }
}
