use std::rc::Rc;

use crate::error::{Error, Result};
use crate::parser::{BinaryOp, BooleanOp, Expression, LogicalOp, Statement};
use crate::runtime::{FunctionValue, Scope, StructDescriptor, Value};

/// Default limit on nested user function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100;

/// Tree-walking evaluator for LightScript
///
/// Holds no program state of its own beyond the current call depth; all
/// bindings live in the [`Scope`] tree handed to each call.
#[derive(Debug, Clone)]
pub struct Evaluator {
    /// Number of user function calls currently on the stack
    depth: usize,
    /// Limit on `depth`
    max_depth: usize,
}

/// Outcome of executing one statement
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Statement completed; carries its value
    Normal(Value),
    /// A `return` fired; carries the returned value
    Return(Value),
}

impl Flow {
    /// Value carried by either outcome
    pub fn into_value(self) -> Value {
        match self {
            Flow::Normal(v) | Flow::Return(v) => v,
        }
    }
}

impl Evaluator {
    /// Creates a new evaluator
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_CALL_DEPTH)
    }

    /// Creates an evaluator with a custom call depth limit
    pub fn with_max_depth(max_depth: usize) -> Self {
        Evaluator {
            depth: 0,
            max_depth,
        }
    }

    /// Current user call depth (0 at top level)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Evaluates a top-level statement
    pub fn evaluate_statement(&mut self, stmt: &Statement, scope: &Scope) -> Result<Value> {
        self.execute(stmt, scope).map(Flow::into_value)
    }

    /// Executes a statement, reporting whether a `return` fired
    pub fn execute(&mut self, stmt: &Statement, scope: &Scope) -> Result<Flow> {
        match stmt {
            Statement::Expression(expr) => self.evaluate_expression(expr, scope).map(Flow::Normal),

            Statement::VariableDeclaration {
                name,
                is_constant,
                value,
            } => {
                let val = self.evaluate_expression(value, scope)?;
                if *is_constant {
                    scope.declare_constant(name, val)?;
                } else {
                    scope.declare(name, val)?;
                }
                Ok(Flow::Normal(Value::Null))
            }

            Statement::StructDeclaration { name, fields } => {
                let descriptor = StructDescriptor {
                    name: name.clone(),
                    fields: fields.clone(),
                };
                scope.declare_constant(name, Value::Struct(Rc::new(descriptor)))?;
                Ok(Flow::Normal(Value::Null))
            }

            Statement::FunctionDeclaration {
                name,
                parameters,
                body,
            } => {
                let function =
                    FunctionValue::new(name.clone(), parameters.clone(), body.clone(), scope.clone());
                scope.declare_constant(name, Value::Function(Rc::new(function)))?;
                scope.attach_closure(name)?;
                Ok(Flow::Normal(Value::Null))
            }

            Statement::Return(expr) => {
                if self.depth == 0 {
                    return Err(Error::UnreachableNode {
                        kind: format!("{} outside of a function", stmt.kind_name()),
                    });
                }
                self.evaluate_expression(expr, scope).map(Flow::Return)
            }

            Statement::If { test, consequent } => {
                if !self.evaluate_expression(test, scope)?.is_truthy() {
                    return Ok(Flow::Normal(Value::Null));
                }

                let block = scope.child();
                for stmt in consequent {
                    let flow = self.execute(stmt, &block)?;
                    if matches!(stmt, Statement::Return(_)) {
                        return Ok(flow);
                    }
                    // Returns nested deeper than this block do not escape it
                }

                Ok(Flow::Normal(Value::Null))
            }

            Statement::While { test, body } => {
                while self.evaluate_expression(test, scope)?.is_truthy() {
                    let iteration = scope.child();
                    for stmt in body {
                        self.execute(stmt, &iteration)?;
                    }
                }
                Ok(Flow::Normal(Value::Null))
            }
        }
    }

    /// Evaluates an expression
    pub fn evaluate_expression(&mut self, expr: &Expression, scope: &Scope) -> Result<Value> {
        match expr {
            Expression::NumericLiteral(n) => Ok(Value::Number(*n)),

            Expression::StringLiteral(s) => Ok(Value::String(s.clone())),

            Expression::ArrayLiteral(elements) => {
                let values = elements
                    .iter()
                    .map(|e| self.evaluate_expression(e, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::array(values))
            }

            Expression::ObjectLiteral(properties) => {
                let mut entries = Vec::with_capacity(properties.len());
                for property in properties {
                    let value = match &property.value {
                        Some(expr) => self.evaluate_expression(expr, scope)?,
                        None => scope.lookup(&property.key)?,
                    };
                    entries.push((property.key.clone(), value));
                }
                Ok(Value::object(entries))
            }

            Expression::Identifier(name) => scope.lookup(name),

            Expression::VariableAssignment { name, value } => {
                let val = self.evaluate_expression(value, scope)?;
                scope.assign(name, val.clone())?;
                Ok(val)
            }

            Expression::FunctionCall { callee, arguments } => {
                let function = self.evaluate_expression(callee, scope)?;
                let args = arguments
                    .iter()
                    .map(|a| self.evaluate_expression(a, scope))
                    .collect::<Result<Vec<_>>>()?;
                self.call_function(&function, &args, scope)
            }

            Expression::ObjectMember {
                object,
                member,
                computed,
                assignment,
            } => {
                let target = self.evaluate_expression(object, scope)?;
                let key = if *computed {
                    self.evaluate_expression(member, scope)?
                } else {
                    match member.as_ref() {
                        Expression::Identifier(name) => Value::String(name.clone()),
                        other => {
                            return Err(Error::UnreachableNode {
                                kind: format!("{} as member name", other.kind_name()),
                            })
                        }
                    }
                };

                match assignment {
                    Some(value) => {
                        let val = self.evaluate_expression(value, scope)?;
                        target.set_member(&key, val.clone())?;
                        Ok(val)
                    }
                    None => target.get_member(&key),
                }
            }

            Expression::BooleanExpression {
                left,
                operator,
                right,
            } => {
                // Both sides are always evaluated
                let l = self.evaluate_expression(left, scope)?.is_truthy();
                let r = self.evaluate_expression(right, scope)?.is_truthy();
                Ok(Value::Boolean(match operator {
                    BooleanOp::And => l && r,
                    BooleanOp::Or => l || r,
                }))
            }

            Expression::BinaryExpression {
                left,
                operator,
                right,
            } => {
                let l = self.evaluate_expression(left, scope)?;
                let r = self.evaluate_expression(right, scope)?;
                binary_operation(*operator, &l, &r)
            }

            Expression::LogicalExpression {
                left,
                operator,
                equals,
                right,
            } => {
                let l = self.evaluate_expression(left, scope)?;
                let r = self.evaluate_expression(right, scope)?;
                Ok(Value::Boolean(logical_operation(*operator, *equals, &l, &r)))
            }

            Expression::NotExpression(operand) => {
                let value = self.evaluate_expression(operand, scope)?;
                Ok(Value::Boolean(!value.is_truthy()))
            }
        }
    }

    /// Invokes any callable value
    ///
    /// Structs instantiate, native functions receive the calling scope, user
    /// functions run to completion in a fresh frame under their closure.
    pub fn call_function(&mut self, callee: &Value, args: &[Value], scope: &Scope) -> Result<Value> {
        match callee {
            Value::Struct(descriptor) => descriptor.instantiate(args),
            Value::NativeFunction(native) => native.call(args, scope),
            Value::Function(function) => self.call_user_function(function, args),
            other => Err(Error::type_mismatch(format!(
                "{} ({}) is not callable",
                other.type_name(),
                other
            ))),
        }
    }

    fn call_user_function(&mut self, function: &FunctionValue, args: &[Value]) -> Result<Value> {
        if self.depth >= self.max_depth {
            return Err(Error::CallDepthExceeded {
                limit: self.max_depth,
            });
        }

        tracing::debug!(
            function = %function.name,
            arity = args.len(),
            depth = self.depth + 1,
            "calling user function"
        );

        self.depth += 1;
        let result = self.run_function_body(function, args);
        self.depth -= 1;
        result
    }

    fn run_function_body(&mut self, function: &FunctionValue, args: &[Value]) -> Result<Value> {
        let frame = function.closure().child();

        // Missing arguments are null, extras are dropped
        for (i, parameter) in function.parameters.iter().enumerate() {
            frame.declare(parameter, args.get(i).cloned().unwrap_or(Value::Null))?;
        }

        for stmt in function.body.iter() {
            match stmt {
                Statement::Return(expr) => return self.evaluate_expression(expr, &frame),
                // Only a truthy value returned from a direct `if` ends the call
                Statement::If { .. } => {
                    if let Flow::Return(value) = self.execute(stmt, &frame)? {
                        if value.is_truthy() {
                            return Ok(value);
                        }
                    }
                }
                _ => {
                    self.execute(stmt, &frame)?;
                }
            }
        }

        Ok(Value::Null)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies an arithmetic operator
///
/// A string on either side switches to string semantics: `+` concatenates
/// display forms, `-` subtracts numeric coercions, anything else is `null`.
pub fn binary_operation(operator: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
        return Ok(match operator {
            BinaryOp::Add => Value::String(format!("{}{}", left, right)),
            BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
            _ => Value::Null,
        });
    }

    if let Some(offending) = [left, right].into_iter().find(|v| !v.is_arithmetic()) {
        return Err(Error::type_mismatch(format!(
            "binary expression received {} ({}) which does not support operator \"{}\"",
            offending.type_name(),
            offending,
            operator
        )));
    }

    let (l, r) = (left.to_number(), right.to_number());
    let result = match operator {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div | BinaryOp::Mod if r == 0.0 => return Err(Error::DivisionByZero),
        BinaryOp::Div => l / r,
        BinaryOp::Mod => l % r,
    };

    Ok(Value::Number(result))
}

/// Applies a comparison; `equals` turns `<`/`>` into `<=`/`>=`
pub fn logical_operation(operator: LogicalOp, equals: bool, left: &Value, right: &Value) -> bool {
    match operator {
        LogicalOp::Equal => left.loosely_equals(right),
        LogicalOp::NotEqual => !left.loosely_equals(right),
        LogicalOp::Less => (equals && left.loosely_equals(right)) || left.less_than(right),
        LogicalOp::Greater => (equals && left.loosely_equals(right)) || left.greater_than(right),
    }
}
