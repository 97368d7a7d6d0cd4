use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::mem;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{Error, Interrupt, RuntimeError};
use crate::expr::{Expr, ExprVisitor};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::{Token, Type};

type ExecResult = Result<(), Interrupt>;
type EvalResult = Result<Object, Interrupt>;

fn number_operands_error(operator: &Token) -> Interrupt {
    Interrupt::Error(RuntimeError {
        token: operator.clone(),
        message: "Operands must be numbers.".to_string(),
    })
}

/// Executes statements and evaluates expressions against the environment
/// chain, using the resolution table produced by the resolver to find
/// locals.
///
/// Program output is written to the injected sink so that callers (and
/// tests) decide where prints go.
pub struct Interpreter<'a> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<usize, usize>,
    output: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::get_globals() {
            let name = native.name.clone();
            globals.borrow_mut().define(&name, Object::from(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Executes the statements in order. A runtime error is reported and
    /// halts execution of the remaining statements.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => (),
                Err(Interrupt::Error(error)) => {
                    error.throw();
                    return;
                }
                // The resolver rejects top-level returns before execution.
                Err(Interrupt::Return(_)) => unreachable!(),
            }
        }
    }

    /// Evaluates a single expression and prints its value.
    pub fn interpret_expression(&mut self, expr: &Expr) {
        match self.evaluate(expr) {
            Ok(value) => {
                writeln!(self.output, "{value}").expect("output stream should be writable");
            }
            Err(Interrupt::Error(error)) => error.throw(),
            Err(Interrupt::Return(_)) => unreachable!(),
        }
    }

    /// Records the scope distance for a resolved local. Called by the
    /// resolver before interpretation starts.
    pub fn resolve(&mut self, id: usize, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// The resolution table: node id to environment-hop distance.
    pub fn resolutions(&self) -> &HashMap<usize, usize> {
        &self.locals
    }

    /// Executes statements with the given environment as the current one.
    /// The previous environment is restored on every exit path, including
    /// return unwinds and runtime errors.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> ExecResult {
        let previous = mem::replace(&mut self.environment, environment);

        let mut result = Ok(());
        for statement in statements {
            result = self.execute(statement);
            if result.is_err() {
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    /// Looks up a variable: resolved locals walk the chain by their
    /// recorded distance, everything else is a global.
    fn lookup_variable(&self, name: &Token, id: usize) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => self
                .environment
                .borrow()
                .get_at(distance, &name.lexeme)
                .ok_or_else(|| RuntimeError {
                    token: name.clone(),
                    message: format!("Undefined variable '{}'.", name.lexeme),
                }),
            None => self.globals.borrow().get(name),
        }
    }
}

impl<'a> ExprVisitor<EvalResult> for Interpreter<'a> {
    fn visit_literal_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Literal(literal) = expr else { unreachable!() };

        Ok(Object::from(literal.clone()))
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Unary(unary) = expr else { unreachable!() };

        let right = self.evaluate(&unary.expr)?;

        match unary.operator.r#type {
            Type::Minus => (-right).ok_or_else(|| {
                Interrupt::Error(RuntimeError {
                    token: unary.operator.clone(),
                    message: "Operand must be a number.".to_string(),
                })
            }),
            Type::Bang => Ok(Object::from(!right.is_truthy())),
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Binary(binary) = expr else { unreachable!() };

        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;

        let operator = &binary.operator;
        match operator.r#type {
            Type::Plus => (left + right).ok_or_else(|| {
                Interrupt::Error(RuntimeError {
                    token: operator.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                })
            }),
            Type::Minus => (left - right).ok_or_else(|| number_operands_error(operator)),
            Type::Star => (left * right).ok_or_else(|| number_operands_error(operator)),
            Type::Slash => (left / right).ok_or_else(|| number_operands_error(operator)),
            Type::Greater | Type::GreaterEqual | Type::Less | Type::LessEqual => {
                let (Some(left), Some(right)) = (left.as_number(), right.as_number()) else {
                    return Err(number_operands_error(operator));
                };

                Ok(Object::from(match operator.r#type {
                    Type::Greater => left > right,
                    Type::GreaterEqual => left >= right,
                    Type::Less => left < right,
                    Type::LessEqual => left <= right,
                    _ => unreachable!(),
                }))
            }
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!(),
        }
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Logical(logical) = expr else { unreachable!() };

        let left = self.evaluate(&logical.left)?;

        // The short-circuited value itself is returned, not a boolean.
        match logical.operator.r#type {
            Type::Or if left.is_truthy() => Ok(left),
            Type::And if !left.is_truthy() => Ok(left),
            _ => self.evaluate(&logical.right),
        }
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Grouping(grouping) = expr else { unreachable!() };

        self.evaluate(&grouping.expr)
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Variable(variable) = expr else { unreachable!() };

        self.lookup_variable(&variable.name, variable.id).map_err(Interrupt::from)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Assign(assign) = expr else { unreachable!() };

        let value = self.evaluate(&assign.value)?;

        match self.locals.get(&assign.id) {
            Some(&distance) => {
                self.environment.borrow_mut().assign_at(distance, &assign.name, value.clone());
            }
            None => {
                self.globals.borrow_mut().assign(&assign.name, value.clone())?;
            }
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Call(call) = expr else { unreachable!() };

        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let callable: &dyn Callable = match &callee {
            Object::Function(function) => function,
            Object::NativeFunction(function) => function,
            Object::Class(class) => class,
            _ => {
                return Err(RuntimeError {
                    token: call.paren.clone(),
                    message: "Can only call functions and classes.".to_string(),
                }.into());
            }
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError {
                token: call.paren.clone(),
                message: format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    arguments.len()
                ),
            }.into());
        }

        callable.call(self, arguments).map_err(Interrupt::from)
    }

    fn visit_get_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Get(get) = expr else { unreachable!() };

        match self.evaluate(&get.object)? {
            Object::Instance(instance) => {
                let this = Object::Instance(Rc::clone(&instance));
                let result = instance.borrow().get(&get.name, &this);
                result.map_err(Interrupt::from)
            }
            _ => Err(RuntimeError {
                token: get.name.clone(),
                message: "Only instances have properties.".to_string(),
            }.into()),
        }
    }

    fn visit_set_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Set(set) = expr else { unreachable!() };

        let Object::Instance(instance) = self.evaluate(&set.object)? else {
            return Err(RuntimeError {
                token: set.name.clone(),
                message: "Only instances have fields.".to_string(),
            }.into());
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());

        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::This(this) = expr else { unreachable!() };

        self.lookup_variable(&this.keyword, this.id).map_err(Interrupt::from)
    }

    fn visit_super_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Super(super_expr) = expr else { unreachable!() };

        // A 'super' with no resolution entry has no enclosing class. The
        // single-expression entry point evaluates without a resolver pass,
        // so this is a runtime error like any other unbound name.
        let Some(&distance) = self.locals.get(&super_expr.id) else {
            return Err(RuntimeError {
                token: super_expr.keyword.clone(),
                message: "Can't use 'super' outside of a class.".to_string(),
            }.into());
        };

        // 'this' lives one environment below the scope binding 'super'.
        let superclass = self.environment.borrow().get_at(distance, "super")
            .ok_or_else(|| RuntimeError {
                token: super_expr.keyword.clone(),
                message: "Undefined variable 'super'.".to_string(),
            })?;
        let this = self.environment.borrow().get_at(distance - 1, "this")
            .ok_or_else(|| RuntimeError {
                token: super_expr.keyword.clone(),
                message: "Undefined variable 'this'.".to_string(),
            })?;

        let Object::Class(superclass) = superclass else { unreachable!() };

        let method = superclass.borrow().find_method(&super_expr.method.lexeme)
            .ok_or_else(|| Interrupt::Error(RuntimeError {
                token: super_expr.method.clone(),
                message: format!("Undefined property '{}'.", super_expr.method.lexeme),
            }))?;

        Ok(Object::from(method.bind(this)))
    }
}

impl<'a> StmtVisitor<ExecResult> for Interpreter<'a> {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Expression(data) = stmt else { unreachable!() };

        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Print(data) = stmt else { unreachable!() };

        let value = self.evaluate(&data.expr)?;
        writeln!(self.output, "{value}").expect("output stream should be writable");

        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Var(data) = stmt else { unreachable!() };

        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);

        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Block(data) = stmt else { unreachable!() };

        let environment = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, Rc::new(RefCell::new(environment)))
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.body)?;
        }

        Ok(())
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Function(data) = stmt else { unreachable!() };

        let function = Function::new(data, Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));

        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Return(data) = stmt else { unreachable!() };

        let value = match &data.value {
            Some(value) => self.evaluate(value)?,
            None => Object::from(Literal::Nil),
        };

        Err(Interrupt::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Class(data) = stmt else { unreachable!() };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        let superclass = match &data.superclass {
            Some(expr) => {
                let Expr::Variable(variable) = expr else { unreachable!() };

                match self.evaluate(expr)? {
                    Object::Class(class) => Some(class),
                    _ => {
                        return Err(RuntimeError {
                            token: variable.name.clone(),
                            message: "Superclass must be a class.".to_string(),
                        }.into());
                    }
                }
            }
            None => None,
        };

        // Methods of a subclass close over an extra environment binding
        // 'super' to the superclass value.
        if let Some(superclass) = &superclass {
            let mut environment = Environment::new(Some(Rc::clone(&self.environment)));
            environment.define("super", Object::Class(Rc::clone(superclass)));
            self.environment = Rc::new(RefCell::new(environment));
        }

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(function) = method else { unreachable!() };

            let is_initializer = function.name.lexeme == "init";
            methods.insert(
                function.name.lexeme.clone(),
                Function::new(function, Rc::clone(&self.environment), is_initializer),
            );
        }

        let class = Rc::new(RefCell::new(Class::new(
            data.name.lexeme.clone(),
            superclass,
            methods,
        )));

        if data.superclass.is_some() {
            let enclosing = self.environment.borrow().enclosing.clone()
                .expect("'super' environment should have an enclosing scope");
            self.environment = enclosing;
        }

        self.environment.borrow_mut().assign(&data.name, Object::Class(class))?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr::{BinaryData, GroupingData, UnaryData};

    fn token(r#type: Type, lexeme: &str) -> Token {
        Token::new(r#type, lexeme.to_string(), None, 1)
    }

    fn number(n: f64) -> Expr {
        Expr::Literal(Literal::Number(n))
    }

    fn string(s: &str) -> Expr {
        Expr::Literal(Literal::from(s))
    }

    fn binary(left: Expr, operator: Token, right: Expr) -> Expr {
        Expr::Binary(BinaryData {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn evaluate(expr: &Expr) -> EvalResult {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);
        interpreter.evaluate(expr)
    }

    #[test]
    fn evaluate_literal() {
        assert_eq!(evaluate(&number(12.0)).unwrap(), Object::from(12.0));
    }

    #[test]
    fn evaluate_grouping() {
        let expr = Expr::Grouping(GroupingData { expr: Box::new(number(12.0)) });
        assert_eq!(evaluate(&expr).unwrap(), Object::from(12.0));
    }

    #[test]
    fn evaluate_unary_minus() {
        let expr = Expr::Unary(UnaryData {
            operator: token(Type::Minus, "-"),
            expr: Box::new(number(12.0)),
        });
        assert_eq!(evaluate(&expr).unwrap(), Object::from(-12.0));
    }

    #[test]
    fn evaluate_unary_minus_requires_number() {
        let expr = Expr::Unary(UnaryData {
            operator: token(Type::Minus, "-"),
            expr: Box::new(string("hi")),
        });

        let Err(Interrupt::Error(error)) = evaluate(&expr) else { panic!("expected error") };
        assert_eq!(error.message, "Operand must be a number.");
    }

    #[test]
    fn evaluate_unary_bang_uses_truthiness() {
        for (literal, expected) in [
            (Literal::Nil, true),
            (Literal::Bool(false), true),
            (Literal::Number(0.0), false),
            (Literal::from(""), false),
        ] {
            let expr = Expr::Unary(UnaryData {
                operator: token(Type::Bang, "!"),
                expr: Box::new(Expr::Literal(literal)),
            });
            assert_eq!(evaluate(&expr).unwrap(), Object::from(expected));
        }
    }

    #[test]
    fn evaluate_arithmetic() {
        let expr = binary(number(6.0), token(Type::Star, "*"), number(7.0));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(42.0));

        let expr = binary(number(6.0), token(Type::Minus, "-"), number(24.0));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(-18.0));
    }

    #[test]
    fn evaluate_string_concatenation() {
        let expr = binary(string("Hello"), token(Type::Plus, "+"), string("World"));
        assert_eq!(evaluate(&expr).unwrap(), Object::from("HelloWorld"));
    }

    #[test]
    fn evaluate_mixed_addition_fails() {
        let expr = binary(string("Hello"), token(Type::Plus, "+"), number(12.0));

        let Err(Interrupt::Error(error)) = evaluate(&expr) else { panic!("expected error") };
        assert_eq!(error.message, "Operands must be two numbers or two strings.");
    }

    #[test]
    fn evaluate_comparisons() {
        let expr = binary(number(1.0), token(Type::Less, "<"), number(2.0));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(true));

        let expr = binary(number(2.0), token(Type::GreaterEqual, ">="), number(2.0));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(true));

        let expr = binary(number(2.0), token(Type::LessEqual, "<="), number(1.0));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(false));
    }

    #[test]
    fn comparing_unlike_types_fails() {
        let expr = binary(string("1"), token(Type::Less, "<"), number(2.0));

        let Err(Interrupt::Error(error)) = evaluate(&expr) else { panic!("expected error") };
        assert_eq!(error.message, "Operands must be numbers.");
    }

    #[test]
    fn equality_is_total_and_strict() {
        let expr = binary(number(1.0), token(Type::EqualEqual, "=="), string("1"));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(false));

        let expr = binary(
            Expr::Literal(Literal::Nil),
            token(Type::EqualEqual, "=="),
            Expr::Literal(Literal::Nil),
        );
        assert_eq!(evaluate(&expr).unwrap(), Object::from(true));

        let expr = binary(
            Expr::Literal(Literal::Nil),
            token(Type::BangEqual, "!="),
            Expr::Literal(Literal::Bool(false)),
        );
        assert_eq!(evaluate(&expr).unwrap(), Object::from(true));
    }

    #[test]
    fn division_by_zero_is_infinity() {
        let expr = binary(number(1.0), token(Type::Slash, "/"), number(0.0));

        let Ok(Object::Literal(Literal::Number(result))) = evaluate(&expr) else {
            panic!("expected a number");
        };
        assert!(result.is_infinite());
    }

    #[test]
    fn clock_is_defined_in_globals() {
        let mut output = Vec::new();
        let interpreter = Interpreter::new(&mut output);
        let clock = interpreter.globals.borrow().get(&Token::from("clock")).unwrap();

        assert_eq!(clock.type_str(), "native function");
    }
}
