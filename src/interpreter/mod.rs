//! The tree-walking evaluator. Executes the syntax tree directly against a
//! chain of `Environment`s, using `Signal` (see `control`) for
//! `return`/`break`/`continue` instead of native exceptions.
pub mod control;

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::expression::LogicalOp;
use crate::ast::{Expression, FunctionDeclaration, Parameter, Program, Statement};
use crate::builtins;
use crate::diagnostic::{Diagnostic, Position};
use crate::environment::Environment;
use crate::events::EventLog;
use crate::value::{
    self, Callable, ContractHandle, EnumDescriptor, MapKey, StructDescriptor, StructInstanceData,
    UserFunction, Value,
};
use control::Signal;

pub struct Interpreter {
    pub global_env: Rc<Environment>,
    pub events: Rc<EventLog>,
}

impl Interpreter {
    pub fn new() -> Self {
        let global_env = Environment::new(None);
        builtins::install(&global_env);
        Self {
            global_env,
            events: Rc::new(EventLog::new()),
        }
    }

    pub fn run(&self, program: &Program) -> Result<Value, Diagnostic> {
        let env = self.global_env.clone();
        match self.exec_block(&program.statements, &env)? {
            Signal::Value(v) => Ok(v),
            Signal::Return(_) => Err(Diagnostic::runtime("'return' outside a function")),
            Signal::Break => Err(Diagnostic::runtime("'break' outside a loop")),
            Signal::Continue => Err(Diagnostic::runtime("'continue' outside a loop")),
        }
    }

    fn exec_block(&self, block: &[Statement], env: &Rc<Environment>) -> Result<Signal, Diagnostic> {
        let mut last = Signal::Value(Value::None);
        for statement in block {
            let signal = self.exec_statement(statement, env)?;
            match signal {
                Signal::Value(_) => last = signal,
                _ => return Ok(signal),
            }
        }
        Ok(last)
    }

    fn exec_statement(&self, statement: &Statement, env: &Rc<Environment>) -> Result<Signal, Diagnostic> {
        match statement {
            Statement::Expression(expr) => Ok(Signal::Value(self.eval(expr, env)?)),
            Statement::VarDecl {
                name,
                value,
                is_const,
                ..
            } => {
                let v = match value {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::None,
                };
                env.define(name, v, *is_const);
                Ok(Signal::Value(Value::None))
            }
            Statement::Assignment {
                target,
                op,
                value,
                position,
            } => {
                self.exec_assignment(target, op, value, env, *position)?;
                Ok(Signal::Value(Value::None))
            }
            Statement::If {
                then_branch,
                elif_branches,
                else_branch,
            } => {
                if self.eval(&then_branch.condition, env)?.is_truthy() {
                    let child = Environment::new(Some(env.clone()));
                    return self.exec_block(&then_branch.body, &child);
                }
                for branch in elif_branches {
                    if self.eval(&branch.condition, env)?.is_truthy() {
                        let child = Environment::new(Some(env.clone()));
                        return self.exec_block(&branch.body, &child);
                    }
                }
                if let Some(body) = else_branch {
                    let child = Environment::new(Some(env.clone()));
                    return self.exec_block(body, &child);
                }
                Ok(Signal::Value(Value::None))
            }
            Statement::While { condition, body } => {
                while self.eval(condition, env)?.is_truthy() {
                    let child = Environment::new(Some(env.clone()));
                    match self.exec_block(body, &child)? {
                        Signal::Break => break,
                        Signal::Continue | Signal::Value(_) => {}
                        ret @ Signal::Return(_) => return Ok(ret),
                    }
                }
                Ok(Signal::Value(Value::None))
            }
            Statement::ForIn {
                var,
                iterable,
                body,
                position,
            } => {
                let iterable_value = self.eval(iterable, env)?;
                let items = self.iterate(&iterable_value, *position)?;
                for item in items {
                    let child = Environment::new(Some(env.clone()));
                    child.define(var, item, false);
                    match self.exec_block(body, &child)? {
                        Signal::Break => break,
                        Signal::Continue | Signal::Value(_) => {}
                        ret @ Signal::Return(_) => return Ok(ret),
                    }
                }
                Ok(Signal::Value(Value::None))
            }
            Statement::Break(_) => Ok(Signal::Break),
            Statement::Continue(_) => Ok(Signal::Continue),
            Statement::Return(value, _) => {
                let v = match value {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::None,
                };
                Ok(Signal::Return(v))
            }
            Statement::FnDecl(decl) => {
                env.define(
                    &decl.name,
                    Value::Callable(Callable::User(Rc::new(UserFunction {
                        declaration: decl.clone(),
                        closure: env.clone(),
                    }))),
                    false,
                );
                Ok(Signal::Value(Value::None))
            }
            Statement::StructDecl { name, fields, .. } => {
                env.define(
                    name,
                    Value::Struct(Rc::new(StructDescriptor {
                        name: name.clone(),
                        fields: fields.clone(),
                    })),
                    false,
                );
                Ok(Signal::Value(Value::None))
            }
            Statement::EnumDecl { name, variants, .. } => {
                let descriptor = Rc::new(EnumDescriptor {
                    name: name.clone(),
                    variants: variants.clone(),
                });
                for variant in variants {
                    // Each variant maps to its own name, matching the
                    // original's enum-variant-maps-to-itself semantics.
                    env.define(&format!("{name}.{variant}"), Value::str(variant.clone()), true);
                }
                env.define(name, Value::Enum(descriptor), true);
                Ok(Signal::Value(Value::None))
            }
            Statement::ContractDecl { name, body, .. } => {
                let contract_env = Environment::new(Some(env.clone()));
                self.exec_block(body, &contract_env)?;
                env.define(
                    name,
                    Value::Contract(Rc::new(ContractHandle {
                        name: name.clone(),
                        env: contract_env,
                    })),
                    true,
                );
                Ok(Signal::Value(Value::None))
            }
            Statement::EventDecl { .. } => Ok(Signal::Value(Value::None)),
            Statement::Emit { name, args, .. } => {
                let values = args
                    .iter()
                    .map(|a| self.eval(a, env))
                    .collect::<Result<Vec<_>, _>>()?;
                self.events.emit(name, &values);
                Ok(Signal::Value(Value::None))
            }
            Statement::Impl {
                type_name,
                methods,
                position,
            } => {
                if !matches!(env.get(type_name)?, Value::Struct(_)) {
                    return Err(Diagnostic::runtime_at(
                        format!("'impl' target '{type_name}' is not a struct"),
                        *position,
                    ));
                }
                for method in methods {
                    let qualified = format!("{type_name}.{}", method.name);
                    env.define(
                        &qualified,
                        Value::Callable(Callable::User(Rc::new(UserFunction {
                            declaration: method.clone(),
                            closure: env.clone(),
                        }))),
                        false,
                    );
                }
                Ok(Signal::Value(Value::None))
            }
        }
    }

    fn exec_assignment(
        &self,
        target: &Expression,
        op: &str,
        value: &Expression,
        env: &Rc<Environment>,
        position: Position,
    ) -> Result<(), Diagnostic> {
        match target {
            Expression::Identifier(name, _) => {
                let new_value = if op == "=" {
                    self.eval(value, env)?
                } else {
                    let current = env.get(name)?;
                    let rhs = self.eval(value, env)?;
                    apply_compound(op, &current, &rhs, position)?
                };
                env.assign(name, new_value)
            }
            Expression::Index { object, index, .. } => {
                let obj = self.eval(object, env)?;
                let idx = self.eval(index, env)?;
                let new_value = if op == "=" {
                    self.eval(value, env)?
                } else {
                    let current = self.get_index(&obj, &idx, position)?;
                    let rhs = self.eval(value, env)?;
                    apply_compound(op, &current, &rhs, position)?
                };
                self.set_index(&obj, &idx, new_value, position)
            }
            Expression::Member { object, name, .. } => {
                let obj = self.eval(object, env)?;
                let new_value = if op == "=" {
                    self.eval(value, env)?
                } else {
                    let current = self.get_member(&obj, name, position)?;
                    let rhs = self.eval(value, env)?;
                    apply_compound(op, &current, &rhs, position)?
                };
                self.set_member(&obj, name, new_value, position)
            }
            _ => Err(Diagnostic::runtime_at("invalid assignment target", position)),
        }
    }

    fn iterate(&self, value: &Value, position: Position) -> Result<Vec<Value>, Diagnostic> {
        match value {
            Value::List(list) => Ok(list.borrow().clone()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
            Value::Map(map) => Ok(map
                .borrow()
                .keys()
                .map(|k| match k {
                    MapKey::Str(s) => Value::Str(s.clone()),
                    MapKey::Int(i) => Value::Int(*i),
                })
                .collect()),
            other => Err(Diagnostic::runtime_at(
                format!("'{}' is not iterable", other.type_name()),
                position,
            )),
        }
    }

    fn get_index(&self, obj: &Value, index: &Value, position: Position) -> Result<Value, Diagnostic> {
        match (obj, index) {
            (Value::List(list), Value::Int(i)) => {
                let list = list.borrow();
                value::resolve_list_index(list.len(), *i)
                    .and_then(|idx| list.get(idx).cloned())
                    .ok_or_else(|| Diagnostic::runtime_at("list index out of range", position))
            }
            (Value::Str(s), Value::Int(i)) => {
                let chars: Vec<char> = s.chars().collect();
                let idx = value::resolve_list_index(chars.len(), *i)
                    .ok_or_else(|| Diagnostic::runtime_at("string index out of range", position))?;
                Ok(Value::str(chars[idx].to_string()))
            }
            (Value::Map(map), key) => {
                let key = value::to_map_key(key)?;
                map.borrow()
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| Diagnostic::runtime_at(format!("key '{key}' not found"), position))
            }
            _ => Err(Diagnostic::runtime_at(
                format!("'{}' is not indexable", obj.type_name()),
                position,
            )),
        }
    }

    fn set_index(&self, obj: &Value, index: &Value, value: Value, position: Position) -> Result<(), Diagnostic> {
        match (obj, index) {
            (Value::List(list), Value::Int(i)) => {
                let mut list = list.borrow_mut();
                let idx = value::resolve_list_index(list.len(), *i)
                    .ok_or_else(|| Diagnostic::runtime_at("list index out of range", position))?;
                list[idx] = value;
                Ok(())
            }
            (Value::Map(map), key) => {
                let key = value::to_map_key(key)?;
                map.borrow_mut().insert(key, value);
                Ok(())
            }
            _ => Err(Diagnostic::runtime_at(
                format!("'{}' does not support index assignment", obj.type_name()),
                position,
            )),
        }
    }

    fn get_member(&self, obj: &Value, name: &str, position: Position) -> Result<Value, Diagnostic> {
        match obj {
            Value::Instance(inst) => inst
                .borrow()
                .fields
                .get(name)
                .cloned()
                .ok_or_else(|| Diagnostic::runtime_at(format!("no field '{name}'"), position)),
            Value::Contract(c) => c.env.get(name),
            other => Err(Diagnostic::runtime_at(
                format!("'{}' has no attribute '{name}'", other.type_name()),
                position,
            )),
        }
    }

    fn set_member(&self, obj: &Value, name: &str, value: Value, position: Position) -> Result<(), Diagnostic> {
        match obj {
            Value::Instance(inst) => {
                let mut inst = inst.borrow_mut();
                if !inst.fields.contains_key(name) {
                    return Err(Diagnostic::runtime_at(format!("no field '{name}'"), position));
                }
                inst.fields.insert(name.to_string(), value);
                Ok(())
            }
            other => Err(Diagnostic::runtime_at(
                format!("'{}' has no attribute '{name}'", other.type_name()),
                position,
            )),
        }
    }

    pub fn eval(&self, expr: &Expression, env: &Rc<Environment>) -> Result<Value, Diagnostic> {
        match expr {
            Expression::Integer(v, _) => Ok(Value::Int(*v)),
            Expression::Float(v, _) => Ok(Value::Float(*v)),
            Expression::Str(s, _) => Ok(Value::str(s.clone())),
            Expression::Boolean(b, _) => Ok(Value::Bool(*b)),
            Expression::Null(_) => Ok(Value::None),
            Expression::Identifier(name, _) => env.get(name),
            Expression::ListLiteral(items, _) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(item, env))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(values))
            }
            Expression::MapLiteral(entries, _) => {
                let mut map = IndexMap::new();
                for (key_expr, value_expr) in entries {
                    let key = value::to_map_key(&self.eval(key_expr, env)?)?;
                    let value = self.eval(value_expr, env)?;
                    map.insert(key, value);
                }
                Ok(Value::map(map))
            }
            Expression::Unary {
                op,
                operand,
                position,
            } => {
                let v = self.eval(operand, env)?;
                match op.as_str() {
                    "-" => value::negate(&v),
                    "~" => value::bit_not(&v),
                    "not" => Ok(Value::Bool(!v.is_truthy())),
                    other => Err(Diagnostic::runtime_at(
                        format!("unknown unary operator '{other}'"),
                        *position,
                    )),
                }
            }
            Expression::Binary {
                left,
                op,
                right,
                position,
            } => {
                let l = self.eval(left, env)?;
                let r = self.eval(right, env)?;
                apply_compound(op, &l, &r, *position)
            }
            Expression::Comparison {
                left, op, right, ..
            } => {
                let l = self.eval(left, env)?;
                let r = self.eval(right, env)?;
                value::compare(op, &l, &r)
            }
            Expression::Logical { left, op, right, .. } => {
                let l = self.eval(left, env)?;
                match op {
                    LogicalOp::And => {
                        if !l.is_truthy() {
                            Ok(l)
                        } else {
                            self.eval(right, env)
                        }
                    }
                    LogicalOp::Or => {
                        if l.is_truthy() {
                            Ok(l)
                        } else {
                            self.eval(right, env)
                        }
                    }
                }
            }
            Expression::Member {
                object,
                name,
                position,
            } => {
                let obj = self.eval(object, env)?;
                self.get_member(&obj, name, *position)
            }
            Expression::Index {
                object,
                index,
                position,
            } => {
                let obj = self.eval(object, env)?;
                let idx = self.eval(index, env)?;
                self.get_index(&obj, &idx, *position)
            }
            Expression::Call {
                callee,
                args,
                position,
            } => {
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg, env))
                    .collect::<Result<Vec<_>, _>>()?;
                let func = self.eval(callee, env)?;
                self.call_value(&func, values, *position)
            }
            Expression::MethodCall {
                object,
                method,
                args,
                position,
            } => {
                let obj = self.eval(object, env)?;
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg, env))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call_method(&obj, method, values, env, *position)
            }
            Expression::Lambda {
                params,
                body,
                position,
            } => Ok(Value::Callable(Callable::User(Rc::new(UserFunction {
                declaration: Rc::new(lambda_declaration(params.clone(), (**body).clone(), *position)),
                closure: env.clone(),
            })))),
            Expression::Await { expr, position: _ } => {
                let v = self.eval(expr, env)?;
                match v {
                    Value::Pending(p) => Ok(p.borrow_mut().resolve()),
                    other => Ok(other),
                }
            }
        }
    }

    fn call_value(&self, func: &Value, args: Vec<Value>, position: Position) -> Result<Value, Diagnostic> {
        match func {
            Value::Callable(Callable::Host(f)) => f(&args),
            Value::Callable(Callable::User(uf)) => self.call_user_function(uf, args),
            Value::Callable(Callable::Compiled(_)) => Err(Diagnostic::runtime_at(
                "cannot call a compiled function from the tree-walking evaluator",
                position,
            )),
            Value::Struct(descriptor) => {
                let mut fields = IndexMap::new();
                for (i, (field_name, _field_type)) in descriptor.fields.iter().enumerate() {
                    fields.insert(field_name.clone(), args.get(i).cloned().unwrap_or(Value::None));
                }
                Ok(Value::Instance(Rc::new(RefCell::new(StructInstanceData {
                    descriptor: descriptor.clone(),
                    fields,
                }))))
            }
            other => Err(Diagnostic::runtime_at(
                format!("'{}' is not callable", other.type_name()),
                position,
            )),
        }
    }

    fn call_user_function(&self, uf: &Rc<UserFunction>, args: Vec<Value>) -> Result<Value, Diagnostic> {
        let call_env = Environment::new(Some(uf.closure.clone()));
        for (i, param) in uf.declaration.params.iter().enumerate() {
            let value = if let Some(v) = args.get(i) {
                v.clone()
            } else if let Some(default) = &param.default {
                // Default expressions are evaluated in the defining
                // environment, not the call-site or call environment.
                self.eval(default, &uf.closure)?
            } else {
                Value::None
            };
            call_env.define(&param.name, value, false);
        }
        match self.exec_block(&uf.declaration.body, &call_env)? {
            Signal::Return(v) => Ok(v),
            Signal::Break | Signal::Continue => {
                Err(Diagnostic::runtime("'break'/'continue' escaped a function body"))
            }
            Signal::Value(_) => Ok(Value::None),
        }
    }

    fn call_method(
        &self,
        obj: &Value,
        method: &str,
        mut args: Vec<Value>,
        env: &Rc<Environment>,
        position: Position,
    ) -> Result<Value, Diagnostic> {
        if let Value::Instance(inst) = obj {
            let type_name = inst.borrow().descriptor.name.clone();
            let qualified = format!("{type_name}.{method}");
            if env.exists(&qualified) {
                if let Value::Callable(Callable::User(uf)) = env.get(&qualified)? {
                    let mut call_args = vec![obj.clone()];
                    call_args.append(&mut args);
                    return self.call_user_function(&uf, call_args);
                }
            }
        }
        match obj {
            Value::List(list) => match method {
                "append" => {
                    let value = args
                        .into_iter()
                        .next()
                        .ok_or_else(|| Diagnostic::runtime_at("'append' expects 1 argument", position))?;
                    list.borrow_mut().push(value);
                    Ok(Value::List(Rc::clone(list)))
                }
                "pop" => {
                    let index = match args.first() {
                        Some(Value::Int(i)) => *i,
                        Some(_) => {
                            return Err(Diagnostic::runtime_at("'pop' expects an int index", position))
                        }
                        None => -1,
                    };
                    let mut items = list.borrow_mut();
                    let resolved = value::resolve_list_index(items.len(), index)
                        .ok_or_else(|| Diagnostic::runtime_at("'pop' index out of range", position))?;
                    Ok(items.remove(resolved))
                }
                "length" => Ok(Value::Int(list.borrow().len() as i64)),
                "reverse" => {
                    let mut items = list.borrow().clone();
                    items.reverse();
                    Ok(Value::list(items))
                }
                "sort" => {
                    let mut items = list.borrow().clone();
                    let mut err = None;
                    items.sort_by(|a, b| match value::value_cmp(a, b) {
                        Ok(ordering) => ordering,
                        Err(e) => {
                            err.get_or_insert(e);
                            std::cmp::Ordering::Equal
                        }
                    });
                    if let Some(e) = err {
                        return Err(e);
                    }
                    Ok(Value::list(items))
                }
                other => Err(Diagnostic::runtime_at(format!("list has no method '{other}'"), position)),
            },
            Value::Str(s) => match method {
                "length" => Ok(Value::Int(s.chars().count() as i64)),
                "upper" => Ok(Value::str(s.to_uppercase())),
                "lower" => Ok(Value::str(s.to_lowercase())),
                "strip" => Ok(Value::str(s.trim().to_string())),
                "split" => {
                    let sep = match args.first() {
                        Some(Value::Str(s)) => s.to_string(),
                        None => " ".to_string(),
                        _ => return Err(Diagnostic::runtime_at("'split' expects a string separator", position)),
                    };
                    Ok(Value::list(
                        s.split(sep.as_str()).map(Value::str).collect(),
                    ))
                }
                "replace" => match (args.first(), args.get(1)) {
                    (Some(Value::Str(old)), Some(Value::Str(new))) => {
                        Ok(Value::str(s.replace(old.as_ref(), new)))
                    }
                    _ => Err(Diagnostic::runtime_at(
                        "'replace' expects (old: str, new: str)",
                        position,
                    )),
                },
                "contains" => match args.first() {
                    Some(Value::Str(sub)) => Ok(Value::Bool(s.contains(sub.as_ref()))),
                    _ => Err(Diagnostic::runtime_at("'contains' expects a string", position)),
                },
                other => Err(Diagnostic::runtime_at(format!("string has no method '{other}'"), position)),
            },
            Value::Map(map) => match method {
                "get" => {
                    let key = args
                        .first()
                        .ok_or_else(|| Diagnostic::runtime_at("'get' expects a key", position))?;
                    let key = value::to_map_key(key)?;
                    Ok(map
                        .borrow()
                        .get(&key)
                        .cloned()
                        .unwrap_or_else(|| args.get(1).cloned().unwrap_or(Value::None)))
                }
                "keys" => Ok(Value::list(
                    map.borrow()
                        .keys()
                        .map(|k| match k {
                            MapKey::Str(s) => Value::Str(s.clone()),
                            MapKey::Int(i) => Value::Int(*i),
                        })
                        .collect(),
                )),
                "values" => Ok(Value::list(map.borrow().values().cloned().collect())),
                "contains" => {
                    let key = args
                        .first()
                        .ok_or_else(|| Diagnostic::runtime_at("'contains' expects a key", position))?;
                    let key = value::to_map_key(key)?;
                    Ok(Value::Bool(map.borrow().contains_key(&key)))
                }
                other => Err(Diagnostic::runtime_at(format!("map has no method '{other}'"), position)),
            },
            other => Err(Diagnostic::runtime_at(
                format!("'{}' has no method '{method}'", other.type_name()),
                position,
            )),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn lambda_declaration(params: Vec<Parameter>, body: Expression, position: Position) -> FunctionDeclaration {
    FunctionDeclaration {
        name: "<lambda>".to_string(),
        params,
        return_type: None,
        body: vec![Statement::Return(Some(body), position)],
        is_async: false,
        position,
    }
}

fn apply_compound(op: &str, current: &Value, rhs: &Value, position: Position) -> Result<Value, Diagnostic> {
    let result = match op {
        "+" | "+=" => value::add(current, rhs),
        "-" | "-=" => value::sub(current, rhs),
        "*" | "*=" => value::mul(current, rhs),
        "/" | "/=" => value::div(current, rhs),
        "%" => value::modulo(current, rhs),
        "**" => value::pow(current, rhs),
        "&" => value::bit_and(current, rhs),
        "|" => value::bit_or(current, rhs),
        "^" => value::bit_xor(current, rhs),
        "<<" => value::shl(current, rhs),
        ">>" => value::shr(current, rhs),
        other => return Err(Diagnostic::runtime_at(format!("unknown operator '{other}'"), position)),
    };
    result.map_err(|e| match e {
        Diagnostic::Runtime { message, .. } => Diagnostic::runtime_at(message, position),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn run_source(src: &str) -> Value {
        let program = parse(tokenize(src).unwrap()).unwrap();
        Interpreter::new().run(&program).unwrap()
    }

    #[test]
    fn evaluates_arithmetic_precedence() {
        assert!(matches!(run_source("1 + 2 * 3\n"), Value::Int(7)));
    }

    #[test]
    fn fibonacci_recursion() {
        let result = run_source(
            "fn fib(n) {\nif n < 2 {\nreturn n\n}\nreturn fib(n - 1) + fib(n - 2)\n}\nfib(10)\n",
        );
        assert!(matches!(result, Value::Int(55)));
    }

    #[test]
    fn short_circuit_or_returns_deciding_operand() {
        assert!(matches!(run_source("5 or undeclared_name\n"), Value::Int(5)));
    }

    #[test]
    fn const_reassignment_fails() {
        let program = parse(tokenize("const x = 1\nx = 2\n").unwrap()).unwrap();
        assert!(Interpreter::new().run(&program).is_err());
    }

    #[test]
    fn struct_instance_and_field_access() {
        let result = run_source(
            "struct Point {\nx: int,\ny: int\n}\nlet p = Point(1, 2)\np.x + p.y\n",
        );
        assert!(matches!(result, Value::Int(3)));
    }

    #[test]
    fn lambda_expression_is_callable() {
        let result = run_source("let double = \\(x) => x * 2\ndouble(21)\n");
        assert!(matches!(result, Value::Int(42)));
    }

    #[test]
    fn list_plus_list_is_a_typed_failure() {
        let program = parse(tokenize("[1] + [2]\n").unwrap()).unwrap();
        assert!(Interpreter::new().run(&program).is_err());
    }

    #[test]
    fn default_parameter_evaluated_in_defining_environment() {
        let result = run_source(
            "let step = 1\nfn inc(n, by = step) {\nreturn n + by\n}\nlet step = 99\ninc(10)\n",
        );
        assert!(matches!(result, Value::Int(11)));
    }
}
