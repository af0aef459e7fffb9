//! The stack machine that executes compiled bytecode. Function calls are
//! handled by recursing into `execute` over the callee's own instruction
//! slice with a fresh frame pushed — Rust's call stack gives us the
//! return-address bookkeeping the VM needs, so `CALL`/`RETURN` never have
//! to manage an explicit program-counter save/restore themselves.
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::bytecode::OpCode;
use crate::builtins;
use crate::diagnostic::Diagnostic;
use crate::value::{self, Callable, Value};

type Frame = HashMap<String, Value>;

pub struct Vm {
    stack: Vec<Value>,
    frames: Vec<Frame>,
    constants: Vec<Value>,
}

fn stack_underflow() -> Diagnostic {
    Diagnostic::runtime("stack underflow")
}

impl Vm {
    pub fn new(constants: Vec<Value>) -> Self {
        let mut globals = Frame::new();
        for (name, func) in builtins::entries() {
            globals.insert(name.to_string(), Value::Callable(Callable::Host(func)));
        }
        Self {
            stack: Vec::new(),
            frames: vec![globals],
            constants,
        }
    }

    fn pop(&mut self) -> Result<Value, Diagnostic> {
        self.stack.pop().ok_or_else(stack_underflow)
    }

    fn peek(&self) -> Result<&Value, Diagnostic> {
        self.stack.last().ok_or_else(stack_underflow)
    }

    fn load(&self, name: &str) -> Result<Value, Diagnostic> {
        if let Some(value) = self.frames.last().unwrap().get(name) {
            return Ok(value.clone());
        }
        if self.frames.len() > 1 {
            if let Some(value) = self.frames[0].get(name) {
                return Ok(value.clone());
            }
        }
        Err(Diagnostic::runtime(format!("undefined variable '{name}'")))
    }

    fn store(&mut self, name: &str, value: Value) -> Result<(), Diagnostic> {
        if self.frames.last().unwrap().contains_key(name) {
            self.frames.last_mut().unwrap().insert(name.to_string(), value);
            return Ok(());
        }
        if self.frames.len() > 1 && self.frames[0].contains_key(name) {
            self.frames[0].insert(name.to_string(), value);
            return Ok(());
        }
        Err(Diagnostic::runtime(format!("undefined variable '{name}'")))
    }

    fn define(&mut self, name: &str, value: Value) {
        self.frames.last_mut().unwrap().insert(name.to_string(), value);
    }

    fn binop(
        &mut self,
        f: impl Fn(&Value, &Value) -> Result<Value, Diagnostic>,
    ) -> Result<(), Diagnostic> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.stack.push(f(&a, &b)?);
        Ok(())
    }

    fn compare_op(&mut self, op: &str) -> Result<(), Diagnostic> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.stack.push(value::compare(op, &a, &b)?);
        Ok(())
    }

    fn build_list(&mut self, n: usize) -> Result<(), Diagnostic> {
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            items.push(self.pop()?);
        }
        items.reverse();
        self.stack.push(Value::list(items));
        Ok(())
    }

    fn build_map(&mut self, n: usize) -> Result<(), Diagnostic> {
        let mut pairs = Vec::with_capacity(n);
        for _ in 0..n {
            let value = self.pop()?;
            let key = self.pop()?;
            pairs.push((key, value));
        }
        pairs.reverse();
        let mut entries = IndexMap::new();
        for (key, value) in pairs {
            entries.insert(value::to_map_key(&key)?, value);
        }
        self.stack.push(Value::map(entries));
        Ok(())
    }

    fn index_get(&mut self) -> Result<(), Diagnostic> {
        let index = self.pop()?;
        let object = self.pop()?;
        let result = match (&object, &index) {
            (Value::List(list), Value::Int(i)) => {
                let list = list.borrow();
                value::resolve_list_index(list.len(), *i)
                    .and_then(|idx| list.get(idx).cloned())
                    .ok_or_else(|| Diagnostic::runtime("list index out of range"))?
            }
            (Value::Str(s), Value::Int(i)) => {
                let chars: Vec<char> = s.chars().collect();
                let idx = value::resolve_list_index(chars.len(), *i)
                    .ok_or_else(|| Diagnostic::runtime("string index out of range"))?;
                Value::str(chars[idx].to_string())
            }
            (Value::Map(map), key) => {
                let key = value::to_map_key(key)?;
                map.borrow()
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| Diagnostic::runtime(format!("key '{key}' not found")))?
            }
            _ => {
                return Err(Diagnostic::runtime(format!(
                    "'{}' is not indexable",
                    object.type_name()
                )))
            }
        };
        self.stack.push(result);
        Ok(())
    }

    fn index_set(&mut self) -> Result<(), Diagnostic> {
        let value = self.pop()?;
        let index = self.pop()?;
        let object = self.pop()?;
        match (&object, &index) {
            (Value::List(list), Value::Int(i)) => {
                let mut list = list.borrow_mut();
                let idx = value::resolve_list_index(list.len(), *i)
                    .ok_or_else(|| Diagnostic::runtime("list index out of range"))?;
                list[idx] = value;
            }
            (Value::Map(map), key) => {
                let key = value::to_map_key(key)?;
                map.borrow_mut().insert(key, value);
            }
            _ => {
                return Err(Diagnostic::runtime(format!(
                    "'{}' does not support index assignment",
                    object.type_name()
                )))
            }
        }
        Ok(())
    }

    fn get_attr(&mut self, idx: usize) -> Result<(), Diagnostic> {
        let name = self.constants[idx].to_string();
        let object = self.pop()?;
        let result = match &object {
            Value::Instance(inst) => inst
                .borrow()
                .fields
                .get(&name)
                .cloned()
                .ok_or_else(|| Diagnostic::runtime(format!("no field '{name}'")))?,
            Value::Contract(c) => c.env.get(&name)?,
            _ => {
                return Err(Diagnostic::runtime(format!(
                    "'{}' has no attribute '{name}'",
                    object.type_name()
                )))
            }
        };
        self.stack.push(result);
        Ok(())
    }

    fn set_attr(&mut self, idx: usize) -> Result<(), Diagnostic> {
        let name = self.constants[idx].to_string();
        let value = self.pop()?;
        let object = self.pop()?;
        match &object {
            Value::Instance(inst) => {
                let mut inst = inst.borrow_mut();
                if !inst.fields.contains_key(&name) {
                    return Err(Diagnostic::runtime(format!("no field '{name}'")));
                }
                inst.fields.insert(name, value);
                Ok(())
            }
            _ => Err(Diagnostic::runtime(format!(
                "'{}' has no attribute '{name}'",
                object.type_name()
            ))),
        }
    }

    fn len_op(&mut self) -> Result<(), Diagnostic> {
        let value = self.pop()?;
        let len = match &value {
            Value::Str(s) => s.chars().count(),
            Value::List(l) => l.borrow().len(),
            Value::Map(m) => m.borrow().len(),
            _ => {
                return Err(Diagnostic::runtime(format!(
                    "'{}' has no length",
                    value.type_name()
                )))
            }
        };
        self.stack.push(Value::Int(len as i64));
        Ok(())
    }

    fn call(&mut self, argc: usize) -> Result<(), Diagnostic> {
        let mut args = Vec::with_capacity(argc);
        for _ in 0..argc {
            args.push(self.pop()?);
        }
        args.reverse();
        let func = self.pop()?;
        match func {
            Value::Callable(Callable::Host(f)) => {
                let result = f(&args)?;
                self.stack.push(result);
            }
            Value::Callable(Callable::Compiled(cf)) => {
                let mut frame = Frame::new();
                for (i, name) in cf.params.iter().enumerate() {
                    frame.insert(name.clone(), args.get(i).cloned().unwrap_or(Value::None));
                }
                self.frames.push(frame);
                let result = self.execute(&cf.code);
                self.frames.pop();
                result?;
            }
            Value::Callable(Callable::User(_)) => {
                return Err(Diagnostic::runtime(
                    "the bytecode backend cannot call tree-walk closures",
                ))
            }
            other => {
                return Err(Diagnostic::runtime(format!(
                    "'{}' is not callable",
                    other.type_name()
                )))
            }
        }
        Ok(())
    }

    fn execute(&mut self, code: &[OpCode]) -> Result<(), Diagnostic> {
        let mut pc = 0usize;
        loop {
            if pc >= code.len() {
                return Ok(());
            }
            match &code[pc] {
                OpCode::Halt | OpCode::Return => return Ok(()),
                OpCode::Nop => {}
                OpCode::Push(v) => self.stack.push(v.clone()),
                OpCode::Pop => {
                    self.pop()?;
                }
                OpCode::Dup => {
                    let v = self.peek()?.clone();
                    self.stack.push(v);
                }
                OpCode::Dup2 => {
                    let len = self.stack.len();
                    if len < 2 {
                        return Err(stack_underflow());
                    }
                    let a = self.stack[len - 2].clone();
                    let b = self.stack[len - 1].clone();
                    self.stack.push(a);
                    self.stack.push(b);
                }
                OpCode::Add => self.binop(value::add)?,
                OpCode::Sub => self.binop(value::sub)?,
                OpCode::Mul => self.binop(value::mul)?,
                OpCode::Div => self.binop(value::div)?,
                OpCode::Mod => self.binop(value::modulo)?,
                OpCode::Pow => self.binop(value::pow)?,
                OpCode::BitAnd => self.binop(value::bit_and)?,
                OpCode::BitOr => self.binop(value::bit_or)?,
                OpCode::BitXor => self.binop(value::bit_xor)?,
                OpCode::Shl => self.binop(value::shl)?,
                OpCode::Shr => self.binop(value::shr)?,
                OpCode::Neg => {
                    let a = self.pop()?;
                    self.stack.push(value::negate(&a)?);
                }
                OpCode::BitNot => {
                    let a = self.pop()?;
                    self.stack.push(value::bit_not(&a)?);
                }
                OpCode::Not => {
                    let a = self.pop()?;
                    self.stack.push(Value::Bool(!a.is_truthy()));
                }
                OpCode::Eq => self.compare_op("==")?,
                OpCode::NotEq => self.compare_op("!=")?,
                OpCode::Lt => self.compare_op("<")?,
                OpCode::Gt => self.compare_op(">")?,
                OpCode::Le => self.compare_op("<=")?,
                OpCode::Ge => self.compare_op(">=")?,
                OpCode::Load(name) => {
                    let v = self.load(name)?;
                    self.stack.push(v);
                }
                OpCode::Store(name) => {
                    let v = self.pop()?;
                    self.store(name, v)?;
                }
                OpCode::Define(name, _slot) => {
                    let v = self.pop()?;
                    self.define(name, v);
                }
                OpCode::LoadConst(idx) => {
                    let v = self.constants[*idx].clone();
                    self.stack.push(v);
                }
                OpCode::Jump(target) => {
                    pc = *target;
                    continue;
                }
                OpCode::JumpIfFalse(target) => {
                    let v = self.pop()?;
                    if !v.is_truthy() {
                        pc = *target;
                        continue;
                    }
                }
                OpCode::JumpIfTrue(target) => {
                    let v = self.pop()?;
                    if v.is_truthy() {
                        pc = *target;
                        continue;
                    }
                }
                OpCode::Call(argc) => self.call(*argc)?,
                OpCode::BuildList(n) => self.build_list(*n)?,
                OpCode::BuildMap(n) => self.build_map(*n)?,
                OpCode::Index => self.index_get()?,
                OpCode::StoreIndex => self.index_set()?,
                OpCode::GetAttr(idx) => self.get_attr(*idx)?,
                OpCode::SetAttr(idx) => self.set_attr(*idx)?,
                OpCode::Len => self.len_op()?,
            }
            pc += 1;
        }
    }

    pub fn run(mut self, code: &[OpCode]) -> Result<Value, Diagnostic> {
        self.execute(code)?;
        Ok(self.stack.last().cloned().unwrap_or(Value::None))
    }
}

pub fn run(code: &[OpCode], constants: Vec<Value>) -> Result<Value, Diagnostic> {
    Vm::new(constants).run(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn run_source(src: &str) -> Value {
        let program = parse(tokenize(src).unwrap()).unwrap();
        let (code, constants) = compile(&program).unwrap();
        run(&code, constants).unwrap()
    }

    #[test]
    fn runs_arithmetic() {
        assert!(matches!(run_source("1 + 2 * 3\n"), Value::Int(7)));
    }

    #[test]
    fn runs_for_loop_sum() {
        let result = run_source(
            "let total = 0\nfor x in [1, 2, 3, 4] {\ntotal += x\n}\ntotal\n",
        );
        assert!(matches!(result, Value::Int(10)));
    }

    #[test]
    fn short_circuit_and_returns_deciding_operand() {
        assert!(matches!(run_source("false and 1\n"), Value::Bool(false)));
        assert!(matches!(run_source("true and 5\n"), Value::Int(5)));
    }

    #[test]
    fn runs_user_defined_function_call() {
        let result = run_source("fn add(a, b) {\nreturn a + b\n}\nadd(3, 4)\n");
        assert!(matches!(result, Value::Int(7)));
    }

    #[test]
    fn break_exits_loop_immediately() {
        let result = run_source(
            "let total = 0\nfor x in [1, 2, 3, 4, 5] {\nif x == 3 {\nbreak\n}\ntotal += x\n}\ntotal\n",
        );
        assert!(matches!(result, Value::Int(3)));
    }
}
