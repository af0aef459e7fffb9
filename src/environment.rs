//! Lexical scope chain shared by function calls, blocks and the REPL's
//! top-level session. `define` always writes the current scope; `assign`
//! and `get` walk the parent chain.
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::diagnostic::Diagnostic;
use crate::value::Value;

pub struct Environment {
    variables: RefCell<IndexMap<String, Value>>,
    constants: RefCell<HashSet<String>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new(parent: Option<Rc<Environment>>) -> Rc<Self> {
        Rc::new(Self {
            variables: RefCell::new(IndexMap::new()),
            constants: RefCell::new(HashSet::new()),
            parent,
        })
    }

    pub fn define(&self, name: &str, value: Value, is_const: bool) {
        self.variables.borrow_mut().insert(name.to_string(), value);
        if is_const {
            self.constants.borrow_mut().insert(name.to_string());
        } else {
            self.constants.borrow_mut().remove(name);
        }
    }

    pub fn assign(&self, name: &str, value: Value) -> Result<(), Diagnostic> {
        if self.variables.borrow().contains_key(name) {
            if self.constants.borrow().contains(name) {
                return Err(Diagnostic::runtime(format!(
                    "cannot assign to const '{name}'"
                )));
            }
            self.variables.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(Diagnostic::runtime(format!("undefined variable '{name}'"))),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, Diagnostic> {
        if let Some(value) = self.variables.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.get(name),
            None => Err(Diagnostic::runtime(format!("undefined variable '{name}'"))),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        if self.variables.borrow().contains_key(name) {
            return true;
        }
        self.parent.as_ref().is_some_and(|p| p.exists(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get_in_same_scope() {
        let env = Environment::new(None);
        env.define("x", Value::Int(1), false);
        assert!(matches!(env.get("x"), Ok(Value::Int(1))));
    }

    #[test]
    fn child_sees_parent_bindings() {
        let parent = Environment::new(None);
        parent.define("x", Value::Int(1), false);
        let child = Environment::new(Some(parent));
        assert!(matches!(child.get("x"), Ok(Value::Int(1))));
    }

    #[test]
    fn assign_walks_up_to_parent() {
        let parent = Environment::new(None);
        parent.define("x", Value::Int(1), false);
        let child = Environment::new(Some(parent.clone()));
        child.assign("x", Value::Int(2)).unwrap();
        assert!(matches!(parent.get("x"), Ok(Value::Int(2))));
    }

    #[test]
    fn assign_to_const_fails() {
        let env = Environment::new(None);
        env.define("x", Value::Int(1), true);
        assert!(env.assign("x", Value::Int(2)).is_err());
    }

    #[test]
    fn assign_to_undefined_fails() {
        let env = Environment::new(None);
        assert!(env.assign("missing", Value::Int(2)).is_err());
    }

    #[test]
    fn define_always_writes_current_scope() {
        let parent = Environment::new(None);
        parent.define("x", Value::Int(1), false);
        let child = Environment::new(Some(parent.clone()));
        child.define("x", Value::Int(99), false);
        assert!(matches!(child.get("x"), Ok(Value::Int(99))));
        assert!(matches!(parent.get("x"), Ok(Value::Int(1))));
    }
}
