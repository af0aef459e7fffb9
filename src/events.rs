//! Event log for `emit` statements. Passed down from the entry point as an
//! `Rc<EventLog>` rather than kept as a process-global, so a REPL session
//! and a one-shot file run each get their own independent log.
use std::cell::RefCell;

use indexmap::IndexMap;

use crate::value::{self, Value};

pub struct EventLog {
    log: RefCell<IndexMap<String, Vec<Vec<Value>>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            log: RefCell::new(IndexMap::new()),
        }
    }

    /// Records the emission and prints `[EVENT] name: [arg1, arg2, ...]`,
    /// quoting string arguments the way Python's `repr()` would.
    pub fn emit(&self, name: &str, args: &[Value]) {
        let rendered = args.iter().map(value::repr).collect::<Vec<_>>().join(", ");
        println!("[EVENT] {name}: [{rendered}]");
        self.log
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(args.to_vec());
    }

    pub fn history(&self, name: &str) -> Vec<Vec<Value>> {
        self.log.borrow().get(name).cloned().unwrap_or_default()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
