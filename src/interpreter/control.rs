use crate::value::Value;

/// Non-local control flow is modeled as a tagged result rather than a
/// native panic/exception: every statement returns one of these, and
/// `while`/`for`/function-call sites interpret the tag instead of
/// unwinding the Rust call stack.
pub enum Signal {
    Value(Value),
    Return(Value),
    Break,
    Continue,
}
