//! The runtime value model shared by both execution backends. Lists, maps
//! and struct instances are reference types: `Rc<RefCell<_>>` gives the
//! "mutate through any alias, observe through all aliases" semantics
//! without a garbage collector.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::FunctionDeclaration;
use crate::diagnostic::Diagnostic;
use crate::environment::Environment;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Str(Rc<str>),
    Int(i64),
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Str(s) => write!(f, "{s}"),
            MapKey::Int(i) => write!(f, "{i}"),
        }
    }
}

pub type HostFn = dyn Fn(&[Value]) -> Result<Value, Diagnostic>;

pub struct UserFunction {
    pub declaration: Rc<FunctionDeclaration>,
    pub closure: Rc<Environment>,
}

pub struct CompiledFunction {
    pub name: String,
    pub params: Vec<String>,
    pub code: Vec<crate::bytecode::OpCode>,
    pub num_locals: usize,
}

#[derive(Clone)]
pub enum Callable {
    Host(Rc<HostFn>),
    User(Rc<UserFunction>),
    Compiled(Rc<CompiledFunction>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDescriptor {
    pub name: String,
    pub fields: Vec<(String, String)>,
}

pub struct StructInstanceData {
    pub descriptor: Rc<StructDescriptor>,
    pub fields: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub name: String,
    pub variants: Vec<String>,
}

pub struct ContractHandle {
    pub name: String,
    pub env: Rc<Environment>,
}

/// A value produced asynchronously by a host collaborator. `await` resolves
/// it once and caches the result; everything else treats `await` as identity.
pub struct PendingResult {
    resolver: Option<Box<dyn FnOnce() -> Value>>,
    resolved: Option<Value>,
}

impl PendingResult {
    pub fn new(resolver: Box<dyn FnOnce() -> Value>) -> Self {
        Self {
            resolver: Some(resolver),
            resolved: None,
        }
    }

    pub fn resolve(&mut self) -> Value {
        if let Some(value) = &self.resolved {
            return value.clone();
        }
        let resolver = self.resolver.take().expect("pending result polled twice without a resolver");
        let value = resolver();
        self.resolved = Some(value.clone());
        value
    }
}

#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Bool(bool),
    None,
    List(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<IndexMap<MapKey, Value>>>),
    Callable(Callable),
    Struct(Rc<StructDescriptor>),
    Instance(Rc<RefCell<StructInstanceData>>),
    Enum(Rc<EnumDescriptor>),
    Contract(Rc<ContractHandle>),
    Pending(Rc<RefCell<PendingResult>>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(Rc::from(s.into()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn map(entries: IndexMap<MapKey, Value>) -> Self {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    /// Truthiness: `None`, `false`, `0`, `0.0`, `""`, `[]`, `{}` are falsy;
    /// everything else (including structs/instances/functions) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.borrow().is_empty(),
            Value::Map(m) => !m.borrow().is_empty(),
            _ => true,
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            Value::Bool(_) => "bool".into(),
            Value::Int(_) => "int".into(),
            Value::Float(_) => "float".into(),
            Value::Str(_) => "string".into(),
            Value::List(_) => "list".into(),
            Value::Map(_) => "map".into(),
            Value::None => "none".into(),
            Value::Callable(_) => "function".into(),
            Value::Struct(d) => d.name.clone(),
            Value::Instance(i) => i.borrow().descriptor.name.clone(),
            Value::Enum(d) => d.name.clone(),
            Value::Contract(c) => c.name.clone(),
            Value::Pending(_) => "pending".into(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::None => write!(f, "none"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Callable(_) => write!(f, "<function>"),
            Value::Struct(d) => write!(f, "<struct {}>", d.name),
            Value::Instance(i) => {
                let inst = i.borrow();
                write!(f, "{}{{", inst.descriptor.name)?;
                for (idx, (name, value)) in inst.fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Enum(d) => write!(f, "<enum {}>", d.name),
            Value::Contract(c) => write!(f, "<contract {}>", c.name),
            Value::Pending(_) => write!(f, "<pending>"),
        }
    }
}

/// Python `repr()`-style rendering: strings are quoted, and the quoting
/// recurses into list/map elements. Used for event-log argument rendering,
/// where `print`/`println`'s bare-string `Display` would be ambiguous
/// (`[EVENT] Transfer: [a, b, 5]` vs. the required `['a', 'b', 5]`).
pub fn repr(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("'{s}'"),
        Value::List(items) => {
            let inner = items.borrow().iter().map(repr).collect::<Vec<_>>().join(", ");
            format!("[{inner}]")
        }
        Value::Map(entries) => {
            let inner = entries
                .borrow()
                .iter()
                .map(|(k, v)| {
                    let key = match k {
                        MapKey::Str(s) => format!("'{s}'"),
                        MapKey::Int(i) => i.to_string(),
                    };
                    format!("{key}: {}", repr(v))
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{inner}}}")
        }
        other => other.to_string(),
    }
}

fn runtime_type_error(op: &str, a: &Value, b: &Value) -> Diagnostic {
    Diagnostic::runtime(format!(
        "operator '{op}' not supported between '{}' and '{}'",
        a.type_name(),
        b.type_name()
    ))
}

/// `+`: numeric addition with int/float coercion, string concatenation, or
/// a typed failure — notably including list + list, which is deliberately
/// not supported.
pub fn add(a: &Value, b: &Value) -> Result<Value, Diagnostic> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x + y)),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x + y)),
        (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 + y)),
        (Value::Float(x), Value::Int(y)) => Ok(Value::Float(x + *y as f64)),
        (Value::Str(x), Value::Str(y)) => Ok(Value::str(format!("{x}{y}"))),
        _ => Err(runtime_type_error("+", a, b)),
    }
}

macro_rules! numeric_binop {
    ($name:ident, $op:tt, $sym:expr) => {
        pub fn $name(a: &Value, b: &Value) -> Result<Value, Diagnostic> {
            match (a, b) {
                (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x $op y)),
                (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x $op y)),
                (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 $op y)),
                (Value::Float(x), Value::Int(y)) => Ok(Value::Float(x $op *y as f64)),
                _ => Err(runtime_type_error($sym, a, b)),
            }
        }
    };
}

numeric_binop!(sub, -, "-");
numeric_binop!(mul, *, "*");

/// `/` always yields a float, even for two integer operands — true division,
/// not Rust's truncating integer division.
pub fn div(a: &Value, b: &Value) -> Result<Value, Diagnostic> {
    match (a, b) {
        (Value::Int(_), Value::Int(0)) => Err(Diagnostic::runtime("division by zero")),
        (Value::Int(x), Value::Int(y)) => Ok(Value::Float(*x as f64 / *y as f64)),
        (Value::Float(_), Value::Int(0)) => Err(Diagnostic::runtime("division by zero")),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x / y)),
        (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 / y)),
        (Value::Float(x), Value::Int(y)) => Ok(Value::Float(x / *y as f64)),
        _ => Err(runtime_type_error("/", a, b)),
    }
}

/// Modulo follows the sign of the divisor, matching Python's `%` rather than
/// Rust's (which follows the sign of the dividend).
pub fn modulo(a: &Value, b: &Value) -> Result<Value, Diagnostic> {
    match (a, b) {
        (Value::Int(_), Value::Int(0)) => Err(Diagnostic::runtime("division by zero")),
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(((x % y) + y) % y)),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(((x % y) + y) % y)),
        (Value::Int(x), Value::Float(y)) => {
            let x = *x as f64;
            Ok(Value::Float(((x % y) + y) % y))
        }
        (Value::Float(x), Value::Int(y)) => {
            let y = *y as f64;
            Ok(Value::Float(((x % y) + y) % y))
        }
        _ => Err(runtime_type_error("%", a, b)),
    }
}

pub fn pow(a: &Value, b: &Value) -> Result<Value, Diagnostic> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) if *y >= 0 => Ok(Value::Int(x.pow(*y as u32))),
        (Value::Int(x), Value::Int(y)) => Ok(Value::Float((*x as f64).powi(*y as i32))),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x.powf(*y))),
        (Value::Int(x), Value::Float(y)) => Ok(Value::Float((*x as f64).powf(*y))),
        (Value::Float(x), Value::Int(y)) => Ok(Value::Float(x.powi(*y as i32))),
        _ => Err(runtime_type_error("**", a, b)),
    }
}

pub fn negate(a: &Value) -> Result<Value, Diagnostic> {
    match a {
        Value::Int(x) => Ok(Value::Int(-x)),
        Value::Float(x) => Ok(Value::Float(-x)),
        _ => Err(Diagnostic::runtime(format!(
            "operator '-' (unary) not supported for '{}'",
            a.type_name()
        ))),
    }
}

macro_rules! bitwise_binop {
    ($name:ident, $op:tt, $sym:expr) => {
        pub fn $name(a: &Value, b: &Value) -> Result<Value, Diagnostic> {
            match (a, b) {
                (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x $op y)),
                _ => Err(runtime_type_error($sym, a, b)),
            }
        }
    };
}

bitwise_binop!(bit_and, &, "&");
bitwise_binop!(bit_or, |, "|");
bitwise_binop!(bit_xor, ^, "^");

pub fn shl(a: &Value, b: &Value) -> Result<Value, Diagnostic> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x << y)),
        _ => Err(runtime_type_error("<<", a, b)),
    }
}

pub fn shr(a: &Value, b: &Value) -> Result<Value, Diagnostic> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x >> y)),
        _ => Err(runtime_type_error(">>", a, b)),
    }
}

pub fn bit_not(a: &Value) -> Result<Value, Diagnostic> {
    match a {
        Value::Int(x) => Ok(Value::Int(!x)),
        _ => Err(Diagnostic::runtime(format!(
            "operator '~' not supported for '{}'",
            a.type_name()
        ))),
    }
}

/// Structural equality. Comparisons never throw: values of differing kinds
/// simply compare unequal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::None, Value::None) => true,
        (Value::List(x), Value::List(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| values_equal(a, b))
        }
        (Value::Map(x), Value::Map(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|ov| values_equal(v, ov)))
        }
        (Value::Instance(x), Value::Instance(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

pub fn to_map_key(value: &Value) -> Result<MapKey, Diagnostic> {
    match value {
        Value::Str(s) => Ok(MapKey::Str(s.clone())),
        Value::Int(i) => Ok(MapKey::Int(*i)),
        other => Err(Diagnostic::runtime(format!(
            "map keys must be string or int, found '{}'",
            other.type_name()
        ))),
    }
}

/// Resolves a (possibly negative, Python-style) index against a length.
pub fn resolve_list_index(len: usize, i: i64) -> Option<usize> {
    if i >= 0 {
        let i = i as usize;
        (i < len).then_some(i)
    } else {
        let offset = (-i) as usize;
        (offset <= len).then(|| len - offset)
    }
}

/// Ordering comparisons (`< > <= >=`) are only defined between numbers and
/// between strings; anything else is a typed failure (unlike `==`/`!=`,
/// which never throw).
pub fn compare(op: &str, a: &Value, b: &Value) -> Result<Value, Diagnostic> {
    if op == "==" {
        return Ok(Value::Bool(values_equal(a, b)));
    }
    if op == "!=" {
        return Ok(Value::Bool(!values_equal(a, b)));
    }
    let ordering = match (a, b) {
        (Value::Int(x), Value::Int(y)) => (*x as f64).partial_cmp(&(*y as f64)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Int(x), Value::Float(y)) => (*x as f64).partial_cmp(y),
        (Value::Float(x), Value::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Value::Str(x), Value::Str(y)) => Some(x.as_ref().cmp(y.as_ref())),
        _ => return Err(runtime_type_error(op, a, b)),
    };
    let Some(ordering) = ordering else {
        return Err(runtime_type_error(op, a, b));
    };
    use std::cmp::Ordering::*;
    let result = match (op, ordering) {
        ("<", Less) | (">", Greater) | ("<=", Less) | ("<=", Equal) | (">=", Greater)
        | (">=", Equal) => true,
        _ => false,
    };
    Ok(Value::Bool(result))
}

/// Total order used by `list.sort()` — numbers and strings only, same
/// domain as `compare`.
pub fn value_cmp(a: &Value, b: &Value) -> Result<std::cmp::Ordering, Diagnostic> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => {
            x.partial_cmp(y).ok_or_else(|| runtime_type_error("sort", a, b))
        }
        (Value::Int(x), Value::Float(y)) => (*x as f64)
            .partial_cmp(y)
            .ok_or_else(|| runtime_type_error("sort", a, b)),
        (Value::Float(x), Value::Int(y)) => x
            .partial_cmp(&(*y as f64))
            .ok_or_else(|| runtime_type_error("sort", a, b)),
        (Value::Str(x), Value::Str(y)) => Ok(x.as_ref().cmp(y.as_ref())),
        _ => Err(runtime_type_error("sort", a, b)),
    }
}
