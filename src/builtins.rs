//! The builtin registry: host functions bound at global scope. One table
//! is shared by both backends so `print`, `len`, `type`, and friends behave
//! identically whether a program runs through the evaluator or the VM.
use std::rc::Rc;

use indexmap::IndexMap;

use crate::diagnostic::Diagnostic;
use crate::value::{Callable, HostFn, MapKey, Value};

fn arity_error(name: &str, expected: &str, got: usize) -> Diagnostic {
    Diagnostic::runtime(format!(
        "'{name}' expects {expected} argument(s), got {got}"
    ))
}

fn builtin_print(args: &[Value]) -> Result<Value, Diagnostic> {
    let rendered = args
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    print!("{rendered}");
    Ok(Value::None)
}

fn builtin_println(args: &[Value]) -> Result<Value, Diagnostic> {
    let rendered = args
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!("{rendered}");
    Ok(Value::None)
}

fn builtin_len(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [Value::Str(s)] => Ok(Value::Int(s.chars().count() as i64)),
        [Value::List(l)] => Ok(Value::Int(l.borrow().len() as i64)),
        [Value::Map(m)] => Ok(Value::Int(m.borrow().len() as i64)),
        [other] => Err(Diagnostic::runtime(format!(
            "'len' not supported for '{}'",
            other.type_name()
        ))),
        _ => Err(arity_error("len", "1", args.len())),
    }
}

fn builtin_range(args: &[Value]) -> Result<Value, Diagnostic> {
    let (start, end, step) = match args {
        [Value::Int(end)] => (0, *end, 1),
        [Value::Int(start), Value::Int(end)] => (*start, *end, 1),
        [Value::Int(start), Value::Int(end), Value::Int(step)] => (*start, *end, *step),
        _ => return Err(Diagnostic::runtime("'range' expects 1 to 3 int arguments")),
    };
    if step == 0 {
        return Err(Diagnostic::runtime("'range' step must not be zero"));
    }
    let mut items = Vec::new();
    let mut i = start;
    if step > 0 {
        while i < end {
            items.push(Value::Int(i));
            i += step;
        }
    } else {
        while i > end {
            items.push(Value::Int(i));
            i += step;
        }
    }
    Ok(Value::list(items))
}

fn builtin_str(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [v] => Ok(Value::str(v.to_string())),
        _ => Err(arity_error("str", "1", args.len())),
    }
}

fn builtin_int(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [Value::Int(i)] => Ok(Value::Int(*i)),
        [Value::Float(f)] => Ok(Value::Int(*f as i64)),
        [Value::Bool(b)] => Ok(Value::Int(if *b { 1 } else { 0 })),
        [Value::Str(s)] => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| Diagnostic::runtime(format!("cannot convert '{s}' to int"))),
        _ => Err(arity_error("int", "1", args.len())),
    }
}

fn builtin_float(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [Value::Int(i)] => Ok(Value::Float(*i as f64)),
        [Value::Float(f)] => Ok(Value::Float(*f)),
        [Value::Str(s)] => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| Diagnostic::runtime(format!("cannot convert '{s}' to float"))),
        _ => Err(arity_error("float", "1", args.len())),
    }
}

fn builtin_type(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [v] => Ok(Value::str(v.type_name())),
        _ => Err(arity_error("type", "1", args.len())),
    }
}

fn builtin_input(args: &[Value]) -> Result<Value, Diagnostic> {
    if let [Value::Str(prompt)] = args {
        print!("{prompt}");
        use std::io::Write;
        let _ = std::io::stdout().flush();
    }
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| Diagnostic::runtime(format!("failed to read input: {e}")))?;
    Ok(Value::str(line.trim_end_matches('\n').to_string()))
}

fn builtin_append(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [Value::List(list), value] => {
            list.borrow_mut().push(value.clone());
            Ok(Value::None)
        }
        _ => Err(Diagnostic::runtime("'append' expects (list, value)")),
    }
}

fn builtin_pop(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [Value::List(list)] => list
            .borrow_mut()
            .pop()
            .ok_or_else(|| Diagnostic::runtime("'pop' called on an empty list")),
        _ => Err(Diagnostic::runtime("'pop' expects (list)")),
    }
}

fn builtin_keys(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [Value::Map(map)] => Ok(Value::list(
            map.borrow()
                .keys()
                .map(|k| match k {
                    MapKey::Str(s) => Value::Str(s.clone()),
                    MapKey::Int(i) => Value::Int(*i),
                })
                .collect(),
        )),
        _ => Err(Diagnostic::runtime("'keys' expects (map)")),
    }
}

fn builtin_values(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [Value::Map(map)] => Ok(Value::list(map.borrow().values().cloned().collect())),
        _ => Err(Diagnostic::runtime("'values' expects (map)")),
    }
}

fn builtin_abs(args: &[Value]) -> Result<Value, Diagnostic> {
    match args {
        [Value::Int(i)] => Ok(Value::Int(i.abs())),
        [Value::Float(f)] => Ok(Value::Float(f.abs())),
        _ => Err(Diagnostic::runtime("'abs' expects a number")),
    }
}

fn numeric_fold(
    name: &str,
    args: &[Value],
    pick: impl Fn(f64, f64) -> bool,
) -> Result<Value, Diagnostic> {
    if args.is_empty() {
        return Err(arity_error(name, "at least 1", 0));
    }
    let mut best = args[0].clone();
    for candidate in &args[1..] {
        let (bf, cf) = match (&best, candidate) {
            (Value::Int(a), Value::Int(b)) => (*a as f64, *b as f64),
            (Value::Float(a), Value::Float(b)) => (*a, *b),
            (Value::Int(a), Value::Float(b)) => (*a as f64, *b),
            (Value::Float(a), Value::Int(b)) => (*a, *b as f64),
            _ => {
                return Err(Diagnostic::runtime(format!(
                    "'{name}' expects numeric arguments"
                )))
            }
        };
        if pick(cf, bf) {
            best = candidate.clone();
        }
    }
    Ok(best)
}

fn builtin_min(args: &[Value]) -> Result<Value, Diagnostic> {
    numeric_fold("min", args, |candidate, best| candidate < best)
}

fn builtin_max(args: &[Value]) -> Result<Value, Diagnostic> {
    numeric_fold("max", args, |candidate, best| candidate > best)
}

fn builtin_sum(args: &[Value]) -> Result<Value, Diagnostic> {
    let items: Vec<Value> = match args {
        [Value::List(list)] => list.borrow().clone(),
        other => other.to_vec(),
    };
    let mut total_is_float = false;
    let mut int_total: i64 = 0;
    let mut float_total: f64 = 0.0;
    for item in &items {
        match item {
            Value::Int(i) => {
                int_total += i;
                float_total += *i as f64;
            }
            Value::Float(f) => {
                total_is_float = true;
                float_total += f;
            }
            other => {
                return Err(Diagnostic::runtime(format!(
                    "'sum' expects numeric elements, found '{}'",
                    other.type_name()
                )))
            }
        }
    }
    Ok(if total_is_float {
        Value::Float(float_total)
    } else {
        Value::Int(int_total)
    })
}

/// The canonical `(name, implementation)` pairs. Both the tree-walking
/// evaluator and the VM install these into their respective global scopes.
pub fn entries() -> Vec<(&'static str, Rc<HostFn>)> {
    macro_rules! entry {
        ($name:expr, $func:expr) => {
            ($name, Rc::new($func) as Rc<HostFn>)
        };
    }
    vec![
        entry!("print", builtin_print),
        entry!("println", builtin_println),
        entry!("len", builtin_len),
        entry!("range", builtin_range),
        entry!("str", builtin_str),
        entry!("int", builtin_int),
        entry!("float", builtin_float),
        entry!("type", builtin_type),
        entry!("input", builtin_input),
        entry!("append", builtin_append),
        entry!("pop", builtin_pop),
        entry!("keys", builtin_keys),
        entry!("values", builtin_values),
        entry!("abs", builtin_abs),
        entry!("min", builtin_min),
        entry!("max", builtin_max),
        entry!("sum", builtin_sum),
    ]
}

pub fn install(env: &crate::environment::Environment) {
    for (name, func) in entries() {
        env.define(name, Value::Callable(Callable::Host(func)), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_supports_string_list_map() {
        assert!(matches!(
            builtin_len(&[Value::str("abc")]),
            Ok(Value::Int(3))
        ));
        assert!(matches!(
            builtin_len(&[Value::list(vec![Value::Int(1), Value::Int(2)])]),
            Ok(Value::Int(2))
        ));
    }

    #[test]
    fn range_generates_half_open_sequence() {
        let Ok(Value::List(items)) = builtin_range(&[Value::Int(3)]) else {
            panic!("expected list");
        };
        let items = items.borrow();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[2], Value::Int(2)));
    }

    #[test]
    fn type_name_matches_each_kind() {
        assert!(matches!(builtin_type(&[Value::Bool(true)]), Ok(Value::Str(s)) if &*s == "bool"));
        assert!(matches!(builtin_type(&[Value::None]), Ok(Value::Str(s)) if &*s == "none"));
    }

    #[test]
    fn sum_accepts_list_or_varargs() {
        assert!(matches!(
            builtin_sum(&[Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])]),
            Ok(Value::Int(6))
        ));
    }
}
