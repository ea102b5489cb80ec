//! Built-in expression functions
//!
//! Functions consume evaluated argument sequences and produce a result
//! sequence. They are total: arity or type mismatches yield an empty
//! sequence (an absent result), never an error.

use serde_json::{Number, Value};

use super::parser::FunctionName;
use crate::utils::time::millis_to_iso;

/// Apply a built-in to its evaluated arguments
pub fn apply(name: FunctionName, args: Vec<Vec<Value>>) -> Vec<Value> {
    let Ok([arg]) = <[Vec<Value>; 1]>::try_from(args) else {
        // Every built-in is unary
        return Vec::new();
    };
    let items = flatten(arg);

    match name {
        FunctionName::Min => fold_numeric(&items, true),
        FunctionName::Max => fold_numeric(&items, false),
        FunctionName::Sum => sum(&items),
        FunctionName::Count => vec![Value::from(items.len() as i64)],
        FunctionName::Distinct => distinct(items),
        FunctionName::FromMillis => from_millis(&items),
    }
}

/// A singleton array argument stands for its elements. The sequence model
/// already spreads multi-item results; this covers the case where a path
/// lands on one array value.
fn flatten(seq: Vec<Value>) -> Vec<Value> {
    match <[Value; 1]>::try_from(seq) {
        Ok([Value::Array(items)]) => items,
        Ok([other]) => vec![other],
        Err(seq) => seq,
    }
}

fn fold_numeric(items: &[Value], pick_smaller: bool) -> Vec<Value> {
    let mut best: Option<&Number> = None;
    for item in items {
        let Value::Number(n) = item else {
            return Vec::new();
        };
        best = match best {
            None => Some(n),
            Some(current) => {
                let (Some(a), Some(b)) = (n.as_f64(), current.as_f64()) else {
                    return Vec::new();
                };
                if (a < b) == pick_smaller && a != b {
                    Some(n)
                } else {
                    Some(current)
                }
            }
        };
    }
    match best {
        Some(n) => vec![Value::Number(n.clone())],
        None => Vec::new(),
    }
}

fn sum(items: &[Value]) -> Vec<Value> {
    // Integer sum while possible, falling back to float on mixed input
    let mut int_sum: Option<i64> = Some(0);
    let mut float_sum = 0.0;
    for item in items {
        let Value::Number(n) = item else {
            return Vec::new();
        };
        let Some(f) = n.as_f64() else {
            return Vec::new();
        };
        float_sum += f;
        int_sum = match (int_sum, n.as_i64()) {
            (Some(acc), Some(i)) => acc.checked_add(i),
            _ => None,
        };
    }
    match int_sum {
        Some(total) => vec![Value::from(total)],
        None => Number::from_f64(float_sum)
            .map(|n| vec![Value::Number(n)])
            .unwrap_or_default(),
    }
}

/// First-occurrence order, structural equality
fn distinct(items: Vec<Value>) -> Vec<Value> {
    let mut seen: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

fn from_millis(items: &[Value]) -> Vec<Value> {
    let [Value::Number(n)] = items else {
        return Vec::new();
    };
    let millis = match n.as_i64() {
        Some(i) => i,
        None => match n.as_f64() {
            Some(f) => f as i64,
            None => return Vec::new(),
        },
    };
    vec![Value::String(millis_to_iso(millis))]
}
