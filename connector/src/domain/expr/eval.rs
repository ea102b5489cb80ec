//! Expression evaluation
//!
//! Navigation works over a sequence of values. Fetching a field whose value
//! is an array spreads the elements into the sequence, which is what makes
//! `Paths.Technologies.Name` collect names across every path. At the result
//! boundary the sequence collapses: empty becomes absent, a singleton
//! becomes the value itself, anything longer becomes a JSON array.

use std::cmp::Ordering;

use serde_json::Value;

use super::functions;
use super::parser::{Ast, CompareOp, Postfix, Step};

/// Evaluate a parsed expression against a document
pub fn evaluate(ast: &Ast, document: &Value) -> Option<Value> {
    collapse(eval_sequence(ast, document))
}

fn collapse(mut seq: Vec<Value>) -> Option<Value> {
    match seq.len() {
        0 => None,
        1 => Some(seq.remove(0)),
        _ => Some(Value::Array(seq)),
    }
}

fn eval_sequence(ast: &Ast, document: &Value) -> Vec<Value> {
    match ast {
        Ast::Literal(value) => vec![value.clone()],
        Ast::Path(steps) => eval_path(steps, document),
        Ast::Call { name, args } => {
            let arg_seqs = args
                .iter()
                .map(|arg| eval_sequence(arg, document))
                .collect();
            functions::apply(*name, arg_seqs)
        }
    }
}

fn eval_path(steps: &[Step], document: &Value) -> Vec<Value> {
    let mut context: Vec<&Value> = vec![document];
    for step in steps {
        context = apply_field(&context, &step.field);
        for postfix in &step.postfix {
            context = apply_postfix(context, postfix);
        }
        if context.is_empty() {
            break;
        }
    }
    context.into_iter().cloned().collect()
}

/// Fetch `field` from every item in the sequence. Objects are looked up
/// directly; arrays are mapped over one level, so navigation keeps working
/// after a spread produced nested arrays.
fn apply_field<'a>(context: &[&'a Value], field: &str) -> Vec<&'a Value> {
    let mut out = Vec::new();
    for item in context {
        match item {
            Value::Object(map) => push_spread(&mut out, map.get(field)),
            Value::Array(items) => {
                for element in items {
                    if let Value::Object(map) = element {
                        push_spread(&mut out, map.get(field));
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Array values spread into the sequence; everything else is pushed as-is
fn push_spread<'a>(out: &mut Vec<&'a Value>, value: Option<&'a Value>) {
    match value {
        Some(Value::Array(items)) => out.extend(items.iter()),
        Some(value) => out.push(value),
        None => {}
    }
}

fn apply_postfix<'a>(context: Vec<&'a Value>, postfix: &Postfix) -> Vec<&'a Value> {
    match postfix {
        Postfix::Index(index) => {
            let len = context.len() as i64;
            let idx = if *index < 0 { len + index } else { *index };
            if (0..len).contains(&idx) {
                vec![context[idx as usize]]
            } else {
                Vec::new()
            }
        }
        Postfix::Filter { field, op, literal } => context
            .into_iter()
            .filter(|item| filter_matches(item, field, *op, literal))
            .collect(),
    }
}

/// An item passes a filter when its `field` compares true against the
/// literal. Items without the field never pass, whatever the operator.
/// An array-valued field passes when any element compares true.
fn filter_matches(item: &Value, field: &str, op: CompareOp, literal: &Value) -> bool {
    let Value::Object(map) = item else {
        return false;
    };
    let Some(value) = map.get(field) else {
        return false;
    };
    match value {
        Value::Array(items) => items.iter().any(|v| compare(v, op, literal)),
        value => compare(value, op, literal),
    }
}

fn compare(lhs: &Value, op: CompareOp, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => {
            match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a
                    .partial_cmp(&b)
                    .is_some_and(|ord| ord_matches(op, ord)),
                _ => false,
            }
        }
        (Value::String(a), Value::String(b)) => ord_matches(op, a.as_str().cmp(b.as_str())),
        (Value::Bool(a), Value::Bool(b)) => match op {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            _ => false,
        },
        (Value::Null, Value::Null) => matches!(op, CompareOp::Eq),
        // Mixed types are never equal and never ordered
        _ => matches!(op, CompareOp::Ne),
    }
}

fn ord_matches(op: CompareOp, ord: Ordering) -> bool {
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::Ne => ord != Ordering::Equal,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::Le => ord != Ordering::Greater,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Ge => ord != Ordering::Less,
    }
}
