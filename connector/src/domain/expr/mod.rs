//! Mapping expression language
//!
//! Mapping rules select values out of provider documents with a small
//! path language:
//!
//! - `Results[0].Meta.City` walks fields and indexes into arrays
//! - `Paths.Technologies.Name` projects across arrays, collecting every
//!   `Name` under every technology of every path
//! - `Technologies[IsPremium="yes"].Name` filters array items by comparing
//!   a field against a literal (`=`, `!=`, `<`, `<=`, `>`, `>=`)
//! - `$min(...)`, `$max(...)`, `$sum(...)`, `$count(...)`, `$distinct(...)`
//!   aggregate sequences, and `$fromMillis(...)` renders an epoch-millisecond
//!   timestamp as an ISO 8601 string; calls nest
//!
//! Parsing can fail, evaluation cannot: expressions are compiled once per
//! rule and evaluating one against any document yields `Some(value)` or
//! `None`, never an error. A missing field, an index past the end of an
//! array or a filter that matches nothing all evaluate to `None`. There is
//! no access to anything beyond the document passed in.

mod error;
mod eval;
mod functions;
mod lexer;
mod parser;

pub use error::ExprError;

use serde_json::Value;

/// A compiled mapping expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    ast: parser::Ast,
}

impl Expression {
    /// Compile an expression, rejecting anything outside the language
    pub fn parse(input: &str) -> Result<Self, ExprError> {
        Ok(Self {
            ast: parser::parse(input)?,
        })
    }

    /// Evaluate against a document. `None` means the expression selected
    /// nothing, which callers treat as an absent value.
    pub fn evaluate(&self, document: &Value) -> Option<Value> {
        eval::evaluate(&self.ast, document)
    }
}
