//! Expression parser
//!
//! Recursive descent over the token stream. The grammar:
//!
//! ```text
//! expression := function | path | literal
//! function   := '$' name '(' [expression (',' expression)*] ')'
//! path       := step ('.' step)*
//! step       := ident postfix*
//! postfix    := '[' integer ']'                     (index into sequence)
//!             | '[' ident op pliteral ']'           (filter predicate)
//! op         := '=' | '!=' | '<' | '<=' | '>' | '>='
//! literal    := string | number
//! pliteral   := literal | 'true' | 'false' | 'null'
//! ```
//!
//! Keyword literals exist only in predicate position; a bare `true` at the
//! top level is a field name like any other.

use serde_json::Value;

use super::error::ExprError;
use super::lexer::{Lexer, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Postfix {
    /// Index into the current sequence; negative counts from the end
    Index(i64),
    /// Keep sequence items whose `field` compares true against `literal`
    Filter {
        field: String,
        op: CompareOp,
        literal: Value,
    },
}

/// One navigation step: a field name plus any number of postfixes
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub field: String,
    pub postfix: Vec<Postfix>,
}

/// Built-in functions; anything else is rejected at parse time, which is
/// what keeps the language sandboxed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    Min,
    Max,
    Sum,
    Count,
    Distinct,
    FromMillis,
}

impl FunctionName {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "sum" => Some(Self::Sum),
            "count" => Some(Self::Count),
            "distinct" => Some(Self::Distinct),
            "fromMillis" => Some(Self::FromMillis),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// Navigation from the document root
    Path(Vec<Step>),
    Call {
        name: FunctionName,
        args: Vec<Ast>,
    },
    Literal(Value),
}

/// Parse an expression string into an AST
pub fn parse(input: &str) -> Result<Ast, ExprError> {
    let tokens = Lexer::new(input).tokenize()?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }
    let mut parser = Parser::new(tokens);
    let ast = parser.parse_expression()?;
    if !parser.at_end() {
        return Err(ExprError::TrailingInput);
    }
    Ok(ast)
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExprError> {
        match self.advance() {
            Some(ref token) if token == expected => Ok(()),
            Some(token) => Err(ExprError::UnexpectedToken(format!("{:?}", token))),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn parse_expression(&mut self) -> Result<Ast, ExprError> {
        match self.peek() {
            Some(Token::Function(_)) => self.parse_call(),
            Some(Token::Ident(_)) => self.parse_path(),
            Some(Token::Str(_) | Token::Int(_) | Token::Float(_)) => {
                let token = self.advance().ok_or(ExprError::UnexpectedEnd)?;
                Ok(Ast::Literal(literal_value(token)))
            }
            Some(token) => Err(ExprError::UnexpectedToken(format!("{:?}", token))),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn parse_call(&mut self) -> Result<Ast, ExprError> {
        let name = match self.advance() {
            Some(Token::Function(name)) => FunctionName::parse(&name)
                .ok_or_else(|| ExprError::UnknownFunction(name.clone()))?,
            Some(token) => return Err(ExprError::UnexpectedToken(format!("{:?}", token))),
            None => return Err(ExprError::UnexpectedEnd),
        };
        self.expect(&Token::LParen)?;

        let mut args = Vec::new();
        if self.peek() != Some(&Token::RParen) {
            loop {
                args.push(self.parse_expression()?);
                match self.peek() {
                    Some(Token::Comma) => {
                        self.advance();
                    }
                    _ => break,
                }
            }
        }
        self.expect(&Token::RParen)?;

        Ok(Ast::Call { name, args })
    }

    fn parse_path(&mut self) -> Result<Ast, ExprError> {
        let mut steps = vec![self.parse_step()?];
        while self.peek() == Some(&Token::Dot) {
            self.advance();
            steps.push(self.parse_step()?);
        }
        Ok(Ast::Path(steps))
    }

    fn parse_step(&mut self) -> Result<Step, ExprError> {
        let field = match self.advance() {
            Some(Token::Ident(name)) => name,
            Some(token) => return Err(ExprError::UnexpectedToken(format!("{:?}", token))),
            None => return Err(ExprError::UnexpectedEnd),
        };

        let mut postfix = Vec::new();
        while self.peek() == Some(&Token::LBracket) {
            self.advance();
            postfix.push(self.parse_postfix()?);
            self.expect(&Token::RBracket)?;
        }

        Ok(Step { field, postfix })
    }

    fn parse_postfix(&mut self) -> Result<Postfix, ExprError> {
        match self.advance() {
            Some(Token::Int(index)) => Ok(Postfix::Index(index)),
            Some(Token::Ident(field)) => {
                let op = match self.advance() {
                    Some(Token::Eq) => CompareOp::Eq,
                    Some(Token::Ne) => CompareOp::Ne,
                    Some(Token::Lt) => CompareOp::Lt,
                    Some(Token::Le) => CompareOp::Le,
                    Some(Token::Gt) => CompareOp::Gt,
                    Some(Token::Ge) => CompareOp::Ge,
                    Some(token) => {
                        return Err(ExprError::UnexpectedToken(format!("{:?}", token)));
                    }
                    None => return Err(ExprError::UnexpectedEnd),
                };
                let literal = match self.advance() {
                    Some(token @ (Token::Str(_) | Token::Int(_) | Token::Float(_))) => {
                        literal_value(token)
                    }
                    Some(Token::Ident(word)) => keyword_literal(&word)
                        .ok_or(ExprError::UnexpectedToken(word))?,
                    Some(token) => {
                        return Err(ExprError::UnexpectedToken(format!("{:?}", token)));
                    }
                    None => return Err(ExprError::UnexpectedEnd),
                };
                Ok(Postfix::Filter { field, op, literal })
            }
            Some(token) => Err(ExprError::UnexpectedToken(format!("{:?}", token))),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

fn literal_value(token: Token) -> Value {
    match token {
        Token::Str(s) => Value::String(s),
        Token::Int(n) => Value::from(n),
        Token::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn keyword_literal(word: &str) -> Option<Value> {
    match word {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" => Some(Value::Null),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple_path() {
        let ast = parse("Meta.City").unwrap();
        assert_eq!(
            ast,
            Ast::Path(vec![
                Step {
                    field: "Meta".into(),
                    postfix: vec![],
                },
                Step {
                    field: "City".into(),
                    postfix: vec![],
                },
            ])
        );
    }

    #[test]
    fn test_parse_indexed_path() {
        let ast = parse("Results[0].Meta.City").unwrap();
        let Ast::Path(steps) = ast else {
            panic!("expected path");
        };
        assert_eq!(steps[0].field, "Results");
        assert_eq!(steps[0].postfix, vec![Postfix::Index(0)]);
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_parse_filter_predicate() {
        let ast = parse("Technologies[IsPremium=\"yes\"].Name").unwrap();
        let Ast::Path(steps) = ast else {
            panic!("expected path");
        };
        assert_eq!(
            steps[0].postfix,
            vec![Postfix::Filter {
                field: "IsPremium".into(),
                op: CompareOp::Eq,
                literal: json!("yes"),
            }]
        );
    }

    #[test]
    fn test_parse_filter_with_keyword_literal() {
        let ast = parse("Paths[Live=true].Url").unwrap();
        let Ast::Path(steps) = ast else {
            panic!("expected path");
        };
        assert_eq!(
            steps[0].postfix,
            vec![Postfix::Filter {
                field: "Live".into(),
                op: CompareOp::Eq,
                literal: json!(true),
            }]
        );
    }

    #[test]
    fn test_parse_nested_function_call() {
        let ast = parse("$fromMillis($min(Results[0].Result.Paths.FirstIndexed))").unwrap();
        let Ast::Call { name, args } = ast else {
            panic!("expected call");
        };
        assert_eq!(name, FunctionName::FromMillis);
        assert_eq!(args.len(), 1);
        assert!(matches!(
            args[0],
            Ast::Call {
                name: FunctionName::Min,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_function_with_literal_argument() {
        let ast = parse("$fromMillis(1609361466000)").unwrap();
        assert_eq!(
            ast,
            Ast::Call {
                name: FunctionName::FromMillis,
                args: vec![Ast::Literal(json!(1609361466000_i64))],
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_function() {
        assert_eq!(
            parse("$eval(x)").unwrap_err(),
            ExprError::UnknownFunction("eval".into())
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(parse("").unwrap_err(), ExprError::Empty);
        assert_eq!(parse("   ").unwrap_err(), ExprError::Empty);
    }

    #[test]
    fn test_parse_rejects_trailing_input() {
        assert_eq!(parse("Meta.City City").unwrap_err(), ExprError::TrailingInput);
    }

    #[test]
    fn test_parse_rejects_dangling_dot() {
        assert_eq!(parse("Meta.").unwrap_err(), ExprError::UnexpectedEnd);
    }

    #[test]
    fn test_parse_rejects_bad_predicate() {
        assert!(parse("Technologies[=1]").is_err());
        assert!(parse("Technologies[Name=]").is_err());
        assert!(parse("Technologies[Name").is_err());
    }

    #[test]
    fn test_parse_multiple_postfixes() {
        let ast = parse("Paths[Live=true][0]").unwrap();
        let Ast::Path(steps) = ast else {
            panic!("expected path");
        };
        assert_eq!(steps[0].postfix.len(), 2);
        assert_eq!(steps[0].postfix[1], Postfix::Index(0));
    }
}
