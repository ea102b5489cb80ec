//! Expression tokenizer

use super::error::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Field name or bare keyword (`true`, `false`, `null`)
    Ident(String),
    /// Function reference, lexed from `$name`
    Function(String),
    Int(i64),
    Float(f64),
    Str(String),
    Dot,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

pub struct Lexer {
    chars: Vec<char>,
    index: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.index += 1;
                continue;
            }
            match ch {
                '.' => {
                    self.index += 1;
                    tokens.push(Token::Dot);
                }
                '[' => {
                    self.index += 1;
                    tokens.push(Token::LBracket);
                }
                ']' => {
                    self.index += 1;
                    tokens.push(Token::RBracket);
                }
                '(' => {
                    self.index += 1;
                    tokens.push(Token::LParen);
                }
                ')' => {
                    self.index += 1;
                    tokens.push(Token::RParen);
                }
                ',' => {
                    self.index += 1;
                    tokens.push(Token::Comma);
                }
                '=' => {
                    self.index += 1;
                    tokens.push(Token::Eq);
                }
                '!' => {
                    self.index += 1;
                    if self.peek() == Some('=') {
                        self.index += 1;
                        tokens.push(Token::Ne);
                    } else {
                        return Err(ExprError::UnexpectedChar('!'));
                    }
                }
                '<' => {
                    self.index += 1;
                    if self.peek() == Some('=') {
                        self.index += 1;
                        tokens.push(Token::Le);
                    } else {
                        tokens.push(Token::Lt);
                    }
                }
                '>' => {
                    self.index += 1;
                    if self.peek() == Some('=') {
                        self.index += 1;
                        tokens.push(Token::Ge);
                    } else {
                        tokens.push(Token::Gt);
                    }
                }
                '$' => {
                    self.index += 1;
                    let name = self.read_ident();
                    if name.is_empty() {
                        return Err(ExprError::UnexpectedChar('$'));
                    }
                    tokens.push(Token::Function(name));
                }
                '"' | '\'' => {
                    let quote = ch;
                    self.index += 1;
                    let value = self.read_quoted(quote)?;
                    tokens.push(Token::Str(value));
                }
                '-' => {
                    self.index += 1;
                    if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        tokens.push(self.read_number(true)?);
                    } else {
                        return Err(ExprError::UnexpectedChar('-'));
                    }
                }
                c if c.is_ascii_digit() => {
                    tokens.push(self.read_number(false)?);
                }
                c if is_ident_start(c) => {
                    let ident = self.read_ident();
                    tokens.push(Token::Ident(ident));
                }
                c => return Err(ExprError::UnexpectedChar(c)),
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn read_ident(&mut self) -> String {
        let start = self.index;
        while let Some(ch) = self.peek() {
            if is_ident_continue(ch) {
                self.index += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.index].iter().collect()
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, ExprError> {
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(ExprError::UnterminatedString),
                Some('\\') => {
                    self.index += 1;
                    match self.peek() {
                        Some(c) if c == quote || c == '\\' => {
                            value.push(c);
                            self.index += 1;
                        }
                        Some(c) => {
                            // Unknown escape, keep both characters
                            value.push('\\');
                            value.push(c);
                            self.index += 1;
                        }
                        None => return Err(ExprError::UnterminatedString),
                    }
                }
                Some(c) if c == quote => {
                    self.index += 1;
                    return Ok(value);
                }
                Some(c) => {
                    value.push(c);
                    self.index += 1;
                }
            }
        }
    }

    fn read_number(&mut self, negative: bool) -> Result<Token, ExprError> {
        let start = self.index;
        let mut is_float = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.index += 1;
            } else if ch == '.' && !is_float && self.next_is_digit() {
                is_float = true;
                self.index += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.index].iter().collect();
        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| ExprError::UnexpectedToken(text.clone()))?;
            Ok(Token::Float(if negative { -value } else { value }))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| ExprError::UnexpectedToken(text.clone()))?;
            Ok(Token::Int(if negative { -value } else { value }))
        }
    }

    /// True when the character after the current one is a digit. Keeps a
    /// trailing `a.b` dot-navigation from being eaten as a decimal point.
    fn next_is_digit(&self) -> bool {
        self.chars
            .get(self.index + 1)
            .is_some_and(|c| c.is_ascii_digit())
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().unwrap()
    }

    #[test]
    fn test_tokenize_dotted_path() {
        assert_eq!(
            lex("Results.Meta.City"),
            vec![
                Token::Ident("Results".into()),
                Token::Dot,
                Token::Ident("Meta".into()),
                Token::Dot,
                Token::Ident("City".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_index() {
        assert_eq!(
            lex("Results[0]"),
            vec![
                Token::Ident("Results".into()),
                Token::LBracket,
                Token::Int(0),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_tokenize_negative_index() {
        assert_eq!(
            lex("[-1]"),
            vec![Token::LBracket, Token::Int(-1), Token::RBracket]
        );
    }

    #[test]
    fn test_tokenize_filter_predicate() {
        assert_eq!(
            lex("Technologies[IsPremium=\"yes\"]"),
            vec![
                Token::Ident("Technologies".into()),
                Token::LBracket,
                Token::Ident("IsPremium".into()),
                Token::Eq,
                Token::Str("yes".into()),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_tokenize_single_quoted_string() {
        assert_eq!(lex("'yes'"), vec![Token::Str("yes".into())]);
    }

    #[test]
    fn test_tokenize_string_with_escaped_quote() {
        assert_eq!(lex(r#""a\"b""#), vec![Token::Str("a\"b".into())]);
    }

    #[test]
    fn test_tokenize_comparison_operators() {
        assert_eq!(
            lex("a != 1 <= 2 >= 3 < 4 > 5"),
            vec![
                Token::Ident("a".into()),
                Token::Ne,
                Token::Int(1),
                Token::Le,
                Token::Int(2),
                Token::Ge,
                Token::Int(3),
                Token::Lt,
                Token::Int(4),
                Token::Gt,
                Token::Int(5),
            ]
        );
    }

    #[test]
    fn test_tokenize_function_call() {
        assert_eq!(
            lex("$min(Paths.FirstIndexed)"),
            vec![
                Token::Function("min".into()),
                Token::LParen,
                Token::Ident("Paths".into()),
                Token::Dot,
                Token::Ident("FirstIndexed".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_float() {
        assert_eq!(lex("1.5"), vec![Token::Float(1.5)]);
    }

    #[test]
    fn test_tokenize_unterminated_string() {
        let err = Lexer::new("\"abc").tokenize().unwrap_err();
        assert_eq!(err, ExprError::UnterminatedString);
    }

    #[test]
    fn test_tokenize_bare_dollar() {
        let err = Lexer::new("$ (x)").tokenize().unwrap_err();
        assert_eq!(err, ExprError::UnexpectedChar('$'));
    }

    #[test]
    fn test_tokenize_unexpected_character() {
        let err = Lexer::new("a @ b").tokenize().unwrap_err();
        assert_eq!(err, ExprError::UnexpectedChar('@'));
    }
}
