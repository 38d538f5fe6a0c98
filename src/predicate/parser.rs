//! Recursive-descent parser for the filter grammar
//!
//! Consumes the token stream produced by the lexer and builds exactly one
//! predicate term. Anything left over after the term is a parse error.

use serde_json::Value;

use crate::value::FieldPath;

use super::ast::{CompareOp, Predicate};
use super::errors::{ParseError, ParseResult};
use super::lexer::{tokenize, Keyword, Token};

/// Parses a filter string into a predicate.
pub fn parse(input: &str) -> ParseResult<Predicate> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens);
    let predicate = parser.parse_predicate()?;
    parser.expect_end()?;
    Ok(predicate)
}

struct Parser {
    tokens: std::iter::Peekable<std::vec::IntoIter<Token>>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
        }
    }

    fn next(&mut self, expected: &'static str) -> ParseResult<Token> {
        self.tokens
            .next()
            .ok_or(ParseError::UnexpectedEnd { expected })
    }

    fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek()
    }

    /// Consumes the next token if it equals `token`.
    fn next_is(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.tokens.next();
            return true;
        }
        false
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> ParseResult<()> {
        let found = self.next(expected)?;
        if found == token {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                found: found.to_string(),
                expected,
            })
        }
    }

    fn expect_end(&mut self) -> ParseResult<()> {
        match self.tokens.next() {
            None => Ok(()),
            Some(token) => Err(ParseError::TrailingInput {
                found: token.to_string(),
            }),
        }
    }

    fn parse_predicate(&mut self) -> ParseResult<Predicate> {
        let path = self.parse_path()?;

        let token = self.next("an operator")?;
        match token {
            Token::Eq => self.parse_comparison(path, CompareOp::Eq),
            Token::NotEq => self.parse_comparison(path, CompareOp::NotEq),
            Token::Gt => self.parse_comparison(path, CompareOp::Gt),
            Token::Gte => self.parse_comparison(path, CompareOp::Gte),
            Token::Lt => self.parse_comparison(path, CompareOp::Lt),
            Token::Lte => self.parse_comparison(path, CompareOp::Lte),
            Token::Keyword(Keyword::Is) => self.parse_nullcheck(path),
            Token::Keyword(Keyword::In) => self.parse_inlist(path, false),
            Token::Keyword(Keyword::Not) => {
                self.expect(Token::Keyword(Keyword::In), "IN after NOT")?;
                self.parse_inlist(path, true)
            }
            Token::Keyword(Keyword::Between) => self.parse_between(path),
            other => Err(ParseError::UnexpectedToken {
                found: other.to_string(),
                expected: "an operator",
            }),
        }
    }

    /// `path := 'value' ('.' identifier)*`
    fn parse_path(&mut self) -> ParseResult<FieldPath> {
        let root = self.next("a field path")?;
        match root {
            Token::Ident(ident) if ident == "value" => {}
            Token::Ident(ident) => return Err(ParseError::BadPathRoot { got: ident }),
            other => {
                return Err(ParseError::UnexpectedToken {
                    found: other.to_string(),
                    expected: "a field path",
                })
            }
        }

        let mut segments = Vec::new();
        while self.next_is(&Token::Dot) {
            let segment = self.next("a path segment")?;
            match segment {
                Token::Ident(ident) => segments.push(ident),
                // Keywords double as path segments after a dot.
                Token::Keyword(keyword) => segments.push(keyword.as_str().to_ascii_lowercase()),
                other => {
                    return Err(ParseError::UnexpectedToken {
                        found: other.to_string(),
                        expected: "a path segment",
                    })
                }
            }
        }
        Ok(FieldPath::new(segments))
    }

    fn parse_comparison(&mut self, path: FieldPath, op: CompareOp) -> ParseResult<Predicate> {
        let literal = self.parse_literal()?;
        Ok(Predicate::Compare { path, op, literal })
    }

    /// `IS [NOT] NULL`
    fn parse_nullcheck(&mut self, path: FieldPath) -> ParseResult<Predicate> {
        let negated = self.next_is(&Token::Keyword(Keyword::Not));
        self.expect(Token::Keyword(Keyword::Null), "NULL")?;
        Ok(Predicate::NullCheck { path, negated })
    }

    /// `'(' literal (',' literal)* ')'`
    fn parse_inlist(&mut self, path: FieldPath, negated: bool) -> ParseResult<Predicate> {
        self.expect(Token::LParen, "'(' after IN")?;
        let mut items = vec![self.parse_literal()?];
        while self.next_is(&Token::Comma) {
            items.push(self.parse_literal()?);
        }
        self.expect(Token::RParen, "')' closing the IN list")?;
        Ok(Predicate::InList {
            path,
            negated,
            items,
        })
    }

    /// `BETWEEN literal AND literal`
    fn parse_between(&mut self, path: FieldPath) -> ParseResult<Predicate> {
        let low = self.parse_literal()?;
        self.expect(Token::Keyword(Keyword::And), "AND between the bounds")?;
        let high = self.parse_literal()?;
        Ok(Predicate::Between { path, low, high })
    }

    fn parse_literal(&mut self) -> ParseResult<Value> {
        let token = self.next("a literal")?;
        match token {
            Token::Number(text) => parse_number(&text),
            Token::Str(text) => Ok(Value::String(text)),
            Token::Keyword(Keyword::True) => Ok(Value::Bool(true)),
            Token::Keyword(Keyword::False) => Ok(Value::Bool(false)),
            Token::Keyword(Keyword::Null) => Ok(Value::Null),
            other => Err(ParseError::UnexpectedToken {
                found: other.to_string(),
                expected: "a literal",
            }),
        }
    }
}

/// Numbers are typed as integers when they fit, floats otherwise.
fn parse_number(text: &str) -> ParseResult<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Ok(Value::Number(int.into()));
    }
    let float: f64 = text.parse().map_err(|_| ParseError::InvalidNumber {
        text: text.to_string(),
    })?;
    serde_json::Number::from_f64(float)
        .map(Value::Number)
        .ok_or(ParseError::InvalidNumber {
            text: text.to_string(),
        })
}
