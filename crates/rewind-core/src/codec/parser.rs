//! Recursive-descent parser building [`Value`]s from lexer tokens

use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{Error, Result};
use crate::value::{Value, ValueMap};

/// Deepest array/object nesting a document may use
pub const MAX_DEPTH: usize = 128;

/// Position inside an array literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// Just after `[`
    Start,
    /// After an element
    Value,
    /// After a separating `,`
    Comma,
}

/// Position inside an object literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectState {
    /// Just after `{`
    Start,
    /// After a key string
    Key,
    /// After the `:` following a key
    Colon,
    /// After a member value
    Value,
    /// After a separating `,`
    Comma,
}

/// Parser over a single text document
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over the given text
    pub fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            depth: 0,
        }
    }

    /// Parse exactly one value followed by end of input
    pub fn parse_document(mut self) -> Result<Value> {
        let first = self.lexer.next_token()?;
        let value = self.parse_value(first)?;
        let rest = self.lexer.next_token()?;
        if rest.kind != TokenKind::Eof {
            return Err(Error::TrailingInput {
                offset: rest.offset,
            });
        }
        Ok(value)
    }

    /// Dispatch on the token that starts a value
    fn parse_value(&mut self, token: Token) -> Result<Value> {
        match token.kind {
            TokenKind::LeftBracket => self.nested(token.offset, Self::parse_array),
            TokenKind::LeftBrace => self.nested(token.offset, Self::parse_object),
            TokenKind::String(s) => Ok(Value::String(s)),
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::Null => Ok(Value::Null),
            TokenKind::Undefined => Ok(Value::Undefined),
            other => Err(unexpected(other, token.offset)),
        }
    }

    /// Run a container parser one nesting level down
    fn nested(
        &mut self,
        open: usize,
        parse: fn(&mut Self, usize) -> Result<Value>,
    ) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::TooDeep {
                limit: MAX_DEPTH,
                offset: open,
            });
        }
        self.depth += 1;
        let value = parse(self, open);
        self.depth -= 1;
        value
    }

    fn parse_array(&mut self, open: usize) -> Result<Value> {
        let mut items = Vec::new();
        let mut state = ArrayState::Start;
        loop {
            let Token { kind, offset } = self.lexer.next_token()?;
            match (state, kind) {
                (_, TokenKind::Eof) => return Err(Error::UnclosedArray { offset: open }),
                (ArrayState::Start | ArrayState::Value, TokenKind::RightBracket) => {
                    return Ok(Value::Array(items))
                }
                (ArrayState::Value, TokenKind::Comma) => state = ArrayState::Comma,
                (ArrayState::Start | ArrayState::Comma, kind) => {
                    items.push(self.parse_value(Token { kind, offset })?);
                    state = ArrayState::Value;
                }
                (ArrayState::Value, kind) => return Err(unexpected(kind, offset)),
            }
        }
    }

    fn parse_object(&mut self, open: usize) -> Result<Value> {
        let mut map = ValueMap::new();
        let mut key = String::new();
        let mut state = ObjectState::Start;
        loop {
            let Token { kind, offset } = self.lexer.next_token()?;
            match (state, kind) {
                (_, TokenKind::Eof) => return Err(Error::UnclosedObject { offset: open }),
                (ObjectState::Start | ObjectState::Value, TokenKind::RightBrace) => {
                    return Ok(Value::Object(map))
                }
                (ObjectState::Start | ObjectState::Comma, TokenKind::String(s)) => {
                    key = s;
                    state = ObjectState::Key;
                }
                (ObjectState::Key, TokenKind::Colon) => state = ObjectState::Colon,
                (ObjectState::Colon, kind) => {
                    let value = self.parse_value(Token { kind, offset })?;
                    // duplicate keys: the last occurrence wins
                    map.insert(std::mem::take(&mut key), value);
                    state = ObjectState::Value;
                }
                (ObjectState::Value, TokenKind::Comma) => state = ObjectState::Comma,
                (_, kind) => return Err(unexpected(kind, offset)),
            }
        }
    }
}

fn unexpected(kind: TokenKind, offset: usize) -> Error {
    Error::UnexpectedToken {
        found: kind.to_string(),
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<Value> {
        Parser::new(src).parse_document()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("undefined").unwrap(), Value::Undefined);
        assert_eq!(parse(" true ").unwrap(), Value::Bool(true));
        assert_eq!(parse("-2.5").unwrap(), Value::Number(-2.5));
        assert_eq!(parse(r#""hi""#).unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_nested_structures() {
        let v = parse(r#"{"a":[1,{"b":[]}],"c":{}}"#).unwrap();
        let a = v.get("a").and_then(Value::as_array).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0], Value::Number(1.0));
        assert_eq!(a[1].get("b"), Some(&Value::Array(vec![])));
        assert_eq!(v.get("c"), Some(&Value::Object(ValueMap::new())));
    }

    #[test]
    fn test_object_preserves_insertion_order() {
        let v = parse(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let v = parse(r#"{"k":1,"k":2}"#).unwrap();
        assert_eq!(v.as_object().unwrap().len(), 1);
        assert_eq!(v.get("k"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_missing_closers() {
        assert_eq!(parse("[1,2"), Err(Error::UnclosedArray { offset: 0 }));
        assert_eq!(parse("[[1]"), Err(Error::UnclosedArray { offset: 0 }));
        assert_eq!(parse(r#" {"a":1"#), Err(Error::UnclosedObject { offset: 1 }));
        assert_eq!(parse(r#"{"a":"#), Err(Error::UnclosedObject { offset: 0 }));
    }

    #[test]
    fn test_comma_placement() {
        assert!(matches!(parse("[1,]"), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse("[,1]"), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse("[1 2]"), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse(r#"{"a":1,}"#), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse(r#"{"a":1 "b":2}"#), Err(Error::UnexpectedToken { .. })));
    }

    #[test]
    fn test_colon_placement() {
        assert!(matches!(parse(r#"{"a" 1}"#), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse(r#"{1:2}"#), Err(Error::UnexpectedToken { .. })));
        assert!(matches!(parse(r#"{"a"::1}"#), Err(Error::UnexpectedToken { .. })));
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let over = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert_eq!(
            parse(&over),
            Err(Error::TooDeep {
                limit: MAX_DEPTH,
                offset: MAX_DEPTH,
            })
        );

        let objects = r#"{"a":"#.repeat(200_000);
        assert!(matches!(parse(&objects), Err(Error::TooDeep { .. })));
    }

    #[test]
    fn test_stray_closer_and_trailing_input() {
        assert!(matches!(parse("]"), Err(Error::UnexpectedToken { .. })));
        assert_eq!(parse("1 2"), Err(Error::TrailingInput { offset: 2 }));
        assert!(matches!(parse(""), Err(Error::UnexpectedToken { .. })));
    }
}
