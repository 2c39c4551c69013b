//! A strict parser for flat dictionary literals such as
//! `{'plddt_binder': 85.1, 'pae_interaction': 5.2}`.
//!
//! Only quoted string keys and scalar values (numbers, quoted strings,
//! `True`, `False`, `None`) are accepted. Anything else, including nested
//! containers and call expressions, is rejected. Nothing is ever evaluated.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    Bool(bool),
    None,
}

impl LiteralValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LiteralValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LiteralError {
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Unexpected character '{found}' at position {position}")]
    Unexpected { found: char, position: usize },
    #[error("Invalid numeric literal '{0}'")]
    InvalidNumber(String),
    #[error("Duplicate key '{0}'")]
    DuplicateKey(String),
    #[error("Trailing input after closing brace at position {0}")]
    TrailingInput(usize),
}

/// Parsed entries of a dictionary literal, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictLiteral {
    entries: Vec<(String, LiteralValue)>,
}

impl DictLiteral {
    pub fn get(&self, key: &str) -> Option<&LiteralValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(LiteralValue::as_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns true if `line` has the outer shape of a dictionary literal.
pub fn looks_like_dict(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('{') && trimmed.ends_with('}')
}

pub fn parse_dict(input: &str) -> Result<DictLiteral, LiteralError> {
    let mut cursor = Cursor::new(input);
    cursor.skip_ws();
    cursor.expect('{')?;

    let mut dict = DictLiteral::default();
    cursor.skip_ws();
    if cursor.peek() == Some('}') {
        cursor.bump();
    } else {
        loop {
            cursor.skip_ws();
            let key = cursor.string()?;
            cursor.skip_ws();
            cursor.expect(':')?;
            cursor.skip_ws();
            let value = cursor.value()?;
            if dict.get(&key).is_some() {
                return Err(LiteralError::DuplicateKey(key));
            }
            dict.entries.push((key, value));

            cursor.skip_ws();
            match cursor.next_char()? {
                ',' => {
                    cursor.skip_ws();
                    if cursor.peek() == Some('}') {
                        cursor.bump();
                        break;
                    }
                }
                '}' => break,
                other => {
                    return Err(LiteralError::Unexpected {
                        found: other,
                        position: cursor.pos - other.len_utf8(),
                    });
                }
            }
        }
    }

    cursor.skip_ws();
    if cursor.pos < input.len() {
        return Err(LiteralError::TrailingInput(cursor.pos));
    }
    Ok(dict)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn next_char(&mut self) -> Result<char, LiteralError> {
        let c = self.peek().ok_or(LiteralError::UnexpectedEnd)?;
        self.bump();
        Ok(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), LiteralError> {
        let position = self.pos;
        match self.next_char()? {
            c if c == wanted => Ok(()),
            found => Err(LiteralError::Unexpected { found, position }),
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let position = self.pos;
        let quote = self.next_char()?;
        if quote != '\'' && quote != '"' {
            return Err(LiteralError::Unexpected {
                found: quote,
                position,
            });
        }
        let start = self.pos;
        loop {
            let position = self.pos;
            match self.next_char()? {
                '\\' => {
                    return Err(LiteralError::Unexpected {
                        found: '\\',
                        position,
                    });
                }
                c if c == quote => return Ok(self.src[start..position].to_string()),
                _ => {}
            }
        }
    }

    fn value(&mut self) -> Result<LiteralValue, LiteralError> {
        match self.peek().ok_or(LiteralError::UnexpectedEnd)? {
            '\'' | '"' => self.string().map(LiteralValue::Str),
            c if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => self.number(),
            c if c.is_ascii_alphabetic() => self.keyword(),
            found => Err(LiteralError::Unexpected {
                found,
                position: self.pos,
            }),
        }
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn keyword(&mut self) -> Result<LiteralValue, LiteralError> {
        let position = self.pos;
        match self.word() {
            "True" => Ok(LiteralValue::Bool(true)),
            "False" => Ok(LiteralValue::Bool(false)),
            "None" => Ok(LiteralValue::None),
            "nan" => Ok(LiteralValue::Number(f64::NAN)),
            "inf" => Ok(LiteralValue::Number(f64::INFINITY)),
            word => Err(LiteralError::Unexpected {
                found: word.chars().next().unwrap_or('?'),
                position,
            }),
        }
    }

    fn number(&mut self) -> Result<LiteralValue, LiteralError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };

        if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            return match self.word() {
                "inf" if negative => Ok(LiteralValue::Number(f64::NEG_INFINITY)),
                "inf" => Ok(LiteralValue::Number(f64::INFINITY)),
                "nan" => Ok(LiteralValue::Number(f64::NAN)),
                _ => Err(LiteralError::InvalidNumber(
                    self.src[start..self.pos].to_string(),
                )),
            };
        }

        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '_'))
        {
            let prev = self.peek();
            self.bump();
            if matches!(prev, Some('e' | 'E')) && matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
        }

        let text = &self.src[start..self.pos];
        if text.contains('_') {
            return Err(LiteralError::InvalidNumber(text.to_string()));
        }
        text.parse::<f64>()
            .map(LiteralValue::Number)
            .map_err(|_| LiteralError::InvalidNumber(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predictor_metric_line() {
        let dict = parse_dict(
            "{'plddt_binder': 85.1, 'pae_interaction': 5.2, 'binder_aligned_rmsd': 0.4}",
        )
        .unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.number("plddt_binder"), Some(85.1));
        assert_eq!(dict.number("pae_interaction"), Some(5.2));
        assert_eq!(dict.number("binder_aligned_rmsd"), Some(0.4));
    }

    #[test]
    fn accepts_scalars_of_every_kind() {
        let dict = parse_dict(
            r#"{"a": -1e-3, 'b': "text", 'c': True, 'd': False, 'e': None, 'f': 7, 'g': -inf,}"#,
        )
        .unwrap();
        assert_eq!(dict.number("a"), Some(-1e-3));
        assert_eq!(dict.get("b"), Some(&LiteralValue::Str("text".into())));
        assert_eq!(dict.get("c"), Some(&LiteralValue::Bool(true)));
        assert_eq!(dict.get("d"), Some(&LiteralValue::Bool(false)));
        assert_eq!(dict.get("e"), Some(&LiteralValue::None));
        assert_eq!(dict.number("f"), Some(7.0));
        assert_eq!(dict.number("g"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn nan_is_parsed_as_a_number() {
        let dict = parse_dict("{'x': nan}").unwrap();
        assert!(dict.number("x").unwrap().is_nan());
    }

    #[test]
    fn empty_dict_is_valid() {
        assert!(parse_dict("  { }  ").unwrap().is_empty());
    }

    #[test]
    fn rejects_call_expressions() {
        let err = parse_dict("{'plddt_binder': np.float32(85.1)}").unwrap_err();
        assert!(matches!(err, LiteralError::Unexpected { found: 'n', .. }));
    }

    #[test]
    fn rejects_nested_containers() {
        assert!(parse_dict("{'a': {'b': 1}}").is_err());
        assert!(parse_dict("{'a': [1, 2]}").is_err());
        assert!(parse_dict("{'a': (1,)}").is_err());
    }

    #[test]
    fn rejects_unquoted_keys_and_bare_names() {
        assert!(parse_dict("{a: 1}").is_err());
        assert!(parse_dict("{'a': __import__}").is_err());
    }

    #[test]
    fn rejects_duplicate_keys() {
        assert_eq!(
            parse_dict("{'a': 1, 'a': 2}").unwrap_err(),
            LiteralError::DuplicateKey("a".into())
        );
    }

    #[test]
    fn rejects_trailing_input_and_truncation() {
        assert!(matches!(
            parse_dict("{'a': 1} + {'b': 2}"),
            Err(LiteralError::TrailingInput(_))
        ));
        assert_eq!(parse_dict("{'a': 1"), Err(LiteralError::UnexpectedEnd));
    }

    #[test]
    fn rejects_malformed_numbers_and_escapes() {
        assert!(matches!(
            parse_dict("{'a': 1.2.3}"),
            Err(LiteralError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_dict("{'a': 1_000}"),
            Err(LiteralError::InvalidNumber(_))
        ));
        assert!(parse_dict(r"{'a\'b': 1}").is_err());
    }

    #[test]
    fn looks_like_dict_checks_only_the_outer_braces() {
        assert!(looks_like_dict("  {'a': 1}  "));
        assert!(looks_like_dict("{not really}"));
        assert!(!looks_like_dict("design_3 {'a': 1}"));
    }
}
