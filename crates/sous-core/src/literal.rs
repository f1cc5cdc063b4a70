//! Safe parser for literal data embedded in CSV cells.
//!
//! Recipe exports store list-valued columns as R vector literals, e.g.
//! `c("Mix flour.", "Bake 20 minutes.")`. The element syntax is the Python
//! literal subset: quoted strings with escapes, numbers, `True`/`False`/`None`
//! and nested lists, tuples, sets and dicts.
//!
//! This is a recursive-descent parser over literal data only. Names, calls,
//! attribute access and operators are rejected with a positioned
//! [`LiteralError`]; nothing in a cell is ever evaluated.
//!
//! # Example
//!
//! ```
//! use sous_core::literal::parse_vector_literal;
//!
//! let steps = parse_vector_literal(r#"c("Mix.", "Bake.")"#).unwrap();
//! assert_eq!(steps, vec!["Mix.".to_string(), "Bake.".to_string()]);
//!
//! assert!(parse_vector_literal(r#"c(__import__("os"))"#).is_err());
//! ```

use thiserror::Error;

/// Marker opening an R vector literal.
pub const VECTOR_LITERAL_PREFIX: &str = "c(";

/// Nesting limit for collections.
const MAX_DEPTH: usize = 64;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Str(_) => "string",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Bool(_) => "bool",
            Literal::None => "None",
            Literal::List(_) => "list",
            Literal::Tuple(_) => "tuple",
            Literal::Set(_) => "set",
            Literal::Dict(_) => "dict",
        }
    }
}

/// Parse failure with the byte offset where it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {position}")]
pub struct LiteralError {
    pub position: usize,
    pub message: String,
}

impl LiteralError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Parses a complete literal expression. Trailing input is an error.
pub fn parse_literal(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser::new(input);
    let value = parser.value(0)?;
    parser.skip_ws();
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!("unexpected {:?} after literal", c)));
    }
    Ok(value)
}

/// Parses an R vector literal `c(...)` whose elements are all strings.
///
/// Surrounding whitespace is ignored. The text between `c(` and the closing
/// `)` is read as the element list of a literal list.
pub fn parse_vector_literal(field: &str) -> Result<Vec<String>, LiteralError> {
    let trimmed = field.trim();
    let inner = trimmed
        .strip_prefix(VECTOR_LITERAL_PREFIX)
        .ok_or_else(|| LiteralError::new(0, "missing c( marker"))?
        .strip_suffix(')')
        .ok_or_else(|| LiteralError::new(trimmed.len(), "missing closing parenthesis"))?;

    let wrapped = format!("[{}]", inner);
    let items = match parse_literal(&wrapped) {
        Ok(Literal::List(items)) => items,
        Ok(other) => {
            return Err(LiteralError::new(
                0,
                format!("expected a list of values, found {}", other.kind()),
            ));
        }
        Err(e) => {
            // Report offsets relative to the text inside c( ).
            return Err(LiteralError::new(e.position.saturating_sub(1), e.message));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Literal::Str(s) => Ok(s),
            other => Err(LiteralError::new(
                0,
                format!("element {} is {}, expected a string", i, other.kind()),
            )),
        })
        .collect()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError::new(self.pos, message)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\\' && matches!(self.peek_nth(1), Some('\n')) {
                // explicit line continuation
                self.pos += 2;
            } else if matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c') {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn value(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(self.error("literal nested too deeply"));
        }
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('[') => {
                self.bump();
                let items = self.sequence(']', depth)?.0;
                Ok(Literal::List(items))
            }
            Some('(') => {
                self.bump();
                let (mut items, trailing_comma) = self.sequence(')', depth)?;
                if items.len() == 1 && !trailing_comma {
                    // parenthesized expression, not a tuple
                    Ok(items.remove(0))
                } else {
                    Ok(Literal::Tuple(items))
                }
            }
            Some('{') => {
                self.bump();
                self.brace(depth)
            }
            Some('"') | Some('\'') => self.strings(false),
            Some('+') | Some('-') => {
                let negative = self.bump() == Some('-');
                self.skip_ws();
                match self.peek() {
                    Some(c) if c.is_ascii_digit() || c == '.' => {
                        let number = self.number()?;
                        Ok(if negative { negate(number) } else { number })
                    }
                    _ => Err(self.error("unary operator must precede a number")),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(c) => Err(self.error(format!("unexpected {:?}", c))),
        }
    }

    /// Comma-separated values up to `close`. Returns whether a trailing comma was present.
    fn sequence(
        &mut self,
        close: char,
        depth: usize,
    ) -> Result<(Vec<Literal>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Ok((items, trailing_comma));
            }
            items.push(self.value(depth + 1)?);
            self.skip_ws();
            if self.eat(',') {
                trailing_comma = true;
                continue;
            }
            trailing_comma = false;
            if self.eat(close) {
                return Ok((items, trailing_comma));
            }
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected ',' or {:?}, found {:?}", close, c)),
                None => self.error(format!("unterminated collection, expected {:?}", close)),
            });
        }
    }

    /// Set or dict body after `{`.
    fn brace(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        self.skip_ws();
        if self.eat('}') {
            return Ok(Literal::Dict(Vec::new()));
        }

        let first = self.value(depth + 1)?;
        self.skip_ws();
        if !self.eat(':') {
            let mut items = vec![first];
            if self.eat(',') {
                items.extend(self.sequence('}', depth)?.0);
            } else if !self.eat('}') {
                return Err(self.error("expected ',' or '}' in set"));
            }
            return Ok(Literal::Set(items));
        }

        let mut entries = vec![(first, self.value(depth + 1)?)];
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Ok(Literal::Dict(entries));
            }
            if !self.eat(',') {
                return Err(self.error("expected ',' or '}' in dict"));
            }
            self.skip_ws();
            if self.eat('}') {
                return Ok(Literal::Dict(entries));
            }
            let key = self.value(depth + 1)?;
            self.skip_ws();
            if !self.eat(':') {
                return Err(self.error("expected ':' in dict"));
            }
            let value = self.value(depth + 1)?;
            entries.push((key, value));
        }
    }

    fn name(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let ident = &self.src[start..self.pos];

        if matches!(self.peek(), Some('"') | Some('\'')) {
            return match ident {
                "r" | "R" => self.strings(true),
                "u" | "U" => self.strings(false),
                _ => Err(LiteralError::new(
                    start,
                    format!("string prefix {:?} is not supported", ident),
                )),
            };
        }

        match ident {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            _ => Err(LiteralError::new(
                start,
                format!("names are not allowed in literals: {}", ident),
            )),
        }
    }

    /// One string, or several adjacent strings concatenated.
    fn strings(&mut self, raw: bool) -> Result<Literal, LiteralError> {
        let mut out = self.string(raw)?;
        loop {
            let save = self.pos;
            self.skip_ws();
            match self.peek() {
                Some('"') | Some('\'') => out.push_str(&self.string(false)?),
                Some('r') | Some('R')
                    if matches!(self.peek_nth(1), Some('"') | Some('\'')) =>
                {
                    self.bump();
                    out.push_str(&self.string(true)?);
                }
                Some('u') | Some('U')
                    if matches!(self.peek_nth(1), Some('"') | Some('\'')) =>
                {
                    self.bump();
                    out.push_str(&self.string(false)?);
                }
                _ => {
                    self.pos = save;
                    return Ok(Literal::Str(out));
                }
            }
        }
    }

    fn string(&mut self, raw: bool) -> Result<String, LiteralError> {
        let start = self.pos;
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(LiteralError::new(start, "expected a quote")),
        };
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.pos += 2 * quote.len_utf8();
        }

        let mut out = String::new();
        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(LiteralError::new(start, "unterminated string")),
            };
            if c == quote {
                if !triple {
                    return Ok(out);
                }
                if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                    self.pos += 2 * quote.len_utf8();
                    return Ok(out);
                }
                out.push(c);
                continue;
            }
            match c {
                '\n' if !triple => {
                    return Err(LiteralError::new(start, "newline in single-quoted string"));
                }
                '\\' if raw => {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                }
                '\\' => self.escape(&mut out)?,
                _ => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let at = self.pos - 1;
        let c = match self.bump() {
            Some(c) => c,
            None => return Err(LiteralError::new(at, "unterminated escape")),
        };
        match c {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(char_from(code, at)?);
            }
            'x' => out.push(self.hex_escape(2, at)?),
            'u' => out.push(self.hex_escape(4, at)?),
            'U' => out.push(self.hex_escape(8, at)?),
            'N' => return Err(LiteralError::new(at, "named unicode escapes are not supported")),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize, at: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let d = self
                .bump()
                .and_then(|d| d.to_digit(16))
                .ok_or_else(|| LiteralError::new(at, "truncated hex escape"))?;
            code = code * 16 + d;
        }
        char_from(code, at)
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let mut is_float = false;

        self.digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.bump();
            }
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(self.error("malformed exponent"));
            }
            self.digits();
        }
        if let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                return Err(self.error(format!("unexpected {:?} in number", c)));
            }
        }

        let text = &self.src[start..self.pos];
        if text == "." {
            return Err(LiteralError::new(start, "unexpected '.'"));
        }
        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Literal::Int(n));
            }
        }
        text.parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| LiteralError::new(start, format!("invalid number {:?}", text)))
    }

    fn digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
    }
}

fn negate(value: Literal) -> Literal {
    match value {
        Literal::Int(n) => Literal::Int(-n),
        Literal::Float(f) => Literal::Float(-f),
        other => other,
    }
}

fn char_from(code: u32, at: usize) -> Result<char, LiteralError> {
    char::from_u32(code)
        .ok_or_else(|| LiteralError::new(at, format!("invalid code point {:#x}", code)))
}
