//! Content stream lexer.
//!
//! Turns the decoded bytes of a page's drawing program into `RawEvent`s:
//! operands are collected until an operator keyword arrives, then emitted
//! together with it. Only the token-level syntax of content streams is
//! handled here; stream filters and file structure are the caller's job.
//!
//! Strings are decoded byte-per-character (Latin-1). Dictionaries and inline
//! images are skipped, since no text operator takes them.

use tracing::trace;

use crate::error::{InterpError, Result};
use crate::interp::event::{Operand, RawEvent};

/// Lexical tokens of a content stream.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Bool(bool),
    Name(String),
    Str(Vec<u8>),
    Keyword(Vec<u8>),
    ArrayStart,
    ArrayEnd,
    DictStart,
    DictEnd,
}

struct ContentLexer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ContentLexer<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.data.get(self.pos + offset).copied()
    }

    fn advance_one(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn next_token(&mut self) -> Option<Result<(usize, Token)>> {
        self.skip_whitespace();
        let token_pos = self.pos;
        let b = self.peek()?;

        let result = match b {
            b'/' => Ok(self.parse_name()),
            b'(' => self.parse_string(),
            b'<' => {
                if self.peek_at(1) == Some(b'<') {
                    self.pos += 2;
                    Ok(Token::DictStart)
                } else {
                    self.parse_hex_string()
                }
            }
            b'>' => {
                if self.peek_at(1) == Some(b'>') {
                    self.pos += 2;
                    Ok(Token::DictEnd)
                } else {
                    self.pos += 1;
                    Err(InterpError::TokenError {
                        pos: token_pos,
                        msg: "unbalanced '>'".into(),
                    })
                }
            }
            b'[' => {
                self.pos += 1;
                Ok(Token::ArrayStart)
            }
            b']' => {
                self.pos += 1;
                Ok(Token::ArrayEnd)
            }
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.parse_number(token_pos),
            _ => Ok(self.parse_keyword()),
        };

        Some(result.map(|token| (token_pos, token)))
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'%' {
                self.skip_comment();
            } else if is_whitespace(b) {
                self.pos += 1;
            } else {
                return;
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(b) = self.advance_one() {
            if b == b'\n' || b == b'\r' {
                break;
            }
        }
    }

    fn parse_name(&mut self) -> Token {
        self.pos += 1; // skip '/'
        let mut name = Vec::with_capacity(16);

        while let Some(b) = self.peek() {
            if is_whitespace(b) || is_delimiter(b) {
                break;
            }
            if b == b'#'
                && let (Some(h1), Some(h2)) = (
                    self.peek_at(1).and_then(hex_value),
                    self.peek_at(2).and_then(hex_value),
                )
            {
                self.pos += 3;
                name.push((h1 << 4) | h2);
                continue;
            }
            name.push(b);
            self.pos += 1;
        }

        Token::Name(String::from_utf8_lossy(&name).into_owned())
    }

    fn parse_number(&mut self, start_pos: usize) -> Result<Token> {
        let mut negative = false;
        if self.peek() == Some(b'-') {
            negative = true;
            self.pos += 1;
        } else if self.peek() == Some(b'+') {
            self.pos += 1;
        }

        let mut value = 0.0f64;
        let mut digits = 0usize;
        while let Some(b @ b'0'..=b'9') = self.peek() {
            value = value.mul_add(10.0, f64::from(b - b'0'));
            digits += 1;
            self.pos += 1;
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            let mut frac_part: u64 = 0;
            let mut divisor = 1.0;
            while let Some(b @ b'0'..=b'9') = self.peek() {
                // Digits past 18 cannot change an f64 and would overflow.
                if divisor < 1e18 {
                    frac_part = frac_part * 10 + u64::from(b - b'0');
                    divisor *= 10.0;
                }
                digits += 1;
                self.pos += 1;
            }
            value += frac_part as f64 / divisor;
        }

        if digits == 0 {
            return Err(InterpError::TokenError {
                pos: start_pos,
                msg: "invalid number".into(),
            });
        }

        Ok(Token::Number(if negative { -value } else { value }))
    }

    fn parse_string(&mut self) -> Result<Token> {
        self.pos += 1; // skip '('
        let mut result = Vec::with_capacity(32);
        let mut depth = 1;

        while depth > 0 {
            match self.advance_one() {
                Some(b'(') => {
                    depth += 1;
                    result.push(b'(');
                }
                Some(b')') => {
                    depth -= 1;
                    if depth > 0 {
                        result.push(b')');
                    }
                }
                Some(b'\\') => match self.advance_one() {
                    Some(b'n') => result.push(b'\n'),
                    Some(b'r') => result.push(b'\r'),
                    Some(b't') => result.push(b'\t'),
                    Some(b'b') => result.push(0x08),
                    Some(b'f') => result.push(0x0c),
                    Some(b'\r') => {
                        if self.peek() == Some(b'\n') {
                            self.pos += 1;
                        }
                    }
                    Some(b'\n') => {}
                    Some(c @ b'0'..=b'7') => {
                        let mut octal = u32::from(c - b'0');
                        for _ in 0..2 {
                            match self.peek() {
                                Some(d @ b'0'..=b'7') => {
                                    self.pos += 1;
                                    octal = octal * 8 + u32::from(d - b'0');
                                }
                                _ => break,
                            }
                        }
                        result.push((octal & 0xFF) as u8);
                    }
                    Some(c) => result.push(c),
                    None => return Err(InterpError::UnexpectedEof),
                },
                Some(c) => result.push(c),
                None => return Err(InterpError::UnexpectedEof),
            }
        }

        Ok(Token::Str(result))
    }

    fn parse_hex_string(&mut self) -> Result<Token> {
        self.pos += 1; // skip '<'
        let mut result = Vec::new();
        let mut pending: Option<u8> = None;

        loop {
            match self.advance_one() {
                Some(b'>') => break,
                Some(c) if is_whitespace(c) => {}
                Some(c) => {
                    let Some(nibble) = hex_value(c) else {
                        return Err(InterpError::TokenError {
                            pos: self.pos - 1,
                            msg: format!("invalid hex digit {:?}", c as char),
                        });
                    };
                    match pending.take() {
                        Some(high) => result.push((high << 4) | nibble),
                        None => pending = Some(nibble),
                    }
                }
                None => return Err(InterpError::UnexpectedEof),
            }
        }

        // An odd trailing digit is padded with zero.
        if let Some(high) = pending {
            result.push(high << 4);
        }

        Ok(Token::Str(result))
    }

    fn parse_keyword(&mut self) -> Token {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_whitespace(b) || is_delimiter(b) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            // A lone delimiter such as ')' or '{'; keep it as a one-byte keyword.
            self.pos += 1;
        }
        match &self.data[start..self.pos] {
            b"true" => Token::Bool(true),
            b"false" => Token::Bool(false),
            bytes => Token::Keyword(bytes.to_vec()),
        }
    }

    /// Skips inline image data up to and including the `EI` marker.
    fn skip_inline_data(&mut self) {
        // One whitespace byte separates ID from the data.
        if matches!(self.peek(), Some(b) if is_whitespace(b)) {
            self.pos += 1;
        }
        while self.pos < self.data.len() {
            let at_marker = self.data[self.pos..].starts_with(b"EI")
                && self.pos > 0
                && is_whitespace(self.data[self.pos - 1])
                && self.peek_at(2).is_none_or(|b| is_whitespace(b) || is_delimiter(b));
            if at_marker {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }
}

/// Parser for page content streams.
///
/// Yields one `RawEvent` per operator, carrying the operands that preceded
/// it. Malformed tokens are skipped.
pub struct ContentParser<'a> {
    lexer: ContentLexer<'a>,
    /// Current operand stack
    operands: Vec<Operand>,
    /// Open arrays, innermost last
    arrays: Vec<Vec<Operand>>,
    /// Nesting depth of dictionaries being skipped
    dict_depth: usize,
    /// Between BI and ID
    in_inline_dict: bool,
}

impl<'a> ContentParser<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            lexer: ContentLexer::new(data),
            operands: Vec::new(),
            arrays: Vec::new(),
            dict_depth: 0,
            in_inline_dict: false,
        }
    }

    /// Pushes a finished operand to the innermost open array, or to the
    /// operand stack.
    fn push_operand(&mut self, operand: Operand) {
        match self.arrays.last_mut() {
            Some(items) => items.push(operand),
            None => self.operands.push(operand),
        }
    }

    fn operator(&mut self, keyword: Vec<u8>) -> Option<RawEvent> {
        match keyword.as_slice() {
            b"BI" => {
                self.in_inline_dict = true;
                self.operands.clear();
                return None;
            }
            b"ID" if self.in_inline_dict => {
                self.in_inline_dict = false;
                self.lexer.skip_inline_data();
                self.operands.clear();
                return None;
            }
            _ => {}
        }
        if self.in_inline_dict {
            return None;
        }
        if !self.arrays.is_empty() {
            // Keywords never appear inside text arrays; drop the stray token.
            trace!(keyword = %String::from_utf8_lossy(&keyword), "keyword inside array");
            return None;
        }

        let kind = String::from_utf8_lossy(&keyword).into_owned();
        Some(RawEvent::new(kind, std::mem::take(&mut self.operands)))
    }
}

impl Iterator for ContentParser<'_> {
    type Item = RawEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, token) = match self.lexer.next_token()? {
                Ok(t) => t,
                Err(err) => {
                    trace!(%err, "skipping bad token");
                    continue;
                }
            };

            if self.dict_depth > 0 {
                match token {
                    Token::DictStart => self.dict_depth += 1,
                    Token::DictEnd => self.dict_depth -= 1,
                    _ => {}
                }
                continue;
            }

            match token {
                Token::Number(n) => self.push_operand(Operand::Number(n)),
                Token::Bool(b) => self.push_operand(Operand::Bool(b)),
                Token::Name(name) => self.push_operand(Operand::Name(name.into())),
                Token::Str(bytes) => self.push_operand(Operand::Str(decode_latin1(&bytes))),
                Token::ArrayStart => self.arrays.push(Vec::new()),
                Token::ArrayEnd => match self.arrays.pop() {
                    Some(items) => self.push_operand(Operand::Array(items)),
                    None => trace!(pos, "unbalanced ']'"),
                },
                Token::DictStart => self.dict_depth = 1,
                Token::DictEnd => trace!(pos, "unbalanced '>>'"),
                Token::Keyword(keyword) => {
                    if let Some(event) = self.operator(keyword) {
                        return Some(event);
                    }
                }
            }
        }
    }
}

/// Decodes string bytes one byte per character.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Check if byte is PDF whitespace.
const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x00' | b'\x0c')
}

const fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
