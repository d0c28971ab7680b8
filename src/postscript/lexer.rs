use crate::{error::FontError, lex::LexBase};

/// A single PostScript token. Composite objects are not built here; the
/// consumers (CMap and Type 1 parsers) react to the delimiters themselves
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Int(i32),
    Real(f32),

    /// A literal name, `/Foo`, without the leading slash
    Name(&'a [u8]),

    /// An executable name such as `def` or `begincodespacerange`
    Operator(&'a [u8]),

    /// The contents of a `(...)` string
    String(Vec<u8>),

    /// The decoded contents of a `<...>` string
    HexString(Vec<u8>),

    ArrayStart,
    ArrayEnd,
    ProcedureStart,
    ProcedureEnd,
    DictStart,
    DictEnd,
}

impl<'a> Token<'a> {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Real(r) if r.fract() == 0.0 => Some(*r as i32),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Int(i) => Some(*i as f32),
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostScriptLexer<'a> {
    cursor: usize,
    buffer: &'a [u8],
}

impl<'a> PostScriptLexer<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn set_position(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.buffer.len());
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.buffer[self.cursor..]
    }

    /// Reads `length` raw bytes following a single separator byte, as in the
    /// `<length> RD <binary>` construct of Type 1 fonts
    pub fn read_binary(&mut self, length: usize) -> anyhow::Result<&'a [u8]> {
        self.next_byte();

        let start = self.cursor;
        let end = start
            .checked_add(length)
            .filter(|&end| end <= self.buffer.len())
            .ok_or(FontError::UnexpectedEof)?;

        self.cursor = end;

        Ok(&self.buffer[start..end])
    }

    /// Advances past the next occurrence of `needle`, returning whether it was found
    pub fn skip_past(&mut self, needle: &[u8]) -> bool {
        match find_subslice(self.remaining(), needle) {
            Some(idx) => {
                self.cursor += idx + needle.len();
                true
            }
            None => {
                self.cursor = self.buffer.len();
                false
            }
        }
    }

    pub fn next_token(&mut self) -> anyhow::Result<Option<Token<'a>>> {
        self.skip_whitespace();

        Ok(Some(match self.peek_byte() {
            Some(b'/') => {
                self.next_byte();
                // immediately evaluated names, `//name`
                if self.peek_byte() == Some(b'/') {
                    self.next_byte();
                }
                Token::Name(self.lex_regular())
            }
            Some(b'(') => Token::String(self.lex_string()?),
            Some(b'<') => match self.peek_byte_offset(1) {
                Some(b'<') => {
                    self.cursor += 2;
                    Token::DictStart
                }
                _ => Token::HexString(self.lex_hex_string()?),
            },
            Some(b'>') => {
                self.next_byte();
                if self.peek_byte() == Some(b'>') {
                    self.next_byte();
                    Token::DictEnd
                } else {
                    anyhow::bail!(FontError::invalid("unmatched '>'"))
                }
            }
            Some(b'[') => {
                self.next_byte();
                Token::ArrayStart
            }
            Some(b']') => {
                self.next_byte();
                Token::ArrayEnd
            }
            Some(b'{') => {
                self.next_byte();
                Token::ProcedureStart
            }
            Some(b'}') => {
                self.next_byte();
                Token::ProcedureEnd
            }
            Some(b')') => {
                self.next_byte();
                anyhow::bail!(FontError::invalid("unmatched ')'"))
            }
            Some(..) => {
                let word = self.lex_regular();
                parse_number(word).unwrap_or(Token::Operator(word))
            }
            None => return Ok(None),
        }))
    }
}

impl<'a> LexBase<'a> for PostScriptLexer<'a> {
    fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn cursor_mut(&mut self) -> &mut usize {
        &mut self.cursor
    }
}

impl<'a> Iterator for PostScriptLexer<'a> {
    type Item = anyhow::Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Integers, reals and radix numbers (`16#FFFE`). Integers that do not fit in
/// 32 bits become reals
fn parse_number(word: &[u8]) -> Option<Token<'static>> {
    let s = std::str::from_utf8(word).ok()?;

    if !s
        .bytes()
        .next()
        .map_or(false, |b| matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.'))
    {
        return None;
    }

    if let Some((radix, digits)) = s.split_once('#') {
        let radix = radix.parse::<u32>().ok().filter(|r| (2..=36).contains(r))?;
        return u32::from_str_radix(digits, radix)
            .ok()
            .map(|n| Token::Int(n as i32));
    }

    if let Ok(i) = s.parse::<i32>() {
        return Some(Token::Int(i));
    }

    if s.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(r) = s.parse::<f32>() {
            return Some(Token::Real(r));
        }
    }

    None
}

pub(crate) fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }

    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
