use crate::error::FontError;

const FORM_FEED: u8 = b'\x0C';
const BACKSPACE: u8 = b'\x08';

pub(crate) trait LexBase<'a> {
    fn buffer(&self) -> &'a [u8];
    fn cursor(&self) -> usize;
    fn cursor_mut(&mut self) -> &mut usize;

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek_byte() {
            if Self::is_whitespace(b) {
                self.next_byte();
            } else if b == b'%' {
                self.next_byte();
                self.skip_comment();
            } else {
                break;
            }
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.buffer().get(self.cursor()).copied().map(|b| {
            *self.cursor_mut() += 1;
            b
        })
    }

    fn peek_byte(&self) -> Option<u8> {
        self.buffer().get(self.cursor()).copied()
    }

    fn peek_byte_offset(&self, offset: usize) -> Option<u8> {
        self.buffer().get(self.cursor() + offset).copied()
    }

    /// Whitespace chars are defined as
    ///
    /// * NUL             0x0
    /// * Horizontal tab  0x9
    /// * Line feed       0xa
    /// * Form feed       0xc
    /// * Carriage return 0xd
    /// * Space           0x20
    ///
    fn is_whitespace(b: u8) -> bool {
        matches!(b, b'\0' | 0x9 | b'\n' | FORM_FEED | b'\r' | b' ')
    }

    fn is_delimiter(b: u8) -> bool {
        matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
        )
    }

    fn is_regular(b: u8) -> bool {
        !Self::is_whitespace(b) && !Self::is_delimiter(b)
    }

    /// Assumes the leading `%` has already been consumed
    fn skip_comment(&mut self) {
        while !self.next_is_eol() {
            self.next_byte();
        }
    }

    fn next_is_eol(&self) -> bool {
        match self.peek_byte() {
            Some(b'\r' | b'\n') => true,
            Some(..) => false,
            None => true,
        }
    }

    fn expect_byte(&mut self, expected: u8) -> anyhow::Result<()> {
        match self.next_byte() {
            Some(found) if expected == found => Ok(()),
            Some(found) => anyhow::bail!(FontError::invalid(format!(
                "expected {:?}, found {:?}",
                expected as char, found as char
            ))),
            None => anyhow::bail!(FontError::UnexpectedEof),
        }
    }

    /// Consumes a run of regular characters
    fn lex_regular(&mut self) -> &'a [u8] {
        let start = self.cursor();

        while let Some(b) = self.peek_byte() {
            if !Self::is_regular(b) {
                break;
            }

            self.next_byte();
        }

        &self.buffer()[start..self.cursor()]
    }

    /// Assumes the leading `(` has not been consumed
    fn lex_string(&mut self) -> anyhow::Result<Vec<u8>> {
        self.expect_byte(b'(')?;

        let mut string = Vec::new();
        let mut num_open_parens = 0;

        while let Some(b) = self.next_byte() {
            match b {
                b')' if num_open_parens == 0 => return Ok(string),
                b')' => {
                    num_open_parens -= 1;
                    string.push(b')');
                }
                b'(' => {
                    num_open_parens += 1;
                    string.push(b'(');
                }
                b'\\' => match self.next_byte() {
                    Some(b'n') => string.push(b'\n'),
                    Some(b'r') => string.push(b'\r'),
                    Some(b't') => string.push(b'\t'),
                    Some(b'b') => string.push(BACKSPACE),
                    Some(b'f') => string.push(FORM_FEED),
                    Some(b'\r') => {
                        if self.peek_byte() == Some(b'\n') {
                            self.next_byte();
                        }
                    }
                    Some(b'\n') => {}
                    // octal escape of the form `\d`, `\dd` or `\ddd`
                    Some(c @ b'0'..=b'7') => {
                        let mut n = (c - b'0') as u32;

                        for _ in 0..2 {
                            match self.peek_byte() {
                                Some(d @ b'0'..=b'7') => {
                                    self.next_byte();
                                    n = n * 8 + (d - b'0') as u32;
                                }
                                _ => break,
                            }
                        }

                        string.push(n as u8);
                    }
                    Some(c) => string.push(c),
                    None => break,
                },
                _ => string.push(b),
            }
        }

        anyhow::bail!(FontError::UnexpectedEof)
    }

    /// Assumes the leading `<` has not been consumed. Whitespace between digits
    /// is ignored and an odd trailing digit is treated as if followed by `0`
    fn lex_hex_string(&mut self) -> anyhow::Result<Vec<u8>> {
        self.expect_byte(b'<')?;

        let mut bytes = Vec::new();
        let mut pending: Option<u8> = None;

        loop {
            let b = match self.next_byte() {
                Some(b) => b,
                None => anyhow::bail!(FontError::UnexpectedEof),
            };

            let nibble = match b {
                b'>' => break,
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                b if Self::is_whitespace(b) => continue,
                b => anyhow::bail!(FontError::invalid(format!(
                    "invalid hex digit {:?}",
                    b as char
                ))),
            };

            match pending.take() {
                Some(hi) => bytes.push((hi << 4) | nibble),
                None => pending = Some(nibble),
            }
        }

        if let Some(hi) = pending {
            bytes.push(hi << 4);
        }

        Ok(bytes)
    }
}
