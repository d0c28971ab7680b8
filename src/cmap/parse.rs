use std::sync::Arc;

use crate::{
    encoding::glyph_list,
    postscript::{PostScriptLexer, Token},
};

use super::{CMap, CMapBuilder, CMapRegistry};

/// Limit on chained `usecmap` references
pub(super) const MAX_USECMAP_DEPTH: usize = 8;

/// Interprets the handful of PostScript operators that define a CMap. Anything
/// else is skipped along with its operands
pub(super) struct CMapParser<'a, 'r> {
    lexer: PostScriptLexer<'a>,
    registry: &'r CMapRegistry,
    depth: usize,
    builder: CMapBuilder,
    operands: Vec<Token<'a>>,
}

impl<'a, 'r> CMapParser<'a, 'r> {
    pub fn new(bytes: &'a [u8], registry: &'r CMapRegistry, depth: usize) -> Self {
        Self {
            lexer: PostScriptLexer::new(bytes),
            registry,
            depth,
            builder: CMapBuilder::new(),
            operands: Vec::new(),
        }
    }

    pub fn parse(mut self, base: Option<Arc<CMap>>) -> anyhow::Result<CMap> {
        if let Some(base) = base {
            self.builder.set_base(base);
        }

        while let Some(token) = self.next_token() {
            match token {
                Token::Operator(op) => self.operator(op),
                token => self.operands.push(token),
            }
        }

        Ok(self.builder.build())
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            match self.lexer.next_token() {
                Ok(token) => return token,
                Err(err) => log::warn!("skipping malformed CMap token: {}", err),
            }
        }
    }

    fn operator(&mut self, op: &'a [u8]) {
        log::trace!("CMap operator {}", String::from_utf8_lossy(op));

        match op {
            b"begincodespacerange" => self.section(b"endcodespacerange", Self::code_space_ranges),
            b"beginbfchar" => self.section(b"endbfchar", Self::bf_chars),
            b"beginbfrange" => self.section(b"endbfrange", Self::bf_ranges),
            b"begincidchar" => self.section(b"endcidchar", Self::cid_chars),
            b"begincidrange" => self.section(b"endcidrange", Self::cid_ranges),
            b"beginnotdefchar" => self.section(b"endnotdefchar", Self::ignored),
            b"beginnotdefrange" => self.section(b"endnotdefrange", Self::ignored),
            b"usecmap" => self.use_cmap(),
            b"def" => self.def(),
            _ => {}
        }

        self.operands.clear();
    }

    /// Collects the entries of a `begin...`/`end...` section and hands them to
    /// `handler`. A section cut short by another operator or by the end of the
    /// program keeps the entries read so far
    fn section(&mut self, end: &[u8], handler: fn(&mut Self, &[Token<'a>])) {
        self.operands.clear();

        let mut entries = Vec::new();
        let mut interrupted_by = None;

        while let Some(token) = self.next_token() {
            match token {
                Token::Operator(op) if op == end => break,
                Token::Operator(op) => {
                    log::warn!(
                        "CMap section missing {}, found {}",
                        String::from_utf8_lossy(end),
                        String::from_utf8_lossy(op)
                    );
                    interrupted_by = Some(op);
                    break;
                }
                token => entries.push(token),
            }
        }

        handler(self, &entries);

        if let Some(op) = interrupted_by {
            self.operator(op);
        }
    }

    fn code_space_ranges(&mut self, entries: &[Token<'a>]) {
        for pair in entries.chunks(2) {
            match pair {
                [Token::HexString(low), Token::HexString(high)]
                    if low.len() == high.len() && !low.is_empty() =>
                {
                    self.builder.add_code_space(low[0], high[0], low.len());
                }
                _ => log::warn!("skipping malformed code space range {:?}", pair),
            }
        }
    }

    fn bf_chars(&mut self, entries: &[Token<'a>]) {
        for pair in entries.chunks(2) {
            let (src, dst) = match pair {
                [Token::HexString(src), dst] => (src, dst),
                _ => {
                    log::warn!("skipping malformed bfchar {:?}", pair);
                    continue;
                }
            };

            match (code_from_bytes(src), destination_units(dst)) {
                (Some(code), Some(units)) => self.builder.map_utf16(code, &units),
                _ => log::warn!("skipping malformed bfchar {:?}", pair),
            }
        }
    }

    fn bf_ranges(&mut self, entries: &[Token<'a>]) {
        let mut tokens = entries.iter();

        while let Some(low) = tokens.next() {
            let high = tokens.next();

            let destination = match tokens.next() {
                Some(Token::ArrayStart) => {
                    let array = tokens
                        .by_ref()
                        .take_while(|token| **token != Token::ArrayEnd)
                        .collect::<Vec<_>>();
                    BfDestination::Array(array)
                }
                Some(token) => BfDestination::Start(token),
                None => {
                    log::warn!("truncated bfrange");
                    break;
                }
            };

            let (low, high) = match (low, high) {
                (Token::HexString(low), Some(Token::HexString(high))) => {
                    match source_range(low, high) {
                        Some(range) => range,
                        None => {
                            log::warn!("skipping malformed bfrange <{:02x?}> <{:02x?}>", low, high);
                            continue;
                        }
                    }
                }
                _ => {
                    log::warn!("skipping malformed bfrange starting at {:?}", low);
                    continue;
                }
            };

            match destination {
                BfDestination::Start(dst) => match destination_units(dst) {
                    Some(units) if units.len() == 1 => self.builder.map_range(low, high, units[0]),
                    Some(mut units) if !units.is_empty() => {
                        // multi-unit destinations increment their final unit
                        for code in low..=high {
                            self.builder.map_utf16(code, &units);

                            if let Some(last) = units.last_mut() {
                                *last = last.wrapping_add(1);
                            }
                        }
                    }
                    _ => log::warn!("skipping bfrange with destination {:?}", dst),
                },
                BfDestination::Array(array) => {
                    for (code, dst) in (low..=high).zip(array) {
                        match destination_units(dst) {
                            Some(units) => self.builder.map_utf16(code, &units),
                            None => log::warn!("skipping bfrange element {:?}", dst),
                        }
                    }
                }
            }
        }
    }

    fn cid_chars(&mut self, entries: &[Token<'a>]) {
        for pair in entries.chunks(2) {
            match pair {
                [Token::HexString(src), cid] => match (code_from_bytes(src), selector(cid)) {
                    (Some(code), Some(cid)) => self.builder.map(code, cid),
                    _ => log::warn!("skipping malformed cidchar {:?}", pair),
                },
                _ => log::warn!("skipping malformed cidchar {:?}", pair),
            }
        }
    }

    fn cid_ranges(&mut self, entries: &[Token<'a>]) {
        for triple in entries.chunks(3) {
            match triple {
                [Token::HexString(low), Token::HexString(high), cid] => {
                    match (source_range(low, high), selector(cid)) {
                        (Some((low, high)), Some(cid)) => self.builder.map_range(low, high, cid),
                        _ => log::warn!("skipping malformed cidrange {:?}", triple),
                    }
                }
                _ => log::warn!("skipping malformed cidrange {:?}", triple),
            }
        }
    }

    fn ignored(&mut self, entries: &[Token<'a>]) {
        log::debug!("ignoring {} notdef entries", entries.len());
    }

    fn use_cmap(&mut self) {
        let name = match self.operands.last() {
            Some(Token::Name(name)) => String::from_utf8_lossy(name).into_owned(),
            _ => {
                log::warn!("usecmap without a CMap name");
                return;
            }
        };

        if self.depth >= MAX_USECMAP_DEPTH {
            log::warn!("usecmap chain too deep, ignoring {}", name);
            return;
        }

        let base = self.registry.resolve_nested(&name, self.depth + 1);
        self.builder.set_base(base);
    }

    fn def(&mut self) {
        match self.operands.as_slice() {
            [.., Token::Name(b"CMapName"), Token::Name(name)] => {
                self.builder.set_name(String::from_utf8_lossy(name));
            }
            [.., Token::Name(b"WMode"), Token::Int(mode)] => {
                self.builder.set_writing_mode(u8::from(*mode == 1));
            }
            _ => {}
        }
    }
}

enum BfDestination<'t, 'a> {
    Start(&'t Token<'a>),
    Array(Vec<&'t Token<'a>>),
}

/// A one or two byte source code
fn code_from_bytes(bytes: &[u8]) -> Option<u16> {
    match *bytes {
        [b] => Some(u16::from(b)),
        [hi, lo] => Some(u16::from_be_bytes([hi, lo])),
        _ => None,
    }
}

/// Both ends must be spelled with the same number of bytes, and in order
fn source_range(low: &[u8], high: &[u8]) -> Option<(u16, u16)> {
    if low.len() != high.len() {
        return None;
    }

    let low = code_from_bytes(low)?;
    let high = code_from_bytes(high)?;

    (low <= high).then(|| (low, high))
}

/// Destination text as UTF-16 units. A single byte stands for itself
fn destination_units(token: &Token) -> Option<Vec<u16>> {
    match token {
        Token::HexString(bytes) if bytes.len() == 1 => Some(vec![u16::from(bytes[0])]),
        Token::HexString(bytes) if !bytes.is_empty() => Some(
            bytes
                .chunks_exact(2)
                .map(|unit| u16::from_be_bytes([unit[0], unit[1]]))
                .collect(),
        ),
        Token::Name(name) => {
            let name = std::str::from_utf8(name).ok()?;
            glyph_list::glyph_name_to_unicode(name).map(|s| s.encode_utf16().collect())
        }
        _ => None,
    }
}

fn selector(token: &Token) -> Option<u16> {
    token.as_int().and_then(|n| u16::try_from(n).ok())
}
