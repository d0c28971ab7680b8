use crate::postscript::{PostScriptLexer, Token};

/// Default number of random bytes in front of each charstring
const DEFAULT_LEN_IV: i32 = 4;

/// Values of the public dictionary that the font needs
#[derive(Debug, Default)]
pub(super) struct PublicDict {
    pub font_name: Option<String>,
    pub font_matrix: Option<[f32; 6]>,
    pub font_bbox: Option<[f32; 4]>,
    /// `None` for `StandardEncoding`
    pub encoding: Option<Vec<(u8, String)>>,
}

/// Charstrings and subroutines, still encrypted
#[derive(Debug)]
pub(super) struct PrivateDict<'a> {
    pub len_iv: i32,
    pub subrs: Vec<(usize, &'a [u8])>,
    pub charstrings: Vec<(String, &'a [u8])>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Other,
    Subrs,
    CharStrings,
}

fn name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

pub(super) fn parse_public_dict(clear_text: &[u8]) -> PublicDict {
    let mut dict = PublicDict::default();
    let mut lexer = PostScriptLexer::new(clear_text);

    while let Some(token) = next_token(&mut lexer) {
        match token {
            Token::Name(b"FontName") => {
                if let Some(Token::Name(font_name)) = next_token(&mut lexer) {
                    dict.font_name = Some(name(font_name));
                }
            }
            Token::Name(b"FontMatrix") => {
                dict.font_matrix = read_numbers(&mut lexer).and_then(|n| n.try_into().ok());
            }
            Token::Name(b"FontBBox") => {
                dict.font_bbox = read_numbers(&mut lexer).and_then(|n| n.try_into().ok());
            }
            Token::Name(b"Encoding") => dict.encoding = read_encoding(&mut lexer),
            // the private part follows
            Token::Operator(b"eexec") => break,
            _ => {}
        }
    }

    dict
}

/// `StandardEncoding`, or the `dup code /name put` entries of an encoding
/// array up to the closing `def`
fn read_encoding(lexer: &mut PostScriptLexer) -> Option<Vec<(u8, String)>> {
    let mut entries = Vec::new();
    let mut window: [Option<Token>; 2] = [None, None];

    while let Some(token) = next_token(lexer) {
        match &token {
            Token::Operator(b"StandardEncoding") => return None,
            Token::Operator(b"def") => break,
            Token::Operator(b"put") => {
                if let [Some(Token::Int(code)), Some(Token::Name(glyph))] = &window {
                    match u8::try_from(*code) {
                        Ok(code) => entries.push((code, name(glyph))),
                        Err(..) => log::debug!("encoding code out of range: {}", code),
                    }
                }
            }
            _ => {}
        }

        window = [window[1].take(), Some(token)];
    }

    Some(entries)
}

/// Numbers of an array or procedure, `[a b c]` or `{a b c}`
fn read_numbers(lexer: &mut PostScriptLexer) -> Option<Vec<f32>> {
    match next_token(lexer)? {
        Token::ArrayStart | Token::ProcedureStart => {}
        _ => return None,
    }

    let mut numbers = Vec::new();

    loop {
        match next_token(lexer)? {
            Token::ArrayEnd | Token::ProcedureEnd => return Some(numbers),
            token => numbers.push(token.as_number()?),
        }
    }
}

pub(super) fn parse_private_dict(private: &[u8]) -> PrivateDict {
    let mut dict = PrivateDict {
        len_iv: DEFAULT_LEN_IV,
        subrs: Vec::new(),
        charstrings: Vec::new(),
    };

    let mut lexer = PostScriptLexer::new(private);
    let mut section = Section::Other;
    let mut last_name: Option<&[u8]> = None;
    let mut ints: [Option<i32>; 2] = [None, None];

    while let Some(token) = next_token(&mut lexer) {
        match token {
            Token::Name(b"lenIV") => {
                if let Some(len_iv) = next_token(&mut lexer).and_then(|t| t.as_int()) {
                    dict.len_iv = len_iv;
                }
            }
            Token::Name(b"Subrs") => section = Section::Subrs,
            Token::Name(b"CharStrings") => section = Section::CharStrings,
            Token::Name(n) => last_name = Some(n),
            Token::Int(n) => ints = [ints[1], Some(n)],
            // `<length> RD <binary>`, with `-|` as the common alias
            Token::Operator(b"RD" | b"-|") if section != Section::Other => {
                let length = match ints[1].and_then(|n| usize::try_from(n).ok()) {
                    Some(length) => length,
                    None => {
                        log::warn!("charstring without a length");
                        break;
                    }
                };

                let data = match lexer.read_binary(length) {
                    Ok(data) => data,
                    Err(err) => {
                        log::warn!("truncated charstring: {}", err);
                        break;
                    }
                };

                match section {
                    Section::Subrs => match ints[0].and_then(|n| usize::try_from(n).ok()) {
                        Some(idx) => dict.subrs.push((idx, data)),
                        None => log::warn!("subroutine without an index"),
                    },
                    Section::CharStrings => match last_name.take() {
                        Some(glyph) => dict.charstrings.push((name(glyph), data)),
                        None => log::warn!("charstring without a glyph name"),
                    },
                    Section::Other => {}
                }

                ints = [None, None];
            }
            _ => {}
        }
    }

    dict
}

/// Stops at the end of the data, and at the first lexing error, which after
/// the charstrings is usually the zero padding of the eexec section
fn next_token<'a>(lexer: &mut PostScriptLexer<'a>) -> Option<Token<'a>> {
    match lexer.next_token() {
        Ok(token) => token,
        Err(err) => {
            log::debug!("stopped reading Type 1 program: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn public_dict() {
        let dict = parse_public_dict(
            b"%!FontType1-1.0: Test 001\n\
              12 dict begin\n\
              /FontInfo 2 dict dup begin /Notice (Copyright \\(c\\)) readonly def end readonly def\n\
              /FontName /Test-Regular def\n\
              /FontMatrix [0.002 0 0 0.002 0 0] readonly def\n\
              /FontBBox {-10 -250 1000 900} readonly def\n\
              /Encoding 256 array\n\
              0 1 255 {1 index exch /.notdef put} for\n\
              dup 65 /A put\n\
              dup 97 /a put\n\
              readonly def\n\
              currentdict end\n\
              currentfile eexec\n",
        );

        assert_eq!(dict.font_name.as_deref(), Some("Test-Regular"));
        assert_eq!(dict.font_matrix, Some([0.002, 0.0, 0.0, 0.002, 0.0, 0.0]));
        assert_eq!(dict.font_bbox, Some([-10.0, -250.0, 1000.0, 900.0]));
        assert_eq!(
            dict.encoding,
            Some(vec![(65, "A".to_owned()), (97, "a".to_owned())])
        );
    }

    #[test]
    fn standard_encoding() {
        let dict = parse_public_dict(b"/Encoding StandardEncoding def /FontName /X def");

        assert_eq!(dict.encoding, None);
        assert_eq!(dict.font_name.as_deref(), Some("X"));
    }

    #[test]
    fn private_dict() {
        let mut private = b"dup /Private 8 dict dup begin\n/lenIV -1 def\n/Subrs 2 array\n".to_vec();
        private.extend_from_slice(b"dup 0 3 RD \x0b\x0c\x0d NP\n");
        private.extend_from_slice(b"dup 1 1 -| ) |\n");
        private.extend_from_slice(b"ND\n2 index /CharStrings 2 dict dup begin\n");
        private.extend_from_slice(b"/.notdef 2 RD \x8b\x0e ND\n");
        private.extend_from_slice(b"/space 4 -| }]>) |-\n");
        private.extend_from_slice(b"end\nend\nmark currentfile closefile\n");
        private.extend_from_slice(&[0; 16]);

        let dict = parse_private_dict(&private);

        assert_eq!(dict.len_iv, -1);
        assert_eq!(dict.subrs, vec![(0, &b"\x0b\x0c\x0d"[..]), (1, &b")"[..])]);
        assert_eq!(
            dict.charstrings,
            vec![
                (".notdef".to_owned(), &b"\x8b\x0e"[..]),
                ("space".to_owned(), &b"}]>)"[..])
            ]
        );
    }
}
