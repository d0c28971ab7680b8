use std::{borrow::Cow, collections::HashMap};

use crate::{
    error::FontError,
    parse_binary::{BinaryParser, ByteReader, Fixed},
};

/// Glyph names of the standard Macintosh character set, in the order `post`
/// formats 1 and 2 index them
pub(super) static MACINTOSH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde", "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis", "ntilde",
    "oacute", "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave", "ucircumflex",
    "udieresis", "dagger", "degree", "cent", "sterling", "section", "bullet", "paragraph",
    "germandbls", "registered", "copyright", "trademark", "acute", "dieresis", "notequal", "AE",
    "Oslash", "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu", "partialdiff",
    "summation", "product", "pi", "integral", "ordfeminine", "ordmasculine", "Omega", "ae",
    "oslash", "questiondown", "exclamdown", "logicalnot", "radical", "florin", "approxequal",
    "Delta", "guillemotleft", "guillemotright", "ellipsis", "nonbreakingspace", "Agrave", "Atilde",
    "Otilde", "OE", "oe", "endash", "emdash", "quotedblleft", "quotedblright", "quoteleft",
    "quoteright", "divide", "lozenge", "ydieresis", "Ydieresis", "fraction", "currency",
    "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered", "quotesinglbase",
    "quotedblbase", "perthousand", "Acircumflex", "Ecircumflex", "Aacute", "Edieresis", "Egrave",
    "Iacute", "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex", "apple", "Ograve",
    "Uacute", "Ucircumflex", "Ugrave", "dotlessi", "circumflex", "tilde", "macron", "breve",
    "dotaccent", "ring", "cedilla", "hungarumlaut", "ogonek", "caron", "Lslash", "lslash",
    "Scaron", "scaron", "Zcaron", "zcaron", "brokenbar", "Eth", "eth", "Yacute", "yacute", "Thorn",
    "thorn", "minus", "multiply", "onesuperior", "twosuperior", "threesuperior", "onehalf",
    "onequarter", "threequarters", "franc", "Gbreve", "gbreve", "Idotaccent", "Scedilla",
    "scedilla", "Cacute", "cacute", "Ccaron", "ccaron", "dcroat",
];

/// Glyph names from `post`, where the version carries them
#[derive(Debug, Clone)]
pub struct PostTable {
    pub italic_angle: Fixed,
    pub is_fixed_pitch: bool,
    names: Vec<Cow<'static, str>>,
    by_name: HashMap<Cow<'static, str>, u16>,
}

impl PostTable {
    pub fn parse(data: &[u8], num_glyphs: u16) -> anyhow::Result<Self> {
        let mut reader = ByteReader::new(data);

        let version = reader.parse_u32()?;
        let italic_angle = reader.parse_fixed()?;
        let _underline_position = reader.parse_i16()?;
        let _underline_thickness = reader.parse_i16()?;
        let is_fixed_pitch = reader.parse_u32()? != 0;
        reader.skip(16)?;

        let names = match version {
            0x0001_0000 => MACINTOSH_NAMES
                .iter()
                .take(usize::from(num_glyphs))
                .map(|&name| Cow::Borrowed(name))
                .collect(),
            0x0002_0000 => parse_format_2(&mut reader)?,
            0x0002_5000 => {
                log::debug!("post format 2.5 is deprecated, ignoring glyph names");
                Vec::new()
            }
            0x0003_0000 => Vec::new(),
            0x0004_0000 => {
                log::debug!("post format 4 is not supported");
                Vec::new()
            }
            version => anyhow::bail!(FontError::UnsupportedVersion {
                table: "post",
                version,
            }),
        };

        let mut by_name = HashMap::with_capacity(names.len());
        for (gid, name) in names.iter().enumerate() {
            by_name.entry(name.clone()).or_insert(gid as u16);
        }

        Ok(Self {
            italic_angle,
            is_fixed_pitch,
            names,
            by_name,
        })
    }

    pub fn has_names(&self) -> bool {
        !self.names.is_empty()
    }

    pub fn glyph_name(&self, gid: u16) -> Option<&str> {
        self.names.get(usize::from(gid)).map(|name| &**name)
    }

    /// Lowest glyph with the given name
    pub fn glyph_index(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }
}

/// Indices below 258 select a Macintosh name, the rest a Pascal string that
/// follows the index array
fn parse_format_2(reader: &mut ByteReader) -> anyhow::Result<Vec<Cow<'static, str>>> {
    let num_glyphs = reader.parse_u16()?;

    let mut indices = Vec::with_capacity(usize::from(num_glyphs));
    for _ in 0..num_glyphs {
        indices.push(reader.parse_u16()?);
    }

    let mut strings = Vec::new();
    while !reader.at_end() {
        match reader.parse_pascal_string() {
            Ok(s) => strings.push(s),
            Err(..) => {
                log::warn!("truncated post glyph name");
                break;
            }
        }
    }

    Ok(indices
        .into_iter()
        .map(|idx| match MACINTOSH_NAMES.get(usize::from(idx)) {
            Some(&name) => Cow::Borrowed(name),
            None => match strings.get(usize::from(idx) - MACINTOSH_NAMES.len()) {
                Some(s) => Cow::Owned(s.clone()),
                None => Cow::Borrowed(""),
            },
        })
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    fn header(version: u32) -> Vec<u8> {
        let mut out = version.to_be_bytes().to_vec();
        out.extend_from_slice(&[0; 28]);
        out
    }

    #[test]
    fn format_1_uses_macintosh_order() {
        let post = PostTable::parse(&header(0x0001_0000), 300).unwrap();

        assert_eq!(post.glyph_name(3), Some("space"));
        assert_eq!(post.glyph_index("A"), Some(36));
        assert_eq!(post.glyph_name(258), None);
    }

    #[test]
    fn format_2_custom_names() {
        let mut data = header(0x0002_0000);
        data.extend_from_slice(&4u16.to_be_bytes());
        for idx in [0u16, 258, 36, 259] {
            data.extend_from_slice(&idx.to_be_bytes());
        }
        data.push(5);
        data.extend_from_slice(b"f_f_i");
        data.push(7);
        data.extend_from_slice(b"uni20AC");

        let post = PostTable::parse(&data, 4).unwrap();

        assert_eq!(post.glyph_name(0), Some(".notdef"));
        assert_eq!(post.glyph_name(1), Some("f_f_i"));
        assert_eq!(post.glyph_index("A"), Some(2));
        assert_eq!(post.glyph_index("uni20AC"), Some(3));
    }

    #[test]
    fn format_3_has_no_names() {
        let post = PostTable::parse(&header(0x0003_0000), 10).unwrap();

        assert!(!post.has_names());
        assert_eq!(post.glyph_index("A"), None);
    }
}
