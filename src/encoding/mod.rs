//! Single-byte encodings: code to glyph name tables, `Differences` overlays,
//! and the translation of glyph names to Unicode

use std::{borrow::Cow, collections::HashMap};

use once_cell::sync::Lazy;

use crate::{
    cmap::{CMap, CMapBuilder, NOTDEF},
    macros::name_enum,
};

pub use glyph_list::{glyph_name_to_char, glyph_name_to_unicode};

pub mod glyph_list;
mod tables;

name_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum BuiltinEncoding {
        Standard = "StandardEncoding",
        MacRoman = "MacRomanEncoding",
        /// Accepted by name, but resolved to [`BuiltinEncoding::Standard`]
        MacExpert = "MacExpertEncoding",
        WinAnsi = "WinAnsiEncoding",
        PdfDoc = "PDFDocEncoding",
        Symbol = "Symbol",
        ZapfDingbats = "ZapfDingbats",
        /// Code `n` names the glyph `uniXXXX` for `n`
        Identity = "Identity",
    }
}

/// One entry of a `Differences` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DifferenceItem {
    /// Moves the running index to this code
    Code(i32),

    /// Names the glyph at the running index, then advances it
    Name(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    /// An empty name marks an undefined code
    names: Vec<Cow<'static, str>>,

    builtin: Option<BuiltinEncoding>,

    /// Whether every defined name resolves to exactly one Unicode character
    round_trip: bool,
}

static STANDARD: Lazy<Encoding> =
    Lazy::new(|| Encoding::from_table(BuiltinEncoding::Standard, &tables::STANDARD));
static MAC_ROMAN: Lazy<Encoding> =
    Lazy::new(|| Encoding::from_table(BuiltinEncoding::MacRoman, &tables::MAC_ROMAN));
static WIN_ANSI: Lazy<Encoding> =
    Lazy::new(|| Encoding::from_table(BuiltinEncoding::WinAnsi, &tables::WIN_ANSI));
static PDF_DOC: Lazy<Encoding> =
    Lazy::new(|| Encoding::from_table(BuiltinEncoding::PdfDoc, &tables::PDF_DOC));
static SYMBOL: Lazy<Encoding> =
    Lazy::new(|| Encoding::from_table(BuiltinEncoding::Symbol, &tables::SYMBOL));
static ZAPF_DINGBATS: Lazy<Encoding> =
    Lazy::new(|| Encoding::from_table(BuiltinEncoding::ZapfDingbats, &tables::ZAPF_DINGBATS));

static IDENTITY: Lazy<Encoding> = Lazy::new(|| {
    let names = (0..256u32)
        .map(|code| Cow::Owned(format!("uni{:04X}", code)))
        .collect();

    Encoding::new(names, Some(BuiltinEncoding::Identity))
});

impl Encoding {
    fn new(names: Vec<Cow<'static, str>>, builtin: Option<BuiltinEncoding>) -> Self {
        debug_assert_eq!(names.len(), 256);

        let round_trip = names
            .iter()
            .filter(|name| !name.is_empty())
            .all(|name| glyph_name_to_char(name).is_some());

        Self {
            names,
            builtin,
            round_trip,
        }
    }

    fn from_table(builtin: BuiltinEncoding, table: &'static [&'static str; 256]) -> Self {
        Self::new(
            table.iter().map(|&name| Cow::Borrowed(name)).collect(),
            Some(builtin),
        )
    }

    pub fn builtin(encoding: BuiltinEncoding) -> &'static Encoding {
        match encoding {
            BuiltinEncoding::Standard => &STANDARD,
            BuiltinEncoding::MacExpert => {
                log::debug!("MacExpertEncoding is not supported, using StandardEncoding");
                &STANDARD
            }
            BuiltinEncoding::MacRoman => &MAC_ROMAN,
            BuiltinEncoding::WinAnsi => &WIN_ANSI,
            BuiltinEncoding::PdfDoc => &PDF_DOC,
            BuiltinEncoding::Symbol => &SYMBOL,
            BuiltinEncoding::ZapfDingbats => &ZAPF_DINGBATS,
            BuiltinEncoding::Identity => &IDENTITY,
        }
    }

    /// A font program's own encoding, given as `(code, glyph name)` pairs
    pub fn from_names<S: Into<String>>(entries: impl IntoIterator<Item = (u8, S)>) -> Self {
        let mut names = vec![Cow::Borrowed(""); 256];

        for (code, name) in entries {
            names[usize::from(code)] = Cow::Owned(name.into());
        }

        Self::new(names, None)
    }

    /// Copies `base` and applies a `Differences` array on top. Codes outside
    /// 0..=255 skip the names that follow them
    pub fn with_differences(base: &Encoding, differences: &[DifferenceItem]) -> Self {
        let mut names = base.names.clone();
        let mut code: Option<usize> = None;

        for item in differences {
            match item {
                DifferenceItem::Code(n) => {
                    code = usize::try_from(*n).ok().filter(|&n| n < 256);

                    if code.is_none() {
                        log::debug!("ignoring out of range code in differences: {}", n);
                    }
                }
                DifferenceItem::Name(name) => {
                    if let Some(idx) = code {
                        names[idx] = Cow::Owned(name.clone());
                        code = Some(idx + 1).filter(|&n| n < 256);
                    }
                }
            }
        }

        Self::new(names, None)
    }

    /// The built-in table this encoding is, if it was not derived
    pub fn as_builtin(&self) -> Option<BuiltinEncoding> {
        self.builtin
    }

    pub fn get_name(&self, code: u8) -> Option<&str> {
        match &*self.names[usize::from(code)] {
            "" => None,
            name => Some(name),
        }
    }

    /// Lowest code naming `name`, or [`NOTDEF`]
    pub fn get_char(&self, name: &str) -> u16 {
        self.names
            .iter()
            .position(|n| n == name)
            .map_or(NOTDEF, |code| code as u16)
    }

    /// A CMap taking codes of this encoding to the codes of `target` that name
    /// the same glyph. A code keeps its value when `target` names it the same,
    /// otherwise it goes to the lowest `target` code with that name
    pub fn map_to(&self, target: &Encoding) -> CMap {
        let mut builder = CMapBuilder::new();

        for (code, name) in self.defined() {
            let target_code = if target.get_name(code as u8) == Some(name) {
                code
            } else {
                target.get_char(name)
            };

            if target_code != NOTDEF {
                builder.map(code, target_code);
            }
        }

        builder.build()
    }

    /// A ToUnicode CMap derived from the glyph names alone.
    ///
    /// Two codes guessing the same text means at least one of them maps away
    /// from its own value, and then the result is [`CMap::identity`]
    pub fn guess_to_unicode(&self) -> CMap {
        let mut builder = CMapBuilder::new();
        let mut seen: HashMap<String, u16> = HashMap::new();

        for (code, name) in self.defined() {
            let text = match glyph_name_to_unicode(name) {
                Some(text) => text,
                None => continue,
            };

            let units = text.encode_utf16().collect::<Vec<u16>>();

            if let Some(first) = seen.insert(text, code) {
                log::debug!(
                    "codes {:#04x} and {:#04x} guess the same text, using an identity ToUnicode",
                    first,
                    code
                );
                return CMap::identity();
            }

            builder.map_utf16(code, &units);
        }

        builder.build()
    }

    pub fn is_unicode_round_trip(&self) -> bool {
        self.round_trip
    }

    fn defined(&self) -> impl Iterator<Item = (u16, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(code, name)| (code as u16, &**name))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn win_ansi_differences() {
        let base = Encoding::builtin(BuiltinEncoding::from_str("WinAnsiEncoding").unwrap());
        let encoding = Encoding::with_differences(
            base,
            &[DifferenceItem::Code(65), DifferenceItem::Name("bullet".to_owned())],
        );

        assert_eq!(encoding.get_name(65), Some("bullet"));
        assert_eq!(encoding.get_char("bullet"), 65);
        assert_eq!(encoding.get_name(66), Some("B"));
        assert_eq!(base.get_name(65), Some("A"));
    }

    #[test]
    fn differences_use_running_index() {
        let encoding = Encoding::with_differences(
            Encoding::builtin(BuiltinEncoding::Standard),
            &[
                DifferenceItem::Code(1),
                DifferenceItem::Name("fi".to_owned()),
                DifferenceItem::Name("fl".to_owned()),
                DifferenceItem::Code(300),
                DifferenceItem::Name("Euro".to_owned()),
                DifferenceItem::Code(255),
                DifferenceItem::Name("a".to_owned()),
                DifferenceItem::Name("b".to_owned()),
            ],
        );

        assert_eq!(encoding.get_name(1), Some("fi"));
        assert_eq!(encoding.get_name(2), Some("fl"));
        assert_eq!(encoding.get_name(255), Some("a"));
        assert_eq!(encoding.get_char("Euro"), NOTDEF);
        assert!(encoding.as_builtin().is_none());
    }

    #[test]
    fn win_ansi_fills_gaps_with_bullets() {
        let encoding = Encoding::builtin(BuiltinEncoding::WinAnsi);

        for code in [0x7f, 0x81, 0x8d, 0x8f, 0x90, 0x9d, 0x95] {
            assert_eq!(encoding.get_name(code), Some("bullet"));
        }

        assert_eq!(encoding.get_char("bullet"), 0x7f);
        assert_eq!(encoding.get_name(0x1f), None);
        assert_eq!(encoding.get_name(0x80), Some("Euro"));
    }

    #[test]
    fn builtin_tables_round_trip() {
        for encoding in [
            BuiltinEncoding::Standard,
            BuiltinEncoding::MacRoman,
            BuiltinEncoding::WinAnsi,
            BuiltinEncoding::PdfDoc,
            BuiltinEncoding::Symbol,
            BuiltinEncoding::ZapfDingbats,
            BuiltinEncoding::Identity,
        ] {
            assert!(Encoding::builtin(encoding).is_unicode_round_trip(), "{:?}", encoding);
        }

        let custom = Encoding::from_names([(0x41, "A"), (0x42, "g17")]);
        assert!(!custom.is_unicode_round_trip());
    }

    #[test]
    fn mac_expert_resolves_to_standard() {
        let encoding = Encoding::builtin(BuiltinEncoding::from_str("MacExpertEncoding").unwrap());

        assert_eq!(encoding.as_builtin(), Some(BuiltinEncoding::Standard));
    }

    #[test]
    fn map_between_encodings() {
        let cmap = Encoding::builtin(BuiltinEncoding::WinAnsi)
            .map_to(Encoding::builtin(BuiltinEncoding::MacRoman));

        assert_eq!(cmap.to_selector(0x41), 0x41);
        // eacute
        assert_eq!(cmap.to_selector(0xe9), 0x8e);
        assert_eq!(cmap.to_selector(0x01), NOTDEF);
    }

    #[test]
    fn guesses_unicode_from_names() {
        let encoding = Encoding::from_names([(1, "f_f_i"), (2, "uni20AC"), (3, "Omega")]);
        let cmap = encoding.guess_to_unicode();

        assert_eq!(cmap.to_unicode(1).as_deref(), Some("ffi"));
        assert_eq!(cmap.to_unicode(2).as_deref(), Some("\u{20AC}"));
        assert_eq!(cmap.to_unicode(3).as_deref(), Some("\u{03A9}"));
        assert_eq!(cmap.to_unicode(4), None);
    }

    #[test]
    fn identity_names_are_uni() {
        let encoding = Encoding::builtin(BuiltinEncoding::Identity);

        assert_eq!(encoding.get_name(0x41), Some("uni0041"));
        assert_eq!(encoding.get_char("uni0041"), 0x41);
    }

    #[test]
    fn map_to_keeps_codes_named_alike() {
        let win_ansi = Encoding::builtin(BuiltinEncoding::WinAnsi);
        let cmap = win_ansi.map_to(win_ansi);

        // `space` and `bullet` each name several WinAnsi codes
        assert_eq!(cmap.to_selector(0x20), 0x20);
        assert_eq!(cmap.to_selector(0xa0), 0xa0);
        assert_eq!(cmap.to_selector(0x95), 0x95);
        assert_eq!(cmap.to_selector(0x81), 0x81);
    }

    #[test]
    fn colliding_names_guess_identity() {
        let encoding = Encoding::from_names([(0x41, "A"), (0x42, "A"), (0x43, "C")]);
        let cmap = encoding.guess_to_unicode();

        assert_eq!(cmap.to_unicode(0x42).as_deref(), Some("B"));
        assert_eq!(cmap.to_selector(0x43), 0x43);

        // names leaving their own value without colliding are kept
        let encoding = Encoding::from_names([(0x41, "A"), (0x61, "alpha")]);
        let cmap = encoding.guess_to_unicode();

        assert_eq!(cmap.to_unicode(0x61).as_deref(), Some("\u{03B1}"));
        assert_eq!(cmap.to_unicode(0x62), None);
    }
}
