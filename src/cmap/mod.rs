//! Mappings from (possibly multi-byte) character codes to glyph selectors and
//! to Unicode text

use std::{collections::HashMap, sync::Arc};

use once_cell::sync::OnceCell;

pub use builder::CMapBuilder;
pub use bundled::BundledCMaps;
pub use predefined::PredefinedCMapName;
pub use registry::{CMapRegistry, CMapResourceProvider};

mod builder;
mod bundled;
mod parse;
mod predefined;
mod registry;

/// The reserved "no glyph" selector
pub const NOTDEF: u16 = 0;

/// How the selectors of one segment are stored
#[derive(Debug, Clone, PartialEq)]
enum SegmentShape {
    /// Every code in the segment maps to the same selector
    Constant(u16),

    /// `selector = code + delta`
    Delta(i32),

    /// One selector per code
    Table(Box<[u16]>),
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    start: u16,

    /// Number of codes covered. Up to 0x10000, hence not a `u16`
    len: u32,

    shape: SegmentShape,
}

impl Segment {
    fn end(&self) -> u32 {
        u32::from(self.start) + self.len
    }

    fn contains(&self, code: u16) -> bool {
        code >= self.start && u32::from(code) < self.end()
    }

    fn get(&self, code: u16) -> u16 {
        match &self.shape {
            SegmentShape::Constant(selector) => *selector,
            SegmentShape::Delta(delta) => {
                u16::try_from(i32::from(code) + delta).unwrap_or(NOTDEF)
            }
            SegmentShape::Table(selectors) => selectors[usize::from(code - self.start)],
        }
    }
}

/// Byte length of codes starting with a given leading byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeLength {
    Undeclared,
    One,
    Two,
}

#[derive(Debug)]
pub struct CMap {
    name: Option<String>,
    writing_mode: u8,

    code_lengths: [CodeLength; 256],

    /// Sorted by start code, non-overlapping
    segments: Vec<Segment>,

    /// Codes that map to more than one UTF-16 unit
    strings: HashMap<u16, String>,

    base: Option<Arc<CMap>>,

    /// selector -> first code mapping to it
    inverse: OnceCell<HashMap<u16, u16>>,
}

impl CMap {
    /// Parses a CMap program. `base` is the fallback used for codes this CMap
    /// does not map; a `usecmap` operator in the program replaces it
    pub fn parse(
        bytes: &[u8],
        base: Option<Arc<CMap>>,
        registry: &CMapRegistry,
    ) -> anyhow::Result<CMap> {
        parse::CMapParser::new(bytes, registry, 0).parse(base)
    }

    /// Two-byte codes mapped to the same two-byte selector, as in `Identity-H`
    pub fn identity() -> CMap {
        Self::identity_with_mode("Identity-H", 0)
    }

    pub fn identity_vertical() -> CMap {
        Self::identity_with_mode("Identity-V", 1)
    }

    fn identity_with_mode(name: &str, writing_mode: u8) -> CMap {
        CMap {
            name: Some(name.to_owned()),
            writing_mode,
            code_lengths: [CodeLength::Two; 256],
            segments: vec![Segment {
                start: 0,
                len: 0x10000,
                shape: SegmentShape::Delta(0),
            }],
            strings: HashMap::new(),
            base: None,
            inverse: OnceCell::new(),
        }
    }

    /// Builds a CMap from runs of consecutive selectors, each starting at a base code
    pub fn from_segments<'a>(runs: impl IntoIterator<Item = (u16, &'a [u16])>) -> CMap {
        let mut builder = CMapBuilder::new();

        for (start, selectors) in runs {
            for (code, &selector) in (start..=u16::MAX).zip(selectors) {
                builder.map(code, selector);
            }
        }

        builder.build()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 0 for horizontal, 1 for vertical
    pub fn writing_mode(&self) -> u8 {
        self.writing_mode
    }

    pub fn base(&self) -> Option<&Arc<CMap>> {
        self.base.as_ref()
    }

    /// Selector for `code`, or [`NOTDEF`] when neither this CMap nor its base
    /// maps it
    pub fn to_selector(&self, code: u16) -> u16 {
        match self.own_selector(code) {
            NOTDEF => self
                .base
                .as_ref()
                .map_or(NOTDEF, |base| base.to_selector(code)),
            selector => selector,
        }
    }

    fn own_selector(&self, code: u16) -> u16 {
        let idx = self.segments.partition_point(|segment| segment.start <= code);

        match idx.checked_sub(1).map(|idx| &self.segments[idx]) {
            Some(segment) if segment.contains(code) => segment.get(code),
            _ => NOTDEF,
        }
    }

    /// Splits a byte string into codes using the code space ranges and maps
    /// each code
    pub fn to_selectors(&self, codes: &[u8]) -> Vec<u16> {
        self.decode(codes)
            .into_iter()
            .map(|code| self.to_selector(code))
            .collect()
    }

    /// Splits a byte string into character codes. Bytes outside every declared
    /// code space range, and every byte when no range is declared, form
    /// one-byte codes
    pub fn decode(&self, bytes: &[u8]) -> Vec<u16> {
        let mut codes = Vec::with_capacity(bytes.len());
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];

            match (self.code_length(b), bytes.get(i + 1)) {
                (2, Some(&next)) => {
                    codes.push(u16::from_be_bytes([b, next]));
                    i += 2;
                }
                _ => {
                    codes.push(u16::from(b));
                    i += 1;
                }
            }
        }

        codes
    }

    /// Number of bytes in a code starting with `leading_byte`
    pub fn code_length(&self, leading_byte: u8) -> usize {
        match self.code_lengths[usize::from(leading_byte)] {
            CodeLength::Two => 2,
            CodeLength::One | CodeLength::Undeclared => 1,
        }
    }

    /// Whether any code space range was declared, directly or through `usecmap`
    pub fn has_code_space(&self) -> bool {
        self.code_lengths
            .iter()
            .any(|length| *length != CodeLength::Undeclared)
    }

    /// The first code that maps to `selector`, or [`NOTDEF`] if none does
    pub fn from_selector(&self, selector: u16) -> u16 {
        self.inverse()
            .get(&selector)
            .copied()
            .unwrap_or(NOTDEF)
    }

    fn inverse(&self) -> &HashMap<u16, u16> {
        self.inverse.get_or_init(|| {
            let mut inverse = HashMap::new();

            for code in 0..=self.max_code() {
                inverse.entry(self.to_selector(code)).or_insert(code);
            }

            inverse
        })
    }

    fn max_code(&self) -> u16 {
        let own = self
            .segments
            .last()
            .map_or(0, |segment| (segment.end() - 1) as u16);
        let strings = self.strings.keys().copied().max().unwrap_or(0);
        let base = self.base.as_ref().map_or(0, |base| base.max_code());

        own.max(strings).max(base)
    }

    /// Unicode text for `code`: a multi-unit string mapping, then the selector
    /// read as a ligature or a single UTF-16 unit, then the base CMap
    pub fn to_unicode(&self, code: u16) -> Option<String> {
        if let Some(s) = self.strings.get(&code) {
            return Some(s.clone());
        }

        let selector = self.own_selector(code);

        if selector != NOTDEF {
            if let Some(ligature) = ligature(selector) {
                return Some(ligature.to_owned());
            }

            if let Some(c) = char::from_u32(u32::from(selector)) {
                return Some(c.to_string());
            }
        }

        self.base.as_ref().and_then(|base| base.to_unicode(code))
    }

    /// Whether `code` maps to anything, here or in the base CMap
    pub fn is_mapped(&self, code: u16) -> bool {
        self.strings.contains_key(&code) || self.to_selector(code) != NOTDEF
    }
}

/// Decomposition of the Latin ligatures in the Alphabetic Presentation Forms block
pub fn ligature(selector: u16) -> Option<&'static str> {
    Some(match selector {
        0xFB00 => "ff",
        0xFB01 => "fi",
        0xFB02 => "fl",
        0xFB03 => "ffi",
        0xFB04 => "ffl",
        0xFB05 => "\u{17F}t",
        0xFB06 => "st",
        _ => return None,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identity_maps_two_byte_codes() {
        let cmap = CMap::identity();

        assert_eq!(cmap.to_selectors(&[0x12, 0x34, 0x00, 0x41]), vec![0x1234, 0x41]);
        assert_eq!(cmap.from_selector(0xbeef), 0xbeef);
        assert_eq!(cmap.to_unicode(0x41).as_deref(), Some("A"));
    }

    #[test]
    fn lookup_falls_back_to_base() {
        let base = Arc::new(CMap::from_segments([(0x20, &[1, 2, 3][..])]));

        let mut builder = CMapBuilder::new();
        builder.map(0x21, 99);
        builder.set_base(Arc::clone(&base));
        let cmap = builder.build();

        assert_eq!(cmap.to_selector(0x20), 1);
        assert_eq!(cmap.to_selector(0x21), 99);
        assert_eq!(cmap.to_selector(0x22), 3);
        assert_eq!(cmap.to_selector(0x23), NOTDEF);
    }

    #[test]
    fn from_selector_round_trips_through_many_to_one() {
        let cmap = CMap::from_segments([(0x10, &[5, 5, 6, 0, 7][..]), (0x300, &[6][..])]);

        for code in 0..=0x3ff {
            let selector = cmap.to_selector(code);
            assert_eq!(cmap.to_selector(cmap.from_selector(selector)), selector);
        }

        assert_eq!(cmap.from_selector(5), 0x10);
        assert_eq!(cmap.from_selector(6), 0x12);
    }

    #[test]
    fn to_unicode_uses_ligature_table() {
        let cmap = CMap::from_segments([(0x01, &[0xFB01, 0xFB03, 0x41][..])]);

        assert_eq!(cmap.to_unicode(0x01).as_deref(), Some("fi"));
        assert_eq!(cmap.to_unicode(0x02).as_deref(), Some("ffi"));
        assert_eq!(cmap.to_unicode(0x03).as_deref(), Some("A"));
        assert_eq!(cmap.to_unicode(0x04), None);
    }

    #[test]
    fn undeclared_code_space_is_one_byte() {
        let cmap = CMap::from_segments([(0x41, &[1, 2][..])]);

        assert!(!cmap.has_code_space());
        assert_eq!(cmap.to_selectors(b"AB"), vec![1, 2]);
    }
}
