//! Fonts as a page interpreter uses them: a font program plus the encoding,
//! widths and Unicode mapping a document assigns to it

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::{
    cff::CffFont,
    cmap::{CMap, CMapRegistry, CMapResourceProvider, NOTDEF},
    data_structures::Matrix,
    encoding::{glyph_name_to_unicode, BuiltinEncoding, Encoding},
    error::{is_retry_as_open_type, FontError},
    macros::name_enum,
    sfnt::{SfntVersion, TableDirectory},
    true_type::TrueTypeFont,
    type1::Type1Font,
};

pub use self::{
    cache::GlyphCache,
    cid::{CidToGidMap, CidWidths},
    descriptor::FontFlags,
    encoding::EncodingSpec,
    glyph::Glyph,
    open_type::OpenTypeFont,
    type0::{CidFontProgram, Type0Font},
    type3::Type3Font,
};

pub(crate) mod cache;
mod cid;
mod descriptor;
mod encoding;
mod glyph;
mod open_type;
mod type0;
mod type3;

name_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FontFormat {
        /// sfnt with `glyf` outlines
        TrueType = "TrueType",

        /// sfnt with `CFF ` outlines
        OpenType = "OpenType",

        /// A bare CFF program
        CffType1 = "CFF",

        /// A PFA or PFB program
        Type1 = "Type1",

        /// Glyphs drawn by content streams
        Type3 = "Type3",

        /// A composite font over a CIDFont
        Type0 = "Type0",
    }
}

impl FontFormat {
    /// Recognizes a font program by its first bytes
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x00, 0x01, 0x00, 0x00, ..] | [b't', b'r', b'u', b'e', ..] | [b't', b't', b'c', b'f', ..] => {
                Some(Self::TrueType)
            }
            [b'O', b'T', b'T', b'O', ..] => Some(Self::OpenType),
            [0x80, 0x01, ..] | [b'%', b'!', ..] => Some(Self::Type1),
            // major version 1, header size and offset size
            [1, _, 4..=255, 1..=4, ..] => Some(Self::CffType1),
            // resource-fork wrapped sfnt
            _ => match TableDirectory::parse(bytes).ok()?.version {
                SfntVersion::TrueType => Some(Self::TrueType),
                SfntVersion::OpenType => Some(Self::OpenType),
            },
        }
    }
}

/// `Widths` of a simple font, in thousandths of text space
#[derive(Debug, Clone, PartialEq)]
pub struct Widths {
    first_char: u16,
    widths: Vec<f32>,

    /// Used for codes outside `first_char..first_char + widths.len()`
    missing_width: f32,
}

impl Widths {
    pub fn new(first_char: u16, widths: Vec<f32>, missing_width: f32) -> Self {
        Self {
            first_char,
            widths,
            missing_width,
        }
    }

    pub fn get(&self, code: u16) -> f32 {
        code.checked_sub(self.first_char)
            .and_then(|idx| self.widths.get(usize::from(idx)))
            .copied()
            .unwrap_or(self.missing_width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontOptions {
    /// Upper bound on the number of built glyphs each font keeps
    pub cache_capacity: usize,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            cache_capacity: GlyphCache::DEFAULT_CAPACITY,
        }
    }
}

static GLOBAL_RESOURCES: Lazy<FontResources> = Lazy::new(|| FontResources { cmaps: None });

/// Shared tables fonts are resolved against: the built-in encodings and the
/// predefined CMaps
#[derive(Debug)]
pub struct FontResources {
    /// `None` for the process-wide registry
    cmaps: Option<CMapRegistry>,
}

impl FontResources {
    pub fn global() -> &'static FontResources {
        &GLOBAL_RESOURCES
    }

    /// Resources whose predefined CMaps come from `provider`
    pub fn with_provider(provider: Arc<dyn CMapResourceProvider>) -> Self {
        Self {
            cmaps: Some(CMapRegistry::with_provider(provider)),
        }
    }

    pub fn cmap_registry(&self) -> &CMapRegistry {
        match &self.cmaps {
            Some(cmaps) => cmaps,
            None => CMapRegistry::global(),
        }
    }

    pub fn encoding(&self, encoding: BuiltinEncoding) -> &'static Encoding {
        Encoding::builtin(encoding)
    }

    /// A predefined CMap by name, identity when it cannot be found
    pub fn predefined_cmap(&self, name: &str) -> Arc<CMap> {
        self.cmap_registry().resolve(name)
    }

    /// An embedded CMap or ToUnicode program, with `usecmap` resolved
    /// against the predefined CMaps
    pub fn parse_cmap(&self, bytes: &[u8]) -> anyhow::Result<Arc<CMap>> {
        Ok(Arc::new(CMap::parse(bytes, None, self.cmap_registry())?))
    }
}

/// State shared by every kind of font
#[derive(Debug, Clone)]
pub struct FontCommon {
    size: f32,
    flags: FontFlags,
    encoding: Option<Arc<Encoding>>,
    to_unicode: Option<Arc<CMap>>,
    widths: Option<Arc<Widths>>,
}

impl Default for FontCommon {
    fn default() -> Self {
        Self {
            size: 1.0,
            flags: FontFlags::default(),
            encoding: None,
            to_unicode: None,
            widths: None,
        }
    }
}

impl FontCommon {
    /// Name of the glyph that the document's encoding assigns to `code`
    fn glyph_name(&self, code: u16) -> Option<&str> {
        self.encoding.as_ref()?.get_name(u8::try_from(code).ok()?)
    }
}

#[derive(Debug, Clone)]
pub enum Font {
    TrueType {
        common: FontCommon,
        program: Arc<TrueTypeFont>,
    },
    OpenType {
        common: FontCommon,
        program: Arc<OpenTypeFont>,
    },
    CffType1 {
        common: FontCommon,
        program: Arc<CffFont>,
    },
    Type1 {
        common: FontCommon,
        program: Arc<Type1Font>,
    },
    Type3 {
        common: FontCommon,
        program: Arc<Type3Font>,
    },
    Type0 {
        common: FontCommon,
        program: Arc<Type0Font>,
    },
}

impl Font {
    /// Parses a simple font's program, recognizing the format from its bytes
    pub fn parse(data: Arc<[u8]>, options: &FontOptions) -> anyhow::Result<Self> {
        Self::parse_at(data, 0, options)
    }

    /// Like [`Self::parse`], selecting the `index`th font of a collection
    pub fn parse_at(data: Arc<[u8]>, index: u32, options: &FontOptions) -> anyhow::Result<Self> {
        let capacity = options.cache_capacity;
        let common = FontCommon::default();

        let format = match FontFormat::detect(&data) {
            Some(format) => format,
            None => {
                let found = match data.get(..4) {
                    Some(&[a, b, c, d]) => u32::from_be_bytes([a, b, c, d]),
                    _ => 0,
                };

                anyhow::bail!(FontError::UnknownFormat { found })
            }
        };

        log::debug!("parsing {} font program of {} bytes", format.as_str(), data.len());

        Ok(match format {
            FontFormat::TrueType => match TrueTypeFont::parse_at(Arc::clone(&data), index) {
                Ok(font) => Self::TrueType {
                    common,
                    program: Arc::new(font.with_cache_capacity(capacity)),
                },
                Err(err) if is_retry_as_open_type(&err) => {
                    log::debug!("font has CFF outlines, parsing as OpenType");
                    Self::OpenType {
                        common,
                        program: Arc::new(
                            OpenTypeFont::parse_at(&data, index)?.with_cache_capacity(capacity),
                        ),
                    }
                }
                Err(err) => return Err(err),
            },
            FontFormat::OpenType => Self::OpenType {
                common,
                program: Arc::new(
                    OpenTypeFont::parse_at(&data, index)?.with_cache_capacity(capacity),
                ),
            },
            FontFormat::CffType1 => Self::CffType1 {
                common,
                program: Arc::new(CffFont::parse(data)?.with_cache_capacity(capacity)),
            },
            FontFormat::Type1 => Self::Type1 {
                common,
                program: Arc::new(Type1Font::parse(&data)?.with_cache_capacity(capacity)),
            },
            FontFormat::Type3 | FontFormat::Type0 => {
                anyhow::bail!(FontError::invalid("not a font program format"))
            }
        })
    }

    pub fn type3(font: Type3Font) -> Self {
        Self::Type3 {
            common: FontCommon::default(),
            program: Arc::new(font),
        }
    }

    pub fn type0(font: Type0Font) -> Self {
        Self::Type0 {
            common: FontCommon::default(),
            program: Arc::new(font),
        }
    }

    fn common(&self) -> &FontCommon {
        match self {
            Self::TrueType { common, .. }
            | Self::OpenType { common, .. }
            | Self::CffType1 { common, .. }
            | Self::Type1 { common, .. }
            | Self::Type3 { common, .. }
            | Self::Type0 { common, .. } => common,
        }
    }

    fn common_mut(&mut self) -> &mut FontCommon {
        match self {
            Self::TrueType { common, .. }
            | Self::OpenType { common, .. }
            | Self::CffType1 { common, .. }
            | Self::Type1 { common, .. }
            | Self::Type3 { common, .. }
            | Self::Type0 { common, .. } => common,
        }
    }

    pub fn format(&self) -> FontFormat {
        match self {
            Self::TrueType { .. } => FontFormat::TrueType,
            Self::OpenType { .. } => FontFormat::OpenType,
            Self::CffType1 { .. } => FontFormat::CffType1,
            Self::Type1 { .. } => FontFormat::Type1,
            Self::Type3 { .. } => FontFormat::Type3,
            Self::Type0 { .. } => FontFormat::Type0,
        }
    }

    pub fn flags(&self) -> FontFlags {
        self.common().flags
    }

    pub fn size(&self) -> f32 {
        self.common().size
    }

    pub fn num_glyphs(&self) -> usize {
        match self {
            Self::TrueType { program, .. } => program.num_glyphs(),
            Self::OpenType { program, .. } => program.cff().num_glyphs(),
            Self::CffType1 { program, .. } => program.num_glyphs(),
            Self::Type1 { program, .. } => program.num_glyphs(),
            Self::Type3 { program, .. } => program.num_glyphs(),
            Self::Type0 { program, .. } => program.num_glyphs(),
        }
    }

    /// Maps glyph space to text space at a size of 1
    pub fn font_matrix(&self) -> Matrix {
        match self {
            Self::TrueType { program, .. } => {
                let scale = 1.0 / f32::from(program.units_per_em());
                Matrix::new_scale(scale, scale)
            }
            Self::OpenType { program, .. } => program.cff().font_matrix(),
            Self::CffType1 { program, .. } => program.font_matrix(),
            Self::Type1 { program, .. } => program.font_matrix(),
            Self::Type3 { program, .. } => program.font_matrix(),
            Self::Type0 { program, .. } => program.font_matrix(),
        }
    }

    /// Glyph space to text space, scaled by the font size
    pub fn glyph_matrix(&self) -> Matrix {
        let size = self.size();
        self.font_matrix() * Matrix::new_scale(size, size)
    }

    /// Splits a string into character codes: by the code space of a composite
    /// font's CMap, else one byte per code
    pub fn decode(&self, bytes: &[u8]) -> Vec<u16> {
        match self {
            Self::Type0 { program, .. } => program.cmap().decode(bytes),
            _ => bytes.iter().map(|&b| u16::from(b)).collect(),
        }
    }

    /// Glyph index for `code`, [`NOTDEF`] when the font has no glyph for it.
    /// Type 3 fonts have no glyph indices
    pub fn glyph_id(&self, code: u16) -> u16 {
        match self {
            Self::TrueType { common, program } => {
                // nonsymbolic fonts look glyphs up by name, symbolic ones by
                // code through their own cmap
                if !common.flags.is_symbolic() {
                    let by_name = common
                        .glyph_name(code)
                        .and_then(|name| program.glyph_index_for_name(name));

                    if let Some(gid) = by_name {
                        return gid;
                    }
                }

                program
                    .preferred_cmap()
                    .map_or(NOTDEF, |cmap| cmap.to_selector(code))
            }
            Self::OpenType { common, program } => {
                let by_name = common
                    .glyph_name(code)
                    .and_then(|name| program.cff().gid_for_name(name));

                match (by_name, program.cmap()) {
                    (Some(gid), _) => gid,
                    (None, Some(cmap)) => cmap.to_selector(code),
                    (None, None) => u8::try_from(code)
                        .map_or(NOTDEF, |code| program.cff().gid_for_code(code)),
                }
            }
            Self::CffType1 { common, program } => match &common.encoding {
                Some(..) => common
                    .glyph_name(code)
                    .and_then(|name| program.gid_for_name(name))
                    .unwrap_or(NOTDEF),
                None => u8::try_from(code).map_or(NOTDEF, |code| program.gid_for_code(code)),
            },
            Self::Type1 { program, .. } => self
                .glyph_name(code)
                .and_then(|name| program.glyph_index(name))
                .unwrap_or(NOTDEF),
            Self::Type3 { .. } => NOTDEF,
            Self::Type0 { program, .. } => program.gid_for_cid(program.cid(code)),
        }
    }

    /// Name of the glyph `code` selects, when the font names its glyphs
    pub fn glyph_name(&self, code: u16) -> Option<&str> {
        let common = self.common();

        if let Some(name) = common.glyph_name(code) {
            return Some(name);
        }

        match self {
            Self::Type1 { program, .. } => program.encoding().get_name(u8::try_from(code).ok()?),
            Self::CffType1 { program, .. } => program.glyph_name(self.glyph_id(code)),
            Self::TrueType { program, .. } => program.glyph_name(self.glyph_id(code)),
            Self::OpenType { program, .. } => program.cff().glyph_name(self.glyph_id(code)),
            Self::Type3 { .. } | Self::Type0 { .. } => None,
        }
    }

    /// The outline for `code` in glyph space, with its advance in glyph
    /// space units. Missing glyphs give the `.notdef` glyph or an empty one
    pub fn code_to_glyph_outline(&self, code: u16) -> Arc<Glyph> {
        match self {
            Self::Type1 { program, .. } => {
                program.glyph_by_name(self.glyph_name(code).unwrap_or(".notdef"))
            }
            Self::Type3 { .. } => Arc::new(Glyph::empty()),
            _ => {
                let gid = self.glyph_id(code);

                match self {
                    Self::TrueType { program, .. } => program.glyph(gid),
                    Self::OpenType { program, .. } => program.cff().glyph(gid),
                    Self::CffType1 { program, .. } => program.glyph(gid),
                    Self::Type0 { program, .. } => program.glyph(gid),
                    Self::Type1 { .. } | Self::Type3 { .. } => Arc::new(Glyph::empty()),
                }
            }
        }
    }

    /// Advance of `code` in thousandths of text space. `Widths` take
    /// precedence over the font program's own metrics
    pub fn advance_width(&self, code: u16) -> f32 {
        if let Self::Type0 { program, .. } = self {
            return program.width(code);
        }

        if let Some(widths) = &self.common().widths {
            return widths.get(code);
        }

        match self {
            Self::TrueType { program, .. } => {
                let advance = program.advance_width(self.glyph_id(code));
                f32::from(advance) * 1000.0 / f32::from(program.units_per_em())
            }
            Self::OpenType { program, .. } => {
                let gid = self.glyph_id(code);

                match program.advance_width(gid) {
                    Some(advance) => f32::from(advance) * 1000.0 / f32::from(program.units_per_em()),
                    None => program.cff().glyph(gid).advance * program.cff().font_matrix().a * 1000.0,
                }
            }
            Self::CffType1 { .. } | Self::Type1 { .. } => {
                self.code_to_glyph_outline(code).advance * self.font_matrix().a * 1000.0
            }
            Self::Type3 { .. } | Self::Type0 { .. } => 0.0,
        }
    }

    /// Text for `code`: the ToUnicode CMap, then the glyph's name
    pub fn to_unicode(&self, code: u16) -> Option<String> {
        if let Some(text) = self
            .common()
            .to_unicode
            .as_ref()
            .and_then(|cmap| cmap.to_unicode(code))
        {
            return Some(text);
        }

        glyph_name_to_unicode(self.glyph_name(code)?)
    }

    /// Whether the font has a real glyph for `code`
    pub fn can_display(&self, code: u16) -> bool {
        match self {
            Self::Type1 { program, .. } => self
                .glyph_name(code)
                .map_or(false, |name| program.has_glyph(name)),
            Self::Type3 { program, .. } => self
                .common()
                .glyph_name(code)
                .map_or(false, |name| program.has_glyph(name)),
            _ => {
                let gid = self.glyph_id(code);
                gid != NOTDEF && usize::from(gid) < self.num_glyphs()
            }
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.common_mut().size = size;
        self
    }

    pub fn with_flags(mut self, flags: FontFlags) -> Self {
        self.common_mut().flags = flags;
        self
    }

    /// Replaces the encoding. A differences encoding without a base applies
    /// to the program's built-in encoding
    pub fn with_encoding(mut self, spec: &EncodingSpec) -> Self {
        let encoding = match &self {
            Self::Type1 { program, .. } => spec.resolve(Some(program.encoding())),
            Self::CffType1 { program, .. } => {
                spec.resolve(Some(&Encoding::from_names(program.builtin_encoding())))
            }
            _ => spec.resolve(None),
        };

        self.common_mut().encoding = Some(encoding);
        self
    }

    pub fn with_to_unicode(mut self, to_unicode: Arc<CMap>) -> Self {
        self.common_mut().to_unicode = Some(to_unicode);
        self
    }

    pub fn with_widths(mut self, widths: Widths) -> Self {
        self.common_mut().widths = Some(Arc::new(widths));
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{
        cff::{charstring::test::charstring, test::build_cff},
        encoding::DifferenceItem,
        geometry::Point,
        sfnt::{test::build_sfnt, TableTag},
        true_type,
    };

    fn square(width: i32, size: i32) -> Vec<u8> {
        charstring(&[
            (&[width, 0, 0], &[21]),
            (&[size], &[6]),
            (&[size], &[7]),
            (&[-size], &[6]),
            (&[], &[14]),
        ])
    }

    /// "A" (SID 34) at gid 1 with advance 150, "B" (SID 35) at gid 2 with
    /// advance 300
    fn cff_program() -> Vec<u8> {
        let notdef = charstring(&[(&[], &[14])]);
        build_cff(&[&notdef, &square(50, 100), &square(200, 200)], &[34, 35], &[])
    }

    fn parse(data: Vec<u8>) -> Font {
        Font::parse(Arc::from(data), &FontOptions::default()).unwrap()
    }

    #[test]
    fn detects_formats() {
        assert_eq!(FontFormat::detect(&cff_program()), Some(FontFormat::CffType1));
        assert_eq!(FontFormat::detect(b"%!PS-AdobeFont-1.0"), Some(FontFormat::Type1));
        assert_eq!(FontFormat::detect(b"OTTO\0\0"), Some(FontFormat::OpenType));
        assert_eq!(FontFormat::detect(b"wOFF\0\0\0\0"), None);

        let err = Font::parse(Arc::from(&b"wOFF\0\0\0\0"[..]), &FontOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FontError>(),
            Some(FontError::UnknownFormat { found: 0x774F_4646 })
        ));
    }

    #[test]
    fn cff_font_through_builtin_encoding() {
        let font = parse(cff_program());

        assert_eq!(font.format(), FontFormat::CffType1);
        assert_eq!(font.glyph_id(u16::from(b'B')), 2);
        assert!((font.advance_width(u16::from(b'A')) - 150.0).abs() < 1e-3);
        assert_eq!(font.to_unicode(u16::from(b'A')).as_deref(), Some("A"));
        assert!(font.can_display(u16::from(b'A')));
        assert!(!font.can_display(u16::from(b'C')));
        assert_eq!(
            font.code_to_glyph_outline(u16::from(b'B'))
                .outline
                .bounding_box()
                .max,
            Point::new(200.0, 200.0)
        );
    }

    #[test]
    fn differences_remap_codes() {
        let font = parse(cff_program()).with_encoding(&EncodingSpec::Differences {
            base: None,
            differences: vec![DifferenceItem::Code(66), DifferenceItem::Name("A".to_owned())],
        });

        assert_eq!(font.glyph_id(u16::from(b'A')), 1);
        assert_eq!(font.glyph_id(u16::from(b'B')), 1);
        assert_eq!(font.glyph_name(u16::from(b'B')), Some("A"));
    }

    #[test]
    fn widths_and_to_unicode_override_the_program() {
        let to_unicode = FontResources::global()
            .parse_cmap(
                b"1 begincodespacerange <00> <ff> endcodespacerange \
                  1 beginbfchar <41> <0058> endbfchar",
            )
            .unwrap();

        let font = parse(cff_program())
            .with_widths(Widths::new(65, vec![610.0], 250.0))
            .with_to_unicode(to_unicode)
            .with_size(12.0);

        assert_eq!(font.advance_width(65), 610.0);
        assert_eq!(font.advance_width(66), 250.0);
        assert_eq!(font.to_unicode(65).as_deref(), Some("X"));
        assert_eq!(font.to_unicode(66).as_deref(), Some("B"));
        assert!((font.glyph_matrix().a - 0.012).abs() < 1e-6);
    }

    #[test]
    fn true_type_with_cff_outlines_is_reparsed() {
        let cff = cff_program();
        let data = build_sfnt(0x0001_0000, &[(TableTag::CFF, &cff)]);

        let font = parse(data);

        assert_eq!(font.format(), FontFormat::OpenType);
        assert_eq!(font.num_glyphs(), 3);
        assert_eq!(font.glyph_id(u16::from(b'A')), 1);
    }

    #[test]
    fn open_type_takes_cache_capacity() {
        let cff = cff_program();
        let data = build_sfnt(u32::from_be_bytes(*b"OTTO"), &[(TableTag::CFF, &cff)]);
        let options = FontOptions { cache_capacity: 7 };

        let font = Font::parse(Arc::from(data), &options).unwrap();

        match font {
            Font::OpenType { program, .. } => assert_eq!(program.cff().cache_capacity(), 7),
            _ => panic!("expected an OpenType font"),
        }
    }

    #[test]
    fn resources_use_their_own_registry() {
        struct Empty;

        impl CMapResourceProvider for Empty {
            fn cmap_program(&self, _: &str) -> Option<Vec<u8>> {
                None
            }
        }

        let resources = FontResources::with_provider(Arc::new(Empty));

        assert!(!std::ptr::eq(resources.cmap_registry(), CMapRegistry::global()));
        assert!(std::ptr::eq(
            FontResources::global().cmap_registry(),
            CMapRegistry::global()
        ));
    }

    #[test]
    fn true_type_by_name_and_by_code() {
        let data = true_type::test::build_font();

        let font = parse(data.clone()).with_encoding(&EncodingSpec::Builtin(BuiltinEncoding::WinAnsi));
        assert_eq!(font.format(), FontFormat::TrueType);
        assert_eq!(font.glyph_id(u16::from(b'B')), 2);
        // 600 units at 2048 per em
        assert_eq!(font.advance_width(u16::from(b'A')), 600.0 * 1000.0 / 2048.0);

        let symbolic = parse(data).with_flags(FontFlags::new(FontFlags::SYMBOLIC));
        assert_eq!(symbolic.glyph_id(u16::from(b'A')), 1);
        assert!(!symbolic.can_display(u16::from(b'C')));
    }

    #[test]
    fn composite_font_over_cff() {
        let descendant = CidFontProgram::parse(Arc::from(cff_program()), &FontOptions::default())
            .unwrap();
        let type0 = Type0Font::new(FontResources::global().predefined_cmap("Identity-H"), descendant)
            .with_widths(CidWidths::new(1000.0).with_run(2, &[500.0]));

        let font = Font::type0(type0);

        assert_eq!(font.decode(&[0x00, 0x02, 0x00, 0x01]), vec![2, 1]);
        assert_eq!(font.glyph_id(2), 2);
        assert_eq!(font.advance_width(2), 500.0);
        assert_eq!(font.advance_width(1), 1000.0);
        assert!(!font.code_to_glyph_outline(1).is_empty());
        assert_eq!(font.to_unicode(1), None);
    }

    #[test]
    fn composite_font_over_true_type_maps_cids() {
        let descendant =
            CidFontProgram::parse(Arc::from(true_type::test::build_font()), &FontOptions::default())
                .unwrap();
        let type0 = Type0Font::new(FontResources::global().predefined_cmap("Identity-H"), descendant)
            .with_cid_to_gid(CidToGidMap::from_bytes(&[0, 0, 0, 2, 0, 1]));

        let font = Font::type0(type0);

        assert_eq!(font.glyph_id(1), 2);
        assert_eq!(font.glyph_id(7), NOTDEF);
        assert_eq!(
            font.code_to_glyph_outline(1).outline.bounding_box().max,
            Point::new(100.0, 700.0)
        );
        assert_eq!(font.advance_width(1), 1000.0);
    }

    #[test]
    fn type3_has_no_outlines() {
        let font = Font::type3(Type3Font::new(Matrix::default_font_matrix(), ["a"]))
            .with_encoding(&EncodingSpec::Differences {
                base: None,
                differences: vec![DifferenceItem::Code(1), DifferenceItem::Name("a".to_owned())],
            })
            .with_widths(Widths::new(1, vec![700.0], 0.0));

        assert!(font.can_display(1));
        assert!(!font.can_display(2));
        assert!(font.code_to_glyph_outline(1).is_empty());
        assert_eq!(font.advance_width(1), 700.0);
        assert_eq!(font.to_unicode(1).as_deref(), Some("a"));
    }
}
