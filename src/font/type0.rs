use std::sync::Arc;

use crate::{
    cff::CffFont,
    cmap::{CMap, NOTDEF},
    data_structures::Matrix,
    error::{is_retry_as_open_type, FontError},
    true_type::TrueTypeFont,
};

use super::{
    cid::{CidToGidMap, CidWidths},
    FontFormat, FontOptions, Glyph, OpenTypeFont,
};

/// The glyph program of a CIDFont
#[derive(Debug, Clone)]
pub enum CidFontProgram {
    /// Glyphs selected through a [`CidToGidMap`]
    TrueType(Arc<TrueTypeFont>),

    /// Glyphs selected through the charset of a CID-keyed program; a
    /// name-keyed program uses the CID as glyph index
    Cff(Arc<CffFont>),
}

impl CidFontProgram {
    pub fn parse(data: Arc<[u8]>, options: &FontOptions) -> anyhow::Result<Self> {
        let capacity = options.cache_capacity;

        Ok(match FontFormat::detect(&data) {
            Some(FontFormat::TrueType) => match TrueTypeFont::parse(Arc::clone(&data)) {
                Ok(font) => Self::TrueType(Arc::new(font.with_cache_capacity(capacity))),
                Err(err) if is_retry_as_open_type(&err) => Self::open_type(&data)?,
                Err(err) => return Err(err),
            },
            Some(FontFormat::OpenType) => Self::open_type(&data)?,
            Some(FontFormat::CffType1) => {
                Self::Cff(Arc::new(CffFont::parse(data)?.with_cache_capacity(capacity)))
            }
            Some(format) => anyhow::bail!(FontError::invalid(format!(
                "{} programs cannot be CIDFonts",
                format.as_str()
            ))),
            None => anyhow::bail!(FontError::invalid("unrecognized CIDFont program")),
        })
    }

    fn open_type(data: &[u8]) -> anyhow::Result<Self> {
        Ok(Self::Cff(Arc::clone(OpenTypeFont::parse(data)?.cff())))
    }
}

/// A composite font: a CMap from multi-byte codes to CIDs over one CIDFont
#[derive(Debug, Clone)]
pub struct Type0Font {
    cmap: Arc<CMap>,
    descendant: CidFontProgram,
    cid_to_gid: CidToGidMap,
    widths: CidWidths,
}

impl Type0Font {
    pub fn new(cmap: Arc<CMap>, descendant: CidFontProgram) -> Self {
        Self {
            cmap,
            descendant,
            cid_to_gid: CidToGidMap::Identity,
            widths: CidWidths::default(),
        }
    }

    pub fn with_cid_to_gid(mut self, cid_to_gid: CidToGidMap) -> Self {
        self.cid_to_gid = cid_to_gid;
        self
    }

    pub fn with_widths(mut self, widths: CidWidths) -> Self {
        self.widths = widths;
        self
    }

    pub fn cmap(&self) -> &Arc<CMap> {
        &self.cmap
    }

    pub fn descendant(&self) -> &CidFontProgram {
        &self.descendant
    }

    pub fn cid(&self, code: u16) -> u16 {
        self.cmap.to_selector(code)
    }

    pub fn gid_for_cid(&self, cid: u16) -> u16 {
        match &self.descendant {
            CidFontProgram::TrueType(..) => self.cid_to_gid.get(cid),
            CidFontProgram::Cff(cff) => cff.gid_for_cid(cid).unwrap_or(NOTDEF),
        }
    }

    pub fn width(&self, code: u16) -> f32 {
        self.widths.get(self.cid(code))
    }

    pub fn glyph(&self, gid: u16) -> Arc<Glyph> {
        match &self.descendant {
            CidFontProgram::TrueType(font) => font.glyph(gid),
            CidFontProgram::Cff(cff) => cff.glyph(gid),
        }
    }

    pub fn num_glyphs(&self) -> usize {
        match &self.descendant {
            CidFontProgram::TrueType(font) => font.num_glyphs(),
            CidFontProgram::Cff(cff) => cff.num_glyphs(),
        }
    }

    pub fn font_matrix(&self) -> Matrix {
        match &self.descendant {
            CidFontProgram::TrueType(font) => {
                let scale = 1.0 / f32::from(font.units_per_em());
                Matrix::new_scale(scale, scale)
            }
            CidFontProgram::Cff(cff) => cff.font_matrix(),
        }
    }
}
