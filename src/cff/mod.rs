/*!
 * Compact Font Format, bare or as the `CFF ` table of an OpenType font
 *
 * https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf
 *
 * See also:
 *  - https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf
 */

use std::{collections::HashMap, sync::Arc};

use crate::{
    data_structures::Matrix,
    error::FontError,
    font::{cache::GlyphCache, Glyph},
    geometry::Outline,
};

use self::{
    charset::CffCharset,
    charstring::{CharStringContext, CharStringOutput, Type2CharStringInterpreter},
    consts::{NUM_STANDARD_STRINGS, STANDARD_ENCODING, STANDARD_STRINGS},
    dict::{PrivateDict, TopDict},
    encoding::CffEncoding,
    fdselect::FdSelect,
    index::CffIndex,
    parse::CffParser,
};

mod charset;
pub(crate) mod charstring;
pub(crate) mod consts;
mod dict;
mod encoding;
mod fdselect;
pub(crate) mod index;
mod parse;

#[derive(Debug, Clone, Default)]
pub(crate) struct PrivateData {
    pub dict: PrivateDict,
    pub local_subrs: CffIndex,
}

/// A font DICT of a CID-keyed font
#[derive(Debug, Clone, Default)]
pub(crate) struct FdFont {
    /// Maps the glyph space of this font DICT into the top DICT's
    pub font_matrix: Option<[f32; 6]>,
    pub private: PrivateData,
}

#[derive(Debug, Clone)]
pub(crate) enum CffKind {
    NameKeyed(PrivateData),
    /// One font DICT per group of glyphs, chosen per glyph through FDSelect
    CidKeyed {
        fd_select: FdSelect,
        fonts: Vec<FdFont>,
    },
}

#[derive(Debug)]
pub struct CffFont {
    data: Arc<[u8]>,
    name: Option<String>,
    top_dict: TopDict,
    /// Strings with SIDs from 391 on
    strings: Vec<String>,
    global_subrs: CffIndex,
    charstrings: CffIndex,
    charset: CffCharset,
    /// SID, or CID in CID-keyed fonts, to glyph index
    sid_to_gid: HashMap<u16, u16>,
    encoding: Option<CffEncoding>,
    kind: CffKind,
    cache: GlyphCache,
}

impl CffFont {
    pub fn parse(data: Arc<[u8]>) -> anyhow::Result<Self> {
        let tables = CffParser::new(&data).parse()?;
        let sid_to_gid = tables.charset.inverse(tables.charstrings.len());

        Ok(Self {
            name: tables.name,
            top_dict: tables.top_dict,
            strings: tables.strings,
            global_subrs: tables.global_subrs,
            charstrings: tables.charstrings,
            charset: tables.charset,
            sid_to_gid,
            encoding: tables.encoding,
            kind: tables.kind,
            cache: GlyphCache::new(),
            data,
        })
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.set_cache_capacity(capacity);
        self
    }

    /// Replaces the glyph cache, dropping the glyphs built so far
    pub(crate) fn set_cache_capacity(&mut self, capacity: usize) {
        self.cache = GlyphCache::with_capacity(capacity);
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// The PostScript name from the Name INDEX
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn num_glyphs(&self) -> usize {
        self.charstrings.len()
    }

    pub fn is_cid(&self) -> bool {
        matches!(self.kind, CffKind::CidKeyed { .. })
    }

    /// Registry and ordering of a CID-keyed font, e.g. `("Adobe", "Japan1")`
    pub fn registry_ordering(&self) -> Option<(&str, &str)> {
        let (registry, ordering, _) = self.top_dict.ros?;

        Some((self.string(registry)?, self.string(ordering)?))
    }

    pub fn font_matrix(&self) -> Matrix {
        self.top_dict
            .font_matrix
            .map_or(Matrix::default_font_matrix(), Matrix::from_arr)
    }

    pub fn font_bbox(&self) -> [f32; 4] {
        self.top_dict.font_bbox
    }

    /// Resolves a SID against the standard strings and the String INDEX
    pub fn string(&self, sid: u16) -> Option<&str> {
        match sid.checked_sub(NUM_STANDARD_STRINGS) {
            None => STANDARD_STRINGS.get(usize::from(sid)).copied(),
            Some(idx) => self.strings.get(usize::from(idx)).map(String::as_str),
        }
    }

    fn sid_for_name(&self, name: &str) -> Option<u16> {
        if let Some(sid) = STANDARD_STRINGS.iter().position(|&s| s == name) {
            return Some(sid as u16);
        }

        self.strings
            .iter()
            .position(|s| s == name)
            .map(|idx| idx as u16 + NUM_STANDARD_STRINGS)
    }

    /// Glyph for a CID. Name-keyed fonts treat the CID as a glyph index
    pub fn gid_for_cid(&self, cid: u16) -> Option<u16> {
        if self.is_cid() {
            self.sid_to_gid.get(&cid).copied()
        } else {
            (usize::from(cid) < self.num_glyphs()).then(|| cid)
        }
    }

    pub fn cid_for_gid(&self, gid: u16) -> Option<u16> {
        if usize::from(gid) >= self.num_glyphs() {
            return None;
        }

        if self.is_cid() {
            self.charset.sid(gid)
        } else {
            Some(gid)
        }
    }

    /// Glyph named `name` in the charset. CID-keyed fonts have no glyph names
    pub fn gid_for_name(&self, name: &str) -> Option<u16> {
        if self.is_cid() {
            return None;
        }

        let sid = self.sid_for_name(name)?;

        self.sid_to_gid.get(&sid).copied()
    }

    pub fn glyph_name(&self, gid: u16) -> Option<&str> {
        if self.is_cid() {
            return None;
        }

        self.string(self.charset.sid(gid)?)
    }

    /// Glyph for a code in the font's built-in encoding, 0 when unmapped
    pub fn gid_for_code(&self, code: u8) -> u16 {
        self.encoding.as_ref().map_or(0, |encoding| encoding.gid(code))
    }

    /// The built-in encoding as `(code, glyph name)` pairs
    pub fn builtin_encoding(&self) -> Vec<(u8, &str)> {
        (0..=255u8)
            .filter_map(|code| match self.gid_for_code(code) {
                0 => None,
                gid => Some((code, self.glyph_name(gid)?)),
            })
            .collect()
    }

    pub fn glyph(&self, gid: u16) -> Arc<Glyph> {
        self.cache.get_or_insert_with(gid, || {
            self.build_glyph(gid, true).unwrap_or_else(|err| {
                log::warn!("failed to build CFF glyph {}: {}", gid, err);
                Glyph::empty()
            })
        })
    }

    fn private_for(&self, gid: u16) -> Option<&PrivateData> {
        match &self.kind {
            CffKind::NameKeyed(private) => Some(private),
            CffKind::CidKeyed { fd_select, fonts } => fonts
                .get(fd_select.fd_index(gid))
                .map(|font| &font.private),
        }
    }

    /// Takes outlines of `gid` from its font DICT's glyph space into the
    /// space of [`Self::font_matrix`]. `None` when no conversion is needed
    fn fd_transform(&self, gid: u16) -> Option<Matrix> {
        let fd_matrix = match &self.kind {
            CffKind::CidKeyed { fd_select, fonts } => {
                fonts.get(fd_select.fd_index(gid))?.font_matrix?
            }
            CffKind::NameKeyed(..) => return None,
        };

        let top = self
            .top_dict
            .font_matrix
            .map_or(Matrix::identity(), Matrix::from_arr);

        Some(Matrix::from_arr(fd_matrix) * top * self.font_matrix().inverse()?)
    }

    fn run_charstring(&self, gid: u16) -> anyhow::Result<(CharStringOutput, &PrivateData)> {
        let charstring = self
            .charstrings
            .get(&self.data, usize::from(gid))
            .ok_or(FontError::invalid(format!("no charstring for glyph {}", gid)))?;

        let private = self
            .private_for(gid)
            .ok_or(FontError::invalid(format!("no font DICT for glyph {}", gid)))?;

        let output = Type2CharStringInterpreter::evaluate(
            charstring,
            CharStringContext {
                buffer: &self.data,
                global_subrs: &self.global_subrs,
                local_subrs: &private.local_subrs,
            },
        )?;

        Ok((output, private))
    }

    fn build_glyph(&self, gid: u16, allow_seac: bool) -> anyhow::Result<Glyph> {
        let (output, private) = self.run_charstring(gid)?;

        let advance = output.width.map_or(private.dict.default_width_x, |width| {
            private.dict.nominal_width_x + width
        });

        let mut outline = output.outline;

        match output.seac {
            Some(seac) if allow_seac => {
                let base = self.standard_glyph(seac.base_code)?;
                let accent = self.standard_glyph(seac.accent_code)?;

                outline = self.build_glyph(base, false)?.outline;
                outline.extend_transformed(
                    &self.build_glyph(accent, false)?.outline,
                    Matrix::new_translation(seac.adx, seac.ady),
                );
            }
            Some(_) => log::warn!("nested seac in glyph {}", gid),
            None => {}
        }

        if let Some(m) = self.fd_transform(gid) {
            let mut transformed = Outline::empty();
            transformed.extend_transformed(&outline, m);

            return Ok(Glyph::new(transformed, advance * m.a));
        }

        Ok(Glyph::new(outline, advance))
    }

    /// Glyph for a code of the standard encoding, as `seac` components are
    /// addressed
    fn standard_glyph(&self, code: u8) -> anyhow::Result<u16> {
        let sid = STANDARD_ENCODING[usize::from(code)];

        self.sid_to_gid
            .get(&sid)
            .copied()
            .filter(|_| sid != 0)
            .ok_or(anyhow::anyhow!(FontError::invalid(format!(
                "seac component {} is not in the font",
                code
            ))))
    }
}
