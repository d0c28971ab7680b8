/*!
 * Type 1 font programs, in PFA or PFB form
 *
 * A Type 1 font program is a stylized PostScript program that describes glyph
 * shapes. It uses a compact encoding for the glyph descriptions, and it
 * includes hint information that enables high-quality rendering even at small
 * sizes and low resolutions
 *
 * https://adobe-type-tools.github.io/font-tech-notes/pdfs/T1_SPEC.pdf
 */

use std::{collections::HashMap, sync::Arc};

use crate::{
    data_structures::Matrix,
    encoding::{BuiltinEncoding, Encoding},
    error::FontError,
    font::{cache::GlyphCache, Glyph},
    geometry::Outline,
};

use self::{
    charstring::{Type1CharStringInterpreter, Type1Output},
    decode::decrypt_charstring,
};

pub(crate) mod charstring;
mod decode;
mod parse;

#[derive(Debug)]
pub struct Type1Font {
    name: Option<String>,
    font_matrix: Matrix,
    font_bbox: [f32; 4],
    encoding: Encoding,
    /// Decrypted subroutines, indexed by subroutine number
    subrs: Vec<Vec<u8>>,
    /// Decrypted charstrings in program order. The position is used as the
    /// glyph index
    charstrings: Vec<(String, Vec<u8>)>,
    glyph_ids: HashMap<String, u16>,
    cache: GlyphCache,
}

impl Type1Font {
    pub fn parse(data: &[u8]) -> anyhow::Result<Self> {
        let segments = decode::split_program(data)?;
        let public = parse::parse_public_dict(&segments.clear_text);
        let private = parse::parse_private_dict(&segments.private);

        if private.charstrings.is_empty() {
            anyhow::bail!(FontError::invalid("Type 1 program has no CharStrings"));
        }

        let mut subrs = Vec::new();
        for (idx, subr) in private.subrs {
            if idx >= subrs.len() {
                subrs.resize(idx + 1, Vec::new());
            }
            subrs[idx] = decrypt_charstring(subr, private.len_iv);
        }

        let charstrings: Vec<(String, Vec<u8>)> = private
            .charstrings
            .into_iter()
            .take(usize::from(u16::MAX))
            .map(|(name, charstring)| (name, decrypt_charstring(charstring, private.len_iv)))
            .collect();

        let mut glyph_ids = HashMap::with_capacity(charstrings.len());
        for (gid, (name, _)) in charstrings.iter().enumerate() {
            glyph_ids.entry(name.clone()).or_insert(gid as u16);
        }

        let encoding = match public.encoding {
            Some(entries) => Encoding::from_names(entries),
            None => Encoding::builtin(BuiltinEncoding::Standard).clone(),
        };

        log::debug!(
            "parsed Type 1 font {:?} with {} glyphs and {} subroutines",
            public.font_name,
            charstrings.len(),
            subrs.len()
        );

        Ok(Self {
            name: public.font_name,
            font_matrix: public
                .font_matrix
                .map_or(Matrix::default_font_matrix(), Matrix::from_arr),
            font_bbox: public.font_bbox.unwrap_or_default(),
            encoding,
            subrs,
            charstrings,
            glyph_ids,
            cache: GlyphCache::new(),
        })
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = GlyphCache::with_capacity(capacity);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The encoding array of the font program, or `StandardEncoding`
    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn font_matrix(&self) -> Matrix {
        self.font_matrix
    }

    pub fn font_bbox(&self) -> [f32; 4] {
        self.font_bbox
    }

    pub fn num_glyphs(&self) -> usize {
        self.charstrings.len()
    }

    pub fn glyph_index(&self, name: &str) -> Option<u16> {
        self.glyph_ids.get(name).copied()
    }

    pub fn glyph_name(&self, gid: u16) -> Option<&str> {
        self.charstrings
            .get(usize::from(gid))
            .map(|(name, _)| name.as_str())
    }

    pub fn has_glyph(&self, name: &str) -> bool {
        self.glyph_ids.contains_key(name)
    }

    /// The glyph named `name`, falling back to `.notdef`
    pub fn glyph_by_name(&self, name: &str) -> Arc<Glyph> {
        match self.glyph_index(name).or_else(|| self.glyph_index(".notdef")) {
            Some(gid) => self.glyph(gid),
            None => Arc::new(Glyph::empty()),
        }
    }

    pub fn glyph(&self, gid: u16) -> Arc<Glyph> {
        self.cache.get_or_insert_with(gid, || {
            self.build_glyph(gid).unwrap_or_else(|err| {
                log::warn!("failed to build Type 1 glyph {}: {}", gid, err);
                Glyph::empty()
            })
        })
    }

    fn run_charstring(&self, gid: u16) -> anyhow::Result<Type1Output> {
        let (_, charstring) = self
            .charstrings
            .get(usize::from(gid))
            .ok_or(FontError::invalid(format!("no charstring for glyph {}", gid)))?;

        Type1CharStringInterpreter::evaluate(charstring, &self.subrs)
    }

    fn build_glyph(&self, gid: u16) -> anyhow::Result<Glyph> {
        let output = self.run_charstring(gid)?;

        let outline = match output.seac {
            Some(seac) => {
                // the accent origin is placed relative to this glyph's side
                // bearing, less the accent's own
                let dx = seac.adx + output.side_bearing.x - seac.asb;

                let mut outline = self.standard_glyph_outline(seac.base_code)?;
                outline.extend_transformed(
                    &self.standard_glyph_outline(seac.accent_code)?,
                    Matrix::new_translation(dx, seac.ady),
                );
                outline
            }
            None => output.outline,
        };

        Ok(Glyph::new(outline, output.width.x))
    }

    /// A `seac` component, addressed by its code in the standard encoding
    fn standard_glyph_outline(&self, code: u8) -> anyhow::Result<Outline> {
        let name = Encoding::builtin(BuiltinEncoding::Standard)
            .get_name(code)
            .ok_or(FontError::invalid(format!("seac code {} is not standard", code)))?;

        let gid = self
            .glyph_index(name)
            .ok_or(FontError::invalid(format!("seac component {} is missing", name)))?;

        let output = self.run_charstring(gid)?;

        if output.seac.is_some() {
            log::warn!("nested seac in {}", name);
        }

        Ok(output.outline)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::geometry::Point;

    use super::{
        charstring::test::charstring,
        decode::{test::encrypt, CHARSTRING_KEY, EEXEC_KEY},
    };

    fn encrypted_charstring(plain: &[u8]) -> Vec<u8> {
        let mut with_iv = b"rand".to_vec();
        with_iv.extend_from_slice(plain);
        encrypt(&with_iv, CHARSTRING_KEY)
    }

    /// A binary PFA with an encoding array and the given glyphs
    fn build_pfa(glyphs: &[(&str, Vec<u8>)], subrs: &[Vec<u8>]) -> Vec<u8> {
        let mut private = b"dup /Private 8 dict dup begin\n".to_vec();

        private.extend(format!("/Subrs {} array\n", subrs.len()).bytes());
        for (idx, subr) in subrs.iter().enumerate() {
            let subr = encrypted_charstring(subr);
            private.extend(format!("dup {} {} RD ", idx, subr.len()).bytes());
            private.extend(subr);
            private.extend_from_slice(b" NP\n");
        }

        private.extend(format!("ND\n2 index /CharStrings {} dict dup begin\n", glyphs.len()).bytes());
        for (name, glyph) in glyphs {
            let glyph = encrypted_charstring(glyph);
            private.extend(format!("/{} {} RD ", name, glyph.len()).bytes());
            private.extend(glyph);
            private.extend_from_slice(b" ND\n");
        }
        private.extend_from_slice(b"end\nend\n");

        let mut plain = b"\0\0\0\0".to_vec();
        plain.extend(private);

        let mut data = b"%!FontType1-1.0: Test 001\n\
            /FontName /Test def\n\
            /Encoding 256 array\n\
            0 1 255 {1 index exch /.notdef put} for\n\
            dup 49 /square put\n\
            readonly def\n\
            currentdict end\n\
            currentfile eexec\n"
            .to_vec();
        data.extend(encrypt(&plain, EEXEC_KEY));

        data
    }

    fn square(sbx: i32, size: i32) -> Vec<u8> {
        charstring(&[
            (&[sbx, 500], &[13]),
            (&[0, 0], &[21]),
            (&[size], &[6]),
            (&[size], &[7]),
            (&[-size], &[6]),
            (&[], &[9, 14]),
        ])
    }

    #[test]
    fn parses_binary_pfa() {
        let notdef = charstring(&[(&[0, 250], &[13]), (&[], &[14])]);
        let font = Type1Font::parse(&build_pfa(
            &[(".notdef", notdef), ("square", square(10, 100))],
            &[],
        ))
        .unwrap();

        assert_eq!(font.name(), Some("Test"));
        assert_eq!(font.num_glyphs(), 2);
        assert_eq!(font.encoding().get_name(49), Some("square"));
        assert_eq!(font.font_matrix(), Matrix::default_font_matrix());

        let glyph = font.glyph_by_name("square");
        assert_eq!(glyph.advance, 500.0);
        assert_eq!(glyph.outline.bounding_box().min, Point::new(10.0, 0.0));
        assert_eq!(glyph.outline.bounding_box().max, Point::new(110.0, 100.0));

        assert_eq!(font.glyph_by_name("missing").advance, 250.0);
    }

    #[test]
    fn charstrings_call_subroutines() {
        let notdef = charstring(&[(&[0, 250], &[13]), (&[], &[14])]);
        let subr = charstring(&[(&[], &[5]), (&[], &[11])]);
        let glyph = charstring(&[
            (&[0, 400], &[13]),
            (&[0, 0], &[21]),
            (&[30, 60, 0], &[10]),
            (&[], &[14]),
        ]);

        let font =
            Type1Font::parse(&build_pfa(&[(".notdef", notdef), ("line", glyph)], &[subr])).unwrap();

        assert_eq!(
            font.glyph_by_name("line").outline.bounding_box().max,
            Point::new(30.0, 60.0)
        );
    }

    #[test]
    fn seac_places_accent() {
        let notdef = charstring(&[(&[0, 250], &[13]), (&[], &[14])]);
        // Aacute: A (65) with acute (194), accent origin 100 units right and
        // 300 up
        let aacute = charstring(&[(&[20, 600], &[13]), (&[0, 100, 300, 65, 194], &[12, 6])]);

        let font = Type1Font::parse(&build_pfa(
            &[
                (".notdef", notdef),
                ("A", square(20, 200)),
                ("acute", square(0, 50)),
                ("Aacute", aacute),
            ],
            &[],
        ))
        .unwrap();

        let glyph = font.glyph_by_name("Aacute");
        let bbox = glyph.outline.bounding_box();

        assert_eq!(glyph.advance, 600.0);
        assert_eq!(glyph.outline.paths.len(), 2);
        assert_eq!(bbox.min, Point::new(20.0, 0.0));
        assert_eq!(bbox.max, Point::new(220.0, 350.0));
    }

    #[test]
    fn missing_charstrings_is_an_error() {
        let data = b"%!FontType1-1.0: Test\ncurrentfile eexec\n\x01\x02\x03\x04\x05";

        assert!(Type1Font::parse(data).is_err());
    }
}
