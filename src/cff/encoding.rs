use std::collections::HashMap;

use crate::{
    error::FontError,
    parse_binary::{BinaryParser, ByteReader},
};

use super::consts::{EXPERT_ENCODING, STANDARD_ENCODING};

/// Character code to glyph index mapping of a name-keyed font
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CffEncoding {
    pub kind: CffEncodingKind,
    /// Indexed by character code, 0 when unmapped
    gids: Box<[u16; 256]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CffEncodingKind {
    Standard,
    Expert,
    Custom,
}

impl CffEncoding {
    /// `offset` is the top DICT encoding value: 0 and 1 select the
    /// predefined encodings. `sid_to_gid` is the inverse of the charset
    pub fn parse(
        buffer: &[u8],
        offset: u32,
        num_glyphs: usize,
        sid_to_gid: &HashMap<u16, u16>,
    ) -> anyhow::Result<Self> {
        let mut gids = Box::new([0u16; 256]);

        let kind = match offset {
            0 | 1 => {
                let table = if offset == 0 {
                    &STANDARD_ENCODING
                } else {
                    &EXPERT_ENCODING
                };

                for (gid, &sid) in gids.iter_mut().zip(table.iter()) {
                    if sid != 0 {
                        *gid = sid_to_gid.get(&sid).copied().unwrap_or(0);
                    }
                }

                if offset == 0 {
                    CffEncodingKind::Standard
                } else {
                    CffEncodingKind::Expert
                }
            }
            _ => {
                let mut reader = ByteReader::new_at(buffer, offset as usize);
                let format = reader.parse_u8()?;
                let mut gid = 1usize;

                match format & 0x7f {
                    0 => {
                        let n_codes = reader.parse_u8()?;

                        for _ in 0..n_codes {
                            let code = reader.parse_u8()?;
                            if gid < num_glyphs {
                                gids[usize::from(code)] = gid as u16;
                            }
                            gid += 1;
                        }
                    }
                    1 => {
                        let n_ranges = reader.parse_u8()?;

                        for _ in 0..n_ranges {
                            let first = reader.parse_u8()?;
                            let n_left = reader.parse_u8()?;

                            for code in (usize::from(first)..256).take(usize::from(n_left) + 1) {
                                if gid < num_glyphs {
                                    gids[code] = gid as u16;
                                }
                                gid += 1;
                            }
                        }
                    }
                    format => anyhow::bail!(FontError::UnsupportedVersion {
                        table: "CFF encoding",
                        version: u32::from(format),
                    }),
                }

                // supplements give extra codes to glyphs already encoded
                if format & 0x80 != 0 {
                    let n_sups = reader.parse_u8()?;

                    for _ in 0..n_sups {
                        let code = reader.parse_u8()?;
                        let sid = reader.parse_u16()?;

                        if let Some(&gid) = sid_to_gid.get(&sid) {
                            gids[usize::from(code)] = gid;
                        }
                    }
                }

                CffEncodingKind::Custom
            }
        };

        Ok(Self { kind, gids })
    }

    pub fn gid(&self, code: u8) -> u16 {
        self.gids[usize::from(code)]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn identity_sids(n: u16) -> HashMap<u16, u16> {
        (0..n).map(|sid| (sid, sid)).collect()
    }

    #[test]
    fn standard_encoding_goes_through_charset() {
        // glyph 1 is "A" (SID 34)
        let sid_to_gid = HashMap::from([(0, 0), (34, 1)]);
        let encoding = CffEncoding::parse(&[], 0, 2, &sid_to_gid).unwrap();

        assert_eq!(encoding.kind, CffEncodingKind::Standard);
        assert_eq!(encoding.gid(b'A'), 1);
        assert_eq!(encoding.gid(b'B'), 0);
    }

    #[test]
    fn custom_formats() {
        let data = [0, 0, 0, 2, b'a', b'c'];
        let encoding = CffEncoding::parse(&data, 2, 3, &identity_sids(3)).unwrap();
        assert_eq!(encoding.kind, CffEncodingKind::Custom);
        assert_eq!(encoding.gid(b'a'), 1);
        assert_eq!(encoding.gid(b'c'), 2);

        let data = [0, 0, 1, 1, b'x', 2];
        let encoding = CffEncoding::parse(&data, 2, 3, &identity_sids(3)).unwrap();
        assert_eq!(encoding.gid(b'x'), 1);
        assert_eq!(encoding.gid(b'y'), 2);
        // past the last glyph
        assert_eq!(encoding.gid(b'z'), 0);
    }

    #[test]
    fn supplements() {
        // format 0 with supplement: code 0x20 -> gid 1, and code 0xa0 -> SID 1
        let data = [0, 0, 0x80, 1, 0x20, 1, 0xa0, 0, 1];
        let sid_to_gid = HashMap::from([(0, 0), (1, 1)]);
        let encoding = CffEncoding::parse(&data, 2, 2, &sid_to_gid).unwrap();

        assert_eq!(encoding.gid(0x20), 1);
        assert_eq!(encoding.gid(0xa0), 1);
    }
}
