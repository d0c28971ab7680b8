use std::collections::HashMap;

use crate::{
    error::FontError,
    parse_binary::{BinaryParser, ByteReader},
};

use super::consts::{EXPERT_CHARSET, EXPERT_SUBSET_CHARSET};

/// Glyph index to SID (or CID, in CID-keyed fonts) mapping
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CffCharset {
    IsoAdobe,
    Expert,
    ExpertSubset,
    /// Explicit SIDs for every glyph after `.notdef`
    Custom(Vec<u16>),
}

impl CffCharset {
    /// `offset` is the top DICT charset value: 0, 1 and 2 select the
    /// predefined charsets
    pub fn parse(buffer: &[u8], offset: u32, num_glyphs: usize) -> anyhow::Result<Self> {
        match offset {
            0 => return Ok(Self::IsoAdobe),
            1 => return Ok(Self::Expert),
            2 => return Ok(Self::ExpertSubset),
            _ => {}
        }

        let mut reader = ByteReader::new_at(buffer, offset as usize);
        let remaining = num_glyphs.saturating_sub(1);
        let mut sids = Vec::with_capacity(remaining);

        match reader.parse_u8()? {
            0 => {
                for _ in 0..remaining {
                    sids.push(reader.parse_u16()?);
                }
            }
            format @ (1 | 2) => {
                while sids.len() < remaining {
                    let first = reader.parse_u16()?;
                    let n_left = if format == 1 {
                        u16::from(reader.parse_u8()?)
                    } else {
                        reader.parse_u16()?
                    };

                    for sid in (first..=u16::MAX).take(usize::from(n_left) + 1) {
                        sids.push(sid);
                    }
                }

                sids.truncate(remaining);
            }
            format => anyhow::bail!(FontError::UnsupportedVersion {
                table: "CFF charset",
                version: u32::from(format),
            }),
        }

        Ok(Self::Custom(sids))
    }

    /// SID of glyph `gid`. Glyph 0 is always `.notdef`
    pub fn sid(&self, gid: u16) -> Option<u16> {
        if gid == 0 {
            return Some(0);
        }

        let idx = usize::from(gid) - 1;

        match self {
            // ISOAdobe covers SIDs 1..=228 in order
            Self::IsoAdobe => (gid <= 228).then(|| gid),
            Self::Expert => EXPERT_CHARSET.get(idx).copied(),
            Self::ExpertSubset => EXPERT_SUBSET_CHARSET.get(idx).copied(),
            Self::Custom(sids) => sids.get(idx).copied(),
        }
    }

    /// Inverse of [`CffCharset::sid`] over the first `num_glyphs` glyphs. The
    /// lowest glyph wins when a SID repeats
    pub fn inverse(&self, num_glyphs: usize) -> HashMap<u16, u16> {
        let mut inverse = HashMap::with_capacity(num_glyphs);

        for gid in (0..=u16::MAX).take(num_glyphs) {
            match self.sid(gid) {
                Some(sid) => {
                    inverse.entry(sid).or_insert(gid);
                }
                None => break,
            }
        }

        inverse
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn predefined_charsets() {
        assert_eq!(CffCharset::parse(&[], 0, 10).unwrap(), CffCharset::IsoAdobe);
        assert_eq!(CffCharset::IsoAdobe.sid(5), Some(5));
        assert_eq!(CffCharset::IsoAdobe.sid(229), None);
        assert_eq!(CffCharset::Expert.sid(1), Some(1));
        assert_eq!(CffCharset::Expert.sid(2), Some(229));
    }

    #[test]
    fn format_0() {
        let data = [0xff, 0xff, 0xff, 0, 0, 10, 0, 20];
        let charset = CffCharset::parse(&data, 3, 3).unwrap();

        assert_eq!(charset, CffCharset::Custom(vec![10, 20]));
        assert_eq!(charset.sid(2), Some(20));
        assert_eq!(charset.sid(3), None);

        // truncated
        assert!(CffCharset::parse(&data[..6], 3, 3).is_err());
    }

    #[test]
    fn range_formats() {
        // format 1: 100..=102, then 7
        let data = [0, 0, 0, 1, 0, 100, 2, 0, 7, 0];
        let charset = CffCharset::parse(&data, 3, 5).unwrap();
        assert_eq!(charset, CffCharset::Custom(vec![100, 101, 102, 7]));

        // format 2, with a range running past the glyph count
        let data = [0, 0, 0, 2, 0, 50, 1, 0];
        let charset = CffCharset::parse(&data, 3, 3).unwrap();
        assert_eq!(charset, CffCharset::Custom(vec![50, 51]));
        assert_eq!(charset.inverse(3).get(&51), Some(&2));
    }
}
