use std::ops::Range;

use crate::error::FontError;

/// Offsets of each glyph's description within `glyf`
#[derive(Debug, Clone)]
pub struct LocaTable {
    offsets: Vec<u32>,
}

impl LocaTable {
    /// Reads `num_glyphs + 1` offsets, fewer if the table is short
    pub fn parse(data: &[u8], index_to_loc_format: i16, num_glyphs: u16) -> anyhow::Result<Self> {
        let count = usize::from(num_glyphs) + 1;

        let offsets: Vec<u32> = match index_to_loc_format {
            // short offsets store half the actual offset
            0 => data
                .chunks_exact(2)
                .take(count)
                .map(|bytes| u32::from(u16::from_be_bytes([bytes[0], bytes[1]])) * 2)
                .collect(),
            1 => data
                .chunks_exact(4)
                .take(count)
                .map(|bytes| u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
                .collect(),
            format => anyhow::bail!(FontError::invalid(format!(
                "unsupported loca format: {}",
                format
            ))),
        };

        if offsets.len() < count {
            log::warn!(
                "loca has {} offsets, expected {}",
                offsets.len(),
                count
            );
        }

        Ok(Self { offsets })
    }

    /// Number of glyphs with an entry
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The glyph's range within `glyf`. `None` for glyphs without outlines and
    /// for entries that are out of order
    pub fn glyph_range(&self, gid: u16) -> Option<Range<usize>> {
        let start = *self.offsets.get(usize::from(gid))? as usize;
        let end = *self.offsets.get(usize::from(gid) + 1)? as usize;

        if start >= end {
            if start > end {
                log::debug!("loca entries for glyph {} are out of order", gid);
            }
            return None;
        }

        Some(start..end)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_offsets_are_doubled() {
        let loca = LocaTable::parse(&[0, 0, 0, 5, 0, 5, 0, 9], 0, 3).unwrap();

        assert_eq!(loca.len(), 3);
        assert_eq!(loca.glyph_range(0), Some(0..10));
        assert_eq!(loca.glyph_range(1), None);
        assert_eq!(loca.glyph_range(2), Some(10..18));
        assert_eq!(loca.glyph_range(3), None);
    }

    #[test]
    fn long_offsets_truncated_table() {
        let loca = LocaTable::parse(&[0, 0, 0, 0, 0, 0, 0, 12, 0, 0], 1, 4).unwrap();

        assert_eq!(loca.len(), 1);
        assert_eq!(loca.glyph_range(0), Some(0..12));
        assert_eq!(loca.glyph_range(1), None);
    }
}
