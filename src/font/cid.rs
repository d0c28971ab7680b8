use std::{collections::HashMap, sync::Arc};

/// How a CID-keyed TrueType descendant maps CIDs to glyph indices
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CidToGidMap {
    /// The CID is the glyph index
    #[default]
    Identity,

    /// Entry `cid` is the glyph index for that CID; CIDs past the end map
    /// to glyph 0
    Table(Arc<[u16]>),
}

impl CidToGidMap {
    /// Reads a table of big-endian 2-byte glyph indices. A trailing odd byte
    /// is ignored
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() % 2 != 0 {
            log::debug!("CIDToGIDMap has an odd length of {}", bytes.len());
        }

        Self::Table(
            bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect(),
        )
    }

    pub fn get(&self, cid: u16) -> u16 {
        match self {
            Self::Identity => cid,
            Self::Table(table) => table.get(usize::from(cid)).copied().unwrap_or(0),
        }
    }
}

/// Horizontal widths of a CIDFont, in thousandths of text space
#[derive(Debug, Clone, PartialEq)]
pub struct CidWidths {
    default_width: f32,
    widths: HashMap<u16, f32>,
}

impl Default for CidWidths {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

impl CidWidths {
    pub fn new(default_width: f32) -> Self {
        Self {
            default_width,
            widths: HashMap::new(),
        }
    }

    /// `first [w1 w2 ...]`: consecutive CIDs starting at `first`
    pub fn with_run(mut self, first: u16, widths: &[f32]) -> Self {
        for (cid, &width) in (first..=u16::MAX).zip(widths) {
            self.widths.insert(cid, width);
        }
        self
    }

    /// `first last w`: one width for every CID in `first..=last`
    pub fn with_range(mut self, first: u16, last: u16, width: f32) -> Self {
        for cid in first..=last {
            self.widths.insert(cid, width);
        }
        self
    }

    pub fn get(&self, cid: u16) -> f32 {
        self.widths.get(&cid).copied().unwrap_or(self.default_width)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cid_to_gid_table() {
        let map = CidToGidMap::from_bytes(&[0, 0, 0, 5, 1, 0, 7]);

        assert_eq!(map.get(1), 5);
        assert_eq!(map.get(2), 256);
        assert_eq!(map.get(3), 0);
        assert_eq!(CidToGidMap::Identity.get(3), 3);
    }

    #[test]
    fn widths_fall_back_to_default() {
        let widths = CidWidths::new(500.0)
            .with_run(10, &[100.0, 200.0])
            .with_range(20, 22, 300.0);

        assert_eq!(widths.get(11), 200.0);
        assert_eq!(widths.get(21), 300.0);
        assert_eq!(widths.get(12), 500.0);
    }
}
