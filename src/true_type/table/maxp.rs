use crate::parse_binary::{BinaryParser, ByteReader};

/// Only the glyph count is read. Version 0.5 tables, used by CFF fonts, end
/// right after it
#[derive(Debug, Clone, Copy)]
pub struct Maxp {
    pub version: u32,
    pub num_glyphs: u16,
    pub max_component_depth: Option<u16>,
}

impl Maxp {
    pub fn parse(data: &[u8]) -> anyhow::Result<Self> {
        let mut reader = ByteReader::new(data);

        let version = reader.parse_u32()?;
        let num_glyphs = reader.parse_u16()?;

        let max_component_depth = if version == 0x0001_0000 {
            reader.skip(24).and_then(|_| reader.parse_u16()).ok()
        } else {
            None
        };

        Ok(Self {
            version,
            num_glyphs,
            max_component_depth,
        })
    }
}
