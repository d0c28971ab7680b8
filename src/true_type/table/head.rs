use crate::{
    error::FontError,
    parse_binary::{BinaryParser, ByteReader, Fixed},
};

const MAGIC_NUMBER: u32 = 0x5F0F_3CF5;

#[derive(Debug, Clone)]
pub struct Head {
    pub font_revision: Fixed,
    pub flags: u16,
    pub units_per_em: u16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,

    /// 0 for short offsets (offset / 2 as u16), 1 for long offsets (u32)
    pub index_to_loc_format: i16,
}

impl Head {
    pub fn parse(data: &[u8]) -> anyhow::Result<Self> {
        let mut reader = ByteReader::new(data);

        let major_version = reader.parse_u16()?;
        let _minor_version = reader.parse_u16()?;

        if major_version != 1 {
            anyhow::bail!(FontError::UnsupportedVersion {
                table: "head",
                version: u32::from(major_version),
            });
        }

        let font_revision = reader.parse_fixed()?;
        let _checksum_adjustment = reader.parse_u32()?;

        let magic_number = reader.parse_u32()?;
        if magic_number != MAGIC_NUMBER {
            log::warn!("invalid head magic number: {:#x}", magic_number);
        }

        let flags = reader.parse_u16()?;
        let mut units_per_em = reader.parse_u16()?;

        if !(16..=16384).contains(&units_per_em) {
            log::warn!("unitsPerEm out of range: {}, assuming 1000", units_per_em);
            units_per_em = 1000;
        }

        let _created = reader.parse_i64()?;
        let _modified = reader.parse_i64()?;

        let x_min = reader.parse_i16()?;
        let y_min = reader.parse_i16()?;
        let x_max = reader.parse_i16()?;
        let y_max = reader.parse_i16()?;

        let mac_style = reader.parse_u16()?;
        let _lowest_rec_ppem = reader.parse_u16()?;
        let _font_direction_hint = reader.parse_i16()?;
        let index_to_loc_format = reader.parse_i16()?;

        Ok(Self {
            font_revision,
            flags,
            units_per_em,
            x_min,
            y_min,
            x_max,
            y_max,
            mac_style,
            index_to_loc_format,
        })
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub(crate) fn build_head(units_per_em: u16, index_to_loc_format: i16) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&[0, 1, 0, 0]);
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&MAGIC_NUMBER.to_be_bytes());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&units_per_em.to_be_bytes());
        out.extend_from_slice(&[0; 16]);
        for v in [-10i16, -20, 1000, 800] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(&[0; 6]);
        out.extend_from_slice(&index_to_loc_format.to_be_bytes());
        out.extend_from_slice(&[0, 0]);
        out
    }

    #[test]
    fn parses_head() {
        let head = Head::parse(&build_head(2048, 1)).unwrap();

        assert_eq!(head.units_per_em, 2048);
        assert_eq!(head.index_to_loc_format, 1);
        assert_eq!((head.x_min, head.y_max), (-10, 800));
        assert_eq!(head.font_revision, Fixed::from_num(1));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut data = build_head(1000, 0);
        data[1] = 2;

        assert!(Head::parse(&data).is_err());
    }
}
