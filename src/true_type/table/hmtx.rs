use crate::parse_binary::{BinaryParser, ByteReader};

/// Advance widths and left side bearings from `hhea` and `hmtx`
#[derive(Debug, Clone, Default)]
pub struct HorizontalMetrics {
    advances: Vec<u16>,
    left_side_bearings: Vec<i16>,
}

impl HorizontalMetrics {
    pub fn parse(hhea: &[u8], hmtx: &[u8], num_glyphs: u16) -> anyhow::Result<Self> {
        let mut reader = ByteReader::new_at(hhea, 34);
        let number_of_h_metrics = reader.parse_u16()?;

        let mut reader = ByteReader::new(hmtx);
        let mut advances = Vec::with_capacity(usize::from(number_of_h_metrics));
        let mut left_side_bearings = Vec::with_capacity(usize::from(num_glyphs));

        for _ in 0..number_of_h_metrics {
            match (reader.parse_u16(), reader.parse_i16()) {
                (Ok(advance), Ok(lsb)) => {
                    advances.push(advance);
                    left_side_bearings.push(lsb);
                }
                _ => {
                    log::warn!("hmtx is truncated after {} metrics", advances.len());
                    break;
                }
            }
        }

        // glyphs past the last long metric only store a side bearing
        for _ in number_of_h_metrics..num_glyphs {
            match reader.parse_i16() {
                Ok(lsb) => left_side_bearings.push(lsb),
                Err(..) => break,
            }
        }

        Ok(Self {
            advances,
            left_side_bearings,
        })
    }

    /// Glyphs past the last long metric share its advance
    pub fn advance(&self, gid: u16) -> u16 {
        self.advances
            .get(usize::from(gid))
            .or_else(|| self.advances.last())
            .copied()
            .unwrap_or(0)
    }

    pub fn left_side_bearing(&self, gid: u16) -> i16 {
        self.left_side_bearings
            .get(usize::from(gid))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub(crate) fn build_hhea(number_of_h_metrics: u16) -> Vec<u8> {
        let mut hhea = vec![0; 36];
        hhea[34..].copy_from_slice(&number_of_h_metrics.to_be_bytes());
        hhea
    }

    #[test]
    fn trailing_glyphs_share_last_advance() {
        let hmtx = [0x01, 0xf4, 0, 10, 0x02, 0x58, 0xff, 0xfb, 0, 7];
        let metrics = HorizontalMetrics::parse(&build_hhea(2), &hmtx, 3).unwrap();

        assert_eq!(metrics.advance(0), 500);
        assert_eq!(metrics.advance(1), 600);
        assert_eq!(metrics.advance(2), 600);
        assert_eq!(metrics.left_side_bearing(1), -5);
        assert_eq!(metrics.left_side_bearing(2), 7);
    }
}
