use std::collections::HashMap;

use crate::parse_binary::{BinaryParser, ByteReader};

const COVERAGE_HORIZONTAL: u16 = 1 << 0;
const COVERAGE_MINIMUM: u16 = 1 << 1;
const COVERAGE_CROSS_STREAM: u16 = 1 << 2;

const APPLE_VERTICAL: u16 = 0x8000;
const APPLE_CROSS_STREAM: u16 = 0x4000;
const APPLE_VARIATION: u16 = 0x2000;

/// Horizontal pair kerning from format 0 subtables of `kern`, in either the
/// Microsoft (version 0) or the Apple (version 1.0) layout. Later subtables
/// override earlier ones for the same pair
#[derive(Debug, Clone, Default)]
pub struct KernTable {
    pairs: HashMap<(u16, u16), i16>,
}

impl KernTable {
    pub fn parse(data: &[u8]) -> anyhow::Result<Self> {
        let mut reader = ByteReader::new(data);
        let mut pairs = HashMap::new();

        let version = reader.parse_u16()?;

        let subtables = match version {
            0 => {
                let n = reader.parse_u16()?;
                (0..n).map(|_| read_ms_subtable(&mut reader)).collect::<Vec<_>>()
            }
            1 => {
                let _minor = reader.parse_u16()?;
                let n = reader.parse_u32()?;
                (0..n).map(|_| read_apple_subtable(&mut reader)).collect::<Vec<_>>()
            }
            version => {
                log::debug!("unsupported kern version {}", version);
                return Ok(Self::default());
            }
        };

        for subtable in subtables {
            match subtable {
                Ok(Some(body)) => read_format_0(body, &mut pairs),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("truncated kern subtable: {}", err);
                    break;
                }
            }
        }

        Ok(Self { pairs })
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Adjustment in font units between `left` and `right`, 0 for unkerned pairs
    pub fn kerning(&self, left: u16, right: u16) -> i16 {
        self.pairs.get(&(left, right)).copied().unwrap_or(0)
    }
}

/// The body of a usable subtable, `None` for subtables that are skipped
fn read_ms_subtable<'a>(reader: &mut ByteReader<'a>) -> anyhow::Result<Option<&'a [u8]>> {
    let _version = reader.parse_u16()?;
    let length = usize::from(reader.parse_u16()?);
    let coverage = reader.parse_u16()?;

    let body = reader.read_slice(length.saturating_sub(6))?;

    let format = coverage >> 8;
    let usable = coverage & COVERAGE_HORIZONTAL != 0
        && coverage & (COVERAGE_MINIMUM | COVERAGE_CROSS_STREAM) == 0;

    Ok(select(format, usable, body))
}

fn read_apple_subtable<'a>(reader: &mut ByteReader<'a>) -> anyhow::Result<Option<&'a [u8]>> {
    let length = reader.parse_u32()? as usize;
    let coverage = reader.parse_u16()?;
    let _tuple_index = reader.parse_u16()?;

    let body = reader.read_slice(length.saturating_sub(8))?;

    let format = coverage & 0xff;
    let usable = coverage & (APPLE_VERTICAL | APPLE_CROSS_STREAM | APPLE_VARIATION) == 0;

    Ok(select(format, usable, body))
}

fn select(format: u16, usable: bool, body: &[u8]) -> Option<&[u8]> {
    if format != 0 {
        log::debug!("skipping kern subtable format {}", format);
        return None;
    }

    usable.then_some(body)
}

fn read_format_0(body: &[u8], pairs: &mut HashMap<(u16, u16), i16>) {
    let mut reader = ByteReader::new(body);

    let count = match reader.parse_u16() {
        Ok(count) => count,
        Err(..) => return,
    };
    // searchRange, entrySelector, rangeShift
    if reader.skip(6).is_err() {
        return;
    }

    for _ in 0..count {
        match (reader.parse_u16(), reader.parse_u16(), reader.parse_i16()) {
            (Ok(left), Ok(right), Ok(value)) => {
                pairs.insert((left, right), value);
            }
            _ => {
                log::warn!("kern pairs are truncated");
                break;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn format_0_body(pairs: &[(u16, u16, i16)]) -> Vec<u8> {
        let mut body = (pairs.len() as u16).to_be_bytes().to_vec();
        body.extend_from_slice(&[0; 6]);
        for (left, right, value) in pairs {
            body.extend_from_slice(&left.to_be_bytes());
            body.extend_from_slice(&right.to_be_bytes());
            body.extend_from_slice(&value.to_be_bytes());
        }
        body
    }

    fn ms_subtable(coverage: u16, body: &[u8]) -> Vec<u8> {
        let mut out = 0u16.to_be_bytes().to_vec();
        out.extend_from_slice(&(body.len() as u16 + 6).to_be_bytes());
        out.extend_from_slice(&coverage.to_be_bytes());
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn microsoft_pairs() {
        let mut data = vec![0, 0, 0, 2];
        data.extend(ms_subtable(1, &format_0_body(&[(36, 57, -80), (57, 36, -70)])));
        // cross-stream subtables don't adjust advances
        data.extend(ms_subtable(5, &format_0_body(&[(36, 36, 10)])));

        let kern = KernTable::parse(&data).unwrap();

        assert_eq!(kern.kerning(36, 57), -80);
        assert_eq!(kern.kerning(57, 36), -70);
        assert_eq!(kern.kerning(36, 36), 0);
    }

    #[test]
    fn apple_pairs() {
        let body = format_0_body(&[(1, 2, 25)]);

        let mut data = vec![0, 1, 0, 0, 0, 0, 0, 1];
        data.extend_from_slice(&(body.len() as u32 + 8).to_be_bytes());
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend(body);

        let kern = KernTable::parse(&data).unwrap();

        assert_eq!(kern.kerning(1, 2), 25);
    }

    #[test]
    fn unknown_version_is_empty() {
        assert!(KernTable::parse(&[0, 7, 0, 0]).unwrap().is_empty());
    }
}
