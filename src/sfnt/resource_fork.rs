//! Minimal reader for classic Mac OS resource forks, used to pull the `sfnt`
//! resource out of a suitcase-wrapped font

use crate::parse_binary::{BinaryParser, ByteReader};

const SFNT_RESOURCE: [u8; 4] = *b"sfnt";

/// Offsets of the fork's data and map sections, as read from its 16 byte header
#[derive(Debug)]
struct ResourceHeader {
    data_offset: usize,
    map_offset: usize,
    data_length: usize,
    map_length: usize,
}

impl ResourceHeader {
    fn parse(buffer: &[u8]) -> Option<Self> {
        let mut reader = ByteReader::new(buffer);

        let header = Self {
            data_offset: reader.parse_u32().ok()? as usize,
            map_offset: reader.parse_u32().ok()? as usize,
            data_length: reader.parse_u32().ok()? as usize,
            map_length: reader.parse_u32().ok()? as usize,
        };

        let fits = |offset: usize, length: usize| {
            offset
                .checked_add(length)
                .map_or(false, |end| end <= buffer.len())
        };

        if header.data_offset < 16
            || header.map_length < 28
            || !fits(header.data_offset, header.data_length)
            || !fits(header.map_offset, header.map_length)
        {
            return None;
        }

        Some(header)
    }
}

/// Returns the bytes of the first `sfnt` resource, or `None` when `buffer` does
/// not look like a resource fork
pub(crate) fn find_sfnt_resource(buffer: &[u8]) -> Option<&[u8]> {
    let header = ResourceHeader::parse(buffer)?;

    let mut map = ByteReader::new_at(buffer, header.map_offset);

    // copy of the header, next map handle, file reference number, attributes
    map.skip(16 + 4 + 2 + 2).ok()?;

    let type_list_offset = header.map_offset + map.parse_u16().ok()? as usize;

    let mut types = ByteReader::new_at(buffer, type_list_offset);
    let number_of_types = types.parse_u16().ok()?.wrapping_add(1);

    for _ in 0..number_of_types {
        let resource_type = types.read_slice(4).ok()?;
        let number_of_resources = types.parse_u16().ok()?.wrapping_add(1);
        let reference_list_offset = types.parse_u16().ok()? as usize;

        if resource_type != SFNT_RESOURCE {
            continue;
        }

        let mut references = ByteReader::new_at(buffer, type_list_offset + reference_list_offset);

        for _ in 0..number_of_resources {
            let _id = references.parse_u16().ok()?;
            let _name_offset = references.parse_i16().ok()?;
            let _attributes = references.parse_u8().ok()?;
            let data_offset = references.parse_u24().ok()? as usize;
            let _handle = references.parse_u32().ok()?;

            let mut data = ByteReader::new_at(buffer, header.data_offset + data_offset);
            let length = data.parse_u32().ok()? as usize;

            match data.read_slice(length) {
                Ok(sfnt) => return Some(sfnt),
                Err(..) => {
                    log::warn!("truncated sfnt resource ({} bytes declared)", length);
                    return Some(data.tail());
                }
            }
        }
    }

    None
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Wraps `sfnt` in a resource fork holding a single `sfnt` resource
    pub(crate) fn wrap_in_resource_fork(sfnt: &[u8]) -> Vec<u8> {
        let data_offset = 256u32;
        let data_length = 4 + sfnt.len() as u32;
        let map_offset = data_offset + data_length;

        let mut map = Vec::new();
        map.extend_from_slice(&[0; 16 + 4 + 2 + 2]);
        // type list offset, name list offset
        map.extend_from_slice(&28u16.to_be_bytes());
        map.extend_from_slice(&0u16.to_be_bytes());
        // one type
        map.extend_from_slice(&0u16.to_be_bytes());
        map.extend_from_slice(b"sfnt");
        map.extend_from_slice(&0u16.to_be_bytes());
        // reference list follows the 2 byte count and the single 8 byte entry
        map.extend_from_slice(&10u16.to_be_bytes());
        // reference: id, name offset, attributes, data offset, handle
        map.extend_from_slice(&128u16.to_be_bytes());
        map.extend_from_slice(&(-1i16).to_be_bytes());
        map.push(0);
        map.extend_from_slice(&[0, 0, 0]);
        map.extend_from_slice(&0u32.to_be_bytes());

        let mut fork = Vec::new();
        fork.extend_from_slice(&data_offset.to_be_bytes());
        fork.extend_from_slice(&map_offset.to_be_bytes());
        fork.extend_from_slice(&data_length.to_be_bytes());
        fork.extend_from_slice(&(map.len() as u32).to_be_bytes());
        fork.resize(data_offset as usize, 0);
        fork.extend_from_slice(&(sfnt.len() as u32).to_be_bytes());
        fork.extend_from_slice(sfnt);
        fork.extend_from_slice(&map);

        fork
    }

    #[test]
    fn finds_sfnt_resource() {
        let fork = wrap_in_resource_fork(b"\x00\x01\x00\x00rest");

        assert_eq!(find_sfnt_resource(&fork), Some(&b"\x00\x01\x00\x00rest"[..]));
    }

    #[test]
    fn rejects_plain_data() {
        assert_eq!(find_sfnt_resource(b"\x00\x01\x00\x00\x00\x00"), None);
    }
}
