//! Character to glyph index mappings of the `cmap` table, converted to
//! [`CMap`]s keyed by character code

use crate::{
    cmap::{CMap, CMapBuilder, NOTDEF},
    error::FontError,
    parse_binary::{BinaryParser, ByteReader},
};

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_MACINTOSH: u16 = 1;
pub const PLATFORM_WINDOWS: u16 = 3;

pub const WINDOWS_SYMBOL: u16 = 0;
pub const WINDOWS_UNICODE_BMP: u16 = 1;
pub const WINDOWS_UNICODE_FULL: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmapRecord {
    pub platform_id: u16,
    pub encoding_id: u16,

    /// From the start of the `cmap` table
    pub offset: u32,
}

impl CmapRecord {
    pub fn is_symbol(&self) -> bool {
        self.platform_id == PLATFORM_WINDOWS && self.encoding_id == WINDOWS_SYMBOL
    }

    /// Rank of the subtable when choosing one for text: Unicode first, then
    /// Mac Roman, then Symbol
    fn preference(&self) -> u8 {
        match (self.platform_id, self.encoding_id) {
            (PLATFORM_WINDOWS, WINDOWS_UNICODE_BMP) => 0,
            (PLATFORM_WINDOWS, WINDOWS_UNICODE_FULL) => 1,
            (PLATFORM_UNICODE, _) => 2,
            (PLATFORM_MACINTOSH, 0) => 3,
            (PLATFORM_WINDOWS, WINDOWS_SYMBOL) => 4,
            _ => 5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CmapTable {
    records: Vec<CmapRecord>,
}

impl CmapTable {
    pub fn parse(data: &[u8]) -> anyhow::Result<Self> {
        let mut reader = ByteReader::new(data);

        let version = reader.parse_u16()?;
        if version != 0 {
            log::debug!("unexpected cmap version {}", version);
        }

        let num_tables = reader.parse_u16()?;
        let mut records = Vec::with_capacity(usize::from(num_tables));

        for _ in 0..num_tables {
            let record = CmapRecord {
                platform_id: reader.parse_u16()?,
                encoding_id: reader.parse_u16()?,
                offset: reader.parse_u32()?,
            };

            if record.offset as usize >= data.len() {
                log::warn!(
                    "cmap subtable ({}, {}) starts past the end of the table",
                    record.platform_id,
                    record.encoding_id
                );
                continue;
            }

            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[CmapRecord] {
        &self.records
    }

    pub fn find(&self, platform_id: u16, encoding_id: u16) -> Option<CmapRecord> {
        self.records
            .iter()
            .find(|r| r.platform_id == platform_id && r.encoding_id == encoding_id)
            .copied()
    }

    /// The subtable best suited for mapping text, if any is recognized
    pub fn preferred(&self) -> Option<CmapRecord> {
        self.records
            .iter()
            .filter(|r| r.preference() < 5)
            .min_by_key(|r| r.preference())
            .copied()
    }

    /// Reads the subtable at `record` into a [`CMap`] from character codes to
    /// glyph indices
    pub fn read_subtable(data: &[u8], record: CmapRecord) -> anyhow::Result<CMap> {
        let mut reader = ByteReader::new_at(data, record.offset as usize);
        let format = reader.parse_u16()?;

        let mut mapper = Mapper {
            builder: CMapBuilder::new(),
            symbol: record.is_symbol(),
        };

        match format {
            0 => read_format_0(&mut reader, &mut mapper)?,
            2 => read_format_2(&mut reader, &mut mapper)?,
            4 => read_format_4(&mut reader, &mut mapper)?,
            6 => read_format_6(&mut reader, &mut mapper)?,
            8 => {
                log::debug!("cmap format 8 is not supported, using identity");
                return Ok(CMap::identity());
            }
            10 => read_format_10(&mut reader, &mut mapper)?,
            12 => read_format_12(&mut reader, &mut mapper)?,
            format => anyhow::bail!(FontError::UnsupportedVersion {
                table: "cmap",
                version: u32::from(format),
            }),
        }

        Ok(mapper.builder.build())
    }
}

struct Mapper {
    builder: CMapBuilder,

    /// Symbol fonts place their glyphs at 0xF000 + byte
    symbol: bool,
}

impl Mapper {
    fn insert(&mut self, code: u32, gid: u16) {
        if gid == NOTDEF || code >= 0xFFFF {
            if code > 0xFFFF {
                log::trace!("dropping cmap code {:#x} outside the BMP", code);
            }
            return;
        }

        let code = code as u16;

        if self.symbol && (0xF000..=0xF0FF).contains(&code) {
            self.builder.map(code & 0xFF, gid);
        } else {
            self.builder.map(code, gid);
        }
    }
}

fn read_format_0(reader: &mut ByteReader, mapper: &mut Mapper) -> anyhow::Result<()> {
    let _length = reader.parse_u16()?;
    let _language = reader.parse_u16()?;

    let glyphs = reader.read_slice(256)?;

    for (code, &gid) in glyphs.iter().enumerate() {
        mapper.insert(code as u32, u16::from(gid));
    }

    Ok(())
}

/// High-byte mapping through subheaders, for mixed one and two byte CJK codes
fn read_format_2(reader: &mut ByteReader, mapper: &mut Mapper) -> anyhow::Result<()> {
    let _length = reader.parse_u16()?;
    let _language = reader.parse_u16()?;

    let mut sub_header_keys = [0u16; 256];
    for key in &mut sub_header_keys {
        *key = reader.parse_u16()? / 8;
    }

    let sub_headers_start = reader.cursor();

    let read_sub_header = |idx: u16| -> anyhow::Result<(u16, u16, i16, usize)> {
        let pos = sub_headers_start + usize::from(idx) * 8;
        let mut reader = ByteReader::new_at(reader.buffer(), pos);

        let first_code = reader.parse_u16()?;
        let entry_count = reader.parse_u16()?;
        let id_delta = reader.parse_i16()?;
        // relative to the position of the idRangeOffset field itself
        let glyphs_start = pos + 6 + usize::from(reader.parse_u16()?);

        Ok((first_code, entry_count, id_delta, glyphs_start))
    };

    let glyph_at = |glyphs_start: usize, idx: u16, id_delta: i16| -> u16 {
        let mut reader = ByteReader::new_at(reader.buffer(), glyphs_start + usize::from(idx) * 2);
        match reader.parse_u16() {
            Ok(NOTDEF) | Err(..) => NOTDEF,
            Ok(gid) => gid.wrapping_add(id_delta as u16),
        }
    };

    // one byte codes all go through subheader 0
    let single_byte = read_sub_header(0)
        .map_err(|err| log::warn!("invalid cmap format 2 subheader 0: {}", err))
        .ok();

    for high in 0..=255u8 {
        let key = sub_header_keys[usize::from(high)];

        if key == 0 {
            mapper.builder.add_code_space(high, high, 1);

            if let Some((first_code, entry_count, id_delta, glyphs_start)) = single_byte {
                let low = u16::from(high);
                if low >= first_code && low - first_code < entry_count {
                    mapper.insert(
                        u32::from(low),
                        glyph_at(glyphs_start, low - first_code, id_delta),
                    );
                }
            }

            continue;
        }

        mapper.builder.add_code_space(high, high, 2);

        let (first_code, entry_count, id_delta, glyphs_start) = match read_sub_header(key) {
            Ok(sub_header) => sub_header,
            Err(err) => {
                log::warn!("invalid cmap format 2 subheader {}: {}", key, err);
                continue;
            }
        };

        for idx in 0..entry_count.min(256) {
            let low = first_code.saturating_add(idx);
            if low > 0xFF {
                break;
            }

            let code = (u32::from(high) << 8) | u32::from(low);
            mapper.insert(code, glyph_at(glyphs_start, idx, id_delta));
        }
    }

    Ok(())
}

/// Segment mapping to delta values
fn read_format_4(reader: &mut ByteReader, mapper: &mut Mapper) -> anyhow::Result<()> {
    let _length = reader.parse_u16()?;
    let _language = reader.parse_u16()?;
    let seg_count = usize::from(reader.parse_u16()? / 2);
    // searchRange, entrySelector, rangeShift
    reader.skip(6)?;

    let end_codes = reader.read_slice(seg_count * 2)?;
    let _reserved_pad = reader.parse_u16()?;
    let start_codes = reader.read_slice(seg_count * 2)?;
    let id_deltas = reader.read_slice(seg_count * 2)?;
    let id_range_offsets_start = reader.cursor();
    let id_range_offsets = reader.read_slice(seg_count * 2)?;

    let read = |bytes: &[u8], idx: usize| u16::from_be_bytes([bytes[idx * 2], bytes[idx * 2 + 1]]);

    for seg in 0..seg_count {
        let start = read(start_codes, seg);
        let end = read(end_codes, seg);
        let id_delta = read(id_deltas, seg);
        let id_range_offset = read(id_range_offsets, seg);

        if start > end {
            log::debug!("skipping inverted cmap segment {:#x}..{:#x}", start, end);
            continue;
        }

        for code in start..=end {
            let gid = if id_range_offset == 0 {
                code.wrapping_add(id_delta)
            } else {
                let pos = id_range_offsets_start
                    + seg * 2
                    + usize::from(id_range_offset)
                    + usize::from(code - start) * 2;

                match ByteReader::new_at(reader.buffer(), pos).parse_u16() {
                    Ok(NOTDEF) => NOTDEF,
                    Ok(gid) => gid.wrapping_add(id_delta),
                    Err(..) => {
                        log::warn!("cmap segment {} runs past the end of the table", seg);
                        break;
                    }
                }
            };

            mapper.insert(u32::from(code), gid);
        }
    }

    Ok(())
}

/// Trimmed table mapping
fn read_format_6(reader: &mut ByteReader, mapper: &mut Mapper) -> anyhow::Result<()> {
    let _length = reader.parse_u16()?;
    let _language = reader.parse_u16()?;
    let first_code = reader.parse_u16()?;
    let entry_count = reader.parse_u16()?;

    for idx in 0..entry_count {
        let gid = reader.parse_u16()?;
        mapper.insert(u32::from(first_code) + u32::from(idx), gid);
    }

    Ok(())
}

/// Trimmed array with 32-bit codes
fn read_format_10(reader: &mut ByteReader, mapper: &mut Mapper) -> anyhow::Result<()> {
    let _reserved = reader.parse_u16()?;
    let _length = reader.parse_u32()?;
    let _language = reader.parse_u32()?;
    let start_char_code = reader.parse_u32()?;
    let num_chars = reader.parse_u32()?;

    for idx in 0..num_chars {
        let code = start_char_code.saturating_add(idx);
        if code >= 0xFFFF {
            break;
        }

        mapper.insert(code, reader.parse_u16()?);
    }

    Ok(())
}

/// Segmented coverage with 32-bit codes
fn read_format_12(reader: &mut ByteReader, mapper: &mut Mapper) -> anyhow::Result<()> {
    let _reserved = reader.parse_u16()?;
    let _length = reader.parse_u32()?;
    let _language = reader.parse_u32()?;
    let num_groups = reader.parse_u32()?;

    for _ in 0..num_groups {
        let start = reader.parse_u32()?;
        let end = reader.parse_u32()?;
        let start_glyph = reader.parse_u32()?;

        if start > end {
            continue;
        }

        if end >= 0xFFFF {
            log::debug!(
                "dropping cmap codes {:#x}..={:#x} outside the BMP",
                start.max(0xFFFF),
                end
            );
        }

        for code in start..=end.min(0xFFFE) {
            match u16::try_from(start_glyph + (code - start)) {
                Ok(gid) => mapper.insert(code, gid),
                Err(..) => break,
            }
        }
    }

    Ok(())
}
