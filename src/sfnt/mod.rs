//! The table directory shared by TrueType and OpenType font programs, in any of
//! the containers they arrive in

use std::ops::Range;

use crate::{
    error::FontError,
    parse_binary::{BinaryParser, ByteReader},
};

pub use tag::TableTag;

mod resource_fork;
mod tag;

const TRUE_TYPE_VERSION: u32 = 0x0001_0000;
const APPLE_TRUE_TYPE_VERSION: u32 = u32::from_be_bytes(*b"true");
const OPEN_TYPE_VERSION: u32 = u32::from_be_bytes(*b"OTTO");
const COLLECTION_TAG: u32 = u32::from_be_bytes(*b"ttcf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SfntVersion {
    /// `0x00010000` or `true`: glyph outlines live in `glyf`
    TrueType,

    /// `OTTO`: glyph outlines live in `CFF `
    OpenType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: TableTag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

#[derive(Debug, Clone)]
pub struct TableDirectory {
    pub version: SfntVersion,

    /// Start of the sfnt data within the bytes the directory was parsed from.
    /// Non-zero only for resource-fork wrapped fonts, where table offsets are
    /// relative to the embedded resource
    base: usize,

    tables: Vec<TableRecord>,
}

impl TableDirectory {
    pub fn parse(bytes: &[u8]) -> anyhow::Result<Self> {
        Self::parse_at(bytes, 0)
    }

    /// Parses the directory of the `index`th font. Plain sfnt fonts only accept
    /// index 0
    pub fn parse_at(bytes: &[u8], index: u32) -> anyhow::Result<Self> {
        let mut reader = ByteReader::new(bytes);
        let tag = reader.parse_u32()?;

        match tag {
            COLLECTION_TAG => {
                let offset = collection_offset(bytes, index)?;
                Self::parse_offset_table(bytes, offset, 0)
            }
            TRUE_TYPE_VERSION | APPLE_TRUE_TYPE_VERSION | OPEN_TYPE_VERSION => {
                if index != 0 {
                    anyhow::bail!(FontError::FontIndexOutOfBounds { index, count: 1 });
                }

                Self::parse_offset_table(bytes, 0, 0)
            }
            found => match resource_fork::find_sfnt_resource(bytes) {
                Some(sfnt) => {
                    // `sfnt` is a subslice of `bytes`
                    let base = sfnt.as_ptr() as usize - bytes.as_ptr() as usize;
                    log::debug!("found sfnt resource at offset {}", base);
                    Self::parse_offset_table(bytes, base, base)
                }
                None => anyhow::bail!(FontError::UnknownFormat { found }),
            },
        }
    }

    /// Number of fonts in `bytes`: the collection's count, or 1 for a single font
    pub fn font_count(bytes: &[u8]) -> anyhow::Result<u32> {
        let mut reader = ByteReader::new(bytes);

        if reader.parse_u32()? != COLLECTION_TAG {
            return Ok(1);
        }

        let _version = reader.parse_u32()?;

        reader.parse_u32()
    }

    fn parse_offset_table(bytes: &[u8], offset: usize, base: usize) -> anyhow::Result<Self> {
        let mut reader = ByteReader::new_at(bytes, offset);

        let version = match reader.parse_u32()? {
            TRUE_TYPE_VERSION | APPLE_TRUE_TYPE_VERSION => SfntVersion::TrueType,
            OPEN_TYPE_VERSION => SfntVersion::OpenType,
            found => anyhow::bail!(FontError::UnknownFormat { found }),
        };

        let number_of_tables = reader.parse_u16()?;
        let _search_range = reader.parse_u16()?;
        let _entry_selector = reader.parse_u16()?;
        let _range_shift = reader.parse_u16()?;

        let mut tables = Vec::with_capacity(usize::from(number_of_tables));

        for _ in 0..number_of_tables {
            let record = TableRecord {
                tag: reader.parse_tag()?,
                checksum: reader.parse_u32()?,
                offset: reader.parse_u32()?,
                length: reader.parse_u32()?,
            };

            if record.offset as usize + base > bytes.len() {
                log::warn!("table {} starts past the end of the font, ignoring", record.tag);
                continue;
            }

            tables.push(record);
        }

        Ok(Self {
            version,
            base,
            tables,
        })
    }

    pub fn tables(&self) -> &[TableRecord] {
        &self.tables
    }

    pub fn find(&self, tag: TableTag) -> Option<TableRecord> {
        self.tables.iter().find(|record| record.tag == tag).copied()
    }

    pub fn has_table(&self, tag: TableTag) -> bool {
        self.find(tag).is_some()
    }

    /// The bytes of table `tag`. A table whose declared length runs past the end
    /// of `bytes` is truncated to what is available
    pub fn table_data<'a>(&self, bytes: &'a [u8], tag: TableTag) -> Option<&'a [u8]> {
        bytes.get(self.table_range(bytes, tag)?)
    }

    /// Position of table `tag` within `bytes`, truncated like [`Self::table_data`]
    pub fn table_range(&self, bytes: &[u8], tag: TableTag) -> Option<Range<usize>> {
        let record = self.find(tag)?;

        let start = self.base + record.offset as usize;
        let end = start.saturating_add(record.length as usize);

        if end > bytes.len() {
            log::warn!(
                "table {} is truncated: {} of {} bytes available",
                tag,
                bytes.len().saturating_sub(start),
                record.length
            );
        }

        (start <= bytes.len()).then(|| start..end.min(bytes.len()))
    }

    pub fn require_table<'a>(&self, bytes: &'a [u8], tag: TableTag) -> anyhow::Result<&'a [u8]> {
        match self.table_data(bytes, tag) {
            Some(data) => Ok(data),
            None => anyhow::bail!(FontError::MissingTable { tag }),
        }
    }

    /// Fails with [`FontError::RetryAsOpenType`] when the font has no TrueType
    /// outlines but does carry a `CFF ` table
    pub fn check_glyf_outlines(&self) -> anyhow::Result<()> {
        let has_glyf = self.has_table(TableTag::GLYF) && self.has_table(TableTag::LOCA);

        if !has_glyf && self.has_table(TableTag::CFF) {
            anyhow::bail!(FontError::RetryAsOpenType);
        }

        Ok(())
    }
}

fn collection_offset(bytes: &[u8], index: u32) -> anyhow::Result<usize> {
    let mut reader = ByteReader::new_at(bytes, 4);

    let major_version = reader.parse_u16()?;
    let _minor_version = reader.parse_u16()?;

    if major_version != 1 && major_version != 2 {
        anyhow::bail!(FontError::UnsupportedVersion {
            table: "ttcf",
            version: u32::from(major_version),
        });
    }

    let count = reader.parse_u32()?;

    if index >= count {
        anyhow::bail!(FontError::FontIndexOutOfBounds { index, count });
    }

    reader.skip(index as usize * 4)?;

    Ok(reader.parse_u32()? as usize)
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Assembles a plain sfnt from `(tag, data)` pairs
    pub(crate) fn build_sfnt(version: u32, tables: &[(TableTag, &[u8])]) -> Vec<u8> {
        let header_len = 12 + 16 * tables.len();

        let mut out = Vec::new();
        out.extend_from_slice(&version.to_be_bytes());
        out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        out.extend_from_slice(&[0; 6]);

        let mut offset = header_len;
        let mut data = Vec::new();

        for (tag, bytes) in tables {
            out.extend_from_slice(&tag.to_be_u32().to_be_bytes());
            out.extend_from_slice(&0u32.to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());

            data.extend_from_slice(bytes);
            while data.len() % 4 != 0 {
                data.push(0);
            }
            offset = header_len + data.len();
        }

        out.extend_from_slice(&data);
        out
    }

    #[test]
    fn finds_tables_in_plain_sfnt() {
        let font = build_sfnt(
            TRUE_TYPE_VERSION,
            &[(TableTag::HEAD, b"abcd"), (TableTag::MAXP, b"xyz")],
        );

        let directory = TableDirectory::parse(&font).unwrap();

        assert_eq!(directory.version, SfntVersion::TrueType);
        assert_eq!(directory.table_data(&font, TableTag::MAXP), Some(&b"xyz"[..]));
        assert_eq!(directory.table_data(&font, TableTag::GLYF), None);
    }

    #[test]
    fn truncated_table_is_clipped() {
        let mut font = build_sfnt(TRUE_TYPE_VERSION, &[(TableTag::HEAD, b"abcdefgh")]);
        font.truncate(font.len() - 4);

        let directory = TableDirectory::parse(&font).unwrap();

        assert_eq!(directory.table_data(&font, TableTag::HEAD), Some(&b"abcd"[..]));
    }

    #[test]
    fn cff_without_glyf_requests_retry() {
        let font = build_sfnt(TRUE_TYPE_VERSION, &[(TableTag::CFF, b"\x01\x00\x04\x01")]);

        let directory = TableDirectory::parse(&font).unwrap();
        let err = directory.check_glyf_outlines().unwrap_err();

        assert!(crate::error::is_retry_as_open_type(&err));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = TableDirectory::parse(b"wOFF\0\0\0\0\0\0\0\0").unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FontError>(),
            Some(FontError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn collection_selects_font_by_index() {
        let first = build_sfnt(TRUE_TYPE_VERSION, &[(TableTag::HEAD, b"one!")]);
        let second = build_sfnt(OPEN_TYPE_VERSION, &[(TableTag::HEAD, b"two!")]);

        let header_len = 12 + 8;
        let mut ttc = Vec::new();
        ttc.extend_from_slice(b"ttcf");
        ttc.extend_from_slice(&[0, 1, 0, 0]);
        ttc.extend_from_slice(&2u32.to_be_bytes());
        ttc.extend_from_slice(&(header_len as u32).to_be_bytes());
        ttc.extend_from_slice(&((header_len + first.len()) as u32).to_be_bytes());

        // table offsets in a collection are relative to the start of the file
        let mut rebase = |mut font: Vec<u8>, base: usize| {
            let count = u16::from_be_bytes([font[4], font[5]]) as usize;
            for i in 0..count {
                let pos = 12 + 16 * i + 8;
                let offset = u32::from_be_bytes(font[pos..pos + 4].try_into().unwrap());
                font[pos..pos + 4].copy_from_slice(&(offset + base as u32).to_be_bytes());
            }
            ttc.extend_from_slice(&font);
        };
        rebase(first.clone(), header_len);
        rebase(second, header_len + first.len());

        assert_eq!(TableDirectory::font_count(&ttc).unwrap(), 2);

        let directory = TableDirectory::parse_at(&ttc, 1).unwrap();
        assert_eq!(directory.version, SfntVersion::OpenType);
        assert_eq!(directory.table_data(&ttc, TableTag::HEAD), Some(&b"two!"[..]));

        assert!(TableDirectory::parse_at(&ttc, 2).is_err());
    }

    #[test]
    fn resource_fork_wrapped_font() {
        let font = build_sfnt(TRUE_TYPE_VERSION, &[(TableTag::HEAD, b"mac!")]);
        let fork = resource_fork::test::wrap_in_resource_fork(&font);

        let directory = TableDirectory::parse(&fork).unwrap();

        assert_eq!(directory.table_data(&fork, TableTag::HEAD), Some(&b"mac!"[..]));
    }
}
