use crate::{
    error::FontError,
    parse_binary::{BinaryParser, ByteReader},
};

use super::{
    charset::CffCharset,
    dict::{CffDictInterpreter, PrivateDict, TopDict},
    encoding::CffEncoding,
    fdselect::FdSelect,
    index::CffIndex,
    CffKind, FdFont, PrivateData,
};

#[derive(Debug)]
pub struct CffHeader {
    pub major: u8,
    pub minor: u8,
    pub header_size: u8,
    pub off_size: u8,
}

/// Everything read from the CFF data, before it is wrapped into a
/// [`super::CffFont`]
#[derive(Debug)]
pub(super) struct CffTables {
    pub name: Option<String>,
    pub top_dict: TopDict,
    pub strings: Vec<String>,
    pub global_subrs: CffIndex,
    pub charstrings: CffIndex,
    pub charset: CffCharset,
    pub encoding: Option<CffEncoding>,
    pub kind: CffKind,
}

pub(super) struct CffParser<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> CffParser<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn parse(&mut self) -> anyhow::Result<CffTables> {
        let header = self.parse_header()?;

        if header.major != 1 {
            anyhow::bail!(FontError::UnsupportedVersion {
                table: "CFF",
                version: u32::from(header.major),
            });
        }

        self.seek(usize::from(header.header_size));

        let name_index = self.parse_index()?;
        let top_dict_index = self.parse_index()?;
        let string_index = self.parse_index()?;
        let global_subrs = self.parse_index()?;

        if top_dict_index.len() > 1 {
            log::debug!(
                "CFF data holds {} fonts, using the first",
                top_dict_index.len()
            );
        }

        let name = name_index
            .get(self.buffer, 0)
            .map(|name| String::from_utf8_lossy(name).into_owned());

        let top_dict = CffDictInterpreter::parse_top_dict(
            top_dict_index
                .get(self.buffer, 0)
                .ok_or(FontError::invalid("CFF data has no top DICT"))?,
        )?;

        let strings = string_index
            .iter(self.buffer)
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .collect();

        let charstrings_offset = top_dict
            .char_strings
            .ok_or(FontError::invalid("CFF top DICT has no CharStrings"))?;
        self.seek(charstrings_offset as usize);
        let charstrings = self.parse_index()?;
        let num_glyphs = charstrings.len();

        let charset = CffCharset::parse(self.buffer, top_dict.charset, num_glyphs)
            .unwrap_or_else(|err| {
                log::warn!("invalid CFF charset, assuming ISOAdobe: {}", err);
                CffCharset::IsoAdobe
            });

        let (encoding, kind) = if top_dict.ros.is_some() {
            (None, self.parse_cid_keyed(&top_dict, num_glyphs)?)
        } else {
            let sid_to_gid = charset.inverse(num_glyphs);
            let encoding =
                CffEncoding::parse(self.buffer, top_dict.encoding, num_glyphs, &sid_to_gid)
                    .or_else(|err| {
                        log::warn!("invalid CFF encoding, assuming standard: {}", err);
                        CffEncoding::parse(self.buffer, 0, num_glyphs, &sid_to_gid)
                    })?;

            let private = match top_dict.private {
                Some((size, offset)) => self.parse_private(size, offset)?,
                None => PrivateData::default(),
            };

            (Some(encoding), CffKind::NameKeyed(private))
        };

        Ok(CffTables {
            name,
            top_dict,
            strings,
            global_subrs,
            charstrings,
            charset,
            encoding,
            kind,
        })
    }

    fn parse_cid_keyed(
        &mut self,
        top_dict: &TopDict,
        num_glyphs: usize,
    ) -> anyhow::Result<CffKind> {
        let fd_array_offset = top_dict
            .fd_array
            .ok_or(FontError::invalid("CID-keyed CFF has no FDArray"))?;

        self.seek(fd_array_offset as usize);
        let fd_array = self.parse_index()?;

        let mut fonts = Vec::with_capacity(fd_array.len());

        for fd in fd_array.iter(self.buffer) {
            let font_dict = CffDictInterpreter::parse_font_dict(fd)?;

            let private = match font_dict.private {
                Some((size, offset)) => self.parse_private(size, offset)?,
                None => PrivateData::default(),
            };

            fonts.push(FdFont {
                font_matrix: font_dict.font_matrix,
                private,
            });
        }

        let fd_select = match top_dict.fd_select {
            Some(offset) => FdSelect::parse(self.buffer, offset, num_glyphs)?,
            None => {
                log::debug!("CID-keyed CFF has no FDSelect, using the first font DICT");
                FdSelect::Format0(Vec::new())
            }
        };

        Ok(CffKind::CidKeyed { fd_select, fonts })
    }

    /// Reads a Private DICT and the local subroutines it points to
    fn parse_private(&mut self, size: u32, offset: u32) -> anyhow::Result<PrivateData> {
        let start = offset as usize;
        let dict_bytes = start
            .checked_add(size as usize)
            .and_then(|end| self.buffer.get(start..end))
            .ok_or(FontError::UnexpectedEof)?;

        let dict: PrivateDict = CffDictInterpreter::parse_private_dict(dict_bytes)?;

        let local_subrs = match dict.subrs {
            Some(subrs) => {
                self.seek(start + subrs as usize);
                self.parse_index().unwrap_or_else(|err| {
                    log::warn!("invalid local subroutines: {}", err);
                    CffIndex::default()
                })
            }
            None => CffIndex::default(),
        };

        Ok(PrivateData { dict, local_subrs })
    }

    fn parse_header(&mut self) -> anyhow::Result<CffHeader> {
        let major = self.next()?;
        let minor = self.next()?;
        let header_size = self.next()?;
        let off_size = self.next()?;

        Ok(CffHeader {
            major,
            minor,
            header_size,
            off_size,
        })
    }

    fn parse_index(&mut self) -> anyhow::Result<CffIndex> {
        let mut reader = ByteReader::new_at(self.buffer, self.cursor);
        let index = CffIndex::parse(&mut reader)?;
        self.cursor = reader.cursor();

        Ok(index)
    }
}

impl<'a> BinaryParser for CffParser<'a> {
    fn buffer(&self) -> &[u8] {
        self.buffer
    }
    fn cursor(&self) -> usize {
        self.cursor
    }
    fn cursor_mut(&mut self) -> &mut usize {
        &mut self.cursor
    }
}
