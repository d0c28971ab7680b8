use crate::{
    error::FontError,
    parse_binary::{BinaryParser, ByteReader},
};

/// Which font DICT of a CID-keyed font each glyph uses
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FdSelect {
    /// One FD index per glyph
    Format0(Vec<u8>),
    /// Sorted `(first glyph, fd)` ranges, each running to the next range's first
    /// glyph or to `sentinel`
    Format3 { ranges: Vec<(u16, u8)>, sentinel: u16 },
}

impl FdSelect {
    pub fn parse(buffer: &[u8], offset: u32, num_glyphs: usize) -> anyhow::Result<Self> {
        let mut reader = ByteReader::new_at(buffer, offset as usize);

        match reader.parse_u8()? {
            0 => {
                let fds = (0..num_glyphs)
                    .map(|_| reader.parse_u8())
                    .collect::<anyhow::Result<Vec<u8>>>()?;

                Ok(Self::Format0(fds))
            }
            3 => {
                let n_ranges = reader.parse_u16()?;
                let mut ranges = Vec::with_capacity(usize::from(n_ranges));

                for _ in 0..n_ranges {
                    let first = reader.parse_u16()?;
                    let fd = reader.parse_u8()?;

                    if ranges.last().map_or(false, |&(prev, _)| prev >= first) {
                        log::warn!("FDSelect ranges out of order at glyph {}", first);
                        continue;
                    }

                    ranges.push((first, fd));
                }

                let sentinel = reader.parse_u16()?;

                Ok(Self::Format3 { ranges, sentinel })
            }
            format => anyhow::bail!(FontError::UnsupportedVersion {
                table: "FDSelect",
                version: u32::from(format),
            }),
        }
    }

    /// FD index for `gid`. Glyphs outside every range use FD 0
    pub fn fd_index(&self, gid: u16) -> usize {
        let fd = match self {
            Self::Format0(fds) => fds.get(usize::from(gid)).copied(),
            Self::Format3 { ranges, sentinel } => {
                let idx = ranges.partition_point(|&(first, _)| first <= gid);

                idx.checked_sub(1)
                    .filter(|_| gid < *sentinel)
                    .map(|idx| ranges[idx].1)
            }
        };

        usize::from(fd.unwrap_or(0))
    }
}
