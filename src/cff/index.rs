use crate::{
    error::FontError,
    parse_binary::{BinaryParser, ByteReader},
};

/// An INDEX structure: a count, an array of offsets and the object data
///
/// Offsets are stored resolved to absolute positions in the CFF data, so the
/// index can outlive the reader it was parsed with
#[derive(Debug, Clone, Default)]
pub(crate) struct CffIndex {
    pub count: u16,
    /// `count + 1` absolute offsets, or none for an empty index
    offsets: Vec<usize>,
}

impl CffIndex {
    pub fn parse(reader: &mut ByteReader) -> anyhow::Result<Self> {
        let count = reader.parse_u16()?;

        if count == 0 {
            return Ok(Self::default());
        }

        let offsize = reader.parse_u8()?;
        anyhow::ensure!(
            (1..=4).contains(&offsize),
            FontError::invalid(format!("invalid INDEX offset size: {}", offsize))
        );

        let mut offsets = Vec::with_capacity(usize::from(count) + 1);

        for _ in 0..=count {
            offsets.push(reader.parse_offset(offsize)? as usize);
        }

        // offsets are relative to the byte preceding the object data
        let data_start = reader.cursor() - 1;

        anyhow::ensure!(
            offsets[0] == 1 && offsets.windows(2).all(|w| w[0] <= w[1]),
            FontError::invalid("INDEX offsets are not increasing")
        );

        for offset in &mut offsets {
            *offset += data_start;
        }

        let end = offsets[usize::from(count)];
        anyhow::ensure!(end <= reader.buffer().len(), FontError::UnexpectedEof);

        reader.seek(end);

        Ok(Self { count, offsets })
    }

    pub fn len(&self) -> usize {
        usize::from(self.count)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get<'a>(&self, buffer: &'a [u8], idx: usize) -> Option<&'a [u8]> {
        let start = *self.offsets.get(idx)?;
        let end = *self.offsets.get(idx + 1)?;

        buffer.get(start..end)
    }

    pub fn iter<'a, 'b>(&'b self, buffer: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + 'b
    where
        'a: 'b,
    {
        (0..self.len()).filter_map(move |idx| self.get(buffer, idx))
    }
}

/// Bias added to subroutine numbers before indexing, chosen so small
/// operand encodings can reach more subroutines
pub(crate) fn subr_bias(count: usize) -> i32 {
    if count < 1240 {
        107
    } else if count < 33900 {
        1131
    } else {
        32768
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Serializes `items` as an INDEX with 1 byte offsets
    pub(crate) fn build_index(items: &[&[u8]]) -> Vec<u8> {
        let mut out = (items.len() as u16).to_be_bytes().to_vec();

        if items.is_empty() {
            return out;
        }

        out.push(1);

        let mut offset = 1u8;
        out.push(offset);

        for item in items {
            offset += item.len() as u8;
            out.push(offset);
        }

        for item in items {
            out.extend_from_slice(item);
        }

        out
    }

    #[test]
    fn parses_items() {
        let mut data = vec![0xaa];
        data.extend(build_index(&[b"ab", b"", b"cde"]));
        data.push(0xff);

        let mut reader = ByteReader::new_at(&data, 1);
        let index = CffIndex::parse(&mut reader).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(&data, 0), Some(&b"ab"[..]));
        assert_eq!(index.get(&data, 1), Some(&b""[..]));
        assert_eq!(index.get(&data, 2), Some(&b"cde"[..]));
        assert_eq!(index.get(&data, 3), None);
        assert_eq!(reader.parse_u8().unwrap(), 0xff);
    }

    #[test]
    fn empty_index_is_two_bytes() {
        let data = [0, 0, 0x42];
        let mut reader = ByteReader::new(&data);
        let index = CffIndex::parse(&mut reader).unwrap();

        assert!(index.is_empty());
        assert_eq!(reader.cursor(), 2);
    }

    #[test]
    fn truncated_index_fails() {
        let data = [0, 1, 1, 1, 5, b'a'];

        assert!(CffIndex::parse(&mut ByteReader::new(&data)).is_err());
    }

    #[test]
    fn bias_thresholds() {
        assert_eq!(subr_bias(0), 107);
        assert_eq!(subr_bias(1239), 107);
        assert_eq!(subr_bias(1240), 1131);
        assert_eq!(subr_bias(33899), 1131);
        assert_eq!(subr_bias(33900), 32768);
    }
}
