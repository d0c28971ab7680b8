use fixed::{
    types::extra::{U14, U16},
    FixedI16, FixedI32,
};

use crate::{error::FontError, sfnt::TableTag};

/// 16.16 signed fixed-point number
pub type Fixed = FixedI32<U16>;

/// 2.14 signed fixed-point number, used for composite glyph scales
pub type F2Dot14 = FixedI16<U14>;

/// Generic trait for parsing big-endian binary formats
pub trait BinaryParser {
    fn buffer(&self) -> &[u8];
    fn cursor(&self) -> usize;
    fn cursor_mut(&mut self) -> &mut usize;

    fn next(&mut self) -> anyhow::Result<u8> {
        let b = self.buffer().get(self.cursor()).copied();
        if b.is_some() {
            *self.cursor_mut() += 1;
        }
        b.ok_or(anyhow::anyhow!(FontError::UnexpectedEof))
    }

    fn at_end(&self) -> bool {
        self.cursor() >= self.buffer().len()
    }

    fn remaining(&self) -> usize {
        self.buffer().len().saturating_sub(self.cursor())
    }

    /// Move the cursor to an absolute offset. Seeking past the end is allowed;
    /// the next read fails instead
    fn seek(&mut self, offset: usize) {
        *self.cursor_mut() = offset;
    }

    fn skip(&mut self, n: usize) -> anyhow::Result<()> {
        anyhow::ensure!(self.remaining() >= n, FontError::UnexpectedEof);
        *self.cursor_mut() += n;
        Ok(())
    }

    fn parse_u8(&mut self) -> anyhow::Result<u8> {
        self.next()
    }

    fn parse_i8(&mut self) -> anyhow::Result<i8> {
        Ok(self.next()? as i8)
    }

    fn parse_u16(&mut self) -> anyhow::Result<u16> {
        let b1 = self.next()?;
        let b2 = self.next()?;

        Ok(u16::from_be_bytes([b1, b2]))
    }

    fn parse_i16(&mut self) -> anyhow::Result<i16> {
        let b1 = self.next()?;
        let b2 = self.next()?;

        Ok(i16::from_be_bytes([b1, b2]))
    }

    fn parse_u24(&mut self) -> anyhow::Result<u32> {
        let b1 = self.next()?;
        let b2 = self.next()?;
        let b3 = self.next()?;

        Ok(u32::from_be_bytes([0, b1, b2, b3]))
    }

    fn parse_u32(&mut self) -> anyhow::Result<u32> {
        let b1 = self.next()?;
        let b2 = self.next()?;
        let b3 = self.next()?;
        let b4 = self.next()?;

        Ok(u32::from_be_bytes([b1, b2, b3, b4]))
    }

    fn parse_i32(&mut self) -> anyhow::Result<i32> {
        let b1 = self.next()?;
        let b2 = self.next()?;
        let b3 = self.next()?;
        let b4 = self.next()?;

        Ok(i32::from_be_bytes([b1, b2, b3, b4]))
    }

    fn parse_i64(&mut self) -> anyhow::Result<i64> {
        let hi = self.parse_u32()? as u64;
        let lo = self.parse_u32()? as u64;

        Ok(((hi << 32) | lo) as i64)
    }

    /// Reads an offset of `size` bytes, as used by CFF INDEX structures
    fn parse_offset(&mut self, size: u8) -> anyhow::Result<u32> {
        Ok(match size {
            1 => self.next()? as u32,
            2 => self.parse_u16()? as u32,
            3 => self.parse_u24()?,
            4 => self.parse_u32()?,
            _ => anyhow::bail!(FontError::invalid(format!("invalid offset size: {}", size))),
        })
    }

    fn parse_fixed(&mut self) -> anyhow::Result<Fixed> {
        Ok(Fixed::from_bits(self.parse_i32()?))
    }

    fn parse_f2dot14(&mut self) -> anyhow::Result<F2Dot14> {
        Ok(F2Dot14::from_bits(self.parse_i16()?))
    }

    fn parse_tag(&mut self) -> anyhow::Result<TableTag> {
        let b1 = self.next()?;
        let b2 = self.next()?;
        let b3 = self.next()?;
        let b4 = self.next()?;

        Ok(TableTag::new([b1, b2, b3, b4]))
    }

    fn parse_bytes(&mut self, length: usize) -> anyhow::Result<&[u8]> {
        let start = self.cursor();
        let end = start
            .checked_add(length)
            .filter(|&end| end <= self.buffer().len())
            .ok_or(FontError::UnexpectedEof)?;

        *self.cursor_mut() = end;

        Ok(&self.buffer()[start..end])
    }

    /// A Pascal-style string: one length byte followed by that many bytes
    fn parse_pascal_string(&mut self) -> anyhow::Result<String> {
        let len = self.next()? as usize;
        let bytes = self.parse_bytes(len)?;

        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// A cursor over a borrowed byte region
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn new_at(buffer: &'a [u8], cursor: usize) -> Self {
        Self { buffer, cursor }
    }

    /// Like `parse_bytes`, but the returned slice borrows the underlying buffer
    /// rather than the reader
    pub fn read_slice(&mut self, length: usize) -> anyhow::Result<&'a [u8]> {
        let start = self.cursor;
        let end = start
            .checked_add(length)
            .filter(|&end| end <= self.buffer.len())
            .ok_or(FontError::UnexpectedEof)?;

        self.cursor = end;

        Ok(&self.buffer[start..end])
    }

    pub fn tail(&self) -> &'a [u8] {
        self.buffer.get(self.cursor..).unwrap_or(&[])
    }
}

impl<'a> BinaryParser for ByteReader<'a> {
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_big_endian_primitives() {
        let mut reader = ByteReader::new(&[0x12, 0x34, 0xff, 0xfe, 0x00, 0x01, 0x80, 0x00]);

        assert_eq!(reader.parse_u16().unwrap(), 0x1234);
        assert_eq!(reader.parse_i16().unwrap(), -2);
        assert_eq!(reader.parse_fixed().unwrap(), Fixed::from_num(1.5));
        assert!(reader.at_end());
        assert!(reader.next().is_err());
    }

    #[test]
    fn f2dot14_half() {
        let mut reader = ByteReader::new(&[0x20, 0x00, 0xc0, 0x00]);

        assert_eq!(reader.parse_f2dot14().unwrap().to_num::<f32>(), 0.5);
        assert_eq!(reader.parse_f2dot14().unwrap().to_num::<f32>(), -1.0);
    }

    #[test]
    fn parse_bytes_past_end_fails_without_moving() {
        let mut reader = ByteReader::new(&[1, 2, 3]);

        assert!(reader.parse_bytes(4).is_err());
        assert_eq!(reader.cursor(), 0);
        assert_eq!(reader.read_slice(2).unwrap(), &[1, 2]);
    }
}
