//! PFB segment framing, `eexec` and charstring decryption

use crate::{error::FontError, postscript::find_subslice};

/// Initial key for the `eexec` encrypted portion
pub(super) const EEXEC_KEY: u16 = 55665;

/// Initial key for individual charstrings and subroutines
pub(super) const CHARSTRING_KEY: u16 = 4330;

const C1: u16 = 52845;
const C2: u16 = 22719;

const PFB_MARKER: u8 = 0x80;
const PFB_ASCII: u8 = 1;
const PFB_BINARY: u8 = 2;
const PFB_EOF: u8 = 3;

pub(super) fn decrypt(cipher: &[u8], key: u16) -> Vec<u8> {
    let mut r = key;

    cipher
        .iter()
        .map(|&c| {
            let plain = c ^ (r >> 8) as u8;
            r = u16::from(c).wrapping_add(r).wrapping_mul(C1).wrapping_add(C2);
            plain
        })
        .collect()
}

/// Decrypts a charstring and drops its `len_iv` leading random bytes. A
/// negative `lenIV` means the charstrings are stored in the clear
pub(super) fn decrypt_charstring(cipher: &[u8], len_iv: i32) -> Vec<u8> {
    match usize::try_from(len_iv) {
        Ok(skip) => decrypt(cipher, CHARSTRING_KEY)
            .get(skip..)
            .map(<[u8]>::to_vec)
            .unwrap_or_default(),
        Err(..) => cipher.to_vec(),
    }
}

/// The clear-text part of a Type 1 program and the decrypted private part,
/// with the four random leading bytes already dropped
#[derive(Debug)]
pub(super) struct Segments {
    pub clear_text: Vec<u8>,
    pub private: Vec<u8>,
}

pub(super) fn split_program(data: &[u8]) -> anyhow::Result<Segments> {
    let (clear_text, encrypted) = if data.first() == Some(&PFB_MARKER) {
        read_pfb(data)?
    } else {
        read_pfa(data)?
    };

    let private = decrypt(&encrypted, EEXEC_KEY)
        .get(4..)
        .map(<[u8]>::to_vec)
        .unwrap_or_default();

    Ok(Segments {
        clear_text,
        private,
    })
}

/// Concatenates ASCII segments into the clear text and binary segments into
/// the encrypted portion. Segment lengths are little-endian
fn read_pfb(data: &[u8]) -> anyhow::Result<(Vec<u8>, Vec<u8>)> {
    let mut clear_text = Vec::new();
    let mut encrypted = Vec::new();
    let mut cursor = 0;

    while cursor < data.len() {
        match data.get(cursor..cursor + 2) {
            Some(&[PFB_MARKER, PFB_EOF]) => break,
            Some(&[PFB_MARKER, kind @ (PFB_ASCII | PFB_BINARY)]) => {
                let len = data
                    .get(cursor + 2..cursor + 6)
                    .ok_or(FontError::UnexpectedEof)?;
                let len = u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize;

                let start = cursor + 6;
                let end = start.saturating_add(len);
                let segment = match data.get(start..end) {
                    Some(segment) => segment,
                    None => {
                        log::warn!("truncated PFB segment");
                        &data[start.min(data.len())..]
                    }
                };

                if kind == PFB_ASCII {
                    clear_text.extend_from_slice(segment);
                } else {
                    encrypted.extend_from_slice(segment);
                }

                cursor = end;
            }
            _ => anyhow::bail!(FontError::invalid("invalid PFB segment header")),
        }
    }

    Ok((clear_text, encrypted))
}

/// Splits after the `eexec` operator. The encrypted portion is either binary
/// or hexadecimal; hex is recognized by its first four bytes
fn read_pfa(data: &[u8]) -> anyhow::Result<(Vec<u8>, Vec<u8>)> {
    let eexec = find_subslice(data, b"eexec")
        .ok_or(FontError::invalid("Type 1 program has no eexec section"))?;

    let mut start = eexec + b"eexec".len();
    while matches!(data.get(start), Some(b' ' | b'\t' | b'\r' | b'\n')) {
        start += 1;
    }

    let clear_text = data[..start].to_vec();
    let tail = &data[start..];

    let encrypted = if tail.len() >= 4 && tail[..4].iter().all(u8::is_ascii_hexdigit) {
        decode_hex(tail)
    } else {
        tail.to_vec()
    };

    Ok((clear_text, encrypted))
}

/// Decodes hex digit pairs, skipping whitespace and stopping at the first
/// other byte. An odd trailing digit is padded with zero
fn decode_hex(hex: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(hex.len() / 2);
    let mut high: Option<u8> = None;

    for &b in hex {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' => continue,
            _ => break,
        };

        match high.take() {
            Some(h) => out.push((h << 4) | digit),
            None => high = Some(digit),
        }
    }

    if let Some(h) = high {
        out.push(h << 4);
    }

    out
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Inverse of [`decrypt`]
    pub(crate) fn encrypt(plain: &[u8], key: u16) -> Vec<u8> {
        let mut r = key;

        plain
            .iter()
            .map(|&p| {
                let c = p ^ (r >> 8) as u8;
                r = u16::from(c).wrapping_add(r).wrapping_mul(C1).wrapping_add(C2);
                c
            })
            .collect()
    }

    #[test]
    fn decrypts_known_bytes() {
        // first bytes of an eexec section that decrypt to four zeros and "dup"
        let cipher = encrypt(b"\0\0\0\0dup", EEXEC_KEY);

        assert_eq!(&decrypt(&cipher, EEXEC_KEY)[4..], b"dup");
        assert_ne!(&cipher[4..], b"dup");
    }

    #[test]
    fn charstring_len_iv() {
        let cipher = encrypt(b"abcd\x8b\x0e", CHARSTRING_KEY);

        assert_eq!(decrypt_charstring(&cipher, 4), vec![0x8b, 0x0e]);
        assert_eq!(decrypt_charstring(b"\x8b\x0e", -1), vec![0x8b, 0x0e]);
        assert!(decrypt_charstring(&cipher, 10).is_empty());
    }

    #[test]
    fn hex_decoding() {
        assert_eq!(decode_hex(b"de ad\nbE e"), vec![0xde, 0xad, 0xbe, 0xe0]);
        assert_eq!(decode_hex(b"0102zz03"), vec![0x01, 0x02]);
    }

    #[test]
    fn pfa_hex_section() {
        let encrypted = encrypt(b"\0\0\0\0/lenIV 4 def", EEXEC_KEY);
        let hex: String = encrypted.iter().map(|b| format!("{:02x}", b)).collect();

        let mut data = b"%!FontType1-1.0: Test\ncurrentfile eexec\r\n".to_vec();
        data.extend_from_slice(hex.as_bytes());

        let segments = split_program(&data).unwrap();

        assert!(segments.clear_text.ends_with(b"eexec\r\n"));
        assert_eq!(segments.private, b"/lenIV 4 def");
    }

    #[test]
    fn pfb_segments() {
        let encrypted = encrypt(b"\0\0\0\0/Private", EEXEC_KEY);

        let mut data = vec![0x80, 0x01, 5, 0, 0, 0];
        data.extend_from_slice(b"%!PS\n");
        data.extend_from_slice(&[0x80, 0x02, encrypted.len() as u8, 0, 0, 0]);
        data.extend_from_slice(&encrypted);
        data.extend_from_slice(&[0x80, 0x03]);

        let segments = split_program(&data).unwrap();

        assert_eq!(segments.clear_text, b"%!PS\n");
        assert_eq!(segments.private, b"/Private");
    }

    #[test]
    fn pfa_without_eexec_fails() {
        assert!(split_program(b"%!FontType1 /FontName /Foo def").is_err());
    }
}
