use crate::{
    error::FontError,
    parse_binary::{BinaryParser, ByteReader},
};

/// A DICT operator. Two byte operators (`12 x`) are stored as `0x0c00 | x`
type Operator = u16;

const fn escape(op: u8) -> Operator {
    0x0c00 | op as u16
}

/// Operands in a DICT are bounded only by the 48 entry stack of the format
const MAX_OPERANDS: usize = 48;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TopDict {
    pub version: Option<u16>,
    pub notice: Option<u16>,
    pub copyright: Option<u16>,
    pub full_name: Option<u16>,
    pub family_name: Option<u16>,
    pub weight: Option<u16>,
    pub is_fixed_pitch: bool,
    pub italic_angle: f32,
    pub underline_position: f32,
    pub underline_thickness: f32,
    pub paint_type: f32,
    pub charstring_type: u32,
    pub font_matrix: Option<[f32; 6]>,
    pub font_bbox: [f32; 4],
    pub stroke_width: f32,
    pub charset: u32,
    pub encoding: u32,
    pub char_strings: Option<u32>,
    /// Private DICT size and offset
    pub private: Option<(u32, u32)>,
    pub post_script: Option<u16>,
    pub font_name: Option<u16>,

    /// Registry, ordering and supplement. Present only in CID-keyed fonts
    pub ros: Option<(u16, u16, f32)>,
    pub cid_count: u32,
    pub fd_array: Option<u32>,
    pub fd_select: Option<u32>,
}

impl Default for TopDict {
    fn default() -> Self {
        TopDict {
            version: None,
            notice: None,
            copyright: None,
            full_name: None,
            family_name: None,
            weight: None,
            is_fixed_pitch: false,
            italic_angle: 0.0,
            underline_position: -100.0,
            underline_thickness: 50.0,
            paint_type: 0.0,
            charstring_type: 2,
            font_matrix: None,
            font_bbox: [0.0, 0.0, 0.0, 0.0],
            stroke_width: 0.0,
            charset: 0,
            encoding: 0,
            char_strings: None,
            private: None,
            post_script: None,
            font_name: None,
            ros: None,
            cid_count: 8720,
            fd_array: None,
            fd_select: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PrivateDict {
    pub blue_values: Option<Vec<f32>>,
    pub other_blues: Option<Vec<f32>>,
    pub family_blues: Option<Vec<f32>>,
    pub family_other_blues: Option<Vec<f32>>,
    pub blue_scale: f32,
    pub blue_shift: f32,
    pub blue_fuzz: f32,
    pub std_hw: Option<f32>,
    pub std_vw: Option<f32>,
    pub stem_snap_h: Option<Vec<f32>>,
    pub stem_snap_v: Option<Vec<f32>>,
    pub force_bold: bool,
    pub language_group: f32,
    pub expansion_factor: f32,
    pub initial_random_seed: f32,
    /// Offset of the local subroutines, relative to the start of this DICT
    pub subrs: Option<u32>,
    pub default_width_x: f32,
    pub nominal_width_x: f32,
}

impl Default for PrivateDict {
    fn default() -> Self {
        PrivateDict {
            blue_values: None,
            other_blues: None,
            family_blues: None,
            family_other_blues: None,
            blue_scale: 0.039625,
            blue_shift: 7.0,
            blue_fuzz: 1.0,
            std_hw: None,
            std_vw: None,
            stem_snap_h: None,
            stem_snap_v: None,
            force_bold: false,
            language_group: 0.0,
            expansion_factor: 0.06,
            initial_random_seed: 0.0,
            subrs: None,
            default_width_x: 0.0,
            nominal_width_x: 0.0,
        }
    }
}

pub(super) struct CffDictInterpreter<'a> {
    reader: ByteReader<'a>,
    operand_stack: Vec<f32>,
}

impl<'a> CffDictInterpreter<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self {
            reader: ByteReader::new(buffer),
            operand_stack: Vec::new(),
        }
    }

    /// Runs to the next operator, leaving its operands on the stack.
    ///
    /// Reserved bytes drop the operands read so far. A number cut short by
    /// the end of the DICT ends it.
    fn next_operator(&mut self) -> Option<Operator> {
        self.operand_stack.clear();

        while let Ok(b0) = self.reader.next() {
            match b0 {
                12 => match self.reader.next() {
                    Ok(b1) => return Some(escape(b1)),
                    Err(..) => {
                        log::warn!("DICT ends inside an escaped operator");
                        return None;
                    }
                },
                0..=21 => return Some(Operator::from(b0)),
                22..=27 | 31 | 255 => {
                    log::warn!(
                        "reserved DICT byte {}, dropping {} operands",
                        b0,
                        self.operand_stack.len()
                    );
                    self.operand_stack.clear();
                }
                b0 => {
                    let n = match self.parse_number(b0) {
                        Ok(n) => n,
                        Err(err) => {
                            log::warn!("truncated DICT operand: {}", err);
                            return None;
                        }
                    };

                    if self.operand_stack.len() >= MAX_OPERANDS {
                        log::warn!("DICT operand stack overflow, dropping operands");
                        self.operand_stack.clear();
                    }

                    self.operand_stack.push(n);
                }
            }
        }

        if !self.operand_stack.is_empty() {
            log::debug!("DICT ends with {} unused operands", self.operand_stack.len());
        }

        None
    }

    fn parse_number(&mut self, b0: u8) -> anyhow::Result<f32> {
        Ok(match b0 {
            28 => self.reader.parse_i16()? as f32,
            29 => self.reader.parse_i32()? as f32,
            30 => self.parse_real()?,
            32..=246 => (b0 as i32 - 139) as f32,
            247..=250 => {
                let b1 = self.reader.next()? as i32;
                ((b0 as i32 - 247) * 256 + b1 + 108) as f32
            }
            251..=254 => {
                let b1 = self.reader.next()? as i32;
                (-(b0 as i32 - 251) * 256 - b1 - 108) as f32
            }
            _ => anyhow::bail!(FontError::invalid(format!("invalid DICT byte: {}", b0))),
        })
    }

    /// A real number, packed as nibbles
    fn parse_real(&mut self) -> anyhow::Result<f32> {
        let mut s = String::new();

        'outer: loop {
            let b = self.reader.next()?;

            for nibble in [b >> 4, b & 0xf] {
                match nibble {
                    0..=9 => s.push((b'0' + nibble) as char),
                    0xa => s.push('.'),
                    0xb => s.push('E'),
                    0xc => s.push_str("E-"),
                    0xe => s.push('-'),
                    0xf => break 'outer,
                    _ => {}
                }
            }
        }

        s.parse::<f32>()
            .map_err(|_| anyhow::anyhow!(FontError::invalid(format!("invalid real: {:?}", s))))
    }

    fn pop(&mut self) -> anyhow::Result<f32> {
        self.operand_stack
            .pop()
            .ok_or(anyhow::anyhow!(FontError::StackUnderflow))
    }

    fn pop_arr(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.operand_stack)
    }

    fn pop_arr_n<const N: usize>(&mut self) -> anyhow::Result<[f32; N]> {
        let arr = self.pop_arr();
        let len = arr.len();

        arr.try_into().map_err(|_| {
            anyhow::anyhow!(FontError::invalid(format!(
                "expected {} DICT operands, found {}",
                N, len
            )))
        })
    }

    /// Delta encoded arrays store each value relative to the previous one
    fn pop_delta(&mut self) -> Vec<f32> {
        let mut acc = 0.0;

        self.pop_arr()
            .into_iter()
            .map(|n| {
                acc += n;
                acc
            })
            .collect()
    }

    fn pop_bool(&mut self) -> anyhow::Result<bool> {
        Ok(self.pop()? != 0.0)
    }

    fn pop_u16(&mut self) -> anyhow::Result<u16> {
        let n = self.pop()?;

        anyhow::ensure!(
            n >= 0.0 && n <= u16::MAX as f32 && n.fract() == 0.0,
            FontError::invalid(format!("expected SID, found {}", n))
        );

        Ok(n as u16)
    }

    fn pop_u32(&mut self) -> anyhow::Result<u32> {
        let n = self.pop()?;

        anyhow::ensure!(
            n >= 0.0 && n <= u32::MAX as f32 && n.fract() == 0.0,
            FontError::invalid(format!("expected offset, found {}", n))
        );

        Ok(n as u32)
    }

    /// Runs `apply` on every operator. An operator with bad operands is
    /// skipped and leaves the DICT entry at its default
    fn for_each_operator<T>(
        buffer: &'a [u8],
        dict: &mut T,
        kind: &str,
        mut apply: impl FnMut(&mut Self, Operator, &mut T) -> anyhow::Result<()>,
    ) {
        let mut parser = Self::new(buffer);

        while let Some(op) = parser.next_operator() {
            if let Err(err) = apply(&mut parser, op, dict) {
                log::warn!("skipping {} DICT operator {:#06x}: {}", kind, op, err);
            }
        }
    }

    pub fn parse_top_dict(buffer: &'a [u8]) -> anyhow::Result<TopDict> {
        let mut dict = TopDict::default();

        Self::for_each_operator(buffer, &mut dict, "top", |parser, op, dict| {
            match op {
                0 => dict.version = Some(parser.pop_u16()?),
                1 => dict.notice = Some(parser.pop_u16()?),
                2 => dict.full_name = Some(parser.pop_u16()?),
                3 => dict.family_name = Some(parser.pop_u16()?),
                4 => dict.weight = Some(parser.pop_u16()?),
                5 => dict.font_bbox = parser.pop_arr_n()?,
                15 => dict.charset = parser.pop_u32()?,
                16 => dict.encoding = parser.pop_u32()?,
                17 => dict.char_strings = Some(parser.pop_u32()?),
                18 => {
                    let offset = parser.pop_u32()?;
                    let size = parser.pop_u32()?;
                    dict.private = Some((size, offset));
                }
                op if op == escape(0) => dict.copyright = Some(parser.pop_u16()?),
                op if op == escape(1) => dict.is_fixed_pitch = parser.pop_bool()?,
                op if op == escape(2) => dict.italic_angle = parser.pop()?,
                op if op == escape(3) => dict.underline_position = parser.pop()?,
                op if op == escape(4) => dict.underline_thickness = parser.pop()?,
                op if op == escape(5) => dict.paint_type = parser.pop()?,
                op if op == escape(6) => dict.charstring_type = parser.pop_u32()?,
                op if op == escape(7) => dict.font_matrix = Some(parser.pop_arr_n()?),
                op if op == escape(8) => dict.stroke_width = parser.pop()?,
                op if op == escape(21) => dict.post_script = Some(parser.pop_u16()?),
                op if op == escape(30) => {
                    let supplement = parser.pop()?;
                    let ordering = parser.pop_u16()?;
                    let registry = parser.pop_u16()?;
                    dict.ros = Some((registry, ordering, supplement));
                }
                op if op == escape(34) => dict.cid_count = parser.pop_u32()?,
                op if op == escape(36) => dict.fd_array = Some(parser.pop_u32()?),
                op if op == escape(37) => dict.fd_select = Some(parser.pop_u32()?),
                op if op == escape(38) => dict.font_name = Some(parser.pop_u16()?),
                op => log::debug!("skipping top DICT operator {:#06x}", op),
            }

            Ok(())
        });

        if dict.charstring_type != 2 {
            anyhow::bail!(FontError::UnsupportedVersion {
                table: "CFF charstring type",
                version: dict.charstring_type,
            });
        }

        Ok(dict)
    }

    pub fn parse_private_dict(buffer: &'a [u8]) -> anyhow::Result<PrivateDict> {
        let mut dict = PrivateDict::default();

        Self::for_each_operator(buffer, &mut dict, "private", |parser, op, dict| {
            match op {
                6 => dict.blue_values = Some(parser.pop_delta()),
                7 => dict.other_blues = Some(parser.pop_delta()),
                8 => dict.family_blues = Some(parser.pop_delta()),
                9 => dict.family_other_blues = Some(parser.pop_delta()),
                10 => dict.std_hw = Some(parser.pop()?),
                11 => dict.std_vw = Some(parser.pop()?),
                19 => dict.subrs = Some(parser.pop_u32()?),
                20 => dict.default_width_x = parser.pop()?,
                21 => dict.nominal_width_x = parser.pop()?,
                op if op == escape(9) => dict.blue_scale = parser.pop()?,
                op if op == escape(10) => dict.blue_shift = parser.pop()?,
                op if op == escape(11) => dict.blue_fuzz = parser.pop()?,
                op if op == escape(12) => dict.stem_snap_h = Some(parser.pop_delta()),
                op if op == escape(13) => dict.stem_snap_v = Some(parser.pop_delta()),
                op if op == escape(14) => dict.force_bold = parser.pop_bool()?,
                op if op == escape(17) => dict.language_group = parser.pop()?,
                op if op == escape(18) => dict.expansion_factor = parser.pop()?,
                op if op == escape(19) => dict.initial_random_seed = parser.pop()?,
                op => log::debug!("skipping private DICT operator {:#06x}", op),
            }

            Ok(())
        });

        Ok(dict)
    }

    /// Font DICTs of a CID-keyed font only carry a name, a matrix and their
    /// Private DICT location
    pub fn parse_font_dict(buffer: &'a [u8]) -> anyhow::Result<FontDict> {
        let mut dict = FontDict::default();

        Self::for_each_operator(buffer, &mut dict, "font", |parser, op, dict| {
            match op {
                18 => {
                    let offset = parser.pop_u32()?;
                    let size = parser.pop_u32()?;
                    dict.private = Some((size, offset));
                }
                op if op == escape(7) => dict.font_matrix = Some(parser.pop_arr_n()?),
                op if op == escape(38) => dict.font_name = Some(parser.pop_u16()?),
                op => log::trace!("skipping font DICT operator {:#06x}", op),
            }

            Ok(())
        });

        Ok(dict)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FontDict {
    pub font_name: Option<u16>,
    pub font_matrix: Option<[f32; 6]>,
    pub private: Option<(u32, u32)>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn operand_encodings() {
        // 0, 108, -108, 1000 (28), 100000 (29), then `version`
        let dict = [
            139, 247, 0, 251, 0, 28, 0x03, 0xe8, 29, 0x00, 0x01, 0x86, 0xa0, 0,
        ];
        let mut parser = CffDictInterpreter::new(&dict);

        assert_eq!(parser.next_operator(), Some(0));
        assert_eq!(parser.operand_stack, vec![0.0, 108.0, -108.0, 1000.0, 100000.0]);
        assert_eq!(parser.next_operator(), None);
    }

    #[test]
    fn real_operands() {
        // -2.25 and 0.001 (1E-3)
        let dict = [30, 0xe2, 0xa2, 0x5f, 30, 0x1c, 0x3f, 12, 8];
        let mut parser = CffDictInterpreter::new(&dict);

        assert_eq!(parser.next_operator(), Some(escape(8)));
        assert_eq!(parser.operand_stack[0], -2.25);
        assert!((parser.operand_stack[1] - 0.001).abs() < 1e-9);
    }

    #[test]
    fn top_dict_offsets() {
        // 200 charset, 300 CharStrings, 20 400 Private, ROS 391 392 0
        let dict = [
            28, 0, 200, 15, 28, 1, 44, 17, 159, 28, 1, 144, 18, 28, 1, 135, 28, 1, 136, 139, 12,
            30,
        ];
        let top = CffDictInterpreter::parse_top_dict(&dict).unwrap();

        assert_eq!(top.charset, 200);
        assert_eq!(top.char_strings, Some(300));
        assert_eq!(top.private, Some((20, 400)));
        assert_eq!(top.ros, Some((391, 392, 0.0)));
        assert_eq!(top.font_matrix, None);
    }

    #[test]
    fn private_dict_widths_and_deltas() {
        // BlueValues -10 0 500 510 (as deltas -10 10 500 10), defaultWidthX 500,
        // nominalWidthX 600, Subrs 50
        let dict = [
            129, 149, 248, 136, 149, 6, 248, 136, 20, 248, 236, 21, 189, 19,
        ];
        let private = CffDictInterpreter::parse_private_dict(&dict).unwrap();

        assert_eq!(private.blue_values, Some(vec![-10.0, 0.0, 500.0, 510.0]));
        assert_eq!(private.default_width_x, 500.0);
        assert_eq!(private.nominal_width_x, 600.0);
        assert_eq!(private.subrs, Some(50));
    }

    #[test]
    fn unsupported_charstring_type() {
        // 1 CharstringType
        let dict = [140, 12, 6];

        assert!(CffDictInterpreter::parse_top_dict(&dict).is_err());
    }

    #[test]
    fn malformed_operators_keep_defaults() {
        // FontBBox with three operands, then 200 charset
        let dict = [139, 139, 139, 5, 28, 0, 200, 15];
        let top = CffDictInterpreter::parse_top_dict(&dict).unwrap();

        assert_eq!(top.font_bbox, [0.0; 4]);
        assert_eq!(top.charset, 200);

        // defaultWidthX without an operand, then nominalWidthX 600
        let dict = [20, 248, 236, 21];
        let private = CffDictInterpreter::parse_private_dict(&dict).unwrap();

        assert_eq!(private.default_width_x, 0.0);
        assert_eq!(private.nominal_width_x, 600.0);
    }

    #[test]
    fn reserved_bytes_drop_operands() {
        // 11, reserved 255, 600 nominalWidthX, then a truncated int16
        let dict = [150, 255, 248, 236, 21, 28, 0];
        let private = CffDictInterpreter::parse_private_dict(&dict).unwrap();

        assert_eq!(private.nominal_width_x, 600.0);
    }
}
