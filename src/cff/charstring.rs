//! Type 2 charstrings: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf>

use std::collections::VecDeque;

use crate::{
    error::FontError,
    geometry::{path_builder::PathBuilder, Outline},
    parse_binary::{BinaryParser, ByteReader},
};

use super::index::{subr_bias, CffIndex};

const MAX_OPERANDS: usize = 48;
const MAX_SUBR_DEPTH: usize = 10;
const TRANSIENT_ARRAY_LEN: usize = 32;

/// Everything a charstring may reach outside its own bytes
#[derive(Debug, Clone, Copy)]
pub(crate) struct CharStringContext<'a> {
    /// The whole CFF data, which the subroutine indexes point into
    pub buffer: &'a [u8],
    pub global_subrs: &'a CffIndex,
    pub local_subrs: &'a CffIndex,
}

/// Accented character composed from two glyphs of the standard encoding, as
/// requested by `endchar` with four arguments
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Seac {
    pub adx: f32,
    pub ady: f32,
    pub base_code: u8,
    pub accent_code: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CharStringOutput {
    pub outline: Outline,
    /// The explicit width argument, still relative to `nominalWidthX`
    pub width: Option<f32>,
    pub seac: Option<Seac>,
    pub stem_count: usize,
}

pub(crate) struct Type2CharStringInterpreter<'a> {
    ctx: CharStringContext<'a>,
    operand_stack: VecDeque<f32>,
    path_builder: PathBuilder,
    width: Option<f32>,
    first_stack_clearing_op: bool,
    stem_count: usize,
    transient: [f32; TRANSIENT_ARRAY_LEN],
    seac: Option<Seac>,
    random_state: u32,
    finished: bool,
}

impl<'a> Type2CharStringInterpreter<'a> {
    fn new(ctx: CharStringContext<'a>) -> Self {
        Self {
            ctx,
            operand_stack: VecDeque::with_capacity(MAX_OPERANDS),
            path_builder: PathBuilder::new(),
            width: None,
            first_stack_clearing_op: true,
            stem_count: 0,
            transient: [0.0; TRANSIENT_ARRAY_LEN],
            seac: None,
            random_state: 0x2545_f491,
            finished: false,
        }
    }

    pub fn evaluate(
        charstring: &[u8],
        ctx: CharStringContext<'a>,
    ) -> anyhow::Result<CharStringOutput> {
        let mut interpreter = Self::new(ctx);

        interpreter.execute(charstring, 0)?;

        if !interpreter.finished {
            log::debug!("charstring ended without endchar");
        }

        Ok(CharStringOutput {
            outline: interpreter.path_builder.finish(),
            width: interpreter.width,
            seac: interpreter.seac,
            stem_count: interpreter.stem_count,
        })
    }

    /// Runs `data` until it ends, returns, or the glyph ends
    fn execute(&mut self, data: &[u8], depth: usize) -> anyhow::Result<()> {
        let mut reader = ByteReader::new(data);

        while !reader.at_end() && !self.finished {
            match reader.next()? {
                // y dy {dya dyb}* hstem (1)
                // y dy {dya dyb}* hstemhm (18)
                1 | 18 => self.stems()?,
                // x dx {dxa dxb}* vstem (3)
                // x dx {dxa dxb}* vstemhm (23)
                3 | 23 => self.stems()?,
                // dy1 vmoveto (4)
                4 => self.vmoveto()?,
                // {dxa dya}+ rlineto (5)
                5 => self.rlineto()?,
                // dx1 {dya dxb}* hlineto (6)
                6 => self.alternating_lineto(true)?,
                // dy1 {dxa dyb}* vlineto (7)
                7 => self.alternating_lineto(false)?,
                // {dxa dya dxb dyb dxc dyc}+ rrcurveto (8)
                8 => self.rrcurveto()?,
                // subr# callsubr (10)
                10 => self.call_subr(false, depth)?,
                // return (11)
                11 => return Ok(()),
                12 => self.escaped(reader.next()?)?,
                // endchar (14)
                14 => self.end_char()?,
                // hintmask (19 + mask)
                // cntrmask (20 + mask)
                19 | 20 => self.mask(&mut reader)?,
                // dx1 dy1 rmoveto (21)
                21 => self.rmoveto()?,
                // dx1 hmoveto (22)
                22 => self.hmoveto()?,
                // {dxa dya dxb dyb dxc dyc}+ dxd dyd rcurveline (24)
                24 => self.rcurveline()?,
                // {dxa dya}+ dxb dyb dxc dyc dxd dyd rlinecurve (25)
                25 => self.rlinecurve()?,
                // dx1? {dya dxb dyb dyc}+ vvcurveto (26)
                26 => self.vvcurveto()?,
                // dy1? {dxa dxb dyb dxc}+ hhcurveto (27)
                27 => self.hhcurveto()?,
                // globalsubr# callgsubr (29)
                29 => self.call_subr(true, depth)?,
                // dy1 dx2 dy2 dx3 {dxa dxb dyb dyc dyd dxe dye dxf}* dyf? vhcurveto (30)
                30 => self.alternating_curveto(false)?,
                // dx1 dx2 dy2 dy3 {dya dxb dyb dxc dxd dxe dye dyf}* dxf? hvcurveto (31)
                31 => self.alternating_curveto(true)?,
                28 => {
                    let n = reader.parse_i16()?;
                    self.push(f32::from(n))?;
                }
                b0 @ 32..=254 => {
                    let n = Self::parse_number(b0, &mut reader)?;
                    self.push(n)?;
                }
                255 => {
                    // 16.16 fixed
                    let n = reader.parse_i32()?;
                    self.push(n as f32 / 65536.0)?;
                }
                op => {
                    log::debug!("skipping reserved charstring operator {}", op);
                    self.operand_stack.clear();
                }
            }
        }

        Ok(())
    }

    fn parse_number(b0: u8, reader: &mut ByteReader) -> anyhow::Result<f32> {
        Ok(match b0 {
            32..=246 => (b0 as i32 - 139) as f32,
            247..=250 => {
                let b1 = reader.next()? as i32;
                ((b0 as i32 - 247) * 256 + b1 + 108) as f32
            }
            _ => {
                let b1 = reader.next()? as i32;
                (-(b0 as i32 - 251) * 256 - b1 - 108) as f32
            }
        })
    }

    fn escaped(&mut self, op: u8) -> anyhow::Result<()> {
        match op {
            // dotsection (12 0), deprecated
            0 => self.operand_stack.clear(),
            // num1 num2 and (12 3) 1_or_0
            3 => self.binary(|a, b| bool_num(a != 0.0 && b != 0.0))?,
            // num1 num2 or (12 4) 1_or_0
            4 => self.binary(|a, b| bool_num(a != 0.0 || b != 0.0))?,
            // num1 not (12 5) 1_or_0
            5 => self.unary(|a| bool_num(a == 0.0))?,
            // num abs (12 9) num2
            9 => self.unary(f32::abs)?,
            // num1 num2 add (12 10) sum
            10 => self.binary(|a, b| a + b)?,
            // num1 num2 sub (12 11) difference
            11 => self.binary(|a, b| a - b)?,
            // num1 num2 div (12 12) quotient
            12 => self.binary(|a, b| if b == 0.0 { 0.0 } else { a / b })?,
            // num neg (12 14) num2
            14 => self.unary(|a| -a)?,
            // num1 num2 eq (12 15) 1_or_0
            15 => self.binary(|a, b| bool_num(a == b))?,
            // num drop (12 18)
            18 => {
                self.pop()?;
            }
            // val i put (12 20)
            20 => {
                let i = self.pop()?;
                let val = self.pop()?;
                *self.transient_slot(i)? = val;
            }
            // i get (12 21) val
            21 => {
                let i = self.pop()?;
                let val = *self.transient_slot(i)?;
                self.push(val)?;
            }
            // s1 s2 v1 v2 ifelse (12 22) s1_or_s2
            22 => {
                let v2 = self.pop()?;
                let v1 = self.pop()?;
                let s2 = self.pop()?;
                let s1 = self.pop()?;
                self.push(if v1 <= v2 { s1 } else { s2 })?;
            }
            // random (12 23) num2
            23 => {
                let n = self.random();
                self.push(n)?;
            }
            // num1 num2 mul (12 24) product
            24 => self.binary(|a, b| a * b)?,
            // num sqrt (12 26) num2
            26 => self.unary(|a| a.max(0.0).sqrt())?,
            // any dup (12 27) any any
            27 => {
                let top = self.pop()?;
                self.push(top)?;
                self.push(top)?;
            }
            // num1 num2 exch (12 28) num2 num1
            28 => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(b)?;
                self.push(a)?;
            }
            // numX ... num0 i index (12 29) numX ... num0 numi
            29 => {
                let i = self.pop()?.max(0.0) as usize;
                let len = self.operand_stack.len();
                anyhow::ensure!(i < len, FontError::StackUnderflow);
                let val = self.operand_stack[len - 1 - i];
                self.push(val)?;
            }
            // num(N–1) ... num0 N J roll (12 30)
            30 => {
                let j = self.pop()? as i32;
                let n = self.pop()? as i32;
                let len = self.operand_stack.len();

                anyhow::ensure!(n >= 0 && n as usize <= len, FontError::StackUnderflow);

                if n > 0 {
                    let slice = self.operand_stack.make_contiguous();
                    let window = &mut slice[len - n as usize..];
                    let shift = j.rem_euclid(n) as usize;
                    window.rotate_right(shift);
                }
            }
            // dx1 dx2 dy2 dx3 dx4 dx5 dx6 hflex (12 34)
            34 => self.hflex()?,
            // dx1 dy1 dx2 dy2 dx3 dy3 dx4 dy4 dx5 dy5 dx6 dy6 fd flex (12 35)
            35 => self.flex()?,
            // dx1 dy1 dx2 dy2 dx3 dx4 dx5 dy5 dx6 hflex1 (12 36)
            36 => self.hflex1()?,
            // dx1 dy1 dx2 dy2 dx3 dy3 dx4 dy4 dx5 dy5 d6 flex1 (12 37)
            37 => self.flex1()?,
            op => {
                log::debug!("skipping reserved charstring operator 12 {}", op);
                self.operand_stack.clear();
            }
        }

        Ok(())
    }

    fn push(&mut self, n: f32) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.operand_stack.len() < MAX_OPERANDS,
            FontError::StackOverflow
        );

        self.operand_stack.push_back(n);

        Ok(())
    }

    fn pop(&mut self) -> anyhow::Result<f32> {
        self.operand_stack
            .pop_back()
            .ok_or(anyhow::anyhow!(FontError::StackUnderflow))
    }

    fn unary(&mut self, f: impl FnOnce(f32) -> f32) -> anyhow::Result<()> {
        let a = self.pop()?;
        self.push(f(a))
    }

    fn binary(&mut self, f: impl FnOnce(f32, f32) -> f32) -> anyhow::Result<()> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(f(a, b))
    }

    fn transient_slot(&mut self, i: f32) -> anyhow::Result<&mut f32> {
        let idx = i as i32;

        usize::try_from(idx)
            .ok()
            .and_then(|idx| self.transient.get_mut(idx))
            .ok_or(anyhow::anyhow!(FontError::invalid(format!(
                "transient array index out of bounds: {}",
                idx
            ))))
    }

    /// A number in (0, 1]
    fn random(&mut self) -> f32 {
        let mut x = self.random_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.random_state = x;

        ((x >> 8) as f32 + 1.0) / (1u32 << 24) as f32
    }

    /// Takes every operand, bottom first
    fn take_args(&mut self) -> Vec<f32> {
        self.operand_stack.drain(..).collect()
    }

    /// The first stack clearing operator may carry the advance width as an
    /// extra leading argument
    fn take_width(&mut self, has_width: bool) {
        if !self.first_stack_clearing_op {
            return;
        }

        self.first_stack_clearing_op = false;

        if has_width {
            self.width = self.operand_stack.pop_front();
        }
    }

    fn pop_front(&mut self) -> anyhow::Result<f32> {
        self.operand_stack
            .pop_front()
            .ok_or(anyhow::anyhow!(FontError::StackUnderflow))
    }

    fn call_subr(&mut self, global: bool, depth: usize) -> anyhow::Result<()> {
        let index = if global {
            self.ctx.global_subrs
        } else {
            self.ctx.local_subrs
        };

        let n = self.pop()? as i32;
        let biased = n + subr_bias(index.len());

        let subr = usize::try_from(biased)
            .ok()
            .and_then(|idx| index.get(self.ctx.buffer, idx))
            .ok_or(anyhow::anyhow!(FontError::InvalidSubroutineIndex { index: biased }))?;

        if depth + 1 > MAX_SUBR_DEPTH {
            anyhow::bail!(FontError::NestingLimitReached);
        }

        self.execute(subr, depth + 1)
    }

    /// Stem hints are only counted, so `hintmask` knows its mask length
    fn stems(&mut self) -> anyhow::Result<()> {
        self.take_width(self.operand_stack.len() % 2 == 1);

        self.stem_count += self.operand_stack.len() / 2;
        self.operand_stack.clear();

        Ok(())
    }

    /// `hintmask` and `cntrmask` take one mask bit per declared stem. Operands
    /// left on the stack are an implicit `vstem`
    fn mask(&mut self, reader: &mut ByteReader) -> anyhow::Result<()> {
        if !self.operand_stack.is_empty() {
            self.stems()?;
        } else {
            self.take_width(false);
        }

        let num_bytes = (self.stem_count + 7) / 8;
        reader.skip(num_bytes)?;

        Ok(())
    }

    fn rmoveto(&mut self) -> anyhow::Result<()> {
        self.take_width(self.operand_stack.len() > 2);

        let dx = self.pop_front()?;
        let dy = self.pop_front()?;
        self.path_builder.relative_move_to(dx, dy);

        self.operand_stack.clear();
        Ok(())
    }

    fn hmoveto(&mut self) -> anyhow::Result<()> {
        self.take_width(self.operand_stack.len() > 1);

        let dx = self.pop_front()?;
        self.path_builder.relative_move_to(dx, 0.0);

        self.operand_stack.clear();
        Ok(())
    }

    fn vmoveto(&mut self) -> anyhow::Result<()> {
        self.take_width(self.operand_stack.len() > 1);

        let dy = self.pop_front()?;
        self.path_builder.relative_move_to(0.0, dy);

        self.operand_stack.clear();
        Ok(())
    }

    fn rlineto(&mut self) -> anyhow::Result<()> {
        for pair in self.take_args().chunks_exact(2) {
            self.path_builder.relative_line_to(pair[0], pair[1]);
        }

        Ok(())
    }

    /// `hlineto` and `vlineto`: lines alternating between horizontal and
    /// vertical, one argument each
    fn alternating_lineto(&mut self, mut horizontal: bool) -> anyhow::Result<()> {
        for d in self.take_args() {
            if horizontal {
                self.path_builder.horizontal_line_to(d);
            } else {
                self.path_builder.vertical_line_to(d);
            }

            horizontal = !horizontal;
        }

        Ok(())
    }

    fn rrcurveto(&mut self) -> anyhow::Result<()> {
        for c in self.take_args().chunks_exact(6) {
            self.path_builder
                .relative_relative_curve_to(c[0], c[1], c[2], c[3], c[4], c[5]);
        }

        Ok(())
    }

    fn rcurveline(&mut self) -> anyhow::Result<()> {
        let args = self.take_args();
        anyhow::ensure!(args.len() >= 8, FontError::StackUnderflow);

        let (curves, line) = args.split_at(args.len() - 2);

        for c in curves.chunks_exact(6) {
            self.path_builder
                .relative_relative_curve_to(c[0], c[1], c[2], c[3], c[4], c[5]);
        }

        self.path_builder.relative_line_to(line[0], line[1]);

        Ok(())
    }

    fn rlinecurve(&mut self) -> anyhow::Result<()> {
        let args = self.take_args();
        anyhow::ensure!(args.len() >= 8, FontError::StackUnderflow);

        let (lines, c) = args.split_at(args.len() - 6);

        for pair in lines.chunks_exact(2) {
            self.path_builder.relative_line_to(pair[0], pair[1]);
        }

        self.path_builder
            .relative_relative_curve_to(c[0], c[1], c[2], c[3], c[4], c[5]);

        Ok(())
    }

    /// `hvcurveto` and `vhcurveto`: curves whose tangents alternate between
    /// horizontal and vertical, four arguments each. A fifth argument on the
    /// last curve gives its final coordinate along the other axis
    fn alternating_curveto(&mut self, mut horizontal: bool) -> anyhow::Result<()> {
        let args = self.take_args();
        let mut rest = &args[..];

        while rest.len() >= 4 {
            let last = if rest.len() == 5 { rest[4] } else { 0.0 };
            let [a, b, c, d] = [rest[0], rest[1], rest[2], rest[3]];

            if horizontal {
                self.path_builder
                    .relative_relative_curve_to(a, 0.0, b, c, last, d);
            } else {
                self.path_builder
                    .relative_relative_curve_to(0.0, a, b, c, d, last);
            }

            rest = &rest[if rest.len() == 5 { 5 } else { 4 }..];
            horizontal = !horizontal;
        }

        if !rest.is_empty() {
            log::debug!("{} unused curve operands", rest.len());
        }

        Ok(())
    }

    fn vvcurveto(&mut self) -> anyhow::Result<()> {
        let args = self.take_args();
        let (mut dx1, rest) = match args.len() % 4 {
            1 => (args[0], &args[1..]),
            _ => (0.0, &args[..]),
        };

        for c in rest.chunks_exact(4) {
            self.path_builder
                .relative_relative_curve_to(dx1, c[0], c[1], c[2], 0.0, c[3]);
            dx1 = 0.0;
        }

        Ok(())
    }

    fn hhcurveto(&mut self) -> anyhow::Result<()> {
        let args = self.take_args();
        let (mut dy1, rest) = match args.len() % 4 {
            1 => (args[0], &args[1..]),
            _ => (0.0, &args[..]),
        };

        for c in rest.chunks_exact(4) {
            self.path_builder
                .relative_relative_curve_to(c[0], dy1, c[1], c[2], c[3], 0.0);
            dy1 = 0.0;
        }

        Ok(())
    }

    /// Flex is always drawn as its two curves
    fn flex(&mut self) -> anyhow::Result<()> {
        let a = self.take_args();
        anyhow::ensure!(a.len() >= 12, FontError::StackUnderflow);

        self.path_builder
            .relative_relative_curve_to(a[0], a[1], a[2], a[3], a[4], a[5]);
        self.path_builder
            .relative_relative_curve_to(a[6], a[7], a[8], a[9], a[10], a[11]);

        Ok(())
    }

    fn hflex(&mut self) -> anyhow::Result<()> {
        let a = self.take_args();
        anyhow::ensure!(a.len() >= 7, FontError::StackUnderflow);

        let [dx1, dx2, dy2, dx3, dx4, dx5, dx6] = [a[0], a[1], a[2], a[3], a[4], a[5], a[6]];

        self.path_builder
            .relative_relative_curve_to(dx1, 0.0, dx2, dy2, dx3, 0.0);
        self.path_builder
            .relative_relative_curve_to(dx4, 0.0, dx5, -dy2, dx6, 0.0);

        Ok(())
    }

    fn hflex1(&mut self) -> anyhow::Result<()> {
        let a = self.take_args();
        anyhow::ensure!(a.len() >= 9, FontError::StackUnderflow);

        let [dx1, dy1, dx2, dy2, dx3, dx4, dx5, dy5, dx6] =
            [a[0], a[1], a[2], a[3], a[4], a[5], a[6], a[7], a[8]];

        self.path_builder
            .relative_relative_curve_to(dx1, dy1, dx2, dy2, dx3, 0.0);
        self.path_builder
            .relative_relative_curve_to(dx4, 0.0, dx5, dy5, dx6, -(dy1 + dy2 + dy5));

        Ok(())
    }

    /// The last point lies on the same horizontal or vertical as the start,
    /// whichever the flex is closer to
    fn flex1(&mut self) -> anyhow::Result<()> {
        let a = self.take_args();
        anyhow::ensure!(a.len() >= 11, FontError::StackUnderflow);

        let dx: f32 = a[..10].iter().step_by(2).sum();
        let dy: f32 = a[1..10].iter().step_by(2).sum();

        let (dx6, dy6) = if dx.abs() > dy.abs() {
            (a[10], -dy)
        } else {
            (-dx, a[10])
        };

        self.path_builder
            .relative_relative_curve_to(a[0], a[1], a[2], a[3], a[4], a[5]);
        self.path_builder
            .relative_relative_curve_to(a[6], a[7], a[8], a[9], dx6, dy6);

        Ok(())
    }

    /// Four remaining arguments make this a `seac`
    fn end_char(&mut self) -> anyhow::Result<()> {
        let len = self.operand_stack.len();
        self.take_width(len == 1 || len == 5);

        if self.operand_stack.len() >= 4 {
            let args = self.take_args();

            self.seac = Some(Seac {
                adx: args[0],
                ady: args[1],
                base_code: args[2] as u8,
                accent_code: args[3] as u8,
            });
        }

        self.operand_stack.clear();
        self.finished = true;

        Ok(())
    }
}

fn bool_num(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    use crate::geometry::Point;

    /// Encodes an integer operand
    pub(crate) fn num(n: i32) -> Vec<u8> {
        match n {
            -107..=107 => vec![(n + 139) as u8],
            108..=1131 => {
                let n = n - 108;
                vec![(n / 256 + 247) as u8, (n % 256) as u8]
            }
            -1131..=-108 => {
                let n = -n - 108;
                vec![(n / 256 + 251) as u8, (n % 256) as u8]
            }
            _ => {
                let [hi, lo] = (n as i16).to_be_bytes();
                vec![28, hi, lo]
            }
        }
    }

    /// Assembles a charstring from operands and operator bytes
    pub(crate) fn charstring(parts: &[(&[i32], &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();

        for (operands, op) in parts {
            for &n in *operands {
                out.extend(num(n));
            }
            out.extend_from_slice(op);
        }

        out
    }

    fn evaluate(charstring: &[u8], global: &[&[u8]], local: &[&[u8]]) -> CharStringOutput {
        let mut buffer = crate::cff::index::test::build_index(global);
        let local_start = buffer.len();
        buffer.extend(crate::cff::index::test::build_index(local));

        let global_subrs = CffIndex::parse(&mut ByteReader::new(&buffer)).unwrap();
        let local_subrs = CffIndex::parse(&mut ByteReader::new_at(&buffer, local_start)).unwrap();

        Type2CharStringInterpreter::evaluate(
            charstring,
            CharStringContext {
                buffer: &buffer,
                global_subrs: &global_subrs,
                local_subrs: &local_subrs,
            },
        )
        .unwrap()
    }

    #[test]
    fn rmoveto_rlineto_endchar_with_width() {
        let program = charstring(&[
            (&[500, 100, 100], &[21]),
            (&[200, 0, 0, 300, -200, 0], &[5]),
            (&[], &[14]),
        ]);

        let output = evaluate(&program, &[], &[]);

        assert_eq!(output.width, Some(500.0));
        assert_eq!(output.outline.paths.len(), 1);
        assert!(output.outline.paths[0].is_closed());

        let bbox = output.outline.bounding_box();
        assert_eq!(bbox.min, Point::new(100.0, 100.0));
        assert_eq!(bbox.max, Point::new(300.0, 400.0));
    }

    #[test]
    fn no_width_without_extra_operand() {
        let program = charstring(&[(&[10, 20], &[21]), (&[50], &[6]), (&[], &[14])]);

        assert_eq!(evaluate(&program, &[], &[]).width, None);
    }

    #[test]
    fn hintmask_skips_one_byte_per_eight_stems() {
        // 9 stems, so the mask is two bytes. A mask byte of 0x15 (21) would be
        // read as rmoveto if only one byte were skipped
        let program = charstring(&[
            (&[0, 10, 20, 10, 20, 10, 20, 10, 20, 10], &[18]),
            (&[0, 10, 20, 10, 20, 10, 20, 10], &[23]),
            (&[], &[19, 0xff, 0x15]),
            (&[5, 5], &[21]),
            (&[], &[14]),
        ]);

        let output = evaluate(&program, &[], &[]);

        assert_eq!(output.stem_count, 9);
        assert!(output.outline.is_empty());
    }

    #[test]
    fn hintmask_with_implicit_vstem() {
        let program = charstring(&[
            (&[0, 10], &[1]),
            (&[0, 10], &[19, 0xc0]),
            (&[5], &[22]),
            (&[], &[14]),
        ]);

        assert_eq!(evaluate(&program, &[], &[]).stem_count, 2);
    }

    #[test]
    fn subroutines_apply_bias() {
        let subr = charstring(&[(&[0, 100], &[5]), (&[], &[11])]);
        let gsubr = charstring(&[(&[100, 0], &[5]), (&[], &[11])]);

        let program = charstring(&[
            (&[0, 0], &[21]),
            (&[-107], &[10]),
            (&[-107], &[29]),
            (&[], &[14]),
        ]);

        let output = evaluate(&program, &[&gsubr], &[&subr]);

        assert_eq!(output.outline.segment_count(), 3);
        assert_eq!(output.outline.bounding_box().max, Point::new(100.0, 100.0));
    }

    #[test]
    fn runaway_recursion_is_an_error() {
        // subr 0 calls itself
        let subr = charstring(&[(&[-107], &[10])]);
        let mut buffer = Vec::new();
        let local = crate::cff::index::test::build_index(&[&subr]);
        buffer.extend(&local);

        let global_subrs = CffIndex::default();
        let local_subrs = CffIndex::parse(&mut ByteReader::new(&buffer)).unwrap();

        let err = Type2CharStringInterpreter::evaluate(
            &subr,
            CharStringContext {
                buffer: &buffer,
                global_subrs: &global_subrs,
                local_subrs: &local_subrs,
            },
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FontError>(),
            Some(FontError::NestingLimitReached)
        ));
    }

    #[test]
    fn arithmetic_and_storage() {
        // (3 4 add) 0 put, 0 get 2 mul -> 14, used as an hmoveto distance
        let mut program = charstring(&[(&[3, 4], &[12, 10]), (&[0], &[12, 20])]);
        program.extend(charstring(&[(&[0], &[12, 21]), (&[2], &[12, 24])]));
        program.extend(charstring(&[(&[], &[22]), (&[10], &[7]), (&[], &[14])]));

        let output = evaluate(&program, &[], &[]);

        assert_eq!(output.width, None);
        assert_eq!(output.outline.bounding_box().min, Point::new(14.0, 0.0));
    }

    #[test]
    fn roll_and_index() {
        let program = charstring(&[
            // 1 2 3 rolled by one is 3 1 2
            (&[1, 2, 3, 3, 1], &[12, 30]),
            // copy the bottom entry, then drop it again
            (&[2], &[12, 29]),
            (&[], &[12, 18]),
            // 3 2 1, then drop the 1
            (&[], &[12, 28]),
            (&[], &[12, 18]),
            (&[], &[21]),
            (&[0, 10], &[5]),
            (&[], &[14]),
        ]);

        let output = evaluate(&program, &[], &[]);

        assert_eq!(output.width, None);
        assert_eq!(output.outline.paths[0].start(), Point::new(3.0, 2.0));
    }

    #[test]
    fn endchar_seac() {
        let program = charstring(&[(&[300, 10, 200, 65, 194], &[14])]);

        let output = evaluate(&program, &[], &[]);

        assert_eq!(output.width, Some(300.0));
        assert_eq!(
            output.seac,
            Some(Seac {
                adx: 10.0,
                ady: 200.0,
                base_code: 65,
                accent_code: 194,
            })
        );
    }

    #[test]
    fn stack_overflow() {
        let operands = vec![1; 49];
        let program = charstring(&[(&operands[..], &[14])]);

        let mut buffer = Vec::new();
        buffer.extend(&program);
        let empty = CffIndex::default();

        assert!(Type2CharStringInterpreter::evaluate(
            &program,
            CharStringContext {
                buffer: &buffer,
                global_subrs: &empty,
                local_subrs: &empty,
            },
        )
        .is_err());
    }

    #[test]
    fn curve_shorthands() {
        // hvcurveto with a trailing final coordinate, then vvcurveto with a
        // leading dx
        let program = charstring(&[
            (&[0, 0], &[21]),
            (&[10, 20, 30, 40, 5], &[31]),
            (&[1, 10, 20, 30, 40], &[26]),
            (&[], &[14]),
        ]);

        let output = evaluate(&program, &[], &[]);

        assert_eq!(output.outline.segment_count(), 3);
        // 10 + 20 + 5 + 1 + 20 = 56; 0 + 30 + 40 + 10 + 30 + 40 = 150
        assert_eq!(output.outline.paths[0].segments[1].end(), Point::new(56.0, 150.0));
    }
}
