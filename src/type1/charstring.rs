//! Type 1 charstrings: <https://adobe-type-tools.github.io/font-tech-notes/pdfs/T1_SPEC.pdf>, chapter 6

use crate::{
    error::FontError,
    geometry::{path_builder::PathBuilder, Outline, Point},
    parse_binary::{BinaryParser, ByteReader},
};

const MAX_OPERANDS: usize = 48;
const MAX_SUBR_DEPTH: usize = 10;

/// Accented character built by `seac` from two glyphs of the standard
/// encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Type1Seac {
    /// Left side bearing of the accent
    pub asb: f32,
    pub adx: f32,
    pub ady: f32,
    pub base_code: u8,
    pub accent_code: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Type1Output {
    pub outline: Outline,
    pub side_bearing: Point,
    pub width: Point,
    pub seac: Option<Type1Seac>,
}

pub(crate) struct Type1CharStringInterpreter<'a> {
    subrs: &'a [Vec<u8>],
    operand_stack: Vec<f32>,
    /// Results of `callothersubr`, read back with `pop`
    ps_stack: Vec<f32>,
    path_builder: PathBuilder,
    /// Reference point followed by the six control points of a flex
    flex_points: Option<Vec<Point>>,
    flex_point: Point,
    seac: Option<Type1Seac>,
    finished: bool,
}

impl<'a> Type1CharStringInterpreter<'a> {
    /// Runs a decrypted charstring. `subrs` are decrypted as well
    pub fn evaluate(charstring: &[u8], subrs: &'a [Vec<u8>]) -> anyhow::Result<Type1Output> {
        let mut interpreter = Self {
            subrs,
            operand_stack: Vec::with_capacity(MAX_OPERANDS),
            ps_stack: Vec::new(),
            path_builder: PathBuilder::new(),
            flex_points: None,
            flex_point: Point::origin(),
            seac: None,
            finished: false,
        };

        interpreter.execute(charstring, 0)?;

        Ok(Type1Output {
            side_bearing: interpreter.path_builder.side_bearing,
            width: interpreter.path_builder.width_vector,
            seac: interpreter.seac,
            outline: interpreter.path_builder.finish(),
        })
    }

    fn execute(&mut self, data: &[u8], depth: usize) -> anyhow::Result<()> {
        let mut reader = ByteReader::new(data);

        while !reader.at_end() && !self.finished {
            match reader.next()? {
                v @ 32..=246 => self.push(i32::from(v) - 139)?,
                v @ 247..=250 => {
                    let w = i32::from(reader.next()?);
                    self.push((i32::from(v) - 247) * 256 + w + 108)?;
                }
                v @ 251..=254 => {
                    let w = i32::from(reader.next()?);
                    self.push(-(i32::from(v) - 251) * 256 - w - 108)?;
                }
                255 => {
                    let n = reader.parse_i32()?;
                    self.push(n)?;
                }

                // y dy hstem (1)
                // x dx vstem (3)
                1 | 3 => self.operand_stack.clear(),
                // dy vmoveto (4)
                4 => {
                    let [dy] = self.args()?;
                    self.move_by(0.0, dy);
                }
                // dx dy rlineto (5)
                5 => {
                    let [dx, dy] = self.args()?;
                    self.path_builder.relative_line_to(dx, dy);
                }
                // dx hlineto (6)
                6 => {
                    let [dx] = self.args()?;
                    self.path_builder.horizontal_line_to(dx);
                }
                // dy vlineto (7)
                7 => {
                    let [dy] = self.args()?;
                    self.path_builder.vertical_line_to(dy);
                }
                // dx1 dy1 dx2 dy2 dx3 dy3 rrcurveto (8)
                8 => {
                    let [dx1, dy1, dx2, dy2, dx3, dy3] = self.args()?;
                    self.path_builder
                        .relative_relative_curve_to(dx1, dy1, dx2, dy2, dx3, dy3);
                }
                // closepath (9)
                9 => {
                    self.path_builder.close_path();
                    self.operand_stack.clear();
                }
                // subr# callsubr (10)
                10 => self.call_subr(depth)?,
                // return (11)
                11 => return Ok(()),
                12 => self.escaped(reader.next()?)?,
                // sbx wx hsbw (13)
                13 => {
                    let [sbx, wx] = self.args()?;
                    self.path_builder.hsbw(sbx, wx);
                }
                // endchar (14)
                14 => {
                    self.operand_stack.clear();
                    self.finished = true;
                }
                // dx dy rmoveto (21)
                21 => {
                    let [dx, dy] = self.args()?;
                    self.move_by(dx, dy);
                }
                // dx hmoveto (22)
                22 => {
                    let [dx] = self.args()?;
                    self.move_by(dx, 0.0);
                }
                // dy1 dx2 dy2 dx3 vhcurveto (30)
                30 => {
                    let [dy1, dx2, dy2, dx3] = self.args()?;
                    self.path_builder
                        .vertical_horizontal_curve_to(dy1, dx2, dy2, dx3);
                }
                // dx1 dx2 dy2 dy3 hvcurveto (31)
                31 => {
                    let [dx1, dx2, dy2, dy3] = self.args()?;
                    self.path_builder
                        .horizontal_vertical_curve_to(dx1, dx2, dy2, dy3);
                }
                op => {
                    log::debug!("unknown Type 1 charstring operator {}", op);
                    self.operand_stack.clear();
                }
            }
        }

        Ok(())
    }

    fn escaped(&mut self, op: u8) -> anyhow::Result<()> {
        match op {
            // dotsection (12 0)
            // x0 dx0 x1 dx1 x2 dx2 vstem3 (12 1)
            // y0 dy0 y1 dy1 y2 dy2 hstem3 (12 2)
            0..=2 => self.operand_stack.clear(),
            // asb adx ady bchar achar seac (12 6)
            6 => {
                let [asb, adx, ady, bchar, achar] = self.args()?;

                self.seac = Some(Type1Seac {
                    asb,
                    adx,
                    ady,
                    base_code: bchar as u8,
                    accent_code: achar as u8,
                });
                self.finished = true;
            }
            // sbx sby wx wy sbw (12 7)
            7 => {
                let [sbx, sby, wx, wy] = self.args()?;
                self.path_builder.sbw(sbx, sby, wx, wy);
            }
            // num1 num2 div (12 12)
            12 => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push_f32(a / b)?;
            }
            // arg1 ... argn n othersubr# callothersubr (12 16)
            16 => self.call_other_subr()?,
            // pop (12 17)
            17 => {
                let n = self.ps_stack.pop().unwrap_or_else(|| {
                    log::debug!("pop with an empty PostScript stack");
                    0.0
                });
                self.push_f32(n)?;
            }
            // x y setcurrentpoint (12 33)
            33 => {
                let [x, y] = self.args()?;
                self.path_builder.set_current_point(Point::new(x, y));
            }
            op => {
                log::debug!("unknown Type 1 charstring operator 12 {}", op);
                self.operand_stack.clear();
            }
        }

        Ok(())
    }

    fn call_subr(&mut self, depth: usize) -> anyhow::Result<()> {
        if depth >= MAX_SUBR_DEPTH {
            anyhow::bail!(FontError::NestingLimitReached);
        }

        let index = self.pop()? as i32;

        let subr = usize::try_from(index)
            .ok()
            .and_then(|idx| self.subrs.get(idx))
            .ok_or(FontError::InvalidSubroutineIndex { index })?;

        self.execute(subr, depth + 1)
    }

    /// The hint replacement and flex mechanisms, implemented natively. Other
    /// numbers hand their arguments back through `pop`
    fn call_other_subr(&mut self) -> anyhow::Result<()> {
        let number = self.pop()? as i32;
        let n = self.pop()? as usize;

        if n > self.operand_stack.len() {
            anyhow::bail!(FontError::StackUnderflow);
        }

        let args = self.operand_stack.split_off(self.operand_stack.len() - n);

        match number {
            // flex end: the two curves through the collected points
            0 => {
                let points = self.flex_points.take().unwrap_or_default();

                if points.len() == 7 {
                    self.path_builder.curve_to(points[1], points[2], points[3]);
                    self.path_builder.curve_to(points[4], points[5], points[6]);
                } else {
                    log::warn!("flex with {} points", points.len());
                }

                // the end point, for the `pop pop setcurrentpoint` that follows
                let end = points.last().copied().unwrap_or(self.flex_point);
                self.ps_stack.push(end.y);
                self.ps_stack.push(end.x);
            }
            // flex start
            1 => {
                self.flex_point = self.path_builder.current_point();
                self.flex_points = Some(Vec::with_capacity(7));
            }
            // flex point
            2 => match &mut self.flex_points {
                Some(points) => points.push(self.flex_point),
                None => log::warn!("flex point outside of flex"),
            },
            // hint replacement: `callsubr` then runs subroutine 3, a plain return
            3 => self.ps_stack.push(3.0),
            // counter control hints
            12 | 13 => {}
            _ => {
                log::debug!("unknown othersubr {}", number);
                self.ps_stack.extend(args.into_iter().rev());
            }
        }

        Ok(())
    }

    /// Moves are only recorded while a flex is being collected
    fn move_by(&mut self, dx: f32, dy: f32) {
        if self.flex_points.is_some() {
            self.flex_point = Point::new(self.flex_point.x + dx, self.flex_point.y + dy);
        } else {
            self.path_builder.relative_move_to(dx, dy);
        }
    }

    /// Takes exactly `N` operands from the bottom of the stack and clears it
    fn args<const N: usize>(&mut self) -> anyhow::Result<[f32; N]> {
        if self.operand_stack.len() < N {
            anyhow::bail!(FontError::StackUnderflow);
        }

        let mut args = [0.0; N];
        args.copy_from_slice(&self.operand_stack[..N]);
        self.operand_stack.clear();

        Ok(args)
    }

    fn pop(&mut self) -> anyhow::Result<f32> {
        self.operand_stack
            .pop()
            .ok_or(anyhow::anyhow!(FontError::StackUnderflow))
    }

    fn push(&mut self, n: i32) -> anyhow::Result<()> {
        self.push_f32(n as f32)
    }

    fn push_f32(&mut self, n: f32) -> anyhow::Result<()> {
        if self.operand_stack.len() >= MAX_OPERANDS {
            anyhow::bail!(FontError::StackOverflow);
        }

        self.operand_stack.push(n);

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    use crate::cff::charstring::test::num;

    /// Assembles a charstring. Type 1 shares the Type 2 integer encoding for
    /// values up to 1131
    pub(crate) fn charstring(parts: &[(&[i32], &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();

        for (operands, op) in parts {
            for &n in *operands {
                if (-1131..=1131).contains(&n) {
                    out.extend(num(n));
                } else {
                    out.push(255);
                    out.extend(n.to_be_bytes());
                }
            }
            out.extend_from_slice(op);
        }

        out
    }

    fn evaluate(charstring: &[u8], subrs: &[Vec<u8>]) -> Type1Output {
        Type1CharStringInterpreter::evaluate(charstring, subrs).unwrap()
    }

    #[test]
    fn hsbw_and_lines() {
        let output = evaluate(
            &charstring(&[
                (&[20, 600], &[13]),
                (&[0, 0], &[21]),
                (&[100], &[6]),
                (&[200], &[7]),
                (&[], &[9]),
                (&[], &[14]),
            ]),
            &[],
        );

        assert_eq!(output.width, Point::new(600.0, 0.0));
        assert_eq!(output.side_bearing, Point::new(20.0, 0.0));

        let bbox = output.outline.bounding_box();
        assert_eq!(bbox.min, Point::new(20.0, 0.0));
        assert_eq!(bbox.max, Point::new(120.0, 200.0));
        assert_eq!(output.outline.paths.len(), 1);
    }

    #[test]
    fn large_numbers_and_div() {
        let output = evaluate(
            &charstring(&[
                (&[0, 500], &[13]),
                (&[0, 0], &[21]),
                (&[30000, 100], &[12, 12]),
                (&[], &[6]),
                (&[], &[14]),
            ]),
            &[],
        );

        assert_eq!(output.outline.bounding_box().max.x, 300.0);
    }

    #[test]
    fn subroutines_keep_operands() {
        let subrs = vec![charstring(&[(&[], &[5]), (&[], &[11])])];
        let output = evaluate(
            &charstring(&[
                (&[0, 500], &[13]),
                (&[0, 0], &[21]),
                (&[40, 50, 0], &[10]),
                (&[], &[14]),
            ]),
            &subrs,
        );

        assert_eq!(output.outline.bounding_box().max, Point::new(40.0, 50.0));
    }

    #[test]
    fn flex_through_othersubrs() {
        // the standard Subrs 0 to 2 of Type 1 fonts
        let subrs = vec![
            charstring(&[(&[3, 0], &[12, 16]), (&[], &[12, 17, 12, 17, 12, 33, 11])]),
            charstring(&[(&[0, 1], &[12, 16]), (&[], &[11])]),
            charstring(&[(&[0, 2], &[12, 16]), (&[], &[11])]),
        ];

        let mut parts: Vec<(Vec<i32>, Vec<u8>)> = vec![
            (vec![0, 500], vec![13]),
            (vec![0, 0], vec![21]),
            (vec![1], vec![10]),
            // reference point
            (vec![50, 0], vec![21]),
            (vec![2], vec![10]),
        ];
        for (dx, dy) in [(10, 10), (20, 0), (20, -10), (20, 10), (20, 0), (10, -10)] {
            parts.push((vec![dx, dy], vec![21]));
            parts.push((vec![2], vec![10]));
        }
        parts.push((vec![50, 150, 0, 0], vec![10]));
        parts.push((vec![0, 100], vec![5]));
        parts.push((vec![], vec![14]));

        let parts: Vec<(&[i32], &[u8])> = parts
            .iter()
            .map(|(operands, op)| (&operands[..], &op[..]))
            .collect();

        let output = evaluate(&charstring(&parts), &subrs);
        let path = &output.outline.paths[0];

        assert_eq!(path.segments.len(), 4);
        assert_eq!(path.segments[0].end(), Point::new(100.0, 0.0));
        assert_eq!(path.segments[1].end(), Point::new(150.0, 0.0));
        assert_eq!(path.segments[2].end(), Point::new(150.0, 100.0));
    }

    #[test]
    fn seac_stops_the_glyph() {
        let output = evaluate(
            &charstring(&[(&[0, 500], &[13]), (&[10, 20, 300, 65, 194], &[12, 6])]),
            &[],
        );

        assert_eq!(
            output.seac,
            Some(Type1Seac {
                asb: 10.0,
                adx: 20.0,
                ady: 300.0,
                base_code: 65,
                accent_code: 194,
            })
        );
        assert!(output.outline.is_empty());
    }

    #[test]
    fn unknown_othersubr_arguments_come_back_through_pop() {
        let output = evaluate(
            &charstring(&[
                (&[0, 500], &[13]),
                (&[0, 0], &[21]),
                (&[70, 80, 2, 42], &[12, 16]),
                (&[], &[12, 17, 12, 17]),
                (&[], &[5]),
                (&[], &[14]),
            ]),
            &[],
        );

        assert_eq!(output.outline.bounding_box().max, Point::new(70.0, 80.0));
    }

    #[test]
    fn recursion_is_bounded() {
        let subrs = vec![charstring(&[(&[0], &[10])])];
        let err =
            Type1CharStringInterpreter::evaluate(&charstring(&[(&[0], &[10])]), &subrs).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FontError>(),
            Some(FontError::NestingLimitReached)
        ));
    }
}
