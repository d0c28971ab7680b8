use crate::{
    data_structures::Matrix,
    error::FontError,
    geometry::{Outline, Path, Point},
    parse_binary::{BinaryParser, ByteReader},
};

use super::loca::LocaTable;

/// Composite glyphs nesting deeper than this are treated as corrupt
const MAX_COMPONENT_DEPTH: usize = 16;

struct OutlineFlag;

impl OutlineFlag {
    const ON_CURVE: u8 = 1 << 0;
    const X_SHORT_VECTOR: u8 = 1 << 1;
    const Y_SHORT_VECTOR: u8 = 1 << 2;
    const REPEAT: u8 = 1 << 3;
    /// With `X_SHORT_VECTOR` the sign of the delta, otherwise "same as the
    /// previous x"
    const POSITIVE_X_SHORT_VECTOR: u8 = 1 << 4;
    const POSITIVE_Y_SHORT_VECTOR: u8 = 1 << 5;
}

struct ComponentFlag;

impl ComponentFlag {
    const ARG_1_AND_2_ARE_WORDS: u16 = 1 << 0;
    const ARGS_ARE_XY_VALUES: u16 = 1 << 1;
    const WE_HAVE_A_SCALE: u16 = 1 << 3;
    const MORE_COMPONENTS: u16 = 1 << 5;
    const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 1 << 6;
    const WE_HAVE_A_TWO_BY_TWO: u16 = 1 << 7;
    const USE_MY_METRICS: u16 = 1 << 9;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPoint {
    pub point: Point,
    pub on_curve: bool,
}

/// The points of a glyph in design units, composites flattened
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphPoints {
    pub points: Vec<GlyphPoint>,

    /// Index one past the last point of each contour
    pub contour_ends: Vec<usize>,
}

impl GlyphPoints {
    fn contours(&self) -> impl Iterator<Item = &[GlyphPoint]> {
        let mut start = 0;
        self.contour_ends.iter().map(move |&end| {
            let contour = &self.points[start..end];
            start = end;
            contour
        })
    }

    fn append_transformed(&mut self, other: GlyphPoints, transform: Matrix) {
        let offset = self.points.len();

        self.points.extend(other.points.into_iter().map(|p| GlyphPoint {
            point: transform * p.point,
            on_curve: p.on_curve,
        }));
        self.contour_ends
            .extend(other.contour_ends.into_iter().map(|end| end + offset));
    }

    /// Converts the quadratic contours to paths. A contour starts on its first
    /// on-curve point; two consecutive off-curve points imply an on-curve point
    /// at their midpoint
    pub fn to_outline(&self) -> Outline {
        let mut outline = Outline::empty();

        for contour in self.contours() {
            let (first, last) = match (contour.first(), contour.last()) {
                (Some(first), Some(last)) => (*first, *last),
                _ => continue,
            };

            let (start, rest) = if first.on_curve {
                (first.point, &contour[1..])
            } else if last.on_curve {
                (last.point, &contour[..contour.len() - 1])
            } else {
                (first.point.midpoint(last.point), contour)
            };

            let mut path = Path::new(start);
            let mut control: Option<Point> = None;

            for p in rest {
                match (control, p.on_curve) {
                    (Some(c), true) => {
                        path.quadratic_curve_to(c, p.point);
                        control = None;
                    }
                    (None, true) => path.line_to(p.point),
                    (Some(c), false) => {
                        path.quadratic_curve_to(c, c.midpoint(p.point));
                        control = Some(p.point);
                    }
                    (None, false) => control = Some(p.point),
                }
            }

            if let Some(c) = control {
                path.quadratic_curve_to(c, start);
            }
            path.close_path();

            if !path.is_empty() {
                outline.paths.push(path);
            }
        }

        outline
    }
}

/// State carried down through nested composite glyphs
#[derive(Debug, Default)]
pub struct CompositeContext {
    depth: usize,

    /// The component whose advance replaces the composite's own
    pub metrics_glyph: Option<u16>,
}

#[derive(Debug, Clone, Copy)]
pub struct GlyfTable<'a> {
    data: &'a [u8],
    loca: &'a LocaTable,
}

impl<'a> GlyfTable<'a> {
    pub fn new(data: &'a [u8], loca: &'a LocaTable) -> Self {
        Self { data, loca }
    }

    /// Points of `gid`, empty for glyphs without a description
    pub fn glyph_points(&self, gid: u16, ctx: &mut CompositeContext) -> anyhow::Result<GlyphPoints> {
        let range = match self.loca.glyph_range(gid) {
            Some(range) => range,
            None => return Ok(GlyphPoints::default()),
        };

        let data = match self.data.get(range) {
            Some(data) => data,
            None => {
                log::warn!("glyph {} lies outside of glyf", gid);
                return Ok(GlyphPoints::default());
            }
        };

        let mut reader = ByteReader::new(data);
        let number_of_contours = reader.parse_i16()?;
        // xMin, yMin, xMax, yMax
        reader.skip(8)?;

        if number_of_contours >= 0 {
            read_simple_glyph(&mut reader, number_of_contours as usize)
        } else {
            self.read_composite_glyph(&mut reader, ctx)
        }
    }

    fn read_composite_glyph(
        &self,
        reader: &mut ByteReader,
        ctx: &mut CompositeContext,
    ) -> anyhow::Result<GlyphPoints> {
        if ctx.depth >= MAX_COMPONENT_DEPTH {
            anyhow::bail!(FontError::NestingLimitReached);
        }

        let mut glyph = GlyphPoints::default();

        loop {
            let flags = reader.parse_u16()?;
            let glyph_index = reader.parse_u16()?;

            let (arg1, arg2) = if flags & ComponentFlag::ARG_1_AND_2_ARE_WORDS != 0 {
                if flags & ComponentFlag::ARGS_ARE_XY_VALUES != 0 {
                    (i32::from(reader.parse_i16()?), i32::from(reader.parse_i16()?))
                } else {
                    (i32::from(reader.parse_u16()?), i32::from(reader.parse_u16()?))
                }
            } else if flags & ComponentFlag::ARGS_ARE_XY_VALUES != 0 {
                (i32::from(reader.parse_i8()?), i32::from(reader.parse_i8()?))
            } else {
                (i32::from(reader.parse_u8()?), i32::from(reader.parse_u8()?))
            };

            let mut transform = Matrix::identity();

            if flags & ComponentFlag::WE_HAVE_A_SCALE != 0 {
                let scale = reader.parse_f2dot14()?.to_num::<f32>();
                transform = Matrix::new_scale(scale, scale);
            } else if flags & ComponentFlag::WE_HAVE_AN_X_AND_Y_SCALE != 0 {
                let x_scale = reader.parse_f2dot14()?.to_num::<f32>();
                let y_scale = reader.parse_f2dot14()?.to_num::<f32>();
                transform = Matrix::new_scale(x_scale, y_scale);
            } else if flags & ComponentFlag::WE_HAVE_A_TWO_BY_TWO != 0 {
                transform.a = reader.parse_f2dot14()?.to_num::<f32>();
                transform.b = reader.parse_f2dot14()?.to_num::<f32>();
                transform.c = reader.parse_f2dot14()?.to_num::<f32>();
                transform.d = reader.parse_f2dot14()?.to_num::<f32>();
            }

            if flags & ComponentFlag::USE_MY_METRICS != 0 {
                ctx.metrics_glyph = Some(glyph_index);
            }

            let mut child_ctx = CompositeContext {
                depth: ctx.depth + 1,
                metrics_glyph: None,
            };
            let child = self.glyph_points(glyph_index, &mut child_ctx)?;

            let offset = if flags & ComponentFlag::ARGS_ARE_XY_VALUES != 0 {
                Point::new(arg1 as f32, arg2 as f32)
            } else {
                // align child point `arg2` with the already placed point `arg1`
                let parent = glyph.points.get(arg1 as usize);
                let child_point = child.points.get(arg2 as usize);

                match (parent, child_point) {
                    (Some(parent), Some(child_point)) => {
                        parent.point - transform * child_point.point
                    }
                    _ => {
                        log::warn!("component point match {} -> {} is out of range", arg1, arg2);
                        Point::origin()
                    }
                }
            };

            transform.e = offset.x;
            transform.f = offset.y;

            glyph.append_transformed(child, transform);

            if flags & ComponentFlag::MORE_COMPONENTS == 0 {
                break;
            }
        }

        Ok(glyph)
    }
}

fn read_simple_glyph(
    reader: &mut ByteReader,
    number_of_contours: usize,
) -> anyhow::Result<GlyphPoints> {
    let mut contour_ends = Vec::with_capacity(number_of_contours);

    for _ in 0..number_of_contours {
        let end = usize::from(reader.parse_u16()?) + 1;

        if contour_ends.last().map_or(false, |&prev| end < prev) {
            anyhow::bail!(FontError::invalid("contour end points are not increasing"));
        }

        contour_ends.push(end);
    }

    let num_points = contour_ends.last().copied().unwrap_or(0);

    let instruction_length = reader.parse_u16()?;
    reader.skip(usize::from(instruction_length))?;

    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag = reader.parse_u8()?;
        flags.push(flag);

        if flag & OutlineFlag::REPEAT != 0 {
            let count = reader.parse_u8()?;
            for _ in 0..count {
                flags.push(flag);
            }
        }
    }
    flags.truncate(num_points);

    let xs = read_coordinates(
        reader,
        &flags,
        OutlineFlag::X_SHORT_VECTOR,
        OutlineFlag::POSITIVE_X_SHORT_VECTOR,
    )?;
    let ys = read_coordinates(
        reader,
        &flags,
        OutlineFlag::Y_SHORT_VECTOR,
        OutlineFlag::POSITIVE_Y_SHORT_VECTOR,
    )?;

    let points = flags
        .iter()
        .zip(xs.into_iter().zip(ys))
        .map(|(&flag, (x, y))| GlyphPoint {
            point: Point::new(f32::from(x), f32::from(y)),
            on_curve: flag & OutlineFlag::ON_CURVE != 0,
        })
        .collect();

    Ok(GlyphPoints {
        points,
        contour_ends,
    })
}

/// Absolute coordinates from the deltas for one axis
fn read_coordinates(
    reader: &mut ByteReader,
    flags: &[u8],
    short: u8,
    same_or_positive: u8,
) -> anyhow::Result<Vec<i16>> {
    let mut coordinates = Vec::with_capacity(flags.len());
    let mut value: i16 = 0;

    for &flag in flags {
        let delta = if flag & short != 0 {
            let magnitude = i16::from(reader.parse_u8()?);
            if flag & same_or_positive != 0 {
                magnitude
            } else {
                -magnitude
            }
        } else if flag & same_or_positive != 0 {
            0
        } else {
            reader.parse_i16()?
        };

        value = value.wrapping_add(delta);
        coordinates.push(value);
    }

    Ok(coordinates)
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// A simple glyph of on-curve points with long coordinates, one contour
    /// per slice
    pub(crate) fn simple_glyph(contours: &[&[(i16, i16)]]) -> Vec<u8> {
        let mut out = (contours.len() as i16).to_be_bytes().to_vec();
        out.extend_from_slice(&[0; 8]);

        let mut end = 0;
        for contour in contours {
            end += contour.len();
            out.extend_from_slice(&(end as u16 - 1).to_be_bytes());
        }

        out.extend_from_slice(&[0, 0]);
        out.extend(std::iter::repeat(OutlineFlag::ON_CURVE).take(end));

        let points: Vec<(i16, i16)> = contours.iter().flat_map(|c| c.iter().copied()).collect();
        let mut prev = 0;
        for (x, _) in &points {
            out.extend_from_slice(&(x - prev).to_be_bytes());
            prev = *x;
        }
        let mut prev = 0;
        for (_, y) in &points {
            out.extend_from_slice(&(y - prev).to_be_bytes());
            prev = *y;
        }

        out
    }

    /// `glyf` and long `loca` data for the given glyph descriptions
    pub(crate) fn build_glyf(glyphs: &[Vec<u8>]) -> (Vec<u8>, Vec<u8>) {
        let mut glyf = Vec::new();
        let mut loca = Vec::new();

        for glyph in glyphs {
            loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());
            glyf.extend_from_slice(glyph);
            while glyf.len() % 4 != 0 {
                glyf.push(0);
            }
        }
        loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());

        (glyf, loca)
    }

    fn points(glyphs: &[Vec<u8>], gid: u16) -> anyhow::Result<GlyphPoints> {
        let (glyf, loca) = build_glyf(glyphs);
        let loca = LocaTable::parse(&loca, 1, glyphs.len() as u16).unwrap();

        GlyfTable::new(&glyf, &loca).glyph_points(gid, &mut CompositeContext::default())
    }

    const SQUARE: &[(i16, i16)] = &[(0, 0), (100, 0), (100, 100), (0, 100)];

    #[test]
    fn simple_glyph_with_short_and_repeated_flags() {
        let mut data = vec![0, 1];
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&[0, 3, 0, 0]);
        // on-curve, x short positive, y same, repeated once; then y short
        // positive with x same, repeated once
        data.extend_from_slice(&[0x3b, 1, 0x3d, 1]);
        data.extend_from_slice(&[10, 20]);
        data.extend_from_slice(&[30, 40]);

        let glyph = points(&[Vec::new(), data], 1).unwrap();

        let coords: Vec<Point> = glyph.points.iter().map(|p| p.point).collect();
        assert_eq!(
            coords,
            vec![
                Point::new(10.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(30.0, 30.0),
                Point::new(30.0, 70.0),
            ]
        );
        assert!(glyph.points.iter().all(|p| p.on_curve));
        assert_eq!(glyph.contour_ends, vec![4]);
    }

    #[test]
    fn empty_glyph_has_no_points() {
        let glyph = points(&[Vec::new(), simple_glyph(&[SQUARE])], 0).unwrap();

        assert!(glyph.points.is_empty());
        assert!(glyph.to_outline().is_empty());
    }

    #[test]
    fn off_curve_points_imply_midpoints() {
        let glyph = GlyphPoints {
            points: vec![
                GlyphPoint {
                    point: Point::new(0.0, 0.0),
                    on_curve: false,
                },
                GlyphPoint {
                    point: Point::new(100.0, 0.0),
                    on_curve: false,
                },
                GlyphPoint {
                    point: Point::new(100.0, 100.0),
                    on_curve: false,
                },
                GlyphPoint {
                    point: Point::new(0.0, 100.0),
                    on_curve: false,
                },
            ],
            contour_ends: vec![4],
        };

        let outline = glyph.to_outline();
        let path = &outline.paths[0];

        // every point is a control point, so the contour starts between the
        // last and the first
        assert_eq!(path.start(), Point::new(0.0, 50.0));
        assert_eq!(path.segments.len(), 4);
        assert!(path.is_closed());
        assert_eq!(path.segments[0].end(), Point::new(50.0, 0.0));
    }

    #[test]
    fn composite_matches_transformed_children() {
        let mut composite = (-1i16).to_be_bytes().to_vec();
        composite.extend_from_slice(&[0; 8]);

        // scaled by one half and moved by (10, 20)
        let flags = ComponentFlag::ARGS_ARE_XY_VALUES
            | ComponentFlag::WE_HAVE_A_SCALE
            | ComponentFlag::MORE_COMPONENTS;
        composite.extend_from_slice(&flags.to_be_bytes());
        composite.extend_from_slice(&1u16.to_be_bytes());
        composite.extend_from_slice(&[10, 20]);
        composite.extend_from_slice(&0x2000u16.to_be_bytes());

        // child point 0 placed on point 2 of the first component
        let flags = ComponentFlag::USE_MY_METRICS;
        composite.extend_from_slice(&flags.to_be_bytes());
        composite.extend_from_slice(&1u16.to_be_bytes());
        composite.extend_from_slice(&[2, 0]);

        let glyphs = [Vec::new(), simple_glyph(&[SQUARE]), composite];
        let (glyf, loca) = build_glyf(&glyphs);
        let loca = LocaTable::parse(&loca, 1, 3).unwrap();
        let table = GlyfTable::new(&glyf, &loca);

        let mut ctx = CompositeContext::default();
        let composite = table.glyph_points(2, &mut ctx).unwrap().to_outline();
        let child = table
            .glyph_points(1, &mut CompositeContext::default())
            .unwrap()
            .to_outline();

        let mut expected = Outline::empty();
        expected.extend_transformed(&child, Matrix::new(0.5, 0.0, 0.0, 0.5, 10.0, 20.0));
        expected.extend_transformed(&child, Matrix::new_translation(60.0, 70.0));

        assert_eq!(composite, expected);
        assert_eq!(ctx.metrics_glyph, Some(1));
    }

    #[test]
    fn self_referencing_composite_is_bounded() {
        let mut composite = (-1i16).to_be_bytes().to_vec();
        composite.extend_from_slice(&[0; 8]);
        composite.extend_from_slice(&ComponentFlag::ARGS_ARE_XY_VALUES.to_be_bytes());
        composite.extend_from_slice(&0u16.to_be_bytes());
        composite.extend_from_slice(&[0, 0]);

        let err = points(&[composite], 0).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FontError>(),
            Some(FontError::NestingLimitReached)
        ));
    }
}
