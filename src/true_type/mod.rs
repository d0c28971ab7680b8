/*!
 * TrueType outlines (`glyf`) and the tables needed to use them
 *
 * https://learn.microsoft.com/en-us/typography/opentype/spec/otff
 */

use std::{ops::Range, sync::Arc};

use once_cell::sync::OnceCell;

use crate::{
    cmap::CMap,
    encoding::glyph_list::glyph_name_to_char,
    error::FontError,
    font::{cache::GlyphCache, Glyph},
    sfnt::{TableDirectory, TableTag},
};

use self::table::{
    CmapRecord, CmapTable, CompositeContext, GlyfTable, Head, HorizontalMetrics, KernTable,
    LocaTable, Maxp, PostTable,
};

pub mod table;

#[derive(Debug)]
pub struct TrueTypeFont {
    data: Arc<[u8]>,
    directory: TableDirectory,
    head: Head,
    maxp: Maxp,
    loca: LocaTable,
    glyf: Range<usize>,
    metrics: HorizontalMetrics,
    post: Option<PostTable>,
    kern: KernTable,
    cmap: CmapTable,
    cmap_range: Range<usize>,
    preferred_cmap: OnceCell<Option<Arc<CMap>>>,
    cache: GlyphCache,
}

impl TrueTypeFont {
    pub fn parse(data: Arc<[u8]>) -> anyhow::Result<Self> {
        Self::parse_at(data, 0)
    }

    /// Parses the `index`th font of a collection. Fails with
    /// [`FontError::RetryAsOpenType`] for CFF-flavored fonts
    pub fn parse_at(data: Arc<[u8]>, index: u32) -> anyhow::Result<Self> {
        let directory = TableDirectory::parse_at(&data, index)?;
        directory.check_glyf_outlines()?;

        let head = Head::parse(directory.require_table(&data, TableTag::HEAD)?)?;
        let maxp = Maxp::parse(directory.require_table(&data, TableTag::MAXP)?)?;
        let loca = LocaTable::parse(
            directory.require_table(&data, TableTag::LOCA)?,
            head.index_to_loc_format,
            maxp.num_glyphs,
        )?;

        let glyf = match directory.table_range(&data, TableTag::GLYF) {
            Some(glyf) => glyf,
            None => anyhow::bail!(FontError::MissingTable {
                tag: TableTag::GLYF
            }),
        };

        let metrics = match (
            directory.table_data(&data, TableTag::HHEA),
            directory.table_data(&data, TableTag::HMTX),
        ) {
            (Some(hhea), Some(hmtx)) => HorizontalMetrics::parse(hhea, hmtx, maxp.num_glyphs)
                .unwrap_or_else(|err| {
                    log::warn!("invalid horizontal metrics: {}", err);
                    HorizontalMetrics::default()
                }),
            _ => {
                log::debug!("font has no horizontal metrics");
                HorizontalMetrics::default()
            }
        };

        let post = directory
            .table_data(&data, TableTag::POST)
            .and_then(|post| match PostTable::parse(post, maxp.num_glyphs) {
                Ok(post) => Some(post),
                Err(err) => {
                    log::warn!("invalid post table: {}", err);
                    None
                }
            });

        let kern = directory
            .table_data(&data, TableTag::KERN)
            .map(|kern| {
                KernTable::parse(kern).unwrap_or_else(|err| {
                    log::warn!("invalid kern table: {}", err);
                    KernTable::default()
                })
            })
            .unwrap_or_default();

        let cmap_range = directory
            .table_range(&data, TableTag::CMAP)
            .unwrap_or(0..0);
        let cmap = match data.get(cmap_range.clone()) {
            Some(cmap) if !cmap.is_empty() => CmapTable::parse(cmap).unwrap_or_else(|err| {
                log::warn!("invalid cmap table: {}", err);
                CmapTable::default()
            }),
            _ => CmapTable::default(),
        };

        log::debug!(
            "parsed TrueType font with {} glyphs, {} units per em",
            maxp.num_glyphs,
            head.units_per_em
        );

        Ok(Self {
            data,
            directory,
            head,
            maxp,
            loca,
            glyf,
            metrics,
            post,
            kern,
            cmap,
            cmap_range,
            preferred_cmap: OnceCell::new(),
            cache: GlyphCache::new(),
        })
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = GlyphCache::with_capacity(capacity);
        self
    }

    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    pub fn num_glyphs(&self) -> usize {
        usize::from(self.maxp.num_glyphs)
    }

    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    pub fn font_bbox(&self) -> [f32; 4] {
        [
            f32::from(self.head.x_min),
            f32::from(self.head.y_min),
            f32::from(self.head.x_max),
            f32::from(self.head.y_max),
        ]
    }

    /// Advance in font units
    pub fn advance_width(&self, gid: u16) -> u16 {
        self.metrics.advance(gid)
    }

    pub fn left_side_bearing(&self, gid: u16) -> i16 {
        self.metrics.left_side_bearing(gid)
    }

    pub fn kerning(&self, left: u16, right: u16) -> i16 {
        self.kern.kerning(left, right)
    }

    pub fn glyph_name(&self, gid: u16) -> Option<&str> {
        self.post.as_ref()?.glyph_name(gid)
    }

    /// Looks the name up in `post`, then by its Unicode value in the
    /// preferred `cmap`
    pub fn glyph_index_for_name(&self, name: &str) -> Option<u16> {
        if let Some(gid) = self.post.as_ref().and_then(|post| post.glyph_index(name)) {
            return Some(gid);
        }

        let c = u32::from(glyph_name_to_char(name)?);
        let code = u16::try_from(c).ok()?;
        let cmap = self.preferred_cmap()?;

        cmap.is_mapped(code).then(|| cmap.to_selector(code))
    }

    pub fn cmap_subtables(&self) -> &[CmapRecord] {
        self.cmap.records()
    }

    /// The subtable for `(platform_id, encoding_id)` as a code to glyph index
    /// map. Subtables that fail to parse are logged and skipped
    pub fn cmap_for(&self, platform_id: u16, encoding_id: u16) -> Option<CMap> {
        let record = self.cmap.find(platform_id, encoding_id)?;
        self.read_cmap(record)
    }

    /// The Unicode subtable if the font has one, else Mac Roman, else Symbol
    pub fn preferred_cmap(&self) -> Option<Arc<CMap>> {
        self.preferred_cmap
            .get_or_init(|| {
                let record = self.cmap.preferred()?;
                self.read_cmap(record).map(Arc::new)
            })
            .clone()
    }

    fn read_cmap(&self, record: CmapRecord) -> Option<CMap> {
        let data = self.data.get(self.cmap_range.clone())?;

        match CmapTable::read_subtable(data, record) {
            Ok(cmap) => Some(cmap),
            Err(err) => {
                log::warn!(
                    "invalid cmap subtable ({}, {}): {}",
                    record.platform_id,
                    record.encoding_id,
                    err
                );
                None
            }
        }
    }

    pub fn glyph(&self, gid: u16) -> Arc<Glyph> {
        self.cache.get_or_insert_with(gid, || {
            self.build_glyph(gid).unwrap_or_else(|err| {
                log::warn!("failed to build TrueType glyph {}: {}", gid, err);
                Glyph::empty()
            })
        })
    }

    fn build_glyph(&self, gid: u16) -> anyhow::Result<Glyph> {
        if gid >= self.maxp.num_glyphs {
            log::debug!("glyph {} is out of range", gid);
            return Ok(Glyph::empty());
        }

        let glyf = self.data.get(self.glyf.clone()).unwrap_or_default();
        let table = GlyfTable::new(glyf, &self.loca);

        let mut ctx = CompositeContext::default();
        let points = table.glyph_points(gid, &mut ctx)?;

        let advance = self.metrics.advance(ctx.metrics_glyph.unwrap_or(gid));

        Ok(Glyph::new(points.to_outline(), f32::from(advance)))
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    use crate::{
        cmap::NOTDEF,
        geometry::Point,
        sfnt::test::build_sfnt,
    };

    use super::table::test::{build_cmap, build_glyf, build_head, build_hhea, format_4, simple_glyph};

    fn maxp(num_glyphs: u16) -> Vec<u8> {
        let mut maxp = 0x0000_5000u32.to_be_bytes().to_vec();
        maxp.extend_from_slice(&num_glyphs.to_be_bytes());
        maxp
    }

    fn post_format_3() -> Vec<u8> {
        let mut post = 0x0003_0000u32.to_be_bytes().to_vec();
        post.extend_from_slice(&[0; 28]);
        post
    }

    /// .notdef, a square at gid 1 and a narrow bar at gid 2, mapped from
    /// 'A' and 'B'
    pub(crate) fn build_font() -> Vec<u8> {
        let glyphs = [
            Vec::new(),
            simple_glyph(&[&[(0, 0), (500, 0), (500, 500), (0, 500)]]),
            simple_glyph(&[&[(0, 0), (100, 0), (100, 700), (0, 700)]]),
        ];
        let (glyf, loca) = build_glyf(&glyphs);

        let hmtx: Vec<u8> = [250u16, 0, 600, 50, 200, 0]
            .iter()
            .flat_map(|n| n.to_be_bytes())
            .collect();

        let cmap = build_cmap(&[(3, 1, format_4(&[(0x41, 0x42, -64)]))]);

        build_sfnt(
            0x0001_0000,
            &[
                (TableTag::CMAP, &cmap),
                (TableTag::GLYF, &glyf),
                (TableTag::HEAD, &build_head(2048, 1)),
                (TableTag::HHEA, &build_hhea(3)),
                (TableTag::HMTX, &hmtx),
                (TableTag::LOCA, &loca),
                (TableTag::MAXP, &maxp(3)),
                (TableTag::POST, &post_format_3()),
            ],
        )
    }

    #[test]
    fn glyphs_and_metrics() {
        let font = TrueTypeFont::parse(Arc::from(build_font())).unwrap();

        assert_eq!(font.num_glyphs(), 3);
        assert_eq!(font.units_per_em(), 2048);

        let square = font.glyph(1);
        assert_eq!(square.advance, 600.0);
        assert_eq!(square.outline.bounding_box().max, Point::new(500.0, 500.0));

        assert!(font.glyph(0).is_empty());
        assert_eq!(font.glyph(0).advance, 250.0);
        assert!(font.glyph(40).is_empty());

        assert!(Arc::ptr_eq(&font.glyph(2), &font.glyph(2)));
    }

    #[test]
    fn names_resolve_through_cmap_without_post_names() {
        let font = TrueTypeFont::parse(Arc::from(build_font())).unwrap();

        let cmap = font.cmap_for(3, 1).unwrap();
        assert_eq!(cmap.to_selector(0x41), 1);
        assert_eq!(cmap.to_selector(0x43), NOTDEF);

        assert_eq!(font.glyph_index_for_name("B"), Some(2));
        assert_eq!(font.glyph_index_for_name("C"), None);
        assert_eq!(font.glyph_name(1), None);
    }

    #[test]
    fn cff_flavored_font_is_retried() {
        let data = build_sfnt(0x4F54_544F, &[(TableTag::CFF, b"\x01\x00\x04\x01")]);

        let err = TrueTypeFont::parse(Arc::from(data)).unwrap_err();

        assert!(crate::error::is_retry_as_open_type(&err));
    }

    #[test]
    fn missing_loca_is_reported() {
        let data = build_sfnt(0x0001_0000, &[(TableTag::HEAD, &build_head(1000, 0))]);

        let err = TrueTypeFont::parse(Arc::from(data)).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FontError>(),
            Some(FontError::MissingTable { .. })
        ));
    }
}
