use std::sync::Arc;

use crate::{
    cff::CffFont,
    cmap::CMap,
    sfnt::{TableDirectory, TableTag},
    true_type::table::{CmapTable, Head, HorizontalMetrics, Maxp},
};

/// An sfnt font with `CFF ` outlines. Glyphs come from the CFF program, the
/// character map and metrics from the sfnt tables around it
#[derive(Debug)]
pub struct OpenTypeFont {
    cff: Arc<CffFont>,
    units_per_em: u16,
    metrics: Option<HorizontalMetrics>,
    cmap: Option<Arc<CMap>>,
}

impl OpenTypeFont {
    pub fn parse(data: &[u8]) -> anyhow::Result<Self> {
        Self::parse_at(data, 0)
    }

    pub fn parse_at(data: &[u8], index: u32) -> anyhow::Result<Self> {
        let directory = TableDirectory::parse_at(data, index)?;

        let cff = CffFont::parse(Arc::from(directory.require_table(data, TableTag::CFF)?))?;

        let units_per_em = match directory.table_data(data, TableTag::HEAD) {
            Some(head) => Head::parse(head)?.units_per_em,
            None => 1000,
        };

        let num_glyphs = match directory.table_data(data, TableTag::MAXP) {
            Some(maxp) => Maxp::parse(maxp)?.num_glyphs,
            None => u16::try_from(cff.num_glyphs()).unwrap_or(u16::MAX),
        };

        let metrics = match (
            directory.table_data(data, TableTag::HHEA),
            directory.table_data(data, TableTag::HMTX),
        ) {
            (Some(hhea), Some(hmtx)) => HorizontalMetrics::parse(hhea, hmtx, num_glyphs)
                .map_err(|err| log::warn!("invalid horizontal metrics: {}", err))
                .ok(),
            _ => None,
        };

        let cmap = directory.table_data(data, TableTag::CMAP).and_then(|cmap| {
            let table = CmapTable::parse(cmap)
                .map_err(|err| log::warn!("invalid cmap table: {}", err))
                .ok()?;

            CmapTable::read_subtable(cmap, table.preferred()?)
                .map_err(|err| log::warn!("invalid cmap subtable: {}", err))
                .ok()
                .map(Arc::new)
        });

        Ok(Self {
            cff: Arc::new(cff),
            units_per_em,
            metrics,
            cmap,
        })
    }

    /// Sizes the glyph cache of the CFF program. A program already shared
    /// through [`Self::cff`] keeps its cache
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        match Arc::get_mut(&mut self.cff) {
            Some(cff) => cff.set_cache_capacity(capacity),
            None => log::debug!("CFF program is shared, keeping its glyph cache"),
        }

        self
    }

    pub fn cff(&self) -> &Arc<CffFont> {
        &self.cff
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// The font's preferred `cmap` subtable
    pub fn cmap(&self) -> Option<&Arc<CMap>> {
        self.cmap.as_ref()
    }

    /// Advance from `hmtx` in font units, when the font has one
    pub fn advance_width(&self, gid: u16) -> Option<u16> {
        Some(self.metrics.as_ref()?.advance(gid))
    }
}
