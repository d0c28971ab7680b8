mod cmap;
mod glyf;
mod head;
mod hmtx;
mod kern;
mod loca;
mod maxp;
mod post;

pub use cmap::{
    CmapRecord, CmapTable, PLATFORM_MACINTOSH, PLATFORM_UNICODE, PLATFORM_WINDOWS,
    WINDOWS_SYMBOL, WINDOWS_UNICODE_BMP, WINDOWS_UNICODE_FULL,
};
pub(crate) use glyf::{CompositeContext, GlyfTable};
pub use head::Head;
pub use hmtx::HorizontalMetrics;
pub use kern::KernTable;
pub use loca::LocaTable;
pub use maxp::Maxp;
pub use post::PostTable;

#[cfg(test)]
pub(crate) mod test {
    pub(crate) use super::{
        cmap::test::{build_cmap, format_4},
        glyf::test::{build_glyf, simple_glyph},
        head::test::build_head,
        hmtx::test::build_hhea,
    };
}
