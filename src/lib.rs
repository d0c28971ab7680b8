/*!
 * Glyph outlines and character mappings from the font programs embedded in
 * PDF documents: TrueType, OpenType/CFF, bare CFF, Type 1, and composite
 * (Type 0) fonts over CIDFonts
 */

pub use crate::{
    cmap::{BundledCMaps, CMap, CMapBuilder, CMapRegistry, CMapResourceProvider, NOTDEF},
    data_structures::Matrix,
    encoding::{BuiltinEncoding, DifferenceItem, Encoding},
    error::{FontError, FontResult},
    font::{
        CidFontProgram, CidToGidMap, CidWidths, EncodingSpec, Font, FontFlags, FontFormat,
        FontOptions, FontResources, Glyph, GlyphCache, OpenTypeFont, Type0Font, Type3Font, Widths,
    },
    geometry::{Outline, Path, Point},
};

pub mod cff;
pub mod cmap;
pub mod data_structures;
pub mod encoding;
pub mod error;
pub mod font;
pub mod geometry;
pub mod sfnt;
pub mod true_type;
pub mod type1;

mod lex;
mod macros;
mod parse_binary;
mod postscript;
