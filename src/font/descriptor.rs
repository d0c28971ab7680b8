use std::fmt;

/// Font characteristics, as carried by the `Flags` entry of a font descriptor
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontFlags(u32);

impl FontFlags {
    /// All glyphs have the same width
    pub const FIXED_PITCH: u32 = 1 << 0;

    /// Glyphs have serifs
    pub const SERIF: u32 = 1 << 1;

    /// Font contains glyphs outside the Adobe standard Latin character set
    pub const SYMBOLIC: u32 = 1 << 2;

    /// Glyphs resemble cursive handwriting
    pub const SCRIPT: u32 = 1 << 3;

    /// Font uses the Adobe standard Latin character set or a subset of it
    pub const NONSYMBOLIC: u32 = 1 << 5;

    /// Glyphs have dominant vertical strokes that are slanted
    pub const ITALIC: u32 = 1 << 6;

    /// Font contains no lowercase letters
    pub const ALL_CAP: u32 = 1 << 16;

    /// Lowercase letters are smaller versions of the uppercase ones
    pub const SMALL_CAP: u32 = 1 << 17;

    /// Bold glyphs are painted with extra pixels even at very small sizes
    pub const FORCE_BOLD: u32 = 1 << 18;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    pub const fn with(self, flag: u32) -> Self {
        Self(self.0 | flag)
    }

    pub const fn is_fixed_pitch(self) -> bool {
        self.contains(Self::FIXED_PITCH)
    }

    pub const fn is_serif(self) -> bool {
        self.contains(Self::SERIF)
    }

    /// Symbolic and not also marked nonsymbolic
    pub const fn is_symbolic(self) -> bool {
        self.contains(Self::SYMBOLIC) && !self.contains(Self::NONSYMBOLIC)
    }

    pub const fn is_italic(self) -> bool {
        self.contains(Self::ITALIC)
    }
}

impl fmt::Debug for FontFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(u32, &str); 9] = [
            (FontFlags::FIXED_PITCH, "FixedPitch"),
            (FontFlags::SERIF, "Serif"),
            (FontFlags::SYMBOLIC, "Symbolic"),
            (FontFlags::SCRIPT, "Script"),
            (FontFlags::NONSYMBOLIC, "Nonsymbolic"),
            (FontFlags::ITALIC, "Italic"),
            (FontFlags::ALL_CAP, "AllCap"),
            (FontFlags::SMALL_CAP, "SmallCap"),
            (FontFlags::FORCE_BOLD, "ForceBold"),
        ];

        f.debug_set()
            .entries(
                NAMES
                    .iter()
                    .filter(|(flag, _)| self.contains(*flag))
                    .map(|(_, name)| name),
            )
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn symbolic_requires_no_nonsymbolic_bit() {
        let flags = FontFlags::new(FontFlags::SYMBOLIC | FontFlags::SERIF);

        assert!(flags.is_symbolic());
        assert!(flags.is_serif());
        assert!(!flags.with(FontFlags::NONSYMBOLIC).is_symbolic());
        assert_eq!(format!("{:?}", flags), "{\"Serif\", \"Symbolic\"}");
    }
}
