use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use once_cell::sync::OnceCell;

use super::{CMap, CodeLength, Segment, SegmentShape};

/// The 256 codes sharing one high byte
#[derive(Debug, Clone)]
struct Block {
    selectors: [u16; 256],
    present: [bool; 256],
}

impl Block {
    fn new() -> Self {
        Self {
            selectors: [0; 256],
            present: [false; 256],
        }
    }
}

/// Collects individual code mappings, then compacts them into a [`CMap`]
#[derive(Debug, Clone)]
pub struct CMapBuilder {
    name: Option<String>,
    writing_mode: u8,
    code_lengths: [CodeLength; 256],
    blocks: BTreeMap<u8, Box<Block>>,
    strings: HashMap<u16, String>,
    base: Option<Arc<CMap>>,
}

impl CMapBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            writing_mode: 0,
            code_lengths: [CodeLength::Undeclared; 256],
            blocks: BTreeMap::new(),
            strings: HashMap::new(),
            base: None,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn set_writing_mode(&mut self, writing_mode: u8) {
        self.writing_mode = writing_mode;
    }

    /// Sets the fallback CMap and inherits its code space classification for
    /// every leading byte not yet declared
    pub fn set_base(&mut self, base: Arc<CMap>) {
        for (own, inherited) in self.code_lengths.iter_mut().zip(base.code_lengths) {
            if *own == CodeLength::Undeclared {
                *own = inherited;
            }
        }

        self.base = Some(base);
    }

    /// Declares the leading bytes `low..=high` to start codes of `length` bytes.
    /// A one-byte declaration wins over an earlier or later two-byte one, which
    /// tolerates encoders that emit both for the same byte
    pub fn add_code_space(&mut self, low: u8, high: u8, length: usize) {
        let length = match length {
            1 => CodeLength::One,
            2 => CodeLength::Two,
            _ => {
                log::debug!("ignoring {} byte code space range", length);
                return;
            }
        };

        for b in low..=high {
            let slot = &mut self.code_lengths[usize::from(b)];

            if *slot != CodeLength::One {
                *slot = length;
            }
        }
    }

    pub fn map(&mut self, code: u16, selector: u16) {
        let [high, low] = code.to_be_bytes();

        let block = self
            .blocks
            .entry(high)
            .or_insert_with(|| Box::new(Block::new()));

        block.selectors[usize::from(low)] = selector;
        block.present[usize::from(low)] = true;
    }

    /// Maps `start..=end` to consecutive selectors beginning at `first_selector`.
    /// Selectors past `u16::MAX` end the range
    pub fn map_range(&mut self, start: u16, end: u16, first_selector: u16) {
        for (code, selector) in (start..=end).zip(first_selector..=u16::MAX) {
            self.map(code, selector);
        }
    }

    /// Maps `code` to text of more than one UTF-16 unit
    pub fn map_string(&mut self, code: u16, text: String) {
        self.strings.insert(code, text);
    }

    /// Maps `code` to UTF-16 text, as a selector when it is a single unit
    pub fn map_utf16(&mut self, code: u16, units: &[u16]) {
        match units {
            [] => {}
            [unit] => self.map(code, *unit),
            units => self.map_string(code, String::from_utf16_lossy(units)),
        }
    }

    pub fn build(self) -> CMap {
        let mut segments = Vec::new();

        for (high, block) in &self.blocks {
            compact_block(*high, block, &mut segments);
        }

        CMap {
            name: self.name,
            writing_mode: self.writing_mode,
            code_lengths: self.code_lengths,
            segments,
            strings: self.strings,
            base: self.base,
            inverse: OnceCell::new(),
        }
    }
}

impl Default for CMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a block into its runs of mapped codes and stores each run in the
/// smallest shape that reproduces it
fn compact_block(high: u8, block: &Block, segments: &mut Vec<Segment>) {
    let base_code = u16::from(high) << 8;
    let mut low = 0;

    while low < 256 {
        if !block.present[low] {
            low += 1;
            continue;
        }

        let run_start = low;
        while low < 256 && block.present[low] {
            low += 1;
        }

        let selectors = &block.selectors[run_start..low];
        let start = base_code + run_start as u16;

        segments.push(Segment {
            start,
            len: selectors.len() as u32,
            shape: shape_of(start, selectors),
        });
    }
}

fn shape_of(start: u16, selectors: &[u16]) -> SegmentShape {
    let first = selectors[0];

    if selectors.iter().all(|&selector| selector == first) {
        return SegmentShape::Constant(first);
    }

    let delta = i32::from(first) - i32::from(start);

    let is_linear = selectors
        .iter()
        .zip(start..=u16::MAX)
        .all(|(&selector, code)| i32::from(selector) == i32::from(code) + delta);

    if is_linear {
        SegmentShape::Delta(delta)
    } else {
        SegmentShape::Table(selectors.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn simple_rng(seed: &mut u32) -> u32 {
        *seed ^= *seed << 13;
        *seed ^= *seed >> 17;
        *seed ^= *seed << 5;
        *seed
    }

    #[test]
    fn compaction_shapes() {
        let mut builder = CMapBuilder::new();
        builder.map_range(0x0100, 0x01ff, 0x0300);
        for code in 0x0200..=0x02ff {
            builder.map(code, 7);
        }
        builder.map(0x0300, 1);
        builder.map(0x0301, 5);
        builder.map(0x0302, 2);

        let cmap = builder.build();

        assert_eq!(cmap.segments.len(), 3);
        assert_eq!(cmap.segments[0].shape, SegmentShape::Delta(0x200));
        assert_eq!(cmap.segments[1].shape, SegmentShape::Constant(7));
        assert!(matches!(cmap.segments[2].shape, SegmentShape::Table(..)));
    }

    #[test]
    fn compacted_lookup_matches_per_code_table() {
        let mut seed = 0x1234_5678;
        let mut expected = HashMap::new();
        let mut builder = CMapBuilder::new();

        for _ in 0..200 {
            let start = (simple_rng(&mut seed) % 0x3000) as u16;
            let len = (simple_rng(&mut seed) % 300) as u16;
            let end = start.saturating_add(len);

            match simple_rng(&mut seed) % 3 {
                0 => {
                    let selector = (simple_rng(&mut seed) % 50) as u16 + 1;
                    for code in start..=end {
                        builder.map(code, selector);
                        expected.insert(code, selector);
                    }
                }
                1 => {
                    let first = (simple_rng(&mut seed) % 0x8000) as u16 + 1;
                    builder.map_range(start, end, first);
                    for (code, selector) in (start..=end).zip(first..) {
                        expected.insert(code, selector);
                    }
                }
                _ => {
                    for code in start..=end {
                        let selector = (simple_rng(&mut seed) % 0xffff) as u16 + 1;
                        builder.map(code, selector);
                        expected.insert(code, selector);
                    }
                }
            }
        }

        let cmap = builder.build();

        for code in 0..=u16::MAX {
            assert_eq!(
                cmap.to_selector(code),
                expected.get(&code).copied().unwrap_or(0),
                "code {:#06x}",
                code
            );
        }
    }

    #[test]
    fn one_byte_code_space_wins() {
        let mut builder = CMapBuilder::new();
        builder.add_code_space(0x80, 0x9f, 2);
        builder.add_code_space(0x81, 0x81, 1);
        builder.add_code_space(0x81, 0x81, 2);

        let cmap = builder.build();

        assert_eq!(cmap.code_length(0x80), 2);
        assert_eq!(cmap.code_length(0x81), 1);
        assert_eq!(cmap.decode(&[0x80, 0x41, 0x81, 0x41]), vec![0x8041, 0x81, 0x41]);
    }
}
