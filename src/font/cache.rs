use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use super::Glyph;

/// Built glyphs of one font, keyed by glyph index
///
/// Glyph construction is a pure function of the font program, so a miss is
/// built with no lock held and two threads racing on the same glyph produce
/// equal values. The first one inserted is the one every caller sees.
#[derive(Debug)]
pub struct GlyphCache {
    glyphs: RwLock<HashMap<u16, Arc<Glyph>>>,
    capacity: usize,
}

impl GlyphCache {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A capacity of 0 is treated as 1
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            glyphs: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, gid: u16) -> Option<Arc<Glyph>> {
        self.glyphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&gid)
            .cloned()
    }

    pub fn get_or_insert_with(&self, gid: u16, build: impl FnOnce() -> Glyph) -> Arc<Glyph> {
        if let Some(glyph) = self.get(gid) {
            return glyph;
        }

        let glyph = Arc::new(build());

        let mut glyphs = self.glyphs.write().unwrap_or_else(PoisonError::into_inner);

        // a full cache starts a new generation
        if glyphs.len() >= self.capacity && !glyphs.contains_key(&gid) {
            log::trace!("glyph cache full ({} entries), clearing", glyphs.len());
            glyphs.clear();
        }

        Arc::clone(glyphs.entry(gid).or_insert(glyph))
    }

    pub fn len(&self) -> usize {
        self.glyphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.glyphs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GlyphCache {
    /// Clones start empty, with the same capacity
    fn clone(&self) -> Self {
        Self::with_capacity(self.capacity)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_inserted_glyph_wins() {
        let cache = GlyphCache::new();

        let first = cache.get_or_insert_with(3, || Glyph::new(Default::default(), 500.0));
        let second = cache.get_or_insert_with(3, || Glyph::new(Default::default(), 700.0));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.advance, 500.0);
    }

    #[test]
    fn full_cache_clears_whole_generation() {
        let cache = GlyphCache::with_capacity(2);

        cache.get_or_insert_with(1, Glyph::empty);
        cache.get_or_insert_with(2, Glyph::empty);
        assert_eq!(cache.len(), 2);

        cache.get_or_insert_with(3, Glyph::empty);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(1).is_none());
        assert!(cache.get(3).is_some());
    }

    #[test]
    fn shared_between_threads() {
        let cache = Arc::new(GlyphCache::new());

        let handles = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.get_or_insert_with(7, || Glyph::new(Default::default(), 250.0))
                })
            })
            .collect::<Vec<_>>();

        let glyphs = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();

        assert!(glyphs.iter().all(|glyph| Arc::ptr_eq(glyph, &glyphs[0])));
    }
}
