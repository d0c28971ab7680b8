use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

use once_cell::sync::Lazy;

use super::{parse::CMapParser, BundledCMaps, CMap, PredefinedCMapName};

/// Supplies the programs of predefined CMaps other than `Identity-H`/`Identity-V`,
/// e.g. from a bundled copy of Adobe's CMap resources
pub trait CMapResourceProvider: Send + Sync {
    fn cmap_program(&self, name: &str) -> Option<Vec<u8>>;
}

static GLOBAL_REGISTRY: Lazy<CMapRegistry> = Lazy::new(CMapRegistry::new);

/// Resolves predefined CMaps by name, caching each for the registry's lifetime
pub struct CMapRegistry {
    provider: Option<Arc<dyn CMapResourceProvider>>,
    cache: RwLock<HashMap<String, Arc<CMap>>>,
}

impl fmt::Debug for CMapRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CMapRegistry")
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

impl CMapRegistry {
    /// A registry that only knows the identity CMaps and the bundled code space
    /// layouts
    pub fn new() -> Self {
        Self {
            provider: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_provider(provider: Arc<dyn CMapResourceProvider>) -> Self {
        Self {
            provider: Some(provider),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry, without a resource provider
    pub fn global() -> &'static CMapRegistry {
        &GLOBAL_REGISTRY
    }

    /// Resolves `name`, falling back to identity when it cannot be found
    pub fn resolve(&self, name: &str) -> Arc<CMap> {
        self.resolve_nested(name, 0)
    }

    /// Like [`Self::resolve`], but `None` instead of the identity fallback
    pub fn try_resolve(&self, name: &str) -> Option<Arc<CMap>> {
        if let Some(cmap) = self.cached(name) {
            return Some(cmap);
        }

        let cmap = self.load(name, 0)?;

        Some(self.insert(name, cmap))
    }

    pub(super) fn resolve_nested(&self, name: &str, depth: usize) -> Arc<CMap> {
        if let Some(cmap) = self.cached(name) {
            return cmap;
        }

        let cmap = match self.load(name, depth) {
            Some(cmap) => cmap,
            None => {
                let vertical = match PredefinedCMapName::from_str(name) {
                    Ok(predefined) => {
                        log::warn!(
                            "no program for predefined CMap {} ({}), using identity",
                            name,
                            predefined.character_collection()
                        );
                        predefined.is_vertical()
                    }
                    Err(..) => {
                        log::warn!("unknown CMap {}, using identity", name);
                        false
                    }
                };

                if vertical {
                    CMap::identity_vertical()
                } else {
                    CMap::identity()
                }
            }
        };

        self.insert(name, cmap)
    }

    fn cached(&self, name: &str) -> Option<Arc<CMap>> {
        match self.cache.read() {
            Ok(cache) => cache.get(name).cloned(),
            Err(poisoned) => poisoned.into_inner().get(name).cloned(),
        }
    }

    /// Builds the CMap without holding the lock; a concurrent build of the same
    /// name loses to whichever was inserted first. The provider is asked before
    /// the bundled code space layouts
    fn load(&self, name: &str, depth: usize) -> Option<CMap> {
        match name {
            "Identity-H" => return Some(CMap::identity()),
            "Identity-V" => return Some(CMap::identity_vertical()),
            _ => {}
        }

        let program = match self.provider.as_ref().and_then(|p| p.cmap_program(name)) {
            Some(program) => program,
            None => {
                let program = BundledCMaps.cmap_program(name)?;
                log::warn!(
                    "no CID table for predefined CMap {}, codes map to CIDs of the same value",
                    name
                );
                program
            }
        };

        match CMapParser::new(&program, self, depth).parse(None) {
            Ok(cmap) => Some(cmap),
            Err(err) => {
                log::warn!("failed to parse predefined CMap {}: {}", name, err);
                None
            }
        }
    }

    fn insert(&self, name: &str, cmap: CMap) -> Arc<CMap> {
        let mut cache = match self.cache.write() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };

        Arc::clone(
            cache
                .entry(name.to_owned())
                .or_insert_with(|| Arc::new(cmap)),
        )
    }
}

impl Default for CMapRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingProvider {
        loads: AtomicUsize,
    }

    impl CMapResourceProvider for CountingProvider {
        fn cmap_program(&self, name: &str) -> Option<Vec<u8>> {
            self.loads.fetch_add(1, Ordering::SeqCst);

            match name {
                "Test-H" => Some(
                    b"/CMapName /Test-H def 1 begincodespacerange <00> <ff> endcodespacerange \
                      1 begincidrange <20> <7e> 1 endcidrange"
                        .to_vec(),
                ),
                "Test-V" => Some(b"/Test-H usecmap /WMode 1 def".to_vec()),
                "Loop" => Some(b"/Loop usecmap".to_vec()),
                _ => None,
            }
        }
    }

    fn registry() -> (Arc<CountingProvider>, CMapRegistry) {
        let provider = Arc::new(CountingProvider {
            loads: AtomicUsize::new(0),
        });

        (Arc::clone(&provider), CMapRegistry::with_provider(provider))
    }

    #[test]
    fn resolves_through_provider_once() {
        let (provider, registry) = registry();

        let first = registry.resolve("Test-H");
        let second = registry.resolve("Test-H");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
        assert_eq!(first.to_selector(0x41), 0x22);
    }

    #[test]
    fn usecmap_resolves_through_registry() {
        let (_, registry) = registry();

        let cmap = registry.resolve("Test-V");

        assert_eq!(cmap.writing_mode(), 1);
        assert_eq!(cmap.to_selectors(b"A"), vec![0x22]);
    }

    #[test]
    fn unknown_names_fall_back_to_identity() {
        let (_, registry) = registry();

        assert!(registry.try_resolve("NotAThing").is_none());

        let cmap = registry.resolve("NotAThing");
        assert_eq!(cmap.writing_mode(), 0);
        assert_eq!(cmap.to_selector(0x1234), 0x1234);
    }

    #[test]
    fn predefined_names_use_bundled_code_space() {
        let (provider, registry) = registry();

        let cmap = registry.try_resolve("90ms-RKSJ-H").unwrap();
        assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
        assert_eq!(cmap.name(), Some("90ms-RKSJ-H"));
        assert_eq!(cmap.code_length(0x41), 1);
        assert_eq!(cmap.code_length(0x82), 2);
        assert_eq!(cmap.code_length(0xb1), 1);
        assert_eq!(cmap.decode(&[0x41, 0x82, 0xa0, 0xb1]), vec![0x41, 0x82a0, 0xb1]);
        assert_eq!(cmap.to_selector(0x82a0), 0x82a0);

        let cmap = CMapRegistry::new().resolve("UniGB-UCS2-V");
        assert_eq!(cmap.writing_mode(), 1);
        assert_eq!(cmap.decode(&[0x00, 0x41]), vec![0x41]);
        assert_eq!(cmap.to_selector(0x4e00), 0x4e00);
    }

    #[test]
    fn usecmap_cycles_terminate() {
        let (_, registry) = registry();

        let cmap = registry.resolve("Loop");

        assert_eq!(cmap.to_selector(0x41), crate::cmap::NOTDEF);
    }

    #[test]
    fn identity_is_built_in() {
        let registry = CMapRegistry::new();

        assert_eq!(registry.resolve("Identity-V").writing_mode(), 1);
        assert_eq!(registry.resolve("Identity-H").to_selector(0xabcd), 0xabcd);
    }
}
