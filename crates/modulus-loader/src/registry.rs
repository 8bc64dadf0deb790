//! The keyed registry itself (spec §9 redesign note): "interface-based
//! polymorphism over providers is replaced by a tagged variant"; the same
//! idea applies one level up, to the loaders and services a container
//! dispenses — a plain map from string tag to object, not an open
//! trait-object inheritance hierarchy. Consumers request by tag and get a
//! deterministic hit or a typed failure, never a silent `None`-that-looks-
//! like-success.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::LoaderError;
use crate::types::{CompiledModule, LoadRequest, Loader};

/// Whether a registry entry came from the host's built-in wiring or was
/// declared by a project manifest (spec §9 "explicit manifest-vs-internal
/// flag"). Nothing in this workspace registers a manifest-declared loader
/// yet — the flag exists so a future manifest-driven loader has somewhere
/// to record that fact, and so internal callers can tell built-ins apart
/// from user-supplied ones when deciding what to trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Internal,
    Manifest,
}

struct Entry<V> {
    kind: RegistryKind,
    value: V,
}

/// A plain tag -> object table, generic over what it dispenses.
struct Registry<V> {
    entries: RwLock<BTreeMap<String, Entry<V>>>,
}

impl<V: Clone> Registry<V> {
    fn new() -> Self {
        Self { entries: RwLock::new(BTreeMap::new()) }
    }

    fn register(&self, key: impl Into<String>, kind: RegistryKind, value: V) {
        self.entries.write().insert(key.into(), Entry { kind, value });
    }

    fn get(&self, key: &str) -> Option<V> {
        self.entries.read().get(key).map(|entry| entry.value.clone())
    }

    fn kind_of(&self, key: &str) -> Option<RegistryKind> {
        self.entries.read().get(key).map(|entry| entry.kind)
    }
}

/// Dispenses loaders by key and typed services by key; caches loaded
/// modules for its own lifetime (spec §4.7 "Cache invariant: at most one
/// loaded module per assembly name within a container's lifetime").
pub struct LoaderContainer {
    loaders: Registry<Arc<dyn Loader>>,
    services: Registry<Arc<dyn Any + Send + Sync>>,
    cache: RwLock<BTreeMap<String, Arc<CompiledModule>>>,
}

impl Default for LoaderContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderContainer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loaders: Registry::new(),
            services: Registry::new(),
            cache: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn register_loader(&self, kind: RegistryKind, loader: Arc<dyn Loader>) {
        let key = loader.key().to_string();
        self.loaders.register(key, kind, loader);
    }

    pub fn register_service<T: Send + Sync + 'static>(&self, key: impl Into<String>, kind: RegistryKind, value: Arc<T>) {
        self.services.register(key, kind, value as Arc<dyn Any + Send + Sync>);
    }

    #[must_use]
    pub fn service<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>, LoaderError> {
        let value = self.services.get(key).ok_or_else(|| LoaderError::NoServiceRegistered { key: key.to_string() })?;
        value.downcast::<T>().map_err(|_| LoaderError::ServiceTypeMismatch { key: key.to_string() })
    }

    /// Whether `key` is registered as an internal (built-in) entry rather
    /// than one declared by a project manifest (spec §9).
    #[must_use]
    pub fn loader_kind(&self, key: &str) -> Option<RegistryKind> {
        self.loaders.kind_of(key)
    }

    /// Peek the module cache without invoking a loader (spec §4.7 step 4
    /// "prefers the already-compiled in-memory module+image cache").
    #[must_use]
    pub fn cached(&self, assembly_name: &str) -> Option<Arc<CompiledModule>> {
        self.cache.read().get(assembly_name).cloned()
    }

    /// Dispatches to the loader registered under `key`. Returns
    /// `Ok(Some(module))` on a cache hit or a fresh compile, `Ok(None)` when
    /// the loader reports "no-match" (e.g. no manifest for that assembly),
    /// and `Err` when `key` is unregistered or the loader fails. A failed
    /// load never enters the cache (spec §7 "not polluted by failed
    /// compilations").
    pub fn load(&self, key: &str, request: &LoadRequest) -> Result<Option<Arc<CompiledModule>>, LoaderError> {
        if let Some(hit) = self.cached(&request.assembly_name) {
            return Ok(Some(hit));
        }

        let loader = self.loaders.get(key).ok_or_else(|| LoaderError::NoLoaderRegistered { key: key.to_string() })?;
        let Some(module) = loader.load(self, request)? else {
            return Ok(None);
        };

        let module = Arc::new(module);
        self.cache.write().insert(request.assembly_name.clone(), module.clone());
        Ok(Some(module))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReferenceImage;
    use modulus_core::FrameworkProfile;

    struct StubLoader {
        matches: &'static str,
    }

    impl Loader for StubLoader {
        fn key(&self) -> &str {
            "stub"
        }

        fn load(&self, _container: &LoaderContainer, request: &LoadRequest) -> Result<Option<CompiledModule>, LoaderError> {
            if request.assembly_name != self.matches {
                return Ok(None);
            }
            Ok(Some(CompiledModule {
                assembly_name: request.assembly_name.clone(),
                reference_image: ReferenceImage::FrameworkAssembly { name: request.assembly_name.clone() },
            }))
        }
    }

    fn framework() -> FrameworkProfile {
        FrameworkProfile::new("net", "8.0")
    }

    #[test]
    fn unregistered_key_fails_deterministically() {
        let container = LoaderContainer::new();
        let request = LoadRequest::new("Anything", framework());
        assert!(matches!(container.load("missing", &request), Err(LoaderError::NoLoaderRegistered { .. })));
    }

    #[test]
    fn no_match_is_not_an_error_and_is_not_cached() {
        let container = LoaderContainer::new();
        container.register_loader(RegistryKind::Internal, Arc::new(StubLoader { matches: "Q" }));
        let request = LoadRequest::new("P", framework());
        assert!(container.load("stub", &request).unwrap().is_none());
        assert!(container.cached("P").is_none());
    }

    #[test]
    fn successful_load_is_cached_across_calls() {
        let container = LoaderContainer::new();
        container.register_loader(RegistryKind::Internal, Arc::new(StubLoader { matches: "Q" }));
        let request = LoadRequest::new("Q", framework());

        let first = container.load("stub", &request).unwrap().unwrap();
        assert!(container.cached("Q").is_some());

        // A second load call must return the same cached instance rather
        // than invoking the loader again (it would return a different
        // assembly, Q still matches, so equality alone wouldn't prove
        // cache reuse by itself; identity does).
        let second = container.load("stub", &request).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn services_round_trip_by_type() {
        let container = LoaderContainer::new();
        container.register_service("config", RegistryKind::Internal, Arc::new(42u32));
        let value: Arc<u32> = container.service("config").unwrap();
        assert_eq!(*value, 42);

        let wrong: Result<Arc<String>, LoaderError> = container.service("config");
        assert!(matches!(wrong, Err(LoaderError::ServiceTypeMismatch { .. })));
    }
}
