use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::{
    view::{CurrentView, ThreadLocalView},
    LoaderError, LoaderService, ResourceLoader, Result, UiContext, DEFAULT_RESOURCE_MAP,
};

type StringTable = Arc<DashMap<String, String>>;

/// Loader over one in-memory resource map. Later edits to the map are
/// visible through loaders handed out before the edit.
#[derive(Debug, Clone)]
pub struct MemoryLoader {
    map: String,
    strings: StringTable,
}

impl MemoryLoader {
    #[inline(always)]
    pub fn map_name(&self) -> &str {
        &self.map
    }
}

impl ResourceLoader for MemoryLoader {
    fn get_string(&self, key: &str) -> String {
        match self.strings.get(key) {
            Some(value) => value.value().clone(),
            None => {
                log::trace!("Key {key:?} not present in resource map {}", self.map);
                String::new()
            }
        }
    }
}

/// Host resource service backed by resource maps held in memory.
///
/// Each UI context is bound to one named map. The current view is whatever
/// the installed [`CurrentView`] provider reports, [`ThreadLocalView`] by
/// default.
pub struct MemoryService {
    maps: DashMap<String, StringTable>,
    contexts: DashMap<UiContext, String>,
    view: RwLock<Box<dyn CurrentView>>,
    independent_loads: AtomicUsize,
}

impl Default for MemoryService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryService")
            .field("maps", &self.maps.len())
            .field("contexts", &self.contexts.len())
            .field("independent_loads", &self.independent_loads())
            .finish()
    }
}

impl MemoryService {
    pub fn new() -> Self {
        Self::with_view(ThreadLocalView)
    }

    pub fn with_view(view: impl CurrentView + 'static) -> Self {
        let maps = DashMap::new();
        maps.insert(DEFAULT_RESOURCE_MAP.to_owned(), StringTable::default());
        Self {
            maps,
            contexts: DashMap::new(),
            view: RwLock::new(Box::new(view)),
            independent_loads: AtomicUsize::new(0),
        }
    }

    pub fn set_current_view(&self, view: impl CurrentView + 'static) {
        *self.view.write() = Box::new(view);
    }

    /// Adds entries to the named map, creating it if needed.
    pub fn insert_map<K, V>(&self, name: &str, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.table(name);
        for (key, value) in entries {
            table.insert(key.into(), value.into());
        }
    }

    pub fn set_string(&self, map: &str, key: impl Into<String>, value: impl Into<String>) {
        self.table(map).insert(key.into(), value.into());
    }

    pub fn remove_string(&self, map: &str, key: &str) -> Option<String> {
        self.maps
            .get(map)
            .and_then(|table| table.remove(key))
            .map(|(_, value)| value)
    }

    pub fn has_map(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    /// Scopes `context` to the named map. Rebinding replaces the old map.
    pub fn bind_context(&self, context: UiContext, map: impl Into<String>) {
        let map = map.into();
        log::debug!("Binding UI context {context} to resource map {map}");
        self.contexts.insert(context, map);
    }

    pub fn unbind_context(&self, context: &UiContext) -> bool {
        self.contexts.remove(context).is_some()
    }

    /// How many times the default view-independent loader was requested.
    pub fn independent_loads(&self) -> usize {
        self.independent_loads.load(Ordering::Acquire)
    }

    fn table(&self, name: &str) -> StringTable {
        self.maps.entry(name.to_owned()).or_default().value().clone()
    }

    fn loader_for_map(&self, name: &str) -> Result<Arc<dyn ResourceLoader>> {
        let strings = self
            .maps
            .get(name)
            .map(|table| table.value().clone())
            .ok_or_else(|| LoaderError::UnknownResourceMap(name.to_owned()))?;
        Ok(Arc::new(MemoryLoader {
            map: name.to_owned(),
            strings,
        }))
    }
}

impl LoaderService for MemoryService {
    fn loader_for_current_view(&self) -> Result<Arc<dyn ResourceLoader>> {
        let context = self.view.read().current().ok_or(LoaderError::NoCurrentView)?;
        self.loader_for_context(&context)
    }

    fn loader_for_context(&self, context: &UiContext) -> Result<Arc<dyn ResourceLoader>> {
        let map = self
            .contexts
            .get(context)
            .map(|map| map.value().clone())
            .ok_or(LoaderError::UnknownContext(*context))?;
        log::trace!("Loading resource map {map} for UI context {context}");
        self.loader_for_map(&map)
    }

    fn loader_for_independent_use(&self) -> Result<Arc<dyn ResourceLoader>> {
        self.independent_loads.fetch_add(1, Ordering::AcqRel);
        self.loader_for_map(DEFAULT_RESOURCE_MAP)
    }

    fn loader_for_independent_use_at(&self, path: &str) -> Result<Arc<dyn ResourceLoader>> {
        log::trace!("Loading view-independent resource map {path}");
        self.loader_for_map(path)
    }
}
