mod memory;
mod view;

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

pub use self::{
    memory::{MemoryLoader, MemoryService},
    view::{CurrentView, FixedView, ThreadLocalView, ViewGuard},
};

/// Name of the resource map used when no explicit path is given.
pub const DEFAULT_RESOURCE_MAP: &str = "Resources";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    #[error("No view is active on the current thread")]
    NoCurrentView,
    #[error("No resources are bound to UI context {0}")]
    UnknownContext(UiContext),
    #[error("Resource map not found: {0}")]
    UnknownResourceMap(String),
    #[error("Resource loader service is unavailable")]
    Unavailable,
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LoaderError>;

/// Opaque handle to a UI surface. Callers own it; lookups only borrow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UiContext(u64);

impl UiContext {
    /// Allocates a handle that is unique within this process.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline(always)]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A loader bound to a single resource scope.
///
/// `get_string` returns an empty string when the key is absent from the
/// scope. A miss is never an error.
pub trait ResourceLoader: fmt::Debug + Send + Sync {
    fn get_string(&self, key: &str) -> String;
}

/// The host platform's resource loading service.
///
/// Every method hands out a loader for one scope or fails with whatever the
/// platform considers an error for that request.
pub trait LoaderService: Send + Sync {
    /// Loader for the view active on the calling thread.
    fn loader_for_current_view(&self) -> Result<Arc<dyn ResourceLoader>>;
    fn loader_for_context(&self, context: &UiContext) -> Result<Arc<dyn ResourceLoader>>;
    /// Loader that is not tied to any view. Must be usable from any thread.
    fn loader_for_independent_use(&self) -> Result<Arc<dyn ResourceLoader>>;
    fn loader_for_independent_use_at(&self, path: &str) -> Result<Arc<dyn ResourceLoader>>;
}

impl<S: LoaderService + ?Sized> LoaderService for Arc<S> {
    fn loader_for_current_view(&self) -> Result<Arc<dyn ResourceLoader>> {
        (**self).loader_for_current_view()
    }

    fn loader_for_context(&self, context: &UiContext) -> Result<Arc<dyn ResourceLoader>> {
        (**self).loader_for_context(context)
    }

    fn loader_for_independent_use(&self) -> Result<Arc<dyn ResourceLoader>> {
        (**self).loader_for_independent_use()
    }

    fn loader_for_independent_use_at(&self, path: &str) -> Result<Arc<dyn ResourceLoader>> {
        (**self).loader_for_independent_use_at(path)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_are_unique() {
        let a = UiContext::next();
        let b = UiContext::next();
        assert_ne!(a, b);
        assert_eq!(UiContext::from_raw(a.raw()), a);
    }

    #[test]
    fn error_messages() {
        let ctx = UiContext::from_raw(7);
        assert_eq!(
            LoaderError::UnknownContext(ctx).to_string(),
            "No resources are bound to UI context #7"
        );
        assert_eq!(
            LoaderError::UnknownResourceMap("Errors".into()).to_string(),
            "Resource map not found: Errors"
        );
    }

    #[test]
    fn shared_service() {
        let service = Arc::new(MemoryService::new());
        service.set_string(DEFAULT_RESOURCE_MAP, "Title", "Viewer");
        let loader = LoaderService::loader_for_independent_use(&service).unwrap();
        assert_eq!(loader.get_string("Title"), "Viewer");
    }
}
