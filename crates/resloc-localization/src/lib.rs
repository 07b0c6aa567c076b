mod config;
pub mod string_ext;

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
pub use resloc_loader::{LoaderError, LoaderService, ResourceLoader, Result, UiContext};

pub use self::{
    config::{ConfigError, ResolverConfig},
    string_ext::LocString,
};

static RESOLVER: OnceLock<Resolver> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("A string resolver is already installed")]
    AlreadyInstalled,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Installs the process-wide resolver used by [`LocString`].
pub fn install(
    service: impl LoaderService + 'static,
) -> std::result::Result<&'static Resolver, InstallError> {
    install_with_config(service, ResolverConfig::default())
}

pub fn install_with_config(
    service: impl LoaderService + 'static,
    config: ResolverConfig,
) -> std::result::Result<&'static Resolver, InstallError> {
    let resolver = Resolver::with_config(service, config)?;
    RESOLVER
        .set(resolver)
        .map_err(|_| InstallError::AlreadyInstalled)?;
    log::debug!("Installed process-wide string resolver");
    RESOLVER.get().ok_or(InstallError::AlreadyInstalled)
}

/// The process-wide resolver, if one has been installed.
#[inline(always)]
pub fn resolver() -> Option<&'static Resolver> {
    RESOLVER.get()
}

/// Which loader a lookup goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// The view active on the calling thread.
    CurrentView,
    Context(&'a UiContext),
    /// The shared view-independent loader.
    Independent,
    /// A fresh view-independent loader for the named resource map.
    IndependentPath(&'a str),
}

impl<'a> Scope<'a> {
    /// An explicit context wins; otherwise the current view.
    #[inline]
    pub fn for_view(context: Option<&'a UiContext>) -> Self {
        context.map_or(Self::CurrentView, Self::Context)
    }

    /// An explicit context wins; otherwise the shared independent loader.
    #[inline]
    pub fn independent(context: Option<&'a UiContext>) -> Self {
        context.map_or(Self::Independent, Self::Context)
    }
}

impl<'a> From<&'a UiContext> for Scope<'a> {
    fn from(context: &'a UiContext) -> Self {
        Self::Context(context)
    }
}

/// Resolves resource keys to localized strings through a [`LoaderService`].
///
/// Missing keys come back as empty strings. Failures to obtain a loader are
/// the service's own errors and are returned as-is.
pub struct Resolver {
    service: Arc<dyn LoaderService>,
    config: ResolverConfig,
    independent: RwLock<Option<Arc<dyn ResourceLoader>>>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("independent", &*self.independent.read())
            .finish()
    }
}

impl Resolver {
    pub fn new(service: impl LoaderService + 'static) -> Self {
        Self {
            service: Arc::new(service),
            config: ResolverConfig::default(),
            independent: RwLock::new(None),
        }
    }

    pub fn with_config(
        service: impl LoaderService + 'static,
        config: ResolverConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(service)
        })
    }

    #[inline(always)]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Localized string for the given context, or for the current view when
    /// no context is given.
    pub fn view_localized(&self, key: &str, context: Option<&UiContext>) -> Result<String> {
        self.resolve(key, Scope::for_view(context))
    }

    /// Localized string for the given context, or from the shared
    /// view-independent loader when no context is given. Safe to call from
    /// threads that have no view.
    pub fn localized(&self, key: &str, context: Option<&UiContext>) -> Result<String> {
        self.resolve(key, Scope::independent(context))
    }

    /// Localized string from the named resource map.
    pub fn localized_in(&self, key: &str, path: &str) -> Result<String> {
        self.resolve(key, Scope::IndependentPath(path))
    }

    pub fn resolve(&self, key: &str, scope: Scope<'_>) -> Result<String> {
        log::trace!("Resolving {key:?} in {scope:?}");
        let loader = match scope {
            Scope::CurrentView => self.service.loader_for_current_view()?,
            Scope::Context(context) => self.service.loader_for_context(context)?,
            Scope::Independent => self.independent_loader()?,
            Scope::IndependentPath(path) => self.service.loader_for_independent_use_at(path)?,
        };
        let value = loader.get_string(key);
        if value.is_empty() {
            if self.config.warn_on_missing {
                log::warn!("No localized string for {key:?} in {scope:?}");
            } else {
                log::trace!("No localized string for {key:?} in {scope:?}");
            }
        }
        Ok(value)
    }

    /// The shared view-independent loader, created on first use.
    ///
    /// Creation happens at most once per resolver. A failed creation is not
    /// remembered, so the next call tries again.
    pub fn independent_loader(&self) -> Result<Arc<dyn ResourceLoader>> {
        if let Some(loader) = self.independent.read().as_ref() {
            return Ok(loader.clone());
        }
        let mut slot = self.independent.write();
        if let Some(loader) = slot.as_ref() {
            return Ok(loader.clone());
        }
        let loader = match self.config.independent_map.as_deref() {
            Some(map) => self.service.loader_for_independent_use_at(map)?,
            None => self.service.loader_for_independent_use()?,
        };
        log::debug!("Created view-independent resource loader {loader:?}");
        *slot = Some(loader.clone());
        Ok(loader)
    }
}
