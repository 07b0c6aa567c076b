//! Localized string lookup on top of a host resource loading service.
//!
//! A [`Resolver`] turns resource keys into display strings through a
//! [`LoaderService`], scoped to the current view, an explicit [`UiContext`],
//! the shared view-independent loader, or a named resource map. Missing keys
//! resolve to an empty string.
//!
//! ```
//! use resloc::prelude::*;
//!
//! let service = MemoryService::new();
//! service.set_string(DEFAULT_RESOURCE_MAP, "Greeting", "Hello");
//! service.set_string("Errors", "Greeting", "Oops");
//! resloc::install(service).unwrap();
//!
//! assert_eq!("Greeting".localized(None).unwrap(), "Hello");
//! assert_eq!("Greeting".localized_in("Errors").unwrap(), "Oops");
//! assert_eq!("Nope".localized(None).unwrap(), "");
//! ```

pub use resloc_loader as loader;
pub use resloc_localization::{
    install, install_with_config, resolver, ConfigError, InstallError, LocString, Resolver,
    ResolverConfig, Scope,
};

pub mod prelude {
    pub use resloc_loader::{
        CurrentView, FixedView, LoaderError, LoaderService, MemoryService, ResourceLoader,
        ThreadLocalView, UiContext, DEFAULT_RESOURCE_MAP,
    };
    pub use resloc_localization::{LocString, Resolver, ResolverConfig, Scope};
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::prelude::*;

    #[test]
    fn install_from_json_config() {
        let _ = env_logger::builder().is_test(true).try_init();
        let service = Arc::new(MemoryService::new());
        service.insert_map("Shared", [("AppName", "Resloc")]);
        let config = ResolverConfig::from_json(r#"{ "independent_map": "Shared" }"#).unwrap();
        let resolver = crate::install_with_config(service.clone(), config).unwrap();
        assert!(std::ptr::eq(resolver, crate::resolver().unwrap()));
        assert_eq!("AppName".localized(None).unwrap(), "Resloc");
        assert_eq!(
            resolver.resolve("AppName", Scope::IndependentPath(DEFAULT_RESOURCE_MAP)).unwrap(),
            ""
        );
        assert_eq!(service.independent_loads(), 0);
    }
}
