use resloc_loader::{LoaderError, Result, UiContext};

use crate::{Resolver, resolver};

/// Resolves a string as a resource key through the installed resolver.
///
/// Every method fails with [`LoaderError::Unavailable`] until
/// [`install`](crate::install) has been called.
pub trait LocString {
    /// See [`Resolver::view_localized`].
    fn view_localized(&self, context: Option<&UiContext>) -> Result<String>;
    /// See [`Resolver::localized`].
    fn localized(&self, context: Option<&UiContext>) -> Result<String>;
    /// See [`Resolver::localized_in`].
    fn localized_in(&self, path: &str) -> Result<String>;
}

#[inline]
fn installed() -> Result<&'static Resolver> {
    resolver().ok_or(LoaderError::Unavailable)
}

impl LocString for str {
    fn view_localized(&self, context: Option<&UiContext>) -> Result<String> {
        installed()?.view_localized(self, context)
    }

    fn localized(&self, context: Option<&UiContext>) -> Result<String> {
        installed()?.localized(self, context)
    }

    fn localized_in(&self, path: &str) -> Result<String> {
        installed()?.localized_in(self, path)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use resloc_loader::{DEFAULT_RESOURCE_MAP, MemoryService, ThreadLocalView};

    use super::*;
    use crate::{InstallError, install};

    // The only test in this crate that touches the process-wide resolver.
    #[test]
    fn extension_methods() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(
            "Greeting".localized(None).unwrap_err(),
            LoaderError::Unavailable
        );

        let service = Arc::new(MemoryService::new());
        service.insert_map(DEFAULT_RESOURCE_MAP, [("Greeting", "Hello")]);
        service.insert_map("Dialog", [("Greeting", "Hi")]);
        service.insert_map("Errors", [("Greeting", "Oops")]);
        let dialog = UiContext::next();
        service.bind_context(dialog, "Dialog");

        install(service.clone()).unwrap();
        assert!(matches!(
            install(MemoryService::new()),
            Err(InstallError::AlreadyInstalled)
        ));

        assert_eq!("Greeting".localized(None).unwrap(), "Hello");
        assert_eq!("Greeting".localized(Some(&dialog)).unwrap(), "Hi");
        assert_eq!("Greeting".localized_in("Errors").unwrap(), "Oops");
        assert_eq!("Missing".localized(None).unwrap(), "");
        assert_eq!(
            "Greeting".view_localized(None).unwrap_err(),
            LoaderError::NoCurrentView
        );
        {
            let _view = ThreadLocalView::enter(dialog);
            assert_eq!("Greeting".view_localized(None).unwrap(), "Hi");
        }

        let key = String::from("Greeting");
        assert_eq!(key.localized(None).unwrap(), "Hello");
        assert_eq!(service.independent_loads(), 1);
    }
}
