use std::{cell::Cell, marker::PhantomData};

use crate::UiContext;

/// Source of the ambient "current view" for a lookup.
pub trait CurrentView: Send + Sync {
    fn current(&self) -> Option<UiContext>;
}

impl<F> CurrentView for F
where
    F: Fn() -> Option<UiContext> + Send + Sync,
{
    fn current(&self) -> Option<UiContext> {
        self()
    }
}

thread_local! {
    static ACTIVE_VIEW: Cell<Option<UiContext>> = const { Cell::new(None) };
}

/// Tracks the current view per thread. A thread has no view until it
/// enters one, so background threads never see the UI thread's view.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadLocalView;

impl ThreadLocalView {
    /// Makes `context` the current view of the calling thread until the
    /// returned guard is dropped.
    pub fn enter(context: UiContext) -> ViewGuard {
        let previous = ACTIVE_VIEW.with(|view| view.replace(Some(context)));
        log::trace!("Entered view {context} (previous: {previous:?})");
        ViewGuard {
            previous,
            _not_send: PhantomData,
        }
    }

    pub fn active() -> Option<UiContext> {
        ACTIVE_VIEW.with(Cell::get)
    }
}

impl CurrentView for ThreadLocalView {
    fn current(&self) -> Option<UiContext> {
        Self::active()
    }
}

/// Restores the previously active view on drop.
#[must_use = "the view is left as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ViewGuard {
    previous: Option<UiContext>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ViewGuard {
    fn drop(&mut self) {
        ACTIVE_VIEW.with(|view| view.set(self.previous));
    }
}

/// Reports the same view on every thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedView(pub Option<UiContext>);

impl CurrentView for FixedView {
    fn current(&self) -> Option<UiContext> {
        self.0
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_leave() {
        let outer = UiContext::next();
        let inner = UiContext::next();
        assert_eq!(ThreadLocalView::active(), None);
        {
            let _outer = ThreadLocalView::enter(outer);
            assert_eq!(ThreadLocalView.current(), Some(outer));
            {
                let _inner = ThreadLocalView::enter(inner);
                assert_eq!(ThreadLocalView.current(), Some(inner));
            }
            assert_eq!(ThreadLocalView.current(), Some(outer));
        }
        assert_eq!(ThreadLocalView::active(), None);
    }

    #[test]
    fn view_is_thread_affine() {
        let ctx = UiContext::next();
        let _guard = ThreadLocalView::enter(ctx);
        let other = std::thread::spawn(|| ThreadLocalView.current())
            .join()
            .unwrap();
        assert_eq!(other, None);
        assert_eq!(ThreadLocalView.current(), Some(ctx));
    }

    #[test]
    fn closures_and_fixed_views() {
        let ctx = UiContext::from_raw(42);
        let closure = move || Some(ctx);
        assert_eq!(closure.current(), Some(ctx));
        assert_eq!(FixedView(None).current(), None);
        assert_eq!(FixedView(Some(ctx)).current(), Some(ctx));
    }
}
