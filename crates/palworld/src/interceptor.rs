//! Hooks run on every failed response passing through the shared client.

use crate::api::ApiError;

/// Route the browser is sent to when the server reports the session is not authorized.
pub const LOGIN_ROUTE: &str = "/login";

/// Observes errors before they are returned to the caller.
/// Interceptors cannot change or swallow the error.
pub trait ResponseInterceptor {
    fn on_error(&self, error: &ApiError);
}

/// Something that can send the user to another page.
pub trait Navigator {
    fn redirect(&self, path: &str);
}

/// Navigates by assigning `window.location.href`, i.e. a full page load.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            tracing::warn!(path, "No window available, cannot redirect");
            return;
        };
        if let Err(err) = window.location().set_href(path) {
            tracing::warn!(path, error = ?err, "Failed to redirect");
        }
    }
}

/// Sends the user to the login page whenever a response comes back with 401.
#[derive(Debug, Clone)]
pub struct RedirectOnUnauthorized<N> {
    navigator: N,
    route: String,
}

impl<N: Navigator> RedirectOnUnauthorized<N> {
    pub fn new(navigator: N) -> Self {
        Self::with_route(navigator, LOGIN_ROUTE)
    }

    pub fn with_route(navigator: N, route: impl Into<String>) -> Self {
        Self {
            navigator,
            route: route.into(),
        }
    }
}

impl<N: Navigator> ResponseInterceptor for RedirectOnUnauthorized<N> {
    fn on_error(&self, error: &ApiError) {
        if error.is_unauthorized() {
            tracing::info!(route = %self.route, "Unauthorized, redirecting");
            self.navigator.redirect(&self.route);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Navigator;

    /// Remembers every redirect instead of performing it.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingNavigator {
        visits: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingNavigator {
        pub(crate) fn visits(&self) -> Vec<String> {
            self.visits.borrow().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn redirect(&self, path: &str) {
            self.visits.borrow_mut().push(path.to_string());
        }
    }
}
