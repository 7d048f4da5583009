//! Screen tracking for the CLI.
//!
//! Each invocation starts on the route of its command. Session events move
//! it: an expired token sends the user to the sign-in screen, at most once.

use std::sync::Mutex;
use taskz_client::SessionEvent;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    SignIn,
    SignUp,
    Dashboard,
    Settings,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::SignIn => "/signin",
            Route::SignUp => "/signup",
            Route::Dashboard => "/dashboard",
            Route::Settings => "/settings",
        }
    }
}

#[derive(Debug)]
pub struct Navigator {
    state: Mutex<NavState>,
}

#[derive(Debug)]
struct NavState {
    current: Route,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            state: Mutex::new(NavState {
                current: start,
                history: vec![start],
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NavState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current(&self) -> Route {
        self.lock().current
    }

    /// Routes visited so far, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.lock().history.clone()
    }

    pub fn navigate(&self, route: Route) {
        let mut state = self.lock();
        if state.current != route {
            debug!("Navigating {} -> {}", state.current.path(), route.path());
            state.current = route;
            state.history.push(route);
        }
    }

    /// Move to the sign-in screen. Returns `false` when already there.
    pub fn redirect_to_sign_in(&self) -> bool {
        let mut state = self.lock();
        if state.current == Route::SignIn {
            return false;
        }
        debug!("Redirecting {} -> {}", state.current.path(), Route::SignIn.path());
        state.current = Route::SignIn;
        state.history.push(Route::SignIn);
        true
    }

    /// React to a session change. Returns `true` when the user was sent to
    /// the sign-in screen because their session expired.
    pub fn handle(&self, event: &SessionEvent) -> bool {
        match event {
            SessionEvent::Expired => self.redirect_to_sign_in(),
            SessionEvent::SignedIn { .. } => {
                self.navigate(Route::Dashboard);
                false
            }
            SessionEvent::SignedOut => {
                self.navigate(Route::SignIn);
                false
            }
        }
    }
}
