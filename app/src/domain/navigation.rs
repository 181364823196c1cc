//! Named routes and navigation transitions.
//!
//! Screens request transitions through the `Navigator` port; the UI
//! collaborator decides how to render them. [`NavigationStack`] captures the
//! history semantics both sides agree on.

use std::fmt;

/// Screens reachable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in form, the start screen.
    Login,
    /// Account creation form.
    Register,
    /// Grocery list, reachable once signed in.
    Home,
}

impl Route {
    /// Path the UI collaborator registers the screen under.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Home => "/home",
        }
    }

    /// Resolve a registered path.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/home" => Some(Self::Home),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// How a navigation request treats existing history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep history so back-navigation returns to the current screen.
    Push,
    /// Discard history; back-navigation cannot return to earlier screens.
    Replace,
}

/// Back-stack of visited routes.
///
/// # Examples
/// ```
/// use grocery_app::domain::{NavigationStack, Route, Transition};
///
/// let mut stack = NavigationStack::new(Route::Login);
/// stack.apply(Route::Home, Transition::Replace);
/// assert_eq!(stack.current(), Route::Home);
/// assert!(!stack.back());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationStack {
    history: Vec<Route>,
    current: Route,
}

impl NavigationStack {
    /// Start with a single route and no history.
    pub fn new(initial: Route) -> Self {
        Self {
            history: Vec::new(),
            current: initial,
        }
    }

    /// Route currently on screen.
    pub fn current(&self) -> Route {
        self.current
    }

    /// Number of routes reachable with back-navigation.
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Apply a transition to `route`.
    pub fn apply(&mut self, route: Route, transition: Transition) {
        match transition {
            Transition::Push => self.history.push(self.current),
            Transition::Replace => self.history.clear(),
        }
        self.current = route;
    }

    /// Return to the previous route; `false` when there is none.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }
}
