//! Console implementations of the navigation and notification ports.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::warn;

use crate::domain::ports::{Navigator, Notifier};
use crate::domain::{NavigationStack, Notice, Route, Transition};

/// Router backed by a [`NavigationStack`].
///
/// Every change is also published so the event loop can follow navigation
/// requested from background tasks, such as the delayed post-sign-up
/// redirect.
pub struct ConsoleNavigator {
    stack: Mutex<NavigationStack>,
    changes: watch::Sender<Route>,
}

impl ConsoleNavigator {
    /// Start on `initial` with no history.
    pub fn new(initial: Route) -> Self {
        let (changes, _) = watch::channel(initial);
        Self {
            stack: Mutex::new(NavigationStack::new(initial)),
            changes,
        }
    }

    /// Watch the route on screen.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.changes.subscribe()
    }

    /// Route on screen.
    pub fn current(&self) -> Route {
        match self.stack.lock() {
            Ok(stack) => stack.current(),
            Err(poisoned) => poisoned.into_inner().current(),
        }
    }

    /// Pop one level of history; `false` when there is none.
    pub fn back(&self) -> bool {
        let mut stack = match self.stack.lock() {
            Ok(stack) => stack,
            Err(poisoned) => poisoned.into_inner(),
        };
        let moved = stack.back();
        if moved {
            self.changes.send_replace(stack.current());
        }
        moved
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route, transition: Transition) {
        let mut stack = match self.stack.lock() {
            Ok(stack) => stack,
            Err(poisoned) => {
                warn!("navigation stack lock poisoned; recovering");
                poisoned.into_inner()
            }
        };
        stack.apply(route, transition);
        self.changes.send_replace(stack.current());
    }
}

/// Alert queue drained by the event loop after every command.
#[derive(Default)]
pub struct ConsoleNotifier {
    pending: Mutex<VecDeque<Notice>>,
}

impl ConsoleNotifier {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push_back(notice),
            Err(poisoned) => poisoned.into_inner().push_back(notice),
        }
    }
}
