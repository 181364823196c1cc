//! Line-oriented event loop driving the three screens.
//!
//! One command is handled at a time, so the screens' `&mut self` handlers
//! never overlap. The loop also wakes when navigation happens off the input
//! path (the delayed redirect after sign-up) and, while the list is on
//! screen, on store notifications.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::domain::{GroceryItem, Route};
use crate::screens::{
    Backend, GroceryListScreen, GroceryListView, LoginScreen, Outcome, RegisterScreen, Shell,
};

use super::command::{Command, parse};
use super::render;
use super::surfaces::{ConsoleNavigator, ConsoleNotifier};

/// Whether the loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Console front-end owning one controller per route.
pub struct ConsoleApp {
    navigator: Arc<ConsoleNavigator>,
    notifier: Arc<ConsoleNotifier>,
    login: LoginScreen,
    register: RegisterScreen,
    groceries: GroceryListScreen,
    shown: Route,
}

impl ConsoleApp {
    /// Wire the screens to `backend`, starting on `/login`.
    pub fn new(backend: &Backend, redirect_delay: Duration) -> Self {
        let navigator = Arc::new(ConsoleNavigator::new(Route::Login));
        let notifier = Arc::new(ConsoleNotifier::new());
        let shell = Shell::new(navigator.clone(), notifier.clone());
        Self {
            login: LoginScreen::new(backend, &shell),
            register: RegisterScreen::new(backend, &shell).with_redirect_delay(redirect_delay),
            groceries: GroceryListScreen::new(backend, &shell),
            navigator,
            notifier,
            shown: Route::Login,
        }
    }

    /// Route currently on screen.
    pub fn route(&self) -> Route {
        self.shown
    }

    /// Read commands from `input` until it ends or the user quits.
    ///
    /// Starts by flushing pending notices and following any navigation that
    /// happened since the previous run.
    ///
    /// # Errors
    /// Returns an error when reading input or writing output fails.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut routes = self.navigator.subscribe();
        routes.mark_unchanged();
        let mut list_updates = self.groceries.view();
        if self.shown == Route::Home {
            self.groceries.activate();
        }
        self.settle(out)?;
        let mut last_items = list_updates.borrow_and_update().items.clone();

        loop {
            let on_list = self.shown == Route::Home;
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle(&line, out).await? == Flow::Quit {
                        break;
                    }
                    self.settle(out)?;
                    routes.mark_unchanged();
                    last_items = list_updates.borrow_and_update().items.clone();
                }
                changed = routes.changed() => {
                    if changed.is_err() {
                        continue;
                    }
                    routes.mark_unchanged();
                    if self.navigator.current() != self.shown {
                        self.settle(out)?;
                        last_items = list_updates.borrow_and_update().items.clone();
                    }
                }
                changed = list_updates.changed(), if on_list => {
                    if changed.is_err() {
                        continue;
                    }
                    let view = list_updates.borrow_and_update().clone();
                    if view.items != last_items {
                        last_items.clone_from(&view.items);
                        render::items(out, &view)?;
                    }
                }
            }
            out.flush()?;
        }

        self.groceries.deactivate();
        out.flush()
    }

    async fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = match parse(line, self.shown) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                return Ok(Flow::Continue);
            }
        };
        debug!(route = %self.shown, command = command.name(), "console command");

        let outcome = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                render::help(out, self.shown)?;
                return Ok(Flow::Continue);
            }
            Command::Back => {
                if !self.navigator.back() {
                    writeln!(out, "nothing to go back to")?;
                }
                return Ok(Flow::Continue);
            }
            Command::List => {
                render::grocery_list(out, &self.groceries.current())?;
                return Ok(Flow::Continue);
            }
            Command::Edit(number) | Command::Delete(number)
                if item_at(&self.groceries.current(), number).is_none() =>
            {
                writeln!(out, "no item {number}")?;
                return Ok(Flow::Continue);
            }
            other => self.dispatch(other).await,
        };

        // Field errors and notices are rendered by `settle`.
        if let Some(outcome) = outcome {
            debug!(completed = outcome.is_completed(), "command finished");
        }
        Ok(Flow::Continue)
    }

    async fn dispatch(&mut self, command: Command) -> Option<Outcome> {
        let shown = self.shown;
        match (shown, command) {
            (Route::Login, Command::Email(value)) => self.login.set_email(value),
            (Route::Login, Command::Password(value)) => self.login.set_password(value),
            (Route::Login, Command::TogglePassword) => self.login.toggle_password_visibility(),
            (Route::Login, Command::Submit) => return Some(self.login.submit().await),
            (Route::Login, Command::OpenRegister) => self.login.open_register(),
            (Route::Register, Command::Email(value)) => self.register.set_email(value),
            (Route::Register, Command::Password(value)) => self.register.set_password(value),
            (Route::Register, Command::Confirm(value)) => self.register.set_confirm(value),
            (Route::Register, Command::TogglePassword) => {
                self.register.toggle_password_visibility();
            }
            (Route::Register, Command::ToggleConfirm) => self.register.toggle_confirm_visibility(),
            (Route::Register, Command::Submit) => return Some(self.register.submit().await),
            (Route::Register, Command::OpenLogin) => self.register.open_login(),
            (Route::Home, Command::Name(value)) => self.groceries.set_name(value),
            (Route::Home, Command::Quantity(value)) => self.groceries.set_quantity(value),
            (Route::Home, Command::Save) => return Some(self.groceries.submit_item().await),
            (Route::Home, Command::Cancel) => self.groceries.cancel_edit(),
            (Route::Home, Command::Logout) => return Some(self.groceries.logout().await),
            (Route::Home, Command::Edit(number)) => {
                let view = self.groceries.current();
                if let Some(item) = item_at(&view, number) {
                    self.groceries.edit_item(item);
                }
            }
            (Route::Home, Command::Delete(number)) => {
                let view = self.groceries.current();
                if let Some(item) = item_at(&view, number) {
                    let id = item.id.clone();
                    return Some(self.groceries.delete_item(&id).await);
                }
            }
            (route, command) => {
                debug!(%route, command = command.name(), "command ignored on this route");
            }
        }
        None
    }

    /// Flush notices, follow any navigation and redraw.
    fn settle<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for notice in self.notifier.drain() {
            render::notice(out, &notice)?;
        }
        let route = self.navigator.current();
        if route != self.shown {
            if self.shown == Route::Home {
                self.groceries.deactivate();
            }
            if route == Route::Home {
                self.groceries.activate();
            }
            self.shown = route;
        }
        self.render_screen(out)
    }

    fn render_screen<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.shown {
            Route::Login => render::login(out, &self.login.current()),
            Route::Register => render::register(out, &self.register.current()),
            Route::Home => render::grocery_list(out, &self.groceries.current()),
        }?;
        write!(out, "> ")
    }
}

/// Item at 1-based position `number`.
fn item_at(view: &GroceryListView, number: usize) -> Option<&GroceryItem> {
    number.checked_sub(1).and_then(|index| view.items.get(index))
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
