//! Line commands accepted by the console.
//!
//! Each route accepts its own verbs; `back`, `help` and `quit` work
//! everywhere. Item numbers are 1-based positions in the last rendered list.

use thiserror::Error;

use crate::domain::Route;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Back,
    Help,
    Quit,
    Email(String),
    Password(String),
    Confirm(String),
    TogglePassword,
    ToggleConfirm,
    Submit,
    OpenRegister,
    OpenLogin,
    Name(String),
    Quantity(String),
    Save,
    Edit(usize),
    Delete(usize),
    Cancel,
    Logout,
    List,
}

impl Command {
    /// Verb for logs. Field values are never included.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Email(_) => "email",
            Self::Password(_) => "password",
            Self::Confirm(_) => "confirm",
            Self::TogglePassword => "show",
            Self::ToggleConfirm => "show-confirm",
            Self::Submit => "submit",
            Self::OpenRegister => "register",
            Self::OpenLogin => "login",
            Self::Name(_) => "name",
            Self::Quantity(_) => "quantity",
            Self::Save => "save",
            Self::Edit(_) => "edit",
            Self::Delete(_) => "delete",
            Self::Cancel => "cancel",
            Self::Logout => "logout",
            Self::List => "list",
        }
    }
}

/// Lines that do not form a command for the current route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("type a command, or `help`")]
    Empty,
    #[error("`{word}` is not available on {route}; type `help`")]
    Unknown { word: String, route: Route },
    #[error("`{word}` needs an item number")]
    MissingNumber { word: &'static str },
    #[error("`{value}` is not an item number")]
    BadNumber { value: String },
}

/// Parse `line` in the context of `route`.
///
/// Field values keep everything after the verb and one separating space, so
/// surrounding whitespace in a value reaches the screen untouched.
pub fn parse(line: &str, route: Route) -> Result<Command, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };
    if word.is_empty() {
        return Err(CommandError::Empty);
    }

    match (word, route) {
        ("back", _) => Ok(Command::Back),
        ("help", _) => Ok(Command::Help),
        ("quit" | "exit", _) => Ok(Command::Quit),
        ("email", Route::Login | Route::Register) => Ok(Command::Email(rest.to_owned())),
        ("password", Route::Login | Route::Register) => Ok(Command::Password(rest.to_owned())),
        ("confirm", Route::Register) => Ok(Command::Confirm(rest.to_owned())),
        ("show", Route::Login | Route::Register) => Ok(Command::TogglePassword),
        ("show-confirm", Route::Register) => Ok(Command::ToggleConfirm),
        ("submit", Route::Login | Route::Register) => Ok(Command::Submit),
        ("register", Route::Login) => Ok(Command::OpenRegister),
        ("login", Route::Register) => Ok(Command::OpenLogin),
        ("name", Route::Home) => Ok(Command::Name(rest.to_owned())),
        ("quantity" | "qty", Route::Home) => Ok(Command::Quantity(rest.to_owned())),
        ("save", Route::Home) => Ok(Command::Save),
        ("edit", Route::Home) => item_number(rest, "edit").map(Command::Edit),
        ("delete", Route::Home) => item_number(rest, "delete").map(Command::Delete),
        ("cancel", Route::Home) => Ok(Command::Cancel),
        ("logout", Route::Home) => Ok(Command::Logout),
        ("list", Route::Home) => Ok(Command::List),
        _ => Err(CommandError::Unknown {
            word: word.to_owned(),
            route,
        }),
    }
}

fn item_number(rest: &str, word: &'static str) -> Result<usize, CommandError> {
    let value = rest.trim();
    if value.is_empty() {
        return Err(CommandError::MissingNumber { word });
    }
    match value.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(CommandError::BadNumber {
            value: value.to_owned(),
        }),
    }
}

/// Verbs accepted on `route`, for `help`.
pub fn usage(route: Route) -> &'static [&'static str] {
    match route {
        Route::Login => &[
            "email <address>",
            "password <text>",
            "show",
            "submit",
            "register",
            "back | help | quit",
        ],
        Route::Register => &[
            "email <address>",
            "password <text>",
            "confirm <text>",
            "show | show-confirm",
            "submit",
            "login",
            "back | help | quit",
        ],
        Route::Home => &[
            "name <text>",
            "quantity <number>",
            "save",
            "edit <n> | delete <n> | cancel",
            "list",
            "logout",
            "back | help | quit",
        ],
    }
}
