//! Plain-text rendering of screen state.

use std::io::{self, Write};

use crate::domain::{Notice, Route};
use crate::screens::{GroceryListView, LoginView, RegisterView};

use super::command::usage;

const MASK: &str = "********";

fn secret(value: &str, visible: bool) -> &str {
    if visible || value.is_empty() {
        value
    } else {
        MASK
    }
}

fn field_error(out: &mut impl Write, error: Option<&str>) -> io::Result<()> {
    match error {
        Some(message) => writeln!(out, "    ! {message}"),
        None => Ok(()),
    }
}

pub(super) fn login(out: &mut impl Write, view: &LoginView) -> io::Result<()> {
    writeln!(out, "== Login ==")?;
    writeln!(out, "  email:    {}", view.email)?;
    field_error(out, view.email_error)?;
    writeln!(
        out,
        "  password: {}",
        secret(&view.password, view.show_password)
    )?;
    field_error(out, view.password_error)?;
    if view.loading {
        writeln!(out, "  signing in...")?;
    }
    Ok(())
}

pub(super) fn register(out: &mut impl Write, view: &RegisterView) -> io::Result<()> {
    writeln!(out, "== Register ==")?;
    writeln!(out, "  email:    {}", view.email)?;
    if view.email_valid {
        writeln!(out, "    Email is Valid")?;
    }
    field_error(out, view.email_error)?;
    writeln!(
        out,
        "  password: {}",
        secret(&view.password, view.show_password)
    )?;
    field_error(out, view.password_error)?;
    writeln!(
        out,
        "  confirm:  {}",
        secret(&view.confirm, view.show_confirm)
    )?;
    field_error(out, view.confirm_error)?;
    if view.loading {
        writeln!(out, "  creating account...")?;
    }
    Ok(())
}

pub(super) fn grocery_list(out: &mut impl Write, view: &GroceryListView) -> io::Result<()> {
    writeln!(out, "== Grocery List ==")?;
    items(out, view)?;
    writeln!(out, "  name:     {}", view.name)?;
    writeln!(out, "  quantity: {}", view.quantity)?;
    writeln!(out, "  [{}]", view.submit_label())
}

pub(super) fn items(out: &mut impl Write, view: &GroceryListView) -> io::Result<()> {
    if view.items.is_empty() {
        return writeln!(out, "  (no items)");
    }
    for (position, item) in view.items.iter().enumerate() {
        let marker = if view.edit_id.as_ref() == Some(&item.id) {
            "*"
        } else {
            " "
        };
        writeln!(
            out,
            " {marker}{:>3}. {} - {}",
            position + 1,
            item.name,
            item.quantity
        )?;
    }
    Ok(())
}

pub(super) fn notice(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    writeln!(out, "{notice}")
}

pub(super) fn help(out: &mut impl Write, route: Route) -> io::Result<()> {
    writeln!(out, "Commands on {route}:")?;
    for line in usage(route) {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}
