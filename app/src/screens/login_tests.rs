//! Tests for the login screen controller.

use rstest::rstest;

use super::*;
use crate::domain::ports::SessionServiceError;
use crate::domain::validation::{EMAIL_SUFFIX_MESSAGE, PASSWORD_REQUIRED_MESSAGE};
use crate::domain::{FailureKind, Identity, SessionToken};
use crate::screens::test_support::{harness, untouched};

fn accepting_session() -> crate::domain::ports::MockSessionService {
    let mut session = crate::domain::ports::MockSessionService::new();
    session
        .expect_sign_in()
        .times(1)
        .withf(|credentials| {
            credentials.email() == "user@gmail.com" && credentials.password() == "Secret1!"
        })
        .returning(|credentials| {
            Ok(Identity::new(
                credentials.email(),
                SessionToken::new("token-123"),
            ))
        });
    session
}

#[tokio::test]
async fn successful_sign_in_greets_and_replaces_history_with_home() {
    let (_, items) = untouched();
    let harness = harness(accepting_session(), items);
    let mut screen = LoginScreen::new(&harness.backend, &harness.shell);

    screen.set_email("user@gmail.com");
    screen.set_password("Secret1!");
    let outcome = screen.submit().await;

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(
        harness.notifier.messages(),
        vec!["[Success] Welcome back, user@gmail.com!".to_owned()]
    );
    assert_eq!(
        harness.navigator.routes(),
        vec![(Route::Home, Transition::Replace)]
    );
    assert!(!screen.current().loading);
}

#[rstest]
#[case("user@yahoo.com", "anything", vec![EMAIL_SUFFIX_MESSAGE])]
#[case("user@gmail.com", "", vec![PASSWORD_REQUIRED_MESSAGE])]
#[case("", "", vec![EMAIL_SUFFIX_MESSAGE, PASSWORD_REQUIRED_MESSAGE])]
#[tokio::test]
async fn invalid_form_never_reaches_the_session_service(
    #[case] email: &str,
    #[case] password: &str,
    #[case] expected: Vec<&str>,
) {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = LoginScreen::new(&harness.backend, &harness.shell);

    screen.set_email(email);
    screen.set_password(password);
    let outcome = screen.submit().await;

    let Outcome::Blocked(failures) = outcome else {
        panic!("expected validation to block submission");
    };
    let messages: Vec<_> = failures.iter().map(Failure::message).collect();
    assert_eq!(messages, expected);
    assert!(
        failures
            .iter()
            .all(|failure| failure.kind() == FailureKind::Validation)
    );
    assert!(harness.navigator.routes().is_empty());
    assert!(harness.notifier.messages().is_empty());
}

#[tokio::test]
async fn field_errors_are_published_and_cleared() {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = LoginScreen::new(&harness.backend, &harness.shell);
    let view = screen.view();

    screen.set_email("user@yahoo.com");
    screen.submit().await;
    assert_eq!(view.borrow().email_error, Some(EMAIL_SUFFIX_MESSAGE));
    assert_eq!(view.borrow().password_error, Some(PASSWORD_REQUIRED_MESSAGE));

    screen.set_email("user@gmail.com");
    screen.submit().await;
    assert_eq!(view.borrow().email_error, None);
}

#[rstest]
#[case(SessionServiceError::user_not_found(), "No account found for this email.", FailureKind::Auth)]
#[case(SessionServiceError::wrong_password(), "Incorrect password.", FailureKind::Auth)]
#[case(SessionServiceError::invalid_email(), "Invalid email format.", FailureKind::Auth)]
#[case(SessionServiceError::unavailable("connection reset"), "Account does not exist.", FailureKind::Unknown)]
#[case(SessionServiceError::unknown("TOO_MANY_ATTEMPTS_TRY_LATER"), "Account does not exist.", FailureKind::Unknown)]
#[tokio::test]
async fn rejected_sign_in_shows_the_mapped_message_and_stays(
    #[case] error: SessionServiceError,
    #[case] message: &str,
    #[case] kind: FailureKind,
) {
    let mut session = crate::domain::ports::MockSessionService::new();
    session
        .expect_sign_in()
        .times(1)
        .return_once(move |_| Err(error));
    let (_, items) = untouched();
    let harness = harness(session, items);
    let mut screen = LoginScreen::new(&harness.backend, &harness.shell);

    screen.set_email("user@gmail.com");
    screen.set_password("Secret1!");
    let outcome = screen.submit().await;

    let Outcome::Failed(failure) = outcome else {
        panic!("expected a failed outcome");
    };
    assert_eq!(failure.message(), message);
    assert_eq!(failure.kind(), kind);
    assert_eq!(harness.notifier.messages(), vec![format!("[Error] {message}")]);
    assert!(harness.navigator.routes().is_empty());
    assert!(!screen.current().loading);
}

#[test]
fn toggling_visibility_touches_nothing_else() {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = LoginScreen::new(&harness.backend, &harness.shell);
    screen.set_email("user@gmail.com");

    screen.toggle_password_visibility();
    let view = screen.current();
    assert!(view.show_password);
    assert_eq!(view.email, "user@gmail.com");

    screen.toggle_password_visibility();
    assert!(!screen.current().show_password);
}

#[test]
fn open_register_pushes_the_register_route() {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = LoginScreen::new(&harness.backend, &harness.shell);

    screen.open_register();
    assert_eq!(
        harness.navigator.routes(),
        vec![(Route::Register, Transition::Push)]
    );
}

#[test]
fn debug_output_redacts_the_password() {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = LoginScreen::new(&harness.backend, &harness.shell);
    screen.set_password("Secret1!");

    let rendered = format!("{:?}", screen.current());
    assert!(!rendered.contains("Secret1!"));
}
