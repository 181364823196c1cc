//! Tests for the registration screen controller.

use std::time::Duration;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockSessionService, SessionServiceError};
use crate::domain::validation::{
    CONFIRMATION_MISMATCH_MESSAGE, EMAIL_SUFFIX_MESSAGE, WEAK_PASSWORD_MESSAGE,
};
use crate::domain::{FailureKind, Identity, SessionToken};
use crate::screens::test_support::{harness, untouched};

fn fill(screen: &mut RegisterScreen, email: &str, password: &str, confirm: &str) {
    screen.set_email(email);
    screen.set_password(password);
    screen.set_confirm(confirm);
}

#[rstest]
#[case("", false, None)]
#[case("ada@", false, Some(EMAIL_SUFFIX_MESSAGE))]
#[case("ada@gmail.com", true, None)]
fn email_is_validated_on_every_edit(
    #[case] email: &str,
    #[case] valid: bool,
    #[case] error: Option<&'static str>,
) {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = RegisterScreen::new(&harness.backend, &harness.shell);

    screen.set_email(email);
    let view = screen.current();
    assert_eq!(view.email_valid, valid);
    assert_eq!(view.email_error, error);
}

#[tokio::test]
async fn weak_password_never_reaches_the_session_service() {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = RegisterScreen::new(&harness.backend, &harness.shell);
    fill(&mut screen, "user@gmail.com", "abc12345", "abc12345");

    let outcome = screen.submit().await;

    let Outcome::Blocked(failures) = outcome else {
        panic!("expected validation to block submission");
    };
    assert_eq!(failures, vec![Failure::validation(WEAK_PASSWORD_MESSAGE)]);
    assert_eq!(screen.current().password_error, Some(WEAK_PASSWORD_MESSAGE));
    assert!(harness.notifier.messages().is_empty());
}

#[tokio::test]
async fn every_failing_field_is_reported() {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = RegisterScreen::new(&harness.backend, &harness.shell);
    fill(&mut screen, "", "short", "other");

    let outcome = screen.submit().await;

    let Outcome::Blocked(failures) = outcome else {
        panic!("expected validation to block submission");
    };
    let messages: Vec<_> = failures.iter().map(Failure::message).collect();
    assert_eq!(
        messages,
        vec![
            EMAIL_SUFFIX_MESSAGE,
            WEAK_PASSWORD_MESSAGE,
            CONFIRMATION_MISMATCH_MESSAGE
        ]
    );
    let view = screen.current();
    assert_eq!(view.email_error, Some(EMAIL_SUFFIX_MESSAGE));
    assert_eq!(view.confirm_error, Some(CONFIRMATION_MISMATCH_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn successful_sign_up_greets_then_pushes_login_after_the_delay() {
    let mut session = MockSessionService::new();
    session.expect_sign_up().times(1).returning(|credentials| {
        Ok(Identity::new(credentials.email(), SessionToken::new("token")))
    });
    let (_, items) = untouched();
    let harness = harness(session, items);
    let mut screen = RegisterScreen::new(&harness.backend, &harness.shell)
        .with_redirect_delay(Duration::from_millis(500));
    fill(&mut screen, "new@gmail.com", "Str0ng!pw", "Str0ng!pw");

    let started = tokio::time::Instant::now();
    let outcome = screen.submit().await;

    assert_eq!(outcome, Outcome::Completed);
    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(
        harness.notifier.messages(),
        vec!["[Success] Welcome new@gmail.com!".to_owned()]
    );
    assert!(harness.navigator.routes().is_empty());
    assert!(screen.redirect_pending());
    assert!(!screen.current().loading);

    tokio::time::sleep(Duration::from_millis(499)).await;
    assert!(harness.navigator.routes().is_empty());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(
        harness.navigator.routes(),
        vec![(Route::Login, Transition::Push)]
    );
    assert!(!screen.redirect_pending());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_screen_cancels_a_pending_redirect() {
    let mut session = MockSessionService::new();
    session.expect_sign_up().times(1).returning(|credentials| {
        Ok(Identity::new(credentials.email(), SessionToken::new("token")))
    });
    let (_, items) = untouched();
    let harness = harness(session, items);
    let mut screen = RegisterScreen::new(&harness.backend, &harness.shell);
    fill(&mut screen, "new@gmail.com", "Str0ng!pw", "Str0ng!pw");

    assert!(screen.submit().await.is_completed());
    drop(screen);
    tokio::time::sleep(DEFAULT_REDIRECT_DELAY * 2).await;

    assert!(harness.navigator.routes().is_empty());
}

#[rstest]
#[case(SessionServiceError::invalid_email(), "Invalid email format.", FailureKind::Auth)]
#[case(SessionServiceError::weak_password(), "Password is too weak.", FailureKind::Auth)]
#[case(SessionServiceError::email_already_in_use(), "This account already exists.", FailureKind::Auth)]
#[case(SessionServiceError::unknown("OPERATION_NOT_ALLOWED"), "An error occurred.", FailureKind::Unknown)]
#[tokio::test]
async fn rejected_sign_up_shows_the_mapped_message(
    #[case] error: SessionServiceError,
    #[case] message: &str,
    #[case] kind: FailureKind,
) {
    let mut session = MockSessionService::new();
    session
        .expect_sign_up()
        .times(1)
        .return_once(move |_| Err(error));
    let (_, items) = untouched();
    let harness = harness(session, items);
    let mut screen = RegisterScreen::new(&harness.backend, &harness.shell);
    fill(&mut screen, "new@gmail.com", "Str0ng!pw", "Str0ng!pw");

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
fn visibility_toggles_are_independent() {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = RegisterScreen::new(&harness.backend, &harness.shell);

    screen.toggle_confirm_visibility();
    let view = screen.current();
    assert!(view.show_confirm);
    assert!(!view.show_password);
}

#[test]
fn open_login_pushes_the_login_route() {
    let (session, items) = untouched();
    let harness = harness(session, items);
    let mut screen = RegisterScreen::new(&harness.backend, &harness.shell);

    screen.open_login();
    assert_eq!(
        harness.navigator.routes(),
        vec![(Route::Login, Transition::Push)]
    );
}
