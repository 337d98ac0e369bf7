use solace_adapters::config::EngineSettings;
use solace_adapters::email::MockMailClient;
use solace_adapters::persistence::{
    DashMapBackupCodeStore, DashMapOtpStore, DashMapSessionStore, DashMapTokenStore,
    DashMapTrustedDeviceStore, HashMapUserStore,
};
use solace_application::DeviceMeta;
use solace_auth_engine::{AuthEngine, HandshakeError};
use solace_core::UserId;

type Engine = AuthEngine<
    HashMapUserStore,
    DashMapTokenStore,
    DashMapOtpStore,
    DashMapBackupCodeStore,
    DashMapTrustedDeviceStore,
    DashMapSessionStore,
    MockMailClient,
>;

const EMAIL: &str = "member@example.com";
const PASSWORD: &str = "correct horse battery";

fn engine() -> (Engine, MockMailClient) {
    let mail = MockMailClient::new();
    let engine = AuthEngine::new(
        HashMapUserStore::new(),
        DashMapTokenStore::new(),
        DashMapOtpStore::new(),
        DashMapBackupCodeStore::new(),
        DashMapTrustedDeviceStore::new(),
        DashMapSessionStore::new(),
        mail.clone(),
        EngineSettings::default(),
    );
    (engine, mail)
}

fn last_mail_content(mail: &MockMailClient) -> String {
    mail.sent().last().expect("expected an outbound email").content.clone()
}

/// Registers and verifies the standard test account, returning its user id.
async fn registered_verified_user(engine: &Engine, mail: &MockMailClient) -> UserId {
    let outcome = engine.register(EMAIL, PASSWORD).await;
    assert!(outcome.success, "{}", outcome.message);

    let verification_token = last_mail_content(mail);
    let outcome = engine.verify_email_token(&verification_token).await;
    assert!(outcome.success, "{}", outcome.message);

    let login = engine.login(EMAIL, PASSWORD, None).await;
    assert!(login.success);
    login.user_id.expect("authenticated login carries the user id")
}

// Scenario A: register, then log in before verifying the email.
#[tokio::test]
async fn unverified_login_yields_no_session_regardless_of_password() {
    let (engine, _mail) = engine();
    engine.register(EMAIL, PASSWORD).await;

    let login = engine.login(EMAIL, PASSWORD, None).await;
    assert!(!login.success);
    assert_eq!(login.message, "Please verify your email before logging in");
    assert!(login.session_token.is_none());
    assert!(login.temp_token.is_none());

    // Wrong password on an unverified account reveals nothing more.
    let login = engine.login(EMAIL, "wrong password!", None).await;
    assert!(!login.success);
    assert!(login.session_token.is_none());
}

// Scenario B: 2FA step-up with a single-use code.
#[tokio::test]
async fn otp_step_up_succeeds_once_and_rejects_replay() {
    let (engine, mail) = engine();
    let user_id = registered_verified_user(&engine, &mail).await;
    engine.enable_two_factor(user_id).await;

    let login = engine.login(EMAIL, PASSWORD, None).await;
    assert!(login.success);
    assert!(login.requires_two_factor);
    assert!(login.session_token.is_none());
    let temp_token = login.temp_token.expect("temp token issued");
    let code = last_mail_content(&mail);

    let step_up = engine.verify_otp(user_id, &code, &temp_token, None).await;
    assert!(step_up.success, "{}", step_up.message);
    let session_token = step_up.session_token.expect("session issued");
    assert!(engine.verify_session(&session_token).await.valid);

    // The code was consumed with the challenge; a fresh attempt with the
    // old code cannot pass.
    let relogin = engine.login(EMAIL, PASSWORD, None).await;
    let new_temp = relogin.temp_token.unwrap();
    let replay = engine.verify_otp(user_id, &code, &new_temp, None).await;
    assert!(!replay.success);
    assert_eq!(replay.message, "Invalid OTP code");
}

// Scenario B continued: a wrong code leaves the attempt open.
#[tokio::test]
async fn wrong_otp_counts_as_failed_attempt_without_advancing() {
    let (engine, mail) = engine();
    let user_id = registered_verified_user(&engine, &mail).await;
    engine.enable_two_factor(user_id).await;

    let login = engine.login(EMAIL, PASSWORD, None).await;
    let temp_token = login.temp_token.unwrap();
    let code = last_mail_content(&mail);

    let wrong = if code == "000000" { "000001" } else { "000000" };
    let failed = engine.verify_otp(user_id, wrong, &temp_token, None).await;
    assert!(!failed.success);
    assert!(failed.session_token.is_none());

    // Same temp token, correct code: still accepted.
    let step_up = engine.verify_otp(user_id, &code, &temp_token, None).await;
    assert!(step_up.success);
}

// Scenario C: trust the device during step-up, then bypass the OTP.
#[tokio::test]
async fn trusted_device_skips_the_otp_step_on_later_logins() {
    let (engine, mail) = engine();
    let user_id = registered_verified_user(&engine, &mail).await;
    engine.enable_two_factor(user_id).await;

    let login = engine.login(EMAIL, PASSWORD, None).await;
    let temp_token = login.temp_token.unwrap();
    let code = last_mail_content(&mail);

    let step_up = engine
        .verify_otp(
            user_id,
            &code,
            &temp_token,
            Some(DeviceMeta {
                name: "laptop".into(),
                device_type: Some("desktop".into()),
                ip_address: Some("203.0.113.7".into()),
            }),
        )
        .await;
    assert!(step_up.success);
    let device_token = step_up.device_token.expect("device trusted");

    let mails_before = mail.sent().len();
    let login = engine.login(EMAIL, PASSWORD, Some(&device_token)).await;
    assert!(login.success);
    assert!(!login.requires_two_factor);
    assert!(login.session_token.is_some());
    // No OTP email went out for the bypassed login.
    assert_eq!(mail.sent().len(), mails_before);

    // Removing the device restores the step-up requirement.
    let removed = engine.remove_trusted_device(user_id, &device_token).await;
    assert!(removed.success);
    let login = engine.login(EMAIL, PASSWORD, Some(&device_token)).await;
    assert!(login.requires_two_factor);
}

// Scenario D: forgot/reset round trip, token single-use.
#[tokio::test]
async fn reset_token_is_redeemable_exactly_once() {
    let (engine, mail) = engine();
    registered_verified_user(&engine, &mail).await;

    let outcome = engine.forgot_password(EMAIL).await;
    assert!(outcome.success);
    let reset_token = last_mail_content(&mail);

    let outcome = engine.reset_password(&reset_token, "a whole new password").await;
    assert!(outcome.success, "{}", outcome.message);

    let login = engine.login(EMAIL, "a whole new password", None).await;
    assert!(login.success);

    let replay = engine.reset_password(&reset_token, "yet another password").await;
    assert!(!replay.success);
    assert_eq!(replay.message, "Invalid or already used reset token");
}

#[tokio::test]
async fn forgot_password_does_not_reveal_account_existence() {
    let (engine, mail) = engine();
    registered_verified_user(&engine, &mail).await;
    let mails_before = mail.sent().len();

    let known = engine.forgot_password(EMAIL).await;
    let unknown = engine.forgot_password("nobody@example.com").await;

    assert!(known.success && unknown.success);
    assert_eq!(known.message, unknown.message);
    // Only the real account got an email.
    assert_eq!(mail.sent().len(), mails_before + 1);
}

// Scenario E: wrong current password changes nothing.
#[tokio::test]
async fn change_password_with_wrong_current_leaves_state_intact() {
    let (engine, mail) = engine();
    let user_id = registered_verified_user(&engine, &mail).await;
    let login = engine.login(EMAIL, PASSWORD, None).await;
    let session_token = login.session_token.unwrap();

    let outcome = engine
        .change_password(user_id, "not the password", "brand new password")
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Current password is incorrect");

    // Old password still works and the session survived.
    assert!(engine.login(EMAIL, PASSWORD, None).await.success);
    assert!(engine.verify_session(&session_token).await.valid);
}

#[tokio::test]
async fn change_password_revokes_every_session_of_the_user() {
    let (engine, mail) = engine();
    let user_id = registered_verified_user(&engine, &mail).await;
    let first = engine.login(EMAIL, PASSWORD, None).await.session_token.unwrap();
    let second = engine.login(EMAIL, PASSWORD, None).await.session_token.unwrap();

    let outcome = engine
        .change_password(user_id, PASSWORD, "brand new password")
        .await;
    assert!(outcome.success);

    assert!(!engine.verify_session(&first).await.valid);
    assert!(!engine.verify_session(&second).await.valid);
    assert!(engine.login(EMAIL, "brand new password", None).await.success);
}

#[tokio::test]
async fn sessions_never_cross_users() {
    let (engine, mail) = engine();
    registered_verified_user(&engine, &mail).await;

    engine.register("other@example.com", PASSWORD).await;
    let token = last_mail_content(&mail);
    engine.verify_email_token(&token).await;

    let a = engine.login(EMAIL, PASSWORD, None).await;
    let b = engine.login("other@example.com", PASSWORD, None).await;

    let a_user = engine.verify_session(&a.session_token.unwrap()).await.user.unwrap();
    let b_user = engine.verify_session(&b.session_token.unwrap()).await.user.unwrap();

    assert_ne!(a_user.id, b_user.id);
    assert_eq!(a_user.email, EMAIL);
    assert_eq!(b_user.email, "other@example.com");
}

#[tokio::test]
async fn logout_invalidates_the_session_for_api_and_gateway_alike() {
    let (engine, mail) = engine();
    registered_verified_user(&engine, &mail).await;
    let token = engine.login(EMAIL, PASSWORD, None).await.session_token.unwrap();

    // Both consumers accept the live token.
    assert!(engine.verify_session(&token).await.valid);
    assert!(engine.authorize_connection(Some(&token)).await.is_ok());

    assert!(engine.logout(&token).await.success);

    // And both reject it once revoked.
    assert!(!engine.verify_session(&token).await.valid);
    assert!(matches!(
        engine.authorize_connection(Some(&token)).await,
        Err(HandshakeError::Rejected)
    ));
}

#[tokio::test]
async fn gateway_rejects_missing_and_unknown_tokens_before_any_channel() {
    let (engine, _mail) = engine();

    assert!(matches!(
        engine.authorize_connection(None).await,
        Err(HandshakeError::MissingToken)
    ));
    assert!(matches!(
        engine.authorize_connection(Some("")).await,
        Err(HandshakeError::MissingToken)
    ));
    assert!(matches!(
        engine.authorize_connection(Some("not-a-real-token")).await,
        Err(HandshakeError::Rejected)
    ));
}

#[tokio::test]
async fn backup_codes_are_independent_and_regeneration_replaces_all() {
    let (engine, mail) = engine();
    let user_id = registered_verified_user(&engine, &mail).await;
    let enabled = engine.enable_two_factor(user_id).await;
    assert!(enabled.success);
    assert_eq!(enabled.backup_codes.len(), 10);

    // Step up with one backup code; the rest stay usable.
    let login = engine.login(EMAIL, PASSWORD, None).await;
    let temp = login.temp_token.unwrap();
    let step_up = engine
        .verify_backup_code(user_id, &enabled.backup_codes[0], &temp, None)
        .await;
    assert!(step_up.success, "{}", step_up.message);

    let remaining = engine.backup_codes(user_id).await;
    assert_eq!(remaining.backup_codes.len(), 9);
    assert!(!remaining.backup_codes.contains(&enabled.backup_codes[0]));

    // Regeneration swaps the pool wholesale.
    let regenerated = engine.regenerate_backup_codes(user_id).await;
    assert_eq!(regenerated.backup_codes.len(), 10);
    let login = engine.login(EMAIL, PASSWORD, None).await;
    let temp = login.temp_token.unwrap();
    let stale = engine
        .verify_backup_code(user_id, &enabled.backup_codes[1], &temp, None)
        .await;
    assert!(!stale.success);
    assert_eq!(stale.message, "Invalid backup code");
}

#[tokio::test]
async fn deleting_the_account_tears_down_all_auth_state() {
    let (engine, mail) = engine();
    let user_id = registered_verified_user(&engine, &mail).await;
    let session = engine.login(EMAIL, PASSWORD, None).await.session_token.unwrap();
    let device = engine.trust_device(user_id, "laptop", None, None).await;
    assert!(device.success);

    let outcome = engine.delete_account(user_id).await;
    assert!(outcome.success);

    assert!(!engine.verify_session(&session).await.valid);
    assert!(!engine.login(EMAIL, PASSWORD, None).await.success);
    assert!(engine.trusted_devices(user_id).await.devices.is_empty());
}

#[tokio::test]
async fn sweep_reports_what_it_removed() {
    let (engine, mail) = engine();
    registered_verified_user(&engine, &mail).await;
    engine.login(EMAIL, PASSWORD, None).await;

    // Nothing is expired yet.
    let report = engine.sweep_expired().await;
    assert_eq!(report.sessions, 0);
    assert_eq!(report.tokens, 0);
}

#[tokio::test]
async fn register_rejects_duplicates_and_malformed_input() {
    let (engine, _mail) = engine();
    assert!(engine.register(EMAIL, PASSWORD).await.success);

    let duplicate = engine.register(EMAIL, PASSWORD).await;
    assert!(!duplicate.success);
    assert_eq!(duplicate.message, "User with this email already exists");

    assert!(!engine.register("not-an-email", PASSWORD).await.success);
    assert!(!engine.register("short@example.com", "short").await.success);
}

#[tokio::test]
async fn resend_verification_issues_a_fresh_working_token() {
    let (engine, mail) = engine();
    engine.register(EMAIL, PASSWORD).await;
    let first_token = last_mail_content(&mail);

    let outcome = engine.resend_verification_email(EMAIL).await;
    assert!(outcome.success);
    let second_token = last_mail_content(&mail);
    assert_ne!(first_token, second_token);

    // The superseded token no longer verifies; the fresh one does.
    assert!(!engine.verify_email_token(&first_token).await.success);
    assert!(engine.verify_email_token(&second_token).await.success);
    assert!(engine.login(EMAIL, PASSWORD, None).await.success);
}
