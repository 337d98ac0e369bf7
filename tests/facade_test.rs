use solace::{
    AuthEngine, DashMapBackupCodeStore, DashMapOtpStore, DashMapSessionStore, DashMapTokenStore,
    DashMapTrustedDeviceStore, EngineSettings, HashMapUserStore, MockMailClient, Role,
};

fn engine() -> (
    AuthEngine<
        HashMapUserStore,
        DashMapTokenStore,
        DashMapOtpStore,
        DashMapBackupCodeStore,
        DashMapTrustedDeviceStore,
        DashMapSessionStore,
        MockMailClient,
    >,
    MockMailClient,
) {
    let mail = MockMailClient::new();
    (
        AuthEngine::new(
            HashMapUserStore::new(),
            DashMapTokenStore::new(),
            DashMapOtpStore::new(),
            DashMapBackupCodeStore::new(),
            DashMapTrustedDeviceStore::new(),
            DashMapSessionStore::new(),
            mail.clone(),
            EngineSettings::default(),
        ),
        mail,
    )
}

#[tokio::test]
async fn facade_wires_a_complete_register_login_cycle() {
    solace::init_tracing();
    let (engine, mail) = engine();

    let outcome = engine.register("member@example.com", "correct horse").await;
    assert!(outcome.success);
    let token = mail.sent().last().unwrap().content.clone();
    assert!(engine.verify_email_token(&token).await.success);

    let login = engine.login("member@example.com", "correct horse", None).await;
    assert!(login.success);
    let session = login.session_token.unwrap();
    let verified = engine.verify_session(&session).await;
    assert!(verified.valid);
    assert_eq!(verified.user.unwrap().role, Role::User);
}

#[test]
fn role_hierarchy_is_exposed_through_the_facade() {
    assert!(Role::Admin.has_permission(Some(Role::Manager)));
    assert!(Role::Host.has_permission(Some(Role::Host)));
    assert!(!Role::User.has_permission(Some(Role::Host)));
    assert!(Role::User.has_permission(None));
}

#[tokio::test]
async fn outcome_envelopes_serialize_for_api_consumers() {
    let (engine, _mail) = engine();

    let login = engine.login("nobody@example.com", "whatever pw", None).await;
    let json = serde_json::to_value(&login).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["requires2FA"], false);
    assert_eq!(json["message"], "Invalid email or password");
    // Absent tokens are omitted, not null.
    assert!(json.get("session_token").is_none());

    let session = engine.verify_session("unknown-token").await;
    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(json["valid"], false);
}
