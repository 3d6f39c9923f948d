//! Sign-in gate for the admin dashboard.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use twinkle_admin::routes::auth::LOGIN_FAILED;
use twinkle_catalog::MemoryProductStore;
use twinkle_core::AdminAllowList;
use twinkle_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, AdminHarness, STAFF_EMAIL, STAFF_PASSWORD, body_text,
    form_request, get, location, session_cookie,
};

#[tokio::test]
async fn dashboard_redirects_to_login_without_a_session() {
    let admin = AdminHarness::new(MemoryProductStore::new());

    let response = get(&admin.router, "/", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
}

#[tokio::test]
async fn api_answers_unauthorized_without_a_session() {
    let admin = AdminHarness::new(MemoryProductStore::new());

    let response = get(&admin.router, "/api/products", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn failures_share_one_message() {
    let admin = AdminHarness::new(MemoryProductStore::new());

    for (email, password) in [
        (ADMIN_EMAIL, "wrong password entirely"),
        (STAFF_EMAIL, STAFF_PASSWORD),
        ("nobody@twinkle.test", ADMIN_PASSWORD),
        ("not-an-email", ADMIN_PASSWORD),
    ] {
        let response = admin.login(email, password).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{email}");
        let body = body_text(response).await;
        assert!(body.contains(LOGIN_FAILED), "{email}");
    }
}

#[tokio::test]
async fn allow_listed_admin_reaches_the_dashboard() {
    let admin = AdminHarness::new(MemoryProductStore::new());

    let response = admin.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    let cookie = session_cookie(&response).unwrap();
    assert!(cookie.starts_with("twinkle_admin_session="));

    let response = get(&admin.router, "/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(ADMIN_EMAIL));
    assert!(body.contains("No products yet."));
}

#[tokio::test]
async fn login_page_sends_signed_in_admins_home() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    let response = get(&admin.router, "/auth/login", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
}

#[tokio::test]
async fn removing_an_address_revokes_its_session() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    admin.gate.replace_allow_list(AdminAllowList::default()).await;

    let response = get(&admin.router, "/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let response = get(&admin.router, "/api/products", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    let response = admin
        .send(form_request("/auth/logout", &cookie, ""))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));

    let response = get(&admin.router, "/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn session_events_reach_subscribers() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let mut events = admin.gate.subscribe();

    let _ = admin.admin_cookie().await;

    let event = events.recv().await.unwrap();
    assert_eq!(
        event,
        twinkle_admin::services::SessionEvent::SignedIn(
            twinkle_core::Email::parse(ADMIN_EMAIL).unwrap()
        )
    );
}

#[tokio::test]
async fn responses_are_never_cached_and_carry_a_request_id() {
    let admin = AdminHarness::new(MemoryProductStore::new());

    let response = get(&admin.router, "/auth/login", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CACHE_CONTROL], "no-store, max-age=0");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert!(headers.contains_key("x-request-id"));
}
