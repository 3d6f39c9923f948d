//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /auth/login              - Login form
//! POST /auth/login              - Sign in (allow-listed accounts only)
//! POST /auth/logout             - Sign out
//!
//! # Requires admin
//! GET  /                        - Product table
//! GET  /products/new            - Empty product form
//! GET  /products/{id}/edit      - Form loaded from a product
//! POST /products/draft          - Form actions: upload, remove-image-{i}, save
//! GET  /products/{id}/delete    - Delete confirmation
//! POST /products/{id}/delete    - Delete when confirm=yes
//! GET  /api/products            - Product list as JSON (401 without admin)
//! ```

pub mod api;
pub mod auth;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// All admin routes. `max_upload_bytes` bounds the product form body.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router(max_upload_bytes))
        .merge(api::router())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use secrecy::SecretString;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;
    use twinkle_catalog::{CatalogError, MemoryObjectStore, MockProductStore};
    use twinkle_core::{AdminAllowList, Email, UserId, UserProfile};

    use super::auth::LOGIN_FAILED;
    use crate::config::AdminConfig;
    use crate::db::{MockAllowListSource, RepositoryError};
    use crate::middleware::create_session_layer;
    use crate::services::{AuthError, AuthGate, MockIdentityProvider};
    use crate::state::{AppState, Services};

    const OWNER: &str = "owner@twinkle.test";

    fn app(products: MockProductStore, identity: MockIdentityProvider) -> axum::Router {
        let mut allow_lists = MockAllowListSource::new();
        allow_lists.expect_load_allow_list().returning(|| Ok(None));
        app_with_allow_lists(products, identity, allow_lists)
    }

    fn app_with_allow_lists(
        products: MockProductStore,
        identity: MockIdentityProvider,
        allow_lists: MockAllowListSource,
    ) -> axum::Router {
        let mut config = AdminConfig::with_database_url(SecretString::from("postgres://unused"));
        config.admin_emails = AdminAllowList::parse_list(OWNER);

        let gate = AuthGate::new(config.admin_emails.clone());
        let sessions = create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(
            config,
            Services {
                products: Arc::new(products),
                media: Arc::new(MemoryObjectStore::new()),
                identity: Arc::new(identity),
                allow_lists: Arc::new(allow_lists),
                gate,
            },
        );
        crate::app(state, sessions)
    }

    fn profile(email: &Email) -> UserProfile {
        UserProfile {
            uid: UserId::new("u1"),
            email: Some(email.clone()),
            role: None,
        }
    }

    fn login_request(email: &str) -> Request<Body> {
        Request::post("/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "email={}&password=irrelevant-here",
                urlencoding::encode(email)
            )))
            .unwrap()
    }

    fn session_cookie(response: &axum::response::Response) -> String {
        response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_owned()
    }

    fn dashboard_request(cookie: &str) -> Request<Body> {
        Request::get("/")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    async fn body(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn identity_backend_failure_looks_like_bad_credentials() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_sign_in().returning(|_, _| {
            Err(AuthError::Repository(RepositoryError::Database(
                sqlx::Error::PoolTimedOut,
            )))
        });

        let response = app(MockProductStore::new(), identity)
            .oneshot(login_request(OWNER))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let text = body(response).await;
        assert!(text.contains(LOGIN_FAILED));
        assert!(!text.to_lowercase().contains("pool"));
    }

    #[tokio::test]
    async fn valid_account_off_the_list_is_refused() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_sign_in()
            .returning(|email, _| Ok(profile(email)));

        let response = app(MockProductStore::new(), identity)
            .oneshot(login_request("staff@twinkle.test"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn dashboard_reports_store_failure() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_sign_in()
            .returning(|email, _| Ok(profile(email)));
        let mut products = MockProductStore::new();
        products
            .expect_list_products()
            .returning(|_| Err(CatalogError::Unavailable("connection refused".into())));

        let router = app(products, identity);
        let login = router.clone().oneshot(login_request(OWNER)).await.unwrap();
        assert_eq!(login.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&login);

        let response = router.oneshot(dashboard_request(&cookie)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body(response).await.contains("connection refused"));
    }

    #[tokio::test]
    async fn stored_removal_ends_an_open_session() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_sign_in()
            .returning(|email, _| Ok(profile(email)));
        let mut products = MockProductStore::new();
        products.expect_list_products().returning(|_| Ok(Vec::new()));

        let revoked = Arc::new(AtomicBool::new(false));
        let mut allow_lists = MockAllowListSource::new();
        let flag = Arc::clone(&revoked);
        allow_lists.expect_load_allow_list().returning(move || {
            let stored = if flag.load(Ordering::SeqCst) { "" } else { OWNER };
            Ok(Some(AdminAllowList::parse_list(stored)))
        });

        let router = app_with_allow_lists(products, identity, allow_lists);
        let login = router.clone().oneshot(login_request(OWNER)).await.unwrap();
        assert_eq!(login.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&login);

        let allowed = router
            .clone()
            .oneshot(dashboard_request(&cookie))
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);

        revoked.store(true, Ordering::SeqCst);

        let refused = router.oneshot(dashboard_request(&cookie)).await.unwrap();
        assert_eq!(refused.status(), StatusCode::SEE_OTHER);
        assert_eq!(refused.headers()[header::LOCATION], "/auth/login");
    }

    #[tokio::test]
    async fn readiness_follows_the_store() {
        let mut products = MockProductStore::new();
        products
            .expect_ping()
            .returning(|| Err(CatalogError::Unavailable("down".into())));

        let response = app(products, MockIdentityProvider::new())
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
