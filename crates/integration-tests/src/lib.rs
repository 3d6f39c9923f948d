//! Test harnesses for Twinkle.
//!
//! Both binaries are driven in-process through `tower::ServiceExt::oneshot`
//! against in-memory backends, so the suites under `tests/` need no database.
//! Tests that talk to running servers are `#[ignore]`d; run them with
//! `cargo test -p twinkle-integration-tests -- --ignored` once both binaries
//! are up.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, Response, header},
};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use twinkle_admin::{
    AdminConfig, Services,
    db::MockAllowListSource,
    middleware::create_session_layer,
    services::{AuthGate, MemoryIdentityProvider},
};
use twinkle_catalog::{MemoryObjectStore, MemoryProductStore};
use twinkle_core::{
    AdminAllowList, Category, Email, Price, Product, ProductId, SubCategory,
};
use twinkle_storefront::StorefrontConfig;

pub const ADMIN_EMAIL: &str = "owner@twinkle.test";
pub const ADMIN_PASSWORD: &str = "correct horse battery";
/// Has an account but is not on the allow-list.
pub const STAFF_EMAIL: &str = "staff@twinkle.test";
pub const STAFF_PASSWORD: &str = "another long password";

const UNUSED_DATABASE: &str = "postgres://unused@localhost/twinkle";
const BOUNDARY: &str = "twinkle-test-boundary";

/// A product with the fields the pages render.
#[must_use]
pub fn product(id: &str, title: &str, category: Category, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_owned(),
        category,
        sub_category: SubCategory::Unspecified,
        price: price.parse().unwrap_or(Price::ZERO),
        description: format!("{title} description"),
        images: vec![format!("https://media.twinkle.test/products/{id}.jpg")],
        video_url: None,
        stock: 3,
        is_featured: false,
        created_at: None,
    }
}

/// The storefront router over `products`.
#[must_use]
pub fn storefront(products: MemoryProductStore) -> Router {
    let config = StorefrontConfig::with_database_url(SecretString::from(UNUSED_DATABASE));
    twinkle_storefront::app(twinkle_storefront::AppState::new(config, Arc::new(products)))
}

/// The admin router over in-memory stores, plus handles to inspect them.
pub struct AdminHarness {
    pub router: Router,
    pub products: MemoryProductStore,
    pub media: MemoryObjectStore,
    pub gate: AuthGate,
}

impl AdminHarness {
    /// Accounts for [`ADMIN_EMAIL`] and [`STAFF_EMAIL`]; only the first is
    /// allow-listed.
    #[must_use]
    pub fn new(products: MemoryProductStore) -> Self {
        Self::with_config(products, |_| {})
    }

    #[must_use]
    pub fn with_config(products: MemoryProductStore, configure: impl FnOnce(&mut AdminConfig)) -> Self {
        let mut config = AdminConfig::with_database_url(SecretString::from(UNUSED_DATABASE));
        config.admin_emails = AdminAllowList::parse_list(ADMIN_EMAIL);
        configure(&mut config);

        let identity = MemoryIdentityProvider::new()
            .with_account(&email(ADMIN_EMAIL), ADMIN_PASSWORD)
            .and_then(|p| p.with_account(&email(STAFF_EMAIL), STAFF_PASSWORD))
            .expect("hash test passwords");

        // Nothing stored: the gate keeps whatever list it holds
        let mut allow_lists = MockAllowListSource::new();
        allow_lists.expect_load_allow_list().returning(|| Ok(None));

        let gate = AuthGate::new(config.admin_emails.clone());
        let media = MemoryObjectStore::new();
        let sessions: SessionManagerLayer<MemoryStore> =
            create_session_layer(MemoryStore::default(), &config);

        let state = twinkle_admin::AppState::new(
            config,
            Services {
                products: Arc::new(products.clone()),
                media: Arc::new(media.clone()),
                identity: Arc::new(identity),
                allow_lists: Arc::new(allow_lists),
                gate: gate.clone(),
            },
        );

        Self {
            router: twinkle_admin::app(state, sessions),
            products,
            media,
            gate,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        send(&self.router, request).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response<Body> {
        let body = format!(
            "email={}&password={}",
            urlencoding::encode(email),
            urlencoding::encode(password)
        );
        self.send(
            Request::post("/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .expect("login request"),
        )
        .await
    }

    /// Sign in as [`ADMIN_EMAIL`] and return the `Cookie` header value.
    pub async fn admin_cookie(&self) -> String {
        let response = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert!(
            response.status().is_redirection(),
            "admin login failed with {}",
            response.status()
        );
        session_cookie(&response).expect("login sets a session cookie")
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut request = Request::get(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    send(router, request.body(Body::empty()).expect("GET request")).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[must_use]
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The `name=value` part of the first `Set-Cookie` header.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

/// A part in a `multipart/form-data` body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_post(uri: &str, cookie: &str, body: Body) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(body)
        .expect("multipart request")
}

/// POST `parts` as `multipart/form-data`.
#[must_use]
pub fn multipart_request(uri: &str, cookie: &str, parts: &[Part<'_>]) -> Request<Body> {
    multipart_post(uri, cookie, Body::from(multipart_body(parts)))
}

/// Like [`multipart_request`], but the body arrives in `chunk_size` pieces
/// the way a browser upload does, so body limits trip mid-stream.
#[must_use]
pub fn streamed_multipart_request(
    uri: &str,
    cookie: &str,
    parts: &[Part<'_>],
    chunk_size: usize,
) -> Request<Body> {
    let chunks: Vec<Result<Bytes, std::io::Error>> = multipart_body(parts)
        .chunks(chunk_size)
        .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
        .collect();
    multipart_post(uri, cookie, Body::from_stream(futures::stream::iter(chunks)))
}

/// POST a urlencoded form.
#[must_use]
pub fn form_request(uri: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_owned()))
        .expect("form request")
}

fn email(value: &str) -> Email {
    Email::parse(value).expect("valid test email")
}
