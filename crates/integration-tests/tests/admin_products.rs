//! Product management through the admin form, checked against the
//! storefront sharing the same store.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use twinkle_admin::routes::products::{UPLOAD_FAILED, UPLOAD_MISSING};
use twinkle_catalog::{MemoryProductStore, ProductStore};
use twinkle_core::{Category, CategoryFilter, ProductId};
use twinkle_integration_tests::{
    AdminHarness, Part, body_text, form_request, get, location, multipart_request, product,
    storefront, streamed_multipart_request,
};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn draft_fields<'a>(title: &'a str, price: &'a str, action: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("title", title),
        Part::Text("category", "Perfumes"),
        Part::Text("sub_category", "Twinkle Blends"),
        Part::Text("price", price),
        Part::Text("description", "Warm amber with a vanilla base."),
        Part::Text("video_url", ""),
        Part::Text("stock", "4"),
        Part::Text("action", action),
    ]
}

#[tokio::test]
async fn uploaded_image_is_kept_in_the_draft() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    let mut parts = draft_fields("Amber Nights", "1250", "upload");
    parts.push(Part::File {
        name: "image",
        filename: "amber nights.png",
        content_type: "image/png",
        bytes: PNG,
    });
    let response = admin
        .send(multipart_request("/products/draft", &cookie, &parts))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("https://media.twinkle.test/products/"));
    assert!(body.contains("Amber Nights"));
    assert_eq!(admin.media.len().await, 1);
    assert!(admin.products.is_empty().await);
}

#[tokio::test]
async fn upload_without_a_file_explains_itself() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    let response = admin
        .send(multipart_request(
            "/products/draft",
            &cookie,
            &draft_fields("Amber Nights", "1250", "upload"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(UPLOAD_MISSING));
    assert!(admin.media.is_empty().await);
}

#[tokio::test]
async fn removing_an_image_keeps_the_rest_of_the_draft() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    let mut parts = draft_fields("Amber Nights", "1250", "remove-image-0");
    parts.push(Part::Text("images", "https://media.twinkle.test/products/a.jpg"));
    parts.push(Part::Text("images", "https://media.twinkle.test/products/b.jpg"));
    let response = admin
        .send(multipart_request("/products/draft", &cookie, &parts))
        .await;

    let body = body_text(response).await;
    assert!(!body.contains("products/a.jpg"));
    assert!(body.contains("products/b.jpg"));
    assert!(body.contains("Warm amber with a vanilla base."));
}

#[tokio::test]
async fn incomplete_draft_is_not_saved() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    let response = admin
        .send(multipart_request(
            "/products/draft",
            &cookie,
            &draft_fields("Amber Nights", "", "save"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Add New Product"));
    assert!(admin.products.is_empty().await);
}

#[tokio::test]
async fn oversized_image_keeps_the_typed_draft() {
    let admin = AdminHarness::with_config(MemoryProductStore::new(), |config| {
        config.max_upload_bytes = 16 * 1024;
    });
    let cookie = admin.admin_cookie().await;
    let photo = vec![0xAB_u8; 64 * 1024];

    let mut parts = draft_fields("Amber Nights", "1250", "upload");
    let action = parts.pop().unwrap();
    parts.push(Part::File {
        name: "image",
        filename: "phone photo.jpg",
        content_type: "image/jpeg",
        bytes: &photo,
    });
    parts.push(action);

    let response = admin
        .send(streamed_multipart_request("/products/draft", &cookie, &parts, 1024))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(UPLOAD_FAILED));
    assert!(body.contains("Amber Nights"));
    assert!(body.contains("Warm amber with a vanilla base."));
    assert!(admin.media.is_empty().await);
    assert!(admin.products.is_empty().await);
}

#[tokio::test]
async fn zero_price_is_not_saved() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    let response = admin
        .send(multipart_request(
            "/products/draft",
            &cookie,
            &draft_fields("Freebie", "0", "save"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Freebie"));
    assert!(admin.products.is_empty().await);
}

#[tokio::test]
async fn unknown_action_only_re_renders() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    let response = admin
        .send(multipart_request(
            "/products/draft",
            &cookie,
            &draft_fields("Amber Nights", "1250", "remove-image-x"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Amber Nights"));
    assert!(admin.products.is_empty().await);
}

#[tokio::test]
async fn saved_product_appears_in_the_shop() {
    let products = MemoryProductStore::new();
    let admin = AdminHarness::new(products.clone());
    let shop = storefront(products.clone());
    let cookie = admin.admin_cookie().await;

    let mut parts = draft_fields("Amber Nights", "1250", "save");
    parts.push(Part::Text("images", "https://media.twinkle.test/products/amber.jpg"));
    parts.push(Part::Text("is_featured", "on"));
    let response = admin
        .send(multipart_request("/products/draft", &cookie, &parts))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let stored = products.list_products(CategoryFilter::All).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].stock, 4);
    assert!(stored[0].is_featured);

    let dashboard = body_text(get(&admin.router, "/", Some(&cookie)).await).await;
    assert!(dashboard.contains("Amber Nights"));
    assert!(dashboard.contains("1,250"));

    let page = body_text(get(&shop, "/shop?category=Perfumes", None).await).await;
    assert!(page.contains("Amber Nights"));
    let page = body_text(get(&shop, "/", None).await).await;
    assert!(page.contains("Amber Nights"));
}

#[tokio::test]
async fn editing_updates_the_existing_product() {
    let products = MemoryProductStore::with_products(vec![product(
        "p1",
        "Oud Royale",
        Category::Perfumes,
        "900",
    )]);
    let admin = AdminHarness::new(products.clone());
    let cookie = admin.admin_cookie().await;

    let form = body_text(get(&admin.router, "/products/p1/edit", Some(&cookie)).await).await;
    assert!(form.contains("Edit Product"));
    assert!(form.contains("Oud Royale"));

    let mut parts = draft_fields("Oud Royale Intense", "950", "save");
    parts.push(Part::Text("id", "p1"));
    let response = admin
        .send(multipart_request("/products/draft", &cookie, &parts))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = products
        .get_product(&ProductId::new("p1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Oud Royale Intense");
    assert_eq!(products.len().await, 1);
}

#[tokio::test]
async fn editing_an_unknown_product_is_not_found() {
    let admin = AdminHarness::new(MemoryProductStore::new());
    let cookie = admin.admin_cookie().await;

    let response = get(&admin.router, "/products/missing/edit", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_needs_confirmation() {
    let products = MemoryProductStore::with_products(vec![product(
        "p1",
        "Oud Royale",
        Category::Perfumes,
        "900",
    )]);
    let admin = AdminHarness::new(products.clone());
    let cookie = admin.admin_cookie().await;

    let page = body_text(get(&admin.router, "/products/p1/delete", Some(&cookie)).await).await;
    assert!(page.contains("Oud Royale"));

    let response = admin
        .send(form_request("/products/p1/delete", &cookie, ""))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(products.len().await, 1);

    let response = admin
        .send(form_request("/products/p1/delete", &cookie, "confirm=yes"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(products.is_empty().await);

    // Deleting again is a no-op
    let response = admin
        .send(form_request("/products/p1/delete", &cookie, "confirm=yes"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn delete_can_purge_uploaded_images() {
    let products = MemoryProductStore::new();
    let admin = AdminHarness::with_config(products.clone(), |config| {
        config.purge_images_on_delete = true;
    });
    let cookie = admin.admin_cookie().await;

    let mut parts = draft_fields("Amber Nights", "1250", "upload");
    parts.push(Part::File {
        name: "image",
        filename: "amber.png",
        content_type: "image/png",
        bytes: PNG,
    });
    admin
        .send(multipart_request("/products/draft", &cookie, &parts))
        .await;
    assert_eq!(admin.media.len().await, 1);

    // Save with whatever URL the upload produced
    let api = body_text(get(&admin.router, "/api/products", Some(&cookie)).await).await;
    assert_eq!(api, "[]");
    let key = admin.media.keys().await.pop().unwrap();
    let url = format!("https://media.twinkle.test/{key}");
    let mut parts = draft_fields("Amber Nights", "1250", "save");
    parts.push(Part::Text("images", &url));
    admin
        .send(multipart_request("/products/draft", &cookie, &parts))
        .await;
    let id = products.list_products(CategoryFilter::All).await.unwrap()[0]
        .id
        .clone();

    admin
        .send(form_request(
            &format!("/products/{id}/delete"),
            &cookie,
            "confirm=yes",
        ))
        .await;

    assert!(products.is_empty().await);
    assert!(admin.media.is_empty().await);
}
