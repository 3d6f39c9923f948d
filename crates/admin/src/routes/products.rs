//! Product dashboard: list, create, edit and delete.
//!
//! The form round-trips the whole draft on every action, so adding or
//! removing an image never loses what was typed. Nothing is written to the
//! store until a complete draft is saved.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::Field},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use twinkle_catalog::{CatalogError, purge_images, upload_image};
use twinkle_core::{
    Category, CategoryFilter, DraftSubmission, Email, Product, ProductDraft, ProductId,
    SubCategory,
};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

pub const UPLOAD_FAILED: &str = "Image upload failed. Please try again.";
pub const UPLOAD_MISSING: &str = "Choose an image to upload first.";

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/products/new", get(new_product))
        .route(
            "/products/draft",
            post(submit_draft).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/products/{id}/edit", get(edit_product))
        .route(
            "/products/{id}/delete",
            get(confirm_delete).post(delete_product),
        )
}

// =============================================================================
// Dashboard
// =============================================================================

pub struct ProductRow {
    pub title: String,
    pub category: String,
    pub price: String,
    pub stock: u32,
    pub cover_image: Option<String>,
    pub edit_href: String,
    pub delete_href: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        let base = format!("/products/{}", urlencoding::encode(product.id.as_str()));
        let category = if product.sub_category.is_specified() {
            format!("{} • {}", product.category, product.sub_category)
        } else {
            product.category.to_string()
        };

        Self {
            title: product.title.clone(),
            category,
            price: product.price.to_string(),
            stock: product.stock,
            cover_image: product.cover_image().map(str::to_owned),
            edit_href: format!("{base}/edit"),
            delete_href: format!("{base}/delete"),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_email: String,
    pub rows: Vec<ProductRow>,
}

/// GET / - the full list, fetched fresh on every visit.
#[instrument(skip(state, profile))]
async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(profile): RequireAdmin,
) -> Result<DashboardTemplate> {
    let products = state.products().list_products(CategoryFilter::All).await?;

    Ok(DashboardTemplate {
        admin_email: profile.email.map(Email::into_inner).unwrap_or_default(),
        rows: products.iter().map(ProductRow::from).collect(),
    })
}

// =============================================================================
// Draft form
// =============================================================================

pub struct Choice {
    pub value: &'static str,
    pub selected: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "product_form.html")]
pub struct ProductFormTemplate {
    pub heading: &'static str,
    pub id: Option<String>,
    pub title: String,
    pub categories: Vec<Choice>,
    pub sub_categories: Vec<Choice>,
    pub price: String,
    pub description: String,
    /// `(index, url)` in display order.
    pub images: Vec<(usize, String)>,
    pub video_url: String,
    pub stock: String,
    pub is_featured: bool,
    pub error: Option<&'static str>,
}

impl ProductFormTemplate {
    #[must_use]
    pub fn new(draft: &ProductDraft, error: Option<&'static str>) -> Self {
        Self {
            heading: if draft.is_editing() {
                "Edit Product"
            } else {
                "Add New Product"
            },
            id: draft.id.as_ref().map(ToString::to_string),
            title: draft.title.clone(),
            categories: Category::ALL
                .into_iter()
                .map(|c| Choice {
                    value: c.as_str(),
                    selected: c == draft.category,
                })
                .collect(),
            sub_categories: SubCategory::ALL
                .into_iter()
                .map(|s| Choice {
                    value: s.as_str(),
                    selected: s == draft.sub_category,
                })
                .collect(),
            price: draft.price.clone(),
            description: draft.description.clone(),
            images: draft.images.iter().cloned().enumerate().collect(),
            video_url: draft.video_url.clone(),
            stock: draft.stock.clone(),
            is_featured: draft.is_featured,
            error,
        }
    }
}

/// GET /products/new
async fn new_product(RequireAdmin(_): RequireAdmin) -> ProductFormTemplate {
    let draft = ProductDraft {
        stock: "0".to_owned(),
        ..ProductDraft::default()
    };
    ProductFormTemplate::new(&draft, None)
}

/// GET /products/{id}/edit
#[instrument(skip(state, _admin))]
async fn edit_product(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let id = ProductId::new(id);
    let product = state
        .products()
        .get_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductFormTemplate::new(
        &ProductDraft::from_product(&product),
        None,
    ))
}

/// The button that submitted the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftAction {
    Upload,
    RemoveImage(usize),
    Save,
}

impl DraftAction {
    /// `None` for values no button sends.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upload" => Some(Self::Upload),
            "save" => Some(Self::Save),
            other => other
                .strip_prefix("remove-image-")
                .and_then(|i| i.parse().ok())
                .map(Self::RemoveImage),
        }
    }
}

/// A file picked in the form.
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A decoded draft form submission.
pub struct DraftForm {
    pub draft: ProductDraft,
    /// `None` when the submitted action was not recognised. A form with no
    /// action at all saves, as implicit submission does.
    pub action: Option<DraftAction>,
    pub upload: Option<ImageUpload>,
    /// The body broke off while the image was being read, usually because it
    /// exceeded the upload limit. Fields before the file input are kept.
    pub upload_failed: bool,
}

async fn read_text(field: Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("unreadable form field: {e}")))
}

impl DraftForm {
    /// Decode the multipart body.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for unreadable text fields or category
    /// values that are not offered by the form. A body that breaks off
    /// mid-stream is reported through `upload_failed` instead.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut draft = ProductDraft::default();
        let mut action = Some(DraftAction::Save);
        let mut upload = None;
        let mut upload_failed = false;

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, status = %e.status(), "Product form body cut short");
                    upload_failed = true;
                    break;
                }
            };
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "image" => {
                    let filename = field.file_name().unwrap_or_default().to_owned();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_owned();
                    let bytes = match field.bytes().await {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            tracing::warn!(error = %e, %filename, "Image could not be read");
                            upload_failed = true;
                            break;
                        }
                    };
                    // An untouched file input still sends an empty part
                    if !filename.is_empty() && !bytes.is_empty() {
                        upload = Some(ImageUpload {
                            filename,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                "id" => {
                    let id = read_text(field).await?;
                    draft.id = Some(id.trim())
                        .filter(|id| !id.is_empty())
                        .map(ProductId::new);
                }
                "title" => draft.title = read_text(field).await?,
                "category" => {
                    draft.category = read_text(field)
                        .await?
                        .parse()
                        .map_err(|e| AppError::BadRequest(format!("{e}")))?;
                }
                "sub_category" => {
                    draft.sub_category = read_text(field)
                        .await?
                        .parse()
                        .map_err(|e| AppError::BadRequest(format!("{e}")))?;
                }
                "price" => draft.price = read_text(field).await?,
                "description" => draft.description = read_text(field).await?,
                "images" => {
                    let url = read_text(field).await?;
                    if !url.trim().is_empty() {
                        draft.push_image(url.trim());
                    }
                }
                "video_url" => draft.video_url = read_text(field).await?,
                "stock" => draft.stock = read_text(field).await?,
                "is_featured" => draft.is_featured = true,
                "action" => action = DraftAction::parse(&read_text(field).await?),
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(Self {
            draft,
            action,
            upload,
            upload_failed,
        })
    }
}

/// POST /products/draft
///
/// `upload` and `remove-image-{i}` change the draft and re-render it.
/// `save` writes a complete draft and returns to the dashboard; an
/// incomplete one is re-rendered unchanged, with no message. An image that
/// could not be received, or an unknown action, re-renders what arrived.
#[instrument(skip_all)]
async fn submit_draft(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    multipart: Multipart,
) -> Result<Response> {
    let DraftForm {
        mut draft,
        action,
        upload,
        upload_failed,
    } = DraftForm::from_multipart(multipart).await?;

    if upload_failed {
        return Ok(ProductFormTemplate::new(&draft, Some(UPLOAD_FAILED)).into_response());
    }
    let Some(action) = action else {
        tracing::warn!("Unrecognised draft action");
        return Ok(ProductFormTemplate::new(&draft, None).into_response());
    };

    match action {
        DraftAction::Upload => {
            let error = match upload {
                None => Some(UPLOAD_MISSING),
                Some(file) => match upload_image(
                    state.media(),
                    &file.filename,
                    &file.content_type,
                    file.bytes,
                )
                .await
                {
                    Ok(url) => {
                        draft.push_image(url);
                        None
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, filename = %file.filename, "Image upload failed");
                        Some(UPLOAD_FAILED)
                    }
                },
            };
            Ok(ProductFormTemplate::new(&draft, error).into_response())
        }
        DraftAction::RemoveImage(index) => {
            draft.remove_image(index);
            Ok(ProductFormTemplate::new(&draft, None).into_response())
        }
        DraftAction::Save => match draft.submission() {
            None => Ok(ProductFormTemplate::new(&draft, None).into_response()),
            Some(DraftSubmission::Create(product)) => {
                let id = state.products().create_product(product).await?;
                tracing::info!(product_id = %id, "Product created");
                Ok(Redirect::to("/").into_response())
            }
            Some(DraftSubmission::Update(id, patch)) => {
                state.products().update_product(&id, patch).await?;
                tracing::info!(product_id = %id, "Product updated");
                Ok(Redirect::to("/").into_response())
            }
        },
    }
}

// =============================================================================
// Delete
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub title: String,
    pub action: String,
}

/// GET /products/{id}/delete
#[instrument(skip(state, _admin))]
async fn confirm_delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<ConfirmDeleteTemplate> {
    let id = ProductId::new(id);
    let product = state
        .products()
        .get_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ConfirmDeleteTemplate {
        title: product.title,
        action: format!("/products/{}/delete", urlencoding::encode(id.as_str())),
    })
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub confirm: Option<String>,
}

/// POST /products/{id}/delete - only acts on `confirm=yes`.
#[instrument(skip(state, _admin))]
async fn delete_product(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect> {
    if form.confirm.as_deref() != Some("yes") {
        return Ok(Redirect::to("/"));
    }

    let id = ProductId::new(id);
    let purge = state.config().purge_images_on_delete;
    let images = if purge {
        state
            .products()
            .get_product(&id)
            .await?
            .map(|p| p.images)
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    match state.products().delete_product(&id).await {
        Ok(()) => tracing::info!(product_id = %id, "Product deleted"),
        Err(CatalogError::NotFound) => {
            tracing::info!(product_id = %id, "Product already gone");
        }
        Err(e) => return Err(e.into()),
    }

    if purge && !images.is_empty() {
        let removed = purge_images(state.media(), &images).await;
        tracing::info!(product_id = %id, removed, "Purged product images");
    }

    Ok(Redirect::to("/"))
}
