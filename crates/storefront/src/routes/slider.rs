//! Slider route handlers.
//!
//! Public reads go straight to the slider service. Management calls go
//! through the [`SliderAdminPage`](crate::pages::SliderAdminPage) so the form
//! rules and notifications match the admin screen.

use axum::{
    Json,
    extract::{Path, State},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use imprenta_core::SliderImageId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::slider::{ImageUpload, SliderImage, SliderImageDraft};
use crate::services::notifications::{Notification, PresetAnswer};
use crate::services::slider::SliderService;
use crate::state::AppState;

/// Uploaded file, base64 encoded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
    pub file_name: String,
    pub content_type: String,
    pub data: String,
}

impl UploadBody {
    fn decode(self) -> Result<ImageUpload> {
        let bytes = STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| AppError::BadRequest(format!("file data is not valid base64: {e}")))?;
        Ok(ImageUpload::new(self.file_name, self.content_type, bytes))
    }
}

/// Slide form submission.
#[derive(Debug, Deserialize)]
pub struct SlideBody {
    #[serde(flatten)]
    pub draft: SliderImageDraft,
    pub file: Option<UploadBody>,
}

/// Result of a management call.
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    /// The created or updated slide, if the call succeeded.
    pub image: Option<SliderImage>,
    pub ok: bool,
    pub images: Vec<SliderImage>,
    pub notifications: Vec<Notification>,
}

impl AdminResponse {
    fn new(state: &AppState, ok: bool, image: Option<SliderImage>, images: &[SliderImage]) -> Self {
        Self {
            image,
            ok,
            images: images.to_vec(),
            notifications: state.notifications().drain(),
        }
    }
}

/// Active slides for the home page carousel.
#[instrument(skip(state))]
pub async fn active(State(state): State<AppState>) -> Result<Json<Vec<SliderImage>>> {
    Ok(Json(state.slider().list_active().await?))
}

/// Every slide, active or not.
#[instrument(skip(state))]
pub async fn all(State(state): State<AppState>) -> Result<Json<Vec<SliderImage>>> {
    Ok(Json(state.slider().list().await?))
}

/// Create a slide. A file is required.
#[instrument(skip(state, body))]
pub async fn create(State(state): State<AppState>, Json(body): Json<SlideBody>) -> Result<Json<AdminResponse>> {
    let file = body
        .file
        .ok_or_else(|| AppError::BadRequest("an image file is required".to_string()))?
        .decode()?;

    let mut page = state.slider_admin().lock().await;
    if page.is_loading() {
        page.load().await;
    }

    let image = page.create(body.draft, file).await;
    Ok(Json(AdminResponse::new(&state, image.is_some(), image, page.images())))
}

/// Update a slide, optionally replacing its file.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SlideBody>,
) -> Result<Json<AdminResponse>> {
    let file = body.file.map(UploadBody::decode).transpose()?;

    let mut page = state.slider_admin().lock().await;
    if page.is_loading() {
        page.load().await;
    }

    let image = page.update(&SliderImageId::from(id), body.draft, file).await;
    Ok(Json(AdminResponse::new(&state, image.is_some(), image, page.images())))
}

/// Delete a slide. The browser confirms before sending the request.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<AdminResponse>> {
    let mut page = state.slider_admin().lock().await;
    page.load().await;

    let id = SliderImageId::from(id);
    if !page.images().iter().any(|image| image.id == id) {
        return Err(AppError::NotFound(format!("slider image {id}")));
    }

    let ok = page.delete(&id, &PresetAnswer(true)).await;
    Ok(Json(AdminResponse::new(&state, ok, None, page.images())))
}

/// Move a slide one position up.
#[instrument(skip(state))]
pub async fn move_up(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<AdminResponse>> {
    let mut page = state.slider_admin().lock().await;
    page.load().await;

    let index = position_of(page.images(), &id)?;
    let ok = page.move_up(index).await;
    Ok(Json(AdminResponse::new(&state, ok, None, page.images())))
}

/// Move a slide one position down.
#[instrument(skip(state))]
pub async fn move_down(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<AdminResponse>> {
    let mut page = state.slider_admin().lock().await;
    page.load().await;

    let index = position_of(page.images(), &id)?;
    let ok = page.move_down(index).await;
    Ok(Json(AdminResponse::new(&state, ok, None, page.images())))
}

fn position_of(images: &[SliderImage], id: &str) -> Result<usize> {
    images
        .iter()
        .position(|image| image.id.as_str() == id)
        .ok_or_else(|| AppError::NotFound(format!("slider image {id}")))
}
