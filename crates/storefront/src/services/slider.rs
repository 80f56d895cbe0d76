//! Slider image service.
//!
//! The home page carousel and the slider admin page only see the
//! [`SliderService`] trait. [`SimulatedSliderService`] keeps slides in memory
//! and injects network-like latency so the UI flows behave as they would
//! against a remote API.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use imprenta_core::SliderImageId;
use rand::Rng;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::slider::{DraftError, ImageUpload, SliderImage, SliderImageDraft, UploadError};

/// Prefix of URLs pointing at uploaded (in-memory) files.
pub const BLOB_URL_PREFIX: &str = "blob:";

/// Slider service errors.
#[derive(Debug, Error)]
pub enum SliderError {
    /// No slide with this id.
    #[error("Slider image {0} not found")]
    NotFound(SliderImageId),

    /// The uploaded file was rejected.
    #[error("Invalid upload: {0}")]
    Upload(#[from] UploadError),

    /// The slide fields were rejected.
    #[error("Invalid slide: {0}")]
    Draft(#[from] DraftError),
}

/// CRUD access to slider images.
///
/// Every call resolves once with either a value or an error.
pub trait SliderService: Send + Sync {
    /// All slides sorted by `order`.
    fn list(&self) -> impl Future<Output = Result<Vec<SliderImage>, SliderError>> + Send;

    /// Active slides sorted by `order`.
    fn list_active(&self) -> impl Future<Output = Result<Vec<SliderImage>, SliderError>> + Send;

    /// Create a slide from an uploaded file.
    fn add_with_file(
        &self,
        draft: SliderImageDraft,
        file: ImageUpload,
    ) -> impl Future<Output = Result<SliderImage, SliderError>> + Send;

    /// Update a slide, optionally replacing its file.
    fn update_with_file(
        &self,
        id: &SliderImageId,
        draft: SliderImageDraft,
        file: Option<ImageUpload>,
    ) -> impl Future<Output = Result<SliderImage, SliderError>> + Send;

    /// Delete a slide.
    fn delete(&self, id: &SliderImageId) -> impl Future<Output = Result<(), SliderError>> + Send;

    /// Replace the slide list with `images` (already renumbered).
    fn reorder(
        &self,
        images: Vec<SliderImage>,
    ) -> impl Future<Output = Result<(), SliderError>> + Send;
}

/// Artificial delay applied before each simulated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latency {
    /// Resolve immediately.
    None,
    /// Wait `base` plus a random amount up to `jitter`.
    Simulated { base: Duration, jitter: Duration },
}

impl Latency {
    /// 300-500 ms, roughly a slow API round trip.
    pub const NETWORK: Self = Self::Simulated {
        base: Duration::from_millis(300),
        jitter: Duration::from_millis(200),
    };

    fn sample(self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Simulated { base, jitter } => {
                let jitter_ms = u64::try_from(jitter.as_millis()).unwrap_or(u64::MAX);
                base + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
            }
        }
    }

    async fn wait(self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[derive(Debug, Default)]
struct SliderState {
    images: Vec<SliderImage>,
    blobs: HashMap<String, Vec<u8>>,
}

impl SliderState {
    fn position(&self, id: &SliderImageId) -> Result<usize, SliderError> {
        self.images
            .iter()
            .position(|image| &image.id == id)
            .ok_or_else(|| SliderError::NotFound(id.clone()))
    }

    fn store_blob(&mut self, file: ImageUpload) -> String {
        let url = format!("{BLOB_URL_PREFIX}imprenta/{}", uuid::Uuid::new_v4());
        self.blobs.insert(url.clone(), file.bytes);
        url
    }

    fn revoke_blob(&mut self, url: &str) {
        if url.starts_with(BLOB_URL_PREFIX) {
            self.blobs.remove(url);
        }
    }
}

/// In-memory slider backend with simulated latency.
#[derive(Debug)]
pub struct SimulatedSliderService {
    state: RwLock<SliderState>,
    latency: Latency,
}

impl SimulatedSliderService {
    /// Service seeded with the default promotional slides.
    #[must_use]
    pub fn new(latency: Latency) -> Self {
        Self::with_images(seed_images(), latency)
    }

    /// Service seeded with `images`.
    #[must_use]
    pub fn with_images(images: Vec<SliderImage>, latency: Latency) -> Self {
        Self {
            state: RwLock::new(SliderState {
                images,
                blobs: HashMap::new(),
            }),
            latency,
        }
    }

    /// Bytes behind an uploaded slide URL.
    pub async fn blob(&self, url: &str) -> Option<Vec<u8>> {
        self.state.read().await.blobs.get(url).cloned()
    }

    /// Number of uploaded files still held.
    pub async fn blob_count(&self) -> usize {
        self.state.read().await.blobs.len()
    }
}

fn sorted_by_order<'a>(images: impl Iterator<Item = &'a SliderImage>) -> Vec<SliderImage> {
    let mut out: Vec<SliderImage> = images.cloned().collect();
    out.sort_by_key(|image| image.order);
    out
}

impl SliderService for SimulatedSliderService {
    async fn list(&self) -> Result<Vec<SliderImage>, SliderError> {
        self.latency.wait().await;
        let state = self.state.read().await;
        Ok(sorted_by_order(state.images.iter()))
    }

    async fn list_active(&self) -> Result<Vec<SliderImage>, SliderError> {
        self.latency.wait().await;
        let state = self.state.read().await;
        Ok(sorted_by_order(
            state.images.iter().filter(|image| image.is_active),
        ))
    }

    async fn add_with_file(
        &self,
        draft: SliderImageDraft,
        file: ImageUpload,
    ) -> Result<SliderImage, SliderError> {
        self.latency.wait().await;
        draft.validate()?;
        file.validate()?;

        let now = Utc::now();
        let file_name = file.file_name.clone();
        let file_size = file.size();

        let mut state = self.state.write().await;
        let image = SliderImage {
            id: SliderImageId::generate(),
            name: draft.name,
            image_url: state.store_blob(file),
            alt_text: draft.alt_text,
            order: draft.order,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
            file_size: Some(file_size),
            file_name: Some(file_name),
        };
        state.images.push(image.clone());

        tracing::info!(id = %image.id, name = %image.name, "Slider image added");
        Ok(image)
    }

    async fn update_with_file(
        &self,
        id: &SliderImageId,
        draft: SliderImageDraft,
        file: Option<ImageUpload>,
    ) -> Result<SliderImage, SliderError> {
        self.latency.wait().await;
        draft.validate()?;
        if let Some(file) = &file {
            file.validate()?;
        }

        let mut state = self.state.write().await;
        let index = state.position(id)?;
        let previous_url = state
            .images
            .get(index)
            .map(|image| image.image_url.clone())
            .ok_or_else(|| SliderError::NotFound(id.clone()))?;

        let replacement = file.map(|file| {
            state.revoke_blob(&previous_url);
            let name = file.file_name.clone();
            let size = file.size();
            (state.store_blob(file), name, size)
        });

        let image = state
            .images
            .get_mut(index)
            .ok_or_else(|| SliderError::NotFound(id.clone()))?;
        image.name = draft.name;
        image.alt_text = draft.alt_text;
        image.order = draft.order;
        image.is_active = draft.is_active;
        if let Some((url, name, size)) = replacement {
            image.image_url = url;
            image.file_name = Some(name);
            image.file_size = Some(size);
        }
        image.updated_at = Utc::now();

        tracing::info!(id = %image.id, "Slider image updated");
        Ok(image.clone())
    }

    async fn delete(&self, id: &SliderImageId) -> Result<(), SliderError> {
        self.latency.wait().await;

        let mut state = self.state.write().await;
        let index = state.position(id)?;
        let removed = state.images.remove(index);
        state.revoke_blob(&removed.image_url);

        tracing::info!(id = %removed.id, "Slider image deleted");
        Ok(())
    }

    async fn reorder(&self, images: Vec<SliderImage>) -> Result<(), SliderError> {
        self.latency.wait().await;

        let mut state = self.state.write().await;
        state.images = images;
        tracing::info!(count = state.images.len(), "Slider images reordered");
        Ok(())
    }
}

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn seed_slide(
    id: &str,
    name: &str,
    image_url: &str,
    alt_text: &str,
    order: u32,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
) -> SliderImage {
    SliderImage {
        id: SliderImageId::from(id),
        name: name.to_string(),
        image_url: image_url.to_string(),
        alt_text: alt_text.to_string(),
        order,
        is_active: true,
        created_at: created,
        updated_at: updated,
        file_size: None,
        file_name: None,
    }
}

/// Default promotional slides.
#[must_use]
pub fn seed_images() -> Vec<SliderImage> {
    vec![
        seed_slide(
            "1",
            "Tarjetas de Presentación Premium",
            "/slider/banner-3.webp",
            "Special seasonal offer",
            0,
            seed_date(2024, 1, 15),
            seed_date(2024, 1, 15),
        ),
        seed_slide(
            "2",
            "Folletos Corporativos",
            "/slider/banner-6.webp",
            "Discover our new collection",
            1,
            seed_date(2024, 1, 10),
            seed_date(2024, 1, 12),
        ),
        seed_slide(
            "3",
            "Invitaciones de Boda",
            "/slider/banner-7.webp",
            "Free shipping on orders over $50.000",
            2,
            seed_date(2024, 1, 5),
            seed_date(2024, 1, 8),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, order: u32, is_active: bool) -> SliderImageDraft {
        SliderImageDraft {
            name: name.to_string(),
            alt_text: format!("{name} banner"),
            order,
            is_active,
        }
    }

    fn png(len: usize) -> ImageUpload {
        ImageUpload::new("banner.png", "image/png", vec![1; len])
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_order() {
        let mut images = seed_images();
        images.reverse();
        let service = SimulatedSliderService::with_images(images, Latency::None);

        let orders: Vec<u32> = service.list().await.unwrap().iter().map(|i| i.order).collect();
        assert_eq!(orders, [0, 1, 2]);
    }

    #[tokio::test]
    async fn test_list_active_filters_inactive() {
        let service = SimulatedSliderService::new(Latency::None);
        service
            .add_with_file(draft("Hidden slide", 3, false), png(10))
            .await
            .unwrap();

        assert_eq!(service.list().await.unwrap().len(), 4);
        assert_eq!(service.list_active().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_add_stores_blob() {
        let service = SimulatedSliderService::new(Latency::None);
        let image = service
            .add_with_file(draft("Sellos", 3, true), png(32))
            .await
            .unwrap();

        assert!(image.image_url.starts_with(BLOB_URL_PREFIX));
        assert_eq!(image.file_size, Some(32));
        assert_eq!(service.blob(&image.image_url).await.map(|b| b.len()), Some(32));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_upload() {
        let service = SimulatedSliderService::new(Latency::None);
        let gif = ImageUpload::new("a.gif", "image/gif", vec![0; 4]);

        let err = service
            .add_with_file(draft("Sellos", 3, true), gif)
            .await
            .unwrap_err();
        assert!(matches!(err, SliderError::Upload(UploadError::UnsupportedType(_))));
        assert_eq!(service.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_replaces_blob() {
        let service = SimulatedSliderService::new(Latency::None);
        let image = service
            .add_with_file(draft("Sellos", 3, true), png(8))
            .await
            .unwrap();

        let updated = service
            .update_with_file(&image.id, draft("Sellos nuevos", 0, true), Some(png(16)))
            .await
            .unwrap();

        assert_ne!(updated.image_url, image.image_url);
        assert!(service.blob(&image.image_url).await.is_none());
        assert_eq!(service.blob_count().await, 1);
        assert_eq!(updated.name, "Sellos nuevos");
        assert!(updated.updated_at >= image.updated_at);
    }

    #[tokio::test]
    async fn test_update_without_file_keeps_url() {
        let service = SimulatedSliderService::new(Latency::None);
        let id = SliderImageId::from("2");

        let updated = service
            .update_with_file(&id, draft("Folletos", 1, false), None)
            .await
            .unwrap();

        assert_eq!(updated.image_url, "/slider/banner-6.webp");
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_missing_ids_are_errors() {
        let service = SimulatedSliderService::new(Latency::None);
        let ghost = SliderImageId::from("ghost");

        assert!(matches!(
            service.delete(&ghost).await,
            Err(SliderError::NotFound(_))
        ));
        assert!(matches!(
            service.update_with_file(&ghost, draft("Ghost", 0, true), None).await,
            Err(SliderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_revokes_blob() {
        let service = SimulatedSliderService::new(Latency::None);
        let image = service
            .add_with_file(draft("Sellos", 3, true), png(8))
            .await
            .unwrap();

        service.delete(&image.id).await.unwrap();

        assert_eq!(service.blob_count().await, 0);
        assert_eq!(service.list().await.unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency_delays_results() {
        let service = SimulatedSliderService::new(Latency::NETWORK);
        let started = tokio::time::Instant::now();

        service.list().await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed <= Duration::from_millis(500));
    }
}
