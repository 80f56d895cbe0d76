//! Slider management page for administrators.

use std::sync::Arc;

use imprenta_core::{SliderImageId, UserRole};
use tokio::sync::watch;

use crate::components::BusyFlag;
use crate::models::slider::{ImageUpload, SliderImage, SliderImageDraft};
use crate::services::notifications::{ConfirmPrompt, Confirmer, Notifier};
use crate::services::slider::SliderService;

/// Create, edit, delete and reorder carousel slides.
pub struct SliderAdminPage<S> {
    service: Arc<S>,
    notifier: Arc<dyn Notifier>,
    role: UserRole,
    images: Vec<SliderImage>,
    is_loading: bool,
    submitting: watch::Sender<bool>,
    reordering: watch::Sender<bool>,
}

impl<S> std::fmt::Debug for SliderAdminPage<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderAdminPage")
            .field("role", &self.role)
            .field("images", &self.images.len())
            .field("is_loading", &self.is_loading)
            .finish_non_exhaustive()
    }
}

impl<S: SliderService> SliderAdminPage<S> {
    #[must_use]
    pub fn new(service: Arc<S>, notifier: Arc<dyn Notifier>, role: UserRole) -> Self {
        Self {
            service,
            notifier,
            role,
            images: Vec::new(),
            is_loading: true,
            submitting: watch::channel(false).0,
            reordering: watch::channel(false).0,
        }
    }

    /// Whether edit controls are rendered. Nothing else is gated.
    #[must_use]
    pub const fn shows_admin_controls(&self) -> bool {
        self.role.shows_admin_controls()
    }

    #[must_use]
    pub fn images(&self) -> &[SliderImage] {
        &self.images
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        *self.submitting.borrow()
    }

    #[must_use]
    pub fn is_reordering(&self) -> bool {
        *self.reordering.borrow()
    }

    #[must_use]
    pub fn watch_reordering(&self) -> watch::Receiver<bool> {
        self.reordering.subscribe()
    }

    /// Reload every slide, active or not.
    pub async fn load(&mut self) {
        self.is_loading = true;
        match self.service.list().await {
            Ok(images) => self.images = images,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load slider images");
                self.notifier
                    .error("Error", "An error occurred while loading the slider images");
            }
        }
        self.is_loading = false;
    }

    /// Blank form for a new slide, placed after the existing ones.
    #[must_use]
    pub fn new_draft(&self) -> SliderImageDraft {
        SliderImageDraft {
            name: String::new(),
            alt_text: String::new(),
            order: u32::try_from(self.images.len()).unwrap_or(u32::MAX),
            is_active: true,
        }
    }

    /// Form prefilled from an existing slide.
    #[must_use]
    pub fn edit_draft(&self, id: &SliderImageId) -> Option<SliderImageDraft> {
        self.images.iter().find(|image| &image.id == id).map(|image| SliderImageDraft {
            name: image.name.clone(),
            alt_text: image.alt_text.clone(),
            order: image.order,
            is_active: image.is_active,
        })
    }

    fn check_form(&self, draft: &SliderImageDraft, file: Option<&ImageUpload>) -> bool {
        if let Err(e) = draft.validate() {
            self.notifier.warning("Invalid form", &e.to_string());
            return false;
        }
        if let Some(file) = file
            && file.validate().is_err()
        {
            self.notifier.warning(
                "Invalid file",
                "Invalid file format. Use JPEG, JPG, PNG or WEBP (max. 2MB)",
            );
            return false;
        }
        true
    }

    /// Submit a new slide. Returns the created slide.
    pub async fn create(
        &mut self,
        draft: SliderImageDraft,
        file: ImageUpload,
    ) -> Option<SliderImage> {
        if !self.check_form(&draft, Some(&file)) {
            return None;
        }

        let result = {
            let _busy = BusyFlag::raise(&self.submitting);
            self.service.add_with_file(draft, file).await
        };

        match result {
            Ok(image) => {
                self.notifier
                    .success("Image added", "The image was added successfully");
                self.load().await;
                Some(image)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to add slider image");
                self.notifier
                    .error("Error", "An error occurred while adding the image");
                None
            }
        }
    }

    /// Submit changes to a slide. The file is optional when editing.
    pub async fn update(
        &mut self,
        id: &SliderImageId,
        draft: SliderImageDraft,
        file: Option<ImageUpload>,
    ) -> Option<SliderImage> {
        if !self.check_form(&draft, file.as_ref()) {
            return None;
        }

        let result = {
            let _busy = BusyFlag::raise(&self.submitting);
            self.service.update_with_file(id, draft, file).await
        };

        match result {
            Ok(image) => {
                self.notifier
                    .success("Image updated", "The image was updated successfully");
                self.load().await;
                Some(image)
            }
            Err(e) => {
                tracing::error!(error = %e, id = %id, "Failed to update slider image");
                self.notifier
                    .error("Error", "An error occurred while updating the image");
                None
            }
        }
    }

    /// Delete a slide after confirmation.
    ///
    /// The slide leaves the local list before the service call and comes
    /// back through a reload if the call fails.
    pub async fn delete<C: Confirmer>(&mut self, id: &SliderImageId, confirmer: &C) -> bool {
        let Some(image) = self.images.iter().find(|image| &image.id == id) else {
            return false;
        };

        let prompt = ConfirmPrompt::delete(&image.name, "slider image");
        if !confirmer.confirm(&prompt).await {
            return false;
        }

        self.images.retain(|image| &image.id != id);
        match self.service.delete(id).await {
            Ok(()) => {
                self.notifier
                    .success("Image deleted", "The image was deleted successfully");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, id = %id, "Failed to delete slider image");
                self.notifier
                    .error("Error", "An error occurred while deleting the image");
                self.load().await;
                false
            }
        }
    }

    /// Swap the slide at `index` with the one above it.
    pub async fn move_up(&mut self, index: usize) -> bool {
        if index == 0 {
            return false;
        }
        self.swap_and_save(index - 1, index).await
    }

    /// Swap the slide at `index` with the one below it.
    pub async fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.images.len() {
            return false;
        }
        self.swap_and_save(index, index + 1).await
    }

    async fn swap_and_save(&mut self, a: usize, b: usize) -> bool {
        if self.is_reordering() || b >= self.images.len() {
            return false;
        }

        let busy = BusyFlag::raise(&self.reordering);
        self.images.swap(a, b);
        for (order, image) in (0u32..).zip(self.images.iter_mut()) {
            image.order = order;
        }

        match self.service.reorder(self.images.clone()).await {
            Ok(()) => {
                self.notifier.success("Success", "Order updated successfully");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reorder slider images");
                self.notifier.error("Error", "The order could not be updated");
                drop(busy);
                self.load().await;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifications::{NotificationCenter, PresetAnswer, Severity};
    use crate::services::slider::{Latency, SimulatedSliderService};

    async fn admin() -> (SliderAdminPage<SimulatedSliderService>, Arc<NotificationCenter>) {
        let center = Arc::new(NotificationCenter::new());
        let service = Arc::new(SimulatedSliderService::new(Latency::None));
        let mut page = SliderAdminPage::new(service, center.clone(), UserRole::RoleAdmin);
        page.load().await;
        (page, center)
    }

    fn png() -> ImageUpload {
        ImageUpload::new("promo.png", "image/png", vec![9; 64])
    }

    #[tokio::test]
    async fn test_load_lists_all_slides() {
        let (page, _) = admin().await;
        assert!(page.shows_admin_controls());
        assert!(!page.is_loading());
        assert_eq!(page.images().len(), 3);
        assert_eq!(page.new_draft().order, 3);
    }

    #[tokio::test]
    async fn test_create_appends_and_notifies() {
        let (mut page, center) = admin().await;
        let mut draft = page.new_draft();
        draft.name = "Sellos".to_string();
        draft.alt_text = "Sellos personalizados".to_string();

        let created = page.create(draft, png()).await;

        assert!(created.is_some());
        assert_eq!(page.images().len(), 4);
        assert!(!page.is_submitting());
        assert_eq!(center.drain()[0].severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_invalid_form_warns_without_calling_service() {
        let (mut page, center) = admin().await;
        let mut draft = page.new_draft();
        draft.name = "Sellos".to_string();
        draft.alt_text = "abc".to_string();

        assert!(page.create(draft.clone(), png()).await.is_none());
        draft.alt_text = "Sellos personalizados".to_string();
        let gif = ImageUpload::new("a.gif", "image/gif", vec![0; 4]);
        assert!(page.create(draft, gif).await.is_none());

        assert_eq!(page.images().len(), 3);
        let notes = center.drain();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.severity == Severity::Warning));
    }

    #[tokio::test]
    async fn test_edit_keeps_file_when_none_given() {
        let (mut page, _) = admin().await;
        let id = SliderImageId::from("3");
        let mut draft = page.edit_draft(&id).unwrap();
        draft.is_active = false;

        let updated = page.update(&id, draft, None).await.unwrap();

        assert_eq!(updated.image_url, "/slider/banner-7.webp");
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (mut page, _) = admin().await;
        let id = SliderImageId::from("1");

        assert!(!page.delete(&id, &PresetAnswer(false)).await);
        assert_eq!(page.images().len(), 3);

        assert!(page.delete(&id, &PresetAnswer(true)).await);
        assert_eq!(page.images().len(), 2);
    }

    #[tokio::test]
    async fn test_move_renumbers_orders() {
        let (mut page, _) = admin().await;

        assert!(page.move_down(0).await);
        let ids: Vec<&str> = page.images().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);
        let orders: Vec<u32> = page.images().iter().map(|i| i.order).collect();
        assert_eq!(orders, [0, 1, 2]);
        assert!(!page.is_reordering());

        page.load().await;
        assert_eq!(page.images()[0].id.as_str(), "2");
    }

    #[tokio::test]
    async fn test_move_out_of_bounds_is_noop() {
        let (mut page, center) = admin().await;
        assert!(!page.move_up(0).await);
        assert!(!page.move_down(2).await);
        assert!(center.pending().is_empty());
    }
}
