//! Home page carousel.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::models::slider::SliderImage;
use crate::services::notifications::Notifier;
use crate::services::slider::SliderService;

/// Time each slide stays up while autoplay runs.
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_secs(5);

/// Carousel over the active slider images.
///
/// Autoplay is modelled as a deadline: [`SliderCarousel::next_autoplay`]
/// waits for it and advances. Any manual navigation restarts the countdown.
pub struct SliderCarousel<S> {
    service: Arc<S>,
    notifier: Arc<dyn Notifier>,
    images: Vec<SliderImage>,
    current: usize,
    is_loading: bool,
    paused: bool,
    deadline: Option<Instant>,
}

impl<S> std::fmt::Debug for SliderCarousel<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderCarousel")
            .field("images", &self.images.len())
            .field("current", &self.current)
            .field("is_loading", &self.is_loading)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl<S: SliderService> SliderCarousel<S> {
    #[must_use]
    pub const fn new(service: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            notifier,
            images: Vec::new(),
            current: 0,
            is_loading: false,
            paused: false,
            deadline: None,
        }
    }

    /// Fetch the active slides and start autoplay when there is more than one.
    pub async fn load(&mut self) {
        self.is_loading = true;
        match self.service.list_active().await {
            Ok(images) => {
                self.images = images;
                self.current = 0;
                self.restart_autoplay();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load slider images");
                self.notifier
                    .error("Error", "An error occurred while loading the slider images");
            }
        }
        self.is_loading = false;
    }

    #[must_use]
    pub fn images(&self) -> &[SliderImage] {
        &self.images
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Option<&SliderImage> {
        self.images.get(self.current)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the countdown to the next slide is running.
    #[must_use]
    pub const fn is_autoplaying(&self) -> bool {
        self.deadline.is_some()
    }

    /// Jump to `index`. Out-of-range indexes are ignored.
    pub fn go_to(&mut self, index: usize) {
        if index < self.images.len() {
            self.current = index;
            self.restart_autoplay();
        }
    }

    /// Advance, wrapping from the last slide to the first.
    pub fn next(&mut self) {
        if self.images.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.images.len();
        self.restart_autoplay();
    }

    /// Go back, wrapping from the first slide to the last.
    pub fn prev(&mut self) {
        if self.images.is_empty() {
            return;
        }
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.images.len() - 1);
        self.restart_autoplay();
    }

    /// Stop autoplay while the pointer is over the carousel.
    pub const fn pause(&mut self) {
        self.paused = true;
        self.deadline = None;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.restart_autoplay();
    }

    /// Wait for the autoplay deadline and advance one slide.
    ///
    /// Returns `false` immediately when autoplay is not running.
    pub async fn next_autoplay(&mut self) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        tokio::time::sleep_until(deadline).await;
        self.next();
        true
    }

    fn restart_autoplay(&mut self) {
        self.deadline = (!self.paused && self.images.len() > 1)
            .then(|| Instant::now() + AUTOPLAY_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifications::NotificationCenter;
    use crate::services::slider::{Latency, SimulatedSliderService};

    async fn loaded() -> SliderCarousel<SimulatedSliderService> {
        let service = Arc::new(SimulatedSliderService::new(Latency::None));
        let mut carousel = SliderCarousel::new(service, Arc::new(NotificationCenter::new()));
        carousel.load().await;
        carousel
    }

    #[tokio::test]
    async fn test_navigation_wraps() {
        let mut carousel = loaded().await;
        assert_eq!(carousel.images().len(), 3);

        carousel.prev();
        assert_eq!(carousel.current_index(), 2);
        carousel.next();
        assert_eq!(carousel.current_index(), 0);

        carousel.go_to(1);
        assert_eq!(carousel.current().map(|s| s.name.as_str()), Some("Folletos Corporativos"));
        carousel.go_to(9);
        assert_eq!(carousel.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_advances_after_interval() {
        let mut carousel = loaded().await;
        let started = Instant::now();

        assert!(carousel.next_autoplay().await);

        assert_eq!(carousel.current_index(), 1);
        assert!(started.elapsed() >= AUTOPLAY_INTERVAL);
    }

    #[tokio::test]
    async fn test_pause_stops_autoplay() {
        let mut carousel = loaded().await;
        carousel.pause();
        assert!(!carousel.is_autoplaying());
        assert!(!carousel.next_autoplay().await);

        carousel.resume();
        assert!(carousel.is_autoplaying());
    }

    #[tokio::test]
    async fn test_single_slide_does_not_autoplay() {
        let service = Arc::new(SimulatedSliderService::with_images(
            crate::services::slider::seed_images().into_iter().take(1).collect(),
            Latency::None,
        ));
        let mut carousel = SliderCarousel::new(service, Arc::new(NotificationCenter::new()));
        carousel.load().await;

        assert!(!carousel.is_autoplaying());
        carousel.next();
        assert_eq!(carousel.current_index(), 0);
    }
}
