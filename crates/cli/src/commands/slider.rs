//! Slider listing.

use imprenta_storefront::services::slider::{Latency, SimulatedSliderService, SliderService};
use tracing::info;

/// Print the seeded slides in display order.
///
/// # Errors
///
/// Returns an error if the slider service fails.
pub async fn list(all: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = SimulatedSliderService::new(Latency::None);
    let images = if all {
        service.list().await?
    } else {
        service.list_active().await?
    };

    if images.is_empty() {
        info!("No slides");
    }

    for image in &images {
        info!(
            id = %image.id,
            order = image.order,
            active = image.is_active,
            url = %image.image_url,
            "{}",
            image.name
        );
    }
    Ok(())
}
