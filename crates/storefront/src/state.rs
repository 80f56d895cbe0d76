//! Application state shared across handlers.

use std::sync::Arc;

use imprenta_core::UserRole;
use tokio::sync::Mutex;

use crate::cart::{CartStore, FileStorage, StorageProvider};
use crate::config::StorefrontConfig;
use crate::pages::{CartPage, SliderAdminPage};
use crate::services::notifications::NotificationCenter;
use crate::services::slider::SimulatedSliderService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart page sits behind an
/// async mutex that handlers hold for the whole request, so cart mutations
/// never interleave.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storage: Arc<dyn StorageProvider>,
    notifications: Arc<NotificationCenter>,
    cart: Mutex<CartPage>,
    slider: Arc<SimulatedSliderService>,
    slider_admin: Mutex<SliderAdminPage<SimulatedSliderService>>,
}

impl AppState {
    /// Create application state backed by the configured storage file.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storage = Arc::new(FileStorage::new(&config.storage_path));
        Self::with_storage(config, storage)
    }

    /// Create application state over an explicit storage provider.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn StorageProvider>) -> Self {
        let notifications = Arc::new(NotificationCenter::new());
        let store = CartStore::with_key(
            Arc::clone(&storage),
            notifications.clone(),
            config.storage_key.clone(),
        );
        let cart = CartPage::new(store, config.delays);

        let slider = Arc::new(SimulatedSliderService::new(config.slider_latency()));
        let slider_admin =
            SliderAdminPage::new(Arc::clone(&slider), notifications.clone(), UserRole::RoleAdmin);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                notifications,
                cart: Mutex::new(cart),
                slider,
                slider_admin: Mutex::new(slider_admin),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Storage backing the cart.
    #[must_use]
    pub fn storage(&self) -> &dyn StorageProvider {
        self.inner.storage.as_ref()
    }

    /// Notifications waiting to be shown to the customer.
    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }

    /// The cart page controller.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartPage> {
        &self.inner.cart
    }

    /// The slider service.
    #[must_use]
    pub fn slider(&self) -> &SimulatedSliderService {
        &self.inner.slider
    }

    /// The slider management page controller.
    #[must_use]
    pub fn slider_admin(&self) -> &Mutex<SliderAdminPage<SimulatedSliderService>> {
        &self.inner.slider_admin
    }
}
