//! HTTP route handlers for storefront.
//!
//! All routes speak JSON. Cart responses carry the notifications raised while
//! handling the request so the browser can show them as toasts.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                           - Health check
//! GET    /health/ready                     - Cart storage readable
//!
//! # Cart
//! GET    /api/cart                         - Cart view
//! POST   /api/cart/items                   - Add a product
//! PATCH  /api/cart/items/{id}              - Set quantity
//! POST   /api/cart/items/{id}/increase     - Stepper "+"
//! POST   /api/cart/items/{id}/decrease     - Stepper "-"
//! DELETE /api/cart/items/{id}              - Remove a line
//! GET    /api/cart/shipping                - Shipping options
//! PUT    /api/cart/shipping                - Select shipping
//! POST   /api/cart/checkout                - Proceed to checkout
//! POST   /api/cart/clear                   - Empty the cart
//! POST   /api/cart/continue                - Catalog redirect
//!
//! # Slider
//! GET    /api/slider                       - Active slides
//! GET    /api/slider/all                   - Every slide
//! POST   /api/slider                       - Create a slide
//! PUT    /api/slider/{id}                  - Update a slide
//! DELETE /api/slider/{id}                  - Delete a slide
//! POST   /api/slider/{id}/move-up          - Swap with the previous slide
//! POST   /api/slider/{id}/move-down        - Swap with the next slide
//! ```

pub mod cart;
pub mod slider;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route(
            "/items/{id}",
            axum::routing::patch(cart::update).delete(cart::remove),
        )
        .route("/items/{id}/increase", post(cart::increase))
        .route("/items/{id}/decrease", post(cart::decrease))
        .route(
            "/shipping",
            get(cart::shipping_options).put(cart::select_shipping),
        )
        .route("/checkout", post(cart::checkout))
        .route("/clear", post(cart::clear))
        .route("/continue", post(cart::continue_shopping))
}

/// Create the slider routes router.
pub fn slider_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(slider::active).post(slider::create))
        .route("/all", get(slider::all))
        .route("/{id}", put(slider::update).delete(slider::delete))
        .route("/{id}/move-up", post(slider::move_up))
        .route("/{id}/move-down", post(slider::move_down))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/cart", cart_routes())
        .nest("/api/slider", slider_routes())
}
