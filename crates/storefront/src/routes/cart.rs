//! Cart route handlers.
//!
//! Every handler locks the cart page for its whole run and answers with the
//! refreshed [`CartView`], including the notifications raised along the way.

use axum::{
    Json,
    extract::{Path, State},
};
use imprenta_core::{CartItemId, Product};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::ShippingOption;
use crate::components::{CartBadge, SummaryIntent};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::cart::CartSnapshot;
use crate::pages::{CartPage, CheckoutOutcome, ClearOutcome, NavigationLog};
use crate::services::notifications::{Notification, PresetAnswer};
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub cart: CartSnapshot,
    pub badge: CartBadge,
    pub is_shipping_free: bool,
    pub free_shipping_text: String,
    pub can_checkout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
    pub notifications: Vec<Notification>,
}

impl CartView {
    fn render(page: &CartPage, state: &AppState) -> Self {
        let panel = page.summary_panel();
        Self {
            cart: page.store().snapshot(),
            badge: page.badge(),
            is_shipping_free: panel.is_shipping_free(),
            free_shipping_text: panel.free_shipping_text(),
            can_checkout: panel.can_checkout(),
            empty_message: page.is_empty().then(|| page.empty_message()),
            notifications: state.notifications().drain(),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartBody {
    pub product: Product,
    pub quantity: Option<u32>,
}

/// Set quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityBody {
    pub quantity: i64,
}

/// Shipping selection request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectShippingBody {
    pub shipping_id: String,
}

/// Clear cart request body. The browser asks the customer first.
#[derive(Debug, Deserialize)]
pub struct ClearCartBody {
    pub confirmed: bool,
}

/// Response of a flow that has an outcome besides the cart.
#[derive(Debug, Serialize)]
pub struct FlowResponse<T> {
    pub outcome: T,
    #[serde(flatten)]
    pub view: CartView,
}

/// Navigation response.
#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub redirect: Option<String>,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let page = state.cart().lock().await;
    Json(CartView::render(&page, &state))
}

/// Add a product to the cart.
#[instrument(skip(state, body))]
pub async fn add(State(state): State<AppState>, Json(body): Json<AddToCartBody>) -> Json<CartView> {
    let mut page = state.cart().lock().await;
    let product_id = body.product.id.to_string();
    add_breadcrumb("cart", "Added product", Some(&[("product_id", product_id.as_str())]));

    page.store_mut()
        .add_item(&body.product, body.quantity.unwrap_or(1));
    Json(CartView::render(&page, &state))
}

/// Set the quantity of a line.
///
/// Goes through the row control, so the stock check and the quantity delay
/// apply. Unknown ids leave the cart untouched.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(body): Json<UpdateQuantityBody>,
) -> Json<CartView> {
    let mut page = state.cart().lock().await;
    let item_id = CartItemId::from(item_id);

    if let Some(row) = page.item_control(&item_id) {
        if let Some(intent) = row.update_quantity(body.quantity).await {
            page.apply(intent);
        }
    } else {
        page.on_quantity_changed(&item_id, body.quantity);
    }
    Json(CartView::render(&page, &state))
}

/// Quantity stepper "+".
#[instrument(skip(state))]
pub async fn increase(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<CartView>> {
    let mut page = state.cart().lock().await;
    let row = page
        .item_control(&CartItemId::from(item_id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("cart item {item_id}")))?;

    if let Some(intent) = row.increase().await {
        page.apply(intent);
    }
    Ok(Json(CartView::render(&page, &state)))
}

/// Quantity stepper "-". Removes the line at one unit.
#[instrument(skip(state))]
pub async fn decrease(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<CartView>> {
    let mut page = state.cart().lock().await;
    let row = page
        .item_control(&CartItemId::from(item_id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("cart item {item_id}")))?;

    if let Some(intent) = row.decrease().await {
        page.apply(intent);
    }
    Ok(Json(CartView::render(&page, &state)))
}

/// Remove a line. Unknown ids leave the cart untouched.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(item_id): Path<String>) -> Json<CartView> {
    let mut page = state.cart().lock().await;
    let item_id = CartItemId::from(item_id);

    match page.item_control(&item_id) {
        Some(row) => {
            let intent = row.confirm_remove().await;
            page.apply(intent);
        }
        None => page.on_item_removed(&item_id),
    }
    Json(CartView::render(&page, &state))
}

/// List the shipping options.
#[instrument(skip(state))]
pub async fn shipping_options(State(state): State<AppState>) -> Json<&'static [ShippingOption]> {
    let page = state.cart().lock().await;
    Json(page.store().shipping_options())
}

/// Select a shipping option. Unknown ids clear the selection.
#[instrument(skip(state))]
pub async fn select_shipping(
    State(state): State<AppState>,
    Json(body): Json<SelectShippingBody>,
) -> Json<CartView> {
    let mut page = state.cart().lock().await;
    let intent = page.summary_panel().select_shipping(&body.shipping_id);
    page.apply_summary(intent).await;
    Json(CartView::render(&page, &state))
}

/// Proceed to checkout.
///
/// `outcome` is `null` when the summary panel blocks checkout (no shipping
/// selected or nothing to pay).
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Json<FlowResponse<Option<CheckoutOutcome>>> {
    let mut page = state.cart().lock().await;

    let outcome = if page.summary_panel().request_checkout() {
        page.apply_summary(SummaryIntent::CheckoutRequested).await
    } else {
        None
    };

    Json(FlowResponse {
        outcome,
        view: CartView::render(&page, &state),
    })
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    Json(body): Json<ClearCartBody>,
) -> Json<FlowResponse<ClearOutcome>> {
    let mut page = state.cart().lock().await;
    let outcome = page.clear_cart(&PresetAnswer(body.confirmed)).await;

    Json(FlowResponse {
        outcome,
        view: CartView::render(&page, &state),
    })
}

/// "Continue shopping" target.
#[instrument(skip(state))]
pub async fn continue_shopping(State(state): State<AppState>) -> Json<RedirectResponse> {
    let page = state.cart().lock().await;
    let navigator = NavigationLog::new();
    page.continue_shopping(&navigator);

    Json(RedirectResponse {
        redirect: navigator.last(),
    })
}
