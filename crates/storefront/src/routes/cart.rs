//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the visitor-scoped vault; every mutation goes
//! through the core cart store, which writes the full line sequence back on
//! each accepted operation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use stride_core::{CartLine, CartStore, storage::Storage};

use crate::catalog;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

use super::visitor_cart;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Build the display cart from the store's current state.
    pub fn from_store<S: Storage>(store: &CartStore<S>) -> Self {
        Self {
            items: store.lines().iter().map(CartItemView::from).collect(),
            subtotal: format_price(store.subtotal()),
            shipping: format_price(stride_core::SHIPPING_COST),
            total: format_price(store.total()),
            item_count: store.item_count(),
        }
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Format a decimal amount as a display price string.
pub(crate) fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            image_url: line.image_url.clone(),
            quantity: line.quantity,
            price: format_price(line.price),
            line_price: format_price(line.line_total()),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let store = visitor_cart(&state, &session).await?;
    Ok(CartShowTemplate {
        cart: CartView::from_store(&store),
    })
}

/// Add item to cart (HTMX).
///
/// Looks the product up in the catalog and merges it into the visitor's
/// cart. Returns the cart count badge with a trigger so other fragments
/// refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = catalog::find(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut store = visitor_cart(&state, &session).await?;
    store.add_line(product.to_cart_line(form.quantity.unwrap_or(1)))?;

    let trigger = serde_json::json!({
        "cart-updated": "",
        "toast": format!("{} added to cart", product.name),
    })
    .to_string();

    Ok((
        AppendHeaders([("HX-Trigger", trigger)]),
        CartCountTemplate {
            count: store.item_count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
///
/// Quantities below one are ignored by the store, so the re-rendered
/// fragment simply shows the unchanged line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut store = visitor_cart(&state, &session).await?;
    store.set_quantity(&form.line_id, form.quantity)?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_store(&store),
        },
    )
        .into_response())
}

/// Remove item from cart (HTMX).
///
/// Removing an id that matches nothing is a no-op; the toast only fires
/// when a line actually went away.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut store = visitor_cart(&state, &session).await?;
    let removed = store.remove_line(&form.line_id)?;

    let trigger = if removed {
        serde_json::json!({
            "cart-updated": "",
            "toast": "Item removed from cart",
        })
        .to_string()
    } else {
        serde_json::json!({ "cart-updated": "" }).to_string()
    };

    Ok((
        AppendHeaders([("HX-Trigger", trigger)]),
        CartItemsTemplate {
            cart: CartView::from_store(&store),
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let store = visitor_cart(&state, &session).await?;
    Ok(CartCountTemplate {
        count: store.item_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(Decimal::new(9999, 2)), "$99.99");
        assert_eq!(format_price(Decimal::TEN), "$10.00");
        assert_eq!(format_price(Decimal::new(36997, 2)), "$369.97");
    }

    #[test]
    fn test_cart_item_view_from_line() {
        let line = CartLine {
            id: "running-shoe".to_string(),
            name: "Running Shoe".to_string(),
            price: Decimal::new(9999, 2),
            image_url: "https://images.example/shoe.jpg".to_string(),
            quantity: 2,
        };
        let view = CartItemView::from(&line);
        assert_eq!(view.price, "$99.99");
        assert_eq!(view.line_price, "$199.98");
        assert_eq!(view.quantity, 2);
    }
}
