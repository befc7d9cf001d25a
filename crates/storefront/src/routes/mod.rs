//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//! GET  /products               - Product listing
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count fragment, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment, toast)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout (HTMX fragments)
//! GET  /checkout               - Checkout page (three forms + order summary)
//! POST /checkout/shipping      - Save shipping address (form fragment)
//! POST /checkout/billing       - Save billing address (form fragment)
//! POST /checkout/payment       - Save payment information (form fragment)
//! POST /checkout/same-address  - Same-address toggle (billing panel fragment)
//! POST /checkout/place-order   - Place order (toast only)
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::Session;
use uuid::Uuid;

use stride_core::{CartStore, LoadOutcome};

use crate::error::Result;
use crate::middleware;
use crate::models::session_keys;
use crate::state::AppState;
use crate::storage::VisitorStorage;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/shipping", post(checkout::submit_shipping))
        .route("/billing", post(checkout::submit_billing))
        .route("/payment", post(checkout::submit_payment))
        .route("/same-address", post(checkout::toggle_same_address))
        .route("/place-order", post(checkout::place_order))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product listing
        .route("/products", get(products::index))
        // Cart routes
        .nest("/cart", cart_routes().layer(middleware::form_rate_limiter()))
        // Checkout routes
        .nest(
            "/checkout",
            checkout_routes().layer(middleware::form_rate_limiter()),
        )
}

/// Assemble the full application router: routes, static assets, sessions,
/// and the shared middleware stack. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the visitor id from the session, minting one on first touch.
pub(crate) async fn visitor_id(session: &Session) -> Result<String> {
    if let Some(id) = session.get::<String>(session_keys::VISITOR_ID).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    session.insert(session_keys::VISITOR_ID, &id).await?;
    Ok(id)
}

/// Load the visitor's cart store from the vault.
///
/// Corrupted persisted data has already been cleared by the core store when
/// this returns; it is logged here because the visitor's cart silently reset.
pub(crate) async fn visitor_cart(
    state: &AppState,
    session: &Session,
) -> Result<CartStore<VisitorStorage>> {
    let visitor = visitor_id(session).await?;
    let storage = state.carts().for_visitor(&visitor);
    let (store, outcome) = CartStore::load(storage)?;
    if outcome == LoadOutcome::RecoveredFromCorruption {
        tracing::warn!("discarded corrupted cart entry; visitor starts with an empty cart");
    }
    Ok(store)
}
