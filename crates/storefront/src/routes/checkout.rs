//! Checkout route handlers.
//!
//! Three independently submitted field sets (shipping, billing, payment)
//! rendered as HTMX fragments, plus the same-address toggle and the order
//! summary. Form state lives in the core checkout coordinator, carried in
//! the session; validation failures re-render the fragment with per-field
//! errors and no notification.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use stride_core::{AddressRecord, CheckoutCoordinator, FieldErrors, PaymentRecord};

use crate::error::Result;
use crate::filters;
use crate::models::session_keys;
use crate::state::AppState;

use super::cart::CartView;
use super::visitor_cart;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the checkout coordinator from the session, or a fresh one.
async fn load_checkout(session: &Session) -> Result<CheckoutCoordinator> {
    Ok(session
        .get::<CheckoutCoordinator>(session_keys::CHECKOUT)
        .await?
        .unwrap_or_default())
}

/// Write the checkout coordinator back to the session.
async fn save_checkout(session: &Session, coordinator: &CheckoutCoordinator) -> Result<()> {
    session.insert(session_keys::CHECKOUT, coordinator).await?;
    Ok(())
}

// =============================================================================
// Form Views
// =============================================================================

/// One rendered input: current value plus inline error, if any.
#[derive(Clone, Default)]
pub struct FieldView {
    pub value: String,
    pub error: Option<String>,
}

impl FieldView {
    fn new(value: &str, errors: Option<&FieldErrors>, key: &str) -> Self {
        Self {
            value: value.to_string(),
            error: errors
                .and_then(|e| e.message(key))
                .map(ToString::to_string),
        }
    }
}

/// Address field set display data for templates.
#[derive(Clone)]
pub struct AddressFormView {
    pub first_name: FieldView,
    pub last_name: FieldView,
    pub address: FieldView,
    pub city: FieldView,
    pub state: FieldView,
    pub zip_code: FieldView,
    pub country: FieldView,
}

impl AddressFormView {
    fn build(record: &AddressRecord, errors: Option<&FieldErrors>) -> Self {
        Self {
            first_name: FieldView::new(&record.first_name, errors, "firstName"),
            last_name: FieldView::new(&record.last_name, errors, "lastName"),
            address: FieldView::new(&record.address, errors, "address"),
            city: FieldView::new(&record.city, errors, "city"),
            state: FieldView::new(&record.state, errors, "state"),
            zip_code: FieldView::new(&record.zip_code, errors, "zipCode"),
            country: FieldView::new(&record.country, errors, "country"),
        }
    }
}

/// Payment field set display data for templates.
#[derive(Clone)]
pub struct PaymentFormView {
    pub cardholder_name: FieldView,
    pub card_number: FieldView,
    pub expiry_date: FieldView,
    pub cvv: FieldView,
}

impl PaymentFormView {
    fn build(record: &PaymentRecord, errors: Option<&FieldErrors>) -> Self {
        Self {
            cardholder_name: FieldView::new(&record.cardholder_name, errors, "cardholderName"),
            card_number: FieldView::new(&record.card_number, errors, "cardNumber"),
            expiry_date: FieldView::new(&record.expiry_date, errors, "expiryDate"),
            cvv: FieldView::new(&record.cvv, errors, "cvv"),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Same-address toggle form data: the checkbox plus the live shipping field
/// values (the page includes the shipping form in the request, so the copy
/// uses what the visitor typed, submitted or not).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SameAddressForm {
    /// Present when the checkbox is checked.
    pub same_address: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl SameAddressForm {
    fn enabled(&self) -> bool {
        self.same_address.is_some()
    }

    fn shipping_values(self) -> AddressRecord {
        AddressRecord {
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub shipping: AddressFormView,
    pub billing: AddressFormView,
    pub same_address: bool,
    pub payment: PaymentFormView,
    pub cart: CartView,
}

/// Shipping form fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/shipping_form.html")]
pub struct ShippingFormTemplate {
    pub shipping: AddressFormView,
}

/// Billing panel fragment template: the same-address toggle plus the billing
/// form (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/billing_panel.html")]
pub struct BillingPanelTemplate {
    pub billing: AddressFormView,
    pub same_address: bool,
}

/// Payment form fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/payment_form.html")]
pub struct PaymentFormTemplate {
    pub payment: PaymentFormView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<CheckoutShowTemplate> {
    let coordinator = load_checkout(&session).await?;
    let store = visitor_cart(&state, &session).await?;

    Ok(CheckoutShowTemplate {
        shipping: AddressFormView::build(coordinator.shipping(), None),
        billing: AddressFormView::build(coordinator.billing(), None),
        same_address: coordinator.same_address(),
        payment: PaymentFormView::build(&PaymentRecord::default(), None),
        cart: CartView::from_store(&store),
    })
}

/// Save the shipping address (HTMX).
#[instrument(skip(session))]
pub async fn submit_shipping(
    session: Session,
    Form(record): Form<AddressRecord>,
) -> Result<Response> {
    let mut coordinator = load_checkout(&session).await?;

    match coordinator.submit_shipping(record.clone()) {
        Ok(()) => {
            save_checkout(&session, &coordinator).await?;
            let trigger =
                serde_json::json!({ "toast": "Shipping address saved!" }).to_string();
            Ok((
                AppendHeaders([("HX-Trigger", trigger)]),
                ShippingFormTemplate {
                    shipping: AddressFormView::build(coordinator.shipping(), None),
                },
            )
                .into_response())
        }
        Err(errors) => Ok(ShippingFormTemplate {
            shipping: AddressFormView::build(&record, Some(&errors)),
        }
        .into_response()),
    }
}

/// Save the billing address (HTMX).
///
/// While the same-address toggle is on the field set is non-editable, so a
/// submit arriving anyway just re-renders the locked panel.
#[instrument(skip(session))]
pub async fn submit_billing(
    session: Session,
    Form(record): Form<AddressRecord>,
) -> Result<Response> {
    let mut coordinator = load_checkout(&session).await?;

    if coordinator.same_address() {
        return Ok(BillingPanelTemplate {
            billing: AddressFormView::build(coordinator.billing(), None),
            same_address: true,
        }
        .into_response());
    }

    match coordinator.submit_billing(record.clone()) {
        Ok(()) => {
            save_checkout(&session, &coordinator).await?;
            let trigger = serde_json::json!({ "toast": "Billing address saved!" }).to_string();
            Ok((
                AppendHeaders([("HX-Trigger", trigger)]),
                BillingPanelTemplate {
                    billing: AddressFormView::build(coordinator.billing(), None),
                    same_address: false,
                },
            )
                .into_response())
        }
        Err(errors) => Ok(BillingPanelTemplate {
            billing: AddressFormView::build(&record, Some(&errors)),
            same_address: false,
        }
        .into_response()),
    }
}

/// Save the payment information (HTMX).
///
/// Card details are validated and acknowledged; they are never stored.
#[instrument(skip(session, record))]
pub async fn submit_payment(
    session: Session,
    Form(record): Form<PaymentRecord>,
) -> Result<Response> {
    let coordinator = load_checkout(&session).await?;

    match coordinator.submit_payment(&record) {
        Ok(()) => {
            let trigger =
                serde_json::json!({ "toast": "Payment information saved!" }).to_string();
            Ok((
                AppendHeaders([("HX-Trigger", trigger)]),
                PaymentFormTemplate {
                    payment: PaymentFormView::build(&record, None),
                },
            )
                .into_response())
        }
        Err(errors) => Ok(PaymentFormTemplate {
            payment: PaymentFormView::build(&record, Some(&errors)),
        }
        .into_response()),
    }
}

/// Flip the same-address toggle (HTMX).
///
/// Copies the live shipping values into billing, or clears billing, and
/// re-renders the billing panel in its new editable state.
#[instrument(skip(session))]
pub async fn toggle_same_address(
    session: Session,
    Form(form): Form<SameAddressForm>,
) -> Result<BillingPanelTemplate> {
    let mut coordinator = load_checkout(&session).await?;

    let enabled = form.enabled();
    coordinator.set_same_address(enabled, form.shipping_values());
    save_checkout(&session, &coordinator).await?;

    Ok(BillingPanelTemplate {
        billing: AddressFormView::build(coordinator.billing(), None),
        same_address: enabled,
    })
}

/// Place the order (HTMX).
///
/// There is no order pipeline behind this; it acknowledges unconditionally
/// and independently of the three forms' validation state.
#[instrument]
pub async fn place_order() -> Response {
    tracing::info!("order placed");
    let trigger = serde_json::json!({ "toast": "Order placed successfully!" }).to_string();
    (AppendHeaders([("HX-Trigger", trigger)]), StatusCode::OK).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use stride_core::validate_address;

    fn record() -> AddressRecord {
        AddressRecord {
            first_name: "J".to_string(),
            last_name: "Doe".to_string(),
            address: "12 Elm St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
            country: "USA".to_string(),
        }
    }

    #[test]
    fn test_address_form_view_maps_errors_to_fields() {
        let record = record();
        let errors = validate_address(&record).unwrap_err();
        let view = AddressFormView::build(&record, Some(&errors));

        assert_eq!(view.first_name.value, "J");
        assert_eq!(
            view.first_name.error.as_deref(),
            Some("First name must be at least 2 characters.")
        );
        assert!(view.last_name.error.is_none());
        assert_eq!(view.zip_code.value, "62704");
    }

    #[test]
    fn test_same_address_form_checkbox_semantics() {
        let checked = SameAddressForm {
            same_address: Some("on".to_string()),
            ..SameAddressForm::default()
        };
        assert!(checked.enabled());

        let unchecked = SameAddressForm::default();
        assert!(!unchecked.enabled());
    }
}
