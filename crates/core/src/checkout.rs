//! Checkout form records, validation, and the form coordinator.
//!
//! Three independently validated field sets (shipping address, billing
//! address, payment) plus one cross-field rule: the same-address toggle,
//! which mirrors shipping into billing while active. Validation is pure -
//! each record type has a function returning a structured per-field result,
//! decoupled from any UI binding.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// 5-digit or 5+4-digit US postal code.
static ZIP_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{5}(?:-[0-9]{4})?$").expect("zip code pattern is valid")
});

/// Exactly 16 digits.
static CARD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("card number pattern is valid"));

/// MM/YY with MM in 01-12; the slash is optional.
static EXPIRY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/?([0-9]{2})$").expect("expiry date pattern is valid")
});

/// 3 or 4 digits.
static CVV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("cvv pattern is valid"));

/// A shipping or billing address. Two independent instances exist during
/// checkout; neither outlives the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressRecord {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Card details. Transient: validated and acknowledged, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentRecord {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field key in the record's wire naming (e.g. `firstName`).
    pub field: String,
    /// Human-readable message, shown beside the input.
    pub message: String,
}

/// All field-level failures for one submitted record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    fn push(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.to_owned(),
            message: message.to_owned(),
        });
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Iterate over all failures.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn check_min_len(errors: &mut FieldErrors, field: &str, value: &str, min: usize, label: &str) {
    if value.chars().count() < min {
        errors.push(
            field,
            &format!("{label} must be at least {min} characters."),
        );
    }
}

/// Validate an address field set. All rules must pass simultaneously for the
/// set to be considered valid.
///
/// # Errors
///
/// Returns one [`FieldError`] per failing field.
pub fn validate_address(record: &AddressRecord) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_min_len(&mut errors, "firstName", &record.first_name, 2, "First name");
    check_min_len(&mut errors, "lastName", &record.last_name, 2, "Last name");
    check_min_len(&mut errors, "address", &record.address, 5, "Address");
    check_min_len(&mut errors, "city", &record.city, 2, "City");
    check_min_len(&mut errors, "state", &record.state, 2, "State");
    if !ZIP_CODE.is_match(&record.zip_code) {
        errors.push("zipCode", "Invalid ZIP code.");
    }
    check_min_len(&mut errors, "country", &record.country, 2, "Country");
    errors.into_result()
}

/// Validate a payment field set.
///
/// # Errors
///
/// Returns one [`FieldError`] per failing field.
pub fn validate_payment(record: &PaymentRecord) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_min_len(
        &mut errors,
        "cardholderName",
        &record.cardholder_name,
        2,
        "Cardholder name",
    );
    if !CARD_NUMBER.is_match(&record.card_number) {
        errors.push("cardNumber", "Invalid card number.");
    }
    if !EXPIRY_DATE.is_match(&record.expiry_date) {
        errors.push("expiryDate", "Invalid expiry date.");
    }
    if !CVV.is_match(&record.cvv) {
        errors.push("cvv", "Invalid CVV.");
    }
    errors.into_result()
}

/// The same-address transformation: the billing record that results from
/// flipping the toggle.
///
/// Enabled copies every shipping field verbatim; disabled resets every
/// billing field to the empty string. Always a full overwrite - the prior
/// billing value never contributes.
#[must_use]
pub fn apply_same_address(shipping: &AddressRecord, enabled: bool) -> AddressRecord {
    if enabled {
        shipping.clone()
    } else {
        AddressRecord::default()
    }
}

/// Session state for the checkout flow: the three field sets and the
/// same-address toggle.
///
/// Each field set submits independently; there is no cross-form validation
/// step. The payment record is validated but never retained here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCoordinator {
    shipping: AddressRecord,
    billing: AddressRecord,
    same_address: bool,
}

impl CheckoutCoordinator {
    /// Current shipping field values.
    #[must_use]
    pub fn shipping(&self) -> &AddressRecord {
        &self.shipping
    }

    /// Current billing field values.
    #[must_use]
    pub fn billing(&self) -> &AddressRecord {
        &self.billing
    }

    /// Whether billing mirrors shipping. While active, the billing field set
    /// is non-editable.
    #[must_use]
    pub const fn same_address(&self) -> bool {
        self.same_address
    }

    /// Flip the same-address toggle.
    ///
    /// `shipping_values` are the live shipping field values at toggle time
    /// (submitted or not); they replace the recorded shipping state, and
    /// billing is rewritten synchronously from them.
    pub fn set_same_address(&mut self, enabled: bool, shipping_values: AddressRecord) {
        self.shipping = shipping_values;
        self.same_address = enabled;
        self.billing = apply_same_address(&self.shipping, enabled);
    }

    /// Validate and store the shipping field set.
    ///
    /// # Errors
    ///
    /// Returns the per-field failures; nothing is stored on failure.
    pub fn submit_shipping(&mut self, record: AddressRecord) -> Result<(), FieldErrors> {
        validate_address(&record)?;
        self.shipping = record;
        Ok(())
    }

    /// Validate and store the billing field set.
    ///
    /// # Errors
    ///
    /// Returns the per-field failures; nothing is stored on failure.
    pub fn submit_billing(&mut self, record: AddressRecord) -> Result<(), FieldErrors> {
        validate_address(&record)?;
        self.billing = record;
        Ok(())
    }

    /// Validate the payment field set. The record is not retained.
    ///
    /// # Errors
    ///
    /// Returns the per-field failures.
    pub fn submit_payment(&self, record: &PaymentRecord) -> Result<(), FieldErrors> {
        validate_payment(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_address() -> AddressRecord {
        AddressRecord {
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            address: "12 Elm St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            zip_code: "62704".to_owned(),
            country: "USA".to_owned(),
        }
    }

    fn valid_payment() -> PaymentRecord {
        PaymentRecord {
            cardholder_name: "Jane Doe".to_owned(),
            card_number: "4111111111111111".to_owned(),
            expiry_date: "09/27".to_owned(),
            cvv: "123".to_owned(),
        }
    }

    #[test]
    fn test_valid_address_passes() {
        assert!(validate_address(&valid_address()).is_ok());
    }

    #[test]
    fn test_short_text_fields_fail_with_field_keys() {
        let record = AddressRecord {
            first_name: "J".to_owned(),
            city: "X".to_owned(),
            ..valid_address()
        };
        let errors = validate_address(&record).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.message("firstName"),
            Some("First name must be at least 2 characters.")
        );
        assert_eq!(
            errors.message("city"),
            Some("City must be at least 2 characters.")
        );
        assert!(errors.message("lastName").is_none());
    }

    #[test]
    fn test_address_line_requires_five_characters() {
        let record = AddressRecord {
            address: "1 Elm".to_owned(),
            ..valid_address()
        };
        assert!(validate_address(&record).is_ok());

        let record = AddressRecord {
            address: "1 St".to_owned(),
            ..valid_address()
        };
        let errors = validate_address(&record).unwrap_err();
        assert_eq!(
            errors.message("address"),
            Some("Address must be at least 5 characters.")
        );
    }

    #[test]
    fn test_zip_code_patterns() {
        for zip in ["62704", "62704-1234"] {
            let record = AddressRecord {
                zip_code: zip.to_owned(),
                ..valid_address()
            };
            assert!(validate_address(&record).is_ok(), "{zip} should pass");
        }
        for zip in ["6270", "627041", "ABCDE", "62704-12", ""] {
            let record = AddressRecord {
                zip_code: zip.to_owned(),
                ..valid_address()
            };
            let errors = validate_address(&record).unwrap_err();
            assert_eq!(errors.message("zipCode"), Some("Invalid ZIP code."));
        }
    }

    #[test]
    fn test_valid_payment_passes() {
        assert!(validate_payment(&valid_payment()).is_ok());
    }

    #[test]
    fn test_short_card_number_fails_only_that_field() {
        let record = PaymentRecord {
            card_number: "41111111".to_owned(),
            ..valid_payment()
        };
        let errors = validate_payment(&record).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message("cardNumber"), Some("Invalid card number."));
    }

    #[test]
    fn test_expiry_date_patterns() {
        for expiry in ["09/27", "01/00", "12/99", "0927"] {
            let record = PaymentRecord {
                expiry_date: expiry.to_owned(),
                ..valid_payment()
            };
            assert!(validate_payment(&record).is_ok(), "{expiry} should pass");
        }
        for expiry in ["13/27", "00/27", "9/27", "09-27", "09/2027"] {
            let record = PaymentRecord {
                expiry_date: expiry.to_owned(),
                ..valid_payment()
            };
            let errors = validate_payment(&record).unwrap_err();
            assert_eq!(errors.message("expiryDate"), Some("Invalid expiry date."));
        }
    }

    #[test]
    fn test_cvv_accepts_three_or_four_digits() {
        for cvv in ["123", "1234"] {
            let record = PaymentRecord {
                cvv: cvv.to_owned(),
                ..valid_payment()
            };
            assert!(validate_payment(&record).is_ok());
        }
        for cvv in ["12", "12345", "abc"] {
            let record = PaymentRecord {
                cvv: cvv.to_owned(),
                ..valid_payment()
            };
            let errors = validate_payment(&record).unwrap_err();
            assert_eq!(errors.message("cvv"), Some("Invalid CVV."));
        }
    }

    #[test]
    fn test_toggle_copies_shipping_into_billing_verbatim() {
        let mut coordinator = CheckoutCoordinator::default();
        let shipping = valid_address();

        coordinator.set_same_address(true, shipping.clone());
        assert!(coordinator.same_address());
        assert_eq!(coordinator.billing(), &shipping);
    }

    #[test]
    fn test_toggle_off_resets_billing_to_empty_strings() {
        let mut coordinator = CheckoutCoordinator::default();
        coordinator.set_same_address(true, valid_address());

        coordinator.set_same_address(false, valid_address());
        assert!(!coordinator.same_address());
        assert_eq!(coordinator.billing(), &AddressRecord::default());
    }

    #[test]
    fn test_apply_same_address_is_a_full_overwrite() {
        let shipping = valid_address();
        assert_eq!(apply_same_address(&shipping, true), shipping);
        assert_eq!(apply_same_address(&shipping, false), AddressRecord::default());
    }

    #[test]
    fn test_submit_stores_only_on_success() {
        let mut coordinator = CheckoutCoordinator::default();

        let invalid = AddressRecord {
            zip_code: "nope".to_owned(),
            ..valid_address()
        };
        assert!(coordinator.submit_shipping(invalid).is_err());
        assert_eq!(coordinator.shipping(), &AddressRecord::default());

        coordinator.submit_shipping(valid_address()).unwrap();
        assert_eq!(coordinator.shipping(), &valid_address());
    }

    #[test]
    fn test_submits_are_independent() {
        // Payment can be submitted before either address form.
        let coordinator = CheckoutCoordinator::default();
        assert!(coordinator.submit_payment(&valid_payment()).is_ok());
    }

    #[test]
    fn test_payment_is_not_retained() {
        let coordinator = CheckoutCoordinator::default();
        coordinator.submit_payment(&valid_payment()).unwrap();
        let serialized = serde_json::to_string(&coordinator).unwrap();
        assert!(!serialized.contains("4111111111111111"));
    }

    #[test]
    fn test_later_shipping_submit_does_not_resync_billing() {
        // The copy happens synchronously on toggle, not lazily on submit.
        let mut coordinator = CheckoutCoordinator::default();
        coordinator.set_same_address(true, valid_address());

        let updated = AddressRecord {
            city: "Chicago".to_owned(),
            ..valid_address()
        };
        coordinator.submit_shipping(updated).unwrap();
        assert_eq!(coordinator.billing().city, "Springfield");
    }
}
