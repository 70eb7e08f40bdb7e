//! Checkout draft: the order-type, payment and contact selections a customer
//! fills in before an order is submitted, and the rules that gate submission.
//!
//! The draft is never persisted as a whole. Only the chosen order type is
//! cached (by the storefront) so a customer who leaves checkout can resume it.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "takeaway")]
    Takeaway,
    #[serde(rename = "dinein")]
    DineIn,
    #[serde(rename = "delivery")]
    Delivery,
}

impl OrderType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Takeaway => "takeaway",
            OrderType::DineIn => "dinein",
            OrderType::Delivery => "delivery",
        }
    }

    /// Human label, e.g. `"Take Away"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OrderType::Takeaway => "Take Away",
            OrderType::DineIn => "Dine In",
            OrderType::Delivery => "Delivery",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "takeaway" | "take-away" => Ok(OrderType::Takeaway),
            "dinein" | "dine-in" => Ok(OrderType::DineIn),
            "delivery" => Ok(OrderType::Delivery),
            _ => Err(CoreError::InvalidOrderType(s.to_string())),
        }
    }
}

/// Payment method identifiers as the ordering backend accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "apple")]
    ApplePay,
}

impl PaymentMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::ApplePay => "apple",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            "apple" | "applepay" | "apple-pay" => Ok(PaymentMethod::ApplePay),
            _ => Err(CoreError::InvalidPaymentMethod(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryFields {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl DeliveryFields {
    /// Single-line address in the `street, city, postal` form the backend stores.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {}",
            self.street.trim(),
            self.city.trim(),
            self.postal_code.trim()
        )
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    pub number: String,
    pub holder_name: String,
    /// `MM/YY`.
    pub expiry: String,
    pub cvv: String,
}

impl std::fmt::Debug for CardFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardFields")
            .field("number", &"[redacted]")
            .field("holder_name", &self.holder_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpiFields {
    pub upi_id: String,
}

/// Transient checkout input. Created empty when checkout opens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDraft {
    pub order_type: Option<OrderType>,
    pub payment_method: Option<PaymentMethod>,
    pub contact: ContactFields,
    /// Only consulted for [`OrderType::Delivery`].
    pub delivery: DeliveryFields,
    /// Only consulted for [`PaymentMethod::Card`].
    pub card: CardFields,
    /// Only consulted for [`PaymentMethod::Upi`].
    pub upi: UpiFields,
}

/// Draft fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    OrderType,
    PaymentMethod,
    Email,
    Phone,
    Street,
    City,
    PostalCode,
    CardNumber,
    CardHolder,
    CardExpiry,
    CardCvv,
    UpiId,
}

impl DraftField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::OrderType => "order_type",
            DraftField::PaymentMethod => "payment_method",
            DraftField::Email => "email",
            DraftField::Phone => "phone",
            DraftField::Street => "street",
            DraftField::City => "city",
            DraftField::PostalCode => "postal_code",
            DraftField::CardNumber => "card_number",
            DraftField::CardHolder => "card_holder",
            DraftField::CardExpiry => "card_expiry",
            DraftField::CardCvv => "card_cvv",
            DraftField::UpiId => "upi_id",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: DraftField,
    pub message: &'static str,
}

/// Every field-scoped problem found in a draft, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} checkout field(s) need attention", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn for_field(&self, field: DraftField) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

static CARD_EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid expiry regex"));
static CARD_CVV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("valid cvv regex"));
static UPI_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]{2,}@[A-Za-z][A-Za-z0-9]+$").expect("valid upi regex")
});

impl CheckoutDraft {
    /// Checks every rule that gates submission.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each offending field. Nothing is
    /// sent anywhere when this fails.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.order_type.is_none() {
            errors.push(FieldError {
                field: DraftField::OrderType,
                message: "Please select an order type.",
            });
        }
        if self.payment_method.is_none() {
            errors.push(FieldError {
                field: DraftField::PaymentMethod,
                message: "Please select a payment method.",
            });
        }

        require(&mut errors, &self.contact.email, DraftField::Email, "Email is required.");
        require(
            &mut errors,
            &self.contact.phone,
            DraftField::Phone,
            "Phone number is required.",
        );

        if self.order_type == Some(OrderType::Delivery) {
            require(
                &mut errors,
                &self.delivery.street,
                DraftField::Street,
                "Street address is required for delivery.",
            );
            require(
                &mut errors,
                &self.delivery.city,
                DraftField::City,
                "City is required for delivery.",
            );
            require(
                &mut errors,
                &self.delivery.postal_code,
                DraftField::PostalCode,
                "Postal code is required for delivery.",
            );
        }

        match self.payment_method {
            Some(PaymentMethod::Card) => errors.extend(self.card_errors()),
            Some(PaymentMethod::Upi) => {
                if !UPI_ID_RE.is_match(self.upi.upi_id.trim()) {
                    errors.push(FieldError {
                        field: DraftField::UpiId,
                        message: "Enter a UPI ID like name@bank.",
                    });
                }
            }
            Some(PaymentMethod::ApplePay) | None => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    fn card_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let digits: String = self
            .card
            .number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !(13..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            errors.push(FieldError {
                field: DraftField::CardNumber,
                message: "Enter a valid card number.",
            });
        }
        require(
            &mut errors,
            &self.card.holder_name,
            DraftField::CardHolder,
            "Cardholder name is required.",
        );
        if !CARD_EXPIRY_RE.is_match(self.card.expiry.trim()) {
            errors.push(FieldError {
                field: DraftField::CardExpiry,
                message: "Expiry must be MM/YY.",
            });
        }
        if !CARD_CVV_RE.is_match(self.card.cvv.trim()) {
            errors.push(FieldError {
                field: DraftField::CardCvv,
                message: "CVV must be 3 or 4 digits.",
            });
        }
        errors
    }
}

fn require(errors: &mut Vec<FieldError>, value: &str, field: DraftField, message: &'static str) {
    if value.trim().is_empty() {
        errors.push(FieldError { field, message });
    }
}

/// Groups a card number into blocks of four digits.
///
/// Spaces and dashes are separators and are regrouped. Every digit is kept,
/// so the length check in validation sees the number as typed; input with
/// any other character comes back trimmed but otherwise untouched.
#[must_use]
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if !digits.iter().all(char::is_ascii_digit) {
        return raw.trim().to_string();
    }
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "checkout_test.rs"]
mod tests;
