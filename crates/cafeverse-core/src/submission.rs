use serde::Serialize;

use crate::cart_line::CartLine;
use crate::checkout::{CheckoutDraft, OrderType, PaymentMethod};
use crate::pricing::numeric_price;

/// Catalog id sent for cart lines that were saved without one.
pub const FALLBACK_ITEM_ID: i64 = 1;

/// Body of the order-creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSubmission {
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// `street, city, postal`. Delivery orders only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_zipcode: Option<String>,
    pub items: Vec<SubmissionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionItem {
    pub item_id: i64,
    pub quantity: u32,
    pub price: f64,
    pub item_name: String,
}

impl From<&CartLine> for SubmissionItem {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.id.unwrap_or(FALLBACK_ITEM_ID),
            quantity: line.quantity,
            price: numeric_price(&line.price),
            item_name: line.name.clone(),
        }
    }
}

impl OrderSubmission {
    /// Builds the payload from a cart snapshot and a draft.
    ///
    /// Returns `None` when the draft has no order type or payment method; callers
    /// are expected to have run [`CheckoutDraft::validate`] first.
    #[must_use]
    pub fn build(lines: &[CartLine], draft: &CheckoutDraft, customer_name: &str) -> Option<Self> {
        let order_type = draft.order_type?;
        let payment_method = draft.payment_method?;

        let delivery = (order_type == OrderType::Delivery).then_some(&draft.delivery);

        Some(Self {
            order_type,
            payment_method,
            customer_name: customer_name.to_string(),
            customer_email: draft.contact.email.trim().to_string(),
            customer_phone: draft.contact.phone.trim().to_string(),
            address: delivery.map(crate::checkout::DeliveryFields::one_line),
            delivery_address: delivery.map(|d| d.street.trim().to_string()),
            delivery_city: delivery.map(|d| d.city.trim().to_string()),
            delivery_zipcode: delivery.map(|d| d.postal_code.trim().to_string()),
            items: lines.iter().map(SubmissionItem::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{ContactFields, DeliveryFields};

    fn line(id: Option<i64>, name: &str, price: &str, quantity: u32) -> CartLine {
        CartLine {
            id,
            name: name.to_string(),
            price: price.to_string(),
            description: String::new(),
            image: String::new(),
            dietary: Vec::new(),
            popular: false,
            seasonal: false,
            calories: 0,
            quantity,
        }
    }

    fn draft(order_type: OrderType) -> CheckoutDraft {
        CheckoutDraft {
            order_type: Some(order_type),
            payment_method: Some(PaymentMethod::Card),
            contact: ContactFields {
                email: "ada@example.com".to_string(),
                phone: "9876543210".to_string(),
            },
            delivery: DeliveryFields {
                street: "12 Bean St".to_string(),
                city: "Pune".to_string(),
                postal_code: "411001".to_string(),
            },
            ..CheckoutDraft::default()
        }
    }

    #[test]
    fn takeaway_submission_omits_address() {
        let lines = vec![line(Some(3), "Latte", "$4.50", 2)];
        let submission = OrderSubmission::build(&lines, &draft(OrderType::Takeaway), "ada").unwrap();
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["order_type"], "takeaway");
        assert_eq!(json["payment_method"], "card");
        assert!(json.get("address").is_none());
        assert!(json.get("delivery_city").is_none());
        assert_eq!(json["items"][0]["item_id"], 3);
        assert_eq!(json["items"][0]["price"], 4.5);
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][0]["item_name"], "Latte");
    }

    #[test]
    fn delivery_submission_carries_address() {
        let lines = vec![line(Some(3), "Latte", "4.50", 1)];
        let submission = OrderSubmission::build(&lines, &draft(OrderType::Delivery), "ada").unwrap();
        assert_eq!(submission.address.as_deref(), Some("12 Bean St, Pune, 411001"));
        assert_eq!(submission.delivery_city.as_deref(), Some("Pune"));
        assert_eq!(submission.delivery_zipcode.as_deref(), Some("411001"));
    }

    #[test]
    fn missing_catalog_id_uses_fallback() {
        let lines = vec![line(None, "Muffin", "3.00", 1)];
        let submission = OrderSubmission::build(&lines, &draft(OrderType::DineIn), "ada").unwrap();
        assert_eq!(submission.items[0].item_id, FALLBACK_ITEM_ID);
    }

    #[test]
    fn incomplete_draft_builds_nothing() {
        let mut incomplete = draft(OrderType::Takeaway);
        incomplete.order_type = None;
        assert!(OrderSubmission::build(&[], &incomplete, "ada").is_none());
    }
}
