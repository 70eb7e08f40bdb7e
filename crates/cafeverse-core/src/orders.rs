//! Placed orders as the backend reports them, plus the filters and counts the
//! order-tracking and admin views are built from.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::checkout::OrderType;
use crate::error::CoreError;
use crate::pricing::{numeric_price, CartTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Completed,
    Cancelled,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "delivered" => Ok(OrderStatus::Delivered),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(CoreError::InvalidOrderStatus(s.to_string())),
        }
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedItem {
    #[serde(default, alias = "id")]
    pub item_id: Option<i64>,
    #[serde(default, alias = "item_name")]
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, deserialize_with = "amount")]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    pub status: OrderStatus,
    /// Kept as sent; older orders may carry types this client cannot parse.
    pub order_type: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    /// Pre-tax amount.
    #[serde(default, deserialize_with = "amount")]
    pub total_amount: f64,
    #[serde(default, alias = "date")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub delivered_at: Option<String>,
    #[serde(default, alias = "items_data")]
    pub items: Vec<OrderedItem>,
}

impl OrderRecord {
    #[must_use]
    pub fn kind(&self) -> Option<OrderType> {
        self.order_type.parse().ok()
    }

    /// Only orders still waiting to be prepared can be cancelled by the customer.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Tax and grand total derived from the stored pre-tax amount.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_subtotal(self.total_amount)
    }

    #[must_use]
    pub fn placed_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<FixedOffset>> {
        self.delivered_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }
}

/// Accepts amounts sent either as JSON numbers or as decimal strings.
fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
        Missing(()),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Number(n) => n,
        Repr::Text(s) => numeric_price(&s),
        Repr::Missing(()) => 0.0,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(OrderType),
}

impl TypeFilter {
    #[must_use]
    pub fn matches(self, order_type: &str) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => wanted.as_str() == order_type,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            s.parse().map(TypeFilter::Only)
        }
    }
}

/// Orders matching both filters, in their original order.
#[must_use]
pub fn filter_orders(
    orders: &[OrderRecord],
    status: StatusFilter,
    order_type: TypeFilter,
) -> Vec<&OrderRecord> {
    orders
        .iter()
        .filter(|o| status.matches(o.status) && order_type.matches(&o.order_type))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub delivered: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn tally(orders: &[OrderRecord]) -> Self {
        orders.iter().fold(Self::default(), |mut counts, order| {
            match order.status {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::Delivered => counts.delivered += 1,
                OrderStatus::Completed => counts.completed += 1,
                OrderStatus::Cancelled => counts.cancelled += 1,
                OrderStatus::Unknown => {}
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Vec<OrderRecord> {
        serde_json::from_value(serde_json::json!([
            {
                "id": 1, "status": "pending", "order_type": "delivery",
                "total_amount": "12.00", "created_at": "2025-03-01T09:30:00+05:30",
                "items_data": [{"item_id": 3, "name": "Latte", "quantity": 2, "price": "4.50"}]
            },
            { "id": 2, "status": "completed", "order_type": "takeaway", "total_amount": 8.5 },
            { "id": 3, "status": "delivered", "order_type": "delivery", "total_amount": null },
            { "id": 4, "status": "cancelled", "order_type": "dinein" },
            { "id": 5, "status": "refunded", "order_type": "dinein" }
        ]))
        .unwrap()
    }

    #[test]
    fn deserializes_backend_shapes() {
        let orders = orders();
        assert_eq!(orders[0].items.len(), 1);
        assert!((orders[0].items[0].price - 4.5).abs() < 1e-9);
        assert!((orders[0].total_amount - 12.0).abs() < 1e-9);
        assert!((orders[1].total_amount - 8.5).abs() < 1e-9);
        assert!(orders[2].total_amount.abs() < 1e-9);
        assert_eq!(orders[4].status, OrderStatus::Unknown);
        assert!(orders[0].placed_at().is_some());
        assert!(orders[1].placed_at().is_none());
    }

    #[test]
    fn only_pending_orders_are_cancellable() {
        let orders = orders();
        let cancellable: Vec<i64> = orders
            .iter()
            .filter(|o| o.is_cancellable())
            .map(|o| o.id)
            .collect();
        assert_eq!(cancellable, vec![1]);
    }

    #[test]
    fn order_totals_apply_tax_rate() {
        let totals = orders()[0].totals();
        assert!((totals.tax - 1.02).abs() < 1e-9);
        assert!((totals.total - 13.02).abs() < 1e-9);
    }

    #[test]
    fn filters_combine_with_and() {
        let orders = orders();
        let hits = filter_orders(
            &orders,
            StatusFilter::Only(OrderStatus::Pending),
            TypeFilter::Only(OrderType::Delivery),
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let deliveries = filter_orders(&orders, StatusFilter::All, TypeFilter::Only(OrderType::Delivery));
        assert_eq!(deliveries.len(), 2);

        assert_eq!(filter_orders(&orders, StatusFilter::All, TypeFilter::All).len(), 5);
    }

    #[test]
    fn counts_each_known_status() {
        let counts = StatusCounts::tally(&orders());
        assert_eq!(
            counts,
            StatusCounts {
                pending: 1,
                delivered: 1,
                completed: 1,
                cancelled: 1,
            }
        );
    }

    #[test]
    fn filters_parse_from_cli_words() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "Pending".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(OrderStatus::Pending))
        );
        assert_eq!(
            "dinein".parse::<TypeFilter>(),
            Ok(TypeFilter::Only(OrderType::DineIn))
        );
        assert!("lost".parse::<StatusFilter>().is_err());
    }
}
