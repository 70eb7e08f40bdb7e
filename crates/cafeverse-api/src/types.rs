//! Request and response shapes of the ordering backend.
//!
//! ## Observed envelopes
//!
//! - Order creation and cancellation answer `{ "status": "success", ... }` or
//!   `{ "status": "error", "message": "..." }`, both with HTTP 2xx or with
//!   a 4xx carrying the same body.
//! - The customer's order list is wrapped: `{ "data": [order, ...] }`. The
//!   admin list at `/api/orders/` is a bare array.
//! - The menu is wrapped: `{ "data": [category, ...] }`, where each category
//!   names itself either with `name` or with `key.category`.
//! - Login answers `{ "token", "User" }` while signup answers
//!   `{ "token", "user" }`.

use cafeverse_core::{category_slug, Actor, MenuCategory, MenuItem, OrderRecord, DEFAULT_ITEM_IMAGE};
use serde::{Deserialize, Serialize};

/// Generic `{ status, message }` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_id: Option<serde_json::Value>,
}

impl StatusEnvelope {
    pub(crate) fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// Result of a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCreated {
    /// Backend order id, rendered as text. `None` if the backend omitted it.
    pub order_id: Option<String>,
}

impl OrderCreated {
    pub(crate) fn from_envelope(envelope: &StatusEnvelope) -> Self {
        let order_id = envelope.order_id.as_ref().and_then(|value| match value {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        });
        Self { order_id }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderListResponse {
    #[serde(default)]
    pub data: Vec<OrderRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MenuResponse {
    #[serde(default)]
    pub data: Vec<RawMenuCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMenuCategory {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<RawMenuKey>,
    #[serde(default)]
    pub items: Vec<RawMenuItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMenuKey {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMenuItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub popular: Option<bool>,
    #[serde(default)]
    pub seasonal: Option<bool>,
    #[serde(default)]
    pub dietary: Vec<RawDietaryTag>,
    #[serde(default)]
    pub calories: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDietaryTag {
    pub name: String,
}

impl RawMenuCategory {
    pub(crate) fn into_category(self) -> MenuCategory {
        let category_key = self.key.and_then(|k| k.category);
        let name = self
            .name
            .clone()
            .or_else(|| category_key.clone())
            .unwrap_or_else(|| "Category".to_string());
        let slug = match (&category_key, &self.id) {
            (Some(key), _) => category_slug(key),
            (None, Some(id)) => id.to_string().trim_matches('"').to_string(),
            (None, None) => category_slug(&name),
        };
        MenuCategory {
            slug,
            name,
            items: self.items.into_iter().map(RawMenuItem::into_item).collect(),
        }
    }
}

impl RawMenuItem {
    fn into_item(self) -> MenuItem {
        let price = match self.price {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => "0".to_string(),
        };
        MenuItem {
            id: self.id,
            name: self.name,
            price,
            description: self.description.unwrap_or_default(),
            image: self
                .image
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ITEM_IMAGE.to_string()),
            dietary: self.dietary.into_iter().map(|d| d.name).collect(),
            popular: self.popular.unwrap_or(false),
            seasonal: self.seasonal.unwrap_or(false),
            calories: self.calories.unwrap_or(0),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

/// Token and profile returned by login and signup.
#[derive(Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(alias = "User")]
    pub user: Actor,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"[redacted]")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CancelOrderRequest {
    pub order_id: i64,
}

/// Status changes staff can apply from the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    MarkComplete,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminActionRequest {
    pub action: AdminAction,
}
