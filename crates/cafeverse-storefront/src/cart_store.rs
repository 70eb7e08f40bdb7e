//! The one durable slot holding the saved cart.
//!
//! Carts are written as `{"version": 1, "lines": [...]}`. A bare JSON list is
//! the older, unversioned shape and still loads. Anything else loads as an
//! empty cart.

use std::sync::Arc;

use cafeverse_core::CartLine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::store::KeyValueStore;

pub const CART_KEY: &str = "cafeverse-cart";
pub const CART_FORMAT_VERSION: u64 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    version: u64,
    lines: &'a [CartLine],
}

#[derive(Deserialize)]
struct EnvelopeIn {
    #[serde(default)]
    lines: Vec<CartLine>,
}

/// Loads and saves the cart. Never fails: read faults yield an empty cart and
/// write faults are dropped, both with a warning.
#[derive(Debug, Clone)]
pub struct CartStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CartStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    #[must_use]
    pub fn load(&self) -> Vec<CartLine> {
        match self.try_load() {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(key = CART_KEY, error = %e, "saved cart unreadable, starting empty");
                Vec::new()
            }
        }
    }

    pub fn save(&self, lines: &[CartLine]) {
        let result = encode_cart(lines).and_then(|raw| self.kv.set(CART_KEY, &raw));
        if let Err(e) = result {
            tracing::warn!(key = CART_KEY, lines = lines.len(), error = %e, "failed to save cart");
        }
    }

    /// Deletes the slot entirely.
    pub fn clear(&self) {
        if let Err(e) = self.kv.remove(CART_KEY) {
            tracing::warn!(key = CART_KEY, error = %e, "failed to clear saved cart");
        }
    }

    fn try_load(&self) -> Result<Vec<CartLine>, StoreError> {
        match self.kv.get(CART_KEY)? {
            Some(raw) if !raw.trim().is_empty() => decode_cart(&raw),
            _ => Ok(Vec::new()),
        }
    }
}

pub(crate) fn encode_cart(lines: &[CartLine]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&EnvelopeOut {
        version: CART_FORMAT_VERSION,
        lines,
    })?)
}

pub(crate) fn decode_cart(raw: &str) -> Result<Vec<CartLine>, StoreError> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(ref fields) => {
            let version = fields.get("version").and_then(Value::as_u64);
            if version != Some(CART_FORMAT_VERSION) {
                return Err(StoreError::UnsupportedVersion(version));
            }
            let envelope: EnvelopeIn = serde_json::from_value(value)?;
            Ok(envelope.lines)
        }
        _ => Err(StoreError::UnexpectedShape),
    }
}
