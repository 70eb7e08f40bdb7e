use serde::{Deserialize, Serialize};

use crate::menu::MenuItem;
use crate::pricing::numeric_price;

/// One distinct product in the cart.
///
/// `name` is the identity key: two candidates with the same name are the same
/// line, whatever their other fields say. Descriptive fields are carried
/// through untouched for display and order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog identifier. Lines saved before the catalog exposed ids have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// Price exactly as the catalog displayed it, e.g. `"4.50"` or `"$4.50"`.
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub seasonal: bool,
    #[serde(default)]
    pub calories: u32,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLine {
    /// A fresh line for `candidate` with quantity 1.
    #[must_use]
    pub fn from_candidate(candidate: &MenuItem) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name.clone(),
            price: candidate.price.clone(),
            description: candidate.description.clone(),
            image: candidate.image.clone(),
            dietary: candidate.dietary.clone(),
            popular: candidate.popular,
            seasonal: candidate.seasonal,
            calories: candidate.calories,
            quantity: 1,
        }
    }

    #[must_use]
    pub fn unit_price(&self) -> f64 {
        numeric_price(&self.price)
    }

    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.unit_price() * f64::from(self.quantity)
    }
}
