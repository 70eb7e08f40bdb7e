//! Menu catalog entries and the browse filter.

use serde::{Deserialize, Serialize};

use crate::pricing::parse_price;

/// Image shown for menu items the catalog has no picture for.
pub const DEFAULT_ITEM_IMAGE: &str = "/cafe.jpg";

/// A menu entry as offered to the customer; the candidate for adding to a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Option<i64>,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: String,
    pub dietary: Vec<String>,
    pub popular: bool,
    pub seasonal: bool,
    pub calories: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuCategory {
    /// URL-safe slug of the category name, e.g. `"hot-drinks"`.
    pub slug: String,
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// Browse filter for the menu page. Every unset field matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuFilter {
    /// Exact category name.
    pub category: Option<String>,
    /// Case-insensitive substring of the item name.
    pub name_query: Option<String>,
    /// Price ceiling; items whose price cannot be read never fall under it.
    pub max_price: Option<f64>,
}

impl MenuFilter {
    #[must_use]
    pub fn matches_item(&self, item: &MenuItem) -> bool {
        let matches_name = self.name_query.as_deref().is_none_or(|query| {
            item.name
                .to_lowercase()
                .contains(&query.to_lowercase())
        });
        let matches_price = self
            .max_price
            .is_none_or(|ceiling| parse_price(&item.price).unwrap_or(f64::INFINITY) <= ceiling);
        matches_name && matches_price
    }

    /// Returns the categories that survive the filter, each holding only its
    /// matching items. Categories left with no items are dropped.
    #[must_use]
    pub fn apply(&self, categories: &[MenuCategory]) -> Vec<MenuCategory> {
        categories
            .iter()
            .filter(|category| {
                self.category
                    .as_deref()
                    .is_none_or(|wanted| category.name == wanted)
            })
            .filter_map(|category| {
                let items: Vec<MenuItem> = category
                    .items
                    .iter()
                    .filter(|item| self.matches_item(item))
                    .cloned()
                    .collect();
                (!items.is_empty()).then(|| MenuCategory {
                    slug: category.slug.clone(),
                    name: category.name.clone(),
                    items,
                })
            })
            .collect()
    }
}

/// Lowercases a category name and joins whitespace-separated words with `-`.
#[must_use]
pub fn category_slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: &str) -> MenuItem {
        MenuItem {
            id: None,
            name: name.to_string(),
            price: price.to_string(),
            description: String::new(),
            image: DEFAULT_ITEM_IMAGE.to_string(),
            dietary: Vec::new(),
            popular: false,
            seasonal: false,
            calories: 0,
        }
    }

    fn menu() -> Vec<MenuCategory> {
        vec![
            MenuCategory {
                slug: "hot-drinks".to_string(),
                name: "Hot Drinks".to_string(),
                items: vec![item("Latte", "4.50"), item("Chai Latte", "3.75")],
            },
            MenuCategory {
                slug: "bakery".to_string(),
                name: "Bakery".to_string(),
                items: vec![item("Muffin", "3.00"), item("Seasonal Tart", "ask")],
            },
        ]
    }

    #[test]
    fn default_filter_keeps_everything() {
        let filtered = MenuFilter::default().apply(&menu());
        assert_eq!(filtered, menu());
    }

    #[test]
    fn name_query_is_case_insensitive() {
        let filter = MenuFilter {
            name_query: Some("LATTE".to_string()),
            ..MenuFilter::default()
        };
        let filtered = filter.apply(&menu());
        assert_eq!(filtered.len(), 1, "bakery has no lattes and is dropped");
        assert_eq!(filtered[0].items.len(), 2);
    }

    #[test]
    fn price_ceiling_excludes_unreadable_prices() {
        let filter = MenuFilter {
            max_price: Some(3.5),
            ..MenuFilter::default()
        };
        let filtered = filter.apply(&menu());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Bakery");
        assert_eq!(filtered[0].items.len(), 1);
        assert_eq!(filtered[0].items[0].name, "Muffin");
    }

    #[test]
    fn category_filter_is_exact() {
        let filter = MenuFilter {
            category: Some("Bakery".to_string()),
            ..MenuFilter::default()
        };
        let filtered = filter.apply(&menu());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].slug, "bakery");
    }

    #[test]
    fn category_slug_joins_words() {
        assert_eq!(category_slug("Hot  Drinks"), "hot-drinks");
        assert_eq!(category_slug("Bakery"), "bakery");
    }
}
