use cafeverse_core::{format_amount, numeric_price, MenuCategory, MenuFilter, MenuItem};

use crate::storefront::Storefront;

pub(crate) async fn run_menu(storefront: &Storefront, filter: &MenuFilter) -> anyhow::Result<()> {
    let categories = storefront.client.fetch_menu().await?;
    let shown = filter.apply(&categories);
    if shown.is_empty() {
        println!("no menu items match");
        return Ok(());
    }

    let cart = storefront.cart();
    for category in &shown {
        println!("{} [{}]", category.name, category.slug);
        for item in &category.items {
            let in_cart = cart.quantity_of(&item.name);
            let marker = if in_cart > 0 {
                format!("  (in cart: {in_cart})")
            } else {
                String::new()
            };
            println!(
                "  {:<28}{:>8}  {}{marker}",
                item.name,
                format_amount(numeric_price(&item.price)),
                tags(item)
            );
        }
        println!();
    }
    Ok(())
}

/// Finds a menu item by name, ignoring case.
pub(crate) fn find_item<'a>(categories: &'a [MenuCategory], name: &str) -> Option<&'a MenuItem> {
    categories
        .iter()
        .flat_map(|c| c.items.iter())
        .find(|item| item.name.eq_ignore_ascii_case(name.trim()))
}

fn tags(item: &MenuItem) -> String {
    let mut tags: Vec<&str> = item.dietary.iter().map(String::as_str).collect();
    if item.popular {
        tags.push("popular");
    }
    if item.seasonal {
        tags.push("seasonal");
    }
    tags.join(", ")
}
