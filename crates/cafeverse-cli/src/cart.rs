use cafeverse_core::format_amount;
use cafeverse_storefront::CartEngine;
use clap::Subcommand;

use crate::storefront::Storefront;

#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// List cart lines and totals
    Show,
    /// Add one of a menu item
    Add { name: String },
    /// Set the quantity of a line; 0 removes it
    Set {
        name: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { name: String },
    /// Empty the cart
    Clear,
}

pub(crate) async fn run_cart(storefront: &Storefront, command: CartCommands) -> anyhow::Result<()> {
    let mut cart = storefront.cart();
    match command {
        CartCommands::Show => {}
        CartCommands::Add { name } => {
            let menu = storefront.client.fetch_menu().await?;
            let item = crate::menu::find_item(&menu, &name)
                .ok_or_else(|| anyhow::anyhow!("'{name}' is not on the menu"))?;
            cart.add_item(item)?;
        }
        CartCommands::Set { name, quantity } => {
            if cart.quantity_of(&name) == 0 {
                anyhow::bail!("'{name}' is not in the cart");
            }
            cart.set_quantity(&name, quantity)?;
        }
        CartCommands::Remove { name } => {
            if !cart.remove_item(&name) {
                anyhow::bail!("'{name}' is not in the cart");
            }
        }
        CartCommands::Clear => cart.clear(),
    }
    print_cart(&cart);
    Ok(())
}

pub(crate) fn print_cart(cart: &CartEngine) {
    if cart.is_empty() {
        println!("your cart is empty");
        return;
    }
    println!("{:<28}{:>5}{:>10}{:>10}", "ITEM", "QTY", "EACH", "TOTAL");
    for line in cart.lines() {
        println!(
            "{:<28}{:>5}{:>10}{:>10}",
            line.name,
            line.quantity,
            format_amount(line.unit_price()),
            format_amount(line.line_total())
        );
    }
    let totals = cart.totals();
    println!();
    println!("{} item(s)", cart.total_item_count());
    println!("{:<43}{:>10}", "Subtotal", format_amount(totals.subtotal));
    println!("{:<43}{:>10}", "Tax (8.5%)", format_amount(totals.tax));
    println!("{:<43}{:>10}", "Total", format_amount(totals.total));
}
