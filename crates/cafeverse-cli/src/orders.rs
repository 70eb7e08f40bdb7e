use cafeverse_core::{format_amount, OrderRecord, StatusCounts, StatusFilter, TypeFilter};
use cafeverse_storefront::{AdminDashboard, OrderTracker};
use clap::Subcommand;

use crate::storefront::Storefront;

#[derive(Debug, Subcommand)]
pub enum OrdersCommands {
    /// Cancel one of your pending orders
    Cancel { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// List every order
    Orders {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// `all`, `takeaway`, `dinein` or `delivery`
        #[arg(long = "type", default_value = "all")]
        order_type: TypeFilter,
    },
    /// Mark an order as complete
    Complete { id: i64 },
}

pub(crate) async fn run_orders(
    storefront: &Storefront,
    command: Option<OrdersCommands>,
    status: StatusFilter,
) -> anyhow::Result<()> {
    let mut tracker = OrderTracker::open(storefront.client.clone(), storefront.auth.clone())?;
    tracker.refresh().await?;

    if let Some(OrdersCommands::Cancel { id }) = command {
        tracker.cancel(id).await?;
        println!("Order #{id} cancelled.");
        return Ok(());
    }

    let visible = tracker.visible(status);
    if visible.is_empty() {
        println!("no orders yet; browse the menu with `cafeverse menu`");
        return Ok(());
    }
    print_orders(&visible, false);
    print_counts(tracker.counts());
    Ok(())
}

pub(crate) async fn run_admin(storefront: &Storefront, command: AdminCommands) -> anyhow::Result<()> {
    let mut dashboard = AdminDashboard::open(storefront.client.clone(), storefront.auth.clone())?;
    dashboard.refresh().await?;

    match command {
        AdminCommands::Orders { status, order_type } => {
            let visible = dashboard.visible(status, order_type);
            if visible.is_empty() {
                println!("no orders match");
            } else {
                print_orders(&visible, true);
            }
            print_counts(dashboard.counts());
        }
        AdminCommands::Complete { id } => {
            dashboard.mark_complete(id).await?;
            println!("Order #{id} marked as complete.");
        }
    }
    Ok(())
}

fn print_orders(orders: &[&OrderRecord], with_customer: bool) {
    println!(
        "{:<8}{:<11}{:<10}{:>10}  {:<18}{}",
        "ORDER",
        "STATUS",
        "TYPE",
        "TOTAL",
        "PLACED",
        if with_customer { "CUSTOMER" } else { "ITEMS" }
    );
    for order in orders {
        let placed = order
            .placed_at()
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        let last = if with_customer {
            customer_summary(order)
        } else {
            order
                .items
                .iter()
                .map(|item| format!("{} x{}", item.name, item.quantity))
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "{:<8}{:<11}{:<10}{:>10}  {:<18}{}",
            format!("#{}", order.id),
            order.status.as_str(),
            order.kind().map_or(order.order_type.as_str(), |kind| kind.label()),
            format_amount(order.totals().total),
            placed,
            last
        );
    }
}

fn customer_summary(order: &OrderRecord) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(name) = order.customer_name.as_deref() {
        parts.push(name);
    }
    if let Some(phone) = order.phone_number.as_deref() {
        parts.push(phone);
    }
    if let Some(address) = order.delivery_address.as_deref() {
        parts.push(address);
    }
    parts.join(" | ")
}

fn print_counts(counts: StatusCounts) {
    println!();
    println!(
        "pending {}  delivered {}  completed {}  cancelled {}",
        counts.pending, counts.delivered, counts.completed, counts.cancelled
    );
}
