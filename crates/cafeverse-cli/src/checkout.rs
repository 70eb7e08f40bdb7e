use std::sync::Arc;

use cafeverse_core::{
    CardFields, ContactFields, DeliveryFields, DraftField, OrderType, PaymentMethod, UpiFields,
};
use cafeverse_storefront::{
    CheckoutError, CheckoutOrchestrator, ExitReason, Navigator, OrderConfirmation, OrderGateway,
};
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::storefront::Storefront;

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// `takeaway`, `dinein` or `delivery`
    #[arg(long)]
    pub order_type: Option<OrderType>,
    /// `card`, `upi` or `applepay`
    #[arg(long)]
    pub payment: Option<PaymentMethod>,
    /// Defaults to the email on your account
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub card_number: Option<String>,
    #[arg(long)]
    pub card_holder: Option<String>,
    /// MM/YY
    #[arg(long)]
    pub card_expiry: Option<String>,
    #[arg(long, env = "CAFEVERSE_CARD_CVV", hide_env_values = true)]
    pub card_cvv: Option<String>,
    #[arg(long)]
    pub upi_id: Option<String>,
    /// Return immediately after the order is placed
    #[arg(long)]
    pub skip_countdown: bool,
}

struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate_home(&self, reason: ExitReason) {
        match reason {
            ExitReason::CountdownElapsed => println!("\nBack to the home page."),
            ExitReason::Skipped => println!("Back to the home page."),
        }
    }
}

pub(crate) async fn run_checkout(storefront: &Storefront, args: CheckoutArgs) -> anyhow::Result<()> {
    let mut cart = storefront.cart();
    let mut checkout = match CheckoutOrchestrator::open(
        &cart,
        storefront.client.clone(),
        storefront.auth.clone(),
        Arc::clone(&storefront.kv),
    ) {
        Ok(checkout) => checkout,
        Err(CheckoutError::EmptyCart) => {
            println!("your cart is empty; add something with `cafeverse cart add <name>`");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    apply_args(&mut checkout, &args)?;
    crate::cart::print_cart(&cart);
    println!();

    let ticket = match checkout.submit(&mut cart).await {
        Ok(ticket) => ticket,
        Err(CheckoutError::Invalid(errors)) => {
            for error in &errors.0 {
                eprintln!("  --{}: {}", flag_for(error.field), error.message);
            }
            anyhow::bail!("checkout details need attention");
        }
        Err(e) => return Err(e.into()),
    };

    let mut confirmation = OrderConfirmation::start(
        &ticket,
        storefront.config.confirmation_countdown_secs,
        Arc::new(TerminalNavigator),
    );
    println!("Order placed! Order number {}", confirmation.order_number());
    println!(
        "{} order, placed at {}",
        confirmation.order_type().label(),
        confirmation.placed_at().format("%H:%M:%S")
    );

    if args.skip_countdown {
        confirmation.skip();
        return Ok(());
    }
    wait_for_countdown(&mut confirmation, BufReader::new(tokio::io::stdin())).await;
    Ok(())
}

/// Counts down in place; a line on `input` (Enter) skips. Once `input` is
/// closed or unreadable the countdown simply runs out.
pub(crate) async fn wait_for_countdown<R>(confirmation: &mut OrderConfirmation, input: R)
where
    R: AsyncBufRead + Unpin,
{
    if confirmation.has_exited() {
        return;
    }
    let mut countdown = confirmation.countdown();
    let mut lines = input.lines();
    let mut input_open = true;
    loop {
        print!("\rRedirecting to home page in {:>2} seconds... (Enter to skip) ", *countdown.borrow());
        if let Err(e) = std::io::Write::flush(&mut std::io::stdout()) {
            tracing::debug!(error = %e, "could not flush countdown line");
        }
        tokio::select! {
            changed = countdown.changed() => {
                if changed.is_err() || *countdown.borrow() == 0 {
                    break;
                }
            }
            line = lines.next_line(), if input_open => match line {
                Ok(Some(_)) => {
                    confirmation.skip();
                    break;
                }
                Ok(None) => input_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin unreadable, letting the countdown run out");
                    input_open = false;
                }
            },
        }
    }
}

fn apply_args<G: OrderGateway>(
    checkout: &mut CheckoutOrchestrator<G>,
    args: &CheckoutArgs,
) -> Result<(), CheckoutError> {
    if let Some(order_type) = args.order_type {
        checkout.set_order_type(order_type)?;
    }
    if let Some(method) = args.payment {
        checkout.set_payment_method(method)?;
    }

    let email = args
        .email
        .clone()
        .unwrap_or_else(|| checkout.draft().contact.email.clone());
    checkout.set_contact(ContactFields {
        email,
        phone: args.phone.clone().unwrap_or_default(),
    })?;
    checkout.set_delivery(DeliveryFields {
        street: args.street.clone().unwrap_or_default(),
        city: args.city.clone().unwrap_or_default(),
        postal_code: args.postal_code.clone().unwrap_or_default(),
    })?;
    checkout.set_card(CardFields {
        number: args.card_number.clone().unwrap_or_default(),
        holder_name: args.card_holder.clone().unwrap_or_default(),
        expiry: args.card_expiry.clone().unwrap_or_default(),
        cvv: args.card_cvv.clone().unwrap_or_default(),
    })?;
    checkout.set_upi(UpiFields {
        upi_id: args.upi_id.clone().unwrap_or_default(),
    })
}

fn flag_for(field: DraftField) -> String {
    match field {
        DraftField::PaymentMethod => "payment".to_string(),
        other => other.as_str().replace('_', "-"),
    }
}
