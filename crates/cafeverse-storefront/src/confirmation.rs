//! The post-order screen: shows the order number and counts down to home.
//!
//! One spawned ticker task owns the countdown. Skipping, reaching zero, and
//! dropping the confirmation all end that same task, and home is navigated to
//! at most once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cafeverse_core::OrderType;
use chrono::{DateTime, Local, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::checkout::ConfirmationTicket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    CountdownElapsed,
    Skipped,
}

/// Receives the single "go home" transition.
pub trait Navigator: Send + Sync {
    fn navigate_home(&self, reason: ExitReason);
}

/// `CV-<id>` for a backend id, else `CV-<last 6 digits of the clock>-<3 random digits>`.
#[must_use]
pub fn order_number(order_id: Option<&str>) -> String {
    match order_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("CV-{id}"),
        None => {
            let millis = Utc::now().timestamp_millis().rem_euclid(1_000_000);
            let suffix: u16 = rand::random_range(0..1000);
            format!("CV-{millis:06}-{suffix:03}")
        }
    }
}

struct Exit {
    navigator: Arc<dyn Navigator>,
    done: AtomicBool,
}

impl Exit {
    fn leave(&self, reason: ExitReason) {
        if self.done.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!(?reason, "leaving order confirmation");
        self.navigator.navigate_home(reason);
    }
}

pub struct OrderConfirmation {
    order_number: String,
    order_type: OrderType,
    placed_at: DateTime<Local>,
    remaining: watch::Receiver<u32>,
    ticker: Option<JoinHandle<()>>,
    exit: Arc<Exit>,
}

impl OrderConfirmation {
    /// Shows the confirmation and starts the countdown. Must be called inside
    /// a tokio runtime.
    ///
    /// A zero countdown navigates home immediately.
    #[must_use]
    pub fn start(
        ticket: &ConfirmationTicket,
        countdown_secs: u32,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (tx, remaining) = watch::channel(countdown_secs);
        let exit = Arc::new(Exit {
            navigator,
            done: AtomicBool::new(false),
        });

        let ticker = if countdown_secs == 0 {
            exit.leave(ExitReason::CountdownElapsed);
            None
        } else {
            let exit = Arc::clone(&exit);
            Some(tokio::spawn(async move {
                let period = Duration::from_secs(1);
                let mut ticks = interval_at(Instant::now() + period, period);
                let mut left = countdown_secs;
                while left > 0 {
                    ticks.tick().await;
                    left -= 1;
                    tx.send_replace(left);
                }
                exit.leave(ExitReason::CountdownElapsed);
            }))
        };

        let order_number = order_number(ticket.order_id.as_deref());
        tracing::info!(order_number = %order_number, order_type = %ticket.order_type, "order confirmed");

        Self {
            order_number,
            order_type: ticket.order_type,
            placed_at: Local::now(),
            remaining,
            ticker,
            exit,
        }
    }

    #[must_use]
    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    #[must_use]
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    #[must_use]
    pub fn placed_at(&self) -> DateTime<Local> {
        self.placed_at
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    /// A receiver that observes every countdown step.
    #[must_use]
    pub fn countdown(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    #[must_use]
    pub fn has_exited(&self) -> bool {
        self.exit.done.load(Ordering::SeqCst)
    }

    /// Stops the countdown and goes home now. Does nothing once home was
    /// already reached.
    pub fn skip(&mut self) {
        self.stop_ticker();
        self.exit.leave(ExitReason::Skipped);
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for OrderConfirmation {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

impl std::fmt::Debug for OrderConfirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderConfirmation")
            .field("order_number", &self.order_number)
            .field("order_type", &self.order_type)
            .field("remaining", &self.remaining())
            .field("exited", &self.has_exited())
            .finish_non_exhaustive()
    }
}
