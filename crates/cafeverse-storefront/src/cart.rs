//! The in-memory cart, mirrored to [`CartStore`] after every change.

use std::sync::Arc;

use cafeverse_core::{CartLine, CartTotals, MenuItem};

use crate::auth::{AuthContext, LoginReason};
use crate::cart_store::CartStore;
use crate::error::CartError;

/// Owns the cart lines. At most one line per name, every quantity at least 1.
#[derive(Debug)]
pub struct CartEngine {
    lines: Vec<CartLine>,
    store: CartStore,
    auth: Arc<dyn AuthContext>,
}

impl CartEngine {
    /// Rebuilds the cart from the store.
    ///
    /// Saved carts that repeat a name or hold zero quantities are repaired on
    /// the way in.
    #[must_use]
    pub fn restore(store: CartStore, auth: Arc<dyn AuthContext>) -> Self {
        let saved = store.load();
        let saved_len = saved.len();
        let lines = normalize(saved);
        if lines.len() != saved_len {
            tracing::debug!(saved = saved_len, kept = lines.len(), "repaired saved cart");
        }
        Self { lines, store, auth }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds one of `candidate`, merging with the line of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Unauthenticated`] and requests a login when nobody
    /// is signed in. The cart is untouched in that case.
    pub fn add_item(&mut self, candidate: &MenuItem) -> Result<(), CartError> {
        self.require_actor(LoginReason::AddToCart)?;
        match self.position(&candidate.name) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.lines.push(CartLine::from_candidate(candidate)),
        }
        tracing::debug!(item = %candidate.name, "added to cart");
        self.persist();
        Ok(())
    }

    /// Replaces the quantity of `name`. Zero or less removes the line; an
    /// unknown name is ignored.
    ///
    /// # Errors
    ///
    /// Same as [`CartEngine::add_item`].
    pub fn set_quantity(&mut self, name: &str, quantity: i64) -> Result<(), CartError> {
        self.require_actor(LoginReason::ManageCart)?;
        let Some(index) = self.position(name) else {
            return Ok(());
        };
        if quantity <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.persist();
        Ok(())
    }

    /// Removes the line for `name`, returning whether there was one.
    pub fn remove_item(&mut self, name: &str) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        self.lines.remove(index);
        self.persist();
        true
    }

    /// Empties the cart and its saved slot.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.store.clear();
    }

    #[must_use]
    pub fn quantity_of(&self, name: &str) -> u32 {
        self.position(name).map_or(0, |index| self.lines[index].quantity)
    }

    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_lines(&self.lines)
    }

    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.totals().subtotal
    }

    #[must_use]
    pub fn tax(&self) -> f64 {
        self.totals().tax
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.totals().total
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.name == name)
    }

    fn require_actor(&self, reason: LoginReason) -> Result<(), CartError> {
        if self.auth.current_actor().is_some() {
            Ok(())
        } else {
            self.auth.request_login(reason);
            Err(CartError::Unauthenticated)
        }
    }

    fn persist(&self) {
        self.store.save(&self.lines);
    }
}

/// Merges lines sharing a name (first occurrence wins, quantities add up) and
/// drops zero-quantity lines.
fn normalize(saved: Vec<CartLine>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(saved.len());
    for line in saved.into_iter().filter(|line| line.quantity > 0) {
        match lines.iter_mut().find(|kept| kept.name == line.name) {
            Some(kept) => kept.quantity = kept.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    lines
}
