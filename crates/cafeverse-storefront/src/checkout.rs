//! The checkout flow: collect the draft, validate it, send one order, and
//! hand the result to the confirmation step.
//!
//! ```text
//! Collecting ──submit──▶ Validating ──ok──▶ Submitting ──▶ Succeeded
//!     ▲                      │                   │
//!     └──── invalid ─────────┘                   └──────▶ Failed ──edit/submit──▶ …
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use cafeverse_api::{ApiError, CafeApiClient, OrderCreated};
use cafeverse_core::{
    format_card_number, CardFields, CheckoutDraft, ContactFields, DeliveryFields, OrderSubmission,
    OrderType, PaymentMethod, UpiFields, ValidationErrors,
};

use crate::auth::{AuthContext, LoginReason};
use crate::cart::CartEngine;
use crate::error::CheckoutError;
use crate::store::KeyValueStore;

/// Order type remembered so a returning customer resumes where they left off.
pub const ORDER_TYPE_KEY: &str = "cafeverse-order-type";

const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Please log in again.";
const INVALID_ORDER_MESSAGE: &str = "Invalid order data.";
const GENERIC_FAILURE_MESSAGE: &str = "Failed to create order. Please try again.";

/// Where order-creation requests go.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(
        &self,
        token: &str,
        submission: &OrderSubmission,
    ) -> Result<OrderCreated, ApiError>;
}

#[async_trait]
impl OrderGateway for CafeApiClient {
    async fn create_order(
        &self,
        token: &str,
        submission: &OrderSubmission,
    ) -> Result<OrderCreated, ApiError> {
        CafeApiClient::create_order(self, token, submission).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Collecting,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// A failed submission, as the user should hear about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutFailure {
    /// The token was refused. Fatal: the user must sign in again.
    Authentication { message: String },
    /// The backend refused the order and said why. The user can fix and resend.
    Rejected { message: String },
    /// Transport fault, malformed answer, or a refusal without a reason.
    Unknown { message: String },
}

impl CheckoutFailure {
    #[must_use]
    pub fn from_api(err: &ApiError) -> Self {
        let backend = err.backend_message().map(str::to_string);
        match err {
            ApiError::Unauthorized { .. } => CheckoutFailure::Authentication {
                message: backend.unwrap_or_else(|| AUTH_FAILED_MESSAGE.to_string()),
            },
            ApiError::Rejected { status, .. } => match (backend, status) {
                (Some(message), _) => CheckoutFailure::Rejected { message },
                (None, 400) => CheckoutFailure::Rejected {
                    message: INVALID_ORDER_MESSAGE.to_string(),
                },
                (None, _) => CheckoutFailure::Unknown {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                },
            },
            ApiError::Http(_) | ApiError::Deserialize { .. } | ApiError::InvalidBaseUrl(_) => {
                CheckoutFailure::Unknown {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                }
            }
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            CheckoutFailure::Authentication { message }
            | CheckoutFailure::Rejected { message }
            | CheckoutFailure::Unknown { message } => message,
        }
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, CheckoutFailure::Authentication { .. })
    }
}

/// What the confirmation step needs from a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationTicket {
    /// Backend order id; `None` when the backend did not return one.
    pub order_id: Option<String>,
    pub order_type: OrderType,
}

/// Drives one checkout session.
pub struct CheckoutOrchestrator<G> {
    gateway: G,
    auth: Arc<dyn AuthContext>,
    kv: Arc<dyn KeyValueStore>,
    draft: CheckoutDraft,
    state: CheckoutState,
    field_errors: Option<ValidationErrors>,
    last_failure: Option<CheckoutFailure>,
}

impl<G: OrderGateway> CheckoutOrchestrator<G> {
    /// Opens checkout for the current cart.
    ///
    /// The email is prefilled from the signed-in actor and a previously chosen
    /// order type is restored.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Unauthenticated`] when nobody is signed in; a login
    ///   is requested.
    /// - [`CheckoutError::EmptyCart`] when there is nothing to order; the
    ///   caller should send the user back to the menu.
    pub fn open(
        cart: &CartEngine,
        gateway: G,
        auth: Arc<dyn AuthContext>,
        kv: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CheckoutError> {
        let Some(actor) = auth.current_actor() else {
            auth.request_login(LoginReason::Checkout);
            return Err(CheckoutError::Unauthenticated);
        };
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let draft = CheckoutDraft {
            order_type: cached_order_type(kv.as_ref()),
            contact: ContactFields {
                email: actor.email.clone().unwrap_or_default(),
                phone: String::new(),
            },
            ..CheckoutDraft::default()
        };

        Ok(Self {
            gateway,
            auth,
            kv,
            draft,
            state: CheckoutState::Collecting,
            field_errors: None,
            last_failure: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    #[must_use]
    pub fn draft(&self) -> &CheckoutDraft {
        &self.draft
    }

    /// Field messages from the last rejected submit.
    #[must_use]
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        self.field_errors.as_ref()
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<&CheckoutFailure> {
        self.last_failure.as_ref()
    }

    /// Chooses the order type and remembers it for a later visit.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::NotEditable`] while submitting,
    /// [`CheckoutError::Finished`] after the order was placed.
    pub fn set_order_type(&mut self, order_type: OrderType) -> Result<(), CheckoutError> {
        self.begin_edit()?;
        self.draft.order_type = Some(order_type);
        if let Err(e) = self.kv.set(ORDER_TYPE_KEY, order_type.as_str()) {
            tracing::warn!(key = ORDER_TYPE_KEY, error = %e, "failed to remember order type");
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`CheckoutOrchestrator::set_order_type`].
    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.begin_edit()?;
        self.draft.payment_method = Some(method);
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`CheckoutOrchestrator::set_order_type`].
    pub fn set_contact(&mut self, contact: ContactFields) -> Result<(), CheckoutError> {
        self.begin_edit()?;
        self.draft.contact = contact;
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`CheckoutOrchestrator::set_order_type`].
    pub fn set_delivery(&mut self, delivery: DeliveryFields) -> Result<(), CheckoutError> {
        self.begin_edit()?;
        self.draft.delivery = delivery;
        Ok(())
    }

    /// Stores the card details, grouping the number in fours as typed.
    ///
    /// # Errors
    ///
    /// Same as [`CheckoutOrchestrator::set_order_type`].
    pub fn set_card(&mut self, mut card: CardFields) -> Result<(), CheckoutError> {
        self.begin_edit()?;
        card.number = format_card_number(&card.number);
        self.draft.card = card;
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`CheckoutOrchestrator::set_order_type`].
    pub fn set_upi(&mut self, upi: UpiFields) -> Result<(), CheckoutError> {
        self.begin_edit()?;
        self.draft.upi = upi;
        Ok(())
    }

    /// Validates the draft and, if it passes, sends exactly one order.
    ///
    /// On success the cart and the remembered order type are cleared. On any
    /// failure the cart and draft are left exactly as they were and submit
    /// may be called again.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::SubmissionInFlight`] / [`CheckoutError::Finished`]
    ///   when the state forbids a submit.
    /// - [`CheckoutError::Invalid`] when the draft fails validation; nothing
    ///   is sent.
    /// - [`CheckoutError::Unauthenticated`] / [`CheckoutError::EmptyCart`]
    ///   when the session or cart disappeared since opening; nothing is sent.
    /// - [`CheckoutError::Submission`] when the order was sent and failed. An
    ///   authentication failure also requests a login.
    pub async fn submit(
        &mut self,
        cart: &mut CartEngine,
    ) -> Result<ConfirmationTicket, CheckoutError> {
        match self.state {
            // `&mut self` keeps a second submit out while one is being awaited.
            // A request future that was leaked instead of dropped never resets
            // the state, so the checkout stays locked rather than sending again.
            CheckoutState::Submitting => return Err(CheckoutError::SubmissionInFlight),
            CheckoutState::Succeeded => return Err(CheckoutError::Finished),
            CheckoutState::Collecting | CheckoutState::Validating | CheckoutState::Failed => {}
        }

        self.state = CheckoutState::Validating;
        let (submission, token) = match self.prepare(cart) {
            Ok(prepared) => prepared,
            Err(e) => {
                self.state = CheckoutState::Collecting;
                return Err(e);
            }
        };

        tracing::info!(
            order_type = %submission.order_type,
            payment_method = %submission.payment_method,
            items = submission.items.len(),
            "submitting order"
        );

        let result = {
            let mut in_flight = InFlight::enter(&mut self.state);
            let result = self.gateway.create_order(&token, &submission).await;
            in_flight.settle(if result.is_ok() {
                CheckoutState::Succeeded
            } else {
                CheckoutState::Failed
            });
            result
        };

        match result {
            Ok(created) => {
                tracing::info!(order_id = ?created.order_id, "order placed");
                cart.clear();
                if let Err(e) = self.kv.remove(ORDER_TYPE_KEY) {
                    tracing::warn!(key = ORDER_TYPE_KEY, error = %e, "failed to forget order type");
                }
                self.last_failure = None;
                Ok(ConfirmationTicket {
                    order_id: created.order_id,
                    order_type: submission.order_type,
                })
            }
            Err(err) => {
                let failure = CheckoutFailure::from_api(&err);
                tracing::warn!(error = %err, fatal = failure.is_fatal(), "order submission failed");
                if failure.is_fatal() {
                    self.auth.request_login(LoginReason::SessionExpired);
                }
                self.last_failure = Some(failure.clone());
                Err(CheckoutError::Submission(failure))
            }
        }
    }

    /// Runs every local gate, returning the payload and token to send.
    fn prepare(&mut self, cart: &CartEngine) -> Result<(OrderSubmission, String), CheckoutError> {
        if let Err(errors) = self.draft.validate() {
            tracing::debug!(fields = errors.0.len(), "checkout draft rejected");
            self.field_errors = Some(errors.clone());
            return Err(CheckoutError::Invalid(errors));
        }
        self.field_errors = None;

        let (Some(actor), Some(token)) = (self.auth.current_actor(), self.auth.token()) else {
            self.auth.request_login(LoginReason::Checkout);
            return Err(CheckoutError::Unauthenticated);
        };
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // `validate` has already required both selections.
        let submission = OrderSubmission::build(cart.lines(), &self.draft, actor.display_name())
            .ok_or(CheckoutError::EmptyCart)?;
        Ok((submission, token))
    }

    fn begin_edit(&mut self) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Collecting => Ok(()),
            CheckoutState::Failed => {
                self.state = CheckoutState::Collecting;
                Ok(())
            }
            CheckoutState::Validating | CheckoutState::Submitting => {
                Err(CheckoutError::NotEditable)
            }
            CheckoutState::Succeeded => Err(CheckoutError::Finished),
        }
    }
}

impl<G> std::fmt::Debug for CheckoutOrchestrator<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutOrchestrator")
            .field("state", &self.state)
            .field("draft", &self.draft)
            .field("last_failure", &self.last_failure)
            .finish_non_exhaustive()
    }
}

/// Holds the state at `Submitting` while the request is out. If the request
/// future is dropped before it settles, the checkout falls back to `Failed`.
struct InFlight<'a> {
    state: &'a mut CheckoutState,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a mut CheckoutState) -> Self {
        *state = CheckoutState::Submitting;
        Self {
            state,
            settled: false,
        }
    }

    fn settle(&mut self, outcome: CheckoutState) {
        *self.state = outcome;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.state = CheckoutState::Failed;
        }
    }
}

fn cached_order_type(kv: &dyn KeyValueStore) -> Option<OrderType> {
    match kv.get(ORDER_TYPE_KEY) {
        Ok(Some(raw)) => raw.parse().ok(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key = ORDER_TYPE_KEY, error = %e, "remembered order type unreadable");
            None
        }
    }
}

#[cfg(test)]
#[path = "checkout_test.rs"]
mod tests;
