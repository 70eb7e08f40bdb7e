use cafeverse_api::ApiError;
use cafeverse_core::{OrderStatus, ValidationErrors};
use thiserror::Error;

use crate::auth::LoginReason;
use crate::checkout::CheckoutFailure;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported cart format version {0:?}")]
    UnsupportedVersion(Option<u64>),

    #[error("stored cart is neither a list nor a versioned envelope")]
    UnexpectedShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("{}", LoginReason::ManageCart.message())]
    Unauthenticated,
}

/// Why the checkout refused to open or to submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("{}", LoginReason::Checkout.message())]
    Unauthenticated,

    #[error("the cart is empty")]
    EmptyCart,

    #[error("an order is already being submitted")]
    SubmissionInFlight,

    #[error("checkout details cannot change while an order is being submitted")]
    NotEditable,

    #[error("this checkout already placed its order")]
    Finished,

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("{}", .0.message())]
    Submission(CheckoutFailure),
}

#[derive(Debug, Error)]
pub enum OrdersError {
    #[error("{}", .0.message())]
    LoginRequired(LoginReason),

    #[error("Access denied. Admin privileges required.")]
    AdminOnly,

    #[error("order #{0} is not in the loaded list")]
    UnknownOrder(i64),

    #[error("order #{id} is {status} and can no longer be cancelled")]
    NotCancellable { id: i64, status: OrderStatus },

    #[error(transparent)]
    Api(#[from] ApiError),
}
