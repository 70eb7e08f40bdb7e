//! Client-side state of the café storefront: the saved cart, the signed-in
//! session, the checkout flow, the confirmation countdown, and the order
//! tracking and admin views.

pub mod auth;
pub mod cart;
pub mod cart_store;
pub mod checkout;
pub mod confirmation;
pub mod error;
pub mod orders;
pub mod store;

pub use auth::{AuthContext, LoginReason, SessionAuth, TOKEN_KEY, USER_KEY};
pub use cart::CartEngine;
pub use cart_store::{CartStore, CART_FORMAT_VERSION, CART_KEY};
pub use checkout::{
    CheckoutFailure, CheckoutOrchestrator, CheckoutState, ConfirmationTicket, OrderGateway,
    ORDER_TYPE_KEY,
};
pub use confirmation::{order_number, ExitReason, Navigator, OrderConfirmation};
pub use error::{CartError, CheckoutError, OrdersError, StoreError};
pub use orders::{AdminDashboard, OrderTracker};
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
