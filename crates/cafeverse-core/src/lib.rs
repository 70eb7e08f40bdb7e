pub mod actor;
pub mod app_config;
pub mod cart_line;
pub mod checkout;
pub mod config;
pub mod error;
pub mod menu;
pub mod orders;
pub mod pricing;
pub mod submission;

pub use actor::Actor;
pub use app_config::{AppConfig, Environment};
pub use cart_line::CartLine;
pub use checkout::{
    format_card_number, CardFields, CheckoutDraft, ContactFields, DeliveryFields, DraftField,
    FieldError, OrderType, PaymentMethod, UpiFields, ValidationErrors,
};
pub use config::load_app_config;
pub use error::{ConfigError, CoreError};
pub use menu::{category_slug, MenuCategory, MenuFilter, MenuItem, DEFAULT_ITEM_IMAGE};
pub use orders::{
    filter_orders, OrderRecord, OrderStatus, OrderedItem, StatusCounts, StatusFilter, TypeFilter,
};
pub use pricing::{format_amount, numeric_price, parse_price, CartTotals, TAX_RATE};
pub use submission::{OrderSubmission, SubmissionItem, FALLBACK_ITEM_ID};
