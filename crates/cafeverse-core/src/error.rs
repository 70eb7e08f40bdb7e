use thiserror::Error;

/// Errors raised while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised when parsing domain identifiers from free-form input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid order type: {0}")]
    InvalidOrderType(String),

    #[error("invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    #[error("invalid order status: {0}")]
    InvalidOrderStatus(String),
}
