//! Report delivery over SMTP.
//!
//! [`Notifier`] is the seam the rest of the service talks to;
//! [`SmtpNotifier`] implements it on top of lettre's tokio transport.

mod message;
mod notifier;

pub use message::build_message;
pub use notifier::{Notifier, SmtpNotifier};

use skycast_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

impl From<DeliveryError> for AppError {
    fn from(err: DeliveryError) -> Self {
        AppError::Delivery(err.to_string())
    }
}
