//! Taxi domain error model.

use thiserror::Error;

use taxiflow_core::DomainError;

use crate::driver::DriverId;
use crate::order::{OrderAction, OrderId, TaxiOrderStatus};

/// Result type used across the taxi domain.
pub type TaxiResult<T> = Result<T, TaxiError>;

/// Taxi domain error.
///
/// Every variant describes a business decision, not a transient failure, so
/// none of them is worth retrying as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaxiError {
    /// The action is not legal from the order's current status. Nothing changed.
    #[error("cannot {action} while order is {status}")]
    InvalidTransition {
        action: OrderAction,
        status: TaxiOrderStatus,
    },

    /// The driver directory does not know this driver.
    #[error("unknown driver id {0}")]
    UnknownDriver(DriverId),

    /// No order with this id was ever created by the hosting service.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl TaxiError {
    pub fn invalid_transition(action: OrderAction, status: TaxiOrderStatus) -> Self {
        Self::InvalidTransition { action, status }
    }

    /// Current status carried by an `InvalidTransition`, if that is what this is.
    pub fn current_status(&self) -> Option<TaxiOrderStatus> {
        match self {
            Self::InvalidTransition { status, .. } => Some(*status),
            _ => None,
        }
    }
}
