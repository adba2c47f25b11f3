//! Environment-driven configuration.

use taxiflow_core::{DomainError, DomainResult};

/// Settings for a [`TaxiOrderService`](crate::TaxiOrderService).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrdersConfig {
    /// First id handed out by the order id sequence.
    pub first_order_id: u64,
}

impl OrdersConfig {
    pub const FIRST_ORDER_ID_VAR: &'static str = "TAXIFLOW_FIRST_ORDER_ID";

    /// Read from the process environment; unset variables keep their defaults.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DomainResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(Self::FIRST_ORDER_ID_VAR) {
            config.first_order_id = raw.trim().parse().map_err(|e| {
                DomainError::validation(format!("{}={raw:?}: {e}", Self::FIRST_ORDER_ID_VAR))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = OrdersConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, OrdersConfig::default());
        assert_eq!(config.first_order_id, 0);
    }

    #[test]
    fn reads_first_order_id() {
        let config = OrdersConfig::from_lookup(|key| {
            (key == OrdersConfig::FIRST_ORDER_ID_VAR).then(|| " 1000 ".to_string())
        })
        .unwrap();
        assert_eq!(config.first_order_id, 1000);
    }

    #[test]
    fn malformed_value_is_a_validation_error() {
        let err = OrdersConfig::from_lookup(|_| Some("ten".to_string())).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("TAXIFLOW_FIRST_ORDER_ID")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
