//! Order storage owned by the hosting layer.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use taxiflow_core::{AggregateRoot, DomainError, DomainResult, Entity, ExpectedVersion};

use crate::order::{OrderId, TaxiOrder};

/// Keyed storage for taxi orders.
///
/// `get` hands out a copy; changes become visible only through `save`, which
/// rejects the write when the stored version moved on in the meantime.
pub trait OrderStore: Send + Sync {
    /// Store a freshly created order. Fails if the id is already taken.
    fn insert(&self, order: TaxiOrder) -> DomainResult<()>;

    fn get(&self, id: OrderId) -> Option<TaxiOrder>;

    /// Replace a stored order if its stored version matches `expected`.
    fn save(&self, order: TaxiOrder, expected: ExpectedVersion) -> DomainResult<()>;

    /// All orders, sorted by id.
    fn list(&self) -> Vec<TaxiOrder>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn insert(&self, order: TaxiOrder) -> DomainResult<()> {
        (**self).insert(order)
    }

    fn get(&self, id: OrderId) -> Option<TaxiOrder> {
        (**self).get(id)
    }

    fn save(&self, order: TaxiOrder, expected: ExpectedVersion) -> DomainResult<()> {
        (**self).save(order, expected)
    }

    fn list(&self) -> Vec<TaxiOrder> {
        (**self).list()
    }
}

/// In-memory order store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    inner: RwLock<HashMap<OrderId, TaxiOrder>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> DomainError {
        DomainError::conflict("order store lock poisoned")
    }
}

impl OrderStore for InMemoryOrderStore {
    fn insert(&self, order: TaxiOrder) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        let id = *order.id();
        if map.contains_key(&id) {
            return Err(DomainError::conflict(format!("order {id} already exists")));
        }
        map.insert(id, order);
        Ok(())
    }

    fn get(&self, id: OrderId) -> Option<TaxiOrder> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn save(&self, order: TaxiOrder, expected: ExpectedVersion) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        let id = *order.id();
        let stored = map
            .get(&id)
            .ok_or_else(|| DomainError::conflict(format!("order {id} was never inserted")))?;
        expected.check(stored.version())?;
        map.insert(id, order);
        Ok(())
    }

    fn list(&self) -> Vec<TaxiOrder> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut orders: Vec<_> = map.values().cloned().collect();
        orders.sort_by_key(|o| *o.id());
        orders
    }
}
