//! Order service facade.
//!
//! One method per lifecycle action. Each call:
//!
//! ```text
//! load order (copy) → read clock → [resolve driver] → aggregate mutator → save (version-checked)
//! ```
//!
//! Errors from the aggregate, the driver directory and the store reach the
//! caller unchanged; the service never retries.

use std::sync::Arc;

use tracing::{debug, info, warn};

use taxiflow_core::{AggregateRoot, Clock, ExpectedVersion, SequenceGenerator};

use crate::config::OrdersConfig;
use crate::driver::{DriverDirectory, DriverId};
use crate::error::{TaxiError, TaxiResult};
use crate::order::{OrderAction, OrderId, TaxiOrder};
use crate::store::{InMemoryOrderStore, OrderStore};
use crate::value::{Address, PersonName};

/// Source of fresh order ids. Implementations must never hand out an id twice.
pub trait OrderIdGenerator: Send + Sync {
    fn next_id(&self) -> OrderId;
}

impl OrderIdGenerator for SequenceGenerator {
    fn next_id(&self) -> OrderId {
        OrderId::new(self.next_value())
    }
}

/// Facade over the taxi order lifecycle.
///
/// Shareable across threads. Orders are stored as copies and written back with
/// an optimistic version check, so two callers racing on the same order get a
/// `Conflict` instead of a lost update.
#[derive(Clone)]
pub struct TaxiOrderService {
    orders: Arc<dyn OrderStore>,
    drivers: Arc<dyn DriverDirectory>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn OrderIdGenerator>,
}

impl TaxiOrderService {
    /// Service with an in-memory store and ids starting at 0.
    pub fn new(drivers: Arc<dyn DriverDirectory>, clock: Arc<dyn Clock>) -> Self {
        Self::from_config(&OrdersConfig::default(), drivers, clock)
    }

    pub fn from_config(
        config: &OrdersConfig,
        drivers: Arc<dyn DriverDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders: Arc::new(InMemoryOrderStore::new()),
            drivers,
            clock,
            ids: Arc::new(SequenceGenerator::starting_at(config.first_order_id)),
        }
    }

    pub fn with_store(mut self, orders: Arc<dyn OrderStore>) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn OrderIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Create an order without destination, waiting for a driver.
    pub fn create_order(
        &self,
        first_name: &str,
        last_name: &str,
        street: &str,
        building: &str,
    ) -> TaxiResult<OrderId> {
        let id = self.ids.next_id();
        let order = TaxiOrder::create(
            id,
            PersonName::new(first_name, last_name),
            Address::new(street, building),
            self.clock.now(),
        );
        self.orders.insert(order)?;

        info!(order_id = %id, "taxi order created");
        Ok(id)
    }

    pub fn update_destination(&self, id: OrderId, street: &str, building: &str) -> TaxiResult<()> {
        let destination = Address::new(street, building);
        self.mutate(id, OrderAction::UpdateDestination, |order| {
            order.update_destination(destination)
        })
    }

    /// Resolve the driver, then assign it.
    ///
    /// An unknown driver id is reported before the order's status is checked.
    pub fn assign_driver(&self, id: OrderId, driver_id: DriverId) -> TaxiResult<()> {
        let now = self.clock.now();
        self.mutate(id, OrderAction::AssignDriver, |order| {
            let driver = self.drivers.resolve(driver_id)?;
            order.assign_driver(driver, now)
        })
    }

    pub fn unassign_driver(&self, id: OrderId) -> TaxiResult<()> {
        self.mutate(id, OrderAction::UnassignDriver, TaxiOrder::unassign_driver)
    }

    pub fn cancel(&self, id: OrderId) -> TaxiResult<()> {
        let now = self.clock.now();
        self.mutate(id, OrderAction::Cancel, |order| order.cancel(now))
    }

    pub fn start_ride(&self, id: OrderId) -> TaxiResult<()> {
        let now = self.clock.now();
        self.mutate(id, OrderAction::StartRide, |order| order.start_ride(now))
    }

    pub fn finish_ride(&self, id: OrderId) -> TaxiResult<()> {
        let now = self.clock.now();
        self.mutate(id, OrderAction::FinishRide, |order| order.finish_ride(now))
    }

    pub fn short_order_info(&self, id: OrderId) -> TaxiResult<String> {
        debug!(order_id = %id, "short order info requested");
        Ok(self.load(id)?.short_info())
    }

    /// `Ok(None)` while the order waits for a driver.
    pub fn driver_full_info(&self, id: OrderId) -> TaxiResult<Option<String>> {
        debug!(order_id = %id, "driver info requested");
        Ok(self.load(id)?.driver_full_info())
    }

    /// Copy of the current order state.
    pub fn order(&self, id: OrderId) -> TaxiResult<TaxiOrder> {
        self.load(id)
    }

    fn load(&self, id: OrderId) -> TaxiResult<TaxiOrder> {
        self.orders.get(id).ok_or(TaxiError::OrderNotFound(id))
    }

    fn mutate<F>(&self, id: OrderId, action: OrderAction, change: F) -> TaxiResult<()>
    where
        F: FnOnce(&mut TaxiOrder) -> TaxiResult<()>,
    {
        let mut order = self.load(id)?;
        let expected = ExpectedVersion::Exact(order.version());

        if let Err(err) = change(&mut order) {
            warn!(order_id = %id, %action, error = %err, "taxi order action rejected");
            return Err(err);
        }

        let status = order.status();
        self.orders.save(order, expected)?;

        info!(order_id = %id, %action, %status, "taxi order updated");
        Ok(())
    }
}

impl core::fmt::Debug for TaxiOrderService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaxiOrderService").finish_non_exhaustive()
    }
}
