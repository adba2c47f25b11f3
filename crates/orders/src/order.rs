use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taxiflow_core::{Aggregate, AggregateRoot, Entity, impl_entity_identity, impl_numeric_id};

use crate::driver::Driver;
use crate::error::{TaxiError, TaxiResult};
use crate::value::{Address, PersonName};

/// Taxi order identifier. Assigned once at creation, never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl_numeric_id!(OrderId, "OrderId");

/// Taxi order status lifecycle, in order of progression.
///
/// ```text
/// WaitingForDriver ⇄ WaitingCarArrival → InProgress → Finished
///        └───────────────┴───────────────────────┴──→ Canceled
/// ```
///
/// Cancel is refused only while the ride is in progress; a finished or already
/// canceled order can be canceled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxiOrderStatus {
    WaitingForDriver,
    WaitingCarArrival,
    InProgress,
    Finished,
    Canceled,
}

impl TaxiOrderStatus {
    pub const ALL: [TaxiOrderStatus; 5] = [
        TaxiOrderStatus::WaitingForDriver,
        TaxiOrderStatus::WaitingCarArrival,
        TaxiOrderStatus::InProgress,
        TaxiOrderStatus::Finished,
        TaxiOrderStatus::Canceled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaxiOrderStatus::WaitingForDriver => "WaitingForDriver",
            TaxiOrderStatus::WaitingCarArrival => "WaitingCarArrival",
            TaxiOrderStatus::InProgress => "InProgress",
            TaxiOrderStatus::Finished => "Finished",
            TaxiOrderStatus::Canceled => "Canceled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaxiOrderStatus::Finished | TaxiOrderStatus::Canceled)
    }

    /// The transition table: status reached by `action` from `self`, if legal.
    pub fn next(self, action: OrderAction) -> Option<TaxiOrderStatus> {
        use TaxiOrderStatus::*;

        match (action, self) {
            (OrderAction::UpdateDestination, status) => Some(status),
            (OrderAction::AssignDriver, WaitingForDriver) => Some(WaitingCarArrival),
            (OrderAction::UnassignDriver, WaitingCarArrival) => Some(WaitingForDriver),
            (OrderAction::StartRide, WaitingCarArrival) => Some(InProgress),
            (OrderAction::FinishRide, InProgress) => Some(Finished),
            (OrderAction::Cancel, status) if status != InProgress => Some(Canceled),
            _ => None,
        }
    }

    pub fn allows(self, action: OrderAction) -> bool {
        self.next(action).is_some()
    }
}

impl core::fmt::Display for TaxiOrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle actions an order accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderAction {
    UpdateDestination,
    AssignDriver,
    UnassignDriver,
    Cancel,
    StartRide,
    FinishRide,
}

impl OrderAction {
    pub const ALL: [OrderAction; 6] = [
        OrderAction::UpdateDestination,
        OrderAction::AssignDriver,
        OrderAction::UnassignDriver,
        OrderAction::Cancel,
        OrderAction::StartRide,
        OrderAction::FinishRide,
    ];
}

impl core::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            OrderAction::UpdateDestination => "update destination",
            OrderAction::AssignDriver => "assign driver",
            OrderAction::UnassignDriver => "unassign driver",
            OrderAction::Cancel => "cancel",
            OrderAction::StartRide => "start ride",
            OrderAction::FinishRide => "finish ride",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TaxiOrderCommand {
    UpdateDestination {
        destination: Address,
    },
    /// Carries an already resolved driver; lookups happen outside the aggregate.
    AssignDriver {
        driver: Driver,
        occurred_at: DateTime<Utc>,
    },
    UnassignDriver,
    Cancel {
        occurred_at: DateTime<Utc>,
    },
    StartRide {
        occurred_at: DateTime<Utc>,
    },
    FinishRide {
        occurred_at: DateTime<Utc>,
    },
}

impl TaxiOrderCommand {
    pub fn action(&self) -> OrderAction {
        match self {
            TaxiOrderCommand::UpdateDestination { .. } => OrderAction::UpdateDestination,
            TaxiOrderCommand::AssignDriver { .. } => OrderAction::AssignDriver,
            TaxiOrderCommand::UnassignDriver => OrderAction::UnassignDriver,
            TaxiOrderCommand::Cancel { .. } => OrderAction::Cancel,
            TaxiOrderCommand::StartRide { .. } => OrderAction::StartRide,
            TaxiOrderCommand::FinishRide { .. } => OrderAction::FinishRide,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TaxiOrderEvent {
    DestinationUpdated {
        destination: Address,
    },
    DriverAssigned {
        driver: Driver,
        occurred_at: DateTime<Utc>,
    },
    DriverUnassigned,
    OrderCanceled {
        occurred_at: DateTime<Utc>,
    },
    RideStarted {
        occurred_at: DateTime<Utc>,
    },
    RideFinished {
        occurred_at: DateTime<Utc>,
    },
}

impl TaxiOrderEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            TaxiOrderEvent::DestinationUpdated { .. } => "taxi.order.destination_updated",
            TaxiOrderEvent::DriverAssigned { .. } => "taxi.order.driver_assigned",
            TaxiOrderEvent::DriverUnassigned => "taxi.order.driver_unassigned",
            TaxiOrderEvent::OrderCanceled { .. } => "taxi.order.canceled",
            TaxiOrderEvent::RideStarted { .. } => "taxi.order.ride_started",
            TaxiOrderEvent::RideFinished { .. } => "taxi.order.ride_finished",
        }
    }
}

/// Aggregate root: TaxiOrder.
///
/// Compared by id. Every mutator either applies fully or returns an error and
/// leaves the order untouched.
#[derive(Debug, Clone)]
pub struct TaxiOrder {
    id: OrderId,
    client: PersonName,
    start: Address,
    destination: Option<Address>,
    driver: Option<Driver>,
    status: TaxiOrderStatus,
    created_at: DateTime<Utc>,
    driver_assigned_at: Option<DateTime<Utc>>,
    canceled_at: Option<DateTime<Utc>>,
    ride_started_at: Option<DateTime<Utc>>,
    ride_finished_at: Option<DateTime<Utc>>,
    version: u64,
}

impl TaxiOrder {
    /// New order waiting for a driver, with no destination yet.
    pub fn create(
        id: OrderId,
        client: PersonName,
        start: Address,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            client,
            start,
            destination: None,
            driver: None,
            status: TaxiOrderStatus::WaitingForDriver,
            created_at,
            driver_assigned_at: None,
            canceled_at: None,
            ride_started_at: None,
            ride_finished_at: None,
            version: 0,
        }
    }

    pub fn client(&self) -> &PersonName {
        &self.client
    }

    pub fn start(&self) -> &Address {
        &self.start
    }

    /// `None` until a destination is set.
    pub fn destination(&self) -> Option<&Address> {
        self.destination.as_ref()
    }

    /// `None` while waiting for a driver.
    pub fn driver(&self) -> Option<&Driver> {
        self.driver.as_ref()
    }

    pub fn status(&self) -> TaxiOrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn driver_assigned_at(&self) -> Option<DateTime<Utc>> {
        self.driver_assigned_at
    }

    pub fn canceled_at(&self) -> Option<DateTime<Utc>> {
        self.canceled_at
    }

    pub fn ride_started_at(&self) -> Option<DateTime<Utc>> {
        self.ride_started_at
    }

    pub fn ride_finished_at(&self) -> Option<DateTime<Utc>> {
        self.ride_finished_at
    }

    /// Time the current status was entered.
    pub fn last_progress_time(&self) -> DateTime<Utc> {
        let entered = match self.status {
            TaxiOrderStatus::WaitingForDriver => Some(self.created_at),
            TaxiOrderStatus::WaitingCarArrival => self.driver_assigned_at,
            TaxiOrderStatus::InProgress => self.ride_started_at,
            TaxiOrderStatus::Finished => self.ride_finished_at,
            TaxiOrderStatus::Canceled => self.canceled_at,
        };
        // apply() records the timestamp together with every status change.
        entered.unwrap_or(self.created_at)
    }

    /// Replace the destination. Allowed in every status.
    pub fn update_destination(&mut self, destination: Address) -> TaxiResult<()> {
        self.execute(&TaxiOrderCommand::UpdateDestination { destination })?;
        Ok(())
    }

    pub fn assign_driver(&mut self, driver: Driver, now: DateTime<Utc>) -> TaxiResult<()> {
        self.execute(&TaxiOrderCommand::AssignDriver {
            driver,
            occurred_at: now,
        })?;
        Ok(())
    }

    pub fn unassign_driver(&mut self) -> TaxiResult<()> {
        self.execute(&TaxiOrderCommand::UnassignDriver)?;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> TaxiResult<()> {
        self.execute(&TaxiOrderCommand::Cancel { occurred_at: now })?;
        Ok(())
    }

    pub fn start_ride(&mut self, now: DateTime<Utc>) -> TaxiResult<()> {
        self.execute(&TaxiOrderCommand::StartRide { occurred_at: now })?;
        Ok(())
    }

    pub fn finish_ride(&mut self, now: DateTime<Utc>) -> TaxiResult<()> {
        self.execute(&TaxiOrderCommand::FinishRide { occurred_at: now })?;
        Ok(())
    }
}

impl Entity for TaxiOrder {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl_entity_identity!(TaxiOrder);

impl AggregateRoot for TaxiOrder {
    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for TaxiOrder {
    type Command = TaxiOrderCommand;
    type Event = TaxiOrderEvent;
    type Error = TaxiError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            TaxiOrderEvent::DestinationUpdated { destination } => {
                self.destination = Some(destination.clone());
            }
            TaxiOrderEvent::DriverAssigned {
                driver,
                occurred_at,
            } => {
                self.driver = Some(driver.clone());
                self.driver_assigned_at = Some(*occurred_at);
                self.status = TaxiOrderStatus::WaitingCarArrival;
            }
            TaxiOrderEvent::DriverUnassigned => {
                self.driver = None;
                self.status = TaxiOrderStatus::WaitingForDriver;
            }
            TaxiOrderEvent::OrderCanceled { occurred_at } => {
                self.canceled_at = Some(*occurred_at);
                self.status = TaxiOrderStatus::Canceled;
            }
            TaxiOrderEvent::RideStarted { occurred_at } => {
                self.ride_started_at = Some(*occurred_at);
                self.status = TaxiOrderStatus::InProgress;
            }
            TaxiOrderEvent::RideFinished { occurred_at } => {
                self.ride_finished_at = Some(*occurred_at);
                self.status = TaxiOrderStatus::Finished;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let action = command.action();
        if !self.status.allows(action) {
            return Err(TaxiError::invalid_transition(action, self.status));
        }

        let event = match command {
            TaxiOrderCommand::UpdateDestination { destination } => {
                TaxiOrderEvent::DestinationUpdated {
                    destination: destination.clone(),
                }
            }
            TaxiOrderCommand::AssignDriver {
                driver,
                occurred_at,
            } => TaxiOrderEvent::DriverAssigned {
                driver: driver.clone(),
                occurred_at: *occurred_at,
            },
            TaxiOrderCommand::UnassignDriver => TaxiOrderEvent::DriverUnassigned,
            TaxiOrderCommand::Cancel { occurred_at } => TaxiOrderEvent::OrderCanceled {
                occurred_at: *occurred_at,
            },
            TaxiOrderCommand::StartRide { occurred_at } => TaxiOrderEvent::RideStarted {
                occurred_at: *occurred_at,
            },
            TaxiOrderCommand::FinishRide { occurred_at } => TaxiOrderEvent::RideFinished {
                occurred_at: *occurred_at,
            },
        };

        Ok(vec![event])
    }
}
