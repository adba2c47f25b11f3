//! Taxi orders domain module.
//!
//! Business rules for the taxi order lifecycle (creation, driver assignment,
//! ride start/finish, cancellation) and the reports derived from an order.
//! Storage, driver lookup and time are injected ports; nothing here does IO.

pub mod config;
pub mod driver;
pub mod error;
pub mod order;
pub mod report;
pub mod service;
pub mod store;
pub mod value;

pub use config::OrdersConfig;
pub use driver::{
    Driver, DriverDirectory, DriverId, InMemoryDriverDirectory, ReferenceDriverDirectory,
};
pub use error::{TaxiError, TaxiResult};
pub use order::{
    OrderAction, OrderId, TaxiOrder, TaxiOrderCommand, TaxiOrderEvent, TaxiOrderStatus,
};
pub use report::PROGRESS_TIME_FORMAT;
pub use service::{OrderIdGenerator, TaxiOrderService};
pub use store::{InMemoryOrderStore, OrderStore};
pub use value::{Address, Car, PersonName};
