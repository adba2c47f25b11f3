//! Drivers and the directory that resolves them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use taxiflow_core::{Entity, impl_entity_identity, impl_numeric_id};

use crate::error::{TaxiError, TaxiResult};
use crate::value::{Car, PersonName};

/// Driver identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(u64);

impl_numeric_id!(DriverId, "DriverId");

/// A driver with their car. Compared by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    id: DriverId,
    name: PersonName,
    car: Car,
}

impl Driver {
    pub fn new(id: DriverId, name: PersonName, car: Car) -> Self {
        Self { id, name, car }
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn car(&self) -> &Car {
        &self.car
    }
}

impl Entity for Driver {
    type Id = DriverId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl_entity_identity!(Driver);

/// Lookup of drivers by id (external collaborator, e.g. a database).
pub trait DriverDirectory: Send + Sync {
    /// Fully populated driver, or [`TaxiError::UnknownDriver`].
    fn resolve(&self, driver_id: DriverId) -> TaxiResult<Driver>;
}

impl<D> DriverDirectory for Arc<D>
where
    D: DriverDirectory + ?Sized,
{
    fn resolve(&self, driver_id: DriverId) -> TaxiResult<Driver> {
        (**self).resolve(driver_id)
    }
}

/// Directory with the single reference driver (id 15).
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceDriverDirectory;

impl ReferenceDriverDirectory {
    pub const DRIVER_ID: DriverId = DriverId::new(15);

    pub fn driver() -> Driver {
        Driver::new(
            Self::DRIVER_ID,
            PersonName::new("Drive", "Driverson"),
            Car::new("Baklazhan", "Lada sedan", "A123BT 66"),
        )
    }
}

impl DriverDirectory for ReferenceDriverDirectory {
    fn resolve(&self, driver_id: DriverId) -> TaxiResult<Driver> {
        if driver_id == Self::DRIVER_ID {
            Ok(Self::driver())
        } else {
            Err(TaxiError::UnknownDriver(driver_id))
        }
    }
}

/// In-memory directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDriverDirectory {
    drivers: RwLock<HashMap<DriverId, Driver>>,
}

impl InMemoryDriverDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a driver.
    pub fn register(&self, driver: Driver) {
        if let Ok(mut drivers) = self.drivers.write() {
            drivers.insert(*driver.id(), driver);
        }
    }
}

impl FromIterator<Driver> for InMemoryDriverDirectory {
    fn from_iter<I: IntoIterator<Item = Driver>>(iter: I) -> Self {
        let drivers = iter.into_iter().map(|d| (*d.id(), d)).collect();
        Self {
            drivers: RwLock::new(drivers),
        }
    }
}

impl DriverDirectory for InMemoryDriverDirectory {
    fn resolve(&self, driver_id: DriverId) -> TaxiResult<Driver> {
        self.drivers
            .read()
            .ok()
            .and_then(|drivers| drivers.get(&driver_id).cloned())
            .ok_or(TaxiError::UnknownDriver(driver_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_directory_resolves_only_driver_15() {
        let directory = ReferenceDriverDirectory;

        let driver = directory.resolve(DriverId::new(15)).unwrap();
        assert_eq!(driver.name(), &PersonName::new("Drive", "Driverson"));
        assert_eq!(driver.car().plate_number, "A123BT 66");

        for id in [0, 1, 14, 16, 150] {
            assert_eq!(
                directory.resolve(DriverId::new(id)).unwrap_err(),
                TaxiError::UnknownDriver(DriverId::new(id))
            );
        }
    }

    #[test]
    fn drivers_are_compared_by_id() {
        let a = Driver::new(
            DriverId::new(1),
            PersonName::new("A", "A"),
            Car::new("c", "m", "p"),
        );
        let same_id = Driver::new(
            DriverId::new(1),
            PersonName::new("B", "B"),
            Car::new("x", "y", "z"),
        );
        let other_id = Driver::new(
            DriverId::new(2),
            PersonName::new("A", "A"),
            Car::new("c", "m", "p"),
        );

        assert_eq!(a, same_id);
        assert_ne!(a, other_id);
        assert_eq!(a.to_string(), "Driver(id: 1)");
    }

    #[test]
    fn in_memory_directory_resolves_registered_drivers() {
        let directory = InMemoryDriverDirectory::new();
        assert!(directory.resolve(DriverId::new(3)).is_err());

        directory.register(Driver::new(
            DriverId::new(3),
            PersonName::new("Anna", "Karenina"),
            Car::new("Black", "Volga", "B777OP 96"),
        ));

        let driver = directory.resolve(DriverId::new(3)).unwrap();
        assert_eq!(driver.car().model, "Volga");
    }

    #[test]
    fn directories_work_behind_arc() {
        let directory: Arc<dyn DriverDirectory> =
            Arc::new([ReferenceDriverDirectory::driver()].into_iter().collect::<InMemoryDriverDirectory>());
        assert!(directory.resolve(ReferenceDriverDirectory::DRIVER_ID).is_ok());
    }
}
