//! Service-level lifecycle tests with a deterministic clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use taxiflow_core::{
    Clock, DomainError, DomainResult, ExpectedVersion, FixedClock, SequenceGenerator,
};
use taxiflow_orders::{
    Address, Car, Driver, DriverId, InMemoryDriverDirectory, InMemoryOrderStore, OrderAction, OrderId,
    OrderStore, OrdersConfig, PersonName, ReferenceDriverDirectory, TaxiError, TaxiOrder,
    TaxiOrderService, TaxiOrderStatus,
};

const DRIVER: DriverId = ReferenceDriverDirectory::DRIVER_ID;

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 3, 21, 5, 9).unwrap()
}

fn setup() -> (TaxiOrderService, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(start_time()));
    let service = TaxiOrderService::new(Arc::new(ReferenceDriverDirectory), clock.clone());
    (service, clock)
}

fn create(service: &TaxiOrderService) -> OrderId {
    service
        .create_order("Ivan", "Petrov", "Lenina", "12")
        .unwrap()
}

#[test]
fn order_ids_start_at_zero_and_increase() {
    let (service, _) = setup();

    let ids: Vec<u64> = (0..3).map(|_| create(&service).value()).collect();

    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn configured_first_order_id_is_honoured() {
    let config = OrdersConfig {
        first_order_id: 500,
    };
    let service = TaxiOrderService::from_config(
        &config,
        Arc::new(ReferenceDriverDirectory),
        Arc::new(FixedClock::new(start_time())),
    );

    assert_eq!(create(&service), OrderId::new(500));
}

#[test]
fn fresh_order_short_info() {
    let (service, _) = setup();
    let id = create(&service);

    assert_eq!(
        service.short_order_info(id).unwrap(),
        "OrderId: 0 Status: WaitingForDriver Client: Ivan Petrov Driver:  \
         From: Lenina 12 To:  LastProgressTime: 2024-11-03 21:05:09"
    );
    assert_eq!(service.driver_full_info(id).unwrap(), None);
}

#[test]
fn full_ride_uses_the_clock_at_every_step() {
    let (service, clock) = setup();
    let id = create(&service);
    service.update_destination(id, "Mira", "3").unwrap();

    clock.advance(Duration::minutes(2));
    service.assign_driver(id, DRIVER).unwrap();
    let assigned_at = clock.now();

    clock.advance(Duration::minutes(7));
    service.start_ride(id).unwrap();
    let started_at = clock.now();

    clock.advance(Duration::minutes(25));
    service.finish_ride(id).unwrap();
    let finished_at = clock.now();

    let order = service.order(id).unwrap();
    assert_eq!(order.status(), TaxiOrderStatus::Finished);
    assert_eq!(order.created_at(), start_time());
    assert_eq!(order.driver_assigned_at(), Some(assigned_at));
    assert_eq!(order.ride_started_at(), Some(started_at));
    assert_eq!(order.ride_finished_at(), Some(finished_at));

    assert_eq!(
        service.short_order_info(id).unwrap(),
        "OrderId: 0 Status: Finished Client: Ivan Petrov Driver: Drive Driverson \
         From: Lenina 12 To: Mira 3 LastProgressTime: 2024-11-03 21:39:09"
    );
}

#[test]
fn assigning_driver_15_fills_driver_info() {
    let (service, _) = setup();
    let id = create(&service);

    service.assign_driver(id, DRIVER).unwrap();

    let order = service.order(id).unwrap();
    let driver = order.driver().unwrap();
    assert_eq!(driver.name(), &PersonName::new("Drive", "Driverson"));
    assert_eq!(driver.car().plate_number, "A123BT 66");

    let info = service.driver_full_info(id).unwrap().unwrap();
    assert_eq!(
        info,
        "Id: 15 DriverName: Drive Driverson Color: Baklazhan CarModel: Lada sedan PlateNumber: A123BT 66"
    );
}

#[test]
fn unknown_driver_leaves_order_waiting() {
    let (service, _) = setup();
    let id = create(&service);

    let err = service.assign_driver(id, DriverId::new(16)).unwrap_err();

    assert_eq!(err, TaxiError::UnknownDriver(DriverId::new(16)));
    let order = service.order(id).unwrap();
    assert_eq!(order.status(), TaxiOrderStatus::WaitingForDriver);
    assert!(order.driver().is_none());
    assert_eq!(order.driver_assigned_at(), None);
}

#[test]
fn unknown_driver_is_reported_before_status_check() {
    let (service, _) = setup();
    let id = create(&service);
    service.assign_driver(id, DRIVER).unwrap();

    let err = service.assign_driver(id, DriverId::new(1)).unwrap_err();
    assert_eq!(err, TaxiError::UnknownDriver(DriverId::new(1)));

    let err = service.assign_driver(id, DRIVER).unwrap_err();
    assert_eq!(err.current_status(), Some(TaxiOrderStatus::WaitingCarArrival));
}

#[test]
fn start_ride_without_driver_fails_and_changes_nothing() {
    let (service, clock) = setup();
    let id = create(&service);
    let before = service.short_order_info(id).unwrap();

    clock.advance(Duration::hours(1));
    let err = service.start_ride(id).unwrap_err();

    assert_eq!(
        err,
        TaxiError::InvalidTransition {
            action: OrderAction::StartRide,
            status: TaxiOrderStatus::WaitingForDriver,
        }
    );
    assert!(err.to_string().ends_with("WaitingForDriver"));
    assert_eq!(service.short_order_info(id).unwrap(), before);
    assert_eq!(service.order(id).unwrap().ride_started_at(), None);
}

#[test]
fn unassign_then_reassign() {
    let (service, clock) = setup();
    let id = create(&service);

    service.assign_driver(id, DRIVER).unwrap();
    service.unassign_driver(id).unwrap();
    assert_eq!(service.driver_full_info(id).unwrap(), None);
    assert!(
        service
            .short_order_info(id)
            .unwrap()
            .contains("LastProgressTime: 2024-11-03 21:05:09")
    );

    clock.advance(Duration::seconds(30));
    service.assign_driver(id, DRIVER).unwrap();
    assert_eq!(
        service.order(id).unwrap().driver_assigned_at(),
        Some(start_time() + Duration::seconds(30))
    );
}

#[test]
fn unassign_requires_an_assigned_driver() {
    let (service, _) = setup();
    let id = create(&service);

    let err = service.unassign_driver(id).unwrap_err();
    assert_eq!(err.current_status(), Some(TaxiOrderStatus::WaitingForDriver));
}

#[test]
fn cancel_is_refused_only_during_the_ride() {
    let (service, clock) = setup();

    let waiting = create(&service);
    clock.advance(Duration::minutes(1));
    service.cancel(waiting).unwrap();
    let order = service.order(waiting).unwrap();
    assert_eq!(order.status(), TaxiOrderStatus::Canceled);
    assert_eq!(order.canceled_at(), Some(start_time() + Duration::minutes(1)));
    assert_eq!(
        service.driver_full_info(waiting).unwrap().as_deref(),
        Some("Id:  Driver:  Color:  CarModel:  PlateNumber: ")
    );

    let arriving = create(&service);
    service.assign_driver(arriving, DRIVER).unwrap();
    service.cancel(arriving).unwrap();
    assert!(service.driver_full_info(arriving).unwrap().is_some());

    let riding = create(&service);
    service.assign_driver(riding, DRIVER).unwrap();
    service.start_ride(riding).unwrap();
    let err = service.cancel(riding).unwrap_err();
    assert_eq!(err.current_status(), Some(TaxiOrderStatus::InProgress));
    assert_eq!(
        service.order(riding).unwrap().status(),
        TaxiOrderStatus::InProgress
    );

    clock.advance(Duration::minutes(20));
    service.finish_ride(riding).unwrap();
    clock.advance(Duration::minutes(5));
    service.cancel(riding).unwrap();
    let order = service.order(riding).unwrap();
    assert_eq!(order.status(), TaxiOrderStatus::Canceled);
    assert_eq!(order.canceled_at(), Some(order.last_progress_time()));
    assert_eq!(order.canceled_at(), Some(start_time() + Duration::minutes(26)));

    clock.advance(Duration::minutes(1));
    service.cancel(waiting).unwrap();
    assert_eq!(
        service.order(waiting).unwrap().canceled_at(),
        Some(start_time() + Duration::minutes(27))
    );
}

#[test]
fn unknown_order_is_not_found() {
    let (service, _) = setup();
    let missing = OrderId::new(99);

    assert_eq!(
        service.short_order_info(missing).unwrap_err(),
        TaxiError::OrderNotFound(missing)
    );
    assert_eq!(
        service.assign_driver(missing, DRIVER).unwrap_err(),
        TaxiError::OrderNotFound(missing)
    );
    assert_eq!(
        service.cancel(missing).unwrap_err(),
        TaxiError::OrderNotFound(missing)
    );
}

#[test]
fn custom_directory_and_store_are_used() {
    let directory = InMemoryDriverDirectory::new();
    directory.register(Driver::new(
        DriverId::new(7),
        PersonName::new("Anna", "Karenina"),
        Car::new("Black", "Volga", "B777OP 96"),
    ));
    let store = Arc::new(InMemoryOrderStore::new());

    let service = TaxiOrderService::new(
        Arc::new(directory),
        Arc::new(FixedClock::new(start_time())),
    )
    .with_store(store.clone())
    .with_id_generator(Arc::new(SequenceGenerator::starting_at(40)));

    let id = service.create_order("Lev", "Tolstoy", "Arbat", "5").unwrap();
    assert_eq!(id, OrderId::new(40));

    service.assign_driver(id, DriverId::new(7)).unwrap();
    assert_eq!(
        service.assign_driver(id, DRIVER).unwrap_err(),
        TaxiError::UnknownDriver(DRIVER)
    );

    let stored = store.get(id).unwrap();
    assert_eq!(stored.driver().unwrap().car().model, "Volga");
    assert_eq!(store.list().len(), 1);
}

/// Store where another writer updates the order right after every read.
#[derive(Default)]
struct ContendedStore {
    inner: InMemoryOrderStore,
}

impl OrderStore for ContendedStore {
    fn insert(&self, order: TaxiOrder) -> DomainResult<()> {
        self.inner.insert(order)
    }

    fn get(&self, id: OrderId) -> Option<TaxiOrder> {
        let copy = self.inner.get(id)?;
        let mut concurrent = copy.clone();
        concurrent
            .update_destination(Address::new("Concurrent", "1"))
            .ok()?;
        self.inner.save(concurrent, ExpectedVersion::Any).ok()?;
        Some(copy)
    }

    fn save(&self, order: TaxiOrder, expected: ExpectedVersion) -> DomainResult<()> {
        self.inner.save(order, expected)
    }

    fn list(&self) -> Vec<TaxiOrder> {
        self.inner.list()
    }
}

#[test]
fn concurrent_write_between_load_and_save_is_a_conflict() {
    let store = Arc::new(ContendedStore::default());
    let (service, _) = setup();
    let service = service.with_store(store.clone());
    let id = create(&service);

    let err = service.update_destination(id, "Mira", "3").unwrap_err();
    assert!(matches!(err, TaxiError::Domain(DomainError::Conflict(_))));

    let err = service.assign_driver(id, DRIVER).unwrap_err();
    assert!(matches!(err, TaxiError::Domain(DomainError::Conflict(_))));

    let stored = store.inner.get(id).unwrap();
    assert_eq!(stored.status(), TaxiOrderStatus::WaitingForDriver);
    assert!(stored.driver().is_none());
    assert_eq!(
        stored.destination().map(|a| a.street.as_str()),
        Some("Concurrent")
    );
}

#[test]
fn service_is_shareable_across_threads() {
    let (service, _) = setup();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            std::thread::spawn(move || {
                (0..25)
                    .map(|_| service.create_order("A", "B", "C", "D").unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<OrderId> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 100);
}
