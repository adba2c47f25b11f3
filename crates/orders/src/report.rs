//! Textual order reports.

use taxiflow_core::Entity;

use crate::order::{TaxiOrder, TaxiOrderStatus};
use crate::value::Address;

/// Format of `LastProgressTime`, independent of locale.
pub const PROGRESS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl TaxiOrder {
    /// One-line summary. Unassigned driver and unset destination render as empty labels.
    ///
    /// `OrderId: 0 Status: WaitingForDriver Client: Ivan Petrov Driver:  From: Lenina 1 To:  LastProgressTime: 2024-05-17 08:30:00`
    pub fn short_info(&self) -> String {
        let driver = self
            .driver()
            .map(|driver| driver.name().full_name())
            .unwrap_or_default();
        let destination = self.destination().map(Address::line).unwrap_or_default();

        [
            format!("OrderId: {}", self.id()),
            format!("Status: {}", self.status()),
            format!("Client: {}", self.client().full_name()),
            format!("Driver: {driver}"),
            format!("From: {}", self.start().line()),
            format!("To: {destination}"),
            format!(
                "LastProgressTime: {}",
                self.last_progress_time().format(PROGRESS_TIME_FORMAT)
            ),
        ]
        .join(" ")
    }

    /// Driver and car details, or `None` while the order waits for a driver.
    pub fn driver_full_info(&self) -> Option<String> {
        if self.status() == TaxiOrderStatus::WaitingForDriver {
            return None;
        }

        let (name_label, [id, name, color, model, plate_number]) = match self.driver() {
            Some(driver) => (
                "DriverName",
                [
                    driver.id().to_string(),
                    driver.name().full_name(),
                    driver.car().color.clone(),
                    driver.car().model.clone(),
                    driver.car().plate_number.clone(),
                ],
            ),
            // Canceled before any driver was assigned: no id to report either.
            None => ("Driver", Default::default()),
        };

        Some(
            [
                format!("Id: {id}"),
                format!("{name_label}: {name}"),
                format!("Color: {color}"),
                format!("CarModel: {model}"),
                format!("PlateNumber: {plate_number}"),
            ]
            .join(" "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ReferenceDriverDirectory;
    use crate::order::OrderId;
    use crate::value::PersonName;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap()
    }

    fn test_order() -> TaxiOrder {
        TaxiOrder::create(
            OrderId::new(3),
            PersonName::new("Ivan", "Petrov"),
            Address::new("Lenina", "1"),
            test_time(),
        )
    }

    #[test]
    fn short_info_of_new_order_has_empty_driver_and_destination() {
        assert_eq!(
            test_order().short_info(),
            "OrderId: 3 Status: WaitingForDriver Client: Ivan Petrov Driver:  \
             From: Lenina 1 To:  LastProgressTime: 2024-05-17 08:30:00"
        );
    }

    #[test]
    fn short_info_reflects_driver_destination_and_latest_time() {
        let mut order = test_order();
        order.update_destination(Address::new("Mira", "10")).unwrap();
        order
            .assign_driver(
                ReferenceDriverDirectory::driver(),
                test_time() + Duration::seconds(75),
            )
            .unwrap();

        assert_eq!(
            order.short_info(),
            "OrderId: 3 Status: WaitingCarArrival Client: Ivan Petrov Driver: Drive Driverson \
             From: Lenina 1 To: Mira 10 LastProgressTime: 2024-05-17 08:31:15"
        );
    }

    #[test]
    fn driver_info_is_absent_while_waiting_for_driver() {
        let mut order = test_order();
        assert_eq!(order.driver_full_info(), None);

        order
            .assign_driver(ReferenceDriverDirectory::driver(), test_time())
            .unwrap();
        order.unassign_driver().unwrap();
        assert_eq!(order.driver_full_info(), None);
    }

    #[test]
    fn driver_info_lists_driver_and_car() {
        let mut order = test_order();
        order
            .assign_driver(ReferenceDriverDirectory::driver(), test_time())
            .unwrap();

        assert_eq!(
            order.driver_full_info().as_deref(),
            Some(
                "Id: 15 DriverName: Drive Driverson Color: Baklazhan \
                 CarModel: Lada sedan PlateNumber: A123BT 66"
            )
        );
    }

    #[test]
    fn driver_info_of_order_canceled_before_assignment_has_empty_labels() {
        let mut order = test_order();
        order.cancel(test_time()).unwrap();

        assert_eq!(
            order.driver_full_info().as_deref(),
            Some("Id:  Driver:  Color:  CarModel:  PlateNumber: ")
        );
    }
}
