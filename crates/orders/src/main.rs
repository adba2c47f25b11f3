use std::sync::Arc;

use anyhow::Context;

use taxiflow_core::SystemClock;
use taxiflow_orders::{OrdersConfig, ReferenceDriverDirectory, TaxiOrderService};

fn main() -> anyhow::Result<()> {
    taxiflow_observability::init();

    let config = OrdersConfig::from_env().context("reading orders configuration")?;
    tracing::info!(first_order_id = config.first_order_id, "starting taxi order demo");

    let service = TaxiOrderService::from_config(
        &config,
        Arc::new(ReferenceDriverDirectory),
        Arc::new(SystemClock),
    );

    let id = service.create_order("Ivan", "Petrov", "Lenina", "1")?;
    report(&service, id, "created")?;

    service.update_destination(id, "Mira", "10")?;
    report(&service, id, "destination set")?;

    service.assign_driver(id, ReferenceDriverDirectory::DRIVER_ID)?;
    report(&service, id, "driver assigned")?;

    service.start_ride(id)?;
    report(&service, id, "ride started")?;

    service.finish_ride(id)?;
    report(&service, id, "ride finished")?;

    Ok(())
}

fn report(
    service: &TaxiOrderService,
    id: taxiflow_orders::OrderId,
    step: &str,
) -> anyhow::Result<()> {
    println!("[{step}] {}", service.short_order_info(id)?);
    if let Some(driver) = service.driver_full_info(id)? {
        println!("[{step}] {driver}");
    }
    Ok(())
}
