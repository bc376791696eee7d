//! Full booking lifecycle: create a customer, check a provider's free slots,
//! book an appointment, then cancel it.
//!
//! Expects a running scheduling service and two environment variables:
//! - `APPOINT_BASE_URL` (e.g. `http://localhost/index.php/api/v1`)
//! - `APPOINT_API_KEY`
//!
//! Run with: `cargo run --example booking_lifecycle`

use appoint::models::{Appointment, AppointmentStatus, Customer};
use appoint::{ApiError, Client, ErrorKind};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "appoint=info".into()),
        )
        .init();

    let base_url =
        std::env::var("APPOINT_BASE_URL").unwrap_or_else(|_| "http://localhost/index.php/api/v1".into());
    let api_key = std::env::var("APPOINT_API_KEY").expect("set APPOINT_API_KEY");

    let client = Client::builder()
        .base_url(base_url)?
        .api_key(api_key)
        .build()?;

    let provider_id = 2;
    let service_id = 1;
    let date = "2026-09-01";

    // 1. Register the customer.
    println!("--- Creating customer ---");
    let customer = client
        .customers()
        .create(&Customer {
            id: None,
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            phone: Some("987-654-3210".to_string()),
            mobile: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            notes: None,
            timezone: None,
            language: None,
            settings: None,
        })
        .await?;
    let customer_id = customer.id.expect("server assigns an id");
    println!("customer {customer_id} created");

    // 2. Find a free slot.
    println!("--- Checking availability for provider {provider_id} on {date} ---");
    let availability = client
        .availabilities()
        .slots(provider_id, service_id, Some(date))
        .await?;
    let Some(slot) = availability.available.first() else {
        println!("no free slots, nothing to book");
        return Ok(());
    };
    println!("first free slot: {} - {}", slot.start, slot.end);

    // 3. Book it.
    println!("--- Booking ---");
    let booked = client
        .appointments()
        .create(&Appointment {
            id: None,
            start: format!("{date} {}:00", slot.start),
            end: format!("{date} {}:00", slot.end),
            location: None,
            notes: Some("booked via appoint demo".to_string()),
            customer_id,
            provider_id,
            service_id,
            hash: None,
            google_calendar_id: None,
            status: AppointmentStatus::Booked,
        })
        .await?;
    let appointment_id = booked.id.expect("server assigns an id");
    println!("appointment {appointment_id} booked ({:?})", booked.status);

    // 4. Cancel it again.
    println!("--- Cancelling ---");
    match client.appointments().delete(appointment_id).await {
        Ok(()) => println!("appointment {appointment_id} cancelled"),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            println!("appointment vanished before we could cancel it")
        }
        Err(e) => return Err(e),
    }

    client.close();
    Ok(())
}
