//! Basic walkthrough: list admins, create a provider, list customers.
//!
//! Expects a running scheduling service and two environment variables:
//! - `APPOINT_BASE_URL` (e.g. `http://localhost/index.php/api/v1`)
//! - `APPOINT_API_KEY`
//!
//! Run with: `cargo run --example basic_usage`

use appoint::models::{Provider, ProviderSettings, WorkingDay, WorkingPlan};
use appoint::{ApiError, Client, ListParams};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "appoint=debug".into()),
        )
        .init();

    let base_url =
        std::env::var("APPOINT_BASE_URL").unwrap_or_else(|_| "http://localhost/index.php/api/v1".into());
    let api_key = std::env::var("APPOINT_API_KEY").expect("set APPOINT_API_KEY");

    let client = Client::builder()
        .base_url(base_url)?
        .api_key(api_key)
        .build()?;

    // List the first page of admins, newest first.
    println!("=== Admins ===");
    let admins = client.admins().list(ListParams::default()).await?;
    println!("{} of {} admins", admins.len(), admins.total);
    for admin in &admins.items {
        println!("- {} {} <{}>", admin.first_name, admin.last_name, admin.email);
    }
    if let Some(cursor) = &admins.next {
        println!("more pages behind cursor {cursor}");
    }

    // Create a provider with weekday working hours and a lunch break.
    println!("\n=== Creating a provider ===");
    let mut working_plan = WorkingPlan::default();
    for day in [
        &mut working_plan.monday,
        &mut working_plan.tuesday,
        &mut working_plan.wednesday,
        &mut working_plan.thursday,
        &mut working_plan.friday,
    ] {
        *day = WorkingDay::hours("09:00", "17:00");
    }

    let new_provider = Provider {
        id: None,
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        mobile: None,
        phone: Some("123-456-7890".to_string()),
        address: None,
        city: None,
        state: None,
        zip: None,
        notes: None,
        timezone: None,
        language: None,
        settings: ProviderSettings {
            username: "johndoe".to_string(),
            password: Some("SecurePassword123!".to_string()),
            working_plan: Some(working_plan),
        },
        services: vec![1],
    };

    match client.providers().create(&new_provider).await {
        Ok(created) => println!("created provider {:?}", created.id),
        Err(e) => println!("could not create provider: {e}"),
    }

    // Customers, two pages of five.
    println!("\n=== Customers ===");
    for page_number in 1..=2 {
        let page = client
            .customers()
            .list(ListParams::default().page(page_number).length(5))
            .await?;
        println!("page {page_number}: {} customers", page.len());
        for customer in &page.items {
            println!("- {} {} <{}>", customer.first_name, customer.last_name, customer.email);
        }
        if page.next.is_none() {
            break;
        }
    }

    client.close();
    Ok(())
}
