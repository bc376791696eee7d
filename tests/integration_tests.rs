//! Integration tests using wiremock to simulate the scheduling service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use appoint::models::{Admin, AdminSettings, Appointment, AppointmentStatus};
use appoint::retry::Sleeper;
use appoint::{ApiRequest, Client, ErrorKind, ListParams, RetryPolicy};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records requested delays instead of sleeping, so retry tests finish
/// instantly.
#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

impl RecordingSleeper {
    fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

fn client_without_retries(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .unwrap()
        .api_key("test-key")
        .retry_policy(RetryPolicy::none())
        .build()
        .unwrap()
}

fn retrying_client(server: &MockServer, sleeper: Arc<RecordingSleeper>) -> Client {
    Client::builder()
        .base_url(server.uri())
        .unwrap()
        .api_key("test-key")
        .retry_policy(RetryPolicy::new(3, Duration::from_secs(1)))
        .sleeper(sleeper)
        .build()
        .unwrap()
}

fn admin_json(id: u64) -> Value {
    json!({
        "id": id,
        "firstName": "Grace",
        "lastName": "Hopper",
        "email": "grace@example.com",
        "timezone": "UTC",
        "language": "english",
        "settings": {
            "username": "grace",
            "notifications": true,
            "calendarView": "default"
        }
    })
}

#[tokio::test]
async fn test_get_admin_sends_auth_and_decodes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins/1"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_json(1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let admin = client.admins().get(1).await.unwrap().expect("admin exists");

    assert_eq!(admin.id, Some(1));
    assert_eq!(admin.first_name, "Grace");
    assert_eq!(admin.settings.username, "grace");
}

#[tokio::test]
async fn test_get_missing_admin_returns_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    assert!(client.admins().get(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_missing_customer_propagates_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/customers/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no such record"})))
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let err = client.customers().delete(999).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "no such record");
}

#[tokio::test]
async fn test_list_envelope_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins"))
        .and(query_param("page", "2"))
        .and(query_param("length", "25"))
        .and(query_param("sort", "email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [admin_json(1)],
            "total": 41,
            "next": "page3",
            "previous": "page1"
        })))
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let page = client
        .admins()
        .list(ListParams::default().page(2).length(25).sort("email"))
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.total, 41);
    assert_eq!(page.next.as_deref(), Some("page3"));
    assert_eq!(page.previous.as_deref(), Some("page1"));
}

#[tokio::test]
async fn test_list_bare_array_is_degraded_but_valid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([admin_json(1), admin_json(2)])))
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let page = client.admins().list(ListParams::default()).await.unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.total, 2);
    assert!(page.next.is_none());
    assert!(page.previous.is_none());
}

#[tokio::test]
async fn test_malformed_record_does_not_hide_the_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([admin_json(1), {"id": "garbage"}, admin_json(3)])),
        )
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let page = client.admins().list(ListParams::default()).await.unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.items[1].id, Some(3));
}

#[tokio::test]
async fn test_validation_error_collects_field_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["is required"],
            "firstName": ["must not be blank"]
        })))
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let err = client
        .execute(ApiRequest::post("/customers").body(json!({})))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert!(err.message().contains("email: is required"));
    assert!(err.message().contains("firstName: must not be blank"));
}

#[tokio::test]
async fn test_authentication_failure_is_not_retried() {
    let server = MockServer::start().await;
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    Mock::given(method("GET"))
        .and(path("/admins"))
        .respond_with(move |_req: &wiremock::Request| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(401).set_body_json(json!({"message": "bad key"}))
        })
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::default());
    let client = retrying_client(&server, sleeper.clone());
    let err = client.admins().list(ListParams::default()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn test_server_errors_retried_until_success() {
    let server = MockServer::start().await;
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    Mock::given(method("GET"))
        .and(path("/admins/1"))
        .respond_with(move |_req: &wiremock::Request| {
            let attempt = hits_clone.fetch_add(1, Ordering::SeqCst);
            if attempt < 2 {
                ResponseTemplate::new(500).set_body_string("boom")
            } else {
                ResponseTemplate::new(200).set_body_json(admin_json(1))
            }
        })
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::default());
    let client = retrying_client(&server, sleeper.clone());
    let admin = client.admins().get(1).await.unwrap().expect("admin exists");

    assert_eq!(admin.id, Some(1));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    // Backoff doubles from the base delay.
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn test_exhausted_retries_surface_last_error_unchanged() {
    let server = MockServer::start().await;
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    Mock::given(method("GET"))
        .and(path("/admins"))
        .respond_with(move |_req: &wiremock::Request| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(503).set_body_json(json!({"message": "overloaded"}))
        })
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::default());
    let client = retrying_client(&server, sleeper.clone());
    let err = client.admins().list(ListParams::default()).await.unwrap_err();

    // The final error is the classified 503, not a retries-exceeded wrapper.
    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert_eq!(err.message(), "overloaded");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(sleeper.delays().len(), 2);
}

#[tokio::test]
async fn test_retry_after_header_overrides_backoff() {
    let server = MockServer::start().await;
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    Mock::given(method("GET"))
        .and(path("/admins/1"))
        .respond_with(move |_req: &wiremock::Request| {
            if hits_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_json(json!({"message": "rate limited"}))
            } else {
                ResponseTemplate::new(200).set_body_json(admin_json(1))
            }
        })
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::default());
    let client = retrying_client(&server, sleeper.clone());
    client.admins().get(1).await.unwrap().expect("admin exists");

    assert_eq!(sleeper.delays(), vec![Duration::from_secs(7)]);
}

#[tokio::test]
async fn test_retry_after_capped_at_policy_max_delay() {
    let server = MockServer::start().await;
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    Mock::given(method("GET"))
        .and(path("/admins/1"))
        .respond_with(move |_req: &wiremock::Request| {
            if hits_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "600")
                    .set_body_json(json!({"message": "rate limited"}))
            } else {
                ResponseTemplate::new(200).set_body_json(admin_json(1))
            }
        })
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::default());
    let client = retrying_client(&server, sleeper.clone());
    client.admins().get(1).await.unwrap().expect("admin exists");

    // Base delay 1s, so the cap is 10s.
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(10)]);
}

#[tokio::test]
async fn test_no_content_yields_empty_payload() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/appointments/5"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    client.appointments().delete(5).await.unwrap();

    // The raw payload for a 204 is null, not a JSON parse error.
    Mock::given(method("DELETE"))
        .and(path("/customers/6"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let payload = client
        .execute(ApiRequest::delete("/customers/6"))
        .await
        .unwrap();
    assert!(payload.is_null());
}

#[tokio::test]
async fn test_invalid_json_on_success_status_is_unknown_kind() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login page</html>"))
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let err = client.execute(ApiRequest::get("/admins")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(200));
    assert!(err.message().contains("invalid JSON response"));
    assert!(err.message().contains("<html>"));
}

#[tokio::test]
async fn test_connection_failure_is_transport_kind() {
    // Nothing listens here.
    let client = Client::builder()
        .base_url("http://127.0.0.1:1")
        .unwrap()
        .api_key("test-key")
        .retry_policy(RetryPolicy::none())
        .build()
        .unwrap();

    let err = client.execute(ApiRequest::get("/admins")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_per_call_timeout_bounds_one_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let err = client
        .execute(ApiRequest::get("/admins").timeout(Duration::from_millis(50)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_request_id_extracted_from_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins/1"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("x-request-id", "req-abc-123")
                .set_body_json(json!({"message": "boom"})),
        )
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let err = client.execute(ApiRequest::get("/admins/1")).await.unwrap_err();

    assert_eq!(err.request_id(), Some("req-abc-123"));
    assert_eq!(err.body(), Some(&json!({"message": "boom"})));
}

#[tokio::test]
async fn test_create_appointment_sends_wire_format() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "customerId": 2,
            "providerId": 3,
            "serviceId": 4,
            "start": "2026-09-01 10:00:00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 77,
            "start": "2026-09-01 10:00:00",
            "end": "2026-09-01 10:30:00",
            "customerId": 2,
            "providerId": 3,
            "serviceId": 4,
            "hash": "abc123",
            "status": "booked"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let appointment = Appointment {
        id: None,
        start: "2026-09-01 10:00:00".to_string(),
        end: "2026-09-01 10:30:00".to_string(),
        location: None,
        notes: None,
        customer_id: 2,
        provider_id: 3,
        service_id: 4,
        hash: None,
        google_calendar_id: None,
        status: AppointmentStatus::Booked,
    };

    let client = client_without_retries(&server);
    let created = client.appointments().create(&appointment).await.unwrap();

    assert_eq!(created.id, Some(77));
    assert_eq!(created.hash.as_deref(), Some("abc123"));
    assert_eq!(created.status, AppointmentStatus::Booked);
}

#[tokio::test]
async fn test_update_admin_round_trip() {
    let server = MockServer::start().await;

    let mut updated = admin_json(1);
    updated["email"] = json!("grace.hopper@example.com");

    Mock::given(method("PUT"))
        .and(path("/admins/1"))
        .and(body_partial_json(json!({"email": "grace.hopper@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .mount(&server)
        .await;

    let admin = Admin {
        id: Some(1),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: "grace.hopper@example.com".to_string(),
        mobile: None,
        phone: None,
        address: None,
        city: None,
        state: None,
        zip: None,
        notes: None,
        timezone: "UTC".to_string(),
        language: "english".to_string(),
        ldap_dn: None,
        settings: AdminSettings {
            username: "grace".to_string(),
            notifications: true,
            calendar_view: "default".to_string(),
        },
    };

    let client = client_without_retries(&server);
    let result = client.admins().update(1, &admin).await.unwrap();
    assert_eq!(result.email, "grace.hopper@example.com");
}

#[tokio::test]
async fn test_availability_slots_from_boundary_times() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/availabilities"))
        .and(query_param("providerId", "3"))
        .and(query_param("serviceId", "1"))
        .and(query_param("date", "2026-09-01"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["09:00", "09:15", "09:30"])),
        )
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let availability = client
        .availabilities()
        .slots(3, 1, Some("2026-09-01"))
        .await
        .unwrap();

    assert_eq!(availability.available.len(), 2);
    assert_eq!(availability.available[0].start, "09:00");
    assert_eq!(availability.available[0].end, "09:15");
    assert_eq!(availability.available[1].start, "09:15");
    assert_eq!(availability.available[1].end, "09:30");
}

#[tokio::test]
async fn test_caller_header_overrides_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admins"))
        .and(header("Authorization", "Bearer other-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_without_retries(&server);
    let request = ApiRequest::get("/admins")
        .header("Authorization", "Bearer other-token")
        .unwrap();
    client.execute(request).await.unwrap();
}
