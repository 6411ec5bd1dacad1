use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::api::ReservationService;
use booking_cell::{BookAppointmentRequest, AppointmentStatus, BookingError};
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

fn service_for(mock_server: &MockServer) -> ReservationService {
    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    ReservationService::new(&config)
}

fn booking(date: &str, time_slot: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        client_name: "Luis".to_string(),
        phone: "5555-1234".to_string(),
        date: date.to_string(),
        time_slot: time_slot.to_string(),
    }
}

#[tokio::test]
async fn occupied_slots_exclude_cancelled_appointments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date", "eq.2024-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::confirmed_appointment("2024-06-01", "09:00 AM"),
            MockStoreResponses::cancelled_appointment("2024-06-01", "10:00 AM"),
            MockStoreResponses::confirmed_appointment("2024-06-01", "02:00 PM"),
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let occupied = service.list_occupied_slots("2024-06-01").await.unwrap();

    assert_eq!(occupied, vec!["09:00 AM", "02:00 PM"]);
}

#[tokio::test]
async fn occupied_slots_empty_day_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let occupied = service.list_occupied_slots("2024-06-01").await.unwrap();

    assert!(occupied.is_empty());
}

#[tokio::test]
async fn occupied_slots_reject_non_iso_dates() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    assert_matches!(
        service.list_occupied_slots("06/01/2024").await,
        Err(BookingError::InvalidDate(_))
    );
    assert_matches!(
        service.list_occupied_slots("2024-6-1").await,
        Err(BookingError::InvalidDate(_))
    );
}

#[tokio::test]
async fn create_appointment_inserts_when_slot_is_free() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date", "eq.2024-06-01"))
        .and(query_param("time_slot", "eq.10:00 AM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_doc(
                &Uuid::new_v4().to_string(),
                "Luis",
                "5555-1234",
                "2024-06-01",
                "10:00 AM",
                "confirmed",
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let appointment = service.create_appointment(booking("2024-06-01", "10:00 AM")).await.unwrap();

    assert_eq!(appointment.client_name, "Luis");
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    assert_eq!(appointment.time_slot, "10:00 AM");
}

#[tokio::test]
async fn create_appointment_conflicts_without_writing_when_slot_is_taken() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::confirmed_appointment("2024-06-01", "10:00 AM"),
        ])))
        .mount(&mock_server)
        .await;

    // The write must never happen when the pre-check sees a confirmed doc.
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service.create_appointment(booking("2024-06-01", "10:00 AM")).await;

    assert_matches!(result, Err(BookingError::SlotTaken));
}

#[tokio::test]
async fn create_appointment_ignores_cancelled_documents_in_the_precheck() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::cancelled_appointment("2024-06-01", "10:00 AM"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_doc(
                &Uuid::new_v4().to_string(),
                "Luis",
                "5555-1234",
                "2024-06-01",
                "10:00 AM",
                "confirmed",
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service.create_appointment(booking("2024-06-01", "10:00 AM")).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn create_appointment_maps_store_unique_violation_to_conflict() {
    let mock_server = MockServer::start().await;

    // Pre-check sees a free slot; a concurrent writer then lands first and
    // the store's unique index rejects our insert.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(MockStoreResponses::unique_violation_body()),
        )
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service.create_appointment(booking("2024-06-01", "10:00 AM")).await;

    assert_matches!(result, Err(BookingError::SlotTaken));
}

#[tokio::test]
async fn create_appointment_validates_before_touching_the_store() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    let blank_name = BookAppointmentRequest {
        client_name: "   ".to_string(),
        ..booking("2024-06-01", "10:00 AM")
    };
    assert_matches!(
        service.create_appointment(blank_name).await,
        Err(BookingError::Validation(_))
    );

    let blank_phone = BookAppointmentRequest {
        phone: String::new(),
        ..booking("2024-06-01", "10:00 AM")
    };
    assert_matches!(
        service.create_appointment(blank_phone).await,
        Err(BookingError::Validation(_))
    );

    assert_matches!(
        service.create_appointment(booking("2024-06-01", "10:15 AM")).await,
        Err(BookingError::UnknownSlot(_))
    );

    assert_matches!(
        service.create_appointment(booking("tomorrow", "10:00 AM")).await,
        Err(BookingError::InvalidDate(_))
    );
}

#[tokio::test]
async fn cancel_appointment_records_reason_and_frees_nothing_else() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    let mut cancelled = MockStoreResponses::appointment_doc(
        &id.to_string(),
        "Luis",
        "5555-1234",
        "2024-06-01",
        "10:00 AM",
        "cancelled",
    );
    cancelled["cancellation_reason"] = json!("no-show");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([cancelled])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let appointment = service
        .cancel_appointment(id, Some("no-show".to_string()))
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Cancelled);
    assert_eq!(appointment.cancellation_reason.as_deref(), Some("no-show"));
}

#[tokio::test]
async fn cancel_appointment_not_found_when_nothing_matches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service.cancel_appointment(Uuid::new_v4(), None).await;

    assert_matches!(result, Err(BookingError::NotFound));
}

#[tokio::test]
async fn delete_appointment_is_an_escape_hatch_with_not_found() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::confirmed_appointment("2024-06-01", "10:00 AM"),
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    assert!(service.delete_appointment(id).await.is_ok());

    mock_server.reset().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    assert_matches!(
        service.delete_appointment(Uuid::new_v4()).await,
        Err(BookingError::NotFound)
    );
}

#[tokio::test]
async fn transient_store_failures_surface_as_store_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service.list_occupied_slots("2024-06-01").await;

    assert_matches!(result, Err(BookingError::Store(_)));
}

/// The full booking lifecycle against one slot: first booking wins, the
/// second caller conflicts, cancellation frees the slot, a third booking
/// succeeds again.
#[tokio::test]
async fn booking_lifecycle_frees_slot_after_cancellation() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);
    let first_id = Uuid::new_v4();

    // Round 1: slot is free, Luis books it.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_doc(
                &first_id.to_string(),
                "Luis",
                "5555-1234",
                "2024-06-01",
                "10:00 AM",
                "confirmed",
            )
        ])))
        .mount(&mock_server)
        .await;

    let first = service
        .create_appointment(booking("2024-06-01", "10:00 AM"))
        .await
        .unwrap();
    assert_eq!(first.id, first_id);
    assert_eq!(first.status, AppointmentStatus::Confirmed);

    // Round 2: the confirmed document now blocks the identical slot.
    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::appointment_doc(
                &first_id.to_string(),
                "Luis",
                "5555-1234",
                "2024-06-01",
                "10:00 AM",
                "confirmed",
            )
        ])))
        .mount(&mock_server)
        .await;

    let second = BookAppointmentRequest {
        client_name: "Marta".to_string(),
        phone: "4444-9999".to_string(),
        date: "2024-06-01".to_string(),
        time_slot: "10:00 AM".to_string(),
    };
    assert_matches!(
        service.create_appointment(second).await,
        Err(BookingError::SlotTaken)
    );

    // Round 3: cancel the first booking; the slot no longer counts as
    // occupied and a new booking goes through.
    mock_server.reset().await;
    let mut cancelled_doc = MockStoreResponses::appointment_doc(
        &first_id.to_string(),
        "Luis",
        "5555-1234",
        "2024-06-01",
        "10:00 AM",
        "cancelled",
    );
    cancelled_doc["cancellation_reason"] = json!("cancelled by administrator");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([cancelled_doc.clone()])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([cancelled_doc])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_doc(
                &Uuid::new_v4().to_string(),
                "Marta",
                "4444-9999",
                "2024-06-01",
                "10:00 AM",
                "confirmed",
            )
        ])))
        .mount(&mock_server)
        .await;

    let cancelled = service.cancel_appointment(first_id, None).await.unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let occupied = service.list_occupied_slots("2024-06-01").await.unwrap();
    assert!(!occupied.contains(&"10:00 AM".to_string()));

    let third = BookAppointmentRequest {
        client_name: "Marta".to_string(),
        phone: "4444-9999".to_string(),
        date: "2024-06-01".to_string(),
        time_slot: "10:00 AM".to_string(),
    };
    let rebooked = service.create_appointment(third).await.unwrap();
    assert_eq!(rebooked.status, AppointmentStatus::Confirmed);
}
