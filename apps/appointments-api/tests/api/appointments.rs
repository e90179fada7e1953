use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::helpers::{booking, spawn_app, TODAY};

#[tokio::test]
async fn health_check_reports_version() {
    let app = spawn_app().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn booking_returns_confirmed_appointment() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(Method::POST, "/appointments", Some(booking("2030-01-15")))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["state"], "CONFIRMED");
    assert_eq!(body["appointment_date"], "2030-01-15");
    assert!(body["id"].is_string());

    let (_, all) = app.get("/appointments").await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn booking_today_is_allowed() {
    let app = spawn_app().await;
    app.book(TODAY).await;
}

#[tokio::test]
async fn past_date_is_rejected_and_not_stored() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(Method::POST, "/appointments", Some(booking("2030-01-09")))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "cannot schedule an appointment on a date before today"
    );
    assert_eq!(body["appointment"]["state"], "REJECTED");

    let (_, all) = app.get("/appointments").await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn validation_reasons_come_back_verbatim() {
    let app = spawn_app().await;
    let cases = [
        ("full_name", json!("  "), "full name is required"),
        ("national_id", json!("1234567"), "national id must contain 8 to 15 digits"),
        ("contact_email", json!("juan@"), "email must be well-formed"),
        ("appointment_date", json!(null), "appointment date is required"),
        ("location", json!(""), "location is required"),
    ];

    for (field, value, reason) in cases {
        let mut body = booking("2030-01-15");
        body[field] = value;

        let (status, response) = app.request(Method::POST, "/appointments", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
        assert_eq!(response["error"], reason, "{field}");
    }
}

#[tokio::test]
async fn missing_fields_report_the_first_failure() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(Method::POST, "/appointments", Some(json!({ "contact_email": "bad" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "full name is required");
}

#[tokio::test]
async fn cancel_then_cancel_again() {
    let app = spawn_app().await;
    let id = app.book("2030-01-20").await;
    let uri = format!("/appointments/{id}/cancel");

    let (status, body) = app.request(Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "CANCELLED");

    let (status, body) = app.request(Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "appointment is already cancelled");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = spawn_app().await;

    let (get, _) = app.get("/appointments/missing").await;
    let (cancel, body) = app
        .request(Method::PUT, "/appointments/missing/cancel", None)
        .await;
    let (delete, _) = app
        .request(Method::DELETE, "/appointments/missing", None)
        .await;

    assert_eq!(get, StatusCode::NOT_FOUND);
    assert_eq!(cancel, StatusCode::NOT_FOUND);
    assert_eq!(delete, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "appointment not found: missing");
}

#[tokio::test]
async fn delete_removes_appointment() {
    let app = spawn_app().await;
    let id = app.book("2030-01-20").await;

    let (status, body) = app
        .request(Method::DELETE, &format!("/appointments/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.get(&format!("/appointments/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contact_queries_filter_by_email_and_state() {
    let app = spawn_app().await;
    let cancelled = app.book("2030-01-20").await;
    app.book("2030-01-21").await;
    app.request(Method::PUT, &format!("/appointments/{cancelled}/cancel"), None)
        .await;

    let (_, all) = app.get("/appointments/contact?email=juan@x.com").await;
    let (_, confirmed) = app
        .get("/appointments/contact?email=juan@x.com&state=confirmed")
        .await;
    let (_, nobody) = app.get("/appointments/contact?email=ana@x.com").await;

    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(confirmed.as_array().unwrap().len(), 1);
    assert_eq!(confirmed[0]["appointment_date"], "2030-01-21");
    assert_eq!(nobody, json!([]));
}

#[tokio::test]
async fn contact_query_requires_email() {
    let app = spawn_app().await;

    let (status, body) = app.get("/appointments/contact").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required");
}

#[tokio::test]
async fn state_routes_list_and_count() {
    let app = spawn_app().await;
    let id = app.book("2030-01-20").await;
    app.book("2030-01-21").await;
    app.request(Method::PUT, &format!("/appointments/{id}/cancel"), None)
        .await;

    let (_, cancelled) = app.get("/appointments/state/CANCELLED").await;
    let (_, count) = app.get("/appointments/state/confirmed/count").await;
    let (status, body) = app.get("/appointments/state/PENDING").await;

    assert_eq!(cancelled.as_array().unwrap().len(), 1);
    assert_eq!(count, json!({ "state": "CONFIRMED", "count": 1 }));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown appointment state: PENDING");
}

#[tokio::test]
async fn specialty_date_range_and_patient_lookups() {
    let app = spawn_app().await;
    app.book("2030-01-20").await;
    app.book("2030-02-01").await;

    let (_, by_specialty) = app.get("/appointments/specialty/Psicolog%C3%ADa").await;
    let (_, by_date) = app.get("/appointments/date/2030-01-20").await;
    let (_, in_range) = app
        .get("/appointments/range?start=2030-01-01&end=2030-01-31")
        .await;
    let (_, by_patient) = app.get("/appointments/patient/12345678").await;

    assert_eq!(by_specialty.as_array().unwrap().len(), 2);
    assert_eq!(by_date.as_array().unwrap().len(), 1);
    assert_eq!(in_range.as_array().unwrap().len(), 1);
    assert_eq!(by_patient.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn bad_dates_and_ranges_are_bad_requests() {
    let app = spawn_app().await;

    let (date_status, _) = app.get("/appointments/date/20-01-2030").await;
    let (range_status, body) = app
        .get("/appointments/range?start=2030-02-01&end=2030-01-01")
        .await;

    assert_eq!(date_status, StatusCode::BAD_REQUEST);
    assert_eq!(range_status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "date range start must not be after its end");
}

#[tokio::test]
async fn unreadable_bodies_get_json_errors() {
    let app = spawn_app().await;
    let mut wrong_date = booking("2030-01-15");
    wrong_date["appointment_date"] = json!("31/12/2030");

    let (malformed, body) = app
        .request_raw(Method::POST, "/appointments", "{\"full_name\": ")
        .await;
    let (bad_date, date_body) = app
        .request(Method::POST, "/appointments", Some(wrong_date))
        .await;

    assert_eq!(malformed, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(bad_date, StatusCode::BAD_REQUEST);
    assert!(date_body["error"].is_string());
}
