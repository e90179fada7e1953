use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::helpers::spawn_app;

fn dermatology() -> serde_json::Value {
    json!({
        "name": "Dermatología",
        "description": "Piel",
        "doctor_name": "Dra. Paz",
        "location": "Consulta 501 - Piso 5",
        "image_ref": "https://example.com/dermatologia.jpg",
    })
}

#[tokio::test]
async fn catalog_is_seeded() {
    let app = spawn_app().await;

    let (status, body) = app.get("/specialties").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn name_lookup_ignores_case() {
    let app = spawn_app().await;

    let (status, body) = app.get("/specialties/name/ortopedia").await;
    let (missing, _) = app.get("/specialties/name/Neurolog%C3%ADa").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["doctor_name"], "Dr. Miguel Torres");
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_update_delete_roundtrip() {
    let app = spawn_app().await;

    let (status, created) = app
        .request(Method::POST, "/specialties", Some(dermatology()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/specialties/{id}");

    let mut replacement = dermatology();
    replacement["location"] = json!("Consulta 502 - Piso 5");
    let (status, updated) = app.request(Method::PUT, &uri, Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["location"], "Consulta 502 - Piso 5");

    let (status, _) = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_names_conflict() {
    let app = spawn_app().await;
    app.request(Method::POST, "/specialties", Some(dermatology()))
        .await;

    let (status, body) = app
        .request(Method::POST, "/specialties", Some(dermatology()))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "a specialty named Dermatología already exists");
}

#[tokio::test]
async fn blank_fields_are_refused() {
    let app = spawn_app().await;
    let mut body = dermatology();
    body["doctor_name"] = json!(" ");

    let (status, response) = app.request(Method::POST, "/specialties", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "doctor_name must not be blank");
}

#[tokio::test]
async fn unknown_specialty_ids() {
    let app = spawn_app().await;

    let (update, _) = app
        .request(Method::PUT, "/specialties/nope", Some(dermatology()))
        .await;
    let (delete, body) = app.request(Method::DELETE, "/specialties/nope", None).await;

    assert_eq!(update, StatusCode::NOT_FOUND);
    assert_eq!(delete, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "specialty not found: nope");
}

#[tokio::test]
async fn renaming_onto_an_existing_name_conflicts() {
    let app = spawn_app().await;
    let (_, created) = app
        .request(Method::POST, "/specialties", Some(dermatology()))
        .await;
    let uri = format!("/specialties/{}", created["id"].as_str().unwrap());

    let mut replacement = dermatology();
    replacement["name"] = json!("Ortopedia");
    let (status, body) = app.request(Method::PUT, &uri, Some(replacement)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_specialty_body_is_a_json_bad_request() {
    let app = spawn_app().await;

    let (status, body) = app
        .request_raw(Method::POST, "/specialties", "{\"name\": 42}")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
