//! HTTP-level tests for the simple reference resources
//! (generos, directores, productoras, tipos).

mod common;

use axum::http::StatusCode;
use common::{body_json, create, delete, get, post_json, post_raw, put_json};
use serde_json::json;

fn genre(name: &str) -> serde_json::Value {
    json!({ "nombre": name, "descripcion": "Genre description", "estado": "activo" })
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_id_and_timestamps() {
    let app = common::build_test_app();
    let response = post_json(&app, "/api/generos", genre("Drama")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["nombre"], "Drama");
    assert_eq!(json["estado"], "activo");
    assert!(json["id"].is_string());
    assert_eq!(json["fechaCreacion"], json["fechaActualizacion"]);
}

#[tokio::test]
async fn duplicate_name_returns_400_with_message() {
    let app = common::build_test_app();
    create(&app, "tipos", json!({ "nombre": "Serie", "descripcion": "Episodic" })).await;

    let response = post_json(
        &app,
        "/api/tipos",
        json!({ "nombre": " Serie ", "descripcion": "Episodic" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "msg": "El tipo ya existe" }));
}

#[tokio::test]
async fn validation_errors_are_itemized() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/api/productoras",
        json!({ "nombre": "ab", "estado": "cerrado", "imagen": "logo.png" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let paths: Vec<_> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, ["nombre", "descripcion", "estado", "slogan", "imagen"]);
    assert_eq!(json["errors"][0]["msg"], "El nombre debe tener al menos 3 caracteres");
    assert_eq!(json["errors"][0]["location"], "body");

    let list = body_json(get(&app, "/api/productoras").await).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn malformed_json_body_returns_json_error() {
    let app = common::build_test_app();
    let response = post_raw(&app, "/api/generos", Some("application/json"), "{\"nombre\": ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["msg"], "Cuerpo de la solicitud inválido");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn body_without_json_content_type_returns_json_error() {
    let app = common::build_test_app();
    let response = post_raw(&app, "/api/generos", None, "nombre=Drama").await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_json(response).await["msg"], "Cuerpo de la solicitud inválido");
    assert_eq!(body_json(get(&app, "/api/generos").await).await, json!([]));
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_id_round_trips() {
    let app = common::build_test_app();
    let response = post_json(&app, "/api/directores", json!({ "nombre": "Agnès Varda", "estado": "inactivo" })).await;
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap();

    let response = get(&app, &format!("/api/directores/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn get_missing_or_malformed_id_returns_404() {
    let app = common::build_test_app();

    let response = get(&app, "/api/generos/0190a6f0-0000-7000-8000-00000000abcd").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "msg": "Género no encontrado" }));

    let response = get(&app, "/api/productoras/65f1c0ffee0ddba11deadbee").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["msg"], "Productora no encontrada");
}

#[tokio::test]
async fn list_returns_every_document() {
    let app = common::build_test_app();
    create(&app, "generos", genre("Drama")).await;
    create(&app, "generos", genre("Comedia")).await;

    let response = get(&app, "/api/generos").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_active_is_filtered_and_sorted() {
    let app = common::build_test_app();
    create(&app, "directores", json!({ "nombre": "Wim Wenders", "estado": "activo" })).await;
    create(&app, "directores", json!({ "nombre": "Chantal Akerman", "estado": "activo" })).await;
    create(&app, "directores", json!({ "nombre": "Béla Tarr", "estado": "inactivo" })).await;

    let response = get(&app, "/api/directores/activos").await;
    assert_eq!(response.status(), StatusCode::OK);
    let names: Vec<_> = body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["nombre"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Chantal Akerman", "Wim Wenders"]);
}

#[tokio::test]
async fn media_has_no_active_listing() {
    let app = common::build_test_app();
    let response = get(&app, "/api/medias/activos").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_changes_fields_and_refreshes_timestamp() {
    let app = common::build_test_app();
    let created = body_json(post_json(&app, "/api/generos", genre("Drama")).await).await;
    let id = created["id"].as_str().unwrap();

    let response = put_json(
        &app,
        &format!("/api/generos/{id}"),
        json!({
            "nombre": "Drama",
            "descripcion": "Now with an image",
            "estado": "inactivo",
            "imagen": "https://example.com/drama.png",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["estado"], "inactivo");
    assert_eq!(updated["imagen"], "https://example.com/drama.png");
    assert_eq!(updated["fechaCreacion"], created["fechaCreacion"]);
    assert_ne!(updated["fechaActualizacion"], created["fechaActualizacion"]);
}

#[tokio::test]
async fn update_to_another_documents_name_returns_400() {
    let app = common::build_test_app();
    create(&app, "generos", genre("Drama")).await;
    let id = create(&app, "generos", genre("Comedia")).await;

    let response = put_json(&app, &format!("/api/generos/{id}"), genre("Drama")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["msg"], "El género ya existe");
}

#[tokio::test]
async fn update_without_status_keeps_it() {
    let app = common::build_test_app();
    let id = create(
        &app,
        "directores",
        json!({ "nombre": "Béla Tarr", "estado": "inactivo" }),
    )
    .await;

    let response = put_json(&app, &format!("/api/directores/{id}"), json!({ "nombre": "Béla Tarr" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["estado"], "inactivo");

    let active = body_json(get(&app, "/api/directores/activos").await).await;
    assert_eq!(active, json!([]));
}

#[tokio::test]
async fn update_missing_id_returns_404() {
    let app = common::build_test_app();
    let response = put_json(
        &app,
        "/api/tipos/0190a6f0-0000-7000-8000-00000000abcd",
        json!({ "nombre": "Serie", "descripcion": "Episodic", "estado": "activo" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["msg"], "Tipo no encontrado");
}

#[tokio::test]
async fn update_with_invalid_body_returns_400_before_lookup() {
    let app = common::build_test_app();
    let response = put_json(
        &app,
        "/api/tipos/0190a6f0-0000-7000-8000-00000000abcd",
        json!({ "estado": "activo" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["errors"].is_array());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_returns_message_then_404() {
    let app = common::build_test_app();
    let id = create(
        &app,
        "productoras",
        json!({
            "nombre": "Gaumont",
            "descripcion": "French studio",
            "estado": "activo",
            "slogan": "Depuis que le cinéma existe",
        }),
    )
    .await;

    let response = delete(&app, &format!("/api/productoras/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "msg": "Productora eliminada correctamente" })
    );

    let response = delete(&app, &format!("/api/productoras/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, &format!("/api/productoras/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
