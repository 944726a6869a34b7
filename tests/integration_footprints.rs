mod common;

use axum::http::StatusCode;
use ecotrack::router::init_router;
use common::{authed_request, body_json, generate_unique_email, json_request, live_state};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Registers a fresh user and returns a bearer token for them.
async fn register_and_login(app: &axum::Router) -> String {
    let email = generate_unique_email();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({ "name": "Tess Tester", "email": email, "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": email, "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

async fn create(app: &axum::Router, token: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(authed_request("POST", "/api/footprints", token, Some(body)))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_footprint_crud() {
    let app = init_router(live_state().await);
    let token = register_and_login(&app).await;

    let (status, created) = create(
        &app,
        &token,
        json!({ "category": "transport", "activity": "Car Petrol", "quantity": 100.0, "recorded_on": "2024-03-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["activity"], "car_petrol");
    assert_eq!(created["unit"], "km");
    assert_eq!(created["co2e_kg"], 19.2);
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(authed_request(
            "PUT",
            &format!("/api/footprints/{}", id),
            &token,
            Some(json!({ "quantity": 50.0 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["co2e_kg"], 9.6);
    assert_eq!(updated["recorded_on"], "2024-03-01");

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/footprints?category=transport", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list["meta"]["total"], 1);
    assert_eq!(list["data"][0]["id"], id);

    let response = app
        .clone()
        .oneshot(authed_request("DELETE", &format!("/api/footprints/{}", id), &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(authed_request("GET", &format!("/api/footprints/{}", id), &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_unknown_activity_needs_factor() {
    let app = init_router(live_state().await);
    let token = register_and_login(&app).await;

    let (status, _) = create(
        &app,
        &token,
        json!({ "category": "other", "activity": "streaming", "quantity": 3.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, created) = create(
        &app,
        &token,
        json!({ "category": "other", "activity": "streaming", "quantity": 3.0, "unit": "hour", "emission_factor": 0.055 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["co2e_kg"], 0.165);
    assert_eq!(created["unit"], "hour");
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_records_are_private() {
    let app = init_router(live_state().await);
    let owner = register_and_login(&app).await;
    let stranger = register_and_login(&app).await;

    let (_, created) = create(
        &app,
        &owner,
        json!({ "category": "food", "activity": "beef", "quantity": 1.0 }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .oneshot(authed_request("DELETE", &format!("/api/footprints/{}", id), &stranger, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_summary_and_profile_stats() {
    let app = init_router(live_state().await);
    let token = register_and_login(&app).await;

    create(&app, &token, json!({ "category": "food", "activity": "beef", "quantity": 2.0 })).await;
    create(&app, &token, json!({ "category": "energy", "activity": "electricity", "quantity": 10.0 })).await;

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/footprints/summary", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["entries"], 2);
    assert_eq!(summary["total_co2e_kg"], 56.33);
    assert_eq!(summary["by_category"][0]["category"], "food");

    let response = app
        .clone()
        .oneshot(authed_request(
            "PUT",
            "/api/profile",
            &token,
            Some(json!({ "monthly_goal_kg": 100.0, "location": "Lagos" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["user"]["location"], "Lagos");
    assert_eq!(profile["stats"]["entries"], 2);
    assert_eq!(profile["stats"]["month_co2e_kg"], 56.33);
    assert_eq!(profile["stats"]["goal_progress_percent"], 56.3);

    let response = app
        .clone()
        .oneshot(authed_request(
            "PUT",
            "/api/profile/password",
            &token,
            Some(json!({ "current_password": "wrong-one", "new_password": "password456" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(authed_request("GET", "/api/realtime/leaderboard?days=7", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let board = body_json(response).await;
    assert_eq!(board["days"], 7);
    assert_eq!(board["entries"][0]["rank"], 1);
}
