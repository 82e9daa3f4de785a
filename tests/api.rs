use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use caffeinelog::app::build_app;
use caffeinelog::state::AppState;

async fn test_app() -> Router {
    let state = AppState::in_memory().await.expect("in-memory state");
    build_app(state)
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_user(app: &Router, username: &str, limit: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password_hash": "h",
            "daily_caffeine_limit": limit,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user: {body}");
    body["user"]["id"].as_i64().unwrap()
}

async fn create_beverage(app: &Router, name: &str, caffeine_mg: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/beverages",
        Some(json!({ "name": name, "caffeine_content_mg": caffeine_mg })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create beverage: {body}");
    body["beverage"]["id"].as_i64().unwrap()
}

async fn log_consumption(app: &Router, user_id: i64, beverage_id: i64, servings: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        &format!("/users/{user_id}/consumptions"),
        Some(json!({ "beverage_id": beverage_id, "serving_count": servings })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "log consumption: {body}");
    body["consumption"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app().await;
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn beverage_create_then_list_roundtrip() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/beverages",
        Some(json!({
            "name": "Coffee",
            "caffeine_content_mg": 95,
            "image_url": "https://example.com/coffee.png",
            "category": "coffee",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["beverage"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/beverages", None).await;
    assert_eq!(status, StatusCode::OK);
    let found = body["beverages"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"].as_i64() == Some(id))
        .expect("created beverage listed")
        .clone();
    assert_eq!(found["name"], "Coffee");
    assert_eq!(found["caffeine_content_mg"], 95);
    assert_eq!(found["image_url"], "https://example.com/coffee.png");
    assert_eq!(found["category"], "coffee");
}

#[tokio::test]
async fn beverage_accepts_numeric_strings() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/beverages",
        Some(json!({ "name": "Espresso", "caffeine_content_mg": "63" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["beverage"]["caffeine_content_mg"], 63);
}

#[tokio::test]
async fn beverage_validation_errors() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/beverages",
        Some(json!({ "caffeine_content_mg": 95 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Field 'name' is required");

    let (status, body) = send(
        &app,
        "POST",
        "/beverages",
        Some(json!({ "name": "Cold Brew", "caffeine_content_mg": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "'caffeine_content_mg' must be non-negative");

    // unknown fields are rejected before business logic
    let (status, body) = send(
        &app,
        "POST",
        "/beverages",
        Some(json!({ "name": "Chai", "caffeine_content_mg": 40, "color": "brown" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("color"), "{body}");
}

#[tokio::test]
async fn beverage_update_and_missing_id() {
    let app = test_app().await;
    let id = create_beverage(&app, "Latte", 80).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/beverages/{id}"),
        Some(json!({ "name": "Double Latte", "caffeine_content_mg": 160 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["beverage"]["name"], "Double Latte");
    assert_eq!(body["beverage"]["caffeine_content_mg"], 160);
    // optional fields not resent are cleared by the full overwrite
    assert_eq!(body["beverage"]["image_url"], Value::Null);

    let (status, body) = send(
        &app,
        "PUT",
        "/beverages/9999",
        Some(json!({ "name": "Ghost", "caffeine_content_mg": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Beverage not found");
}

#[tokio::test]
async fn user_creation_reports_missing_fields() {
    let app = test_app().await;
    let (status, body) = send(&app, "POST", "/users", Some(json!({ "username": "a" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required field(s): email, password_hash, daily_caffeine_limit"
    );
}

#[tokio::test]
async fn user_response_hides_password_hash() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password_hash": "secret",
            "daily_caffeine_limit": 300,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"].get("password_hash").is_none(), "{body}");
    assert_eq!(body["user"]["weight_lbs"], 160.0);

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["users"][0].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = test_app().await;
    create_user(&app, "dave", 400).await;
    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({
            "username": "dave",
            "email": "other@example.com",
            "password_hash": "h",
            "daily_caffeine_limit": 200,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");
}

#[tokio::test]
async fn update_limit_preserves_other_fields() {
    let app = test_app().await;
    let id = create_user(&app, "erin", 400).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{id}/limit"),
        Some(json!({ "daily_caffeine_limit": "250" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["daily_caffeine_limit"], 250);
    assert_eq!(body["user"]["username"], "erin");
    assert_eq!(body["user"]["email"], "erin@example.com");

    let (status, body) = send(
        &app,
        "PUT",
        "/users/9999/limit",
        Some(json!({ "daily_caffeine_limit": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn logging_requires_existing_user_and_beverage() {
    let app = test_app().await;
    let user_id = create_user(&app, "frank", 400).await;
    let beverage_id = create_beverage(&app, "Coffee", 95).await;

    let (status, body) = send(
        &app,
        "POST",
        "/users/9999/consumptions",
        Some(json!({ "beverage_id": beverage_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/consumptions"),
        Some(json!({ "beverage_id": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Beverage not found");

    // serving_count defaults to 1
    let (status, body) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/consumptions"),
        Some(json!({ "beverage_id": beverage_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["consumption"]["serving_count"], 1);
    assert_eq!(body["consumption"]["user_id"], user_id);
}

#[tokio::test]
async fn daily_total_and_stats_follow_the_example_scenario() {
    let app = test_app().await;
    let user_id = create_user(&app, "a", 400).await;
    let beverage_id = create_beverage(&app, "Coffee", 95).await;

    // no entries yet: totals are zero
    let (status, body) = send(
        &app,
        "GET",
        &format!("/users/{user_id}/consumption/today"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_caffeine_mg"], 0);
    assert_eq!(body["breakdown"].as_array().unwrap().len(), 0);

    log_consumption(&app, user_id, beverage_id, 2).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/users/{user_id}/consumption/today"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_caffeine_mg"], 190);
    let breakdown = body["breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0]["beverage"], "Coffee");
    assert_eq!(breakdown[0]["servings"], 2);
    assert_eq!(breakdown[0]["caffeine_mg"], 190);

    let (status, body) = send(&app, "GET", &format!("/users/{user_id}/stats"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["daily_total_caffeine_mg"], 190);
    assert_eq!(body["daily_limit_mg"], 400);
    assert_eq!(body["percentage_of_limit"], 47.5);
    assert_eq!(body["remaining_mg"], 210);

    let (status, body) = send(&app, "GET", "/users/9999/stats", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn remaining_clamps_at_zero_over_the_limit() {
    let app = test_app().await;
    let user_id = create_user(&app, "grace", 100).await;
    let beverage_id = create_beverage(&app, "Energy Drink", 150).await;
    log_consumption(&app, user_id, beverage_id, 1).await;

    let (_, body) = send(&app, "GET", &format!("/users/{user_id}/stats"), None).await;
    assert_eq!(body["daily_total_caffeine_mg"], 150);
    assert_eq!(body["remaining_mg"], 0);
    assert_eq!(body["percentage_of_limit"], 150.0);
}

#[tokio::test]
async fn weekly_summary_has_seven_days_including_today() {
    let app = test_app().await;
    let user_id = create_user(&app, "heidi", 400).await;
    let beverage_id = create_beverage(&app, "Coffee", 95).await;
    log_consumption(&app, user_id, beverage_id, 2).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/users/{user_id}/consumption/weekly"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let days = body.as_object().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days.values().filter(|v| v.as_i64() == Some(0)).count(), 6);
    assert!(days.values().any(|v| v.as_i64() == Some(190)));
}

#[tokio::test]
async fn consumption_update_is_in_place_and_ownership_checked() {
    let app = test_app().await;
    let owner = create_user(&app, "ivan", 400).await;
    let other = create_user(&app, "judy", 400).await;
    let beverage_id = create_beverage(&app, "Coffee", 95).await;
    let entry_id = log_consumption(&app, owner, beverage_id, 1).await;

    let (_, before) = send(&app, "GET", "/consumption", None).await;
    let original_time = before["consumptions"][0]["consumption_time"].clone();

    // someone else's path: forbidden, row untouched
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{other}/consumptions/{entry_id}"),
        Some(json!({ "serving_count": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Consumption entry belongs to another user");

    let (_, body) = send(&app, "GET", "/consumption", None).await;
    assert_eq!(body["consumptions"][0]["serving_count"], 1);

    // the owner updates in place: same id, same timestamp
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{owner}/consumptions/{entry_id}"),
        Some(json!({ "serving_count": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["consumption"]["id"], entry_id);
    assert_eq!(body["consumption"]["serving_count"], 3);
    assert_eq!(body["consumption"]["consumption_time"], original_time);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{owner}/consumptions/9999"),
        Some(json!({ "serving_count": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Consumption entry not found");
}

#[tokio::test]
async fn consumption_delete_is_ownership_checked() {
    let app = test_app().await;
    let owner = create_user(&app, "kate", 400).await;
    let other = create_user(&app, "leo", 400).await;
    let beverage_id = create_beverage(&app, "Tea", 47).await;
    let entry_id = log_consumption(&app, owner, beverage_id, 1).await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/users/{other}/consumptions/{entry_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/users/{owner}/consumptions/{entry_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Consumption entry deleted");

    let (_, body) = send(&app, "GET", "/consumption", None).await;
    assert_eq!(body["consumptions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn deleting_a_user_removes_their_consumption_history() {
    let app = test_app().await;
    let doomed = create_user(&app, "mallory", 400).await;
    let survivor = create_user(&app, "nina", 400).await;
    let beverage_id = create_beverage(&app, "Coffee", 95).await;
    log_consumption(&app, doomed, beverage_id, 2).await;
    log_consumption(&app, doomed, beverage_id, 1).await;
    log_consumption(&app, survivor, beverage_id, 1).await;

    let (status, body) = send(&app, "DELETE", &format!("/users/{doomed}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User account deleted");

    let (_, body) = send(&app, "GET", "/consumption", None).await;
    let remaining = body["consumptions"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["user_id"], survivor);

    let (_, body) = send(&app, "GET", "/users", None).await;
    let usernames: Vec<_> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(usernames, vec!["nina"]);
}

#[tokio::test]
async fn deleted_beverage_drops_out_of_aggregates() {
    let app = test_app().await;
    let user_id = create_user(&app, "oscar", 400).await;
    let kept = create_beverage(&app, "Coffee", 95).await;
    let dropped = create_beverage(&app, "Soda", 40).await;
    log_consumption(&app, user_id, kept, 1).await;
    log_consumption(&app, user_id, dropped, 1).await;

    let (status, _) = send(&app, "DELETE", &format!("/beverages/{dropped}"), None).await;
    assert_eq!(status, StatusCode::OK);

    // the orphaned entry still exists but no longer contributes
    let (_, body) = send(&app, "GET", "/consumption", None).await;
    assert_eq!(body["consumptions"].as_array().unwrap().len(), 2);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/users/{user_id}/consumption/today"),
        None,
    )
    .await;
    assert_eq!(body["total_caffeine_mg"], 95);
}

#[tokio::test]
async fn malformed_json_body_uses_error_envelope() {
    let app = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().is_some());
}
