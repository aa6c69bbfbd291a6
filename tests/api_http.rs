mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn root_endpoint_lists_the_api_surface() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Responder API");
    assert!(body["data"]["endpoints"]["login"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_requires_email_and_password() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for payload in [
        json!({}),
        json!({ "email": "a@example.com" }),
        json!({ "password": "secret" }),
        json!({ "email": "   ", "password": "secret" }),
        json!({ "email": "a@example.com", "password": "" }),
    ] {
        let res = client
            .post(format!("{}/login", server.base_url))
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);

        let body = res.json::<Value>().await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
    Ok(())
}

#[tokio::test]
async fn login_with_malformed_json_is_a_client_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/login", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert!(res.status().is_client_error(), "got {}", res.status());
    Ok(())
}

#[tokio::test]
async fn add_user_requires_all_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for payload in [
        json!({}),
        json!({ "email": "a@example.com", "password": "pw", "username": "maria" }),
        json!({ "email": "a@example.com", "password": "pw", "agency_name": "Red Cross" }),
        json!({ "email": "", "password": "pw", "username": "maria", "agency_name": "Red Cross" }),
    ] {
        let res = client
            .post(format!("{}/add_user", server.base_url))
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);

        let body = res.json::<Value>().await?;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
    Ok(())
}

#[tokio::test]
async fn update_user_requires_all_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/update_user/1", server.base_url))
        .json(&json!({ "email": "a@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn update_user_with_non_numeric_id_is_a_client_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/update_user/abc", server.base_url))
        .json(&json!({
            "email": "a@example.com",
            "username": "maria",
            "agency_name": "Red Cross"
        }))
        .send()
        .await?;
    assert!(res.status().is_client_error(), "got {}", res.status());
    Ok(())
}

#[tokio::test]
async fn delete_users_rejects_missing_or_malformed_id_list() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for payload in [
        json!({}),
        json!({ "ids": "1,2,3" }),
        json!({ "ids": [] }),
        json!({ "ids": [1, "two"] }),
    ] {
        let res = client
            .delete(format!("{}/delete_users", server.base_url))
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);

        let body = res.json::<Value>().await?;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
    Ok(())
}

#[tokio::test]
async fn get_user_details_requires_an_email() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/get_user_details", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn mock_posts_are_sorted_capped_and_tagged() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/get_mock_posts", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let posts = res.json::<Vec<Value>>().await?;
    // Fixture has four parseable rows and a cap of three; the unparseable
    // row and the oldest row must both be gone
    assert_eq!(posts.len(), 3);

    assert_eq!(posts[0]["extractedPost"], "Shelter open");
    assert_eq!(posts[0]["timestamp"], "06 Mar 2024, 09:00 AM");
    assert_eq!(
        posts[0]["namedEntities"],
        "[People: Maria Lopez][Organization: Red Cross][Resource: water][Resource: blankets]"
    );

    assert_eq!(posts[1]["extractedPost"], "Flooding downtown");
    assert_eq!(
        posts[1]["namedEntities"],
        "[Location: Austin, TX][Emergency: flood][Emergency: evacuation]"
    );

    assert_eq!(posts[2]["extractedPost"], "no annotations here");
    assert_eq!(posts[2]["namedEntities"], "No entities found");
    Ok(())
}

#[tokio::test]
async fn cross_origin_requests_are_answered_under_the_default_policy() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Default config: CORS enabled with no origin list, i.e. permissive
    let res = client
        .get(format!("{}/", server.base_url))
        .header("origin", "https://app.example.com")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}

#[tokio::test]
async fn health_reports_degraded_without_a_database() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}
