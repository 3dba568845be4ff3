//! Requests through the full router, including the session layer.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use pricehub::{
    model::{api::MessageDto, user::UserDto},
    server::{model::app::AppState, router::routes},
};
use pricehub_test_utils::prelude::*;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::util::body_json;

fn app(test: &TestContext) -> Router {
    app_with_state(test.to_app_state())
}

fn app_with_state(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(SessionManagerLayer::new(MemoryStore::default()))
}

#[tokio::test]
/// Expect the health message at the root path
async fn serves_root() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let resp = app(&test)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: MessageDto = body_json(resp).await;
    assert_eq!(body.message, "LLM Price Hub API is running");

    Ok(())
}

#[tokio::test]
/// Expect the OpenAPI document to list the registered paths
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::get("/api/docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let doc: serde_json::Value = body_json(resp).await;
    let paths = &doc["paths"];

    assert!(paths.get("/api/auth/login").is_some());
    assert!(paths.get("/api/prices/compare/{standard_model_id}").is_some());
    assert!(paths["/api/admin/settings"].get("put").is_some());
    assert!(paths["/api/admin/settings"].get("get").is_some());

    Ok(())
}

#[tokio::test]
/// Expect a JSON registration through the router to succeed
async fn registers_through_router() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let request = Request::post("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({
                "email": "alice@example.com",
                "password": "long-enough"
            })
            .to_string(),
        ))
        .unwrap();

    let resp = app(&test).oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let user: UserDto = body_json(resp).await;
    assert_eq!(user.email, "alice@example.com");

    Ok(())
}

#[tokio::test]
/// Expect protected endpoints to answer 401 without a session cookie
async fn protected_route_requires_login() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let resp = app(&test)
        .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Build a multipart body from text fields plus one file part
fn multipart_body(boundary: &str, fields: &[(&str, &str)], file: (&str, &[u8])) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }

    let (file_name, bytes) = file;
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
            boundary, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    body
}

#[tokio::test]
/// Expect an image proof larger than axum's 2 MB default to be accepted and stored
async fn accepts_large_image_proof() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let user = test.user().insert_user("submitter@example.com").await?;
    let provider = test.provider().insert_approved("Relay").await?;
    let model = test.standard_model().insert_model("gpt-4o").await?;

    let dir = tempfile::tempdir()?;
    let mut state: AppState = test.to_app_state();
    state.static_dir = dir.path().to_path_buf();
    let app = app_with_state(state);

    let login = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "email": user.email, "password": TEST_PASSWORD }).to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(login).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
        .unwrap();

    let image = vec![7u8; 3 * 1024 * 1024];
    let provider_id = provider.id.to_string();
    let model_id = model.id.to_string();
    let boundary = "pricehub-boundary";
    let body = multipart_body(
        boundary,
        &[
            ("provider_id", provider_id.as_str()),
            ("standard_model_id", model_id.as_str()),
            ("price_in", "1.5"),
            ("price_out", "3"),
            ("proof_type", "image"),
        ],
        ("proof.png", image.as_slice()),
    );

    let submit = Request::post("/api/prices/submit")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();
    let resp = app.oneshot(submit).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let stored: Vec<_> = std::fs::read_dir(dir.path().join("uploads"))?
        .collect::<Result<_, _>>()?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].metadata()?.len(), image.len() as u64);

    Ok(())
}
