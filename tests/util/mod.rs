//! Helpers shared by the integration tests.

use axum::response::Response;
use serde::de::DeserializeOwned;

/// Read a JSON response body into `T`
pub async fn body_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    serde_json::from_slice(&bytes).unwrap()
}
