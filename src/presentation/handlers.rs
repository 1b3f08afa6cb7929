// HTTP request handlers
use crate::domain::blend::{BlendPayload, BlendRecord};
use crate::domain::error::BlendError;
use crate::infrastructure::http_response::SavedResponse;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

fn parse_payload(body: Result<Json<Value>, JsonRejection>) -> Result<BlendPayload, BlendError> {
    match body {
        Ok(Json(value)) => BlendPayload::from_json(value),
        Err(rejection) => {
            tracing::debug!("Unreadable blend body: {}", rejection);
            Err(BlendError::invalid_payload())
        }
    }
}

/// The current blend
pub async fn latest_blend(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BlendRecord>, BlendError> {
    let record = state.blend_service.fetch_latest().await?;
    Ok(Json(record))
}

/// Replace whatever is stored with a new blend
pub async fn create_blend(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedResponse>), BlendError> {
    let payload = parse_payload(body)?;
    let id = state.blend_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(SavedResponse::saved(id))))
}

/// Overwrite the blend with the given id
pub async fn update_blend(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SavedResponse>, BlendError> {
    let payload = parse_payload(body)?;
    let id = state.blend_service.update(&id, payload).await?;
    Ok(Json(SavedResponse::updated(id)))
}

#[cfg(test)]
mod tests {
    use crate::application::blend_repository::BlendRepository;
    use crate::domain::blend::{BlendId, BlendRecord};
    use crate::infrastructure::http_response::{ErrorBody, SavedResponse};
    use crate::infrastructure::memory_repository::MemoryBlendRepository;
    use crate::presentation::app_state::AppState;
    use crate::presentation::router::build_router;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<MemoryBlendRepository>) {
        let repository = Arc::new(MemoryBlendRepository::new());
        let router = build_router(AppState::new(repository.clone()), Path::new("public"));
        (router, repository)
    }

    fn example_blend() -> Value {
        json!({
            "rows": [
                {"coal": "A", "percentages": [10, 20, 30, 0, 0, 0],
                 "gcv": 4500, "cost": 2000},
                {"coal": "B", "percentages": [0, 0, 0, 50, 50, 0],
                 "gcv": 3800.5, "cost": 1500},
                {"coal": "C", "percentages": [90, 80, 70, 50, 50, 100],
                 "gcv": 4100, "cost": 1750.25}
            ],
            "flows": [1, 2, 3, 4, 5, 6],
            "generation": 210
        })
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(text.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn post_blend(router: &Router, blend: &Value) -> (StatusCode, Vec<u8>) {
        send(router, Method::POST, "/api/blend", Some(&blend.to_string())).await
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_latest_on_empty_store_is_404() {
        let (router, _) = app();
        let (status, body) = send(&router, Method::GET, "/api/blend/latest", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(decode::<ErrorBody>(&body).error, "No blend data found");
    }

    #[tokio::test]
    async fn test_create_then_latest_returns_same_blend() {
        let (router, _) = app();
        let blend = example_blend();

        let (status, body) = post_blend(&router, &blend).await;
        assert_eq!(status, StatusCode::CREATED);
        let saved: SavedResponse = decode(&body);
        assert_eq!(saved.message, "Blend saved");

        let (status, body) = send(&router, Method::GET, "/api/blend/latest", None).await;
        assert_eq!(status, StatusCode::OK);
        let latest: Value = decode(&body);
        assert_eq!(latest["id"], saved.id.to_string());
        assert!(latest["updatedAt"].is_string());

        let record: BlendRecord = decode(&body);
        let expected: Value = example_blend();
        let flows: Vec<Option<f64>> = (1..=6).map(|f| Some(f64::from(f))).collect();
        assert_eq!(record.flows, flows);
        assert_eq!(record.generation, Some(210.0));
        assert_eq!(record.rows.len(), 3);
        for (row, want) in record.rows.iter().zip(expected["rows"].as_array().unwrap()) {
            assert_eq!(row.coal, want["coal"].as_str().unwrap());
            assert_eq!(row.gcv, want["gcv"].as_f64());
            assert_eq!(row.cost, want["cost"].as_f64());
            let pcts: Vec<Option<f64>> = want["percentages"]
                .as_array()
                .unwrap()
                .iter()
                .map(Value::as_f64)
                .collect();
            assert_eq!(row.percentages, pcts);
        }
    }

    #[tokio::test]
    async fn test_create_with_gaps_and_numeric_strings() {
        let (router, _) = app();
        let blend = json!({
            "rows": [
                {"coal": "A", "percentages": [10, null, 30, 0, 0, 0], "gcv": "4500"},
                {"coal": null, "percentages": [null, null, null, null, null, null]}
            ],
            "flows": ["1", null, 3, 4, 5, 6],
            "generation": null
        });

        let (status, _) = post_blend(&router, &blend).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(&router, Method::GET, "/api/blend/latest", None).await;
        let latest: Value = decode(&body);
        assert_eq!(latest["rows"][0]["percentages"], json!([10.0, null, 30.0, 0.0, 0.0, 0.0]));
        assert_eq!(latest["rows"][0]["gcv"], json!(4500.0));
        assert_eq!(latest["rows"][1]["coal"], json!(""));
        assert_eq!(latest["flows"][0], json!(1.0));
        assert!(latest["flows"][1].is_null());
        assert!(latest["generation"].is_null());
    }

    #[tokio::test]
    async fn test_second_create_leaves_one_record() {
        let (router, repository) = app();
        post_blend(&router, &example_blend()).await;

        let second = json!({"rows": [{"coal": "Z"}], "flows": [9], "generation": 1});
        let (_, body) = post_blend(&router, &second).await;
        let saved: SavedResponse = decode(&body);

        let (_, body) = send(&router, Method::GET, "/api/blend/latest", None).await;
        let latest: BlendRecord = decode(&body);
        assert_eq!(latest.id, saved.id);
        assert_eq!(latest.rows[0].coal, "Z");
        assert_eq!(latest.flows, vec![Some(9.0)]);
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_malformed_create_is_400_and_changes_nothing() {
        let (router, repository) = app();
        post_blend(&router, &example_blend()).await;
        let before = repository.latest().await.unwrap();

        let bodies = [
            json!({"flows": [1, 2]}).to_string(),
            json!({"rows": "A,B", "flows": []}).to_string(),
            json!({"rows": [], "flows": 6}).to_string(),
            json!({"rows": [{"gcv": "lots"}], "flows": []}).to_string(),
            "{not json".to_string(),
        ];
        for body in bodies {
            let (status, bytes) = send(&router, Method::POST, "/api/blend", Some(&body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}", body);
            assert_eq!(decode::<ErrorBody>(&bytes).error, "Invalid payload");
        }

        assert_eq!(repository.latest().await.unwrap(), before);
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_existing_blend() {
        let (router, _) = app();
        let (_, body) = post_blend(&router, &example_blend()).await;
        let saved: SavedResponse = decode(&body);

        let mut changed = example_blend();
        changed["generation"] = json!(250);
        let uri = format!("/api/blend/{}", saved.id);
        let (status, body) = send(&router, Method::PUT, &uri, Some(&changed.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        let updated: SavedResponse = decode(&body);
        assert_eq!(updated.message, "Blend updated");
        assert_eq!(updated.id, saved.id);

        let (_, body) = send(&router, Method::GET, "/api/blend/latest", None).await;
        let latest: BlendRecord = decode(&body);
        assert_eq!(latest.generation, Some(250.0));
        assert!(latest.updated_at >= latest.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_404_and_creates_nothing() {
        let (router, repository) = app();
        let body = example_blend().to_string();

        for id in [BlendId::new().to_string(), "507f1f77bcf86cd799439011".to_string()] {
            let uri = format!("/api/blend/{}", id);
            let (status, bytes) = send(&router, Method::PUT, &uri, Some(&body)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(decode::<ErrorBody>(&bytes).error, "Blend not found");
        }

        assert_eq!(repository.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_update_is_400() {
        let (router, repository) = app();
        let (_, body) = post_blend(&router, &example_blend()).await;
        let saved: SavedResponse = decode(&body);
        let before = repository.latest().await.unwrap();

        let uri = format!("/api/blend/{}", saved.id);
        let (status, _) = send(&router, Method::PUT, &uri, Some(r#"{"rows": []}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(repository.latest().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (router, _) = app();
        let (status, body) = send(&router, Method::GET, "/healthz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }
}
