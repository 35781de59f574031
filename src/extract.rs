use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use crate::error::AppError;

/// JSON body extractor that reports deserialization failures through the
/// shared error envelope instead of axum's plain-text rejection. Unknown
/// and malformed fields surface as validation errors before any storage
/// call is made.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod extract_tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Payload {
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let AppJson(payload) = AppJson::<Payload>::from_request(json_request(r#"{"name": "x"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "x");
    }

    #[tokio::test]
    async fn unknown_field_becomes_a_validation_error() {
        let err = AppJson::<Payload>::from_request(json_request(r#"{"name": "x", "owner": "y"}"#), &())
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(!msg.is_empty()),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_becomes_a_validation_error() {
        let err = AppJson::<Payload>::from_request(json_request(r#"{"name":"#), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
