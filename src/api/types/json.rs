//! JSON extractor whose rejections use the API error body

use axum::{
    extract::{rejection::JsonRejection as AxumJsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::{ApiErrorDetail, ApiErrorResponse, ApiErrorType};

/// Wrapper around `axum::Json`
///
/// A body that is not JSON is a 400, JSON of the wrong shape is a 422, and a
/// missing content type is a 415. All three carry the usual error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Body rejection rendered as an API error
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
    code: &'static str,
}

impl JsonRejection {
    fn from_axum(rejection: &AxumJsonRejection) -> Self {
        let (message, code) = match rejection {
            AxumJsonRejection::JsonDataError(err) => (
                format!("Invalid request body: {}", err.body_text()),
                "invalid_body",
            ),
            AxumJsonRejection::JsonSyntaxError(err) => (
                format!("Invalid JSON syntax: {}", err.body_text()),
                "json_parse_error",
            ),
            AxumJsonRejection::MissingJsonContentType(_) => (
                "Missing Content-Type header. Expected 'application/json'.".to_string(),
                "unsupported_media_type",
            ),
            AxumJsonRejection::BytesRejection(err) => (
                format!("Failed to read request body: {}", err.body_text()),
                "body_read_error",
            ),
            _ => ("Invalid JSON request".to_string(), "json_parse_error"),
        };

        Self {
            status: rejection.status(),
            message,
            code,
        }
    }
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            error: ApiErrorDetail {
                message: self.message,
                error_type: ApiErrorType::InvalidRequestError,
                param: None,
                code: Some(self.code.to_string()),
                fields: None,
            },
        };

        (self.status, AxumJson(response)).into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Request body rejected");
                Err(JsonRejection::from_axum(&rejection))
            }
        }
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct SamplePayload {
        #[allow(dead_code)]
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_wrong_shape_is_unprocessable() {
        let rejection = Json::<SamplePayload>::from_request(json_request(r#"{"other": 1}"#), &())
            .await
            .unwrap_err();

        assert_eq!(rejection.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(rejection.code, "invalid_body");
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let rejection = Json::<SamplePayload>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();

        assert_eq!(rejection.status, StatusCode::BAD_REQUEST);
        assert_eq!(rejection.code, "json_parse_error");
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"name": "x"}"#))
            .unwrap();

        let rejection = Json::<SamplePayload>::from_request(request, &()).await.unwrap_err();
        assert_eq!(rejection.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
