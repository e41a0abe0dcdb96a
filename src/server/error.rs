//! Error envelope shared by every API route.
//!
//! ```json
//! {"message": "...", "status": 400, "code": "validation_failed", "invalid_fields": [...]}
//! ```

use crate::libs::messages::Message;
use crate::libs::validate::InvalidField;
use crate::msg_error;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const CODE_ERROR_MESSAGE: &str = "error_message";
pub const CODE_VALIDATION_FAILED: &str = "validation_failed";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    TooManyRequests(String),
    #[error("{}", Message::InvalidFields)]
    Validation(Vec<InvalidField>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    status: u16,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    invalid_fields: Option<Vec<InvalidField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: Message) -> Self {
        ApiError::BadRequest(message.to_string())
    }

    pub fn not_found(message: Message) -> Self {
        ApiError::NotFound(message.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation(fields) => ErrorBody {
                message: Message::InvalidFields.to_string(),
                status: status.as_u16(),
                code: CODE_VALIDATION_FAILED,
                invalid_fields: Some(fields),
                error: None,
            },
            ApiError::Internal(e) => {
                msg_error!(format!("{:#}", e));
                ErrorBody {
                    message: Message::InternalError.to_string(),
                    status: status.as_u16(),
                    code: CODE_ERROR_MESSAGE,
                    invalid_fields: None,
                    error: Some(e.to_string()),
                }
            }
            other => ErrorBody {
                message: other.to_string(),
                status: status.as_u16(),
                code: CODE_ERROR_MESSAGE,
                invalid_fields: None,
                error: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// `{"message": ...}` success payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: Message) -> Json<Self> {
        Json(MessageResponse {
            message: message.to_string(),
        })
    }
}

/// `{"data": ...}` success payload.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// JSON request body that rejects with the API envelope instead of axum's
/// plain-text rejection. The `Content-Type` header is not required.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::bad_request(Message::InvalidRequestBody))?;
        let value = serde_json::from_slice(&bytes).map_err(|_| ApiError::bad_request(Message::InvalidRequestBody))?;
        Ok(JsonBody(value))
    }
}

/// Parses a numeric path id, answering 400 with `message` otherwise.
pub fn parse_id(raw: &str, message: Message) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| ApiError::bad_request(message))
}

pub type ApiResult<T> = Result<T, ApiError>;
