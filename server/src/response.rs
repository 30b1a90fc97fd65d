use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Success envelope: `{status, message, data?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip)]
    code: StatusCode,
    status: u16,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn with(code: StatusCode, message: &'static str, data: Option<T>) -> Self {
        Self {
            code,
            status: code.as_u16(),
            message,
            data,
        }
    }

    pub fn ok(message: &'static str, data: T) -> Self {
        Self::with(StatusCode::OK, message, Some(data))
    }

    pub fn created(message: &'static str, data: T) -> Self {
        Self::with(StatusCode::CREATED, message, Some(data))
    }
}

impl Envelope<()> {
    pub fn message(message: &'static str) -> Self {
        Self::with(StatusCode::OK, message, None)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}
