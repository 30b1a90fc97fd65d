use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::Report;
use serde::Serialize;

use kernel::KernelError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl From<KernelError> for ErrorStatus {
    fn from(e: KernelError) -> Self {
        ErrorStatus(Report::new(e))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status: u16,
    error_type: &'static str,
    message: String,
}

impl ErrorStatus {
    fn classify(&self) -> (StatusCode, &'static str) {
        match self.0.current_context() {
            KernelError::InvalidIdentifier { .. } | KernelError::InvalidArgument(_) => {
                (StatusCode::BAD_REQUEST, "BadRequestError")
            }
            KernelError::NotFound { .. } => (StatusCode::NOT_FOUND, "NotFoundError"),
            KernelError::AlreadyUsed { .. } | KernelError::Conflict(_) => {
                (StatusCode::METHOD_NOT_ALLOWED, "MethodNotAllowedError")
            }
            KernelError::Unavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "ServiceUnavailableError")
            }
            KernelError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "InternalServerError"),
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let (status, error_type) = self.classify();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::warn!(%status, "{}", self.0.current_context());
        }
        let body = ErrorBody {
            status: status.as_u16(),
            error_type,
            message: self.0.current_context().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;

    use kernel::KernelError;

    use super::ErrorStatus;

    #[test]
    fn kernel_errors_map_to_statuses() {
        let cases = [
            (
                KernelError::InvalidIdentifier { entity: "order" },
                StatusCode::BAD_REQUEST,
                "BadRequestError",
            ),
            (
                KernelError::not_found("voucher", "x"),
                StatusCode::NOT_FOUND,
                "NotFoundError",
            ),
            (
                KernelError::AlreadyUsed { id: "x".to_string() },
                StatusCode::METHOD_NOT_ALLOWED,
                "MethodNotAllowedError",
            ),
            (
                KernelError::Conflict("updating used voucher is not allowed"),
                StatusCode::METHOD_NOT_ALLOWED,
                "MethodNotAllowedError",
            ),
            (
                KernelError::Unavailable,
                StatusCode::SERVICE_UNAVAILABLE,
                "ServiceUnavailableError",
            ),
            (
                KernelError::Internal,
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
            ),
        ];
        for (error, status, error_type) in cases {
            assert_eq!(ErrorStatus::from(error).classify(), (status, error_type));
        }
    }
}
