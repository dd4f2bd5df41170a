use crate::client::RecordsError;
use crate::dashboard::DashboardError;
use axum::http::StatusCode;
use tracing::error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }
}

impl From<RecordsError> for AppError {
    fn from(err: RecordsError) -> Self {
        error!("records backend request failed: {err}");
        let message = err.to_string();
        match err {
            RecordsError::Status { status: 404, .. } => Self {
                status: StatusCode::NOT_FOUND,
                message,
            },
            RecordsError::InvalidBaseUrl(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message,
            },
            _ => Self::bad_gateway(message),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Form(err) => Self::bad_request(err.to_string()),
            DashboardError::Records(err) => err.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
