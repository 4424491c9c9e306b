use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Boundary translation of `abi::Error`; storage/internal detail is logged
/// server-side and never echoed to the client.
pub struct ApiError(abi::Error);

impl From<abi::Error> for ApiError {
    fn from(err: abi::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            abi::Error::MissingFields(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            abi::Error::SlotTaken(slot) => (
                StatusCode::CONFLICT,
                format!("this slot is already reserved: {slot}"),
            ),
            abi::Error::NotFound(id) => {
                (StatusCode::NOT_FOUND, format!("reservation {id} not found"))
            }
            err => {
                error!(error = ?err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, message).into_response()
    }
}
