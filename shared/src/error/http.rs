//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::CouponNotFound
            | Self::ProductNotFound
            | Self::CartNotFound
            | Self::CartLineNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::CouponCodeExists | Self::CartConflict => {
                StatusCode::CONFLICT
            }

            // 422 Unprocessable Entity — business rules that fail on
            // otherwise well-formed input
            Self::CouponInactive
            | Self::CouponExpired
            | Self::CouponBelowMinimum
            | Self::ProductOutOfStock
            | Self::OrderEmpty
            | Self::CartEmpty => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::OrderInvalidStatus
            | Self::ProductInvalidPrice
            | Self::CartInvalidQuantity => StatusCode::BAD_REQUEST,

            // 504 Gateway Timeout
            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
