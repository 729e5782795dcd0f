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
            | Self::RestaurantNotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::ReviewNotFound
            | Self::MenuItemNotFound
            | Self::TableNotFound
            | Self::ReservationNotFound
            | Self::WaitlistNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::RestaurantInUse
            | Self::OrderAlreadyClosed
            | Self::MenuItemInUse
            | Self::TableAlreadyReserved
            | Self::TableAvailabilityMismatch
            | Self::TableInUse
            | Self::UsernameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 503 Service Unavailable
            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::CascadeFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::RestaurantNotFound,
            ErrorCode::TableNotFound,
            ErrorCode::ReservationNotFound,
            ErrorCode::UserNotFound,
        ] {
            assert_eq!(code.http_status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::TableAlreadyReserved.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::OrderAlreadyClosed.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::UsernameExists.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::AdminRequired.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_bad_request_status() {
        // Validation and business rule errors default to 400
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidTimeRange,
            ErrorCode::ReservationInPast,
            ErrorCode::PartySizeExceedsCapacity,
            ErrorCode::InvalidRating,
            ErrorCode::InvalidQuantity,
            ErrorCode::PasswordMismatch,
        ] {
            assert_eq!(code.http_status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::CascadeFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
