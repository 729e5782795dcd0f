//! Unified error codes for the reservation backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Restaurant errors
//! - 4xxx: Order errors
//! - 5xxx: Review errors
//! - 6xxx: Menu errors
//! - 7xxx: Table, reservation and waitlist errors
//! - 8xxx: Account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Password too short
    PasswordTooShort = 1005,
    /// New password and confirmation differ
    PasswordMismatch = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 3001,
    /// Restaurant still has reservations or orders
    RestaurantInUse = 3002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order item not found
    OrderItemNotFound = 4002,
    /// Order is completed or cancelled
    OrderAlreadyClosed = 4003,
    /// Unknown order status or forbidden transition
    InvalidOrderStatus = 4004,
    /// Quantity out of range
    InvalidQuantity = 4005,
    /// Reservation does not match the order's table or restaurant
    OrderReservationMismatch = 4006,

    // ==================== 5xxx: Review ====================
    /// Review not found
    ReviewNotFound = 5001,
    /// Rating out of range
    InvalidRating = 5002,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item is referenced by order items
    MenuItemInUse = 6002,
    /// Price is negative or not finite
    InvalidPrice = 6003,
    /// Menu item belongs to another restaurant
    MenuItemRestaurantMismatch = 6004,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table already has an active reservation
    TableAlreadyReserved = 7002,
    /// Requested availability disagrees with reservations
    TableAvailabilityMismatch = 7003,
    /// Table is referenced by reservations or orders
    TableInUse = 7004,
    /// Table belongs to another restaurant
    TableRestaurantMismatch = 7005,
    /// Reservation not found
    ReservationNotFound = 7101,
    /// Start time is not before end time
    InvalidTimeRange = 7102,
    /// Reservation date is in the past
    ReservationInPast = 7103,
    /// Party size exceeds seating capacity
    PartySizeExceedsCapacity = 7104,
    /// Party size below one
    InvalidPartySize = 7105,
    /// Waitlist entry not found
    WaitlistNotFound = 7201,

    // ==================== 8xxx: Account ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already taken
    UsernameExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// A cascading delete step failed
    CascadeFailed = 9004,
    /// Request timed out
    TimeoutError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::PasswordTooShort => "Password is too short",
            ErrorCode::PasswordMismatch => "New password and confirmation do not match",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantInUse => "Restaurant has reservations or orders",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderAlreadyClosed => "Order is already closed",
            ErrorCode::InvalidOrderStatus => "Invalid order status",
            ErrorCode::InvalidQuantity => "Invalid quantity",
            ErrorCode::OrderReservationMismatch => {
                "Reservation does not match order table or restaurant"
            }

            // Review
            ErrorCode::ReviewNotFound => "Review not found",
            ErrorCode::InvalidRating => "Rating must be between 1 and 5",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInUse => "Menu item is referenced by orders",
            ErrorCode::InvalidPrice => "Invalid price",
            ErrorCode::MenuItemRestaurantMismatch => "Menu item belongs to another restaurant",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableAlreadyReserved => "Table is already reserved",
            ErrorCode::TableAvailabilityMismatch => {
                "Table availability does not match its reservations"
            }
            ErrorCode::TableInUse => "Table is referenced by reservations or orders",
            ErrorCode::TableRestaurantMismatch => "Table belongs to another restaurant",
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::InvalidTimeRange => "Start time must be before end time",
            ErrorCode::ReservationInPast => "Reservation date is in the past",
            ErrorCode::PartySizeExceedsCapacity => "Party size exceeds table capacity",
            ErrorCode::InvalidPartySize => "Party size must be at least 1",
            ErrorCode::WaitlistNotFound => "Waitlist entry not found",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::CascadeFailed => "Cascading delete failed",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::PasswordTooShort),
            1006 => Ok(ErrorCode::PasswordMismatch),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Restaurant
            3001 => Ok(ErrorCode::RestaurantNotFound),
            3002 => Ok(ErrorCode::RestaurantInUse),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderItemNotFound),
            4003 => Ok(ErrorCode::OrderAlreadyClosed),
            4004 => Ok(ErrorCode::InvalidOrderStatus),
            4005 => Ok(ErrorCode::InvalidQuantity),
            4006 => Ok(ErrorCode::OrderReservationMismatch),

            // Review
            5001 => Ok(ErrorCode::ReviewNotFound),
            5002 => Ok(ErrorCode::InvalidRating),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInUse),
            6003 => Ok(ErrorCode::InvalidPrice),
            6004 => Ok(ErrorCode::MenuItemRestaurantMismatch),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableAlreadyReserved),
            7003 => Ok(ErrorCode::TableAvailabilityMismatch),
            7004 => Ok(ErrorCode::TableInUse),
            7005 => Ok(ErrorCode::TableRestaurantMismatch),
            7101 => Ok(ErrorCode::ReservationNotFound),
            7102 => Ok(ErrorCode::InvalidTimeRange),
            7103 => Ok(ErrorCode::ReservationInPast),
            7104 => Ok(ErrorCode::PartySizeExceedsCapacity),
            7105 => Ok(ErrorCode::InvalidPartySize),
            7201 => Ok(ErrorCode::WaitlistNotFound),

            // Account
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UsernameExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::CascadeFailed),
            9005 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2002);
        assert_eq!(ErrorCode::RestaurantNotFound.code(), 3001);
        assert_eq!(ErrorCode::OrderAlreadyClosed.code(), 4003);
        assert_eq!(ErrorCode::InvalidRating.code(), 5002);
        assert_eq!(ErrorCode::MenuItemInUse.code(), 6002);
        assert_eq!(ErrorCode::TableAlreadyReserved.code(), 7002);
        assert_eq!(ErrorCode::ReservationNotFound.code(), 7101);
        assert_eq!(ErrorCode::UsernameExists.code(), 8002);
        assert_eq!(ErrorCode::CascadeFailed.code(), 9004);
    }

    #[test]
    fn test_try_from_covers_every_code() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValueOutOfRange,
            ErrorCode::PasswordMismatch,
            ErrorCode::PermissionDenied,
            ErrorCode::RestaurantInUse,
            ErrorCode::OrderReservationMismatch,
            ErrorCode::ReviewNotFound,
            ErrorCode::MenuItemRestaurantMismatch,
            ErrorCode::TableRestaurantMismatch,
            ErrorCode::InvalidPartySize,
            ErrorCode::WaitlistNotFound,
            ErrorCode::UserNotFound,
            ErrorCode::TimeoutError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(7006), Err(InvalidErrorCode(7006)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::TableAlreadyReserved).unwrap(),
            "7002"
        );

        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);
        assert!(serde_json::from_str::<ErrorCode>("42").is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::TableAlreadyReserved.message(),
            "Table is already reserved"
        );
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::ReservationNotFound), "7101");
        assert_eq!(
            format!("{}", InvalidErrorCode(999)),
            "invalid error code: 999"
        );
    }
}
