//! Domain-level constants.
//!
//! These constants define business rules shared by every service.

// =============================================================================
// User Roles
// =============================================================================

/// Role for users who register to events (default)
pub const ROLE_ATTENDEE: &str = "ATTENDEE";

/// Role for users who create and manage events
pub const ROLE_ORGANIZER: &str = "ORGANIZER";

/// Role for platform administrators (venue management)
pub const ROLE_ADMIN: &str = "ADMIN";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_ATTENDEE, ROLE_ORGANIZER, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: usize = 1;

/// Minimum event capacity
pub const MIN_EVENT_CAPACITY: i32 = 1;

// =============================================================================
// Authentication
// =============================================================================

/// Access token lifetime in hours
pub const ACCESS_TOKEN_EXPIRATION_HOURS: i64 = 24;

/// Refresh token lifetime in days
pub const REFRESH_TOKEN_EXPIRATION_DAYS: i64 = 7;

/// Minimum JWT secret length
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// Messaging
// =============================================================================

/// Stream carrying registration notifications for the email worker
pub const USER_REGISTERED_STREAM: &str = "email_notifications:user.registered";

/// Consumer group reading [`USER_REGISTERED_STREAM`]
pub const USER_REGISTERED_GROUP: &str = "user_registered_email_queue";

// =============================================================================
// Tickets
// =============================================================================

/// Prefix of every ticket number
pub const TICKET_PREFIX: &str = "TKT";

/// Length of the random suffix of a ticket number
pub const TICKET_SUFFIX_LENGTH: usize = 6;
