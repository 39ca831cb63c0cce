//! Client-facing error messages.

pub const VALIDATION_FAILED: &str = "Request validation failed";
pub const INVALID_UUID: &str = "Invalid UUID format";
pub const INVALID_JSON: &str = "Failed to parse request body";
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";
pub const NOT_FOUND_RESOURCE: &str = "Resource not found";
pub const NOT_FOUND_ROUTE: &str = "The requested resource was not found";
pub const METHOD_NOT_ALLOWED: &str = "The HTTP method is not allowed for this resource";
pub const UNAUTHORIZED: &str = "Authentication required";
pub const FORBIDDEN: &str = "Access forbidden";
pub const CONFLICT: &str = "Resource already exists";

/// Returned for every 5xx. The underlying cause only goes to the logs.
pub const INTERNAL_ERROR: &str = "Internal server error";
