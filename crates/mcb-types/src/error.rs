//! Unified error interface for MCB.
//!
//! Every error enum in the bridge implements [`ErrorCode`] so the call
//! layer can log and encode failures uniformly, regardless of which
//! component produced them.
//!
//! # Design
//!
//! - **Machine-readable codes**: stable strings for audit lines and
//!   failure payloads
//! - **Recoverability info**: whether a later identical call might succeed
//!   (the core never retries; callers own retry policy)
//!
//! # Example
//!
//! ```
//! use mcb_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     Missing(String),
//!     Busy,
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Missing(_) => "LOOKUP_MISSING",
//!             Self::Busy => "LOOKUP_BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! assert_eq!(LookupError::Busy.code(), "LOOKUP_BUSY");
//! ```

/// Unified error code interface for MCB errors.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**: e.g., `"AUTH_DENIED"`
/// - **Domain-prefixed**: `"LOADER_"`, `"LOCATOR_"`, `"POLICY_"`,
///   `"AUTH_"`, `"CALL_"`
/// - **Stable**: codes are an API contract and never change once defined
///
/// # Recoverability
///
/// Recoverable means a later identical call may succeed because the
/// failure was transient (a module still activating, a hung session).
/// Not recoverable means retrying cannot help (malformed artifact, denied
/// access, broken factory).
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether a later identical call may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows MCB conventions.
///
/// # Checks
///
/// 1. Code is UPPER_SNAKE_CASE
/// 2. Code starts with the expected domain prefix
/// 3. Code is not empty
///
/// # Panics
///
/// Panics with a descriptive message if validation fails.
///
/// # Example
///
/// ```
/// use mcb_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// enum MyError { Gone }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str { "MY_GONE" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&MyError::Gone, "MY_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");

    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );

    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates multiple error codes at once.
///
/// Use this to verify all variants of an error enum in one test.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    if s.starts_with('_') || s.ends_with('_') {
        return false;
    }

    if s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
