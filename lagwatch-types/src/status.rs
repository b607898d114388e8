//! Burrow evaluator status codes.

/// Severity code derived from a Burrow status string.
///
/// The vocabulary is matched exactly and case-sensitively. Anything outside
/// it, including case or whitespace variants, is [`StatusCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum StatusCode {
    #[default]
    Unknown = 0,
    Ok = 1,
    NotFound = 2,
    Warn = 3,
    Err = 4,
    Stop = 5,
    Stall = 6,
}

impl StatusCode {
    /// Map a status string to its code. Total: never fails.
    pub fn remap(status: &str) -> Self {
        match status {
            "OK" => StatusCode::Ok,
            "NOT_FOUND" => StatusCode::NotFound,
            "WARN" => StatusCode::Warn,
            "ERR" => StatusCode::Err,
            "STOP" => StatusCode::Stop,
            "STALL" => StatusCode::Stall,
            _ => StatusCode::Unknown,
        }
    }

    /// Numeric value as emitted in `status_code` fields.
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Shorthand for `StatusCode::remap(status).code()`.
pub fn remap_status(status: &str) -> i64 {
    StatusCode::remap(status).code()
}
