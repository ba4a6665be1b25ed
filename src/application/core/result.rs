//! Uniform handler outcome
//!
//! Every handler returns exactly one `HandlerResult`. Expected business-rule
//! failures are values, not errors; faults travel separately as `TrakerError`.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResult<T> {
    pub is_success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub code: u16,
}

impl<T> HandlerResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            is_success: true,
            data: Some(data),
            error: None,
            code: 200,
        }
    }

    /// Success without a payload (rendered as 204)
    pub fn empty() -> Self {
        Self {
            is_success: true,
            data: None,
            error: None,
            code: 200,
        }
    }

    pub fn failure<M: Into<String>>(message: M, code: u16) -> Self {
        Self {
            is_success: false,
            data: None,
            error: Some(message.into()),
            code,
        }
    }

    pub fn not_found<M: Into<String>>(message: M) -> Self {
        Self::failure(message, 404)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> HandlerResult<U> {
        HandlerResult {
            is_success: self.is_success,
            data: self.data.map(f),
            error: self.error,
            code: self.code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_carries_payload() {
        let result = HandlerResult::success("abc".to_string());
        assert!(result.is_success);
        assert_eq!(result.data.as_deref(), Some("abc"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failure_has_no_payload() {
        let result: HandlerResult<String> = HandlerResult::failure("Failed to create bookmaker", 400);
        assert!(!result.is_success);
        assert!(result.data.is_none());
        assert_eq!(result.error.as_deref(), Some("Failed to create bookmaker"));
        assert_eq!(result.code, 400);
    }

    #[test]
    fn test_map_keeps_envelope() {
        let result = HandlerResult::success(2).map(|n| n * 10);
        assert_eq!(result.data, Some(20));

        let failed: HandlerResult<i32> = HandlerResult::not_found("gone");
        let mapped = failed.map(|n| n.to_string());
        assert_eq!(mapped.code, 404);
        assert!(mapped.data.is_none());
    }
}
