//! Mass redaction DTOs.

/// Counters of a mass redaction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedactReport {
    /// Pages of history fetched.
    pub pages: usize,
    /// Events redacted.
    pub redacted: usize,
    /// Events left alone: not messages, or already redacted.
    pub skipped: usize,
}
