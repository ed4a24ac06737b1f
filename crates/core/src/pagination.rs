//! Limit/offset windows for paginated listings.

/// A clamped `LIMIT`/`OFFSET` pair, ready to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// `limit` falls back to `default` and is kept within `1..=max`;
    /// a negative offset becomes 0.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>, default: i64, max: i64) -> Self {
        Self {
            limit: limit.unwrap_or(default).clamp(1, max),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}
