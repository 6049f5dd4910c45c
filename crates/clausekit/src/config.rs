use serde::Deserialize;

/// Default ceiling applied by [`Db::page_limit`](crate::Db::page_limit).
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 50;

/// Configuration shared by every handle created from it.
///
/// Deserializable so it can be embedded in an application's config file:
///
/// ```toml
/// [query]
/// max_page_size = 100
/// log_rejections = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Largest page size accepted by capped pagination.
    pub max_page_size: i64,
    /// Emit a debug event when a whitelisted order/select is skipped.
    pub log_rejections: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            log_rejections: true,
        }
    }
}

impl DbConfig {
    /// Create a configuration with defaults (cap of 50, rejections logged).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capped-pagination ceiling.
    pub fn with_max_page_size(mut self, max_page_size: i64) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Toggle debug events for skipped whitelisted operations.
    pub fn with_log_rejections(mut self, enabled: bool) -> Self {
        self.log_rejections = enabled;
        self
    }
}
