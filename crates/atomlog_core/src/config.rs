//! Event stream configuration.

use crate::error::{CoreError, CoreResult};

/// Default number of entries per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Default author name written on entries and pages.
pub const DEFAULT_AUTHOR: &str = "atomlog";

/// Configuration for an event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries on a page before a new page is started.
    pub page_size: usize,

    /// Author name recorded on appended entries.
    pub author: String,

    /// Whether readers fetch the next page on a background thread.
    pub prefetch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            author: DEFAULT_AUTHOR.to_string(),
            prefetch: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the author name.
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets whether readers prefetch the next page.
    #[must_use]
    pub const fn prefetch(mut self, value: bool) -> Self {
        self.prefetch = value;
        self
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if `page_size` is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.page_size == 0 {
            return Err(CoreError::invalid_argument("page size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.author, "atomlog");
        assert!(config.prefetch);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new().page_size(2).author("billing").prefetch(false);

        assert_eq!(config.page_size, 2);
        assert_eq!(config.author, "billing");
        assert!(!config.prefetch);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(
            Config::new().page_size(0).validate(),
            Err(CoreError::InvalidArgument { .. })
        ));
    }
}
