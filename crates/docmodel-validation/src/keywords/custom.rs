//! User-registered string formats

use std::sync::Arc;

/// Signature of a format check
pub type FormatFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A named string format registered on a validator
#[derive(Clone)]
pub struct CustomFormat {
    name: String,
    check: FormatFn,
}

impl CustomFormat {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self, text: &str) -> bool {
        (self.check)(text)
    }

    /// Strings made of ASCII letters and digits only
    pub fn alphanumeric() -> Self {
        Self::new("alphanumeric", |text| {
            !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric())
        })
    }

    /// Lower-case slugs: letters, digits and hyphens
    pub fn slug() -> Self {
        Self::new("slug", |text| {
            !text.is_empty()
                && text
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        })
    }
}

impl std::fmt::Debug for CustomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomFormat").field("name", &self.name).finish()
    }
}
