//! `email` format check

use regex::Regex;

/// Checks the `email` string format
#[derive(Debug, Clone)]
pub struct EmailFormat {
    /// Allow international domain names
    pub allow_unicode: bool,
    /// Require a top-level domain (e.g. `.com`)
    pub require_tld: bool,
}

impl EmailFormat {
    /// ASCII addresses with a top-level domain
    pub fn new() -> Self {
        Self {
            allow_unicode: false,
            require_tld: true,
        }
    }

    /// Allow unicode characters in the domain
    pub fn allow_unicode(mut self, allow: bool) -> Self {
        self.allow_unicode = allow;
        self
    }

    /// Require a top-level domain
    pub fn require_tld(mut self, require: bool) -> Self {
        self.require_tld = require;
        self
    }

    fn pattern(&self) -> Result<Regex, regex::Error> {
        let source = match (self.allow_unicode, self.require_tld) {
            (true, true) => r"^[^\s@.]+[^\s@]*@[^\s@.]+[^\s@]*\.[^\s@]+$",
            (true, false) => r"^[^\s@.]+[^\s@]*@[^\s@.]+[^\s@]*$",
            (false, true) => {
                r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$"
            }
            (false, false) => {
                r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?$"
            }
        };
        Regex::new(source)
    }

    /// Whether `text` is a well-formed address
    pub fn is_valid(&self, text: &str) -> bool {
        let Some((local, domain)) = text.split_once('@') else {
            return false;
        };

        // RFC 5321 length limits
        if local.is_empty() || domain.is_empty() || local.len() > 64 || domain.len() > 255 {
            return false;
        }
        if domain.contains('@') || text.contains("..") {
            return false;
        }

        match self.pattern() {
            Ok(regex) => regex.is_match(text),
            Err(_) => false,
        }
    }
}

impl Default for EmailFormat {
    fn default() -> Self {
        Self::new()
    }
}
