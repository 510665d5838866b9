//! Codec configuration.
use std::env::var;

/// Largest payload the length prefix can describe.
const MAX_PAYLOAD: usize = i32::MAX as usize;

/// Codec configuration builder.
#[derive(Clone, Debug)]
pub struct CodecConfig {
    pub(crate) max_payload: usize,
    pub(crate) strict_categories: bool,
}

impl CodecConfig {
    /// Retrieve configuration from environment variable.
    ///
    /// It reads:
    /// - `PGFIELD_MAX_PAYLOAD`
    /// - `PGFIELD_STRICT_CATEGORIES`
    ///
    /// Invalid or missing value fallback to default value.
    pub fn from_env() -> CodecConfig {
        let max_payload = match var("PGFIELD_MAX_PAYLOAD") {
            Ok(ok) => ok.trim().parse().unwrap_or(MAX_PAYLOAD),
            Err(_) => MAX_PAYLOAD,
        };

        let strict_categories = match var("PGFIELD_STRICT_CATEGORIES") {
            Ok(ok) => parse_bool(&ok).unwrap_or(true),
            Err(_) => true,
        };

        Self::default()
            .set_max_payload(max_payload)
            .strict_categories(strict_categories)
    }

    /// Returns the largest payload accepted when encoding.
    pub fn max_payload(&self) -> usize {
        self.max_payload
    }

    /// Returns `true` if unknown oid is an error when decoding composite.
    pub fn is_strict_categories(&self) -> bool {
        self.strict_categories
    }

    /// Set max payload size, it is capped at `i32::MAX`.
    pub fn set_max_payload(mut self, value: usize) -> Self {
        self.max_payload = value.min(MAX_PAYLOAD);
        self
    }

    /// Set categories strictness.
    pub fn strict_categories(mut self, value: bool) -> Self {
        self.strict_categories = value;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_payload: MAX_PAYLOAD,
            strict_categories: true,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder() {
        let config = CodecConfig::default();
        assert_eq!(config.max_payload(), i32::MAX as usize);
        assert!(config.is_strict_categories());

        let config = config.set_max_payload(usize::MAX).strict_categories(false);
        assert_eq!(config.max_payload(), i32::MAX as usize);
        assert!(!config.is_strict_categories());

        let config = config.set_max_payload(1024);
        assert_eq!(config.max_payload(), 1024);
    }

    #[test]
    fn parse_flag() {
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
