//! Secret handling for backend credentials.
//!
//! ```rust
//! use pprovider::SecretString;
//!
//! let key = SecretString::new("sk-live-1234");
//! assert_eq!(key.expose(), "sk-live-1234");
//! assert_eq!(format!("{key:?}"), "[REDACTED]");
//! ```

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SecretString;

    #[test]
    fn debug_output_never_contains_the_value() {
        let secret = SecretString::new("topsecret");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("topsecret"));
        assert_eq!(rendered, "[REDACTED]");
    }

    #[test]
    fn expose_returns_the_raw_value() {
        let secret = SecretString::new("abc");
        assert_eq!(secret.expose(), "abc");
        assert!(!secret.is_empty());
        assert!(SecretString::new("").is_empty());
    }
}
