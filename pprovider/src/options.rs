//! Per-call generation settings shared by request types.
//!
//! ```rust
//! use pprovider::GenerationOptions;
//!
//! let options = GenerationOptions::default()
//!     .with_temperature(0.2)
//!     .with_max_tokens(128);
//!
//! assert_eq!(options.temperature, Some(0.2));
//! assert_eq!(options.max_tokens, Some(128));
//! assert_eq!(options.top_p, None);
//! ```

use crate::ProviderError;

/// The closed per-call parameter schema. Every field is optional; an
/// unset field defers to the backend (or an adapter-level default).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.max_tokens.is_none()
    }

    /// Fill unset fields from `defaults`, leaving set fields untouched.
    pub fn or_defaults(&self, defaults: &GenerationOptions) -> Self {
        Self {
            temperature: self.temperature.or(defaults.temperature),
            top_p: self.top_p.or(defaults.top_p),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ProviderError::invalid_request(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        if let Some(top_p) = self.top_p
            && !(0.0..=1.0).contains(&top_p)
        {
            return Err(ProviderError::invalid_request(
                "top_p must be in the inclusive range 0.0..=1.0",
            ));
        }

        if let Some(max_tokens) = self.max_tokens
            && max_tokens == 0
        {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn builder_helpers_set_values() {
        let options = GenerationOptions::default()
            .with_temperature(0.3)
            .with_top_p(0.9)
            .with_max_tokens(123);

        assert_eq!(options.temperature, Some(0.3));
        assert_eq!(options.top_p, Some(0.9));
        assert_eq!(options.max_tokens, Some(123));
        assert!(!options.is_empty());
    }

    #[test]
    fn validate_enforces_ranges() {
        let too_hot = GenerationOptions::default().with_temperature(2.5);
        let err = too_hot.validate().expect_err("temperature must fail");
        assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);

        let bad_top_p = GenerationOptions::default().with_top_p(1.5);
        let err = bad_top_p.validate().expect_err("top_p must fail");
        assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);

        let zero_budget = GenerationOptions::default().with_max_tokens(0);
        let err = zero_budget.validate().expect_err("max_tokens=0 must fail");
        assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);

        assert!(GenerationOptions::default().validate().is_ok());
    }

    #[test]
    fn or_defaults_only_fills_unset_fields() {
        let defaults = GenerationOptions::default()
            .with_temperature(0.7)
            .with_max_tokens(1000);
        let requested = GenerationOptions::default().with_temperature(0.1);

        let effective = requested.or_defaults(&defaults);
        assert_eq!(effective.temperature, Some(0.1));
        assert_eq!(effective.max_tokens, Some(1000));
        assert_eq!(effective.top_p, None);
    }
}
