//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the operations that
//! need it. Core code never reads environment variables itself.

use crate::{CoreError, CoreResult};
use std::str::FromStr;

/// Which option list a select annotation's selections are checked against.
///
/// An annotation type's options can be edited after annotations were recorded against it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptionCheck {
    /// Check against the annotation type's options as they are now.
    #[default]
    CurrentOptions,
    /// Check against the options the annotation type had when the annotation was built.
    OptionsAtCreation,
}

impl FromStr for OptionCheck {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(OptionCheck::CurrentOptions),
            "creation" => Ok(OptionCheck::OptionsAtCreation),
            other => Err(CoreError::InvalidConfig(format!(
                "option check must be 'current' or 'creation', got '{other}'"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    option_check: OptionCheck,
}

impl CoreConfig {
    pub fn new(option_check: OptionCheck) -> Self {
        Self { option_check }
    }

    pub fn option_check(&self) -> OptionCheck {
        self.option_check
    }
}

/// Parse the option check policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default policy.
pub fn option_check_from_env_value(value: Option<String>) -> CoreResult<OptionCheck> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<OptionCheck>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_value_uses_default() {
        assert_eq!(
            option_check_from_env_value(None).expect("none"),
            OptionCheck::CurrentOptions
        );
        assert_eq!(
            option_check_from_env_value(Some("   ".into())).expect("blank"),
            OptionCheck::CurrentOptions
        );
    }

    #[test]
    fn parses_known_values() {
        assert_eq!(
            option_check_from_env_value(Some(" creation ".into())).expect("creation"),
            OptionCheck::OptionsAtCreation
        );
        assert_eq!(
            option_check_from_env_value(Some("current".into())).expect("current"),
            OptionCheck::CurrentOptions
        );
    }

    #[test]
    fn rejects_unknown_value() {
        let err = option_check_from_env_value(Some("always".into())).expect_err("unknown");
        assert!(matches!(err, CoreError::InvalidConfig(msg) if msg.contains("always")));
    }
}
