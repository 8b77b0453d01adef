//! Process-wide configuration
//!
//! A single shared [`ForgeConfig`] tunes escaping, validation and healing for
//! the whole process. Worker code (renderer, parser, validator) never reads it
//! directly: entry points snapshot it with [`current`] and thread a borrow
//! down, so concurrent callers see a consistent view and tests can pass their
//! own instance instead.

use std::fmt;
use std::str::FromStr;
use std::sync::{LazyLock, RwLock};

use crate::ForgeError;

/// Environment variable consulted for the default validation mode.
pub const VALIDATE_MODE_ENV: &str = "TAGFORGE_VALIDATE_MODE";

/// Validation mode for the validator/healer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidateMode {
    /// No validation, identity pass
    #[default]
    None,
    /// Check against the static tag/attribute allowlists
    Static,
    /// Re-parse a probe fragment and require it to survive intact
    FragmentCheck,
    /// Ask the external validation service
    ServiceCheck,
}

impl ValidateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Static => "static",
            Self::FragmentCheck => "fragment",
            Self::ServiceCheck => "service",
        }
    }
}

impl fmt::Display for ValidateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidateMode {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "static" => Ok(Self::Static),
            "fragment" => Ok(Self::FragmentCheck),
            "service" => Ok(Self::ServiceCheck),
            other => Err(ForgeError::unsupported_input(
                format!("Unknown validation mode '{other}'."),
                "1. Use one of: none, static, fragment, service.\n\
                 2. Check the TAGFORGE_VALIDATE_MODE environment variable for typos.",
            )),
        }
    }
}

/// Process-wide settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeConfig {
    /// Escape plain text children on emission
    pub escape_by_default: bool,
    /// Run the validator on render/parse entry points by default
    pub enable_validation: bool,
    /// Default validation mode (per-node overrides win)
    pub validate_mode: ValidateMode,
    /// Repair violations instead of reporting them
    pub auto_heal: bool,
    /// When healing, replace invalid attributes with the nearest allowlisted name
    pub heal_fuzzy_attr: bool,
    /// Indent nested elements in serializer output
    pub pretty_print: bool,
    /// Spaces per indent level when pretty printing
    pub indent_size: usize,
}

impl ForgeConfig {
    /// Built-in defaults, ignoring the environment.
    pub fn new() -> Self {
        Self {
            escape_by_default: true,
            enable_validation: false,
            validate_mode: ValidateMode::None,
            auto_heal: false,
            heal_fuzzy_attr: false,
            pretty_print: false,
            indent_size: 2,
        }
    }

    /// Defaults with `validate_mode` seeded from `TAGFORGE_VALIDATE_MODE`.
    pub fn from_env() -> Self {
        let mut cfg = Self::new();
        if let Ok(value) = std::env::var(VALIDATE_MODE_ENV) {
            cfg.validate_mode = mode_from_env_value(&value);
        }
        cfg
    }
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn mode_from_env_value(value: &str) -> ValidateMode {
    match value.parse() {
        Ok(mode) => mode,
        Err(_) => {
            tracing::warn!(
                "Ignoring unknown {} value '{}'; using 'none'",
                VALIDATE_MODE_ENV,
                value
            );
            ValidateMode::None
        }
    }
}

static GLOBAL: LazyLock<RwLock<ForgeConfig>> = LazyLock::new(|| RwLock::new(ForgeConfig::from_env()));

/// Snapshot of the process-wide configuration.
///
/// Taken by value so later [`update`] calls do not affect work in flight.
pub fn current() -> ForgeConfig {
    GLOBAL
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Mutate the process-wide configuration.
///
/// The only sanctioned mutation path. Callers that need divergent settings
/// for a single call site should pass their own [`ForgeConfig`] to the
/// explicit entry points instead of toggling the global back and forth.
pub fn update(f: impl FnOnce(&mut ForgeConfig)) {
    let mut guard = GLOBAL
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ForgeConfig::new();
        assert!(cfg.escape_by_default);
        assert!(!cfg.enable_validation);
        assert_eq!(cfg.validate_mode, ValidateMode::None);
        assert!(!cfg.auto_heal);
        assert!(!cfg.heal_fuzzy_attr);
        assert!(!cfg.pretty_print);
        assert_eq!(cfg.indent_size, 2);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("none".parse::<ValidateMode>().ok(), Some(ValidateMode::None));
        assert_eq!("static".parse::<ValidateMode>().ok(), Some(ValidateMode::Static));
        assert_eq!(
            "fragment".parse::<ValidateMode>().ok(),
            Some(ValidateMode::FragmentCheck)
        );
        assert_eq!(
            "service".parse::<ValidateMode>().ok(),
            Some(ValidateMode::ServiceCheck)
        );
        assert!("w3c".parse::<ValidateMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in [
            ValidateMode::None,
            ValidateMode::Static,
            ValidateMode::FragmentCheck,
            ValidateMode::ServiceCheck,
        ] {
            assert_eq!(mode.as_str().parse::<ValidateMode>().ok(), Some(mode));
        }
    }

    #[test]
    fn test_unknown_env_value_falls_back() {
        assert_eq!(mode_from_env_value("static"), ValidateMode::Static);
        assert_eq!(mode_from_env_value("bogus"), ValidateMode::None);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let snapshot = current();
        // A snapshot is a plain value; mutating it must not touch the global.
        let mut copy = snapshot.clone();
        copy.escape_by_default = !copy.escape_by_default;
        assert_eq!(current().escape_by_default, snapshot.escape_by_default);
    }
}
