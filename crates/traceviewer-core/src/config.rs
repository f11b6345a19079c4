//! Signal bus configuration.

use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// Configuration for a [`SignalManager`](crate::signals::SignalManager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalBusConfig {
    /// Record who registers, removes and emits signals.
    ///
    /// When off, every registrant identity is the `<???>` sentinel and no
    /// formatting work is done.
    pub caller_identification: bool,
    /// Path fragment marking the packaging root; source paths containing it
    /// are appended to registrant identities for grouping in logs.
    pub pack_marker: String,
    /// Catch panicking subscribers so the rest of the dispatch still runs.
    pub isolate_panics: bool,
    /// Nesting depth above which each emission logs a warning.
    pub depth_warning_threshold: usize,
}

impl Default for SignalBusConfig {
    fn default() -> Self {
        Self {
            caller_identification: cfg!(debug_assertions),
            pack_marker: "/pack/".to_string(),
            isolate_panics: true,
            depth_warning_threshold: 32,
        }
    }
}

impl SignalBusConfig {
    /// Configuration for diagnostic builds: caller identification on
    pub fn diagnostic() -> Self {
        Self {
            caller_identification: true,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.depth_warning_threshold == 0 {
            return Err(SignalError::InvalidConfig {
                reason: "depth_warning_threshold must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SignalBusConfig::default();
        assert_eq!(config.pack_marker, "/pack/");
        assert!(config.isolate_panics);
        assert!(config.validate().is_ok());
        assert!(SignalBusConfig::diagnostic().caller_identification);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = SignalBusConfig {
            depth_warning_threshold: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SignalError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_partial_deserialization() {
        let config: SignalBusConfig =
            serde_json::from_str(r#"{ "isolate_panics": false }"#).expect("Should parse");
        assert!(!config.isolate_panics);
        assert_eq!(config.depth_warning_threshold, 32);
    }
}
