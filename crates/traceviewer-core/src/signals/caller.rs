//! Registrant identity.
//!
//! Attributes a registration, removal or emission to the code that made it.
//! The identity is built from an owner name the call site passes explicitly
//! and the source location the compiler records for `#[track_caller]`
//! functions. It is observability metadata only and never influences delivery.

use std::panic::Location;

use crate::config::SignalBusConfig;

/// Placeholder used when no call site information is available.
pub const UNKNOWN_REGISTRANT: &str = "<???>";

/// The widget or component that owns a subscription
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Owner {
    name: String,
    constructor: bool,
}

impl Owner {
    /// Owner identified by a plain name (`"TraceTree::on_mount"`)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: false,
        }
    }

    /// Owner registering from inside a constructor
    pub fn constructor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: true,
        }
    }

    /// Anonymous owner; the identity falls back to the call location
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Owner name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the owner registered from a constructor
    pub fn is_constructor(&self) -> bool {
        self.constructor || looks_like_constructor(&self.name)
    }
}

impl From<&str> for Owner {
    fn from(name: &str) -> Self {
        Owner::new(name)
    }
}

impl From<String> for Owner {
    fn from(name: String) -> Self {
        Owner::new(name)
    }
}

impl From<&String> for Owner {
    fn from(name: &String) -> Self {
        Owner::new(name.as_str())
    }
}

/// Diagnostic description of the call site that registered a subscriber
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrantIdentity(String);

impl RegistrantIdentity {
    /// The sentinel identity
    pub fn unknown() -> Self {
        Self(UNKNOWN_REGISTRANT.to_string())
    }

    /// Build the identity for a call site.
    ///
    /// Returns the sentinel when caller identification is disabled or neither
    /// an owner name nor a location is available.
    pub fn capture(
        owner: Option<&Owner>,
        location: Option<&Location<'_>>,
        config: &SignalBusConfig,
    ) -> Self {
        if !config.caller_identification {
            return Self::unknown();
        }

        let owner = owner.filter(|o| !o.name.trim().is_empty());
        let mut label = match (owner, location) {
            (Some(owner), Some(loc)) => {
                format!("{} @ {}:{}", owner.name, loc.file(), loc.line())
            }
            (Some(owner), None) => owner.name.clone(),
            (None, Some(loc)) => format!("{}:{}", loc.file(), loc.line()),
            (None, None) => return Self::unknown(),
        };

        if owner.is_some_and(Owner::is_constructor) {
            label.insert_str(0, "(constructor) ");
        }

        if let Some(fragment) = location.and_then(|loc| pack_fragment(loc.file(), &config.pack_marker))
        {
            label.push_str(&format!(" (packfile: {})", fragment));
        }

        Self(label)
    }

    /// Capture the identity of the caller of a `#[track_caller]` function
    #[track_caller]
    pub fn here(owner: Option<&Owner>, config: &SignalBusConfig) -> Self {
        Self::capture(owner, Some(Location::caller()), config)
    }

    /// Whether this is the sentinel identity
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_REGISTRANT
    }

    /// Identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegistrantIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn looks_like_constructor(name: &str) -> bool {
    let last = name.rsplit("::").next().unwrap_or(name);
    last == "new" || last == "default" || last.starts_with("with_")
}

/// Path fragment starting at the packaging-root marker, if present
fn pack_fragment<'a>(file: &'a str, marker: &str) -> Option<&'a str> {
    if marker.is_empty() {
        return None;
    }
    let normalized = file.find(marker).or_else(|| {
        // Windows paths
        let alt = marker.replace('/', "\\");
        file.find(&alt)
    })?;
    Some(&file[normalized..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> SignalBusConfig {
        SignalBusConfig {
            caller_identification: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_is_sentinel() {
        let config = SignalBusConfig {
            caller_identification: false,
            ..Default::default()
        };
        let id = RegistrantIdentity::here(Some(&Owner::new("TraceTree")), &config);
        assert!(id.is_unknown());
        assert_eq!(id.to_string(), UNKNOWN_REGISTRANT);
    }

    #[test]
    fn test_no_information_is_sentinel() {
        let id = RegistrantIdentity::capture(None, None, &enabled());
        assert!(id.is_unknown());

        let blank = Owner::new("  ");
        let id = RegistrantIdentity::capture(Some(&blank), None, &enabled());
        assert!(id.is_unknown());
    }

    #[test]
    fn test_owner_and_location() {
        let id = RegistrantIdentity::here(Some(&Owner::new("TimelineChart::on_mount")), &enabled());
        assert!(id.as_str().starts_with("TimelineChart::on_mount @ "));
        assert!(id.as_str().contains("caller.rs:"));
    }

    #[test]
    fn test_location_only() {
        let id = RegistrantIdentity::here(None, &enabled());
        assert!(id.as_str().contains("caller.rs:"));
        assert!(!id.is_unknown());
    }

    #[test]
    fn test_constructor_annotation() {
        let id = RegistrantIdentity::capture(Some(&Owner::new("TraceTree::new")), None, &enabled());
        assert_eq!(id.as_str(), "(constructor) TraceTree::new");

        let id = RegistrantIdentity::capture(Some(&Owner::constructor("TraceTree")), None, &enabled());
        assert_eq!(id.as_str(), "(constructor) TraceTree");

        let id = RegistrantIdentity::capture(Some(&Owner::new("TraceTree::renew")), None, &enabled());
        assert_eq!(id.as_str(), "TraceTree::renew");
    }

    #[test]
    fn test_pack_fragment() {
        assert_eq!(
            pack_fragment("/opt/app/pack/widgets/src/tree.rs", "/pack/"),
            Some("/pack/widgets/src/tree.rs")
        );
        assert_eq!(pack_fragment("src/tree.rs", "/pack/"), None);
        assert_eq!(pack_fragment("/pack/tree.rs", ""), None);
        assert_eq!(
            pack_fragment("C:\\app\\pack\\tree.rs", "/pack/"),
            Some("\\pack\\tree.rs")
        );
    }

    #[test]
    fn test_pack_marker_from_config() {
        let config = SignalBusConfig {
            caller_identification: true,
            pack_marker: "src/".to_string(),
            ..Default::default()
        };
        let id = RegistrantIdentity::here(Some(&Owner::new("Probe")), &config);
        assert!(
            id.as_str().contains("(packfile: src/signals/caller.rs)"),
            "unexpected identity {}",
            id
        );
    }
}
