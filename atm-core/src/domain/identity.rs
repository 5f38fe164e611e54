//! Identity domain model

use std::fmt;

use serde::{Deserialize, Serialize};

/// The person allowed to use the terminal
///
/// Immutable after creation. The PIN is compared verbatim: no hashing,
/// no normalization and no attempt limiting.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    username: String,
    pin: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            pin: pin.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// True iff `candidate` is exactly the stored PIN
    pub fn validate_secret(&self, candidate: &str) -> bool {
        self.pin == candidate
    }
}

// Keep the PIN out of debug output and panic messages
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("pin", &"****")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_creation() {
        let identity = Identity::new("needoweb", "1234");
        assert_eq!(identity.username(), "needoweb");
    }

    #[test]
    fn test_validate_secret_is_exact() {
        let identity = Identity::new("needoweb", "1234");
        assert!(identity.validate_secret("1234"));
        assert!(!identity.validate_secret("1235"));
        assert!(!identity.validate_secret(" 1234"));
        assert!(!identity.validate_secret("1234 "));
        assert!(!identity.validate_secret(""));
    }

    #[test]
    fn test_debug_hides_pin() {
        let identity = Identity::new("needoweb", "1234");
        let debug = format!("{:?}", identity);
        assert!(debug.contains("needoweb"));
        assert!(!debug.contains("1234"));
    }
}
