//! API credential handling
//!
//! The credential is a secret supplied once per session. It lives only in
//! process memory and is redacted from `Debug` and `Display` output so it can
//! never leak through logs.

use std::fmt;

/// A secret API credential for the remote assistant service
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw credential string
    pub fn new(secret: impl Into<String>) -> Self {
        Credential(secret.into())
    }

    /// Whether the credential is empty (provisioning precondition)
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Expose the raw secret for use in an Authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Credential {
    fn from(secret: String) -> Self {
        Credential(secret)
    }
}

impl From<&str> for Credential {
    fn from(secret: &str) -> Self {
        Credential(secret.to_string())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_in_debug_and_display() {
        let cred = Credential::new("sk-super-secret");
        assert_eq!(format!("{:?}", cred), "Credential(***)");
        assert_eq!(format!("{}", cred), "***");
    }

    #[test]
    fn test_empty_detection() {
        assert!(Credential::new("").is_empty());
        assert!(Credential::new("   ").is_empty());
        assert!(!Credential::new("sk-valid").is_empty());
    }

    #[test]
    fn test_expose_returns_raw_value() {
        let cred = Credential::new("sk-valid");
        assert_eq!(cred.expose(), "sk-valid");
    }
}
