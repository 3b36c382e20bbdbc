//! Provider-assigned external identifiers.

use crate::IdError;

/// Maximum accepted length for an external identifier, in bytes.
///
/// ARNs cap out at 2048; doubling that leaves room for other providers'
/// handle formats without accepting unbounded input.
pub const MAX_EXTERNAL_ID_LEN: usize = 4096;

/// An opaque handle assigned by the remote provider for a created object.
///
/// Unlike record identifiers, external identifiers are minted by the remote
/// system: there is no `new()`, only validated construction from the string
/// the provider returned. Once recorded against a reconciliation record the
/// value never changes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExternalId(String);

impl ExternalId {
    /// Validates and wraps a provider-returned handle.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if raw.len() > MAX_EXTERNAL_ID_LEN {
            return Err(IdError::TooLong {
                len: raw.len(),
                max: MAX_EXTERNAL_ID_LEN,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ExternalId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for ExternalId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ExternalId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_id_accepts_arn() {
        let arn = "arn:aws:acm-pca:us-east-1:123456789012:certificate-authority/abc";
        let id = ExternalId::new(arn).unwrap();
        assert_eq!(id.as_str(), arn);
    }

    #[test]
    fn test_external_id_rejects_empty() {
        assert!(matches!(ExternalId::new("").unwrap_err(), IdError::Empty));
    }

    #[test]
    fn test_external_id_rejects_oversized() {
        let raw = "x".repeat(MAX_EXTERNAL_ID_LEN + 1);
        assert!(matches!(
            ExternalId::new(raw).unwrap_err(),
            IdError::TooLong { .. }
        ));
    }

    #[test]
    fn test_external_id_json_roundtrip() {
        let id = ExternalId::new("arn:aws:acm:us-east-1:1:certificate/x").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ExternalId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    proptest::proptest! {
        #[test]
        fn prop_external_id_preserves_accepted_input(raw in ".{1,64}") {
            if let Ok(id) = ExternalId::new(raw.clone()) {
                proptest::prop_assert_eq!(id.as_str(), raw);
            }
        }

        #[test]
        fn prop_external_id_parse_matches_new(raw in "[ -~]{1,64}") {
            let direct = ExternalId::new(raw.clone());
            let parsed: Result<ExternalId, _> = raw.parse();
            proptest::prop_assert_eq!(direct, parsed);
        }
    }
}
