// ABOUTME: Base64-encoded secret payload validated where it enters the program.
// ABOUTME: Keeps the encoded form for persistence and the decoded bytes for the store.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Secret payload that failed validation.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("secret data cannot be empty")]
    Empty,

    #[error("secret data is not valid base64: {0}")]
    Invalid(#[from] base64::DecodeError),
}

/// A secret payload. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretData {
    encoded: String,
    decoded: Vec<u8>,
}

impl SecretData {
    pub fn from_base64(encoded: &str) -> Result<Self, DecodeError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(DecodeError::Empty);
        }
        let decoded = STANDARD.decode(encoded)?;
        Ok(Self {
            encoded: encoded.to_string(),
            decoded,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(Self {
            encoded: STANDARD.encode(bytes),
            decoded: bytes.to_vec(),
        })
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.decoded
    }
}

impl std::fmt::Debug for SecretData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretData(<{} bytes>)", self.decoded.len())
    }
}

impl Serialize for SecretData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encoded.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SecretData::from_base64(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_payload() {
        let data = SecretData::from_base64("aGVsbG8=").unwrap();
        assert_eq!(data.as_bytes(), b"hello");
        assert_eq!(data.encoded(), "aGVsbG8=");
    }

    #[test]
    fn rejects_invalid_payload() {
        assert!(matches!(
            SecretData::from_base64("not base64!"),
            Err(DecodeError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(matches!(SecretData::from_base64("  "), Err(DecodeError::Empty)));
    }

    #[test]
    fn debug_does_not_leak_payload() {
        let data = SecretData::from_bytes(b"hunter2").unwrap();
        let shown = format!("{:?}", data);
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains(data.encoded()));
    }
}
