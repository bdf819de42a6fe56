//! Byte-level persistence for fitted vocabularies.
//!
//! Fitted state is reduced to a plain parameter struct (strings, counts and
//! index maps) before it touches storage, so the on-disk form never depends on
//! in-memory lookup structures such as cached column offsets.

use std::error::Error;

/// A parameter representation that can be turned into bytes and back.
///
/// Implementors should contain only plain data (`Vec<String>`, maps, counts).
/// `from_bytes(to_bytes(x))` must reproduce `x` exactly.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Answers {
        labels: Vec<String>,
        widths: Vec<usize>,
    }

    #[test]
    fn test_bytes_roundtrip() {
        let params = Answers {
            labels: vec!["yes".to_string(), "no".to_string()],
            widths: vec![2, 0],
        };
        let bytes = params.to_bytes().unwrap();
        let restored = Answers::from_bytes(&bytes).unwrap();
        assert_eq!(restored, params);
    }

    #[test]
    fn test_truncated_bytes_fail() {
        let params = Answers {
            labels: vec!["agree".to_string()],
            widths: vec![1],
        };
        let bytes = params.to_bytes().unwrap();
        assert!(Answers::from_bytes(&bytes[..bytes.len() - 3]).is_err());
    }
}
