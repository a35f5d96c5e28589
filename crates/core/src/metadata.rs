//! Opaque artifact metadata and its serialized form.
//!
//! Absence is never stored: encoding substitutes the empty value, and the
//! decoder treats a missing byte sequence as a defect upstream rather than
//! as empty metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key/value metadata attached to datasets and artifacts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub key_map: BTreeMap<String, String>,
}

impl Metadata {
    /// Build metadata from key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key_map: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Serialize metadata, substituting the empty value when none is given.
pub fn encode_metadata(metadata: Option<&Metadata>) -> crate::Result<Vec<u8>> {
    let empty = Metadata::default();
    let metadata = metadata.unwrap_or(&empty);
    serde_json::to_vec(metadata).map_err(|e| crate::Error::MetadataEncode(e.to_string()))
}

/// Deserialize metadata previously produced by [`encode_metadata`].
pub fn decode_metadata(serialized: Option<&[u8]>) -> crate::Result<Metadata> {
    let bytes = serialized.ok_or(crate::Error::MetadataAbsent)?;
    serde_json::from_slice(bytes).map_err(|e| crate::Error::MetadataDecode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_encode_absent_is_canonical_empty() {
        let absent = encode_metadata(None).unwrap();
        let empty = encode_metadata(Some(&Metadata::default())).unwrap();
        assert_eq!(absent, empty);
        assert!(!absent.is_empty());
    }

    #[test]
    fn test_roundtrip_absent_decodes_to_empty() {
        let encoded = encode_metadata(None).unwrap();
        let decoded = decode_metadata(Some(&encoded)).unwrap();
        assert_eq!(decoded, Metadata::default());
    }

    #[test]
    fn test_roundtrip_with_values() {
        let metadata = Metadata::from_pairs([("owner", "ml-team"), ("format", "parquet")]);
        let encoded = encode_metadata(Some(&metadata)).unwrap();
        assert_eq!(decode_metadata(Some(&encoded)).unwrap(), metadata);
    }

    #[test]
    fn test_decode_absent_is_invalid_state() {
        assert!(matches!(decode_metadata(None), Err(Error::MetadataAbsent)));
    }

    #[test]
    fn test_decode_malformed_bytes() {
        let result = decode_metadata(Some(b"\x00not json"));
        assert!(matches!(result, Err(Error::MetadataDecode(_))));
    }

    #[test]
    fn test_decode_bare_object_is_empty() {
        assert_eq!(decode_metadata(Some(b"{}")).unwrap(), Metadata::default());
    }
}
