//! Binary and JSON codecs for stored values
//!
//! Records under the proposal prefix are MessagePack maps keyed by field
//! name, the same encoding the metadata database uses. Parameter values are
//! JSON so they stay readable from a raw store dump.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CodecError;

/// Marshal/unmarshal contract for stored values
///
/// The schema is the Rust type: decoding with `legacy::Proposal` reads the
/// legacy shape, encoding a `types::Proposal` writes the current one.
pub trait Codec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// MessagePack codec writing structs as field-name maps
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

impl Codec for MsgPackCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    fn name(&self) -> &'static str {
        "msgpack"
    }
}

/// JSON codec used by the parameter namespace
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Sample {
        id: u64,
        label: String,
    }

    #[test]
    fn test_msgpack_uses_field_names() {
        let bytes = MsgPackCodec
            .encode(&Sample { id: 7, label: "x".to_string() })
            .unwrap();
        // fixmap with two entries
        assert_eq!(bytes[0], 0x82);
        let decoded: Sample = MsgPackCodec.decode(&bytes).unwrap();
        assert_eq!(decoded.id, 7);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<Sample, _> = MsgPackCodec.decode(&[0xc1, 0x00]);
        assert!(result.is_err());

        let result: Result<Sample, _> = JsonCodec.decode(b"{\"id\": \"seven\"}");
        assert!(matches!(result, Err(CodecError::Json(_))));
    }
}
