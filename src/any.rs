//! Polymorphic content envelope
//!
//! An [`Any`] carries a type URL and the encoded bytes of a message whose
//! concrete type is resolved by whoever reads it. The migration engine never
//! looks inside: envelopes are copied byte for byte from the legacy record
//! into the new one.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::codec::Codec;
use crate::error::CodecError;

/// Messages that can be wrapped in an [`Any`]
pub trait TypeUrl {
    const TYPE_URL: &'static str;
}

/// Type-tagged opaque payload
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Any {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Any {
    pub fn new(type_url: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    /// Encode `msg` with `codec` and tag it with its type URL
    pub fn pack<M, C>(msg: &M, codec: &C) -> Result<Self, CodecError>
    where
        M: TypeUrl + Serialize,
        C: Codec,
    {
        Ok(Self::new(M::TYPE_URL, codec.encode(msg)?))
    }

    /// Decode the payload as `M`, refusing envelopes tagged with another type
    pub fn unpack<M, C>(&self, codec: &C) -> Result<M, CodecError>
    where
        M: TypeUrl + DeserializeOwned,
        C: Codec,
    {
        if !self.is::<M>() {
            return Err(CodecError::Invalid(format!(
                "envelope holds {}, not {}",
                self.type_url,
                M::TYPE_URL
            )));
        }
        codec.decode(&self.value)
    }

    pub fn is<M: TypeUrl>(&self) -> bool {
        self.type_url == M::TYPE_URL
    }
}
