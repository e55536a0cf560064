//! Response-body decoding.
//!
//! A [`Decoder`] turns raw response bytes into a typed record. Decoders are
//! object safe so a client can hold any of them behind one slot; the typed
//! half of the work is delegated to a [`DecodeTarget`], which also reports
//! every payload field the record type does not declare.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("json: unknown field(s) {}", .0.join(", "))]
    UnknownFields(Vec<String>),

    #[error("decoder {0} produced no value")]
    Empty(&'static str),
}

/// Type-erased destination for a decoded payload.
pub trait DecodeTarget {
    /// Converts `value` into the target record. `ignored` is called with the
    /// path of every field present in `value` that the record does not accept.
    fn fill(
        &mut self,
        value: Value,
        ignored: &mut dyn FnMut(String),
    ) -> Result<(), serde_json::Error>;
}

struct Slot<T>(Option<T>);

impl<T: DeserializeOwned> DecodeTarget for Slot<T> {
    fn fill(
        &mut self,
        value: Value,
        ignored: &mut dyn FnMut(String),
    ) -> Result<(), serde_json::Error> {
        let decoded = serde_ignored::deserialize(value, |path| ignored(path.to_string()))?;
        self.0 = Some(decoded);
        Ok(())
    }
}

pub trait Decoder: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn decode(&self, data: &[u8], target: &mut dyn DecodeTarget) -> Result<(), DecodeError>;

    /// True only for the decoder a client is constructed with.
    fn is_default(&self) -> bool {
        false
    }
}

/// Lenient decoder: fields the record does not declare are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDecoder;

impl Decoder for DefaultDecoder {
    fn name(&self) -> &'static str {
        "default"
    }

    fn decode(&self, data: &[u8], target: &mut dyn DecodeTarget) -> Result<(), DecodeError> {
        let value: Value = serde_json::from_slice(data)?;
        target.fill(value, &mut |_| {})?;
        Ok(())
    }

    fn is_default(&self) -> bool {
        true
    }
}

/// Strict decoder: any field the record does not declare fails the decode.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictDecoder;

impl Decoder for StrictDecoder {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn decode(&self, data: &[u8], target: &mut dyn DecodeTarget) -> Result<(), DecodeError> {
        let value: Value = serde_json::from_slice(data)?;
        let mut unknown = Vec::new();
        target.fill(value, &mut |path| unknown.push(path))?;
        if !unknown.is_empty() {
            return Err(DecodeError::UnknownFields(unknown));
        }
        Ok(())
    }
}

/// Decodes `data` into `T` through `decoder`.
pub fn decode_with<T: DeserializeOwned>(
    decoder: &dyn Decoder,
    data: &[u8],
) -> Result<T, DecodeError> {
    let mut slot = Slot::<T>(None);
    decoder.decode(data, &mut slot)?;
    slot.0.ok_or(DecodeError::Empty(decoder.name()))
}
