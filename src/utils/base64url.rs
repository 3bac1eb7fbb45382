//! Base64URL encoding/decoding per RFC 4648
//!
//! Encoding never emits `=` padding. Decoding restores the padding before
//! handing the input to the `base64` engine, so both padded and unpadded
//! segments are accepted.

use crate::error::{Error, Result};
use base64::{
    Engine,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Encode bytes to an unpadded Base64URL string
pub fn encode_bytes(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode a string to Base64URL
pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Serialize a value to compact JSON and encode it as a token segment
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value).map_err(|e| Error::FormatEncodeJson(e.to_string()))?;
    Ok(encode_bytes(&json))
}

/// Decode a Base64URL string to bytes
pub fn decode_bytes(input: &str) -> Result<Vec<u8>> {
    decode_segment_bytes(input, "input")
}

/// Decode a Base64URL string to a UTF-8 string
pub fn decode(input: &str) -> Result<String> {
    decode_segment_string(input, "input")
}

/// Decode a token segment into a JSON object
///
/// `segment` names the segment in error messages (e.g. `"header"`).
pub fn decode_object(input: &str, segment: &str) -> Result<Map<String, Value>> {
    let text = decode_segment_string(input, segment)?;
    let value: Value = serde_json::from_str(&text).map_err(|e| Error::FormatInvalidJson {
        segment: segment.into(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::FormatNotObject {
            segment: segment.into(),
            found: json_kind(&other).into(),
        }),
    }
}

fn decode_segment_bytes(input: &str, segment: &str) -> Result<Vec<u8>> {
    let mut padded = String::with_capacity(input.len() + 3);
    padded.push_str(input);
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|e| Error::FormatInvalidBase64 {
            segment: segment.into(),
            reason: e.to_string(),
        })
}

fn decode_segment_string(input: &str, segment: &str) -> Result<String> {
    decode_segment_bytes(input, segment).and_then(|bytes| {
        String::from_utf8(bytes).map_err(|e| Error::FormatInvalidUtf8 {
            segment: segment.into(),
            reason: e.to_string(),
        })
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
