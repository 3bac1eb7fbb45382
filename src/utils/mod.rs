pub mod base64url;

pub use base64url::{decode, decode_bytes, decode_object, encode, encode_bytes, encode_json};
