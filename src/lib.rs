//! # abicodec: Ethereum contract ABI v2 codec and Keccak-256
//!
//! Encodes and decodes values according to the Solidity ABI v2 binary
//! layout, plus the Keccak-256 hash used throughout the EVM ecosystem.
//!
//! ## Pipeline
//!
//! - **Parser**: [`parse_schema`] turns a type string (`uint256`,
//!   `(bytes32[],ufixed128x10)`) into a [`TypeNode`] AST.
//! - **Validator**: [`validate`] / [`is_encodable`] decide whether a
//!   [`Value`] fits a type node (range, length, alphabet, structure).
//! - **Encoder**: [`encode`] / [`encode_type`] produce the exact ABI byte
//!   sequence (32-byte slots, head/tail layout for dynamic components).
//! - **Decoder**: [`decode`] / [`decode_type`] turn bytes back into values
//!   with full structural validation; hostile input fails with a structured
//!   error, never a panic or overread.
//!
//! The codec is purely functional and stateless: no shared state, no
//! background work, no logging. Callers bound work by bounding input size.
//!
//! ## Example
//!
//! ```
//! use abicodec::{decode, encode, Value};
//! use num_bigint::BigInt;
//!
//! let data = encode("uint256", &Value::Int(BigInt::from(42))).unwrap();
//! assert_eq!(data.len(), 32);
//! assert_eq!(data[31], 0x2a);
//! assert_eq!(decode("uint256", &data).unwrap(), Value::Int(BigInt::from(42)));
//! ```
//!
//! ## Strict and lenient decoding
//!
//! [`decode`] is strict: non-canonical padding, sloppy sign extension and
//! boolean words other than 0/1 are rejected. [`decode_lenient`] tolerates
//! such padding (encodings produced by non-canonical encoders are common on
//! chain) while still enforcing every length and offset rule.

pub mod ast;
pub mod decode;
pub mod encode;
pub mod error;
pub mod json;
pub mod keccak;
pub mod parser;
pub mod value;

pub use ast::TypeNode;
pub use decode::decode_type;
pub use encode::{encode_type, is_encodable, validate};
pub use error::{
    CodecError, DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind, ParseError,
    ParseErrorKind, Path,
};
pub use keccak::keccak256;
pub use parser::parse_schema;
pub use value::{Address, Decimal, Value};

/// The ABI slot width: every encoding is a sequence of 32-byte words.
pub const WORD_SIZE: usize = 32;

/// Encode `value` under a schema given as a type string.
pub fn encode(schema: &str, value: &Value) -> Result<Vec<u8>, CodecError> {
    Ok(encode_type(&parse_schema(schema)?, value)?)
}

/// Strictly decode `data` under a schema given as a type string.
pub fn decode(schema: &str, data: &[u8]) -> Result<Value, CodecError> {
    Ok(decode_type(&parse_schema(schema)?, data, true)?)
}

/// Like [`decode`], but tolerant of non-canonical padding bits.
pub fn decode_lenient(schema: &str, data: &[u8]) -> Result<Value, CodecError> {
    Ok(decode_type(&parse_schema(schema)?, data, false)?)
}
