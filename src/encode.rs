//! Validate values against type nodes and encode them to ABI v2 bytes.
//!
//! Everything is laid out in 32-byte slots. Static types encode to a fixed
//! number of slots; dynamic types are length-prefixed and right-padded to a
//! slot boundary. Containers with dynamic components use the head/tail
//! scheme: the head holds static payloads inline and one offset word per
//! dynamic component, the tail holds the dynamic payloads, and offsets are
//! measured from the start of the enclosing block.

use byteorder::{BigEndian, ByteOrder};
use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};

use crate::ast::TypeNode;
use crate::error::{EncodeError, EncodeErrorKind};
use crate::value::{Address, Decimal, Value};
use crate::WORD_SIZE;

/// Check that `value` is encodable under `node` without producing bytes.
///
/// Errors carry the component path of the first offending element; length
/// and arity are checked before elements.
pub fn validate(node: &TypeNode, value: &Value) -> Result<(), EncodeError> {
    match node {
        TypeNode::Address => address_from_value(value).map(drop),
        TypeNode::Bool => match value {
            Value::Bool(_) => Ok(()),
            _ => Err(mismatch("bool")),
        },
        TypeNode::Integer { signed, bits } => match value {
            Value::Int(i) => check_int_range(i, *signed, *bits),
            // booleans are deliberately not integers
            _ => Err(mismatch("integer")),
        },
        TypeNode::Fixed { signed, bits, precision } => match value {
            Value::Decimal(d) => scaled_fixed(d, *signed, *bits, *precision).map(drop),
            _ => Err(mismatch("decimal")),
        },
        TypeNode::Bytes(m) => match value {
            Value::Bytes(b) => check_len(*m as usize, b.len()),
            _ => Err(mismatch("bytes")),
        },
        // a Rust `String` is UTF-8 by construction; lone surrogates cannot
        // reach this point
        TypeNode::String => match value {
            Value::String(_) => Ok(()),
            _ => Err(mismatch("string")),
        },
        TypeNode::DynamicBytes => match value {
            Value::Bytes(_) => Ok(()),
            _ => Err(mismatch("bytes")),
        },
        TypeNode::Array(inner, n) => {
            let items = value.as_list().ok_or_else(|| mismatch("list"))?;
            check_len(*n, items.len())?;
            validate_elements(items.iter().map(|item| (inner.as_ref(), item)))
        }
        TypeNode::DynamicArray(inner) => {
            let items = value.as_list().ok_or_else(|| mismatch("list"))?;
            validate_elements(items.iter().map(|item| (inner.as_ref(), item)))
        }
        TypeNode::Tuple(components) => {
            let items = value.as_list().ok_or_else(|| mismatch("list"))?;
            check_len(components.len(), items.len())?;
            validate_elements(components.iter().zip(items))
        }
    }
}

/// Convenience predicate over [`validate`].
pub fn is_encodable(node: &TypeNode, value: &Value) -> bool {
    validate(node, value).is_ok()
}

/// Encode `value` as `node`. Validation happens as encoding recurses, so
/// the error for an invalid element carries the same path [`validate`]
/// would report.
pub fn encode_type(node: &TypeNode, value: &Value) -> Result<Vec<u8>, EncodeError> {
    match node {
        TypeNode::Address => {
            let address = address_from_value(value)?;
            let mut word = [0u8; WORD_SIZE];
            word[12..].copy_from_slice(&address.0);
            Ok(word.to_vec())
        }
        TypeNode::Bool => {
            let b = value.as_bool().ok_or_else(|| mismatch("bool"))?;
            let mut word = [0u8; WORD_SIZE];
            word[WORD_SIZE - 1] = b as u8;
            Ok(word.to_vec())
        }
        TypeNode::Integer { signed, bits } => {
            let i = value.as_int().ok_or_else(|| mismatch("integer"))?;
            check_int_range(i, *signed, *bits)?;
            Ok(int_word(i).to_vec())
        }
        TypeNode::Fixed { signed, bits, precision } => {
            let d = value.as_decimal().ok_or_else(|| mismatch("decimal"))?;
            let scaled = scaled_fixed(d, *signed, *bits, *precision)?;
            Ok(int_word(&scaled).to_vec())
        }
        TypeNode::Bytes(m) => {
            let b = value.as_bytes().ok_or_else(|| mismatch("bytes"))?;
            check_len(*m as usize, b.len())?;
            let mut word = [0u8; WORD_SIZE];
            word[..b.len()].copy_from_slice(b);
            Ok(word.to_vec())
        }
        TypeNode::String => {
            let s = value.as_str().ok_or_else(|| mismatch("string"))?;
            Ok(length_prefixed(s.as_bytes()))
        }
        TypeNode::DynamicBytes => {
            let b = value.as_bytes().ok_or_else(|| mismatch("bytes"))?;
            Ok(length_prefixed(b))
        }
        TypeNode::Array(inner, n) => {
            let items = value.as_list().ok_or_else(|| mismatch("list"))?;
            check_len(*n, items.len())?;
            encode_components(inner_pairs(inner, items))
        }
        TypeNode::DynamicArray(inner) => {
            let items = value.as_list().ok_or_else(|| mismatch("list"))?;
            let mut out = uint_word(items.len()).to_vec();
            out.extend_from_slice(&encode_components(inner_pairs(inner, items))?);
            Ok(out)
        }
        TypeNode::Tuple(components) => {
            let items = value.as_list().ok_or_else(|| mismatch("list"))?;
            check_len(components.len(), items.len())?;
            let pairs: Vec<(&TypeNode, &Value)> = components.iter().zip(items.iter()).collect();
            encode_components(pairs)
        }
    }
}

/// Head/tail encoding of an ordered component list. With no dynamic
/// component this degenerates to plain concatenation. Offsets are measured
/// from the first byte of the returned block.
fn encode_components(components: Vec<(&TypeNode, &Value)>) -> Result<Vec<u8>, EncodeError> {
    let mut payloads = Vec::with_capacity(components.len());
    for (i, (ty, val)) in components.iter().enumerate() {
        payloads.push(encode_type(ty, val).map_err(|e| e.nest(i))?);
    }

    if components.iter().all(|(ty, _)| !ty.is_dynamic()) {
        return Ok(payloads.concat());
    }

    let head_size: usize = components.iter().map(|(ty, _)| ty.head_width()).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();
    let mut offset = head_size;
    for ((ty, _), payload) in components.iter().zip(payloads) {
        if ty.is_dynamic() {
            head.extend_from_slice(&uint_word(offset));
            offset += payload.len();
            tail.extend_from_slice(&payload);
        } else {
            head.extend_from_slice(&payload);
        }
    }
    head.extend_from_slice(&tail);
    Ok(head)
}

fn inner_pairs<'a>(inner: &'a TypeNode, items: &'a [Value]) -> Vec<(&'a TypeNode, &'a Value)> {
    items.iter().map(|item| (inner, item)).collect()
}

fn validate_elements<'a>(
    elements: impl Iterator<Item = (&'a TypeNode, &'a Value)>,
) -> Result<(), EncodeError> {
    for (i, (ty, val)) in elements.enumerate() {
        validate(ty, val).map_err(|e| e.nest(i))?;
    }
    Ok(())
}

fn mismatch(expected: &'static str) -> EncodeError {
    EncodeError::new(EncodeErrorKind::TypeMismatch { expected })
}

fn check_len(expected: usize, actual: usize) -> Result<(), EncodeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(EncodeError::new(EncodeErrorKind::LengthMismatch { expected, actual }))
    }
}

fn address_from_value(value: &Value) -> Result<Address, EncodeError> {
    match value {
        Value::Address(a) => Ok(*a),
        Value::Bytes(b) => {
            let bytes: [u8; 20] = b.as_slice().try_into().map_err(|_| {
                EncodeError::new(EncodeErrorKind::InvalidAddressFormat(format!(
                    "expected 20 bytes, got {}",
                    b.len()
                )))
            })?;
            Ok(Address(bytes))
        }
        Value::String(s) => Address::from_hex(s)
            .map_err(|msg| EncodeError::new(EncodeErrorKind::InvalidAddressFormat(msg))),
        _ => Err(mismatch("address")),
    }
}

/// Inclusive two's-complement bounds for an `bits`-wide integer type.
fn int_bounds(signed: bool, bits: u16) -> (BigInt, BigInt) {
    if signed {
        let half = BigInt::one() << (bits as usize - 1);
        (-&half, half - 1)
    } else {
        (BigInt::zero(), (BigInt::one() << bits as usize) - 1)
    }
}

fn check_int_range(value: &BigInt, signed: bool, bits: u16) -> Result<(), EncodeError> {
    let (lo, hi) = int_bounds(signed, bits);
    if *value < lo || *value > hi {
        return Err(EncodeError::new(EncodeErrorKind::ValueOutOfRange));
    }
    Ok(())
}

/// The scaled integer `value * 10^precision`, checked for exactness and
/// range.
fn scaled_fixed(
    value: &Decimal,
    signed: bool,
    bits: u16,
    precision: u8,
) -> Result<BigInt, EncodeError> {
    let scaled = value
        .rescale(precision as u32)
        .ok_or_else(|| EncodeError::new(EncodeErrorKind::FractionalLoss))?;
    check_int_range(&scaled, signed, bits)?;
    Ok(scaled)
}

/// Two's-complement big-endian word: left-padded with `0x00`, or with
/// `0xff` for negative values. The caller has already range-checked.
fn int_word(value: &BigInt) -> [u8; WORD_SIZE] {
    let fill = if value.sign() == Sign::Minus { 0xff } else { 0x00 };
    let mut word = [fill; WORD_SIZE];
    let bytes = value.to_signed_bytes_be();
    // an in-range value needs at most 33 bytes, the 33rd being sign filler
    let start = bytes.len().saturating_sub(WORD_SIZE);
    let src = &bytes[start..];
    word[WORD_SIZE - src.len()..].copy_from_slice(src);
    word
}

/// Unsigned length/offset word.
fn uint_word(n: usize) -> [u8; WORD_SIZE] {
    let mut word = [0u8; WORD_SIZE];
    BigEndian::write_u64(&mut word[WORD_SIZE - 8..], n as u64);
    word
}

/// Length word followed by the payload, right-padded with zeros to a slot
/// boundary.
fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let padding = (WORD_SIZE - bytes.len() % WORD_SIZE) % WORD_SIZE;
    let mut out = Vec::with_capacity(WORD_SIZE + bytes.len() + padding);
    out.extend_from_slice(&uint_word(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(out.len() + padding, 0);
    out
}
