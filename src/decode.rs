//! Decode ABI v2 byte buffers back into values.
//!
//! The decoder is the adversarial half of the codec: every read is bounds
//! checked, offsets and length words are validated before they are trusted,
//! and allocations are capped by the remaining buffer rather than by the
//! declared length. A hostile buffer fails with a structured error; it
//! never panics or overreads.
//!
//! Strict mode additionally requires the encoding to be canonical: zero
//! padding, exact sign extension, boolean words of 0/1, and no bytes beyond
//! the value's extent at the top level. Lenient mode tolerates arbitrary
//! padding bits (common in encodings found on chain) but still enforces
//! every length and offset rule.

use byteorder::{BigEndian, ByteOrder};
use num_bigint::{BigInt, Sign};

use crate::ast::TypeNode;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::value::{Address, Decimal, Value};
use crate::WORD_SIZE;

/// Decode `data` as `node`. `strict` selects canonical-encoding checks.
pub fn decode_type(node: &TypeNode, data: &[u8], strict: bool) -> Result<Value, DecodeError> {
    let (value, extent) = decode_value(node, data, strict)?;
    if strict && extent != data.len() {
        // trailing bytes beyond the padded extent of the value
        return Err(DecodeError::new(DecodeErrorKind::NonCanonicalPadding));
    }
    Ok(value)
}

/// Decode one value from the front of `block`; returns the value and the
/// padded byte extent it occupies. Extents let an enclosing frame track how
/// far its tails reach.
fn decode_value(
    node: &TypeNode,
    block: &[u8],
    strict: bool,
) -> Result<(Value, usize), DecodeError> {
    match node {
        TypeNode::Address => {
            let word = word_at(block)?;
            if strict && word[..12].iter().any(|&b| b != 0) {
                return Err(DecodeError::new(DecodeErrorKind::NonCanonicalPadding));
            }
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&word[12..]);
            Ok((Value::Address(Address(bytes)), WORD_SIZE))
        }
        TypeNode::Bool => {
            let word = word_at(block)?;
            if strict && (word[..31].iter().any(|&b| b != 0) || word[31] > 1) {
                return Err(DecodeError::new(DecodeErrorKind::InvalidBool));
            }
            let truthy = word.iter().any(|&b| b != 0);
            Ok((Value::Bool(truthy), WORD_SIZE))
        }
        TypeNode::Integer { signed, bits } => {
            let word = word_at(block)?;
            let i = decode_int(word, *signed, *bits, strict)?;
            Ok((Value::Int(i), WORD_SIZE))
        }
        TypeNode::Fixed { signed, bits, precision } => {
            let word = word_at(block)?;
            let i = decode_int(word, *signed, *bits, strict)?;
            Ok((Value::Decimal(Decimal::new(i, *precision as u32)), WORD_SIZE))
        }
        TypeNode::Bytes(m) => {
            let word = word_at(block)?;
            let m = *m as usize;
            if strict && word[m..].iter().any(|&b| b != 0) {
                return Err(DecodeError::new(DecodeErrorKind::NonCanonicalPadding));
            }
            Ok((Value::Bytes(word[..m].to_vec()), WORD_SIZE))
        }
        TypeNode::String => {
            let (bytes, extent) = length_prefixed(block, strict)?;
            let s = String::from_utf8(bytes)
                .map_err(|_| DecodeError::new(DecodeErrorKind::InvalidUtf8))?;
            Ok((Value::String(s), extent))
        }
        TypeNode::DynamicBytes => {
            let (bytes, extent) = length_prefixed(block, strict)?;
            Ok((Value::Bytes(bytes), extent))
        }
        TypeNode::Array(inner, n) if !inner.is_dynamic() => {
            let width = inner.head_width();
            let total = node.head_width();
            if block.len() < total {
                return Err(insufficient(total, block.len()));
            }
            let mut values = Vec::with_capacity(*n);
            for i in 0..*n {
                let slot = &block[i * width..(i + 1) * width];
                let (v, _) = decode_value(inner, slot, strict).map_err(|e| e.nest(i))?;
                values.push(v);
            }
            Ok((Value::List(values), total))
        }
        TypeNode::Array(inner, n) => {
            // dynamic elements: one offset word each in the head
            let head = (*n as u64).saturating_mul(WORD_SIZE as u64);
            if head > block.len() as u64 {
                return Err(insufficient(
                    usize::try_from(head).unwrap_or(usize::MAX),
                    block.len(),
                ));
            }
            let elements: Vec<&TypeNode> = std::iter::repeat(inner.as_ref()).take(*n).collect();
            let (values, extent) = decode_block(&elements, block, strict)?;
            Ok((Value::List(values), extent))
        }
        TypeNode::DynamicArray(inner) => {
            let len64 = word_to_u64(word_at(block)?)?;
            let body = &block[WORD_SIZE..];
            // every element occupies at least its head width, so an absurd
            // declared length fails here before any allocation; the width is
            // floored at one byte so zero-width elements (empty tuples)
            // cannot unbound the length
            let per_element = inner.head_width().max(1) as u64;
            if len64.saturating_mul(per_element) > body.len() as u64 {
                return Err(insufficient(
                    usize::try_from(len64.saturating_mul(per_element)).unwrap_or(usize::MAX),
                    body.len(),
                ));
            }
            let n = len64 as usize;
            let elements: Vec<&TypeNode> = std::iter::repeat(inner.as_ref()).take(n).collect();
            let (values, extent) = decode_block(&elements, body, strict)?;
            Ok((Value::List(values), WORD_SIZE + extent))
        }
        TypeNode::Tuple(components) => {
            let elements: Vec<&TypeNode> = components.iter().collect();
            let (values, extent) = decode_block(&elements, block, strict)?;
            Ok((Value::List(values), extent))
        }
    }
}

/// Decode a head/tail block of ordered components.
///
/// Static components are read inline from the head; each dynamic component
/// contributes a 32-byte offset word, validated to land inside the block at
/// or after the head. Duplicate or decreasing offsets are permitted (the
/// format does not forbid them). The returned extent is the furthest byte
/// any component reached.
fn decode_block(
    elements: &[&TypeNode],
    block: &[u8],
    strict: bool,
) -> Result<(Vec<Value>, usize), DecodeError> {
    let head_size = elements
        .iter()
        .fold(0usize, |acc, ty| acc.saturating_add(ty.head_width()));
    if block.len() < head_size {
        return Err(insufficient(head_size, block.len()));
    }

    let mut values = Vec::with_capacity(elements.len());
    let mut pos = 0usize;
    let mut extent = head_size;
    for (i, ty) in elements.iter().enumerate() {
        let width = ty.head_width();
        if ty.is_dynamic() {
            let word = &block[pos..pos + WORD_SIZE];
            let offset = word_to_u64(word).map_err(|e| e.nest(i))?;
            if offset < head_size as u64 || offset >= block.len() as u64 {
                return Err(DecodeError::new(DecodeErrorKind::InvalidOffset).nest(i));
            }
            let offset = offset as usize;
            let (v, ext) = decode_value(ty, &block[offset..], strict).map_err(|e| e.nest(i))?;
            extent = extent.max(offset + ext);
            values.push(v);
        } else {
            let slot = &block[pos..pos + width];
            let (v, _) = decode_value(ty, slot, strict).map_err(|e| e.nest(i))?;
            values.push(v);
        }
        pos += width;
    }
    Ok((values, extent))
}

/// Length-prefixed payload (string / dynamic bytes): length word, `n`
/// payload bytes, zero padding to a slot boundary.
fn length_prefixed(block: &[u8], strict: bool) -> Result<(Vec<u8>, usize), DecodeError> {
    let len64 = word_to_u64(word_at(block)?)?;
    let padded = len64.div_ceil(WORD_SIZE as u64) * WORD_SIZE as u64;
    let total = WORD_SIZE as u64 + padded;
    if total > block.len() as u64 {
        return Err(insufficient(
            usize::try_from(total).unwrap_or(usize::MAX),
            block.len(),
        ));
    }
    let n = len64 as usize;
    let bytes = block[WORD_SIZE..WORD_SIZE + n].to_vec();
    if strict
        && block[WORD_SIZE + n..WORD_SIZE + padded as usize]
            .iter()
            .any(|&b| b != 0)
    {
        return Err(DecodeError::new(DecodeErrorKind::NonCanonicalPadding));
    }
    Ok((bytes, (WORD_SIZE as u64 + padded) as usize))
}

/// Two's-complement word decode. Strict mode requires the padding bytes
/// above the type's natural width to match the sign-extension byte; lenient
/// mode truncates to the low `bits`.
fn decode_int(word: &[u8], signed: bool, bits: u16, strict: bool) -> Result<BigInt, DecodeError> {
    let split = WORD_SIZE - (bits / 8) as usize;
    if signed {
        let sign_byte = if word[split] & 0x80 != 0 { 0xff } else { 0x00 };
        if strict && word[..split].iter().any(|&b| b != sign_byte) {
            return Err(DecodeError::new(DecodeErrorKind::NonCanonicalPadding));
        }
        Ok(BigInt::from_signed_bytes_be(&word[split..]))
    } else {
        if strict && word[..split].iter().any(|&b| b != 0) {
            return Err(DecodeError::new(DecodeErrorKind::NonCanonicalPadding));
        }
        Ok(BigInt::from_bytes_be(Sign::Plus, &word[split..]))
    }
}

/// The first 32-byte slot of `block`.
fn word_at(block: &[u8]) -> Result<&[u8], DecodeError> {
    if block.len() < WORD_SIZE {
        return Err(insufficient(WORD_SIZE, block.len()));
    }
    Ok(&block[..WORD_SIZE])
}

/// A length or offset word as a native size. The word must fit in 63 bits:
/// anything larger cannot address a real buffer and is rejected before any
/// arithmetic or allocation happens.
fn word_to_u64(word: &[u8]) -> Result<u64, DecodeError> {
    if word[..WORD_SIZE - 8].iter().any(|&b| b != 0) {
        return Err(DecodeError::new(DecodeErrorKind::InvalidOffset));
    }
    let value = BigEndian::read_u64(&word[WORD_SIZE - 8..]);
    if value > i64::MAX as u64 {
        return Err(DecodeError::new(DecodeErrorKind::InvalidOffset));
    }
    Ok(value)
}

fn insufficient(needed: usize, available: usize) -> DecodeError {
    DecodeError::new(DecodeErrorKind::InsufficientData { needed, available })
}
