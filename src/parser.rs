//! Parse ABI v2 type strings into the type AST using PEST.
//!
//! The grammar lives in `grammar.pest`. The parser enforces every AST
//! invariant: widths, precisions and array sizes are range-checked here so
//! downstream visitors never see an out-of-range node.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

use crate::ast::TypeNode;
use crate::error::{ParseError, ParseErrorKind};

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct SchemaParser;

/// Maximum bracket/parenthesis nesting. Deeper type strings are rejected
/// before the recursive descent runs, bounding stack use for parsing and
/// for every later visitor (their recursion follows the parsed AST).
const MAX_NESTING: usize = 32;

/// Parse an ABI type string (e.g. `uint256`, `(bytes32[],ufixed128x10)`).
///
/// Pure and idempotent: the same string always yields a structurally equal
/// node. The widthless synonyms `uint`, `int`, `fixed` and `ufixed` are
/// rejected; the ABI canonical form spells widths out.
pub fn parse_schema(typestr: &str) -> Result<TypeNode, ParseError> {
    check_nesting(typestr)?;
    let mut pairs = SchemaParser::parse(Rule::type_string, typestr)
        .map_err(|_| classify_failure(typestr))?;
    let root = pairs.next().ok_or_else(|| classify_failure(typestr))?;
    let ty = root
        .into_inner()
        .find(|p| p.as_rule() == Rule::ty)
        .ok_or_else(|| classify_failure(typestr))?;
    build_type(ty, typestr, 0)
}

fn check_nesting(typestr: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for byte in typestr.bytes() {
        match byte {
            b'(' | b'[' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidTypeString,
                        typestr,
                        format!("nesting deeper than {} levels", MAX_NESTING),
                    ));
                }
            }
            b')' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// A bare word that failed to parse is an unknown type name; anything with
/// structure characters (or whitespace) is a malformed type string.
fn classify_failure(typestr: &str) -> ParseError {
    if !typestr.is_empty() && typestr.bytes().all(|b| b.is_ascii_alphanumeric()) {
        ParseError::new(ParseErrorKind::UnknownType, typestr, "unknown ABI type")
    } else {
        ParseError::new(
            ParseErrorKind::InvalidTypeString,
            typestr,
            "type string is not parseable",
        )
    }
}

/// `depth` counts AST levels, not just source brackets: every array suffix
/// deepens the tree without nesting in the text, so the textual guard alone
/// would not bound visitor recursion.
fn build_type(pair: Pair<Rule>, typestr: &str, depth: usize) -> Result<TypeNode, ParseError> {
    let mut inner = pair.into_inner();
    let base = inner
        .next()
        .ok_or_else(|| classify_failure(typestr))?;
    let mut node = build_base(base, typestr, depth)?;

    // Suffixes fold left-to-right: uint8[2][3] is a 3-array of 2-arrays.
    let mut level = depth;
    for suffix in inner {
        level += 1;
        if level > MAX_NESTING {
            return Err(ParseError::new(
                ParseErrorKind::InvalidTypeString,
                typestr,
                format!("nesting deeper than {} levels", MAX_NESTING),
            ));
        }
        node = match suffix.into_inner().next() {
            Some(digits) => {
                let size: usize = digits.as_str().parse().map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::ParameterOutOfRange,
                        typestr,
                        format!("'{}' is not a valid array size", digits.as_str()),
                    )
                })?;
                if size == 0 {
                    return Err(ParseError::new(
                        ParseErrorKind::ParameterOutOfRange,
                        typestr,
                        "'0' is not a valid array size",
                    ));
                }
                TypeNode::Array(Box::new(node), size)
            }
            None => TypeNode::DynamicArray(Box::new(node)),
        };
    }
    Ok(node)
}

fn build_base(pair: Pair<Rule>, typestr: &str, depth: usize) -> Result<TypeNode, ParseError> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| classify_failure(typestr))?;
    match inner.as_rule() {
        Rule::tuple => {
            let components = inner
                .into_inner()
                .map(|component| build_type(component, typestr, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeNode::Tuple(components))
        }
        Rule::elementary => build_elementary(inner, typestr),
        _ => Err(classify_failure(typestr)),
    }
}

fn build_elementary(pair: Pair<Rule>, typestr: &str) -> Result<TypeNode, ParseError> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| classify_failure(typestr))?;
    match inner.as_rule() {
        Rule::address_ty => Ok(TypeNode::Address),
        Rule::bool_ty => Ok(TypeNode::Bool),
        Rule::string_ty => Ok(TypeNode::String),
        Rule::bytes_ty => Ok(TypeNode::DynamicBytes),
        Rule::bytes_fixed_ty => {
            let digits = first_text(inner);
            let width = parse_number(&digits, typestr, "byte array width")?;
            if !(1..=32).contains(&width) {
                return Err(param_error(typestr, &digits, "byte array width"));
            }
            Ok(TypeNode::Bytes(width as u8))
        }
        Rule::int_ty => {
            let mut parts = inner.into_inner();
            let signed = !parts
                .next()
                .is_some_and(|prefix| prefix.as_str().starts_with('u'));
            let digits = parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
            let bits = parse_number(&digits, typestr, "integer width")?;
            if !valid_width(bits) {
                return Err(param_error(typestr, &digits, "integer width"));
            }
            Ok(TypeNode::Integer { signed, bits: bits as u16 })
        }
        Rule::fixed_ty => {
            let mut parts = inner.into_inner();
            let signed = !parts
                .next()
                .is_some_and(|prefix| prefix.as_str().starts_with('u'));
            let bits_digits = parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
            let precision_digits =
                parts.next().map(|p| p.as_str().to_string()).unwrap_or_default();
            let bits = parse_number(&bits_digits, typestr, "fixed point width")?;
            if !valid_width(bits) {
                return Err(param_error(typestr, &bits_digits, "fixed point width"));
            }
            let precision = parse_number(&precision_digits, typestr, "fixed point precision")?;
            if !(1..=80).contains(&precision) {
                return Err(param_error(typestr, &precision_digits, "fixed point precision"));
            }
            Ok(TypeNode::Fixed { signed, bits: bits as u16, precision: precision as u8 })
        }
        _ => Err(classify_failure(typestr)),
    }
}

fn first_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

fn valid_width(bits: u32) -> bool {
    (8..=256).contains(&bits) && bits % 8 == 0
}

fn parse_number(digits: &str, typestr: &str, what: &str) -> Result<u32, ParseError> {
    digits
        .parse()
        .map_err(|_| param_error(typestr, digits, what))
}

fn param_error(typestr: &str, digits: &str, what: &str) -> ParseError {
    ParseError::new(
        ParseErrorKind::ParameterOutOfRange,
        typestr,
        format!("'{}' is not a valid {}", digits, what),
    )
}
