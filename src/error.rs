//! Error types for the parser, encoder, and decoder.
//!
//! Encode and decode errors carry a component path: the index sequence of
//! the tuple/array frames between the top-level value and the offending
//! element. Each frame prepends its index as the error propagates outward,
//! so a failure three levels deep renders as e.g. `value[2][5][0]`.

use std::fmt;

use thiserror::Error;

/// Why a type string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A word that looks like an elementary type but is not one
    /// (includes the widthless synonyms `uint`, `int`, `fixed`, `ufixed`).
    UnknownType,
    /// Structurally malformed input: unbalanced brackets, whitespace,
    /// trailing characters, or nesting beyond the supported depth.
    InvalidTypeString,
    /// A width, precision, or array size outside its allowed range.
    ParameterOutOfRange,
}

/// Type-string parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error at {typestr:?}: {msg}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// The type string (or component substring) that failed.
    pub typestr: String,
    pub msg: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, typestr: &str, msg: impl Into<String>) -> Self {
        ParseError { kind, typestr: typestr.to_string(), msg: msg.into() }
    }
}

/// Component index sequence from the top-level value down to the element
/// an error was raised for. Empty for top-level failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    fn push_front(&mut self, index: usize) {
        self.0.insert(0, index);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value")?;
        for index in &self.0 {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeErrorKind {
    #[error("value is outside the type bounds")]
    ValueOutOfRange,
    #[error("expected {expected} item(s), got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("invalid address: {0}")]
    InvalidAddressFormat(String),
    #[error("value is not valid UTF-8")]
    InvalidUtf8,
    #[error("value has more fractional digits than the type precision")]
    FractionalLoss,
    #[error("expected a {expected} value")]
    TypeMismatch { expected: &'static str },
}

/// A value (or an element of it) cannot be encoded under the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot encode {path}: {kind}")]
pub struct EncodeError {
    pub kind: EncodeErrorKind,
    pub path: Path,
}

impl EncodeError {
    pub(crate) fn new(kind: EncodeErrorKind) -> Self {
        EncodeError { kind, path: Path::default() }
    }

    /// Prepend a tuple/array frame index as the error propagates outward.
    pub(crate) fn nest(mut self, index: usize) -> Self {
        self.path.push_front(index);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("need {needed} byte(s), only {available} available")]
    InsufficientData { needed: usize, available: usize },
    #[error("offset or length word outside the enclosing block")]
    InvalidOffset,
    #[error("padding bytes are not canonical")]
    NonCanonicalPadding,
    #[error("boolean word is not 0 or 1")]
    InvalidBool,
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
}

/// A byte buffer (or a region of it) cannot be decoded under the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {path}: {kind}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub path: Path,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind) -> Self {
        DecodeError { kind, path: Path::default() }
    }

    pub(crate) fn nest(mut self, index: usize) -> Self {
        self.path.push_front(index);
        self
    }
}

/// Umbrella error for the schema-string entry points, which can fail on the
/// type string itself or on the value/buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
