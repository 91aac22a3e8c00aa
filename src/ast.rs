//! Abstract syntax tree for ABI v2 type strings.

use std::fmt;

/// An ABI v2 type. The variant set is closed: the ABI type space does not
/// grow, so visitors (validator, encoder, decoder) match exhaustively.
///
/// Equality is structural; nodes are pure value data and freely shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    Address,
    Bool,
    /// `intN` / `uintN` with N a multiple of 8 in `[8, 256]`.
    Integer { signed: bool, bits: u16 },
    /// `fixedMxN` / `ufixedMxN` with M a multiple of 8 in `[8, 256]` and
    /// N in `[1, 80]`.
    Fixed { signed: bool, bits: u16, precision: u8 },
    /// `bytesM` with M in `[1, 32]`.
    Bytes(u8),
    String,
    /// `bytes` without a width.
    DynamicBytes,
    /// `T[n]` with n >= 1.
    Array(Box<TypeNode>, usize),
    /// `T[]`.
    DynamicArray(Box<TypeNode>),
    /// `(T1,...,Tk)`; the empty tuple `()` is representable.
    Tuple(Vec<TypeNode>),
}

impl TypeNode {
    /// Whether the encoded width of this type depends on the value.
    ///
    /// Dynamic types are stored in the tail of the enclosing head/tail block
    /// with a 32-byte offset in the head; static types are stored inline.
    pub fn is_dynamic(&self) -> bool {
        match self {
            TypeNode::String | TypeNode::DynamicBytes | TypeNode::DynamicArray(_) => true,
            TypeNode::Array(inner, _) => inner.is_dynamic(),
            TypeNode::Tuple(components) => components.iter().any(TypeNode::is_dynamic),
            _ => false,
        }
    }

    /// Bytes this type occupies in the head region of a head/tail block:
    /// 32 for any dynamic type (the offset word), the full static width
    /// otherwise.
    pub fn head_width(&self) -> usize {
        match self {
            // saturating: a parsed size can exceed what any buffer holds,
            // and decode bounds-checks against the saturated width
            TypeNode::Array(inner, n) if !self.is_dynamic() => {
                n.saturating_mul(inner.head_width())
            }
            TypeNode::Tuple(components) if !self.is_dynamic() => components
                .iter()
                .fold(0usize, |acc, c| acc.saturating_add(c.head_width())),
            _ => 32,
        }
    }
}

/// Formats the canonical ABI type string. Parsing the output yields a
/// structurally equal node.
impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Address => f.write_str("address"),
            TypeNode::Bool => f.write_str("bool"),
            TypeNode::Integer { signed, bits } => {
                write!(f, "{}int{}", if *signed { "" } else { "u" }, bits)
            }
            TypeNode::Fixed { signed, bits, precision } => {
                write!(f, "{}fixed{}x{}", if *signed { "" } else { "u" }, bits, precision)
            }
            TypeNode::Bytes(m) => write!(f, "bytes{}", m),
            TypeNode::String => f.write_str("string"),
            TypeNode::DynamicBytes => f.write_str("bytes"),
            TypeNode::Array(inner, n) => write!(f, "{}[{}]", inner, n),
            TypeNode::DynamicArray(inner) => write!(f, "{}[]", inner),
            TypeNode::Tuple(components) => {
                f.write_str("(")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", component)?;
                }
                f.write_str(")")
            }
        }
    }
}
