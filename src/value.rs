//! Runtime values for encoding/decoding (codec representation).
//!
//! Integers are arbitrary-precision ([`num_bigint::BigInt`]); fixed-point
//! values are exact decimals (`mantissa / 10^scale`). No floating point is
//! used anywhere in the codec.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};
use thiserror::Error;

use crate::keccak::keccak256;

/// A 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Parse `0x` + 40 hex chars, case-insensitive. Length is checked before
    /// the alphabet; the error message names the first failed check.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        if s.len() != 42 {
            return Err(format!("expected 42 characters, got {}", s.len()));
        }
        if !s.starts_with("0x") {
            return Err("missing 0x prefix".to_string());
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(&s[2..], &mut bytes)
            .map_err(|_| "contains non-hexadecimal characters".to_string())?;
        Ok(Address(bytes))
    }

    /// EIP-55 mixed-case form. The codec itself always emits lowercase;
    /// checksumming is opt-in for callers.
    pub fn to_checksum(&self) -> String {
        let hexaddr = hex::encode(self.0);
        let digest = keccak256(hexaddr.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, ch) in hexaddr.chars().enumerate() {
            let nibble = if i % 2 == 0 { digest[i / 2] >> 4 } else { digest[i / 2] & 0x0f };
            if nibble >= 8 {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

/// Lowercase `0x` hex, the canonical decode output form.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal literal")]
pub struct ParseDecimalError;

/// An exact decimal: `mantissa / 10^scale`.
///
/// Fixed-point types need exact arithmetic up to 80 fractional digits, well
/// past any binary float. Equality compares values, not representations:
/// `1.50` equals `1.5`.
#[derive(Debug, Clone)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

/// Exponent guard for parsed literals; keeps `10^scale` allocations sane.
const MAX_DECIMAL_EXP: i64 = 10_000;

impl Decimal {
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Decimal { mantissa, scale }
    }

    pub fn from_int(value: BigInt) -> Self {
        Decimal { mantissa: value, scale: 0 }
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// The value scaled by `10^precision`, iff that is an integer.
    /// `None` means fractional digits would be lost.
    pub fn rescale(&self, precision: u32) -> Option<BigInt> {
        if precision >= self.scale {
            Some(&self.mantissa * pow10(precision - self.scale))
        } else {
            let divisor = pow10(self.scale - precision);
            let quotient = &self.mantissa / &divisor;
            let remainder = &self.mantissa % &divisor;
            remainder.is_zero().then(|| quotient)
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Accepts `[+-]digits[.digits][eE[+-]digits]`; at least one digit must
    /// be present on one side of the point.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sign, rest) = match s.bytes().next() {
            Some(b'-') => (Sign::Minus, &s[1..]),
            Some(b'+') => (Sign::Plus, &s[1..]),
            _ => (Sign::Plus, s),
        };
        let (mant_str, exp) = match rest.find(['e', 'E']) {
            Some(pos) => {
                let exp: i64 = rest[pos + 1..].parse().map_err(|_| ParseDecimalError)?;
                if exp.abs() > MAX_DECIMAL_EXP {
                    return Err(ParseDecimalError);
                }
                (&rest[..pos], exp)
            }
            None => (rest, 0),
        };
        let (int_part, frac_part) = match mant_str.find('.') {
            Some(pos) => (&mant_str[..pos], &mant_str[pos + 1..]),
            None => (mant_str, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDecimalError);
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ParseDecimalError);
        }

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(ParseDecimalError)?;
        let mantissa = match sign {
            Sign::Minus => -magnitude,
            _ => magnitude,
        };

        let scale = frac_part.len() as i64 - exp;
        if scale <= 0 {
            Ok(Decimal { mantissa: mantissa * pow10((-scale) as u32), scale: 0 })
        } else if scale <= u32::MAX as i64 {
            Ok(Decimal { mantissa, scale: scale as u32 })
        } else {
            Err(ParseDecimalError)
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => self.mantissa == other.mantissa,
            Ordering::Less => {
                &self.mantissa * pow10(other.scale - self.scale) == other.mantissa
            }
            Ordering::Greater => {
                self.mantissa == &other.mantissa * pow10(self.scale - other.scale)
            }
        }
    }
}

impl Eq for Decimal {}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        let digits = self.mantissa.magnitude().to_string();
        if self.scale == 0 {
            return f.write_str(&digits);
        }
        let digits = format!("{:0>width$}", digits, width = self.scale as usize + 1);
        let split = digits.len() - self.scale as usize;
        let frac = digits[split..].trim_end_matches('0');
        if frac.is_empty() {
            f.write_str(&digits[..split])
        } else {
            write!(f, "{}.{}", &digits[..split], frac)
        }
    }
}

fn pow10(exp: u32) -> BigInt {
    let mut value = BigInt::one();
    let ten = BigInt::from(10);
    for _ in 0..exp {
        value *= &ten;
    }
    value
}

/// A single value (atom or compound).
///
/// Arrays and tuples are both ordered sequences and share [`Value::List`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Address(Address),
    Bool(bool),
    Int(BigInt),
    Decimal(Decimal),
    Bytes(Vec<u8>),
    String(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Value::Address(a) => Some(a),
            _ => None,
        }
    }
}
