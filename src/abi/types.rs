//! ABI type and value definitions for Solidity method arguments.

use std::fmt;

use crate::error::{QuorumSigError, QuorumSigResult};

/// A Solidity type, parsed from its canonical string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    /// uint8 through uint256 (bit width, multiple of 8)
    Uint(usize),
    /// int8 through int256
    Int(usize),
    /// 20-byte address, left-padded to a word
    Address,
    Bool,
    /// bytes1 through bytes32, right-padded to a word
    FixedBytes(usize),
    /// Dynamic byte string
    Bytes,
    /// Dynamic UTF-8 string
    String,
    /// Dynamic array T[]
    Array(Box<AbiType>),
    /// Fixed-size array T[N]
    FixedArray(Box<AbiType>, usize),
}

impl AbiType {
    /// Parse a type from its Solidity string representation.
    pub fn parse(s: &str) -> QuorumSigResult<Self> {
        let s = s.trim();

        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(AbiType::Array(Box::new(Self::parse(inner)?)));
        }
        if s.ends_with(']') {
            let open = s
                .rfind('[')
                .ok_or_else(|| QuorumSigError::Encoding(format!("Unbalanced brackets in type: {}", s)))?;
            let size: usize = s[open + 1..s.len() - 1]
                .parse()
                .map_err(|_| QuorumSigError::Encoding(format!("Invalid array size in type: {}", s)))?;
            let inner = Self::parse(&s[..open])?;
            return Ok(AbiType::FixedArray(Box::new(inner), size));
        }

        match s {
            "address" => return Ok(AbiType::Address),
            "bool" => return Ok(AbiType::Bool),
            "bytes" => return Ok(AbiType::Bytes),
            "string" => return Ok(AbiType::String),
            "uint" => return Ok(AbiType::Uint(256)),
            "int" => return Ok(AbiType::Int(256)),
            _ => {}
        }

        if let Some(size_str) = s.strip_prefix("bytes") {
            let size: usize = size_str
                .parse()
                .map_err(|_| QuorumSigError::Encoding(format!("Invalid bytes size: {}", s)))?;
            if size == 0 || size > 32 {
                return Err(QuorumSigError::Encoding(format!("bytes size must be 1-32: {}", s)));
            }
            return Ok(AbiType::FixedBytes(size));
        }
        if let Some(bits_str) = s.strip_prefix("uint") {
            return Ok(AbiType::Uint(Self::parse_bits(s, bits_str)?));
        }
        if let Some(bits_str) = s.strip_prefix("int") {
            return Ok(AbiType::Int(Self::parse_bits(s, bits_str)?));
        }

        Err(QuorumSigError::Encoding(format!("Unknown type: {}", s)))
    }

    fn parse_bits(full: &str, bits_str: &str) -> QuorumSigResult<usize> {
        let bits: usize = bits_str
            .parse()
            .map_err(|_| QuorumSigError::Encoding(format!("Invalid integer width: {}", full)))?;
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(QuorumSigError::Encoding(format!(
                "Integer width must be a multiple of 8 in 8-256: {}",
                full
            )));
        }
        Ok(bits)
    }

    /// Whether the type is encoded in the tail, referenced by offset.
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Bytes | AbiType::String | AbiType::Array(_) => true,
            AbiType::FixedArray(inner, _) => inner.is_dynamic(),
            _ => false,
        }
    }

    /// Size this type occupies in the head section.
    pub fn head_size(&self) -> usize {
        match self {
            AbiType::FixedArray(inner, size) if !self.is_dynamic() => inner.head_size() * size,
            _ => 32,
        }
    }

    /// Canonical type string, as used in method signatures.
    pub fn canonical(&self) -> String {
        match self {
            AbiType::Uint(bits) => format!("uint{}", bits),
            AbiType::Int(bits) => format!("int{}", bits),
            AbiType::Address => "address".to_string(),
            AbiType::Bool => "bool".to_string(),
            AbiType::FixedBytes(size) => format!("bytes{}", size),
            AbiType::Bytes => "bytes".to_string(),
            AbiType::String => "string".to_string(),
            AbiType::Array(inner) => format!("{}[]", inner.canonical()),
            AbiType::FixedArray(inner, size) => format!("{}[{}]", inner.canonical(), size),
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Runtime representation of a Solidity value.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiValue {
    Uint(U256),
    Int(I256),
    Address([u8; 20]),
    Bool(bool),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<AbiValue>),
}

impl AbiValue {
    /// Parse a value from its textual form, as carried in a method-call
    /// request. Integers accept decimal or 0x-hex; addresses and byte types
    /// accept hex with or without the 0x prefix.
    ///
    /// Array types have no scalar text form and are rejected here; build
    /// them programmatically when encoding arrays directly.
    pub fn from_text(ty: &AbiType, text: &str) -> QuorumSigResult<Self> {
        let invalid = || QuorumSigError::InvalidValue {
            type_name: ty.canonical(),
            value: text.to_string(),
        };

        match ty {
            AbiType::Uint(bits) => {
                let value = parse_u256(text).map_err(|_| invalid())?;
                if value.bit_len() > *bits {
                    return Err(invalid());
                }
                Ok(AbiValue::Uint(value))
            }
            AbiType::Int(bits) => {
                let (negative, digits) = match text.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, text),
                };
                let abs = parse_u256(digits).map_err(|_| invalid())?;
                let value = I256::new(abs, negative);
                if !value.fits_bits(*bits) {
                    return Err(invalid());
                }
                Ok(AbiValue::Int(value))
            }
            AbiType::Address => {
                let raw = strip_hex_prefix(text);
                if raw.len() != 40 {
                    return Err(invalid());
                }
                let bytes = hex::decode(raw).map_err(|_| invalid())?;
                let mut addr = [0u8; 20];
                addr.copy_from_slice(&bytes);
                Ok(AbiValue::Address(addr))
            }
            AbiType::Bool => match text {
                "true" | "1" => Ok(AbiValue::Bool(true)),
                "false" | "0" => Ok(AbiValue::Bool(false)),
                _ => Err(invalid()),
            },
            AbiType::FixedBytes(size) => {
                let bytes = hex::decode(strip_hex_prefix(text)).map_err(|_| invalid())?;
                if bytes.len() > *size {
                    return Err(invalid());
                }
                Ok(AbiValue::FixedBytes(bytes))
            }
            AbiType::Bytes => {
                let bytes = hex::decode(strip_hex_prefix(text)).map_err(|_| invalid())?;
                Ok(AbiValue::Bytes(bytes))
            }
            AbiType::String => Ok(AbiValue::String(text.to_string())),
            AbiType::Array(_) | AbiType::FixedArray(_, _) => Err(QuorumSigError::Encoding(format!(
                "Array type {} cannot be built from a scalar value",
                ty
            ))),
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AbiValue::Uint(_) => "uint",
            AbiValue::Int(_) => "int",
            AbiValue::Address(_) => "address",
            AbiValue::Bool(_) => "bool",
            AbiValue::FixedBytes(_) => "fixed bytes",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::String(_) => "string",
            AbiValue::Array(_) => "array",
        }
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

fn parse_u256(text: &str) -> Result<U256, ()> {
    if text.starts_with("0x") || text.starts_with("0X") {
        U256::from_hex(strip_hex_prefix(text))
    } else {
        U256::from_dec(text)
    }
}

/// 256-bit unsigned integer, little-endian u64 limbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U256(pub [u64; 4]);

impl U256 {
    pub const ZERO: U256 = U256([0, 0, 0, 0]);

    pub fn from(value: u64) -> Self {
        U256([value, 0, 0, 0])
    }

    /// Big-endian bytes, at most 32; shorter input is left-padded.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, ()> {
        if bytes.len() > 32 {
            return Err(());
        }
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(bytes);

        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let offset = (3 - i) * 8;
            *limb = u64::from_be_bytes(padded[offset..offset + 8].try_into().unwrap());
        }
        Ok(U256(limbs))
    }

    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (i, limb) in self.0.iter().enumerate() {
            let offset = (3 - i) * 8;
            bytes[offset..offset + 8].copy_from_slice(&limb.to_be_bytes());
        }
        bytes
    }

    /// Parse from hex (no 0x prefix). Odd lengths are accepted.
    pub fn from_hex(s: &str) -> Result<Self, ()> {
        if s.is_empty() || s.len() > 64 {
            return Err(());
        }
        let padded;
        let even = if s.len() % 2 == 0 {
            s
        } else {
            padded = format!("0{}", s);
            &padded
        };
        let bytes = hex::decode(even).map_err(|_| ())?;
        Self::from_be_bytes(&bytes)
    }

    /// Parse from a decimal string of arbitrary length up to 2^256.
    pub fn from_dec(s: &str) -> Result<Self, ()> {
        if s.is_empty() {
            return Err(());
        }
        let mut result = U256::ZERO;
        for c in s.chars() {
            let digit = c.to_digit(10).ok_or(())?;
            result = result.checked_mul_u64(10).ok_or(())?;
            result = result.checked_add(U256::from(digit as u64)).ok_or(())?;
        }
        Ok(result)
    }

    pub fn checked_add(self, other: U256) -> Option<U256> {
        let mut limbs = [0u64; 4];
        let mut carry = 0u64;
        for i in 0..4 {
            let (sum1, c1) = self.0[i].overflowing_add(other.0[i]);
            let (sum2, c2) = sum1.overflowing_add(carry);
            limbs[i] = sum2;
            carry = (c1 as u64) + (c2 as u64);
        }
        if carry != 0 {
            None
        } else {
            Some(U256(limbs))
        }
    }

    pub fn checked_sub(self, other: U256) -> Option<U256> {
        let mut limbs = [0u64; 4];
        let mut borrow = 0u64;
        for i in 0..4 {
            let (diff1, b1) = self.0[i].overflowing_sub(other.0[i]);
            let (diff2, b2) = diff1.overflowing_sub(borrow);
            limbs[i] = diff2;
            borrow = (b1 as u64) + (b2 as u64);
        }
        if borrow != 0 {
            None
        } else {
            Some(U256(limbs))
        }
    }

    pub fn checked_mul_u64(self, other: u64) -> Option<U256> {
        let mut limbs = [0u64; 4];
        let mut carry = 0u128;
        for i in 0..4 {
            let product = (self.0[i] as u128) * (other as u128) + carry;
            limbs[i] = product as u64;
            carry = product >> 64;
        }
        if carry != 0 {
            None
        } else {
            Some(U256(limbs))
        }
    }

    pub fn is_zero(self) -> bool {
        self.0 == [0, 0, 0, 0]
    }

    /// Position of the highest set bit plus one; zero for ZERO.
    pub fn bit_len(self) -> usize {
        for i in (0..4).rev() {
            if self.0[i] != 0 {
                return (i + 1) * 64 - self.0[i].leading_zeros() as usize;
            }
        }
        0
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.to_be_bytes())
    }
}

/// 256-bit signed integer as (magnitude, sign).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I256 {
    magnitude: U256,
    negative: bool,
}

impl I256 {
    pub fn new(magnitude: U256, negative: bool) -> Self {
        // normalize -0
        I256 {
            magnitude,
            negative: negative && !magnitude.is_zero(),
        }
    }

    pub fn from(value: i64) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Range check for intN: [-2^(N-1), 2^(N-1) - 1].
    pub fn fits_bits(self, bits: usize) -> bool {
        if self.negative {
            match self.magnitude.checked_sub(U256::from(1)) {
                Some(m) => m.bit_len() <= bits - 1,
                None => true, // magnitude is zero, normalized away
            }
        } else {
            self.magnitude.bit_len() <= bits - 1
        }
    }

    /// Big-endian two's complement, 32 bytes.
    pub fn to_be_bytes(self) -> [u8; 32] {
        if !self.negative {
            return self.magnitude.to_be_bytes();
        }
        let mut bytes = self.magnitude.to_be_bytes();
        for b in &mut bytes {
            *b = !*b;
        }
        let mut carry = 1u8;
        for i in (0..32).rev() {
            let (sum, c) = bytes[i].overflowing_add(carry);
            bytes[i] = sum;
            carry = c as u8;
            if carry == 0 {
                break;
            }
        }
        bytes
    }
}
