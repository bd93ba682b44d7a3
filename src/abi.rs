//! Minimal Solidity ABI codec.
//!
//! Covers exactly the type surface the method catalogs use: `address`,
//! `uint256`, `bool`, `string` and dynamic arrays thereof. Call data is the
//! 4-byte keccak selector of the canonical signature followed by head/tail
//! encoded arguments; return data is decoded against the catalogued output
//! tuple. Addresses decode to `0x`-prefixed lowercase hex.

use sha3::{Digest, Keccak256};

use crate::error::AbiError;

/// Solidity parameter type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamType {
    Address,
    Uint256,
    Bool,
    String,
    Array(Box<ParamType>),
}

impl ParamType {
    /// Canonical signature fragment (`uint256`, `string[]`, ...).
    pub fn signature(&self) -> String {
        match self {
            ParamType::Address => "address".to_string(),
            ParamType::Uint256 => "uint256".to_string(),
            ParamType::Bool => "bool".to_string(),
            ParamType::String => "string".to_string(),
            ParamType::Array(inner) => format!("{}[]", inner.signature()),
        }
    }

    /// Dynamic types are referenced through an offset word in the head.
    fn is_dynamic(&self) -> bool {
        matches!(self, ParamType::String | ParamType::Array(_))
    }
}

/// A decoded or to-be-encoded ABI value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// `0x`-prefixed lowercase hex address.
    Address(String),
    /// Big-endian 256-bit word.
    Uint256([u8; 32]),
    Bool(bool),
    String(String),
    Array(Vec<Token>),
}

impl Token {
    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_address(self) -> Option<String> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Vec<Token>> {
        match self {
            Token::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Canonical method signature, e.g. `getData(string[],uint256)`.
pub fn signature(name: &str, inputs: &[ParamType]) -> String {
    let params: Vec<String> = inputs.iter().map(ParamType::signature).collect();
    format!("{}({})", name, params.join(","))
}

/// First four bytes of the keccak256 of the canonical signature.
pub fn selector(sig: &str) -> [u8; 4] {
    let mut hasher = Keccak256::new();
    hasher.update(sig.as_bytes());
    let hash = hasher.finalize();
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// Encode a full call: selector plus head/tail encoded arguments.
pub fn encode_call(name: &str, inputs: &[ParamType], args: &[Token]) -> Result<Vec<u8>, AbiError> {
    let mut data = selector(&signature(name, inputs)).to_vec();
    data.extend_from_slice(&encode_tokens(inputs, args)?);
    Ok(data)
}

/// Head/tail encode a tuple of arguments.
pub fn encode_tokens(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    if types.len() != tokens.len() {
        return Err(AbiError::TypeMismatch {
            index: tokens.len().min(types.len()),
            expected: format!("{} argument(s)", types.len()),
        });
    }

    let head_len = 32 * types.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail: Vec<u8> = Vec::new();

    for (index, (ty, token)) in types.iter().zip(tokens).enumerate() {
        if ty.is_dynamic() {
            head.extend_from_slice(&uint_word(head_len + tail.len()));
            tail.extend_from_slice(&encode_dynamic(ty, token, index)?);
        } else {
            head.extend_from_slice(&encode_static(ty, token, index)?);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

/// Decode a return tuple against the catalogued output types.
pub fn decode_tuple(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let mut out = Vec::with_capacity(types.len());
    for (i, ty) in types.iter().enumerate() {
        let slot = word(data, i * 32)?;
        if ty.is_dynamic() {
            let offset = word_to_usize(&slot)?;
            if offset > data.len() {
                return Err(AbiError::BadOffset);
            }
            out.push(decode_dynamic(ty, &data[offset..])?);
        } else {
            out.push(decode_static(ty, &slot));
        }
    }
    Ok(out)
}

fn encode_static(ty: &ParamType, token: &Token, index: usize) -> Result<[u8; 32], AbiError> {
    let mismatch = || AbiError::TypeMismatch {
        index,
        expected: ty.signature(),
    };
    match (ty, token) {
        (ParamType::Address, Token::Address(addr)) => {
            let bytes = hex::decode(addr.trim_start_matches("0x"))?;
            if bytes.len() != 20 {
                return Err(mismatch());
            }
            let mut slot = [0u8; 32];
            slot[12..].copy_from_slice(&bytes);
            Ok(slot)
        }
        (ParamType::Uint256, Token::Uint256(value)) => Ok(*value),
        (ParamType::Bool, Token::Bool(value)) => {
            let mut slot = [0u8; 32];
            slot[31] = u8::from(*value);
            Ok(slot)
        }
        _ => Err(mismatch()),
    }
}

fn encode_dynamic(ty: &ParamType, token: &Token, index: usize) -> Result<Vec<u8>, AbiError> {
    let mismatch = || AbiError::TypeMismatch {
        index,
        expected: ty.signature(),
    };
    match (ty, token) {
        (ParamType::String, Token::String(s)) => {
            let bytes = s.as_bytes();
            let mut out = uint_word(bytes.len()).to_vec();
            out.extend_from_slice(bytes);
            out.resize(32 + padded_len(bytes.len()), 0);
            Ok(out)
        }
        (ParamType::Array(elem), Token::Array(items)) => {
            let elem_types = vec![(**elem).clone(); items.len()];
            let mut out = uint_word(items.len()).to_vec();
            out.extend_from_slice(&encode_tokens(&elem_types, items)?);
            Ok(out)
        }
        _ => Err(mismatch()),
    }
}

fn decode_static(ty: &ParamType, slot: &[u8; 32]) -> Token {
    match ty {
        ParamType::Address => Token::Address(format!("0x{}", hex::encode(&slot[12..]))),
        ParamType::Bool => Token::Bool(slot[31] != 0),
        // Uint256, and unreachable dynamic types filtered by the caller.
        _ => Token::Uint256(*slot),
    }
}

/// Decode a dynamic value whose encoding starts at the beginning of `data`.
fn decode_dynamic(ty: &ParamType, data: &[u8]) -> Result<Token, AbiError> {
    let len = word_to_usize(&word(data, 0)?)?;
    match ty {
        ParamType::String => {
            if data.len() < 32 + len {
                return Err(AbiError::Truncated {
                    offset: 32,
                    needed: len,
                });
            }
            let s = std::str::from_utf8(&data[32..32 + len]).map_err(|_| AbiError::Utf8)?;
            Ok(Token::String(s.to_string()))
        }
        ParamType::Array(elem) => {
            let elem_types = vec![(**elem).clone(); len];
            Ok(Token::Array(decode_tuple(&elem_types, &data[32..])?))
        }
        _ => Err(AbiError::BadOffset),
    }
}

fn word(data: &[u8], offset: usize) -> Result<[u8; 32], AbiError> {
    if data.len() < offset + 32 {
        return Err(AbiError::Truncated { offset, needed: 32 });
    }
    let mut slot = [0u8; 32];
    slot.copy_from_slice(&data[offset..offset + 32]);
    Ok(slot)
}

/// Interpret a slot as a length or offset. Anything above 2^64 is rejected
/// rather than truncated.
fn word_to_usize(slot: &[u8; 32]) -> Result<usize, AbiError> {
    if slot[..24].iter().any(|&b| b != 0) {
        return Err(AbiError::BadOffset);
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&slot[24..]);
    usize::try_from(u64::from_be_bytes(buf)).map_err(|_| AbiError::BadOffset)
}

fn uint_word(value: usize) -> [u8; 32] {
    let mut slot = [0u8; 32];
    slot[24..].copy_from_slice(&(value as u64).to_be_bytes());
    slot
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(32) * 32
}
