//! ABI encoder: head/tail word layout compatible with `abi.encode`.

use tiny_keccak::{Hasher, Keccak};

use super::types::{AbiType, AbiValue, U256};
use crate::error::{QuorumSigError, QuorumSigResult};

/// Compute the keccak-256 hash of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Encode `values` against `types` the way `abi.encode` does: static values
/// inline in the head, dynamic values in the tail behind a byte offset.
/// Arity or type/value mismatches fail whole; no partial output.
pub fn abi_encode(types: &[AbiType], values: &[AbiValue]) -> QuorumSigResult<Vec<u8>> {
    if types.len() != values.len() {
        return Err(QuorumSigError::Encoding(format!(
            "Value count {} does not match type count {}",
            values.len(),
            types.len()
        )));
    }
    encode_sequence(types, values)
}

fn encode_sequence(types: &[AbiType], values: &[AbiValue]) -> QuorumSigResult<Vec<u8>> {
    let head_size: usize = types.iter().map(|t| t.head_size()).sum();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (ty, value) in types.iter().zip(values.iter()) {
        if ty.is_dynamic() {
            let offset = U256::from((head_size + tail.len()) as u64);
            head.extend_from_slice(&offset.to_be_bytes());
            tail.extend_from_slice(&encode_value(ty, value)?);
        } else {
            head.extend_from_slice(&encode_value(ty, value)?);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

fn encode_value(ty: &AbiType, value: &AbiValue) -> QuorumSigResult<Vec<u8>> {
    match (ty, value) {
        (AbiType::Uint(bits), AbiValue::Uint(u)) => {
            if u.bit_len() > *bits {
                return Err(QuorumSigError::InvalidValue {
                    type_name: ty.canonical(),
                    value: format!("0x{}", u.to_hex()),
                });
            }
            Ok(u.to_be_bytes().to_vec())
        }
        (AbiType::Int(bits), AbiValue::Int(i)) => {
            if !i.fits_bits(*bits) {
                return Err(QuorumSigError::InvalidValue {
                    type_name: ty.canonical(),
                    value: format!("0x{}", hex::encode(i.to_be_bytes())),
                });
            }
            Ok(i.to_be_bytes().to_vec())
        }
        (AbiType::Address, AbiValue::Address(addr)) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr);
            Ok(word.to_vec())
        }
        (AbiType::Bool, AbiValue::Bool(b)) => {
            let mut word = [0u8; 32];
            word[31] = *b as u8;
            Ok(word.to_vec())
        }
        (AbiType::FixedBytes(size), AbiValue::FixedBytes(bytes)) => {
            if bytes.len() > *size {
                return Err(QuorumSigError::InvalidValue {
                    type_name: ty.canonical(),
                    value: format!("0x{}", hex::encode(bytes)),
                });
            }
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(bytes);
            Ok(word.to_vec())
        }
        (AbiType::Bytes, AbiValue::Bytes(bytes)) => Ok(encode_dynamic_bytes(bytes)),
        (AbiType::String, AbiValue::String(s)) => Ok(encode_dynamic_bytes(s.as_bytes())),
        (AbiType::Array(inner), AbiValue::Array(values)) => {
            let mut result = Vec::new();
            result.extend_from_slice(&U256::from(values.len() as u64).to_be_bytes());
            let types: Vec<AbiType> = vec![(**inner).clone(); values.len()];
            result.extend_from_slice(&encode_sequence(&types, values)?);
            Ok(result)
        }
        (AbiType::FixedArray(inner, size), AbiValue::Array(values)) => {
            if values.len() != *size {
                return Err(QuorumSigError::Encoding(format!(
                    "Expected {} elements for {}, got {}",
                    size,
                    ty,
                    values.len()
                )));
            }
            let types: Vec<AbiType> = vec![(**inner).clone(); values.len()];
            encode_sequence(&types, values)
        }
        _ => Err(QuorumSigError::Encoding(format!(
            "Type mismatch: expected {}, got {} value",
            ty,
            value.kind()
        ))),
    }
}

/// Length word followed by the data, zero-padded to a word boundary.
fn encode_dynamic_bytes(bytes: &[u8]) -> Vec<u8> {
    let padded_len = (bytes.len() + 31) / 32 * 32;
    let mut result = Vec::with_capacity(32 + padded_len);
    result.extend_from_slice(&U256::from(bytes.len() as u64).to_be_bytes());
    result.extend_from_slice(bytes);
    result.resize(32 + padded_len, 0);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_known_vector() {
        assert_eq!(
            hex::encode(keccak256(b"hello")),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn encode_uint256() {
        let encoded = abi_encode(&[AbiType::Uint(256)], &[AbiValue::Uint(U256::from(256))]).unwrap();
        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded[30], 1);
        assert_eq!(encoded[31], 0);
    }

    #[test]
    fn encode_address() {
        let mut addr = [0u8; 20];
        addr[0] = 0xde;
        addr[19] = 0xad;
        let encoded = abi_encode(&[AbiType::Address], &[AbiValue::Address(addr)]).unwrap();
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(encoded[12], 0xde);
        assert_eq!(encoded[31], 0xad);
    }

    #[test]
    fn encode_bool() {
        let encoded = abi_encode(
            &[AbiType::Bool, AbiType::Bool],
            &[AbiValue::Bool(true), AbiValue::Bool(false)],
        )
        .unwrap();
        assert_eq!(encoded[31], 1);
        assert_eq!(encoded[63], 0);
    }

    #[test]
    fn encode_fixed_bytes_right_pads() {
        let encoded = abi_encode(
            &[AbiType::FixedBytes(4)],
            &[AbiValue::FixedBytes(vec![0xde, 0xad, 0xbe, 0xef])],
        )
        .unwrap();
        assert_eq!(&encoded[..4], &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(&encoded[4..], &[0u8; 28]);
    }

    #[test]
    fn encode_dynamic_bytes_layout() {
        let encoded = abi_encode(&[AbiType::Bytes], &[AbiValue::Bytes(vec![0xde, 0xad])]).unwrap();
        // offset word, length word, padded data
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[31], 32);
        assert_eq!(encoded[63], 2);
        assert_eq!(&encoded[64..66], &[0xde, 0xad]);
    }

    #[test]
    fn encode_mixed_static_dynamic_offsets() {
        let encoded = abi_encode(
            &[AbiType::Uint(256), AbiType::String, AbiType::Uint(256)],
            &[
                AbiValue::Uint(U256::from(42)),
                AbiValue::String("test".to_string()),
                AbiValue::Uint(U256::from(100)),
            ],
        )
        .unwrap();

        // head: 42, offset 96, 100; tail: length 4, "test" padded
        assert_eq!(encoded.len(), 160);
        assert_eq!(encoded[31], 42);
        assert_eq!(encoded[63], 96);
        assert_eq!(encoded[95], 100);
        assert_eq!(encoded[127], 4);
        assert_eq!(&encoded[128..132], b"test");
    }

    #[test]
    fn encode_dynamic_array() {
        let values = AbiValue::Array(vec![
            AbiValue::Uint(U256::from(1)),
            AbiValue::Uint(U256::from(2)),
            AbiValue::Uint(U256::from(3)),
        ]);
        let encoded = abi_encode(&[AbiType::Array(Box::new(AbiType::Uint(256)))], &[values]).unwrap();
        // offset, length, three words
        assert_eq!(encoded.len(), 160);
        assert_eq!(encoded[63], 3);
        assert_eq!(encoded[95], 1);
        assert_eq!(encoded[127], 2);
        assert_eq!(encoded[159], 3);
    }

    #[test]
    fn encode_fixed_array_is_inline() {
        let values = AbiValue::Array(vec![
            AbiValue::Uint(U256::from(7)),
            AbiValue::Uint(U256::from(8)),
        ]);
        let encoded = abi_encode(
            &[AbiType::FixedArray(Box::new(AbiType::Uint(256)), 2)],
            &[values],
        )
        .unwrap();
        // no offset, no length
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 7);
        assert_eq!(encoded[63], 8);
    }

    #[test]
    fn arity_mismatch_fails() {
        let err = abi_encode(&[AbiType::Uint(256)], &[]).unwrap_err();
        assert!(matches!(err, QuorumSigError::Encoding(_)));
    }

    #[test]
    fn type_value_mismatch_fails() {
        let err = abi_encode(&[AbiType::Bool], &[AbiValue::Uint(U256::from(1))]).unwrap_err();
        assert!(matches!(err, QuorumSigError::Encoding(_)));
    }
}
