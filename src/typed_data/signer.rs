//! ECDSA signing and address recovery over method-call digests.

use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};

use crate::abi::keccak256;
use crate::error::{QuorumSigError, QuorumSigResult};
use crate::typed_data::types::{Digest, QuorumSignature};
use crate::utils::logging::{LogEntry, LogLevel};

lazy_static::lazy_static! {
    /// Process-wide signing context. The secp256k1 context is immutable and
    /// safe to share across threads, so one instance serves every call.
    static ref SECP: Secp256k1<All> = Secp256k1::new();
}

/// Sign a 32-byte digest with a raw secp256k1 private key.
///
/// The signer address is recovered from the fresh signature as a self-check
/// and compared against the address derived from the key; a mismatch means
/// the signing backend misbehaved and is a hard error. The recovered address
/// is logged for audit.
pub fn sign_digest(private_key: &[u8], digest: &Digest) -> QuorumSigResult<QuorumSignature> {
    if private_key.len() != 32 {
        return Err(QuorumSigError::KeyFormat(format!(
            "expected 32 bytes, got {}",
            private_key.len()
        )));
    }

    let secret_key = SecretKey::from_slice(private_key)
        .map_err(|e| QuorumSigError::KeyFormat(e.to_string()))?;
    let message = Message::from_digest_slice(digest)
        .map_err(|e| QuorumSigError::Signing(e.to_string()))?;

    let (recovery_id, compact) = SECP
        .sign_ecdsa_recoverable(&message, &secret_key)
        .serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    // v = 27 + recovery_id (canonical Ethereum form)
    let v = 27 + recovery_id.to_i32() as u8;

    let recovered = recover_address(digest, &r, &s, v)?;
    let expected = derive_address(private_key)?;
    if recovered != expected {
        return Err(QuorumSigError::Signing(format!(
            "recovered signer {} does not match signing key {}",
            checksum_address(&recovered),
            checksum_address(&expected)
        )));
    }

    LogEntry::new(LogLevel::Debug, "typed_data::signer", "signed digest")
        .address_field("signer", &checksum_address(&recovered))
        .digest_field("digest", &hex::encode(digest))
        .log();

    Ok(QuorumSignature::new(r, s, v, recovered))
}

/// Recover the signer address from a digest and a canonical (r, s, v)
/// signature. Only canonical `v` values are accepted here; map other
/// conventions through [`crate::multisig::normalize_v`] first.
pub fn recover_address(
    digest: &Digest,
    r: &[u8; 32],
    s: &[u8; 32],
    v: u8,
) -> QuorumSigResult<[u8; 20]> {
    if v != 27 && v != 28 {
        return Err(QuorumSigError::UnsupportedRecoveryId(v));
    }
    let recovery_id = secp256k1::ecdsa::RecoveryId::from_i32((v - 27) as i32)
        .map_err(|e| QuorumSigError::Signing(e.to_string()))?;

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(r);
    compact[32..].copy_from_slice(s);
    let signature = secp256k1::ecdsa::RecoverableSignature::from_compact(&compact, recovery_id)
        .map_err(|e| QuorumSigError::Signing(e.to_string()))?;

    let message = Message::from_digest_slice(digest)
        .map_err(|e| QuorumSigError::Signing(e.to_string()))?;
    let public_key = SECP
        .recover_ecdsa(&message, &signature)
        .map_err(|e| QuorumSigError::Signing(e.to_string()))?;

    Ok(public_key_to_address(&public_key))
}

/// Address controlled by a raw private key.
pub fn derive_address(private_key: &[u8]) -> QuorumSigResult<[u8; 20]> {
    if private_key.len() != 32 {
        return Err(QuorumSigError::KeyFormat(format!(
            "expected 32 bytes, got {}",
            private_key.len()
        )));
    }
    let secret_key = SecretKey::from_slice(private_key)
        .map_err(|e| QuorumSigError::KeyFormat(e.to_string()))?;
    let public_key = PublicKey::from_secret_key(&SECP, &secret_key);
    Ok(public_key_to_address(&public_key))
}

/// Last 20 bytes of the keccak hash of the uncompressed public key.
fn public_key_to_address(public_key: &PublicKey) -> [u8; 20] {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// EIP-55 mixed-case checksum rendering of an address.
pub fn checksum_address(address: &[u8; 20]) -> String {
    let hex_addr = hex::encode(address);
    let hash = hex::encode(keccak256(hex_addr.as_bytes()));

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, c) in hex_addr.chars().enumerate() {
        let hash_nibble = (hash.as_bytes()[i] as char).to_digit(16).unwrap_or(0);
        if c.is_ascii_alphabetic() && hash_nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}
