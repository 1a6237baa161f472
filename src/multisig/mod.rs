//! Multi-party signature collection and aggregation.
//!
//! A quorum of signers each signs the same method-call digest off-chain; the
//! signatures are normalized, ordered, and packed into the single byte blob
//! the verifying contract expects. Signing steps are independent of each
//! other, so callers with remote signers may collect signatures concurrently
//! and aggregate once all results are in; ordering is re-established by
//! sorting, not by arrival.

pub mod recovery;
pub mod aggregate;

pub use aggregate::aggregate;
pub use recovery::{classify, normalize, normalize_v, RecoveryConvention};

use crate::error::{QuorumSigError, QuorumSigResult};
use crate::typed_data::{
    method_call_digest, recover_address, sign_digest, Digest, MethodCall, QuorumSignature,
};
use crate::utils::logging::{LogEntry, LogLevel};

/// A method call signed by the full signer set.
#[derive(Debug, Clone)]
pub struct SignedMethodCall {
    /// The digest every signer signed
    pub digest: Digest,
    /// Normalized signatures, in collection order
    pub signatures: Vec<QuorumSignature>,
    /// The aggregated blob, hex with 0x prefix
    pub signature: String,
}

/// Hash a method call, sign it with every key, and aggregate the result.
///
/// The digest is computed once; each key signs independently. An empty key
/// set is rejected here even though `aggregate` tolerates it, since an empty
/// quorum can never authorize anything. Per-signer failures carry the signer
/// index.
pub fn sign_method_call<K: AsRef<[u8]>>(
    chain_id: u64,
    verifying_contract: &str,
    call: &MethodCall,
    signer_keys: &[K],
) -> QuorumSigResult<SignedMethodCall> {
    if signer_keys.is_empty() {
        return Err(QuorumSigError::InsufficientSigners(0));
    }

    let digest = method_call_digest(chain_id, verifying_contract, call)?;

    let mut signatures = Vec::with_capacity(signer_keys.len());
    for (index, key) in signer_keys.iter().enumerate() {
        let signature = sign_digest(key.as_ref(), &digest).map_err(|e| at_signer(e, index))?;
        signatures.push(recovery::normalize(signature).map_err(|e| at_signer(e, index))?);
    }

    let blob = aggregate(&signatures)?;

    LogEntry::new(LogLevel::Info, "multisig", "aggregated quorum signature")
        .field("signers", signatures.len())
        .field("method", &call.method)
        .digest_field("digest", &hex::encode(digest))
        .log();

    Ok(SignedMethodCall {
        digest,
        signatures,
        signature: blob,
    })
}

/// Accept a 65-byte `r || s || v` signature from an external signer, map its
/// recovery id to canonical form, and recover the signer address for
/// ordering.
pub fn signature_from_rpc(digest: &Digest, raw: &[u8]) -> QuorumSigResult<QuorumSignature> {
    if raw.len() != 65 {
        return Err(QuorumSigError::Signing(format!(
            "expected 65-byte signature, got {}",
            raw.len()
        )));
    }
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&raw[..32]);
    s.copy_from_slice(&raw[32..64]);
    let v = normalize_v(raw[64])?;

    let signer = recover_address(digest, &r, &s, v)?;
    Ok(QuorumSignature::new(r, s, v, signer))
}

fn at_signer(err: QuorumSigError, index: usize) -> QuorumSigError {
    match err {
        QuorumSigError::KeyFormat(msg) => {
            QuorumSigError::KeyFormat(format!("signer {}: {}", index, msg))
        }
        QuorumSigError::Signing(msg) => {
            QuorumSigError::Signing(format!("signer {}: {}", index, msg))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed_data::{derive_address, MethodArg};

    const CONTRACT: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn mint_call() -> MethodCall {
        MethodCall {
            contract_name: "Token".to_string(),
            contract_version: "1".to_string(),
            method: "Mint".to_string(),
            args: vec![
                MethodArg::new("uint256", "amount", "100"),
                MethodArg::new("address", "to", "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            ],
        }
    }

    fn test_keys(n: usize) -> Vec<Vec<u8>> {
        (1..=n as u8).map(|i| vec![i; 32]).collect()
    }

    #[test]
    fn signs_with_every_key_and_aggregates() {
        let keys = test_keys(2);
        let signed = sign_method_call(1, CONTRACT, &mint_call(), &keys).unwrap();

        assert_eq!(
            signed.digest,
            method_call_digest(1, CONTRACT, &mint_call()).unwrap()
        );
        assert_eq!(signed.signatures.len(), 2);
        assert_eq!(signed.signature, aggregate(&signed.signatures).unwrap());
        // 2 signers: 0x + 2*128 + one padded v word
        assert_eq!(signed.signature.len(), 2 + 256 + 64);
    }

    #[test]
    fn collection_order_does_not_change_the_blob() {
        let keys = test_keys(3);
        let forward = sign_method_call(1, CONTRACT, &mint_call(), &keys).unwrap();
        let mut reversed_keys = keys.clone();
        reversed_keys.reverse();
        let reversed = sign_method_call(1, CONTRACT, &mint_call(), &reversed_keys).unwrap();
        assert_eq!(forward.signature, reversed.signature);
    }

    #[test]
    fn empty_key_set_is_rejected() {
        let keys: Vec<Vec<u8>> = vec![];
        let err = sign_method_call(1, CONTRACT, &mint_call(), &keys).unwrap_err();
        assert_eq!(err, QuorumSigError::InsufficientSigners(0));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut keys = test_keys(1);
        keys.push(keys[0].clone());
        let err = sign_method_call(1, CONTRACT, &mint_call(), &keys).unwrap_err();
        assert!(matches!(err, QuorumSigError::DuplicateSigner(_)));
    }

    #[test]
    fn signing_failure_names_the_signer() {
        let keys = vec![vec![1u8; 32], vec![0u8; 31]];
        let err = sign_method_call(1, CONTRACT, &mint_call(), &keys).unwrap_err();
        match err {
            QuorumSigError::KeyFormat(msg) => assert!(msg.contains("signer 1")),
            other => panic!("expected key format error, got {:?}", other),
        }
    }

    #[test]
    fn rpc_signature_is_normalized_and_recovered() {
        let key = vec![7u8; 32];
        let digest = [0x42u8; 32];
        let signed = sign_digest(&key, &digest).unwrap();

        // re-encode with a raw-parity v, as a curve library would hand back
        let mut raw = signed.to_bytes();
        raw[64] = signed.v - 27;

        let restored = signature_from_rpc(&digest, &raw).unwrap();
        assert_eq!(restored.v, signed.v);
        assert_eq!(restored.signer, derive_address(&key).unwrap());
    }

    #[test]
    fn rpc_signature_rejects_unknown_v() {
        let mut raw = [0u8; 65];
        raw[64] = 99;
        let err = signature_from_rpc(&[0x42u8; 32], &raw).unwrap_err();
        assert_eq!(err, QuorumSigError::UnsupportedRecoveryId(99));
    }
}
