//! Canonical ordering and wire-format packing of collected signatures.

use crate::error::{QuorumSigError, QuorumSigResult};
use crate::typed_data::{checksum_address, QuorumSignature};

/// Pack signatures into the blob the verifying contract parses.
///
/// Layout: each signer's `r || s` (64 bytes) in ascending signer-address
/// order, then each signer's `v` byte in the same order, right-padded with
/// zeros to a whole 32-byte word. Addresses are compared as raw byte
/// sequences; the contract's strictly-ascending check uses the same
/// comparison, so numeric comparison here would break verification for
/// addresses with leading zero bytes.
///
/// Collection order does not matter: any permutation of the same signer set
/// produces an identical blob. No threshold check happens here; an empty
/// input yields the degenerate `0x` blob and must be rejected by the caller
/// before any privileged contract call.
pub fn aggregate(signatures: &[QuorumSignature]) -> QuorumSigResult<String> {
    let mut ordered: Vec<&QuorumSignature> = signatures.iter().collect();
    ordered.sort_by(|a, b| a.signer.cmp(&b.signer));

    for pair in ordered.windows(2) {
        if pair[0].signer == pair[1].signer {
            return Err(QuorumSigError::DuplicateSigner(checksum_address(
                &pair[0].signer,
            )));
        }
    }

    let mut blob = Vec::with_capacity(64 * ordered.len() + 32);
    for signature in &ordered {
        blob.extend_from_slice(&signature.r);
        blob.extend_from_slice(&signature.s);
    }

    let mut v_block = Vec::with_capacity(32);
    for signature in &ordered {
        if signature.v != 27 && signature.v != 28 {
            return Err(QuorumSigError::UnsupportedRecoveryId(signature.v));
        }
        v_block.push(signature.v);
    }
    let padded_len = (v_block.len() + 31) / 32 * 32;
    v_block.resize(padded_len, 0);
    blob.extend_from_slice(&v_block);

    Ok(format!("0x{}", hex::encode(blob)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature_with_suffix(tag: u8, suffix: u8) -> QuorumSignature {
        let mut signer = [0u8; 20];
        signer[19] = suffix;
        QuorumSignature::new([tag; 32], [tag + 1; 32], 27, signer)
    }

    #[test]
    fn sorts_signatures_by_signer_address() {
        // collected out of order: ...03, ...01, ...02
        let sigs = vec![
            signature_with_suffix(0x30, 3),
            signature_with_suffix(0x10, 1),
            signature_with_suffix(0x20, 2),
        ];
        let blob = aggregate(&sigs).unwrap();
        let bytes = hex::decode(&blob[2..]).unwrap();

        // r||s block lists signer ...01 first, ...02 second, ...03 third
        assert_eq!(bytes[0], 0x10);
        assert_eq!(bytes[64], 0x20);
        assert_eq!(bytes[128], 0x30);
    }

    #[test]
    fn permutations_produce_identical_blobs() {
        let a = signature_with_suffix(0x10, 1);
        let b = signature_with_suffix(0x20, 2);
        let c = signature_with_suffix(0x30, 3);

        let forward = aggregate(&[a.clone(), b.clone(), c.clone()]).unwrap();
        let reversed = aggregate(&[c.clone(), b.clone(), a.clone()]).unwrap();
        let rotated = aggregate(&[b, c, a]).unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn ordering_handles_leading_zero_bytes() {
        // 0x00ff... must sort before 0x0100...; a comparison on trimmed hex
        // strings ("ff.." vs "100..") would reverse these two
        let mut low = [0u8; 20];
        low[0] = 0x00;
        low[1] = 0xff;
        let mut high = [0u8; 20];
        high[0] = 0x01;
        high[1] = 0x00;

        let sig_low = QuorumSignature::new([0xaa; 32], [0xab; 32], 27, low);
        let sig_high = QuorumSignature::new([0xbb; 32], [0xbc; 32], 27, high);

        let blob = aggregate(&[sig_high, sig_low]).unwrap();
        let bytes = hex::decode(&blob[2..]).unwrap();
        assert_eq!(bytes[0], 0xaa);
    }

    #[test]
    fn v_block_follows_sorted_order_and_pads() {
        let mut sig_a = signature_with_suffix(0x10, 1);
        sig_a.v = 28;
        let sig_b = signature_with_suffix(0x20, 2);

        let blob = aggregate(&[sig_b, sig_a]).unwrap();
        let bytes = hex::decode(&blob[2..]).unwrap();

        // 2 * 64 bytes of r||s, then a single padded v word
        assert_eq!(bytes.len(), 128 + 32);
        assert_eq!(bytes[128], 28); // signer ...01 first
        assert_eq!(bytes[129], 27);
        assert!(bytes[130..].iter().all(|b| *b == 0));
    }

    #[test]
    fn blob_length_formula() {
        for n in 1..=40usize {
            let sigs: Vec<QuorumSignature> = (0..n)
                .map(|i| {
                    let mut signer = [0u8; 20];
                    signer[18] = (i / 256) as u8;
                    signer[19] = (i % 256) as u8;
                    QuorumSignature::new([1u8; 32], [2u8; 32], 27, signer)
                })
                .collect();
            let blob = aggregate(&sigs).unwrap();
            let expected = 2 + 128 * n + 64 * n.div_ceil(32);
            assert_eq!(blob.len(), expected, "n = {}", n);
        }
    }

    #[test]
    fn empty_input_yields_degenerate_blob() {
        assert_eq!(aggregate(&[]).unwrap(), "0x");
    }

    #[test]
    fn duplicate_signers_are_rejected() {
        let sigs = vec![signature_with_suffix(0x10, 1), signature_with_suffix(0x20, 1)];
        let err = aggregate(&sigs).unwrap_err();
        assert!(matches!(err, QuorumSigError::DuplicateSigner(_)));
    }

    #[test]
    fn non_canonical_v_is_rejected() {
        let mut sig = signature_with_suffix(0x10, 1);
        sig.v = 0;
        let err = aggregate(&[sig]).unwrap_err();
        assert_eq!(err, QuorumSigError::UnsupportedRecoveryId(0));
    }
}
