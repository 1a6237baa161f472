//! Recovery-id normalization across signing backends.
//!
//! Backends disagree on how they report the ECDSA recovery identifier:
//! curve libraries hand back the raw parity bit, Ethereum tooling expects
//! 27/28, and legacy EIP-155 signers fold a chain id into the value. The
//! verifying contract only accepts the canonical form, so every collected
//! signature passes through this closed mapping before aggregation.

use crate::error::{QuorumSigError, QuorumSigResult};
use crate::typed_data::QuorumSignature;

/// Named recovery-id conventions observed from signing backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryConvention {
    /// Parity bit straight from the curve library: 0 or 1.
    RawParity,
    /// Canonical Ethereum values: 27 or 28.
    Canonical,
    /// Chain-id-folded values from EIP-155-era signers: 25/26 and 37/38.
    ChainIdOffset,
}

/// Closed mapping of recognized recovery ids to their canonical value.
/// Anything outside this table is an unrecognized convention and fails.
const CONVENTIONS: [(u8, u8, RecoveryConvention); 8] = [
    (0, 27, RecoveryConvention::RawParity),
    (1, 28, RecoveryConvention::RawParity),
    (25, 27, RecoveryConvention::ChainIdOffset),
    (26, 28, RecoveryConvention::ChainIdOffset),
    (27, 27, RecoveryConvention::Canonical),
    (28, 28, RecoveryConvention::Canonical),
    (37, 27, RecoveryConvention::ChainIdOffset),
    (38, 28, RecoveryConvention::ChainIdOffset),
];

/// Identify which convention a recovery id belongs to.
pub fn classify(v: u8) -> Option<RecoveryConvention> {
    CONVENTIONS
        .iter()
        .find(|(raw, _, _)| *raw == v)
        .map(|(_, _, convention)| *convention)
}

/// Map a recovery id to its canonical value (27 or 28).
pub fn normalize_v(v: u8) -> QuorumSigResult<u8> {
    CONVENTIONS
        .iter()
        .find(|(raw, _, _)| *raw == v)
        .map(|(_, canonical, _)| *canonical)
        .ok_or(QuorumSigError::UnsupportedRecoveryId(v))
}

/// Return the signature with its `v` in canonical form.
pub fn normalize(mut signature: QuorumSignature) -> QuorumSigResult<QuorumSignature> {
    signature.v = normalize_v(signature.v)?;
    Ok(signature)
}
