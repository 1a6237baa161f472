//! EIP-712 typed method-call hashing and signing.
//!
//! Turns a governed method call into the exact digest the verifying contract
//! recomputes on-chain, and signs it with raw secp256k1 keys.
//!
//! # Reference
//! - <https://eips.ethereum.org/EIPS/eip-712>

pub mod types;
pub mod hasher;
pub mod signer;

pub use types::*;
pub use hasher::*;
pub use signer::*;

/// Random 32-byte salt, hex-encoded with the 0x prefix.
///
/// Governed calls carry a `bytes32 salt` argument so every authorization
/// digest is unique even for identical parameters.
pub fn random_salt() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}
