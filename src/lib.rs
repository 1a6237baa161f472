//! Quorum Signing Core
//!
//! EIP-712 typed-data hashing and multi-party signature aggregation for
//! privileged contract calls (minting, quorum changes, ownership transfer)
//! authorized by an off-chain multisignature quorum.
//!
//! # Architecture
//!
//! This crate provides:
//! - **abi**: keccak-256 and `abi.encode`-compatible value encoding
//! - **typed_data**: domain separator, struct hashing, digest signing
//! - **multisig**: recovery-id normalization, canonical ordering, wire-format
//!   packing of the aggregated signature blob
//! - **utils**: structured logging with signing-material redaction
//!
//! The verifying contract recomputes every hash in here on-chain; both the
//! digests and the aggregated blob layout are bit-exact contract boundaries.
//!
//! # Security
//!
//! Private keys are accepted as raw 32-byte slices for test and dev signing
//! and are never logged. Signatures are zeroized on drop.
//!
//! # Example
//!
//! ```rust,ignore
//! use quorum_sig::{sign_method_call, MethodArg, MethodCall};
//!
//! let call = MethodCall {
//!     contract_name: "Token".into(),
//!     contract_version: "1".into(),
//!     method: "Mint".into(),
//!     args: vec![
//!         MethodArg::new("uint256", "amount", "100"),
//!         MethodArg::new("address", "to", recipient),
//!     ],
//! };
//! let signed = sign_method_call(chain_id, contract_address, &call, &keys)?;
//! println!("blob: {}", signed.signature);
//! ```

pub mod abi;
pub mod error;
pub mod multisig;
pub mod typed_data;
pub mod utils;

// Re-export key types for convenience
pub use error::{QuorumSigError, QuorumSigResult};

pub use abi::{abi_encode, keccak256, AbiType, AbiValue, U256};

pub use typed_data::{
    checksum_address, derive_address, domain_separator, method_call_digest, random_salt,
    recover_address, sign_digest, signing_digest, struct_hash, Digest, MethodArg, MethodCall,
    QuorumSignature,
};

pub use multisig::{
    aggregate, normalize, normalize_v, sign_method_call, signature_from_rpc, RecoveryConvention,
    SignedMethodCall,
};
