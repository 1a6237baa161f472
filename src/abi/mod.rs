//! Ethereum ABI encoding primitives.
//!
//! Keccak-256 hashing and `abi.encode`-compatible encoding of Solidity
//! values: 32-byte words for static types, offset-prefixed head/tail layout
//! for dynamic ones. The verifying contract recomputes every digest with
//! `abi.encode`, so the byte layout here must match it exactly.

pub mod types;
pub mod encoder;

pub use types::{AbiType, AbiValue, I256, U256};
pub use encoder::{abi_encode, keccak256};
