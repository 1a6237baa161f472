//! Request and signature types for typed method-call signing.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A 32-byte hash value.
pub type Digest = [u8; 32];

/// One typed argument of a governed method call.
///
/// The JSON field names match the request format used by the contract test
/// tooling: `{"type": "uint256", "name": "amount", "value": "100"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodArg {
    /// Solidity type, e.g. "uint256", "address", "bytes32"
    #[serde(rename = "type")]
    pub type_name: String,
    /// Parameter name as declared in the contract method
    pub name: String,
    /// Textual value: decimal/hex integers, hex addresses and byte strings
    pub value: String,
}

impl MethodArg {
    pub fn new(
        type_name: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A privileged method call to be authorized by the signer quorum.
///
/// Argument order is semantic: it fixes both the method signature string and
/// the encoding order, and must mirror the contract's declaration exactly or
/// recovery will authorize the wrong intent. Not mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    pub contract_name: String,
    pub contract_version: String,
    pub method: String,
    pub args: Vec<MethodArg>,
}

impl MethodCall {
    /// Method signature string `name(type1 name1,type2 name2,...)` in
    /// argument order. A zero-argument method yields `name()`.
    pub fn method_signature(&self) -> String {
        let params: Vec<String> = self
            .args
            .iter()
            .map(|arg| format!("{} {}", arg.type_name, arg.name))
            .collect();
        format!("{}({})", self.method, params.join(","))
    }
}

/// An ECDSA signature over a method-call digest.
///
/// `signer` is derived by public-key recovery and is used only for canonical
/// ordering and audit output. `v` is canonical (27 or 28) once the signature
/// has passed through [`crate::multisig::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct QuorumSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
    pub signer: [u8; 20],
}

impl QuorumSignature {
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8, signer: [u8; 20]) -> Self {
        Self { r, s, v, signer }
    }

    /// 65-byte r || s || v form.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}
