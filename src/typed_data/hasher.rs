//! EIP-712 hashing: domain separator, struct hash, final signing digest.

use crate::abi::{abi_encode, keccak256, AbiType, AbiValue, U256};
use crate::error::QuorumSigResult;
use crate::typed_data::types::{Digest, MethodCall};

/// EIP-191 version bytes prepended to the signable payload.
const EIP712_PREFIX: &[u8] = b"\x19\x01";

/// Type string the verifying contract hashes into its domain separator.
const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Compute the EIP-712 domain separator.
///
/// Binds every signature to one contract deployment on one chain; a
/// separator must never be reused across contracts or chains.
pub fn domain_separator(
    contract_name: &str,
    contract_version: &str,
    chain_id: u64,
    verifying_contract: &str,
) -> QuorumSigResult<Digest> {
    let type_hash = keccak256(EIP712_DOMAIN_TYPE.as_bytes());
    let name_hash = keccak256(contract_name.as_bytes());
    let version_hash = keccak256(contract_version.as_bytes());

    let types = [
        AbiType::FixedBytes(32),
        AbiType::FixedBytes(32),
        AbiType::FixedBytes(32),
        AbiType::Uint(256),
        AbiType::Address,
    ];
    let values = [
        AbiValue::FixedBytes(type_hash.to_vec()),
        AbiValue::FixedBytes(name_hash.to_vec()),
        AbiValue::FixedBytes(version_hash.to_vec()),
        AbiValue::Uint(U256::from(chain_id)),
        AbiValue::from_text(&AbiType::Address, verifying_contract)?,
    ];

    Ok(keccak256(&abi_encode(&types, &values)?))
}

/// Hash the method struct: keccak of the ABI encoding of the method-signature
/// hash followed by the argument values, in declaration order.
///
/// A zero-argument method is valid and hashes the method hash alone.
pub fn struct_hash(call: &MethodCall) -> QuorumSigResult<Digest> {
    let method_hash = keccak256(call.method_signature().as_bytes());

    let mut types = Vec::with_capacity(call.args.len() + 1);
    let mut values = Vec::with_capacity(call.args.len() + 1);
    types.push(AbiType::FixedBytes(32));
    values.push(AbiValue::FixedBytes(method_hash.to_vec()));

    for arg in &call.args {
        let ty = AbiType::parse(&arg.type_name)?;
        let value = AbiValue::from_text(&ty, &arg.value)?;
        types.push(ty);
        values.push(value);
    }

    Ok(keccak256(&abi_encode(&types, &values)?))
}

/// Final digest: `keccak256(0x19 || 0x01 || domainSeparator || structHash)`.
pub fn signing_digest(domain_sep: &Digest, struct_hash: &Digest) -> Digest {
    let mut data = Vec::with_capacity(2 + 64);
    data.extend_from_slice(EIP712_PREFIX);
    data.extend_from_slice(domain_sep);
    data.extend_from_slice(struct_hash);
    keccak256(&data)
}

/// Digest for a method call against a specific contract deployment.
pub fn method_call_digest(
    chain_id: u64,
    verifying_contract: &str,
    call: &MethodCall,
) -> QuorumSigResult<Digest> {
    let domain_sep = domain_separator(
        &call.contract_name,
        &call.contract_version,
        chain_id,
        verifying_contract,
    )?;
    let hash = struct_hash(call)?;
    Ok(signing_digest(&domain_sep, &hash))
}
