//! Sign a governed method call with a quorum of keys.
//!
//! Reads a JSON request (`{"contractName": ..., "contractVersion": ...,
//! "method": ..., "args": [{"type", "name", "value"}, ...]}`) from a file or
//! stdin, signs its digest with each `--signer-key`, and prints the digest,
//! the sorted signer set, and the aggregated signature blob as JSON.
//!
//! Usage:
//!   quorum-sig [request.json] --chain-id 1 --contract 0x... \
//!       --signer-key <hex> [--signer-key <hex> ...] [--debug]

use quorum_sig::utils::logging;
use quorum_sig::{checksum_address, sign_method_call, MethodCall};
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use zeroize::Zeroizing;

fn main() -> Result<(), Box<dyn Error>> {
    let mut request_path: Option<String> = None;
    let mut chain_id: Option<u64> = None;
    let mut contract: Option<String> = None;
    let mut signer_keys: Vec<Zeroizing<Vec<u8>>> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--chain-id" => {
                let value = args.next().ok_or("--chain-id requires a value")?;
                chain_id = Some(value.parse()?);
            }
            "--contract" => {
                contract = Some(args.next().ok_or("--contract requires a value")?);
            }
            "--signer-key" => {
                let value = args.next().ok_or("--signer-key requires a value")?;
                let bytes = hex::decode(value.trim_start_matches("0x"))?;
                signer_keys.push(Zeroizing::new(bytes));
            }
            "--debug" => logging::enable_debug(),
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ if request_path.is_none() && !arg.starts_with("--") => {
                request_path = Some(arg.clone());
            }
            other => return Err(format!("unknown argument: {}", other).into()),
        }
    }

    let chain_id = chain_id.ok_or("--chain-id is required")?;
    let contract = contract.ok_or("--contract is required")?;
    if signer_keys.is_empty() {
        return Err("at least one --signer-key is required".into());
    }

    let payload = match request_path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let call: MethodCall = serde_json::from_str(&payload)?;

    let signed = sign_method_call(chain_id, &contract, &call, &signer_keys)?;

    let mut signers: Vec<[u8; 20]> = signed.signatures.iter().map(|s| s.signer).collect();
    signers.sort();
    let output = serde_json::json!({
        "digest": format!("0x{}", hex::encode(signed.digest)),
        "signers": signers.iter().map(checksum_address).collect::<Vec<_>>(),
        "signature": signed.signature,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn print_usage() {
    println!("Usage: quorum-sig [request.json] --chain-id <id> --contract <address> \\");
    println!("           --signer-key <hex> [--signer-key <hex> ...] [--debug]");
    println!();
    println!("Reads the request from stdin when no file is given.");
}
