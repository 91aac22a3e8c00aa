//! Command line interface for the ABI codec.
//!
//! Usage:
//!   abi encode <schema> <json-value>
//!   abi decode [--lenient] <schema> <0x...hex>
//!
//! `encode` writes the 0x-prefixed lowercase hex encoding to stdout.
//! `decode` writes a JSON rendering of the value (integers and decimals as
//! numbers, bytes and addresses as 0x hex strings).
//!
//! A bare `0x...` value argument is accepted without JSON quoting, so
//! `abi encode bytes4 0x12323458` works as-is.
//!
//! Exit status is 0 on success, non-zero on any error; errors go to stderr.

use abicodec::{decode_type, encode_type, json, parse_schema};
use anyhow::{bail, Context, Result};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("abi: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<String> {
    let mut args: Vec<&str> = args.iter().map(String::as_str).collect();
    let lenient = if let Some(pos) = args.iter().position(|a| *a == "--lenient") {
        args.remove(pos);
        true
    } else {
        false
    };

    match args.as_slice() {
        ["encode", schema, value] => cmd_encode(schema, value),
        ["decode", schema, value] => cmd_decode(schema, value, lenient),
        _ => bail!("usage: abi encode <schema> <json-value> | abi decode [--lenient] <schema> <0x...hex>"),
    }
}

fn cmd_encode(schema: &str, value_text: &str) -> Result<String> {
    let node = parse_schema(schema)?;
    // bare 0x tokens pass through as strings without quoting
    let json: serde_json::Value = if value_text.trim().to_lowercase().starts_with("0x") {
        serde_json::Value::String(value_text.trim().to_string())
    } else {
        serde_json::from_str(value_text)
            .with_context(|| format!("{:?} is not valid JSON", value_text))?
    };
    let value = json::value_from_json(&node, &json)?;
    let encoded = encode_type(&node, &value)?;
    Ok(format!("0x{}", hex::encode(encoded)))
}

fn cmd_decode(schema: &str, hex_text: &str, lenient: bool) -> Result<String> {
    let node = parse_schema(schema)?;
    let stripped = hex_text
        .strip_prefix("0x")
        .or_else(|| hex_text.strip_prefix("0X"))
        .unwrap_or(hex_text);
    let data = hex::decode(stripped).context("value is not valid hex")?;
    let value = decode_type(&node, &data, !lenient)?;
    Ok(serde_json::to_string(&json::value_to_json(&value))?)
}
