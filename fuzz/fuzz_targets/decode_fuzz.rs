//! Decoder fuzz target: arbitrary bytes under a set of fixed schemas. The
//! decoder must return a value or a structured error; panics and overreads
//! are bugs. Both strict and lenient modes are driven.
//! Build with: cargo fuzz run decode_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
const SCHEMAS: &[&str] = &[
    "uint256",
    "int8",
    "bool",
    "address",
    "bytes4",
    "bytes",
    "string",
    "ufixed128x10",
    "uint8[3]",
    "uint256[]",
    "string[]",
    "(uint8,string)",
    "(bytes,bool,uint256[])",
    "string[2][]",
];

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let Some((&selector, buffer)) = data.split_first() else {
        return;
    };
    let node = abicodec::parse_schema(SCHEMAS[selector as usize % SCHEMAS.len()])
        .expect("fixed schema");
    let _ = abicodec::decode_type(&node, buffer, true);
    let _ = abicodec::decode_type(&node, buffer, false);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run decode_fuzz");
}
