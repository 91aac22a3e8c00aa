//! Type-string parser tests: accepted grammar, canonical formatting, and
//! the rejection table with error kinds.

use abicodec::{parse_schema, ParseErrorKind, TypeNode};

fn uint(bits: u16) -> TypeNode {
    TypeNode::Integer { signed: false, bits }
}

// ==================== Accepted type strings ====================

#[test]
fn parse_elementary_types() {
    let cases: Vec<(&str, TypeNode)> = vec![
        ("address", TypeNode::Address),
        ("bool", TypeNode::Bool),
        ("string", TypeNode::String),
        ("bytes", TypeNode::DynamicBytes),
        ("bytes1", TypeNode::Bytes(1)),
        ("bytes32", TypeNode::Bytes(32)),
        ("uint8", uint(8)),
        ("uint256", uint(256)),
        ("int256", TypeNode::Integer { signed: true, bits: 256 }),
        ("ufixed128x10", TypeNode::Fixed { signed: false, bits: 128, precision: 10 }),
        ("fixed8x1", TypeNode::Fixed { signed: true, bits: 8, precision: 1 }),
        ("fixed256x80", TypeNode::Fixed { signed: true, bits: 256, precision: 80 }),
    ];
    for (typestr, expected) in cases {
        assert_eq!(parse_schema(typestr).expect(typestr), expected, "{}", typestr);
    }
}

#[test]
fn parse_arrays_left_associative() {
    // uint8[2][3]: three elements, each an array of two uint8
    assert_eq!(
        parse_schema("uint8[2][3]").expect("parse"),
        TypeNode::Array(Box::new(TypeNode::Array(Box::new(uint(8)), 2)), 3)
    );
    assert_eq!(
        parse_schema("uint8[][2]").expect("parse"),
        TypeNode::Array(Box::new(TypeNode::DynamicArray(Box::new(uint(8)))), 2)
    );
    assert_eq!(
        parse_schema("bytes32[]").expect("parse"),
        TypeNode::DynamicArray(Box::new(TypeNode::Bytes(32)))
    );
}

#[test]
fn parse_tuples() {
    assert_eq!(parse_schema("()").expect("parse"), TypeNode::Tuple(vec![]));
    assert_eq!(
        parse_schema("(uint256)").expect("parse"),
        TypeNode::Tuple(vec![uint(256)])
    );
    assert_eq!(
        parse_schema("(uint8,(bool,string))").expect("parse"),
        TypeNode::Tuple(vec![
            uint(8),
            TypeNode::Tuple(vec![TypeNode::Bool, TypeNode::String]),
        ])
    );
    assert_eq!(
        parse_schema("(bytes32[],ufixed128x10)[4]").expect("parse"),
        TypeNode::Array(
            Box::new(TypeNode::Tuple(vec![
                TypeNode::DynamicArray(Box::new(TypeNode::Bytes(32))),
                TypeNode::Fixed { signed: false, bits: 128, precision: 10 },
            ])),
            4
        )
    );
}

#[test]
fn parsing_is_idempotent() {
    for typestr in ["uint256", "(uint8,(bool,string))[2]", "bytes32[][3]"] {
        let first = parse_schema(typestr).expect(typestr);
        let second = parse_schema(typestr).expect(typestr);
        assert_eq!(first, second, "{}", typestr);
    }
}

// ==================== Canonical formatting ====================

#[test]
fn display_roundtrips_through_parser() {
    for typestr in [
        "address",
        "bool",
        "string",
        "bytes",
        "bytes4",
        "uint256",
        "int8",
        "ufixed128x10",
        "fixed64x2",
        "uint8[2][3]",
        "string[]",
        "()",
        "(uint256)",
        "(uint8,(bool,string))[2]",
        "(bytes32[],ufixed128x10)",
    ] {
        let node = parse_schema(typestr).expect(typestr);
        assert_eq!(node.to_string(), typestr, "display of {}", typestr);
        assert_eq!(parse_schema(&node.to_string()).expect(typestr), node, "{}", typestr);
    }
}

// ==================== Static/dynamic classification ====================

#[test]
fn static_dynamic_classification() {
    let cases = [
        ("uint256", false),
        ("bytes32", false),
        ("string", true),
        ("bytes", true),
        ("uint8[2]", false),
        ("uint8[]", true),
        ("string[2]", true),
        ("(uint8,bool)", false),
        ("(uint8,string)", true),
        ("()", false),
        ("(uint256[2])", false),
    ];
    for (typestr, dynamic) in cases {
        assert_eq!(
            parse_schema(typestr).expect(typestr).is_dynamic(),
            dynamic,
            "{}",
            typestr
        );
    }
}

#[test]
fn head_widths() {
    for (typestr, width) in [
        ("uint8", 32),
        ("string", 32),
        ("uint8[2]", 64),
        ("(uint256[2],bool)", 96),
        ("(uint8,string)", 32),
        ("()", 0),
    ] {
        assert_eq!(parse_schema(typestr).expect(typestr).head_width(), width, "{}", typestr);
    }
}

// ==================== Rejections ====================

#[test]
fn rejects_with_kind() {
    use ParseErrorKind::*;
    let cases = [
        // widthless synonyms: the canonical form spells widths out
        ("uint", UnknownType),
        ("int", UnknownType),
        ("fixed", UnknownType),
        ("ufixed", UnknownType),
        ("fixed128", UnknownType),
        ("fixed128x", UnknownType),
        ("cat", UnknownType),
        ("bytesx", UnknownType),
        // out-of-range parameters
        ("uint0", ParameterOutOfRange),
        ("uint7", ParameterOutOfRange),
        ("uint264", ParameterOutOfRange),
        ("int12345678901234567890", ParameterOutOfRange),
        ("bytes0", ParameterOutOfRange),
        ("bytes33", ParameterOutOfRange),
        ("fixed8x0", ParameterOutOfRange),
        ("fixed8x81", ParameterOutOfRange),
        ("fixed7x1", ParameterOutOfRange),
        ("uint8[0]", ParameterOutOfRange),
        // malformed structure
        ("", InvalidTypeString),
        (" uint8", InvalidTypeString),
        ("uint8 ", InvalidTypeString),
        ("(uint8, bool)", InvalidTypeString),
        ("(uint8", InvalidTypeString),
        ("uint8)", InvalidTypeString),
        ("(uint8,)", InvalidTypeString),
        ("uint8[", InvalidTypeString),
        ("uint8[2", InvalidTypeString),
        ("uint8[-1]", InvalidTypeString),
        ("[2]uint8", InvalidTypeString),
    ];
    for (typestr, kind) in cases {
        let err = parse_schema(typestr).expect_err(typestr);
        assert_eq!(err.kind, kind, "{}: {}", typestr, err);
    }
}

#[test]
fn rejects_excessive_nesting() {
    // parenthesis nesting
    let deep = format!("{}uint8{}", "(".repeat(40), ")".repeat(40));
    assert_eq!(
        parse_schema(&deep).expect_err("deep tuple").kind,
        ParseErrorKind::InvalidTypeString
    );
    // array-suffix nesting deepens the tree without nesting in the text
    let deep = format!("uint8{}", "[1]".repeat(40));
    assert_eq!(
        parse_schema(&deep).expect_err("deep array").kind,
        ParseErrorKind::InvalidTypeString
    );
    // 8 levels is fine
    let ok = format!("uint8{}", "[1]".repeat(8));
    assert!(parse_schema(&ok).is_ok());
}
