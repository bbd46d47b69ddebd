use once_cell::sync::Lazy;
use std::collections::HashMap;

// Instructions, directive tags and size tags live in one namespace.
// Several names are aliases of the same byte.
const TABLE: &[(&str, u8)] = &[
    ("null", 0x00),
    ("__void__", 0x00),
    // Size tags (bit width)
    ("u8", 8),
    ("u16", 16),
    ("u32", 32),
    ("i8", 8),
    ("i16", 16),
    ("i32", 32),
    // Directive tags
    ("section", 0xfa),
    ("binary", 0x01),
    ("syscall", 0x02),
    ("interrupt", 0x02),
    ("meta", 0x03),
    ("func", 0x06),
    ("label", 0x07),
    ("asciz", 0x19),
    ("extern", 0x20),
    ("offset", 0xbb),
    ("sf", 0x8a),
    ("csf", 0x9a),
    // Stack & arithmetic
    ("const", 0x10),
    ("add", 0x11),
    ("sub", 0xaa),
    ("mul", 0xba),
    ("div", 0xca),
    ("mod", 0x2b),
    ("inc", 0x0b),
    ("dec", 0x1b),
    ("dup", 0x4a),
    ("pop", 0x2a),
    ("popl", 0x2a),
    ("del", 0x3a),
    // Comparison
    ("cmpeq", 0x13),
    ("test", 0x13),
    ("cmp", 0x13),
    ("cmpne", 0x14),
    ("cmpgt", 0x15),
    ("cmplt", 0x16),
    ("cmpge", 0x17),
    ("cmple", 0x18),
    // Bitwise
    ("and", 0xcb),
    ("or", 0xdb),
    ("xor", 0x0c),
    ("not", 0x1c),
    ("nor", 0x2c),
    ("shl", 0xec),
    ("shr", 0xfc),
    // Memory
    ("store", 0x0a),
    ("sto", 0x0a),
    ("sb", 0x0a),
    ("load", 0x1a),
    ("ld", 0x1a),
    ("lds", 0x1a),
    ("std", 0x6c),
    ("stsd", 0x6c),
    ("stat", 0x6c),
    ("ldd", 0x7a),
    ("ldsd", 0x7a),
    ("ldat", 0x7a),
    // Control
    ("jmp", 0x5b),
    ("jze", 0x8b),
    ("jne", 0x8b),
    ("call", 0x4c),
    ("ret", 0x5c),
    ("halt", 0x12),
    ("hlt", 0x12),
];

pub static OPCODES: Lazy<HashMap<&'static str, u8>> =
    Lazy::new(|| TABLE.iter().copied().collect());

/// Byte value of a mnemonic, directive tag or size tag.
pub fn lookup(name: &str) -> Option<u8> {
    OPCODES.get(name).copied()
}

/// Table entry, or the token itself when it is a decimal integer.
pub fn resolve(token: &str) -> Option<i64> {
    match lookup(token) {
        Some(op) => Some(op as i64),
        None => token.parse::<i64>().ok(),
    }
}

#[test]
fn test_lookup() {
    assert_eq!(lookup("ret"), Some(0x5c));
    assert_eq!(lookup("hlt"), lookup("halt"));
    assert_eq!(lookup("cmp"), Some(0x13));
    assert_eq!(lookup("i16"), Some(16));
    assert_eq!(lookup("hoge"), None);
}

#[test]
fn test_resolve() {
    assert_eq!(resolve("section"), Some(0xfa));
    assert_eq!(resolve("42"), Some(42));
    assert_eq!(resolve("-3"), Some(-3));
    assert_eq!(resolve("0x10"), None);
    assert_eq!(resolve("hoge"), None);
}

#[test]
fn test_size_tags() {
    use crate::size::Size;
    let tags = [Size::U8, Size::U16, Size::U32, Size::I8, Size::I16, Size::I32];
    for tag in tags {
        assert_eq!(lookup(&tag.to_string()), Some(u8::from(tag.width())));
    }
}
