use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Header every package starts with ("pkg").
pub const MAGIC: [u8; 3] = [0x70, 0x6b, 0x67];

/// Follows a `section`, `func` or `label` tag.
pub const SECTION_MARKER: u8 = 0xfa;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Section {
    Binary = 0x00,
    Data = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum BinType {
    InlineProgram = 0xA1,
    InlineEntry = 0xA2,
    Package = 0xF1,
    PackageNoEntry = 0xF2,
}

#[test]
fn test() {
    assert_eq!(u8::from(Section::Data), 1);
    assert_eq!(BinType::try_from(0xA2).ok(), Some(BinType::InlineEntry));
    assert!(BinType::try_from(0x00).is_err());
    assert_eq!(&MAGIC, b"pkg");
}
