use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Operand size tag of a typed instruction (`const.u16`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Size {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
}

impl Size {
    pub fn is_signed(&self) -> bool {
        matches!(self, Size::I8 | Size::I16 | Size::I32)
    }

    pub fn width(&self) -> Width {
        match self {
            Size::U8 | Size::I8 => Width::W8,
            Size::U16 | Size::I16 => Width::W16,
            Size::U32 | Size::I32 => Width::W32,
        }
    }
}

/// Operand encoding width in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Width {
    W8 = 8,
    W16 = 16,
    W32 = 32,
}

impl Width {
    /// Big-endian byte split. Negative values come out as two's complement.
    pub fn split(self, value: i64) -> Vec<u8> {
        let byte = |shift: u32| ((value >> shift) & 0xff) as u8;
        match self {
            Width::W8 => vec![byte(0)],
            Width::W16 => vec![byte(8), byte(0)],
            Width::W32 => vec![byte(24), byte(16), byte(8), byte(0)],
        }
    }
}

#[test]
fn test_size() {
    assert_eq!("i16".parse::<Size>().ok(), Some(Size::I16));
    assert!("u64".parse::<Size>().is_err());
    assert_eq!(Size::U32.to_string(), "u32");
    assert!(Size::I8.is_signed());
    assert!(!Size::U8.is_signed());
    assert_eq!(u8::from(Size::I32.width()), 32);
    assert_eq!(Size::U16.width(), Width::W16);
}

#[test]
fn test_split() {
    assert_eq!(Width::try_from(16).ok(), Some(Width::W16));
    assert!(Width::try_from(17).is_err());
    assert_eq!(Width::W8.split(0x1ff), vec![0xff]);
    assert_eq!(Width::W16.split(0x1234), vec![0x12, 0x34]);
    assert_eq!(Width::W32.split(0x01020304), vec![0x01, 0x02, 0x03, 0x04]);
    assert_eq!(Width::W16.split(-2), vec![0xff, 0xfe]);
}
