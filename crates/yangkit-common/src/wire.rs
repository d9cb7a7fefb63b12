//! Versioned binary form of scalar values.
//!
//! Every encoding starts with a one-byte format tag, followed by a big-endian
//! payload whose layout is fixed by that tag:
//!
//! | tag | type | payload |
//! |---|---|---|
//! | `0x01` | `Decimal64` v1 | `[scale_offset: u8][value: i64]` |
//! | `0x02` | `Uint8` v1 | `[u8]` |
//! | `0x03` | `Uint16` v1 | `[u16]` |
//! | `0x04` | `Uint32` v1 | `[u32]` |
//! | `0x05` | `Uint64` v1 | `[u64]` |

use std::fmt;
use std::io::{self, Read, Write};

use thiserror::Error;

use crate::decimal::{Decimal64, MAX_SCALE};
use crate::uint::{Uint16, Uint32, Uint64, Uint8};

/// Format tag: `Decimal64` version 1.
pub const TAG_DECIMAL64_V1: u8 = 0x01;
/// Format tag: `Uint8` version 1.
pub const TAG_UINT8_V1: u8 = 0x02;
/// Format tag: `Uint16` version 1.
pub const TAG_UINT16_V1: u8 = 0x03;
/// Format tag: `Uint32` version 1.
pub const TAG_UINT32_V1: u8 = 0x04;
/// Format tag: `Uint64` version 1.
pub const TAG_UINT64_V1: u8 = 0x05;

/// Errors from the binary codec.
#[derive(Debug, Error)]
pub enum WireError {
    /// The format tag is not known to this version.
    #[error("unsupported format tag 0x{0:02x}")]
    UnsupportedFormat(u8),
    /// The tag is valid but belongs to a different type.
    #[error("unexpected format tag 0x{found:02x}, expected 0x{expected:02x}")]
    UnexpectedFormat {
        /// Tag required by the caller.
        expected: u8,
        /// Tag found in the input.
        found: u8,
    },
    /// The payload is malformed.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    /// Input ended early, or extra bytes followed the payload.
    #[error("invalid length: {0}")]
    InvalidLength(String),
    /// I/O failure of the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A value with a versioned binary encoding.
pub trait WireFormat: Sized {
    /// Format tag written before the payload.
    const TAG: u8;

    /// Payload size in bytes.
    const PAYLOAD_LEN: usize;

    /// Writes the payload, without the tag.
    fn write_payload<W: Write>(&self, out: &mut W) -> io::Result<()>;

    /// Reads the payload that follows an already consumed tag.
    fn read_payload<R: Read>(input: &mut R) -> Result<Self, WireError>;

    /// Writes tag and payload.
    fn write_to<W: Write>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_all(&[Self::TAG])?;
        self.write_payload(out)?;
        Ok(())
    }

    /// Reads tag and payload, rejecting any other tag.
    fn read_from<R: Read>(input: &mut R) -> Result<Self, WireError> {
        let tag = read_tag(input)?;
        if tag != Self::TAG {
            return Err(mismatch(Self::TAG, tag));
        }
        Self::read_payload(input)
    }

    /// Encodes into a fresh buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + Self::PAYLOAD_LEN);
        bytes.push(Self::TAG);
        // writes into a Vec never fail
        let _ = self.write_payload(&mut bytes);
        bytes
    }

    /// Decodes a buffer holding exactly one encoded value.
    fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        check_exact_len(bytes, 1 + Self::PAYLOAD_LEN)?;
        let mut cursor = bytes;
        Self::read_from(&mut cursor)
    }
}

fn mismatch(expected: u8, found: u8) -> WireError {
    if is_known_tag(found) {
        WireError::UnexpectedFormat { expected, found }
    } else {
        WireError::UnsupportedFormat(found)
    }
}

fn is_known_tag(tag: u8) -> bool {
    (TAG_DECIMAL64_V1..=TAG_UINT64_V1).contains(&tag)
}

fn check_exact_len(bytes: &[u8], expected: usize) -> Result<(), WireError> {
    if bytes.len() != expected {
        return Err(WireError::InvalidLength(format!(
            "expected {} bytes, got {}",
            expected,
            bytes.len()
        )));
    }
    Ok(())
}

fn read_tag<R: Read>(input: &mut R) -> Result<u8, WireError> {
    let [tag] = read_array::<R, 1>(input)?;
    Ok(tag)
}

fn read_array<R: Read, const N: usize>(input: &mut R) -> Result<[u8; N], WireError> {
    let mut buf = [0u8; N];
    input.read_exact(&mut buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => {
            WireError::InvalidLength(format!("input too short: need {} more bytes", N))
        }
        _ => WireError::Io(err),
    })?;
    Ok(buf)
}

impl WireFormat for Decimal64 {
    const TAG: u8 = TAG_DECIMAL64_V1;
    const PAYLOAD_LEN: usize = 9;

    fn write_payload<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&[self.scale() - 1])?;
        out.write_all(&self.unscaled_value().to_be_bytes())
    }

    fn read_payload<R: Read>(input: &mut R) -> Result<Self, WireError> {
        let [offset] = read_array::<R, 1>(input)?;
        if offset >= MAX_SCALE {
            return Err(WireError::InvalidPayload(format!(
                "scale offset {} is out of range [0..{}]",
                offset,
                MAX_SCALE - 1
            )));
        }
        let value = i64::from_be_bytes(read_array::<R, 8>(input)?);
        Decimal64::of(offset + 1, value).map_err(|err| WireError::InvalidPayload(err.to_string()))
    }
}

macro_rules! unsigned_wire {
    ($($name:ident($prim:ty) => $tag:expr),+ $(,)?) => {
        $(
            impl WireFormat for $name {
                const TAG: u8 = $tag;
                const PAYLOAD_LEN: usize = std::mem::size_of::<$prim>();

                fn write_payload<W: Write>(&self, out: &mut W) -> io::Result<()> {
                    out.write_all(&self.get().to_be_bytes())
                }

                fn read_payload<R: Read>(input: &mut R) -> Result<Self, WireError> {
                    let bytes = read_array::<R, { std::mem::size_of::<$prim>() }>(input)?;
                    Ok($name::new(<$prim>::from_be_bytes(bytes)))
                }
            }
        )+
    };
}

unsigned_wire! {
    Uint8(u8) => TAG_UINT8_V1,
    Uint16(u16) => TAG_UINT16_V1,
    Uint32(u32) => TAG_UINT32_V1,
    Uint64(u64) => TAG_UINT64_V1,
}

/// Any scalar with a wire form; decoding dispatches on the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarValue {
    /// `decimal64`
    Decimal64(Decimal64),
    /// `uint8`
    Uint8(Uint8),
    /// `uint16`
    Uint16(Uint16),
    /// `uint32`
    Uint32(Uint32),
    /// `uint64`
    Uint64(Uint64),
}

impl ScalarValue {
    /// Format tag of the contained value.
    pub fn tag(&self) -> u8 {
        match self {
            ScalarValue::Decimal64(_) => TAG_DECIMAL64_V1,
            ScalarValue::Uint8(_) => TAG_UINT8_V1,
            ScalarValue::Uint16(_) => TAG_UINT16_V1,
            ScalarValue::Uint32(_) => TAG_UINT32_V1,
            ScalarValue::Uint64(_) => TAG_UINT64_V1,
        }
    }

    /// YANG built-in type name of the contained value.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarValue::Decimal64(_) => "decimal64",
            ScalarValue::Uint8(_) => "uint8",
            ScalarValue::Uint16(_) => "uint16",
            ScalarValue::Uint32(_) => "uint32",
            ScalarValue::Uint64(_) => "uint64",
        }
    }

    /// Encodes tag and payload.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ScalarValue::Decimal64(v) => v.to_bytes(),
            ScalarValue::Uint8(v) => v.to_bytes(),
            ScalarValue::Uint16(v) => v.to_bytes(),
            ScalarValue::Uint32(v) => v.to_bytes(),
            ScalarValue::Uint64(v) => v.to_bytes(),
        }
    }

    /// Reads one tagged value from a stream.
    pub fn read_from<R: Read>(input: &mut R) -> Result<Self, WireError> {
        match read_tag(input)? {
            TAG_DECIMAL64_V1 => Decimal64::read_payload(input).map(ScalarValue::Decimal64),
            TAG_UINT8_V1 => Uint8::read_payload(input).map(ScalarValue::Uint8),
            TAG_UINT16_V1 => Uint16::read_payload(input).map(ScalarValue::Uint16),
            TAG_UINT32_V1 => Uint32::read_payload(input).map(ScalarValue::Uint32),
            TAG_UINT64_V1 => Uint64::read_payload(input).map(ScalarValue::Uint64),
            other => Err(WireError::UnsupportedFormat(other)),
        }
    }

    /// Decodes a buffer holding exactly one tagged value.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut cursor = bytes;
        let value = Self::read_from(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(WireError::InvalidLength(format!(
                "{} trailing bytes after {} payload",
                cursor.len(),
                value.type_name()
            )));
        }
        Ok(value)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Decimal64(v) => fmt::Display::fmt(v, f),
            ScalarValue::Uint8(v) => fmt::Display::fmt(v, f),
            ScalarValue::Uint16(v) => fmt::Display::fmt(v, f),
            ScalarValue::Uint32(v) => fmt::Display::fmt(v, f),
            ScalarValue::Uint64(v) => fmt::Display::fmt(v, f),
        }
    }
}

macro_rules! scalar_from {
    ($($name:ident),+) => {
        $(
            impl From<$name> for ScalarValue {
                fn from(value: $name) -> Self {
                    ScalarValue::$name(value)
                }
            }
        )+
    };
}

scalar_from!(Decimal64, Uint8, Uint16, Uint32, Uint64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_layout_is_offset_then_big_endian_value() {
        let d = Decimal64::of(2, 12345).unwrap();
        assert_eq!(hex::encode(d.to_bytes()), "01010000000000003039");
        let back = Decimal64::from_bytes(&d.to_bytes()).unwrap();
        assert_eq!(back.scale(), 2);
        assert_eq!(back.unscaled_value(), 12345);
    }

    #[test]
    fn unsigned_layouts() {
        assert_eq!(hex::encode(Uint8::new(7).to_bytes()), "0207");
        assert_eq!(hex::encode(Uint16::new(0x1234).to_bytes()), "031234");
        assert_eq!(hex::encode(Uint32::MAX_VALUE.to_bytes()), "04ffffffff");
        assert_eq!(
            hex::encode(Uint64::new(1).to_bytes()),
            "050000000000000001"
        );
    }

    #[test]
    fn decode_dispatches_on_tag() {
        let bytes = hex::decode("031234").unwrap();
        assert_eq!(
            ScalarValue::decode(&bytes).unwrap(),
            ScalarValue::Uint16(Uint16::new(0x1234))
        );
        let bytes = hex::decode("0111fffffffffffffffe").unwrap();
        match ScalarValue::decode(&bytes).unwrap() {
            ScalarValue::Decimal64(d) => assert_eq!(d.to_string(), "-0.000000000000000002"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        assert!(matches!(
            ScalarValue::decode(&[0x7f, 0x00]),
            Err(WireError::UnsupportedFormat(0x7f))
        ));
        assert!(matches!(
            Uint8::from_bytes(&[0x09, 0x00]),
            Err(WireError::UnsupportedFormat(0x09))
        ));
    }

    #[test]
    fn wrong_known_tag_is_unexpected() {
        assert!(matches!(
            Uint8::from_bytes(&[TAG_UINT16_V1, 0x00]),
            Err(WireError::UnexpectedFormat {
                expected: TAG_UINT8_V1,
                found: TAG_UINT16_V1
            })
        ));
    }

    #[test]
    fn length_and_payload_errors() {
        assert!(matches!(
            ScalarValue::decode(&[TAG_UINT32_V1, 0x00]),
            Err(WireError::InvalidLength(_))
        ));
        assert!(matches!(
            ScalarValue::decode(&[TAG_UINT8_V1, 0x00, 0x00]),
            Err(WireError::InvalidLength(_))
        ));
        assert!(matches!(ScalarValue::decode(&[]), Err(WireError::InvalidLength(_))));
        let mut bad_scale = vec![TAG_DECIMAL64_V1, 18];
        bad_scale.extend_from_slice(&[0; 8]);
        assert!(matches!(
            ScalarValue::decode(&bad_scale),
            Err(WireError::InvalidPayload(_))
        ));
    }

    #[test]
    fn stream_of_values() {
        let mut buf = Vec::new();
        Uint8::new(1).write_to(&mut buf).unwrap();
        Decimal64::of(1, -15).unwrap().write_to(&mut buf).unwrap();
        let mut cursor = buf.as_slice();
        assert_eq!(
            ScalarValue::read_from(&mut cursor).unwrap(),
            ScalarValue::Uint8(Uint8::ONE)
        );
        assert_eq!(
            ScalarValue::read_from(&mut cursor).unwrap().to_string(),
            "-1.5"
        );
        assert!(cursor.is_empty());
    }
}
