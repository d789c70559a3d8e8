//! Big-endian register value codec.
//!
//! Seesaw transfers every multi-byte register value most-significant byte
//! first. [`BigEndian`] converts the fixed-width integers the driver uses to
//! and from that wire representation without touching the bus.

/// Byte slice length did not match the integer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Fixed-width integer with a big-endian wire encoding.
pub trait BigEndian: Sized + Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Wire representation, exactly [`WIDTH`](Self::WIDTH) bytes.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    fn to_be_wire(self) -> Self::Bytes;

    /// Decode from a slice that must be exactly [`WIDTH`](Self::WIDTH) bytes.
    fn from_be_wire(bytes: &[u8]) -> Result<Self, LengthMismatch>;
}

macro_rules! impl_big_endian {
    ($($ty:ty),*) => {
        $(
            impl BigEndian for $ty {
                const WIDTH: usize = core::mem::size_of::<$ty>();
                type Bytes = [u8; core::mem::size_of::<$ty>()];

                fn to_be_wire(self) -> Self::Bytes {
                    self.to_be_bytes()
                }

                fn from_be_wire(bytes: &[u8]) -> Result<Self, LengthMismatch> {
                    let array: Self::Bytes = bytes.try_into().map_err(|_| LengthMismatch {
                        expected: Self::WIDTH,
                        actual: bytes.len(),
                    })?;
                    Ok(<$ty>::from_be_bytes(array))
                }
            }
        )*
    };
}

impl_big_endian!(u8, u16, u32, u64, i32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_most_significant_byte_first() {
        assert_eq!(0x1234u16.to_be_wire(), [0x12, 0x34]);
        assert_eq!(0xDEAD_BEEFu32.to_be_wire(), [0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(
            0x0102_0304_0506_0708u64.to_be_wire(),
            [1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!((-2i32).to_be_wire(), [0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn output_width_matches_type() {
        assert_eq!(0u8.to_be_wire().len(), 1);
        assert_eq!(0u16.to_be_wire().len(), 2);
        assert_eq!(0u32.to_be_wire().len(), 4);
        assert_eq!(0u64.to_be_wire().len(), 8);
    }

    #[test]
    fn round_trips_extreme_values() {
        for v in [0u8, 1, 0x7F, 0xFF] {
            assert_eq!(u8::from_be_wire(&v.to_be_wire()), Ok(v));
        }
        for v in [0u16, 1, 0x8000, u16::MAX] {
            assert_eq!(u16::from_be_wire(&v.to_be_wire()), Ok(v));
        }
        for v in [0u32, 1, 0x8000_0000, u32::MAX] {
            assert_eq!(u32::from_be_wire(&v.to_be_wire()), Ok(v));
        }
        for v in [0u64, 1, 1 << 63, u64::MAX] {
            assert_eq!(u64::from_be_wire(&v.to_be_wire()), Ok(v));
        }
        for v in [i32::MIN, -1, 0, 1000, i32::MAX] {
            assert_eq!(i32::from_be_wire(&v.to_be_wire()), Ok(v));
        }
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            u32::from_be_wire(&[1, 2, 3]),
            Err(LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            u16::from_be_wire(&[]),
            Err(LengthMismatch {
                expected: 2,
                actual: 0
            })
        );
    }
}
