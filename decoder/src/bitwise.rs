use std::fmt::{Binary, Debug, LowerHex};
use std::ops::{BitAnd, BitOr, Shl, Shr};

/// A fixed-width unsigned instruction word.
///
/// Bit indices go from lsb to msb (right to left): the pattern character at
/// string position `i` describes bit `BITS - 1 - i`.
pub trait OpcodeWord:
    Copy
    + Eq
    + Default
    + Debug
    + Binary
    + LowerHex
    + Send
    + Sync
    + 'static
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    /// Width W of the word, which is also the required pattern length.
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;

    /// Zero-extends the word.
    fn to_u64(self) -> u64;

    /// Keeps the low `BITS` bits of `value`.
    fn from_u64_truncating(value: u64) -> Self;

    fn count_ones(self) -> u32;

    /// A word with only `bit_idx` set.
    fn single_bit(bit_idx: u32) -> Self {
        debug_assert!(bit_idx < Self::BITS);
        Self::ONE << bit_idx
    }
}

macro_rules! impl_opcode_word {
    ($($ty:ty),*) => {
        $(
            impl OpcodeWord for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;

                fn to_u64(self) -> u64 {
                    u64::from(self)
                }

                fn from_u64_truncating(value: u64) -> Self {
                    value as Self
                }

                fn count_ones(self) -> u32 {
                    <$ty>::count_ones(self)
                }
            }
        )*
    };
}

impl_opcode_word!(u8, u16, u32, u64);

/// Returns `value` sign-extended from `number_of_bits` to 64 bits.
///
/// Fields come out of a word zero-extended; handlers that take signed offsets
/// use this to recover the two's complement value.
#[must_use]
pub const fn sign_extend(value: u64, number_of_bits: u32) -> i64 {
    debug_assert!(number_of_bits > 0 && number_of_bits <= 64);
    if number_of_bits == 64 {
        return value as i64;
    }

    let value = value & ((1 << number_of_bits) - 1);

    // With `value ^ mask` the sign bit is flipped: a negative value loses it and
    // the subtraction borrows through all the upper bits, a positive value gains
    // it and the subtraction takes it away again.
    let mask = 1_i64 << (number_of_bits - 1);
    (value as i64 ^ mask) - mask
}
