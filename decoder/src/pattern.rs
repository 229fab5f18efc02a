//! # Pattern Parser
//!
//! A pattern describes one fixed-width encoding, most significant bit first,
//! with one character per bit:
//!
//! ```text
//!  "0"       the bit must be zero
//!  "1"       the bit must be one
//!  "-"       don't care
//!  anything  part of an argument field (see `fields`)
//!
//!  pattern  "10aabbb-"
//!  mask      11000000
//!  expect    10000000
//! ```
//!
//! A word `x` is an instance of the encoding when `x & mask == expect`.

use crate::bitwise::OpcodeWord;
use crate::error::PatternError;

pub(crate) const FIXED_ZERO: char = '0';
pub(crate) const FIXED_ONE: char = '1';
pub(crate) const DONT_CARE: char = '-';

/// Checks that `pattern` has exactly one character per bit of `W`.
///
/// # Errors
///
/// [`PatternError::Length`] when it doesn't.
pub fn check_width<W: OpcodeWord>(pattern: &str) -> Result<(), PatternError> {
    let found = pattern.chars().count();
    let expected = W::BITS as usize;
    if found == expected {
        Ok(())
    } else {
        Err(PatternError::Length { expected, found })
    }
}

/// Iterates the pattern as `(bit position, character)`, msb first.
pub(crate) fn positions<W: OpcodeWord>(pattern: &str) -> impl Iterator<Item = (u32, char)> + '_ {
    (0..W::BITS).rev().zip(pattern.chars())
}

/// Builds the `(mask, expect)` pair for `pattern`.
///
/// Only `'0'` and `'1'` contribute: they set their bit in the mask, and `'1'`
/// also sets it in the expected value. Don't-care and field bits stay clear in
/// both.
///
/// # Errors
///
/// [`PatternError::Length`] when the pattern is not `W::BITS` characters long.
pub fn mask_and_expect<W: OpcodeWord>(pattern: &str) -> Result<(W, W), PatternError> {
    check_width::<W>(pattern)?;

    let mut mask = W::ZERO;
    let mut expect = W::ZERO;
    for (bit_position, c) in positions::<W>(pattern) {
        match c {
            FIXED_ZERO => {
                mask = mask | W::single_bit(bit_position);
            }
            FIXED_ONE => {
                mask = mask | W::single_bit(bit_position);
                expect = expect | W::single_bit(bit_position);
            }
            _ => {}
        }
    }

    Ok((mask, expect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fixed_bits_only() {
        let (mask, expect) = mask_and_expect::<u8>("10110010").unwrap();
        assert_eq!(mask, 0xFF);
        assert_eq!(expect, 0b1011_0010);

        let (mask, expect) = mask_and_expect::<u16>("0100011100000000").unwrap();
        assert_eq!(mask, u16::MAX);
        assert_eq!(expect, 0x4700);
    }

    #[test]
    fn random_fixed_patterns_read_as_binary() {
        for _ in 0..64 {
            let value = rand::random::<u32>();
            let pattern = format!("{value:032b}");
            let (mask, expect) = mask_and_expect::<u32>(&pattern).unwrap();
            assert_eq!(mask, u32::MAX);
            assert_eq!(expect, value);
        }
    }

    #[test]
    fn dont_care_and_fields_are_clear() {
        let (mask, expect) = mask_and_expect::<u8>("10aabbb-").unwrap();
        assert_eq!(mask, 0b1100_0000);
        assert_eq!(expect, 0b1000_0000);

        let (mask, expect) = mask_and_expect::<u8>("--------").unwrap();
        assert_eq!(mask, 0);
        assert_eq!(expect, 0);

        let (mask, expect) = mask_and_expect::<u8>("1-1-1-1-").unwrap();
        assert_eq!(mask, 0b1010_1010);
        assert_eq!(expect, 0b1010_1010);
    }

    #[test]
    fn expect_is_always_inside_mask() {
        let (mask, expect) = mask_and_expect::<u16>("1101cccciiiiiiii").unwrap();
        assert_eq!(expect & !mask, 0);
        assert_eq!(mask, 0xF000);
        assert_eq!(expect, 0xD000);
    }

    #[test]
    fn matching_ignores_non_fixed_bits() {
        let (mask, expect) = mask_and_expect::<u8>("10aabbb-").unwrap();
        for word in 0..=u8::MAX {
            let fixed_ok = word >> 6 == 0b10;
            assert_eq!(word & mask == expect, fixed_ok, "word {word:#010b}");
        }
    }

    #[test]
    fn deterministic() {
        let a = mask_and_expect::<u32>("1110101-ddddnnnn0000iiiiiiiiiiii").unwrap();
        let b = mask_and_expect::<u32>("1110101-ddddnnnn0000iiiiiiiiiiii").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_length() {
        assert_eq!(
            mask_and_expect::<u8>("1010101"),
            Err(PatternError::Length {
                expected: 8,
                found: 7
            })
        );
        assert_eq!(
            mask_and_expect::<u16>("10101010101010101"),
            Err(PatternError::Length {
                expected: 16,
                found: 17
            })
        );
    }

    #[test]
    fn length_counts_characters() {
        // Non-ASCII markers are one bit each.
        let (mask, expect) = mask_and_expect::<u8>("1ααββ0--").unwrap();
        assert_eq!(mask, 0b1000_0100);
        assert_eq!(expect, 0b1000_0000);
    }
}
