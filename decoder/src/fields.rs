//! # Field Compiler
//!
//! Every maximal run of one marker character in a pattern is an argument
//! field. Fields are numbered left to right, in the order the handler takes
//! its arguments:
//!
//! ```text
//!  pattern   1 0 a a b b b -
//!  bit       7 6 5 4 3 2 1 0
//!
//!  field #0  'a'  mask 0b0011_0000  shift 4
//!  field #1  'b'  mask 0b0000_1110  shift 1
//! ```
//!
//! The grouping rule is purely positional:
//!
//! - a `0`, `1` or `-` closes the open field, the next marker run opens a new
//!   one whatever its character;
//! - a marker different from the open one closes it and opens a new one, so
//!   adjacent fields need no separator (`"aabb"` is two fields);
//! - a marker character that shows up again after the field was closed opens
//!   another field (`"aa0aa"` is two fields as well).

use std::ops::Index;

use crate::bitwise::OpcodeWord;
use crate::error::PatternError;
use crate::pattern::{DONT_CARE, FIXED_ONE, FIXED_ZERO, check_width, positions};

/// Where one argument lives in the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec<W> {
    mask: W,
    shift: u32,
}

impl<W: OpcodeWord> FieldSpec<W> {
    const EMPTY: Self = Self {
        mask: W::ZERO,
        shift: 0,
    };

    /// All the bits belonging to the field.
    #[must_use]
    pub const fn mask(&self) -> W {
        self.mask
    }

    /// Bit position of the least significant bit of the field.
    #[must_use]
    pub const fn shift(&self) -> u32 {
        self.shift
    }

    /// Number of bits in the field.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Isolates the field and moves it down to bit 0.
    #[must_use]
    #[inline]
    pub fn extract(&self, word: W) -> W {
        (word & self.mask) >> self.shift
    }

    /// Returns `word` with the field bits replaced by `value`.
    ///
    /// Bits of `value` that don't fit the field are dropped.
    #[must_use]
    pub fn insert(&self, word: W, value: W) -> W {
        let outside = word.to_u64() & !self.mask.to_u64();
        let inside = (value << self.shift) & self.mask;
        W::from_u64_truncating(outside) | inside
    }
}

/// The per-field `(mask, shift)` pairs of a pattern, indexed by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTable<W> {
    fields: Box<[FieldSpec<W>]>,
}

impl<W: OpcodeWord> FieldTable<W> {
    /// Compiles the fields of `pattern` for a handler taking `arity` arguments.
    ///
    /// # Errors
    ///
    /// - [`PatternError::Length`] if the pattern is not `W::BITS` characters long.
    /// - [`PatternError::UnexpectedField`] as soon as the pattern opens more
    ///   fields than `arity`.
    /// - [`PatternError::EmptyField`] if it opens fewer.
    pub fn compile(pattern: &str, arity: usize) -> Result<Self, PatternError> {
        let mut fields = vec![FieldSpec::EMPTY; arity];

        scan::<W, _>(pattern, |index, bit_position, marker| {
            let field = fields
                .get_mut(index)
                .ok_or(PatternError::UnexpectedField {
                    index,
                    position: bit_position,
                    marker,
                })?;
            field.mask = field.mask | W::single_bit(bit_position);
            // Scanning goes from msb to lsb, the last write is the field's lsb.
            field.shift = bit_position;
            Ok(())
        })?;

        if let Some(index) = fields.iter().position(|f| f.mask == W::ZERO) {
            return Err(PatternError::EmptyField { index, arity });
        }

        Ok(Self {
            fields: fields.into_boxed_slice(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpec<W>> {
        self.fields.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FieldSpec<W>] {
        &self.fields
    }
}

impl<W> Index<usize> for FieldTable<W> {
    type Output = FieldSpec<W>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.fields[index]
    }
}

/// Number of fields `pattern` declares, whatever handler it is meant for.
///
/// # Errors
///
/// [`PatternError::Length`] if the pattern is not `W::BITS` characters long.
pub fn count_fields<W: OpcodeWord>(pattern: &str) -> Result<usize, PatternError> {
    let mut count = 0;
    scan::<W, _>(pattern, |index, _, _| {
        count = index + 1;
        Ok(())
    })?;
    Ok(count)
}

/// Walks the pattern msb first and reports every field bit as
/// `(field index, bit position, marker)`.
fn scan<W, F>(pattern: &str, mut on_field_bit: F) -> Result<(), PatternError>
where
    W: OpcodeWord,
    F: FnMut(usize, u32, char) -> Result<(), PatternError>,
{
    check_width::<W>(pattern)?;

    let mut index = 0;
    let mut open: Option<char> = None;

    for (bit_position, c) in positions::<W>(pattern) {
        match c {
            FIXED_ZERO | FIXED_ONE | DONT_CARE => {
                if open.take().is_some() {
                    index += 1;
                }
            }
            marker => {
                match open {
                    Some(current) if current != marker => index += 1,
                    _ => {}
                }
                open = Some(marker);
                on_field_bit(index, bit_position, marker)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn masks_and_shifts<W: OpcodeWord>(table: &FieldTable<W>) -> Vec<(W, u32)> {
        table.iter().map(|f| (f.mask(), f.shift())).collect()
    }

    #[test]
    fn two_fields_with_fixed_and_dont_care_bits() {
        let table = FieldTable::<u8>::compile("10aabbb-", 2).unwrap();
        assert_eq!(
            masks_and_shifts(&table),
            vec![(0b0011_0000, 4), (0b0000_1110, 1)]
        );

        let word = 0b1010_1100_u8;
        assert_eq!(table[0].extract(word), 2);
        assert_eq!(table[1].extract(word), 6);
        assert_eq!(table[0].width(), 2);
        assert_eq!(table[1].width(), 3);
    }

    #[test]
    fn shift_is_the_least_significant_bit() {
        let table = FieldTable::<u16>::compile("00000vvvvvmmmddd", 3).unwrap();
        assert_eq!(
            masks_and_shifts(&table),
            vec![(0b0000_0111_1100_0000, 6), (0b0000_0000_0011_1000, 3), (0b111, 0)]
        );
    }

    #[test]
    fn single_bit_fields() {
        let table = FieldTable::<u8>::compile("a-b-c-d-", 4).unwrap();
        assert_eq!(
            masks_and_shifts(&table),
            vec![(0x80, 7), (0x20, 5), (0x08, 3), (0x02, 1)]
        );
    }

    // Adjacent runs with different markers are separate fields even without a
    // fixed bit between them. Changing this changes every catalog that relies
    // on it, so keep this test in sync with the grouping rule on purpose.
    #[test]
    fn adjacent_different_markers_are_separate_fields() {
        let table = FieldTable::<u8>::compile("aabb0000", 2).unwrap();
        assert_eq!(masks_and_shifts(&table), vec![(0xC0, 6), (0x30, 4)]);

        let table = FieldTable::<u16>::compile("1011010mrrrrrrrr", 2).unwrap();
        assert_eq!(masks_and_shifts(&table), vec![(0x0100, 8), (0x00FF, 0)]);
    }

    #[test]
    fn repeated_marker_after_a_fixed_bit_is_a_new_field() {
        let table = FieldTable::<u8>::compile("aa0aa---", 2).unwrap();
        assert_eq!(masks_and_shifts(&table), vec![(0xC0, 6), (0x18, 3)]);
        assert_eq!(count_fields::<u8>("aa0aa---"), Ok(2));

        let table = FieldTable::<u8>::compile("ab-ab---", 4).unwrap();
        assert_eq!(
            masks_and_shifts(&table),
            vec![(0x80, 7), (0x40, 6), (0x10, 4), (0x08, 3)]
        );
    }

    #[test]
    fn alternating_markers() {
        assert_eq!(count_fields::<u8>("abababab"), Ok(8));
        assert_eq!(count_fields::<u8>("aaaaaaaa"), Ok(1));
        assert_eq!(count_fields::<u8>("01-01-01"), Ok(0));
    }

    #[test]
    fn no_fields() {
        let table = FieldTable::<u16>::compile("1101111100000000", 0).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn too_many_fields() {
        assert_eq!(
            FieldTable::<u8>::compile("10aabbb-", 1),
            Err(PatternError::UnexpectedField {
                index: 1,
                position: 3,
                marker: 'b'
            })
        );
        assert_eq!(
            FieldTable::<u8>::compile("1000000a", 0),
            Err(PatternError::UnexpectedField {
                index: 0,
                position: 0,
                marker: 'a'
            })
        );
    }

    #[test]
    fn too_few_fields() {
        assert_eq!(
            FieldTable::<u8>::compile("10aabbb-", 3),
            Err(PatternError::EmptyField { index: 2, arity: 3 })
        );
        assert_eq!(
            FieldTable::<u8>::compile("10000000", 1),
            Err(PatternError::EmptyField { index: 0, arity: 1 })
        );
    }

    #[test]
    fn wrong_length() {
        assert_eq!(
            FieldTable::<u16>::compile("10aabbb-", 2),
            Err(PatternError::Length {
                expected: 16,
                found: 8
            })
        );
        assert_eq!(
            count_fields::<u32>(""),
            Err(PatternError::Length {
                expected: 32,
                found: 0
            })
        );
    }

    #[test]
    fn deterministic() {
        let pattern = "cccc000ooooSnnnnddddssssstt0mmmm";
        let a = FieldTable::<u32>::compile(pattern, 8).unwrap();
        let b = FieldTable::<u32>::compile(pattern, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn wide_words() {
        let pattern = format!("{}{}", "i".repeat(32), "0".repeat(32));
        let table = FieldTable::<u64>::compile(&pattern, 1).unwrap();
        assert_eq!(table[0].mask(), 0xFFFF_FFFF_0000_0000);
        assert_eq!(table[0].shift(), 32);
        assert_eq!(table[0].extract(0xDEAD_BEEF_0000_0000), 0xDEAD_BEEF);
    }

    #[test]
    fn extract_round_trips_every_value() {
        let table = FieldTable::<u16>::compile("11100iiiiiiiiiii", 1).unwrap();
        let field = table[0];
        for value in 0..(1_u16 << 11) {
            let word = field.insert(0b1110_0000_0000_0000, value);
            assert_eq!(field.extract(word), value);
            assert_eq!(word >> 11, 0b11100);
        }
    }

    #[test]
    fn insert_leaves_other_bits_alone() {
        let table = FieldTable::<u32>::compile("----------------aaaaaaaa--------", 1).unwrap();
        let field = table[0];
        for _ in 0..64 {
            let word = rand::random::<u32>();
            let value = rand::random::<u32>() & 0xFF;
            let updated = field.insert(word, value);
            assert_eq!(field.extract(updated), value);
            assert_eq!(updated & !field.mask(), word & !field.mask());
        }
    }

    #[test]
    fn insert_drops_oversized_values() {
        let table = FieldTable::<u8>::compile("00aaa000", 1).unwrap();
        assert_eq!(table[0].insert(0, 0xFF), 0b0011_1000);
    }
}
