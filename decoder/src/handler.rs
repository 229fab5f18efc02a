//! # Dispatch Builder
//!
//! A handler is any function whose first parameter is the visitor and whose
//! remaining parameters are the instruction's fields, in pattern order:
//!
//! ```text
//!  pattern  "00110dddiiiiiiii"
//!               field #0 ─┘  └─ field #1
//!
//!  fn add_imm(&mut self, rd: u8, imm8: u32) -> R
//!                        └─ #0   └─ #1
//! ```
//!
//! The parameter list is the declaration the field count is checked against:
//! [`Handler::ARITY`] comes from the function's type, so a pattern with a
//! different number of fields is rejected when the matcher is built.
//!
//! Handlers can take the visitor either as `&mut V` or as `&V`. The marker type
//! parameter tells the two apart (and the different arities) so that both can
//! be implemented for plain closures and function items; it is always
//! inferred.

use crate::bitwise::OpcodeWord;
use crate::field_value::FromField;
use crate::fields::FieldSpec;

/// Marker for handlers that take the visitor as `&mut V`.
pub struct Exclusive;

/// Marker for handlers that take the visitor as `&V`.
pub struct Shared;

/// Highest number of fields a handler can take.
pub const MAX_ARITY: usize = 8;

/// A semantic handler with a statically known parameter list.
pub trait Handler<V, R, Marker>: Send + Sync + 'static {
    /// Number of fields the handler takes after the visitor.
    const ARITY: usize;

    /// Extracts every field of `word` described by `fields`, converts each one
    /// to the corresponding parameter type and calls the handler.
    ///
    /// `fields` must have exactly [`Self::ARITY`] entries.
    fn invoke<W: OpcodeWord>(&self, visitor: &mut V, word: W, fields: &[FieldSpec<W>]) -> R;
}

macro_rules! impl_handler {
    ($arity:literal $(, $arg:ident => $idx:tt)*) => {
        impl<V, R, F, $($arg,)*> Handler<V, R, (Exclusive, $($arg,)*)> for F
        where
            F: Fn(&mut V $(, $arg)*) -> R + Send + Sync + 'static,
            $($arg: FromField,)*
        {
            const ARITY: usize = $arity;

            #[inline]
            #[allow(unused_variables)]
            fn invoke<W: OpcodeWord>(&self, visitor: &mut V, word: W, fields: &[FieldSpec<W>]) -> R {
                debug_assert_eq!(fields.len(), $arity);
                self(visitor $(, $arg::from_field(fields[$idx].extract(word).to_u64()))*)
            }
        }

        impl<V, R, F, $($arg,)*> Handler<V, R, (Shared, $($arg,)*)> for F
        where
            F: Fn(&V $(, $arg)*) -> R + Send + Sync + 'static,
            $($arg: FromField,)*
        {
            const ARITY: usize = $arity;

            #[inline]
            #[allow(unused_variables)]
            fn invoke<W: OpcodeWord>(&self, visitor: &mut V, word: W, fields: &[FieldSpec<W>]) -> R {
                debug_assert_eq!(fields.len(), $arity);
                self(&*visitor $(, $arg::from_field(fields[$idx].extract(word).to_u64()))*)
            }
        }
    };
}

impl_handler!(0);
impl_handler!(1, A0 => 0);
impl_handler!(2, A0 => 0, A1 => 1);
impl_handler!(3, A0 => 0, A1 => 1, A2 => 2);
impl_handler!(4, A0 => 0, A1 => 1, A2 => 2, A3 => 3);
impl_handler!(5, A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4);
impl_handler!(6, A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5);
impl_handler!(7, A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6);
impl_handler!(8, A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6, A7 => 7);
