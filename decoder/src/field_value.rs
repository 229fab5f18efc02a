/// Conversion from an extracted field to a handler argument.
///
/// The field arrives zero-extended to 64 bits. Integers keep the low bits
/// (signed types reinterpret them, so an 8-bit field of `0xFF` becomes `-1_i8`),
/// `bool` is true for any non-zero value. Integer-backed enums are hooked in
/// with [`field_enum!`](crate::field_enum).
pub trait FromField: Sized + 'static {
    fn from_field(bits: u64) -> Self;
}

macro_rules! impl_from_field_int {
    ($($ty:ty),*) => {
        $(
            impl FromField for $ty {
                #[inline]
                fn from_field(bits: u64) -> Self {
                    bits as Self
                }
            }
        )*
    };
}

impl_from_field_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64);

impl FromField for bool {
    #[inline]
    fn from_field(bits: u64) -> Self {
        bits != 0
    }
}

/// Implements [`FromField`](crate::FromField) for enums that already convert
/// from an unsigned integer.
///
/// ```
/// # use decoder::{FromField, field_enum};
/// #[derive(Debug, PartialEq, Eq)]
/// enum Shift {
///     Lsl,
///     Lsr,
///     Asr,
///     Ror,
/// }
///
/// impl From<u8> for Shift {
///     fn from(value: u8) -> Self {
///         match value & 0b11 {
///             0 => Self::Lsl,
///             1 => Self::Lsr,
///             2 => Self::Asr,
///             _ => Self::Ror,
///         }
///     }
/// }
///
/// field_enum!(Shift => u8);
///
/// assert_eq!(Shift::from_field(0b10), Shift::Asr);
/// ```
#[macro_export]
macro_rules! field_enum {
    ($($ty:ty => $repr:ty),+ $(,)?) => {
        $(
            impl $crate::FromField for $ty {
                #[inline]
                fn from_field(bits: u64) -> Self {
                    <$ty>::from(<$repr as $crate::FromField>::from_field(bits))
                }
            }
        )+
    };
}
