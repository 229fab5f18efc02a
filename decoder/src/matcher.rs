use std::fmt::{Debug, Display, Formatter};
use std::marker::PhantomData;

use crate::bitwise::OpcodeWord;
use crate::error::PatternError;
use crate::fields::{FieldTable, count_fields};
use crate::handler::Handler;
use crate::pattern::mask_and_expect;

/// One entry of a decode table: how to recognise an encoding and what to do
/// with it.
///
/// `V` is the visitor handlers are called on, `W` the opcode word and `R` what
/// every handler of the table returns. A matcher is immutable once built and is
/// `Send + Sync` whatever the visitor is, so a table can be built once and then
/// shared by all the threads decoding with it.
pub struct Matcher<V, W, R> {
    name: &'static str,
    mask: W,
    expect: W,
    dispatch: Box<dyn Dispatch<V, W, R>>,
}

trait Dispatch<V, W, R>: Send + Sync {
    fn call(&self, visitor: &mut V, word: W) -> R;

    fn fields(&self) -> &FieldTable<W>;
}

/// A handler together with the fields it is fed from.
struct Dispatcher<H, W, M> {
    handler: H,
    fields: FieldTable<W>,
    marker: PhantomData<fn() -> M>,
}

impl<V, W, R, M, H> Dispatch<V, W, R> for Dispatcher<H, W, M>
where
    W: OpcodeWord,
    H: Handler<V, R, M>,
{
    #[inline]
    fn call(&self, visitor: &mut V, word: W) -> R {
        self.handler.invoke(visitor, word, self.fields.as_slice())
    }

    fn fields(&self) -> &FieldTable<W> {
        &self.fields
    }
}

impl<V, W: OpcodeWord, R> Matcher<V, W, R> {
    /// Compiles `pattern` for `handler`.
    ///
    /// The handler's parameter list decides how many fields the pattern must
    /// declare; the fields are handed over in pattern order.
    ///
    /// # Errors
    ///
    /// Any [`PatternError`]: wrong pattern length, or a field count that differs
    /// from the handler's arity.
    pub fn try_new<H, M>(name: &'static str, pattern: &str, handler: H) -> Result<Self, PatternError>
    where
        H: Handler<V, R, M>,
        M: 'static,
    {
        let (mask, expect) = mask_and_expect::<W>(pattern)?;
        let fields = FieldTable::<W>::compile(pattern, H::ARITY)?;

        tracing::debug!(
            name,
            pattern,
            mask = %format_args!("{mask:#x}"),
            expect = %format_args!("{expect:#x}"),
            fields = fields.len(),
            "compiled matcher"
        );

        Ok(Self {
            name,
            mask,
            expect,
            dispatch: Box::new(Dispatcher {
                handler,
                fields,
                marker: PhantomData,
            }),
        })
    }

    /// Same as [`Matcher::try_new`] for catalogs that can't be wrong.
    ///
    /// # Panics
    ///
    /// If the pattern is malformed or doesn't fit the handler. The message
    /// names the matcher, the pattern and the defect.
    #[track_caller]
    pub fn new<H, M>(name: &'static str, pattern: &str, handler: H) -> Self
    where
        H: Handler<V, R, M>,
        M: 'static,
    {
        match Self::try_new(name, pattern, handler) {
            Ok(matcher) => matcher,
            Err(err) => {
                tracing::error!(name, pattern, "invalid matcher: {err}");
                match err {
                    PatternError::Length { .. } => {
                        panic!("matcher `{name}` (\"{pattern}\"): {err}")
                    }
                    PatternError::UnexpectedField { .. } | PatternError::EmptyField { .. } => {
                        let declared = count_fields::<W>(pattern).unwrap_or_default();
                        panic!(
                            "matcher `{name}` (\"{pattern}\", {declared} field(s), handler takes {}): {err}",
                            H::ARITY
                        )
                    }
                }
            }
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Bits of the word fixed by the pattern.
    #[must_use]
    pub const fn mask(&self) -> W {
        self.mask
    }

    /// Value of the fixed bits.
    #[must_use]
    pub const fn expect(&self) -> W {
        self.expect
    }

    #[must_use]
    pub fn fields(&self) -> &FieldTable<W> {
        self.dispatch.fields()
    }

    /// Number of arguments extracted for the handler.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fields().len()
    }

    /// Number of fixed bits. When several encodings match a word, the one with
    /// the most fixed bits is usually the one meant.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        self.mask.count_ones()
    }

    #[must_use]
    #[inline]
    pub fn matches(&self, word: W) -> bool {
        (word & self.mask) == self.expect
    }

    /// Extracts the fields of `word` and calls the handler with them.
    ///
    /// Whether `word` is an instance of this encoding is for the decode table
    /// to check first with [`Matcher::matches`]. Extraction itself never fails:
    /// any word gets its field bits extracted, fixed bits are not looked at.
    #[inline]
    pub fn call(&self, visitor: &mut V, word: W) -> R {
        self.dispatch.call(visitor, word)
    }
}

impl<V, W: OpcodeWord, R> Display for Matcher<V, W, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = W::BITS as usize;
        write!(
            f,
            "{}: mask={:0width$b} expect={:0width$b} fields={}",
            self.name,
            self.mask,
            self.expect,
            self.fields().len()
        )
    }
}

impl<V, W: OpcodeWord, R> Debug for Matcher<V, W, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("name", &self.name)
            .field("mask", &self.mask)
            .field("expect", &self.expect)
            .field("fields", self.fields())
            .finish_non_exhaustive()
    }
}

/// Builds a [`Matcher`], panicking on a bad pattern.
///
/// ```
/// # use decoder::{Matcher, matcher};
/// struct Cpu;
///
/// impl Cpu {
///     fn mov_imm(&mut self, rd: u8, imm8: u32) -> String {
///         format!("MOV R{rd}, #{imm8}")
///     }
/// }
///
/// // Named after the handler.
/// let mov: Matcher<Cpu, u16, String> = matcher!(Cpu::mov_imm, "00100dddiiiiiiii");
/// assert_eq!(mov.name(), "mov_imm");
///
/// // Named explicitly.
/// let mov: Matcher<Cpu, u16, String> = matcher!("MOV (imm)", Cpu::mov_imm, "00100dddiiiiiiii");
/// assert_eq!(mov.call(&mut Cpu, 0x2105), "MOV R1, #5");
/// ```
#[macro_export]
macro_rules! matcher {
    (@last $first:ident $(:: $rest:ident)+) => {
        $crate::matcher!(@last $($rest)::+)
    };
    (@last $last:ident) => {
        stringify!($last)
    };
    ($name:literal, $handler:expr, $pattern:expr $(,)?) => {
        $crate::Matcher::new($name, $pattern, $handler)
    };
    ($($segment:ident)::+, $pattern:expr $(,)?) => {
        $crate::Matcher::new($crate::matcher!(@last $($segment)::+), $pattern, $($segment)::+)
    };
}
