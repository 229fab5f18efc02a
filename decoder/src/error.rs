use thiserror::Error;

/// A defect in an encoding catalog entry, found while compiling its pattern.
///
/// None of these can be caused by instruction data: every pattern is fixed at
/// table-construction time, so hitting one means the catalog itself has to be
/// fixed. [`Matcher::new`](crate::Matcher::new) turns them into a panic,
/// [`Matcher::try_new`](crate::Matcher::try_new) hands them back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern does not have exactly one character per opcode bit.
    #[error("pattern has {found} characters, the opcode is {expected} bits wide")]
    Length {
        /// Width of the opcode word.
        expected: usize,
        /// Number of characters in the pattern.
        found: usize,
    },

    /// The pattern declares more fields than the handler takes arguments.
    #[error("unexpected field #{index} ('{marker}' at bit {position}), the handler takes only {index} argument(s)")]
    UnexpectedField {
        /// Index the extra field would have had.
        index: usize,
        /// Bit position of the first character of the extra field.
        position: u32,
        /// The marker character that opened it.
        marker: char,
    },

    /// A handler argument has no bits in the pattern to be extracted from.
    #[error("field #{index} is empty, the pattern declares fewer fields than the handler's {arity} argument(s)")]
    EmptyField {
        /// Index of the first handler argument without bits.
        index: usize,
        /// Number of arguments the handler takes.
        arity: usize,
    },
}
