//! Compiles human-readable bit patterns into instruction matchers.
//!
//! Each encoding of an instruction set is written down as a pattern string with
//! one character per bit, most significant first, and paired with the handler
//! that implements it:
//!
//! ```
//! use decoder::{Matcher, matcher};
//!
//! struct Disassembler;
//!
//! impl Disassembler {
//!     fn add_imm(&self, rd: u8, imm8: u32) -> String {
//!         format!("ADD R{rd}, #{imm8}")
//!     }
//! }
//!
//! let add: Matcher<Disassembler, u16, String> = matcher!(Disassembler::add_imm, "00110dddiiiiiiii");
//!
//! let word = 0x3207;
//! assert!(add.matches(word));
//! assert_eq!(add.call(&mut Disassembler, word), "ADD R2, #7");
//! ```
//!
//! Building a [`Matcher`] is the only step that can fail, and only because of a
//! mistake in the pattern or in the handler's signature. Testing and dispatching
//! are plain bit arithmetic on the tables computed at that point.

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_sign_loss)]
pub mod bitwise;
mod error;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_sign_loss)]
mod field_value;
pub mod fields;
pub mod handler;
mod matcher;
pub mod pattern;

pub use bitwise::OpcodeWord;
pub use error::PatternError;
pub use field_value::FromField;
pub use fields::{FieldSpec, FieldTable};
pub use handler::Handler;
pub use matcher::Matcher;
