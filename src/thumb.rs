//! # Thumb Catalog
//!
//! A subset of the 16-bit Thumb instruction set written as bit patterns, with a
//! disassembler as the visitor:
//!
//! ```text
//! ┌───────────────────────────┬──────────────────────────────────────────┐
//! │ Pattern                   │ Format                                   │
//! ├───────────────────────────┼──────────────────────────────────────────┤
//! │ 000ssvvvvvmmmddd          │ Move shifted register                    │
//! │ 00011iorrrsssddd          │ Add/subtract                             │
//! │ 001oodddvvvvvvvv          │ Move/compare/add/subtract immediate      │
//! │ 010001110mmmm000          │ Branch and exchange                      │
//! │ 01001dddvvvvvvvv          │ PC-relative load                         │
//! │ 1011o10rllllllll          │ Push/pop registers                       │
//! │ 1101ccccvvvvvvvv          │ Conditional branch                       │
//! │ 11011111vvvvvvvv          │ Software interrupt                       │
//! │ 11100vvvvvvvvvvv          │ Unconditional branch                     │
//! └───────────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! Some of these overlap: add/subtract is a move shifted register with shift
//! kind `0b11`, software interrupt is a conditional branch with condition
//! `0b1111`. The table is kept sorted by specificity so that the first match is
//! the most specific one.

use std::cmp::Reverse;
use std::fmt::{Display, Formatter};

use decoder::bitwise::sign_extend;
use decoder::{Matcher, field_enum, matcher};

pub type ThumbMatcher = Matcher<Disassembler, u16, String>;

const REG_STACK_POINTER: u8 = 13;
const REG_LINK_REGISTER: u8 = 14;
const REG_PROGRAM_COUNTER: u8 = 15;

/// Condition codes of Thumb conditional branches, in encoding order.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Condition {
    Eq,
    Ne,
    Cs,
    Cc,
    Mi,
    Pl,
    Vs,
    Vc,
    Hi,
    Ls,
    Ge,
    Lt,
    Gt,
    Le,
    Al,
    Nv,
}

impl Condition {
    const BY_CODE: [Self; 16] = [
        Self::Eq,
        Self::Ne,
        Self::Cs,
        Self::Cc,
        Self::Mi,
        Self::Pl,
        Self::Vs,
        Self::Vc,
        Self::Hi,
        Self::Ls,
        Self::Ge,
        Self::Lt,
        Self::Gt,
        Self::Le,
        Self::Al,
        Self::Nv,
    ];

    // `AL` is implied and never written out.
    const SUFFIXES: [&'static str; 16] = [
        "EQ", "NE", "CS", "CC", "MI", "PL", "VS", "VC", "HI", "LS", "GE", "LT", "GT", "LE", "",
        "NV",
    ];

    const fn suffix(self) -> &'static str {
        Self::SUFFIXES[self as usize]
    }
}

impl From<u8> for Condition {
    fn from(code: u8) -> Self {
        Self::BY_CODE[usize::from(code & 0xF)]
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl From<u8> for ShiftKind {
    fn from(op: u8) -> Self {
        match op {
            0 => Self::Lsl,
            1 => Self::Lsr,
            2 => Self::Asr,
            3 => Self::Ror,
            _ => unreachable!(),
        }
    }
}

impl Display for ShiftKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lsl => f.write_str("LSL"),
            Self::Lsr => f.write_str("LSR"),
            Self::Asr => f.write_str("ASR"),
            Self::Ror => f.write_str("ROR"),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Operation {
    Mov,
    Cmp,
    Add,
    Sub,
}

impl From<u8> for Operation {
    fn from(op: u8) -> Self {
        match op {
            0 => Self::Mov,
            1 => Self::Cmp,
            2 => Self::Add,
            3 => Self::Sub,
            _ => unreachable!(),
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mov => f.write_str("MOV"),
            Self::Cmp => f.write_str("CMP"),
            Self::Add => f.write_str("ADD"),
            Self::Sub => f.write_str("SUB"),
        }
    }
}

field_enum!(Condition => u8, ShiftKind => u8, Operation => u8);

fn register_name(register: u8) -> String {
    match register {
        REG_STACK_POINTER => "SP".to_string(),
        REG_LINK_REGISTER => "LR".to_string(),
        REG_PROGRAM_COUNTER => "PC".to_string(),
        r => format!("R{r}"),
    }
}

fn register_list(list: u8, extra: Option<u8>) -> String {
    let registers = (0..8)
        .filter(|r| list & (1 << r) != 0)
        .chain(extra)
        .map(register_name)
        .collect::<Vec<_>>();
    format!("{{{}}}", registers.join(", "))
}

/// Renders instructions as text. Branch targets are computed from the address
/// of the instruction being decoded.
#[derive(Debug, Default)]
pub struct Disassembler {
    pc: u32,
}

impl Disassembler {
    pub const fn new(pc: u32) -> Self {
        Self { pc }
    }

    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Moves to the next halfword.
    pub const fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// The PC reads two instructions ahead of the one executing.
    const fn branch_target(&self, offset: i64) -> u32 {
        (self.pc as i64 + 4 + offset) as u32
    }

    fn move_shifted_register(&self, shift: ShiftKind, offset5: u8, rs: u8, rd: u8) -> String {
        format!("{shift} R{rd}, R{rs}, #{offset5}")
    }

    fn add_subtract(&self, immediate: bool, subtract: bool, rn_offset3: u8, rs: u8, rd: u8) -> String {
        let op = if subtract { "SUB" } else { "ADD" };
        if immediate {
            format!("{op} R{rd}, R{rs}, #{rn_offset3}")
        } else {
            format!("{op} R{rd}, R{rs}, R{rn_offset3}")
        }
    }

    fn move_compare_add_subtract_imm(&self, operation: Operation, rd: u8, offset8: u32) -> String {
        format!("{operation} R{rd}, #{offset8}")
    }

    fn branch_exchange(&self, rm: u8) -> String {
        format!("BX {}", register_name(rm))
    }

    fn pc_relative_load(&self, rd: u8, word8: u32) -> String {
        format!("LDR R{rd}, [PC, #{}]", word8 << 2)
    }

    fn push_pop(&self, pop: bool, pc_lr: bool, list: u8) -> String {
        if pop {
            let extra = pc_lr.then_some(REG_PROGRAM_COUNTER);
            format!("POP {}", register_list(list, extra))
        } else {
            let extra = pc_lr.then_some(REG_LINK_REGISTER);
            format!("PUSH {}", register_list(list, extra))
        }
    }

    fn conditional_branch(&self, condition: Condition, offset8: u64) -> String {
        let target = self.branch_target(sign_extend(offset8, 8) << 1);
        format!("B{condition} #0x{target:08X}")
    }

    fn software_interrupt(&self, comment: u8) -> String {
        format!("SWI #0x{comment:02X}")
    }

    fn unconditional_branch(&self, offset11: u64) -> String {
        let target = self.branch_target(sign_extend(offset11, 11) << 1);
        format!("B #0x{target:08X}")
    }
}

/// Compiles every encoding of the catalog, most specific first.
///
/// # Panics
///
/// If a pattern doesn't fit its handler, which is a bug in this table.
pub fn build_catalog() -> Vec<ThumbMatcher> {
    let mut table: Vec<ThumbMatcher> = vec![
        matcher!(Disassembler::move_shifted_register, "000ssvvvvvmmmddd"),
        matcher!(Disassembler::add_subtract, "00011iorrrsssddd"),
        matcher!(Disassembler::move_compare_add_subtract_imm, "001oodddvvvvvvvv"),
        matcher!(Disassembler::branch_exchange, "010001110mmmm000"),
        matcher!(Disassembler::pc_relative_load, "01001dddvvvvvvvv"),
        matcher!(Disassembler::push_pop, "1011o10rllllllll"),
        matcher!(Disassembler::conditional_branch, "1101ccccvvvvvvvv"),
        matcher!(Disassembler::software_interrupt, "11011111vvvvvvvv"),
        matcher!(Disassembler::unconditional_branch, "11100vvvvvvvvvvv"),
    ];

    // Stable, so encodings with the same specificity keep catalog order.
    table.sort_by_key(|m| Reverse(m.specificity()));
    table
}

/// The most specific encoding `word` is an instance of.
pub fn lookup(table: &[ThumbMatcher], word: u16) -> Option<&ThumbMatcher> {
    table.iter().find(|m| m.matches(word))
}

/// Disassembles `word` at the disassembler's current address.
pub fn disassemble(table: &[ThumbMatcher], disassembler: &mut Disassembler, word: u16) -> Option<String> {
    lookup(table, word).map(|m| m.call(disassembler, word))
}
