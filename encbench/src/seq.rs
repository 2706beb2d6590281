//! The fixed instruction sequence emitted by every backend.
//!
//! Each benchmark iteration saves the integer general-purpose registers
//! (apart from RSP) and RFLAGS, then restores them in reverse order:
//!
//! ```text
//! push rax .. push r15 ; pushfq ; popfq ; pop r15 .. pop rax
//! ```
//!
//! That's 32 instructions, and 48 bytes once encoded.

use iced_x86::{ Code, Register };

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gpr {
    Rax = 0,
    Rcx = 1,
    Rdx = 2,
    Rbx = 3,
    Rsp = 4,
    Rbp = 5,
    Rsi = 6,
    Rdi = 7,
    R8  = 8,
    R9  = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    R14 = 14,
    R15 = 15,
}
impl Gpr {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Returns true if encoding this register needs a REX.B prefix.
    pub fn is_extended(&self) -> bool {
        self.as_u8() >= 8
    }

    /// The matching [iced_x86::Register].
    pub fn iced(&self) -> Register {
        match self {
            Self::Rax => Register::RAX,
            Self::Rcx => Register::RCX,
            Self::Rdx => Register::RDX,
            Self::Rbx => Register::RBX,
            Self::Rsp => Register::RSP,
            Self::Rbp => Register::RBP,
            Self::Rsi => Register::RSI,
            Self::Rdi => Register::RDI,
            Self::R8  => Register::R8,
            Self::R9  => Register::R9,
            Self::R10 => Register::R10,
            Self::R11 => Register::R11,
            Self::R12 => Register::R12,
            Self::R13 => Register::R13,
            Self::R14 => Register::R14,
            Self::R15 => Register::R15,
        }
    }
}

/// A single instruction in the benchmarked sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeqOp {
    Push(Gpr),
    Pushfq,
    Popfq,
    Pop(Gpr),
}
impl SeqOp {
    /// The [iced_x86::Code] used to encode this instruction.
    pub fn code(&self) -> Code {
        match self {
            Self::Push(_) => Code::Push_r64,
            Self::Pushfq  => Code::Pushfq,
            Self::Popfq   => Code::Popfq,
            Self::Pop(_)  => Code::Pop_r64,
        }
    }

    /// The register operand (if any).
    pub fn reg(&self) -> Option<Gpr> {
        match self {
            Self::Push(r) | Self::Pop(r) => Some(*r),
            Self::Pushfq | Self::Popfq => None,
        }
    }

    /// Reference encoding for this instruction.
    ///
    /// PUSH/POP r64 are `50+r`/`58+r`, with REX.B (0x41) for R8-R15.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        let (opc, reg) = match self {
            Self::Pushfq => { buf.push(0x9c); return; },
            Self::Popfq  => { buf.push(0x9d); return; },
            Self::Push(r) => (0x50, *r),
            Self::Pop(r)  => (0x58, *r),
        };
        if reg.is_extended() {
            buf.push(0x41);
        }
        buf.push(opc + (reg.as_u8() & 0x7));
    }

    /// Length of the reference encoding in bytes.
    pub fn len(&self) -> usize {
        match self.reg() {
            Some(r) if r.is_extended() => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for SeqOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push(r) => write!(f, "push {:?}", r),
            Self::Pop(r)  => write!(f, "pop {:?}", r),
            Self::Pushfq  => write!(f, "pushfq"),
            Self::Popfq   => write!(f, "popfq"),
        }
    }
}

/// Registers saved by the sequence, in push order.
pub const PUSH_ORDER: [Gpr; 15] = [
    Gpr::Rax, Gpr::Rcx, Gpr::Rdx, Gpr::Rbx, Gpr::Rbp, Gpr::Rsi, Gpr::Rdi,
    Gpr::R8, Gpr::R9, Gpr::R10, Gpr::R11, Gpr::R12, Gpr::R13, Gpr::R14,
    Gpr::R15,
];

/// Number of instructions in [SEQUENCE].
pub const SEQUENCE_LEN: usize = 2 * PUSH_ORDER.len() + 2;

/// Number of bytes in [reference_encoding].
pub const SEQUENCE_BYTES: usize = 48;

const fn build_sequence() -> [SeqOp; SEQUENCE_LEN] {
    let n = PUSH_ORDER.len();
    let mut res = [SeqOp::Pushfq; SEQUENCE_LEN];
    let mut i = 0;
    while i < n {
        res[i] = SeqOp::Push(PUSH_ORDER[i]);
        res[SEQUENCE_LEN - 1 - i] = SeqOp::Pop(PUSH_ORDER[i]);
        i += 1;
    }
    res[n] = SeqOp::Pushfq;
    res[n + 1] = SeqOp::Popfq;
    res
}

/// The full benchmarked sequence.
pub const SEQUENCE: [SeqOp; SEQUENCE_LEN] = build_sequence();

/// Encode [SEQUENCE] by hand.
pub fn reference_encoding() -> Vec<u8> {
    let mut buf = Vec::with_capacity(SEQUENCE_BYTES);
    for op in SEQUENCE.iter() {
        op.encode_into(&mut buf);
    }
    buf
}
