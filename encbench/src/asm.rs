
use dynasmrt::{
    dynasm,
    DynasmApi,
    AssemblyOffset,
};

use crate::error::EncodeError;

/// Default base address reported for emitted code.
pub const DEFAULT_BASE_ADDR: usize = 0x0040_0000;

/// A reusable code buffer for the [dynasmrt] `dynasm!` macro.
///
/// [dynasmrt::Assembler] wants to own an executable mapping and there's no
/// way to rewind it, which means we'd be measuring `mmap()` every iteration.
/// This implements [DynasmApi] over a plain [Vec] with a fixed capacity,
/// so that [CodeBuffer::reset] only has to truncate it.
pub struct CodeBuffer {
    /// Base address of the emitted code (only used for reporting)
    pub base: usize,
    /// Maximum number of bytes accepted by the buffer
    pub cap: usize,
    /// Emitted bytes
    pub ops: Vec<u8>,
    /// Number of bytes the caller tried to emit since the last reset
    pub wanted: usize,
}

impl CodeBuffer {
    pub fn new(base: usize, cap: usize) -> Self {
        Self {
            base,
            cap,
            ops: Vec::with_capacity(cap),
            wanted: 0,
        }
    }

    /// Return the current offset (in bytes).
    pub fn cursor(&self) -> usize { self.ops.len() }

    /// Discard all emitted bytes. The allocation is kept.
    pub fn reset(&mut self) {
        self.ops.clear();
        self.wanted = 0;
    }

    /// Return the emitted bytes.
    pub fn code(&self) -> Result<&[u8], EncodeError> {
        if self.wanted > self.cap {
            return Err(EncodeError::Overflow {
                len: self.wanted,
                cap: self.cap
            });
        }
        Ok(&self.ops)
    }

}

// Required for implementing [DynasmApi].
impl Extend<u8> for CodeBuffer {
    fn extend<T>(&mut self, iter: T) where T: IntoIterator<Item=u8> {
        for b in iter {
            self.push(b);
        }
    }
}
// Required for implementing [DynasmApi].
impl <'a> Extend<&'a u8> for CodeBuffer {
    fn extend<T>(&mut self, iter: T) where T: IntoIterator<Item=&'a u8> {
        for b in iter {
            self.push(*b);
        }
    }
}

// NOTE: Bytes that don't fit are dropped and the overflow is reported by
// [CodeBuffer::code] instead of panicking in the middle of `dynasm!`.
impl DynasmApi for CodeBuffer {
    fn offset(&self) -> AssemblyOffset {
        AssemblyOffset(self.ops.len())
    }

    fn push(&mut self, byte: u8) {
        self.wanted += 1;
        if self.ops.len() < self.cap {
            self.ops.push(byte);
        }
    }

    fn align(&mut self, alignment: usize, with: u8) {
        let misalign = self.offset().0 % alignment;
        if misalign != 0 {
            for _ in misalign..alignment {
                self.push(with);
            }
        }
    }
}

/// Emit the benchmarked push/pop sequence with `dynasm!`.
///
/// The register list is spelled out (rather than looping over
/// [crate::seq::PUSH_ORDER] with `Rq(..)`) so that all of the encoding work
/// happens at compile-time, which is the whole point of this backend.
pub fn emit_push_pop_sequence<A: DynasmApi>(a: &mut A) {
    dynasm!(a
        ; .arch x64
        ; push rax
        ; push rcx
        ; push rdx
        ; push rbx
        ; push rbp
        ; push rsi
        ; push rdi
        ; push r8
        ; push r9
        ; push r10
        ; push r11
        ; push r12
        ; push r13
        ; push r14
        ; push r15
        ; pushfq

        ; popfq
        ; pop r15
        ; pop r14
        ; pop r13
        ; pop r12
        ; pop r11
        ; pop r10
        ; pop r9
        ; pop r8
        ; pop rdi
        ; pop rsi
        ; pop rbp
        ; pop rbx
        ; pop rdx
        ; pop rcx
        ; pop rax
    );
}
