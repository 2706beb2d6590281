
use iced_x86::code_asm::*;

use crate::backend::EncoderBackend;
use crate::error::EncodeError;

/// [iced_x86::code_asm::CodeAssembler] backend.
///
/// Each call records an [iced_x86::Instruction]; the actual encoding happens
/// in [CodeAssembler::assemble], which also allocates the output [Vec].
pub struct IcedAsmBackend {
    asm: CodeAssembler,
    base: u64,
    code: Vec<u8>,
}
impl IcedAsmBackend {
    pub const NAME: &'static str = "IcedAsm";

    pub fn new(base: u64) -> Result<Self, EncodeError> {
        Ok(Self {
            asm: CodeAssembler::new(64)?,
            base,
            code: Vec::new(),
        })
    }
}

impl EncoderBackend for IcedAsmBackend {
    fn name(&self) -> &'static str { Self::NAME }

    fn reset(&mut self) {
        self.asm.reset();
        self.code.clear();
    }

    fn emit(&mut self) -> Result<(), EncodeError> {
        let a = &mut self.asm;
        a.push(rax)?;
        a.push(rcx)?;
        a.push(rdx)?;
        a.push(rbx)?;
        a.push(rbp)?;
        a.push(rsi)?;
        a.push(rdi)?;
        a.push(r8)?;
        a.push(r9)?;
        a.push(r10)?;
        a.push(r11)?;
        a.push(r12)?;
        a.push(r13)?;
        a.push(r14)?;
        a.push(r15)?;
        a.pushfq()?;

        a.popfq()?;
        a.pop(r15)?;
        a.pop(r14)?;
        a.pop(r13)?;
        a.pop(r12)?;
        a.pop(r11)?;
        a.pop(r10)?;
        a.pop(r9)?;
        a.pop(r8)?;
        a.pop(rdi)?;
        a.pop(rsi)?;
        a.pop(rbp)?;
        a.pop(rbx)?;
        a.pop(rdx)?;
        a.pop(rcx)?;
        a.pop(rax)?;
        Ok(())
    }

    fn code(&mut self) -> Result<&[u8], EncodeError> {
        self.code = self.asm.assemble(self.base)?;
        Ok(&self.code)
    }
}
