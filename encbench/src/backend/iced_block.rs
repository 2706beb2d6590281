
use iced_x86::{
    BlockEncoder, BlockEncoderOptions, Instruction, InstructionBlock
};

use crate::backend::{ EncoderBackend, iced_instruction };
use crate::error::EncodeError;
use crate::seq::SEQUENCE;

/// [iced_x86::BlockEncoder] backend.
///
/// Builds a list of instructions, then serializes the whole list at a base
/// address. This is the only backend that could resolve branches between
/// instructions, so it pays for a relocation pass even though the sequence
/// doesn't have any.
pub struct IcedBlockBackend {
    instrs: Vec<Instruction>,
    base: u64,
    code: Vec<u8>,
}
impl IcedBlockBackend {
    pub const NAME: &'static str = "IcedBlock";

    pub fn new(base: u64) -> Self {
        Self {
            instrs: Vec::with_capacity(SEQUENCE.len()),
            base,
            code: Vec::new(),
        }
    }
}

impl EncoderBackend for IcedBlockBackend {
    fn name(&self) -> &'static str { Self::NAME }

    fn reset(&mut self) {
        self.instrs.clear();
        self.code.clear();
    }

    fn emit(&mut self) -> Result<(), EncodeError> {
        for op in SEQUENCE.iter() {
            self.instrs.push(iced_instruction(op)?);
        }
        Ok(())
    }

    fn code(&mut self) -> Result<&[u8], EncodeError> {
        let block = InstructionBlock::new(&self.instrs, self.base);
        let res = BlockEncoder::encode(64, block, BlockEncoderOptions::NONE)?;
        self.code = res.code_buffer;
        Ok(&self.code)
    }
}
