
use crate::asm::{ CodeBuffer, emit_push_pop_sequence };
use crate::backend::EncoderBackend;
use crate::error::EncodeError;

/// [dynasmrt] backend.
///
/// Instructions are encoded by the `dynasm!` macro at compile-time, so the
/// runtime cost here is mostly copying bytes into [CodeBuffer].
pub struct DynasmBackend {
    buf: CodeBuffer,
}
impl DynasmBackend {
    pub const NAME: &'static str = "Dynasm";

    /// Capacity of the backing buffer. Plenty for the 48-byte sequence.
    const BUF_SIZE: usize = 0x1000;

    pub fn new(base: u64) -> Self {
        Self { buf: CodeBuffer::new(base as usize, Self::BUF_SIZE) }
    }
}

impl EncoderBackend for DynasmBackend {
    fn name(&self) -> &'static str { Self::NAME }

    fn reset(&mut self) {
        self.buf.reset();
    }

    fn emit(&mut self) -> Result<(), EncodeError> {
        emit_push_pop_sequence(&mut self.buf);
        Ok(())
    }

    fn code(&mut self) -> Result<&[u8], EncodeError> {
        self.buf.code()
    }
}
