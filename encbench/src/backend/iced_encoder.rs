
use iced_x86::Encoder;

use crate::backend::{ EncoderBackend, iced_instruction };
use crate::error::EncodeError;
use crate::seq::SEQUENCE;

/// [iced_x86::Encoder] backend.
///
/// The lowest-level interface in iced: instructions are built from
/// [SEQUENCE] and encoded one at a time into the encoder's buffer. The buffer
/// is handed back and forth with [Encoder::take_buffer] and
/// [Encoder::set_buffer] so that it's never reallocated.
///
/// After [EncoderBackend::code], the bytes live in `code` and the encoder
/// holds an empty buffer; [EncoderBackend::emit] moves them back first, so
/// repeated `code()` calls (and emits without a reset) see the same bytes as
/// the other backends.
pub struct IcedEncoderBackend {
    enc: Encoder,
    base: u64,
    ip: u64,
    code: Vec<u8>,
}
impl IcedEncoderBackend {
    pub const NAME: &'static str = "IcedEncoder";

    pub fn new(base: u64) -> Self {
        Self {
            enc: Encoder::new(64),
            base,
            ip: base,
            code: Vec::with_capacity(0x1000),
        }
    }
}

impl EncoderBackend for IcedEncoderBackend {
    fn name(&self) -> &'static str { Self::NAME }

    fn reset(&mut self) {
        let mut buf = std::mem::take(&mut self.code);
        if buf.is_empty() {
            buf = self.enc.take_buffer();
        }
        buf.clear();
        self.enc.set_buffer(buf);
        self.ip = self.base;
    }

    fn emit(&mut self) -> Result<(), EncodeError> {
        if !self.code.is_empty() {
            let buf = std::mem::take(&mut self.code);
            self.enc.set_buffer(buf);
        }
        for op in SEQUENCE.iter() {
            let instr = iced_instruction(op)?;
            let len = self.enc.encode(&instr, self.ip)?;
            self.ip += len as u64;
        }
        Ok(())
    }

    fn code(&mut self) -> Result<&[u8], EncodeError> {
        let buf = self.enc.take_buffer();
        if !buf.is_empty() {
            self.code = buf;
        } else {
            self.enc.set_buffer(buf);
        }
        Ok(&self.code)
    }
}
