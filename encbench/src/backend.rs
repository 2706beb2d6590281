//! Encoder libraries under test.
//!
//! Every backend wraps one library behind [EncoderBackend] and emits the
//! same fixed sequence (see [crate::seq]). Backends own their encoder state
//! and are expected to reuse their buffers across iterations.

pub mod dynasm;
pub mod iced_asm;
pub mod iced_encoder;
pub mod iced_block;

pub use dynasm::DynasmBackend;
pub use iced_asm::IcedAsmBackend;
pub use iced_encoder::IcedEncoderBackend;
pub use iced_block::IcedBlockBackend;

use iced_x86::{ Instruction, IcedError };
use crate::error::EncodeError;
use crate::seq::SeqOp;

/// Interface to a single encoder library.
///
/// The timed loop calls these in order: [EncoderBackend::reset],
/// [EncoderBackend::emit], then [EncoderBackend::code].
pub trait EncoderBackend {
    /// Name printed in the results.
    fn name(&self) -> &'static str;

    /// Discard any previously-emitted code.
    fn reset(&mut self);

    /// Encode the push/pop sequence.
    fn emit(&mut self) -> Result<(), EncodeError>;

    /// Finish encoding (if the library needs an explicit step for that)
    /// and return the encoded bytes.
    fn code(&mut self) -> Result<&[u8], EncodeError>;
}

/// The set of available backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    /// dynasmrt: `dynasm!` macro into a reusable buffer
    Dynasm,
    /// iced-x86: `CodeAssembler`
    IcedAsm,
    /// iced-x86: `Encoder`, one instruction at a time
    IcedEncoder,
    /// iced-x86: `BlockEncoder` over an instruction list
    IcedBlock,
}
impl BackendKind {
    /// All backends, in the order they're run by default.
    pub const fn all() -> &'static [Self] {
        &[Self::Dynasm, Self::IcedAsm, Self::IcedEncoder, Self::IcedBlock]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dynasm => DynasmBackend::NAME,
            Self::IcedAsm => IcedAsmBackend::NAME,
            Self::IcedEncoder => IcedEncoderBackend::NAME,
            Self::IcedBlock => IcedBlockBackend::NAME,
        }
    }

    /// Create a fresh instance of this backend which emits code at `base`.
    pub fn build(&self, base: u64)
        -> Result<Box<dyn EncoderBackend>, EncodeError>
    {
        Ok(match self {
            Self::Dynasm => Box::new(DynasmBackend::new(base)),
            Self::IcedAsm => Box::new(IcedAsmBackend::new(base)?),
            Self::IcedEncoder => Box::new(IcedEncoderBackend::new(base)),
            Self::IcedBlock => Box::new(IcedBlockBackend::new(base)),
        })
    }
}

/// Build the [Instruction] for a single [SeqOp].
pub fn iced_instruction(op: &SeqOp) -> Result<Instruction, IcedError> {
    match op.reg() {
        Some(r) => Instruction::with1(op.code(), r.iced()),
        None => Ok(Instruction::with(op.code())),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::seq::*;

    #[test]
    fn all_backends_match_reference() {
        let expected = reference_encoding();
        for kind in BackendKind::all() {
            let mut b = kind.build(0x0040_0000).unwrap();
            assert_eq!(b.name(), kind.name());
            b.reset();
            b.emit().unwrap();
            assert_eq!(b.code().unwrap(), expected.as_slice(),
                "{} disagrees with the reference encoding", kind.name());
        }
    }

    #[test]
    fn all_backends_reset() {
        for kind in BackendKind::all() {
            let mut b = kind.build(0x0040_0000).unwrap();
            for _ in 0..8 {
                b.reset();
                b.emit().unwrap();
                assert_eq!(b.code().unwrap().len(), SEQUENCE_BYTES,
                    "{} didn't reset its buffer", kind.name());
            }
        }
    }

    #[test]
    fn code_is_stable() {
        for kind in BackendKind::all() {
            let mut b = kind.build(0x0040_0000).unwrap();
            b.reset();
            b.emit().unwrap();
            let first = b.code().unwrap().to_vec();
            let second = b.code().unwrap().to_vec();
            assert_eq!(first, second,
                "{} returned different bytes on the second call", kind.name());
            assert_eq!(second.len(), SEQUENCE_BYTES);
        }
    }

    #[test]
    fn emit_without_reset_appends() {
        let mut twice = reference_encoding();
        twice.extend(reference_encoding());
        for kind in BackendKind::all() {
            let mut b = kind.build(0x0040_0000).unwrap();
            b.reset();
            b.emit().unwrap();
            b.code().unwrap();
            b.emit().unwrap();
            assert_eq!(b.code().unwrap(), twice.as_slice(),
                "{} lost bytes between emits", kind.name());

            b.reset();
            b.emit().unwrap();
            assert_eq!(b.code().unwrap().len(), SEQUENCE_BYTES);
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = BackendKind::all().iter()
            .map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn instructions() {
        let i = iced_instruction(&SeqOp::Push(Gpr::R12)).unwrap();
        assert_eq!(i.code(), iced_x86::Code::Push_r64);
        assert_eq!(i.op0_register(), iced_x86::Register::R12);
        let i = iced_instruction(&SeqOp::Popfq).unwrap();
        assert_eq!(i.code(), iced_x86::Code::Popfq);
        assert_eq!(i.op_count(), 0);
    }
}
