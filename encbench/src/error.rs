//! Error types.

use iced_x86::IcedError;

/// Errors raised while encoding or checking the benchmarked sequence.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("iced-x86: {0}")]
    Iced(#[from] IcedError),

    /// Assembled code doesn't fit into the backing buffer.
    #[error("emitted {len} bytes, but the buffer only holds {cap}")]
    Overflow { len: usize, cap: usize },

    /// The emitted bytes decoded to something other than the expected
    /// instruction.
    #[error("instruction {idx}: expected '{expected}', decoded '{found}'")]
    Mismatch { idx: usize, expected: String, found: String },

    /// The emitted bytes decoded to the wrong number of instructions.
    #[error("expected {expected} instructions, decoded {found}")]
    Count { expected: usize, found: usize },

    /// Decoding succeeded but the bytes differ from the reference encoding.
    #[error("encoding differs from reference at byte offset {offset}")]
    Bytes { offset: usize },

    #[error("invalid instruction at byte offset {offset}")]
    Invalid { offset: usize },
}

/// Errors raised while inspecting or configuring the host.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("couldn't read {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("unexpected contents in {path}: {value:?}")]
    Unexpected { path: String, value: String },

    #[error("{0}")]
    Nix(#[from] nix::Error),
}
