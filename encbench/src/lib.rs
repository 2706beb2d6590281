//! Compare the throughput of x86-64 encoder libraries.
//!
//! Every backend in [backend] encodes the same short push/pop sequence
//! ([seq::SEQUENCE]) in a loop, and [harness::BenchHarness] measures how long
//! that takes.

pub mod asm;
pub mod backend;
pub mod cli;
pub mod env;
pub mod error;
pub mod harness;
pub mod seq;
pub mod stats;
pub mod verify;

pub use crate::backend::{ BackendKind, EncoderBackend };
pub use crate::error::{ EncodeError, EnvError };
pub use crate::harness::*;
pub use crate::stats::{ BenchResult, RunStats };
