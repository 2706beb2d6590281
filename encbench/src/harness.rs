
pub mod config;
pub use config::*;

use std::hint::black_box;
use std::time::{ Duration, Instant };
use tracing::{ debug, info };

use crate::backend::{ BackendKind, EncoderBackend };
use crate::error::EncodeError;
use crate::stats::BenchResult;
use crate::verify::verify_sequence;

/// Runs the timed encode loop for each backend.
///
/// Each timed run looks like this:
///
/// 1. Read the clock
/// 2. For each iteration: reset the backend, emit the sequence, and pass the
///    resulting pointer and length to [black_box] so the work can't be
///    optimized away
/// 3. Read the clock again
///
/// Backends run one after another on the calling thread, and each backend
/// gets a fresh encoder instance.
pub struct BenchHarness {
    cfg: HarnessConfig,
}
impl BenchHarness {
    pub fn new(cfg: HarnessConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.cfg
    }

    /// Create a new instance of a backend and run it.
    pub fn run_kind(&self, kind: BackendKind)
        -> Result<BenchResult, EncodeError>
    {
        let mut backend = kind.build(self.cfg.base_addr)?;
        self.run(backend.as_mut())
    }

    /// Run the configured number of timed runs with a particular backend.
    pub fn run(&self, backend: &mut dyn EncoderBackend)
        -> Result<BenchResult, EncodeError>
    {
        let name = backend.name();
        if self.cfg.verify {
            let code = Self::encode_once(backend)?;
            verify_sequence(&code)?;
            debug!(backend = name, len = code.len(), "verified");
        }

        if self.cfg.warmup != 0 {
            Self::timed_loop(backend, self.cfg.warmup)?;
        }

        info!(backend = name, iters = self.cfg.iters, runs = self.cfg.runs,
            "measuring");
        let mut res = BenchResult::new(name, self.cfg.iters);
        for run in 0..self.cfg.runs {
            let elapsed = Self::timed_loop(backend, self.cfg.iters)?;
            debug!(backend = name, run, ?elapsed);
            res.push(elapsed);
        }
        Ok(res)
    }

    /// Encode the sequence once and return a copy of the bytes.
    pub fn encode_once(backend: &mut dyn EncoderBackend)
        -> Result<Vec<u8>, EncodeError>
    {
        backend.reset();
        backend.emit()?;
        let code = backend.code()?.to_vec();
        backend.reset();
        Ok(code)
    }

    /// Encode the sequence `iters` times and return the elapsed time.
    pub fn timed_loop(backend: &mut dyn EncoderBackend, iters: usize)
        -> Result<Duration, EncodeError>
    {
        let start = Instant::now();
        for _ in 0..iters {
            backend.reset();
            backend.emit()?;
            let code = backend.code()?;
            black_box((code.as_ptr(), code.len()));
        }
        let elapsed = start.elapsed();
        backend.reset();
        Ok(elapsed)
    }
}
