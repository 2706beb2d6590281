//! Harness configuration.

use crate::asm::DEFAULT_BASE_ADDR;
use crate::env::BenchEnv;
use crate::error::EnvError;
use crate::harness::BenchHarness;

/// Configuration passed to [HarnessConfig::build].
#[derive(Clone, Copy, Debug)]
pub struct HarnessConfig {
    /// Number of encode iterations in each timed run
    pub iters: usize,

    /// Number of timed runs for each backend
    pub runs: usize,

    /// Number of untimed iterations before the first timed run
    pub warmup: usize,

    /// Decode and check the emitted code before timing each backend
    pub verify: bool,

    /// Address that emitted code is assembled for
    pub base_addr: u64,

    /// Optionally pin the caller to a specific hardware thread.
    pub pinned_core: Option<usize>,
}

impl HarnessConfig {
    /// Default number of iterations per run.
    pub const DEFAULT_ITERS: usize = 10_000;
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            iters: Self::DEFAULT_ITERS,
            runs: 1,
            warmup: 0,
            verify: true,
            base_addr: DEFAULT_BASE_ADDR as u64,
            pinned_core: None,
        }
    }
}

impl HarnessConfig {
    pub fn iters(mut self, x: usize) -> Self {
        self.iters = x;
        self
    }

    pub fn runs(mut self, x: usize) -> Self {
        self.runs = x;
        self
    }

    pub fn warmup(mut self, x: usize) -> Self {
        self.warmup = x;
        self
    }

    pub fn verify(mut self, x: bool) -> Self {
        self.verify = x;
        self
    }

    pub fn base_addr(mut self, addr: u64) -> Self {
        self.base_addr = addr;
        self
    }

    pub fn pinned_core(mut self, x: Option<usize>) -> Self {
        self.pinned_core = x;
        self
    }
}

impl HarnessConfig {
    /// Create a [BenchHarness] using this configuration.
    ///
    /// If a core was requested, the current process is pinned here.
    pub fn build(self) -> Result<BenchHarness, EnvError> {
        if let Some(core) = self.pinned_core {
            BenchEnv::pin_to_core(core)?;
        }
        Ok(BenchHarness::new(self))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.iters, 10_000);
        assert_eq!(cfg.runs, 1);
        assert!(cfg.verify);
        assert!(cfg.pinned_core.is_none());
    }

    #[test]
    fn setters() {
        let cfg = HarnessConfig::default()
            .iters(5)
            .runs(3)
            .warmup(2)
            .verify(false)
            .base_addr(0x1000);
        assert_eq!((cfg.iters, cfg.runs, cfg.warmup), (5, 3, 2));
        assert!(!cfg.verify);
        assert_eq!(cfg.base_addr, 0x1000);
    }
}
