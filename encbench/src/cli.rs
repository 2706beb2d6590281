//! Command-line arguments and logging setup shared by the binaries.

use clap::Parser;
use rand::seq::SliceRandom;

use crate::backend::BackendKind;
use crate::harness::HarnessConfig;

/// Measure how long it takes several x86-64 encoder libraries to emit the
/// same 32-instruction push/pop sequence.
///
/// Prints one '<backend> <elapsed> ms' line for each backend.
#[derive(Parser, Debug)]
#[command(name = "encbench", version, verbatim_doc_comment)]
pub struct BenchArgs {
    /// Number of encode iterations in each timed run.
    #[arg(short = 'n', long, default_value_t = 10_000,
        value_parser = clap::value_parser!(u64).range(1..))]
    pub iters: u64,

    /// A comma-separated list of backends to measure (default: all).
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub backends: Vec<BackendKind>,

    /// Number of timed runs for each backend. With more than one run, the
    /// median is reported and a summary table is printed.
    #[arg(short, long, default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..))]
    pub runs: u64,

    /// Number of untimed iterations before measuring.
    #[arg(short, long, default_value_t = 0)]
    pub warmup: u64,

    /// Address that code is assembled for (hex with '0x', or decimal).
    #[arg(long, value_name = "ADDR", default_value = "0x400000",
        value_parser = parse_addr)]
    pub base: u64,

    /// Pin to a specific CPU core before measuring.
    #[arg(long)]
    pub pin_core: Option<usize>,

    /// Run the backends in a random order.
    #[arg(long)]
    pub shuffle: bool,

    /// Don't decode and check the emitted code before measuring.
    #[arg(long)]
    pub no_verify: bool,

    /// Print a disassembly of the code emitted by each backend.
    #[arg(long)]
    pub disas: bool,

    /// Print a hexdump of the code emitted by each backend.
    #[arg(long)]
    pub dump: bool,

    /// Exit without waiting for a keypress.
    #[arg(long)]
    pub no_pause: bool,
}

impl BenchArgs {
    /// Build a [HarnessConfig] from these arguments.
    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig::default()
            .iters(self.iters as usize)
            .runs(self.runs as usize)
            .warmup(self.warmup as usize)
            .verify(!self.no_verify)
            .base_addr(self.base)
            .pinned_core(self.pin_core)
    }

    /// The backends to measure, in the order they should run.
    pub fn selected_backends(&self) -> Vec<BackendKind> {
        let mut res: Vec<BackendKind> = if self.backends.is_empty() {
            BackendKind::all().to_vec()
        } else {
            let mut v = Vec::new();
            for b in self.backends.iter() {
                if !v.contains(b) {
                    v.push(*b);
                }
            }
            v
        };
        if self.shuffle {
            res.shuffle(&mut rand::thread_rng());
        }
        res
    }
}

fn parse_addr(s: &str) -> Result<u64, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    }
}

/// Default filter when `RUST_LOG` isn't set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a `tracing` subscriber which writes to stderr, so that stdout only
/// carries results.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        BenchArgs::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = BenchArgs::try_parse_from(["encbench"]).unwrap();
        assert_eq!(args.iters, 10_000);
        assert_eq!(args.runs, 1);
        assert_eq!(args.selected_backends(), BackendKind::all().to_vec());
        let cfg = args.harness_config();
        assert!(cfg.verify);
        assert_eq!(cfg.iters, 10_000);
        assert_eq!(cfg.base_addr, HarnessConfig::default().base_addr);
    }

    #[test]
    fn base_address() {
        let args = BenchArgs::try_parse_from(["encbench", "--base", "0x1000"])
            .unwrap();
        assert_eq!(args.harness_config().base_addr, 0x1000);
        let args = BenchArgs::try_parse_from(["encbench", "--base", "4096"])
            .unwrap();
        assert_eq!(args.harness_config().base_addr, 0x1000);
        let args = BenchArgs::try_parse_from([
            "encbench", "--base", "0x7fff_0000_0000"
        ]).unwrap();
        assert_eq!(args.base, 0x7fff_0000_0000);

        assert!(BenchArgs::try_parse_from(["encbench", "--base", "0xzz"])
            .is_err());
        assert!(BenchArgs::try_parse_from(["encbench", "--base", "-1"])
            .is_err());
    }

    #[test]
    fn backend_list() {
        let args = BenchArgs::try_parse_from([
            "encbench", "-b", "iced-block,dynasm,iced-block"
        ]).unwrap();
        assert_eq!(args.selected_backends(),
            vec![BackendKind::IcedBlock, BackendKind::Dynasm]);
    }

    #[test]
    fn shuffle_keeps_backends() {
        let args = BenchArgs::try_parse_from(["encbench", "--shuffle"])
            .unwrap();
        let mut sel = args.selected_backends();
        assert_eq!(sel.len(), 4);
        sel.sort_by_key(|k| k.name());
        sel.dedup();
        assert_eq!(sel.len(), 4);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(BenchArgs::try_parse_from(["encbench", "-n", "0"]).is_err());
        assert!(BenchArgs::try_parse_from(["encbench", "-r", "0"]).is_err());
        assert!(BenchArgs::try_parse_from(["encbench", "-b", "xbyak"]).is_err());
    }

    #[test]
    fn flags() {
        let args = BenchArgs::try_parse_from([
            "encbench", "--no-verify", "--pin-core", "3", "-n", "5", "-w", "2",
        ]).unwrap();
        let cfg = args.harness_config();
        assert!(!cfg.verify);
        assert_eq!(cfg.pinned_core, Some(3));
        assert_eq!(cfg.iters, 5);
        assert_eq!(cfg.warmup, 2);
    }
}
