
use std::io::{ IsTerminal, Read, Write };
use anyhow::Context;
use clap::Parser;

use encbench::BackendKind;
use encbench::cli::{ BenchArgs, init_logging };
use encbench::env::BenchEnv;
use encbench::harness::BenchHarness;
use encbench::stats::summary_table;
use encbench::verify::disassemble;

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = BenchArgs::parse();

    let harness = args.harness_config().build()
        .context("couldn't set up the harness")?;
    BenchEnv::warn_if_noisy();

    let mut results = Vec::new();
    for kind in args.selected_backends() {
        if args.disas || args.dump {
            show_code(&harness, kind, &args)?;
        }
        let res = harness.run_kind(kind)
            .with_context(|| format!("{} failed", kind.name()))?;
        if let Some(line) = res.line() {
            println!("{}", line);
        }
        results.push(res);
    }

    if args.runs > 1 {
        println!();
        for line in summary_table(&results) {
            println!("{}", line);
        }
    }

    if !args.no_pause && std::io::stdin().is_terminal() {
        wait_for_keypress()?;
    }
    Ok(())
}

/// Print the code emitted by a backend (before it's measured).
fn show_code(harness: &BenchHarness, kind: BackendKind, args: &BenchArgs)
    -> anyhow::Result<()>
{
    let base = harness.config().base_addr;
    let mut backend = kind.build(base)?;
    let code = BenchHarness::encode_once(backend.as_mut())
        .with_context(|| format!("{} failed", kind.name()))?;

    println!("[*] {} ({} bytes)", kind.name(), code.len());
    if args.dump {
        println!("{}", pretty_hex::pretty_hex(&code));
    }
    if args.disas {
        for line in disassemble(&code, base) {
            println!("  {}", line);
        }
    }
    Ok(())
}

fn wait_for_keypress() -> anyhow::Result<()> {
    eprint!("Press Enter to exit...");
    std::io::stderr().flush()?;
    let mut buf = [0u8; 1];
    std::io::stdin().read(&mut buf).context("couldn't read stdin")?;
    Ok(())
}
