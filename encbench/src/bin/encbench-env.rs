
use encbench::cli::init_logging;
use encbench::env::BenchEnv;
use encbench::error::EnvError;

fn describe<T>(res: Result<T, EnvError>, f: impl FnOnce(T) -> String)
    -> String
{
    match res {
        Ok(x) => f(x),
        Err(EnvError::Io { source, .. })
            if source.kind() == std::io::ErrorKind::PermissionDenied
            => "<read error; are you root?>".to_string(),
        Err(EnvError::Io { .. }) => "<unavailable>".to_string(),
        Err(e) => format!("<{}>", e),
    }
}

fn enabled(en: bool) -> String {
    match en {
        true => "enabled [!!]".to_string(),
        false => "disabled".to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let num_cores = BenchEnv::online_cores()?;
    let isol = describe(BenchEnv::sysfs_isolated(), |s| s);
    let smt = describe(BenchEnv::sysfs_smt_enabled(), enabled);
    let boost = describe(BenchEnv::sysfs_cpufreq_boost_enabled(), enabled);
    let gov = describe(BenchEnv::sysfs_cpufreq_governor(0), |s| s);

    println!("[*] 'encbench' environment summary:");
    println!("  {:<40}: {}", "online cores", num_cores);
    println!("  {:<40}: {}", "isolated cores", isol);
    println!("  {:<40}: {}", "simultaneous multithreading (SMT)", smt);
    println!("  {:<40}: {}", "cpufreq boost", boost);
    println!("  {:<40}: {}", "cpufreq scaling (core 0)", gov);
    Ok(())
}
