//! Inspecting (and pinning) the host before taking measurements.

use tracing::{ debug, warn };

use crate::error::EnvError;

/// Utilities for inspecting the state of the machine and the current process.
///
/// None of this is required for running benchmarks, but boost clocks and SMT
/// siblings are the usual reasons for results that don't reproduce.
pub struct BenchEnv;
impl BenchEnv {
    const BOOST_PATH: &'static str =
        "/sys/devices/system/cpu/cpufreq/boost";
    const SMT_PATH: &'static str =
        "/sys/devices/system/cpu/smt/control";
    const ISOLATED_PATH: &'static str =
        "/sys/devices/system/cpu/isolated";

    fn read_trimmed(path: &str) -> Result<String, EnvError> {
        std::fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .map_err(|source| EnvError::Io { path: path.to_string(), source })
    }

    /// Return the number of online cores.
    pub fn online_cores() -> Result<usize, EnvError> {
        let n = nix::unistd::sysconf(
            nix::unistd::SysconfVar::_NPROCESSORS_ONLN
        )?;
        Ok(n.map(|n| n as usize).unwrap_or(1))
    }

    /// Returns true if cpufreq boost is enabled.
    pub fn sysfs_cpufreq_boost_enabled() -> Result<bool, EnvError> {
        let res = Self::read_trimmed(Self::BOOST_PATH)?;
        parse_switch(Self::BOOST_PATH, &res, "1", "0")
    }

    /// Returns true if SMT is enabled.
    pub fn sysfs_smt_enabled() -> Result<bool, EnvError> {
        let res = Self::read_trimmed(Self::SMT_PATH)?;
        // 'forceoff' and 'notsupported' both mean there are no siblings
        match res.as_str() {
            "forceoff" | "notsupported" | "notimplemented" => Ok(false),
            _ => parse_switch(Self::SMT_PATH, &res, "on", "off"),
        }
    }

    /// Return a string describing the set of isolated cores.
    pub fn sysfs_isolated() -> Result<String, EnvError> {
        let res = Self::read_trimmed(Self::ISOLATED_PATH)?;
        match res.as_str() {
            "" => Ok("none".to_string()),
            _ => Ok(res),
        }
    }

    /// Return the cpufreq scaling governor for a particular core.
    pub fn sysfs_cpufreq_governor(n: usize) -> Result<String, EnvError> {
        let path = format!(
            "/sys/devices/system/cpu/cpufreq/policy{}/scaling_governor", n
        );
        Self::read_trimmed(&path)
    }

    /// Pin the current process to a particular core.
    pub fn pin_to_core(core: usize) -> Result<(), EnvError> {
        let this_pid = nix::unistd::Pid::from_raw(0);
        let mut cpuset = nix::sched::CpuSet::new();
        cpuset.set(core)?;
        nix::sched::sched_setaffinity(this_pid, &cpuset)?;
        debug!(core, "pinned to core");
        Ok(())
    }

    /// Log a warning for each setting that tends to make timings noisy.
    /// Settings that can't be read are skipped.
    pub fn warn_if_noisy() {
        match Self::sysfs_cpufreq_boost_enabled() {
            Ok(true) => warn!("cpufreq boost is enabled; timings may vary"),
            Ok(false) => {},
            Err(e) => debug!("{}", e),
        }
        match Self::sysfs_smt_enabled() {
            Ok(true) => warn!("SMT is enabled; timings may vary"),
            Ok(false) => {},
            Err(e) => debug!("{}", e),
        }
    }
}

fn parse_switch(path: &str, value: &str, on: &str, off: &str)
    -> Result<bool, EnvError>
{
    if value == on {
        Ok(true)
    } else if value == off {
        Ok(false)
    } else {
        Err(EnvError::Unexpected {
            path: path.to_string(),
            value: value.to_string()
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn switch() {
        assert!(parse_switch("x", "on", "on", "off").unwrap());
        assert!(!parse_switch("x", "0", "1", "0").unwrap());
        assert!(matches!(parse_switch("x", "2", "1", "0"),
            Err(EnvError::Unexpected { .. })));
    }

    #[test]
    fn cores() {
        assert!(BenchEnv::online_cores().unwrap() >= 1);
    }

    #[test]
    fn missing_file() {
        let res = BenchEnv::sysfs_cpufreq_governor(usize::MAX);
        assert!(matches!(res, Err(EnvError::Io { .. })));
    }
}
