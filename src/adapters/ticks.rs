//! CPU tick-counter adapters.
//!
//! - **Linux**: the aggregate `cpu` line of `/proc/stat`
//!   (`cpu  user nice system idle iowait …`, in USER_HZ ticks).
//! - **macOS**: `host_statistics(HOST_CPU_LOAD_INFO)`, whose
//!   `cpu_ticks` are ordered user, system, idle, nice.
//! - **elsewhere**: [`UnsupportedTicks`] always reports
//!   [`TickError::Unavailable`], which puts the sampler on its fallback.
//!
//! [`HostTicks`] names whichever one fits the build target.

use std::path::PathBuf;

use crate::app::ports::TickSource;
use crate::error::TickError;
use crate::sensors::cpu::TickSnapshot;

/// Parse the aggregate `cpu` line of a `/proc/stat` dump.
pub fn parse_proc_stat(content: &str) -> Result<TickSnapshot, TickError> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or(TickError::Malformed)?;

    let fields = line
        .split_whitespace()
        .skip(1)
        .take(4)
        .map(str::parse::<u64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TickError::Malformed)?;

    match fields[..] {
        [user, nice, system, idle] => Ok(TickSnapshot::new(user, system, idle, nice)),
        _ => Err(TickError::Malformed),
    }
}

/// Reads `/proc/stat` (or another file in the same format).
pub struct ProcStatTicks {
    path: PathBuf,
}

impl Default for ProcStatTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcStatTicks {
    pub fn new() -> Self {
        Self::with_path("/proc/stat")
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TickSource for ProcStatTicks {
    fn read_ticks(&mut self) -> Result<TickSnapshot, TickError> {
        let content = std::fs::read_to_string(&self.path).map_err(|_| TickError::ReadFailed)?;
        parse_proc_stat(&content)
    }
}

/// Tick source for platforms without a readable counter file.
#[derive(Default)]
pub struct UnsupportedTicks;

impl TickSource for UnsupportedTicks {
    fn read_ticks(&mut self) -> Result<TickSnapshot, TickError> {
        Err(TickError::Unavailable)
    }
}

/// Snapshot from a Mach `cpu_ticks` array (user, system, idle, nice).
///
/// The kernel counters are 32-bit and wrap; a wrapped interval reads as a
/// regression, which the sampler saturates to zero.
pub fn snapshot_from_cpu_ticks(ticks: [u32; 4]) -> TickSnapshot {
    let [user, system, idle, nice] = ticks.map(u64::from);
    TickSnapshot::new(user, system, idle, nice)
}

#[cfg(target_os = "macos")]
mod mach {
    use log::warn;

    use super::snapshot_from_cpu_ticks;
    use crate::app::ports::TickSource;
    use crate::error::TickError;
    use crate::sensors::cpu::TickSnapshot;

    const HOST_CPU_LOAD_INFO: libc::integer_t = 3;
    const CPU_STATE_MAX: usize = 4;

    #[repr(C)]
    #[derive(Default)]
    struct HostCpuLoadInfo {
        cpu_ticks: [libc::natural_t; CPU_STATE_MAX],
    }

    const HOST_CPU_LOAD_INFO_COUNT: libc::mach_msg_type_number_t =
        (size_of::<HostCpuLoadInfo>() / size_of::<libc::integer_t>()) as libc::mach_msg_type_number_t;

    unsafe extern "C" {
        fn mach_host_self() -> libc::mach_port_t;
        fn host_statistics(
            host: libc::mach_port_t,
            flavor: libc::integer_t,
            info: *mut libc::integer_t,
            count: *mut libc::mach_msg_type_number_t,
        ) -> libc::kern_return_t;
    }

    /// Aggregate CPU load counters from the Mach host port.
    pub struct MachTicks {
        host: libc::mach_port_t,
    }

    impl Default for MachTicks {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MachTicks {
        pub fn new() -> Self {
            // The host port name is stable for the life of the task.
            let host = unsafe { mach_host_self() };
            Self { host }
        }
    }

    impl TickSource for MachTicks {
        fn read_ticks(&mut self) -> Result<TickSnapshot, TickError> {
            let mut info = HostCpuLoadInfo::default();
            let mut count = HOST_CPU_LOAD_INFO_COUNT;
            let kr = unsafe {
                host_statistics(
                    self.host,
                    HOST_CPU_LOAD_INFO,
                    (&raw mut info).cast::<libc::integer_t>(),
                    &raw mut count,
                )
            };
            if kr != libc::KERN_SUCCESS {
                warn!("host_statistics(HOST_CPU_LOAD_INFO) failed: {}", kr);
                return Err(TickError::ReadFailed);
            }
            if count < HOST_CPU_LOAD_INFO_COUNT {
                return Err(TickError::Malformed);
            }
            Ok(snapshot_from_cpu_ticks(info.cpu_ticks))
        }
    }
}

#[cfg(target_os = "macos")]
pub use mach::MachTicks;

#[cfg(target_os = "linux")]
pub type HostTicks = ProcStatTicks;

#[cfg(target_os = "macos")]
pub type HostTicks = MachTicks;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub type HostTicks = UnsupportedTicks;
