//! CPU load sampler.
//!
//! Utilization is computed from the delta between two cumulative tick
//! snapshots:
//!
//! ```text
//!   total_diff = Σ(now) - Σ(prev)        Σ = user + system + idle + nice
//!   idle_diff  = idle(now) - idle(prev)
//!   usage      = clamp(1 - idle_diff / total_diff, 0, 1)    (0 if total_diff == 0)
//! ```
//!
//! When the counters cannot be read, a slowly varying pseudo-random value
//! stands in so the pet keeps a plausible cadence.

use log::{debug, warn};

use crate::app::ports::{CpuListener, TickSource};
use crate::fsm::IdleFrequency;
use crate::rng::Prng;

/// Cumulative tick counters, summed over every core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSnapshot {
    pub user: u64,
    pub system: u64,
    pub idle: u64,
    pub nice: u64,
}

impl TickSnapshot {
    pub const fn new(user: u64, system: u64, idle: u64, nice: u64) -> Self {
        Self {
            user,
            system,
            idle,
            nice,
        }
    }

    pub fn total(&self) -> u64 {
        self.user
            .saturating_add(self.system)
            .saturating_add(self.idle)
            .saturating_add(self.nice)
    }
}

/// Utilization over the interval between `prev` and `now`, in `[0, 1]`.
///
/// Counter regressions (reset or wraparound) saturate to a zero delta.
pub fn utilization(prev: &TickSnapshot, now: &TickSnapshot) -> f64 {
    let total_diff = now.total().saturating_sub(prev.total());
    if total_diff == 0 {
        return 0.0;
    }
    let idle_diff = now.idle.saturating_sub(prev.idle);
    let usage = 1.0 - (idle_diff as f64 / total_diff as f64);
    usage.clamp(0.0, 1.0)
}

/// Degraded-mode stand-in, stable within each wall-clock minute.
pub fn fallback_usage(unix_secs: u64) -> f64 {
    let mut rng = Prng::from_seed(unix_secs / 60);
    let base = 0.1 + rng.next_f64() * 0.4;
    let variance = (rng.next_f64() - 0.5) * 0.2;
    (base + variance).clamp(0.0, 1.0)
}

/// One sampler result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuReading {
    /// Utilization in `[0, 1]`.
    pub usage: f64,
    /// `false` when the value came from [`fallback_usage`].
    pub measured: bool,
}

/// Delta-based CPU sampler.
pub struct CpuSampler {
    last: TickSnapshot,
    medium_threshold: f64,
    high_threshold: f64,
    last_reading: Option<CpuReading>,
    fallback_count: u32,
}

impl CpuSampler {
    pub fn new(medium_threshold: f64, high_threshold: f64) -> Self {
        Self {
            last: TickSnapshot::default(),
            medium_threshold,
            high_threshold,
            last_reading: None,
            fallback_count: 0,
        }
    }

    /// Establish the baseline snapshot.  The reading is discarded.
    pub fn prime(&mut self, ticks: &mut dyn TickSource, unix_secs: u64) {
        let _ = self.sample(ticks, unix_secs);
        self.last_reading = None;
    }

    /// Read the counters and compute utilization against the stored
    /// snapshot, which is then replaced.  A failed read keeps the stored
    /// snapshot and returns the fallback value.
    pub fn sample(&mut self, ticks: &mut dyn TickSource, unix_secs: u64) -> CpuReading {
        let reading = match ticks.read_ticks() {
            Ok(now) => {
                let usage = utilization(&self.last, &now);
                self.last = now;
                CpuReading {
                    usage,
                    measured: true,
                }
            }
            Err(e) => {
                self.fallback_count = self.fallback_count.saturating_add(1);
                if self.fallback_count == 1 {
                    warn!("CPU: {}, using fallback load values", e);
                }
                CpuReading {
                    usage: fallback_usage(unix_secs),
                    measured: false,
                }
            }
        };
        debug!(
            "CPU: {:.0}%{}",
            reading.usage * 100.0,
            if reading.measured { "" } else { " (fallback)" }
        );
        self.last_reading = Some(reading);
        reading
    }

    /// Sample and report to `listener`.
    pub fn poll(
        &mut self,
        ticks: &mut dyn TickSource,
        unix_secs: u64,
        listener: &mut dyn CpuListener,
    ) -> CpuReading {
        let reading = self.sample(ticks, unix_secs);
        listener.on_cpu_usage(reading.usage, self.classify(reading.usage), reading.measured);
        reading
    }

    /// Idle cadence implied by `usage`.
    pub fn classify(&self, usage: f64) -> IdleFrequency {
        IdleFrequency::from_usage(usage, self.medium_threshold, self.high_threshold)
    }

    /// Most recent reported reading (`None` until the first poll).
    pub fn last_reading(&self) -> Option<CpuReading> {
        self.last_reading
    }

    /// Stored baseline snapshot.
    pub fn snapshot(&self) -> TickSnapshot {
        self.last
    }

    /// Number of reads that fell back since construction.
    pub fn fallback_count(&self) -> u32 {
        self.fallback_count
    }
}
