#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub phase_time: Duration,
    pub elapsed_time: Duration,
}

/// Process resource usage sampled between pipeline phases.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    inner: Option<MonitorState>,
}

#[cfg(feature = "cli")]
struct MonitorState {
    system: std::sync::Mutex<System>,
    pid: Pid,
    start_time: Instant,
    last_phase: std::sync::Mutex<Instant>,
    peak_memory: std::sync::Mutex<u64>,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self { inner: None };
        }

        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(e) => {
                tracing::warn!("System monitoring disabled, cannot resolve current PID: {}", e);
                return Self { inner: None };
            }
        };

        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();

        let now = Instant::now();
        Self {
            inner: Some(MonitorState {
                system: std::sync::Mutex::new(system),
                pid,
                start_time: now,
                last_phase: std::sync::Mutex::new(now),
                peak_memory: std::sync::Mutex::new(0),
            }),
        }
    }

    /// Samples usage and resets the phase timer.
    pub fn sample(&self) -> Option<PhaseStats> {
        let state = self.inner.as_ref()?;

        let mut system = state.system.lock().ok()?;
        system.refresh_all();
        let process = system.process(state.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = state.peak_memory.lock().ok()?;
        *peak = (*peak).max(memory_mb);

        let mut last = state.last_phase.lock().ok()?;
        let phase_time = last.elapsed();
        *last = Instant::now();

        Some(PhaseStats {
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: memory_mb,
            peak_memory_mb: *peak,
            phase_time,
            elapsed_time: state.start_time.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.sample() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Phase: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.phase_time
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(stats) = self.sample() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                stats.elapsed_time,
                stats.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 環境的空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let monitor = SystemMonitor::new(false);
        assert!(!monitor.is_enabled());
        assert!(monitor.sample().is_none());
    }
}
