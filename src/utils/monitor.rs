#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// 單一階段的耗時與記憶體快照
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub duration: Duration,
    pub memory_mb: u64,
    pub cpu_usage: f32,
}

#[cfg(feature = "cli")]
#[derive(Debug, Default)]
struct MonitorState {
    phase_started: Option<Instant>,
    peak_memory_mb: u64,
    phases: Vec<PhaseStats>,
}

#[cfg(feature = "cli")]
pub struct BuildMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    start_time: Instant,
    state: Mutex<MonitorState>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl BuildMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = sysinfo::get_current_pid().ok();
        if enabled && pid.is_none() {
            tracing::warn!("Unable to resolve current PID; memory sampling disabled");
        }

        Self {
            system: Mutex::new(System::new()),
            pid,
            start_time: Instant::now(),
            state: Mutex::new(MonitorState::default()),
            enabled,
        }
    }

    fn sample(&self) -> Option<(u64, f32)> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        let process = system.process(pid)?;
        Some((process.memory() / 1024 / 1024, process.cpu_usage()))
    }

    pub fn begin_phase(&self) {
        if !self.enabled {
            return;
        }
        if let Ok(mut state) = self.state.lock() {
            state.phase_started = Some(Instant::now());
        }
    }

    /// 結束目前階段並記錄統計
    pub fn end_phase(&self, phase: &str) {
        if !self.enabled {
            return;
        }
        let (memory_mb, cpu_usage) = self.sample().unwrap_or((0, 0.0));
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        let duration = state
            .phase_started
            .take()
            .map(|started| started.elapsed())
            .unwrap_or_default();
        state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);

        tracing::info!(
            "📊 {} - {:?}, Memory: {}MB, CPU: {:.1}%",
            phase,
            duration,
            memory_mb,
            cpu_usage
        );

        state.phases.push(PhaseStats {
            phase: phase.to_string(),
            duration,
            memory_mb,
            cpu_usage,
        });
    }

    pub fn phases(&self) -> Vec<PhaseStats> {
        self.state
            .lock()
            .map(|state| state.phases.clone())
            .unwrap_or_default()
    }

    pub fn log_summary(&self) {
        if !self.enabled {
            return;
        }
        let peak = self.state.lock().map(|s| s.peak_memory_mb).unwrap_or(0);
        tracing::info!(
            "📊 Build finished in {:?}, peak memory {}MB",
            self.start_time.elapsed(),
            peak
        );
    }
}

#[cfg(feature = "cli")]
impl Default for BuildMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 建置時的空實作
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct BuildMonitor;

#[cfg(not(feature = "cli"))]
impl BuildMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn begin_phase(&self) {}

    pub fn end_phase(&self, _phase: &str) {}

    pub fn log_summary(&self) {}
}
