//! The scenario driver.
//!
//! A scenario is a strictly linear sequence over one owned region:
//! `sample → reserve → sample → (touch → sample)? → pause → release → sample`.
//! There is no branching back, no concurrency, and no retry; the only abort
//! path is a failed reservation. Scenarios run one at a time, each releasing
//! its region before the next begins, so two multi-GiB reservations are
//! never live at once.

use std::io::Read;
use std::time::{Duration, Instant};

use indicatif::MultiProgress;
use serde::Serialize;
use vmprobe_core::platform::{MemoryProvider, ReserveError};
use vmprobe_core::touch::PageToucher;
use vmprobe_core::usage::{self, UsageKind};
use vmprobe_core::util::Size;

/// How a scenario pauses for external observation.
///
/// Pauses exist purely so an operator can watch a system monitor; they carry
/// no ordering guarantee beyond wall-clock delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pause {
    /// No pause, for automated runs.
    None,
    /// Sleep for a fixed duration.
    Timed(Duration),
    /// Block until the operator presses Enter.
    Interactive,
}

impl Pause {
    /// Performs the pause.
    pub fn wait(&self) {
        match self {
            Pause::None => {}
            Pause::Timed(delay) => {
                info!("sleeping for {:?}", delay);
                std::thread::sleep(*delay);
            }
            Pause::Interactive => {
                println!("Press Enter to continue...");
                let mut buf = [0u8; 1];
                let _ = std::io::stdin().read(&mut buf);
            }
        }
    }
}

/// Configuration of a single scenario.
///
/// The region size is passed in explicitly (defaulting to 4 GiB at the CLI);
/// there is no process-wide size global.
#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    /// Human-readable scenario name, printed in the banner lines.
    pub name: String,
    /// Size of the region to reserve.
    pub size: Size,
    /// Whether to touch every page after reserving.
    pub force_touch: bool,
    /// Whether to sample usage between reservation and touching. The two
    /// variants of the original demo differ exactly here.
    pub sample_before_touch: bool,
    /// Observation pause before releasing the region.
    pub pause: Pause,
    /// Which physical-memory counter to report.
    pub usage_kind: UsageKind,
}

impl ScenarioConfig {
    /// The Lazy Allocation scenario: reserve, never touch, release. The
    /// resident set should stay effectively unchanged across the reserve.
    pub fn lazy(size: Size) -> Self {
        ScenarioConfig {
            name: "Lazy Allocation".into(),
            size,
            force_touch: false,
            sample_before_touch: true,
            pause: Pause::Timed(Duration::from_secs(2)),
            usage_kind: UsageKind::Resident,
        }
    }

    /// The Force Commit scenario: reserve, touch every page, release. The
    /// resident set should rise by approximately the region size.
    pub fn force_commit(size: Size) -> Self {
        ScenarioConfig {
            name: "Force Commit".into(),
            force_touch: true,
            ..Self::lazy(size)
        }
    }
}

/// One usage sample taken at a named step of a scenario.
#[derive(Clone, Debug, Serialize)]
pub struct StepSample {
    /// The step label, e.g. `"after touching pages"`.
    pub label: String,
    /// Sampled footprint in bytes.
    pub bytes: u64,
    /// Sampled footprint in gibibytes, as printed.
    pub gib: f64,
    /// Milliseconds since the scenario started.
    pub elapsed_ms: u64,
}

/// Machine-readable transcript of one scenario run.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Reserved region size in bytes.
    pub size_bytes: usize,
    /// Pages touched by the force-commit step, if it ran.
    pub pages_touched: Option<usize>,
    /// Usage samples in step order. Steps whose OS query failed are absent.
    pub samples: Vec<StepSample>,
    /// Total scenario wall time in milliseconds.
    pub duration_ms: u64,
}

impl ScenarioReport {
    /// Looks up the sample recorded at the step with the given label.
    pub fn sample(&self, label: &str) -> Option<&StepSample> {
        self.samples.iter().find(|s| s.label == label)
    }

    fn record(
        &mut self,
        provider: &dyn MemoryProvider,
        label: &str,
        kind: UsageKind,
        started: Instant,
    ) {
        if let Some(sample) = usage::report(provider, label, kind) {
            self.samples.push(StepSample {
                label: label.into(),
                bytes: sample.bytes,
                gib: sample.gib(),
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
        }
    }
}

/// Errors that abort a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The address-space reservation failed. Always fatal: the caller is
    /// expected to terminate the process with a non-zero status.
    #[error("reservation failed: {0}")]
    Reserve(#[from] ReserveError),
}

/// Runs one scenario to completion.
///
/// Usage-query failures only skip the affected sample, and a failed release
/// is logged as a warning; the reservation is the single fatal step.
///
/// # Errors
///
/// Returns [`ScenarioError::Reserve`] if the OS refuses the reservation.
pub fn run_scenario(
    provider: &dyn MemoryProvider,
    config: &ScenarioConfig,
    progress: Option<&MultiProgress>,
) -> Result<ScenarioReport, ScenarioError> {
    println!("\n--- Starting scenario: {} ---", config.name);
    let started = Instant::now();
    let mut report = ScenarioReport {
        name: config.name.clone(),
        size_bytes: config.size.bytes(),
        pages_touched: None,
        samples: Vec::new(),
        duration_ms: 0,
    };

    report.record(provider, "before allocation", config.usage_kind, started);

    let region = provider.reserve(config.size)?;
    info!("reserved {} of virtual address space", config.size);
    if !config.force_touch || config.sample_before_touch {
        report.record(
            provider,
            "after allocation (before touch)",
            config.usage_kind,
            started,
        );
    }

    if config.force_touch {
        info!("touching all pages to force commitment");
        let toucher =
            PageToucher::new(progress.cloned()).with_page_size(provider.page_size());
        report.pages_touched = Some(toucher.commit(&region));
        report.record(provider, "after touching pages", config.usage_kind, started);
    }

    config.pause.wait();

    if let Err(e) = region.release() {
        warn!("release failed: {}", e);
    } else {
        info!("memory released");
    }
    report.record(provider, "after free", config.usage_kind, started);

    report.duration_ms = started.elapsed().as_millis() as u64;
    println!("--- Scenario finished: {} ---", config.name);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{Pause, ScenarioConfig};
    use std::time::Duration;
    use vmprobe_core::usage::UsageKind;
    use vmprobe_core::util::Size;

    #[test]
    fn scenario_presets() {
        let lazy = ScenarioConfig::lazy(Size::GB(4));
        assert!(!lazy.force_touch);
        assert_eq!(lazy.pause, Pause::Timed(Duration::from_secs(2)));
        assert_eq!(lazy.usage_kind, UsageKind::Resident);

        let commit = ScenarioConfig::force_commit(Size::GB(4));
        assert!(commit.force_touch);
        assert!(commit.sample_before_touch);
        assert_eq!(commit.size, Size::GB(4));
    }
}
