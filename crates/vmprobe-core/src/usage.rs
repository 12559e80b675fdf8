//! Physical memory usage samples and the best-effort reporter.
//!
//! The probe only ever influences commitment by touching pages; the numbers
//! reported here come straight from the operating system's own accounting.

use log::warn;
use serde::Serialize;

use crate::platform::MemoryProvider;

/// Which physical-memory counter to sample.
///
/// The two kinds are not numerically comparable at a given instant:
/// [`UsageKind::Resident`] reflects the pages currently backing the process,
/// while [`UsageKind::Peak`] is the historical maximum and never decreases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageKind {
    /// Current resident set (working set on Windows).
    Resident,
    /// Peak resident set since process start.
    Peak,
}

impl std::fmt::Display for UsageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageKind::Resident => write!(f, "resident"),
            UsageKind::Peak => write!(f, "peak"),
        }
    }
}

/// Errors that can occur while querying the OS for memory usage.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// The underlying OS query failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The OS reported the counter in a shape we could not parse
    #[error("malformed content in {0}")]
    Malformed(&'static str),
}

/// One physical-memory measurement of the current process.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct UsageSample {
    /// The counter that was sampled
    pub kind: UsageKind,
    /// Sampled value in bytes
    pub bytes: u64,
}

impl UsageSample {
    /// The sampled value in fractional gibibytes.
    pub fn gib(&self) -> f64 {
        self.bytes as f64 / (1u64 << 30) as f64
    }
}

impl std::fmt::Display for UsageSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4} GiB ({})", self.gib(), self.kind)
    }
}

/// Prints the process's physical memory footprint to stdout, tagged with
/// `label`, and returns the sample.
///
/// This is diagnostic output only: if the OS query fails, a warning is
/// logged and the line is omitted instead of aborting the caller.
pub fn report(provider: &dyn MemoryProvider, label: &str, kind: UsageKind) -> Option<UsageSample> {
    match provider.usage(kind) {
        Ok(sample) => {
            println!(
                "[{}] physical memory ({}): {:.4} GiB",
                label,
                kind,
                sample.gib()
            );
            Some(sample)
        }
        Err(e) => {
            warn!("usage query failed for \"{}\": {}", label, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::platform::{MemoryProvider, NativeProvider};
    use crate::usage::{UsageKind, UsageSample};

    #[test]
    fn resident_sample_is_positive() -> anyhow::Result<()> {
        let sample = NativeProvider.usage(UsageKind::Resident)?;
        assert_eq!(sample.kind, UsageKind::Resident);
        assert!(sample.bytes > 0);
        Ok(())
    }

    #[test]
    fn peak_sample_is_positive() -> anyhow::Result<()> {
        let sample = NativeProvider.usage(UsageKind::Peak)?;
        assert_eq!(sample.kind, UsageKind::Peak);
        assert!(sample.bytes > 0);
        Ok(())
    }

    #[test]
    fn sample_formats_as_gib() {
        let sample = UsageSample {
            kind: UsageKind::Resident,
            bytes: 1 << 30,
        };
        assert_eq!(sample.gib(), 1.0);
        assert_eq!(sample.to_string(), "1.0000 GiB (resident)");

        let half = UsageSample {
            kind: UsageKind::Peak,
            bytes: 1 << 29,
        };
        assert_eq!(half.to_string(), "0.5000 GiB (peak)");
    }
}
