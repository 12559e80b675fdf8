//! # vmprobe
//!
//! vmprobe is a small demand-paging demonstration: it reserves a large
//! anonymous virtual-memory region, optionally touches one byte per page to
//! force physical commitment, and reports the process's physical footprint
//! before and after each step. Watching the numbers (or a system monitor)
//! makes the contrast between lazy and eager allocation visible.
//!
//! ## Quickstart guide
//!
//! ```sh
//! # Run both scenarios with the default 4 GiB region
//! cargo run --release
//!
//! # Automated run: 1 GiB, no pauses, JSON transcript
//! cargo run --release -- --size-gb 1 --skip-pauses --output transcript.json
//! ```
//!
//! The first scenario reserves the region and never touches it: the resident
//! set barely moves. The second touches every page and the resident set grows
//! by roughly the region size.
//!
//! ## Modules
//!
//! - `scenario`: Sequences reservation, touching, pausing, and release into
//!   the two named scenarios.
//!
//! The reusable pieces (platform provider, region ownership, page toucher,
//! usage sampler) live in the `vmprobe-core` crate.

pub mod scenario;

#[macro_use]
extern crate log;

use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

/// Initializes env_logger bridged with an indicatif [`MultiProgress`], so
/// log lines and the page-touch progress bar do not clobber each other.
pub fn init_logging_with_progress(default_filter: &str) -> anyhow::Result<MultiProgress> {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .build();
    let progress = MultiProgress::new();
    LogWrapper::new(progress.clone(), logger).try_init()?;
    Ok(progress)
}
