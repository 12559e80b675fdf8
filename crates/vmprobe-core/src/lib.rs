//! # vmprobe Core
//!
//! `vmprobe-core` is the library behind the vmprobe demand-paging probe. It
//! provides the small set of abstractions needed to demonstrate lazy versus
//! eager physical memory commitment:
//!
//! - [`platform::MemoryProvider`] - The platform seam: reserving address
//!   space and querying the process's physical memory footprint. The
//!   build-selected [`platform::NativeProvider`] implements it on top of
//!   `mmap`/`/proc` on Linux and `VirtualAlloc`/psapi on Windows.
//!
//! - [`region::Region`] - An exclusively owned span of reserved address
//!   space. Releasing consumes the handle, so use-after-release and double
//!   release are compile errors rather than undefined behavior.
//!
//! - [`touch::PageToucher`] - Forces physical commitment of a reserved
//!   region by writing one sentinel byte per page, which is sufficient to
//!   fault in every page without writing every byte.
//!
//! - [`usage`] module - Resident / peak footprint samples and the
//!   best-effort `[label] ... GiB` reporter.
//!
//! - [`util`] module - [`util::Size`] and page-size constants.
//!
//! ## Platform Support
//!
//! Linux (resident set via `/proc/self/statm`, peak via `getrusage`) and
//! Windows (working set and peak working set via `GetProcessMemoryInfo`).
//! The two counters are not numerically comparable at a given instant: the
//! peak counter is monotonically non-decreasing.

#![warn(missing_docs)]

pub mod platform;
pub mod region;
pub mod touch;
pub mod usage;
pub mod util;

pub use crate::platform::{MemoryProvider, NativeProvider, ReserveError};
pub use crate::region::Region;
pub use crate::touch::PageToucher;
pub use crate::usage::{UsageError, UsageKind, UsageSample};
