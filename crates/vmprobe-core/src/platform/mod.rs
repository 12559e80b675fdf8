//! The platform seam of the probe.
//!
//! [`MemoryProvider`] is the interface the scenario logic depends on:
//! reserving address space and sampling the process's physical footprint.
//! [`NativeProvider`] is the build-selected implementation, backed by
//! `mmap`/`/proc`/`getrusage` on Linux and `VirtualAlloc`/psapi on Windows.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
use self::linux as imp;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use self::windows as imp;

#[cfg(not(any(target_os = "linux", windows)))]
compile_error!("vmprobe supports only Linux and Windows targets");

use log::debug;

use crate::region::Region;
use crate::usage::{UsageError, UsageKind, UsageSample};
use crate::util::Size;

/// Errors that can occur while reserving address space.
///
/// Reservation is the only fatal failure of the probe: the caller is
/// expected to abort the containing scenario.
#[derive(Debug, thiserror::Error)]
pub enum ReserveError {
    /// A zero-size reservation was requested
    #[error("cannot reserve an empty region")]
    ZeroSize,
    /// The OS refused the reservation (address space exhausted, permissions)
    #[error(transparent)]
    Os(#[from] std::io::Error),
}

/// Platform memory provider.
///
/// Implementors supply address-space reservation and physical-usage
/// sampling for one platform. Scenario code depends only on this trait,
/// never on a specific OS API.
pub trait MemoryProvider {
    /// The page granularity at which the OS commits physical memory.
    fn page_size(&self) -> usize;

    /// Reserves `size` bytes of read/write anonymous address space.
    ///
    /// No physical commitment is implied: the OS is expected to back pages
    /// lazily on first touch, so the reservation succeeds even when that
    /// much physical memory is not available.
    ///
    /// # Errors
    ///
    /// Returns [`ReserveError`] carrying the platform error if the OS
    /// refuses the reservation. Callers must treat this as fatal for the
    /// containing scenario.
    fn reserve(&self, size: Size) -> Result<Region, ReserveError>;

    /// Samples the requested physical-memory counter for this process.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError`] if the OS query fails; callers treat this as
    /// a diagnostic failure, not a fatal one.
    fn usage(&self, kind: UsageKind) -> Result<UsageSample, UsageError>;
}

/// The memory provider of the build target.
#[derive(Debug, Default, Copy, Clone)]
pub struct NativeProvider;

impl MemoryProvider for NativeProvider {
    fn page_size(&self) -> usize {
        imp::page_size()
    }

    fn reserve(&self, size: Size) -> Result<Region, ReserveError> {
        if size.bytes() == 0 {
            return Err(ReserveError::ZeroSize);
        }
        let ptr = imp::reserve(size.bytes())?;
        debug!("reserved {} at {:p}", size, ptr);
        Ok(Region::new(ptr, size.bytes()))
    }

    fn usage(&self, kind: UsageKind) -> Result<UsageSample, UsageError> {
        let bytes = match kind {
            UsageKind::Resident => imp::resident_bytes()?,
            UsageKind::Peak => imp::peak_resident_bytes()?,
        };
        Ok(UsageSample { kind, bytes })
    }
}

/// Returns the entire span to the OS in one call. Used by [`Region::release`].
pub(crate) fn release(ptr: *mut u8, len: usize) -> std::io::Result<()> {
    imp::release(ptr, len)
}
