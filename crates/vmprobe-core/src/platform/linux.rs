//! Linux provider: `mmap`/`munmap` for the region, `/proc/self/statm` for
//! the resident set, `getrusage` for the peak.

use std::fs;
use std::io;
use std::ptr::null_mut;

use crate::usage::UsageError;

pub(crate) fn page_size() -> usize {
    match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
        -1 => crate::util::PAGE_SIZE,
        size => size as usize,
    }
}

/// Lazy anonymous reservation. Deliberately no `MAP_POPULATE`: committing
/// the pages is the job of the page toucher, not of the reservation.
pub(crate) fn reserve(len: usize) -> io::Result<*mut u8> {
    let p = unsafe {
        libc::mmap(
            null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    if p == libc::MAP_FAILED {
        return Err(io::Error::last_os_error());
    }
    Ok(p as *mut u8)
}

pub(crate) fn release(ptr: *mut u8, len: usize) -> io::Result<()> {
    match unsafe { libc::munmap(ptr as *mut libc::c_void, len) } {
        0 => Ok(()),
        _ => Err(io::Error::last_os_error()),
    }
}

const STATM_PATH: &str = "/proc/self/statm";

/// Current resident set in bytes.
///
/// The second field of statm is the resident page count.
pub(crate) fn resident_bytes() -> Result<u64, UsageError> {
    let statm = fs::read_to_string(STATM_PATH)?;
    let rss_pages: u64 = statm
        .split_whitespace()
        .nth(1)
        .ok_or(UsageError::Malformed(STATM_PATH))?
        .parse()
        .map_err(|_| UsageError::Malformed(STATM_PATH))?;
    Ok(rss_pages * page_size() as u64)
}

/// Peak resident set in bytes. `ru_maxrss` is reported in kilobytes on Linux.
pub(crate) fn peak_resident_bytes() -> Result<u64, UsageError> {
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) } != 0 {
        return Err(io::Error::last_os_error().into());
    }
    Ok(usage.ru_maxrss as u64 * 1024)
}

#[cfg(test)]
mod tests {
    use super::{page_size, peak_resident_bytes, resident_bytes};

    #[test]
    fn page_size_is_sane() {
        let size = page_size();
        assert!(size.is_power_of_two());
        assert!(size >= 4096);
    }

    #[test]
    fn counters_are_page_granular() -> anyhow::Result<()> {
        let resident = resident_bytes()?;
        assert_eq!(resident % page_size() as u64, 0);
        assert!(peak_resident_bytes()? > 0);
        Ok(())
    }
}
