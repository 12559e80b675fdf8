//! Windows provider: `VirtualAlloc`/`VirtualFree` for the region,
//! `GetProcessMemoryInfo` working-set counters for usage.

use std::io;
use std::mem::size_of;

use windows_sys::Win32::System::Memory::{
    MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_READWRITE, VirtualAlloc, VirtualFree,
};
use windows_sys::Win32::System::ProcessStatus::{GetProcessMemoryInfo, PROCESS_MEMORY_COUNTERS};
use windows_sys::Win32::System::Threading::GetCurrentProcess;

use crate::usage::UsageError;

pub(crate) fn page_size() -> usize {
    crate::util::PAGE_SIZE
}

/// `MEM_RESERVE | MEM_COMMIT` charges the commit limit but still maps
/// physical pages lazily on first access, which is the behavior under
/// demonstration.
pub(crate) fn reserve(len: usize) -> io::Result<*mut u8> {
    let p = unsafe {
        VirtualAlloc(
            std::ptr::null(),
            len,
            MEM_RESERVE | MEM_COMMIT,
            PAGE_READWRITE,
        )
    };
    if p.is_null() {
        return Err(io::Error::last_os_error());
    }
    Ok(p as *mut u8)
}

pub(crate) fn release(ptr: *mut u8, _len: usize) -> io::Result<()> {
    // MEM_RELEASE requires a zero size and frees the whole allocation.
    match unsafe { VirtualFree(ptr as *mut core::ffi::c_void, 0, MEM_RELEASE) } {
        0 => Err(io::Error::last_os_error()),
        _ => Ok(()),
    }
}

fn memory_counters() -> Result<PROCESS_MEMORY_COUNTERS, UsageError> {
    let mut pmc: PROCESS_MEMORY_COUNTERS = unsafe { std::mem::zeroed() };
    pmc.cb = size_of::<PROCESS_MEMORY_COUNTERS>() as u32;
    let ok = unsafe { GetProcessMemoryInfo(GetCurrentProcess(), &mut pmc, pmc.cb) };
    if ok == 0 {
        return Err(io::Error::last_os_error().into());
    }
    Ok(pmc)
}

pub(crate) fn resident_bytes() -> Result<u64, UsageError> {
    Ok(memory_counters()?.WorkingSetSize as u64)
}

pub(crate) fn peak_resident_bytes() -> Result<u64, UsageError> {
    Ok(memory_counters()?.PeakWorkingSetSize as u64)
}
