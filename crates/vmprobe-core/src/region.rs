//! Exclusive ownership of a reserved address-space span.

use std::io;

use log::debug;

/// An exclusively owned span of reserved virtual address space.
///
/// A `Region` is created by [`MemoryProvider::reserve`] and destroyed by
/// [`Region::release`]. Its reserved size never changes; only the number of
/// committed pages varies, and only the OS tracks that count. Because
/// `release` consumes the handle, use-after-release and double release are
/// compile errors.
///
/// [`MemoryProvider::reserve`]: crate::platform::MemoryProvider::reserve
#[derive(Debug)]
pub struct Region {
    ptr: *mut u8,
    len: usize,
}

unsafe impl Send for Region {}

impl Region {
    pub(crate) fn new(ptr: *mut u8, len: usize) -> Self {
        Region { ptr, len }
    }

    /// Returns a mutable pointer to the start of the region.
    pub fn ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Returns the reserved length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the region spans zero bytes. Never true for regions obtained
    /// from a provider, which rejects zero-size reservations.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a mutable pointer to the byte at the given offset.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is outside the region.
    pub fn addr(&self, offset: usize) -> *mut u8 {
        assert!(
            offset < self.len,
            "Region::addr failed. Offset {} >= {}",
            offset,
            self.len
        );
        unsafe { self.ptr.byte_add(offset) }
    }

    /// Returns the entire span to the OS in one call. Partial release is not
    /// supported.
    ///
    /// Consumes the handle, so the region cannot be touched or released
    /// again afterwards.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the OS rejects the release. Callers may
    /// treat this as a logged warning; the span is gone either way.
    pub fn release(self) -> io::Result<()> {
        debug!("releasing {} bytes at {:p}", self.len, self.ptr);
        crate::platform::release(self.ptr, self.len)
    }
}

#[cfg(test)]
mod tests {
    use crate::platform::{MemoryProvider, NativeProvider, ReserveError};
    use crate::util::Size;

    #[test]
    fn reserve_and_release() -> anyhow::Result<()> {
        let region = NativeProvider.reserve(Size::MB(4))?;
        assert!(!region.ptr().is_null());
        assert_eq!(region.len(), Size::MB(4).bytes());
        assert!(!region.is_empty());
        region.release()?;
        Ok(())
    }

    #[test]
    fn zero_size_reservation_is_rejected() {
        assert!(matches!(
            NativeProvider.reserve(Size::B(0)),
            Err(ReserveError::ZeroSize)
        ));
    }

    #[test]
    fn reservation_beyond_address_space_fails() {
        // 1 EiB is far past any x86-64 virtual address space.
        let absurd = Size::GB(1 << 30);
        assert!(matches!(
            NativeProvider.reserve(absurd),
            Err(ReserveError::Os(_))
        ));
    }

    #[test]
    #[should_panic(expected = "Region::addr failed")]
    fn addr_out_of_bounds_panics() {
        let region = NativeProvider.reserve(Size::KB(4)).unwrap();
        let _ = region.addr(Size::KB(4).bytes());
    }
}
