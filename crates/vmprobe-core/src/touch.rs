//! Forcing physical commitment of a reserved region.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::debug;

use crate::region::Region;
use crate::util::{NamedProgress, PAGE_SIZE, TOUCH_SENTINEL};

/// Walks a reserved region at page granularity and writes one sentinel byte
/// per page, which is enough to fault in every page without writing every
/// byte of the region.
///
/// Offsets are visited in strictly increasing order, so runs are
/// deterministic. A commit-time failure (the host running out of physical
/// memory under overcommit) is left to the OS and terminates the process;
/// that abrupt end is part of what the demo shows.
pub struct PageToucher {
    page_size: usize,
    sentinel: u8,
    progress: Option<MultiProgress>,
}

impl PageToucher {
    /// Creates a toucher with the standard 4 KiB page step and the 0xAB
    /// sentinel. Pass a [`MultiProgress`] to get a progress bar; a 4 GiB
    /// region is around a million pages.
    pub fn new(progress: Option<MultiProgress>) -> Self {
        PageToucher {
            page_size: PAGE_SIZE,
            sentinel: TOUCH_SENTINEL,
            progress,
        }
    }

    /// Overrides the page step.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be non-zero");
        self.page_size = page_size;
        self
    }

    /// Touches every page of `region` and returns the number of pages
    /// touched (a trailing partial page counts as one).
    ///
    /// The write is volatile so the loop cannot be elided by the optimizer.
    pub fn commit(&self, region: &Region) -> usize {
        let total = region.len().div_ceil(self.page_size);
        debug!(
            "touching {} pages ({} byte step) at {:p}",
            total,
            self.page_size,
            region.ptr()
        );
        let bar = self.progress.as_ref().map(|p| {
            p.add(
                ProgressBar::new(total as u64)
                    .with_style(ProgressStyle::named_bar("Touching pages")),
            )
        });
        let mut touched = 0usize;
        for offset in (0..region.len()).step_by(self.page_size) {
            unsafe { std::ptr::write_volatile(region.addr(offset), self.sentinel) };
            touched += 1;
            // update coarsely; a per-page tick would dominate the loop
            if let Some(bar) = &bar
                && touched.is_multiple_of(4096)
            {
                bar.inc(4096);
            }
        }
        if let Some(bar) = &bar {
            bar.finish_and_clear();
        }
        debug!("touched {} pages", touched);
        touched
    }
}

#[cfg(test)]
mod tests {
    use crate::platform::{MemoryProvider, NativeProvider};
    use crate::touch::PageToucher;
    use crate::util::{PAGE_SIZE, Size, TOUCH_SENTINEL};

    #[test]
    fn sentinel_lands_on_every_page() -> anyhow::Result<()> {
        let region = NativeProvider.reserve(Size::KB(64))?;
        let touched = PageToucher::new(None).commit(&region);
        assert_eq!(touched, 16);
        for offset in (0..region.len()).step_by(PAGE_SIZE) {
            let byte = unsafe { std::ptr::read_volatile(region.addr(offset)) };
            assert_eq!(byte, TOUCH_SENTINEL);
        }
        // the rest of each page stays zero-filled anonymous memory
        let neighbor = unsafe { std::ptr::read_volatile(region.addr(1)) };
        assert_eq!(neighbor, 0);
        region.release()?;
        Ok(())
    }

    #[test]
    fn trailing_partial_page_counts() -> anyhow::Result<()> {
        let region = NativeProvider.reserve(Size::B(PAGE_SIZE + 1))?;
        let touched = PageToucher::new(None).commit(&region);
        assert_eq!(touched, 2);
        region.release()?;
        Ok(())
    }

    #[test]
    fn custom_page_step() -> anyhow::Result<()> {
        let region = NativeProvider.reserve(Size::KB(64))?;
        let touched = PageToucher::new(None)
            .with_page_size(2 * PAGE_SIZE)
            .commit(&region);
        assert_eq!(touched, 8);
        region.release()?;
        Ok(())
    }
}
