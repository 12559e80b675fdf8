/// Page shift value (12 bits) for 4KB pages
pub const PAGE_SHIFT: usize = 12;
/// Standard page size (4096 bytes)
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;

/// Sentinel byte written to the start of each page to force commitment
pub const TOUCH_SENTINEL: u8 = 0xAB;
