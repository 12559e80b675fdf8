//! Utility types used throughout the probe.
//!
//! - [`Size`] - Memory size representation
//! - Page constants ([`PAGE_SIZE`], [`PAGE_SHIFT`]) and the touch sentinel
//! - [`NamedProgress`] for labeled progress bars

mod constants;
mod named_progress;
mod size;

pub use self::constants::*;
pub use self::named_progress::NamedProgress;
pub use self::size::Size;
