//! Synchronization primitives.
//!
//! Provides [`SpinLock`], const-constructable and usable before any
//! scheduler is available.

mod spinlock;

pub use spinlock::{SpinLock, SpinLockGuard};
