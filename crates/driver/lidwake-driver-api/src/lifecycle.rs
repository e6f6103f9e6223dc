//! Driver lifecycle management trait.
//!
//! [`ManagedDriver`] provides the hooks the host's power-management
//! sequencer calls during system state transitions.

use super::error::DriverError;

/// Lifecycle trait for managed drivers.
///
/// State machine: `Active → Suspended ↔ Active → Shutdown`.
///
/// The host calls these methods serially for a given driver instance.
/// `suspend` and `resume` default to `Unsupported`, so drivers need only
/// override what they support.
pub trait ManagedDriver: Send + Sync {
    /// Prepares the device for a system sleep transition.
    ///
    /// An error aborts the transition; the host does not retry.
    ///
    /// Returns `Err(DriverError::Unsupported)` by default.
    fn suspend(&self) -> Result<(), DriverError> {
        Err(DriverError::Unsupported)
    }

    /// Restores the device after the system wakes up.
    ///
    /// Returns `Err(DriverError::Unsupported)` by default.
    fn resume(&self) -> Result<(), DriverError> {
        Err(DriverError::Unsupported)
    }

    /// Releases all hardware resources held by the driver.
    ///
    /// Best-effort: teardown failures are not actionable, so this returns `()`.
    fn shutdown(&self) {}
}
