//! Driver identity and the lifecycle states tracked for a bound driver.

/// Static metadata describing a driver.
#[derive(Debug, Clone, Copy)]
pub struct DriverInfo {
    /// Short name, also the key under which the host registers the driver.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// Lifecycle state of a bound driver.
///
/// `Active ⇄ Suspended → Shutdown`. The host marks a driver `Failed` when a
/// resume leaves it in an unknown state; shutdown is still attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Bound and running normally.
    Active,
    /// Prepared for system sleep.
    Suspended,
    /// Released its hardware; terminal.
    Shutdown,
    /// A power transition failed.
    Failed,
}

impl DriverState {
    /// Returns `true` while the driver still owns its hardware resources.
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Suspended)
    }
}

/// Implemented by every driver to expose its [`DriverInfo`].
pub trait Driver {
    /// Returns static information about this driver.
    fn info(&self) -> DriverInfo;
}
