//! ACPI firmware service contract for drivers.
//!
//! Drivers use [`AcpiServices`] to resolve namespace objects and to control
//! general-purpose events (GPEs) without depending on a particular ACPI
//! implementation. The host passes an implementation to the driver at probe
//! time.

use core::fmt;

use crate::path::AcpiPath;

/// Failure status returned by the firmware.
///
/// Variants mirror the ACPICA exceptions the GPE and namespace calls can
/// report and display as their `AE_*` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareError {
    /// Unspecified failure (`AE_ERROR`).
    Error,
    /// A namespace object was not found (`AE_NOT_FOUND`).
    NotFound,
    /// Wrong object type, e.g. a GPE that cannot wake (`AE_TYPE`).
    Type,
    /// A reference count would underflow or overflow (`AE_LIMIT`).
    Limit,
    /// The hardware did not respond in time (`AE_TIME`).
    Time,
    /// An argument was out of range, e.g. an unknown GPE number (`AE_BAD_PARAMETER`).
    BadParameter,
}

impl FirmwareError {
    /// Returns the ACPICA exception name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "AE_ERROR",
            Self::NotFound => "AE_NOT_FOUND",
            Self::Type => "AE_TYPE",
            Self::Limit => "AE_LIMIT",
            Self::Time => "AE_TIME",
            Self::BadParameter => "AE_BAD_PARAMETER",
        }
    }
}

impl fmt::Display for FirmwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl core::error::Error for FirmwareError {}

/// Opaque handle to a resolved ACPI namespace object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcpiHandle(u64);

impl AcpiHandle {
    /// Wraps a raw firmware handle value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Requested wake-mask state for a GPE (`ACPI_GPE_ENABLE` / `ACPI_GPE_DISABLE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpeAction {
    /// Allow the GPE to wake the system.
    Enable,
    /// Prevent the GPE from waking the system.
    Disable,
}

impl GpeAction {
    /// Maps a boolean wake request to an action.
    pub const fn from_enable(enable: bool) -> Self {
        if enable { Self::Enable } else { Self::Disable }
    }
}

/// ACPI services provided to drivers by the host.
///
/// All GPEs are addressed in the FADT-defined GPE blocks (no GPE device),
/// so only the GPE number is passed.
pub trait AcpiServices: Send + Sync {
    /// Resolves an absolute namespace path to an object handle.
    fn get_handle(&self, path: &AcpiPath) -> Result<AcpiHandle, FirmwareError>;

    /// Marks a GPE as wake-capable, as a `_PRW` object would.
    fn mark_gpe_for_wake(&self, gpe: u32) -> Result<(), FirmwareError>;

    /// Takes a runtime reference on a GPE, enabling it once the count
    /// becomes non-zero.
    fn enable_gpe(&self, gpe: u32) -> Result<(), FirmwareError>;

    /// Drops a runtime reference taken by [`enable_gpe`](Self::enable_gpe).
    fn disable_gpe(&self, gpe: u32) -> Result<(), FirmwareError>;

    /// Sets or clears the wake-mask bit of a wake-capable GPE.
    ///
    /// Idempotent: repeating the same action has no further effect.
    fn set_gpe_wake_mask(&self, gpe: u32, action: GpeAction) -> Result<(), FirmwareError>;
}
