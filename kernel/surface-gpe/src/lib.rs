//! Surface GPE/lid driver: enables wakeup from suspend via the lid.
//!
//! Wake events for a device such as the lid are normally described by the
//! ACPI `_PRW` object, and only GPEs referenced that way are left able to
//! wake the system. The lid device on Microsoft Surface machines has no
//! `_PRW`, so opening the lid cannot wake a suspended machine. This driver
//! recognizes the affected models by DMI, marks the lid GPE wake-capable
//! itself, and arms its wake mask only across suspend.
//!
//! - [`lid`] -- per-model lid descriptors and the DMI match table.
//! - [`wakeup`] -- the single wake-mask toggle used by every path.
//! - [`device`] -- the bound device instance and its power hooks.
//! - [`module`] -- module init/exit, owning at most one device.
//! - [`modalias`] -- `dmi:` module aliases derived from the table.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod device;
pub mod lid;
pub mod modalias;
pub mod module;
pub mod wakeup;

use lidwake_driver_api::DriverInfo;

pub use device::LidWakeDevice;
pub use lid::{DMI_LID_DEVICE_TABLE, LidDevice, match_platform};
pub use module::SurfaceGpeModule;

/// Static driver metadata.
pub const DRIVER_INFO: DriverInfo = DriverInfo {
    name: "surface_gpe",
    description: "Surface GPE/Lid Driver",
};
