//! Driver model and platform service contracts for quirk drivers.
//!
//! This crate defines the driver model the lid-wake drivers are written
//! against:
//!
//! - **Layer 0** -- Platform services ([`AcpiServices`]) and their status
//!   codes ([`FirmwareError`]), plus the ACPI namespace [`AcpiPath`] used to
//!   name firmware objects.
//! - **Layer 1** -- Base [`Driver`] trait providing identity and metadata.
//! - **Layer 2** -- Lifecycle ([`ManagedDriver`]) and the host-side
//!   [`DriverRegistry`] that sequences power transitions.
//! - **Layer 3** -- Machine identification ([`SystemIdentity`],
//!   [`DmiSystemId`]) for drivers bound by DMI match tables.
//!
//! [`sim::SimFirmware`] implements [`AcpiServices`] in memory for tests and
//! dry runs.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod dmi;
pub mod driver;
pub mod error;
pub mod firmware;
pub mod lifecycle;
pub mod path;
pub mod registry;
pub mod sim;

// Re-export all public types at the crate root for ergonomic imports.
pub use dmi::{DmiField, DmiStrMatch, DmiSystemId, SystemIdentity, dmi_first_match};
pub use driver::{Driver, DriverInfo, DriverState};
pub use error::DriverError;
pub use firmware::{AcpiHandle, AcpiServices, FirmwareError, GpeAction};
pub use lifecycle::ManagedDriver;
pub use path::{AcpiPath, NameSeg, PathError};
pub use registry::DriverRegistry;
