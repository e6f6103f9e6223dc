//! Module entry and exit.
//!
//! `init` runs once at load. On a machine the DMI table does not list it
//! finishes without touching the firmware and leaves the module inactive;
//! on a listed machine it probes exactly one [`LidWakeDevice`].

extern crate alloc;

use alloc::sync::Arc;

use lidwake_core::{kdebug, kinfo};
use lidwake_driver_api::{
    AcpiServices, DriverError, DriverRegistry, ManagedDriver, SystemIdentity,
};

use crate::device::LidWakeDevice;
use crate::lid::match_platform;

/// Loaded instance of the lid wakeup driver.
pub struct SurfaceGpeModule {
    device: Option<Arc<LidWakeDevice>>,
}

impl SurfaceGpeModule {
    /// Matches `identity` against the lid table and sets up the lid GPE.
    ///
    /// An unlisted machine is not an error: the module loads inactive.
    ///
    /// # Errors
    ///
    /// Returns the probe error if the machine is listed but the lid cannot
    /// be set up. Nothing stays registered with the firmware in that case.
    pub fn init(
        identity: &SystemIdentity,
        acpi: Arc<dyn AcpiServices>,
    ) -> Result<Self, DriverError> {
        let Some(entry) = match_platform(identity) else {
            kdebug!("surface_gpe: no lid quirk needed for this machine");
            return Ok(Self { device: None });
        };

        kinfo!(
            "surface_gpe: {} detected, lid on GPE {:#04x}",
            entry.ident,
            entry.driver_data.gpe_number
        );
        let device = LidWakeDevice::probe(entry.driver_data, acpi)?;
        Ok(Self {
            device: Some(Arc::new(device)),
        })
    }

    /// Returns `true` if a lid device was bound.
    pub fn is_active(&self) -> bool {
        self.device.is_some()
    }

    /// Returns the bound lid device.
    pub fn device(&self) -> Option<&Arc<LidWakeDevice>> {
        self.device.as_ref()
    }

    /// Returns the power-management handle to register with the host.
    pub fn lifecycle(&self) -> Option<Arc<dyn ManagedDriver>> {
        self.device
            .as_ref()
            .map(|dev| Arc::clone(dev) as Arc<dyn ManagedDriver>)
    }

    /// Hands the lid device's power hooks to `registry`.
    ///
    /// Returns `false` (and registers nothing) when the module is inactive.
    pub fn register(&self, registry: &mut DriverRegistry) -> bool {
        match self.lifecycle() {
            Some(pm) => {
                registry.register(crate::DRIVER_INFO.name, pm);
                true
            }
            None => false,
        }
    }

    /// Unloads the module: takes the driver off `registry`, then releases
    /// the lid GPE if one was bound.
    pub fn exit(self, registry: &mut DriverRegistry) {
        let Some(dev) = self.device else {
            return;
        };
        registry.unregister(crate::DRIVER_INFO.name);
        dev.remove();
    }
}
