//! The bound lid device and its power-management hooks.
//!
//! A [`LidWakeDevice`] exists only while the lid GPE is under this driver's
//! control. Probing it runs the full setup sequence:
//!
//! 1. resolve the lid object in the ACPI namespace,
//! 2. mark the lid GPE wake-capable,
//! 3. enable the GPE (runtime reference),
//! 4. force its wake mask to disabled.
//!
//! Steps 2 and 3 are held by a [`GpeRegistration`] guard, so a failure in
//! step 4 drops the guard and disables the GPE again before the error is
//! returned. The wake mask is armed only between `suspend` and `resume`.

extern crate alloc;

use alloc::sync::Arc;

use lidwake_core::sync::SpinLock;
use lidwake_core::{kdebug, kerr, kwarn};
use lidwake_driver_api::{
    AcpiHandle, AcpiPath, AcpiServices, Driver, DriverError, DriverInfo, DriverState,
    ManagedDriver,
};

use crate::lid::LidDevice;
use crate::wakeup::set_wake;

/// Runtime enable reference on a wake-capable GPE.
///
/// Dropping the guard releases the reference with `disable_gpe`.
struct GpeRegistration {
    acpi: Arc<dyn AcpiServices>,
    gpe: u32,
}

impl GpeRegistration {
    /// Marks `gpe` for wake and enables it.
    fn acquire(acpi: &Arc<dyn AcpiServices>, gpe: u32) -> Result<Self, DriverError> {
        acpi.mark_gpe_for_wake(gpe).map_err(|status| {
            kerr!("surface_gpe: failed to mark GPE {:#04x} for wake: {}", gpe, status);
            DriverError::Registration { gpe, status }
        })?;

        acpi.enable_gpe(gpe).map_err(|status| {
            kerr!("surface_gpe: failed to enable GPE {:#04x}: {}", gpe, status);
            DriverError::Registration { gpe, status }
        })?;

        Ok(Self {
            acpi: Arc::clone(acpi),
            gpe,
        })
    }
}

impl Drop for GpeRegistration {
    fn drop(&mut self) {
        if let Err(status) = self.acpi.disable_gpe(self.gpe) {
            kwarn!("surface_gpe: failed to disable GPE {:#04x}: {}", self.gpe, status);
        }
    }
}

/// State guarded by the transition lock.
struct Inner {
    state: DriverState,
    registration: Option<GpeRegistration>,
}

/// A lid whose GPE has been set up for wakeup.
///
/// Transitions (`suspend`, `resume`, `remove`) must be issued serially by the
/// host. A transition that overlaps another one panics.
pub struct LidWakeDevice {
    lid: &'static LidDevice,
    handle: AcpiHandle,
    acpi: Arc<dyn AcpiServices>,
    inner: SpinLock<Inner>,
}

impl LidWakeDevice {
    /// Sets up the lid GPE described by `lid`.
    ///
    /// On success the device is [`DriverState::Active`] with the wake mask
    /// cleared. On failure nothing stays registered with the firmware.
    ///
    /// # Errors
    ///
    /// - [`DriverError::ObjectNotFound`] if the lid object cannot be resolved.
    /// - [`DriverError::Registration`] if the GPE cannot be marked or enabled.
    /// - [`DriverError::WakeToggle`] if the wake mask cannot be cleared.
    pub fn probe(lid: &'static LidDevice, acpi: Arc<dyn AcpiServices>) -> Result<Self, DriverError> {
        let not_found = DriverError::ObjectNotFound {
            path: lid.acpi_path,
        };
        let path = AcpiPath::parse(lid.acpi_path).map_err(|e| {
            kerr!("surface_gpe: malformed lid path {}: {}", lid.acpi_path, e);
            not_found
        })?;
        let handle = acpi.get_handle(&path).map_err(|status| {
            kerr!("surface_gpe: lid device {} not found: {}", path, status);
            not_found
        })?;

        let registration = GpeRegistration::acquire(&acpi, lid.gpe_number)?;

        // Marking for wake may leave the mask set; runtime baseline is disarmed.
        if let Err(e) = set_wake(acpi.as_ref(), lid, false) {
            kerr!("surface_gpe: {}", e);
            return Err(e);
        }

        kdebug!(
            "surface_gpe: lid {} bound to GPE {:#04x}",
            path,
            lid.gpe_number
        );
        Ok(Self {
            lid,
            handle,
            acpi,
            inner: SpinLock::named(
                "surface_gpe.state",
                Inner {
                    state: DriverState::Active,
                    registration: Some(registration),
                },
            ),
        })
    }

    /// Returns the lid descriptor this device was bound with.
    pub fn lid(&self) -> &'static LidDevice {
        self.lid
    }

    /// Returns the firmware handle of the lid object.
    pub fn handle(&self) -> AcpiHandle {
        self.handle
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.inner.lock().state
    }

    /// Returns `true` while the wake mask is armed (between suspend and resume).
    pub fn wake_enabled(&self) -> bool {
        self.state() == DriverState::Suspended
    }

    /// Restores the pre-probe state: wake mask cleared, GPE disabled.
    ///
    /// Firmware failures are logged and do not stop the teardown. Calling
    /// this on a removed device does nothing.
    pub fn remove(&self) {
        let mut inner = self.inner.lock_uncontended();
        if !inner.state.is_live() {
            return;
        }

        if let Err(e) = set_wake(self.acpi.as_ref(), self.lid, false) {
            kwarn!("surface_gpe: {} during removal", e);
        }
        inner.registration = None;
        inner.state = DriverState::Shutdown;
        kdebug!("surface_gpe: GPE {:#04x} released", self.lid.gpe_number);
    }

    /// Moves the wake mask to `enable` if the device is in `from`, then
    /// enters `to`. The state is unchanged if the firmware call fails.
    fn transition(
        &self,
        from: DriverState,
        to: DriverState,
        enable: bool,
    ) -> Result<(), DriverError> {
        let mut inner = self.inner.lock_uncontended();
        if inner.state != from {
            kwarn!(
                "surface_gpe: wake toggle requested in state {:?}",
                inner.state
            );
            return Err(DriverError::InvalidState);
        }

        set_wake(self.acpi.as_ref(), self.lid, enable).inspect_err(|e| {
            kerr!("surface_gpe: {}", e);
        })?;
        inner.state = to;
        Ok(())
    }
}

impl Driver for LidWakeDevice {
    fn info(&self) -> DriverInfo {
        crate::DRIVER_INFO
    }
}

impl ManagedDriver for LidWakeDevice {
    fn suspend(&self) -> Result<(), DriverError> {
        self.transition(DriverState::Active, DriverState::Suspended, true)
    }

    fn resume(&self) -> Result<(), DriverError> {
        self.transition(DriverState::Suspended, DriverState::Active, false)
    }

    fn shutdown(&self) {
        self.remove();
    }
}

impl Drop for LidWakeDevice {
    fn drop(&mut self) {
        self.remove();
    }
}
