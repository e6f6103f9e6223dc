//! Lid GPE wake-mask toggle.
//!
//! [`set_wake`] is the only code that changes the lid GPE's wake mask. The
//! probe baseline, suspend, resume and teardown all go through it.

use lidwake_core::ktrace;
use lidwake_driver_api::{AcpiServices, DriverError, GpeAction};

use crate::lid::LidDevice;

/// Sets (`enable = true`) or clears the wake mask of the lid GPE.
///
/// Idempotent as long as the firmware call is. Failures are returned as
/// [`DriverError::WakeToggle`]; no retry is attempted.
pub fn set_wake(acpi: &dyn AcpiServices, lid: &LidDevice, enable: bool) -> Result<(), DriverError> {
    let gpe = lid.gpe_number;
    ktrace!("surface_gpe: set wake mask of GPE {:#04x} to {}", gpe, enable);

    acpi.set_gpe_wake_mask(gpe, GpeAction::from_enable(enable))
        .map_err(|status| DriverError::WakeToggle {
            gpe,
            enable,
            status,
        })
}
