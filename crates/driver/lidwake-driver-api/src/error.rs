//! Driver error types.

use core::fmt;

use crate::firmware::FirmwareError;

/// Errors that can occur during driver operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// A firmware object named by the driver does not exist.
    ObjectNotFound {
        /// ACPI namespace path that failed to resolve.
        path: &'static str,
    },
    /// The firmware refused to set up a GPE for the driver.
    Registration {
        /// GPE number being registered.
        gpe: u32,
        /// Status reported by the firmware.
        status: FirmwareError,
    },
    /// Setting or clearing a GPE wake mask failed.
    WakeToggle {
        /// GPE number whose wake mask was being changed.
        gpe: u32,
        /// Requested wake state.
        enable: bool,
        /// Status reported by the firmware.
        status: FirmwareError,
    },
    /// The requested operation is not supported by this driver.
    Unsupported,
    /// The driver is not in a valid state for this operation.
    InvalidState,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectNotFound { path } => write!(f, "ACPI object {path} not found"),
            Self::Registration { gpe, status } => {
                write!(f, "failed to register GPE {gpe:#04x}: {status}")
            }
            Self::WakeToggle {
                gpe,
                enable,
                status,
            } => {
                let verb = if *enable { "enable" } else { "disable" };
                write!(f, "failed to {verb} wakeup for GPE {gpe:#04x}: {status}")
            }
            Self::Unsupported => f.write_str("operation not supported"),
            Self::InvalidState => f.write_str("invalid driver state"),
        }
    }
}

impl core::error::Error for DriverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_all_variants() {
        assert_eq!(
            format!("{}", DriverError::ObjectNotFound { path: "\\_SB.LID0" }),
            "ACPI object \\_SB.LID0 not found"
        );
        assert_eq!(
            format!(
                "{}",
                DriverError::Registration {
                    gpe: 0x17,
                    status: FirmwareError::BadParameter,
                }
            ),
            "failed to register GPE 0x17: AE_BAD_PARAMETER"
        );
        assert_eq!(
            format!(
                "{}",
                DriverError::WakeToggle {
                    gpe: 0x4f,
                    enable: true,
                    status: FirmwareError::Time,
                }
            ),
            "failed to enable wakeup for GPE 0x4f: AE_TIME"
        );
        assert_eq!(
            format!("{}", DriverError::Unsupported),
            "operation not supported"
        );
        assert_eq!(
            format!("{}", DriverError::InvalidState),
            "invalid driver state"
        );
    }

    #[test]
    fn error_equality() {
        let a = DriverError::WakeToggle {
            gpe: 0x4d,
            enable: false,
            status: FirmwareError::Error,
        };
        assert_eq!(a, a);
        assert_ne!(
            a,
            DriverError::WakeToggle {
                gpe: 0x4d,
                enable: true,
                status: FirmwareError::Error,
            }
        );
        assert_ne!(DriverError::Unsupported, DriverError::InvalidState);
    }
}
