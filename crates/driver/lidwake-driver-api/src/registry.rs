//! Host-side registry of managed drivers.
//!
//! Drivers that probed successfully are registered here with their
//! lifecycle handle. The registry tracks each driver's [`DriverState`] and
//! sequences system-wide power transitions: suspend in registration order,
//! resume and shutdown in reverse order.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use lidwake_core::{kdebug, kerr, kinfo, kwarn};

use crate::driver::DriverState;
use crate::error::DriverError;
use crate::lifecycle::ManagedDriver;

/// Per-driver tracking record.
struct DriverEntry {
    name: String,
    state: DriverState,
    lifecycle: Arc<dyn ManagedDriver>,
}

/// Registry of probed drivers and their lifecycle state.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: Vec<DriverEntry>,
}

impl DriverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            drivers: Vec::new(),
        }
    }

    /// Registers a probed driver as [`DriverState::Active`].
    pub fn register(&mut self, name: &str, lifecycle: Arc<dyn ManagedDriver>) {
        kinfo!("DriverRegistry: registered driver '{}'", name);
        self.drivers.push(DriverEntry {
            name: name.to_string(),
            state: DriverState::Active,
            lifecycle,
        });
    }

    /// Removes the named driver and returns its lifecycle handle.
    ///
    /// The driver is not shut down; the caller releases it.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn ManagedDriver>> {
        let idx = self.drivers.iter().position(|e| e.name == name)?;
        let entry = self.drivers.remove(idx);
        kinfo!("DriverRegistry: unregistered driver '{}'", name);
        Some(entry.lifecycle)
    }

    /// Returns the tracked state of the named driver.
    pub fn state(&self, name: &str) -> Option<DriverState> {
        self.drivers
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.state)
    }

    /// Returns the number of registered drivers.
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Returns `true` if no driver is registered.
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Suspends all active drivers in registration order.
    ///
    /// Drivers without suspend support (`Unsupported`) stay active. If a
    /// driver fails to suspend, the drivers suspended so far are resumed in
    /// reverse order and the suspend error is returned, aborting the
    /// transition. A driver that also fails that resume is left
    /// [`DriverState::Failed`].
    pub fn suspend_all(&mut self) -> Result<(), DriverError> {
        for i in 0..self.drivers.len() {
            let entry = &mut self.drivers[i];
            if entry.state != DriverState::Active {
                continue;
            }
            match entry.lifecycle.suspend() {
                Ok(()) => {
                    kdebug!("DriverRegistry: suspended '{}'", entry.name);
                    entry.state = DriverState::Suspended;
                }
                Err(DriverError::Unsupported) => {}
                Err(e) => {
                    kerr!("DriverRegistry: suspend of '{}' failed: {}", entry.name, e);
                    if let Err(rollback) = self.resume_range(0..i) {
                        kwarn!("DriverRegistry: suspend rollback incomplete: {}", rollback);
                    }
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Resumes all suspended drivers in reverse registration order.
    ///
    /// A driver that fails to resume is marked [`DriverState::Failed`];
    /// the remaining drivers are still resumed. Returns the first error.
    pub fn resume_all(&mut self) -> Result<(), DriverError> {
        let len = self.drivers.len();
        self.resume_range(0..len)
    }

    fn resume_range(&mut self, range: core::ops::Range<usize>) -> Result<(), DriverError> {
        let mut first_err = None;
        for entry in self.drivers[range].iter_mut().rev() {
            if entry.state != DriverState::Suspended {
                continue;
            }
            match entry.lifecycle.resume() {
                Ok(()) => {
                    kdebug!("DriverRegistry: resumed '{}'", entry.name);
                    entry.state = DriverState::Active;
                }
                Err(e) => {
                    kerr!("DriverRegistry: resume of '{}' failed: {}", entry.name, e);
                    entry.state = DriverState::Failed;
                    first_err.get_or_insert(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Performs orderly shutdown of all live drivers in reverse
    /// registration order.
    pub fn shutdown_all(&mut self) {
        for entry in self.drivers.iter_mut().rev() {
            if !entry.state.is_live() {
                if entry.state == DriverState::Failed {
                    kwarn!("DriverRegistry: shutting down failed driver '{}'", entry.name);
                } else {
                    continue;
                }
            }
            kinfo!("DriverRegistry: shutting down driver '{}'", entry.name);
            entry.lifecycle.shutdown();
            entry.state = DriverState::Shutdown;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::FirmwareError;
    use lidwake_core::sync::SpinLock;

    const RESUME_ERROR: DriverError = DriverError::WakeToggle {
        gpe: 0x4d,
        enable: false,
        status: FirmwareError::Time,
    };

    /// Records lifecycle calls into a shared journal.
    struct Probe {
        name: &'static str,
        journal: Arc<SpinLock<Vec<String>>>,
        fail_suspend: bool,
        fail_resume: bool,
        pm: bool,
    }

    impl ManagedDriver for Probe {
        fn suspend(&self) -> Result<(), DriverError> {
            if !self.pm {
                return Err(DriverError::Unsupported);
            }
            self.journal.lock().push(format!("suspend {}", self.name));
            if self.fail_suspend {
                Err(DriverError::InvalidState)
            } else {
                Ok(())
            }
        }

        fn resume(&self) -> Result<(), DriverError> {
            self.journal.lock().push(format!("resume {}", self.name));
            if self.fail_resume {
                Err(RESUME_ERROR)
            } else {
                Ok(())
            }
        }

        fn shutdown(&self) {
            self.journal.lock().push(format!("shutdown {}", self.name));
        }
    }

    /// Builds a registry from `(name, supports_pm, fail_suspend, fail_resume)`.
    fn registry(
        specs: &[(&'static str, bool, bool, bool)],
    ) -> (DriverRegistry, Arc<SpinLock<Vec<String>>>) {
        let journal = Arc::new(SpinLock::new(Vec::new()));
        let mut reg = DriverRegistry::new();
        for &(name, pm, fail_suspend, fail_resume) in specs {
            reg.register(
                name,
                Arc::new(Probe {
                    name,
                    journal: Arc::clone(&journal),
                    fail_suspend,
                    fail_resume,
                    pm,
                }),
            );
        }
        (reg, journal)
    }

    #[test]
    fn suspend_resume_shutdown_ordering() {
        let (mut reg, journal) = registry(&[("a", true, false, false), ("b", true, false, false)]);
        reg.suspend_all().unwrap();
        assert_eq!(reg.state("a"), Some(DriverState::Suspended));
        reg.resume_all().unwrap();
        assert_eq!(reg.state("b"), Some(DriverState::Active));
        reg.shutdown_all();
        assert_eq!(reg.state("a"), Some(DriverState::Shutdown));

        assert_eq!(
            *journal.lock(),
            [
                "suspend a",
                "suspend b",
                "resume b",
                "resume a",
                "shutdown b",
                "shutdown a"
            ]
        );
    }

    #[test]
    fn failed_suspend_rolls_back_earlier_drivers() {
        let (mut reg, journal) = registry(&[
            ("a", true, false, false),
            ("b", true, false, false),
            ("c", true, true, false),
        ]);
        assert_eq!(reg.suspend_all(), Err(DriverError::InvalidState));
        assert_eq!(reg.state("a"), Some(DriverState::Active));
        assert_eq!(reg.state("b"), Some(DriverState::Active));
        assert_eq!(reg.state("c"), Some(DriverState::Active));
        assert_eq!(
            *journal.lock(),
            ["suspend a", "suspend b", "suspend c", "resume b", "resume a"]
        );
    }

    #[test]
    fn unsupported_suspend_keeps_driver_active() {
        let (mut reg, journal) = registry(&[("legacy", false, false, false)]);
        reg.suspend_all().unwrap();
        assert_eq!(reg.state("legacy"), Some(DriverState::Active));
        reg.resume_all().unwrap();
        assert!(journal.lock().is_empty());
    }

    #[test]
    fn resume_failure_marks_failed_and_continues() {
        let (mut reg, journal) = registry(&[("a", true, false, false), ("b", true, false, true)]);
        reg.suspend_all().unwrap();
        assert_eq!(reg.resume_all(), Err(RESUME_ERROR));
        assert_eq!(reg.state("a"), Some(DriverState::Active));
        assert_eq!(reg.state("b"), Some(DriverState::Failed));
        assert_eq!(journal.lock().last().map(String::as_str), Some("resume a"));

        reg.shutdown_all();
        assert_eq!(reg.state("b"), Some(DriverState::Shutdown));
    }

    #[test]
    fn shutdown_is_not_repeated() {
        let (mut reg, journal) = registry(&[("a", true, false, false)]);
        reg.shutdown_all();
        reg.shutdown_all();
        assert_eq!(*journal.lock(), ["shutdown a"]);
        assert!(!reg.is_empty());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn failed_rollback_marks_driver_failed() {
        let (mut reg, journal) = registry(&[("a", true, false, true), ("b", true, true, false)]);
        assert_eq!(reg.suspend_all(), Err(DriverError::InvalidState));
        assert_eq!(reg.state("a"), Some(DriverState::Failed));
        assert_eq!(reg.state("b"), Some(DriverState::Active));
        assert_eq!(*journal.lock(), ["suspend a", "suspend b", "resume a"]);

        reg.shutdown_all();
        assert_eq!(reg.state("a"), Some(DriverState::Shutdown));
    }

    #[test]
    fn unregister_removes_driver() {
        let (mut reg, journal) = registry(&[("a", true, false, false), ("b", true, false, false)]);
        assert!(reg.unregister("a").is_some());
        assert!(reg.unregister("a").is_none());
        assert_eq!(reg.state("a"), None);
        assert_eq!(reg.len(), 1);

        reg.suspend_all().unwrap();
        reg.shutdown_all();
        assert_eq!(*journal.lock(), ["suspend b", "shutdown b"]);
    }
}
