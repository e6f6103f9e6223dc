//! `simulate`: one full driver lifetime against in-memory firmware.
//!
//! The driver is loaded, taken through a system suspend and resume by a
//! [`DriverRegistry`], and unloaded. The firmware calls made in each phase
//! are printed, followed by the final state of the lid GPE.

use std::fmt;
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use clap::ValueEnum;
use lidwake_driver_api::sim::{FirmwareOps, SimFirmware};
use lidwake_driver_api::{AcpiPath, DriverError, DriverRegistry, FirmwareError, SystemIdentity};
use surface_gpe::{SurfaceGpeModule, match_platform};

/// Driver lifetime phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Phase {
    /// Module load and device probe.
    Init,
    /// System suspend.
    Suspend,
    /// System resume.
    Resume,
    /// Module unload.
    Exit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Suspend => "suspend",
            Self::Resume => "resume",
            Self::Exit => "exit",
        })
    }
}

/// Prints per-phase firmware traces and counts failed phases.
struct Tracer {
    fw: Arc<SimFirmware>,
    fault: Option<(FirmwareOps, Phase)>,
    failed: usize,
}

impl Tracer {
    /// Runs `f` as `phase`, with the injected failure armed if it targets it.
    fn phase<T>(&mut self, phase: Phase, f: impl FnOnce() -> Result<T, DriverError>) -> Option<T> {
        if let Some((ops, at)) = self.fault {
            if at == phase {
                self.fw.fail_once(ops, FirmwareError::Error);
            }
        }
        let result = f();
        self.fw.clear_failures();

        match &result {
            Ok(_) => println!("{phase}: ok"),
            Err(e) => println!("{phase}: failed: {e}"),
        }
        for call in self.fw.take_calls() {
            println!("  {call}");
        }

        match result {
            Ok(value) => Some(value),
            Err(_) => {
                self.failed += 1;
                None
            }
        }
    }
}

/// Simulates the driver on a machine reporting `identity`.
///
/// `fault` fails one firmware operation once, during the given phase.
pub fn run(identity: &SystemIdentity, fault: Option<(FirmwareOps, Phase)>) -> Result<()> {
    let Some(entry) = match_platform(identity) else {
        println!("No lid quirk needed for this machine; the driver stays inactive");
        return Ok(());
    };
    let lid = entry.driver_data;
    let path = AcpiPath::parse(lid.acpi_path)
        .map_err(|e| anyhow!("Invalid lid path {}: {e}", lid.acpi_path))?;
    println!(
        "{} (lid {} on GPE {:#04x})",
        entry.ident, lid.acpi_path, lid.gpe_number
    );

    let fw = Arc::new(SimFirmware::new().with_object(path));
    let mut tracer = Tracer {
        fw: Arc::clone(&fw),
        fault,
        failed: 0,
    };

    let acpi = Arc::clone(&fw);
    if let Some(module) = tracer.phase(Phase::Init, || SurfaceGpeModule::init(identity, acpi)) {
        let mut registry = DriverRegistry::new();
        module.register(&mut registry);

        if tracer.phase(Phase::Suspend, || registry.suspend_all()).is_some() {
            tracer.phase(Phase::Resume, || registry.resume_all());
        } else {
            println!("resume: skipped");
        }

        tracer.phase(Phase::Exit, || {
            registry.shutdown_all();
            module.exit(&mut registry);
            Ok(())
        });
    }

    let gpe = fw.gpe(lid.gpe_number);
    println!(
        "final: GPE {:#04x} enable_count={} wake={} ({})",
        lid.gpe_number,
        gpe.enable_count,
        if gpe.wake_enabled { "on" } else { "off" },
        if gpe.is_quiescent() { "quiescent" } else { "still enabled" },
    );

    if tracer.failed > 0 {
        bail!("{} phase(s) failed", tracer.failed);
    }
    if !gpe.is_quiescent() {
        bail!("GPE {:#04x} left enabled after exit", lid.gpe_number);
    }
    Ok(())
}
