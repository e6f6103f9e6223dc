//! DMI identity from the Linux sysfs.
//!
//! The kernel exports the SMBIOS strings it matches against under
//! `/sys/class/dmi/id/`, one attribute per file with a trailing newline.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result, bail};
use lidwake_driver_api::{DmiField, SystemIdentity};

/// Default sysfs mount point.
pub const SYSFS_PATH: &str = "/sys";

/// DMI attribute directory, relative to the sysfs root.
const DMI_ID_DIR: &str = "class/dmi/id";

/// Reads the identity of the machine whose sysfs is mounted at `root`.
///
/// Missing attributes are left unknown; a missing DMI directory is an error.
pub fn read_identity(root: &Path) -> Result<SystemIdentity> {
    let dir = root.join(DMI_ID_DIR);
    if !dir.is_dir() {
        bail!("No DMI information under {}", dir.display());
    }

    let mut identity = SystemIdentity::new();
    for field in DmiField::ALL {
        let path = dir.join(field.sysfs_name());
        match std::fs::read_to_string(&path) {
            Ok(value) => identity.set(field, value.trim_end_matches('\n')),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        }
    }
    Ok(identity)
}
