//! Module aliases for automatic loading.
//!
//! One `dmi:` glob per lid table entry, so the module is loaded on every
//! listed machine and nowhere else.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::lid::DMI_LID_DEVICE_TABLE;

/// Returns the module aliases in table order, without duplicates.
pub fn aliases() -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(DMI_LID_DEVICE_TABLE.len());
    for entry in &DMI_LID_DEVICE_TABLE {
        let alias = entry.modalias();
        if !out.contains(&alias) {
            out.push(alias);
        }
    }
    out
}
