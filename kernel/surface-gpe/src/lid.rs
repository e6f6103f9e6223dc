//! Lid descriptors and the DMI table binding Surface models to them.

use lidwake_driver_api::dmi::{DmiField, DmiStrMatch, DmiSystemId, SystemIdentity, dmi_first_match};

/// Where the lid lives in the ACPI namespace and which GPE it signals on.
#[derive(Debug, PartialEq, Eq)]
pub struct LidDevice {
    /// ACPI path of the lid device.
    pub acpi_path: &'static str,
    /// GPE number of the lid switch.
    pub gpe_number: u32,
}

// ---------------------------------------------------------------------------
// Lid descriptors (shared between models)
// ---------------------------------------------------------------------------

static LID_DEVICE_L17: LidDevice = LidDevice {
    acpi_path: "\\_SB.LID0",
    gpe_number: 0x17,
};

static LID_DEVICE_L4D: LidDevice = LidDevice {
    acpi_path: "\\_SB.LID0",
    gpe_number: 0x4D,
};

static LID_DEVICE_L4F: LidDevice = LidDevice {
    acpi_path: "\\_SB.LID0",
    gpe_number: 0x4F,
};

static LID_DEVICE_L57: LidDevice = LidDevice {
    acpi_path: "\\_SB.LID0",
    gpe_number: 0x57,
};

// ---------------------------------------------------------------------------
// DMI match table
// ---------------------------------------------------------------------------

const VENDOR: DmiStrMatch = DmiStrMatch::exact(DmiField::SysVendor, "Microsoft Corporation");

const fn product(name: &'static str) -> DmiStrMatch {
    DmiStrMatch::exact(DmiField::ProductName, name)
}

const fn sku(name: &'static str) -> DmiStrMatch {
    DmiStrMatch::exact(DmiField::ProductSku, name)
}

/// Models whose lid needs the GPE wake workaround, in match order.
///
/// Keep [`crate::modalias::aliases`] output in mind when adding entries: the
/// module aliases are derived from this table.
pub static DMI_LID_DEVICE_TABLE: [DmiSystemId<LidDevice>; 11] = [
    DmiSystemId {
        ident: "Surface Pro 4",
        matches: &[VENDOR, product("Surface Pro 4")],
        driver_data: &LID_DEVICE_L17,
    },
    // Surface Pro 5 reports the generic product name "Surface Pro"; match the SKU.
    DmiSystemId {
        ident: "Surface Pro 5",
        matches: &[VENDOR, sku("Surface_Pro_1796")],
        driver_data: &LID_DEVICE_L4F,
    },
    DmiSystemId {
        ident: "Surface Pro 5 (LTE)",
        matches: &[VENDOR, sku("Surface_Pro_1807")],
        driver_data: &LID_DEVICE_L4F,
    },
    DmiSystemId {
        ident: "Surface Pro 6",
        matches: &[VENDOR, product("Surface Pro 6")],
        driver_data: &LID_DEVICE_L4F,
    },
    DmiSystemId {
        ident: "Surface Pro 7",
        matches: &[VENDOR, product("Surface Pro 7")],
        driver_data: &LID_DEVICE_L4D,
    },
    DmiSystemId {
        ident: "Surface Book 1",
        matches: &[VENDOR, product("Surface Book")],
        driver_data: &LID_DEVICE_L17,
    },
    DmiSystemId {
        ident: "Surface Book 2",
        matches: &[VENDOR, product("Surface Book 2")],
        driver_data: &LID_DEVICE_L17,
    },
    DmiSystemId {
        ident: "Surface Book 3",
        matches: &[VENDOR, product("Surface Book 3")],
        driver_data: &LID_DEVICE_L4D,
    },
    DmiSystemId {
        ident: "Surface Laptop 1",
        matches: &[VENDOR, product("Surface Laptop")],
        driver_data: &LID_DEVICE_L57,
    },
    DmiSystemId {
        ident: "Surface Laptop 2",
        matches: &[VENDOR, product("Surface Laptop 2")],
        driver_data: &LID_DEVICE_L57,
    },
    // Only the Intel 13" variant uses a GPE; the AMD 15" shares the product name.
    DmiSystemId {
        ident: "Surface Laptop 3 (Intel 13\")",
        matches: &[VENDOR, sku("Surface_Laptop_3_1867:1868")],
        driver_data: &LID_DEVICE_L4D,
    },
];

/// Returns the table entry for the running machine, if it needs the workaround.
pub fn match_platform(identity: &SystemIdentity) -> Option<&'static DmiSystemId<LidDevice>> {
    dmi_first_match(&DMI_LID_DEVICE_TABLE, identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lidwake_driver_api::path::AcpiPath;

    /// Builds the identity a machine matching `entry` (and nothing else) reports.
    fn identity_for(entry: &DmiSystemId<LidDevice>) -> SystemIdentity {
        let mut id = SystemIdentity::new();
        for m in entry.matches {
            id.set(m.field, m.value);
        }
        id
    }

    #[test]
    fn every_entry_matches_its_own_identity() {
        for entry in &DMI_LID_DEVICE_TABLE {
            let id = identity_for(entry);
            let found = match_platform(&id).unwrap();
            assert_eq!(found.ident, entry.ident);
            assert!(core::ptr::eq(found.driver_data, entry.driver_data));
        }
    }

    #[test]
    fn entries_do_not_overlap() {
        for entry in &DMI_LID_DEVICE_TABLE {
            let id = identity_for(entry);
            let hits = DMI_LID_DEVICE_TABLE
                .iter()
                .filter(|e| e.matches(&id))
                .count();
            assert_eq!(hits, 1, "{} overlaps another entry", entry.ident);
        }
    }

    #[test]
    fn surface_pro_6_uses_gpe_4f() {
        let id = SystemIdentity::new()
            .with(DmiField::SysVendor, "Microsoft Corporation")
            .with(DmiField::ProductName, "Surface Pro 6");
        let entry = match_platform(&id).unwrap();
        assert_eq!(entry.ident, "Surface Pro 6");
        assert_eq!(entry.driver_data.gpe_number, 0x4F);
    }

    #[test]
    fn surface_pro_5_matches_by_sku_under_generic_name() {
        let id = SystemIdentity::new()
            .with(DmiField::SysVendor, "Microsoft Corporation")
            .with(DmiField::ProductName, "Surface Pro")
            .with(DmiField::ProductSku, "Surface_Pro_1807");
        assert_eq!(match_platform(&id).unwrap().ident, "Surface Pro 5 (LTE)");

        let generic_only = SystemIdentity::new()
            .with(DmiField::SysVendor, "Microsoft Corporation")
            .with(DmiField::ProductName, "Surface Pro");
        assert!(match_platform(&generic_only).is_none());
    }

    #[test]
    fn amd_surface_laptop_3_is_not_matched() {
        let id = SystemIdentity::new()
            .with(DmiField::SysVendor, "Microsoft Corporation")
            .with(DmiField::ProductName, "Surface Laptop 3")
            .with(DmiField::ProductSku, "Surface_Laptop_3_1873");
        assert!(match_platform(&id).is_none());
    }

    #[test]
    fn unknown_machine_does_not_match() {
        let id = SystemIdentity::new()
            .with(DmiField::SysVendor, "Acme")
            .with(DmiField::ProductName, "Widget");
        assert!(match_platform(&id).is_none());

        let wrong_vendor = SystemIdentity::new()
            .with(DmiField::SysVendor, "Microsoft")
            .with(DmiField::ProductName, "Surface Pro 6");
        assert!(match_platform(&wrong_vendor).is_none());
    }

    #[test]
    fn descriptors_are_shared_not_copied() {
        let pro5 = DMI_LID_DEVICE_TABLE[1].driver_data;
        let pro6 = DMI_LID_DEVICE_TABLE[3].driver_data;
        assert!(core::ptr::eq(pro5, pro6));

        let book1 = DMI_LID_DEVICE_TABLE[5].driver_data;
        assert!(core::ptr::eq(book1, DMI_LID_DEVICE_TABLE[0].driver_data));
        assert!(!core::ptr::eq(book1, pro6));
    }

    #[test]
    fn descriptor_paths_are_valid() {
        for entry in &DMI_LID_DEVICE_TABLE {
            let path = AcpiPath::parse(entry.driver_data.acpi_path).unwrap();
            assert_eq!(format!("{path}"), "\\_SB_.LID0");
        }
    }
}
