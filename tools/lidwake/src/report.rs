//! Read-only commands: `table`, `match` and `modalias`.

use anyhow::{Context, Result};
use lidwake_driver_api::{DmiField, SystemIdentity};
use serde::Serialize;
use surface_gpe::{DMI_LID_DEVICE_TABLE, match_platform};

/// One quirk table entry, flattened for output.
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct TableRow {
    ident: &'static str,
    sys_vendor: Option<&'static str>,
    product_name: Option<&'static str>,
    product_sku: Option<&'static str>,
    acpi_path: &'static str,
    gpe: u32,
}

fn rows() -> Vec<TableRow> {
    DMI_LID_DEVICE_TABLE
        .iter()
        .map(|entry| {
            let value = |field: DmiField| {
                entry
                    .matches
                    .iter()
                    .find(|m| m.field == field)
                    .map(|m| m.value)
            };
            TableRow {
                ident: entry.ident,
                sys_vendor: value(DmiField::SysVendor),
                product_name: value(DmiField::ProductName),
                product_sku: value(DmiField::ProductSku),
                acpi_path: entry.driver_data.acpi_path,
                gpe: entry.driver_data.gpe_number,
            }
        })
        .collect()
}

/// Prints the quirk table.
pub fn table(json: bool) -> Result<()> {
    let rows = rows();
    if json {
        let out = serde_json::to_string_pretty(&rows).context("Failed to serialize table")?;
        println!("{out}");
        return Ok(());
    }

    let width = rows.iter().map(|r| r.ident.len()).max().unwrap_or(0);
    println!("{:<width$}  {:<5}  {:<10}  MATCH", "MODEL", "GPE", "LID");
    for row in &rows {
        let matched = match (row.product_name, row.product_sku) {
            (_, Some(sku)) => format!("sku={sku}"),
            (Some(name), None) => format!("product={name}"),
            (None, None) => String::from("-"),
        };
        println!(
            "{:<width$}  {:<5}  {:<10}  {matched}",
            row.ident,
            format!("{:#04x}", row.gpe),
            row.acpi_path,
        );
    }
    Ok(())
}

/// Prints the matched model for `identity`, or that no quirk is needed.
pub fn matched(identity: &SystemIdentity) {
    match match_platform(identity) {
        Some(entry) => println!(
            "{}: lid {} on GPE {:#04x}",
            entry.ident, entry.driver_data.acpi_path, entry.driver_data.gpe_number
        ),
        None => println!(
            "No lid quirk needed for {} {}",
            identity.sys_vendor.as_deref().unwrap_or("<unknown vendor>"),
            identity.product_name.as_deref().unwrap_or("<unknown product>"),
        ),
    }
}

/// Prints the module aliases, one per line.
pub fn modalias() {
    for alias in surface_gpe::modalias::aliases() {
        println!("{alias}");
    }
}
