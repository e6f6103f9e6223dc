//! DMI system identification and match tables.
//!
//! Quirk drivers that apply to specific machine models declare a table of
//! [`DmiSystemId`] entries. Each entry lists exact string matches on DMI
//! fields and points at driver data shared between entries. The host reads
//! the machine's [`SystemIdentity`] once and [`dmi_first_match`] picks the
//! first entry whose fields all match.
//!
//! Matching is exact and case-sensitive; a field missing from the identity
//! never matches.

extern crate alloc;

use alloc::string::String;

/// A DMI string field usable in match tables.
///
/// Ordered as the fields appear in the kernel's `dmi:` modalias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DmiField {
    /// System manufacturer (`sys_vendor`).
    SysVendor,
    /// Product name (`product_name`).
    ProductName,
    /// Stock-keeping unit (`product_sku`).
    ProductSku,
}

impl DmiField {
    /// All matchable fields, in modalias order.
    pub const ALL: [Self; 3] = [Self::SysVendor, Self::ProductName, Self::ProductSku];

    /// Name of the attribute under `/sys/class/dmi/id/`.
    pub const fn sysfs_name(self) -> &'static str {
        match self {
            Self::SysVendor => "sys_vendor",
            Self::ProductName => "product_name",
            Self::ProductSku => "product_sku",
        }
    }

    /// Key prefix used for this field in a `dmi:` modalias.
    pub const fn modalias_key(self) -> &'static str {
        match self {
            Self::SysVendor => "svn",
            Self::ProductName => "pn",
            Self::ProductSku => "sku",
        }
    }

    /// Position of this field among all `dmi:` modalias fields
    /// (`bvn bvr bd br efr svn pn pvr rvn rn rvr cvn ct cvr sku`).
    const fn modalias_position(self) -> usize {
        match self {
            Self::SysVendor => 5,
            Self::ProductName => 6,
            Self::ProductSku => 14,
        }
    }
}

/// Identity strings of the running machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemIdentity {
    /// System manufacturer.
    pub sys_vendor: Option<String>,
    /// Product name.
    pub product_name: Option<String>,
    /// Stock-keeping unit.
    pub product_sku: Option<String>,
}

impl SystemIdentity {
    /// Creates an identity with no fields set.
    pub const fn new() -> Self {
        Self {
            sys_vendor: None,
            product_name: None,
            product_sku: None,
        }
    }

    /// Returns this identity with `field` set to `value`.
    #[must_use]
    pub fn with(mut self, field: DmiField, value: &str) -> Self {
        self.set(field, value);
        self
    }

    /// Sets `field` to `value`.
    pub fn set(&mut self, field: DmiField, value: &str) {
        let slot = match field {
            DmiField::SysVendor => &mut self.sys_vendor,
            DmiField::ProductName => &mut self.product_name,
            DmiField::ProductSku => &mut self.product_sku,
        };
        *slot = Some(String::from(value));
    }

    /// Returns the value of `field`, if known.
    pub fn get(&self, field: DmiField) -> Option<&str> {
        match field {
            DmiField::SysVendor => self.sys_vendor.as_deref(),
            DmiField::ProductName => self.product_name.as_deref(),
            DmiField::ProductSku => self.product_sku.as_deref(),
        }
    }
}

/// An exact match on one DMI field (`DMI_EXACT_MATCH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmiStrMatch {
    /// Field to compare.
    pub field: DmiField,
    /// Required value (full string, case-sensitive).
    pub value: &'static str,
}

impl DmiStrMatch {
    /// Creates an exact match on `field`.
    pub const fn exact(field: DmiField, value: &'static str) -> Self {
        Self { field, value }
    }

    /// Returns `true` if the identity carries exactly this value.
    pub fn matches(&self, identity: &SystemIdentity) -> bool {
        identity.get(self.field) == Some(self.value)
    }
}

/// One machine signature in a DMI match table.
#[derive(Debug)]
pub struct DmiSystemId<T: 'static> {
    /// Human-readable model name, for logging.
    pub ident: &'static str,
    /// Conditions that must all hold.
    pub matches: &'static [DmiStrMatch],
    /// Data handed to the driver when this entry matches.
    pub driver_data: &'static T,
}

impl<T> DmiSystemId<T> {
    /// Returns `true` if every condition matches. An entry without
    /// conditions never matches.
    pub fn matches(&self, identity: &SystemIdentity) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(|m| m.matches(identity))
    }

    /// Builds the `dmi:` modalias glob that selects machines matching this
    /// entry, e.g. `dmi:*:svnMicrosoftCorporation:pnSurfacePro4:*`.
    ///
    /// Values are filtered the way the kernel filters modalias fields:
    /// spaces, control characters, non-ASCII bytes and `:` are dropped.
    pub fn modalias(&self) -> String {
        let mut conds: alloc::vec::Vec<&DmiStrMatch> = self.matches.iter().collect();
        conds.sort_by_key(|m| m.field);

        let mut alias = String::from("dmi:*");
        let mut prev: Option<usize> = None;
        for cond in conds {
            let pos = cond.field.modalias_position();
            match prev {
                Some(p) if p + 1 == pos => alias.push(':'),
                _ => alias.push_str(if prev.is_some() { ":*:" } else { ":" }),
            }
            alias.push_str(cond.field.modalias_key());
            alias.extend(cond.value.chars().filter(|&c| c > ' ' && c < '\x7f' && c != ':'));
            prev = Some(pos);
        }
        alias.push_str(":*");
        alias
    }
}

/// Returns the first table entry matching `identity`.
pub fn dmi_first_match<'t, T>(
    table: &'t [DmiSystemId<T>],
    identity: &SystemIdentity,
) -> Option<&'t DmiSystemId<T>> {
    table.iter().find(|entry| entry.matches(identity))
}
