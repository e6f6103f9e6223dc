//! In-memory ACPI firmware for tests and dry runs.
//!
//! [`SimFirmware`] implements [`AcpiServices`] over a small model of the
//! ACPICA GPE bookkeeping: each GPE has a wake-capable flag, a runtime
//! enable reference count and a wake-mask bit. Every call is recorded in a
//! trace, and failures can be injected per operation.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;
use lidwake_core::sync::SpinLock;

use crate::firmware::{AcpiHandle, AcpiServices, FirmwareError, GpeAction};
use crate::path::AcpiPath;

bitflags! {
    /// Set of firmware operations, used to target injected failures.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FirmwareOps: u8 {
        /// [`AcpiServices::get_handle`].
        const GET_HANDLE = 1 << 0;
        /// [`AcpiServices::mark_gpe_for_wake`].
        const MARK_WAKE = 1 << 1;
        /// [`AcpiServices::enable_gpe`].
        const ENABLE = 1 << 2;
        /// [`AcpiServices::disable_gpe`].
        const DISABLE = 1 << 3;
        /// [`AcpiServices::set_gpe_wake_mask`].
        const SET_WAKE_MASK = 1 << 4;
    }
}

impl FirmwareOps {
    /// Parses a single operation name (`get-handle`, `mark-wake`, `enable`,
    /// `disable`, `set-wake-mask`).
    pub fn from_op_name(name: &str) -> Option<Self> {
        match name {
            "get-handle" => Some(Self::GET_HANDLE),
            "mark-wake" => Some(Self::MARK_WAKE),
            "enable" => Some(Self::ENABLE),
            "disable" => Some(Self::DISABLE),
            "set-wake-mask" => Some(Self::SET_WAKE_MASK),
            _ => None,
        }
    }
}

/// A recorded firmware call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareCall {
    /// `get_handle(path)`.
    GetHandle(AcpiPath),
    /// `mark_gpe_for_wake(gpe)`.
    MarkGpeForWake(u32),
    /// `enable_gpe(gpe)`.
    EnableGpe(u32),
    /// `disable_gpe(gpe)`.
    DisableGpe(u32),
    /// `set_gpe_wake_mask(gpe, action)`.
    SetGpeWakeMask(u32, GpeAction),
}

impl FirmwareCall {
    /// Returns the operation this call belongs to.
    pub fn op(&self) -> FirmwareOps {
        match self {
            Self::GetHandle(_) => FirmwareOps::GET_HANDLE,
            Self::MarkGpeForWake(_) => FirmwareOps::MARK_WAKE,
            Self::EnableGpe(_) => FirmwareOps::ENABLE,
            Self::DisableGpe(_) => FirmwareOps::DISABLE,
            Self::SetGpeWakeMask(..) => FirmwareOps::SET_WAKE_MASK,
        }
    }
}

impl fmt::Display for FirmwareCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetHandle(path) => write!(f, "get_handle({path})"),
            Self::MarkGpeForWake(gpe) => write!(f, "mark_gpe_for_wake({gpe:#04x})"),
            Self::EnableGpe(gpe) => write!(f, "enable_gpe({gpe:#04x})"),
            Self::DisableGpe(gpe) => write!(f, "disable_gpe({gpe:#04x})"),
            Self::SetGpeWakeMask(gpe, action) => {
                let action = match action {
                    GpeAction::Enable => "enable",
                    GpeAction::Disable => "disable",
                };
                write!(f, "set_gpe_wake_mask({gpe:#04x}, {action})")
            }
        }
    }
}

/// Observable state of one simulated GPE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpeState {
    /// Set by `mark_gpe_for_wake`.
    pub wake_capable: bool,
    /// Runtime enable references.
    pub enable_count: u32,
    /// Wake-mask bit.
    pub wake_enabled: bool,
}

impl GpeState {
    /// Returns `true` if the GPE is neither enabled nor armed for wake.
    pub fn is_quiescent(&self) -> bool {
        self.enable_count == 0 && !self.wake_enabled
    }
}

struct Fault {
    ops: FirmwareOps,
    error: FirmwareError,
    once: bool,
}

struct SimState {
    objects: Vec<AcpiPath>,
    gpe_count: u32,
    gpes: BTreeMap<u32, GpeState>,
    calls: Vec<FirmwareCall>,
    faults: Vec<Fault>,
}

impl SimState {
    /// Records `call` and returns an injected failure, if one applies.
    fn enter(&mut self, call: FirmwareCall) -> Result<(), FirmwareError> {
        self.calls.push(call);
        let op = call.op();
        let Some(idx) = self.faults.iter().position(|f| f.ops.contains(op)) else {
            return Ok(());
        };
        let error = self.faults[idx].error;
        if self.faults[idx].once {
            self.faults.remove(idx);
        }
        Err(error)
    }

    fn gpe_mut(&mut self, gpe: u32) -> Result<&mut GpeState, FirmwareError> {
        if gpe >= self.gpe_count {
            return Err(FirmwareError::BadParameter);
        }
        Ok(self.gpes.entry(gpe).or_default())
    }
}

/// Simulated ACPI firmware.
pub struct SimFirmware {
    state: SpinLock<SimState>,
}

impl SimFirmware {
    /// Number of GPEs in the default simulated GPE blocks (GPE0 + GPE1).
    pub const DEFAULT_GPE_COUNT: u32 = 0x80;

    /// Creates a firmware with an empty namespace and
    /// [`DEFAULT_GPE_COUNT`](Self::DEFAULT_GPE_COUNT) GPEs.
    pub fn new() -> Self {
        Self {
            state: SpinLock::named(
                "sim_firmware",
                SimState {
                    objects: Vec::new(),
                    gpe_count: Self::DEFAULT_GPE_COUNT,
                    gpes: BTreeMap::new(),
                    calls: Vec::new(),
                    faults: Vec::new(),
                },
            ),
        }
    }

    /// Adds a namespace object that [`AcpiServices::get_handle`] can resolve.
    #[must_use]
    pub fn with_object(self, path: AcpiPath) -> Self {
        self.state.lock().objects.push(path);
        self
    }

    /// Fails the next call to any of `ops` with `error`.
    pub fn fail_once(&self, ops: FirmwareOps, error: FirmwareError) {
        self.state.lock().faults.push(Fault {
            ops,
            error,
            once: true,
        });
    }

    /// Fails every call to any of `ops` with `error` until cleared.
    pub fn fail_always(&self, ops: FirmwareOps, error: FirmwareError) {
        self.state.lock().faults.push(Fault {
            ops,
            error,
            once: false,
        });
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        self.state.lock().faults.clear();
    }

    /// Returns the state of `gpe` (default state if never touched).
    pub fn gpe(&self, gpe: u32) -> GpeState {
        self.state.lock().gpes.get(&gpe).copied().unwrap_or_default()
    }

    /// Returns all calls recorded so far.
    pub fn calls(&self) -> Vec<FirmwareCall> {
        self.state.lock().calls.clone()
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&self) -> Vec<FirmwareCall> {
        core::mem::take(&mut self.state.lock().calls)
    }
}

impl Default for SimFirmware {
    fn default() -> Self {
        Self::new()
    }
}

impl AcpiServices for SimFirmware {
    fn get_handle(&self, path: &AcpiPath) -> Result<AcpiHandle, FirmwareError> {
        let mut st = self.state.lock();
        st.enter(FirmwareCall::GetHandle(*path))?;
        st.objects
            .iter()
            .position(|p| p == path)
            .map(|i| AcpiHandle::from_raw(i as u64 + 1))
            .ok_or(FirmwareError::NotFound)
    }

    fn mark_gpe_for_wake(&self, gpe: u32) -> Result<(), FirmwareError> {
        let mut st = self.state.lock();
        st.enter(FirmwareCall::MarkGpeForWake(gpe))?;
        st.gpe_mut(gpe)?.wake_capable = true;
        Ok(())
    }

    fn enable_gpe(&self, gpe: u32) -> Result<(), FirmwareError> {
        let mut st = self.state.lock();
        st.enter(FirmwareCall::EnableGpe(gpe))?;
        let state = st.gpe_mut(gpe)?;
        state.enable_count = state
            .enable_count
            .checked_add(1)
            .ok_or(FirmwareError::Limit)?;
        Ok(())
    }

    fn disable_gpe(&self, gpe: u32) -> Result<(), FirmwareError> {
        let mut st = self.state.lock();
        st.enter(FirmwareCall::DisableGpe(gpe))?;
        let state = st.gpe_mut(gpe)?;
        state.enable_count = state
            .enable_count
            .checked_sub(1)
            .ok_or(FirmwareError::Limit)?;
        Ok(())
    }

    fn set_gpe_wake_mask(&self, gpe: u32, action: GpeAction) -> Result<(), FirmwareError> {
        let mut st = self.state.lock();
        st.enter(FirmwareCall::SetGpeWakeMask(gpe, action))?;
        let state = st.gpe_mut(gpe)?;
        if !state.wake_capable {
            return Err(FirmwareError::Type);
        }
        state.wake_enabled = action == GpeAction::Enable;
        Ok(())
    }
}
