//! Logging and synchronization primitives shared by the lid-wake crates.
//!
//! This crate holds the host-testable pieces that both the driver and the
//! host tool build on: the leveled logging facade ([`log`]) and the
//! spin lock used to serialize driver state transitions ([`sync`]).
//!
//! Everything here is `no_std` + `alloc`, so the same code runs inside a
//! kernel and under `cargo test` on the host.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod log;
pub mod sync;
