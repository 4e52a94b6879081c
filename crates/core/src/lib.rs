//! open-spectrum-core: device discovery and lighting protocol for Tesoro
//! Gram Spectrum keyboards.
//!
//! This crate provides the cross-platform core logic: enumerating HID
//! interfaces, selecting the vendor lighting channel, and driving the
//! 8-byte feature-report command protocol for profile, mode, and per-key
//! color control.

pub mod channel;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod keyboard;
pub mod layout;
pub mod lighting;
pub mod lightprofile;
pub mod protocol;

/// Tesoro USB Vendor ID.
pub const TESORO_VID: u16 = 0x195D;

/// Known Tesoro keyboard product IDs.
pub mod pids {
    /// Gram Spectrum.
    pub const GRAM_SPECTRUM: u16 = 0x2047;
}
