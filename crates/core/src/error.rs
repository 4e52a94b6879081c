//! Error types for open-spectrum-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID subsystem failure (API init, raw I/O).
    #[error("HID error: {0}")]
    Hid(String),

    /// No matching lighting interface after enumeration.
    ///
    /// Not a crash condition — it signals absent or unsupported hardware.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Handle acquisition failed, or I/O was attempted on a closed channel.
    ///
    /// Recoverable by retrying later (e.g. once another process releases
    /// the interface).
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Caller built a report wider than the interface's negotiated
    /// feature-report length. No I/O is performed.
    #[error("payload too large: {len} bytes (feature report length {max})")]
    PayloadTooLarge { len: usize, max: usize },

    /// A single enumeration candidate could not be probed.
    ///
    /// Swallowed inside enumeration and logged; never propagated to callers.
    #[error("probe failed: {0}")]
    Probe(String),

    /// Lighting profile file could not be read, written, or parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
