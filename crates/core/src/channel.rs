//! Device channel: handle lifecycle and feature-report writes.
//!
//! A [`DeviceChannel`] is either closed (no handle, all I/O fails) or open
//! (live handle, feature-report length cached from the interface's report
//! descriptor). There is no internal locking: callers must serialize all
//! operations on a channel; concurrent use of one channel from multiple
//! threads is not supported.

use crate::descriptor::{parse_report_lengths, MAX_REPORT_DESCRIPTOR_SIZE};
use crate::error::{Error, Result};
use hidapi::{HidApi, HidDevice};
use std::ffi::CString;
use tracing::{debug, trace};

/// Sink for vendor feature reports.
///
/// The seam between protocol drivers and the device, so tests can
/// substitute a recording mock for a live channel.
pub trait FeatureWriter {
    /// Deliver one feature report to the device. Fire and forget: no
    /// acknowledgment payload is read back.
    fn write_feature(&self, data: &[u8]) -> Result<()>;
}

/// Check a payload against the interface's negotiated feature-report length.
///
/// Rejecting here means an oversized report never reaches the device.
fn validate_payload_len(len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(Error::PayloadTooLarge { len, max });
    }
    Ok(())
}

/// Exclusive read/write channel to one HID interface.
#[derive(Default)]
pub struct DeviceChannel {
    device: Option<HidDevice>,
    feature_report_len: usize,
}

impl DeviceChannel {
    /// Create a closed channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the channel currently holds a device handle.
    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Negotiated feature-report byte length. 0 while closed.
    pub fn feature_report_len(&self) -> usize {
        self.feature_report_len
    }

    /// Acquire an exclusive handle for `path` and cache the interface's
    /// feature-report length.
    ///
    /// All-or-nothing: on any failure (path gone, permission denied,
    /// already held elsewhere, descriptor unreadable) the channel remains
    /// fully closed.
    pub fn open(&mut self, api: &HidApi, path: &str) -> Result<()> {
        self.close();

        let c_path = CString::new(path)
            .map_err(|_| Error::DeviceUnavailable(format!("invalid device path: {path:?}")))?;
        let device = api
            .open_path(&c_path)
            .map_err(|e| Error::DeviceUnavailable(format!("open {path}: {e}")))?;

        let mut desc = [0u8; MAX_REPORT_DESCRIPTOR_SIZE];
        let len = device
            .get_report_descriptor(&mut desc)
            .map_err(|e| Error::DeviceUnavailable(format!("report descriptor: {e}")))?;
        let lengths = parse_report_lengths(&desc[..len]);

        debug!(
            path,
            feature_report_len = lengths.feature,
            "channel open"
        );
        self.device = Some(device);
        self.feature_report_len = lengths.feature;
        Ok(())
    }

    /// Release the device handle. Idempotent; safe on every teardown path,
    /// including after a failed open.
    pub fn close(&mut self) {
        if self.device.take().is_some() {
            debug!("channel closed");
        }
        self.feature_report_len = 0;
    }
}

impl FeatureWriter for DeviceChannel {
    fn write_feature(&self, data: &[u8]) -> Result<()> {
        let device = self
            .device
            .as_ref()
            .ok_or_else(|| Error::DeviceUnavailable("channel is closed".to_string()))?;
        validate_payload_len(data.len(), self.feature_report_len)?;

        device
            .send_feature_report(data)
            .map_err(|e| Error::Hid(format!("send feature report: {e}")))?;
        trace!(report_hex = format_args!("{data:02X?}"), "feature TX");
        Ok(())
    }
}

impl Drop for DeviceChannel {
    fn drop(&mut self) {
        self.close();
    }
}
