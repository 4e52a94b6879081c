//! Device discovery: enumeration, capability probing, and interface matching.
//!
//! Enumeration opens each HID interface just long enough to read its report
//! descriptor and identity strings, then drops the handle before moving to
//! the next candidate. No handles survive an enumeration pass.

use crate::descriptor::{parse_report_lengths, MAX_REPORT_DESCRIPTOR_SIZE};
use crate::error::{Error, Result};
use hidapi::{DeviceInfo, HidApi};
use tracing::{debug, info};

/// Vendor marker embedded in every Tesoro HID device path.
pub const VENDOR_PATH_MARKER: &str = "hid#vid_195d";

/// Marker for the lighting-control sub-interface (interface 1, collection 5).
///
/// Confirmed on the Gram Spectrum; other Tesoro boards expose the same
/// control collection.
pub const LIGHTING_PATH_MARKER: &str = "&mi_01&col05";

/// Capabilities of one discovered HID interface.
///
/// Immutable snapshot taken during enumeration. The report lengths are
/// authoritative for validating later writes against this interface.
#[derive(Debug, Clone)]
pub struct DeviceCapability {
    pub path: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub release_number: u16,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub input_report_len: usize,
    pub output_report_len: usize,
    pub feature_report_len: usize,
}

/// Enumerate all present HID interfaces and probe their capabilities.
///
/// Freshly computed on every call. A candidate that fails any probe
/// sub-step is skipped with a log entry; one bad interface never aborts
/// the pass.
pub fn enumerate(api: &HidApi) -> Vec<DeviceCapability> {
    debug!("starting HID interface enumeration");

    let capabilities = collect_capabilities(api.device_list().map(|dev_info| {
        let path = dev_info.path().to_string_lossy().into_owned();
        (path, probe_interface(api, dev_info))
    }));

    debug!(count = capabilities.len(), "enumeration complete");
    capabilities
}

/// Fold per-candidate probe outcomes into a capability list.
///
/// Failed probes are logged and dropped; successes keep their input order.
fn collect_capabilities(
    probes: impl Iterator<Item = (String, Result<DeviceCapability>)>,
) -> Vec<DeviceCapability> {
    let mut capabilities = Vec::new();
    for (path, probe) in probes {
        match probe {
            Ok(cap) => capabilities.push(cap),
            Err(e) => {
                debug!(path = %path, error = %e, "skipping unprobeable interface");
            }
        }
    }
    capabilities
}

/// Open one interface transiently and read its capabilities.
///
/// The handle is scoped to this function; it is released on every exit
/// path, success or failure.
fn probe_interface(api: &HidApi, dev_info: &DeviceInfo) -> Result<DeviceCapability> {
    let path = dev_info.path().to_string_lossy().into_owned();

    let device = dev_info
        .open_device(api)
        .map_err(|e| Error::Probe(format!("open: {e}")))?;

    let mut desc = [0u8; MAX_REPORT_DESCRIPTOR_SIZE];
    let len = device
        .get_report_descriptor(&mut desc)
        .map_err(|e| Error::Probe(format!("report descriptor: {e}")))?;
    let lengths = parse_report_lengths(&desc[..len]);

    // Identity strings come from the open handle, like the report lengths.
    // A device that won't answer string requests is still usable.
    let manufacturer = device.get_manufacturer_string().unwrap_or(None);
    let product = device.get_product_string().unwrap_or(None);

    Ok(DeviceCapability {
        path,
        vendor_id: dev_info.vendor_id(),
        product_id: dev_info.product_id(),
        release_number: dev_info.release_number(),
        manufacturer,
        product,
        input_report_len: lengths.input,
        output_report_len: lengths.output,
        feature_report_len: lengths.feature,
    })
}

/// Select the lighting-control interface from enumerated capabilities.
///
/// Pure, deterministic, first match wins in the order given. Both the
/// vendor marker and the sub-interface marker must appear in the device
/// path. `None` means no compatible keyboard is attached — a normal
/// negative result, not an error.
pub fn find_lighting_interface(capabilities: &[DeviceCapability]) -> Option<&DeviceCapability> {
    let found = capabilities.iter().find(|cap| {
        cap.path.contains(VENDOR_PATH_MARKER) && cap.path.contains(LIGHTING_PATH_MARKER)
    });

    if let Some(cap) = found {
        info!(
            path = %cap.path,
            vid = format_args!("0x{:04X}", cap.vendor_id),
            pid = format_args!("0x{:04X}", cap.product_id),
            feature_report_len = cap.feature_report_len,
            "found lighting interface"
        );
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(path: &str) -> DeviceCapability {
        DeviceCapability {
            path: path.to_string(),
            vendor_id: 0x195D,
            product_id: 0x2047,
            release_number: 0x0100,
            manufacturer: Some("Tesoro".into()),
            product: Some("Gram Spectrum".into()),
            input_report_len: 0,
            output_report_len: 0,
            feature_report_len: 8,
        }
    }

    #[test]
    fn matcher_requires_both_markers() {
        let caps = vec![
            cap(r"\\?\hid#vid_04d9&pid_0001#7&col01"),
            cap(r"\\?\hid#vid_195d&pid_2047&mi_00#8&col01"),
            cap(r"\\?\hid#vid_195d&pid_2047&mi_01&col05#8&0"),
        ];
        let found = find_lighting_interface(&caps).expect("lighting interface");
        assert!(found.path.contains("mi_01&col05"));
    }

    #[test]
    fn matcher_returns_none_without_sub_interface() {
        let caps = vec![
            cap(r"\\?\hid#vid_04d9&pid_0001#7&col01"),
            cap(r"\\?\hid#vid_195d&pid_2047&mi_00#8&col01"),
        ];
        assert!(find_lighting_interface(&caps).is_none());
    }

    #[test]
    fn matcher_returns_none_on_empty_input() {
        assert!(find_lighting_interface(&[]).is_none());
    }

    #[test]
    fn one_failed_probe_does_not_abort_the_pass() {
        let probes = vec![
            ("intf0".to_string(), Ok(cap(r"\\?\hid#vid_04d9&pid_0001#7&col01"))),
            (
                "intf1".to_string(),
                Err(Error::Probe("open: device busy".into())),
            ),
            (
                "intf2".to_string(),
                Ok(cap(r"\\?\hid#vid_195d&pid_2047&mi_01&col05#8&0")),
            ),
        ];
        let caps = collect_capabilities(probes.into_iter());
        assert_eq!(caps.len(), 2);
        assert!(caps[0].path.contains("vid_04d9"));
        assert!(caps[1].path.contains("col05"));
    }

    #[test]
    fn matcher_takes_first_of_multiple_matches() {
        let caps = vec![
            cap(r"\\?\hid#vid_195d&pid_2047&mi_01&col05#first"),
            cap(r"\\?\hid#vid_195d&pid_2047&mi_01&col05#second"),
        ];
        let found = find_lighting_interface(&caps).unwrap();
        assert!(found.path.ends_with("first"));
    }
}
