//! HID report-descriptor parsing for capability probing.
//!
//! hidapi exposes the raw report descriptor but not the per-kind report
//! lengths, so we walk the descriptor ourselves and compute the
//! input/output/feature report byte lengths. Lengths follow the Windows
//! `HIDP_CAPS` convention the lighting protocol was validated against:
//! the report-ID prefix byte is always counted, so an 8-bit-ID report with
//! seven data bytes has length 8.

use std::collections::HashMap;

/// Maximum report-descriptor size we read from a device (USB HID limit).
pub const MAX_REPORT_DESCRIPTOR_SIZE: usize = 4096;

/// Report byte lengths for one HID interface, by report kind.
///
/// A length of 0 means the interface declares no report of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportLengths {
    pub input: usize,
    pub output: usize,
    pub feature: usize,
}

// Short-item prefixes with the 2-bit size field masked off.
const ITEM_INPUT: u8 = 0x80;
const ITEM_OUTPUT: u8 = 0x90;
const ITEM_FEATURE: u8 = 0xB0;
const ITEM_REPORT_SIZE: u8 = 0x74;
const ITEM_REPORT_ID: u8 = 0x84;
const ITEM_REPORT_COUNT: u8 = 0x94;
const ITEM_PUSH: u8 = 0xA4;
const ITEM_POP: u8 = 0xB4;
const LONG_ITEM_PREFIX: u8 = 0xFE;

/// Global item state affected by Push/Pop.
#[derive(Debug, Clone, Copy, Default)]
struct GlobalState {
    report_size: u32,
    report_count: u32,
    report_id: Option<u8>,
}

/// Bit totals per report ID for one report kind.
#[derive(Debug, Default)]
struct KindBits {
    bits: HashMap<Option<u8>, u32>,
}

impl KindBits {
    fn add(&mut self, id: Option<u8>, bits: u32) {
        *self.bits.entry(id).or_insert(0) += bits;
    }

    /// Byte length per `HIDP_CAPS`: one ID byte plus the widest report.
    fn byte_length(&self) -> usize {
        self.bits
            .values()
            .map(|&bits| bits.div_ceil(8) as usize)
            .max()
            .map(|data| data + 1)
            .unwrap_or(0)
    }
}

/// Compute report byte lengths from a raw HID report descriptor.
///
/// Tolerant of descriptors we don't fully understand: unknown items are
/// skipped, truncated trailing items are ignored. This mirrors how the OS
/// capability query behaves on quirky vendor descriptors.
pub fn parse_report_lengths(desc: &[u8]) -> ReportLengths {
    let mut state = GlobalState::default();
    let mut stack: Vec<GlobalState> = Vec::new();
    let mut input = KindBits::default();
    let mut output = KindBits::default();
    let mut feature = KindBits::default();

    let mut i = 0;
    while i < desc.len() {
        let prefix = desc[i];

        if prefix == LONG_ITEM_PREFIX {
            // Long item: [0xFE, bDataSize, bLongItemTag, data...]
            let Some(&data_size) = desc.get(i + 1) else {
                break;
            };
            i += 3 + data_size as usize;
            continue;
        }

        let size = match prefix & 0x03 {
            3 => 4,
            n => n as usize,
        };
        if i + 1 + size > desc.len() {
            break;
        }
        let mut value: u32 = 0;
        for (shift, &b) in desc[i + 1..i + 1 + size].iter().enumerate() {
            value |= (b as u32) << (8 * shift);
        }

        match prefix & 0xFC {
            ITEM_REPORT_SIZE => state.report_size = value,
            ITEM_REPORT_COUNT => state.report_count = value,
            ITEM_REPORT_ID => state.report_id = Some(value as u8),
            ITEM_PUSH => stack.push(state),
            ITEM_POP => {
                if let Some(saved) = stack.pop() {
                    state = saved;
                }
            }
            ITEM_INPUT => input.add(state.report_id, state.report_size * state.report_count),
            ITEM_OUTPUT => output.add(state.report_id, state.report_size * state.report_count),
            ITEM_FEATURE => feature.add(state.report_id, state.report_size * state.report_count),
            _ => {}
        }

        i += 1 + size;
    }

    ReportLengths {
        input: input.byte_length(),
        output: output.byte_length(),
        feature: feature.byte_length(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Standard boot-keyboard descriptor: 8 input bytes, no report ID.
    const BOOT_KEYBOARD: &[u8] = &[
        0x05, 0x01, // Usage Page (Generic Desktop)
        0x09, 0x06, // Usage (Keyboard)
        0xA1, 0x01, // Collection (Application)
        0x05, 0x07, //   Usage Page (Key Codes)
        0x19, 0xE0, //   Usage Minimum (224)
        0x29, 0xE7, //   Usage Maximum (231)
        0x15, 0x00, //   Logical Minimum (0)
        0x25, 0x01, //   Logical Maximum (1)
        0x75, 0x01, //   Report Size (1)
        0x95, 0x08, //   Report Count (8)
        0x81, 0x02, //   Input (Data, Variable, Absolute)
        0x95, 0x01, //   Report Count (1)
        0x75, 0x08, //   Report Size (8)
        0x81, 0x01, //   Input (Constant)
        0x95, 0x06, //   Report Count (6)
        0x75, 0x08, //   Report Size (8)
        0x15, 0x00, //   Logical Minimum (0)
        0x26, 0xFF, 0x00, // Logical Maximum (255)
        0x05, 0x07, //   Usage Page (Key Codes)
        0x19, 0x00, //   Usage Minimum (0)
        0x2A, 0xFF, 0x00, // Usage Maximum (255)
        0x81, 0x00, //   Input (Data, Array)
        0xC0, // End Collection
    ];

    /// Vendor control interface: feature report ID 0x07 with 7 data bytes.
    const VENDOR_FEATURE: &[u8] = &[
        0x06, 0x00, 0xFF, // Usage Page (Vendor Defined)
        0x09, 0x01, // Usage (1)
        0xA1, 0x01, // Collection (Application)
        0x85, 0x07, //   Report ID (7)
        0x75, 0x08, //   Report Size (8)
        0x95, 0x07, //   Report Count (7)
        0x15, 0x00, //   Logical Minimum (0)
        0x26, 0xFF, 0x00, // Logical Maximum (255)
        0x09, 0x01, //   Usage (1)
        0xB1, 0x02, //   Feature (Data, Variable, Absolute)
        0xC0, // End Collection
    ];

    #[test]
    fn boot_keyboard_input_length() {
        let lengths = parse_report_lengths(BOOT_KEYBOARD);
        // 64 data bits = 8 bytes, plus the report-ID byte.
        assert_eq!(lengths.input, 9);
        assert_eq!(lengths.output, 0);
        assert_eq!(lengths.feature, 0);
    }

    #[test]
    fn vendor_feature_report_length() {
        let lengths = parse_report_lengths(VENDOR_FEATURE);
        // 7 data bytes plus report-ID byte 0x07 — the lighting packet size.
        assert_eq!(lengths.feature, 8);
        assert_eq!(lengths.input, 0);
    }

    #[test]
    fn multiple_report_ids_take_widest() {
        let desc: &[u8] = &[
            0x85, 0x01, // Report ID (1)
            0x75, 0x08, // Report Size (8)
            0x95, 0x02, // Report Count (2)
            0xB1, 0x02, // Feature
            0x85, 0x02, // Report ID (2)
            0x95, 0x10, // Report Count (16)
            0xB1, 0x02, // Feature
        ];
        let lengths = parse_report_lengths(desc);
        assert_eq!(lengths.feature, 17);
    }

    #[test]
    fn push_pop_restores_global_state() {
        let desc: &[u8] = &[
            0x75, 0x08, // Report Size (8)
            0x95, 0x04, // Report Count (4)
            0xA4, // Push
            0x95, 0x20, // Report Count (32)
            0xB4, // Pop
            0x81, 0x02, // Input — must use count 4, not 32
        ];
        let lengths = parse_report_lengths(desc);
        assert_eq!(lengths.input, 5);
    }

    #[test]
    fn non_byte_aligned_bits_round_up() {
        let desc: &[u8] = &[
            0x75, 0x01, // Report Size (1)
            0x95, 0x05, // Report Count (5)
            0x81, 0x02, // Input (5 bits)
            0x75, 0x03, // Report Size (3)
            0x95, 0x01, // Report Count (1)
            0x81, 0x01, // Input (3 bits padding)
        ];
        let lengths = parse_report_lengths(desc);
        assert_eq!(lengths.input, 2);
    }

    #[test]
    fn truncated_descriptor_does_not_panic() {
        let desc: &[u8] = &[0x75, 0x08, 0x96, 0x01]; // 2-byte item cut short
        let lengths = parse_report_lengths(desc);
        assert_eq!(lengths, ReportLengths::default());
    }

    #[test]
    fn empty_descriptor_yields_zero_lengths() {
        assert_eq!(parse_report_lengths(&[]), ReportLengths::default());
    }

    #[test]
    fn long_items_are_skipped() {
        let desc: &[u8] = &[
            0xFE, 0x02, 0x00, 0xAA, 0xBB, // long item, 2 data bytes
            0x75, 0x08, // Report Size (8)
            0x95, 0x01, // Report Count (1)
            0xB1, 0x02, // Feature
        ];
        let lengths = parse_report_lengths(desc);
        assert_eq!(lengths.feature, 2);
    }
}
