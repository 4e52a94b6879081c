//! Lighting protocol encoding.
//!
//! Every command is one fixed 8-byte feature report:
//! byte 0 = report ID 0x07 (the lighting command category), byte 1 = the
//! sub-command, remaining bytes carry parameters and are zero-padded.
//! Field order and packet length are the wire contract — any change breaks
//! device compatibility.
//!
//! Protocol knowledge derived from USB captures of the vendor tool on a
//! Gram Spectrum.

use serde::{Deserialize, Serialize};

/// Fixed command packet length.
pub const PACKET_LEN: usize = 8;

/// Feature-report ID carried by every lighting command.
pub const REPORT_ID: u8 = 0x07;

/// Sub-command codes (packet byte 1).
mod subcommand {
    pub const SET_PROFILE: u8 = 0x03;
    pub const SET_LIGHTING_MODE: u8 = 0x0A;
    pub const SET_BACKGROUND_COLOR: u8 = 0x0B;
    pub const SET_KEY_COLOR: u8 = 0x0D;
}

/// Key-field sentinels within the set-key-color sub-command.
const KEY_FIELD_CLEAR_ALL: u8 = 0xFE;
const KEY_FIELD_SAVE: u8 = 0xFF;

/// Onboard lighting profile: five user profiles plus the host-driven one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Profile {
    P1 = 0x01,
    P2 = 0x02,
    P3 = 0x03,
    P4 = 0x04,
    P5 = 0x05,
    /// PC mode — lighting driven by the host rather than onboard memory.
    Pc = 0x06,
}

impl Profile {
    /// All profiles, in device order.
    pub const ALL: &'static [Profile] = &[
        Profile::P1,
        Profile::P2,
        Profile::P3,
        Profile::P4,
        Profile::P5,
        Profile::Pc,
    ];

    /// Wire identifier.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Parse a CLI-friendly name: "1".."5" or "pc".
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "1" | "p1" | "profile1" => Some(Self::P1),
            "2" | "p2" | "profile2" => Some(Self::P2),
            "3" | "p3" | "profile3" => Some(Self::P3),
            "4" | "p4" | "profile4" => Some(Self::P4),
            "5" | "p5" | "profile5" => Some(Self::P5),
            "pc" => Some(Self::Pc),
            _ => None,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pc => write!(f, "PC"),
            other => write!(f, "Profile {}", other.id()),
        }
    }
}

/// Global animation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LightingMode {
    Shine = 0x00,
    Trigger = 0x01,
    Ripple = 0x02,
    Fireworks = 0x03,
    Radiation = 0x04,
    Breathing = 0x05,
    RainbowWave = 0x06,
    /// Per-key spectrum family; the only mode with a sub-mode selector.
    SpectrumColors = 0x08,
}

impl LightingMode {
    pub const ALL: &'static [LightingMode] = &[
        LightingMode::Shine,
        LightingMode::Trigger,
        LightingMode::Ripple,
        LightingMode::Fireworks,
        LightingMode::Radiation,
        LightingMode::Breathing,
        LightingMode::RainbowWave,
        LightingMode::SpectrumColors,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "shine" => Some(Self::Shine),
            "trigger" => Some(Self::Trigger),
            "ripple" => Some(Self::Ripple),
            "fireworks" => Some(Self::Fireworks),
            "radiation" => Some(Self::Radiation),
            "breathing" => Some(Self::Breathing),
            "rainbow" | "rainbow-wave" | "rainbowwave" => Some(Self::RainbowWave),
            "spectrum" | "spectrum-colors" | "spectrumcolors" => Some(Self::SpectrumColors),
            _ => None,
        }
    }
}

/// Sub-mode selector for the spectrum family.
///
/// Only meaningful with [`LightingMode::SpectrumColors`]; encoded as zero
/// for every other mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SpectrumMode {
    Shine = 0x00,
    Breathing = 0x01,
    Trigger = 0x02,
}

impl SpectrumMode {
    pub const ALL: &'static [SpectrumMode] = &[
        SpectrumMode::Shine,
        SpectrumMode::Breathing,
        SpectrumMode::Trigger,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "shine" => Some(Self::Shine),
            "breathing" => Some(Self::Breathing),
            "trigger" => Some(Self::Trigger),
            _ => None,
        }
    }
}

/// Firmware LED identifier for each physical key.
///
/// The codes follow the controller's internal LED matrix, not any scan-code
/// standard. `None` marks unmapped layout cells; commands addressed to it
/// are dropped rather than sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LedId {
    Escape = 0x0B,
    F1 = 0x16,
    F2 = 0x1E,
    F3 = 0x19,
    F4 = 0x1B,
    F5 = 0x07,
    F6 = 0x33,
    F7 = 0x39,
    F8 = 0x3E,
    F9 = 0x56,
    F10 = 0x57,
    F11 = 0x53,
    F12 = 0x55,
    PrintScreen = 0x4F,
    ScrollLock = 0x48,
    Pause = 0x00,
    Grave = 0x0E,
    D1 = 0x0F,
    D2 = 0x17,
    D3 = 0x1F,
    D4 = 0x27,
    D5 = 0x26,
    D6 = 0x2E,
    D7 = 0x2F,
    D8 = 0x37,
    D9 = 0x3F,
    D0 = 0x47,
    Minus = 0x46,
    Equals = 0x36,
    Backspace = 0x51,
    Insert = 0x66,
    Home = 0x76,
    PageUp = 0x6E,
    Tab = 0x09,
    Q = 0x08,
    W = 0x10,
    E = 0x18,
    R = 0x20,
    T = 0x21,
    Y = 0x29,
    U = 0x28,
    I = 0x30,
    O = 0x38,
    P = 0x40,
    LeftBracket = 0x41,
    RightBracket = 0x31,
    Backslash = 0x52,
    Delete = 0x5E,
    End = 0x77,
    PageDown = 0x6F,
    CapsLock = 0x11,
    A = 0x0A,
    S = 0x12,
    D = 0x1A,
    F = 0x22,
    G = 0x23,
    H = 0x2B,
    J = 0x2A,
    K = 0x32,
    L = 0x3A,
    Semicolon = 0x42,
    Apostrophe = 0x43,
    Enter = 0x54,
    LeftShift = 0x79,
    Z = 0x0C,
    X = 0x14,
    C = 0x1C,
    V = 0x24,
    B = 0x25,
    N = 0x2D,
    M = 0x2C,
    Comma = 0x34,
    Period = 0x3C,
    Slash = 0x45,
    RightShift = 0x7A,
    Up = 0x73,
    LeftControl = 0x06,
    Windows = 0x7C,
    Alt = 0x4B,
    Space = 0x5B,
    AltGr = 0x4D,
    Fn = 0x7D,
    Menu = 0x3D,
    RightControl = 0x04,
    Left = 0x75,
    Down = 0x5D,
    Right = 0x65,
    NumLock = 0x5C,
    NumDivide = 0x64,
    NumMultiply = 0x6C,
    NumSubtract = 0x6D,
    NumPad7 = 0x58,
    NumPad8 = 0x60,
    NumPad9 = 0x68,
    NumPad4 = 0x59,
    NumPad5 = 0x61,
    NumPad6 = 0x69,
    NumAdd = 0x70,
    NumPad1 = 0x5A,
    NumPad2 = 0x62,
    NumPad3 = 0x6A,
    NumPad0 = 0x63,
    NumDecimal = 0x6B,
    NumPadEnter = 0x72,

    /// Sentinel for unmapped layout cells. Never sent to the device.
    None = 0xFF,
}

impl LedId {
    /// Wire identifier.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Parse a CLI-friendly key name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        let led = match lower.as_str() {
            "escape" | "esc" => Self::Escape,
            "f1" => Self::F1,
            "f2" => Self::F2,
            "f3" => Self::F3,
            "f4" => Self::F4,
            "f5" => Self::F5,
            "f6" => Self::F6,
            "f7" => Self::F7,
            "f8" => Self::F8,
            "f9" => Self::F9,
            "f10" => Self::F10,
            "f11" => Self::F11,
            "f12" => Self::F12,
            "printscreen" | "prtsc" => Self::PrintScreen,
            "scrolllock" => Self::ScrollLock,
            "pause" => Self::Pause,
            "grave" | "`" => Self::Grave,
            "0" => Self::D0,
            "1" => Self::D1,
            "2" => Self::D2,
            "3" => Self::D3,
            "4" => Self::D4,
            "5" => Self::D5,
            "6" => Self::D6,
            "7" => Self::D7,
            "8" => Self::D8,
            "9" => Self::D9,
            "minus" | "-" => Self::Minus,
            "equals" | "=" => Self::Equals,
            "backspace" => Self::Backspace,
            "insert" => Self::Insert,
            "home" => Self::Home,
            "pageup" => Self::PageUp,
            "tab" => Self::Tab,
            "a" => Self::A,
            "b" => Self::B,
            "c" => Self::C,
            "d" => Self::D,
            "e" => Self::E,
            "f" => Self::F,
            "g" => Self::G,
            "h" => Self::H,
            "i" => Self::I,
            "j" => Self::J,
            "k" => Self::K,
            "l" => Self::L,
            "m" => Self::M,
            "n" => Self::N,
            "o" => Self::O,
            "p" => Self::P,
            "q" => Self::Q,
            "r" => Self::R,
            "s" => Self::S,
            "t" => Self::T,
            "u" => Self::U,
            "v" => Self::V,
            "w" => Self::W,
            "x" => Self::X,
            "y" => Self::Y,
            "z" => Self::Z,
            "leftbracket" | "[" => Self::LeftBracket,
            "rightbracket" | "]" => Self::RightBracket,
            "backslash" | "\\" => Self::Backslash,
            "delete" | "del" => Self::Delete,
            "end" => Self::End,
            "pagedown" => Self::PageDown,
            "capslock" => Self::CapsLock,
            "semicolon" | ";" => Self::Semicolon,
            "apostrophe" | "'" => Self::Apostrophe,
            "enter" => Self::Enter,
            "leftshift" => Self::LeftShift,
            "comma" | "," => Self::Comma,
            "period" | "." => Self::Period,
            "slash" | "/" => Self::Slash,
            "rightshift" => Self::RightShift,
            "up" => Self::Up,
            "leftcontrol" | "leftctrl" => Self::LeftControl,
            "windows" | "win" => Self::Windows,
            "alt" => Self::Alt,
            "space" => Self::Space,
            "altgr" => Self::AltGr,
            "fn" => Self::Fn,
            "menu" | "apps" => Self::Menu,
            "rightcontrol" | "rightctrl" => Self::RightControl,
            "left" => Self::Left,
            "down" => Self::Down,
            "right" => Self::Right,
            "numlock" => Self::NumLock,
            "numdivide" => Self::NumDivide,
            "nummultiply" => Self::NumMultiply,
            "numsubtract" => Self::NumSubtract,
            "numadd" => Self::NumAdd,
            "numpad0" => Self::NumPad0,
            "numpad1" => Self::NumPad1,
            "numpad2" => Self::NumPad2,
            "numpad3" => Self::NumPad3,
            "numpad4" => Self::NumPad4,
            "numpad5" => Self::NumPad5,
            "numpad6" => Self::NumPad6,
            "numpad7" => Self::NumPad7,
            "numpad8" => Self::NumPad8,
            "numpad9" => Self::NumPad9,
            "numdecimal" => Self::NumDecimal,
            "numpadenter" => Self::NumPadEnter,
            _ => return Option::None,
        };
        Some(led)
    }
}

/// Truncate a color channel to one byte.
///
/// Deliberate wraparound, not a clamp: the firmware expects a raw byte, so
/// 300 becomes 44 and -1 becomes 255.
fn channel_byte(value: i32) -> u8 {
    value as u8
}

/// Select the active profile.
pub fn encode_set_profile(profile: Profile) -> [u8; PACKET_LEN] {
    [
        REPORT_ID,
        subcommand::SET_PROFILE,
        profile.id(),
        0,
        0,
        0,
        0,
        0,
    ]
}

/// Select the lighting mode for a profile.
///
/// The spectrum sub-mode is only honored for [`LightingMode::SpectrumColors`]
/// and is forced to zero for every other mode, as the firmware expects.
pub fn encode_set_lighting_mode(
    profile: Profile,
    mode: LightingMode,
    spectrum: SpectrumMode,
) -> [u8; PACKET_LEN] {
    let spectrum_id = if mode == LightingMode::SpectrumColors {
        spectrum.id()
    } else {
        0x00
    };
    [
        REPORT_ID,
        subcommand::SET_LIGHTING_MODE,
        profile.id(),
        mode.id(),
        spectrum_id,
        0,
        0,
        0,
    ]
}

/// Set the background color used by the standard effects.
pub fn encode_set_background_color(profile: Profile, r: i32, g: i32, b: i32) -> [u8; PACKET_LEN] {
    [
        REPORT_ID,
        subcommand::SET_BACKGROUND_COLOR,
        profile.id(),
        channel_byte(r),
        channel_byte(g),
        channel_byte(b),
        0,
        0,
    ]
}

/// Set a single key's LED color.
///
/// Returns `None` for [`LedId::None`]: unmapped keys are dropped, not sent.
pub fn encode_set_key_color(
    profile: Profile,
    key: LedId,
    r: i32,
    g: i32,
    b: i32,
) -> Option<[u8; PACKET_LEN]> {
    if key == LedId::None {
        return None;
    }
    Some([
        REPORT_ID,
        subcommand::SET_KEY_COLOR,
        profile.id(),
        key.id(),
        channel_byte(r),
        channel_byte(g),
        channel_byte(b),
        0,
    ])
}

/// Turn off every key LED in the profile.
pub fn encode_clear_key_colors(profile: Profile) -> [u8; PACKET_LEN] {
    [
        REPORT_ID,
        subcommand::SET_KEY_COLOR,
        profile.id(),
        KEY_FIELD_CLEAR_ALL,
        0,
        0,
        0,
        0,
    ]
}

/// Persist the current per-key layout to the keyboard's onboard memory.
///
/// Switching profiles without saving first discards unsaved key colors.
pub fn encode_save_key_colors(profile: Profile) -> [u8; PACKET_LEN] {
    [
        REPORT_ID,
        subcommand::SET_KEY_COLOR,
        profile.id(),
        KEY_FIELD_SAVE,
        0,
        0,
        0,
        0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_profile_5_reference_vector() {
        assert_eq!(
            encode_set_profile(Profile::P5),
            [0x07, 0x03, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn every_packet_has_category_marker_and_fixed_length() {
        let packets = [
            encode_set_profile(Profile::P1),
            encode_set_lighting_mode(Profile::P2, LightingMode::Ripple, SpectrumMode::Shine),
            encode_set_background_color(Profile::P3, 1, 2, 3),
            encode_set_key_color(Profile::P4, LedId::Space, 4, 5, 6).unwrap(),
            encode_clear_key_colors(Profile::P5),
            encode_save_key_colors(Profile::Pc),
        ];
        for packet in packets {
            assert_eq!(packet.len(), PACKET_LEN);
            assert_eq!(packet[0], REPORT_ID);
        }
    }

    #[test]
    fn background_color_wraps_modulo_256() {
        // Wraparound, not clamping: 300 -> 44, -1 -> 255.
        let packet = encode_set_background_color(Profile::Pc, 300, 10, -1);
        assert_eq!(packet, [0x07, 0x0B, 0x06, 0x2C, 0x0A, 0xFF, 0x00, 0x00]);
    }

    #[test]
    fn key_color_wraps_modulo_256() {
        let packet = encode_set_key_color(Profile::P1, LedId::Q, 256, 511, -2).unwrap();
        assert_eq!(packet[4..7], [0x00, 0xFF, 0xFE]);
    }

    #[test]
    fn key_color_for_unmapped_key_emits_nothing() {
        assert_eq!(encode_set_key_color(Profile::P1, LedId::None, 10, 10, 10), None);
    }

    #[test]
    fn key_color_layout() {
        let packet = encode_set_key_color(Profile::P2, LedId::Escape, 1, 2, 3).unwrap();
        assert_eq!(packet, [0x07, 0x0D, 0x02, 0x0B, 0x01, 0x02, 0x03, 0x00]);
    }

    #[test]
    fn lighting_mode_spectrum_carries_sub_mode() {
        let packet = encode_set_lighting_mode(
            Profile::P1,
            LightingMode::SpectrumColors,
            SpectrumMode::Trigger,
        );
        assert_eq!(packet, [0x07, 0x0A, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn lighting_mode_non_spectrum_zeroes_sub_mode() {
        let packet =
            encode_set_lighting_mode(Profile::P1, LightingMode::Breathing, SpectrumMode::Trigger);
        assert_eq!(packet[3], 0x05);
        assert_eq!(packet[4], 0x00);
    }

    #[test]
    fn clear_and_save_sentinels() {
        assert_eq!(
            encode_clear_key_colors(Profile::P3),
            [0x07, 0x0D, 0x03, 0xFE, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            encode_save_key_colors(Profile::P3),
            [0x07, 0x0D, 0x03, 0xFF, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn profile_from_name_accepts_variants() {
        assert_eq!(Profile::from_name("1"), Some(Profile::P1));
        assert_eq!(Profile::from_name("P5"), Some(Profile::P5));
        assert_eq!(Profile::from_name("pc"), Some(Profile::Pc));
        assert_eq!(Profile::from_name("6"), None);
    }

    #[test]
    fn lighting_mode_from_name_accepts_variants() {
        assert_eq!(LightingMode::from_name("shine"), Some(LightingMode::Shine));
        assert_eq!(
            LightingMode::from_name("rainbow-wave"),
            Some(LightingMode::RainbowWave)
        );
        assert_eq!(
            LightingMode::from_name("SPECTRUM"),
            Some(LightingMode::SpectrumColors)
        );
        assert_eq!(LightingMode::from_name("disco"), None);
    }

    #[test]
    fn led_from_name_accepts_variants() {
        assert_eq!(LedId::from_name("Escape"), Some(LedId::Escape));
        assert_eq!(LedId::from_name("esc"), Some(LedId::Escape));
        assert_eq!(LedId::from_name("q"), Some(LedId::Q));
        assert_eq!(LedId::from_name("numpad5"), Some(LedId::NumPad5));
        assert_eq!(LedId::from_name("hyperspace"), None);
    }

    #[test]
    fn led_ids_match_firmware_table() {
        assert_eq!(LedId::F5.id(), 0x07);
        assert_eq!(LedId::Pause.id(), 0x00);
        assert_eq!(LedId::NumPadEnter.id(), 0x72);
        assert_eq!(LedId::None.id(), 0xFF);
    }
}
