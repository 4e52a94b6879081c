//! High-level keyboard handle: discovery, channel lifecycle, and lighting
//! operations in one place.
//!
//! All operations are synchronous and blocking. The handle provides no
//! internal locking; calls on one `Keyboard` must be serialized by the
//! caller.

use crate::channel::{DeviceChannel, FeatureWriter};
use crate::discovery;
use crate::error::{Error, Result};
use crate::layout::KeyLayout;
use crate::lighting::{self, ColorGrid, Pacing};
use crate::lightprofile::LightingProfile;
use crate::protocol::{
    encode_clear_key_colors, encode_save_key_colors, encode_set_background_color,
    encode_set_key_color, encode_set_lighting_mode, encode_set_profile, LedId, LightingMode,
    Profile, SpectrumMode,
};
use hidapi::HidApi;
use tracing::info;

/// An open lighting-control connection to one attached keyboard.
pub struct Keyboard {
    channel: DeviceChannel,
    layout: KeyLayout,
}

impl Keyboard {
    /// Find the lighting interface and open a channel to it.
    ///
    /// Enumerates all HID interfaces, selects the vendor lighting
    /// sub-interface, and acquires an exclusive handle. Returns
    /// [`Error::DeviceNotFound`] when no compatible keyboard is attached —
    /// report that as "no compatible keyboard found" rather than a crash.
    pub fn open(api: &HidApi) -> Result<Self> {
        let capabilities = discovery::enumerate(api);
        let target = discovery::find_lighting_interface(&capabilities).ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "no lighting interface among {} HID interfaces",
                capabilities.len()
            ))
        })?;

        let mut channel = DeviceChannel::new();
        channel.open(api, &target.path)?;

        info!(
            product = target.product.as_deref().unwrap_or("?"),
            path = %target.path,
            "keyboard connected"
        );
        Ok(Self {
            channel,
            layout: KeyLayout::gram_spectrum(),
        })
    }

    /// The board's key layout.
    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// Switch the keyboard to the given profile.
    pub fn set_profile(&self, profile: Profile) -> Result<()> {
        self.channel.write_feature(&encode_set_profile(profile))
    }

    /// Select the lighting mode (and spectrum sub-mode) for a profile.
    pub fn set_lighting_mode(
        &self,
        profile: Profile,
        mode: LightingMode,
        spectrum: SpectrumMode,
    ) -> Result<()> {
        self.channel
            .write_feature(&encode_set_lighting_mode(profile, mode, spectrum))
    }

    /// Set the background color used by the standard effects.
    ///
    /// Channels wrap modulo 256, matching the firmware's raw-byte reading.
    pub fn set_background_color(&self, profile: Profile, r: i32, g: i32, b: i32) -> Result<()> {
        self.channel
            .write_feature(&encode_set_background_color(profile, r, g, b))
    }

    /// Set a single key's LED. Unmapped keys ([`LedId::None`]) are a no-op.
    pub fn set_key_color(&self, profile: Profile, key: LedId, r: i32, g: i32, b: i32) -> Result<()> {
        match encode_set_key_color(profile, key, r, g, b) {
            Some(packet) => self.channel.write_feature(&packet),
            None => Ok(()),
        }
    }

    /// Turn off every key LED in the profile.
    pub fn clear_key_colors(&self, profile: Profile) -> Result<()> {
        self.channel.write_feature(&encode_clear_key_colors(profile))
    }

    /// Persist the current per-key layout to onboard memory.
    pub fn save_key_colors(&self, profile: Profile) -> Result<()> {
        self.channel.write_feature(&encode_save_key_colors(profile))
    }

    /// Paint a 22x6 color grid onto the keys, pacing between writes.
    pub fn apply_color_grid(&self, grid: &ColorGrid, profile: Profile, pacing: Pacing) -> Result<()> {
        lighting::apply_color_grid(&self.channel, &self.layout, grid, profile, pacing)
    }

    /// Replay a saved lighting profile onto the device.
    pub fn apply_lighting_profile(&self, profile: &LightingProfile) -> Result<()> {
        profile.apply(&self.channel)
    }

    /// Release the device handle. Idempotent; also runs on drop.
    pub fn close(&mut self) {
        self.channel.close();
    }
}
