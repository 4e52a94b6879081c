//! Saved lighting configuration: a host-side profile that can be written
//! to disk as JSON and replayed onto the keyboard.

use crate::channel::FeatureWriter;
use crate::error::{Error, Result};
use crate::lighting::Rgb;
use crate::protocol::{
    encode_set_background_color, encode_set_lighting_mode, encode_set_profile, LightingMode,
    Profile, SpectrumMode,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A complete host-side lighting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingProfile {
    /// Display name.
    pub name: String,
    /// Onboard profile the settings target.
    pub profile: Profile,
    /// Animation mode.
    pub mode: LightingMode,
    /// Spectrum sub-mode; ignored unless `mode` is the spectrum family.
    pub spectrum: SpectrumMode,
    /// Background color for the standard effects.
    pub background: Rgb,
}

impl Default for LightingProfile {
    fn default() -> Self {
        Self {
            name: "Default".into(),
            profile: Profile::Pc,
            mode: LightingMode::Shine,
            spectrum: SpectrumMode::Shine,
            background: Rgb::new(255, 255, 255),
        }
    }
}

impl LightingProfile {
    /// Replay this configuration onto the device: profile switch, then
    /// mode, then background color.
    pub fn apply(&self, writer: &dyn FeatureWriter) -> Result<()> {
        writer.write_feature(&encode_set_profile(self.profile))?;
        writer.write_feature(&encode_set_lighting_mode(
            self.profile,
            self.mode,
            self.spectrum,
        ))?;
        writer.write_feature(&encode_set_background_color(
            self.profile,
            self.background.r as i32,
            self.background.g as i32,
            self.background.b as i32,
        ))
    }
}

/// Write a lighting profile to `path` as pretty-printed JSON.
pub fn save_profile(path: &Path, profile: &LightingProfile) -> Result<()> {
    let json = serde_json::to_string_pretty(profile)
        .map_err(|e| Error::Config(format!("serialize profile: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| Error::Config(format!("write {}: {e}", path.display())))
}

/// Read a lighting profile from a JSON file at `path`.
pub fn load_profile(path: &Path) -> Result<LightingProfile> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
    serde_json::from_str(&json).map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))
}
