//! open-spectrum CLI: command-line keyboard lighting control.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use open_spectrum_core::discovery;
use open_spectrum_core::keyboard::Keyboard;
use open_spectrum_core::layout::{GRID_COLUMNS, GRID_ROWS};
use open_spectrum_core::lighting::{ColorGrid, Pacing, Rgb};
use open_spectrum_core::lightprofile::{self, LightingProfile};
use open_spectrum_core::protocol::{LedId, LightingMode, Profile, SpectrumMode};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "open-spectrum",
    version,
    about = "Open-source Tesoro keyboard lighting control"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all HID interfaces with their probed capabilities.
    ListDevices,
    /// Switch the active profile (1-5 or "pc").
    SetProfile {
        /// Profile name: 1, 2, 3, 4, 5, or pc.
        profile: String,
    },
    /// Select the lighting mode.
    SetMode {
        /// Mode: shine, trigger, ripple, fireworks, radiation, breathing,
        /// rainbow, spectrum.
        mode: String,
        /// Spectrum sub-mode (shine, breathing, trigger); spectrum mode only.
        #[arg(long, default_value = "shine")]
        spectrum: String,
        /// Target profile.
        #[arg(long, default_value = "pc")]
        profile: String,
    },
    /// Set the background color for the standard effects.
    SetColor {
        r: i32,
        g: i32,
        b: i32,
        /// Target profile.
        #[arg(long, default_value = "pc")]
        profile: String,
    },
    /// Set one key's LED color.
    SetKey {
        /// Key name, e.g. escape, f5, a, space, numpad7.
        key: String,
        r: i32,
        g: i32,
        b: i32,
        /// Target profile.
        #[arg(long, default_value = "pc")]
        profile: String,
    },
    /// Turn off all key LEDs.
    Clear {
        /// Target profile.
        #[arg(long, default_value = "pc")]
        profile: String,
    },
    /// Save the current per-key layout to onboard memory.
    Save {
        /// Target profile.
        #[arg(long, default_value = "pc")]
        profile: String,
    },
    /// Paint an image file onto the keys (resized to the 22x6 canvas).
    ApplyImage {
        /// Path to a PNG or JPEG image.
        path: PathBuf,
        /// Target profile.
        #[arg(long, default_value = "pc")]
        profile: String,
        /// Fast pacing: quicker sweep, tolerates missed key updates.
        #[arg(long)]
        fast: bool,
    },
    /// Write a default lighting profile as JSON for editing.
    SaveConfig {
        /// Output file.
        path: PathBuf,
    },
    /// Apply a JSON lighting profile to the keyboard.
    ApplyConfig {
        /// Profile file written by save-config.
        path: PathBuf,
    },
}

fn parse_profile(name: &str) -> Result<Profile> {
    Profile::from_name(name)
        .ok_or_else(|| anyhow::anyhow!("unknown profile '{name}'. Valid: 1, 2, 3, 4, 5, pc"))
}

fn open_keyboard(api: &hidapi::HidApi) -> Result<Keyboard> {
    Keyboard::open(api).context(
        "no compatible keyboard found. Ensure a Tesoro Gram Spectrum is connected \
         and no other lighting software holds the interface",
    )
}

/// Resize an image to the key canvas and sample one color per cell.
fn image_to_grid(path: &Path) -> Result<ColorGrid> {
    let img = image::open(path)
        .with_context(|| format!("open image {}", path.display()))?
        .resize_exact(
            GRID_COLUMNS as u32,
            GRID_ROWS as u32,
            image::imageops::FilterType::Triangle,
        )
        .to_rgb8();

    let mut grid = ColorGrid::new();
    for col in 0..GRID_COLUMNS {
        for row in 0..GRID_ROWS {
            let pixel = img.get_pixel(col as u32, row as u32);
            grid.set(col, row, Rgb::new(pixel[0], pixel[1], pixel[2]));
        }
    }
    Ok(grid)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let api = hidapi::HidApi::new().context("hidapi init")?;

    match cli.command {
        Commands::ListDevices => {
            let capabilities = discovery::enumerate(&api);
            if capabilities.is_empty() {
                println!("No HID interfaces found.");
                return Ok(());
            }
            let lighting_path = discovery::find_lighting_interface(&capabilities)
                .map(|cap| cap.path.clone());
            for cap in &capabilities {
                let marker = if Some(&cap.path) == lighting_path.as_ref() {
                    "  [lighting]"
                } else {
                    ""
                };
                println!(
                    "{:04X}:{:04X} v{:04X} {} / {} (in={} out={} feat={}) {}{}",
                    cap.vendor_id,
                    cap.product_id,
                    cap.release_number,
                    cap.manufacturer.as_deref().unwrap_or("?"),
                    cap.product.as_deref().unwrap_or("?"),
                    cap.input_report_len,
                    cap.output_report_len,
                    cap.feature_report_len,
                    cap.path,
                    marker
                );
            }
        }
        Commands::SetProfile { profile } => {
            let profile = parse_profile(&profile)?;
            let keyboard = open_keyboard(&api)?;
            keyboard.set_profile(profile)?;
            println!("Active profile: {profile}");
        }
        Commands::SetMode {
            mode,
            spectrum,
            profile,
        } => {
            let profile = parse_profile(&profile)?;
            let mode = LightingMode::from_name(&mode).ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown mode '{mode}'. Valid: shine, trigger, ripple, fireworks, \
                     radiation, breathing, rainbow, spectrum"
                )
            })?;
            let spectrum = SpectrumMode::from_name(&spectrum).ok_or_else(|| {
                anyhow::anyhow!("unknown spectrum sub-mode '{spectrum}'. Valid: shine, breathing, trigger")
            })?;
            let keyboard = open_keyboard(&api)?;
            keyboard.set_lighting_mode(profile, mode, spectrum)?;
            println!("Lighting mode set on {profile}");
        }
        Commands::SetColor { r, g, b, profile } => {
            let profile = parse_profile(&profile)?;
            let keyboard = open_keyboard(&api)?;
            keyboard.set_background_color(profile, r, g, b)?;
            println!("Background color set on {profile}");
        }
        Commands::SetKey {
            key,
            r,
            g,
            b,
            profile,
        } => {
            let profile = parse_profile(&profile)?;
            let led = LedId::from_name(&key)
                .ok_or_else(|| anyhow::anyhow!("unknown key '{key}'"))?;
            let keyboard = open_keyboard(&api)?;
            keyboard.set_key_color(profile, led, r, g, b)?;
            println!("Key '{key}' set on {profile}");
        }
        Commands::Clear { profile } => {
            let profile = parse_profile(&profile)?;
            let keyboard = open_keyboard(&api)?;
            keyboard.clear_key_colors(profile)?;
            println!("All key LEDs cleared on {profile}");
        }
        Commands::Save { profile } => {
            let profile = parse_profile(&profile)?;
            let keyboard = open_keyboard(&api)?;
            keyboard.save_key_colors(profile)?;
            println!("Layout saved to onboard memory on {profile}");
        }
        Commands::ApplyImage {
            path,
            profile,
            fast,
        } => {
            let profile = parse_profile(&profile)?;
            let grid = image_to_grid(&path)?;
            let pacing = if fast { Pacing::Fast } else { Pacing::Relaxed };
            let keyboard = open_keyboard(&api)?;
            keyboard.apply_color_grid(&grid, profile, pacing)?;
            println!("Image painted onto {profile}");
        }
        Commands::SaveConfig { path } => {
            let profile = LightingProfile::default();
            lightprofile::save_profile(&path, &profile)?;
            println!("Wrote default lighting profile to {}", path.display());
        }
        Commands::ApplyConfig { path } => {
            let profile = lightprofile::load_profile(&path)?;
            let keyboard = open_keyboard(&api)?;
            keyboard
                .apply_lighting_profile(&profile)
                .with_context(|| format!("apply profile '{}'", profile.name))?;
            println!("Applied lighting profile '{}'", profile.name);
        }
    }

    Ok(())
}
