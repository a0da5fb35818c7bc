//! Image upload via esptool.
//!
//! The image is written to the device at the configured flash offset.
//! That offset is a deployment convention shared with the device-side
//! reader; nothing in the image records it, so this module never checks
//! it against the image contents.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

use crate::config::PackConfig;
use crate::preflight;

/// Flash a built image onto the device behind `port`.
///
/// Runs `esptool.py --port <port> write_flash <base_address> <image>`
/// with inherited stdio, so esptool's own progress output stays visible.
/// A missing flasher, a missing image, or a non-zero exit is fatal.
pub fn flash_image(config: &PackConfig, image: &Path, port: &str) -> Result<()> {
    preflight::check_flasher(&config.esptool)?;

    if !image.is_file() {
        bail!("image does not exist: {}", image.display());
    }

    println!(
        "[flash] uploading {} via {} at {:#x}",
        image.display(),
        port,
        config.base_address
    );

    let status = Command::new(&config.esptool)
        .args(["--port", port, "write_flash"])
        .arg(format!("{:#x}", config.base_address))
        .arg(image)
        .status()
        .with_context(|| format!("running {} for '{}'", config.esptool, image.display()))?;

    if !status.success() {
        bail!("{} failed with status {}", config.esptool, status);
    }

    println!("[flash] upload complete");
    Ok(())
}
