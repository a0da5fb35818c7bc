//! Host tool checks before flashing.
//!
//! Uploading needs the flasher on PATH; checking up front turns a cryptic
//! spawn failure into a clear message with an install hint.

use anyhow::{bail, Result};

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Ensure the configured flasher binary is available.
pub fn check_flasher(esptool: &str) -> Result<()> {
    if command_exists(esptool) {
        return Ok(());
    }
    bail!(
        "flasher '{}' not found on PATH (install: pip install esptool)",
        esptool
    );
}
