use std::path::PathBuf;

use anyhow::{bail, Result};
use flashpack::config::{PackConfig, CONFIG_FILE, DEFAULT_SOURCE_DIR};
use flashpack::pack::pack_image;
use flashpack::upload::flash_image;

fn usage() -> &'static str {
    "Usage:\n  flashpack build [source_dir] [output]\n  flashpack flash [port] [source_dir] [output]\n\nDefaults come from flashpack.toml in the working directory, falling back\nto packing './input' into './output.image'."
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = PackConfig::load(None)?;

    match args.as_slice() {
        [build] if build == "build" => run_build(&config),
        [build, source] if build == "build" => {
            config.source_dir = PathBuf::from(source);
            run_build(&config)
        }
        [build, source, output] if build == "build" => {
            config.source_dir = PathBuf::from(source);
            config.output = PathBuf::from(output);
            run_build(&config)
        }
        [flash] if flash == "flash" => run_flash(&config),
        [flash, port] if flash == "flash" => {
            config.port = Some(port.clone());
            run_flash(&config)
        }
        [flash, port, source] if flash == "flash" => {
            config.port = Some(port.clone());
            config.source_dir = PathBuf::from(source);
            run_flash(&config)
        }
        [flash, port, source, output] if flash == "flash" => {
            config.port = Some(port.clone());
            config.source_dir = PathBuf::from(source);
            config.output = PathBuf::from(output);
            run_flash(&config)
        }
        _ => bail!(usage()),
    }
}

fn run_build(config: &PackConfig) -> Result<()> {
    ensure_source_exists(config)?;
    pack_image(&config.source_dir, &config.output)?;
    Ok(())
}

fn run_flash(config: &PackConfig) -> Result<()> {
    let port = match &config.port {
        Some(port) => port.clone(),
        None => bail!(
            "no serial port given; pass one ('flashpack flash <port>') or set \
             [flash].port in {}",
            CONFIG_FILE
        ),
    };

    run_build(config)?;
    flash_image(config, &config.output, &port)
}

fn ensure_source_exists(config: &PackConfig) -> Result<()> {
    // The collector reports missing directories itself; this only makes
    // the out-of-the-box case friendlier.
    if config.source_dir == PathBuf::from(DEFAULT_SOURCE_DIR) && !config.source_dir.exists() {
        bail!(
            "default source directory './{}' does not exist; create it or pass \
             one: flashpack build <source_dir>",
            DEFAULT_SOURCE_DIR
        );
    }
    Ok(())
}
