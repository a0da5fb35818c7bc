//! The pack pipeline: collect, lay out, write.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::collect::collect_entries;
use crate::image::Image;

/// What a finished pack produced, for callers that report on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackSummary {
    pub entry_count: usize,
    pub image_len: usize,
}

/// Pack `source_dir` into a flat image at `output`.
///
/// Collection and layout run to completion before the output file is
/// touched, so a malformed entry never leaves a truncated image behind.
/// The write itself streams the header table first, then the contents.
pub fn pack_image(source_dir: &Path, output: &Path) -> Result<PackSummary> {
    let collected = collect_entries(source_dir)?;
    let image = Image::build(collected)?;

    println!(
        "[pack] adding {} files from {}",
        image.entries().len(),
        source_dir.display()
    );
    for entry in image.entries() {
        println!(
            "[pack]   {} -> address {:#x}, {} bytes",
            entry.name, entry.address, entry.size
        );
    }

    let file = File::create(output)
        .with_context(|| format!("creating image '{}'", output.display()))?;
    let mut writer = BufWriter::new(file);
    image
        .write_to(&mut writer)
        .with_context(|| format!("writing image '{}'", output.display()))?;
    writer
        .flush()
        .with_context(|| format!("writing image '{}'", output.display()))?;

    println!(
        "[pack] image ready: {} ({} bytes)",
        output.display(),
        image.total_len()
    );

    Ok(PackSummary {
        entry_count: image.entries().len(),
        image_len: image.total_len(),
    })
}
