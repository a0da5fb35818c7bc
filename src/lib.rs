//! Flat flash filesystem image packer.
//!
//! Packs a directory of files into one contiguous binary image suitable
//! for flashing onto an embedded device's external storage: a fixed-width
//! header table describing every file, followed by the raw contents
//! back-to-back. The device-side reader resolves a name against the
//! header and streams the content straight out of flash.
//!
//! ```text
//! directory ──> collect ──> lay out ──> image file ──> esptool (optional)
//! ```
//!
//! - **Collector** ([`collect`]) - reads the source directory in
//!   enumeration order, raw bytes only
//! - **Image builder** ([`image`]) - the core: assigns content addresses
//!   and emits the header table plus data region
//! - **Pack pipeline** ([`pack`]) - collect, lay out, write to disk
//! - **Uploader** ([`upload`]) - hands the finished image to esptool at
//!   the configured flash offset
//!
//! # Example
//!
//! ```rust,ignore
//! use flashpack::pack::pack_image;
//! use std::path::Path;
//!
//! let summary = pack_image(Path::new("input"), Path::new("output.image"))?;
//! println!("{} files, {} bytes", summary.entry_count, summary.image_len);
//! ```

pub mod collect;
pub mod config;
pub mod image;
pub mod pack;
pub mod preflight;
pub mod upload;

pub use config::PackConfig;
pub use image::{CollectedEntry, Image, LaidOutEntry, NAME_FIELD_WIDTH};
pub use pack::{pack_image, PackSummary};
