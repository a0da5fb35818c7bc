//! Flat filesystem image layout.
//!
//! An image is a fixed-width header table followed by the raw file
//! contents, back-to-back:
//!
//! ```text
//! | count: i32 LE                                  |
//! | name[16] | size: i32 LE | address: i32 LE      |  (one record per entry)
//! | ...                                            |
//! | content[0] | content[1] | ...                  |
//! ```
//!
//! Name fields are NUL-terminated and NUL-padded, so a reader that scans
//! for the first terminator never picks up padding bytes. Addresses are
//! absolute byte offsets into the image itself; the flash offset the image
//! is written to on the device is applied by the uploader and never
//! recorded here.
//!
//! Content boundaries exist only in the header: the data region carries no
//! separators, padding, or alignment.

use anyhow::{anyhow, bail, Result};
use std::io::{self, Write};

/// Width of the fixed name field, including the NUL terminator.
pub const NAME_FIELD_WIDTH: usize = 16;

/// Bytes occupied by one header record: name field plus size and address.
pub const HEADER_RECORD_SIZE: usize = NAME_FIELD_WIDTH + 8;

/// Bytes occupied by the entry count at the start of the image.
pub const COUNT_FIELD_SIZE: usize = 4;

/// One source file as captured from disk, before layout.
///
/// `content` holds the exact bytes that will land in the data region; the
/// size recorded in the header is always derived from it, so header and
/// data can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedEntry {
    pub name: String,
    pub content: Vec<u8>,
}

impl CollectedEntry {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}

/// A collected entry with its content address assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaidOutEntry {
    pub name: String,
    pub size: i32,
    /// Absolute byte offset of this entry's content within the image.
    pub address: i32,
    pub content: Vec<u8>,
}

impl LaidOutEntry {
    /// The on-wire name field: name bytes, NUL terminator, NUL padding.
    fn name_field(&self) -> [u8; NAME_FIELD_WIDTH] {
        let mut field = [0u8; NAME_FIELD_WIDTH];
        field[..self.name.len()].copy_from_slice(self.name.as_bytes());
        field
    }
}

/// A fully laid-out image, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    entries: Vec<LaidOutEntry>,
}

impl Image {
    /// Lay out `collected` into an image.
    ///
    /// Entries keep their order; the first content byte sits immediately
    /// after the header table and each subsequent entry starts where the
    /// previous one ends. Addresses are assigned in a single left-to-right
    /// scan carrying the running offset.
    ///
    /// Fails without producing anything if an entry's name does not fit
    /// the name field (names are never truncated), if a content length or
    /// an assigned address exceeds the signed 32-bit header fields, or if
    /// the entry count itself does not fit the count field.
    pub fn build(collected: Vec<CollectedEntry>) -> Result<Self> {
        i32::try_from(collected.len())
            .map_err(|_| anyhow!("too many entries for the count field: {}", collected.len()))?;

        let header_size = COUNT_FIELD_SIZE + collected.len() * HEADER_RECORD_SIZE;

        let mut entries = Vec::with_capacity(collected.len());
        let mut address = header_size as i64;
        for entry in collected {
            if entry.name.len() > NAME_FIELD_WIDTH - 1 {
                bail!(
                    "entry name '{}' is too long: {} bytes, the name field holds at most {}",
                    entry.name,
                    entry.name.len(),
                    NAME_FIELD_WIDTH - 1
                );
            }
            let size = i32::try_from(entry.content.len()).map_err(|_| {
                anyhow!(
                    "entry '{}' is too large for the size field: {} bytes",
                    entry.name,
                    entry.content.len()
                )
            })?;
            let assigned = i32::try_from(address).map_err(|_| {
                anyhow!(
                    "entry '{}' lands beyond the 31-bit address space",
                    entry.name
                )
            })?;
            entries.push(LaidOutEntry {
                name: entry.name,
                size,
                address: assigned,
                content: entry.content,
            });
            address += i64::from(size);
        }

        Ok(Self { entries })
    }

    /// Entries in layout order, addresses populated.
    pub fn entries(&self) -> &[LaidOutEntry] {
        &self.entries
    }

    /// Size of the header region: the count field plus one record per entry.
    pub fn header_size(&self) -> usize {
        COUNT_FIELD_SIZE + self.entries.len() * HEADER_RECORD_SIZE
    }

    /// Total image length, header and data regions together.
    pub fn total_len(&self) -> usize {
        self.header_size()
            + self
                .entries
                .iter()
                .map(|entry| entry.content.len())
                .sum::<usize>()
    }

    /// Write the image: the whole header table first, then the contents.
    ///
    /// Streams in two sequential phases, so the caller does not need the
    /// full data region in memory beyond what the entries already hold.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(&(self.entries.len() as i32).to_le_bytes())?;
        for entry in &self.entries {
            writer.write_all(&entry.name_field())?;
            writer.write_all(&entry.size.to_le_bytes())?;
            writer.write_all(&entry.address.to_le_bytes())?;
        }
        for entry in &self.entries {
            writer.write_all(&entry.content)?;
        }
        Ok(())
    }

    /// The complete image as one buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.total_len());
        self.write_to(&mut buf)
            .expect("writing to an in-memory buffer cannot fail");
        buf
    }
}
