// SPDX-License-Identifier: GPL-3.0
// disk_image.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::card::CardError;

/// Number of tracks on a 5.25" disk.
pub const NUM_TRACKS: usize = 35;

/// Size in bytes of a 16-sector DOS/ProDOS order image.
pub const SECTOR_IMAGE_SIZE: usize = 143_360;

/// Size in bytes of a raw nibble image.
pub const NIBBLE_IMAGE_SIZE: usize = 232_960;

/// The on-disk layouts we know how to read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Sector,
    Nibble,
}

/// This struct models a disk image held in memory, keeping hold of the path it
/// came from so it can be recalled later.
pub struct DiskImage {

    // Where the image was read from.
    path: PathBuf,

    // The raw image contents.
    data: Vec<u8>,

    // Layout inferred from the image size.
    format: ImageFormat,
}

impl DiskImage {

    /// Reads the image at the supplied path, inferring its format from its size.
    pub fn open(path: &Path) -> Result<Self, CardError> {

        let data = fs::read(path).map_err(|source| CardError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let format = match data.len() {
            SECTOR_IMAGE_SIZE => ImageFormat::Sector,
            NIBBLE_IMAGE_SIZE => ImageFormat::Nibble,
            size => {
                return Err(CardError::UnsupportedImageSize {
                    path: path.to_path_buf(),
                    size,
                });
            },
        };

        Ok(DiskImage {
            path: path.to_path_buf(),
            data,
            format,
        })
    }

    /// Returns the path this image was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the format of this image.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the number of bytes stored per track.
    pub fn track_size(&self) -> usize {
        self.data.len() / NUM_TRACKS
    }

    /// Returns the byte at the supplied position of the supplied track, wrapping the
    /// position around the track as the disk would.
    pub fn read_byte(&self, track: usize, position: usize) -> u8 {

        let track_size = self.track_size();
        let track = track.min(NUM_TRACKS - 1);
        self.data[track * track_size + position % track_size]
    }
}
