// SPDX-License-Identifier: GPL-3.0
// card_error.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    error::Error,
    fmt,
    io,
    path::PathBuf,
};

use super::{CardLocation, CardType, Drive};

/// This enum represents every recoverable failure raised by cards or by the
/// slot bus while constructing them. Contract violations (bad slot numbers,
/// wrong capability access) are not represented here, they panic.
#[derive(Debug)]
pub enum CardError {

    /// A disk image could not be read from the host filesystem.
    Io {
        path: PathBuf,
        source: io::Error,
    },

    /// A disk image had a size matching no supported format.
    UnsupportedImageSize {
        path: PathBuf,
        size: usize,
    },

    /// A drive was asked to reload its last image but none was ever recorded.
    NoLastImage {
        drive: Drive,
    },

    /// A second card of a single-instance capability was inserted.
    CapabilityAlreadyInstalled {
        card_type: CardType,
        existing_slot: usize,
    },

    /// A card was inserted somewhere it cannot live (e.g. a memory expansion
    /// card in a numbered slot).
    WrongLocation {
        card_type: CardType,
        location: CardLocation,
    },

    /// A configuration string named no known card type.
    UnknownCardType(String),

    /// A configuration override was malformed.
    InvalidSetting(String),
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardError::Io { path, source } => {
                write!(f, "failed to read disk image {}: {}", path.display(), source)
            },
            CardError::UnsupportedImageSize { path, size } => {
                write!(f, "disk image {} has unsupported size {} bytes", path.display(), size)
            },
            CardError::NoLastImage { drive } => {
                write!(f, "no previous disk image recorded for {}", drive)
            },
            CardError::CapabilityAlreadyInstalled { card_type, existing_slot } => {
                write!(f, "only one {} card is supported, one is already in slot {}", card_type, existing_slot)
            },
            CardError::WrongLocation { card_type, location } => {
                write!(f, "a {} card cannot be installed in the {}", card_type, location)
            },
            CardError::UnknownCardType(name) => write!(f, "unknown card type '{}'", name),
            CardError::InvalidSetting(setting) => {
                write!(f, "invalid slot setting '{}', expected slotN=type or aux=type", setting)
            },
        }
    }
}

impl Error for CardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CardError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
